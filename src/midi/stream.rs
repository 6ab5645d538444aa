//! Byte stream to [`MidiMessage`]s, on top of `midly`'s live stream parser.
//!
//! `midly` deals with running status and real-time bytes interleaved in
//! other messages; this wrapper only converts its events and drops the
//! kinds the device does not carry.

use midly::live::LiveEvent;
use midly::stream::MidiStream;

use super::message::{MidiMessage, MAX_SYSEX_LEN};

midly::stack_buffer! {
    struct WireBuffer([u8; MAX_SYSEX_LEN]);
}

/// Incremental reader for one MIDI input.
pub struct MidiReader {
    stream: MidiStream<WireBuffer>,
}

impl MidiReader {
    pub fn new() -> Self {
        Self {
            stream: MidiStream::with_buffer(WireBuffer::new()),
        }
    }

    /// Feed raw bytes. Completed messages are passed to `emit`, in wire order.
    pub fn feed(&mut self, bytes: &[u8], mut emit: impl FnMut(MidiMessage)) {
        self.stream.feed(bytes, |event: LiveEvent<'_>| match MidiMessage::from_live(&event) {
            Some(msg) => emit(msg),
            None => {
                #[cfg(feature = "defmt")]
                defmt::debug!("MIDI event not forwarded");
            }
        });
    }
}

impl Default for MidiReader {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::midi::message::MAX_MESSAGE_SIZE;
    use heapless::Vec;

    fn parse(bytes: &[u8]) -> Vec<MidiMessage, 16> {
        let mut reader = MidiReader::new();
        let mut out = Vec::new();
        reader.feed(bytes, |m| {
            out.push(m).unwrap();
        });
        out
    }

    #[test]
    fn parses_note_on() {
        let out = parse(&[0x92, 60, 100]);
        assert_eq!(
            out.as_slice(),
            &[MidiMessage::NoteOn {
                channel: 2,
                note: 60,
                velocity: 100
            }]
        );
    }

    #[test]
    fn running_status_reuses_last_status() {
        let out = parse(&[0xB0, 7, 100, 10, 64]);
        assert_eq!(
            out.as_slice(),
            &[
                MidiMessage::ControlChange {
                    channel: 0,
                    control: 7,
                    value: 100
                },
                MidiMessage::ControlChange {
                    channel: 0,
                    control: 10,
                    value: 64
                },
            ]
        );
    }

    #[test]
    fn realtime_interleaved_inside_message() {
        let out = parse(&[0x90, 60, 0xF8, 100]);
        assert_eq!(
            out.as_slice(),
            &[
                MidiMessage::TimingClock,
                MidiMessage::NoteOn {
                    channel: 0,
                    note: 60,
                    velocity: 100
                },
            ]
        );
    }

    #[test]
    fn bytes_split_across_feeds() {
        let mut reader = MidiReader::new();
        let mut out: Vec<MidiMessage, 4> = Vec::new();
        for chunk in [&[0xC3][..], &[5, 0xD3], &[77]] {
            reader.feed(chunk, |m| out.push(m).unwrap());
        }
        assert_eq!(
            out.as_slice(),
            &[
                MidiMessage::ProgramChange {
                    channel: 3,
                    program: 5
                },
                MidiMessage::ChannelPressure {
                    channel: 3,
                    pressure: 77
                },
            ]
        );
    }

    #[test]
    fn system_common_messages() {
        assert_eq!(parse(&[0xF3, 4]).as_slice(), &[MidiMessage::SongSelect(4)]);
        assert_eq!(
            parse(&[0xF2, 0x00, 0x01]).as_slice(),
            &[MidiMessage::SongPosition(128)]
        );
        assert_eq!(parse(&[0xF6]).as_slice(), &[MidiMessage::TuneRequest]);
    }

    #[test]
    fn sysex_passes_through_verbatim() {
        let bytes = [0xF0, 0x41, 0x10, 0x42, 0x12, 0x40, 0xF7];
        let out = parse(&bytes);
        assert_eq!(out.len(), 1);

        let mut buf = [0u8; MAX_MESSAGE_SIZE];
        let n = out[0].serialize(&mut buf);
        assert_eq!(&buf[..n], &bytes);
    }

    #[test]
    fn undefined_realtime_ignored() {
        assert!(parse(&[0xF9, 0xFD]).is_empty());
    }
}
