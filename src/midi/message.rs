//! MIDI 1.0 messages as a tagged variant.
//!
//! Parsing and encoding of wire bytes is done by `midly`; this type is the
//! owned, `Copy` form the queues, the decoder and the menu pass around.
//! Channels are 0-based. System messages carry no channel.

use midly::live::{LiveEvent, MtcQuarterFrameMessage, SystemCommon, SystemRealtime};
use midly::io::Cursor;
use midly::num::{u14, u4, u7};
use midly::PitchBend;

/// Longest SysEx payload (without the `0xF0`/`0xF7` framing) kept for pass-through.
pub const MAX_SYSEX_LEN: usize = 32;

/// Longest encoded message: a full SysEx payload plus its framing.
pub const MAX_MESSAGE_SIZE: usize = MAX_SYSEX_LEN + 2;

/// Quarter-frame piece types in wire order.
const MTC_PIECES: [MtcQuarterFrameMessage; 8] = [
    MtcQuarterFrameMessage::FramesLow,
    MtcQuarterFrameMessage::FramesHigh,
    MtcQuarterFrameMessage::SecondsLow,
    MtcQuarterFrameMessage::SecondsHigh,
    MtcQuarterFrameMessage::MinutesLow,
    MtcQuarterFrameMessage::MinutesHigh,
    MtcQuarterFrameMessage::HoursLow,
    MtcQuarterFrameMessage::HoursHigh,
];

/// Payload of a System Exclusive message, kept verbatim for pass-through.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SysEx {
    data: [u8; MAX_SYSEX_LEN],
    len: u8,
}

impl SysEx {
    /// `None` when `data` does not fit.
    pub fn new(data: &[u8]) -> Option<Self> {
        if data.len() > MAX_SYSEX_LEN {
            return None;
        }
        let mut sysex = Self::default();
        sysex.data[..data.len()].copy_from_slice(data);
        sysex.len = data.len() as u8;
        Some(sysex)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data[..self.len as usize]
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MidiMessage {
    NoteOff { channel: u8, note: u8, velocity: u8 },
    NoteOn { channel: u8, note: u8, velocity: u8 },
    PolyPressure { channel: u8, note: u8, pressure: u8 },
    ControlChange { channel: u8, control: u8, value: u8 },
    ProgramChange { channel: u8, program: u8 },
    ChannelPressure { channel: u8, pressure: u8 },
    PitchBend { channel: u8, value: u16 },
    SystemExclusive(SysEx),
    QuarterFrame(u8),
    SongPosition(u16),
    SongSelect(u8),
    TuneRequest,
    TimingClock,
    Start,
    Continue,
    Stop,
    ActiveSensing,
    Reset,
}

impl MidiMessage {
    /// Channel of a channel voice message, `None` for system messages.
    pub fn channel(&self) -> Option<u8> {
        match *self {
            MidiMessage::NoteOff { channel, .. }
            | MidiMessage::NoteOn { channel, .. }
            | MidiMessage::PolyPressure { channel, .. }
            | MidiMessage::ControlChange { channel, .. }
            | MidiMessage::ProgramChange { channel, .. }
            | MidiMessage::ChannelPressure { channel, .. }
            | MidiMessage::PitchBend { channel, .. } => Some(channel),
            _ => None,
        }
    }

    pub fn is_timing_clock(&self) -> bool {
        matches!(self, MidiMessage::TimingClock)
    }

    /// Convert a parsed live event. Undefined system messages and SysEx
    /// payloads longer than [`MAX_SYSEX_LEN`] yield `None`.
    pub fn from_live(event: &LiveEvent<'_>) -> Option<Self> {
        use midly::MidiMessage as M;

        let msg = match *event {
            LiveEvent::Midi { channel, message } => {
                let channel = channel.as_int();
                match message {
                    M::NoteOff { key, vel } => MidiMessage::NoteOff {
                        channel,
                        note: key.as_int(),
                        velocity: vel.as_int(),
                    },
                    M::NoteOn { key, vel } => MidiMessage::NoteOn {
                        channel,
                        note: key.as_int(),
                        velocity: vel.as_int(),
                    },
                    M::Aftertouch { key, vel } => MidiMessage::PolyPressure {
                        channel,
                        note: key.as_int(),
                        pressure: vel.as_int(),
                    },
                    M::Controller { controller, value } => MidiMessage::ControlChange {
                        channel,
                        control: controller.as_int(),
                        value: value.as_int(),
                    },
                    M::ProgramChange { program } => MidiMessage::ProgramChange {
                        channel,
                        program: program.as_int(),
                    },
                    M::ChannelAftertouch { vel } => MidiMessage::ChannelPressure {
                        channel,
                        pressure: vel.as_int(),
                    },
                    M::PitchBend { bend } => MidiMessage::PitchBend {
                        channel,
                        value: bend.0.as_int(),
                    },
                }
            }
            LiveEvent::Common(common) => match common {
                SystemCommon::SysEx(data) => {
                    MidiMessage::SystemExclusive(SysEx::new(u7::slice_as_int(data))?)
                }
                SystemCommon::MidiTimeCodeQuarterFrame(piece, value) => {
                    MidiMessage::QuarterFrame(((piece as u8) << 4) | value.as_int())
                }
                SystemCommon::SongPosition(position) => MidiMessage::SongPosition(position.as_int()),
                SystemCommon::SongSelect(song) => MidiMessage::SongSelect(song.as_int()),
                SystemCommon::TuneRequest => MidiMessage::TuneRequest,
                SystemCommon::Undefined(..) => return None,
            },
            LiveEvent::Realtime(realtime) => match realtime {
                SystemRealtime::TimingClock => MidiMessage::TimingClock,
                SystemRealtime::Start => MidiMessage::Start,
                SystemRealtime::Continue => MidiMessage::Continue,
                SystemRealtime::Stop => MidiMessage::Stop,
                SystemRealtime::ActiveSensing => MidiMessage::ActiveSensing,
                SystemRealtime::Reset => MidiMessage::Reset,
                SystemRealtime::Undefined(_) => return None,
            },
        };
        Some(msg)
    }

    /// Borrowing live event for encoding.
    pub fn to_live(&self) -> LiveEvent<'_> {
        use midly::MidiMessage as M;

        let voice = |channel: u8, message: M| LiveEvent::Midi {
            channel: u4::new(channel),
            message,
        };

        match *self {
            MidiMessage::NoteOff { channel, note, velocity } => voice(
                channel,
                M::NoteOff {
                    key: u7::new(note),
                    vel: u7::new(velocity),
                },
            ),
            MidiMessage::NoteOn { channel, note, velocity } => voice(
                channel,
                M::NoteOn {
                    key: u7::new(note),
                    vel: u7::new(velocity),
                },
            ),
            MidiMessage::PolyPressure { channel, note, pressure } => voice(
                channel,
                M::Aftertouch {
                    key: u7::new(note),
                    vel: u7::new(pressure),
                },
            ),
            MidiMessage::ControlChange { channel, control, value } => voice(
                channel,
                M::Controller {
                    controller: u7::new(control),
                    value: u7::new(value),
                },
            ),
            MidiMessage::ProgramChange { channel, program } => voice(
                channel,
                M::ProgramChange {
                    program: u7::new(program),
                },
            ),
            MidiMessage::ChannelPressure { channel, pressure } => voice(
                channel,
                M::ChannelAftertouch {
                    vel: u7::new(pressure),
                },
            ),
            MidiMessage::PitchBend { channel, value } => voice(
                channel,
                M::PitchBend {
                    bend: PitchBend(u14::new(value)),
                },
            ),
            MidiMessage::SystemExclusive(ref sysex) => LiveEvent::Common(SystemCommon::SysEx(
                u7::slice_try_from_int(sysex.as_bytes()),
            )),
            MidiMessage::QuarterFrame(byte) => {
                LiveEvent::Common(SystemCommon::MidiTimeCodeQuarterFrame(
                    MTC_PIECES[((byte >> 4) & 0x07) as usize],
                    u4::new(byte),
                ))
            }
            MidiMessage::SongPosition(position) => {
                LiveEvent::Common(SystemCommon::SongPosition(u14::new(position)))
            }
            MidiMessage::SongSelect(song) => LiveEvent::Common(SystemCommon::SongSelect(u7::new(song))),
            MidiMessage::TuneRequest => LiveEvent::Common(SystemCommon::TuneRequest),
            MidiMessage::TimingClock => LiveEvent::Realtime(SystemRealtime::TimingClock),
            MidiMessage::Start => LiveEvent::Realtime(SystemRealtime::Start),
            MidiMessage::Continue => LiveEvent::Realtime(SystemRealtime::Continue),
            MidiMessage::Stop => LiveEvent::Realtime(SystemRealtime::Stop),
            MidiMessage::ActiveSensing => LiveEvent::Realtime(SystemRealtime::ActiveSensing),
            MidiMessage::Reset => LiveEvent::Realtime(SystemRealtime::Reset),
        }
    }

    /// Serialise into a byte slice for UART transmission.
    /// Returns the number of bytes written, or 0 if `buf` is too small.
    pub fn serialize(&self, buf: &mut [u8]) -> usize {
        let mut cursor = Cursor::new(buf);
        match self.to_live().write(&mut cursor) {
            Ok(()) => cursor.cursor(),
            Err(_) => 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encode(msg: MidiMessage) -> heapless::Vec<u8, MAX_MESSAGE_SIZE> {
        let mut buf = [0u8; MAX_MESSAGE_SIZE];
        let n = msg.serialize(&mut buf);
        heapless::Vec::from_slice(&buf[..n]).unwrap()
    }

    #[test]
    fn note_on_serializes_with_channel_nibble() {
        let msg = MidiMessage::NoteOn {
            channel: 9,
            note: 44,
            velocity: 120,
        };
        assert_eq!(encode(msg).as_slice(), &[0x99, 44, 120]);
    }

    #[test]
    fn program_change_is_two_bytes() {
        let msg = MidiMessage::ProgramChange {
            channel: 2,
            program: 10,
        };
        assert_eq!(encode(msg).as_slice(), &[0xC2, 10]);
    }

    #[test]
    fn pitch_bend_splits_fourteen_bits() {
        let msg = MidiMessage::PitchBend {
            channel: 0,
            value: 0x2000,
        };
        assert_eq!(encode(msg).as_slice(), &[0xE0, 0x00, 0x40]);
    }

    #[test]
    fn realtime_is_single_byte() {
        assert_eq!(encode(MidiMessage::TimingClock).as_slice(), &[0xF8]);
        assert_eq!(encode(MidiMessage::Reset).as_slice(), &[0xFF]);
    }

    #[test]
    fn sysex_is_framed() {
        let sysex = SysEx::new(&[0x41, 0x10, 0x42]).unwrap();
        assert_eq!(
            encode(MidiMessage::SystemExclusive(sysex)).as_slice(),
            &[0xF0, 0x41, 0x10, 0x42, 0xF7]
        );
    }

    #[test]
    fn sysex_payload_is_bounded() {
        assert!(SysEx::new(&[0; MAX_SYSEX_LEN]).is_some());
        assert!(SysEx::new(&[0; MAX_SYSEX_LEN + 1]).is_none());
    }

    #[test]
    fn serialize_buffer_too_small() {
        let msg = MidiMessage::ControlChange {
            channel: 0,
            control: 7,
            value: 100,
        };
        let mut buf = [0u8; 2];
        assert_eq!(msg.serialize(&mut buf), 0);
    }

    #[test]
    fn live_event_conversion_keeps_fields() {
        let msgs = [
            MidiMessage::ControlChange {
                channel: 15,
                control: 74,
                value: 3,
            },
            MidiMessage::ChannelPressure {
                channel: 3,
                pressure: 77,
            },
            MidiMessage::SongPosition(0x1234),
            MidiMessage::QuarterFrame(0x35),
            MidiMessage::ActiveSensing,
        ];
        for msg in msgs {
            assert_eq!(MidiMessage::from_live(&msg.to_live()), Some(msg));
        }
    }

    #[test]
    fn channel_only_for_voice_messages() {
        assert_eq!(
            MidiMessage::ChannelPressure {
                channel: 3,
                pressure: 1
            }
            .channel(),
            Some(3)
        );
        assert_eq!(MidiMessage::Start.channel(), None);
        assert_eq!(MidiMessage::SongSelect(1).channel(), None);
    }
}
