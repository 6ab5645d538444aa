//! MIDI DIN over UARTE.
//!
//! Two tasks own the two halves of the UART. The RX task parses the byte
//! stream with `midly` and queues the messages on [`MIDI_IN`]; the TX task
//! encodes whatever the main loop queued on [`MIDI_OUT`]. The loop itself
//! only touches the channels, never the peripheral.

use crate::config::{MIDI_IN_QUEUE, MIDI_OUT_QUEUE};
use crate::midi::message::MAX_MESSAGE_SIZE;
use crate::midi::stream::MidiReader;
use crate::midi::{MidiIn, MidiMessage, MidiOut};
use defmt::{info, warn};
use embassy_nrf::peripherals;
use embassy_nrf::uarte::{UarteRx, UarteTx};
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::{Channel, Receiver, Sender};

/// Parsed inbound messages, RX task -> main loop.
pub static MIDI_IN: Channel<CriticalSectionRawMutex, MidiMessage, MIDI_IN_QUEUE> = Channel::new();

/// Outbound messages, main loop -> TX task.
pub static MIDI_OUT: Channel<CriticalSectionRawMutex, MidiMessage, MIDI_OUT_QUEUE> = Channel::new();

/// Read bytes forever, feeding complete messages into `tx`.
///
/// A full queue drops the message: the loop is behind and blocking here
/// would only overrun the UART instead.
pub async fn rx_task(
    mut rx: UarteRx<'static, peripherals::UARTE0>,
    tx: Sender<'static, CriticalSectionRawMutex, MidiMessage, MIDI_IN_QUEUE>,
) -> ! {
    info!("MIDI RX task started");

    let mut reader = MidiReader::new();
    let mut byte = [0u8; 1];

    loop {
        if rx.read(&mut byte).await.is_err() {
            warn!("MIDI UART read failed");
            continue;
        }
        reader.feed(&byte, |msg| {
            if tx.try_send(msg).is_err() {
                warn!("MIDI in queue full, dropped {}", msg);
            }
        });
    }
}

/// Serialise queued messages onto the wire.
pub async fn tx_task(
    mut tx: UarteTx<'static, peripherals::UARTE0>,
    rx: Receiver<'static, CriticalSectionRawMutex, MidiMessage, MIDI_OUT_QUEUE>,
) -> ! {
    info!("MIDI TX task started");

    let mut buf = [0u8; MAX_MESSAGE_SIZE];

    loop {
        let msg = rx.receive().await;
        let n = msg.serialize(&mut buf);
        if n == 0 {
            continue;
        }
        if tx.write(&buf[..n]).await.is_err() {
            warn!("MIDI UART write failed");
        }
    }
}

/// [`MidiIn`] over the inbound channel.
pub struct ChannelMidiIn {
    rx: Receiver<'static, CriticalSectionRawMutex, MidiMessage, MIDI_IN_QUEUE>,
}

impl ChannelMidiIn {
    pub fn new(rx: Receiver<'static, CriticalSectionRawMutex, MidiMessage, MIDI_IN_QUEUE>) -> Self {
        Self { rx }
    }
}

impl MidiIn for ChannelMidiIn {
    fn receive(&mut self) -> Option<MidiMessage> {
        self.rx.try_receive().ok()
    }
}

/// [`MidiOut`] over the outbound channel. Never waits.
pub struct ChannelMidiOut {
    tx: Sender<'static, CriticalSectionRawMutex, MidiMessage, MIDI_OUT_QUEUE>,
    dropped: u32,
}

impl ChannelMidiOut {
    pub fn new(tx: Sender<'static, CriticalSectionRawMutex, MidiMessage, MIDI_OUT_QUEUE>) -> Self {
        Self { tx, dropped: 0 }
    }
}

impl MidiOut for ChannelMidiOut {
    fn send(&mut self, msg: MidiMessage) {
        if self.tx.try_send(msg).is_err() {
            self.dropped = self.dropped.wrapping_add(1);
            warn!("MIDI out queue full, dropped {} ({} total)", msg, self.dropped);
        }
    }
}
