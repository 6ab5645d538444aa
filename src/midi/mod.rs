//! MIDI subsystem - wire codec, pass-through and status decoding.
//!
//! ## Components
//!
//! - **message**: tagged [`MidiMessage`] variant and its wire encoding
//! - **stream**: `midly` live-stream reader used by the UART RX task
//! - **names**: note names and controller descriptions
//! - **decoder**: per-tick drain/forward/decode and drop accounting
//! - **uart**: UARTE tasks and channel-backed transports (embedded only)

pub mod decoder;
pub mod message;
pub mod names;
pub mod stream;

#[cfg(feature = "embedded")]
pub mod uart;

pub use message::MidiMessage;

/// Inbound transport.
pub trait MidiIn {
    /// Next buffered message, or `None` right away when nothing is pending.
    fn receive(&mut self) -> Option<MidiMessage>;
}

/// Outbound transport. Fire-and-forget; the channel travels in the message.
pub trait MidiOut {
    fn send(&mut self, msg: MidiMessage);
}
