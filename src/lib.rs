//! midiroute - MIDI routing appliance.
//!
//! A four-button menu picks a target device, then either sends a program
//! change to it or shows the MIDI traffic on its channel. Everything the
//! device receives is forwarded to the MIDI output unchanged.
//!
//! The menu, decode and refresh logic is hardware independent and tested
//! on the host with `cargo test`. The firmware binary (`src/main.rs`,
//! `embedded` feature) wires it to the nRF52840 peripherals.

#![cfg_attr(not(test), no_std)]

pub mod config;
pub mod error;
pub mod midi;
pub mod registry;
pub mod session;
pub mod ticks;
pub mod ui;

pub use error::{ConfigError, Error};
pub use registry::Registry;
pub use session::{Session, TickReport};
