//! Unified error type for midiroute.
//!
//! We avoid `alloc` - all error variants carry only fixed-size data.
//! Implements `defmt::Format` for efficient on-target logging.

/// Top-level error type used across the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    // Configuration
    /// The compile-time device table is inconsistent.
    Config(ConfigError),

    // UI / Display
    /// I²C transaction to the display failed.
    Display,
}

/// Ways the device table can be inconsistent. All are fatal at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// No devices configured.
    Empty,
    /// More devices than the registry can hold.
    TooManyDevices { count: usize },
    /// MIDI channel outside 1..=16.
    InvalidChannel { device: usize, channel: u8 },
    /// A device exposes zero banks.
    NoBanks { device: usize },
    /// The power-up bank is not below the bank count.
    BankOutOfRange { device: usize, bank: u8 },
}

// Convenience conversions

impl From<ConfigError> for Error {
    fn from(e: ConfigError) -> Self {
        Error::Config(e)
    }
}
