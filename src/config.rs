//! Application-wide constants and compile-time configuration.
//!
//! All hardware pin assignments, timing parameters, display geometry and
//! the routable device table live here so they can be tuned in one place.

// MIDI

/// MIDI DIN baud rate.
pub const MIDI_BAUDRATE: u32 = 31_250;

/// Capacity of the inbound MIDI queue between the UART RX task and the loop.
pub const MIDI_IN_QUEUE: usize = 32;

/// Capacity of the outbound MIDI queue feeding the UART TX task.
pub const MIDI_OUT_QUEUE: usize = 32;

/// Upper bound on messages drained in a single loop iteration.
pub const MAX_DRAIN_PER_TICK: usize = MIDI_IN_QUEUE;

/// Length of the ignored-message reporting window (ms).
pub const DROP_REPORT_WINDOW_MS: u32 = 1000;

// Menu

/// Number of selectable items inside one bank.
pub const ITEMS_PER_BANK: usize = 3;

/// Maximum number of devices the registry can hold.
pub const MAX_DEVICES: usize = 8;

// Display (SSD1306 128×32, 5×8 font with 1 px spacing)

pub const DISPLAY_WIDTH: u32 = 128;
pub const DISPLAY_HEIGHT: u32 = 32;

/// Character cell width in pixels.
pub const CHAR_WIDTH: u32 = 5 + 1;

/// Character cell height in pixels (one text row).
pub const CHAR_HEIGHT: u32 = 8;

/// Characters that fit on one row (21).
pub const CHARS_PER_LINE: usize = (DISPLAY_WIDTH / CHAR_WIDTH) as usize;

/// Text rows in the menu region.
pub const MENU_ROWS: u8 = 4;

/// Row used for the decoded MIDI status line.
pub const STATUS_ROW: u8 = 3;

// GPIO pin assignments (nRF52840-DK defaults)
//
// These are logical names; actual `embassy_nrf::peripherals::*` types are
// selected in `main.rs`.  Adjust for your custom PCB.
//
//   Button CANCEL  → P0.11
//   Button LEFT    → P0.12
//   Button RIGHT   → P0.24
//   Button OK      → P0.25
//   I²C SDA        → P0.26
//   I²C SCL        → P0.27
//   MIDI RX        → P0.08
//   MIDI TX        → P0.06

/// Button debounce time (ms).
pub const BUTTON_DEBOUNCE_MS: u64 = 20;

/// Main loop period (ms).
pub const TICK_MS: u64 = 1;

// Routable devices

/// One row of the compile-time device table.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DeviceConfig {
    /// Name shown on the device row.
    pub name: &'static str,
    /// MIDI channel in musician numbering (1..=16).
    pub midi_channel: u8,
    /// Number of banks the device exposes.
    pub max_bank: u8,
    /// Bank selected at power-up.
    pub selected_bank: u8,
}

impl DeviceConfig {
    pub const fn new(name: &'static str, midi_channel: u8, max_bank: u8, selected_bank: u8) -> Self {
        Self {
            name,
            midi_channel,
            max_bank,
            selected_bank,
        }
    }
}

/// Reference device table.
pub const DEVICES: [DeviceConfig; 4] = [
    DeviceConfig::new("Roland TD-3", 10, 1, 0),
    DeviceConfig::new("Volca Keys", 1, 1, 0),
    DeviceConfig::new("Microfreak", 3, 7, 3),
    DeviceConfig::new("Cobalt 8M", 4, 2, 1),
];
