//! User interface subsystem - OLED display + physical buttons.
//!
//! The main loop feeds button edges into the [`menu::Menu`] state machine,
//! derives a [`view::DisplayState`] from it, and lets the refresh policy
//! decide how much of the SSD1306 has to be repainted.
//!
//! ## Components
//!
//! - **Display**: SSD1306 128×32 OLED via I²C
//! - **Buttons**: 4 tactile switches with debouncing (CANCEL, LEFT, RIGHT, OK)

pub mod input_logic;
pub mod menu;
pub mod refresh;
pub mod view;

#[cfg(feature = "embedded")]
pub mod buttons;
#[cfg(feature = "embedded")]
pub mod display;

pub use input_logic::ButtonEdges;

/// Physical button events (after debouncing).
///
/// Declared in priority order: when several edges land in the same tick,
/// the earlier variant wins.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ButtonEvent {
    /// Go up one menu level.
    Cancel,
    /// Previous entry.
    Left,
    /// Next entry.
    Right,
    /// Confirm and descend.
    Ok,
}

/// Source of debounced button edges, polled once per tick.
pub trait InputSource {
    /// Edges that fell since the previous poll.
    fn poll(&mut self) -> ButtonEdges;
}
