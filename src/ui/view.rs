//! Screen text derived from the menu, the registry and the MIDI status.
//!
//! Nothing here is stored between ticks: [`DisplayState::derive`] is
//! recomputed whenever the refresh policy needs text to paint.

use core::fmt::{self, Write};

use heapless::String;

use super::menu::{Action, Menu, NavigationLevel};
use crate::config::CHARS_PER_LINE;
use crate::midi::decoder::MidiStatus;
use crate::registry::Registry;

/// One display row of text.
pub type Line = String<CHARS_PER_LINE>;

/// `fmt::Write` adapter that drops whatever does not fit.
struct Truncate<'a>(&'a mut Line);

impl Write for Truncate<'_> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        for c in s.chars() {
            if self.0.push(c).is_err() {
                break;
            }
        }
        Ok(())
    }
}

/// Format into a [`Line`], truncating at the display width.
pub fn format_line(args: fmt::Arguments<'_>) -> Line {
    let mut line = Line::new();
    // Truncate never reports an error.
    let _ = Truncate(&mut line).write_fmt(args);
    line
}

/// Text of every row, blank where the level is not reached.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DisplayState {
    pub dev_line: Line,
    pub action_line: Line,
    pub bank_line: Line,
    pub item_line: Line,
    pub status_line: Line,
}

impl DisplayState {
    pub fn derive(menu: &Menu, registry: &Registry, status: &MidiStatus) -> Self {
        let cursor = menu.cursor();
        let level = cursor.level;
        // Value shown on `row`: the cursor while editing it, else the committed one.
        let pick = |row: NavigationLevel, committed: usize| {
            if level == row {
                cursor.index
            } else {
                committed
            }
        };

        let mut state = Self::default();

        let device = menu.active_device();
        if let Some(entry) = registry.get(device) {
            state.dev_line = format_line(format_args!(
                "T{} Ch {:>2}: {}",
                device, entry.midi_channel, entry.name
            ));
        }

        if level >= NavigationLevel::Action {
            let action = Action::from_index(pick(NavigationLevel::Action, menu.action().index()));
            state.action_line = format_line(format_args!("{}", action.label()));
        }

        let program_path = menu.action() == Action::ProgramChange;
        if level >= NavigationLevel::Bank && program_path {
            let bank = pick(NavigationLevel::Bank, registry.selected_bank(device));
            state.bank_line = format_line(format_args!("Bank {}", bank));
        }
        if level >= NavigationLevel::Item && program_path {
            let item = pick(NavigationLevel::Item, menu.item());
            state.item_line = format_line(format_args!("ITEM {}", item));
        }

        if menu.status_visible() {
            state.status_line = status.status_line();
        }

        state
    }
}
