//! Menu navigation state machine.
//!
//! Levels form a path that depends on the committed [`Action`]:
//!
//! ```text
//! ProgramChange:  Device -> Action -> Bank -> Item -> Show
//! ShowMidi:       Device -> Action ---------------> Show
//! ```
//!
//! OK descends along the path, CANCEL climbs back, LEFT/RIGHT move the
//! selection index inside the active level. Indices are 0-based with an
//! exclusive upper bound (`index < index_max`).

use super::input_logic::{select_next, select_prev};
use super::refresh::RepaintRequest;
use super::ButtonEvent;
use crate::config::ITEMS_PER_BANK;
use crate::midi::MidiMessage;
use crate::registry::Registry;

/// Menu depth, ordered from top to bottom.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum NavigationLevel {
    Device,
    Action,
    Bank,
    Item,
    Show,
}

impl NavigationLevel {
    pub const TOP: Self = NavigationLevel::Device;
    pub const BOTTOM: Self = NavigationLevel::Show;
}

/// What to do with the selected device.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Action {
    /// Pick bank and item, then send a program change.
    #[default]
    ProgramChange,
    /// Live view of incoming MIDI on the device channel.
    ShowMidi,
}

impl Action {
    pub const ALL: [Action; 2] = [Action::ProgramChange, Action::ShowMidi];

    pub fn from_index(index: usize) -> Self {
        Self::ALL.get(index).copied().unwrap_or_default()
    }

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn label(self) -> &'static str {
        match self {
            Action::ProgramChange => "Program Change",
            Action::ShowMidi => "Show MIDI",
        }
    }

    /// Level below `level` on this action's path.
    pub fn next_level(self, level: NavigationLevel) -> Option<NavigationLevel> {
        use NavigationLevel as L;
        match (self, level) {
            (_, L::Device) => Some(L::Action),
            (Action::ProgramChange, L::Action) => Some(L::Bank),
            (Action::ProgramChange, L::Bank) => Some(L::Item),
            (Action::ProgramChange, L::Item) => Some(L::Show),
            (Action::ShowMidi, L::Action) => Some(L::Show),
            (Action::ShowMidi, L::Bank | L::Item) => Some(L::Show),
            (_, L::Show) => None,
        }
    }

    /// Level above `level` on this action's path.
    pub fn prev_level(self, level: NavigationLevel) -> Option<NavigationLevel> {
        use NavigationLevel as L;
        match (self, level) {
            (_, L::Device) => None,
            (_, L::Action) => Some(L::Device),
            (_, L::Bank) => Some(L::Action),
            (_, L::Item) => Some(L::Bank),
            (Action::ProgramChange, L::Show) => Some(L::Item),
            (Action::ShowMidi, L::Show) => Some(L::Action),
        }
    }
}

/// Position inside the menu.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MenuCursor {
    pub level: NavigationLevel,
    pub index: usize,
    pub index_max: usize,
}

/// Side effect the owner of the menu must carry out.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Effect {
    /// Status text goes back to the empty sentinel.
    ResetStatus,
    /// Transmit on the MIDI output.
    Send(MidiMessage),
}

/// Result of applying one button edge.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Transition {
    pub repaint: RepaintRequest,
    pub effect: Option<Effect>,
}

impl Transition {
    pub const NONE: Self = Self {
        repaint: RepaintRequest::None,
        effect: None,
    };

    const fn full(effect: Option<Effect>) -> Self {
        Self {
            repaint: RepaintRequest::Full,
            effect,
        }
    }
}

/// Cursor plus the selections committed on the way down.
#[derive(Clone, Debug)]
pub struct Menu {
    cursor: MenuCursor,
    device: usize,
    action: Action,
    item: usize,
}

impl Menu {
    pub fn new(registry: &Registry) -> Self {
        let mut menu = Self {
            cursor: MenuCursor {
                level: NavigationLevel::TOP,
                index: 0,
                index_max: 0,
            },
            device: 0,
            action: Action::default(),
            item: 0,
        };
        menu.refresh_bounds(registry);
        menu
    }

    pub fn cursor(&self) -> MenuCursor {
        self.cursor
    }

    pub fn level(&self) -> NavigationLevel {
        self.cursor.level
    }

    /// Committed action.
    pub fn action(&self) -> Action {
        self.action
    }

    /// Committed item.
    pub fn item(&self) -> usize {
        self.item
    }

    /// Device the menu targets. On the Device level this follows the cursor.
    pub fn active_device(&self) -> usize {
        if self.cursor.level == NavigationLevel::Device {
            self.cursor.index
        } else {
            self.device
        }
    }

    /// Zero-based MIDI channel of the active device.
    pub fn selected_channel(&self, registry: &Registry) -> u8 {
        registry
            .get(self.active_device())
            .map_or(0, |d| d.channel_index())
    }

    /// The status row is only on screen in the Show MIDI view.
    pub fn status_visible(&self) -> bool {
        self.cursor.level == NavigationLevel::Show && self.action == Action::ShowMidi
    }

    fn bound(&self, level: NavigationLevel, registry: &Registry) -> usize {
        match level {
            NavigationLevel::Device => registry.len(),
            NavigationLevel::Action => Action::ALL.len(),
            NavigationLevel::Bank => registry.bank_count(self.device),
            NavigationLevel::Item => ITEMS_PER_BANK,
            NavigationLevel::Show => 1,
        }
    }

    /// Recompute `index_max` for the active level.
    ///
    /// An index that no longer fits is clamped to 0 and forces a full repaint.
    pub fn refresh_bounds(&mut self, registry: &Registry) -> RepaintRequest {
        self.cursor.index_max = self.bound(self.cursor.level, registry);
        if self.cursor.index >= self.cursor.index_max {
            self.cursor.index = 0;
            RepaintRequest::Full
        } else {
            RepaintRequest::None
        }
    }

    fn enter(&mut self, level: NavigationLevel, index: usize, registry: &Registry) {
        self.cursor.level = level;
        self.cursor.index = index;
        self.refresh_bounds(registry);
    }

    /// Apply one button edge.
    pub fn apply(&mut self, event: ButtonEvent, registry: &mut Registry) -> Transition {
        match event {
            ButtonEvent::Cancel => self.cancel(registry),
            ButtonEvent::Left => self.step(select_prev(self.cursor.index)),
            ButtonEvent::Right => self.step(select_next(self.cursor.index, self.cursor.index_max)),
            ButtonEvent::Ok => self.confirm(registry),
        }
    }

    fn step(&mut self, index: usize) -> Transition {
        if index == self.cursor.index {
            return Transition::NONE;
        }
        self.cursor.index = index;
        Transition::full(None)
    }

    fn cancel(&mut self, registry: &Registry) -> Transition {
        let level = self.cursor.level;
        let Some(prev) = self.action.prev_level(level) else {
            // Already at the top: back to the first device.
            self.cursor.index = 0;
            return Transition::full(None);
        };

        let index = self.remembered_index(prev, registry);
        self.enter(prev, index, registry);

        let effect = (level == NavigationLevel::Show).then_some(Effect::ResetStatus);
        Transition::full(effect)
    }

    fn confirm(&mut self, registry: &mut Registry) -> Transition {
        let index = self.cursor.index;
        match self.cursor.level {
            NavigationLevel::Device => self.device = index,
            NavigationLevel::Action => self.action = Action::from_index(index),
            NavigationLevel::Bank => {
                registry.select_bank(self.device, index);
            }
            NavigationLevel::Item => self.item = index,
            NavigationLevel::Show => return self.send_selection(registry),
        }

        let Some(next) = self.action.next_level(self.cursor.level) else {
            return Transition::NONE;
        };

        let seed = match next {
            NavigationLevel::Action | NavigationLevel::Bank => {
                self.remembered_index(next, registry)
            }
            _ => 0,
        };
        self.enter(next, seed, registry);

        let effect = (next == NavigationLevel::Show).then_some(Effect::ResetStatus);
        Transition::full(effect)
    }

    /// Selection last committed on `level`.
    fn remembered_index(&self, level: NavigationLevel, registry: &Registry) -> usize {
        match level {
            NavigationLevel::Device => self.device,
            NavigationLevel::Action => self.action.index(),
            NavigationLevel::Bank => registry.selected_bank(self.device),
            NavigationLevel::Item => self.item,
            NavigationLevel::Show => 0,
        }
    }

    /// OK on the Show level of the Program Change path.
    fn send_selection(&self, registry: &Registry) -> Transition {
        if self.action != Action::ProgramChange {
            return Transition::NONE;
        }
        let Some(device) = registry.get(self.device) else {
            return Transition::NONE;
        };

        let program = (device.selected_bank() * ITEMS_PER_BANK + self.item).min(127) as u8;
        Transition {
            repaint: RepaintRequest::None,
            effect: Some(Effect::Send(MidiMessage::ProgramChange {
                channel: device.channel_index(),
                program,
            })),
        }
    }
}
