use super::ButtonEvent;

/// Falling edges collected for one tick.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ButtonEdges {
    pub cancel: bool,
    pub left: bool,
    pub right: bool,
    pub ok: bool,
}

impl ButtonEdges {
    pub const NONE: Self = Self {
        cancel: false,
        left: false,
        right: false,
        ok: false,
    };

    pub fn set(&mut self, event: ButtonEvent) {
        match event {
            ButtonEvent::Cancel => self.cancel = true,
            ButtonEvent::Left => self.left = true,
            ButtonEvent::Right => self.right = true,
            ButtonEvent::Ok => self.ok = true,
        }
    }

    /// The one edge acted on this tick: CANCEL, then LEFT, then RIGHT, then OK.
    pub fn resolve(self) -> Option<ButtonEvent> {
        if self.cancel {
            Some(ButtonEvent::Cancel)
        } else if self.left {
            Some(ButtonEvent::Left)
        } else if self.right {
            Some(ButtonEvent::Right)
        } else if self.ok {
            Some(ButtonEvent::Ok)
        } else {
            None
        }
    }
}

impl From<ButtonEvent> for ButtonEdges {
    fn from(event: ButtonEvent) -> Self {
        let mut edges = Self::NONE;
        edges.set(event);
        edges
    }
}

/// Move selection cursor one entry back.
pub fn select_prev(selected: usize) -> usize {
    selected.saturating_sub(1)
}

/// Move selection cursor one entry forward if another entry exists.
pub fn select_next(selected: usize, item_count: usize) -> usize {
    if selected + 1 < item_count {
        selected + 1
    } else {
        selected
    }
}
