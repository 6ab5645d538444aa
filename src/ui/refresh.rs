//! Display refresh policy.
//!
//! The menu and the status decoder only *request* repaints. A
//! [`RepaintPlan`] turns the strongest request of the tick into the
//! minimal sequence of renderer calls: clear one rectangle, draw a few
//! rows, flush once.

use heapless::Vec;

use super::menu::{Action, NavigationLevel};
use super::view::{DisplayState, Line};
use crate::config::{CHAR_HEIGHT, DISPLAY_WIDTH, MENU_ROWS, STATUS_ROW};

/// How much of the screen has to be redrawn. Ordered by strength.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RepaintRequest {
    #[default]
    None,
    /// Only the status row changed.
    StatusRow,
    /// Whole menu region.
    Full,
}

impl RepaintRequest {
    /// Combine two requests; the stronger one wins.
    pub fn merge(self, other: Self) -> Self {
        self.max(other)
    }
}

/// Pixel rectangle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl Rect {
    /// Full-width band covering `count` text rows starting at `first`.
    pub const fn rows(first: u8, count: u8) -> Self {
        Self {
            x: 0,
            y: first as i32 * CHAR_HEIGHT as i32,
            width: DISPLAY_WIDTH,
            height: count as u32 * CHAR_HEIGHT,
        }
    }
}

/// Drawing primitives the refresh policy needs from a display.
pub trait Renderer {
    /// Fill `rect` with the background colour.
    fn clear(&mut self, rect: Rect);
    /// Draw `text` with its top-left corner at (`x`, `y`). `size` 2 doubles the glyphs.
    fn draw_text(&mut self, text: &str, x: i32, y: i32, size: u8);
    /// Push the frame buffer to the panel.
    fn flush(&mut self);
}

/// One text row to draw.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DrawRow {
    pub text: Line,
    pub row: u8,
    pub size: u8,
}

/// Renderer calls for one tick.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RepaintPlan {
    pub clear: Option<Rect>,
    pub rows: Vec<DrawRow, { MENU_ROWS as usize }>,
}

impl RepaintPlan {
    pub fn for_request(
        request: RepaintRequest,
        state: &DisplayState,
        level: NavigationLevel,
        action: Action,
    ) -> Self {
        let mut plan = Self::default();
        match request {
            RepaintRequest::None => {}
            RepaintRequest::StatusRow => {
                plan.clear = Some(Rect::rows(STATUS_ROW, 1));
                plan.push(&state.status_line, STATUS_ROW, 1);
            }
            RepaintRequest::Full => {
                plan.clear = Some(Rect::rows(0, MENU_ROWS));
                plan.push(&state.dev_line, 0, 1);
                if level >= NavigationLevel::Action {
                    plan.push(&state.action_line, 1, 1);
                }
                if level == NavigationLevel::Show {
                    match action {
                        Action::ProgramChange => plan.push(&state.item_line, 2, 2),
                        Action::ShowMidi => plan.push(&state.status_line, STATUS_ROW, 1),
                    }
                } else {
                    if level >= NavigationLevel::Bank {
                        plan.push(&state.bank_line, 2, 1);
                    }
                    if level >= NavigationLevel::Item {
                        plan.push(&state.item_line, 3, 1);
                    }
                }
            }
        }
        plan
    }

    fn push(&mut self, text: &Line, row: u8, size: u8) {
        // At most MENU_ROWS rows are ever pushed.
        let _ = self.rows.push(DrawRow {
            text: text.clone(),
            row,
            size,
        });
    }

    pub fn is_empty(&self) -> bool {
        self.clear.is_none() && self.rows.is_empty()
    }

    /// Issue the plan. An empty plan touches nothing, not even `flush`.
    pub fn execute(&self, renderer: &mut impl Renderer) {
        if self.is_empty() {
            return;
        }
        if let Some(rect) = self.clear {
            renderer.clear(rect);
        }
        for row in &self.rows {
            if !row.text.is_empty() {
                renderer.draw_text(&row.text, 0, row.row as i32 * CHAR_HEIGHT as i32, row.size);
            }
        }
        renderer.flush();
    }
}
