//! The main-loop state.
//!
//! One [`Session`] owns the registry, the menu, the decoded MIDI status
//! and the bookkeeping of what is currently painted. The firmware calls
//! [`Session::tick`] once per `TICK_MS`; the host tests drive it with fake
//! collaborators.
//!
//! One tick, in order:
//!
//! 1. recompute the bounds of the active level
//! 2. poll the button edges
//! 3. apply at most one transition and carry out its effect
//! 4. work out the repaint request
//! 5. update the display
//! 6. unless the whole menu was repainted, drain and forward inbound MIDI
//!    and decode the candidate into the status line
//!
//! Status text decoded in step 6 reaches the panel in step 5 of the next tick.

use crate::config::MAX_DRAIN_PER_TICK;
use crate::midi::decoder::{self, DrainReport, DropCounter, MidiStatus};
use crate::midi::names::{NameLookup, StandardNames};
use crate::midi::{MidiIn, MidiOut};
use crate::registry::Registry;
use crate::ticks::Clock;
use crate::ui::menu::{Effect, Menu};
use crate::ui::refresh::{RepaintPlan, RepaintRequest, Renderer};
use crate::ui::view::{DisplayState, Line};
use crate::ui::{ButtonEvent, InputSource};

/// What happened during one tick.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TickReport {
    /// Button edge acted on.
    pub event: Option<ButtonEvent>,
    /// Repaint performed.
    pub repaint: RepaintRequest,
    /// `None` when the drain was skipped.
    pub drain: Option<DrainReport>,
    /// Ignored-message count of a window that closed this tick.
    pub dropped: Option<u32>,
}

pub struct Session<N: NameLookup = StandardNames> {
    registry: Registry,
    menu: Menu,
    status: MidiStatus,
    names: N,
    /// Status text currently on the panel (empty when the row shows something else).
    painted_status: Line,
    drops: DropCounter,
    pending: RepaintRequest,
}

impl Session<StandardNames> {
    pub fn new(registry: Registry, clock: &impl Clock) -> Self {
        Self::with_names(registry, StandardNames, clock)
    }
}

impl<N: NameLookup> Session<N> {
    pub fn with_names(registry: Registry, names: N, clock: &impl Clock) -> Self {
        let menu = Menu::new(&registry);
        Self {
            registry,
            menu,
            status: MidiStatus::new(),
            names,
            painted_status: Line::new(),
            drops: DropCounter::new(clock.now_ms()),
            // Nothing is on the panel yet.
            pending: RepaintRequest::Full,
        }
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn menu(&self) -> &Menu {
        &self.menu
    }

    pub fn status(&self) -> &MidiStatus {
        &self.status
    }

    pub fn display_state(&self) -> DisplayState {
        DisplayState::derive(&self.menu, &self.registry, &self.status)
    }

    /// Run one loop iteration.
    pub fn tick(
        &mut self,
        input: &mut impl InputSource,
        midi_in: &mut impl MidiIn,
        midi_out: &mut impl MidiOut,
        renderer: &mut impl Renderer,
        clock: &impl Clock,
    ) -> TickReport {
        let mut report = TickReport::default();

        let mut request = core::mem::take(&mut self.pending);
        request = request.merge(self.menu.refresh_bounds(&self.registry));

        report.event = input.poll().resolve();
        if let Some(event) = report.event {
            let transition = self.menu.apply(event, &mut self.registry);
            request = request.merge(transition.repaint);

            #[cfg(feature = "defmt")]
            defmt::debug!("{} -> {}", event, self.menu.cursor());

            match transition.effect {
                Some(Effect::ResetStatus) => self.status.reset(),
                Some(Effect::Send(msg)) => {
                    #[cfg(feature = "defmt")]
                    defmt::info!("Sending {}", msg);
                    midi_out.send(msg);
                }
                None => {}
            }
        }

        let state = self.display_state();
        let visible = self.menu.status_visible();
        if visible && state.status_line != self.painted_status {
            request = request.merge(RepaintRequest::StatusRow);
        }

        RepaintPlan::for_request(request, &state, self.menu.level(), self.menu.action())
            .execute(renderer);
        match request {
            RepaintRequest::Full if !visible => self.painted_status.clear(),
            RepaintRequest::Full | RepaintRequest::StatusRow => {
                self.painted_status = state.status_line
            }
            RepaintRequest::None => {}
        }
        report.repaint = request;

        if request != RepaintRequest::Full {
            let drained = decoder::drain(
                midi_in,
                midi_out,
                self.menu.selected_channel(&self.registry),
                MAX_DRAIN_PER_TICK,
            );
            if visible {
                if let Some(candidate) = drained.candidate {
                    self.status.decode(&candidate, drained.missed, &self.names);
                }
            }
            self.drops.record(drained.ignored);
            report.drain = Some(drained);
        }

        report.dropped = self.drops.poll(clock.now_ms());
        if let Some(_count) = report.dropped {
            #[cfg(feature = "defmt")]
            defmt::info!("{} MIDI messages ignored in the last second", _count);
        }

        report
    }
}
