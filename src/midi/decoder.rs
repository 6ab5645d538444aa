//! MIDI pass-through and status decoding.
//!
//! Every tick the loop drains the inbound queue. Each message is
//! forwarded to the output before anything else looks at it, so
//! pass-through latency never depends on decode or display work.
//! Afterwards only the last non-clock message on the selected channel
//! (the *candidate*) is decoded into [`MidiStatus`] for display.

use super::message::MidiMessage;
use super::names::{CcName, NameLookup, NoteName};
use super::{MidiIn, MidiOut};
use crate::config::DROP_REPORT_WINDOW_MS;
use crate::ticks::Ticks;
use crate::ui::view::{format_line, Line};

/// Status-line prefix when the shown value superseded others this tick.
pub const MSG_MISSED: &str = "!";
/// Status-line prefix otherwise.
pub const MSG_NOT_MISSED: &str = " ";

/// Outcome of one drain pass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DrainReport {
    /// Messages forwarded to the output (all of them).
    pub forwarded: usize,
    /// Non-clock messages that were not the candidate.
    pub ignored: u32,
    /// Last non-clock message on the selected channel.
    pub candidate: Option<MidiMessage>,
    /// More than one candidate-eligible message arrived.
    pub missed: bool,
}

/// Drain up to `limit` buffered messages, forwarding each one verbatim.
///
/// Never waits: an empty input ends the pass immediately.
pub fn drain(
    input: &mut impl MidiIn,
    output: &mut impl MidiOut,
    selected_channel: u8,
    limit: usize,
) -> DrainReport {
    let mut report = DrainReport::default();
    let mut eligible = 0u32;
    let mut non_clock = 0u32;

    while report.forwarded < limit {
        let Some(msg) = input.receive() else {
            break;
        };
        output.send(msg);
        report.forwarded += 1;

        if msg.is_timing_clock() {
            continue;
        }
        non_clock += 1;

        if msg.channel() == Some(selected_channel) {
            eligible += 1;
            report.candidate = Some(msg);
        }
    }

    report.missed = eligible > 1;
    report.ignored = non_clock - u32::from(report.candidate.is_some());
    report
}

/// Which status format is currently shown.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Shown {
    /// Nothing decoded since the Show screen was entered.
    #[default]
    Empty,
    Note,
    NoteReleased,
    Pressure,
    Control,
}

/// Sticky "last value" state behind the status line.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MidiStatus {
    pub last_note: Option<u8>,
    pub last_note_name: NoteName,
    pub last_velocity: u8,
    pub last_pressure: u8,
    pub last_cc: Option<u8>,
    pub last_cc_name: CcName,
    pub last_cc_value: u8,
    pub missed: bool,
    pub shown: Shown,
}

impl MidiStatus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Back to the empty sentinel.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Decode the tick's candidate message.
    ///
    /// Returns `false` for kinds that have no status-line rendering; those
    /// leave the status untouched.
    pub fn decode(&mut self, msg: &MidiMessage, missed: bool, names: &impl NameLookup) -> bool {
        match *msg {
            MidiMessage::NoteOn { note, velocity, .. } => {
                self.remember_note(note, names);
                self.last_velocity = velocity;
                self.shown = Shown::Note;
            }
            MidiMessage::NoteOff { note, .. } => {
                self.remember_note(note, names);
                self.shown = Shown::NoteReleased;
            }
            MidiMessage::ChannelPressure { pressure, .. } => {
                self.last_pressure = pressure;
                self.shown = Shown::Pressure;
            }
            MidiMessage::ControlChange { control, value, .. } => {
                if self.last_cc != Some(control) {
                    self.last_cc = Some(control);
                    self.last_cc_name = names.cc_description(control);
                }
                self.last_cc_value = value;
                self.shown = Shown::Control;
            }
            MidiMessage::PolyPressure { .. }
            | MidiMessage::ProgramChange { .. }
            | MidiMessage::PitchBend { .. }
            | MidiMessage::SystemExclusive(_)
            | MidiMessage::QuarterFrame(_)
            | MidiMessage::SongPosition(_)
            | MidiMessage::SongSelect(_)
            | MidiMessage::TuneRequest
            | MidiMessage::TimingClock
            | MidiMessage::Start
            | MidiMessage::Continue
            | MidiMessage::Stop
            | MidiMessage::ActiveSensing
            | MidiMessage::Reset => {
                #[cfg(feature = "defmt")]
                defmt::debug!("MIDI not displayed: {}", msg);
                return false;
            }
        }
        self.missed = missed;
        true
    }

    fn remember_note(&mut self, note: u8, names: &impl NameLookup) {
        if self.last_note != Some(note) {
            self.last_note = Some(note);
            self.last_note_name = names.note_name(note);
        }
    }

    /// Render the status line. [`Shown::Empty`] renders as `""`.
    pub fn status_line(&self) -> Line {
        let flag = if self.missed { MSG_MISSED } else { MSG_NOT_MISSED };
        let note = self.last_note_name.as_str();
        match self.shown {
            Shown::Empty => Line::new(),
            Shown::Note => format_line(format_args!(
                "{}{:<11} Vel: {:>3}",
                flag, note, self.last_velocity
            )),
            Shown::NoteReleased => {
                format_line(format_args!("{}{:<11} Vel: {:>3}", flag, note, "---"))
            }
            Shown::Pressure => format_line(format_args!(
                "{}{:<4} P: {:>3} Vel: {:>3}",
                flag, note, self.last_pressure, self.last_velocity
            )),
            Shown::Control => format_line(format_args!(
                "{}{:<16}{:>3}",
                flag,
                self.last_cc_name.as_str(),
                self.last_cc_value
            )),
        }
    }
}

/// Rolling one-second window over ignored messages.
#[derive(Clone, Copy, Debug)]
pub struct DropCounter {
    deadline: Ticks,
    ignored: u32,
}

impl DropCounter {
    pub fn new(now: Ticks) -> Self {
        Self {
            deadline: now.wrapping_add(DROP_REPORT_WINDOW_MS),
            ignored: 0,
        }
    }

    pub fn record(&mut self, ignored: u32) {
        self.ignored = self.ignored.saturating_add(ignored);
    }

    /// Close the window once `now` is past its end.
    ///
    /// Returns the count to report (if non-zero) and starts a new window.
    pub fn poll(&mut self, now: Ticks) -> Option<u32> {
        if now.diff(self.deadline) <= 0 {
            return None;
        }
        self.deadline = now.wrapping_add(DROP_REPORT_WINDOW_MS);
        let ignored = core::mem::take(&mut self.ignored);
        (ignored > 0).then_some(ignored)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::midi::names::StandardNames;
    use core::cell::Cell;
    use heapless::{Deque, Vec};

    struct Queue(Deque<MidiMessage, 16>);

    impl Queue {
        fn of(msgs: &[MidiMessage]) -> Self {
            let mut q = Deque::new();
            for m in msgs {
                q.push_back(*m).unwrap();
            }
            Queue(q)
        }
    }

    impl MidiIn for Queue {
        fn receive(&mut self) -> Option<MidiMessage> {
            self.0.pop_front()
        }
    }

    #[derive(Default)]
    struct Sink(Vec<MidiMessage, 16>);

    impl MidiOut for Sink {
        fn send(&mut self, msg: MidiMessage) {
            self.0.push(msg).unwrap();
        }
    }

    /// Counts lookups to prove names are only recomputed on change.
    #[derive(Default)]
    struct CountingNames {
        notes: Cell<u32>,
        ccs: Cell<u32>,
    }

    impl NameLookup for CountingNames {
        fn note_name(&self, note: u8) -> NoteName {
            self.notes.set(self.notes.get() + 1);
            StandardNames.note_name(note)
        }

        fn cc_description(&self, control: u8) -> CcName {
            self.ccs.set(self.ccs.get() + 1);
            StandardNames.cc_description(control)
        }
    }

    fn note_on(channel: u8, note: u8, velocity: u8) -> MidiMessage {
        MidiMessage::NoteOn {
            channel,
            note,
            velocity,
        }
    }

    fn cc(channel: u8, control: u8, value: u8) -> MidiMessage {
        MidiMessage::ControlChange {
            channel,
            control,
            value,
        }
    }

    // ════════════════════════════════════════════════════════════════════════
    // Drain
    // ════════════════════════════════════════════════════════════════════════

    #[test]
    fn drain_forwards_everything_in_order() {
        let msgs = [
            MidiMessage::TimingClock,
            note_on(0, 60, 1),
            note_on(5, 61, 2),
            MidiMessage::Start,
            cc(0, 7, 3),
        ];
        let mut input = Queue::of(&msgs);
        let mut output = Sink::default();

        let report = drain(&mut input, &mut output, 0, 32);

        assert_eq!(output.0.as_slice(), &msgs);
        assert_eq!(report.forwarded, 5);
        assert_eq!(report.candidate, Some(cc(0, 7, 3)));
        assert!(report.missed);
        // 4 non-clock messages, one of which is the candidate.
        assert_eq!(report.ignored, 3);
    }

    #[test]
    fn drain_on_empty_input_returns_immediately() {
        let mut input = Queue::of(&[]);
        let mut output = Sink::default();
        assert_eq!(drain(&mut input, &mut output, 0, 32), DrainReport::default());
    }

    #[test]
    fn drain_ignores_clock_for_accounting() {
        let mut input = Queue::of(&[MidiMessage::TimingClock, MidiMessage::TimingClock]);
        let mut output = Sink::default();
        let report = drain(&mut input, &mut output, 0, 32);
        assert_eq!(report.forwarded, 2);
        assert_eq!(report.ignored, 0);
        assert_eq!(report.candidate, None);
        assert!(!report.missed);
    }

    #[test]
    fn drain_other_channels_never_become_candidate() {
        let mut input = Queue::of(&[note_on(3, 60, 1)]);
        let mut output = Sink::default();
        let report = drain(&mut input, &mut output, 0, 32);
        assert_eq!(report.candidate, None);
        assert_eq!(report.ignored, 1);
        assert_eq!(output.0.len(), 1);
    }

    #[test]
    fn drain_respects_limit() {
        let mut input = Queue::of(&[note_on(0, 1, 1), note_on(0, 2, 1), note_on(0, 3, 1)]);
        let mut output = Sink::default();
        let report = drain(&mut input, &mut output, 0, 2);
        assert_eq!(report.forwarded, 2);
        assert_eq!(report.candidate, Some(note_on(0, 2, 1)));
        assert_eq!(input.receive(), Some(note_on(0, 3, 1)));
    }

    #[test]
    fn single_candidate_is_not_missed() {
        let mut input = Queue::of(&[note_on(2, 44, 120), MidiMessage::TimingClock]);
        let mut output = Sink::default();
        let report = drain(&mut input, &mut output, 2, 32);
        assert!(!report.missed);
        assert_eq!(report.ignored, 0);
    }

    // ════════════════════════════════════════════════════════════════════════
    // Status decoding
    // ════════════════════════════════════════════════════════════════════════

    #[test]
    fn empty_status_is_sentinel() {
        assert_eq!(MidiStatus::new().status_line(), "");
    }

    #[test]
    fn note_on_renders_name_and_velocity() {
        let mut status = MidiStatus::new();
        assert!(status.decode(&note_on(0, 44, 120), false, &StandardNames));
        assert_eq!(status.status_line(), " G#2         Vel: 120");
    }

    #[test]
    fn pressure_keeps_note_and_velocity() {
        let mut status = MidiStatus::new();
        status.decode(&note_on(0, 44, 120), false, &StandardNames);
        status.decode(
            &MidiMessage::ChannelPressure {
                channel: 0,
                pressure: 64,
            },
            false,
            &StandardNames,
        );
        assert_eq!(status.status_line(), " G#2  P:  64 Vel: 120");
        assert_eq!(status.last_velocity, 120);
    }

    #[test]
    fn note_off_shows_placeholder_velocity() {
        let mut status = MidiStatus::new();
        status.decode(
            &MidiMessage::NoteOff {
                channel: 0,
                note: 60,
                velocity: 0,
            },
            true,
            &StandardNames,
        );
        assert_eq!(status.status_line(), "!C4          Vel: ---");
    }

    #[test]
    fn control_change_right_aligns_value() {
        let mut status = MidiStatus::new();
        status.decode(&cc(0, 7, 5), true, &StandardNames);
        assert_eq!(status.status_line(), "!Volume            5");
        assert_eq!(status.last_cc_value, 5);
    }

    #[test]
    fn names_recomputed_only_on_change() {
        let names = CountingNames::default();
        let mut status = MidiStatus::new();

        status.decode(&note_on(0, 60, 1), false, &names);
        status.decode(&note_on(0, 60, 2), false, &names);
        status.decode(&note_on(0, 62, 3), false, &names);
        assert_eq!(names.notes.get(), 2);

        status.decode(&cc(0, 1, 1), false, &names);
        status.decode(&cc(0, 1, 2), false, &names);
        assert_eq!(names.ccs.get(), 1);
    }

    #[test]
    fn unrenderable_kinds_leave_status_alone() {
        let mut status = MidiStatus::new();
        status.decode(&note_on(0, 44, 120), false, &StandardNames);
        let before = status.clone();

        assert!(!status.decode(
            &MidiMessage::PitchBend {
                channel: 0,
                value: 0
            },
            true,
            &StandardNames
        ));
        assert_eq!(status, before);
    }

    #[test]
    fn reset_returns_to_sentinel() {
        let mut status = MidiStatus::new();
        status.decode(&cc(0, 7, 100), false, &StandardNames);
        status.reset();
        assert_eq!(status.shown, Shown::Empty);
        assert_eq!(status.status_line(), "");
        assert_eq!(status.last_cc, None);
    }

    // ════════════════════════════════════════════════════════════════════════
    // Drop window
    // ════════════════════════════════════════════════════════════════════════

    #[test]
    fn drop_counter_reports_once_per_window() {
        let start = Ticks::from_millis(0);
        let mut counter = DropCounter::new(start);
        counter.record(3);
        counter.record(2);

        assert_eq!(counter.poll(start.wrapping_add(500)), None);
        assert_eq!(counter.poll(start.wrapping_add(1000)), None);
        assert_eq!(counter.poll(start.wrapping_add(1001)), Some(5));
        // Window restarted and the count was reset.
        assert_eq!(counter.poll(start.wrapping_add(2500)), None);
    }

    #[test]
    fn drop_counter_silent_when_nothing_ignored() {
        let start = Ticks::from_millis(10);
        let mut counter = DropCounter::new(start);
        assert_eq!(counter.poll(start.wrapping_add(5000)), None);
    }

    #[test]
    fn drop_counter_across_wraparound() {
        let start = Ticks::from_millis(crate::ticks::TICKS_MAX as u64 - 100);
        let mut counter = DropCounter::new(start);
        counter.record(1);
        assert_eq!(counter.poll(start.wrapping_add(999)), None);
        assert_eq!(counter.poll(start.wrapping_add(1200)), Some(1));
    }
}
