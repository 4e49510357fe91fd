//! Gap → exercise → gap … state machine driven by a one-second tick.
//!
//! The sequencer never owns the timer list. Callers hand it the list on every
//! operation so that edits made between ticks are always observed.

use crate::audio::AudioCue;
use crate::config::TICK_WINDOW_SECS;
use crate::{TimerIndex, TimerList};
use log::{debug, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Idle,
    /// Rest before the timer at `index`.
    Gap { index: TimerIndex, remaining: u32 },
    Active { index: TimerIndex, remaining: u32 },
    /// Every timer ran to completion.
    Finished,
}

impl Phase {
    pub fn index(&self) -> Option<TimerIndex> {
        match *self {
            Phase::Gap { index, .. } | Phase::Active { index, .. } => Some(index),
            Phase::Idle | Phase::Finished => None,
        }
    }

    pub fn remaining(&self) -> u32 {
        match *self {
            Phase::Gap { remaining, .. } | Phase::Active { remaining, .. } => remaining,
            Phase::Idle | Phase::Finished => 0,
        }
    }
}

/// What a single tick did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickEvent {
    /// Paused, idle or finished: nothing changed.
    Ignored,
    CountedDown,
    GapEnded(TimerIndex),
    TimerCompleted(TimerIndex),
    /// The last timer completed and the sequence stopped.
    SequenceFinished,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Sequencer {
    phase: Phase,
    running: bool,
}

impl Sequencer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn active_index(&self) -> Option<TimerIndex> {
        self.phase.index()
    }

    pub fn is_in_gap(&self) -> bool {
        matches!(self.phase, Phase::Gap { .. })
    }

    pub fn countdown(&self) -> u32 {
        self.phase.remaining()
    }

    /// Paused part-way through a sequence.
    pub fn is_paused(&self) -> bool {
        !self.running && self.phase.index().is_some()
    }

    /// Begin a fresh sequence or resume a paused one.
    ///
    /// Returns `false` when nothing happened (already running, or empty list).
    pub fn start(&mut self, timers: &TimerList, gap_duration: u32) -> bool {
        if self.running || timers.is_empty() {
            return false;
        }
        match self.phase {
            Phase::Gap { .. } | Phase::Active { .. } => {
                debug!("Resuming at {:?}", self.phase);
            }
            Phase::Idle | Phase::Finished => {
                info!("Starting sequence of {} timer(s)", timers.len());
                self.phase = Phase::Gap {
                    index: 0,
                    remaining: gap_duration,
                };
            }
        }
        self.running = true;
        true
    }

    /// Freeze the countdown where it is.
    pub fn pause(&mut self, audio: &impl AudioCue) {
        self.running = false;
        audio.stop_tick();
    }

    /// Back to idle with every completion flag cleared.
    pub fn reset(&mut self, timers: &mut TimerList, audio: &impl AudioCue) {
        self.running = false;
        self.phase = Phase::Idle;
        timers.reset_all();
        audio.stop_tick();
    }

    /// Advance by one second.
    pub fn tick(
        &mut self,
        timers: &mut TimerList,
        gap_duration: u32,
        audio: &impl AudioCue,
    ) -> TickEvent {
        if !self.running {
            return TickEvent::Ignored;
        }
        let (index, mut remaining, in_gap) = match self.phase {
            Phase::Gap { index, remaining } => (index, remaining, true),
            Phase::Active { index, remaining } => (index, remaining, false),
            Phase::Idle | Phase::Finished => return TickEvent::Ignored,
        };

        if remaining > 0 {
            let shown = remaining;
            remaining -= 1;
            // Boundary is on the value displayed before this tick.
            if !in_gap && shown <= TICK_WINDOW_SECS {
                audio.play_tick();
            }
        }

        if remaining > 0 {
            self.phase = if in_gap {
                Phase::Gap { index, remaining }
            } else {
                Phase::Active { index, remaining }
            };
            return TickEvent::CountedDown;
        }

        audio.stop_tick();

        if in_gap {
            return match timers.get(index) {
                Some(timer) => {
                    debug!("Gap over, starting {:?} for {}s", timer.name, timer.duration);
                    self.phase = Phase::Active {
                        index,
                        remaining: timer.duration,
                    };
                    TickEvent::GapEnded(index)
                }
                None => self.finish(),
            };
        }

        timers.mark_completed(index);
        if index + 1 < timers.len() {
            self.phase = Phase::Gap {
                index: index + 1,
                remaining: gap_duration,
            };
            TickEvent::TimerCompleted(index)
        } else {
            self.finish()
        }
    }

    fn finish(&mut self) -> TickEvent {
        info!("Sequence finished");
        self.running = false;
        self.phase = Phase::Finished;
        TickEvent::SequenceFinished
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::testing::{Cue, RecordingAudio};

    fn list_of(durations: &[u32]) -> TimerList {
        let mut list = TimerList::new();
        for &d in durations {
            list.add(1, d, "Exercise");
        }
        list
    }

    fn run(seq: &mut Sequencer, timers: &mut TimerList, gap: u32, audio: &RecordingAudio, n: usize) {
        for _ in 0..n {
            seq.tick(timers, gap, audio);
        }
    }

    #[test]
    fn single_timer_walkthrough() {
        let mut timers = list_of(&[20]);
        let audio = RecordingAudio::default();
        let mut seq = Sequencer::new();

        assert!(seq.start(&timers, 5));
        assert_eq!(seq.phase(), Phase::Gap { index: 0, remaining: 5 });
        assert!(seq.is_in_gap());

        run(&mut seq, &mut timers, 5, &audio, 5);
        assert_eq!(seq.phase(), Phase::Active { index: 0, remaining: 20 });
        assert!(!timers.get(0).unwrap().completed);

        run(&mut seq, &mut timers, 5, &audio, 20);
        assert_eq!(seq.phase(), Phase::Finished);
        assert!(!seq.is_running());
        assert_eq!(seq.active_index(), None);
        assert_eq!(seq.countdown(), 0);
        assert!(timers.get(0).unwrap().completed);
    }

    #[test]
    fn start_with_empty_list_is_noop() {
        let mut seq = Sequencer::new();
        assert!(!seq.start(&TimerList::new(), 5));
        assert_eq!(seq.phase(), Phase::Idle);
        assert!(!seq.is_running());
    }

    #[test]
    fn advances_through_gaps_between_timers() {
        let mut timers = list_of(&[3, 4]);
        let audio = RecordingAudio::default();
        let mut seq = Sequencer::new();
        seq.start(&timers, 2);

        run(&mut seq, &mut timers, 2, &audio, 2);
        assert_eq!(seq.phase(), Phase::Active { index: 0, remaining: 3 });

        let events: Vec<_> = (0..3).map(|_| seq.tick(&mut timers, 2, &audio)).collect();
        assert_eq!(events.last(), Some(&TickEvent::TimerCompleted(0)));
        assert_eq!(seq.phase(), Phase::Gap { index: 1, remaining: 2 });
        assert!(timers.get(0).unwrap().completed);
        assert!(!timers.get(1).unwrap().completed);

        run(&mut seq, &mut timers, 2, &audio, 2);
        assert_eq!(seq.phase(), Phase::Active { index: 1, remaining: 4 });
        run(&mut seq, &mut timers, 2, &audio, 3);
        assert_eq!(seq.tick(&mut timers, 2, &audio), TickEvent::SequenceFinished);
        assert!(timers.iter().all(|t| t.completed));
    }

    #[test]
    fn ticks_only_in_last_five_seconds_of_exercise() {
        let mut timers = list_of(&[8]);
        let audio = RecordingAudio::default();
        let mut seq = Sequencer::new();
        seq.start(&timers, 10);

        // Whole gap, including its last five seconds, stays silent.
        run(&mut seq, &mut timers, 10, &audio, 10);
        assert_eq!(audio.count(Cue::Tick), 0);
        assert_eq!(seq.phase(), Phase::Active { index: 0, remaining: 8 });

        // Displayed 8, 7, 6: silent.
        for _ in 0..3 {
            seq.tick(&mut timers, 10, &audio);
            assert_eq!(audio.count(Cue::Tick), 0);
        }
        assert_eq!(seq.countdown(), 5);

        // Displayed 5..=1: exactly one tick each.
        for expected in 1..=5 {
            seq.tick(&mut timers, 10, &audio);
            assert_eq!(audio.count(Cue::Tick), expected);
        }
        assert_eq!(seq.phase(), Phase::Finished);
    }

    #[test]
    fn tick_window_counts_for_twenty_second_timer() {
        let mut timers = list_of(&[20]);
        let audio = RecordingAudio::default();
        let mut seq = Sequencer::new();
        seq.start(&timers, 5);
        run(&mut seq, &mut timers, 5, &audio, 25);

        assert_eq!(audio.count(Cue::Tick), 5);
        // One stop per phase change: gap end and timer end.
        assert_eq!(audio.count(Cue::Stop), 2);
    }

    #[test]
    fn pause_then_start_resumes_countdown() {
        let mut timers = list_of(&[20]);
        let audio = RecordingAudio::default();
        let mut seq = Sequencer::new();
        seq.start(&timers, 5);
        run(&mut seq, &mut timers, 5, &audio, 12);
        assert_eq!(seq.phase(), Phase::Active { index: 0, remaining: 13 });

        seq.pause(&audio);
        assert!(seq.is_paused());
        assert_eq!(seq.tick(&mut timers, 5, &audio), TickEvent::Ignored);
        assert_eq!(seq.countdown(), 13);
        assert_eq!(seq.active_index(), Some(0));

        assert!(seq.start(&timers, 5));
        assert_eq!(seq.phase(), Phase::Active { index: 0, remaining: 13 });
        seq.tick(&mut timers, 5, &audio);
        assert_eq!(seq.countdown(), 12);
    }

    #[test]
    fn pause_during_gap_keeps_gap() {
        let mut timers = list_of(&[20]);
        let audio = RecordingAudio::default();
        let mut seq = Sequencer::new();
        seq.start(&timers, 10);
        run(&mut seq, &mut timers, 10, &audio, 3);
        seq.pause(&audio);

        // A changed gap preference does not disturb a paused gap.
        assert!(seq.start(&timers, 30));
        assert_eq!(seq.phase(), Phase::Gap { index: 0, remaining: 7 });
    }

    #[test]
    fn start_while_running_is_noop() {
        let mut timers = list_of(&[20]);
        let audio = RecordingAudio::default();
        let mut seq = Sequencer::new();
        seq.start(&timers, 5);
        run(&mut seq, &mut timers, 5, &audio, 2);

        assert!(!seq.start(&timers, 5));
        assert_eq!(seq.phase(), Phase::Gap { index: 0, remaining: 3 });
    }

    #[test]
    fn reset_from_any_state_silences_and_clears() {
        for ticks in [0usize, 3, 5, 12, 25, 40] {
            let mut timers = list_of(&[20, 10]);
            let audio = RecordingAudio::default();
            let mut seq = Sequencer::new();
            seq.start(&timers, 5);
            run(&mut seq, &mut timers, 5, &audio, ticks);

            seq.reset(&mut timers, &audio);
            assert_eq!(seq.phase(), Phase::Idle);
            assert_eq!(seq.active_index(), None);
            assert_eq!(seq.countdown(), 0);
            assert!(!seq.is_running());
            assert!(timers.iter().all(|t| !t.completed));
            assert_eq!(audio.cues().last(), Some(&Cue::Stop));

            audio.clear();
            run(&mut seq, &mut timers, 5, &audio, 30);
            assert_eq!(audio.count(Cue::Tick), 0, "ticked after reset at {}", ticks);
        }
    }

    #[test]
    fn reset_all_then_start_begins_at_first_timer() {
        let mut timers = list_of(&[2, 2]);
        let audio = RecordingAudio::default();
        let mut seq = Sequencer::new();
        seq.start(&timers, 1);
        run(&mut seq, &mut timers, 1, &audio, 6);
        assert_eq!(seq.phase(), Phase::Finished);
        assert!(timers.iter().all(|t| t.completed));

        timers.reset_all();
        assert!(seq.start(&timers, 1));
        assert_eq!(seq.active_index(), Some(0));
        assert!(seq.is_in_gap());
    }

    #[test]
    fn restart_after_finish_keeps_completion_flags() {
        let mut timers = list_of(&[1]);
        let audio = RecordingAudio::default();
        let mut seq = Sequencer::new();
        seq.start(&timers, 0);
        run(&mut seq, &mut timers, 0, &audio, 2);
        assert_eq!(seq.phase(), Phase::Finished);

        assert!(seq.start(&timers, 3));
        assert_eq!(seq.phase(), Phase::Gap { index: 0, remaining: 3 });
        assert!(timers.get(0).unwrap().completed);
    }

    #[test]
    fn zero_gap_goes_straight_to_exercise() {
        let mut timers = list_of(&[4]);
        let audio = RecordingAudio::default();
        let mut seq = Sequencer::new();
        seq.start(&timers, 0);

        assert_eq!(seq.tick(&mut timers, 0, &audio), TickEvent::GapEnded(0));
        assert_eq!(seq.phase(), Phase::Active { index: 0, remaining: 4 });
    }

    #[test]
    fn missing_timer_after_edit_finishes_sequence() {
        let mut timers = list_of(&[5, 5]);
        let audio = RecordingAudio::default();
        let mut seq = Sequencer::new();
        seq.start(&timers, 1);
        run(&mut seq, &mut timers, 1, &audio, 6);
        assert_eq!(seq.phase(), Phase::Gap { index: 1, remaining: 1 });

        seq.pause(&audio);
        let last = timers.get(1).unwrap().id.clone();
        timers.remove(&last);
        seq.start(&timers, 1);

        assert_eq!(seq.tick(&mut timers, 1, &audio), TickEvent::SequenceFinished);
        assert_eq!(seq.phase(), Phase::Finished);
    }
}
