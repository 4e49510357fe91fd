//! The session object the UI talks to.
//!
//! A [`Workout`] owns the timer list, the preferences, the sequencer and the
//! two browser collaborators. Every list or preference mutation is written
//! straight through to storage.

use crate::audio::AudioCue;
use crate::sequencer::{Phase, Sequencer, TickEvent};
use crate::storage::{self, KeyValueStore, Preferences};
use crate::{Timer, TimerIndex, TimerList, WorkoutError};
use log::{debug, info};

pub struct Workout<S: KeyValueStore, A: AudioCue> {
    timers: TimerList,
    preferences: Preferences,
    sequencer: Sequencer,
    store: S,
    audio: A,
}

impl<S: KeyValueStore, A: AudioCue> Workout<S, A> {
    /// Restore the list and preferences from `store`.
    pub fn load(store: S, audio: A, prefers_dark: impl FnOnce() -> bool) -> Self {
        let timers = storage::load_timers(&store);
        let preferences = storage::load_preferences(&store, prefers_dark);
        info!(
            "Workout loaded: {} timer(s), {}s gap, dark mode {}",
            timers.len(),
            preferences.gap_duration,
            preferences.dark_mode
        );
        Self {
            timers,
            preferences,
            sequencer: Sequencer::new(),
            store,
            audio,
        }
    }

    pub fn timers(&self) -> &TimerList {
        &self.timers
    }

    pub fn preferences(&self) -> Preferences {
        self.preferences
    }

    pub fn phase(&self) -> Phase {
        self.sequencer.phase()
    }

    pub fn is_running(&self) -> bool {
        self.sequencer.is_running()
    }

    pub fn is_in_gap(&self) -> bool {
        self.sequencer.is_in_gap()
    }

    pub fn countdown(&self) -> u32 {
        self.sequencer.countdown()
    }

    pub fn active_index(&self) -> Option<TimerIndex> {
        self.sequencer.active_index()
    }

    pub fn audio(&self) -> &A {
        &self.audio
    }

    pub fn active_timer(&self) -> Option<&Timer> {
        self.active_index().and_then(|i| self.timers.get(i))
    }

    fn save_timers(&self) {
        storage::save_timers(&self.store, &self.timers);
    }

    fn ensure_idle(&self) -> Result<(), WorkoutError> {
        if self.sequencer.is_running() {
            Err(WorkoutError::SequenceRunning)
        } else {
            Ok(())
        }
    }

    // ── list management ─────────────────────────────────────────────────────

    pub fn add_timers(
        &mut self,
        quantity: u32,
        duration: u32,
        base_name: &str,
    ) -> Result<Vec<String>, WorkoutError> {
        if quantity == 0 {
            return Err(WorkoutError::InvalidQuantity(quantity));
        }
        if duration == 0 {
            return Err(WorkoutError::InvalidDuration(duration));
        }
        let ids = self.timers.add(quantity, duration, base_name);
        self.save_timers();
        Ok(ids)
    }

    pub fn rename(&mut self, id: &str, new_name: &str) {
        self.timers.rename(id, new_name);
        self.save_timers();
    }

    pub fn set_duration(&mut self, id: &str, new_duration: u32) -> Result<(), WorkoutError> {
        if new_duration == 0 {
            return Err(WorkoutError::InvalidDuration(new_duration));
        }
        self.timers.set_duration(id, new_duration);
        self.save_timers();
        Ok(())
    }

    pub fn remove(&mut self, id: &str) -> Result<(), WorkoutError> {
        self.ensure_idle()?;
        if self.timers.remove(id) {
            self.save_timers();
        }
        Ok(())
    }

    pub fn move_up(&mut self, index: TimerIndex) -> Result<(), WorkoutError> {
        self.ensure_idle()?;
        if index > 0 && self.timers.swap(index, index - 1) {
            self.save_timers();
        }
        Ok(())
    }

    pub fn move_down(&mut self, index: TimerIndex) -> Result<(), WorkoutError> {
        self.ensure_idle()?;
        if self.timers.swap(index, index + 1) {
            self.save_timers();
        }
        Ok(())
    }

    /// Clear every completion flag without touching the sequence.
    pub fn reset_all(&mut self) {
        self.timers.reset_all();
        self.save_timers();
    }

    // ── preferences ─────────────────────────────────────────────────────────

    pub fn set_gap_duration(&mut self, secs: u32) {
        self.preferences.gap_duration = secs;
        storage::save_gap_duration(&self.store, secs);
    }

    pub fn set_dark_mode(&mut self, dark_mode: bool) {
        self.preferences.dark_mode = dark_mode;
        storage::save_dark_mode(&self.store, dark_mode);
    }

    /// Flip the theme and return the new value.
    pub fn toggle_dark_mode(&mut self) -> bool {
        let next = !self.preferences.dark_mode;
        debug!("Toggling dark mode from {} to {}", !next, next);
        self.set_dark_mode(next);
        next
    }

    // ── sequence control ────────────────────────────────────────────────────

    pub fn start(&mut self) -> bool {
        self.sequencer
            .start(&self.timers, self.preferences.gap_duration)
    }

    pub fn pause(&mut self) {
        self.sequencer.pause(&self.audio);
    }

    /// Stop everything and clear completion flags.
    pub fn reset(&mut self) {
        self.sequencer.reset(&mut self.timers, &self.audio);
        self.save_timers();
    }

    /// One second elapsed.
    pub fn tick(&mut self) -> TickEvent {
        let event = self
            .sequencer
            .tick(&mut self.timers, self.preferences.gap_duration, &self.audio);
        match event {
            TickEvent::TimerCompleted(_) => self.save_timers(),
            TickEvent::SequenceFinished => {
                self.save_timers();
                self.audio.beep();
            }
            TickEvent::Ignored | TickEvent::CountedDown | TickEvent::GapEnded(_) => {}
        }
        event
    }
}
