use log::debug;
use rand::Rng;
use std::collections::HashSet;
use std::fmt;

pub mod audio;
pub mod config;
pub mod sequencer;
pub mod storage;
pub mod utils;
pub mod workout;

use config::{ID_ALPHABET, ID_LENGTH};

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Timer {
    pub id: String,
    pub name: String,
    /// Length of the exercise in seconds.
    pub duration: u32,
    pub completed: bool,
}

pub type TimerIndex = usize;

// Errors raised at the session boundary, shown next to the offending control
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkoutError {
    InvalidQuantity(u32),
    InvalidDuration(u32),
    /// Deleting or reordering while the sequence is ticking.
    SequenceRunning,
}

impl fmt::Display for WorkoutError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WorkoutError::InvalidQuantity(q) => {
                write!(f, "Quantity must be at least 1, got {}", q)
            }
            WorkoutError::InvalidDuration(d) => {
                write!(f, "Duration must be at least 1 second, got {}", d)
            }
            WorkoutError::SequenceRunning => {
                write!(f, "Pause or reset the timers before changing the list")
            }
        }
    }
}

impl std::error::Error for WorkoutError {}

/// Generate a nanoid-shaped id: 21 URL-safe characters.
pub fn generate_id() -> String {
    let mut rng = rand::rng();
    (0..ID_LENGTH)
        .map(|_| ID_ALPHABET[rng.random_range(0..ID_ALPHABET.len())] as char)
        .collect()
}

/// Ordered list of timers.
///
/// The list itself enforces nothing beyond id uniqueness; running-state guards
/// and input validation live in [`workout::Workout`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TimerList {
    timers: Vec<Timer>,
}

impl TimerList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a list from already-decoded timers, dropping duplicate ids.
    pub fn from_timers(timers: Vec<Timer>) -> Self {
        let mut seen = HashSet::with_capacity(timers.len());
        let timers = timers
            .into_iter()
            .filter(|t| {
                let fresh = seen.insert(t.id.clone());
                if !fresh {
                    log::warn!("Dropping stored timer with duplicate id {}", t.id);
                }
                fresh
            })
            .collect();
        Self { timers }
    }

    pub fn as_slice(&self) -> &[Timer] {
        &self.timers
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Timer> {
        self.timers.iter()
    }

    pub fn len(&self) -> usize {
        self.timers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timers.is_empty()
    }

    pub fn get(&self, index: TimerIndex) -> Option<&Timer> {
        self.timers.get(index)
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.timers.iter().map(|t| t.id.as_str())
    }

    fn contains_id(&self, id: &str) -> bool {
        self.timers.iter().any(|t| t.id == id)
    }

    fn fresh_id(&self) -> String {
        loop {
            let id = generate_id();
            if !self.contains_id(&id) {
                return id;
            }
        }
    }

    /// Append `quantity` timers named "`base_name` N", N being the 1-based position.
    ///
    /// Returns the ids of the new entries.
    pub fn add(&mut self, quantity: u32, duration: u32, base_name: &str) -> Vec<String> {
        let start = self.timers.len();
        let mut added = Vec::with_capacity(quantity as usize);
        for offset in 0..quantity as usize {
            let id = self.fresh_id();
            self.timers.push(Timer {
                id: id.clone(),
                name: format!("{} {}", base_name, start + offset + 1),
                duration,
                completed: false,
            });
            added.push(id);
        }
        debug!("Added {} timer(s) of {}s, list now {}", quantity, duration, self.len());
        added
    }

    pub fn rename(&mut self, id: &str, new_name: &str) {
        if let Some(timer) = self.timers.iter_mut().find(|t| t.id == id) {
            timer.name = new_name.to_string();
        }
    }

    pub fn set_duration(&mut self, id: &str, new_duration: u32) {
        if let Some(timer) = self.timers.iter_mut().find(|t| t.id == id) {
            timer.duration = new_duration;
        }
    }

    /// Delete by id. Returns whether anything was removed.
    pub fn remove(&mut self, id: &str) -> bool {
        let before = self.timers.len();
        self.timers.retain(|t| t.id != id);
        before != self.timers.len()
    }

    /// Exchange two positions. Out-of-range indices leave the list untouched.
    pub fn swap(&mut self, a: TimerIndex, b: TimerIndex) -> bool {
        if a == b || a >= self.timers.len() || b >= self.timers.len() {
            return false;
        }
        self.timers.swap(a, b);
        true
    }

    pub fn reset_all(&mut self) {
        for timer in &mut self.timers {
            timer.completed = false;
        }
    }

    pub fn mark_completed(&mut self, index: TimerIndex) {
        if let Some(timer) = self.timers.get_mut(index) {
            timer.completed = true;
        }
    }
}

impl<'a> IntoIterator for &'a TimerList {
    type Item = &'a Timer;
    type IntoIter = std::slice::Iter<'a, Timer>;

    fn into_iter(self) -> Self::IntoIter {
        self.timers.iter()
    }
}
