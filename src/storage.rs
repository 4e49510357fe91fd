//! Durable key/value persistence for the timer list and preferences.
//!
//! Three independent keys, each holding a JSON value. Reads that fail to
//! decode are treated as absent so a corrupted entry can never stop the app
//! from starting.

use crate::config::{DARK_MODE_KEY, DEFAULT_GAP_SECS, GAP_DURATION_KEY, TIMERS_KEY};
use crate::{Timer, TimerList};
use log::{info, warn};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;
use web_sys::Storage;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageError {
    /// No storage backend (e.g. localStorage disabled).
    Unavailable,
    Rejected(String),
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageError::Unavailable => write!(f, "Persistent storage is unavailable"),
            StorageError::Rejected(reason) => write!(f, "Storage rejected the write: {}", reason),
        }
    }
}

impl std::error::Error for StorageError {}

pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// `window.localStorage`.
pub struct BrowserStorage {
    storage: Option<Storage>,
}

impl BrowserStorage {
    pub fn open() -> Self {
        let storage = match gloo_utils::window().local_storage() {
            Ok(Some(storage)) => Some(storage),
            Ok(None) => {
                warn!("localStorage is not available; preferences will not persist");
                None
            }
            Err(e) => {
                warn!("Error opening localStorage: {:?}", e);
                None
            }
        };
        Self { storage }
    }
}

impl KeyValueStore for BrowserStorage {
    fn get(&self, key: &str) -> Option<String> {
        let storage = self.storage.as_ref()?;
        match storage.get_item(key) {
            Ok(value) => value,
            Err(e) => {
                warn!("Error reading {} from localStorage: {:?}", key, e);
                None
            }
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let storage = self.storage.as_ref().ok_or(StorageError::Unavailable)?;
        storage
            .set_item(key, value)
            .map_err(|e| StorageError::Rejected(format!("{:?}", e)))
    }
}

/// In-memory store. Clones share the same entries.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: Rc<RefCell<HashMap<String, String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.borrow().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Persisted user preferences.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Preferences {
    pub gap_duration: u32,
    pub dark_mode: bool,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            gap_duration: DEFAULT_GAP_SECS,
            dark_mode: true,
        }
    }
}

fn read_json<T: DeserializeOwned>(store: &impl KeyValueStore, key: &str) -> Option<T> {
    let raw = store.get(key)?;
    match serde_json::from_str(&raw) {
        Ok(value) => Some(value),
        Err(e) => {
            warn!("Ignoring malformed {} in storage: {}", key, e);
            None
        }
    }
}

fn write_json<T: Serialize + ?Sized>(store: &impl KeyValueStore, key: &str, value: &T) {
    let raw = match serde_json::to_string(value) {
        Ok(raw) => raw,
        Err(e) => {
            warn!("Could not serialize {}: {}", key, e);
            return;
        }
    };
    if let Err(e) = store.set(key, &raw) {
        warn!("Could not save {}: {}", key, e);
    }
}

pub fn load_timers(store: &impl KeyValueStore) -> TimerList {
    let timers: Vec<Timer> = read_json(store, TIMERS_KEY).unwrap_or_default();
    let list = TimerList::from_timers(timers);
    info!("Loaded {} timer(s) from storage", list.len());
    list
}

pub fn save_timers(store: &impl KeyValueStore, timers: &TimerList) {
    write_json(store, TIMERS_KEY, timers.as_slice());
}

/// Read preferences, asking `prefers_dark` only when no theme was ever stored.
pub fn load_preferences(
    store: &impl KeyValueStore,
    prefers_dark: impl FnOnce() -> bool,
) -> Preferences {
    let gap_duration = read_json(store, GAP_DURATION_KEY).unwrap_or(DEFAULT_GAP_SECS);
    let dark_mode = match read_json::<bool>(store, DARK_MODE_KEY) {
        Some(stored) => stored,
        None => {
            let system = prefers_dark();
            info!("No stored theme, system prefers dark: {}", system);
            system
        }
    };
    Preferences {
        gap_duration,
        dark_mode,
    }
}

pub fn save_gap_duration(store: &impl KeyValueStore, gap_duration: u32) {
    write_json(store, GAP_DURATION_KEY, &gap_duration);
}

pub fn save_dark_mode(store: &impl KeyValueStore, dark_mode: bool) {
    write_json(store, DARK_MODE_KEY, &dark_mode);
}

/// `matchMedia("(prefers-color-scheme: dark)")`, false if the query fails.
pub fn prefers_dark_color_scheme() -> bool {
    match gloo_utils::window().match_media("(prefers-color-scheme: dark)") {
        Ok(Some(query)) => query.matches(),
        Ok(None) => false,
        Err(e) => {
            warn!("matchMedia failed: {:?}", e);
            false
        }
    }
}
