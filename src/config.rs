//! Application-level configuration constants.

// Storage keys
pub const TIMERS_KEY: &str = "exerciseTimers";
pub const GAP_DURATION_KEY: &str = "exerciseGapDuration";
pub const DARK_MODE_KEY: &str = "exerciseDarkMode";

// Sequencer behavior
pub const TICK_INTERVAL_MS: u32 = 1_000;
pub const TICK_WINDOW_SECS: u32 = 5;

// Default values for input fields
pub const DEFAULT_GAP_SECS: u32 = 5;
pub const DEFAULT_DURATION_SECS: u32 = 20;
pub const DEFAULT_QUANTITY: u32 = 1;
pub const DEFAULT_BASE_NAME: &str = "Exercise";

// Preset buttons
pub const DURATION_PRESETS: &[u32] = &[10, 20, 30, 45, 60];
pub const GAP_PRESETS: &[u32] = &[5, 10, 20, 30, 60];

// Min/Max limits for input fields
pub const MIN_DURATION_SECS: u32 = 1;
pub const MAX_DURATION_SECS: u32 = 24 * 60 * 60;
pub const MIN_QUANTITY: u32 = 1;
pub const MAX_QUANTITY: u32 = 100;

// Timer ids
pub const ID_LENGTH: usize = 21;
pub const ID_ALPHABET: &[u8; 64] =
    b"useandom-26T198340PX75pxJACKVERYMINDBUSHWOLF_GQZbfghjklqvwyzrict";

// Tick blip
pub const TICK_FREQUENCY_HZ: f32 = 800.0;
pub const TICK_PEAK_GAIN: f32 = 0.2;
pub const TICK_LENGTH_SECS: f64 = 0.1;

// Completion beep
pub const BEEP_FREQUENCY_HZ: f32 = 440.0;
pub const BEEP_PEAK_GAIN: f32 = 0.3;
pub const BEEP_LENGTH_SECS: f64 = 0.3;

pub const ATTACK_SECS: f64 = 0.01;
