/// Target stop time, in centiseconds.
pub const TARGET_CENTIS: u32 = 1_000;
/// Target stop time, in seconds. A stop is perfect only on an exact match.
pub const TARGET_SECONDS: f64 = 10.0;

/// Wall-clock interval between timer ticks. Each tick adds one centisecond.
pub const TICK_MS: u64 = 10;
pub const CENTIS_PER_SECOND: f64 = 100.0;

// Slow mode quantises the display to 0.2 s steps.
pub const SLOW_MODE_STEPS_PER_SECOND: f64 = 5.0;

pub const MAX_NAME_CHARS: usize = 30;
pub const MAX_MESSAGE_CHARS: usize = 120;
pub const DEFAULT_MESSAGE: &str = "No one can beat my record";

pub const FOUNDER_NAME: &str = "App Founder";
pub const FOUNDER_ATTEMPTS: u32 = 19;
pub const FOUNDER_MESSAGE: &str = "No one can beat me";

pub const DEFAULT_MISSES_BEFORE_GATE: u32 = 5;
// 3 s at one tick per 10 ms.
pub const DEFAULT_COOLDOWN_TICKS: u32 = 300;
