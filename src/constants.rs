//! Constants used throughout the control loop

/// Default animation resource loaded by the host
pub const DEFAULT_RESOURCE_ID: &str = "character_facial_animation";

/// Default state machine driven by every input update
pub const DEFAULT_STATE_MACHINE: &str = "State Machine 1";

/// Numeric input selecting the facial expression
pub const EXPRESSION_SELECTOR_INPUT: &str = "facialExpressionSelector";

/// Trigger input that applies the selected expression
pub const EXPRESSION_TRIGGER_INPUT: &str = "facialExpressionTrigger";

/// Boolean input toggling the double blink
pub const BLINK_INPUT: &str = "isBlinkTwice";

/// Boolean input enabling the rig's listeners
pub const ACTIVE_INPUT: &str = "isActive";

/// Blink interval bounds in milliseconds (inclusive)
pub const BLINK_MIN_INTERVAL_MS: u64 = 500;
pub const BLINK_MAX_INTERVAL_MS: u64 = 5000;

/// Probability that a blink decision yields a double blink
pub const DOUBLE_BLINK_PROBABILITY: f64 = 0.25;

/// Gaze producer cadence in milliseconds
pub const GAZE_TICK_MS: u64 = 300;

/// Horizontal sweep step per gaze tick, in screen pixels
pub const GAZE_STEP: f32 = 50.0;

/// Pause after a rejected pointer event, in milliseconds
pub const GAZE_COOLDOWN_MS: u64 = 50;

/// Memory monitor cadence in milliseconds
pub const MEMORY_MONITOR_INTERVAL_MS: u64 = 30_000;

/// Text shown before the first memory report
pub const MEMORY_MONITOR_STARTED: &str = "memory monitor started";

/// Default simulated screen size in pixels
pub const DEFAULT_SCREEN_WIDTH: u32 = 1080;
pub const DEFAULT_SCREEN_HEIGHT: u32 = 2340;

/// Default render cadence of the demo binary
pub const DEFAULT_TARGET_FPS: u32 = 30;

/// Bytes per mebibyte
pub const BYTES_PER_MB: u64 = 1024 * 1024;
