//! Configuration management for the virtual agent face

use crate::{
    constants::{
        ACTIVE_INPUT, BLINK_INPUT, BLINK_MAX_INTERVAL_MS, BLINK_MIN_INTERVAL_MS, DEFAULT_RESOURCE_ID,
        DEFAULT_SCREEN_HEIGHT, DEFAULT_SCREEN_WIDTH, DEFAULT_STATE_MACHINE, DEFAULT_TARGET_FPS,
        DOUBLE_BLINK_PROBABILITY, EXPRESSION_SELECTOR_INPUT, EXPRESSION_TRIGGER_INPUT, GAZE_COOLDOWN_MS, GAZE_STEP,
        GAZE_TICK_MS, MEMORY_MONITOR_INTERVAL_MS,
    },
    transform::ViewGeometry,
    Error, Result,
};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Animation resource and input names
    pub animation: AnimationConfig,

    /// Blink scheduler configuration
    pub blink: BlinkConfig,

    /// Gaze follower configuration
    pub gaze: GazeConfig,

    /// Memory monitor configuration
    pub memory: MemoryConfig,

    /// Screen and view layout
    pub view: ViewConfig,
}

/// Animation resource and state machine inputs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimationConfig {
    /// Resource loaded into the host
    pub resource_id: String,

    /// State machine receiving every input update
    pub state_machine: String,

    /// Numeric input selecting the expression
    pub expression_selector: String,

    /// Trigger applying the selected expression
    pub expression_trigger: String,

    /// Boolean input receiving the blink flag
    pub blink_input: String,

    /// Boolean input set once on start, if any
    pub active_input: Option<String>,
}

/// Blink scheduler parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BlinkConfig {
    /// Shortest wait between blink decisions
    pub min_interval_ms: u64,

    /// Longest wait between blink decisions
    pub max_interval_ms: u64,

    /// Probability of a double blink (0.0-1.0)
    pub double_blink_probability: f64,
}

/// Gaze follower parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GazeConfig {
    /// Run the gaze loops at all
    pub enabled: bool,

    /// Animate from the start
    pub start_animating: bool,

    /// Producer cadence
    pub tick_ms: u64,

    /// Horizontal step per tick in screen pixels
    pub step: f32,

    /// Pause after a rejected pointer event
    pub cooldown_ms: u64,
}

/// Memory monitor parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MemoryConfig {
    /// Run the memory monitor
    pub enabled: bool,

    /// Report cadence
    pub interval_ms: u64,
}

/// Screen and view layout
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewConfig {
    /// Screen width in pixels (gaze sweep range)
    pub screen_width: u32,

    /// Screen height in pixels
    pub screen_height: u32,

    /// Screen x of the animation view
    pub left: f32,

    /// Screen y of the animation view
    pub top: f32,

    /// Animation view width
    pub width: u32,

    /// Animation view height
    pub height: u32,

    /// Render ticks per second
    pub target_fps: u32,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            resource_id: DEFAULT_RESOURCE_ID.to_string(),
            state_machine: DEFAULT_STATE_MACHINE.to_string(),
            expression_selector: EXPRESSION_SELECTOR_INPUT.to_string(),
            expression_trigger: EXPRESSION_TRIGGER_INPUT.to_string(),
            blink_input: BLINK_INPUT.to_string(),
            active_input: Some(ACTIVE_INPUT.to_string()),
        }
    }
}

impl Default for BlinkConfig {
    fn default() -> Self {
        Self {
            min_interval_ms: BLINK_MIN_INTERVAL_MS,
            max_interval_ms: BLINK_MAX_INTERVAL_MS,
            double_blink_probability: DOUBLE_BLINK_PROBABILITY,
        }
    }
}

impl Default for GazeConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            start_animating: true,
            tick_ms: GAZE_TICK_MS,
            step: GAZE_STEP,
            cooldown_ms: GAZE_COOLDOWN_MS,
        }
    }
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            interval_ms: MEMORY_MONITOR_INTERVAL_MS,
        }
    }
}

impl Default for ViewConfig {
    fn default() -> Self {
        // Square view filling the screen width, centred vertically.
        let side = DEFAULT_SCREEN_WIDTH;
        Self {
            screen_width: DEFAULT_SCREEN_WIDTH,
            screen_height: DEFAULT_SCREEN_HEIGHT,
            left: 0.0,
            top: ((DEFAULT_SCREEN_HEIGHT - side) / 2) as f32,
            width: side,
            height: side,
            target_fps: DEFAULT_TARGET_FPS,
        }
    }
}

impl BlinkConfig {
    /// Interval bounds as durations
    #[must_use]
    pub const fn interval_range(&self) -> (Duration, Duration) {
        (
            Duration::from_millis(self.min_interval_ms),
            Duration::from_millis(self.max_interval_ms),
        )
    }
}

impl GazeConfig {
    /// Producer cadence
    #[must_use]
    pub const fn tick(&self) -> Duration {
        Duration::from_millis(self.tick_ms)
    }

    /// Cool-down after a forwarding error
    #[must_use]
    pub const fn cooldown(&self) -> Duration {
        Duration::from_millis(self.cooldown_ms)
    }
}

impl MemoryConfig {
    /// Report cadence
    #[must_use]
    pub const fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }
}

impl ViewConfig {
    /// Initial geometry of the animation view
    #[must_use]
    pub const fn geometry(&self) -> ViewGeometry {
        ViewGeometry::new(self.left, self.top, self.width, self.height)
    }

    /// Time between render ticks
    #[must_use]
    pub fn frame_interval(&self) -> Duration {
        Duration::from_secs_f64(1.0 / f64::from(self.target_fps.max(1)))
    }
}

impl Config {
    /// Load configuration from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| Error::IoError(e.to_string()))?;

        serde_yaml::from_str(&content).map_err(|e| Error::ConfigError(format!("Failed to parse config: {e}")))
    }

    /// Save configuration to a YAML file
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = self.to_yaml()?;

        std::fs::write(path, content).map_err(|e| Error::IoError(e.to_string()))?;

        Ok(())
    }

    /// Serialize configuration as YAML
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).map_err(|e| Error::ConfigError(format!("Failed to serialize config: {e}")))
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        // Validate input names
        if self.animation.state_machine.trim().is_empty() {
            return Err(Error::ConfigError("State machine name must not be empty".to_string()));
        }
        for (label, name) in [
            ("Expression selector", &self.animation.expression_selector),
            ("Expression trigger", &self.animation.expression_trigger),
            ("Blink input", &self.animation.blink_input),
        ] {
            if name.trim().is_empty() {
                return Err(Error::ConfigError(format!("{label} name must not be empty")));
            }
        }

        // Validate blink parameters
        if self.blink.min_interval_ms == 0 {
            return Err(Error::ConfigError(
                "Blink interval must be greater than 0".to_string(),
            ));
        }
        if self.blink.min_interval_ms > self.blink.max_interval_ms {
            return Err(Error::ConfigError(
                "Blink min interval must not exceed max interval".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.blink.double_blink_probability) {
            return Err(Error::ConfigError(
                "Double blink probability must be between 0.0 and 1.0".to_string(),
            ));
        }

        // Validate gaze parameters
        if self.gaze.tick_ms == 0 {
            return Err(Error::ConfigError("Gaze tick must be greater than 0".to_string()));
        }
        if !self.gaze.step.is_finite() || self.gaze.step <= 0.0 {
            return Err(Error::ConfigError("Gaze step must be positive".to_string()));
        }

        // Validate memory monitor
        if self.memory.enabled && self.memory.interval_ms == 0 {
            return Err(Error::ConfigError(
                "Memory monitor interval must be greater than 0".to_string(),
            ));
        }

        // Validate display settings
        if self.view.target_fps == 0 {
            return Err(Error::ConfigError("Target FPS must be greater than 0".to_string()));
        }
        if self.view.screen_width == 0 || self.view.screen_height == 0 {
            return Err(Error::ConfigError("Screen size must be greater than 0".to_string()));
        }

        Ok(())
    }
}

/// Example configuration file content
pub const EXAMPLE_CONFIG: &str = r#"# Virtual Agent Face Configuration

# Animation resource and state machine inputs
animation:
  resource_id: "character_facial_animation"
  state_machine: "State Machine 1"
  expression_selector: "facialExpressionSelector"
  expression_trigger: "facialExpressionTrigger"
  blink_input: "isBlinkTwice"
  active_input: "isActive"

# Random double blink
blink:
  min_interval_ms: 500
  max_interval_ms: 5000
  double_blink_probability: 0.25

# Simulated gaze sweep
gaze:
  enabled: true
  start_animating: true
  tick_ms: 300
  step: 50.0
  cooldown_ms: 50

# Periodic memory report
memory:
  enabled: true
  interval_ms: 30000

# Screen and animation view layout
view:
  screen_width: 1080
  screen_height: 2340
  left: 0.0
  top: 630.0
  width: 1080
  height: 1080
  target_fps: 30
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_example_config_matches_defaults() {
        let parsed: Config = serde_yaml::from_str(EXAMPLE_CONFIG).unwrap();
        assert_eq!(parsed, Config::default());
        parsed.validate().unwrap();
    }

    #[test]
    fn test_partial_config_fills_defaults() {
        let parsed: Config = serde_yaml::from_str("gaze:\n  cooldown_ms: 5000\n").unwrap();
        assert_eq!(parsed.gaze.cooldown_ms, 5000);
        assert_eq!(parsed.gaze.tick_ms, GAZE_TICK_MS);
        assert_eq!(parsed.blink, BlinkConfig::default());
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = Config::default();
        config.blink.double_blink_probability = 1.5;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.blink.min_interval_ms = 6000;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.gaze.step = 0.0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.animation.blink_input = " ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_frame_interval() {
        let view = ViewConfig {
            target_fps: 50,
            ..ViewConfig::default()
        };
        assert_eq!(view.frame_interval(), Duration::from_millis(20));
    }
}
