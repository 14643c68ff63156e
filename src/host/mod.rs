//! Boundary to the animation engine driving the agent face.
//!
//! The engine itself (a Rive-like runtime with named state machines) is an
//! external collaborator. Everything in this crate talks to it through the
//! [`AnimationHost`] trait so the control loop can drive any backend.

/// In-memory host used by the demo binary and the test suite
pub mod simulated;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use simulated::{HostCommand, RigDescription, SimulatedHost};

/// Failure reported by an animation host
#[derive(Error, Debug, Clone, PartialEq)]
pub enum HostError {
    /// No animation resource is loaded
    #[error("animation resource not loaded")]
    NotLoaded,

    /// The loaded artboard has no state machine with this name
    #[error("state machine '{0}' not found")]
    UnknownMachine(String),

    /// The state machine has no input with this name and type
    #[error("input '{name}' not found in '{machine}'")]
    UnknownInput {
        /// State machine that was addressed
        machine: String,
        /// Input that was addressed
        name: String,
    },

    /// The host refused the request
    #[error("request rejected: {0}")]
    Rejected(String),
}

/// Result type returned by host operations
pub type HostResult<T> = std::result::Result<T, HostError>;

/// Pointer event phases accepted by the host
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerEventKind {
    /// Pointer pressed
    Down,
    /// Pointer moved
    Move,
    /// Pointer released
    Up,
}

/// Type of a state machine input
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputKind {
    /// Boolean input
    Boolean,
    /// Numeric input
    Number,
    /// Fire-and-forget trigger
    Trigger,
}

/// Artboard bounds in canvas-local units
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CanvasBounds {
    /// Left edge
    pub left: f32,
    /// Top edge
    pub top: f32,
    /// Right edge
    pub right: f32,
    /// Bottom edge
    pub bottom: f32,
}

impl CanvasBounds {
    /// Bounds anchored at the origin
    #[must_use]
    pub const fn from_size(width: f32, height: f32) -> Self {
        Self {
            left: 0.0,
            top: 0.0,
            right: width,
            bottom: height,
        }
    }

    /// Width of the bounds
    #[must_use]
    pub fn width(&self) -> f32 {
        self.right - self.left
    }

    /// Height of the bounds
    #[must_use]
    pub fn height(&self) -> f32 {
        self.bottom - self.top
    }
}

/// Playback notification emitted by the host
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlaybackEvent {
    /// An animation or state machine started playing
    Play,
    /// Playback paused
    Pause,
    /// A looping animation wrapped around
    Loop,
    /// Playback stopped
    Stop,
    /// A state machine entered a new state
    StateChanged {
        /// State machine name
        machine: String,
        /// Name of the state that was entered
        state: String,
    },
}

/// Callback registered for playback notifications
pub type PlaybackListener = Box<dyn Fn(&PlaybackEvent) + Send + Sync>;

/// Handle returned when a playback listener is registered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(pub u64);

/// Operations the control loop needs from an animation engine instance.
///
/// Implementations are shared between the render tick and background loops,
/// so every method takes `&self`.
pub trait AnimationHost: Send + Sync {
    /// Load the animation resource identified by `id`
    fn load_resource(&self, id: &str) -> HostResult<()>;

    /// Set a boolean input of a state machine
    fn set_boolean_input(&self, machine: &str, name: &str, value: bool) -> HostResult<()>;

    /// Set a numeric input of a state machine
    fn set_number_input(&self, machine: &str, name: &str, value: f32) -> HostResult<()>;

    /// Fire a trigger input of a state machine
    fn fire_trigger(&self, machine: &str, name: &str) -> HostResult<()>;

    /// Inject a pointer event at canvas-local coordinates
    fn inject_pointer_event(&self, kind: PointerEventKind, x: f32, y: f32) -> HostResult<()>;

    /// Names of every input exposed by a state machine
    fn list_inputs(&self, machine: &str) -> HostResult<Vec<String>>;

    /// Bounds of the loaded artboard, `None` before a resource is loaded
    fn canvas_bounds(&self) -> Option<CanvasBounds>;

    /// Register a callback for playback notifications
    fn on_playback_state_changed(&self, listener: PlaybackListener) -> ListenerId;

    /// Unregister a callback; unknown ids are ignored
    fn remove_playback_listener(&self, id: ListenerId);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canvas_bounds_size() {
        let bounds = CanvasBounds {
            left: 10.0,
            top: -5.0,
            right: 110.0,
            bottom: 45.0,
        };
        assert_eq!(bounds.width(), 100.0);
        assert_eq!(bounds.height(), 50.0);
        assert_eq!(CanvasBounds::from_size(3.0, 4.0).width(), 3.0);
    }

    #[test]
    fn test_host_error_messages() {
        let err = HostError::UnknownInput {
            machine: "State Machine 1".into(),
            name: "isWinking".into(),
        };
        assert_eq!(err.to_string(), "input 'isWinking' not found in 'State Machine 1'");
        assert_eq!(HostError::NotLoaded.to_string(), "animation resource not loaded");
    }
}
