//! Control loop for an animated virtual agent face.
//!
//! This library drives an animation engine's state machine from:
//! - discrete facial expressions selected by the user
//! - a randomized double-blink timer
//! - a simulated gaze target swept across the screen
//!
//! The animation engine is an external collaborator reached through the
//! [`host::AnimationHost`] trait; [`host::SimulatedHost`] is an in-memory
//! implementation used by the demo binary and the tests.
//!
//! The pipeline per session consists of:
//! 1. Loading the animation resource and waiting for first playback
//! 2. Spawning the blink, gaze and memory loops into one task scope
//! 3. Pushing the blink flag into the state machine on every rendered frame
//! 4. Mapping gaze targets from screen to canvas coordinates
//!
//! # Examples
//!
//! ## Coordinate Transform
//!
//! ```
//! use virtual_agent_face::transform::{compute_transform, is_stale, screen_to_canvas};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! // 500x500 artboard inside a 1080x1920 view
//! let params = compute_transform(500.0, 500.0, 0.0, 0.0, 1080, 1920)?;
//! assert_eq!(params.offset_x, 0.0);
//!
//! // The top-left corner of the fitted content is the canvas origin
//! let (x, y) = screen_to_canvas(&params, params.offset_x, params.offset_y);
//! assert_eq!((x, y), (0.0, 0.0));
//!
//! // A rotated view invalidates the parameters
//! assert!(is_stale(&params, 1920, 1080));
//! # Ok(())
//! # }
//! ```
//!
//! ## Expressions
//!
//! ```
//! use virtual_agent_face::{
//!     controller::{apply_expression, ExpressionInputs},
//!     expression::Expression,
//!     host::{AnimationHost, SimulatedHost},
//! };
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let host = SimulatedHost::new();
//! host.load_resource("character_facial_animation")?;
//!
//! let inputs = ExpressionInputs {
//!     selector: "facialExpressionSelector",
//!     trigger: "facialExpressionTrigger",
//! };
//! apply_expression(&host, "State Machine 1", inputs, "happy".parse::<Expression>()?)?;
//! assert_eq!(host.number_input("State Machine 1", "facialExpressionSelector"), Some(6.0));
//! # Ok(())
//! # }
//! ```
//!
//! ## Complete Session
//!
//! ```no_run
//! use std::sync::Arc;
//! use virtual_agent_face::{agent::AgentSession, config::Config, expression::Expression, host::SimulatedHost};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Config::default();
//! let frame = config.view.frame_interval();
//! let mut session = AgentSession::new(Arc::new(SimulatedHost::new()), config)?;
//! session.start();
//! session.select_expression(Expression::LittleHappy)?;
//!
//! let mut ticker = tokio::time::interval(frame);
//! for _ in 0..300 {
//!     ticker.tick().await;
//!     session.tick();
//! }
//!
//! session.shutdown().await;
//! # Ok(())
//! # }
//! ```

/// Screen to canvas coordinate transform
pub mod transform;

/// Facial expression values
pub mod expression;

/// State machine input helpers with diagnostics
pub mod controller;

/// Animation host boundary and simulated host
pub mod host;

/// Randomized double-blink scheduling
pub mod blink;

/// Simulated gaze producer and consumer loops
pub mod gaze;

/// Periodic memory report
pub mod memory;

/// Face-presence signal from the camera pipeline
pub mod presence;

/// Cancellable task scope for background loops
pub mod scope;

/// Agent session hosting the face
pub mod agent;

/// Error types and result handling
pub mod error;

/// Constants used throughout the crate
pub mod constants;

/// Configuration management
pub mod config;

pub use error::{Error, Result};
