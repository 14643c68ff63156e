//! Simulated gaze tracking.
//!
//! Two loops share one `watch` channel holding the latest [`TargetPosition`]:
//!
//! - the producer sweeps a target horizontally across the screen at a fixed
//!   cadence, overwriting whatever the consumer has not read yet;
//! - the consumer wakes on each publish, reads only the newest target, maps
//!   it into canvas coordinates and injects a pointer-move event.
//!
//! Intermediate targets are dropped, never queued. A rejected pointer event
//! pauses the consumer for a cool-down before it resumes with the newest
//! target.

use crate::{
    host::{AnimationHost, PointerEventKind},
    scope::ShutdownSignal,
    transform::{screen_to_canvas, TransformCache, ViewGeometry},
    Error, Result,
};
use log::{debug, info, warn};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;

/// Gaze target in screen pixels
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TargetPosition {
    /// Screen x
    pub x: f32,
    /// Screen y
    pub y: f32,
}

impl TargetPosition {
    /// Target at `(x, y)`
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Shared on/off switch for the gaze animation
#[derive(Debug, Clone)]
pub struct AnimationSwitch(Arc<AtomicBool>);

impl AnimationSwitch {
    /// Switch in the given state
    #[must_use]
    pub fn new(enabled: bool) -> Self {
        Self(Arc::new(AtomicBool::new(enabled)))
    }

    /// Whether the animation is running
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }

    /// Turn the animation on or off
    pub fn set(&self, enabled: bool) {
        self.0.store(enabled, Ordering::Release);
    }

    /// Flip the switch, returning the new state
    pub fn toggle(&self) -> bool {
        !self.0.fetch_xor(true, Ordering::AcqRel)
    }
}

/// Horizontal back-and-forth sweep across the screen
#[derive(Debug, Clone, PartialEq)]
pub struct SweepGenerator {
    x: f32,
    direction: f32,
    step: f32,
    screen_width: f32,
    y: f32,
}

impl SweepGenerator {
    /// Sweep starting at the left edge, vertically centred
    #[must_use]
    #[allow(clippy::cast_precision_loss)] // Screen sizes are far below f32 precision limits
    pub fn new(screen_width: u32, screen_height: u32, step: f32) -> Self {
        Self {
            x: 0.0,
            direction: 1.0,
            step,
            screen_width: screen_width as f32,
            y: screen_height as f32 / 2.0,
        }
    }

    /// Current direction (`1.0` rightwards, `-1.0` leftwards)
    #[must_use]
    pub const fn direction(&self) -> f32 {
        self.direction
    }

    /// Advance one step and return the new target.
    ///
    /// The direction flips once the target has passed an edge, so the
    /// returned x may overshoot the screen by at most one step.
    pub fn advance(&mut self) -> TargetPosition {
        self.x += self.direction * self.step;
        if self.x > self.screen_width || self.x < 0.0 {
            self.direction = -self.direction;
        }
        TargetPosition::new(self.x, self.y)
    }
}

/// Producer loop: publish a new sweep target every `tick` while enabled
pub async fn run_producer(
    mut sweep: SweepGenerator,
    tick: Duration,
    switch: AnimationSwitch,
    target: watch::Sender<TargetPosition>,
    mut shutdown: ShutdownSignal,
) {
    info!("Gaze producer running every {:?}", tick);
    loop {
        tokio::select! {
            biased;
            () = shutdown.cancelled() => break,
            () = tokio::time::sleep(tick) => {}
        }
        if !switch.is_enabled() {
            continue;
        }
        target.send_replace(sweep.advance());
    }
    debug!("Gaze producer stopped");
}

/// Map a screen target into canvas coordinates and inject a pointer move.
///
/// # Errors
///
/// Returns [`Error::TransformUnavailable`] when the view or canvas is not
/// ready and [`Error::Forwarding`] when the host rejects the event.
pub fn forward_target(
    host: &dyn AnimationHost,
    cache: &mut TransformCache,
    view: &ViewGeometry,
    target: TargetPosition,
) -> Result<()> {
    let params = cache.resolve(host, view)?;
    let (x_view, y_view) = view.screen_to_view(target.x, target.y);
    let (x, y) = screen_to_canvas(&params, x_view, y_view);
    host.inject_pointer_event(PointerEventKind::Move, x, y)
        .map_err(|e| Error::Forwarding(format!("Pointer move to ({x:.1}, {y:.1}) failed: {e}")))
}

/// Consumer loop: forward only the newest target to the host.
///
/// Stops when `shutdown` fires or the producer side is dropped.
pub async fn run_consumer(
    host: Arc<dyn AnimationHost>,
    mut targets: watch::Receiver<TargetPosition>,
    view: watch::Receiver<ViewGeometry>,
    switch: AnimationSwitch,
    cooldown: Duration,
    mut shutdown: ShutdownSignal,
) {
    info!("Gaze consumer running (cool-down {:?})", cooldown);
    let mut cache = TransformCache::new();
    loop {
        tokio::select! {
            biased;
            () = shutdown.cancelled() => break,
            changed = targets.changed() => {
                if changed.is_err() {
                    break;
                }
            }
        }

        let target = *targets.borrow_and_update();
        if !switch.is_enabled() {
            continue;
        }

        let geometry = *view.borrow();
        match forward_target(host.as_ref(), &mut cache, &geometry, target) {
            Ok(()) => {}
            Err(Error::TransformUnavailable(reason)) => {
                debug!("Gaze update deferred: {}", reason);
            }
            Err(e) => {
                warn!("Gaze update failed, pausing for {:?}: {}", cooldown, e);
                tokio::select! {
                    biased;
                    () = shutdown.cancelled() => break,
                    () = tokio::time::sleep(cooldown) => {}
                }
            }
        }
    }
    debug!("Gaze consumer stopped");
}
