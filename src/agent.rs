//! Agent session: the component hosting the animated face.
//!
//! The session owns the animation host, the observable state written by the
//! background loops, and the [`TaskScope`] those loops live in. The hosting
//! view layer calls [`AgentSession::tick`] once per rendered frame.

use crate::{
    blink::BlinkScheduler,
    config::Config,
    controller::{self, ExpressionInputs},
    expression::Expression,
    gaze::{self, AnimationSwitch, SweepGenerator, TargetPosition},
    host::{AnimationHost, ListenerId, PlaybackEvent},
    memory::{MemoryMonitor, MemoryStatus},
    presence::FacePresence,
    scope::TaskScope,
    transform::ViewGeometry,
    Error, Result,
};
use log::{debug, error, info, warn};
use rand::{rngs::StdRng, SeedableRng};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::watch;

/// Running agent face
pub struct AgentSession {
    host: Arc<dyn AnimationHost>,
    config: Config,
    expression: Expression,
    switch: AnimationSwitch,
    artboard_initialized: Arc<AtomicBool>,
    listener: ListenerId,
    blink_tx: Option<watch::Sender<bool>>,
    blink: watch::Receiver<bool>,
    view: watch::Sender<ViewGeometry>,
    memory_tx: Option<watch::Sender<MemoryStatus>>,
    memory: watch::Receiver<MemoryStatus>,
    presence: FacePresence,
    scope: TaskScope,
}

impl AgentSession {
    /// Load the configured resource into `host` and prepare the session.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigError`] for an invalid configuration and
    /// [`Error::Forwarding`] when the host cannot load the resource.
    pub fn new(host: Arc<dyn AnimationHost>, config: Config) -> Result<Self> {
        config.validate()?;
        info!("Initializing agent session for '{}'", config.animation.resource_id);

        let artboard_initialized = Arc::new(AtomicBool::new(false));
        let initialized = Arc::clone(&artboard_initialized);
        let listener = host.on_playback_state_changed(Box::new(move |event: &PlaybackEvent| match event {
            PlaybackEvent::Play => {
                if !initialized.swap(true, Ordering::AcqRel) {
                    info!("First playback started, artboard initialized");
                }
            }
            PlaybackEvent::StateChanged { machine, state } => {
                debug!("State changed: {} -> {}", machine, state);
            }
            _ => {}
        }));

        if let Err(e) = host.load_resource(&config.animation.resource_id) {
            host.remove_playback_listener(listener);
            return Err(Error::Forwarding(format!(
                "Failed to load '{}': {e}",
                config.animation.resource_id
            )));
        }

        let (blink_tx, blink) = watch::channel(false);
        let (view, _) = watch::channel(config.view.geometry());
        let (memory_tx, memory) = watch::channel(MemoryStatus::Started);

        Ok(Self {
            host,
            switch: AnimationSwitch::new(config.gaze.start_animating),
            config,
            expression: Expression::default(),
            artboard_initialized,
            listener,
            blink_tx: Some(blink_tx),
            blink,
            view,
            memory_tx: Some(memory_tx),
            memory,
            presence: FacePresence::new(),
            scope: TaskScope::new(),
        })
    }

    /// Spawn the background loops on the current tokio runtime.
    ///
    /// Calling this more than once has no effect.
    pub fn start(&mut self) {
        let Some(blink_tx) = self.blink_tx.take() else {
            warn!("Agent session already started");
            return;
        };

        let machine = &self.config.animation.state_machine;
        if let Some(active) = &self.config.animation.active_input {
            if let Err(e) = controller::set_boolean(self.host.as_ref(), machine, active, true) {
                warn!("Could not activate rig: {}", e);
            }
        }

        let blink = BlinkScheduler::from_config(&self.config.blink);
        let signal = self.scope.signal();
        self.scope
            .spawn("blink scheduler", blink.run(StdRng::from_entropy(), blink_tx, signal));

        if self.config.gaze.enabled {
            let (target_tx, target_rx) = watch::channel(TargetPosition::default());
            let sweep = SweepGenerator::new(
                self.config.view.screen_width,
                self.config.view.screen_height,
                self.config.gaze.step,
            );
            let signal = self.scope.signal();
            self.scope.spawn(
                "gaze producer",
                gaze::run_producer(sweep, self.config.gaze.tick(), self.switch.clone(), target_tx, signal),
            );
            let signal = self.scope.signal();
            self.scope.spawn(
                "gaze consumer",
                gaze::run_consumer(
                    Arc::clone(&self.host),
                    target_rx,
                    self.view.subscribe(),
                    self.switch.clone(),
                    self.config.gaze.cooldown(),
                    signal,
                ),
            );
        }

        if let Some(memory_tx) = self.memory_tx.take().filter(|_| self.config.memory.enabled) {
            let signal = self.scope.signal();
            self.scope.spawn(
                "memory monitor",
                MemoryMonitor::new().run(self.config.memory.interval(), memory_tx, signal),
            );
        }

        info!("Agent session started with {} background loop(s)", self.scope.len());
    }

    /// Push the blink flag into the state machine; called once per frame.
    ///
    /// Failures are logged and never interrupt rendering.
    pub fn tick(&self) {
        let double = *self.blink.borrow();
        if let Err(e) = controller::set_boolean(
            self.host.as_ref(),
            &self.config.animation.state_machine,
            &self.config.animation.blink_input,
            double,
        ) {
            error!("State update error: {}", e);
        }
    }

    /// Select and apply an expression.
    ///
    /// The selection is recorded even if the host rejects it.
    ///
    /// # Errors
    ///
    /// See [`controller::apply_expression`].
    pub fn select_expression(&mut self, expression: Expression) -> Result<()> {
        self.expression = expression;
        controller::apply_expression(
            self.host.as_ref(),
            &self.config.animation.state_machine,
            ExpressionInputs::from_config(&self.config.animation),
            expression,
        )
        .map_err(|e| {
            error!("Expression change error: {}", e);
            e
        })
    }

    /// Currently selected expression
    #[must_use]
    pub const fn expression(&self) -> Expression {
        self.expression
    }

    /// Status text for the selected expression
    #[must_use]
    pub fn expression_label(&self) -> String {
        format!(
            "Selected Expression: {} (ID = {})",
            self.expression,
            self.expression.code()
        )
    }

    /// Latest blink decision
    #[must_use]
    pub fn blink_flag(&self) -> bool {
        *self.blink.borrow()
    }

    /// Whether the gaze animation is running
    #[must_use]
    pub fn is_animating(&self) -> bool {
        self.switch.is_enabled()
    }

    /// Start or stop the gaze animation
    pub fn set_animating(&self, enabled: bool) {
        self.switch.set(enabled);
        info!("Gaze animation {}", if enabled { "resumed" } else { "stopped" });
    }

    /// Flip the gaze animation, returning the new state
    pub fn toggle_animation(&self) -> bool {
        let enabled = self.switch.toggle();
        info!("Gaze animation {}", if enabled { "resumed" } else { "stopped" });
        enabled
    }

    /// Publish a new view layout; the gaze consumer recomputes its transform
    pub fn resize(&self, geometry: ViewGeometry) {
        debug!("View resized to {}x{}", geometry.width, geometry.height);
        self.view.send_replace(geometry);
    }

    /// Current view layout
    #[must_use]
    pub fn view(&self) -> ViewGeometry {
        *self.view.borrow()
    }

    /// Latest memory monitor state
    #[must_use]
    pub fn memory_status(&self) -> MemoryStatus {
        *self.memory.borrow()
    }

    /// Face-presence signal fed by the camera pipeline
    #[must_use]
    pub const fn presence(&self) -> &FacePresence {
        &self.presence
    }

    /// Whether the host has started playing the loaded artboard
    #[must_use]
    pub fn is_artboard_initialized(&self) -> bool {
        self.artboard_initialized.load(Ordering::Acquire)
    }

    /// Inputs exposed by the configured state machine
    #[must_use]
    pub fn available_inputs(&self) -> Vec<String> {
        controller::list_inputs(self.host.as_ref(), &self.config.animation.state_machine)
    }

    /// Session configuration
    #[must_use]
    pub const fn config(&self) -> &Config {
        &self.config
    }

    /// Cancel every background loop and wait for them to exit
    pub async fn shutdown(&mut self) {
        info!("Agent session shutting down");
        self.scope.shutdown().await;
    }
}

impl Drop for AgentSession {
    fn drop(&mut self) {
        self.host.remove_playback_listener(self.listener);
    }
}
