//! In-memory animation host.
//!
//! Models the subset of an animation runtime the control loop touches: a set
//! of named rigs (artboard bounds plus state machines with typed inputs), the
//! current input values and a log of every command received. Pointer events
//! can be made to fail on demand to exercise the gaze cool-down path.

use super::{
    AnimationHost, CanvasBounds, HostError, HostResult, InputKind, ListenerId, PlaybackEvent, PlaybackListener,
    PointerEventKind,
};
use crate::{
    constants::{
        ACTIVE_INPUT, BLINK_INPUT, DEFAULT_RESOURCE_ID, DEFAULT_STATE_MACHINE, EXPRESSION_SELECTOR_INPUT,
        EXPRESSION_TRIGGER_INPUT,
    },
    Error, Result,
};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Input declared by a state machine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputDescription {
    /// Input name
    pub name: String,
    /// Input type
    pub kind: InputKind,
}

/// State machine declared by a rig
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MachineDescription {
    /// State machine name
    pub name: String,
    /// Declared inputs
    #[serde(default)]
    pub inputs: Vec<InputDescription>,
}

/// Artboard and state machines of one animation resource
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RigDescription {
    /// Artboard bounds
    pub canvas: CanvasBounds,
    /// State machines on the artboard
    pub machines: Vec<MachineDescription>,
}

impl Default for RigDescription {
    fn default() -> Self {
        let input = |name: &str, kind| InputDescription {
            name: name.to_string(),
            kind,
        };
        Self {
            canvas: CanvasBounds::from_size(500.0, 500.0),
            machines: vec![MachineDescription {
                name: DEFAULT_STATE_MACHINE.to_string(),
                inputs: vec![
                    input(EXPRESSION_SELECTOR_INPUT, InputKind::Number),
                    input(EXPRESSION_TRIGGER_INPUT, InputKind::Trigger),
                    input(BLINK_INPUT, InputKind::Boolean),
                    input(ACTIVE_INPUT, InputKind::Boolean),
                ],
            }],
        }
    }
}

impl RigDescription {
    /// Load a rig description from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| Error::IoError(e.to_string()))?;

        serde_yaml::from_str(&content).map_err(|e| Error::ConfigError(format!("Failed to parse rig: {e}")))
    }

    fn machine(&self, name: &str) -> Option<&MachineDescription> {
        self.machines.iter().find(|machine| machine.name == name)
    }
}

/// Command received by the simulated host, in arrival order
#[derive(Debug, Clone, PartialEq)]
pub enum HostCommand {
    /// `load_resource`
    LoadResource(String),
    /// `set_boolean_input`
    SetBoolean {
        /// State machine
        machine: String,
        /// Input name
        name: String,
        /// New value
        value: bool,
    },
    /// `set_number_input`
    SetNumber {
        /// State machine
        machine: String,
        /// Input name
        name: String,
        /// New value
        value: f32,
    },
    /// `fire_trigger`
    FireTrigger {
        /// State machine
        machine: String,
        /// Trigger name
        name: String,
    },
    /// `inject_pointer_event`
    Pointer {
        /// Event phase
        kind: PointerEventKind,
        /// Canvas x
        x: f32,
        /// Canvas y
        y: f32,
    },
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum InputValue {
    Boolean(bool),
    Number(f32),
}

#[derive(Default)]
struct SimState {
    rigs: HashMap<String, RigDescription>,
    loaded: Option<RigDescription>,
    values: HashMap<(String, String), InputValue>,
    log: Vec<HostCommand>,
    pointer_failures: usize,
}

impl SimState {
    fn check_input(&self, machine: &str, name: &str, kind: InputKind) -> HostResult<()> {
        let rig = self.loaded.as_ref().ok_or(HostError::NotLoaded)?;
        let description = rig
            .machine(machine)
            .ok_or_else(|| HostError::UnknownMachine(machine.to_string()))?;
        if description.inputs.iter().any(|input| input.name == name && input.kind == kind) {
            Ok(())
        } else {
            Err(HostError::UnknownInput {
                machine: machine.to_string(),
                name: name.to_string(),
            })
        }
    }
}

/// Animation host backed by in-memory rig descriptions
pub struct SimulatedHost {
    state: Mutex<SimState>,
    listeners: Mutex<Vec<(ListenerId, PlaybackListener)>>,
    next_listener: AtomicU64,
}

impl Default for SimulatedHost {
    fn default() -> Self {
        Self::new()
    }
}

impl SimulatedHost {
    /// Host knowing the default facial animation rig, nothing loaded yet
    #[must_use]
    pub fn new() -> Self {
        Self::with_rig(DEFAULT_RESOURCE_ID, RigDescription::default())
    }

    /// Host knowing a single rig under `id`
    #[must_use]
    pub fn with_rig(id: &str, rig: RigDescription) -> Self {
        let mut state = SimState::default();
        state.rigs.insert(id.to_string(), rig);
        Self {
            state: Mutex::new(state),
            listeners: Mutex::new(Vec::new()),
            next_listener: AtomicU64::new(0),
        }
    }

    fn state(&self) -> MutexGuard<'_, SimState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Register an additional rig
    pub fn add_rig(&self, id: &str, rig: RigDescription) {
        self.state().rigs.insert(id.to_string(), rig);
    }

    /// Unload the current resource, dropping all input values
    pub fn unload(&self) {
        let mut state = self.state();
        state.loaded = None;
        state.values.clear();
    }

    /// Whether a resource is loaded
    pub fn is_loaded(&self) -> bool {
        self.state().loaded.is_some()
    }

    /// Make the next `count` pointer events fail
    pub fn fail_next_pointer_events(&self, count: usize) {
        self.state().pointer_failures = count;
    }

    /// Every command received so far
    pub fn commands(&self) -> Vec<HostCommand> {
        self.state().log.clone()
    }

    /// Pointer events received so far as `(x, y)` pairs
    pub fn pointer_moves(&self) -> Vec<(f32, f32)> {
        self.state()
            .log
            .iter()
            .filter_map(|command| match command {
                HostCommand::Pointer {
                    kind: PointerEventKind::Move,
                    x,
                    y,
                } => Some((*x, *y)),
                _ => None,
            })
            .collect()
    }

    /// Forget recorded commands
    pub fn clear_commands(&self) {
        self.state().log.clear();
    }

    /// Current value of a boolean input
    pub fn boolean_input(&self, machine: &str, name: &str) -> Option<bool> {
        match self.state().values.get(&(machine.to_string(), name.to_string())) {
            Some(InputValue::Boolean(value)) => Some(*value),
            _ => None,
        }
    }

    /// Current value of a numeric input
    pub fn number_input(&self, machine: &str, name: &str) -> Option<f32> {
        match self.state().values.get(&(machine.to_string(), name.to_string())) {
            Some(InputValue::Number(value)) => Some(*value),
            _ => None,
        }
    }

    /// Deliver a playback notification to every listener
    pub fn emit(&self, event: &PlaybackEvent) {
        for (_, listener) in self.listeners().iter() {
            listener(event);
        }
    }

    /// Number of registered playback listeners
    pub fn listener_count(&self) -> usize {
        self.listeners().len()
    }

    fn listeners(&self) -> MutexGuard<'_, Vec<(ListenerId, PlaybackListener)>> {
        self.listeners.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl AnimationHost for SimulatedHost {
    fn load_resource(&self, id: &str) -> HostResult<()> {
        {
            let mut state = self.state();
            let rig = state
                .rigs
                .get(id)
                .cloned()
                .ok_or_else(|| HostError::Rejected(format!("unknown resource '{id}'")))?;
            info!(
                "Loaded resource '{}' ({} state machine(s), canvas {}x{})",
                id,
                rig.machines.len(),
                rig.canvas.width(),
                rig.canvas.height()
            );
            state.loaded = Some(rig);
            state.values.clear();
            state.log.push(HostCommand::LoadResource(id.to_string()));
        }
        // Loaded rigs autoplay.
        self.emit(&PlaybackEvent::Play);
        Ok(())
    }

    fn set_boolean_input(&self, machine: &str, name: &str, value: bool) -> HostResult<()> {
        let mut state = self.state();
        state.check_input(machine, name, InputKind::Boolean)?;
        state
            .values
            .insert((machine.to_string(), name.to_string()), InputValue::Boolean(value));
        state.log.push(HostCommand::SetBoolean {
            machine: machine.to_string(),
            name: name.to_string(),
            value,
        });
        Ok(())
    }

    fn set_number_input(&self, machine: &str, name: &str, value: f32) -> HostResult<()> {
        let mut state = self.state();
        state.check_input(machine, name, InputKind::Number)?;
        state
            .values
            .insert((machine.to_string(), name.to_string()), InputValue::Number(value));
        state.log.push(HostCommand::SetNumber {
            machine: machine.to_string(),
            name: name.to_string(),
            value,
        });
        Ok(())
    }

    fn fire_trigger(&self, machine: &str, name: &str) -> HostResult<()> {
        let mut state = self.state();
        state.check_input(machine, name, InputKind::Trigger)?;
        state.log.push(HostCommand::FireTrigger {
            machine: machine.to_string(),
            name: name.to_string(),
        });
        Ok(())
    }

    fn inject_pointer_event(&self, kind: PointerEventKind, x: f32, y: f32) -> HostResult<()> {
        let mut state = self.state();
        if state.loaded.is_none() {
            return Err(HostError::NotLoaded);
        }
        if state.pointer_failures > 0 {
            state.pointer_failures -= 1;
            return Err(HostError::Rejected("pointer event dropped".to_string()));
        }
        debug!("Pointer {:?} at ({:.1}, {:.1})", kind, x, y);
        state.log.push(HostCommand::Pointer { kind, x, y });
        Ok(())
    }

    fn list_inputs(&self, machine: &str) -> HostResult<Vec<String>> {
        let state = self.state();
        let rig = state.loaded.as_ref().ok_or(HostError::NotLoaded)?;
        let description = rig
            .machine(machine)
            .ok_or_else(|| HostError::UnknownMachine(machine.to_string()))?;
        Ok(description.inputs.iter().map(|input| input.name.clone()).collect())
    }

    fn canvas_bounds(&self) -> Option<CanvasBounds> {
        self.state().loaded.as_ref().map(|rig| rig.canvas)
    }

    fn on_playback_state_changed(&self, listener: PlaybackListener) -> ListenerId {
        let id = ListenerId(self.next_listener.fetch_add(1, Ordering::Relaxed));
        self.listeners().push((id, listener));
        id
    }

    fn remove_playback_listener(&self, id: ListenerId) {
        self.listeners().retain(|(registered, _)| *registered != id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[test]
    fn test_inputs_require_loaded_resource() {
        let host = SimulatedHost::new();
        assert_eq!(
            host.set_boolean_input(DEFAULT_STATE_MACHINE, BLINK_INPUT, true),
            Err(HostError::NotLoaded)
        );
        host.load_resource(DEFAULT_RESOURCE_ID).unwrap();
        host.set_boolean_input(DEFAULT_STATE_MACHINE, BLINK_INPUT, true).unwrap();
        assert_eq!(host.boolean_input(DEFAULT_STATE_MACHINE, BLINK_INPUT), Some(true));
    }

    #[test]
    fn test_input_type_is_checked() {
        let host = SimulatedHost::new();
        host.load_resource(DEFAULT_RESOURCE_ID).unwrap();
        let result = host.set_boolean_input(DEFAULT_STATE_MACHINE, EXPRESSION_SELECTOR_INPUT, true);
        assert!(matches!(result, Err(HostError::UnknownInput { .. })));
        let result = host.fire_trigger("Other Machine", EXPRESSION_TRIGGER_INPUT);
        assert_eq!(result, Err(HostError::UnknownMachine("Other Machine".into())));
    }

    #[test]
    fn test_load_emits_play() {
        let host = SimulatedHost::new();
        let plays = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&plays);
        let id = host.on_playback_state_changed(Box::new(move |event: &PlaybackEvent| {
            if *event == PlaybackEvent::Play {
                counter.fetch_add(1, Ordering::SeqCst);
            }
        }));
        host.load_resource(DEFAULT_RESOURCE_ID).unwrap();
        assert_eq!(plays.load(Ordering::SeqCst), 1);
        assert!(host.load_resource("missing").is_err());

        host.remove_playback_listener(id);
        assert_eq!(host.listener_count(), 0);
        host.load_resource(DEFAULT_RESOURCE_ID).unwrap();
        assert_eq!(plays.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_pointer_failures_are_consumed() {
        let host = SimulatedHost::new();
        host.load_resource(DEFAULT_RESOURCE_ID).unwrap();
        host.fail_next_pointer_events(1);
        assert!(host.inject_pointer_event(PointerEventKind::Move, 1.0, 2.0).is_err());
        host.inject_pointer_event(PointerEventKind::Move, 3.0, 4.0).unwrap();
        assert_eq!(host.pointer_moves(), vec![(3.0, 4.0)]);
    }

    #[test]
    fn test_rig_yaml_roundtrip() {
        let yaml = serde_yaml::to_string(&RigDescription::default()).unwrap();
        let parsed: RigDescription = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(parsed, RigDescription::default());
    }
}
