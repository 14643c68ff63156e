//! Expression controller: typed access to a state machine's inputs.
//!
//! Input updates that fail because the input does not exist are reported as
//! [`Error::InputNotFound`] carrying the names the state machine does expose,
//! looked up before the error is built. Any other host failure maps to
//! [`Error::Forwarding`].

use crate::{
    config::AnimationConfig,
    expression::Expression,
    host::{AnimationHost, HostError},
    Error, Result,
};
use log::{debug, error, warn};

/// Names of the inputs an [`Expression`] is written through
#[derive(Debug, Clone, Copy)]
pub struct ExpressionInputs<'a> {
    /// Numeric input receiving the expression code
    pub selector: &'a str,
    /// Trigger applying the selected expression
    pub trigger: &'a str,
}

impl<'a> ExpressionInputs<'a> {
    /// Input names taken from the animation configuration
    #[must_use]
    pub fn from_config(config: &'a AnimationConfig) -> Self {
        Self {
            selector: &config.expression_selector,
            trigger: &config.expression_trigger,
        }
    }
}

/// Set the expression selector to `expression`'s code, then fire the trigger.
///
/// # Errors
///
/// Returns [`Error::InputNotFound`] when either input is missing and
/// [`Error::Forwarding`] when the host rejects the update.
pub fn apply_expression(
    host: &dyn AnimationHost,
    machine: &str,
    inputs: ExpressionInputs<'_>,
    expression: Expression,
) -> Result<()> {
    debug!("Setting expression to: {} ({})", expression, expression.code());
    set_number(host, machine, inputs.selector, expression.value())?;

    debug!("Firing {}", inputs.trigger);
    fire_trigger(host, machine, inputs.trigger)
}

/// Set a boolean input.
///
/// # Errors
///
/// See [`apply_expression`].
pub fn set_boolean(host: &dyn AnimationHost, machine: &str, input: &str, value: bool) -> Result<()> {
    debug!("Setting {} to: {}", input, value);
    host.set_boolean_input(machine, input, value)
        .map_err(|e| input_error(host, machine, input, e))
}

/// Set a numeric input.
///
/// # Errors
///
/// See [`apply_expression`].
pub fn set_number(host: &dyn AnimationHost, machine: &str, input: &str, value: f32) -> Result<()> {
    debug!("Setting {} to {}", input, value);
    host.set_number_input(machine, input, value)
        .map_err(|e| input_error(host, machine, input, e))
}

/// Fire a trigger input.
///
/// # Errors
///
/// See [`apply_expression`].
pub fn fire_trigger(host: &dyn AnimationHost, machine: &str, input: &str) -> Result<()> {
    host.fire_trigger(machine, input)
        .map_err(|e| input_error(host, machine, input, e))
}

/// Names of every input the state machine exposes.
///
/// Never fails: an unloaded resource or unknown machine yields an empty list.
#[must_use]
pub fn list_inputs(host: &dyn AnimationHost, machine: &str) -> Vec<String> {
    match host.list_inputs(machine) {
        Ok(inputs) => inputs,
        Err(HostError::NotLoaded) => {
            error!("Animation resource not loaded.");
            Vec::new()
        }
        Err(e) => {
            error!("Failed to list inputs of '{}': {}", machine, e);
            Vec::new()
        }
    }
}

fn input_error(host: &dyn AnimationHost, machine: &str, input: &str, source: HostError) -> Error {
    match source {
        HostError::UnknownInput { .. } | HostError::UnknownMachine(_) => {
            let available = list_inputs(host, machine);
            warn!(
                "Input '{}' not found in '{}'. Available: {}",
                input,
                machine,
                available.join(", ")
            );
            Error::InputNotFound {
                input: input.to_string(),
                machine: machine.to_string(),
                available,
            }
        }
        other => Error::Forwarding(format!("Failed to update '{input}' in '{machine}': {other}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::{
        BLINK_INPUT, DEFAULT_RESOURCE_ID, DEFAULT_STATE_MACHINE, EXPRESSION_SELECTOR_INPUT, EXPRESSION_TRIGGER_INPUT,
    };
    use crate::host::{HostCommand, SimulatedHost};

    const INPUTS: ExpressionInputs<'static> = ExpressionInputs {
        selector: EXPRESSION_SELECTOR_INPUT,
        trigger: EXPRESSION_TRIGGER_INPUT,
    };

    fn loaded_host() -> SimulatedHost {
        let host = SimulatedHost::new();
        host.load_resource(DEFAULT_RESOURCE_ID).unwrap();
        host.clear_commands();
        host
    }

    #[test]
    fn test_apply_happy_sets_then_fires_once() {
        let host = loaded_host();
        apply_expression(&host, DEFAULT_STATE_MACHINE, INPUTS, Expression::Happy).unwrap();

        assert_eq!(
            host.commands(),
            vec![
                HostCommand::SetNumber {
                    machine: DEFAULT_STATE_MACHINE.into(),
                    name: EXPRESSION_SELECTOR_INPUT.into(),
                    value: 6.0,
                },
                HostCommand::FireTrigger {
                    machine: DEFAULT_STATE_MACHINE.into(),
                    name: EXPRESSION_TRIGGER_INPUT.into(),
                },
            ]
        );
    }

    #[test]
    fn test_missing_input_reports_available() {
        let host = loaded_host();
        let err = set_boolean(&host, DEFAULT_STATE_MACHINE, "isWinking", true).unwrap_err();
        match err {
            Error::InputNotFound {
                input,
                machine,
                available,
            } => {
                assert_eq!(input, "isWinking");
                assert_eq!(machine, DEFAULT_STATE_MACHINE);
                assert!(available.contains(&BLINK_INPUT.to_string()));
            }
            other => panic!("Expected InputNotFound, got {other:?}"),
        }
    }

    #[test]
    fn test_unloaded_host_is_forwarding_error() {
        let host = SimulatedHost::new();
        let err = set_number(&host, DEFAULT_STATE_MACHINE, EXPRESSION_SELECTOR_INPUT, 1.0).unwrap_err();
        assert!(matches!(err, Error::Forwarding(_)));
    }

    #[test]
    fn test_list_inputs_never_fails() {
        let host = SimulatedHost::new();
        assert!(list_inputs(&host, DEFAULT_STATE_MACHINE).is_empty());
        host.load_resource(DEFAULT_RESOURCE_ID).unwrap();
        assert_eq!(list_inputs(&host, DEFAULT_STATE_MACHINE).len(), 4);
        assert!(list_inputs(&host, "Missing Machine").is_empty());
    }

    #[test]
    fn test_missing_selector_stops_before_trigger() {
        let host = loaded_host();
        let inputs = ExpressionInputs {
            selector: "expressionSelector",
            trigger: EXPRESSION_TRIGGER_INPUT,
        };
        let result = apply_expression(&host, DEFAULT_STATE_MACHINE, inputs, Expression::Normal);
        assert!(matches!(result, Err(Error::InputNotFound { .. })));
        assert!(host.commands().is_empty());
    }
}
