//! Error handling tests for all modules


use test_helpers::MACHINE;
use virtual_agent_face::{
    controller::{self, ExpressionInputs},
    error::{AppError, Result},
    expression::Expression,
    host::{AnimationHost, PointerEventKind, SimulatedHost},
    transform::{compute_transform, TransformCache, ViewGeometry},
};

#[test]
fn test_transform_errors() {
    // Non-positive canvas
    let result = compute_transform(0.0, 500.0, 0.0, 0.0, 100, 100);
    assert!(matches!(result, Err(AppError::InvalidInput(_))));

    let result = compute_transform(f32::NAN, 500.0, 0.0, 0.0, 100, 100);
    assert!(matches!(result, Err(AppError::InvalidInput(_))));

    // View not laid out
    let result = compute_transform(500.0, 500.0, 0.0, 0.0, 0, 100);
    match result {
        Err(e @ AppError::TransformUnavailable(_)) => assert!(e.is_transient()),
        other => panic!("Expected TransformUnavailable, got {other:?}"),
    }
}

#[test]
fn test_cache_without_canvas() {
    let host = SimulatedHost::new();
    let mut cache = TransformCache::new();
    let view = ViewGeometry::new(0.0, 0.0, 100, 100);

    assert!(matches!(
        cache.resolve(&host, &view),
        Err(AppError::TransformUnavailable(_))
    ));
    assert!(cache.params().is_none());
}

#[test]
fn test_unloaded_host_errors() {
    let host = SimulatedHost::new();

    // Nothing loaded: forwarding failures, and an empty input list
    let result = controller::set_boolean(&host, MACHINE, "isBlinkTwice", true);
    assert!(matches!(result, Err(AppError::Forwarding(_))));
    assert!(controller::list_inputs(&host, MACHINE).is_empty());
    assert!(host.inject_pointer_event(PointerEventKind::Move, 1.0, 1.0).is_err());
}

#[test]
fn test_unknown_machine_reports_empty_inputs() {
    let host = SimulatedHost::new();
    host.load_resource("character_facial_animation").unwrap();

    let inputs = ExpressionInputs {
        selector: "facialExpressionSelector",
        trigger: "facialExpressionTrigger",
    };
    match controller::apply_expression(&host, "State Machine 2", inputs, Expression::Happy) {
        Err(AppError::InputNotFound { machine, available, .. }) => {
            assert_eq!(machine, "State Machine 2");
            assert!(available.is_empty());
        }
        other => panic!("Expected InputNotFound, got {other:?}"),
    }
}

#[test]
fn test_wrong_input_type_is_not_found() {
    let host = SimulatedHost::new();
    host.load_resource("character_facial_animation").unwrap();

    // The selector is numeric, so a boolean write cannot find it
    let err = controller::set_boolean(&host, MACHINE, "facialExpressionSelector", true).unwrap_err();
    let message = err.to_string();
    assert!(message.starts_with("Input 'facialExpressionSelector' not found in 'State Machine 1'"));
    assert!(message.contains("isBlinkTwice"));
    assert!(!err.is_transient());
}

#[test]
fn test_expression_parse_errors() {
    assert!(matches!("7".parse::<Expression>(), Err(AppError::InvalidInput(_))));
    assert!(matches!("grumpy".parse::<Expression>(), Err(AppError::InvalidInput(_))));
    assert_eq!("Little-Angry".parse::<Expression>().unwrap(), Expression::LittleAngry);
    assert_eq!("0".parse::<Expression>().unwrap(), Expression::SuperAngry);
}

#[test]
fn test_io_error_conversion() {
    fn read_missing() -> Result<String> {
        Ok(std::fs::read_to_string("/nonexistent/virtual-agent-face/file")?)
    }

    match read_missing() {
        Err(AppError::Io(e)) => assert_eq!(e.kind(), std::io::ErrorKind::NotFound),
        other => panic!("Expected Io error, got {other:?}"),
    }
}
