use super::*;

fn down(x: f64, y: f64, id: i32) -> PointerInput {
    PointerInput { pointer_id: id, ..PointerInput::at(x, y) }
}

// =============================================================
// Keys
// =============================================================

#[test]
fn modifier_keys_are_recognized() {
    for name in ["Shift", "Alt", "Control", "Meta"] {
        assert!(Key::new(name).is_modifier(), "{name}");
    }
    assert!(!Key::new("a").is_modifier());
    assert!(Key::new("Escape").is("escape"));
}

#[test]
fn key_state_tracks_down_and_up() {
    let mut inputs = Inputs::new();
    inputs.on_key_down(&KeyInput::new("a").with_modifiers(Modifiers { shift: true, ..Modifiers::default() }));
    assert!(inputs.is_key_down("a"));
    assert!(inputs.shift);
    inputs.on_key_up(&KeyInput::new("a"));
    assert!(!inputs.is_key_down("a"));
    assert!(!inputs.shift);
}

// =============================================================
// Pointer
// =============================================================

#[test]
fn pointer_down_sets_origin_and_captures_first_pointer() {
    let mut inputs = Inputs::new();
    let capture = inputs.on_pointer_down(Point::new(10.0, 20.0), &down(10.0, 20.0, 7));
    assert_eq!(capture, Some(Capture::Set(7)));
    assert_eq!(inputs.origin_point, Point::new(10.0, 20.0));
    assert_eq!(inputs.phase, InputPhase::Pointing);
    assert!(inputs.is_pointer_down());

    assert_eq!(inputs.on_pointer_down(Point::ZERO, &down(0.0, 0.0, 8)), None);
}

#[test]
fn move_tracks_previous_point() {
    let mut inputs = Inputs::new();
    inputs.on_pointer_down(Point::new(0.0, 0.0), &down(0.0, 0.0, 1));
    inputs.on_pointer_move(Point::new(5.0, 0.0), &down(5.0, 0.0, 1));
    inputs.on_pointer_move(Point::new(9.0, 0.0), &down(9.0, 0.0, 1));
    assert_eq!(inputs.previous_point, Point::new(5.0, 0.0));
    assert_eq!(inputs.drag_delta(), Point::new(9.0, 0.0));
}

#[test]
fn pointer_up_releases_capture_and_idles() {
    let mut inputs = Inputs::new();
    inputs.on_pointer_down(Point::ZERO, &down(0.0, 0.0, 3));
    assert_eq!(inputs.on_pointer_up(Point::ZERO, &down(0.0, 0.0, 3)), Some(Capture::Release(3)));
    assert_eq!(inputs.phase, InputPhase::Idle);
    assert_eq!(inputs.captured_pointer(), None);
}

#[test]
fn cancel_releases_like_up() {
    let mut inputs = Inputs::new();
    inputs.on_pointer_down(Point::ZERO, &down(0.0, 0.0, 4));
    assert_eq!(inputs.on_pointer_cancel(4), Some(Capture::Release(4)));
    assert!(!inputs.is_pointer_down());
    assert_eq!(inputs.on_pointer_cancel(4), None);
}

// =============================================================
// Pinch
// =============================================================

#[test]
fn pinch_phase_round_trip() {
    let mut inputs = Inputs::new();
    let pinch = PinchInput { origin: Point::new(1.0, 1.0), delta: Point::ZERO, zoom: 2.0, modifiers: Modifiers::default() };
    inputs.on_pinch_start(Point::new(1.0, 1.0), &pinch);
    assert_eq!(inputs.phase, InputPhase::Pinching);
    inputs.on_pinch_end(Point::new(1.0, 1.0), &pinch);
    assert_eq!(inputs.phase, InputPhase::Idle);
}

// =============================================================
// Serde
// =============================================================

#[test]
fn targets_use_adjacent_tags() {
    let shape = serde_json::to_value(Target::Shape("abc".into())).unwrap();
    assert_eq!(shape, serde_json::json!({ "type": "shape", "value": "abc" }));
    let handle: Target = serde_json::from_str(r#"{ "type": "bounds", "value": { "kind": "resize", "anchor": "se" } }"#).unwrap();
    assert_eq!(handle, Target::Bounds(BoundsHandle::Resize(ResizeAnchor::Se)));
    let canvas: Target = serde_json::from_str(r#"{ "type": "canvas" }"#).unwrap();
    assert_eq!(canvas, Target::Canvas);
}

#[test]
fn pointer_input_defaults_optional_fields() {
    let input: PointerInput = serde_json::from_str(r#"{ "point": [3, 4] }"#).unwrap();
    assert_eq!(input.point, Point::new(3.0, 4.0));
    assert_eq!(input.button, Button::Primary);
    assert!((input.pressure - DEFAULT_PRESSURE).abs() < f64::EPSILON);
}
