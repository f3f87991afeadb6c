use super::*;
use sketchcore::shape::ShapeKind;

fn run(app: &mut App, script: &str) {
    for line in script.lines() {
        if let Some(step) = parse_line(line).unwrap() {
            apply(app, step).unwrap();
        }
    }
}

#[test]
fn blanks_and_comments_are_skipped() {
    assert_eq!(parse_line("").unwrap(), None);
    assert_eq!(parse_line("   ").unwrap(), None);
    assert_eq!(parse_line("# drag a box").unwrap(), None);
}

#[test]
fn events_parse_with_defaults() {
    let step = parse_line(r#"{"event":"pointerDown","point":[10,20]}"#).unwrap().unwrap();
    assert_eq!(step, Step::PointerDown(PointerInput::at(10.0, 20.0)));

    let step = parse_line(r#"{"event":"keyDown","key":"Escape"}"#).unwrap().unwrap();
    assert_eq!(step, Step::KeyDown(KeyInput::new("Escape")));

    let step = parse_line(r#"{"event":"delete"}"#).unwrap().unwrap();
    assert_eq!(step, Step::Delete { ids: Vec::new() });
}

#[test]
fn unknown_event_is_an_error() {
    assert!(parse_line(r#"{"event":"teleport"}"#).is_err());
}

#[test]
fn box_drag_script_creates_a_box() {
    let mut app = App::new(sketchcore::config::EditorConfig::default()).unwrap();
    run(
        &mut app,
        r#"
        {"event":"selectTool","tool":"box"}
        {"event":"pointerDown","point":[10,10]}
        {"event":"pointerMove","point":[60,50]}
        {"event":"pointerUp","point":[60,50]}
        "#,
    );

    let doc = app.serialized();
    let shapes = &doc.pages[0].shapes;
    assert_eq!(shapes.len(), 1);
    assert_eq!(app.state_path(), "root.select.idle");
    let page = app.editor().current_page().unwrap();
    assert!(matches!(page.shapes()[0].kind(), ShapeKind::Box(_)));
}

#[test]
fn undo_step_reverts_the_creation() {
    let mut app = App::new(sketchcore::config::EditorConfig::default()).unwrap();
    run(
        &mut app,
        r#"
        {"event":"selectTool","tool":"box"}
        {"event":"pointerDown","point":[10,10]}
        {"event":"pointerMove","point":[60,50]}
        {"event":"pointerUp","point":[60,50]}
        {"event":"undo"}
        "#,
    );
    assert!(app.editor().current_page().unwrap().shapes().is_empty());
}
