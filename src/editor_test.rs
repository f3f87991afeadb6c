#![allow(clippy::float_cmp)]

use std::cell::Cell;
use std::rc::Rc;

use serde_json::json;

use super::*;
use crate::point::Size;
use crate::shape::{BoxProps, ShapeKind};

fn editor() -> Editor {
    Editor::new(EditorConfig::default(), ShapeRegistry::with_builtins())
}

fn add_box(editor: &mut Editor, id: &str, x: f64, y: f64) {
    let parent = editor.current_page_id().to_owned();
    let shape = Shape::new(id, parent, Point::new(x, y), ShapeKind::Box(BoxProps { size: Size::new(100.0, 100.0) }));
    editor.create_shapes(vec![shape]).unwrap();
}

fn ids(list: &[&str]) -> Vec<ShapeId> {
    list.iter().map(|s| (*s).to_owned()).collect()
}

// =============================================================================
// Construction
// =============================================================================

#[test]
fn new_editor_has_one_page_and_one_history_entry() {
    let editor = editor();
    assert_eq!(editor.pages().len(), 1);
    assert!(editor.current_page().is_ok());
    assert_eq!(editor.history().len(), 1);
}

// =============================================================================
// Shapes
// =============================================================================

#[test]
fn create_shape_uses_registry_and_records_change() {
    let mut editor = editor();
    let id = editor.create_shape("ellipse", Point::new(5.0, 5.0)).unwrap();
    assert_eq!(editor.shape(&id).unwrap().type_name(), "ellipse");
    assert!(editor.drain_changes().contains(&Change::ShapesCreated { ids: vec![id] }));
    assert!(editor.is_saving());
}

#[test]
fn create_shape_with_unknown_type_fails() {
    let mut editor = editor();
    let err = editor.create_shape("arrow", Point::ZERO).unwrap_err();
    assert!(matches!(err, EditorError::NoShapeClass(t) if t == "arrow"));
    assert!(editor.current_page().unwrap().shapes().is_empty());
}

#[test]
fn create_serialized_is_all_or_nothing() {
    let mut editor = editor();
    let page = editor.current_page_id().to_owned();
    let records = vec![
        json!({ "id": "a", "type": "box", "parentId": page, "point": [0, 0], "size": [10, 10] }),
        json!({ "id": "b", "type": "arrow", "parentId": page, "point": [0, 0] }),
    ];
    assert!(editor.create_serialized(records).is_err());
    assert!(editor.current_page().unwrap().shapes().is_empty());
}

#[test]
fn update_shapes_rejects_unknown_id_without_partial_update() {
    let mut editor = editor();
    add_box(&mut editor, "a", 0.0, 0.0);
    let updates = vec![("a".to_owned(), ShapePatch::point(Point::new(9.0, 9.0))), ("ghost".to_owned(), ShapePatch::default())];
    assert!(matches!(editor.update_shapes(&updates), Err(EditorError::ShapeNotFound(id)) if id == "ghost"));
    assert_eq!(editor.shape("a").unwrap().point(), Point::ZERO);
}

fn reparent(id: &str, parent: &str) -> (ShapeId, ShapePatch) {
    (id.to_owned(), ShapePatch { parent_id: Some(parent.to_owned()), ..ShapePatch::default() })
}

#[test]
fn update_to_missing_parent_is_refused() {
    let mut editor = editor();
    add_box(&mut editor, "a", 0.0, 0.0);
    let page = editor.current_page_id().to_owned();

    let err = editor.update_shapes(&[reparent("a", "nowhere")]).unwrap_err();
    assert!(matches!(err, EditorError::OrphanShape { id, parent } if id == "a" && parent == "nowhere"));
    assert_eq!(editor.shape("a").unwrap().parent_id(), page);

    let mut reloaded = self::editor();
    reloaded.load(&editor.serialized()).unwrap();
}

#[test]
fn update_that_would_nest_a_shape_under_itself_is_refused() {
    let mut editor = editor();
    add_box(&mut editor, "a", 0.0, 0.0);
    add_box(&mut editor, "b", 10.0, 10.0);
    editor.update_shapes(&[reparent("b", "a")]).unwrap();
    assert_eq!(editor.shape("b").unwrap().parent_id(), "a");

    assert!(matches!(editor.update_shapes(&[reparent("a", "a")]), Err(EditorError::ParentCycle { .. })));
    assert!(matches!(editor.update_shape("a", &reparent("a", "b").1), Err(EditorError::ParentCycle { .. })));

    let page = editor.current_page_id().to_owned();
    assert_eq!(editor.shape("a").unwrap().parent_id(), page);
}

#[test]
fn parent_moves_in_one_batch_are_judged_together() {
    let mut editor = editor();
    add_box(&mut editor, "a", 0.0, 0.0);
    add_box(&mut editor, "b", 10.0, 10.0);
    let page = editor.current_page_id().to_owned();

    let swap = [reparent("a", "b"), reparent("b", "a")];
    assert!(matches!(editor.update_shapes(&swap), Err(EditorError::ParentCycle { .. })));
    assert_eq!(editor.shape("a").unwrap().parent_id(), page);
    assert_eq!(editor.shape("b").unwrap().parent_id(), page);

    editor.update_shapes(&[reparent("a", "b"), reparent("b", &page)]).unwrap();
    assert_eq!(editor.shape("a").unwrap().parent_id(), "b");
}

#[test]
fn update_reports_fresh_bounds() {
    let mut editor = editor();
    add_box(&mut editor, "a", 0.0, 0.0);
    let patch = ShapePatch { size: Some(Size::new(40.0, 60.0)), ..ShapePatch::default() };
    editor.update_shape("a", &patch).unwrap();
    assert_eq!(editor.shape("a").unwrap().bounds(), Bounds::from_rect(0.0, 0.0, 40.0, 60.0));
}

#[test]
fn delete_prunes_selection_and_hover() {
    let mut editor = editor();
    add_box(&mut editor, "a", 0.0, 0.0);
    add_box(&mut editor, "b", 200.0, 0.0);
    editor.select(&ids(&["a", "b"]));
    editor.hover(Some("a"));

    let removed = editor.delete_shapes(&ids(&["a"])).unwrap();
    assert_eq!(removed, ids(&["a"]));
    assert_eq!(editor.selected_ids(), ids(&["b"]).as_slice());
    assert_eq!(editor.hovered_id(), None);
}

#[test]
fn delete_without_ids_takes_selection_then_everything() {
    let mut editor = editor();
    add_box(&mut editor, "a", 0.0, 0.0);
    add_box(&mut editor, "b", 200.0, 0.0);
    add_box(&mut editor, "c", 400.0, 0.0);

    editor.select(&ids(&["b"]));
    assert_eq!(editor.delete_shapes(&[]).unwrap(), ids(&["b"]));

    assert_eq!(editor.delete_shapes(&[]).unwrap(), ids(&["a", "c"]));
    assert!(editor.current_page().unwrap().shapes().is_empty());
}

// =============================================================================
// Selection
// =============================================================================

#[test]
fn select_drops_unknown_and_duplicate_ids() {
    let mut editor = editor();
    add_box(&mut editor, "a", 0.0, 0.0);
    editor.select(&ids(&["a", "nope", "a"]));
    assert_eq!(editor.selected_ids(), ids(&["a"]).as_slice());
}

#[test]
fn unchanged_selection_records_nothing() {
    let mut editor = editor();
    add_box(&mut editor, "a", 0.0, 0.0);
    editor.select(&ids(&["a"]));
    editor.drain_changes();
    editor.select(&ids(&["a"]));
    assert!(editor.drain_changes().is_empty());
}

#[test]
fn selected_bounds_single_keeps_rotation() {
    let mut editor = editor();
    add_box(&mut editor, "a", 0.0, 0.0);
    editor.update_shape("a", &ShapePatch { rotation: Some(0.5), ..ShapePatch::default() }).unwrap();
    editor.select(&ids(&["a"]));
    let bounds = editor.selected_bounds().unwrap();
    assert_eq!(bounds.rotation, 0.5);
    assert_eq!(bounds.width, 100.0);
}

#[test]
fn selected_bounds_many_is_common_box() {
    let mut editor = editor();
    add_box(&mut editor, "a", 0.0, 0.0);
    add_box(&mut editor, "b", 200.0, 50.0);
    editor.select_all();
    assert_eq!(editor.selected_bounds().unwrap(), Bounds::new(0.0, 0.0, 300.0, 150.0));
}

// =============================================================================
// Pages
// =============================================================================

#[test]
fn change_page_clears_selection() {
    let mut editor = editor();
    add_box(&mut editor, "a", 0.0, 0.0);
    editor.select_all();
    editor.add_pages(vec![Page::new("p2", "Page 2")]).unwrap();
    editor.change_page("p2").unwrap();
    assert_eq!(editor.current_page_id(), "p2");
    assert!(editor.selected_ids().is_empty());
}

#[test]
fn change_to_unknown_page_fails() {
    let mut editor = editor();
    assert!(matches!(editor.change_page("zzz"), Err(EditorError::PageNotFound(_))));
}

#[test]
fn removing_every_page_is_refused() {
    let mut editor = editor();
    let only = editor.current_page_id().to_owned();
    assert!(editor.remove_pages(&[only]).is_err());
    assert_eq!(editor.pages().len(), 1);
}

#[test]
fn removing_current_page_moves_to_first_remaining() {
    let mut editor = editor();
    let first = editor.current_page_id().to_owned();
    editor.add_pages(vec![Page::new("p2", "Page 2")]).unwrap();
    editor.change_page("p2").unwrap();
    editor.remove_pages(&["p2".to_owned()]).unwrap();
    assert_eq!(editor.current_page_id(), first);
}

// =============================================================================
// Camera
// =============================================================================

#[test]
fn drag_threshold_is_measured_in_screen_pixels() {
    let mut editor = editor();
    editor.inputs.origin_point = Point::ZERO;
    editor.inputs.current_point = Point::new(3.0, 0.0);
    assert!(!editor.is_past_drag_threshold());
    editor.set_camera(Point::ZERO, 2.0);
    assert!(editor.is_past_drag_threshold());
}

#[test]
fn zoom_to_fit_on_empty_page_is_noop() {
    let mut editor = editor();
    editor.zoom_to_fit();
    assert!(editor.drain_changes().is_empty());
}

#[test]
fn shapes_in_viewport_culls_offscreen() {
    let mut editor = editor();
    editor.set_viewport_bounds(Bounds::from_rect(0.0, 0.0, 800.0, 600.0));
    add_box(&mut editor, "near", 10.0, 10.0);
    add_box(&mut editor, "far", 5000.0, 5000.0);
    let visible: Vec<&str> = editor.shapes_in_viewport().iter().map(|s| s.id()).collect();
    assert_eq!(visible, ["near"]);
}

// =============================================================================
// History
// =============================================================================

#[test]
fn tick_flushes_one_snapshot_for_many_writes() {
    let mut editor = editor();
    add_box(&mut editor, "a", 0.0, 0.0);
    for i in 0..5 {
        editor.update_shape("a", &ShapePatch::point(Point::new(f64::from(i), 0.0))).unwrap();
    }
    editor.tick();
    assert_eq!(editor.history().len(), 2);
    editor.tick();
    assert_eq!(editor.history().len(), 2);
}

#[test]
fn paused_writes_do_not_schedule_saves() {
    let mut editor = editor();
    add_box(&mut editor, "a", 0.0, 0.0);
    editor.persist();
    editor.pause_history();
    for i in 0..5 {
        editor.update_shape("a", &ShapePatch::point(Point::new(f64::from(i), 0.0))).unwrap();
    }
    assert!(!editor.is_saving());
    editor.persist();
    assert_eq!(editor.history().len(), 2);
    editor.resume_history();
    editor.persist();
    assert_eq!(editor.history().len(), 3);
}

#[test]
fn undo_and_redo_restore_documents() {
    let mut editor = editor();
    add_box(&mut editor, "a", 0.0, 0.0);
    editor.tick();
    editor.update_shape("a", &ShapePatch::point(Point::new(50.0, 50.0))).unwrap();
    editor.tick();

    assert!(editor.undo().unwrap());
    assert_eq!(editor.shape("a").unwrap().point(), Point::ZERO);
    assert!(editor.undo().unwrap());
    assert!(editor.shape("a").is_none());
    assert!(!editor.undo().unwrap());

    assert!(editor.redo().unwrap());
    assert!(editor.redo().unwrap());
    assert_eq!(editor.shape("a").unwrap().point(), Point::new(50.0, 50.0));
}

#[test]
fn undo_flushes_pending_save_first() {
    let mut editor = editor();
    add_box(&mut editor, "a", 0.0, 0.0);
    assert!(editor.undo().unwrap());
    assert!(editor.shape("a").is_none());
    assert!(editor.redo().unwrap());
    assert!(editor.shape("a").is_some());
}

#[test]
fn undo_while_paused_is_ignored() {
    let mut editor = editor();
    add_box(&mut editor, "a", 0.0, 0.0);
    editor.tick();
    editor.pause_history();
    assert!(!editor.undo().unwrap());
    assert!(editor.shape("a").is_some());
}

#[test]
fn unregistered_type_in_snapshot_fails_without_moving_pointer() {
    let mut editor = editor();
    add_box(&mut editor, "a", 0.0, 0.0);
    editor.tick();
    editor.registry_mut().deregister("box");
    editor.update_shape("a", &ShapePatch::point(Point::new(1.0, 1.0))).unwrap();
    editor.tick();

    let pointer = editor.history().pointer();
    assert!(matches!(editor.undo(), Err(EditorError::NoShapeClass(t)) if t == "box"));
    assert_eq!(editor.history().pointer(), pointer);
    assert_eq!(editor.shape("a").unwrap().point(), Point::new(1.0, 1.0));
}

#[test]
fn unchanged_shapes_keep_their_instance_across_undo() {
    let mut editor = editor();
    add_box(&mut editor, "a", 0.0, 0.0);
    editor.tick();
    add_box(&mut editor, "b", 200.0, 0.0);
    editor.tick();
    let nonce = editor.shape("a").unwrap().nonce();

    editor.undo().unwrap();
    let a = editor.shape("a").unwrap();
    assert_eq!(a.nonce(), nonce);
    assert!(!a.is_dirty());
}

#[test]
fn serialized_round_trips() {
    let mut editor = editor();
    add_box(&mut editor, "a", 10.0, 20.0);
    editor.create_shape("draw", Point::new(5.0, 5.0)).unwrap();
    editor.select(&ids(&["a"]));
    let snapshot = editor.serialized();

    let mut other = Editor::new(EditorConfig::default(), ShapeRegistry::with_builtins());
    other.load(&snapshot).unwrap();
    assert_eq!(other.serialized(), snapshot);
    assert_eq!(other.history().len(), 1);

    let json = serde_json::to_string(&snapshot).unwrap();
    let parsed: SerializedApp = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed, snapshot);
}

#[test]
fn load_with_missing_current_page_fails() {
    let mut editor = editor();
    let mut snapshot = editor.serialized();
    snapshot.current_page_id = "nowhere".into();
    assert!(matches!(editor.load(&snapshot), Err(EditorError::PageNotFound(_))));
}

#[test]
fn persist_notifies_listeners() {
    let editor_hits = Rc::new(Cell::new(0));
    let mut editor = editor();
    let counter = Rc::clone(&editor_hits);
    let unsubscribe = editor.subscribe(AppEvent::Persist, Rc::new(move |_| counter.set(counter.get() + 1)));
    editor.persist();
    assert_eq!(editor_hits.get(), 1);
    unsubscribe();
    editor.persist();
    assert_eq!(editor_hits.get(), 1);
}
