use super::*;

fn snapshot(tag: &str) -> SerializedApp {
    SerializedApp { current_page_id: tag.to_owned(), selected_ids: Vec::new(), pages: Vec::new() }
}

fn seeded() -> History {
    let mut history = History::new();
    history.reset(snapshot("a"));
    history
}

#[test]
fn reset_seeds_a_single_entry() {
    let history = seeded();
    assert_eq!(history.len(), 1);
    assert_eq!(history.pointer(), 0);
    assert!(!history.can_undo());
    assert!(!history.can_redo());
}

#[test]
fn push_advances_pointer() {
    let mut history = seeded();
    assert!(history.push(snapshot("b")));
    assert_eq!(history.len(), 2);
    assert_eq!(history.pointer(), 1);
    assert_eq!(history.current().unwrap().current_page_id, "b");
}

#[test]
fn paused_push_is_dropped() {
    let mut history = seeded();
    history.pause();
    assert!(!history.push(snapshot("b")));
    assert_eq!(history.len(), 1);
    history.resume();
    assert!(history.push(snapshot("c")));
    assert_eq!(history.len(), 2);
}

#[test]
fn gesture_bracket_yields_one_entry() {
    let mut history = seeded();
    history.pause();
    for i in 0..5 {
        history.push(snapshot(&format!("move-{i}")));
    }
    history.resume();
    history.push(snapshot("done"));
    assert_eq!(history.len(), 2);
}

#[test]
fn undo_and_redo_walk_the_stack() {
    let mut history = seeded();
    history.push(snapshot("b"));
    history.push(snapshot("c"));

    assert_eq!(history.undo().unwrap().current_page_id, "b");
    assert_eq!(history.undo().unwrap().current_page_id, "a");
    assert!(history.undo().is_none());

    assert_eq!(history.redo().unwrap().current_page_id, "b");
    assert_eq!(history.redo().unwrap().current_page_id, "c");
    assert!(history.redo().is_none());
}

#[test]
fn push_after_undo_discards_redo_tail() {
    let mut history = seeded();
    history.push(snapshot("b"));
    history.push(snapshot("c"));
    history.undo();
    history.push(snapshot("d"));

    assert_eq!(history.len(), 3);
    assert!(!history.can_redo());
    assert_eq!(history.undo().unwrap().current_page_id, "b");
}

#[test]
fn reset_unpauses() {
    let mut history = seeded();
    history.pause();
    history.reset(snapshot("z"));
    assert!(!history.is_paused());
}
