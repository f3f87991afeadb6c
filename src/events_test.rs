use std::cell::Cell;

use super::*;

fn empty_app() -> SerializedApp {
    SerializedApp { current_page_id: "page".into(), selected_ids: Vec::new(), pages: Vec::new() }
}

// --- ChangeLog ---

#[test]
fn consecutive_updates_are_folded() {
    let mut log = ChangeLog::default();
    log.push(Change::ShapesUpdated { ids: vec!["a".into()] });
    log.push(Change::ShapesUpdated { ids: vec!["b".into(), "a".into()] });
    assert_eq!(log.drain(), vec![Change::ShapesUpdated { ids: vec!["a".into(), "b".into()] }]);
    assert!(log.is_empty());
}

#[test]
fn updates_split_by_other_changes_stay_apart() {
    let mut log = ChangeLog::default();
    log.push(Change::ShapesUpdated { ids: vec!["a".into()] });
    log.push(Change::SelectionChanged { ids: vec![] });
    log.push(Change::ShapesUpdated { ids: vec!["a".into()] });
    assert_eq!(log.drain().len(), 3);
}

#[test]
fn change_serializes_with_type_tag() {
    let json = serde_json::to_value(Change::PointerCaptured { pointer_id: 3 }).unwrap();
    assert_eq!(json, serde_json::json!({ "type": "pointerCaptured", "pointerId": 3 }));
}

// --- Subscriptions ---

#[test]
fn listeners_receive_only_their_event() {
    let subs = Subscriptions::default();
    let hits = Rc::new(Cell::new(0));
    let counter = Rc::clone(&hits);
    let _unsubscribe = subs.subscribe(AppEvent::Persist, Rc::new(move |_| counter.set(counter.get() + 1)));

    subs.notify(AppEvent::Mount, &empty_app());
    subs.notify(AppEvent::Persist, &empty_app());
    assert_eq!(hits.get(), 1);
}

#[test]
fn unsubscribe_removes_listener() {
    let subs = Subscriptions::default();
    let hits = Rc::new(Cell::new(0));
    let counter = Rc::clone(&hits);
    let unsubscribe = subs.subscribe(AppEvent::Mount, Rc::new(move |_| counter.set(counter.get() + 1)));
    assert_eq!(subs.len(), 1);

    unsubscribe();
    subs.notify(AppEvent::Mount, &empty_app());
    assert_eq!(hits.get(), 0);
    assert!(subs.is_empty());
}

#[test]
fn listener_may_unsubscribe_itself_while_notified() {
    let subs = Subscriptions::default();
    let slot: Rc<RefCell<Option<Unsubscribe>>> = Rc::new(RefCell::new(None));
    let inner = Rc::clone(&slot);
    let unsubscribe = subs.subscribe(
        AppEvent::Persist,
        Rc::new(move |_| {
            if let Some(f) = inner.borrow_mut().take() {
                f();
            }
        }),
    );
    *slot.borrow_mut() = Some(unsubscribe);

    subs.notify(AppEvent::Persist, &empty_app());
    assert!(subs.is_empty());
}

#[test]
fn unsubscribe_after_drop_is_harmless() {
    let subs = Subscriptions::default();
    let unsubscribe = subs.subscribe(AppEvent::Mount, Rc::new(|_| {}));
    drop(subs);
    unsubscribe();
}
