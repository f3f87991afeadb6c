use std::cell::RefCell;
use std::rc::Rc;

use super::*;
use crate::config::EditorConfig;
use crate::input::{Key, Modifiers};
use crate::shape::ShapeRegistry;

type Log = Rc<RefCell<Vec<String>>>;

/// Logs every callback it receives; optionally queues a transition on
/// pointer down.
struct Recorder {
    name: &'static str,
    log: Log,
    on_down: Option<fn(&mut Ctx<'_>)>,
}

impl Recorder {
    fn push(&self, entry: String) {
        self.log.borrow_mut().push(entry);
    }
}

impl StateHandler for Recorder {
    fn on_enter(&mut self, _ctx: &mut Ctx<'_>, _info: &TransitionInfo) -> Result<()> {
        self.push(format!("enter:{}", self.name));
        Ok(())
    }

    fn on_exit(&mut self, _ctx: &mut Ctx<'_>, _info: &TransitionInfo) -> Result<()> {
        self.push(format!("exit:{}", self.name));
        Ok(())
    }

    fn on_transition(&mut self, _ctx: &mut Ctx<'_>, info: &TransitionInfo) -> Result<()> {
        self.push(format!("transition:{}:{}", self.name, info.to_id));
        Ok(())
    }

    fn on_pointer_down(&mut self, ctx: &mut Ctx<'_>, _info: &EventInfo) -> Result<()> {
        self.push(format!("down:{}", self.name));
        if let Some(f) = self.on_down {
            f(ctx);
        }
        Ok(())
    }

    fn on_pointer_move(&mut self, _ctx: &mut Ctx<'_>, _info: &EventInfo) -> Result<()> {
        self.push(format!("move:{}", self.name));
        Ok(())
    }

    fn on_key_down(&mut self, _ctx: &mut Ctx<'_>, _info: &EventInfo, _input: &KeyInput) -> Result<()> {
        self.push(format!("key:{}", self.name));
        Ok(())
    }

    fn on_cancel(&mut self, _ctx: &mut Ctx<'_>, _info: &EventInfo) -> Result<()> {
        self.push(format!("cancel:{}", self.name));
        Ok(())
    }
}

fn node(name: &'static str, log: &Log) -> StateNode {
    StateNode::new(name, Recorder { name, log: Rc::clone(log), on_down: None })
}

fn jumping(name: &'static str, log: &Log, on_down: fn(&mut Ctx<'_>)) -> StateNode {
    StateNode::new(name, Recorder { name, log: Rc::clone(log), on_down: Some(on_down) })
}

/// root -> { a -> { a1, a2 }, b }
fn tree(log: &Log, a1: StateNode) -> StateNode {
    let a = node("a", log).with_children("a1", vec![a1, node("a2", log)]);
    node("root", log).with_children("a", vec![a, node("b", log)])
}

fn editor() -> Editor {
    Editor::new(EditorConfig::default(), ShapeRegistry::with_builtins())
}

fn start(root: &mut StateNode, editor: &mut Editor) {
    let mut ctx = Ctx::new(editor);
    let info = TransitionInfo { from_id: None, to_id: "root", data: TransitionData::default() };
    root.enter(&mut ctx, &info).unwrap();
}

fn dispatch(root: &mut StateNode, editor: &mut Editor, event: &StateEvent) {
    let mut ctx = Ctx::new(editor);
    root.dispatch(&mut ctx, event, &EventInfo::canvas()).unwrap();
    root.settle(&mut ctx).unwrap();
}

fn take(log: &Log) -> Vec<String> {
    std::mem::take(&mut *log.borrow_mut())
}

// =============================================================================
// Entering
// =============================================================================

#[test]
fn enter_chains_through_initial_children() {
    let log = Log::default();
    let mut editor = editor();
    let mut root = tree(&log, node("a1", &log));
    start(&mut root, &mut editor);

    assert_eq!(root.active_path(), ["root", "a", "a1"]);
    assert_eq!(take(&log), ["transition:root:a", "transition:a:a1", "enter:a1", "enter:a", "enter:root"]);
}

// =============================================================================
// Transitions
// =============================================================================

#[test]
fn transition_exits_old_subtree_once_before_entering_new() {
    let log = Log::default();
    let mut editor = editor();
    let mut root = tree(&log, node("a1", &log));
    start(&mut root, &mut editor);
    take(&log);

    let mut ctx = Ctx::new(&mut editor);
    root.transition(&mut ctx, "b", TransitionData::default()).unwrap();

    assert_eq!(root.current_id(), Some("b"));
    assert_eq!(take(&log), ["exit:a1", "exit:a", "transition:root:b", "enter:b"]);
    assert!(!root.child("a").unwrap().is_active());
}

#[test]
fn reentering_resets_to_initial_child() {
    let log = Log::default();
    let mut editor = editor();
    let mut root = tree(&log, node("a1", &log));
    start(&mut root, &mut editor);

    let mut ctx = Ctx::new(&mut editor);
    root.transition(&mut ctx, "a", TransitionData::default()).unwrap();
    ctx.depth = 1;
    ctx.transition_child("a2");
    ctx.depth = 0;
    root.settle(&mut ctx).unwrap();
    assert_eq!(root.active_path(), ["root", "a", "a2"]);

    root.transition(&mut ctx, "b", TransitionData::default()).unwrap();
    root.transition(&mut ctx, "a", TransitionData::default()).unwrap();
    assert_eq!(root.active_path(), ["root", "a", "a1"]);
}

#[test]
fn unknown_target_is_an_error() {
    let log = Log::default();
    let mut editor = editor();
    let mut root = tree(&log, node("a1", &log));
    start(&mut root, &mut editor);

    let mut ctx = Ctx::new(&mut editor);
    let err = root.transition(&mut ctx, "zzz", TransitionData::default()).unwrap_err();
    assert!(matches!(err, EditorError::UnknownState { ref parent, ref id } if parent == "root" && id == "zzz"));
    assert_eq!(root.current_id(), Some("a"));
}

#[test]
fn leaf_has_no_states() {
    let log = Log::default();
    let mut editor = editor();
    let mut leaf = node("b", &log);
    let mut ctx = Ctx::new(&mut editor);
    let err = leaf.transition(&mut ctx, "x", TransitionData::default()).unwrap_err();
    assert!(matches!(err, EditorError::NoStates { .. }));
}

// =============================================================================
// Dispatch
// =============================================================================

#[test]
fn events_travel_root_to_leaf() {
    let log = Log::default();
    let mut editor = editor();
    let mut root = tree(&log, node("a1", &log));
    start(&mut root, &mut editor);
    take(&log);

    dispatch(&mut root, &mut editor, &StateEvent::PointerDown);
    assert_eq!(take(&log), ["down:root", "down:a", "down:a1"]);
}

#[test]
fn leaf_request_switches_siblings_after_handler_returns() {
    let log = Log::default();
    let mut editor = editor();
    let mut root = tree(&log, jumping("a1", &log, |ctx| ctx.transition("a2")));
    start(&mut root, &mut editor);
    take(&log);

    dispatch(&mut root, &mut editor, &StateEvent::PointerDown);
    assert_eq!(root.active_path(), ["root", "a", "a2"]);
    assert_eq!(take(&log), ["down:root", "down:a", "down:a1", "exit:a1", "transition:a:a2", "enter:a2"]);
}

#[test]
fn leaf_can_switch_tools() {
    let log = Log::default();
    let mut editor = editor();
    let mut root = tree(&log, jumping("a1", &log, |ctx| ctx.transition_root("b")));
    start(&mut root, &mut editor);

    dispatch(&mut root, &mut editor, &StateEvent::PointerDown);
    assert_eq!(root.active_path(), ["root", "b"]);
}

#[test]
fn transition_data_reaches_the_entered_state() {
    struct Capture(Rc<RefCell<Option<TransitionData>>>);
    impl StateHandler for Capture {
        fn on_enter(&mut self, _ctx: &mut Ctx<'_>, info: &TransitionInfo) -> Result<()> {
            *self.0.borrow_mut() = Some(info.data.clone());
            Ok(())
        }
    }

    let log = Log::default();
    let seen = Rc::new(RefCell::new(None));
    let mut editor = editor();
    let b = StateNode::new("b", Capture(Rc::clone(&seen)));
    let a1 = jumping("a1", &log, |ctx| ctx.transition_root_with("b", TransitionData::shape("s1")));
    let a = node("a", &log).with_children("a1", vec![a1]);
    let mut root = node("root", &log).with_children("a", vec![a, b]);
    start(&mut root, &mut editor);

    dispatch(&mut root, &mut editor, &StateEvent::PointerDown);
    assert_eq!(seen.borrow().as_ref().and_then(|d| d.shape_id.clone()), Some("s1".to_owned()));
}

#[test]
fn cancel_reaches_every_active_state() {
    let log = Log::default();
    let mut editor = editor();
    let mut root = tree(&log, node("a1", &log));
    start(&mut root, &mut editor);
    take(&log);

    assert_eq!(StateEvent::Cancel.name(), "cancel");
    dispatch(&mut root, &mut editor, &StateEvent::Cancel);
    assert_eq!(take(&log), ["cancel:root", "cancel:a", "cancel:a1"]);
}

#[test]
fn modifier_keys_also_deliver_a_pointer_move() {
    let log = Log::default();
    let mut editor = editor();
    let mut root = tree(&log, node("a1", &log));
    start(&mut root, &mut editor);
    take(&log);

    dispatch(&mut root, &mut editor, &StateEvent::KeyDown(KeyInput::new("Shift")));
    assert_eq!(take(&log), ["move:root", "key:root", "move:a", "key:a", "move:a1", "key:a1"]);

    dispatch(&mut root, &mut editor, &StateEvent::KeyDown(KeyInput::new("q")));
    assert_eq!(take(&log), ["key:root", "key:a", "key:a1"]);
}

// =============================================================================
// Shortcuts
// =============================================================================

#[test]
fn combo_parsing_and_exact_modifiers() {
    let combo = KeyCombo::parse("cmd+a");
    assert_eq!(combo.key, Key::new("a"));
    assert!(combo.modifiers.meta);

    let plain = KeyInput::new("a");
    let with_meta = KeyInput::new("A").with_modifiers(Modifiers { meta: true, ..Modifiers::default() });
    let with_both = KeyInput::new("a").with_modifiers(Modifiers { meta: true, shift: true, ..Modifiers::default() });
    assert!(!combo.matches(&plain));
    assert!(combo.matches(&with_meta));
    assert!(!combo.matches(&with_both));
}

#[test]
fn shortcut_lists_accept_alternatives() {
    let shortcut = Shortcut::new("Delete,Backspace", |_| Ok(()));
    assert_eq!(shortcut.combos().len(), 2);
    assert!(shortcut.matches(&KeyInput::new("Backspace")));
    assert!(!shortcut.matches(&KeyInput::new("Escape")));
}

#[test]
fn shortcuts_fire_only_on_active_nodes() {
    let log = Log::default();
    let mut editor = editor();
    let a1 = node("a1", &log);
    let a2 = node("a2", &log).with_shortcut("x", |ctx| {
        ctx.transition_root("b");
        Ok(())
    });
    let a = node("a", &log).with_children("a1", vec![a1, a2]);
    let mut root = node("root", &log).with_children("a", vec![a, node("b", &log)]).with_shortcut("y", |ctx| {
        ctx.transition_child("b");
        Ok(())
    });
    start(&mut root, &mut editor);

    let mut ctx = Ctx::new(&mut editor);
    assert!(!root.run_shortcuts(&mut ctx, &KeyInput::new("x")).unwrap());
    assert!(root.run_shortcuts(&mut ctx, &KeyInput::new("y")).unwrap());
    root.settle(&mut ctx).unwrap();
    assert_eq!(root.active_path(), ["root", "b"]);
}

#[test]
fn stale_requests_are_dropped_on_settle() {
    let log = Log::default();
    let mut editor = editor();
    let mut root = tree(&log, node("a1", &log));
    start(&mut root, &mut editor);

    let mut ctx = Ctx::new(&mut editor);
    ctx.depth = 7;
    ctx.transition_child("nowhere");
    ctx.depth = 0;
    root.settle(&mut ctx).unwrap();
    assert!(!ctx.has_requests());
    assert_eq!(root.active_path(), ["root", "a", "a1"]);
}
