//! Headless core of an infinite-canvas editor.
//!
//! Hosts feed normalized pointer, keyboard, wheel, and pinch input into an
//! [`app::App`]. A hierarchical state machine routes each event to the
//! active tool, which mutates the document held by [`editor::Editor`]. Every
//! call returns the [`events::Change`]s it caused, so the host re-renders
//! and persists without observing fields. Under WebAssembly the same API is
//! exposed as [`wasm::Engine`] with JSON in and out.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`app`] | Input entry points, tool registration, chrome queries |
//! | [`editor`] | Pages, selection, camera, history, serialization |
//! | [`state`] | Hierarchical state machine and keyboard shortcuts |
//! | [`tools`] | Select tool and shape-creation tools |
//! | [`shape`] | Shape records, the built-in kinds, and the class registry |
//! | [`page`] | Ordered shapes and bindings of one page |
//! | [`camera`] | Viewport, camera, and screen/page conversion |
//! | [`input`] | Input payloads, targets, and pointer tracking |
//! | [`hit`] | Selection chrome and host-side target stacks |
//! | [`history`] | Snapshot undo stack |
//! | [`events`] | Change records and lifecycle subscriptions |
//! | [`bounds`] / [`point`] / [`intersect`] | Geometry |
//! | [`spatial`] | R-tree index for brush selection |
//! | [`render`] | Frame description for the host renderer |
//! | [`config`] | Tunable thresholds and limits |
//! | [`consts`] | Fixed numeric constants |
//! | [`error`] | [`error::EditorError`] |
//! | [`wasm`] | Browser binding |

pub mod app;
pub mod bounds;
pub mod camera;
pub mod config;
pub mod consts;
pub mod editor;
pub mod error;
pub mod events;
pub mod history;
pub mod hit;
pub mod input;
pub mod intersect;
pub mod page;
pub mod point;
pub mod render;
pub mod shape;
pub mod spatial;
pub mod state;
pub mod tools;
pub mod wasm;

pub use app::{App, AppBuilder};
pub use editor::{Editor, SerializedApp};
pub use error::{EditorError, Result};
pub use events::Change;
