//! Browser binding.
//!
//! [`Engine`] wraps an [`App`] for JavaScript. Event payloads and results
//! cross the boundary as JSON strings in the same camelCase wire format the
//! rest of the crate serializes; every input method returns the JSON array
//! of [`Change`]s it produced. Errors surface as thrown JS strings.

use std::collections::HashMap;
use std::rc::Rc;

use serde::Serialize;
use serde::de::DeserializeOwned;
use wasm_bindgen::prelude::*;

use crate::app::App;
use crate::bounds::Bounds;
use crate::config::EditorConfig;
use crate::editor::SerializedApp;
use crate::error::{EditorError, Result};
use crate::events::{AppEvent, Change, Unsubscribe};
use crate::input::{KeyInput, PinchInput, PointerInput, Target, WheelInput};
use crate::point::Point;

fn to_js(err: EditorError) -> JsValue {
    JsValue::from_str(&err.to_string())
}

fn parse<T: DeserializeOwned>(raw: &str) -> Result<T> {
    Ok(serde_json::from_str(raw)?)
}

fn encode<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    Ok(serde_json::to_string(value)?)
}

fn respond(changes: Result<Vec<Change>>) -> Result<String, JsValue> {
    changes.and_then(|c| encode(&c)).map_err(to_js)
}

#[wasm_bindgen]
pub struct Engine {
    app: App,
    subscriptions: HashMap<u32, Unsubscribe>,
    next_handle: u32,
}

#[wasm_bindgen]
impl Engine {
    /// `config` is a JSON object with any subset of the config fields;
    /// `document` an optional serialized app to start from.
    #[wasm_bindgen(constructor)]
    pub fn new(config: &str, document: Option<String>) -> Result<Engine, JsValue> {
        let config = if config.trim().is_empty() { EditorConfig::default() } else { EditorConfig::from_json(config).map_err(to_js)? };
        let mut builder = App::builder().config(config);
        if let Some(raw) = document {
            builder = builder.document(parse::<SerializedApp>(&raw).map_err(to_js)?);
        }
        let app = builder.build().map_err(to_js)?;
        Ok(Self { app, subscriptions: HashMap::new(), next_handle: 0 })
    }

    // --- Input ---

    #[wasm_bindgen(js_name = pointerDown)]
    pub fn pointer_down(&mut self, input: &str) -> Result<String, JsValue> {
        respond(parse::<PointerInput>(input).and_then(|i| self.app.pointer_down(i)))
    }

    #[wasm_bindgen(js_name = pointerMove)]
    pub fn pointer_move(&mut self, input: &str) -> Result<String, JsValue> {
        respond(parse::<PointerInput>(input).and_then(|i| self.app.pointer_move(i)))
    }

    #[wasm_bindgen(js_name = pointerUp)]
    pub fn pointer_up(&mut self, input: &str) -> Result<String, JsValue> {
        respond(parse::<PointerInput>(input).and_then(|i| self.app.pointer_up(i)))
    }

    #[wasm_bindgen(js_name = pointerCancel)]
    pub fn pointer_cancel(&mut self, pointer_id: i32) -> Result<String, JsValue> {
        respond(self.app.pointer_cancel(pointer_id))
    }

    /// `target` is a serialized [`Target`], e.g. `{"type":"shape","value":"id"}`.
    #[wasm_bindgen(js_name = pointerEnter)]
    pub fn pointer_enter(&mut self, target: &str) -> Result<String, JsValue> {
        respond(parse::<Target>(target).and_then(|t| self.app.pointer_enter(t)))
    }

    #[wasm_bindgen(js_name = pointerLeave)]
    pub fn pointer_leave(&mut self, target: &str) -> Result<String, JsValue> {
        respond(parse::<Target>(target).and_then(|t| self.app.pointer_leave(t)))
    }

    pub fn wheel(&mut self, input: &str) -> Result<String, JsValue> {
        respond(parse::<WheelInput>(input).and_then(|i| self.app.wheel(i)))
    }

    #[wasm_bindgen(js_name = keyDown)]
    pub fn key_down(&mut self, input: &str) -> Result<String, JsValue> {
        respond(parse::<KeyInput>(input).and_then(|i| self.app.key_down(i)))
    }

    #[wasm_bindgen(js_name = keyUp)]
    pub fn key_up(&mut self, input: &str) -> Result<String, JsValue> {
        respond(parse::<KeyInput>(input).and_then(|i| self.app.key_up(i)))
    }

    #[wasm_bindgen(js_name = pinchStart)]
    pub fn pinch_start(&mut self, input: &str) -> Result<String, JsValue> {
        respond(parse::<PinchInput>(input).and_then(|i| self.app.pinch_start(i)))
    }

    pub fn pinch(&mut self, input: &str) -> Result<String, JsValue> {
        respond(parse::<PinchInput>(input).and_then(|i| self.app.pinch(i)))
    }

    #[wasm_bindgen(js_name = pinchEnd)]
    pub fn pinch_end(&mut self, input: &str) -> Result<String, JsValue> {
        respond(parse::<PinchInput>(input).and_then(|i| self.app.pinch_end(i)))
    }

    // --- Tools and view ---

    #[wasm_bindgen(js_name = selectTool)]
    pub fn select_tool(&mut self, id: &str) -> Result<String, JsValue> {
        respond(self.app.select_tool(id))
    }

    #[wasm_bindgen(js_name = setToolLock)]
    pub fn set_tool_lock(&mut self, locked: bool) -> Result<String, JsValue> {
        respond(Ok(self.app.set_tool_lock(locked)))
    }

    #[wasm_bindgen(js_name = setViewport)]
    pub fn set_viewport(&mut self, x: f64, y: f64, width: f64, height: f64) -> Result<String, JsValue> {
        respond(Ok(self.app.set_viewport_bounds(Bounds::from_rect(x, y, width, height))))
    }

    #[wasm_bindgen(js_name = setCamera)]
    pub fn set_camera(&mut self, x: f64, y: f64, zoom: f64) -> Result<String, JsValue> {
        respond(Ok(self.app.set_camera(Point::new(x, y), zoom)))
    }

    #[wasm_bindgen(js_name = zoomIn)]
    pub fn zoom_in(&mut self) -> Result<String, JsValue> {
        respond(Ok(self.app.zoom_in()))
    }

    #[wasm_bindgen(js_name = zoomOut)]
    pub fn zoom_out(&mut self) -> Result<String, JsValue> {
        respond(Ok(self.app.zoom_out()))
    }

    #[wasm_bindgen(js_name = zoomToFit)]
    pub fn zoom_to_fit(&mut self) -> Result<String, JsValue> {
        respond(Ok(self.app.zoom_to_fit()))
    }

    #[wasm_bindgen(js_name = statePath)]
    pub fn state_path(&self) -> String {
        self.app.state_path()
    }

    /// The current frame as JSON.
    pub fn render(&self) -> Result<String, JsValue> {
        encode(&self.app.render()).map_err(to_js)
    }

    // --- Document and history ---

    /// `ids` is a JSON array of shape ids.
    pub fn select(&mut self, ids: &str) -> Result<String, JsValue> {
        respond(parse::<Vec<String>>(ids).map(|ids| self.app.select(&ids)))
    }

    /// `ids` is a JSON array of shape ids; empty deletes the selection.
    #[wasm_bindgen(js_name = deleteShapes)]
    pub fn delete_shapes(&mut self, ids: &str) -> Result<String, JsValue> {
        respond(parse::<Vec<String>>(ids).and_then(|ids| self.app.delete_shapes(&ids)))
    }

    pub fn tick(&mut self) -> Result<String, JsValue> {
        respond(Ok(self.app.tick()))
    }

    pub fn undo(&mut self) -> Result<String, JsValue> {
        respond(self.app.undo())
    }

    pub fn redo(&mut self) -> Result<String, JsValue> {
        respond(self.app.redo())
    }

    pub fn serialized(&self) -> Result<String, JsValue> {
        encode(&self.app.serialized()).map_err(to_js)
    }

    pub fn load(&mut self, document: &str) -> Result<String, JsValue> {
        respond(parse::<SerializedApp>(document).and_then(|d| self.app.load_app_state(&d)))
    }

    // --- Subscriptions ---

    /// Call `callback` with the serialized app on `"mount"` or `"persist"`.
    /// Returns a handle for [`Self::unsubscribe`].
    pub fn subscribe(&mut self, event: &str, callback: js_sys::Function) -> Result<u32, JsValue> {
        let event: AppEvent = parse(&format!("\"{event}\"")).map_err(to_js)?;
        let listener = Rc::new(move |snapshot: &SerializedApp| {
            let json = match encode(snapshot) {
                Ok(json) => json,
                Err(err) => {
                    tracing::warn!(%err, "could not encode snapshot for subscriber");
                    return;
                }
            };
            if let Err(err) = callback.call1(&JsValue::NULL, &JsValue::from_str(&json)) {
                tracing::warn!(?err, "subscriber callback failed");
            }
        });
        self.next_handle += 1;
        self.subscriptions.insert(self.next_handle, self.app.subscribe(event, listener));
        Ok(self.next_handle)
    }

    pub fn unsubscribe(&mut self, handle: u32) -> bool {
        match self.subscriptions.remove(&handle) {
            Some(unsubscribe) => {
                unsubscribe();
                true
            }
            None => false,
        }
    }
}
