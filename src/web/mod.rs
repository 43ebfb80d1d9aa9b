//! Browser glue: canvases, fetching, the fullscreen API and the frame loop.

pub mod fetch;
pub mod frame;
pub mod fullscreen_api;
pub mod panel;
pub mod target;

pub use target::WebTarget;

use wasm_bindgen::JsValue;

/// Best-effort text of a thrown JS value.
pub(crate) fn js_reason(value: &JsValue) -> String {
    value
        .as_string()
        .or_else(|| {
            js_sys::Reflect::get(value, &JsValue::from_str("message"))
                .ok()
                .and_then(|message| message.as_string())
        })
        .unwrap_or_else(|| format!("{value:?}"))
}
