use js_sys::{Function, Promise, Reflect};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{Document, Element};

use super::js_reason;
use crate::error::ViewerError;

const REQUEST: [&str; 3] = ["requestFullscreen", "webkitRequestFullscreen", "msRequestFullscreen"];
const EXIT: [&str; 3] = ["exitFullscreen", "webkitExitFullscreen", "msExitFullscreen"];
const ELEMENT: [&str; 3] = ["fullscreenElement", "webkitFullscreenElement", "msFullscreenElement"];
const CHANGE: [&str; 3] = ["fullscreenchange", "webkitfullscreenchange", "msfullscreenchange"];

/// Calls the first of `names` that `this` implements, awaiting the promise
/// when the browser returns one.
async fn call_first(this: &JsValue, names: &[&str]) -> Result<(), ViewerError> {
    for name in names {
        let Ok(method) = Reflect::get(this, &JsValue::from_str(name)) else {
            continue;
        };
        let Some(method) = method.dyn_ref::<Function>() else {
            continue;
        };
        let ret = method
            .call0(this)
            .map_err(|err| ViewerError::Fullscreen(js_reason(&err)))?;
        if let Some(promise) = ret.dyn_ref::<Promise>() {
            JsFuture::from(promise.clone())
                .await
                .map_err(|err| ViewerError::Fullscreen(js_reason(&err)))?;
        }
        return Ok(());
    }
    Err(ViewerError::Fullscreen("fullscreen API unavailable".into()))
}

pub async fn request(element: &Element) -> Result<(), ViewerError> {
    call_first(element.as_ref(), &REQUEST).await
}

pub async fn exit(document: &Document) -> Result<(), ViewerError> {
    call_first(document.as_ref(), &EXIT).await
}

/// Whether the document has a fullscreen element under any vendor name.
pub fn is_fullscreen(document: &Document) -> bool {
    ELEMENT.iter().any(|name| {
        Reflect::get(document.as_ref(), &JsValue::from_str(name))
            .map(|element| !element.is_null() && !element.is_undefined())
            .unwrap_or(false)
    })
}

/// Calls `on_change` with the current state on every fullscreen change
/// notification. The listeners live as long as the page.
pub fn listen(document: &Document, on_change: impl Fn(bool) + 'static) {
    let doc = document.clone();
    let closure = Closure::<dyn Fn()>::new(move || on_change(is_fullscreen(&doc)));
    for event in CHANGE {
        if let Err(err) =
            document.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref())
        {
            leptos::logging::warn!("cannot listen to {event}: {}", js_reason(&err));
        }
    }
    closure.forget();
}
