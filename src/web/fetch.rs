use js_sys::{Reflect, Uint8Array};
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{ReadableStreamDefaultReader, Response};

use super::js_reason;
use crate::error::ViewerError;
use crate::loader::LoadProgress;

/// Downloads `path`, reporting progress after every received chunk.
pub async fn fetch_bytes(
    path: &str,
    mut progress: impl FnMut(LoadProgress),
) -> Result<Vec<u8>, ViewerError> {
    let fail = |err: JsValue| ViewerError::fetch(path, js_reason(&err));
    let window = web_sys::window().ok_or_else(|| ViewerError::fetch(path, "no window"))?;
    let response: Response = JsFuture::from(window.fetch_with_str(path))
        .await
        .map_err(fail)?
        .dyn_into()
        .map_err(fail)?;
    if !response.ok() {
        return Err(ViewerError::fetch(
            path,
            format!("HTTP {} {}", response.status(), response.status_text()),
        ));
    }

    let total = response
        .headers()
        .get("content-length")
        .ok()
        .flatten()
        .and_then(|len| len.parse::<u64>().ok());

    let Some(body) = response.body() else {
        let buffer = JsFuture::from(response.array_buffer().map_err(fail)?)
            .await
            .map_err(fail)?;
        let bytes = Uint8Array::new(&buffer).to_vec();
        progress(LoadProgress {
            loaded: bytes.len() as u64,
            total,
        });
        return Ok(bytes);
    };

    let reader: ReadableStreamDefaultReader = body
        .get_reader()
        .dyn_into()
        .map_err(|_| ViewerError::fetch(path, "response body has no default reader"))?;
    let mut bytes = Vec::with_capacity(total.unwrap_or(0) as usize);
    loop {
        let chunk = JsFuture::from(reader.read()).await.map_err(fail)?;
        let done = Reflect::get(&chunk, &JsValue::from_str("done"))
            .map_err(fail)?
            .as_bool()
            .unwrap_or(true);
        if done {
            break;
        }
        let value = Reflect::get(&chunk, &JsValue::from_str("value")).map_err(fail)?;
        bytes.extend(Uint8Array::new(&value).to_vec());
        progress(LoadProgress {
            loaded: bytes.len() as u64,
            total,
        });
    }
    Ok(bytes)
}
