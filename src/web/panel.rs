use std::rc::Rc;

use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys::{Document, EventTarget, HtmlCanvasElement, HtmlElement, MouseEvent, PointerEvent, WheelEvent};

use super::js_reason;
use crate::error::ViewerError;
use crate::fullscreen::PointerTarget;

const BACKDROP_STYLE: &str = "position:fixed;inset:0;z-index:1000;display:flex;\
align-items:center;justify-content:center;background:rgba(0,0,0,0.9);";
const CONTENT_STYLE: &str = "position:relative;height:100vh;max-width:100vw;\
display:flex;align-items:center;justify-content:center;";
const CANVAS_STYLE: &str = "height:100%;max-width:100%;object-fit:contain;touch-action:none;";
const CLOSE_STYLE: &str = "position:absolute;top:1rem;right:1rem;padding:0.25rem 0.75rem;\
border-radius:9999px;border:1px solid #059669;background:#d1fae5;cursor:pointer;";

/// Input arriving from an open panel overlay.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PanelInput {
    Click(PointerTarget),
    Close,
    PointerDown(f64, f64),
    PointerMove(f64, f64),
    PointerUp,
    Wheel(f64),
}

type Listener = (EventTarget, &'static str, Closure<dyn FnMut(web_sys::Event)>);

/// The DOM of a fullscreen panel: a dimmed backdrop, the content box with
/// the panel canvas, and a close button.
pub struct PanelOverlay {
    backdrop: HtmlElement,
    listeners: Vec<Listener>,
}

fn create<T: JsCast>(document: &Document, tag: &str) -> Result<T, ViewerError> {
    document
        .create_element(tag)
        .map_err(|err| ViewerError::Surface(js_reason(&err)))?
        .dyn_into::<T>()
        .map_err(|_| ViewerError::Surface(format!("<{tag}> has an unexpected type")))
}

fn styled(element: &HtmlElement, style: &str) -> Result<(), ViewerError> {
    element
        .set_attribute("style", style)
        .map_err(|err| ViewerError::Surface(js_reason(&err)))
}

/// Converts client coordinates into canvas pixels.
pub fn canvas_point(canvas: &HtmlCanvasElement, event: &MouseEvent) -> (f64, f64) {
    let rect = canvas.get_bounding_client_rect();
    let sx = if rect.width() > 0.0 {
        canvas.width() as f64 / rect.width()
    } else {
        1.0
    };
    let sy = if rect.height() > 0.0 {
        canvas.height() as f64 / rect.height()
    } else {
        1.0
    };
    (
        (event.client_x() as f64 - rect.left()) * sx,
        (event.client_y() as f64 - rect.top()) * sy,
    )
}

impl PanelOverlay {
    /// Builds the overlay with a `width` x `height` canvas and appends it to
    /// the body. Input is handed to `on_input` on a later task, so the
    /// handler may tear the overlay down. Dropping the overlay removes it.
    pub fn open(
        width: u32,
        height: u32,
        on_input: Rc<dyn Fn(PanelInput)>,
    ) -> Result<(Self, HtmlCanvasElement), ViewerError> {
        let document = web_sys::window()
            .and_then(|window| window.document())
            .ok_or_else(|| ViewerError::Surface("no document".into()))?;
        let body = document
            .body()
            .ok_or_else(|| ViewerError::Surface("no body".into()))?;

        let backdrop: HtmlElement = create(&document, "div")?;
        styled(&backdrop, BACKDROP_STYLE)?;
        let content: HtmlElement = create(&document, "div")?;
        styled(&content, CONTENT_STYLE)?;
        let canvas: HtmlCanvasElement = create(&document, "canvas")?;
        styled(&canvas, CANVAS_STYLE)?;
        canvas.set_width(width);
        canvas.set_height(height);
        let close: HtmlElement = create(&document, "button")?;
        styled(&close, CLOSE_STYLE)?;
        close.set_inner_text("Close");

        let append = |parent: &HtmlElement, child: &HtmlElement| {
            parent
                .append_child(child)
                .map(|_| ())
                .map_err(|err| ViewerError::Surface(js_reason(&err)))
        };
        append(&content, &canvas)?;
        append(&content, &close)?;
        append(&backdrop, &content)?;

        let mut overlay = Self {
            backdrop: backdrop.clone(),
            listeners: Vec::new(),
        };

        let deferred = move |input: PanelInput| {
            let on_input = on_input.clone();
            leptos::spawn_local(async move { on_input(input) });
        };

        {
            let deferred = deferred.clone();
            let backdrop_target: EventTarget = backdrop.clone().into();
            overlay.listen(backdrop.clone().into(), "click", move |event| {
                let hit = if event.target().as_ref() == Some(&backdrop_target) {
                    PointerTarget::Backdrop
                } else {
                    PointerTarget::Content
                };
                deferred(PanelInput::Click(hit));
            })?;
        }
        {
            let deferred = deferred.clone();
            overlay.listen(close.clone().into(), "click", move |event| {
                event.stop_propagation();
                deferred(PanelInput::Close);
            })?;
        }
        {
            let deferred = deferred.clone();
            let target = canvas.clone();
            overlay.listen(canvas.clone().into(), "pointerdown", move |event| {
                if let Some(event) = event.dyn_ref::<PointerEvent>() {
                    let (x, y) = canvas_point(&target, event);
                    deferred(PanelInput::PointerDown(x, y));
                }
            })?;
        }
        {
            let deferred = deferred.clone();
            let target = canvas.clone();
            overlay.listen(canvas.clone().into(), "pointermove", move |event| {
                if let Some(event) = event.dyn_ref::<PointerEvent>() {
                    let (x, y) = canvas_point(&target, event);
                    deferred(PanelInput::PointerMove(x, y));
                }
            })?;
        }
        {
            let deferred = deferred.clone();
            overlay.listen(canvas.clone().into(), "pointerup", move |_| {
                deferred(PanelInput::PointerUp);
            })?;
        }
        {
            let deferred = deferred.clone();
            overlay.listen(canvas.clone().into(), "wheel", move |event| {
                if let Some(event) = event.dyn_ref::<WheelEvent>() {
                    event.prevent_default();
                    deferred(PanelInput::Wheel(event.delta_y()));
                }
            })?;
        }

        append(&body, &backdrop)?;
        Ok((overlay, canvas))
    }

    fn listen(
        &mut self,
        target: EventTarget,
        event: &'static str,
        handler: impl FnMut(web_sys::Event) + 'static,
    ) -> Result<(), ViewerError> {
        let closure = Closure::<dyn FnMut(web_sys::Event)>::new(handler);
        target
            .add_event_listener_with_callback(event, closure.as_ref().unchecked_ref())
            .map_err(|err| ViewerError::Surface(js_reason(&err)))?;
        self.listeners.push((target, event, closure));
        Ok(())
    }
}

impl Drop for PanelOverlay {
    /// Detaches the overlay and its listeners from the page.
    fn drop(&mut self) {
        for (target, event, closure) in &self.listeners {
            let _ = target.remove_event_listener_with_callback(event, closure.as_ref().unchecked_ref());
        }
        self.backdrop.remove();
    }
}
