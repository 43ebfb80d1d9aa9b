use std::cell::RefCell;
use std::rc::Rc;

use leptos::logging::error;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;

use super::WebTarget;
use crate::render_loop::FrameTicket;
use crate::viewer::Viewer;

fn request_animation_frame(f: &Closure<dyn FnMut()>) -> bool {
    let Some(window) = web_sys::window() else {
        return false;
    };
    match window.request_animation_frame(f.as_ref().unchecked_ref()) {
        Ok(_) => true,
        Err(err) => {
            error!("requestAnimationFrame failed: {err:?}");
            false
        }
    }
}

/// Drives `viewer.step(ticket)` once per animation frame until the ticket
/// is superseded.
pub fn run(viewer: Rc<RefCell<Viewer<WebTarget>>>, ticket: FrameTicket) {
    let f: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
    let g = f.clone();

    *g.borrow_mut() = Some(Closure::new(move || {
        if !viewer.borrow().is_frame_current(ticket) {
            let _ = f.borrow_mut().take();
            return;
        }
        if let Some(next) = f.borrow().as_ref() {
            request_animation_frame(next);
        }
        viewer.borrow_mut().step(ticket);
    }));

    if let Some(first) = g.borrow().as_ref() {
        request_animation_frame(first);
    }
}
