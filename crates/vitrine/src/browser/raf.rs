//! `requestAnimationFrame` scheduling.

use std::cell::RefCell;
use std::rc::Rc;
use vitrine_core::{FrameRequest, FrameScheduler};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::Window;

/// Shared slot holding the frame callback. The mount fills it after the
/// component exists, since the callback needs a handle to the component.
pub type FrameCallback = Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>;

/// [`FrameScheduler`] backed by the window's animation frames.
pub struct RafScheduler {
    window: Window,
    callback: FrameCallback,
}

impl RafScheduler {
    /// Scheduler that will invoke whatever closure is in `callback`.
    pub fn new(window: Window, callback: FrameCallback) -> Self {
        Self { window, callback }
    }
}

impl FrameScheduler for RafScheduler {
    fn request_frame(&mut self) -> FrameRequest {
        let id = self
            .callback
            .borrow()
            .as_ref()
            .and_then(|cb| {
                self.window
                    .request_animation_frame(cb.as_ref().unchecked_ref())
                    .ok()
            });
        match id {
            Some(id) => FrameRequest(u64::from(id.unsigned_abs())),
            None => {
                web_sys::console::warn_1(&JsValue::from_str("requestAnimationFrame unavailable"));
                FrameRequest(0)
            }
        }
    }

    fn cancel_frame(&mut self, request: FrameRequest) {
        if let Ok(id) = i32::try_from(request.0) {
            if id > 0 {
                self.window.cancel_animation_frame(id).ok();
            }
        }
    }
}
