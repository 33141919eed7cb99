//! Window size and `resize` events.

use std::cell::RefCell;
use std::rc::Rc;
use vitrine_core::{ListenerId, Size, Viewport};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::Window;

/// Shared slot holding the resize callback.
pub type ResizeCallback = Rc<RefCell<Option<Closure<dyn FnMut()>>>>;

/// [`Viewport`] over the browser window.
pub struct WindowViewport {
    window: Window,
    callback: ResizeCallback,
    listeners: Vec<ListenerId>,
    next_id: u64,
}

impl WindowViewport {
    /// Viewport that registers whatever closure is in `callback`.
    pub fn new(window: Window, callback: ResizeCallback) -> Self {
        Self {
            window,
            callback,
            listeners: Vec::new(),
            next_id: 0,
        }
    }

    fn listen(&self, add: bool) {
        let slot = self.callback.borrow();
        let Some(cb) = slot.as_ref() else {
            return;
        };
        let function: &js_sys::Function = cb.as_ref().unchecked_ref();
        let result = if add {
            self.window.add_event_listener_with_callback("resize", function)
        } else {
            self.window.remove_event_listener_with_callback("resize", function)
        };
        result.ok();
    }
}

fn dimension(value: Result<JsValue, JsValue>) -> f32 {
    value.ok().and_then(|v| v.as_f64()).unwrap_or(0.0) as f32
}

impl Viewport for WindowViewport {
    fn size(&self) -> Size {
        Size::new(
            dimension(self.window.inner_width()),
            dimension(self.window.inner_height()),
        )
    }

    fn subscribe(&mut self) -> ListenerId {
        self.next_id += 1;
        let id = ListenerId(self.next_id);
        if self.listeners.is_empty() {
            self.listen(true);
        }
        self.listeners.push(id);
        id
    }

    fn unsubscribe(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|l| *l != id);
        let removed = self.listeners.len() < before;
        if removed && self.listeners.is_empty() {
            self.listen(false);
        }
        removed
    }

    fn listener_count(&self) -> usize {
        self.listeners.len()
    }
}
