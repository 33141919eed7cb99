//! JavaScript entry point: mount an effect on a `<canvas>`.

use super::raf::{FrameCallback, RafScheduler};
use super::surface::Canvas2DSurface;
use super::window::{ResizeCallback, WindowViewport};
use crate::{MountError, MountOptions};
use std::cell::RefCell;
use std::rc::{Rc, Weak};
use vitrine_core::{AnimationDriver, CanvasComponent, Effect, Point, Viewport};
use vitrine_effects::EffectKind;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{HtmlCanvasElement, MouseEvent, Window};

type BrowserComponent =
    CanvasComponent<Box<dyn Effect>, Canvas2DSurface, RafScheduler, WindowViewport>;

/// A running effect bound to one canvas element.
///
/// ```javascript
/// import init, { EffectMount } from './vitrine.js';
///
/// await init();
/// const rain = new EffectMount('matrix', 'matrix-rain', '{"max_fps": 30}');
/// // later
/// rain.unmount();
/// ```
#[wasm_bindgen]
pub struct EffectMount {
    component: Rc<RefCell<BrowserComponent>>,
    frame: FrameCallback,
    resize: ResizeCallback,
    pointer: Option<Closure<dyn FnMut(MouseEvent)>>,
    window: Window,
}

#[wasm_bindgen]
impl EffectMount {
    /// Mount `effect` on the canvas with id `canvas_id`. `options` is an
    /// optional JSON string (see `MountOptions`).
    #[wasm_bindgen(constructor)]
    pub fn new(canvas_id: &str, effect: &str, options: Option<String>) -> Result<EffectMount, JsValue> {
        console_error_panic_hook::set_once();
        Self::mount(canvas_id, effect, options.as_deref()).map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Stop animating and release every listener. Safe to call twice.
    pub fn unmount(&mut self) {
        self.component.borrow_mut().unmount();
        if let Some(pointer) = self.pointer.take() {
            self.window
                .remove_event_listener_with_callback("mousemove", pointer.as_ref().unchecked_ref())
                .ok();
        }
        self.frame.borrow_mut().take();
        self.resize.borrow_mut().take();
    }

    /// Whether the effect is still mounted.
    #[wasm_bindgen(getter)]
    pub fn mounted(&self) -> bool {
        self.component.borrow().is_mounted()
    }

    /// Effect name.
    #[wasm_bindgen(getter)]
    pub fn effect(&self) -> String {
        self.component.borrow().driver().effect().name().to_string()
    }

    /// Live entities.
    #[wasm_bindgen(getter)]
    pub fn entities(&self) -> usize {
        self.component.borrow().driver().effect().entity_count()
    }

    /// Frames drawn so far.
    #[wasm_bindgen(getter)]
    pub fn frames(&self) -> f64 {
        self.component.borrow().driver().frames_rendered() as f64
    }
}

impl EffectMount {
    fn mount(canvas_id: &str, effect: &str, options: Option<&str>) -> Result<Self, MountError> {
        let window = web_sys::window().ok_or(MountError::NoWindow)?;
        let document = window.document().ok_or(MountError::NoDocument)?;
        let canvas = document
            .get_element_by_id(canvas_id)
            .ok_or_else(|| MountError::CanvasNotFound(canvas_id.to_string()))?
            .dyn_into::<HtmlCanvasElement>()
            .map_err(|_| MountError::NotACanvas(canvas_id.to_string()))?;

        let options = MountOptions::from_json(options)?;
        let kind: EffectKind = effect.parse()?;
        let effect = options.build_effect(kind)?;
        let config = options.driver_config(random_seed());

        let frame: FrameCallback = Rc::new(RefCell::new(None));
        let resize: ResizeCallback = Rc::new(RefCell::new(None));
        let surface = Canvas2DSurface::new(canvas.clone());
        if surface.is_none() {
            web_sys::console::debug_1(&JsValue::from_str("vitrine: no 2d context, effect idle"));
        }
        let driver = AnimationDriver::new(
            effect,
            surface,
            RafScheduler::new(window.clone(), Rc::clone(&frame)),
            config,
        );
        let viewport = WindowViewport::new(window.clone(), Rc::clone(&resize));
        let component = Rc::new(RefCell::new(CanvasComponent::new(
            driver,
            viewport,
            options.resize_quiet_ms,
        )));

        *frame.borrow_mut() = Some(frame_closure(Rc::downgrade(&component)));
        *resize.borrow_mut() = Some(resize_closure(Rc::downgrade(&component)));
        component.borrow_mut().mount()?;

        let pointer = pointer_closure(Rc::downgrade(&component), canvas);
        window
            .add_event_listener_with_callback("mousemove", pointer.as_ref().unchecked_ref())
            .ok();

        Ok(Self {
            component,
            frame,
            resize,
            pointer: Some(pointer),
            window,
        })
    }
}

impl Drop for EffectMount {
    fn drop(&mut self) {
        self.unmount();
    }
}

fn now_ms() -> f64 {
    web_sys::window()
        .and_then(|w| w.performance())
        .map_or_else(js_sys::Date::now, |p| p.now())
}

fn random_seed() -> u64 {
    let mut bytes = [0u8; 8];
    match getrandom::getrandom(&mut bytes) {
        Ok(()) => u64::from_le_bytes(bytes),
        Err(_) => js_sys::Date::now().to_bits(),
    }
}

fn frame_closure(component: Weak<RefCell<BrowserComponent>>) -> Closure<dyn FnMut(f64)> {
    Closure::new(move |timestamp: f64| {
        let Some(component) = component.upgrade() else {
            return;
        };
        let Ok(mut component) = component.try_borrow_mut() else {
            return;
        };
        if let Some(request) = component.driver().pending_request() {
            component.on_frame(request, timestamp);
        }
    })
}

fn resize_closure(component: Weak<RefCell<BrowserComponent>>) -> Closure<dyn FnMut()> {
    Closure::new(move || {
        let Some(component) = component.upgrade() else {
            return;
        };
        let Ok(mut component) = component.try_borrow_mut() else {
            return;
        };
        let size = component.viewport().size();
        if let Err(err) = component.on_resize(size, now_ms()) {
            web_sys::console::warn_1(&JsValue::from_str(&format!("vitrine: {err}")));
        }
    })
}

fn pointer_closure(
    component: Weak<RefCell<BrowserComponent>>,
    canvas: HtmlCanvasElement,
) -> Closure<dyn FnMut(MouseEvent)> {
    Closure::new(move |event: MouseEvent| {
        let Some(component) = component.upgrade() else {
            return;
        };
        let Ok(mut component) = component.try_borrow_mut() else {
            return;
        };
        let rect = canvas.get_bounding_client_rect();
        let point = Point::new(
            (f64::from(event.client_x()) - rect.left()) as f32,
            (f64::from(event.client_y()) - rect.top()) as f32,
        );
        component.pointer_moved(Some(point));
    })
}
