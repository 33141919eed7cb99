//! WASM browser tests - run with `wasm-pack test --headless --chrome`

#![cfg(target_arch = "wasm32")]

use vitrine::{Canvas2DSurface, EffectMount};
use vitrine_core::{Canvas, Color, Paint, Point, Rect, Size, TextStyle};
use wasm_bindgen::JsCast;
use wasm_bindgen_test::*;
use web_sys::HtmlCanvasElement;

wasm_bindgen_test_configure!(run_in_browser);

fn canvas(id: &str) -> HtmlCanvasElement {
    let document = web_sys::window().unwrap().document().unwrap();
    let element = document.create_element("canvas").unwrap();
    element.set_id(id);
    document.body().unwrap().append_child(&element).unwrap();
    element.dyn_into().unwrap()
}

#[wasm_bindgen_test]
fn test_surface_resize_sets_pixels() {
    let mut surface = Canvas2DSurface::new(canvas("surface-resize")).unwrap();
    surface.resize(Size::new(320.0, 200.0));
    assert_eq!(surface.size(), Size::new(320.0, 200.0));
    assert_eq!(surface.element().width(), 320);
}

#[wasm_bindgen_test]
fn test_surface_draws_without_panicking() {
    let mut surface = Canvas2DSurface::new(canvas("surface-draw")).unwrap();
    surface.resize(Size::new(100.0, 100.0));
    surface.clear();
    surface.fade(Color::BLACK.with_alpha(0.05));
    surface.fill_circle(Point::new(50.0, 50.0), 10.0, &Paint::radial(Point::new(50.0, 50.0), 10.0, Color::WHITE, Color::TRANSPARENT));
    surface.fill_rect(
        Rect::new(0.0, 0.0, 100.0, 100.0),
        &Paint::linear(Point::ORIGIN, Point::new(100.0, 100.0), Color::BLACK, Color::WHITE),
    );
    surface.draw_polygon(
        &[Point::new(0.0, 0.0), Point::new(10.0, 0.0), Point::new(5.0, 8.0)],
        Some(Color::WHITE),
        Some((Color::BLACK, 1.0)),
    );
    surface.draw_text("SELECT", Point::new(10.0, 20.0), &TextStyle::default());
}

#[wasm_bindgen_test]
fn test_mount_and_unmount() {
    canvas("mount-rain");
    let mut mount = EffectMount::new("mount-rain", "matrix-rain", Some(r#"{"seed": 3}"#.into())).unwrap();
    assert!(mount.mounted());
    assert_eq!(mount.effect(), "matrix-rain");
    mount.unmount();
    assert!(!mount.mounted());
    mount.unmount();
}

#[wasm_bindgen_test]
fn test_mount_rejects_unknown_effect() {
    canvas("mount-unknown");
    assert!(EffectMount::new("mount-unknown", "lava-lamp", None).is_err());
}

#[wasm_bindgen_test]
fn test_mount_rejects_missing_canvas() {
    assert!(EffectMount::new("no-such-canvas", "particle-field", None).is_err());
}
