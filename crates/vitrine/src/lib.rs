//! Vitrine: animated canvas backgrounds for portfolio pages.
//!
//! The effects live in [`vitrine_effects`], the lifecycle machinery in
//! [`vitrine_core`]; both are re-exported.
//! On `wasm32` this crate adds the browser runtime and the
//! `EffectMount` JavaScript binding.
//!
//! # Browser Usage (WASM)
//!
//! ```javascript
//! import init, { EffectMount, effects } from './vitrine.js';
//!
//! await init();
//! console.log(effects());
//! const bg = new EffectMount('background', 'particle-field');
//! window.addEventListener('beforeunload', () => bg.unmount());
//! ```

#![allow(clippy::doc_markdown, clippy::missing_errors_doc, clippy::must_use_candidate)]

pub use vitrine_core;
pub use vitrine_effects;

mod error;
mod options;

pub use error::MountError;
pub use options::MountOptions;

#[cfg(target_arch = "wasm32")]
pub mod browser;

#[cfg(target_arch = "wasm32")]
pub use browser::{Canvas2DSurface, EffectMount, RafScheduler, WindowViewport};

#[cfg(target_arch = "wasm32")]
mod bindings {
    use wasm_bindgen::prelude::*;

    /// Install the panic hook when the module loads.
    #[wasm_bindgen(start)]
    pub fn init() {
        console_error_panic_hook::set_once();
    }

    /// Names of every available effect.
    #[wasm_bindgen]
    pub fn effects() -> Vec<JsValue> {
        vitrine_effects::EffectKind::ALL
            .iter()
            .map(|kind| JsValue::from_str(kind.name()))
            .collect()
    }
}
