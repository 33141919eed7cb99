//! Browser runtime: Canvas2D drawing, animation frames and window resize.

mod mount;
mod raf;
mod surface;
mod window;

pub use mount::EffectMount;
pub use raf::{FrameCallback, RafScheduler};
pub use surface::Canvas2DSurface;
pub use window::{ResizeCallback, WindowViewport};
