//! Stratus Render - wgpu backend for the Stratus render loop
//!
//! [`CloudRenderer`] owns the device, the display surface, the two parameter
//! block buffers and the current-frame target, and implements
//! [`stratus_core::FrameBackend`]. The history texture it allocates is handed
//! to the loop, which owns it from then on.

mod pipelines;
mod renderer;
mod settings;
mod targets;

pub use renderer::{CloudRenderer, InFlightFrame};
pub use settings::RendererSettings;
pub use targets::{ColorTarget, HistoryTexture};
