//! Stratus Core - per-frame simulation and presentation loop
//!
//! Everything here is independent of the graphics API. The loop talks to the
//! GPU through the [`FrameBackend`] trait, which `stratus-render` implements
//! with wgpu and the tests implement with a recording fake.
//!
//! - [`jitter`]: Halton sub-pixel offsets for temporal accumulation
//! - [`input`]: action set and the `held` / `pressed_edge` input snapshot
//! - [`scene`]: camera pose, environment parameters and the update policy
//! - [`params`]: GPU parameter blocks derived from the scene each frame
//! - [`history`]: the previous frame's resolved image
//! - [`render_loop`]: the eight-step tick state machine

pub mod config;
pub mod history;
pub mod input;
pub mod jitter;
pub mod params;
pub mod render_loop;
pub mod scene;

mod error;

pub use config::{ControlTuning, LoopConfig, ProjectionConfig, ResetDefaults};
pub use error::{Error, ParameterBlockKind, Result};
pub use history::{HistoryBuffer, HistoryExtent};
pub use input::{Action, InputFrame, InputSnapshot, KeyboardState};
pub use jitter::{FrameIndex, JitterSequence};
pub use params::{CameraBlock, FrameParameterBuilder, FrameParameters, WeatherBlock};
pub use render_loop::{FrameBackend, FrameContext, FrameTiming, LoopState, RenderLoop, TickOutcome};
pub use scene::{CameraPose, Environment, SceneState, Toggles};
