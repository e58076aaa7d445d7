//! The per-frame render loop
//!
//! Each tick runs, in order:
//!
//! 1. input (a close request stops the loop before anything else happens)
//! 2. scene update
//! 3. parameter build
//! 4. parameter upload
//! 5. scene render, reading the history buffer
//! 6. resolve into the history buffer
//! 7. composite of the history buffer onto the surface
//! 8. present, frame advance, then the quit key check

use crate::config::{ControlTuning, LoopConfig};
use crate::history::HistoryBuffer;
use crate::input::{Action, InputSnapshot};
use crate::jitter::FrameIndex;
use crate::params::{CameraBlock, FrameParameterBuilder, FrameParameters, WeatherBlock};
use crate::scene::SceneState;
use crate::Result;
use glam::Mat4;

/// GPU side of the loop.
///
/// `History` is the storage behind the [`HistoryBuffer`]; `Frame` is whatever
/// the backend needs to carry one frame from render to present (for wgpu, the
/// command encoder and the acquired surface texture).
pub trait FrameBackend {
    type History;
    type Frame;

    /// Allocate history storage at the output resolution
    fn create_history(&mut self, width: u32, height: u32) -> Result<Self::History>;

    /// Recreate size-dependent targets (surface, current-frame target)
    fn resize(&mut self, width: u32, height: u32) -> Result<()>;

    /// Overwrite the whole camera block. On error the old contents stay.
    fn upload_camera(&mut self, block: &CameraBlock) -> Result<()>;

    /// Overwrite the whole weather block. On error the old contents stay.
    fn upload_weather(&mut self, block: &WeatherBlock) -> Result<()>;

    /// Draw the scene into the current-frame target, sampling `history`
    fn render_scene(
        &mut self,
        params: &FrameParameters,
        history: &HistoryBuffer<Self::History>,
    ) -> Result<Self::Frame>;

    /// Copy the current-frame target into `history`
    fn resolve(&mut self, frame: &mut Self::Frame, history: &mut Self::History);

    /// Draw the history buffer onto the display surface
    fn composite(
        &mut self,
        frame: &mut Self::Frame,
        history: &HistoryBuffer<Self::History>,
    ) -> Result<()>;

    /// Hand the frame to the display. May block on vsync.
    fn present(&mut self, frame: Self::Frame) -> Result<()>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    Running,
    Stopped,
}

/// What a single tick did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// The frame went all the way to the display
    Presented(FrameIndex),
    /// A per-frame GPU step failed; the loop keeps running
    Skipped,
    /// The loop is stopped; nothing further will render
    Stopped,
}

/// Timing for one tick, in seconds
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FrameTiming {
    /// Time since the previous tick
    pub dt: f32,
    /// Time since the loop started
    pub elapsed: f32,
}

impl FrameTiming {
    /// Longest step a single tick may take, in seconds
    pub const MAX_DT: f32 = 0.1;

    /// `dt` is clamped to `[0, MAX_DT]` so a stalled event loop does not
    /// turn into one huge camera jump.
    pub fn new(dt: f32, elapsed: f32) -> Self {
        Self { dt: dt.clamp(0.0, Self::MAX_DT), elapsed }
    }
}

/// Loop-owned state threaded through every step
#[derive(Debug)]
pub struct FrameContext<S> {
    pub scene: SceneState,
    pub frame: FrameIndex,
    pub prev_view_proj: Mat4,
    pub history: HistoryBuffer<S>,
    pub width: u32,
    pub height: u32,
}

/// Drives a [`FrameBackend`] one tick at a time
pub struct RenderLoop<S> {
    state: LoopState,
    context: FrameContext<S>,
    builder: FrameParameterBuilder,
    tuning: ControlTuning,
}

impl<S> RenderLoop<S> {
    /// Allocate the history buffer and enter `Running`.
    ///
    /// Any backend failure here is fatal and returned before a frame renders.
    pub fn new<B>(config: LoopConfig, backend: &mut B) -> Result<Self>
    where
        B: FrameBackend<History = S>,
    {
        let (width, height) = (config.width.max(1), config.height.max(1));
        let storage = backend.create_history(width, height)?;
        log::info!("Render loop started at {}x{}", width, height);

        Ok(Self {
            state: LoopState::Running,
            context: FrameContext {
                scene: config.initial_scene,
                frame: FrameIndex::FIRST,
                prev_view_proj: Mat4::IDENTITY,
                history: HistoryBuffer::new(storage, width, height),
                width,
                height,
            },
            builder: FrameParameterBuilder::new(config.projection),
            tuning: config.tuning,
        })
    }

    /// Run one tick
    pub fn tick<B, I>(&mut self, backend: &mut B, input: &I, timing: FrameTiming) -> TickOutcome
    where
        B: FrameBackend<History = S>,
        I: InputSnapshot + ?Sized,
    {
        if self.state == LoopState::Stopped {
            return TickOutcome::Stopped;
        }

        // 1. Input
        if input.close_requested() {
            self.stop("close requested");
            return TickOutcome::Stopped;
        }

        // 2. Scene update
        let ctx = &mut self.context;
        ctx.scene = ctx.scene.update(input, timing.dt, &self.tuning);

        // 3. Parameters
        let mut params = self.builder.build(
            &ctx.scene,
            ctx.frame,
            ctx.prev_view_proj,
            ctx.width,
            ctx.height,
            timing.elapsed,
        );
        // Nothing to blend against until a frame has been resolved
        if ctx.history.resolved_frame().is_none() {
            params.camera.taa_enabled = 0.0;
        }
        log::trace!("Frame {} jitter {:?}", params.frame.get(), params.camera.jitter);

        // 4. Upload
        if let Err(e) = backend.upload_camera(&params.camera) {
            log::warn!("{}; keeping previous camera block", e);
        }
        if let Err(e) = backend.upload_weather(&params.weather) {
            log::warn!("{}; keeping previous weather block", e);
        }

        // 5-8. Render, resolve, composite, present
        let outcome = match Self::draw(ctx, backend, &params) {
            Ok(()) => TickOutcome::Presented(params.frame),
            Err(e) => {
                log::warn!("Frame {} not presented: {}", params.frame.get(), e);
                TickOutcome::Skipped
            }
        };

        if input.pressed_edge(Action::Quit) {
            self.stop("quit key");
            return TickOutcome::Stopped;
        }

        outcome
    }

    fn draw<B>(ctx: &mut FrameContext<S>, backend: &mut B, params: &FrameParameters) -> Result<()>
    where
        B: FrameBackend<History = S>,
    {
        let mut frame = backend.render_scene(params, &ctx.history)?;

        ctx.history
            .overwrite(params.frame, |storage| backend.resolve(&mut frame, storage));

        // The history now holds this frame, so the index moves on even if the
        // surface refuses it below.
        ctx.prev_view_proj = params.view_proj;
        ctx.frame = ctx.frame.next();

        backend.composite(&mut frame, &ctx.history)?;
        backend.present(frame)
    }

    /// Recreate the history buffer and size-dependent backend targets
    pub fn resize<B>(&mut self, backend: &mut B, width: u32, height: u32) -> Result<()>
    where
        B: FrameBackend<History = S>,
    {
        let (width, height) = (width.max(1), height.max(1));
        log::info!("Resizing render loop to {}x{}", width, height);
        backend.resize(width, height)?;
        let storage = backend.create_history(width, height)?;
        self.context.history.recreate(storage, width, height);
        self.context.width = width;
        self.context.height = height;
        Ok(())
    }

    fn stop(&mut self, reason: &str) {
        let last = self.context.frame.get() - 1;
        log::info!("Render loop stopping ({}) after frame {}", reason, last);
        self.state = LoopState::Stopped;
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == LoopState::Running
    }

    pub fn scene(&self) -> &SceneState {
        &self.context.scene
    }

    /// Index the next rendered frame will get
    pub fn frame_index(&self) -> FrameIndex {
        self.context.frame
    }

    pub fn prev_view_proj(&self) -> Mat4 {
        self.context.prev_view_proj
    }

    pub fn history(&self) -> &HistoryBuffer<S> {
        &self.context.history
    }

    pub fn context(&self) -> &FrameContext<S> {
        &self.context
    }
}
