//! Per-frame GPU parameter blocks
//!
//! [`FrameParameterBuilder::build`] is a pure function of the scene, the frame
//! index, the previous view-projection and the target size. Matrices are
//! transposed (row-major) before they go into a block; the shaders multiply
//! row vectors, `v * M`.

use crate::config::ProjectionConfig;
use crate::jitter::{FrameIndex, JitterSequence};
use crate::scene::SceneState;
use glam::{Mat4, Vec2, Vec3};

/// Camera parameter block: must match the WGSL `Camera` struct (224 bytes)
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct CameraBlock {
    pub view: Mat4,
    pub proj: Mat4,
    pub prev_view_proj: Mat4,
    pub cam_pos: Vec3,
    /// Seconds since the loop started
    pub time: f32,
    /// Sub-pixel offset in UV units
    pub jitter: Vec2,
    /// 1.0 when temporal accumulation is on
    pub taa_enabled: f32,
    pub _pad: f32,
}

/// Weather parameter block: must match the WGSL `Weather` struct (48 bytes)
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct WeatherBlock {
    pub sun_dir: Vec3,
    pub g: f32,
    pub coverage: f32,
    pub density: f32,
    pub base_height: f32,
    pub thickness: f32,
    pub wind: Vec2,
    pub step_mul: f32,
    /// 1.0 when jitter is on
    pub jitter_enabled: f32,
}

/// Everything the GPU needs for one frame
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct FrameParameters {
    pub frame: FrameIndex,
    pub camera: CameraBlock,
    pub weather: WeatherBlock,
    /// This frame's unjittered view-projection in column-major form; becomes
    /// the next frame's `prev_view_proj`
    pub view_proj: Mat4,
}

/// Derives [`FrameParameters`] from scene state
#[derive(Debug, Clone, Copy, Default)]
pub struct FrameParameterBuilder {
    pub projection: ProjectionConfig,
    pub jitter: JitterSequence,
}

impl FrameParameterBuilder {
    pub fn new(projection: ProjectionConfig) -> Self {
        Self { projection, jitter: JitterSequence }
    }

    pub fn view_matrix(state: &SceneState) -> Mat4 {
        Mat4::look_to_lh(state.camera.position, state.camera.forward(), Vec3::Y)
    }

    pub fn projection_matrix(&self, width: u32, height: u32) -> Mat4 {
        let aspect = width.max(1) as f32 / height.max(1) as f32;
        Mat4::perspective_lh(
            self.projection.fov_y_radians(),
            aspect,
            self.projection.near,
            self.projection.far,
        )
    }

    pub fn build(
        &self,
        state: &SceneState,
        frame: FrameIndex,
        prev_view_proj: Mat4,
        width: u32,
        height: u32,
        elapsed: f32,
    ) -> FrameParameters {
        let view = Self::view_matrix(state);
        let proj = self.projection_matrix(width, height);
        let view_proj = proj * view;

        let jitter = if state.toggles.jitter {
            self.jitter.offset(frame, width, height)
        } else {
            Vec2::ZERO
        };

        let camera = CameraBlock {
            view: view.transpose(),
            proj: proj.transpose(),
            prev_view_proj: prev_view_proj.transpose(),
            cam_pos: state.camera.position,
            time: elapsed,
            jitter,
            taa_enabled: flag(state.toggles.accumulation),
            _pad: 0.0,
        };

        let env = &state.environment;
        let weather = WeatherBlock {
            sun_dir: env.sun_direction(),
            g: env.g,
            coverage: env.coverage(),
            density: env.density(),
            base_height: env.base_height,
            thickness: env.thickness,
            wind: env.wind,
            step_mul: env.step_multiplier,
            jitter_enabled: flag(state.toggles.jitter),
        };

        FrameParameters { frame, camera, weather, view_proj }
    }
}

fn flag(enabled: bool) -> f32 {
    if enabled { 1.0 } else { 0.0 }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::{CameraPose, Toggles};
    use glam::Vec4;

    fn builder() -> FrameParameterBuilder {
        FrameParameterBuilder::new(ProjectionConfig::default())
    }

    #[test]
    fn block_sizes_match_shader_layout() {
        assert_eq!(std::mem::size_of::<CameraBlock>(), 224);
        assert_eq!(std::mem::size_of::<WeatherBlock>(), 48);
    }

    #[test]
    fn jitter_disabled_gives_exact_zero() {
        let state = SceneState::default().with_toggles(Toggles { accumulation: true, jitter: false });
        let mut frame = FrameIndex::FIRST;
        for _ in 0..64 {
            let params = builder().build(&state, frame, Mat4::IDENTITY, 1280, 720, 0.0);
            assert_eq!(params.camera.jitter, Vec2::ZERO);
            assert_eq!(params.weather.jitter_enabled, 0.0);
            frame = frame.next();
        }
    }

    #[test]
    fn jitter_follows_frame_index() {
        let state = SceneState::default();
        let frame = FrameIndex::new(5).unwrap();
        let params = builder().build(&state, frame, Mat4::IDENTITY, 640, 480, 0.0);
        assert_eq!(params.camera.jitter, JitterSequence.offset(frame, 640, 480));
        assert_eq!(params.weather.jitter_enabled, 1.0);
    }

    #[test]
    fn matrices_are_transposed_for_upload() {
        let state = SceneState::default();
        let prev = Mat4::from_translation(Vec3::new(1.0, 2.0, 3.0));
        let b = builder();
        let params = b.build(&state, FrameIndex::FIRST, prev, 1280, 720, 0.0);
        assert_eq!(params.camera.view, FrameParameterBuilder::view_matrix(&state).transpose());
        assert_eq!(params.camera.proj, b.projection_matrix(1280, 720).transpose());
        assert_eq!(params.camera.prev_view_proj, prev.transpose());
        assert_eq!(params.camera.prev_view_proj.transpose(), prev);
    }

    #[test]
    fn view_looks_down_the_camera_forward() {
        let pose = CameraPose { yaw: 0.4, pitch: 0.1, ..CameraPose::default() };
        let state = SceneState::default().with_camera(pose);
        let view = FrameParameterBuilder::view_matrix(&state);
        let ahead = view.transform_point3(pose.position + pose.forward() * 10.0);
        assert!(ahead.abs_diff_eq(Vec3::new(0.0, 0.0, 10.0), 1e-2));
    }

    #[test]
    fn projection_uses_aspect_ratio() {
        let proj = builder().projection_matrix(1600, 800);
        let clip = proj * Vec4::new(2.0, 1.0, 10.0, 1.0);
        // 60 degree vertical FOV with a 2:1 aspect: x and y scale by 2:1
        let fy = 1.0 / (30f32.to_radians()).tan();
        assert!((proj.y_axis.y - fy).abs() < 1e-5);
        assert!((proj.x_axis.x - fy / 2.0).abs() < 1e-5);
        assert!(clip.w > 0.0);
    }

    #[test]
    fn weather_block_copies_environment() {
        let state = SceneState::default();
        let params = builder().build(&state, FrameIndex::FIRST, Mat4::IDENTITY, 8, 8, 3.5);
        let env = state.environment;
        assert_eq!(params.weather.coverage, env.coverage());
        assert_eq!(params.weather.density, env.density());
        assert_eq!(params.weather.g, 0.65);
        assert_eq!(params.weather.base_height, 1500.0);
        assert_eq!(params.weather.thickness, 2000.0);
        assert_eq!(params.weather.wind, Vec2::new(15.0, 5.0));
        assert_eq!(params.weather.step_mul, 1.0);
        assert!((params.weather.sun_dir.length() - 1.0).abs() < 1e-6);
        assert_eq!(params.camera.time, 3.5);
        assert_eq!(params.camera.taa_enabled, 1.0);
    }

    #[test]
    fn build_is_pure() {
        let state = SceneState::default();
        let frame = FrameIndex::new(17).unwrap();
        let a = builder().build(&state, frame, Mat4::IDENTITY, 1280, 720, 1.0);
        let b = builder().build(&state, frame, Mat4::IDENTITY, 1280, 720, 1.0);
        assert_eq!(bytemuck::bytes_of(&a.camera), bytemuck::bytes_of(&b.camera));
        assert_eq!(bytemuck::bytes_of(&a.weather), bytemuck::bytes_of(&b.weather));
    }
}
