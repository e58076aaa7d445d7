//! Loop, projection and control configuration

use crate::scene::SceneState;
use glam::Vec2;
use std::f32::consts::FRAC_PI_2;

/// Perspective projection parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProjectionConfig {
    /// Vertical field of view in degrees
    pub fov_y_degrees: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for ProjectionConfig {
    fn default() -> Self {
        Self {
            fov_y_degrees: 60.0,
            near: 0.1,
            far: 50_000.0,
        }
    }
}

impl ProjectionConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_fov_y_degrees(mut self, fov: f32) -> Self {
        self.fov_y_degrees = fov.clamp(1.0, 179.0);
        self
    }

    /// Set the clip planes. `far` is kept strictly beyond `near`.
    pub fn with_clip_planes(mut self, near: f32, far: f32) -> Self {
        self.near = near.max(1e-4);
        self.far = far.max(self.near * 2.0);
        self
    }

    pub fn fov_y_radians(&self) -> f32 {
        self.fov_y_degrees.to_radians()
    }
}

/// Values restored by the reset action
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResetDefaults {
    pub coverage: f32,
    pub density: f32,
    pub wind: Vec2,
}

impl Default for ResetDefaults {
    fn default() -> Self {
        Self {
            coverage: 0.45,
            density: 0.8,
            wind: Vec2::new(15.0, 5.0),
        }
    }
}

/// How strongly each held action moves the scene
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ControlTuning {
    /// Camera speed in world units per second
    pub move_speed: f32,
    /// Wind change per tick, per axis
    pub wind_step: f32,
    /// Coverage change per tick
    pub coverage_step: f32,
    /// Density change per tick
    pub density_step: f32,
    /// Sun azimuth/elevation change per tick, radians
    pub sun_step: f32,
    /// Maximum |sun elevation|, radians. Stays below pi/2.
    pub sun_elevation_limit: f32,
    pub reset: ResetDefaults,
}

impl Default for ControlTuning {
    fn default() -> Self {
        Self {
            // 8 units per tick at 60 Hz
            move_speed: 480.0,
            wind_step: 0.1,
            coverage_step: 0.002,
            density_step: 0.002,
            sun_step: 0.002,
            sun_elevation_limit: FRAC_PI_2 * 0.9,
            reset: ResetDefaults::default(),
        }
    }
}

impl ControlTuning {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_move_speed(mut self, speed: f32) -> Self {
        self.move_speed = speed.max(0.0);
        self
    }

    pub fn with_coverage_step(mut self, step: f32) -> Self {
        self.coverage_step = step.max(0.0);
        self
    }

    pub fn with_density_step(mut self, step: f32) -> Self {
        self.density_step = step.max(0.0);
        self
    }

    pub fn with_wind_step(mut self, step: f32) -> Self {
        self.wind_step = step.max(0.0);
        self
    }

    pub fn with_sun_step(mut self, step: f32) -> Self {
        self.sun_step = step.max(0.0);
        self
    }

    /// Set the sun elevation limit. Clamped just short of pi/2 so the sun
    /// never lines up with the world up vector.
    pub fn with_sun_elevation_limit(mut self, limit: f32) -> Self {
        self.sun_elevation_limit = limit.clamp(0.0, FRAC_PI_2 * 0.999);
        self
    }

    pub fn with_reset(mut self, reset: ResetDefaults) -> Self {
        self.reset = reset;
        self
    }
}

/// Everything the render loop needs besides its backend
#[derive(Debug, Clone)]
pub struct LoopConfig {
    pub width: u32,
    pub height: u32,
    pub projection: ProjectionConfig,
    pub tuning: ControlTuning,
    pub initial_scene: SceneState,
}

impl Default for LoopConfig {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
            projection: ProjectionConfig::default(),
            tuning: ControlTuning::default(),
            initial_scene: SceneState::default(),
        }
    }
}

impl LoopConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = width.max(1);
        self.height = height.max(1);
        self
    }

    pub fn with_projection(mut self, projection: ProjectionConfig) -> Self {
        self.projection = projection;
        self
    }

    pub fn with_tuning(mut self, tuning: ControlTuning) -> Self {
        self.tuning = tuning;
        self
    }

    pub fn with_initial_scene(mut self, scene: SceneState) -> Self {
        self.initial_scene = scene;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_constants() {
        let cfg = LoopConfig::default();
        assert_eq!((cfg.width, cfg.height), (1280, 720));
        assert_eq!(cfg.projection.fov_y_degrees, 60.0);
        assert_eq!(cfg.projection.near, 0.1);
        assert_eq!(cfg.projection.far, 50_000.0);
        assert_eq!(cfg.tuning.reset.wind, Vec2::new(15.0, 5.0));
    }

    #[test]
    fn builders_clamp_inputs() {
        let cfg = LoopConfig::new().with_size(0, 0);
        assert_eq!((cfg.width, cfg.height), (1, 1));

        let proj = ProjectionConfig::new().with_clip_planes(5.0, 1.0);
        assert!(proj.far > proj.near);

        let tuning = ControlTuning::new().with_sun_elevation_limit(10.0).with_move_speed(-3.0);
        assert!(tuning.sun_elevation_limit < FRAC_PI_2);
        assert_eq!(tuning.move_speed, 0.0);
    }
}
