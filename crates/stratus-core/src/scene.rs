//! Scene state and the per-tick update policy

use crate::config::ControlTuning;
use crate::input::{Action, InputSnapshot};
use glam::{Vec2, Vec3};

/// Free-flying camera pose. Angles are radians and may grow without bound.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraPose {
    pub position: Vec3,
    pub yaw: f32,
    pub pitch: f32,
}

impl Default for CameraPose {
    fn default() -> Self {
        Self {
            position: Vec3::new(0.0, 1000.0, -1500.0),
            yaw: 0.0,
            pitch: 0.0,
        }
    }
}

impl CameraPose {
    /// Look direction. Used for both movement and the view matrix.
    pub fn forward(&self) -> Vec3 {
        let (sy, cy) = self.yaw.sin_cos();
        let (sp, cp) = self.pitch.sin_cos();
        Vec3::new(cp * sy, sp, cp * cy)
    }

    /// Horizontal right vector for the left-handed basis, `up x forward`
    /// with the pitch factored out so it stays unit length when looking
    /// straight up or down.
    pub fn right(&self) -> Vec3 {
        let (sy, cy) = self.yaw.sin_cos();
        Vec3::new(cy, 0.0, -sy)
    }
}

/// Cloud layer and lighting parameters.
///
/// Coverage, density and sun elevation are only reachable through clamping
/// setters, so they can never hold an out-of-range value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Environment {
    /// Henyey-Greenstein asymmetry factor
    pub g: f32,
    pub base_height: f32,
    pub thickness: f32,
    pub wind: Vec2,
    pub step_multiplier: f32,
    /// Radians, unbounded
    pub sun_azimuth: f32,
    coverage: f32,
    density: f32,
    sun_elevation: f32,
}

impl Default for Environment {
    fn default() -> Self {
        Self {
            g: 0.65,
            base_height: 1500.0,
            thickness: 2000.0,
            wind: Vec2::new(15.0, 5.0),
            step_multiplier: 1.0,
            sun_azimuth: 45f32.to_radians(),
            coverage: 0.45,
            density: 0.8,
            sun_elevation: 20f32.to_radians(),
        }
    }
}

impl Environment {
    pub const COVERAGE_RANGE: (f32, f32) = (0.0, 1.0);
    pub const DENSITY_RANGE: (f32, f32) = (0.0, 2.0);
    /// Hard bound on |sun elevation| regardless of tuning
    pub const MAX_SUN_ELEVATION: f32 = std::f32::consts::FRAC_PI_2 * 0.999;

    pub fn coverage(&self) -> f32 {
        self.coverage
    }

    pub fn density(&self) -> f32 {
        self.density
    }

    pub fn sun_elevation(&self) -> f32 {
        self.sun_elevation
    }

    pub fn set_coverage(&mut self, coverage: f32) {
        let (lo, hi) = Self::COVERAGE_RANGE;
        self.coverage = coverage.clamp(lo, hi);
    }

    pub fn set_density(&mut self, density: f32) {
        let (lo, hi) = Self::DENSITY_RANGE;
        self.density = density.clamp(lo, hi);
    }

    /// Set the sun elevation, clamped to `[-limit, limit]`
    pub fn set_sun_elevation(&mut self, elevation: f32, limit: f32) {
        let limit = limit.clamp(0.0, Self::MAX_SUN_ELEVATION);
        self.sun_elevation = elevation.clamp(-limit, limit);
    }

    pub fn with_coverage(mut self, coverage: f32) -> Self {
        self.set_coverage(coverage);
        self
    }

    pub fn with_density(mut self, density: f32) -> Self {
        self.set_density(density);
        self
    }

    pub fn with_sun(mut self, azimuth: f32, elevation: f32) -> Self {
        self.sun_azimuth = azimuth;
        self.set_sun_elevation(elevation, Self::MAX_SUN_ELEVATION);
        self
    }

    /// Unit vector pointing at the sun
    pub fn sun_direction(&self) -> Vec3 {
        let (se, ce) = self.sun_elevation.sin_cos();
        let (sa, ca) = self.sun_azimuth.sin_cos();
        Vec3::new(ce * ca, se, ce * sa)
    }
}

/// Feature switches flipped from the keyboard
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Toggles {
    pub accumulation: bool,
    pub jitter: bool,
}

impl Default for Toggles {
    fn default() -> Self {
        Self {
            accumulation: true,
            jitter: true,
        }
    }
}

/// Everything the simulation mutates from tick to tick
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SceneState {
    pub camera: CameraPose,
    pub environment: Environment,
    pub toggles: Toggles,
}

impl SceneState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_camera(mut self, camera: CameraPose) -> Self {
        self.camera = camera;
        self
    }

    pub fn with_environment(mut self, environment: Environment) -> Self {
        self.environment = environment;
        self
    }

    pub fn with_toggles(mut self, toggles: Toggles) -> Self {
        self.toggles = toggles;
        self
    }

    /// Apply one tick of input.
    ///
    /// Movement is scaled by `dt` (seconds). Parameter nudges are fixed
    /// per-tick steps applied while held. Toggles and reset fire on the rising
    /// edge only. Reset is applied last, so it wins over nudges in the same
    /// tick.
    pub fn update<I: InputSnapshot + ?Sized>(
        mut self,
        input: &I,
        dt: f32,
        tuning: &ControlTuning,
    ) -> Self {
        // ── Camera ────────────────────────────────────────────────────────────
        let step = tuning.move_speed * dt.max(0.0);
        let forward = self.camera.forward();
        let right = self.camera.right();
        let mut delta = Vec3::ZERO;
        if input.held(Action::MoveForward) { delta += forward; }
        if input.held(Action::MoveBack)    { delta -= forward; }
        if input.held(Action::StrafeLeft)  { delta -= right; }
        if input.held(Action::StrafeRight) { delta += right; }
        if input.held(Action::MoveDown)    { delta -= Vec3::Y; }
        if input.held(Action::MoveUp)      { delta += Vec3::Y; }
        self.camera.position += delta * step;

        // ── Environment nudges ───────────────────────────────────────────────
        let env = &mut self.environment;
        if input.held(Action::WindWest)  { env.wind.x -= tuning.wind_step; }
        if input.held(Action::WindEast)  { env.wind.x += tuning.wind_step; }
        if input.held(Action::WindNorth) { env.wind.y += tuning.wind_step; }
        if input.held(Action::WindSouth) { env.wind.y -= tuning.wind_step; }

        if input.held(Action::CoverageDown) { env.set_coverage(env.coverage - tuning.coverage_step); }
        if input.held(Action::CoverageUp)   { env.set_coverage(env.coverage + tuning.coverage_step); }
        if input.held(Action::DensityDown)  { env.set_density(env.density - tuning.density_step); }
        if input.held(Action::DensityUp)    { env.set_density(env.density + tuning.density_step); }

        if input.held(Action::SunAzimuthDown) { env.sun_azimuth -= tuning.sun_step; }
        if input.held(Action::SunAzimuthUp)   { env.sun_azimuth += tuning.sun_step; }
        let limit = tuning.sun_elevation_limit;
        if input.held(Action::SunElevationDown) {
            env.set_sun_elevation(env.sun_elevation - tuning.sun_step, limit);
        }
        if input.held(Action::SunElevationUp) {
            env.set_sun_elevation(env.sun_elevation + tuning.sun_step, limit);
        }

        // ── Edge-triggered ───────────────────────────────────────────────────
        if input.pressed_edge(Action::ToggleAccumulation) {
            self.toggles.accumulation = !self.toggles.accumulation;
            log::debug!("Temporal accumulation {}", on_off(self.toggles.accumulation));
        }
        if input.pressed_edge(Action::ToggleJitter) {
            self.toggles.jitter = !self.toggles.jitter;
            log::debug!("Jitter {}", on_off(self.toggles.jitter));
        }
        if input.pressed_edge(Action::Reset) {
            let reset = tuning.reset;
            self.environment.set_coverage(reset.coverage);
            self.environment.set_density(reset.density);
            self.environment.wind = reset.wind;
            log::debug!("Cloud parameters reset");
        }

        self
    }
}

fn on_off(enabled: bool) -> &'static str {
    if enabled { "on" } else { "off" }
}
