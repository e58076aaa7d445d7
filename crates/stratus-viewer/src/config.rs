//! Viewer configuration

use crate::bindings::KeyBindings;
use stratus_core::LoopConfig;
use stratus_render::RendererSettings;

#[derive(Debug, Clone)]
pub struct ViewerConfig {
    pub title: String,
    /// Initial inner size in logical pixels
    pub width: u32,
    pub height: u32,
    pub renderer: RendererSettings,
    pub bindings: KeyBindings,
    pub loop_config: LoopConfig,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            title: "Volumetric Clouds (wgpu)".to_string(),
            width: 1280,
            height: 720,
            renderer: RendererSettings::default(),
            bindings: KeyBindings::default(),
            loop_config: LoopConfig::default(),
        }
    }
}
