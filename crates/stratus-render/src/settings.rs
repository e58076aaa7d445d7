//! Renderer settings

/// Device and presentation options for [`crate::CloudRenderer`]
#[derive(Debug, Clone)]
pub struct RendererSettings {
    /// `Fifo` waits for vsync, which paces the whole loop
    pub present_mode: wgpu::PresentMode,
    /// Format of the current-frame target and the history texture
    pub target_format: wgpu::TextureFormat,
    /// Background the scene pass clears to (linear RGBA)
    pub clear_color: [f64; 4],
    /// Pick an sRGB swapchain format when one is offered
    pub srgb_surface: bool,
    pub power_preference: wgpu::PowerPreference,
}

impl Default for RendererSettings {
    fn default() -> Self {
        Self {
            present_mode: wgpu::PresentMode::Fifo,
            target_format: wgpu::TextureFormat::Rgba8Unorm,
            clear_color: [0.6, 0.75, 0.95, 1.0],
            srgb_surface: false,
            power_preference: wgpu::PowerPreference::HighPerformance,
        }
    }
}

impl RendererSettings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_present_mode(mut self, mode: wgpu::PresentMode) -> Self {
        self.present_mode = mode;
        self
    }

    pub fn with_clear_color(mut self, rgba: [f64; 4]) -> Self {
        self.clear_color = rgba.map(|c| c.clamp(0.0, 1.0));
        self
    }

    pub fn with_srgb_surface(mut self, srgb: bool) -> Self {
        self.srgb_surface = srgb;
        self
    }

    pub(crate) fn clear(&self) -> wgpu::Color {
        let [r, g, b, a] = self.clear_color;
        wgpu::Color { r, g, b, a }
    }

    /// Choose a swapchain format from what the surface supports
    pub(crate) fn pick_surface_format(
        &self,
        formats: &[wgpu::TextureFormat],
    ) -> Option<wgpu::TextureFormat> {
        formats
            .iter()
            .find(|f| f.is_srgb() == self.srgb_surface)
            .or_else(|| formats.first())
            .copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_vsync_rgba8_sky_blue() {
        let settings = RendererSettings::default();
        assert_eq!(settings.present_mode, wgpu::PresentMode::Fifo);
        assert_eq!(settings.target_format, wgpu::TextureFormat::Rgba8Unorm);
        assert_eq!(settings.clear_color, [0.6, 0.75, 0.95, 1.0]);
    }

    #[test]
    fn surface_format_prefers_requested_encoding() {
        let formats = [wgpu::TextureFormat::Bgra8UnormSrgb, wgpu::TextureFormat::Bgra8Unorm];
        let linear = RendererSettings::default();
        assert_eq!(linear.pick_surface_format(&formats), Some(wgpu::TextureFormat::Bgra8Unorm));
        let srgb = RendererSettings::default().with_srgb_surface(true);
        assert_eq!(srgb.pick_surface_format(&formats), Some(wgpu::TextureFormat::Bgra8UnormSrgb));
        assert_eq!(
            linear.pick_surface_format(&formats[..1]),
            Some(wgpu::TextureFormat::Bgra8UnormSrgb)
        );
        assert_eq!(linear.pick_surface_format(&[]), None);
    }
}
