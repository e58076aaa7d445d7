//! wgpu implementation of the frame backend

use crate::pipelines::CloudPipelines;
use crate::settings::RendererSettings;
use crate::targets::{ColorTarget, HistoryTexture};
use stratus_core::{
    CameraBlock, Error, FrameBackend, FrameParameters, HistoryBuffer, ParameterBlockKind, Result,
    WeatherBlock,
};

/// GPU work for one frame, carried from render to present
pub struct InFlightFrame {
    encoder: Option<wgpu::CommandEncoder>,
    surface: Option<wgpu::SurfaceTexture>,
}

/// Owns the device, surface, parameter buffers and current-frame target
pub struct CloudRenderer {
    device: wgpu::Device,
    queue: wgpu::Queue,
    surface: wgpu::Surface<'static>,
    surface_config: wgpu::SurfaceConfiguration,
    settings: RendererSettings,

    pipelines: CloudPipelines,
    camera_buffer: wgpu::Buffer,
    weather_buffer: wgpu::Buffer,

    // Recreated on resize
    target: ColorTarget,
}

impl CloudRenderer {
    /// Create the device, configure the surface and build all pipelines.
    ///
    /// Every failure here is fatal for the viewer.
    pub fn new(
        window: impl Into<wgpu::SurfaceTarget<'static>>,
        width: u32,
        height: u32,
        settings: RendererSettings,
    ) -> Result<Self> {
        let (width, height) = (width.max(1), height.max(1));
        log::info!("Creating cloud renderer");
        log::info!("  Resolution: {}x{}", width, height);

        let instance = wgpu::Instance::new(wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });
        let surface = instance
            .create_surface(window)
            .map_err(|e| Error::Setup(format!("surface creation failed: {e}")))?;

        let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: settings.power_preference,
            compatible_surface: Some(&surface),
            force_fallback_adapter: false,
        }))
        .ok_or_else(|| Error::Setup("no compatible GPU adapter".into()))?;
        log::info!("  Adapter: {}", adapter.get_info().name);

        let (device, queue) = pollster::block_on(adapter.request_device(
            &wgpu::DeviceDescriptor {
                label: Some("Stratus Device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                memory_hints: wgpu::MemoryHints::default(),
            },
            None,
        ))
        .map_err(|e| Error::Setup(format!("device request failed: {e}")))?;

        let caps = surface.get_capabilities(&adapter);
        let surface_format = settings
            .pick_surface_format(&caps.formats)
            .ok_or_else(|| Error::Setup("surface reports no formats".into()))?;
        log::info!("  Surface format: {:?}", surface_format);

        let surface_config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width,
            height,
            present_mode: settings.present_mode,
            alpha_mode: caps
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &surface_config);

        let pipelines = CloudPipelines::new(&device, settings.target_format, surface_format)?;

        let camera_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Camera Uniform Buffer"),
            size: std::mem::size_of::<CameraBlock>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let weather_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Weather Uniform Buffer"),
            size: std::mem::size_of::<WeatherBlock>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let target = ColorTarget::new(
            &device,
            "Current Frame Target",
            width,
            height,
            settings.target_format,
        );

        log::info!("Cloud renderer initialized");

        Ok(Self {
            device,
            queue,
            surface,
            surface_config,
            settings,
            pipelines,
            camera_buffer,
            weather_buffer,
            target,
        })
    }

    fn upload(&self, buffer: &wgpu::Buffer, bytes: &[u8], block: ParameterBlockKind) -> Result<()> {
        self.device.push_error_scope(wgpu::ErrorFilter::Validation);
        self.queue.write_buffer(buffer, 0, bytes);
        match pollster::block_on(self.device.pop_error_scope()) {
            Some(err) => Err(Error::Upload { block, reason: err.to_string() }),
            None => Ok(()),
        }
    }

    fn acquire_surface(&mut self) -> Result<wgpu::SurfaceTexture> {
        match self.surface.get_current_texture() {
            Ok(texture) => Ok(texture),
            Err(e @ (wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated)) => {
                log::debug!("Reconfiguring surface after {:?}", e);
                self.surface.configure(&self.device, &self.surface_config);
                Err(Error::Frame(format!("surface unavailable: {e}")))
            }
            Err(e) => Err(Error::Frame(format!("surface unavailable: {e}"))),
        }
    }

    fn fullscreen_pass(
        encoder: &mut wgpu::CommandEncoder,
        label: &str,
        view: &wgpu::TextureView,
        clear: wgpu::Color,
        pipeline: &wgpu::RenderPipeline,
        bind_group: &wgpu::BindGroup,
    ) {
        let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some(label),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(clear),
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
        });
        pass.set_pipeline(pipeline);
        pass.set_bind_group(0, bind_group, &[]);
        pass.draw(0..3, 0..1);
    }

    pub fn surface_format(&self) -> wgpu::TextureFormat {
        self.surface_config.format
    }
}

impl FrameBackend for CloudRenderer {
    type History = HistoryTexture;
    type Frame = InFlightFrame;

    fn create_history(&mut self, width: u32, height: u32) -> Result<HistoryTexture> {
        self.device.push_error_scope(wgpu::ErrorFilter::OutOfMemory);
        let target = ColorTarget::new(
            &self.device,
            "History Texture",
            width,
            height,
            self.settings.target_format,
        );
        if let Some(err) = pollster::block_on(self.device.pop_error_scope()) {
            return Err(Error::Setup(format!("history allocation failed: {err}")));
        }
        let bind_group = self.pipelines.bind_group(
            &self.device,
            &self.camera_buffer,
            &self.weather_buffer,
            &target.view,
        );
        log::debug!("Created history texture {}x{}", width, height);
        Ok(HistoryTexture { target, bind_group })
    }

    fn resize(&mut self, width: u32, height: u32) -> Result<()> {
        log::info!("Resizing renderer to {}x{}", width, height);
        self.surface_config.width = width;
        self.surface_config.height = height;
        self.surface.configure(&self.device, &self.surface_config);
        self.target = ColorTarget::new(
            &self.device,
            "Current Frame Target",
            width,
            height,
            self.settings.target_format,
        );
        Ok(())
    }

    fn upload_camera(&mut self, block: &CameraBlock) -> Result<()> {
        self.upload(&self.camera_buffer, bytemuck::bytes_of(block), ParameterBlockKind::Camera)
    }

    fn upload_weather(&mut self, block: &WeatherBlock) -> Result<()> {
        self.upload(&self.weather_buffer, bytemuck::bytes_of(block), ParameterBlockKind::Weather)
    }

    fn render_scene(
        &mut self,
        params: &FrameParameters,
        history: &HistoryBuffer<HistoryTexture>,
    ) -> Result<InFlightFrame> {
        log::trace!("Rendering frame {}", params.frame.get());

        let mut encoder = self.device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("Frame Encoder"),
        });
        Self::fullscreen_pass(
            &mut encoder,
            "Cloud Scene Pass",
            &self.target.view,
            self.settings.clear(),
            &self.pipelines.scene,
            &history.storage().bind_group,
        );

        Ok(InFlightFrame { encoder: Some(encoder), surface: None })
    }

    fn resolve(&mut self, frame: &mut InFlightFrame, history: &mut HistoryTexture) {
        let Some(encoder) = frame.encoder.as_mut() else { return };
        encoder.copy_texture_to_texture(
            self.target.texture.as_image_copy(),
            history.target.texture.as_image_copy(),
            self.target.size(),
        );
    }

    fn composite(
        &mut self,
        frame: &mut InFlightFrame,
        history: &HistoryBuffer<HistoryTexture>,
    ) -> Result<()> {
        let surface = match self.acquire_surface() {
            Ok(surface) => surface,
            Err(e) => {
                // The history copy still has to land for the next frame
                if let Some(encoder) = frame.encoder.take() {
                    self.queue.submit(Some(encoder.finish()));
                }
                return Err(e);
            }
        };

        let Some(encoder) = frame.encoder.as_mut() else {
            return Err(Error::Frame("composite without a recorded scene pass".into()));
        };
        let view = surface.texture.create_view(&wgpu::TextureViewDescriptor::default());
        Self::fullscreen_pass(
            encoder,
            "Composite Pass",
            &view,
            wgpu::Color::BLACK,
            &self.pipelines.composite,
            &history.storage().bind_group,
        );
        frame.surface = Some(surface);
        Ok(())
    }

    fn present(&mut self, mut frame: InFlightFrame) -> Result<()> {
        if let Some(encoder) = frame.encoder.take() {
            self.queue.submit(Some(encoder.finish()));
        }
        let surface = frame
            .surface
            .take()
            .ok_or_else(|| Error::Frame("no surface texture to present".into()))?;
        surface.present();
        Ok(())
    }
}
