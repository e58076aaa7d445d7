//! Scene and composite pipelines

use stratus_core::{CameraBlock, Error, Result, WeatherBlock};

const SHADER_SOURCE: &str = include_str!("../shaders/clouds.wgsl");

/// Everything both fullscreen passes share
pub(crate) struct CloudPipelines {
    pub layout: wgpu::BindGroupLayout,
    pub sampler: wgpu::Sampler,
    pub scene: wgpu::RenderPipeline,
    pub composite: wgpu::RenderPipeline,
}

impl CloudPipelines {
    /// Compile the shader and build both pipelines.
    ///
    /// Validation errors are captured with an error scope and returned as
    /// [`Error::Shader`] instead of reaching the device's uncaptured handler.
    pub fn new(
        device: &wgpu::Device,
        target_format: wgpu::TextureFormat,
        surface_format: wgpu::TextureFormat,
    ) -> Result<Self> {
        device.push_error_scope(wgpu::ErrorFilter::Validation);

        let layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Cloud Bind Group Layout"),
            entries: &[
                uniform_entry(0, std::mem::size_of::<CameraBlock>() as u64),
                uniform_entry(1, std::mem::size_of::<WeatherBlock>() as u64),
                wgpu::BindGroupLayoutEntry {
                    binding: 2,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 3,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });

        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("History Sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("clouds"),
            source: wgpu::ShaderSource::Wgsl(SHADER_SOURCE.into()),
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("clouds_layout"),
            bind_group_layouts: &[&layout],
            push_constant_ranges: &[],
        });

        let scene = fullscreen_pipeline(
            device,
            "Cloud Scene Pipeline",
            &pipeline_layout,
            &shader,
            "fs_clouds",
            target_format,
        );
        let composite = fullscreen_pipeline(
            device,
            "Composite Pipeline",
            &pipeline_layout,
            &shader,
            "fs_composite",
            surface_format,
        );

        if let Some(err) = pollster::block_on(device.pop_error_scope()) {
            return Err(Error::Shader(err.to_string()));
        }

        log::info!(
            "Cloud pipelines created (target {:?}, surface {:?})",
            target_format,
            surface_format
        );

        Ok(Self { layout, sampler, scene, composite })
    }

    /// Bind group over the parameter blocks and one history view
    pub fn bind_group(
        &self,
        device: &wgpu::Device,
        camera: &wgpu::Buffer,
        weather: &wgpu::Buffer,
        history: &wgpu::TextureView,
    ) -> wgpu::BindGroup {
        device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Cloud Bind Group"),
            layout: &self.layout,
            entries: &[
                wgpu::BindGroupEntry { binding: 0, resource: camera.as_entire_binding() },
                wgpu::BindGroupEntry { binding: 1, resource: weather.as_entire_binding() },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::TextureView(history),
                },
                wgpu::BindGroupEntry {
                    binding: 3,
                    resource: wgpu::BindingResource::Sampler(&self.sampler),
                },
            ],
        })
    }
}

fn uniform_entry(binding: u32, size: u64) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility: wgpu::ShaderStages::FRAGMENT,
        ty: wgpu::BindingType::Buffer {
            ty: wgpu::BufferBindingType::Uniform,
            has_dynamic_offset: false,
            min_binding_size: wgpu::BufferSize::new(size),
        },
        count: None,
    }
}

fn fullscreen_pipeline(
    device: &wgpu::Device,
    label: &str,
    layout: &wgpu::PipelineLayout,
    shader: &wgpu::ShaderModule,
    fragment_entry: &str,
    format: wgpu::TextureFormat,
) -> wgpu::RenderPipeline {
    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(label),
        layout: Some(layout),
        cache: None,
        vertex: wgpu::VertexState {
            module: shader,
            entry_point: Some("vs_fullscreen"),
            compilation_options: Default::default(),
            buffers: &[],
        },
        primitive: wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleList,
            cull_mode: None,
            ..Default::default()
        },
        depth_stencil: None,
        multisample: wgpu::MultisampleState::default(),
        fragment: Some(wgpu::FragmentState {
            module: shader,
            entry_point: Some(fragment_entry),
            compilation_options: Default::default(),
            targets: &[Some(wgpu::ColorTargetState {
                format,
                blend: None,
                write_mask: wgpu::ColorWrites::ALL,
            })],
        }),
        multiview: None,
    })
}
