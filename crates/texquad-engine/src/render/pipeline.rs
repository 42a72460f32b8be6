use wgpu::util::DeviceExt;

use crate::paint::Rgba;
use crate::shader::{wgsl, Interface, Program};
use crate::stage::{Filter, SamplerState, Wrap};

use super::vertex::{tint_min_binding_size, QuadVertex, TintUniform};

// ── config ────────────────────────────────────────────────────────────────

/// Pipeline creation parameters owned by the host.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Color target format (usually the surface format).
    pub format: wgpu::TextureFormat,

    /// Blend state of the color target. `None` replaces destination pixels.
    ///
    /// Defaults to premultiplied alpha.
    pub blend: Option<wgpu::BlendState>,
}

impl PipelineConfig {
    pub fn new(format: wgpu::TextureFormat) -> Self {
        Self { format, blend: Some(premul_alpha_blend()) }
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self::new(wgpu::TextureFormat::Bgra8UnormSrgb)
    }
}

pub fn premul_alpha_blend() -> wgpu::BlendState {
    wgpu::BlendState {
        color: wgpu::BlendComponent {
            src_factor: wgpu::BlendFactor::One,
            dst_factor: wgpu::BlendFactor::OneMinusSrcAlpha,
            operation: wgpu::BlendOperation::Add,
        },
        alpha: wgpu::BlendComponent {
            src_factor: wgpu::BlendFactor::One,
            dst_factor: wgpu::BlendFactor::OneMinusSrcAlpha,
            operation: wgpu::BlendOperation::Add,
        },
    }
}

// ── layout ────────────────────────────────────────────────────────────────

/// Group 0 layout: texture view, filtering sampler, tint uniform buffer.
///
/// Binding numbers come from `interface`; all entries are fragment-visible.
pub fn bind_group_layout_entries(interface: &Interface) -> [wgpu::BindGroupLayoutEntry; 3] {
    [
        wgpu::BindGroupLayoutEntry {
            binding: interface.sampler.binding,
            visibility: wgpu::ShaderStages::FRAGMENT,
            ty: wgpu::BindingType::Texture {
                sample_type: wgpu::TextureSampleType::Float { filterable: true },
                view_dimension: wgpu::TextureViewDimension::D2,
                multisampled: false,
            },
            count: None,
        },
        wgpu::BindGroupLayoutEntry {
            binding: interface.sampler.binding + 1,
            visibility: wgpu::ShaderStages::FRAGMENT,
            ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
            count: None,
        },
        wgpu::BindGroupLayoutEntry {
            binding: interface.tint.binding,
            visibility: wgpu::ShaderStages::FRAGMENT,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: false,
                min_binding_size: tint_min_binding_size(),
            },
            count: None,
        },
    ]
}

/// GPU sampler parameters equivalent to a CPU [`SamplerState`].
pub fn sampler_descriptor(state: SamplerState) -> wgpu::SamplerDescriptor<'static> {
    let filter = match state.filter {
        Filter::Nearest => wgpu::FilterMode::Nearest,
        Filter::Linear => wgpu::FilterMode::Linear,
    };
    wgpu::SamplerDescriptor {
        label: Some("texquad sampler"),
        address_mode_u: address_mode(state.wrap_u),
        address_mode_v: address_mode(state.wrap_v),
        address_mode_w: wgpu::AddressMode::ClampToEdge,
        mag_filter: filter,
        min_filter: filter,
        mipmap_filter: wgpu::MipmapFilterMode::Nearest,
        ..Default::default()
    }
}

fn address_mode(wrap: Wrap) -> wgpu::AddressMode {
    match wrap {
        Wrap::ClampToEdge => wgpu::AddressMode::ClampToEdge,
        Wrap::Repeat => wgpu::AddressMode::Repeat,
        Wrap::MirroredRepeat => wgpu::AddressMode::MirrorRepeat,
    }
}

// ── pipeline ──────────────────────────────────────────────────────────────

/// Render pipeline for a textured, tinted quad program.
///
/// Buffer contents, texture upload and draw submission stay with the host;
/// this only builds the pipeline and the objects whose layout it dictates.
pub struct QuadPipeline {
    interface: Interface,
    pipeline: wgpu::RenderPipeline,
    bind_group_layout: wgpu::BindGroupLayout,
}

impl QuadPipeline {
    pub fn new(device: &wgpu::Device, program: &Program, config: &PipelineConfig) -> Self {
        let interface = *program.interface();
        let shader_src = wgsl::emit(program);
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("texquad shader"),
            source: wgpu::ShaderSource::Wgsl(shader_src.into()),
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("texquad bgl"),
            entries: &bind_group_layout_entries(&interface),
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("texquad pipeline layout"),
            bind_group_layouts: &[&bind_group_layout],
            immediate_size: 0,
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("texquad pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some(wgsl::VERTEX_ENTRY),
                compilation_options: Default::default(),
                buffers: &[QuadVertex::layout()],
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some(wgsl::FRAGMENT_ENTRY),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: config.format,
                    blend: config.blend,
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        });

        log::debug!("texquad pipeline created for {:?}", config.format);

        Self { interface, pipeline, bind_group_layout }
    }

    #[inline]
    pub fn pipeline(&self) -> &wgpu::RenderPipeline {
        &self.pipeline
    }

    #[inline]
    pub fn bind_group_layout(&self) -> &wgpu::BindGroupLayout {
        &self.bind_group_layout
    }

    /// Creates a `COPY_DST` uniform buffer initialized with `tint`.
    pub fn create_tint_buffer(&self, device: &wgpu::Device, tint: Rgba) -> wgpu::Buffer {
        device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("texquad tint ubo"),
            contents: bytemuck::bytes_of(&TintUniform::from(tint)),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        })
    }

    /// Updates the tint between draws. Must not be called while a draw using
    /// `buffer` is being recorded.
    pub fn write_tint(&self, queue: &wgpu::Queue, buffer: &wgpu::Buffer, tint: Rgba) {
        queue.write_buffer(buffer, 0, bytemuck::bytes_of(&TintUniform::from(tint)));
    }

    pub fn create_sampler(&self, device: &wgpu::Device, state: SamplerState) -> wgpu::Sampler {
        device.create_sampler(&sampler_descriptor(state))
    }

    pub fn bind_group(
        &self,
        device: &wgpu::Device,
        texture: &wgpu::TextureView,
        sampler: &wgpu::Sampler,
        tint: &wgpu::Buffer,
    ) -> wgpu::BindGroup {
        device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("texquad bind group"),
            layout: &self.bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: self.interface.sampler.binding,
                    resource: wgpu::BindingResource::TextureView(texture),
                },
                wgpu::BindGroupEntry {
                    binding: self.interface.sampler.binding + 1,
                    resource: wgpu::BindingResource::Sampler(sampler),
                },
                wgpu::BindGroupEntry {
                    binding: self.interface.tint.binding,
                    resource: tint.as_entire_binding(),
                },
            ],
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_bindings_follow_interface() {
        let entries = bind_group_layout_entries(&Interface::QUAD);
        let bindings: Vec<u32> = entries.iter().map(|e| e.binding).collect();
        assert_eq!(bindings, vec![0, 1, 2]);
        assert!(entries.iter().all(|e| e.visibility == wgpu::ShaderStages::FRAGMENT));
        assert!(matches!(entries[1].ty, wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering)));
    }

    #[test]
    fn tint_entry_is_uniform_buffer() {
        let entries = bind_group_layout_entries(&Interface::QUAD);
        match entries[2].ty {
            wgpu::BindingType::Buffer { ty, min_binding_size, .. } => {
                assert_eq!(ty, wgpu::BufferBindingType::Uniform);
                assert_eq!(min_binding_size.map(|s| s.get()), Some(16));
            }
            other => panic!("unexpected binding type {other:?}"),
        }
    }

    #[test]
    fn sampler_descriptor_mirrors_cpu_state() {
        let d = sampler_descriptor(SamplerState::new(Filter::Linear, Wrap::MirroredRepeat));
        assert_eq!(d.mag_filter, wgpu::FilterMode::Linear);
        assert_eq!(d.min_filter, wgpu::FilterMode::Linear);
        assert_eq!(d.address_mode_u, wgpu::AddressMode::MirrorRepeat);
        assert_eq!(d.address_mode_v, wgpu::AddressMode::MirrorRepeat);

        let d = sampler_descriptor(SamplerState::default());
        assert_eq!(d.mag_filter, wgpu::FilterMode::Nearest);
        assert_eq!(d.address_mode_u, wgpu::AddressMode::ClampToEdge);
    }

    #[test]
    fn default_config_blends_premultiplied() {
        let c = PipelineConfig::default();
        assert_eq!(c.blend, Some(premul_alpha_blend()));
    }
}
