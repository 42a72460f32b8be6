//! wgpu adapter for the textured quad.
//!
//! The GPU types here mirror [`crate::shader::Interface`]: vertex buffer 0
//! feeds `position` and `uv`, and bind group 0 holds the texture, its
//! sampler and the tint uniform.

mod pipeline;
mod vertex;

pub use pipeline::{bind_group_layout_entries, premul_alpha_blend, sampler_descriptor, PipelineConfig, QuadPipeline};
pub use vertex::{tint_min_binding_size, QuadVertex, TintUniform, QUAD_INDICES, QUAD_VERTICES};
