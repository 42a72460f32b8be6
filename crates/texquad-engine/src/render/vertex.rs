use bytemuck::{Pod, Zeroable};

use crate::paint::Rgba;
use crate::shader::Interface;
use crate::stage::VertexInput;

// ── quad vertex ───────────────────────────────────────────────────────────

/// GPU vertex matching the `position` / `uv` attributes.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct QuadVertex {
    pub position: [f32; 2], // clip space
    pub uv: [f32; 2],
}

impl QuadVertex {
    const ATTRS: [wgpu::VertexAttribute; 2] = wgpu::vertex_attr_array![
        0 => Float32x2, // position
        1 => Float32x2  // uv
    ];

    pub const fn new(position: [f32; 2], uv: [f32; 2]) -> Self {
        Self { position, uv }
    }

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        debug_assert_eq!(Self::ATTRS[0].shader_location, Interface::QUAD.position.location);
        debug_assert_eq!(Self::ATTRS[1].shader_location, Interface::QUAD.uv.location);
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<QuadVertex>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRS,
        }
    }
}

impl From<VertexInput> for QuadVertex {
    fn from(v: VertexInput) -> Self {
        Self { position: v.position.to_array(), uv: v.uv.to_array() }
    }
}

/// Full-viewport quad; UV `(0, 0)` at the top-left.
pub const QUAD_VERTICES: [QuadVertex; 4] = [
    QuadVertex::new([-1.0, 1.0], [0.0, 0.0]),
    QuadVertex::new([1.0, 1.0], [1.0, 0.0]),
    QuadVertex::new([1.0, -1.0], [1.0, 1.0]),
    QuadVertex::new([-1.0, -1.0], [0.0, 1.0]),
];

pub const QUAD_INDICES: [u16; 6] = [0, 1, 2, 0, 2, 3];

// ── tint uniform ──────────────────────────────────────────────────────────

/// Contents of the `u_tint` uniform buffer (linear RGBA).
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct TintUniform {
    pub tint: [f32; 4],
}

impl From<Rgba> for TintUniform {
    fn from(c: Rgba) -> Self {
        Self { tint: c.to_array() }
    }
}

/// `wgpu` minimum binding size for the tint uniform buffer.
pub fn tint_min_binding_size() -> Option<wgpu::BufferSize> {
    wgpu::BufferSize::new(std::mem::size_of::<TintUniform>() as u64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coords::Vec2;

    #[test]
    fn vertex_layout_matches_interface() {
        let layout = QuadVertex::layout();
        assert_eq!(layout.array_stride, 16);
        let locs: Vec<u32> = layout.attributes.iter().map(|a| a.shader_location).collect();
        let expected: Vec<u32> = Interface::QUAD.attribute_locations().map(|(_, loc)| loc).collect();
        assert_eq!(locs, expected);
        assert_eq!(layout.attributes[1].offset, 8);
    }

    #[test]
    fn tint_uniform_is_16_bytes() {
        assert_eq!(std::mem::size_of::<TintUniform>(), 16);
        assert_eq!(tint_min_binding_size().map(|s| s.get()), Some(16));
    }

    #[test]
    fn tint_bytes_are_rgba_order() {
        let u = TintUniform::from(Rgba::new(1.0, 0.5, 0.25, 0.0));
        let floats: &[f32] = bytemuck::cast_slice(bytemuck::bytes_of(&u));
        assert_eq!(floats, &[1.0, 0.5, 0.25, 0.0]);
    }

    #[test]
    fn from_vertex_input_copies_fields() {
        let v = QuadVertex::from(VertexInput::new(Vec2::new(0.5, -0.5), Vec2::new(0.25, 0.75)));
        assert_eq!(v, QuadVertex::new([0.5, -0.5], [0.25, 0.75]));
    }

    #[test]
    fn quad_indices_reference_all_corners() {
        let mut seen = [false; 4];
        for i in QUAD_INDICES {
            seen[i as usize] = true;
        }
        assert!(seen.iter().all(|&s| s));
        assert!(QUAD_VERTICES.iter().all(|v| v.position.iter().all(|c| c.abs() == 1.0)));
    }
}
