use crate::coords::{Vec2, Vec4};

/// Per-vertex attributes, already in clip space.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct VertexInput {
    pub position: Vec2,
    pub uv: Vec2,
}

impl VertexInput {
    #[inline]
    pub const fn new(position: Vec2, uv: Vec2) -> Self {
        Self { position, uv }
    }
}

/// Vertex-stage outputs handed to the rasterizer.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct VertexOutput {
    pub clip_position: Vec4,
    /// Interpolated perspective-correct across the primitive.
    pub uv: Vec2,
}

/// Vertex stage: embeds the position as `(x, y, 0, 1)` and forwards the UV.
#[inline]
pub fn run_vertex(input: VertexInput) -> VertexOutput {
    VertexOutput {
        clip_position: input.position.extend(),
        uv: input.uv,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn near_plane_embedding() {
        let out = run_vertex(VertexInput::new(Vec2::new(-0.5, 0.25), Vec2::new(0.0, 1.0)));
        assert_eq!(out.clip_position, Vec4::new(-0.5, 0.25, 0.0, 1.0));
        assert_eq!(out.uv, Vec2::new(0.0, 1.0));
    }

    #[test]
    fn uv_outside_unit_range_is_not_clamped() {
        let out = run_vertex(VertexInput::new(Vec2::zero(), Vec2::new(-3.5, 7.25)));
        assert_eq!(out.uv, Vec2::new(-3.5, 7.25));
    }

    proptest! {
        #[test]
        fn passthrough_identity(
            px in -1.0e6f32..1.0e6, py in -1.0e6f32..1.0e6,
            u in -1.0e6f32..1.0e6, v in -1.0e6f32..1.0e6,
        ) {
            let out = run_vertex(VertexInput::new(Vec2::new(px, py), Vec2::new(u, v)));
            prop_assert_eq!(out.clip_position, Vec4::new(px, py, 0.0, 1.0));
            prop_assert_eq!(out.uv, Vec2::new(u, v));
        }
    }
}
