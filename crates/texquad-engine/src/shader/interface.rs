//! Declared interface of the textured-quad stage pair.
//!
//! Every dialect resolves these names to the same slots, so external buffer
//! and uniform binding code never branches on dialect.

use core::fmt;

/// Type of a value crossing the stage interface.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum ValueType {
    Vec2,
    Vec4,
    Sampler2d,
}

impl ValueType {
    /// GLSL spelling (identical in the legacy and modern dialects).
    pub const fn glsl(self) -> &'static str {
        match self {
            ValueType::Vec2 => "vec2",
            ValueType::Vec4 => "vec4",
            ValueType::Sampler2d => "sampler2D",
        }
    }

    /// WGSL spelling. Samplers split into a texture and a sampler object.
    pub const fn wgsl(self) -> &'static str {
        match self {
            ValueType::Vec2 => "vec2<f32>",
            ValueType::Vec4 => "vec4<f32>",
            ValueType::Sampler2d => "texture_2d<f32>",
        }
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.glsl())
    }
}

/// Per-vertex input supplied by the external vertex buffer.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct AttributeDesc {
    pub name: &'static str,
    pub location: u32,
    pub ty: ValueType,
}

/// Vertex-stage output interpolated by the rasterizer (perspective-correct).
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct VaryingDesc {
    pub name: &'static str,
    pub location: u32,
    pub ty: ValueType,
}

/// Per-draw constant.
///
/// `unit` is the GL texture unit for samplers and `None` otherwise.
/// `binding` is the wgpu binding in group 0; a sampler occupies `binding`
/// (texture view) and `binding + 1` (sampler object).
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct UniformDesc {
    pub name: &'static str,
    pub ty: ValueType,
    pub unit: Option<u32>,
    pub binding: u32,
}

impl UniformDesc {
    #[inline]
    pub const fn is_sampler(&self) -> bool {
        matches!(self.ty, ValueType::Sampler2d)
    }

    /// WGSL name of the sampler object paired with a texture uniform.
    pub fn wgsl_sampler_name(&self) -> String {
        format!("{}_sampler", self.name)
    }
}

/// Fragment-stage color output.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct OutputDesc {
    pub name: &'static str,
    pub location: u32,
    pub ty: ValueType,
}

/// Named interface of the stage pair: `position`, `uv`, `sampler`, `tint`.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Interface {
    pub position: AttributeDesc,
    pub uv: AttributeDesc,
    pub v_uv: VaryingDesc,
    pub sampler: UniformDesc,
    pub tint: UniformDesc,
    pub color: OutputDesc,
}

impl Interface {
    /// The fixed interface of the textured, tinted quad.
    pub const QUAD: Interface = Interface {
        position: AttributeDesc { name: "position", location: 0, ty: ValueType::Vec2 },
        uv: AttributeDesc { name: "uv", location: 1, ty: ValueType::Vec2 },
        v_uv: VaryingDesc { name: "v_uv", location: 0, ty: ValueType::Vec2 },
        sampler: UniformDesc {
            name: "u_texture",
            ty: ValueType::Sampler2d,
            unit: Some(0),
            binding: 0,
        },
        tint: UniformDesc { name: "u_tint", ty: ValueType::Vec4, unit: None, binding: 2 },
        color: OutputDesc { name: "o_color", location: 0, ty: ValueType::Vec4 },
    };

    /// Attributes in location order.
    pub fn attributes(&self) -> [&AttributeDesc; 2] {
        [&self.position, &self.uv]
    }

    pub fn varyings(&self) -> [&VaryingDesc; 1] {
        [&self.v_uv]
    }

    pub fn uniforms(&self) -> [&UniformDesc; 2] {
        [&self.sampler, &self.tint]
    }

    pub fn attribute(&self, name: &str) -> Option<&AttributeDesc> {
        self.attributes().into_iter().find(|a| a.name == name)
    }

    pub fn varying(&self, name: &str) -> Option<&VaryingDesc> {
        self.varyings().into_iter().find(|v| v.name == name)
    }

    pub fn uniform(&self, name: &str) -> Option<&UniformDesc> {
        self.uniforms().into_iter().find(|u| u.name == name)
    }

    /// `(name, location)` pairs for `glBindAttribLocation` before linking.
    ///
    /// Required for dialects without explicit `layout(location = N)`.
    pub fn attribute_locations(&self) -> impl Iterator<Item = (&'static str, u32)> + '_ {
        self.attributes().into_iter().map(|a| (a.name, a.location))
    }
}

impl Default for Interface {
    fn default() -> Self {
        Self::QUAD
    }
}
