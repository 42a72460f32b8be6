//! Vector value types carried through the stages.
//!
//! Spaces:
//! - positions are clip space (already projected by the host)
//! - UVs are texture space, conventionally `[0, 1]` but never clamped here

mod vec2;
mod vec4;

pub use vec2::Vec2;
pub use vec4::Vec4;
