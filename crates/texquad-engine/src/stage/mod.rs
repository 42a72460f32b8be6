//! CPU reference implementation of the two stages.
//!
//! These are the numeric ground truth the logical program, the emitted
//! dialects and the raster harness are checked against. Invocations are pure
//! functions of their inputs and the draw's uniforms.

mod fragment;
mod sampler;
mod vertex;

pub use fragment::{run_fragment, DrawUniforms};
pub use sampler::{Filter, Sample2d, SamplerState, Solid, Texture2d, Wrap};
pub use vertex::{run_vertex, VertexInput, VertexOutput};
