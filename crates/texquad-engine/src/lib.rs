//! Texquad engine crate.
//!
//! A textured, tinted quad as a stage pair: the vertex stage passes a 2D
//! clip-space position and UV through, the fragment stage outputs
//! `sample(texture, uv) * tint`. The stages are described once and rendered
//! as legacy GLSL, modern GLSL and WGSL over a fixed binding interface.
//!
//! The CPU reference stages and raster harness define the expected output so
//! every emitted dialect can be checked against them without a GPU.

pub mod bind;
pub mod coords;
pub mod logging;
pub mod paint;
pub mod raster;
pub mod render;
pub mod shader;
pub mod stage;
