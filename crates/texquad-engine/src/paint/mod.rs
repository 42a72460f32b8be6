//! Color model shared by the stages, the harness and the GPU adapter.
//!
//! All colors are linear, straight-alpha RGBA with unconstrained range. The
//! tint acts as a multiplicative filter, so values above 1 brighten and the
//! alpha channel fades.

pub mod color;

pub use color::Rgba;
