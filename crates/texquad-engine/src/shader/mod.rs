//! Shader authoring: one logical program, rendered into each dialect.
//!
//! Flow:
//! - [`Interface`] names the attributes, varying, uniforms and output with
//!   fixed slots.
//! - [`Program`] expresses both stages over that interface.
//! - [`glsl`] and [`wgsl`] render the program; [`ShaderLibrary`] packages the
//!   variants and picks one by detected [`GlslVersion`].

mod config;
pub mod glsl;
pub mod interface;
mod library;
pub mod program;
pub mod version;
pub mod wgsl;

pub use config::{EmitConfig, Precision};
pub use interface::{AttributeDesc, Interface, OutputDesc, UniformDesc, ValueType, VaryingDesc};
pub use library::{ShaderLibrary, ShaderSources, Target};
pub use program::{Assign, Expr, Program, ProgramError, Slot, Stage};
pub use version::{select_version, Dialect, Family, GlslVersion, ParseVersionError};
