//! Build-time packaging of every dialect variant.

use core::fmt;

use super::config::EmitConfig;
use super::program::{Program, Stage};
use super::version::{select_version, GlslVersion};
use super::{glsl, wgsl};

/// Concrete shading language a variant is rendered into.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Target {
    Glsl(GlslVersion),
    Wgsl,
}

impl Target {
    /// Identifier used in file names and on the command line.
    pub const fn tag(self) -> &'static str {
        match self {
            Target::Glsl(v) => v.tag(),
            Target::Wgsl => "wgsl",
        }
    }

    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "wgsl" => Some(Target::Wgsl),
            _ => GlslVersion::from_tag(tag).map(Target::Glsl),
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Target::Glsl(v) => write!(f, "GLSL {v}"),
            Target::Wgsl => f.write_str("WGSL"),
        }
    }
}

/// Rendered sources for one target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShaderSources {
    Glsl { version: GlslVersion, vertex: String, fragment: String },
    /// One module holding both entry points.
    Wgsl { module: String },
}

impl ShaderSources {
    pub fn render(program: &Program, target: Target, config: &EmitConfig) -> Self {
        match target {
            Target::Glsl(version) => ShaderSources::Glsl {
                version,
                vertex: glsl::emit(program, Stage::Vertex, version, config.precision),
                fragment: glsl::emit(program, Stage::Fragment, version, config.precision),
            },
            Target::Wgsl => ShaderSources::Wgsl { module: wgsl::emit(program) },
        }
    }

    pub fn target(&self) -> Target {
        match self {
            ShaderSources::Glsl { version, .. } => Target::Glsl(*version),
            ShaderSources::Wgsl { .. } => Target::Wgsl,
        }
    }

    /// `(file name, contents)` pairs, e.g. `quad.glsl120.vert`, `quad.wgsl`.
    pub fn files(&self) -> Vec<(String, &str)> {
        match self {
            ShaderSources::Glsl { version, vertex, fragment } => vec![
                (format!("quad.{}.vert", version.tag()), vertex.as_str()),
                (format!("quad.{}.frag", version.tag()), fragment.as_str()),
            ],
            ShaderSources::Wgsl { module } => vec![("quad.wgsl".to_owned(), module.as_str())],
        }
    }
}

/// All variants of the program, rendered once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShaderLibrary {
    variants: Vec<ShaderSources>,
}

impl ShaderLibrary {
    /// Renders every target in `config`. Duplicate targets are rendered once.
    pub fn build(program: &Program, config: &EmitConfig) -> Self {
        let mut variants: Vec<ShaderSources> = Vec::with_capacity(config.targets.len());
        for &target in &config.targets {
            if variants.iter().any(|v| v.target() == target) {
                continue;
            }
            variants.push(ShaderSources::render(program, target, config));
        }
        log::debug!("shader library built with {} variants", variants.len());
        Self { variants }
    }

    pub fn variants(&self) -> &[ShaderSources] {
        &self.variants
    }

    pub fn get(&self, target: Target) -> Option<&ShaderSources> {
        self.variants.iter().find(|v| v.target() == target)
    }

    /// GLSL versions present in the library.
    pub fn glsl_versions(&self) -> Vec<GlslVersion> {
        self.variants
            .iter()
            .filter_map(|v| match v {
                ShaderSources::Glsl { version, .. } => Some(*version),
                ShaderSources::Wgsl { .. } => None,
            })
            .collect()
    }

    /// Best GLSL variant for the capability detected by the host.
    pub fn select(&self, detected: GlslVersion) -> Option<&ShaderSources> {
        let version = select_version(detected, &self.glsl_versions())?;
        self.get(Target::Glsl(version))
    }
}
