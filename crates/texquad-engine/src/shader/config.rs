use core::fmt;

use super::library::Target;
use super::version::GlslVersion;

/// Default float precision emitted for ES fragment stages.
///
/// ES vertex stages keep the language default (`highp`); desktop GLSL has no
/// precision statements.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash)]
pub enum Precision {
    Lowp,
    #[default]
    Mediump,
    Highp,
}

impl Precision {
    pub const fn as_str(self) -> &'static str {
        match self {
            Precision::Lowp => "lowp",
            Precision::Mediump => "mediump",
            Precision::Highp => "highp",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim() {
            "lowp" => Some(Precision::Lowp),
            "mediump" => Some(Precision::Mediump),
            "highp" => Some(Precision::Highp),
            _ => None,
        }
    }
}

impl fmt::Display for Precision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Source generation parameters.
///
/// Keep this structure small; the program itself is fixed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmitConfig {
    /// Fragment float precision on ES targets.
    ///
    /// Every ES variant uses the same value so legacy and modern ES programs
    /// stay numerically equivalent.
    pub precision: Precision,

    /// Variants to build, in packaging order.
    pub targets: Vec<Target>,
}

impl Default for EmitConfig {
    fn default() -> Self {
        Self {
            precision: Precision::default(),
            targets: vec![
                Target::Glsl(GlslVersion::V100Es),
                Target::Glsl(GlslVersion::V120),
                Target::Glsl(GlslVersion::V150),
                Target::Glsl(GlslVersion::V300Es),
                Target::Glsl(GlslVersion::V330),
                Target::Wgsl,
            ],
        }
    }
}
