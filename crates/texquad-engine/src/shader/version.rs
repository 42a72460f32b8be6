//! GLSL versions and the dialect tier each one implies.
//!
//! The `#version` directive is the only source of truth for the dialect: a
//! caller picks a version (usually from the detected GPU capability) and the
//! tier follows from it.

use core::fmt;
use core::str::FromStr;

/// API family a version belongs to. Versions only compare within a family.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Family {
    Es,
    Desktop,
}

/// Syntax tier of a GLSL version.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Dialect {
    /// `attribute` / `varying`, `texture2D`, implicit `gl_FragColor`.
    Legacy,
    /// `in` / `out`, `texture`, declared color output.
    Modern,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum GlslVersion {
    /// GLSL ES 1.00 (WebGL 1, GLES 2).
    V100Es,
    V110,
    V120,
    V130,
    V140,
    V150,
    /// GLSL ES 3.00 (WebGL 2, GLES 3).
    V300Es,
    V330,
}

impl GlslVersion {
    pub const ALL: [GlslVersion; 8] = [
        GlslVersion::V100Es,
        GlslVersion::V110,
        GlslVersion::V120,
        GlslVersion::V130,
        GlslVersion::V140,
        GlslVersion::V150,
        GlslVersion::V300Es,
        GlslVersion::V330,
    ];

    /// Numeric part of the directive.
    pub const fn number(self) -> u32 {
        match self {
            GlslVersion::V100Es => 100,
            GlslVersion::V110 => 110,
            GlslVersion::V120 => 120,
            GlslVersion::V130 => 130,
            GlslVersion::V140 => 140,
            GlslVersion::V150 => 150,
            GlslVersion::V300Es => 300,
            GlslVersion::V330 => 330,
        }
    }

    pub const fn family(self) -> Family {
        match self {
            GlslVersion::V100Es | GlslVersion::V300Es => Family::Es,
            _ => Family::Desktop,
        }
    }

    #[inline]
    pub const fn is_es(self) -> bool {
        matches!(self.family(), Family::Es)
    }

    pub const fn dialect(self) -> Dialect {
        match self {
            GlslVersion::V100Es | GlslVersion::V110 | GlslVersion::V120 => Dialect::Legacy,
            _ => Dialect::Modern,
        }
    }

    /// Whether `layout(location = N)` is legal on stage inputs/outputs.
    ///
    /// Other versions bind attribute locations by name before linking.
    pub const fn supports_explicit_locations(self) -> bool {
        matches!(self, GlslVersion::V300Es | GlslVersion::V330)
    }

    /// Payload of the `#version` line, e.g. `"120"` or `"300 es"`.
    pub const fn directive(self) -> &'static str {
        match self {
            GlslVersion::V100Es => "100",
            GlslVersion::V110 => "110",
            GlslVersion::V120 => "120",
            GlslVersion::V130 => "130",
            GlslVersion::V140 => "140",
            GlslVersion::V150 => "150",
            GlslVersion::V300Es => "300 es",
            GlslVersion::V330 => "330",
        }
    }

    /// Short identifier used in file names and on the command line.
    pub const fn tag(self) -> &'static str {
        match self {
            GlslVersion::V100Es => "glsl100es",
            GlslVersion::V110 => "glsl110",
            GlslVersion::V120 => "glsl120",
            GlslVersion::V130 => "glsl130",
            GlslVersion::V140 => "glsl140",
            GlslVersion::V150 => "glsl150",
            GlslVersion::V300Es => "glsl300es",
            GlslVersion::V330 => "glsl330",
        }
    }

    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|v| v.tag() == tag)
    }

    /// Parses a `#version` payload: `"120"`, `"300 es"`, `"150 core"`.
    ///
    /// A leading `#version` is accepted and ignored.
    pub fn parse(s: &str) -> Result<Self, ParseVersionError> {
        let err = || ParseVersionError(s.trim().to_owned());
        let s = s.trim();
        let s = s.strip_prefix("#version").unwrap_or(s);
        let mut parts = s.split_whitespace();
        let number: u32 = parts.next().and_then(|n| n.parse().ok()).ok_or_else(err)?;
        let profile = parts.next();
        if parts.next().is_some() {
            return Err(err());
        }

        let version = match (number, profile) {
            (100, None) => GlslVersion::V100Es,
            (300, Some("es")) => GlslVersion::V300Es,
            (110, None) => GlslVersion::V110,
            (120, None) => GlslVersion::V120,
            (130, None) => GlslVersion::V130,
            (140, None) => GlslVersion::V140,
            (150, None | Some("core" | "compatibility")) => GlslVersion::V150,
            (330, None | Some("core" | "compatibility")) => GlslVersion::V330,
            _ => return Err(err()),
        };
        Ok(version)
    }
}

impl fmt::Display for GlslVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.directive())
    }
}

impl FromStr for GlslVersion {
    type Err = ParseVersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Unrecognized `#version` payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseVersionError(pub String);

impl fmt::Display for ParseVersionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unsupported GLSL version `{}`", self.0)
    }
}

impl std::error::Error for ParseVersionError {}

/// Picks the best available version for a detected capability.
///
/// Returns the highest version in `available` that belongs to the same
/// family as `detected` and is not newer than it.
pub fn select_version(detected: GlslVersion, available: &[GlslVersion]) -> Option<GlslVersion> {
    let picked = available
        .iter()
        .copied()
        .filter(|v| v.family() == detected.family() && v.number() <= detected.number())
        .max_by_key(|v| v.number());

    if picked.is_none() {
        log::warn!("no shader variant compatible with GLSL {detected}");
    }
    picked
}
