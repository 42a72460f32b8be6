use core::ops::Mul;

/// Linear RGBA color: a sampled texel, a tint, or a stage output.
///
/// Channels are never clamped. Negative values are undefined by convention
/// but are carried through arithmetic unchanged.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Rgba {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Rgba {
    pub const WHITE: Rgba = Rgba::new(1.0, 1.0, 1.0, 1.0);
    pub const TRANSPARENT: Rgba = Rgba::new(0.0, 0.0, 0.0, 0.0);

    /// Creates a color from linear components, taken as-is.
    #[inline]
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Creates a linear color from sRGB-encoded `f32` components.
    ///
    /// The sRGB transfer function is applied to `r`, `g` and `b`; alpha is
    /// already linear and is passed through.
    #[inline]
    pub fn from_srgb(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self::new(srgb_to_linear(r), srgb_to_linear(g), srgb_to_linear(b), a)
    }

    /// Creates a linear color from sRGB bytes (`0`–`255`), e.g. hex literals.
    #[inline]
    pub fn from_srgb_u8(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self::from_srgb(
            r as f32 / 255.0,
            g as f32 / 255.0,
            b as f32 / 255.0,
            a as f32 / 255.0,
        )
    }

    #[inline]
    pub const fn to_array(self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }

    /// Linear blend `self * (1 - t) + other * t`, per channel.
    #[inline]
    pub fn lerp(self, other: Rgba, t: f32) -> Rgba {
        Rgba::new(
            self.r + (other.r - self.r) * t,
            self.g + (other.g - self.g) * t,
            self.b + (other.b - self.b) * t,
            self.a + (other.a - self.a) * t,
        )
    }

    /// Returns `true` when every channel differs from `other` by at most `eps`.
    pub fn approx_eq(self, other: Rgba, eps: f32) -> bool {
        (self.r - other.r).abs() <= eps
            && (self.g - other.g).abs() <= eps
            && (self.b - other.b).abs() <= eps
            && (self.a - other.a).abs() <= eps
    }
}

impl From<[f32; 4]> for Rgba {
    #[inline]
    fn from(c: [f32; 4]) -> Self {
        Self::new(c[0], c[1], c[2], c[3])
    }
}

impl From<Rgba> for [f32; 4] {
    #[inline]
    fn from(c: Rgba) -> Self {
        c.to_array()
    }
}

/// Componentwise product. Alpha is multiplied like any other channel.
impl Mul for Rgba {
    type Output = Rgba;
    #[inline]
    fn mul(self, rhs: Rgba) -> Rgba {
        Rgba::new(self.r * rhs.r, self.g * rhs.g, self.b * rhs.b, self.a * rhs.a)
    }
}

/// sRGB EOTF for a single channel.
#[inline]
pub fn srgb_to_linear(c: f32) -> f32 {
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mul_is_componentwise() {
        let t = Rgba::new(0.5, 0.25, 1.0, 0.8);
        let c = Rgba::new(2.0, 4.0, 0.5, 0.5);
        assert_eq!(t * c, Rgba::new(1.0, 1.0, 0.5, 0.4));
    }

    #[test]
    fn values_above_one_are_kept() {
        let c = Rgba::WHITE * Rgba::new(3.0, 1.0, 1.0, 1.0);
        assert_eq!(c.r, 3.0);
    }

    // ── sRGB ──────────────────────────────────────────────────────────────

    #[test]
    fn srgb_endpoints_are_fixed() {
        assert_eq!(srgb_to_linear(0.0), 0.0);
        assert!((srgb_to_linear(1.0) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn srgb_mid_grey_is_darker_in_linear() {
        // 0.5 sRGB is roughly 0.214 linear.
        let l = srgb_to_linear(0.5);
        assert!((l - 0.214_041_14).abs() < 1e-5, "got {l}");
    }

    #[test]
    fn from_srgb_leaves_alpha_linear() {
        let c = Rgba::from_srgb_u8(255, 128, 0, 128);
        assert!((c.a - 128.0 / 255.0).abs() < 1e-6);
        assert!((c.r - 1.0).abs() < 1e-6);
        assert_eq!(c.b, 0.0);
    }

    #[test]
    fn lerp_endpoints() {
        let a = Rgba::new(0.0, 0.0, 0.0, 0.0);
        let b = Rgba::new(1.0, 2.0, 3.0, 4.0);
        assert_eq!(a.lerp(b, 0.0), a);
        assert_eq!(a.lerp(b, 1.0), b);
    }
}
