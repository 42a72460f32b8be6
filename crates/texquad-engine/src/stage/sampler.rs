use crate::coords::Vec2;
use crate::paint::Rgba;

/// Opaque texture lookup `uv -> rgba`.
///
/// Filtering and wrapping belong to the implementor, never to the stages.
pub trait Sample2d {
    fn sample(&self, uv: Vec2) -> Rgba;
}

impl<F> Sample2d for F
where
    F: Fn(Vec2) -> Rgba,
{
    #[inline]
    fn sample(&self, uv: Vec2) -> Rgba {
        self(uv)
    }
}

/// Sampler that returns the same color for every UV.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Solid(pub Rgba);

impl Sample2d for Solid {
    #[inline]
    fn sample(&self, _uv: Vec2) -> Rgba {
        self.0
    }
}

/// Texel filter.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub enum Filter {
    #[default]
    Nearest,
    /// Bilinear blend of the four nearest texel centers.
    Linear,
}

/// Addressing mode for coordinates outside `[0, 1)`.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub enum Wrap {
    #[default]
    ClampToEdge,
    Repeat,
    MirroredRepeat,
}

impl Wrap {
    /// Maps a (possibly out of range) texel index into `0..size`.
    fn resolve(self, i: i64, size: i64) -> usize {
        let i = match self {
            Wrap::ClampToEdge => i.clamp(0, size - 1),
            Wrap::Repeat => i.rem_euclid(size),
            Wrap::MirroredRepeat => {
                let m = i.rem_euclid(size * 2);
                if m >= size { size * 2 - 1 - m } else { m }
            }
        };
        i as usize
    }
}

/// Filter and wrap state, configured by the host per texture binding.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct SamplerState {
    pub filter: Filter,
    pub wrap_u: Wrap,
    pub wrap_v: Wrap,
}

impl SamplerState {
    pub const fn new(filter: Filter, wrap: Wrap) -> Self {
        Self { filter, wrap_u: wrap, wrap_v: wrap }
    }
}

/// Immutable 2D image of linear texels with its sampler state.
///
/// Row 0 is at `v = 0`. Texel `i` covers `[i / w, (i + 1) / w)`, and its
/// center sits at `(i + 0.5) / w`.
#[derive(Debug, Clone, PartialEq)]
pub struct Texture2d {
    width: u32,
    height: u32,
    texels: Vec<Rgba>,
    state: SamplerState,
}

impl Texture2d {
    /// Returns `None` for zero-sized images or when `texels` does not hold
    /// exactly `width * height` entries.
    pub fn from_texels(width: u32, height: u32, texels: Vec<Rgba>, state: SamplerState) -> Option<Self> {
        if width == 0 || height == 0 || texels.len() != width as usize * height as usize {
            return None;
        }
        Some(Self { width, height, texels, state })
    }

    /// Builds a texture from tightly packed RGBA8 bytes, normalized to `[0, 1]`
    /// without any transfer function.
    pub fn from_rgba8(width: u32, height: u32, bytes: &[u8], state: SamplerState) -> Option<Self> {
        if bytes.len() % 4 != 0 {
            return None;
        }
        let texels = bytes
            .chunks_exact(4)
            .map(|px| {
                Rgba::new(
                    px[0] as f32 / 255.0,
                    px[1] as f32 / 255.0,
                    px[2] as f32 / 255.0,
                    px[3] as f32 / 255.0,
                )
            })
            .collect();
        Self::from_texels(width, height, texels, state)
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    pub fn state(&self) -> SamplerState {
        self.state
    }

    /// Returns a copy of this texture with different sampler state.
    pub fn with_state(mut self, state: SamplerState) -> Self {
        self.state = state;
        self
    }

    fn texel(&self, x: i64, y: i64) -> Rgba {
        let x = self.state.wrap_u.resolve(x, self.width as i64);
        let y = self.state.wrap_v.resolve(y, self.height as i64);
        self.texels[y * self.width as usize + x]
    }
}

impl Sample2d for Texture2d {
    fn sample(&self, uv: Vec2) -> Rgba {
        let fx = uv.x * self.width as f32;
        let fy = uv.y * self.height as f32;

        match self.state.filter {
            Filter::Nearest => self.texel(fx.floor() as i64, fy.floor() as i64),
            Filter::Linear => {
                // Shift to texel-center space.
                let sx = fx - 0.5;
                let sy = fy - 0.5;
                let x0 = sx.floor();
                let y0 = sy.floor();
                let tx = sx - x0;
                let ty = sy - y0;
                let (x0, y0) = (x0 as i64, y0 as i64);

                // Float-to-int casts saturate, so the neighbor index must too.
                let (x1, y1) = (x0.saturating_add(1), y0.saturating_add(1));

                let top = self.texel(x0, y0).lerp(self.texel(x1, y0), tx);
                let bottom = self.texel(x0, y1).lerp(self.texel(x1, y1), tx);
                top.lerp(bottom, ty)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RED: Rgba = Rgba::new(1.0, 0.0, 0.0, 1.0);
    const BLUE: Rgba = Rgba::new(0.0, 0.0, 1.0, 1.0);

    /// 2×1 texture: red on the left, blue on the right.
    fn two_texels(state: SamplerState) -> Texture2d {
        Texture2d::from_texels(2, 1, vec![RED, BLUE], state).unwrap()
    }

    // ── construction ──────────────────────────────────────────────────────

    #[test]
    fn rejects_mismatched_texel_count() {
        assert!(Texture2d::from_texels(2, 2, vec![RED], SamplerState::default()).is_none());
        assert!(Texture2d::from_texels(0, 1, vec![], SamplerState::default()).is_none());
    }

    #[test]
    fn from_rgba8_normalizes_bytes() {
        let t = Texture2d::from_rgba8(1, 1, &[255, 0, 51, 255], SamplerState::default()).unwrap();
        let c = t.sample(Vec2::new(0.5, 0.5));
        assert!(c.approx_eq(Rgba::new(1.0, 0.0, 0.2, 1.0), 1e-6));
    }

    // ── nearest ───────────────────────────────────────────────────────────

    #[test]
    fn nearest_picks_covering_texel() {
        let t = two_texels(SamplerState::new(Filter::Nearest, Wrap::ClampToEdge));
        assert_eq!(t.sample(Vec2::new(0.25, 0.5)), RED);
        assert_eq!(t.sample(Vec2::new(0.75, 0.5)), BLUE);
    }

    #[test]
    fn clamp_to_edge_outside_range() {
        let t = two_texels(SamplerState::new(Filter::Nearest, Wrap::ClampToEdge));
        assert_eq!(t.sample(Vec2::new(-2.0, 0.5)), RED);
        assert_eq!(t.sample(Vec2::new(3.0, 0.5)), BLUE);
    }

    #[test]
    fn repeat_wraps_around() {
        let t = two_texels(SamplerState::new(Filter::Nearest, Wrap::Repeat));
        assert_eq!(t.sample(Vec2::new(1.25, 0.5)), RED);
        assert_eq!(t.sample(Vec2::new(-0.25, 0.5)), BLUE);
    }

    #[test]
    fn mirrored_repeat_reflects() {
        let t = two_texels(SamplerState::new(Filter::Nearest, Wrap::MirroredRepeat));
        // [1, 2) is the mirror image of [0, 1).
        assert_eq!(t.sample(Vec2::new(1.25, 0.5)), BLUE);
        assert_eq!(t.sample(Vec2::new(1.75, 0.5)), RED);
    }

    // ── linear ────────────────────────────────────────────────────────────

    #[test]
    fn linear_at_texel_center_is_exact() {
        let t = two_texels(SamplerState::new(Filter::Linear, Wrap::ClampToEdge));
        assert_eq!(t.sample(Vec2::new(0.25, 0.5)), RED);
    }

    #[test]
    fn linear_between_centers_blends() {
        let t = two_texels(SamplerState::new(Filter::Linear, Wrap::ClampToEdge));
        let mid = t.sample(Vec2::new(0.5, 0.5));
        assert!(mid.approx_eq(Rgba::new(0.5, 0.0, 0.5, 1.0), 1e-6));
    }

    #[test]
    fn linear_accepts_huge_uv() {
        let repeat = two_texels(SamplerState::new(Filter::Linear, Wrap::Repeat));
        let c = repeat.sample(Vec2::new(1.0e19, 0.5));
        assert!(c == RED || c == BLUE || c.approx_eq(Rgba::new(0.5, 0.0, 0.5, 1.0), 1e-6), "got {c:?}");

        let clamp = two_texels(SamplerState::new(Filter::Linear, Wrap::ClampToEdge));
        assert_eq!(clamp.sample(Vec2::new(1.0e19, 1.0e19)), BLUE);
        assert_eq!(clamp.sample(Vec2::new(-1.0e19, 0.5)), RED);
    }

    #[test]
    fn with_state_keeps_texels() {
        let t = two_texels(SamplerState::default()).with_state(SamplerState::new(Filter::Linear, Wrap::Repeat));
        assert_eq!(t.state().filter, Filter::Linear);
        assert_eq!((t.width(), t.height()), (2, 1));
    }
}
