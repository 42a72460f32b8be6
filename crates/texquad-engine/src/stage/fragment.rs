use crate::coords::Vec2;
use crate::paint::Rgba;

use super::Sample2d;

/// Uniforms bound for one draw call; shared read-only by every invocation.
#[derive(Debug)]
pub struct DrawUniforms<'a, S: Sample2d + ?Sized> {
    pub texture: &'a S,
    pub tint: Rgba,
}

impl<'a, S: Sample2d + ?Sized> DrawUniforms<'a, S> {
    #[inline]
    pub fn new(texture: &'a S, tint: Rgba) -> Self {
        Self { texture, tint }
    }
}

impl<S: Sample2d + ?Sized> Clone for DrawUniforms<'_, S> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<S: Sample2d + ?Sized> Copy for DrawUniforms<'_, S> {}

/// Fragment stage: `sample(uv) * tint`, componentwise including alpha.
#[inline]
pub fn run_fragment<S: Sample2d + ?Sized>(uv: Vec2, uniforms: &DrawUniforms<'_, S>) -> Rgba {
    uniforms.texture.sample(uv) * uniforms.tint
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stage::Solid;
    use proptest::prelude::*;

    fn channel() -> impl Strategy<Value = f32> {
        -4.0f32..4.0
    }

    #[test]
    fn identity_tint_returns_texel() {
        let texel = Rgba::new(0.2, 0.4, 0.6, 0.8);
        let sampler = Solid(texel);
        let u = DrawUniforms::new(&sampler, Rgba::WHITE);
        assert_eq!(run_fragment(Vec2::new(0.5, 0.5), &u), texel);
    }

    #[test]
    fn zero_tint_returns_zero() {
        let sampler = Solid(Rgba::new(0.9, 0.1, 0.3, 1.0));
        let u = DrawUniforms::new(&sampler, Rgba::TRANSPARENT);
        assert_eq!(run_fragment(Vec2::zero(), &u), Rgba::TRANSPARENT);
    }

    #[test]
    fn alpha_is_tinted_like_color() {
        let sampler = Solid(Rgba::WHITE);
        let u = DrawUniforms::new(&sampler, Rgba::new(1.0, 1.0, 1.0, 0.25));
        assert_eq!(run_fragment(Vec2::zero(), &u).a, 0.25);
    }

    #[test]
    fn closure_sampler_receives_uv_unchanged() {
        let sampler = |uv: Vec2| Rgba::new(uv.x, uv.y, 0.0, 1.0);
        let u = DrawUniforms::new(&sampler, Rgba::WHITE);
        assert_eq!(run_fragment(Vec2::new(1.5, -0.5), &u), Rgba::new(1.5, -0.5, 0.0, 1.0));
    }

    proptest! {
        #[test]
        fn multiplicative_tint_law(
            r in channel(), g in channel(), b in channel(), a in channel(),
            tr in channel(), tg in channel(), tb in channel(), ta in channel(),
        ) {
            let texel = Rgba::new(r, g, b, a);
            let tint = Rgba::new(tr, tg, tb, ta);
            let sampler = Solid(texel);
            let u = DrawUniforms::new(&sampler, tint);
            let out = run_fragment(Vec2::zero(), &u);
            prop_assert_eq!(out, Rgba::new(r * tr, g * tg, b * tb, a * ta));
        }

        #[test]
        fn zero_tint_for_any_texel(
            r in channel(), g in channel(), b in channel(), a in channel(),
        ) {
            let sampler = Solid(Rgba::new(r, g, b, a));
            let u = DrawUniforms::new(&sampler, Rgba::TRANSPARENT);
            let out = run_fragment(Vec2::zero(), &u);
            prop_assert!(out.approx_eq(Rgba::TRANSPARENT, 0.0));
        }
    }
}
