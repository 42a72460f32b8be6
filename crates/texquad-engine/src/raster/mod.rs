//! End-to-end CPU harness standing in for the GPU's fixed-function raster.
//!
//! The stages never interpolate; this module does it the way the rasterizer
//! does, so tests can drive vertex -> interpolation -> fragment without a GPU.
//! Blending is not modeled: fragments overwrite the framebuffer.

use crate::coords::{Vec2, Vec4};
use crate::paint::Rgba;
use crate::shader::{Program, ProgramError};
use crate::stage::{run_fragment, run_vertex, DrawUniforms, Sample2d, VertexInput, VertexOutput};

/// Barycentric weights of `p` in triangle `abc`.
///
/// Returns `None` for degenerate (zero-area) triangles.
pub fn barycentric(p: Vec2, a: Vec2, b: Vec2, c: Vec2) -> Option<[f32; 3]> {
    let area = edge(a, b, c);
    if area == 0.0 || !area.is_finite() {
        return None;
    }
    let wa = edge(b, c, p) / area;
    let wb = edge(c, a, p) / area;
    let wc = edge(a, b, p) / area;
    Some([wa, wb, wc])
}

/// Twice the signed area of `abp`.
#[inline]
fn edge(a: Vec2, b: Vec2, p: Vec2) -> f32 {
    (b.x - a.x) * (p.y - a.y) - (b.y - a.y) * (p.x - a.x)
}

/// Whether the directed edge `from -> to` of a clockwise (window space, y
/// down) triangle is a top or left edge. Samples exactly on such an edge
/// belong to the triangle; samples on other edges belong to the neighbor.
#[inline]
fn is_top_left(from: Vec2, to: Vec2) -> bool {
    let d = to - from;
    (d.y == 0.0 && d.x > 0.0) || d.y < 0.0
}

/// Affine (screen-space linear) interpolation.
pub fn interpolate_affine(weights: [f32; 3], values: [Vec2; 3]) -> Vec2 {
    values[0] * weights[0] + values[1] * weights[1] + values[2] * weights[2]
}

/// Perspective-correct interpolation using each vertex's clip `w`.
///
/// Equals [`interpolate_affine`] when every `w` is 1.
pub fn interpolate_perspective(weights: [f32; 3], clip_w: [f32; 3], values: [Vec2; 3]) -> Vec2 {
    let k = [weights[0] / clip_w[0], weights[1] / clip_w[1], weights[2] / clip_w[2]];
    let denom = k[0] + k[1] + k[2];
    interpolate_affine([k[0] / denom, k[1] / denom, k[2] / denom], values)
}

/// Which implementation of the stages to run.
#[derive(Debug, Copy, Clone)]
pub enum Shading<'a> {
    /// Hand-written reference stages.
    Reference,
    /// CPU evaluation of a logical program.
    Program(&'a Program),
}

impl Shading<'_> {
    fn vertex(&self, input: VertexInput) -> Result<VertexOutput, ProgramError> {
        match self {
            Shading::Reference => Ok(run_vertex(input)),
            Shading::Program(p) => p.eval_vertex(input),
        }
    }

    fn fragment<S: Sample2d + ?Sized>(&self, uv: Vec2, uniforms: &DrawUniforms<'_, S>) -> Result<Rgba, ProgramError> {
        match self {
            Shading::Reference => Ok(run_fragment(uv, uniforms)),
            Shading::Program(p) => p.eval_fragment(uv, uniforms),
        }
    }
}

/// Row-major color buffer; row 0 is the top of the viewport.
#[derive(Debug, Clone, PartialEq)]
pub struct Framebuffer {
    width: u32,
    height: u32,
    pixels: Vec<Rgba>,
}

impl Framebuffer {
    pub fn new(width: u32, height: u32, clear: Rgba) -> Self {
        Self { width, height, pixels: vec![clear; width as usize * height as usize] }
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn get(&self, x: u32, y: u32) -> Option<Rgba> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.pixels.get(y as usize * self.width as usize + x as usize).copied()
    }

    pub fn pixels(&self) -> &[Rgba] {
        &self.pixels
    }

    fn put(&mut self, x: u32, y: u32, c: Rgba) {
        let idx = y as usize * self.width as usize + x as usize;
        if let Some(px) = self.pixels.get_mut(idx) {
            *px = c;
        }
    }

    /// Window coordinates of a clip-space position (y up in NDC, down in window).
    ///
    /// `None` when the position has no finite projection.
    fn to_window(&self, clip: Vec4) -> Option<Vec2> {
        let ndc = clip.to_ndc()?;
        let p = Vec2::new(
            (ndc.x + 1.0) * 0.5 * self.width as f32,
            (1.0 - ndc.y) * 0.5 * self.height as f32,
        );
        p.is_finite().then_some(p)
    }
}

/// Draws a triangle list into `target`, sampling at pixel centers.
///
/// Every vertex of a triangle is shaded before any of its fragments. Pixel
/// centers on an edge shared by two triangles are shaded once, by the
/// triangle for which it is a top or left edge. Trailing
/// vertices that do not form a full triangle are ignored. Returns the number
/// of fragments written.
pub fn draw_triangles<S: Sample2d + ?Sized>(
    target: &mut Framebuffer,
    vertices: &[VertexInput],
    uniforms: &DrawUniforms<'_, S>,
    shading: Shading<'_>,
) -> Result<usize, ProgramError> {
    if vertices.len() % 3 != 0 {
        log::debug!("draw_triangles: ignoring {} trailing vertices", vertices.len() % 3);
    }

    let mut written = 0;
    for tri in vertices.chunks_exact(3) {
        let mut shaded = [shading.vertex(tri[0])?, shading.vertex(tri[1])?, shading.vertex(tri[2])?];

        let (Some(a), Some(mut b), Some(mut c)) = (
            target.to_window(shaded[0].clip_position),
            target.to_window(shaded[1].clip_position),
            target.to_window(shaded[2].clip_position),
        ) else {
            continue;
        };
        if edge(a, b, c) < 0.0 {
            std::mem::swap(&mut b, &mut c);
            shaded.swap(1, 2);
        }
        // Weight `i` is zero on the edge opposite vertex `i`.
        let owns_edge = [is_top_left(b, c), is_top_left(c, a), is_top_left(a, b)];

        let min_x = a.x.min(b.x).min(c.x).floor().max(0.0) as u32;
        let min_y = a.y.min(b.y).min(c.y).floor().max(0.0) as u32;
        let max_x = (a.x.max(b.x).max(c.x).ceil().max(0.0) as u32).min(target.width);
        let max_y = (a.y.max(b.y).max(c.y).ceil().max(0.0) as u32).min(target.height);

        let clip_w = [shaded[0].clip_position.w, shaded[1].clip_position.w, shaded[2].clip_position.w];
        let uvs = [shaded[0].uv, shaded[1].uv, shaded[2].uv];

        for y in min_y..max_y {
            for x in min_x..max_x {
                let p = Vec2::new(x as f32 + 0.5, y as f32 + 0.5);
                let Some(w) = barycentric(p, a, b, c) else { continue };
                let inside = w
                    .iter()
                    .zip(owns_edge)
                    .all(|(&wi, owned)| wi > 0.0 || (wi == 0.0 && owned));
                if !inside {
                    continue;
                }
                let uv = interpolate_perspective(w, clip_w, uvs);
                let color = shading.fragment(uv, uniforms)?;
                target.put(x, y, color);
                written += 1;
            }
        }
    }
    Ok(written)
}
