//! Renders the logical program into a single WGSL module for wgpu.
//!
//! Both entry points live in one module, sharing the `VertexOutput` struct.

use super::program::{Expr, Program, Slot, Stage};

pub const VERTEX_ENTRY: &str = "vs_main";
pub const FRAGMENT_ENTRY: &str = "fs_main";

const CLIP_POSITION: &str = "clip_position";

/// Emits the WGSL module containing `vs_main` and `fs_main`.
pub fn emit(program: &Program) -> String {
    let i = program.interface();
    let mut out = String::new();

    out.push_str("struct VertexOutput {\n");
    out.push_str(&format!("    @builtin(position) {CLIP_POSITION}: vec4<f32>,\n"));
    for v in i.varyings() {
        out.push_str(&format!("    @location({}) {}: {},\n", v.location, v.name, v.ty.wgsl()));
    }
    out.push_str("}\n\n");

    for u in i.uniforms() {
        if u.is_sampler() {
            out.push_str(&format!("@group(0) @binding({}) var {}: {};\n", u.binding, u.name, u.ty.wgsl()));
            out.push_str(&format!(
                "@group(0) @binding({}) var {}: sampler;\n",
                u.binding + 1,
                u.wgsl_sampler_name()
            ));
        } else {
            out.push_str(&format!("@group(0) @binding({}) var<uniform> {}: {};\n", u.binding, u.name, u.ty.wgsl()));
        }
    }

    // ── vertex ──
    let params: Vec<String> = i
        .attributes()
        .into_iter()
        .map(|a| format!("@location({}) {}: {}", a.location, a.name, a.ty.wgsl()))
        .collect();
    out.push_str(&format!("\n@vertex\nfn {VERTEX_ENTRY}({}) -> VertexOutput {{\n", params.join(", ")));
    out.push_str("    var output: VertexOutput;\n");
    for assign in program.body(Stage::Vertex) {
        let dst = match assign.slot {
            Slot::Position => format!("output.{CLIP_POSITION}"),
            Slot::Varying(name) => format!("output.{name}"),
            Slot::Color => continue,
        };
        out.push_str(&format!("    {dst} = {};\n", expr(program, &assign.value)));
    }
    out.push_str("    return output;\n}\n");

    // ── fragment ──
    let color = &i.color;
    out.push_str(&format!(
        "\n@fragment\nfn {FRAGMENT_ENTRY}(input: VertexOutput) -> @location({}) {} {{\n",
        color.location,
        color.ty.wgsl()
    ));
    out.push_str(&format!("    var {}: {};\n", color.name, color.ty.wgsl()));
    for assign in program.body(Stage::Fragment) {
        if assign.slot == Slot::Color {
            out.push_str(&format!("    {} = {};\n", color.name, expr(program, &assign.value)));
        }
    }
    out.push_str(&format!("    return {};\n}}\n", color.name));

    log::debug!("emitted WGSL module ({} bytes)", out.len());
    out
}

fn expr(program: &Program, e: &Expr) -> String {
    match e {
        Expr::Attribute(name) | Expr::Uniform(name) => (*name).to_owned(),
        Expr::Varying(name) => format!("input.{name}"),
        Expr::Extend { xy, z, w } => format!("vec4<f32>({}, {z:?}, {w:?})", expr(program, xy)),
        Expr::Sample { sampler, uv } => {
            let paired = program
                .interface()
                .uniform(sampler)
                .map(|u| u.wgsl_sampler_name())
                .unwrap_or_else(|| format!("{sampler}_sampler"));
            format!("textureSample({sampler}, {paired}, {})", expr(program, uv))
        }
        Expr::Mul(a, b) => {
            let rhs = match **b {
                Expr::Mul(..) => format!("({})", expr(program, b)),
                _ => expr(program, b),
            };
            format!("{} * {rhs}", expr(program, a))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn module_exact() {
        let src = emit(&Program::textured_quad());
        let expected = "\
struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) v_uv: vec2<f32>,
}

@group(0) @binding(0) var u_texture: texture_2d<f32>;
@group(0) @binding(1) var u_texture_sampler: sampler;
@group(0) @binding(2) var<uniform> u_tint: vec4<f32>;

@vertex
fn vs_main(@location(0) position: vec2<f32>, @location(1) uv: vec2<f32>) -> VertexOutput {
    var output: VertexOutput;
    output.v_uv = uv;
    output.clip_position = vec4<f32>(position, 0.0, 1.0);
    return output;
}

@fragment
fn fs_main(input: VertexOutput) -> @location(0) vec4<f32> {
    var o_color: vec4<f32>;
    o_color = textureSample(u_texture, u_texture_sampler, input.v_uv) * u_tint;
    return o_color;
}
";
        assert_eq!(src, expected);
    }

    #[test]
    fn entry_points_are_declared() {
        let src = emit(&Program::textured_quad());
        assert!(src.contains(&format!("fn {VERTEX_ENTRY}(")));
        assert!(src.contains(&format!("fn {FRAGMENT_ENTRY}(")));
    }
}
