//! Renders the logical program into GLSL.
//!
//! One writer covers both tiers; the version decides the keywords:
//!
//! | | legacy | modern |
//! |---|---|---|
//! | vertex input | `attribute` | `in` |
//! | interpolated | `varying` | `out` / `in` |
//! | lookup | `texture2D` | `texture` |
//! | color | `gl_FragColor` | declared output |

use super::config::Precision;
use super::program::{Expr, Program, Slot, Stage};
use super::version::{Dialect, GlslVersion};

/// Emits the source of one stage for `version`.
pub fn emit(program: &Program, stage: Stage, version: GlslVersion, precision: Precision) -> String {
    let w = Writer { program, version };
    let src = match stage {
        Stage::Vertex => w.vertex(),
        Stage::Fragment => w.fragment(precision),
    };
    log::debug!("emitted GLSL {version} {stage} stage ({} bytes)", src.len());
    src
}

struct Writer<'a> {
    program: &'a Program,
    version: GlslVersion,
}

impl Writer<'_> {
    fn legacy(&self) -> bool {
        self.version.dialect() == Dialect::Legacy
    }

    fn header(&self, out: &mut String) {
        out.push_str(&format!("#version {}\n", self.version.directive()));
    }

    fn location(&self, location: u32) -> String {
        if self.version.supports_explicit_locations() {
            format!("layout(location = {location}) ")
        } else {
            String::new()
        }
    }

    fn vertex(&self) -> String {
        let i = self.program.interface();
        let mut out = String::new();
        self.header(&mut out);

        for a in i.attributes() {
            if self.legacy() {
                out.push_str(&format!("attribute {} {};\n", a.ty.glsl(), a.name));
            } else {
                out.push_str(&format!("{}in {} {};\n", self.location(a.location), a.ty.glsl(), a.name));
            }
        }
        for v in i.varyings() {
            let kw = if self.legacy() { "varying" } else { "out" };
            out.push_str(&format!("{kw} {} {};\n", v.ty.glsl(), v.name));
        }
        self.uniforms(Stage::Vertex, &mut out);
        self.main(Stage::Vertex, &mut out);
        out
    }

    fn fragment(&self, precision: Precision) -> String {
        let i = self.program.interface();
        let mut out = String::new();
        self.header(&mut out);
        if self.version.is_es() {
            out.push_str(&format!("precision {precision} float;\n"));
        }

        self.uniforms(Stage::Fragment, &mut out);
        for v in i.varyings() {
            let kw = if self.legacy() { "varying" } else { "in" };
            out.push_str(&format!("{kw} {} {};\n", v.ty.glsl(), v.name));
        }
        if !self.legacy() {
            let c = &i.color;
            out.push_str(&format!("{}out {} {};\n", self.location(c.location), c.ty.glsl(), c.name));
        }
        self.main(Stage::Fragment, &mut out);
        out
    }

    fn uniforms(&self, stage: Stage, out: &mut String) {
        let i = self.program.interface();
        for name in self.program.uniforms_used(stage) {
            if let Some(u) = i.uniform(name) {
                out.push_str(&format!("uniform {} {};\n", u.ty.glsl(), u.name));
            }
        }
    }

    fn main(&self, stage: Stage, out: &mut String) {
        out.push_str("\nvoid main() {\n");
        for assign in self.program.body(stage) {
            out.push_str(&format!("    {} = {};\n", self.slot(assign.slot), self.expr(&assign.value)));
        }
        out.push_str("}\n");
    }

    fn slot(&self, slot: Slot) -> &'static str {
        match slot {
            Slot::Position => "gl_Position",
            Slot::Varying(name) => name,
            Slot::Color if self.legacy() => "gl_FragColor",
            Slot::Color => self.program.interface().color.name,
        }
    }

    fn expr(&self, e: &Expr) -> String {
        match e {
            Expr::Attribute(name) | Expr::Varying(name) | Expr::Uniform(name) => (*name).to_owned(),
            Expr::Extend { xy, z, w } => format!("vec4({}, {z:?}, {w:?})", self.expr(xy)),
            Expr::Sample { sampler, uv } => {
                let func = if self.legacy() { "texture2D" } else { "texture" };
                format!("{func}({sampler}, {})", self.expr(uv))
            }
            Expr::Mul(a, b) => {
                let rhs = match **b {
                    Expr::Mul(..) => format!("({})", self.expr(b)),
                    _ => self.expr(b),
                };
                format!("{} * {rhs}", self.expr(a))
            }
        }
    }
}
