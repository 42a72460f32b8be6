//! Single logical description of the stage pair.
//!
//! The program is a handful of assignments over a tiny expression tree. Every
//! dialect emitter walks the same tree, so the variants cannot drift apart,
//! and the CPU evaluator below gives the numeric meaning of that tree.

use core::fmt;

use crate::coords::{Vec2, Vec4};
use crate::paint::Rgba;
use crate::stage::{DrawUniforms, Sample2d, VertexInput, VertexOutput};

use super::interface::{Interface, ValueType};

/// Programmable stage.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Stage {
    Vertex,
    Fragment,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Vertex => f.write_str("vertex"),
            Stage::Fragment => f.write_str("fragment"),
        }
    }
}

/// Expression node. Names refer to entries of the program's [`Interface`].
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Attribute(&'static str),
    Varying(&'static str),
    Uniform(&'static str),
    /// `vec4(xy, z, w)`
    Extend { xy: Box<Expr>, z: f32, w: f32 },
    /// Texture lookup through a sampler uniform.
    Sample { sampler: &'static str, uv: Box<Expr> },
    /// Componentwise product of two equally typed vectors.
    Mul(Box<Expr>, Box<Expr>),
}

impl Expr {
    pub fn extend(xy: Expr, z: f32, w: f32) -> Self {
        Expr::Extend { xy: Box::new(xy), z, w }
    }

    pub fn sample(sampler: &'static str, uv: Expr) -> Self {
        Expr::Sample { sampler, uv: Box::new(uv) }
    }

    pub fn mul(lhs: Expr, rhs: Expr) -> Self {
        Expr::Mul(Box::new(lhs), Box::new(rhs))
    }

    /// Uniform names referenced by this expression, in first-use order.
    pub fn uniforms(&self, out: &mut Vec<&'static str>) {
        match self {
            Expr::Uniform(name) | Expr::Sample { sampler: name, .. } => {
                if !out.contains(name) {
                    out.push(*name);
                }
                if let Expr::Sample { uv, .. } = self {
                    uv.uniforms(out);
                }
            }
            Expr::Extend { xy, .. } => xy.uniforms(out),
            Expr::Mul(a, b) => {
                a.uniforms(out);
                b.uniforms(out);
            }
            Expr::Attribute(_) | Expr::Varying(_) => {}
        }
    }
}

/// Destination of an assignment.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Slot {
    /// Clip-space position (vertex stage).
    Position,
    /// Interpolated output (vertex stage).
    Varying(&'static str),
    /// Final color (fragment stage).
    Color,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Assign {
    pub slot: Slot,
    pub value: Expr,
}

impl Assign {
    pub fn new(slot: Slot, value: Expr) -> Self {
        Self { slot, value }
    }
}

/// Checked vertex + fragment program over an interface.
#[derive(Debug, Clone, PartialEq)]
pub struct Program {
    interface: Interface,
    vertex: Vec<Assign>,
    fragment: Vec<Assign>,
}

/// Structural error in a logical program.
#[derive(Debug, Clone, PartialEq)]
pub enum ProgramError {
    /// A name is not declared by the interface, or not readable in this stage.
    UnknownName { stage: Stage, name: &'static str },
    /// `Sample` references a uniform that is not a sampler.
    NotASampler(&'static str),
    TypeMismatch { stage: Stage, expected: ValueType, found: ValueType },
    /// The slot cannot be written by this stage.
    InvalidSlot { stage: Stage, slot: Slot },
    /// A required output is never written.
    MissingOutput { stage: Stage, slot: Slot },
    /// An output is written more than once.
    DuplicateOutput { stage: Stage, slot: Slot },
}

impl fmt::Display for ProgramError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProgramError::UnknownName { stage, name } => {
                write!(f, "{stage} stage reads unknown name `{name}`")
            }
            ProgramError::NotASampler(name) => write!(f, "uniform `{name}` is not a sampler"),
            ProgramError::TypeMismatch { stage, expected, found } => {
                write!(f, "{stage} stage: expected {expected}, found {found}")
            }
            ProgramError::InvalidSlot { stage, slot } => {
                write!(f, "{stage} stage cannot write {slot:?}")
            }
            ProgramError::MissingOutput { stage, slot } => {
                write!(f, "{stage} stage never writes {slot:?}")
            }
            ProgramError::DuplicateOutput { stage, slot } => {
                write!(f, "{stage} stage writes {slot:?} more than once")
            }
        }
    }
}

impl std::error::Error for ProgramError {}

/// Value produced while evaluating an expression on the CPU.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum Value {
    Vec2(Vec2),
    Vec4([f32; 4]),
}

impl Value {
    fn ty(self) -> ValueType {
        match self {
            Value::Vec2(_) => ValueType::Vec2,
            Value::Vec4(_) => ValueType::Vec4,
        }
    }
}

impl Program {
    /// Checks and builds a program.
    pub fn new(interface: Interface, vertex: Vec<Assign>, fragment: Vec<Assign>) -> Result<Self, ProgramError> {
        let program = Self { interface, vertex, fragment };
        program.check()?;
        Ok(program)
    }

    /// The textured, tinted quad:
    ///
    /// ```text
    /// vertex:   v_uv = uv;  position = vec4(position, 0.0, 1.0)
    /// fragment: color = sample(u_texture, v_uv) * u_tint
    /// ```
    pub fn textured_quad() -> Self {
        let i = Interface::QUAD;
        Self {
            interface: i,
            vertex: vec![
                Assign::new(Slot::Varying(i.v_uv.name), Expr::Attribute(i.uv.name)),
                Assign::new(Slot::Position, Expr::extend(Expr::Attribute(i.position.name), 0.0, 1.0)),
            ],
            fragment: vec![Assign::new(
                Slot::Color,
                Expr::mul(
                    Expr::sample(i.sampler.name, Expr::Varying(i.v_uv.name)),
                    Expr::Uniform(i.tint.name),
                ),
            )],
        }
    }

    #[inline]
    pub fn interface(&self) -> &Interface {
        &self.interface
    }

    pub fn body(&self, stage: Stage) -> &[Assign] {
        match stage {
            Stage::Vertex => &self.vertex,
            Stage::Fragment => &self.fragment,
        }
    }

    /// Uniforms read by `stage`, in first-use order. Emitters declare only these.
    pub fn uniforms_used(&self, stage: Stage) -> Vec<&'static str> {
        let mut out = Vec::new();
        for assign in self.body(stage) {
            assign.value.uniforms(&mut out);
        }
        out
    }

    /// Verifies names, types and outputs of both stages.
    pub fn check(&self) -> Result<(), ProgramError> {
        for stage in [Stage::Vertex, Stage::Fragment] {
            let mut written: Vec<Slot> = Vec::new();
            for assign in self.body(stage) {
                let expected = self.slot_type(stage, assign.slot)?;
                let found = self.type_of(stage, &assign.value)?;
                if expected != found {
                    return Err(ProgramError::TypeMismatch { stage, expected, found });
                }
                if written.contains(&assign.slot) {
                    return Err(ProgramError::DuplicateOutput { stage, slot: assign.slot });
                }
                written.push(assign.slot);
            }

            let required: Vec<Slot> = match stage {
                Stage::Vertex => std::iter::once(Slot::Position)
                    .chain(self.interface.varyings().into_iter().map(|v| Slot::Varying(v.name)))
                    .collect(),
                Stage::Fragment => vec![Slot::Color],
            };
            if let Some(slot) = required.into_iter().find(|s| !written.contains(s)) {
                return Err(ProgramError::MissingOutput { stage, slot });
            }
        }
        Ok(())
    }

    fn slot_type(&self, stage: Stage, slot: Slot) -> Result<ValueType, ProgramError> {
        match (stage, slot) {
            (Stage::Vertex, Slot::Position) => Ok(ValueType::Vec4),
            (Stage::Vertex, Slot::Varying(name)) => self
                .interface
                .varying(name)
                .map(|v| v.ty)
                .ok_or(ProgramError::UnknownName { stage, name }),
            (Stage::Fragment, Slot::Color) => Ok(self.interface.color.ty),
            _ => Err(ProgramError::InvalidSlot { stage, slot }),
        }
    }

    /// Static type of `expr` when evaluated in `stage`.
    pub fn type_of(&self, stage: Stage, expr: &Expr) -> Result<ValueType, ProgramError> {
        match expr {
            Expr::Attribute(name) => match stage {
                Stage::Vertex => self.interface.attribute(name).map(|a| a.ty),
                Stage::Fragment => None,
            }
            .ok_or(ProgramError::UnknownName { stage, name: *name }),
            Expr::Varying(name) => match stage {
                Stage::Fragment => self.interface.varying(name).map(|v| v.ty),
                Stage::Vertex => None,
            }
            .ok_or(ProgramError::UnknownName { stage, name: *name }),
            Expr::Uniform(name) => {
                let u = self.interface.uniform(name).ok_or(ProgramError::UnknownName { stage, name: *name })?;
                if u.is_sampler() {
                    // Samplers are only usable through `Sample`.
                    return Err(ProgramError::TypeMismatch {
                        stage,
                        expected: ValueType::Vec4,
                        found: ValueType::Sampler2d,
                    });
                }
                Ok(u.ty)
            }
            Expr::Extend { xy, .. } => {
                expect_type(stage, ValueType::Vec2, self.type_of(stage, xy)?)?;
                Ok(ValueType::Vec4)
            }
            Expr::Sample { sampler, uv } => {
                let u = self
                    .interface
                    .uniform(sampler)
                    .ok_or(ProgramError::UnknownName { stage, name: *sampler })?;
                if !u.is_sampler() {
                    return Err(ProgramError::NotASampler(*sampler));
                }
                expect_type(stage, ValueType::Vec2, self.type_of(stage, uv)?)?;
                Ok(ValueType::Vec4)
            }
            Expr::Mul(a, b) => {
                let ta = self.type_of(stage, a)?;
                expect_type(stage, ta, self.type_of(stage, b)?)?;
                Ok(ta)
            }
        }
    }

    // ── CPU evaluation ────────────────────────────────────────────────────

    /// Runs the vertex stage of this program for one vertex.
    pub fn eval_vertex(&self, input: VertexInput) -> Result<VertexOutput, ProgramError> {
        let mut out = VertexOutput::default();
        for assign in &self.vertex {
            let value = self.eval(Stage::Vertex, &assign.value, &Env::Vertex(input))?;
            match (assign.slot, value) {
                (Slot::Position, Value::Vec4(p)) => out.clip_position = Vec4::from(p),
                (Slot::Varying(name), Value::Vec2(uv)) if name == self.interface.v_uv.name => out.uv = uv,
                (slot, value) => {
                    return Err(ProgramError::TypeMismatch {
                        stage: Stage::Vertex,
                        expected: self.slot_type(Stage::Vertex, slot)?,
                        found: value.ty(),
                    });
                }
            }
        }
        Ok(out)
    }

    /// Runs the fragment stage of this program for one fragment.
    pub fn eval_fragment<S: Sample2d + ?Sized>(
        &self,
        uv: Vec2,
        uniforms: &DrawUniforms<'_, S>,
    ) -> Result<Rgba, ProgramError> {
        let mut color = Rgba::TRANSPARENT;
        let sample = |uv: Vec2| uniforms.texture.sample(uv);
        let env = Env::Fragment { uv, sample: &sample, tint: uniforms.tint };
        for assign in &self.fragment {
            match self.eval(Stage::Fragment, &assign.value, &env)? {
                Value::Vec4(c) => color = Rgba::from(c),
                Value::Vec2(_) => {
                    return Err(ProgramError::TypeMismatch {
                        stage: Stage::Fragment,
                        expected: ValueType::Vec4,
                        found: ValueType::Vec2,
                    });
                }
            }
        }
        Ok(color)
    }

    fn eval(&self, stage: Stage, expr: &Expr, env: &Env<'_>) -> Result<Value, ProgramError> {
        let i = &self.interface;
        match expr {
            Expr::Attribute(name) => match env {
                Env::Vertex(input) if *name == i.position.name => Ok(Value::Vec2(input.position)),
                Env::Vertex(input) if *name == i.uv.name => Ok(Value::Vec2(input.uv)),
                _ => Err(ProgramError::UnknownName { stage, name: *name }),
            },
            Expr::Varying(name) => match env {
                Env::Fragment { uv, .. } if *name == i.v_uv.name => Ok(Value::Vec2(*uv)),
                _ => Err(ProgramError::UnknownName { stage, name: *name }),
            },
            Expr::Uniform(name) => match env {
                Env::Fragment { tint, .. } if *name == i.tint.name => Ok(Value::Vec4(tint.to_array())),
                _ => Err(ProgramError::UnknownName { stage, name: *name }),
            },
            Expr::Extend { xy, z, w } => match self.eval(stage, xy, env)? {
                Value::Vec2(v) => Ok(Value::Vec4([v.x, v.y, *z, *w])),
                other => Err(ProgramError::TypeMismatch { stage, expected: ValueType::Vec2, found: other.ty() }),
            },
            Expr::Sample { sampler, uv } => {
                let Env::Fragment { sample, .. } = env else {
                    return Err(ProgramError::UnknownName { stage, name: *sampler });
                };
                if *sampler != i.sampler.name {
                    return Err(ProgramError::NotASampler(*sampler));
                }
                match self.eval(stage, uv, env)? {
                    Value::Vec2(uv) => Ok(Value::Vec4(sample(uv).to_array())),
                    other => Err(ProgramError::TypeMismatch { stage, expected: ValueType::Vec2, found: other.ty() }),
                }
            }
            Expr::Mul(a, b) => match (self.eval(stage, a, env)?, self.eval(stage, b, env)?) {
                (Value::Vec2(a), Value::Vec2(b)) => Ok(Value::Vec2(Vec2::new(a.x * b.x, a.y * b.y))),
                (Value::Vec4(a), Value::Vec4(b)) => Ok(Value::Vec4([a[0] * b[0], a[1] * b[1], a[2] * b[2], a[3] * b[3]])),
                (a, b) => Err(ProgramError::TypeMismatch { stage, expected: a.ty(), found: b.ty() }),
            },
        }
    }
}

impl Default for Program {
    fn default() -> Self {
        Self::textured_quad()
    }
}

enum Env<'a> {
    Vertex(VertexInput),
    Fragment { uv: Vec2, sample: &'a dyn Fn(Vec2) -> Rgba, tint: Rgba },
}

fn expect_type(stage: Stage, expected: ValueType, found: ValueType) -> Result<(), ProgramError> {
    if expected == found {
        Ok(())
    } else {
        Err(ProgramError::TypeMismatch { stage, expected, found })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stage::{run_fragment, run_vertex, Filter, SamplerState, Solid, Texture2d, Wrap};

    fn quad() -> Program {
        Program::textured_quad()
    }

    // ── checking ──────────────────────────────────────────────────────────

    #[test]
    fn textured_quad_passes_check() {
        let p = quad();
        let rebuilt = Program::new(p.interface, p.vertex.clone(), p.fragment.clone());
        assert_eq!(rebuilt, Ok(p));
    }

    #[test]
    fn fragment_cannot_read_attributes() {
        let i = Interface::QUAD;
        let err = Program::new(
            i,
            quad().vertex,
            vec![Assign::new(Slot::Color, Expr::extend(Expr::Attribute("uv"), 0.0, 1.0))],
        )
        .unwrap_err();
        assert_eq!(err, ProgramError::UnknownName { stage: Stage::Fragment, name: "uv" });
    }

    #[test]
    fn missing_varying_write_is_rejected() {
        let i = Interface::QUAD;
        let vertex = vec![Assign::new(Slot::Position, Expr::extend(Expr::Attribute("position"), 0.0, 1.0))];
        let err = Program::new(i, vertex, quad().fragment).unwrap_err();
        assert_eq!(err, ProgramError::MissingOutput { stage: Stage::Vertex, slot: Slot::Varying("v_uv") });
    }

    #[test]
    fn sampling_a_color_uniform_is_rejected() {
        let i = Interface::QUAD;
        let fragment = vec![Assign::new(Slot::Color, Expr::sample("u_tint", Expr::Varying("v_uv")))];
        assert_eq!(Program::new(i, quad().vertex, fragment).unwrap_err(), ProgramError::NotASampler("u_tint"));
    }

    #[test]
    fn vec2_times_vec4_is_rejected() {
        let i = Interface::QUAD;
        let fragment = vec![Assign::new(
            Slot::Color,
            Expr::mul(Expr::Varying("v_uv"), Expr::Uniform("u_tint")),
        )];
        assert!(matches!(
            Program::new(i, quad().vertex, fragment),
            Err(ProgramError::TypeMismatch { stage: Stage::Fragment, .. })
        ));
    }

    #[test]
    fn color_written_from_vertex_is_invalid() {
        let i = Interface::QUAD;
        let mut vertex = quad().vertex;
        vertex.push(Assign::new(Slot::Color, Expr::extend(Expr::Attribute("uv"), 0.0, 1.0)));
        assert_eq!(
            Program::new(i, vertex, quad().fragment).unwrap_err(),
            ProgramError::InvalidSlot { stage: Stage::Vertex, slot: Slot::Color }
        );
    }

    #[test]
    fn uniforms_used_per_stage() {
        let p = quad();
        assert!(p.uniforms_used(Stage::Vertex).is_empty());
        assert_eq!(p.uniforms_used(Stage::Fragment), vec!["u_texture", "u_tint"]);
    }

    // ── evaluation matches the reference stages ───────────────────────────

    #[test]
    fn vertex_eval_matches_reference() {
        let input = VertexInput::new(Vec2::new(0.3, -0.7), Vec2::new(0.125, 0.875));
        assert_eq!(quad().eval_vertex(input), Ok(run_vertex(input)));
    }

    #[test]
    fn opaque_white_texel_with_colored_tint() {
        let tint = Rgba::new(0.2, 0.6, 0.9, 1.0);
        let white = Solid(Rgba::WHITE);
        let u = DrawUniforms::new(&white, tint);
        let uv = Vec2::new(0.5, 0.5);
        assert_eq!(quad().eval_fragment(uv, &u), Ok(run_fragment(uv, &u)));
        assert_eq!(quad().eval_fragment(uv, &u), Ok(tint));
    }

    #[test]
    fn transparent_texel() {
        let clear = Solid(Rgba::TRANSPARENT);
        let u = DrawUniforms::new(&clear, Rgba::new(1.0, 0.5, 0.25, 1.0));
        assert_eq!(quad().eval_fragment(Vec2::zero(), &u), Ok(Rgba::TRANSPARENT));
    }

    #[test]
    fn uv_on_primitive_edge() {
        let tex = Texture2d::from_texels(
            2,
            2,
            vec![
                Rgba::new(1.0, 0.0, 0.0, 1.0),
                Rgba::new(0.0, 1.0, 0.0, 1.0),
                Rgba::new(0.0, 0.0, 1.0, 1.0),
                Rgba::new(1.0, 1.0, 1.0, 0.5),
            ],
            SamplerState::new(Filter::Linear, Wrap::ClampToEdge),
        )
        .unwrap();
        let u = DrawUniforms::new(&tex, Rgba::new(0.5, 1.0, 2.0, 0.75));
        for uv in [Vec2::new(0.0, 0.5), Vec2::new(1.0, 0.0), Vec2::new(0.5, 1.0)] {
            assert_eq!(quad().eval_fragment(uv, &u), Ok(run_fragment(uv, &u)));
        }
    }
}
