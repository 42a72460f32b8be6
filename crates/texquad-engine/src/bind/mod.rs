//! Binding validation for the external build/link layer.
//!
//! After compiling and linking an emitted program, the host queries its
//! active attributes and uniforms and records them in [`LinkedBindings`].
//! [`validate`] then checks them against the declared [`Interface`] so a
//! mismatch fails at program-build time instead of rendering garbage.

mod error;

pub use error::BindingError;

use crate::shader::Interface;

/// Active attributes and uniforms reported by a linked program.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinkedBindings {
    attributes: Vec<(String, u32)>,
    uniforms: Vec<(String, Option<u32>)>,
}

impl LinkedBindings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records an active attribute and the location the linker assigned.
    pub fn attribute(mut self, name: impl Into<String>, location: u32) -> Self {
        self.attributes.push((name.into(), location));
        self
    }

    /// Records an active non-sampler uniform.
    pub fn uniform(mut self, name: impl Into<String>) -> Self {
        self.uniforms.push((name.into(), None));
        self
    }

    /// Records an active sampler uniform and its texture unit.
    pub fn sampler(mut self, name: impl Into<String>, unit: u32) -> Self {
        self.uniforms.push((name.into(), Some(unit)));
        self
    }

    /// Bindings a correct link of `interface` reports.
    pub fn expected(interface: &Interface) -> Self {
        let mut linked = interface
            .attribute_locations()
            .fold(Self::new(), |l, (name, loc)| l.attribute(name, loc));
        for u in interface.uniforms() {
            linked = match u.unit {
                Some(unit) => linked.sampler(u.name, unit),
                None => linked.uniform(u.name),
            };
        }
        linked
    }

    fn find_attribute(&self, name: &str) -> Option<u32> {
        self.attributes.iter().find(|(n, _)| n == name).map(|(_, loc)| *loc)
    }

    fn find_uniform(&self, name: &str) -> Option<Option<u32>> {
        self.uniforms.iter().find(|(n, _)| n == name).map(|(_, unit)| *unit)
    }
}

/// Checks `linked` against `interface`, returning the first mismatch.
///
/// Attributes are checked before uniforms; declared names before
/// undeclared ones.
pub fn validate(interface: &Interface, linked: &LinkedBindings) -> Result<(), BindingError> {
    for attr in interface.attributes() {
        match linked.find_attribute(attr.name) {
            None => return Err(BindingError::MissingAttribute(attr.name.to_owned())),
            Some(found) if found != attr.location => {
                return Err(BindingError::AttributeLocation {
                    name: attr.name.to_owned(),
                    expected: attr.location,
                    found,
                });
            }
            Some(_) => {}
        }
    }
    if let Some((name, _)) = linked.attributes.iter().find(|(n, _)| interface.attribute(n).is_none()) {
        return Err(BindingError::UnexpectedAttribute(name.clone()));
    }

    for uniform in interface.uniforms() {
        let Some(found) = linked.find_uniform(uniform.name) else {
            return Err(BindingError::MissingUniform(uniform.name.to_owned()));
        };
        if let Some(expected) = uniform.unit {
            if found != Some(expected) {
                return Err(BindingError::SamplerUnit { name: uniform.name.to_owned(), expected, found });
            }
        }
    }
    if let Some((name, _)) = linked.uniforms.iter().find(|(n, _)| interface.uniform(n).is_none()) {
        return Err(BindingError::UnexpectedUniform(name.clone()));
    }

    log::debug!("linked program matches interface");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quad() -> Interface {
        Interface::QUAD
    }

    #[test]
    fn accepts_declared_interface() {
        assert_eq!(validate(&quad(), &LinkedBindings::expected(&quad())), Ok(()));
    }

    #[test]
    fn accepts_any_report_order() {
        let linked = LinkedBindings::new()
            .uniform("u_tint")
            .attribute("uv", 1)
            .sampler("u_texture", 0)
            .attribute("position", 0);
        assert_eq!(validate(&quad(), &linked), Ok(()));
    }

    // ── attributes ────────────────────────────────────────────────────────

    #[test]
    fn missing_attribute() {
        let linked = LinkedBindings::new().attribute("position", 0).sampler("u_texture", 0).uniform("u_tint");
        assert_eq!(validate(&quad(), &linked), Err(BindingError::MissingAttribute("uv".into())));
    }

    #[test]
    fn swapped_attribute_locations() {
        let linked = LinkedBindings::expected(&quad());
        let linked = LinkedBindings { attributes: vec![("position".into(), 1), ("uv".into(), 0)], ..linked };
        assert_eq!(
            validate(&quad(), &linked),
            Err(BindingError::AttributeLocation { name: "position".into(), expected: 0, found: 1 })
        );
    }

    #[test]
    fn unexpected_attribute() {
        let linked = LinkedBindings::expected(&quad()).attribute("color", 2);
        assert_eq!(validate(&quad(), &linked), Err(BindingError::UnexpectedAttribute("color".into())));
    }

    // ── uniforms ──────────────────────────────────────────────────────────

    #[test]
    fn missing_tint() {
        let linked = LinkedBindings::new().attribute("position", 0).attribute("uv", 1).sampler("u_texture", 0);
        assert_eq!(validate(&quad(), &linked), Err(BindingError::MissingUniform("u_tint".into())));
    }

    #[test]
    fn sampler_on_wrong_unit() {
        let linked = LinkedBindings::new()
            .attribute("position", 0)
            .attribute("uv", 1)
            .sampler("u_texture", 3)
            .uniform("u_tint");
        assert_eq!(
            validate(&quad(), &linked),
            Err(BindingError::SamplerUnit { name: "u_texture".into(), expected: 0, found: Some(3) })
        );
    }

    #[test]
    fn unexpected_uniform() {
        let linked = LinkedBindings::expected(&quad()).uniform("u_mvp");
        assert_eq!(validate(&quad(), &linked), Err(BindingError::UnexpectedUniform("u_mvp".into())));
    }

    #[test]
    fn attributes_are_checked_first() {
        let linked = LinkedBindings::new().uniform("u_extra");
        assert!(matches!(validate(&quad(), &linked), Err(BindingError::MissingAttribute(_))));
    }

    #[test]
    fn error_messages_name_the_binding() {
        let e = BindingError::SamplerUnit { name: "u_texture".into(), expected: 0, found: None };
        assert_eq!(e.to_string(), "sampler `u_texture` has no texture unit, expected 0");
    }
}
