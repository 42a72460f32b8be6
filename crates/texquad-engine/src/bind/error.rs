use std::fmt;

/// Mismatch between a linked program and the declared stage interface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BindingError {
    /// A declared attribute is not active in the linked program.
    MissingAttribute(String),
    /// An attribute was linked at a different location than declared.
    AttributeLocation { name: String, expected: u32, found: u32 },
    /// The linked program has an attribute the interface does not declare.
    UnexpectedAttribute(String),
    MissingUniform(String),
    /// The sampler uniform is bound to the wrong texture unit.
    SamplerUnit { name: String, expected: u32, found: Option<u32> },
    UnexpectedUniform(String),
}

impl fmt::Display for BindingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BindingError::MissingAttribute(name) => write!(f, "attribute `{name}` is not active in the linked program"),
            BindingError::AttributeLocation { name, expected, found } => {
                write!(f, "attribute `{name}` linked at location {found}, expected {expected}")
            }
            BindingError::UnexpectedAttribute(name) => write!(f, "undeclared attribute `{name}`"),
            BindingError::MissingUniform(name) => write!(f, "uniform `{name}` is not active in the linked program"),
            BindingError::SamplerUnit { name, expected, found: Some(found) } => {
                write!(f, "sampler `{name}` bound to texture unit {found}, expected {expected}")
            }
            BindingError::SamplerUnit { name, expected, found: None } => {
                write!(f, "sampler `{name}` has no texture unit, expected {expected}")
            }
            BindingError::UnexpectedUniform(name) => write!(f, "undeclared uniform `{name}`"),
        }
    }
}

impl std::error::Error for BindingError {}
