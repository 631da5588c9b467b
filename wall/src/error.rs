use std::fmt;

/// Errors raised while assembling a block tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConstructionError {
    /// A composite block was given no children, so it has no color or material.
    EmptyComposite,
}

impl fmt::Display for ConstructionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConstructionError::EmptyComposite => {
                write!(f, "empty composite: a composite block needs at least one child")
            }
        }
    }
}

impl std::error::Error for ConstructionError {}
