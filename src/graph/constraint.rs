//! Uniqueness constraints over (label, property key)

use super::types::Label;
use std::fmt;

/// No two nodes carrying `label` may hold equal values under `property_key`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ConstraintDefinition {
    pub label: Label,
    pub property_key: String,
}

impl ConstraintDefinition {
    pub fn unique(label: Label, property_key: impl Into<String>) -> Self {
        ConstraintDefinition {
            label,
            property_key: property_key.into(),
        }
    }
}

impl fmt::Display for ConstraintDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "UNIQUE({}.{})", self.label, self.property_key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let c = ConstraintDefinition::unique(Label::new("Person"), "email");
        assert_eq!(c.to_string(), "UNIQUE(Person.email)");
    }
}
