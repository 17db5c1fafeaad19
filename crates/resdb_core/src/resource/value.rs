//! Resource payload field tree.

use serde::{Deserialize, Serialize};

/// A resource payload: a typed, ordered field tree.
///
/// The tree is owned by the caller; the localization engine only needs
/// to locate the three reference-bearing shapes inside it. Field order
/// is preserved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resource {
    /// Resource type name.
    pub resource_type: String,
    /// Top-level fields in document order.
    pub fields: Vec<(String, FieldValue)>,
}

impl Resource {
    /// Creates an empty resource of the given type.
    pub fn new(resource_type: impl Into<String>) -> Self {
        Self {
            resource_type: resource_type.into(),
            fields: Vec::new(),
        }
    }

    /// Appends a field.
    #[must_use]
    pub fn field(mut self, name: impl Into<String>, value: FieldValue) -> Self {
        self.fields.push((name.into(), value));
        self
    }

    /// Returns the first field with the given name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields
            .iter()
            .find(|(field, _)| field == name)
            .map(|(_, value)| value)
    }
}

/// A single field value.
///
/// `Reference`, `Uri`, and `Markup` are the reference-bearing shapes
/// the localization engine rewrites; everything else is carried
/// opaquely. `List` and `Group` nest arbitrarily.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum FieldValue {
    /// Structured reference to another resource.
    Reference(Reference),
    /// Plain address-valued text.
    Uri(String),
    /// Rich text with embedded links (XHTML).
    Markup(String),
    /// Non-addressable text.
    Text(String),
    /// Boolean scalar.
    Boolean(bool),
    /// Integer scalar.
    Integer(i64),
    /// Repeated values.
    List(Vec<FieldValue>),
    /// Nested or polymorphic sub-structure.
    Group(Vec<(String, FieldValue)>),
}

/// A structured reference field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reference {
    /// Address of the referenced resource; an absent target is left
    /// untouched by localization.
    pub target: Option<String>,
    /// Human-readable label, carried unchanged.
    pub display: Option<String>,
}

impl Reference {
    /// Creates a reference to the given address.
    pub fn to(target: impl Into<String>) -> Self {
        Self {
            target: Some(target.into()),
            display: None,
        }
    }

    /// Sets the display label.
    #[must_use]
    pub fn display(mut self, display: impl Into<String>) -> Self {
        self.display = Some(display.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_preserves_field_order() {
        let resource = Resource::new("Patient")
            .field("active", FieldValue::Boolean(true))
            .field("name", FieldValue::Text("Ada".to_string()));
        assert_eq!(resource.fields[0].0, "active");
        assert_eq!(resource.fields[1].0, "name");
    }

    #[test]
    fn get_finds_first_match() {
        let resource = Resource::new("Patient").field(
            "managingOrganization",
            FieldValue::Reference(Reference::to("Organization/1")),
        );
        assert!(matches!(
            resource.get("managingOrganization"),
            Some(FieldValue::Reference(_))
        ));
        assert!(resource.get("missing").is_none());
    }

    #[test]
    fn serde_roundtrip() {
        let resource = Resource::new("Patient")
            .field("link", FieldValue::Reference(Reference::to("Patient/2")))
            .field(
                "photo",
                FieldValue::List(vec![FieldValue::Uri("Binary/3".to_string())]),
            );
        let json = serde_json::to_string(&resource).unwrap();
        let back: Resource = serde_json::from_str(&json).unwrap();
        assert_eq!(back, resource);
    }
}
