//! Property-based test generators using proptest.
//!
//! Provides strategies for keys of every address kind and for payload
//! trees with reference sites planted at known positions.

use crate::fixtures::TEMP_MARKER;
use proptest::prelude::*;
use resdb_core::{FieldValue, Reference, Resource};

/// Resource types used by generated batches.
pub const RESOURCE_TYPES: [&str; 5] =
    ["Patient", "Observation", "Encounter", "Condition", "Procedure"];

/// Strategy for a resource type name.
pub fn resource_type_strategy() -> impl Strategy<Value = &'static str> {
    prop::sample::select(&RESOURCE_TYPES[..])
}

/// Strategy for a plain resource id.
pub fn resource_id_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("[a-z][a-z0-9]{0,7}").expect("invalid regex")
}

/// Strategy for a provisional id carrying the test marker.
pub fn temp_id_strategy() -> impl Strategy<Value = String> {
    resource_id_strategy().prop_map(|id| format!("{TEMP_MARKER}{id}"))
}

/// Strategy for a scalar field value (never a reference site).
pub fn scalar_strategy() -> impl Strategy<Value = FieldValue> {
    prop_oneof![
        prop::string::string_regex("[a-z ]{0,16}")
            .expect("invalid regex")
            .prop_map(FieldValue::Text),
        any::<bool>().prop_map(FieldValue::Boolean),
        any::<i64>().prop_map(FieldValue::Integer),
    ]
}

/// Strategy for one reference site pointing at `target`, in any of the
/// three rewritable shapes.
pub fn reference_site_strategy(target: String) -> impl Strategy<Value = FieldValue> {
    let structured = target.clone();
    let plain = target.clone();
    prop_oneof![
        Just(FieldValue::Reference(Reference::to(structured))),
        Just(FieldValue::Uri(plain)),
        Just(FieldValue::Markup(format!(
            r#"<div><a href="{target}">ref</a></div>"#
        ))),
    ]
}

/// Wraps `value` in `depth` alternating list and group layers.
#[must_use]
pub fn nest(value: FieldValue, depth: usize) -> FieldValue {
    (0..depth).fold(value, |value, layer| {
        if layer % 2 == 0 {
            FieldValue::List(vec![value])
        } else {
            FieldValue::Group(vec![("item".to_string(), value)])
        }
    })
}

/// Strategy for a resource with every value in `sites` planted at a
/// random nesting depth, interleaved with scalar padding fields.
pub fn planted_resource_strategy(sites: Vec<FieldValue>) -> impl Strategy<Value = Resource> {
    let count = sites.len();
    (
        prop::collection::vec(0..4usize, count),
        prop::collection::vec(scalar_strategy(), count),
    )
        .prop_map(move |(depths, padding)| {
            let mut resource = Resource::new("Patient");
            for (index, (site, depth)) in sites.iter().cloned().zip(depths).enumerate() {
                resource = resource
                    .field(format!("pad{index}"), padding[index].clone())
                    .field(format!("site{index}"), nest(site, depth));
            }
            resource
        })
}
