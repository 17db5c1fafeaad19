//! Test fixtures and batch helpers.
//!
//! Provides the fixed authority used across test suites, key
//! constructors for every address kind, and ready-made batches with
//! cross-references in all three rewritable field shapes.

use resdb_core::{
    FieldValue, Operation, Reference, Resource, ResourceKey, SequenceGenerator, ServerAuthority,
    TransactionLocalizer,
};
use url::Url;
use uuid::Uuid;

/// The provisional-id marker used by test batches.
pub const TEMP_MARKER: &str = "temp-";

/// The fixed store base used across test suites.
pub fn store_base() -> Url {
    Url::parse("http://store.example/").expect("store base must parse")
}

/// A second, foreign base for cross-authority scenarios.
pub fn foreign_base() -> Url {
    Url::parse("http://other.example/").expect("foreign base must parse")
}

/// The standard test authority: the fixed store base plus the
/// [`TEMP_MARKER`] prefix.
pub fn authority() -> ServerAuthority {
    ServerAuthority::new(store_base()).provisional_marker(TEMP_MARKER)
}

/// A localizer over the standard test authority and a deterministic
/// generator.
pub fn localizer() -> TransactionLocalizer<ServerAuthority, SequenceGenerator> {
    TransactionLocalizer::new(authority(), SequenceGenerator::new())
}

/// A store-qualified key: `http://store.example/{type}/{id}`.
pub fn local_key(resource_type: &str, id: &str) -> ResourceKey {
    ResourceKey::new(resource_type, id).with_base(store_base())
}

/// A store-qualified provisional key: the id is `temp-{id}`.
pub fn temp_key(resource_type: &str, id: &str) -> ResourceKey {
    ResourceKey::new(resource_type, format!("{TEMP_MARKER}{id}")).with_base(store_base())
}

/// A provisional key with a fresh `urn:uuid:` id.
pub fn urn_temp_key(resource_type: &str) -> ResourceKey {
    ResourceKey::new(resource_type, format!("urn:uuid:{}", Uuid::new_v4()))
}

/// A key qualified by the foreign base.
pub fn foreign_key(resource_type: &str, id: &str) -> ResourceKey {
    ResourceKey::new(resource_type, id).with_base(foreign_base())
}

/// A patient resource whose narrative links back to `target`.
pub fn patient_with_narrative(target: &str) -> Resource {
    Resource::new("Patient")
        .field("active", FieldValue::Boolean(true))
        .field(
            "text",
            FieldValue::Markup(format!(
                r#"<div><p>See <a href="{target}">the record</a></p></div>"#
            )),
        )
}

/// A small admission batch: a provisional patient, an encounter
/// referencing it structurally, and a report referencing it through
/// plain text and narrative markup.
pub fn admission_batch() -> Vec<Operation> {
    let patient_url = format!("{}Patient/{TEMP_MARKER}admit", store_base());
    vec![
        Operation::create(
            temp_key("Patient", "admit"),
            Resource::new("Patient").field("active", FieldValue::Boolean(true)),
        ),
        Operation::create(
            temp_key("Encounter", "visit"),
            Resource::new("Encounter").field(
                "patient",
                FieldValue::Reference(Reference::to(patient_url.clone())),
            ),
        ),
        Operation::create(
            temp_key("DiagnosticReport", "report"),
            Resource::new("DiagnosticReport")
                .field("subject", FieldValue::Uri(patient_url.clone()))
                .field(
                    "text",
                    FieldValue::Markup(format!(
                        r#"<div><a href="{patient_url}">patient</a></div>"#
                    )),
                ),
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use resdb_core::{Authority, KeyKind};

    #[test]
    fn temp_keys_classify_temporary() {
        assert_eq!(
            authority().key_kind(&temp_key("Patient", "1")),
            KeyKind::Temporary
        );
        assert_eq!(
            authority().key_kind(&urn_temp_key("Patient")),
            KeyKind::Temporary
        );
    }

    #[test]
    fn local_and_foreign_keys_classify_as_named() {
        assert_eq!(
            authority().key_kind(&local_key("Patient", "1")),
            KeyKind::Local
        );
        assert_eq!(
            authority().key_kind(&foreign_key("Patient", "1")),
            KeyKind::Foreign
        );
    }

    #[test]
    fn admission_batch_localizes() {
        let mut engine = localizer();
        engine.extend(admission_batch());
        let localized = engine.localize().expect("batch must localize");
        assert_eq!(localized.len(), 3);
    }
}
