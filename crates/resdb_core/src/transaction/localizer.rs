//! Transaction localization engine.

use crate::error::{CoreError, CoreResult};
use crate::identity::{Authority, KeyGenerator, KeyKind, ResourceKey};
use crate::resource::{visit_fields_mut, FieldShape, FieldValue, Resource};
use crate::transaction::identity_map::IdentityMap;
use crate::transaction::operation::{Operation, OperationKind};
use std::mem;
use tracing::{debug, trace, warn};
use url::Url;

/// The reference-bearing shapes the engine rewrites.
const SHAPES: [FieldShape; 3] = [FieldShape::Reference, FieldShape::Uri, FieldShape::Markup];

/// Localizes a transaction batch into the store's canonical identity
/// space.
///
/// Operations are accumulated append-only in submission order and
/// localized in two passes:
///
/// 1. every operation's target key is classified and replaced with a
///    generated canonical key, recording the original → assigned
///    association in the identity map;
/// 2. every reference in every payload — structured references, plain
///    address-valued text, and links embedded in narrative markup — is
///    rewritten through the map.
///
/// Pass 2 only starts once pass 1 has processed the whole batch, so
/// references to operations submitted later in the batch resolve.
///
/// Localization is all-or-nothing: any fatal error rejects the entire
/// batch with no usable partial result. [`Self::localize`] consumes
/// the engine, so localizing the same accumulated state twice (which
/// would re-map already-canonical keys) is unrepresentable.
///
/// ## Example
///
/// ```
/// use resdb_core::{
///     FieldValue, Operation, Reference, Resource, ResourceKey, SequenceGenerator,
///     ServerAuthority, TransactionLocalizer,
/// };
/// use url::Url;
///
/// let base = Url::parse("http://store.example/").unwrap();
/// let authority = ServerAuthority::new(base.clone()).provisional_marker("temp-");
/// let mut engine = TransactionLocalizer::new(authority, SequenceGenerator::new());
///
/// engine.push(Operation::create(
///     ResourceKey::new("Patient", "temp-1").with_base(base),
///     Resource::new("Patient"),
/// ));
/// engine.push(Operation::create(
///     ResourceKey::new("Observation", "temp-2"),
///     Resource::new("Observation").field(
///         "subject",
///         FieldValue::Reference(Reference::to("Patient/temp-1")),
///     ),
/// ));
///
/// let localized = engine.localize().unwrap();
/// assert_eq!(localized[0].key.to_string(), "Patient/1/_history/1");
/// ```
pub struct TransactionLocalizer<A, G> {
    authority: A,
    generator: G,
    map: IdentityMap,
    operations: Vec<Operation>,
}

impl<A: Authority, G: KeyGenerator> TransactionLocalizer<A, G> {
    /// Creates an engine over the given authority and generator.
    pub fn new(authority: A, generator: G) -> Self {
        Self {
            authority,
            generator,
            map: IdentityMap::new(),
            operations: Vec::new(),
        }
    }

    /// Appends one operation to the batch.
    pub fn push(&mut self, operation: Operation) {
        self.operations.push(operation);
    }

    /// Appends a group of operations, preserving their order.
    pub fn extend(&mut self, operations: impl IntoIterator<Item = Operation>) {
        self.operations.extend(operations);
    }

    /// Returns the accumulated operations in submission order.
    #[must_use]
    pub fn operations(&self) -> &[Operation] {
        &self.operations
    }

    /// Returns the number of accumulated operations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.operations.len()
    }

    /// Returns true when no operations have been accumulated.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    /// Localizes the accumulated batch and returns the mutated
    /// operations.
    ///
    /// # Errors
    ///
    /// - [`CoreError::UnqualifiedKey`] when an operation's target has
    ///   no recognizable authority;
    /// - [`CoreError::UnresolvedReference`] when a provisional
    ///   reference matches no operation in the batch;
    /// - [`CoreError::DuplicateIdentity`] when two operations address
    ///   the same original identity.
    ///
    /// On error the whole batch must be discarded.
    pub fn localize(mut self) -> CoreResult<Vec<Operation>> {
        let mut operations = mem::take(&mut self.operations);

        debug!(operations = operations.len(), "localizing transaction keys");
        for operation in &mut operations {
            self.localize_key(operation)?;
        }

        debug!(mappings = self.map.len(), "rewriting references");
        for operation in &mut operations {
            if let Some(resource) = operation.resource.as_mut() {
                self.localize_references(resource)?;
            }
        }

        Ok(operations)
    }

    fn localize_key(&mut self, operation: &mut Operation) -> CoreResult<()> {
        let original = operation.key.clone();
        let minted = match self.authority.key_kind(&original) {
            // A provisional original needs a brand-new logical
            // identity; its client-chosen id must not survive.
            KeyKind::Foreign | KeyKind::Temporary => {
                self.generator.next_key(&original.without_id())
            }
            KeyKind::Local if operation.kind == OperationKind::CreateOrReplace => {
                self.generator.next_key(&original)
            }
            KeyKind::Local => self.generator.next_history_key(&original),
            KeyKind::Internal => {
                return Err(CoreError::unqualified_key(original.to_string()));
            }
        };
        let assigned = self.map.remap(self.map_key(&original), minted)?;
        trace!(original = %original, assigned = %assigned, "localized key");
        operation.key = assigned;
        Ok(())
    }

    /// The form a key is recorded and looked up under.
    ///
    /// A provisional resource may be referenced qualified, bare, or
    /// version-pinned; all denote the same provisional identity, so
    /// temporary keys are normalized to their bare versionless form.
    /// Foreign keys keep their base (identical paths under different
    /// authorities are different identities), normalized to a trailing
    /// slash so declared and parsed forms compare equal.
    fn map_key(&self, key: &ResourceKey) -> ResourceKey {
        let mut key = match self.authority.key_kind(key) {
            KeyKind::Temporary => key.without_base().without_version(),
            _ => key.without_version(),
        };
        if let Some(base) = key.base.as_mut() {
            if !base.path().ends_with('/') {
                let path = format!("{}/", base.path());
                base.set_path(&path);
            }
        }
        key
    }

    fn localize_references(&self, resource: &mut Resource) -> CoreResult<()> {
        visit_fields_mut(resource, &SHAPES, &mut |value| match value {
            FieldValue::Reference(reference) => {
                if let Some(target) = reference.target.as_mut() {
                    if let Some(rewritten) =
                        self.localize_reference_text(target, FieldShape::Reference)?
                    {
                        *target = rewritten;
                    }
                }
                Ok(())
            }
            FieldValue::Uri(text) => {
                if let Some(rewritten) = self.localize_reference_text(text, FieldShape::Uri)? {
                    *text = rewritten;
                }
                Ok(())
            }
            FieldValue::Markup(markup) => {
                if let Some(rewritten) = self.localize_markup(markup)? {
                    *markup = rewritten;
                }
                Ok(())
            }
            _ => Ok(()),
        })
    }

    /// Applies the resolution rule to one reference in text form.
    ///
    /// Returns `Ok(None)` when the text is left as it was: empty, not
    /// address-shaped, or outside every authority this engine
    /// rewrites.
    ///
    /// Structured references are identity references by construction,
    /// so for the `Reference` shape an absolute URL under a foreign
    /// authority is interpreted as a foreign identity and resolved
    /// through the map. Plain text and narrative links carry arbitrary
    /// URLs; for those shapes a foreign absolute address passes
    /// through byte-for-byte.
    fn localize_reference_text(
        &self,
        text: &str,
        shape: FieldShape,
    ) -> CoreResult<Option<String>> {
        if text.trim().is_empty() {
            return Ok(None);
        }
        match Url::parse(text) {
            Ok(uri) => {
                if self.authority.is_local_uri(&uri) {
                    return match self.authority.key_from_uri(&uri) {
                        Some(key) => {
                            let localized = self.localize_key_reference(&key)?;
                            Ok(Some(localized.to_string()))
                        }
                        None => Ok(None),
                    };
                }
                if shape == FieldShape::Reference {
                    if let Some(key) = ResourceKey::from_url(&uri) {
                        let localized = self.localize_key_reference(&key)?;
                        return Ok(Some(localized.to_string()));
                    }
                }
                Ok(None)
            }
            Err(url::ParseError::RelativeUrlWithoutBase) => match ResourceKey::parse(text) {
                Some(key) => {
                    let localized = self.localize_key_reference(&key)?;
                    Ok(Some(localized.to_string()))
                }
                None => Ok(None),
            },
            Err(_) => Ok(None),
        }
    }

    /// The resolution rule over keys.
    ///
    /// Provisional keys must have been mapped in pass 1; local keys
    /// are stripped to their bare form whether or not they were ever
    /// remapped; anything else passes through unchanged.
    fn localize_key_reference(&self, key: &ResourceKey) -> CoreResult<ResourceKey> {
        match self.authority.key_kind(key) {
            KeyKind::Foreign | KeyKind::Temporary => {
                match self.map.try_get(&self.map_key(key)) {
                    Some(assigned) if key.has_version() => Ok(assigned.clone()),
                    Some(assigned) => Ok(assigned.without_version()),
                    None => Err(CoreError::unresolved_reference(key.to_string())),
                }
            }
            KeyKind::Local => Ok(key.without_base()),
            KeyKind::Internal => Ok(key.clone()),
        }
    }

    fn localize_markup(&self, markup: &str) -> CoreResult<Option<String>> {
        let sites = match resdb_markup::scan(markup) {
            Ok(sites) => sites,
            Err(error) => {
                // illegal markup: keep the original text verbatim
                warn!(%error, "narrative not rewritten");
                return Ok(None);
            }
        };
        let mut edits = Vec::new();
        for site in sites {
            if let Some(rewritten) = self.localize_reference_text(&site.value, FieldShape::Markup)? {
                if rewritten != site.value {
                    edits.push((site.span, rewritten));
                }
            }
        }
        if edits.is_empty() {
            return Ok(None);
        }
        Ok(Some(resdb_markup::splice(markup, &edits)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::{SequenceGenerator, ServerAuthority};

    fn engine() -> TransactionLocalizer<ServerAuthority, SequenceGenerator> {
        let base = Url::parse("http://store.example/").unwrap();
        let authority = ServerAuthority::new(base).provisional_marker("temp-");
        TransactionLocalizer::new(authority, SequenceGenerator::new())
    }

    fn local(id: &str) -> ResourceKey {
        ResourceKey::new("Patient", id).with_base(Url::parse("http://store.example/").unwrap())
    }

    #[test]
    fn temporary_target_gets_a_fresh_key() {
        let mut engine = engine();
        engine.push(Operation::create(
            local("temp-1"),
            Resource::new("Patient"),
        ));
        let localized = engine.localize().unwrap();
        assert_eq!(localized[0].key.to_string(), "Patient/1/_history/1");
    }

    #[test]
    fn foreign_target_gets_a_fresh_key() {
        let mut engine = engine();
        let foreign =
            ResourceKey::new("Patient", "7").with_base(Url::parse("http://other.example/").unwrap());
        engine.push(Operation::create(foreign, Resource::new("Patient")));
        let localized = engine.localize().unwrap();
        assert_eq!(localized[0].key.to_string(), "Patient/1/_history/1");
    }

    #[test]
    fn local_replace_keeps_the_logical_id() {
        let mut engine = engine();
        engine.push(Operation::create_or_replace(
            local("99"),
            Resource::new("Patient"),
        ));
        let localized = engine.localize().unwrap();
        assert_eq!(localized[0].key.to_string(), "Patient/99/_history/1");
    }

    #[test]
    fn local_delete_pins_a_history_key() {
        let mut engine = engine();
        engine.push(Operation::delete(local("99")));
        let localized = engine.localize().unwrap();
        assert_eq!(localized[0].key.to_string(), "Patient/99/_history/1");
    }

    #[test]
    fn internal_target_is_a_client_error() {
        let mut engine = engine();
        engine.push(Operation::delete(ResourceKey::new("Patient", "99")));
        let err = engine.localize().unwrap_err();
        assert_eq!(err, CoreError::unqualified_key("Patient/99"));
    }

    #[test]
    fn duplicate_target_is_rejected() {
        let mut engine = engine();
        engine.push(Operation::create(local("temp-1"), Resource::new("Patient")));
        engine.push(Operation::create(local("temp-1"), Resource::new("Patient")));
        let err = engine.localize().unwrap_err();
        assert!(matches!(err, CoreError::DuplicateIdentity { .. }));
    }

    #[test]
    fn empty_batch_localizes_to_nothing() {
        let engine = engine();
        assert!(engine.localize().unwrap().is_empty());
    }

    #[test]
    fn accumulation_preserves_submission_order() {
        let mut engine = engine();
        engine.extend([
            Operation::delete(local("1")),
            Operation::delete(local("2")),
        ]);
        engine.push(Operation::delete(local("3")));
        assert_eq!(engine.len(), 3);
        let ids: Vec<_> = engine
            .operations()
            .iter()
            .map(|op| op.key.resource_id.clone().unwrap())
            .collect();
        assert_eq!(ids, ["1", "2", "3"]);
    }
}
