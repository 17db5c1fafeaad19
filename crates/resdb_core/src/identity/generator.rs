//! Canonical key generation.

use crate::identity::key::ResourceKey;
use std::collections::HashMap;
use uuid::Uuid;

/// Mints canonical keys during key localization.
///
/// `next_key` returns the canonical key for a new or replaced logical
/// resource: an id already present on the original is kept and a new
/// version is minted under it; an absent id gets a fresh logical id.
/// Callers that need a brand-new logical identity (provisional
/// originals) strip the client-chosen id before calling.
///
/// `next_history_key` pins a new version of the original's logical id.
/// Whether a minted version becomes the current snapshot or a
/// history-only entry is the committing store's concern, not this
/// trait's.
///
/// Generated keys are bare: canonical identities carry no authority
/// qualifier.
pub trait KeyGenerator {
    /// Returns the canonical key for a new or replaced logical resource.
    fn next_key(&mut self, original: &ResourceKey) -> ResourceKey;

    /// Returns a key pinning a new version of an existing logical
    /// resource.
    fn next_history_key(&mut self, original: &ResourceKey) -> ResourceKey;
}

/// Deterministic generator backed by in-memory counters.
///
/// Minted ids are decimal strings from a per-type counter; versions
/// are decimal strings from a per-resource counter.
#[derive(Debug)]
pub struct SequenceGenerator {
    first_id: u64,
    next_ids: HashMap<String, u64>,
    next_versions: HashMap<(String, String), u64>,
}

impl SequenceGenerator {
    /// Creates a generator whose ids start at 1.
    #[must_use]
    pub fn new() -> Self {
        Self::starting_at(1)
    }

    /// Creates a generator whose ids start at `first_id` for every
    /// resource type.
    #[must_use]
    pub fn starting_at(first_id: u64) -> Self {
        Self {
            first_id,
            next_ids: HashMap::new(),
            next_versions: HashMap::new(),
        }
    }

    fn mint_id(&mut self, resource_type: &str) -> String {
        let next = self
            .next_ids
            .entry(resource_type.to_string())
            .or_insert(self.first_id);
        let id = *next;
        *next += 1;
        id.to_string()
    }

    fn mint_version(&mut self, resource_type: &str, resource_id: &str) -> String {
        let next = self
            .next_versions
            .entry((resource_type.to_string(), resource_id.to_string()))
            .or_insert(1);
        let version = *next;
        *next += 1;
        version.to_string()
    }
}

impl Default for SequenceGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl KeyGenerator for SequenceGenerator {
    fn next_key(&mut self, original: &ResourceKey) -> ResourceKey {
        let resource_type = original.resource_type.clone();
        let id = match original.resource_id.as_deref().filter(|id| !id.is_empty()) {
            Some(id) => id.to_string(),
            None => self.mint_id(&resource_type),
        };
        let version = self.mint_version(&resource_type, &id);
        ResourceKey::new(resource_type, id).with_version(version)
    }

    fn next_history_key(&mut self, original: &ResourceKey) -> ResourceKey {
        self.next_key(original)
    }
}

/// Generator that mints uuid-v4 ids in simple form.
#[derive(Debug, Default)]
pub struct UuidGenerator {
    next_versions: HashMap<(String, String), u64>,
}

impl UuidGenerator {
    /// Creates a new uuid generator.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn mint_version(&mut self, resource_type: &str, resource_id: &str) -> String {
        let next = self
            .next_versions
            .entry((resource_type.to_string(), resource_id.to_string()))
            .or_insert(1);
        let version = *next;
        *next += 1;
        version.to_string()
    }
}

impl KeyGenerator for UuidGenerator {
    fn next_key(&mut self, original: &ResourceKey) -> ResourceKey {
        let resource_type = original.resource_type.clone();
        let id = match original.resource_id.as_deref().filter(|id| !id.is_empty()) {
            Some(id) => id.to_string(),
            None => Uuid::new_v4().simple().to_string(),
        };
        let version = self.mint_version(&resource_type, &id);
        ResourceKey::new(resource_type, id).with_version(version)
    }

    fn next_history_key(&mut self, original: &ResourceKey) -> ResourceKey {
        self.next_key(original)
    }
}
