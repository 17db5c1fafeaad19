//! Identity map: original to assigned key associations.

use crate::error::{CoreError, CoreResult};
use crate::identity::ResourceKey;
use std::collections::HashMap;

/// Forward association from original to assigned keys.
///
/// Built during key localization (pass 1) and queried, never extended,
/// during reference rewriting (pass 2). Entries are never removed; the
/// map is scoped to a single localization and discarded with it.
#[derive(Debug, Default)]
pub struct IdentityMap {
    entries: HashMap<ResourceKey, ResourceKey>,
}

impl IdentityMap {
    /// Creates an empty map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records an association and returns the assigned key.
    ///
    /// # Errors
    ///
    /// Remapping an original that already has an entry is rejected:
    /// two batch entries addressing the same original identity is a
    /// client error, and silently overwriting the first mapping would
    /// rewrite references inconsistently.
    pub fn remap(
        &mut self,
        original: ResourceKey,
        assigned: ResourceKey,
    ) -> CoreResult<ResourceKey> {
        if self.entries.contains_key(&original) {
            return Err(CoreError::duplicate_identity(original.to_string()));
        }
        self.entries.insert(original, assigned.clone());
        Ok(assigned)
    }

    /// Looks up the assigned key for `original`.
    #[must_use]
    pub fn try_get(&self, original: &ResourceKey) -> Option<&ResourceKey> {
        self.entries.get(original)
    }

    /// Returns the number of recorded associations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true when no associations have been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn remap_returns_the_assigned_key() {
        let mut map = IdentityMap::new();
        let original = ResourceKey::new("Patient", "temp-1");
        let assigned = ResourceKey::new("Patient", "1");
        let returned = map.remap(original.clone(), assigned.clone()).unwrap();
        assert_eq!(returned, assigned);
        assert_eq!(map.try_get(&original), Some(&assigned));
    }

    #[test]
    fn try_get_misses_unmapped_keys() {
        let map = IdentityMap::new();
        assert!(map.try_get(&ResourceKey::new("Patient", "temp-1")).is_none());
        assert!(map.is_empty());
    }

    #[test]
    fn duplicate_original_is_rejected() {
        let mut map = IdentityMap::new();
        let original = ResourceKey::new("Patient", "temp-1");
        map.remap(original.clone(), ResourceKey::new("Patient", "1"))
            .unwrap();
        let err = map
            .remap(original.clone(), ResourceKey::new("Patient", "2"))
            .unwrap_err();
        assert_eq!(err, CoreError::duplicate_identity("Patient/temp-1"));
        // First mapping is untouched
        assert_eq!(
            map.try_get(&original).unwrap().resource_id.as_deref(),
            Some("1")
        );
    }

    #[test]
    fn distinct_originals_coexist() {
        let mut map = IdentityMap::new();
        map.remap(
            ResourceKey::new("Patient", "temp-1"),
            ResourceKey::new("Patient", "1"),
        )
        .unwrap();
        map.remap(
            ResourceKey::new("Observation", "temp-1"),
            ResourceKey::new("Observation", "1"),
        )
        .unwrap();
        assert_eq!(map.len(), 2);
    }
}
