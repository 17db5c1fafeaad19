//! Store authority: address-kind classification and URI ownership.

use crate::identity::key::{KeyKind, ResourceKey};
use url::Url;
use uuid::Uuid;

/// Classifies keys and URIs relative to one store's address space.
///
/// The localization engine treats this as an opaque collaborator; how
/// strictly an implementation matches its own base decides whether a
/// qualified reference is localized (and stripped) or passed through
/// verbatim.
pub trait Authority {
    /// Returns the address kind of `key` relative to this authority.
    fn key_kind(&self, key: &ResourceKey) -> KeyKind;

    /// Returns true when `uri` lies under this authority's base.
    fn is_local_uri(&self, uri: &Url) -> bool;

    /// Converts a URI under this authority's base into a key.
    ///
    /// Only meaningful when [`Authority::is_local_uri`] holds; returns
    /// `None` when the path under the base is not key-shaped.
    fn key_from_uri(&self, uri: &Url) -> Option<ResourceKey>;
}

/// The default [`Authority`]: a single server base URL.
///
/// Ids prefixed `urn:uuid:` (with a valid uuid payload) or `cid:` are
/// always provisional; additional marker prefixes can be configured.
///
/// ## Example
///
/// ```
/// use resdb_core::{Authority, KeyKind, ResourceKey, ServerAuthority};
/// use url::Url;
///
/// let base = Url::parse("http://store.example/").unwrap();
/// let authority = ServerAuthority::new(base.clone());
///
/// let key = ResourceKey::new("Patient", "42").with_base(base);
/// assert_eq!(authority.key_kind(&key), KeyKind::Local);
/// ```
#[derive(Debug, Clone)]
pub struct ServerAuthority {
    base: Url,
    provisional_markers: Vec<String>,
}

impl ServerAuthority {
    /// Creates an authority for the given base URL.
    ///
    /// The base path is normalized to end in `/` so that ownership
    /// tests always stop at a path-segment boundary.
    #[must_use]
    pub fn new(base: Url) -> Self {
        let mut base = base;
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        Self {
            base,
            provisional_markers: Vec::new(),
        }
    }

    /// Adds an id prefix that marks a resource id as provisional.
    #[must_use]
    pub fn provisional_marker(mut self, marker: impl Into<String>) -> Self {
        self.provisional_markers.push(marker.into());
        self
    }

    /// Returns the normalized base URL.
    #[must_use]
    pub fn base(&self) -> &Url {
        &self.base
    }

    fn is_provisional_id(&self, id: &str) -> bool {
        if let Some(rest) = id.strip_prefix("urn:uuid:") {
            return Uuid::parse_str(rest).is_ok();
        }
        if id.starts_with("cid:") {
            return true;
        }
        self.provisional_markers
            .iter()
            .any(|marker| id.starts_with(marker.as_str()))
    }
}

impl Authority for ServerAuthority {
    fn key_kind(&self, key: &ResourceKey) -> KeyKind {
        if key
            .resource_id
            .as_deref()
            .is_some_and(|id| self.is_provisional_id(id))
        {
            return KeyKind::Temporary;
        }
        match &key.base {
            None => KeyKind::Internal,
            Some(base) if self.is_local_uri(base) => KeyKind::Local,
            Some(_) => KeyKind::Foreign,
        }
    }

    fn is_local_uri(&self, uri: &Url) -> bool {
        uri.as_str().starts_with(self.base.as_str())
    }

    fn key_from_uri(&self, uri: &Url) -> Option<ResourceKey> {
        let rest = uri.as_str().strip_prefix(self.base.as_str())?;
        let key = ResourceKey::parse(rest)?;
        Some(key.with_base(self.base.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn authority() -> ServerAuthority {
        ServerAuthority::new(Url::parse("http://store.example/").unwrap())
            .provisional_marker("temp-")
    }

    #[test]
    fn local_key() {
        let key =
            ResourceKey::new("Patient", "42").with_base(Url::parse("http://store.example/").unwrap());
        assert_eq!(authority().key_kind(&key), KeyKind::Local);
    }

    #[test]
    fn foreign_key() {
        let key =
            ResourceKey::new("Patient", "42").with_base(Url::parse("http://other.example/").unwrap());
        assert_eq!(authority().key_kind(&key), KeyKind::Foreign);
    }

    #[test]
    fn internal_key() {
        let key = ResourceKey::new("Patient", "42");
        assert_eq!(authority().key_kind(&key), KeyKind::Internal);
    }

    #[test]
    fn provisional_id_is_temporary_regardless_of_base() {
        let bare = ResourceKey::new("Patient", "temp-1");
        assert_eq!(authority().key_kind(&bare), KeyKind::Temporary);

        let qualified = bare.with_base(Url::parse("http://store.example/").unwrap());
        assert_eq!(authority().key_kind(&qualified), KeyKind::Temporary);
    }

    #[test]
    fn urn_uuid_id_is_temporary() {
        let key = ResourceKey::new("Patient", "urn:uuid:0d27d5a7-4f4f-4d0a-8a17-c1b1b4f3f508");
        assert_eq!(authority().key_kind(&key), KeyKind::Temporary);
    }

    #[test]
    fn urn_uuid_with_invalid_payload_is_not_temporary() {
        let key = ResourceKey::new("Patient", "urn:uuid:not-a-uuid");
        assert_eq!(authority().key_kind(&key), KeyKind::Internal);
    }

    #[test]
    fn cid_id_is_temporary() {
        let key = ResourceKey::new("Patient", "cid:attachment-3");
        assert_eq!(authority().key_kind(&key), KeyKind::Temporary);
    }

    #[test]
    fn base_match_requires_segment_boundary() {
        let authority = authority();
        let evil = Url::parse("http://store.example.evil/Patient/1").unwrap();
        assert!(!authority.is_local_uri(&evil));

        let local = Url::parse("http://store.example/Patient/1").unwrap();
        assert!(authority.is_local_uri(&local));
    }

    #[test]
    fn base_with_path_prefix() {
        let authority = ServerAuthority::new(Url::parse("http://store.example/api").unwrap());
        assert_eq!(authority.base().as_str(), "http://store.example/api/");

        let inside = Url::parse("http://store.example/api/Patient/1").unwrap();
        assert!(authority.is_local_uri(&inside));

        let outside = Url::parse("http://store.example/apiv2/Patient/1").unwrap();
        assert!(!authority.is_local_uri(&outside));
    }

    #[test]
    fn key_from_uri_extracts_the_key() {
        let authority = authority();
        let uri = Url::parse("http://store.example/Patient/42/_history/3").unwrap();
        let key = authority.key_from_uri(&uri).unwrap();
        assert_eq!(key.resource_type, "Patient");
        assert_eq!(key.resource_id.as_deref(), Some("42"));
        assert_eq!(key.version_id.as_deref(), Some("3"));
        assert!(key.base.is_some());
    }

    #[test]
    fn key_from_uri_rejects_non_key_paths() {
        let authority = authority();
        let uri = Url::parse("http://store.example/Patient/42/extra/deep").unwrap();
        assert!(authority.key_from_uri(&uri).is_none());
    }
}
