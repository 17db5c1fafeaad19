//! Resource identity keys.

use serde::{Deserialize, Serialize};
use std::fmt;
use url::Url;

/// Address kind of a resource key, relative to one store authority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KeyKind {
    /// Qualified by an authority the store does not own.
    Foreign,
    /// Carries a client-chosen provisional id.
    Temporary,
    /// Qualified by the store's own authority.
    Local,
    /// Unqualified; no authority can be established.
    Internal,
}

/// Addressable name of a resource.
///
/// A key names a resource type, optionally a logical id within that
/// type, optionally a pinned version, and optionally the authority the
/// whole name is qualified by:
///
/// ```text
/// [base/]Type[/id[/_history/vid]]
/// ```
///
/// Keys are plain data; classifying one into a [`KeyKind`] requires an
/// authority to compare against.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResourceKey {
    /// Authority qualifier, when the key is fully qualified.
    pub base: Option<Url>,
    /// Resource type name.
    pub resource_type: String,
    /// Logical resource id.
    pub resource_id: Option<String>,
    /// Version id, when the key pins a version.
    pub version_id: Option<String>,
}

impl ResourceKey {
    /// Creates a bare `Type/id` key.
    pub fn new(resource_type: impl Into<String>, resource_id: impl Into<String>) -> Self {
        Self {
            base: None,
            resource_type: resource_type.into(),
            resource_id: Some(resource_id.into()),
            version_id: None,
        }
    }

    /// Creates a key naming only a resource type.
    pub fn type_only(resource_type: impl Into<String>) -> Self {
        Self {
            base: None,
            resource_type: resource_type.into(),
            resource_id: None,
            version_id: None,
        }
    }

    /// Qualifies this key with an authority base.
    #[must_use]
    pub fn with_base(mut self, base: Url) -> Self {
        self.base = Some(base);
        self
    }

    /// Pins this key to a version.
    #[must_use]
    pub fn with_version(mut self, version_id: impl Into<String>) -> Self {
        self.version_id = Some(version_id.into());
        self
    }

    /// Returns this key stripped of its authority qualifier.
    #[must_use]
    pub fn without_base(&self) -> Self {
        Self {
            base: None,
            ..self.clone()
        }
    }

    /// Returns this key with no pinned version.
    #[must_use]
    pub fn without_version(&self) -> Self {
        Self {
            version_id: None,
            ..self.clone()
        }
    }

    /// Returns this key reduced to its resource type.
    ///
    /// Used when a brand-new logical identity is required: the
    /// client-chosen id and version must not survive into the
    /// canonical key.
    #[must_use]
    pub fn without_id(&self) -> Self {
        Self {
            resource_id: None,
            version_id: None,
            ..self.clone()
        }
    }

    /// Returns true when this key pins a version.
    #[must_use]
    pub fn has_version(&self) -> bool {
        self.version_id.is_some()
    }

    /// Interprets an absolute URL as a fully-qualified key.
    ///
    /// Succeeds when the last path segments form `Type/id[/_history/vid]`
    /// with an uppercase-initial type segment, the shape resource
    /// stores address resources by; everything before the type segment
    /// becomes the base. Returns `None` for non-hierarchical schemes,
    /// URLs carrying a query or fragment, and paths that are not
    /// key-shaped.
    #[must_use]
    pub fn from_url(url: &Url) -> Option<Self> {
        if !matches!(url.scheme(), "http" | "https") {
            return None;
        }
        if url.query().is_some() || url.fragment().is_some() {
            return None;
        }
        let segments: Vec<&str> = url.path_segments()?.filter(|s| !s.is_empty()).collect();
        let (split, version_id) = if segments.len() >= 4 && segments[segments.len() - 2] == "_history"
        {
            (segments.len() - 4, Some(segments[segments.len() - 1]))
        } else if segments.len() >= 2 {
            (segments.len() - 2, None)
        } else {
            return None;
        };
        let resource_type = segments[split];
        let resource_id = segments[split + 1];
        if !resource_type
            .chars()
            .next()
            .is_some_and(|c| c.is_ascii_uppercase())
        {
            return None;
        }
        if version_id.is_some_and(str::is_empty) {
            return None;
        }
        let mut base = url.clone();
        let prefix = segments[..split].join("/");
        if prefix.is_empty() {
            base.set_path("/");
        } else {
            base.set_path(&format!("/{prefix}/"));
        }
        Some(Self {
            base: Some(base),
            resource_type: resource_type.to_string(),
            resource_id: Some(resource_id.to_string()),
            version_id: version_id.map(str::to_string),
        })
    }

    /// Parses the relative form `Type[/id[/_history/vid]]`.
    ///
    /// Returns `None` when the text is not key-shaped; callers treat
    /// that as "not an address" rather than an error.
    #[must_use]
    pub fn parse(text: &str) -> Option<Self> {
        if text.contains(['?', '#']) {
            return None;
        }
        let segments: Vec<&str> = text.split('/').collect();
        let (resource_type, resource_id, version_id) = match segments.as_slice() {
            [t] => (*t, None, None),
            [t, id] => (*t, Some(*id), None),
            [t, id, "_history", v] => (*t, Some(*id), Some(*v)),
            _ => return None,
        };
        if !resource_type
            .chars()
            .next()
            .is_some_and(|c| c.is_ascii_alphabetic())
        {
            return None;
        }
        if resource_id.is_some_and(str::is_empty) || version_id.is_some_and(str::is_empty) {
            return None;
        }
        Some(Self {
            base: None,
            resource_type: resource_type.to_string(),
            resource_id: resource_id.map(str::to_string),
            version_id: version_id.map(str::to_string),
        })
    }
}

impl fmt::Display for ResourceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(base) = &self.base {
            write!(f, "{}/", base.as_str().trim_end_matches('/'))?;
        }
        write!(f, "{}", self.resource_type)?;
        if let Some(id) = &self.resource_id {
            write!(f, "/{id}")?;
            if let Some(version) = &self.version_id {
                write!(f, "/_history/{version}")?;
            }
        }
        Ok(())
    }
}
