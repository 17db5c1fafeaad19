//! Batch operations.

use crate::identity::ResourceKey;
use crate::resource::Resource;
use serde::{Deserialize, Serialize};

/// What a batch entry does to its target resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OperationKind {
    /// Create a resource, or replace it under a client-known id.
    CreateOrReplace,
    /// Create a resource under a store-generated id.
    Create,
    /// Update parts of a resource without replacing it.
    Update,
    /// Delete a resource.
    Delete,
}

/// One entry of a transaction batch.
///
/// The target `key` is rewritten in place during localization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Operation {
    /// What this entry does.
    pub kind: OperationKind,
    /// Target key; localized in place.
    pub key: ResourceKey,
    /// Payload; absent for deletes.
    pub resource: Option<Resource>,
}

impl Operation {
    /// Creates a create-with-generated-id entry.
    pub fn create(key: ResourceKey, resource: Resource) -> Self {
        Self {
            kind: OperationKind::Create,
            key,
            resource: Some(resource),
        }
    }

    /// Creates a create-or-replace entry.
    pub fn create_or_replace(key: ResourceKey, resource: Resource) -> Self {
        Self {
            kind: OperationKind::CreateOrReplace,
            key,
            resource: Some(resource),
        }
    }

    /// Creates an update entry.
    pub fn update(key: ResourceKey, resource: Resource) -> Self {
        Self {
            kind: OperationKind::Update,
            key,
            resource: Some(resource),
        }
    }

    /// Creates a delete entry; deletes carry no payload.
    pub fn delete(key: ResourceKey) -> Self {
        Self {
            kind: OperationKind::Delete,
            key,
            resource: None,
        }
    }
}
