//! # ResDB Core
//!
//! Transaction localization engine for ResDB.
//!
//! A transaction batch arrives with operations whose target keys and
//! embedded references may be provisional: client-chosen temporary
//! placeholders for not-yet-created resources, or addresses qualified
//! by some other authority. Before the batch can be committed, every
//! provisional address must be normalized into the store's canonical
//! identity space, and the normalization must reach every reference in
//! every payload — structured references, plain address-valued text,
//! and links embedded in narrative markup.
//!
//! This crate provides:
//! - [`ResourceKey`] and [`KeyKind`] — resource identities and their
//!   address-kind classification
//! - [`Authority`] / [`ServerAuthority`] — the store's address space
//! - [`KeyGenerator`] with [`SequenceGenerator`] and [`UuidGenerator`]
//! - [`Resource`] / [`FieldValue`] — a closed payload field tree with
//!   a shape-selecting traversal
//! - [`IdentityMap`] and the two-pass [`TransactionLocalizer`]
//!
//! Localization is all-or-nothing per batch: fatal errors
//! ([`CoreError::UnqualifiedKey`], [`CoreError::UnresolvedReference`],
//! [`CoreError::DuplicateIdentity`]) reject the whole batch; malformed
//! narrative markup and unparseable plain text are recovered locally
//! by leaving the original text untouched.

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod error;
pub mod identity;
pub mod resource;
pub mod transaction;

pub use error::{CoreError, CoreResult};
pub use identity::{
    Authority, KeyGenerator, KeyKind, ResourceKey, SequenceGenerator, ServerAuthority,
    UuidGenerator,
};
pub use resource::{visit_fields_mut, FieldShape, FieldValue, Reference, Resource};
pub use transaction::{IdentityMap, Operation, OperationKind, TransactionLocalizer};
