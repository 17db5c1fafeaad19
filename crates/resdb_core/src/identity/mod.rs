//! Resource identity: keys, classification, and generation.

mod authority;
mod generator;
mod key;

pub use authority::{Authority, ServerAuthority};
pub use generator::{KeyGenerator, SequenceGenerator, UuidGenerator};
pub use key::{KeyKind, ResourceKey};
