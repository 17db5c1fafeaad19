//! Resource payloads and traversal.

mod value;
mod visit;

pub use value::{FieldValue, Reference, Resource};
pub use visit::{visit_fields_mut, FieldShape};
