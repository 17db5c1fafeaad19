//! Transaction batches and their localization.

mod identity_map;
mod localizer;
mod operation;

pub use identity_map::IdentityMap;
pub use localizer::TransactionLocalizer;
pub use operation::{Operation, OperationKind};
