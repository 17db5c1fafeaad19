//! # ResDB Testkit
//!
//! Test utilities for ResDB.
//!
//! This crate provides:
//! - Batch and key fixtures over a fixed test authority
//! - Property-based test generators using proptest
//!
//! The heavyweight property suites over the localization engine live
//! in this crate's `tests/` directory.
//!
//! ## Usage
//!
//! ```
//! use resdb_testkit::prelude::*;
//!
//! let mut engine = localizer();
//! engine.extend(admission_batch());
//! assert_eq!(engine.localize().unwrap().len(), 3);
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod fixtures;
pub mod generators;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::fixtures::*;
    pub use crate::generators::*;
}

pub use fixtures::*;
pub use generators::*;
