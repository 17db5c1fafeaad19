//! # ResDB Markup
//!
//! XHTML narrative scanning and rewriting for ResDB.
//!
//! Resource narratives embed references as `<a href>` and `<img src>`
//! attributes. This crate provides the narrow seam the localization
//! engine rewrites them through:
//!
//! 1. [`scan`] parses a fragment and enumerates every rewritable
//!    attribute occurrence as a [`LinkSite`] (byte span + decoded value);
//! 2. the caller decides which values to rewrite;
//! 3. [`splice`] re-serializes the fragment with the replacements
//!    entity-encoded and every untouched byte preserved verbatim.
//!
//! The scanner rejects fragments that are not well-formed enough to
//! rewrite safely (unterminated tags, unquoted attributes, unbalanced
//! elements, malformed entity references); callers are expected to keep
//! the original text when that happens.
//!
//! ## Usage
//!
//! ```
//! use resdb_markup::{scan, splice};
//!
//! let src = r#"<div><a href="Patient/temp-1">p</a></div>"#;
//! let sites = scan(src).unwrap();
//! let edits = vec![(sites[0].span.clone(), "Patient/42".to_string())];
//! assert_eq!(splice(src, &edits), r#"<div><a href="Patient/42">p</a></div>"#);
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod entities;
mod error;
mod scanner;
mod writer;

pub use entities::encode as escape_attribute;
pub use error::{MarkupError, MarkupResult};
pub use scanner::{scan, LinkElement, LinkSite};
pub use writer::splice;
