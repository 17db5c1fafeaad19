//! Error types for the markup crate.

use thiserror::Error;

/// Result type for markup operations.
pub type MarkupResult<T> = Result<T, MarkupError>;

/// Errors that can occur while scanning an XHTML narrative.
///
/// Offsets are byte positions into the scanned input.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MarkupError {
    /// A tag was opened but the input ended before `>`.
    #[error("unterminated tag at byte {offset}")]
    UnterminatedTag {
        /// Byte offset of the opening `<`.
        offset: usize,
    },

    /// A comment was opened but never closed with `-->`.
    #[error("unterminated comment at byte {offset}")]
    UnterminatedComment {
        /// Byte offset of the opening `<!--`.
        offset: usize,
    },

    /// A tag name does not start with an ASCII letter.
    #[error("invalid tag name at byte {offset}")]
    InvalidTagName {
        /// Byte offset of the offending name.
        offset: usize,
    },

    /// An attribute is malformed (missing name, `=`, or value).
    #[error("invalid attribute at byte {offset}")]
    InvalidAttribute {
        /// Byte offset of the offending attribute.
        offset: usize,
    },

    /// An attribute value is not enclosed in quotes.
    #[error("attribute value must be quoted at byte {offset}")]
    UnquotedAttribute {
        /// Byte offset of the offending value.
        offset: usize,
    },

    /// A closing tag does not match the innermost open element.
    #[error("mismatched closing tag </{found}> at byte {offset}")]
    MismatchedTag {
        /// Name in the closing tag.
        found: String,
        /// Byte offset of the closing tag.
        offset: usize,
    },

    /// The input ended with elements still open.
    #[error("unclosed element <{name}>")]
    UnclosedElement {
        /// Name of the innermost unclosed element.
        name: String,
    },

    /// An entity or character reference is malformed.
    #[error("invalid character reference at byte {offset}")]
    InvalidCharacterReference {
        /// Byte offset of the `&`.
        offset: usize,
    },
}
