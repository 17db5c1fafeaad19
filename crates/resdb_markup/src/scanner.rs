//! XHTML narrative scanner.

use crate::entities;
use crate::error::{MarkupError, MarkupResult};
use std::ops::Range;

/// Scans an XHTML fragment and returns every rewritable link site.
///
/// The scanner validates tag termination, attribute quoting, entity
/// references inside attribute values, and element balance. It does
/// not build a tree; untouched bytes are preserved exactly when the
/// result is later re-serialized with [`crate::splice`].
///
/// # Errors
///
/// Returns an error if the fragment is not well-formed enough to
/// rewrite safely.
pub fn scan(src: &str) -> MarkupResult<Vec<LinkSite>> {
    Scanner::new(src).run()
}

/// Element kinds that carry a rewritable reference attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkElement {
    /// An `<a>` element; the rewritable attribute is `href`.
    Anchor,
    /// An `<img>` element; the rewritable attribute is `src`.
    Image,
}

/// One rewritable attribute occurrence in a scanned fragment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkSite {
    /// The element the attribute belongs to.
    pub element: LinkElement,
    /// Byte range of the raw attribute value, between the quotes.
    pub span: Range<usize>,
    /// Entity-decoded attribute value.
    pub value: String,
}

struct Scanner<'a> {
    src: &'a str,
    bytes: &'a [u8],
    pos: usize,
    open: Vec<&'a str>,
    sites: Vec<LinkSite>,
}

impl<'a> Scanner<'a> {
    fn new(src: &'a str) -> Self {
        Self {
            src,
            bytes: src.as_bytes(),
            pos: 0,
            open: Vec::new(),
            sites: Vec::new(),
        }
    }

    fn run(mut self) -> MarkupResult<Vec<LinkSite>> {
        while self.pos < self.bytes.len() {
            if self.bytes[self.pos] == b'<' {
                self.tag()?;
            } else {
                self.pos += 1;
            }
        }
        if let Some(name) = self.open.pop() {
            return Err(MarkupError::UnclosedElement {
                name: name.to_string(),
            });
        }
        Ok(self.sites)
    }

    fn tag(&mut self) -> MarkupResult<()> {
        let offset = self.pos;
        if self.starts_with("<!--") {
            return match self.find_from(offset + 4, "-->") {
                Some(end) => {
                    self.pos = end + 3;
                    Ok(())
                }
                None => Err(MarkupError::UnterminatedComment { offset }),
            };
        }
        if self.starts_with("<![CDATA[") {
            return match self.find_from(offset + 9, "]]>") {
                Some(end) => {
                    self.pos = end + 3;
                    Ok(())
                }
                None => Err(MarkupError::UnterminatedTag { offset }),
            };
        }
        // Doctype declarations and processing instructions are skipped,
        // not validated.
        if self.starts_with("<!") || self.starts_with("<?") {
            return match self.find_byte_from(offset + 2, b'>') {
                Some(end) => {
                    self.pos = end + 1;
                    Ok(())
                }
                None => Err(MarkupError::UnterminatedTag { offset }),
            };
        }
        if self.starts_with("</") {
            self.pos = offset + 2;
            let name = self.name(MarkupError::InvalidTagName { offset })?;
            self.skip_whitespace();
            if self.peek() != Some(b'>') {
                return Err(MarkupError::UnterminatedTag { offset });
            }
            self.pos += 1;
            return match self.open.pop() {
                Some(open) if open == name => Ok(()),
                _ => Err(MarkupError::MismatchedTag {
                    found: name.to_string(),
                    offset,
                }),
            };
        }

        self.pos = offset + 1;
        let name = self.name(MarkupError::InvalidTagName { offset })?;
        loop {
            self.skip_whitespace();
            match self.peek() {
                None => return Err(MarkupError::UnterminatedTag { offset }),
                Some(b'>') => {
                    self.pos += 1;
                    self.open.push(name);
                    return Ok(());
                }
                Some(b'/') => {
                    if self.bytes.get(self.pos + 1) == Some(&b'>') {
                        self.pos += 2;
                        return Ok(());
                    }
                    return Err(MarkupError::UnterminatedTag { offset });
                }
                Some(_) => self.attribute(name, offset)?,
            }
        }
    }

    fn attribute(&mut self, element: &str, tag_offset: usize) -> MarkupResult<()> {
        let attr_offset = self.pos;
        let attr = self.name(MarkupError::InvalidAttribute {
            offset: attr_offset,
        })?;
        self.skip_whitespace();
        if self.peek() != Some(b'=') {
            return Err(MarkupError::InvalidAttribute {
                offset: attr_offset,
            });
        }
        self.pos += 1;
        self.skip_whitespace();
        let quote = match self.peek() {
            Some(q @ (b'"' | b'\'')) => q,
            _ => {
                return Err(MarkupError::UnquotedAttribute { offset: self.pos });
            }
        };
        self.pos += 1;
        let start = self.pos;
        let end = self
            .find_byte_from(start, quote)
            .ok_or(MarkupError::UnterminatedTag { offset: tag_offset })?;
        self.pos = end + 1;

        // Decoding also validates entity references in values we do not
        // collect.
        let value = entities::decode(&self.src[start..end], start)?;
        let link = match (element, attr) {
            ("a", "href") => Some(LinkElement::Anchor),
            ("img", "src") => Some(LinkElement::Image),
            _ => None,
        };
        if let Some(element) = link {
            self.sites.push(LinkSite {
                element,
                span: start..end,
                value,
            });
        }
        Ok(())
    }

    /// Parses a tag or attribute name, failing with `err` if the next
    /// byte cannot start one.
    fn name(&mut self, err: MarkupError) -> MarkupResult<&'a str> {
        let start = self.pos;
        match self.peek() {
            Some(b) if b.is_ascii_alphabetic() => self.pos += 1,
            _ => return Err(err),
        }
        while let Some(b) = self.peek() {
            if b.is_ascii_alphanumeric() || matches!(b, b'-' | b'_' | b'.' | b':') {
                self.pos += 1;
            } else {
                break;
            }
        }
        Ok(&self.src[start..self.pos])
    }

    fn peek(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    fn starts_with(&self, prefix: &str) -> bool {
        self.src[self.pos..].starts_with(prefix)
    }

    fn skip_whitespace(&mut self) {
        while matches!(self.peek(), Some(b' ' | b'\t' | b'\r' | b'\n')) {
            self.pos += 1;
        }
    }

    fn find_from(&self, start: usize, needle: &str) -> Option<usize> {
        self.src.get(start..)?.find(needle).map(|i| start + i)
    }

    fn find_byte_from(&self, start: usize, needle: u8) -> Option<usize> {
        self.bytes[start..]
            .iter()
            .position(|&b| b == needle)
            .map(|i| start + i)
    }
}
