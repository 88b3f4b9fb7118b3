//! OPML 2.0 reading and writing
//!
//! A bidirectional codec between an outline document model and OPML 2.0 XML
//! text. Standard head fields get typed treatment; outline attributes are a
//! generic string map, so application-private keys (conventionally prefixed
//! `_`) survive round-trips untouched.
//!
//! # Quick start
//!
//! ```
//! # fn main() -> Result<(), opml::Error> {
//! let doc = opml::parse_str(
//!     r##"<opml version="2.0"><head/><body><outline text="A" _color="#FF0000"/></body></opml>"##,
//! )?;
//! assert_eq!(doc.body.outlines[0].text(), Some("A"));
//!
//! let rendered = opml::generate(&doc);
//! assert!(rendered.contains(r##"<outline text="A" _color="#FF0000" />"##));
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]

pub mod error;
pub use error::{Error, ErrorKind, Pos, Result, Span};

pub mod date;

pub mod model;
pub use model::{Attributes, Body, Document, Head, Outline, DEFAULT_VERSION};

pub mod xml;

pub mod parser;
pub use parser::{Config, Parser};

pub mod generator;
pub use generator::generate;

use tracing::debug;

/// Parse an OPML document from text
pub fn parse_str(text: &str) -> Result<Document> {
    debug!(len = text.len(), "parsing OPML text");
    let mut parser = Parser::new(text.as_bytes());
    parser.parse()
}

/// Parse an OPML document from bytes
///
/// The bytes must be valid UTF-8; anything else fails with
/// [`ErrorKind::InvalidEncoding`].
pub fn parse_bytes(bytes: &[u8]) -> Result<Document> {
    let text = std::str::from_utf8(bytes).map_err(|_| Error::invalid_encoding())?;
    parse_str(text)
}

/// Parse with custom limits
pub fn parse_str_with_config(text: &str, config: Config) -> Result<Document> {
    debug!(len = text.len(), "parsing OPML text");
    let mut parser = Parser::with_config(text.as_bytes(), config);
    parser.parse()
}

/// Parse bytes with custom limits
pub fn parse_bytes_with_config(bytes: &[u8], config: Config) -> Result<Document> {
    let text = std::str::from_utf8(bytes).map_err(|_| Error::invalid_encoding())?;
    parse_str_with_config(text, config)
}
