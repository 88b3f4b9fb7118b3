//! OPML document parsing
//!
//! A single pass over tokenizer events. Outline nesting is recovered with an
//! explicit stack: each `<outline>` start pushes a node, each end pops it and
//! attaches it to the new stack top (or to the document body when the stack
//! empties). Head element text is collected per element name and converted
//! into the typed [`Head`](crate::model::Head) when `</head>` is seen;
//! malformed scalar fields there degrade to "absent" instead of failing the
//! whole parse.

use indexmap::IndexMap;

use crate::date;
use crate::error::{Error, Pos, Result};
use crate::model::{Document, Head, Outline, DEFAULT_VERSION};
use crate::xml::{Event, Tokenizer};

/// Head child elements whose character data is collected
const HEAD_FIELDS: &[&str] = &[
    "title",
    "dateCreated",
    "dateModified",
    "ownerName",
    "ownerEmail",
    "ownerId",
    "docs",
    "expansionState",
    "vertScrollState",
    "windowTop",
    "windowLeft",
    "windowBottom",
    "windowRight",
];

/// Configuration for the OPML parser
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Config {
    /// Maximum outline nesting depth (0 means unlimited)
    pub max_depth: u16,
    /// Maximum input size in bytes (0 means unlimited)
    pub max_size: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self::unlimited()
    }
}

impl Config {
    /// No depth or size limits
    pub const fn unlimited() -> Self {
        Self {
            max_depth: 0,
            max_size: 0,
        }
    }

    pub const fn new(max_depth: u16, max_size: usize) -> Self {
        Self {
            max_depth,
            max_size,
        }
    }
}

/// Event-driven OPML parser
#[derive(Debug)]
pub struct Parser<'a> {
    tokenizer: Tokenizer<'a>,
    config: Config,
    input_len: usize,
    document: Option<Document>,
    stack: Vec<Outline>,
    head_fields: IndexMap<String, String>,
    current_element: String,
}

impl<'a> Parser<'a> {
    pub fn new(input: &'a [u8]) -> Self {
        Self::with_config(input, Config::default())
    }

    pub fn with_config(input: &'a [u8], config: Config) -> Self {
        Self {
            tokenizer: Tokenizer::new(input),
            config,
            input_len: input.len(),
            document: None,
            stack: Vec::new(),
            head_fields: IndexMap::new(),
            current_element: String::new(),
        }
    }

    /// Parse the input into a document
    pub fn parse(&mut self) -> Result<Document> {
        if self.config.max_size > 0 && self.input_len > self.config.max_size {
            return Err(Error::parsing_failed(
                format!("input exceeds maximum size of {} bytes", self.config.max_size),
                Pos::new(0, 1, 1),
            ));
        }

        loop {
            match self.tokenizer.next_event()? {
                Event::Start { name, attributes } => self.handle_start(name, attributes)?,
                Event::End { name } => self.handle_end(&name),
                Event::Text(text) => self.handle_text(&text),
                Event::Eof => break,
            }
        }

        self.document.take().ok_or_else(Error::invalid_document)
    }

    fn handle_start(&mut self, name: String, attributes: IndexMap<String, String>) -> Result<()> {
        match name.as_str() {
            "opml" => {
                let version = attributes
                    .get("version")
                    .cloned()
                    .unwrap_or_else(|| DEFAULT_VERSION.to_string());
                self.document = Some(Document::with_version(version));
            }
            "outline" => {
                if self.config.max_depth > 0 && self.stack.len() >= usize::from(self.config.max_depth)
                {
                    return Err(Error::parsing_failed(
                        format!("outline nesting exceeds maximum depth of {}", self.config.max_depth),
                        Pos::new(0, 1, 1),
                    ));
                }
                self.stack.push(Outline {
                    attributes: attributes.into(),
                    children: Vec::new(),
                });
            }
            _ => {}
        }

        self.current_element = name;
        Ok(())
    }

    fn handle_end(&mut self, name: &str) {
        match name {
            "head" => {
                if let Some(document) = &mut self.document {
                    document.head = build_head(&self.head_fields);
                }
            }
            "outline" => {
                if let Some(outline) = self.stack.pop() {
                    match self.stack.last_mut() {
                        Some(parent) => parent.children.push(outline),
                        None => {
                            if let Some(document) = &mut self.document {
                                document.body.outlines.push(outline);
                            }
                        }
                    }
                }
            }
            _ => {}
        }

        self.current_element.clear();
    }

    fn handle_text(&mut self, text: &str) {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return;
        }

        if HEAD_FIELDS.contains(&self.current_element.as_str()) {
            self.head_fields
                .entry(self.current_element.clone())
                .or_default()
                .push_str(trimmed);
        }
    }
}

fn build_head(fields: &IndexMap<String, String>) -> Head {
    Head {
        title: fields.get("title").cloned(),
        date_created: fields.get("dateCreated").and_then(|v| date::parse(v)),
        date_modified: fields.get("dateModified").and_then(|v| date::parse(v)),
        owner_name: fields.get("ownerName").cloned(),
        owner_email: fields.get("ownerEmail").cloned(),
        owner_id: fields.get("ownerId").cloned(),
        docs: fields.get("docs").cloned(),
        expansion_state: fields.get("expansionState").and_then(|v| parse_expansion_state(v)),
        vert_scroll_state: parse_int(fields.get("vertScrollState")),
        window_top: parse_int(fields.get("windowTop")),
        window_left: parse_int(fields.get("windowLeft")),
        window_bottom: parse_int(fields.get("windowBottom")),
        window_right: parse_int(fields.get("windowRight")),
    }
}

fn parse_int(value: Option<&String>) -> Option<i64> {
    value.and_then(|v| v.parse().ok())
}

/// Comma-separated integer list; unparseable tokens are dropped, and a list
/// with no surviving tokens counts as absent
fn parse_expansion_state(text: &str) -> Option<Vec<i64>> {
    let values: Vec<i64> = text
        .split(',')
        .filter_map(|token| token.trim().parse().ok())
        .collect();
    if values.is_empty() {
        None
    } else {
        Some(values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    fn parse(input: &str) -> Result<Document> {
        Parser::new(input.as_bytes()).parse()
    }

    #[test]
    fn test_version_attribute_default() -> Result<()> {
        let doc = parse("<opml><head></head><body></body></opml>")?;
        assert_eq!(doc.version, "2.0");

        let doc = parse("<opml version=\"1.0\"><body></body></opml>")?;
        assert_eq!(doc.version, "1.0");
        Ok(())
    }

    #[test]
    fn test_no_opml_root() {
        let err = parse("<notes><outline text=\"x\" /></notes>").unwrap_err();
        assert_eq!(err.kind(), &ErrorKind::InvalidDocument);
    }

    #[test]
    fn test_stray_text_ignored() -> Result<()> {
        let doc = parse("<opml version=\"2.0\"><body>loose text<outline text=\"a\" /></body></opml>")?;
        assert_eq!(doc.body.outlines.len(), 1);
        Ok(())
    }

    #[test]
    fn test_expansion_state_partial_parse() {
        assert_eq!(parse_expansion_state("1, 2, x, 4"), Some(vec![1, 2, 4]));
        assert_eq!(parse_expansion_state("nope"), None);
        assert_eq!(parse_expansion_state(""), None);
    }

    #[test]
    fn test_depth_limit() {
        let input = "<opml version=\"2.0\"><body>\
                     <outline text=\"1\"><outline text=\"2\"><outline text=\"3\" />\
                     </outline></outline></body></opml>";
        let err = Parser::with_config(input.as_bytes(), Config::new(2, 0))
            .parse()
            .unwrap_err();
        assert!(matches!(
            err.kind(),
            ErrorKind::ParsingFailed { detail } if detail.contains("maximum depth")
        ));

        assert!(Parser::with_config(input.as_bytes(), Config::new(3, 0))
            .parse()
            .is_ok());
    }

    #[test]
    fn test_size_limit() {
        let input = "<opml version=\"2.0\"><body></body></opml>";
        let err = Parser::with_config(input.as_bytes(), Config::new(0, 10))
            .parse()
            .unwrap_err();
        assert!(matches!(
            err.kind(),
            ErrorKind::ParsingFailed { detail } if detail.contains("maximum size")
        ));
    }

    #[test]
    fn test_split_head_text_concatenates() -> Result<()> {
        // a comment splits the character data into two tokenizer events
        let doc = parse("<opml version=\"2.0\"><head><title>one<!-- x -->two</title></head><body></body></opml>")?;
        assert_eq!(doc.head.title.as_deref(), Some("onetwo"));
        Ok(())
    }
}
