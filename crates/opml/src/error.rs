//! Error types for the OPML codec

use std::fmt;
use thiserror::Error;

/// Position in source text
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Pos {
    pub offset: usize,
    pub line: u32,
    pub col: u32,
}

impl Pos {
    pub const fn new(offset: usize, line: u32, col: u32) -> Self {
        Self { offset, line, col }
    }
}

impl fmt::Display for Pos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.col)
    }
}

/// Span representing a range in source text
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Span {
    pub start: Pos,
    pub end: Pos,
}

impl Span {
    pub const fn new(start: Pos, end: Pos) -> Self {
        Self { start, end }
    }

    pub const fn at(pos: Pos) -> Self {
        Self {
            start: pos,
            end: pos,
        }
    }

    pub const fn empty() -> Self {
        Self {
            start: Pos::new(0, 0, 0),
            end: Pos::new(0, 0, 0),
        }
    }

    const fn is_empty(&self) -> bool {
        self.start.offset == 0 && self.start.line == 0 && self.start.col == 0
    }
}

/// The ways a parse can fail
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    /// Input bytes are not valid UTF-8
    InvalidEncoding,
    /// The XML tokenizer reported malformed markup
    ParsingFailed { detail: String },
    /// Syntactically valid XML, but no `<opml>` document was found
    InvalidDocument,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidEncoding => write!(f, "input is not valid UTF-8"),
            Self::ParsingFailed { detail } => write!(f, "parsing failed: {detail}"),
            Self::InvalidDocument => write!(f, "no OPML document found in input"),
        }
    }
}

/// Main error type for the OPML codec
#[derive(Error, Clone, Debug, PartialEq, Eq)]
pub struct Error {
    kind: ErrorKind,
    span: Span,
}

impl Error {
    pub const fn new(kind: ErrorKind, span: Span) -> Self {
        Self { kind, span }
    }

    /// Malformed-markup error at a specific position
    pub fn parsing_failed(detail: impl Into<String>, pos: Pos) -> Self {
        Self::new(
            ErrorKind::ParsingFailed {
                detail: detail.into(),
            },
            Span::at(pos),
        )
    }

    pub const fn invalid_encoding() -> Self {
        Self::new(ErrorKind::InvalidEncoding, Span::empty())
    }

    pub const fn invalid_document() -> Self {
        Self::new(ErrorKind::InvalidDocument, Span::empty())
    }

    pub const fn kind(&self) -> &ErrorKind {
        &self.kind
    }

    pub const fn span(&self) -> Span {
        self.span
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.span.is_empty() {
            write!(f, "{}", self.kind)
        } else {
            write!(f, "error at {}: {}", self.span.start, self.kind)
        }
    }
}

/// Result type alias for the OPML codec
pub type Result<T> = std::result::Result<T, Error>;
