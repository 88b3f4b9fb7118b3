//! Streaming XML tokenizer used by the OPML parser

pub mod cursor;
pub mod tokenizer;

pub use cursor::Cursor;
pub use tokenizer::{Event, Tokenizer};
