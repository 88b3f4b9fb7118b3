//! Event-based XML tokenizer
//!
//! Covers the subset of XML that OPML documents use: elements with
//! attributes, character data, entity references, comments, processing
//! instructions, DOCTYPE and CDATA sections. Namespaces and DTD internals
//! are not interpreted.

use indexmap::IndexMap;

use crate::error::{Error, Pos, Result};
use crate::xml::Cursor;

/// A single markup event
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    /// Opening tag with its attributes, entity-decoded
    Start {
        name: String,
        attributes: IndexMap<String, String>,
    },
    /// Closing tag (synthesized for self-closing elements)
    End { name: String },
    /// Non-whitespace character data, entity-decoded
    Text(String),
    /// End of input, reached with all elements closed
    Eof,
}

/// Single-pass XML tokenizer with tag-balance checking
#[derive(Debug)]
pub struct Tokenizer<'a> {
    cursor: Cursor<'a>,
    open: Vec<String>,
    deferred_end: Option<String>,
}

impl<'a> Tokenizer<'a> {
    pub const fn new(input: &'a [u8]) -> Self {
        Self {
            cursor: Cursor::new(input),
            open: Vec::new(),
            deferred_end: None,
        }
    }

    /// Produce the next markup event
    pub fn next_event(&mut self) -> Result<Event> {
        if let Some(name) = self.deferred_end.take() {
            return Ok(Event::End { name });
        }

        loop {
            if self.cursor.is_eof() {
                if let Some(name) = self.open.last() {
                    return Err(self.error_here(format!("unclosed element <{name}>")));
                }
                return Ok(Event::Eof);
            }

            if self.cursor.current() == Some(b'<') {
                match self.cursor.peek(1) {
                    Some(b'?') => self.skip_processing_instruction()?,
                    Some(b'!') => self.skip_declaration_or_comment()?,
                    Some(b'/') => return self.read_end_tag(),
                    _ => return self.read_start_tag(),
                }
                continue;
            }

            if let Some(text) = self.read_text()? {
                return Ok(Event::Text(text));
            }
        }
    }

    fn read_start_tag(&mut self) -> Result<Event> {
        self.expect(b'<')?;
        let name = self.read_name()?;
        let attributes = self.read_attributes()?;

        if self.cursor.consume(b'/') {
            self.expect(b'>')?;
            self.deferred_end = Some(name.clone());
        } else {
            self.expect(b'>')?;
            self.open.push(name.clone());
        }

        Ok(Event::Start { name, attributes })
    }

    fn read_end_tag(&mut self) -> Result<Event> {
        let pos = self.cursor.position();
        self.cursor.advance_by(2);
        let name = self.read_name()?;
        self.cursor.skip_whitespace();
        self.expect(b'>')?;

        match self.open.pop() {
            Some(open) if open == name => Ok(Event::End { name }),
            Some(open) => Err(Error::parsing_failed(
                format!("mismatched closing tag </{name}>, expected </{open}>"),
                pos,
            )),
            None => Err(Error::parsing_failed(
                format!("closing tag </{name}> without matching opening tag"),
                pos,
            )),
        }
    }

    fn read_attributes(&mut self) -> Result<IndexMap<String, String>> {
        let mut attributes = IndexMap::new();

        loop {
            self.cursor.skip_whitespace();
            match self.cursor.current() {
                Some(b'/') | Some(b'>') => break,
                Some(_) => {}
                None => return Err(self.error_here("unexpected end of input inside tag")),
            }

            let pos = self.cursor.position();
            let name = self.read_name()?;
            self.cursor.skip_whitespace();
            self.expect(b'=')?;
            self.cursor.skip_whitespace();
            let value = self.read_attribute_value()?;

            if attributes.contains_key(&name) {
                return Err(Error::parsing_failed(
                    format!("duplicate attribute {name}"),
                    pos,
                ));
            }
            attributes.insert(name, value);
        }

        Ok(attributes)
    }

    fn read_attribute_value(&mut self) -> Result<String> {
        let quote = match self.cursor.current() {
            Some(q @ (b'"' | b'\'')) => q,
            _ => return Err(self.error_here("expected quoted attribute value")),
        };
        self.cursor.advance();

        let value_pos = self.cursor.position();
        let start = self.cursor.offset();
        while let Some(b) = self.cursor.current() {
            if b == quote {
                let raw = self.cursor.slice_from(start);
                self.cursor.advance();
                let text = to_utf8(raw)?;
                return decode_entities(text, value_pos);
            }
            self.cursor.advance();
        }

        Err(self.error_here("unterminated attribute value"))
    }

    fn read_text(&mut self) -> Result<Option<String>> {
        let text_pos = self.cursor.position();
        let start = self.cursor.offset();
        while let Some(b) = self.cursor.current() {
            if b == b'<' {
                break;
            }
            self.cursor.advance();
        }

        let text = to_utf8(self.cursor.slice_from(start))?;
        if text.trim().is_empty() {
            Ok(None)
        } else {
            decode_entities(text, text_pos).map(Some)
        }
    }

    fn read_name(&mut self) -> Result<String> {
        let pos = self.cursor.position();
        let start = self.cursor.offset();

        let Some(first) = self.cursor.current() else {
            return Err(self.error_here("expected name"));
        };
        if !is_name_start(first) {
            return Err(Error::parsing_failed("invalid name character", pos));
        }

        self.cursor.advance();
        while let Some(b) = self.cursor.current() {
            if is_name_char(b) {
                self.cursor.advance();
            } else {
                break;
            }
        }

        to_utf8(self.cursor.slice_from(start)).map(str::to_string)
    }

    fn skip_declaration_or_comment(&mut self) -> Result<()> {
        if self.cursor.starts_with(b"<!--") {
            self.cursor.advance_by(4);
            return self.skip_until(b"-->");
        }

        if self.cursor.starts_with(b"<![CDATA[") {
            self.cursor.advance_by(9);
            return self.skip_until(b"]]>");
        }

        // DOCTYPE and friends
        self.skip_until(b">")
    }

    fn skip_processing_instruction(&mut self) -> Result<()> {
        self.cursor.advance_by(2);
        self.skip_until(b"?>")
    }

    fn skip_until(&mut self, pattern: &[u8]) -> Result<()> {
        while !self.cursor.is_eof() {
            if self.cursor.starts_with(pattern) {
                self.cursor.advance_by(pattern.len());
                return Ok(());
            }
            self.cursor.advance();
        }
        Err(self.error_here("unterminated markup"))
    }

    fn expect(&mut self, expected: u8) -> Result<()> {
        if self.cursor.consume(expected) {
            Ok(())
        } else {
            Err(self.error_here(format!("expected '{}'", char::from(expected))))
        }
    }

    fn error_here(&self, detail: impl Into<String>) -> Error {
        Error::parsing_failed(detail, self.cursor.position())
    }
}

fn to_utf8(bytes: &[u8]) -> Result<&str> {
    std::str::from_utf8(bytes).map_err(|_| Error::invalid_encoding())
}

fn is_name_start(b: u8) -> bool {
    matches!(b, b'A'..=b'Z' | b'a'..=b'z' | b'_' | b':')
}

fn is_name_char(b: u8) -> bool {
    is_name_start(b) || matches!(b, b'0'..=b'9' | b'-' | b'.')
}

fn decode_entities(input: &str, pos: Pos) -> Result<String> {
    if !input.contains('&') {
        return Ok(input.to_string());
    }

    let mut result = String::with_capacity(input.len());
    let mut chars = input.chars();
    while let Some(ch) = chars.next() {
        if ch != '&' {
            result.push(ch);
            continue;
        }

        let mut entity = String::new();
        let mut terminated = false;
        for next in chars.by_ref() {
            if next == ';' {
                terminated = true;
                break;
            }
            entity.push(next);
        }
        if !terminated {
            return Err(Error::parsing_failed("unterminated entity reference", pos));
        }

        let decoded = match entity.as_str() {
            "amp" => Some('&'),
            "lt" => Some('<'),
            "gt" => Some('>'),
            "quot" => Some('"'),
            "apos" => Some('\''),
            _ => decode_numeric_entity(&entity),
        };

        match decoded {
            Some(ch) => result.push(ch),
            None => {
                return Err(Error::parsing_failed(
                    format!("invalid entity reference &{entity};"),
                    pos,
                ));
            }
        }
    }

    Ok(result)
}

fn decode_numeric_entity(entity: &str) -> Option<char> {
    if let Some(hex) = entity.strip_prefix("#x") {
        u32::from_str_radix(hex, 16).ok().and_then(char::from_u32)
    } else if let Some(dec) = entity.strip_prefix('#') {
        dec.parse::<u32>().ok().and_then(char::from_u32)
    } else {
        None
    }
}
