//! OPML document model
//!
//! Plain data containers with no validation logic. Outline attributes are a
//! generic string-to-string mapping; the well-known OPML keys (`text`,
//! `type`, `isComment`, `isBreakpoint`, `created`) are interpreted through
//! optional typed accessors layered on top, never enumerated or stripped.
//! Application-private keys (by convention prefixed `_`) pass through the
//! codec untouched.

use indexmap::map::{IntoIter, Iter, Keys, Values};
use indexmap::IndexMap;
use time::OffsetDateTime;

use crate::date;

/// OPML version emitted for new documents and assumed when absent on parse
pub const DEFAULT_VERSION: &str = "2.0";

/// An OPML 2.0 document
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Document {
    pub version: String,
    pub head: Head,
    pub body: Body,
}

impl Document {
    /// Create a fresh document: version "2.0", empty body, head stamped
    /// with the current time
    pub fn new() -> Self {
        Self {
            version: DEFAULT_VERSION.to_string(),
            head: Head::new(),
            body: Body::default(),
        }
    }

    /// Create a document without default head timestamps, as used when
    /// reconstructing from parsed input
    pub(crate) fn with_version(version: impl Into<String>) -> Self {
        Self {
            version: version.into(),
            head: Head::default(),
            body: Body::default(),
        }
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

/// Document metadata; every field is independently optional and absence
/// means "not present in source"
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Head {
    pub title: Option<String>,
    #[cfg_attr(
        feature = "serde",
        serde(default, with = "time::serde::rfc3339::option")
    )]
    pub date_created: Option<OffsetDateTime>,
    #[cfg_attr(
        feature = "serde",
        serde(default, with = "time::serde::rfc3339::option")
    )]
    pub date_modified: Option<OffsetDateTime>,
    pub owner_name: Option<String>,
    pub owner_email: Option<String>,
    pub owner_id: Option<String>,
    pub docs: Option<String>,
    pub expansion_state: Option<Vec<i64>>,
    pub vert_scroll_state: Option<i64>,
    pub window_top: Option<i64>,
    pub window_left: Option<i64>,
    pub window_bottom: Option<i64>,
    pub window_right: Option<i64>,
}

impl Head {
    /// Head for a brand-new document, stamped with the current time
    pub fn new() -> Self {
        let now = OffsetDateTime::now_utc();
        Self {
            date_created: Some(now),
            date_modified: Some(now),
            ..Self::default()
        }
    }
}

/// The outline tree; order is significant and survives round-trips
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Body {
    pub outlines: Vec<Outline>,
}

/// A single node in the outline tree
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Outline {
    pub attributes: Attributes,
    pub children: Vec<Outline>,
}

impl Outline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Outline carrying only a `text` attribute
    pub fn with_text(text: impl Into<String>) -> Self {
        let mut outline = Self::new();
        outline.set_text(text);
        outline
    }

    pub fn add_child(&mut self, child: Self) {
        self.children.push(child);
    }

    /// The `text` attribute
    pub fn text(&self) -> Option<&str> {
        self.attributes.get("text")
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.attributes.insert("text", text);
    }

    /// The `type` attribute
    pub fn outline_type(&self) -> Option<&str> {
        self.attributes.get("type")
    }

    pub fn set_outline_type(&mut self, outline_type: impl Into<String>) {
        self.attributes.insert("type", outline_type);
    }

    /// Whether the `isComment` attribute is the literal string "true"
    pub fn is_comment(&self) -> bool {
        self.attributes.get("isComment") == Some("true")
    }

    pub fn set_comment(&mut self, value: bool) {
        self.attributes
            .insert("isComment", if value { "true" } else { "false" });
    }

    /// Whether the `isBreakpoint` attribute is the literal string "true"
    pub fn is_breakpoint(&self) -> bool {
        self.attributes.get("isBreakpoint") == Some("true")
    }

    pub fn set_breakpoint(&mut self, value: bool) {
        self.attributes
            .insert("isBreakpoint", if value { "true" } else { "false" });
    }

    /// The `created` attribute as a timestamp, if present and parseable
    pub fn created(&self) -> Option<OffsetDateTime> {
        self.attributes.get("created").and_then(date::parse)
    }

    /// Set or clear the `created` attribute
    pub fn set_created(&mut self, created: Option<OffsetDateTime>) {
        match created {
            Some(value) => {
                self.attributes.insert("created", date::format(value));
            }
            None => {
                self.attributes.remove("created");
            }
        }
    }
}

/// Order-preserving outline attribute map (string keys to string values)
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(transparent)
)]
pub struct Attributes(IndexMap<String, String>);

impl Attributes {
    pub fn new() -> Self {
        Self(IndexMap::new())
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self(IndexMap::with_capacity(capacity))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    /// Insert a key-value pair, returning the previous value if any
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.0.insert(key.into(), value.into())
    }

    /// Remove a key, preserving the order of the remaining entries
    pub fn remove(&mut self, key: &str) -> Option<String> {
        self.0.shift_remove(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn keys(&self) -> Keys<'_, String, String> {
        self.0.keys()
    }

    pub fn values(&self) -> Values<'_, String, String> {
        self.0.values()
    }

    pub fn iter(&self) -> Iter<'_, String, String> {
        self.0.iter()
    }
}

impl From<IndexMap<String, String>> for Attributes {
    fn from(map: IndexMap<String, String>) -> Self {
        Self(map)
    }
}

impl FromIterator<(String, String)> for Attributes {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> FromIterator<(&'a str, &'a str)> for Attributes {
    fn from_iter<I: IntoIterator<Item = (&'a str, &'a str)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        )
    }
}

impl IntoIterator for Attributes {
    type Item = (String, String);
    type IntoIter = IntoIter<String, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a Attributes {
    type Item = (&'a String, &'a String);
    type IntoIter = Iter<'a, String, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
