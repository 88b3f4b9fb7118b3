//! Canonical OPML text generation
//!
//! Generation is a total function: any representable document renders, with
//! special characters escaped rather than rejected. Output is deterministic
//! (head children in fixed order, outline attributes with `text` first and
//! the rest sorted lexicographically), so regenerating a parsed document
//! reproduces the bytes exactly.

use std::cmp::Ordering;
use std::fmt::Write;

use time::OffsetDateTime;
use tracing::debug;

use crate::date;
use crate::model::{Body, Document, Head, Outline};

const INDENT: &str = "  ";

/// Render a document as OPML 2.0 XML text
pub fn generate(document: &Document) -> String {
    let mut output = String::new();
    output.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
    let _ = writeln!(output, "<opml version=\"{}\">", escape(&document.version));
    write_head(&document.head, &mut output);
    write_body(&document.body, &mut output);
    output.push_str("</opml>");
    debug!(
        outlines = document.body.outlines.len(),
        bytes = output.len(),
        "generated OPML text"
    );
    output
}

fn write_head(head: &Head, output: &mut String) {
    push_indent(output, 1);
    output.push_str("<head>\n");

    write_text_field(output, "title", head.title.as_deref());
    write_date_field(output, "dateCreated", head.date_created);
    write_date_field(output, "dateModified", head.date_modified);
    write_text_field(output, "ownerName", head.owner_name.as_deref());
    write_text_field(output, "ownerEmail", head.owner_email.as_deref());
    write_text_field(output, "ownerId", head.owner_id.as_deref());
    write_text_field(output, "docs", head.docs.as_deref());
    if let Some(state) = &head.expansion_state {
        let joined = state
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ");
        write_element(output, "expansionState", &joined);
    }
    write_int_field(output, "vertScrollState", head.vert_scroll_state);
    write_int_field(output, "windowTop", head.window_top);
    write_int_field(output, "windowLeft", head.window_left);
    write_int_field(output, "windowBottom", head.window_bottom);
    write_int_field(output, "windowRight", head.window_right);

    push_indent(output, 1);
    output.push_str("</head>\n");
}

fn write_text_field(output: &mut String, name: &str, value: Option<&str>) {
    if let Some(value) = value {
        write_element(output, name, &escape(value));
    }
}

fn write_date_field(output: &mut String, name: &str, value: Option<OffsetDateTime>) {
    if let Some(value) = value {
        write_element(output, name, &date::format(value));
    }
}

fn write_int_field(output: &mut String, name: &str, value: Option<i64>) {
    if let Some(value) = value {
        write_element(output, name, &value.to_string());
    }
}

// `content` must already be escaped where escaping applies
fn write_element(output: &mut String, name: &str, content: &str) {
    push_indent(output, 2);
    let _ = writeln!(output, "<{name}>{content}</{name}>");
}

fn write_body(body: &Body, output: &mut String) {
    push_indent(output, 1);
    output.push_str("<body>\n");

    for outline in &body.outlines {
        write_outline(outline, output, 2);
    }

    push_indent(output, 1);
    output.push_str("</body>\n");
}

fn write_outline(outline: &Outline, output: &mut String, level: usize) {
    push_indent(output, level);
    output.push_str("<outline");

    for (key, value) in sorted_attributes(outline) {
        let _ = write!(output, " {key}=\"{}\"", escape(value));
    }

    if outline.children.is_empty() {
        output.push_str(" />\n");
    } else {
        output.push_str(">\n");
        for child in &outline.children {
            write_outline(child, output, level + 1);
        }
        push_indent(output, level);
        output.push_str("</outline>\n");
    }
}

/// Attribute pairs with `text` first and the rest in lexicographic key order
fn sorted_attributes(outline: &Outline) -> Vec<(&str, &str)> {
    let mut attrs: Vec<(&str, &str)> = outline
        .attributes
        .iter()
        .map(|(key, value)| (key.as_str(), value.as_str()))
        .collect();
    attrs.sort_by(|a, b| match (a.0 == "text", b.0 == "text") {
        (true, false) => Ordering::Less,
        (false, true) => Ordering::Greater,
        _ => a.0.cmp(b.0),
    });
    attrs
}

fn push_indent(output: &mut String, level: usize) {
    for _ in 0..level {
        output.push_str(INDENT);
    }
}

/// Escape the five XML special characters
pub(crate) fn escape(input: &str) -> String {
    let mut result = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '"' => result.push_str("&quot;"),
            '\'' => result.push_str("&apos;"),
            _ => result.push(ch),
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    fn bare_document() -> Document {
        let mut doc = Document::new();
        doc.head = Head::default();
        doc
    }

    #[test]
    fn test_empty_document() {
        let output = generate(&bare_document());
        assert_eq!(
            output,
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
             <opml version=\"2.0\">\n  <head>\n  </head>\n  <body>\n  </body>\n</opml>"
        );
    }

    #[test]
    fn test_text_attribute_comes_first() {
        let mut doc = bare_document();
        let mut outline = Outline::new();
        outline.attributes.insert("_position_x", "12.5");
        outline.attributes.insert("text", "A");
        outline.attributes.insert("_color", "#FF0000");
        doc.body.outlines.push(outline);

        let output = generate(&doc);
        assert!(output.contains("<outline text=\"A\" _color=\"#FF0000\" _position_x=\"12.5\" />"));
    }

    #[test]
    fn test_escaping() {
        assert_eq!(escape("a&b<c>d\"e'f"), "a&amp;b&lt;c&gt;d&quot;e&apos;f");
        // already-escaped input escapes again rather than double-decoding
        assert_eq!(escape("&amp;"), "&amp;amp;");
    }

    #[test]
    fn test_head_field_order_and_formats() {
        let mut doc = bare_document();
        doc.head.title = Some("Notes".to_string());
        doc.head.date_modified = Some(datetime!(2020-01-02 03:04:05 UTC));
        doc.head.expansion_state = Some(vec![1, 3, 5]);
        doc.head.window_top = Some(-20);

        let output = generate(&doc);
        let title_at = output.find("<title>Notes</title>").unwrap();
        let modified_at = output
            .find("<dateModified>Thu, 02 Jan 2020 03:04:05 +0000</dateModified>")
            .unwrap();
        let expansion_at = output.find("<expansionState>1, 3, 5</expansionState>").unwrap();
        let window_at = output.find("<windowTop>-20</windowTop>").unwrap();
        assert!(title_at < modified_at);
        assert!(modified_at < expansion_at);
        assert!(expansion_at < window_at);
        // absent fields emit nothing
        assert!(!output.contains("<dateCreated>"));
        assert!(!output.contains("<ownerName>"));
    }

    #[test]
    fn test_nested_outline_indentation() {
        let mut doc = bare_document();
        let mut root = Outline::with_text("root");
        root.add_child(Outline::with_text("child"));
        doc.body.outlines.push(root);

        let output = generate(&doc);
        assert!(output.contains("    <outline text=\"root\">\n"));
        assert!(output.contains("      <outline text=\"child\" />\n"));
        assert!(output.contains("    </outline>\n"));
    }

    #[test]
    fn test_deterministic_output() {
        let mut doc = bare_document();
        let mut outline = Outline::with_text("A");
        outline.attributes.insert("zeta", "1");
        outline.attributes.insert("alpha", "2");
        doc.body.outlines.push(outline);

        assert_eq!(generate(&doc), generate(&doc));
    }
}
