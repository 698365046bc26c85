//! Markup codec for module export/import documents.
//!
//! Document shape:
//!
//! ```xml
//! <DocumRollers>
//!   <DocumRoller><content>Hello &amp; welcome</content></DocumRoller>
//! </DocumRollers>
//! ```
//!
//! # Invariants
//! - Written content is always escaped; read content is always unescaped.
//! - An empty item list still produces the wrapper element.
//! - Only direct `DocumRoller` children of the root are items, and only an
//!   item's first direct `content` child is read.

use quick_xml::escape::escape;
use quick_xml::events::Event;
use quick_xml::Reader;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub const ROOT_ELEMENT: &str = "DocumRollers";
pub const ITEM_ELEMENT: &str = "DocumRoller";
pub const CONTENT_ELEMENT: &str = "content";

/// Import document could not be read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MarkupError {
    /// The document root is not a `DocumRollers` element.
    MissingRoot,
    /// The item at this zero-based position has no `content` child.
    MissingContent { item: usize },
    /// The document is not well-formed.
    Malformed(String),
}

impl Display for MarkupError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingRoot => write!(f, "document has no `{ROOT_ELEMENT}` root element"),
            Self::MissingContent { item } => {
                write!(f, "`{ITEM_ELEMENT}` #{item} has no `{CONTENT_ELEMENT}` element")
            }
            Self::Malformed(message) => write!(f, "malformed markup: {message}"),
        }
    }
}

impl Error for MarkupError {}

/// Renders content items as an export document.
pub fn write_items<'a, I>(contents: I) -> String
where
    I: IntoIterator<Item = &'a str>,
{
    let mut markup = String::new();
    push_open(&mut markup, ROOT_ELEMENT);
    for content in contents {
        push_open(&mut markup, ITEM_ELEMENT);
        push_open(&mut markup, CONTENT_ELEMENT);
        markup.push_str(&escape(content));
        push_close(&mut markup, CONTENT_ELEMENT);
        push_close(&mut markup, ITEM_ELEMENT);
    }
    push_close(&mut markup, ROOT_ELEMENT);
    markup
}

fn push_open(markup: &mut String, name: &str) {
    markup.push('<');
    markup.push_str(name);
    markup.push('>');
}

fn push_close(markup: &mut String, name: &str) {
    markup.push_str("</");
    markup.push_str(name);
    markup.push('>');
}

/// Reads every item's unescaped content text, in document order.
///
/// Fails with `MissingContent` on the first item without a `content` child.
pub fn read_items(markup: &str) -> Result<Vec<String>, MarkupError> {
    read_document(markup)?
        .into_iter()
        .enumerate()
        .map(|(item, content)| content.ok_or(MarkupError::MissingContent { item }))
        .collect()
}

/// Reads the whole document and returns one entry per item in document
/// order; `None` marks an item without a `content` child.
///
/// Only `MissingRoot` and `Malformed` are returned here, and only after the
/// entire document has been checked.
pub fn read_document(markup: &str) -> Result<Vec<Option<String>>, MarkupError> {
    let mut reader = Reader::from_str(markup);
    let mut walker = ItemWalker::default();

    loop {
        let event = reader.read_event().map_err(|err| {
            MarkupError::Malformed(format!(
                "{err} (at byte {})",
                reader.buffer_position()
            ))
        })?;

        match event {
            Event::Start(start) => walker.open(start.name().as_ref()),
            Event::Empty(empty) => {
                walker.open(empty.name().as_ref());
                walker.close()?;
            }
            Event::End(_) => walker.close()?,
            Event::Text(text) if walker.capturing() => {
                let unescaped = text
                    .unescape()
                    .map_err(|err| MarkupError::Malformed(err.to_string()))?;
                walker.push_text(&unescaped);
            }
            Event::CData(data) if walker.capturing() => {
                walker.push_text(&String::from_utf8_lossy(&data.into_inner()));
            }
            Event::Eof => break,
            _ => {}
        }
    }

    walker.finish()
}

/// Tracks element depth and the item/content currently being read.
#[derive(Debug, Default)]
struct ItemWalker {
    depth: usize,
    saw_root: bool,
    in_root: bool,
    /// `Some` while inside an item; holds its content once read.
    item: Option<Option<String>>,
    /// Buffer for the content element being read.
    capture: Option<String>,
    items: Vec<Option<String>>,
}

impl ItemWalker {
    fn capturing(&self) -> bool {
        self.capture.is_some()
    }

    fn open(&mut self, name: &[u8]) {
        match self.depth {
            0 if name == ROOT_ELEMENT.as_bytes() => {
                self.saw_root = true;
                self.in_root = true;
            }
            1 if self.in_root && name == ITEM_ELEMENT.as_bytes() => {
                self.item = Some(None);
            }
            2 if name == CONTENT_ELEMENT.as_bytes()
                && matches!(self.item, Some(None))
                && self.capture.is_none() =>
            {
                self.capture = Some(String::new());
            }
            _ => {}
        }
        self.depth += 1;
    }

    fn close(&mut self) -> Result<(), MarkupError> {
        self.depth = self.depth.checked_sub(1).ok_or_else(|| {
            MarkupError::Malformed("closing tag without matching opening tag".to_string())
        })?;

        match self.depth {
            2 => {
                if let Some(content) = self.capture.take() {
                    self.item = Some(Some(content));
                }
            }
            1 => {
                if let Some(content) = self.item.take() {
                    self.items.push(content);
                }
            }
            0 => self.in_root = false,
            _ => {}
        }
        Ok(())
    }

    fn push_text(&mut self, text: &str) {
        if let Some(buffer) = self.capture.as_mut() {
            buffer.push_str(text);
        }
    }

    fn finish(self) -> Result<Vec<Option<String>>, MarkupError> {
        if self.depth != 0 {
            return Err(MarkupError::Malformed(
                "document ended before all elements were closed".to_string(),
            ));
        }
        if !self.saw_root {
            return Err(MarkupError::MissingRoot);
        }
        Ok(self.items)
    }
}

#[cfg(test)]
mod tests {
    use super::{read_document, read_items, write_items, MarkupError};

    #[test]
    fn write_escapes_markup_characters() {
        let markup = write_items(["A & B"]);
        assert_eq!(
            markup,
            "<DocumRollers><DocumRoller><content>A &amp; B</content></DocumRoller></DocumRollers>"
        );

        let tricky = write_items(["<b>\"quoted\"</b>"]);
        assert!(!tricky.contains("<b>"));
        assert_eq!(
            read_items(&tricky).expect("escaped output should read back"),
            vec!["<b>\"quoted\"</b>"]
        );
    }

    #[test]
    fn write_with_no_items_keeps_wrapper() {
        let markup = write_items(std::iter::empty());
        assert_eq!(markup, "<DocumRollers></DocumRollers>");
        assert!(read_items(&markup).expect("empty wrapper should read").is_empty());
    }

    #[test]
    fn read_accepts_declaration_whitespace_and_self_closing_root() {
        let markup = r#"<?xml version="1.0" encoding="utf-8"?>
            <DocumRollers>
                <DocumRoller><content>first</content></DocumRoller>
                <DocumRoller>
                    <content>  second  </content>
                </DocumRoller>
            </DocumRollers>"#;
        assert_eq!(
            read_items(markup).expect("declaration and whitespace are allowed"),
            vec!["first", "  second  "]
        );
        assert!(read_items("<DocumRollers/>").expect("self-closing root should read").is_empty());
    }

    #[test]
    fn read_concatenates_nested_text_and_cdata() {
        let markup = "<DocumRollers><DocumRoller><content>a<i>b</i><![CDATA[<c>]]></content></DocumRoller></DocumRollers>";
        assert_eq!(
            read_items(markup).expect("nested text and cdata should read"),
            vec!["ab<c>"]
        );
    }

    #[test]
    fn read_keeps_first_content_and_ignores_unknown_elements() {
        let markup = "<DocumRollers><Other><content>skip</content></Other><DocumRoller><title>t</title><content>one</content><content>two</content></DocumRoller></DocumRollers>";
        assert_eq!(read_items(markup).expect("unknown elements are skipped"), vec!["one"]);
    }

    #[test]
    fn empty_content_element_is_empty_text() {
        let markup = "<DocumRollers><DocumRoller><content/></DocumRoller></DocumRollers>";
        assert_eq!(read_items(markup).expect("empty content should read"), vec![String::new()]);
    }

    #[test]
    fn missing_root_is_reported() {
        let err = read_items("<Items><DocumRoller><content>x</content></DocumRoller></Items>")
            .expect_err("wrong root must be rejected");
        assert_eq!(err, MarkupError::MissingRoot);
        assert_eq!(read_items("").expect_err("empty input has no root"), MarkupError::MissingRoot);
    }

    #[test]
    fn missing_content_reports_item_position() {
        let markup = "<DocumRollers><DocumRoller><content>ok</content></DocumRoller><DocumRoller><body>x</body></DocumRoller></DocumRollers>";
        assert_eq!(
            read_items(markup).expect_err("second item lacks content"),
            MarkupError::MissingContent { item: 1 }
        );
    }

    #[test]
    fn document_marks_items_without_content() {
        let markup = "<DocumRollers><DocumRoller><content>a</content></DocumRoller><DocumRoller/><DocumRoller><content>c</content></DocumRoller></DocumRollers>";
        assert_eq!(
            read_document(markup).expect("well-formed document"),
            vec![Some("a".to_string()), None, Some("c".to_string())]
        );
    }

    #[test]
    fn ill_formed_tail_is_reported_before_missing_content() {
        let markup = "<DocumRollers><DocumRoller/><DocumRoller><content>x</content>";
        assert!(matches!(read_document(markup), Err(MarkupError::Malformed(_))));
        assert!(matches!(read_items(markup), Err(MarkupError::Malformed(_))));
    }

    #[test]
    fn ill_formed_documents_are_malformed() {
        let mismatched = read_items("<DocumRollers><DocumRoller></DocumRollers>")
            .expect_err("mismatched close must fail");
        assert!(matches!(mismatched, MarkupError::Malformed(_)));

        let unclosed =
            read_items("<DocumRollers><DocumRoller>").expect_err("unclosed item must fail");
        assert!(matches!(unclosed, MarkupError::Malformed(_)));
    }
}
