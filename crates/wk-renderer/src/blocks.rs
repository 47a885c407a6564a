//! Block segmentation.
//!
//! Partitions inline-expanded text into headings, list groups, paragraphs and
//! blank-line markers, then renders them to an HTML fragment.
//!
//! Boundaries come only from line-start markers and blank lines:
//!
//! | Line                | Block                                  |
//! |---------------------|----------------------------------------|
//! | `*** text`          | sub-heading (`<h4>`)                   |
//! | `** text`           | heading (`<h3>`)                       |
//! | `- term`            | list item, merged into the current group |
//! | other, inside a list | description line of the last item      |
//! | other               | paragraph line                         |
//! | blank               | block separator                        |
//!
//! One blank line separates blocks. Every further blank line in the same run
//! renders as a visible blank-line marker. Blank lines before the first and
//! after the last block are dropped.

use std::fmt::Write;

use crate::macros::LINE_BREAK;

const SUBHEADING_MARKER: &str = "***";
const HEADING_MARKER: &str = "**";
const LIST_MARKER: &str = "- ";

/// Class attribute of the blank-line marker element.
pub const BLANK_LINE_CLASS: &str = "blank-line";
/// Class attribute of a list item description.
pub const DESCRIPTION_CLASS: &str = "description";

/// Fragment prefixes a paragraph is passed through unchanged for.
const FRAGMENT_PREFIXES: [&str; 4] = ["<h", "<ul", "<li", LINE_BREAK];

/// Heading level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeadingLevel {
    /// `**` heading, rendered as `<h3>`.
    Section,
    /// `***` heading, rendered as `<h4>`.
    Subsection,
}

impl HeadingLevel {
    /// HTML tag name for this level.
    #[must_use]
    pub fn tag(self) -> &'static str {
        match self {
            Self::Section => "h3",
            Self::Subsection => "h4",
        }
    }
}

/// A list entry: a term with optional multi-line description.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListItem {
    /// Text after the `- ` marker.
    pub term: String,
    /// Non-marker lines following the entry, newline-joined.
    pub description: Option<String>,
}

/// A structural unit of rendered output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    /// Heading line.
    Heading {
        /// `**` or `***`.
        level: HeadingLevel,
        /// Heading text.
        text: String,
    },
    /// Maximal run of consecutive list entries.
    List(Vec<ListItem>),
    /// Lines of one paragraph.
    Paragraph(Vec<String>),
    /// Intentional vertical whitespace.
    Blank,
}

/// Accumulates blocks while scanning lines.
#[derive(Default)]
struct Segmenter {
    blocks: Vec<Block>,
    paragraph: Vec<String>,
    list: Vec<ListItem>,
    blank_run: usize,
}

impl Segmenter {
    fn flush(&mut self) {
        if !self.paragraph.is_empty() {
            self.blocks
                .push(Block::Paragraph(std::mem::take(&mut self.paragraph)));
        }
        if !self.list.is_empty() {
            self.blocks.push(Block::List(std::mem::take(&mut self.list)));
        }
    }

    /// Emit blank markers for a finished run of blank lines.
    fn end_blank_run(&mut self) {
        if self.blank_run > 1 && !self.blocks.is_empty() {
            self.blocks
                .extend(std::iter::repeat_n(Block::Blank, self.blank_run - 1));
        }
        self.blank_run = 0;
    }

    fn line(&mut self, line: &str) {
        if line.trim().is_empty() {
            self.flush();
            self.blank_run += 1;
            return;
        }
        self.end_blank_run();

        if let Some((level, text)) = parse_heading(line) {
            self.flush();
            self.blocks.push(Block::Heading {
                level,
                text: text.to_owned(),
            });
        } else if let Some(term) = parse_list_entry(line) {
            if !self.paragraph.is_empty() {
                self.flush();
            }
            self.list.push(ListItem {
                term: term.to_owned(),
                description: None,
            });
        } else if let Some(item) = self.list.last_mut() {
            match &mut item.description {
                Some(description) => {
                    description.push('\n');
                    description.push_str(line);
                }
                None => item.description = Some(line.to_owned()),
            }
        } else {
            self.paragraph.push(line.to_owned());
        }
    }

    fn finish(mut self) -> Vec<Block> {
        self.flush();
        self.blocks
    }
}

/// Match a heading line. `***` is tried before `**`, which it also matches.
fn parse_heading(line: &str) -> Option<(HeadingLevel, &str)> {
    [
        (SUBHEADING_MARKER, HeadingLevel::Subsection),
        (HEADING_MARKER, HeadingLevel::Section),
    ]
    .into_iter()
    .find_map(|(marker, level)| {
        let text = line.strip_prefix(marker)?.trim_start();
        (!text.is_empty()).then_some((level, text))
    })
}

/// Match a list entry line, returning its term.
fn parse_list_entry(line: &str) -> Option<&str> {
    line.strip_prefix(LIST_MARKER)
        .filter(|term| !term.trim().is_empty())
}

/// Split inline-expanded text into blocks in source order.
#[must_use]
pub fn segment(text: &str) -> Vec<Block> {
    let mut segmenter = Segmenter::default();
    for line in text.lines() {
        segmenter.line(line);
    }
    segmenter.finish()
}

/// Render blocks to an HTML fragment, one block per line.
#[must_use]
pub fn render_blocks(blocks: &[Block]) -> String {
    let mut out = String::new();
    for (i, block) in blocks.iter().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        render_block(block, &mut out);
    }
    out
}

fn render_block(block: &Block, out: &mut String) {
    match block {
        Block::Heading { level, text } => {
            let tag = level.tag();
            write!(out, "<{tag}>{text}</{tag}>").unwrap();
        }
        Block::List(items) => {
            out.push_str("<ul>");
            for item in items {
                render_list_item(item, out);
            }
            out.push_str("</ul>");
        }
        Block::Paragraph(lines) => render_paragraph(lines, out),
        Block::Blank => {
            write!(out, r#"<p class="{BLANK_LINE_CLASS}">{LINE_BREAK}</p>"#).unwrap();
        }
    }
}

fn render_list_item(item: &ListItem, out: &mut String) {
    out.push_str("<li>");
    out.push_str(&item.term);
    if let Some(description) = &item.description {
        write!(
            out,
            r#"<div class="{DESCRIPTION_CLASS}">{}</div>"#,
            description.replace('\n', LINE_BREAK)
        )
        .unwrap();
    }
    out.push_str("</li>");
}

/// Wrap a paragraph in `<p>`, turning embedded newlines into line breaks.
///
/// Text that already starts with block or line-break markup passes through.
fn render_paragraph(lines: &[String], out: &mut String) {
    let joined = lines.join("\n");
    let text = joined.trim();
    if FRAGMENT_PREFIXES.iter().any(|p| text.starts_with(*p)) {
        out.push_str(text);
    } else {
        write!(out, "<p>{}</p>", text.replace('\n', LINE_BREAK)).unwrap();
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn paragraph(lines: &[&str]) -> Block {
        Block::Paragraph(lines.iter().map(|l| (*l).to_owned()).collect())
    }

    fn item(term: &str, description: Option<&str>) -> ListItem {
        ListItem {
            term: term.to_owned(),
            description: description.map(str::to_owned),
        }
    }

    #[test]
    fn test_plain_text_is_one_paragraph() {
        let blocks = segment("line one\nline two");

        assert_eq!(blocks, vec![paragraph(&["line one", "line two"])]);
        assert_eq!(render_blocks(&blocks), "<p>line one<br>line two</p>");
    }

    #[test]
    fn test_subheading_takes_precedence() {
        let blocks = segment("*** Sub");

        assert_eq!(
            blocks,
            vec![Block::Heading {
                level: HeadingLevel::Subsection,
                text: "Sub".to_owned()
            }]
        );
        assert_eq!(render_blocks(&blocks), "<h4>Sub</h4>");
    }

    #[test]
    fn test_heading() {
        assert_eq!(render_blocks(&segment("**Title")), "<h3>Title</h3>");
        assert_eq!(render_blocks(&segment("**   Title")), "<h3>Title</h3>");
    }

    #[test]
    fn test_bare_marker_falls_back_to_shorter_heading() {
        assert_eq!(render_blocks(&segment("***")), "<h3>*</h3>");
        assert_eq!(render_blocks(&segment("**")), "<p>**</p>");
    }

    #[test]
    fn test_heading_splits_paragraph() {
        let blocks = segment("before\n** Title\nafter");

        assert_eq!(
            render_blocks(&blocks),
            "<p>before</p>\n<h3>Title</h3>\n<p>after</p>"
        );
    }

    #[test]
    fn test_list_with_description() {
        let blocks = segment("- A\ndescription\n- B");

        assert_eq!(
            blocks,
            vec![Block::List(vec![
                item("A", Some("description")),
                item("B", None)
            ])]
        );
        assert_eq!(
            render_blocks(&blocks),
            r#"<ul><li>A<div class="description">description</div></li><li>B</li></ul>"#
        );
    }

    #[test]
    fn test_list_multi_line_description() {
        let blocks = segment("- A\nfirst\nsecond");

        assert_eq!(
            blocks,
            vec![Block::List(vec![item("A", Some("first\nsecond"))])]
        );
        assert_eq!(
            render_blocks(&blocks),
            r#"<ul><li>A<div class="description">first<br>second</div></li></ul>"#
        );
    }

    #[test]
    fn test_blank_line_ends_list() {
        let blocks = segment("- A\n\n- B");

        assert_eq!(
            blocks,
            vec![
                Block::List(vec![item("A", None)]),
                Block::List(vec![item("B", None)])
            ]
        );
    }

    #[test]
    fn test_heading_ends_list() {
        let blocks = segment("- A\n** H\n- B");

        assert_eq!(blocks.len(), 3);
        assert!(matches!(blocks[1], Block::Heading { .. }));
    }

    #[test]
    fn test_paragraph_then_list() {
        let blocks = segment("intro\n- A");

        assert_eq!(
            blocks,
            vec![paragraph(&["intro"]), Block::List(vec![item("A", None)])]
        );
    }

    #[test]
    fn test_dash_without_space_is_text() {
        assert_eq!(render_blocks(&segment("-A")), "<p>-A</p>");
        assert_eq!(render_blocks(&segment("- ")), "<p>-</p>");
    }

    #[test]
    fn test_single_blank_line_separates_paragraphs() {
        let blocks = segment("one\n\ntwo");

        assert_eq!(blocks, vec![paragraph(&["one"]), paragraph(&["two"])]);
        assert_eq!(render_blocks(&blocks), "<p>one</p>\n<p>two</p>");
    }

    #[test]
    fn test_two_blank_lines_keep_marker() {
        let blocks = segment("one\n\n\ntwo");

        assert_eq!(
            blocks,
            vec![paragraph(&["one"]), Block::Blank, paragraph(&["two"])]
        );
        assert_eq!(
            render_blocks(&blocks),
            "<p>one</p>\n<p class=\"blank-line\"><br></p>\n<p>two</p>"
        );
    }

    #[test]
    fn test_whitespace_only_lines_are_blank() {
        let blocks = segment("one\n  \n\t\ntwo");

        assert_eq!(
            blocks,
            vec![paragraph(&["one"]), Block::Blank, paragraph(&["two"])]
        );
    }

    #[test]
    fn test_leading_and_trailing_blank_lines_dropped() {
        let blocks = segment("\n\n\none\n\n\n");

        assert_eq!(blocks, vec![paragraph(&["one"])]);
    }

    #[test]
    fn test_crlf_line_endings() {
        let blocks = segment("one\r\n\r\n\r\ntwo\r\n");

        assert_eq!(
            blocks,
            vec![paragraph(&["one"]), Block::Blank, paragraph(&["two"])]
        );
    }

    #[test]
    fn test_line_break_fragment_passes_through() {
        let blocks = segment("<br>after break\nnext");

        assert_eq!(render_blocks(&blocks), "<br>after break\nnext");
    }

    #[test]
    fn test_paragraph_is_trimmed() {
        assert_eq!(render_blocks(&segment("  padded  ")), "<p>padded</p>");
    }

    #[test]
    fn test_empty_input() {
        assert!(segment("").is_empty());
        assert_eq!(render_blocks(&[]), "");
    }

    #[test]
    fn test_placeholder_line_is_paragraph() {
        let text = crate::link::placeholder(0);

        assert_eq!(segment(&text), vec![paragraph(&[text.as_str()])]);
    }
}
