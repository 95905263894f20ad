//! Text Formatter
//!
//! Converts raw answer text into structured display blocks. Answers from the
//! reasoning service use a tiny subset of markdown: `### ` headings and `- `
//! list items. Everything else is a paragraph.
//!
//! This is deliberately not a markdown parser. There is no nesting, no
//! inline emphasis and no links. One input line always yields exactly one
//! block, so surfaces can rely on a stable line-to-block mapping.
//!
//! # Example
//!
//! ```
//! use insight_conductor::format::{format_text, DisplayBlock};
//!
//! let blocks = format_text("### Result\n- north\nplain");
//! assert_eq!(blocks, vec![
//!     DisplayBlock::Heading("Result".to_string()),
//!     DisplayBlock::ListItem("north".to_string()),
//!     DisplayBlock::Paragraph("plain".to_string()),
//! ]);
//! ```

use serde::{Deserialize, Serialize};

/// Line prefix that marks a heading
pub const HEADING_MARKER: &str = "### ";

/// Line prefix that marks a list item
pub const LIST_MARKER: &str = "- ";

/// A structured rendering unit derived from one line of message text
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DisplayBlock {
    /// A `### ` line with the marker removed
    Heading(String),
    /// A `- ` line with the marker removed
    ListItem(String),
    /// Any other line, verbatim (may be empty)
    Paragraph(String),
}

impl DisplayBlock {
    /// Classify a single line
    #[must_use]
    pub fn from_line(line: &str) -> Self {
        if let Some(rest) = line.strip_prefix(HEADING_MARKER) {
            Self::Heading(rest.to_string())
        } else if let Some(rest) = line.strip_prefix(LIST_MARKER) {
            Self::ListItem(rest.to_string())
        } else {
            Self::Paragraph(line.to_string())
        }
    }

    /// The block's text without any marker
    #[must_use]
    pub fn text(&self) -> &str {
        match self {
            Self::Heading(text) | Self::ListItem(text) | Self::Paragraph(text) => text,
        }
    }
}

/// Lazily format text, one block per `\n`-separated line
pub fn blocks(text: &str) -> impl Iterator<Item = DisplayBlock> + '_ {
    text.split('\n').map(DisplayBlock::from_line)
}

/// Format text into an owned block list
///
/// Total over all inputs: the empty string yields a single empty paragraph.
#[must_use]
pub fn format_text(text: &str) -> Vec<DisplayBlock> {
    blocks(text).collect()
}

/// A display block after list grouping
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum BlockGroup {
    /// A heading or paragraph, passed through unchanged
    Single(DisplayBlock),
    /// A run of adjacent list items
    List(Vec<String>),
}

/// Merge runs of adjacent list items into list groups
///
/// This is a second pass over formatter output; parsing is unaffected.
#[must_use]
pub fn group_blocks(blocks: &[DisplayBlock]) -> Vec<BlockGroup> {
    let mut groups: Vec<BlockGroup> = Vec::with_capacity(blocks.len());

    for block in blocks {
        match block {
            DisplayBlock::ListItem(item) => {
                if let Some(BlockGroup::List(items)) = groups.last_mut() {
                    items.push(item.clone());
                } else {
                    groups.push(BlockGroup::List(vec![item.clone()]));
                }
            }
            other => groups.push(BlockGroup::Single(other.clone())),
        }
    }

    groups
}
