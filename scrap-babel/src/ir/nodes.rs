//! Core data structures for the Intermediate Representation (IR).

use crate::blocks::{Block, RichTextRun};

/// A block as classified by the tokenizer, before it becomes an API payload.
#[derive(Debug, Clone, PartialEq)]
pub enum IntermediateBlock {
    /// Level 1 to 3; deeper source headings are collapsed to 3
    Heading { level: u8, text: String },
    /// Intentional blank line
    LineBreak,
    Divider,
    Paragraph(Paragraph),
    ListItem { kind: ListKind, body: Container },
    Blockquote(Container),
    Details(Container),
    Footnote(Container),
    Callout { kind: CalloutKind, body: Container },
    Bookmark { url: String },
    Image { url: String },
    Embed { url: String },
    /// Plain callout standing in for content that could not be converted
    Notice { text: String },
    Code { text: String, language: String },
    Table { rows: Vec<Vec<String>> },
    Equation { expression: String },
}

/// Represents a paragraph of text.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Paragraph {
    pub runs: Vec<RichTextRun>,
}

impl Paragraph {
    pub fn new(runs: Vec<RichTextRun>) -> Self {
        Self { runs }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListKind {
    Bulleted,
    Numbered,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CalloutKind {
    Message,
    Alert,
}

/// Content of a container split into its first line and nested children.
///
/// `firstline` is set only when the first child was a plain paragraph; in
/// every other case all children stay in `children`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Container {
    pub firstline: Option<Paragraph>,
    pub children: Option<Vec<Block>>,
}

impl Container {
    /// Split tokenized contents into first line and children.
    ///
    /// Empty contents yield an empty first line so the container still
    /// renders as a line of its own.
    pub fn arrange(mut contents: Vec<Block>) -> Self {
        if contents.is_empty() {
            return Container {
                firstline: Some(Paragraph::default()),
                children: None,
            };
        }
        match contents.remove(0) {
            Block::Paragraph { paragraph } => Container {
                firstline: Some(Paragraph::new(paragraph.rich_text)),
                children: if contents.is_empty() {
                    None
                } else {
                    Some(contents)
                },
            },
            other => {
                contents.insert(0, other);
                Container {
                    firstline: None,
                    children: Some(contents),
                }
            }
        }
    }

    /// Container with a fixed first line.
    pub fn with_firstline(runs: Vec<RichTextRun>, children: Vec<Block>) -> Self {
        Container {
            firstline: Some(Paragraph::new(runs)),
            children: if children.is_empty() {
                None
            } else {
                Some(children)
            },
        }
    }

    /// First-line runs, empty when there is no first line.
    pub fn into_parts(self) -> (Vec<RichTextRun>, Option<Vec<Block>>) {
        let runs = self.firstline.map(|p| p.runs).unwrap_or_default();
        (runs, self.children)
    }
}
