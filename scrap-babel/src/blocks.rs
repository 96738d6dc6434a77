//! Block payloads of the target page API.
//!
//! The serde shape follows the API's JSON: every block is an object tagged by
//! `type` whose payload sits under a key of the same name, e.g.
//! `{"type":"paragraph","paragraph":{"rich_text":[...]}}`. Container kinds carry
//! an explicit optional `children` slot so the flattener can detach nested
//! content without probing fields at runtime.

use serde::{Deserialize, Serialize};

/// Styling flags of a rich-text run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Annotations {
    #[serde(default)]
    pub bold: bool,
    #[serde(default)]
    pub italic: bool,
    #[serde(default)]
    pub strikethrough: bool,
    #[serde(default)]
    pub underline: bool,
    #[serde(default)]
    pub code: bool,
    #[serde(default = "default_color")]
    pub color: String,
}

fn default_color() -> String {
    "default".to_string()
}

impl Default for Annotations {
    fn default() -> Self {
        Self {
            bold: false,
            italic: false,
            strikethrough: false,
            underline: false,
            code: false,
            color: default_color(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunKind {
    Text,
    Equation,
    /// Reference to another object; only ever read back from the API
    Mention,
}

/// Atomic styled fragment of text.
///
/// Serialized through [`WireRun`] so the in-memory form stays flat while the
/// JSON matches the API (`{"type":"text","text":{"content":..,"link":..}}`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "WireRun", from = "WireRun")]
pub struct RichTextRun {
    pub kind: RunKind,
    pub content: String,
    pub annotations: Annotations,
    pub link: Option<String>,
}

impl RichTextRun {
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            kind: RunKind::Text,
            content: content.into(),
            annotations: Annotations::default(),
            link: None,
        }
    }

    pub fn equation(expression: impl Into<String>) -> Self {
        Self {
            kind: RunKind::Equation,
            content: expression.into(),
            annotations: Annotations::default(),
            link: None,
        }
    }

    pub fn with_link(mut self, link: impl Into<String>) -> Self {
        self.link = Some(link.into());
        self
    }
}

#[derive(Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum WireRun {
    Text {
        text: WireText,
        #[serde(default)]
        annotations: Annotations,
    },
    Equation {
        equation: WireEquation,
        #[serde(default)]
        annotations: Annotations,
    },
    Mention {
        #[serde(default)]
        plain_text: String,
        #[serde(default)]
        href: Option<String>,
        #[serde(default)]
        annotations: Annotations,
    },
}

#[derive(Serialize, Deserialize)]
struct WireText {
    content: String,
    #[serde(default)]
    link: Option<WireLink>,
}

#[derive(Serialize, Deserialize)]
struct WireLink {
    url: String,
}

#[derive(Serialize, Deserialize)]
struct WireEquation {
    expression: String,
}

impl From<RichTextRun> for WireRun {
    fn from(run: RichTextRun) -> Self {
        match run.kind {
            RunKind::Equation => WireRun::Equation {
                equation: WireEquation {
                    expression: run.content,
                },
                annotations: run.annotations,
            },
            // Mentions cannot be written back; they degrade to linked text.
            RunKind::Text | RunKind::Mention => WireRun::Text {
                text: WireText {
                    content: run.content,
                    link: run.link.map(|url| WireLink { url }),
                },
                annotations: run.annotations,
            },
        }
    }
}

impl From<WireRun> for RichTextRun {
    fn from(wire: WireRun) -> Self {
        match wire {
            WireRun::Text { text, annotations } => RichTextRun {
                kind: RunKind::Text,
                content: text.content,
                annotations,
                link: text.link.map(|l| l.url),
            },
            WireRun::Equation {
                equation,
                annotations,
            } => RichTextRun {
                kind: RunKind::Equation,
                content: equation.expression,
                annotations,
                link: None,
            },
            WireRun::Mention {
                plain_text,
                href,
                annotations,
            } => RichTextRun {
                kind: RunKind::Mention,
                content: plain_text,
                annotations,
                link: href,
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExternalUrl {
    pub url: String,
}

/// Page or callout icon.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Icon {
    Emoji { emoji: String },
    External { external: ExternalUrl },
    File { file: ExternalUrl },
}

impl Icon {
    pub fn emoji(emoji: impl Into<String>) -> Self {
        Icon::Emoji {
            emoji: emoji.into(),
        }
    }

    pub fn external(url: impl Into<String>) -> Self {
        Icon::External {
            external: ExternalUrl { url: url.into() },
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Empty {}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextBody {
    #[serde(default)]
    pub rich_text: Vec<RichTextRun>,
}

/// Payload of the container kinds (list items, quote, toggle).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NestedBody {
    #[serde(default)]
    pub rich_text: Vec<RichTextRun>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<Block>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalloutBody {
    #[serde(default)]
    pub rich_text: Vec<RichTextRun>,
    #[serde(default = "default_color")]
    pub color: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<Icon>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<Block>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToDoBody {
    #[serde(default)]
    pub rich_text: Vec<RichTextRun>,
    #[serde(default)]
    pub checked: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<Block>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeBody {
    pub language: String,
    #[serde(default)]
    pub rich_text: Vec<RichTextRun>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EquationBody {
    pub expression: String,
}

/// Payload of bookmark and embed blocks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UrlBody {
    pub url: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub caption: Vec<RichTextRun>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FileSource {
    External { external: ExternalUrl },
    File { file: ExternalUrl },
}

impl FileSource {
    pub fn url(&self) -> &str {
        match self {
            FileSource::External { external } => &external.url,
            FileSource::File { file } => &file.url,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileBody {
    #[serde(flatten)]
    pub source: FileSource,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub caption: Vec<RichTextRun>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableBody {
    pub table_width: usize,
    #[serde(default)]
    pub has_column_header: bool,
    #[serde(default)]
    pub has_row_header: bool,
    #[serde(default)]
    pub children: Vec<Block>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableRowBody {
    #[serde(default)]
    pub cells: Vec<Vec<RichTextRun>>,
}

/// One block of page content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Block {
    #[serde(rename = "paragraph")]
    Paragraph { paragraph: TextBody },
    #[serde(rename = "heading_1")]
    Heading1 { heading_1: TextBody },
    #[serde(rename = "heading_2")]
    Heading2 { heading_2: TextBody },
    #[serde(rename = "heading_3")]
    Heading3 { heading_3: TextBody },
    #[serde(rename = "bulleted_list_item")]
    BulletedListItem { bulleted_list_item: NestedBody },
    #[serde(rename = "numbered_list_item")]
    NumberedListItem { numbered_list_item: NestedBody },
    #[serde(rename = "quote")]
    Quote { quote: NestedBody },
    #[serde(rename = "toggle")]
    Toggle { toggle: NestedBody },
    #[serde(rename = "to_do")]
    ToDo { to_do: ToDoBody },
    #[serde(rename = "callout")]
    Callout { callout: CalloutBody },
    #[serde(rename = "divider")]
    Divider { divider: Empty },
    #[serde(rename = "table_of_contents")]
    TableOfContents { table_of_contents: Empty },
    #[serde(rename = "table")]
    Table { table: TableBody },
    #[serde(rename = "table_row")]
    TableRow { table_row: TableRowBody },
    #[serde(rename = "code")]
    Code { code: CodeBody },
    #[serde(rename = "equation")]
    Equation { equation: EquationBody },
    #[serde(rename = "bookmark")]
    Bookmark { bookmark: UrlBody },
    #[serde(rename = "embed")]
    Embed { embed: UrlBody },
    #[serde(rename = "image")]
    Image { image: FileBody },
    /// Any block type this crate does not model
    #[serde(rename = "unsupported", other)]
    Unsupported,
}

impl Block {
    pub fn paragraph(rich_text: Vec<RichTextRun>) -> Self {
        Block::Paragraph {
            paragraph: TextBody { rich_text },
        }
    }

    /// Paragraph without text, used as a visual spacer.
    pub fn blank() -> Self {
        Self::paragraph(Vec::new())
    }

    pub fn divider() -> Self {
        Block::Divider {
            divider: Empty::default(),
        }
    }

    pub fn bookmark(url: impl Into<String>) -> Self {
        Block::Bookmark {
            bookmark: UrlBody {
                url: url.into(),
                caption: Vec::new(),
            },
        }
    }

    pub fn embed(url: impl Into<String>) -> Self {
        Block::Embed {
            embed: UrlBody {
                url: url.into(),
                caption: Vec::new(),
            },
        }
    }

    pub fn external_image(url: impl Into<String>) -> Self {
        Block::Image {
            image: FileBody {
                source: FileSource::External {
                    external: ExternalUrl { url: url.into() },
                },
                caption: Vec::new(),
            },
        }
    }

    pub fn quote(rich_text: Vec<RichTextRun>, children: Option<Vec<Block>>) -> Self {
        Block::Quote {
            quote: NestedBody {
                rich_text,
                children,
            },
        }
    }

    pub fn callout(rich_text: Vec<RichTextRun>, color: &str, children: Option<Vec<Block>>) -> Self {
        Block::Callout {
            callout: CalloutBody {
                rich_text,
                color: color.to_string(),
                icon: None,
                children,
            },
        }
    }

    /// API name of this block's type.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Block::Paragraph { .. } => "paragraph",
            Block::Heading1 { .. } => "heading_1",
            Block::Heading2 { .. } => "heading_2",
            Block::Heading3 { .. } => "heading_3",
            Block::BulletedListItem { .. } => "bulleted_list_item",
            Block::NumberedListItem { .. } => "numbered_list_item",
            Block::Quote { .. } => "quote",
            Block::Toggle { .. } => "toggle",
            Block::ToDo { .. } => "to_do",
            Block::Callout { .. } => "callout",
            Block::Divider { .. } => "divider",
            Block::TableOfContents { .. } => "table_of_contents",
            Block::Table { .. } => "table",
            Block::TableRow { .. } => "table_row",
            Block::Code { .. } => "code",
            Block::Equation { .. } => "equation",
            Block::Bookmark { .. } => "bookmark",
            Block::Embed { .. } => "embed",
            Block::Image { .. } => "image",
            Block::Unsupported => "unsupported",
        }
    }

    /// Kinds whose children count toward the inline nesting limit.
    pub fn is_nestable(&self) -> bool {
        matches!(
            self,
            Block::BulletedListItem { .. }
                | Block::NumberedListItem { .. }
                | Block::Quote { .. }
                | Block::Toggle { .. }
                | Block::Callout { .. }
        )
    }

    pub fn rich_text(&self) -> Option<&[RichTextRun]> {
        match self {
            Block::Paragraph { paragraph: body }
            | Block::Heading1 { heading_1: body }
            | Block::Heading2 { heading_2: body }
            | Block::Heading3 { heading_3: body } => Some(&body.rich_text),
            Block::BulletedListItem {
                bulleted_list_item: body,
            }
            | Block::NumberedListItem {
                numbered_list_item: body,
            }
            | Block::Quote { quote: body }
            | Block::Toggle { toggle: body } => Some(&body.rich_text),
            Block::ToDo { to_do } => Some(&to_do.rich_text),
            Block::Callout { callout } => Some(&callout.rich_text),
            Block::Code { code } => Some(&code.rich_text),
            _ => None,
        }
    }

    /// Nested children of the nestable kinds.
    pub fn children(&self) -> Option<&[Block]> {
        let children = match self {
            Block::BulletedListItem {
                bulleted_list_item: body,
            }
            | Block::NumberedListItem {
                numbered_list_item: body,
            }
            | Block::Quote { quote: body }
            | Block::Toggle { toggle: body } => body.children.as_ref(),
            Block::ToDo { to_do } => to_do.children.as_ref(),
            Block::Callout { callout } => callout.children.as_ref(),
            _ => None,
        };
        children.map(|c| c.as_slice())
    }

    fn children_slot(&mut self) -> Option<&mut Option<Vec<Block>>> {
        match self {
            Block::BulletedListItem {
                bulleted_list_item: body,
            }
            | Block::NumberedListItem {
                numbered_list_item: body,
            }
            | Block::Quote { quote: body }
            | Block::Toggle { toggle: body } => Some(&mut body.children),
            Block::ToDo { to_do } => Some(&mut to_do.children),
            Block::Callout { callout } => Some(&mut callout.children),
            _ => None,
        }
    }

    /// Detach and return the children, leaving the payload childless.
    pub fn take_children(&mut self) -> Option<Vec<Block>> {
        self.children_slot().and_then(|slot| slot.take())
    }

    /// Attach children to a container kind. Returns them back if this kind
    /// cannot hold children.
    pub fn set_children(&mut self, children: Vec<Block>) -> Result<(), Vec<Block>> {
        match self.children_slot() {
            Some(slot) => {
                *slot = if children.is_empty() {
                    None
                } else {
                    Some(children)
                };
                Ok(())
            }
            None => Err(children),
        }
    }

    /// An empty paragraph.
    pub fn is_blank(&self) -> bool {
        matches!(self, Block::Paragraph { paragraph } if paragraph.rich_text.is_empty())
    }
}
