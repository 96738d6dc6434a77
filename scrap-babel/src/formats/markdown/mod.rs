//! Blocks → Markdown extraction
//!
//! Renders page blocks (as read back from the page API, or as reassembled
//! from a converted page) into zenn-flavoured Markdown.
//!
//! # Element Mapping Table
//!
//! | Block                 | Markdown                                  |
//! |-----------------------|-------------------------------------------|
//! | paragraph             | rich text; empty → `blank_paragraph`      |
//! | heading_1..3          | `#`..`###`, preceded by an empty line     |
//! | bulleted / toggle     | `- item`                                  |
//! | numbered              | `1. item`                                 |
//! | to_do                 | `- [ ] item` / `- [x] item`               |
//! | quote                 | `> text`                                  |
//! | code                  | fenced block with the language            |
//! | equation              | `$$` fence                                |
//! | divider               | `------`                                  |
//! | image                 | `![caption](<url>)`                       |
//! | bookmark / embed      | bare URL on its own line                  |
//! | callout               | `:::message` fence, icon prefixed         |
//! | table                 | pipe table                                |
//! | table_of_contents     | linked list of the page's headings        |
//!
//! Rich text wraps code, bold, italic and strikethrough in that order;
//! equations become `$…$`; links `[text](url)`.
//!
//! Children are indented two spaces per level. Children of a heading (toggle
//! headings) stay at the heading's level.

use crate::blocks::{Block, Icon, RichTextRun, RunKind};
use crate::common::flat_to_nested::reassemble;
use crate::error::ConvertError;
use crate::options::ExtractOptions;
use crate::page::PageDescriptor;
use regex::Regex;
use serde_json::Value;
use std::sync::LazyLock;

const TOC_PLACEHOLDER: &str = "\u{0}TABLE_OF_CONTENTS\u{0}";
const INACCESSIBLE_PAGE: &str = "Integration-cannot-access page";

static HEADING_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^ *(#{1,3}) (.+)$").unwrap());
static ASCII_PUNCTUATION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"[!@#$%^&*()+|~=\\`\[\]{};':",./<>?]"#).unwrap());
static WIDE_PUNCTUATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[！＠＃＄％＾＆＊（）＋｜〜＝￥｀「」｛｝；’：”、。・＜＞？【】『』《》〔〕［］‹›«»〘〙〚〛]")
        .unwrap()
});

/// Render `blocks` as one Markdown document.
pub fn blocks_to_markdown(blocks: &[Block], options: &ExtractOptions) -> String {
    let renderer = Renderer { options };
    let markdown = blocks
        .iter()
        .map(|block| renderer.block(block, 0))
        .collect::<Vec<_>>()
        .join("\n");
    if markdown.contains(TOC_PLACEHOLDER) {
        markdown.replace(TOC_PLACEHOLDER, &table_of_contents(&markdown))
    } else {
        markdown
    }
}

/// Read blocks from JSON.
///
/// Accepts a bare array of blocks, a children listing (`{"results": [...]}`)
/// or a converted page descriptor, whose flat records are reassembled first.
pub fn load_blocks(json: &str) -> Result<Vec<Block>, ConvertError> {
    let value: Value = serde_json::from_str(json)?;
    if value.get("topblock_ids").is_some() {
        let page: PageDescriptor<Value> = serde_json::from_value(value)?;
        return reassemble(&page.topblock_ids, &page.children_ids, &page.data);
    }
    match value {
        Value::Array(_) => Ok(serde_json::from_value(value)?),
        Value::Object(mut map) => match map.remove("results") {
            Some(results) => Ok(serde_json::from_value(results)?),
            None => Err(ConvertError::InvalidInput(
                "expected a block array, a children listing or a page descriptor".to_string(),
            )),
        },
        _ => Err(ConvertError::InvalidInput(
            "expected a JSON array or object".to_string(),
        )),
    }
}

struct Renderer<'a> {
    options: &'a ExtractOptions,
}

impl Renderer<'_> {
    fn block(&self, block: &Block, depth: usize) -> String {
        let tabs = "  ".repeat(depth);
        let mut child_depth = depth + 1;
        let text = match block {
            Block::Paragraph { paragraph } => format!("{tabs}{}", self.runs(&paragraph.rich_text)),
            Block::Heading1 { heading_1: body }
            | Block::Heading2 { heading_2: body }
            | Block::Heading3 { heading_3: body } => {
                child_depth = depth;
                let marks = match block {
                    Block::Heading1 { .. } => "#",
                    Block::Heading2 { .. } => "##",
                    _ => "###",
                };
                format!("\n{tabs}{marks} {}", self.runs(&body.rich_text))
            }
            Block::BulletedListItem {
                bulleted_list_item: body,
            }
            | Block::Toggle { toggle: body } => format!("{tabs}- {}", self.runs(&body.rich_text)),
            Block::NumberedListItem {
                numbered_list_item: body,
            } => format!("{tabs}1. {}", self.runs(&body.rich_text)),
            Block::ToDo { to_do } => {
                let mark = if to_do.checked { "[x]" } else { "[ ]" };
                format!("{tabs}- {mark} {}", self.runs(&to_do.rich_text))
            }
            Block::Quote { quote } => format!("{tabs}> {}\n", self.runs(&quote.rich_text)),
            Block::Code { code } => format!(
                "\n{tabs}```{}\n{tabs}{}\n{tabs}```\n",
                code.language,
                self.runs(&code.rich_text)
            ),
            Block::Equation { equation } => {
                format!("\n{tabs}$$\n{tabs}{}\n{tabs}$$\n", equation.expression)
            }
            Block::Divider { .. } => format!("\n{tabs}------"),
            Block::Image { image } => {
                let mut caption = self.runs(&image.caption);
                if caption == self.options.blank_paragraph {
                    caption = "image".to_string();
                }
                format!("\n{tabs}![{caption}](<{}>)", image.source.url())
            }
            Block::Bookmark { bookmark: body } | Block::Embed { embed: body } => {
                format!("\n{tabs}{}\n", body.url)
            }
            Block::Callout { .. } => return self.callout(block, depth),
            Block::Table { table } => {
                return self.table(
                    &table.children,
                    table.has_column_header,
                    table.table_width,
                    &tabs,
                )
            }
            Block::TableRow { table_row } => format!("{tabs}| {} |", self.cells(&table_row.cells)),
            Block::TableOfContents { .. } => return TOC_PLACEHOLDER.to_string(),
            Block::Unsupported => format!("{tabs}unsupported block"),
        };
        self.with_children(text, block.children(), child_depth)
    }

    fn with_children(&self, mut text: String, children: Option<&[Block]>, depth: usize) -> String {
        for child in children.unwrap_or_default() {
            text.push('\n');
            text.push_str(&self.block(child, depth));
        }
        text
    }

    fn callout(&self, block: &Block, depth: usize) -> String {
        let Block::Callout { callout } = block else {
            return String::new();
        };
        let tabs = "  ".repeat(depth);
        let mut text = self.runs(&callout.rich_text);
        match &callout.icon {
            Some(Icon::Emoji { emoji }) => text = format!("{emoji}{text}"),
            Some(Icon::External { external: file } | Icon::File { file }) => {
                text = format!("![]({}) {text}", file.url)
            }
            None => {}
        }
        let text = self.with_children(text, block.children(), depth + 1);
        if self.options.callout_as_message {
            format!("\n{tabs}:::message\n{tabs}{text}\n{tabs}:::")
        } else {
            format!("\n{tabs}{text}")
        }
    }

    fn table(&self, rows: &[Block], has_column_header: bool, width: usize, tabs: &str) -> String {
        let separator = format!("|{}", " --- |".repeat(width));
        let mut lines: Vec<String> = rows
            .iter()
            .filter_map(|row| match row {
                Block::TableRow { table_row } => {
                    Some(format!("{tabs}| {} |", self.cells(&table_row.cells)))
                }
                _ => None,
            })
            .collect();
        if has_column_header && !lines.is_empty() {
            lines.insert(1, format!("{tabs}{separator}"));
        } else {
            lines.insert(0, format!("{tabs}{separator}"));
            lines.insert(0, format!("{tabs}{}", separator.replace("---", "   ")));
        }
        lines.join("\n")
    }

    fn cells(&self, cells: &[Vec<RichTextRun>]) -> String {
        cells
            .iter()
            .map(|cell| {
                if cell.is_empty() {
                    " ".to_string()
                } else {
                    self.runs(cell)
                }
            })
            .collect::<Vec<_>>()
            .join(" | ")
    }

    fn runs(&self, runs: &[RichTextRun]) -> String {
        if runs.is_empty() {
            return self.options.blank_paragraph.clone();
        }
        runs.iter().map(|run| self.run(run)).collect()
    }

    fn run(&self, run: &RichTextRun) -> String {
        let annotations = &run.annotations;
        let mut text = run.content.clone();
        if annotations.code {
            text = format!("`{text}`");
        }
        if annotations.bold {
            text = format!("**{text}**");
        }
        if annotations.italic {
            text = format!("*{text}*");
        }
        if annotations.strikethrough {
            text = format!("~~{text}~~");
        }
        match (run.kind, &run.link) {
            (RunKind::Equation, _) => format!("${}$", run.content),
            (RunKind::Mention, Some(href)) => {
                if text == "Untitled" {
                    text = INACCESSIBLE_PAGE.to_string();
                }
                format!("[{}{text}]({href})", self.options.page_link_emoji)
            }
            (RunKind::Text, Some(href)) => format!("[{text}]({href})"),
            (_, None) => text,
        }
    }
}

/// Anchor of a heading as the zenn renderer slugs it.
fn slug(heading: &str) -> String {
    let text = heading.replace('#', "").trim().to_lowercase();
    let text = ASCII_PUNCTUATION.replace_all(&text, "");
    let text = text.replace(' ', "-").replace('\u{3000}', "");
    format!("#{}", WIDE_PUNCTUATION.replace_all(&text, ""))
}

fn table_of_contents(markdown: &str) -> String {
    HEADING_LINE
        .captures_iter(markdown)
        .enumerate()
        .map(|(index, caps)| {
            let level = caps[1].len();
            let indent = if index == 0 {
                String::new()
            } else {
                "  ".repeat(level - 1)
            };
            format!("{indent}- [**{}**]({})", caps[2].trim(), slug(&caps[0]))
        })
        .collect::<Vec<_>>()
        .join("\n")
}
