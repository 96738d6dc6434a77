//! Maps tokenizer output onto concrete API block payloads.

use crate::blocks::{
    Block, CodeBody, EquationBody, NestedBody, RichTextRun, RunKind, TableBody, TableRowBody,
    TextBody,
};
use crate::common::allow_lists::{has_image_extension, resolve_language, FALLBACK_LANGUAGE};
use crate::common::rich_text::make_run;
use crate::diagnostics::{Diagnostics, WarningKind};
use crate::error::ConvertError;
use crate::ir::nodes::{CalloutKind, IntermediateBlock, ListKind};
use crate::options::ConvertOptions;

/// Convert one intermediate block into its API payload.
///
/// Unsupported content degrades with a warning; only input that no tokenizer
/// should ever produce (a heading level outside 1..=3, a table without rows)
/// is rejected.
pub fn create_block(
    input: IntermediateBlock,
    options: &ConvertOptions,
    diagnostics: &mut Diagnostics,
) -> Result<Block, ConvertError> {
    let block = match input {
        IntermediateBlock::Heading { level, text } => {
            let body = TextBody {
                rich_text: text_run(&text, options, diagnostics),
            };
            match level {
                1 => Block::Heading1 { heading_1: body },
                2 => Block::Heading2 { heading_2: body },
                3 => Block::Heading3 { heading_3: body },
                other => {
                    return Err(ConvertError::InvalidInput(format!(
                        "heading level {other} is outside 1..=3"
                    )))
                }
            }
        }
        IntermediateBlock::LineBreak => Block::blank(),
        IntermediateBlock::Divider => Block::divider(),
        IntermediateBlock::Paragraph(paragraph) => Block::paragraph(paragraph.runs),
        IntermediateBlock::ListItem { kind, body } => {
            let (rich_text, children) = body.into_parts();
            let body = NestedBody {
                rich_text,
                children,
            };
            match kind {
                ListKind::Bulleted => Block::BulletedListItem {
                    bulleted_list_item: body,
                },
                ListKind::Numbered => Block::NumberedListItem {
                    numbered_list_item: body,
                },
            }
        }
        IntermediateBlock::Blockquote(body) => {
            let (rich_text, children) = body.into_parts();
            Block::quote(rich_text, children)
        }
        IntermediateBlock::Details(body) => {
            let (rich_text, children) = body.into_parts();
            Block::Toggle {
                toggle: NestedBody {
                    rich_text,
                    children,
                },
            }
        }
        IntermediateBlock::Footnote(body) => {
            let (rich_text, children) = body.into_parts();
            Block::callout(rich_text, "default", children)
        }
        IntermediateBlock::Callout { kind, body } => {
            let (rich_text, children) = body.into_parts();
            let color = match kind {
                CalloutKind::Message => "yellow_background",
                CalloutKind::Alert => "red_background",
            };
            Block::callout(rich_text, color, children)
        }
        IntermediateBlock::Notice { text } => {
            Block::callout(text_run(&text, options, diagnostics), "default", None)
        }
        IntermediateBlock::Bookmark { url } => Block::bookmark(url),
        IntermediateBlock::Embed { url } => Block::embed(url),
        IntermediateBlock::Image { url } => {
            if has_image_extension(&url) {
                Block::external_image(url)
            } else {
                diagnostics.warn(
                    WarningKind::NonImageUrl,
                    format!("'{url}' has no image extension, creating an embed block instead"),
                );
                Block::embed(url)
            }
        }
        IntermediateBlock::Code { text, language } => Block::Code {
            code: CodeBody {
                language: code_language(&language, diagnostics),
                rich_text: text_run(&text, options, diagnostics),
            },
        },
        IntermediateBlock::Table { rows } => table_block(rows, options, diagnostics)?,
        IntermediateBlock::Equation { expression } => Block::Equation {
            equation: EquationBody { expression },
        },
    };
    Ok(block)
}

fn text_run(text: &str, options: &ConvertOptions, diagnostics: &mut Diagnostics) -> Vec<RichTextRun> {
    make_run(RunKind::Text, text, None, options, diagnostics)
}

fn code_language(language: &str, diagnostics: &mut Diagnostics) -> String {
    let normalized = language.trim().to_ascii_lowercase();
    match resolve_language(&normalized) {
        Some(resolved) => resolved.to_string(),
        None => {
            diagnostics.warn(
                WarningKind::UnknownLanguage,
                format!("language '{language}' is not a valid code block language, using \"{FALLBACK_LANGUAGE}\""),
            );
            FALLBACK_LANGUAGE.to_string()
        }
    }
}

fn table_block(
    mut rows: Vec<Vec<String>>,
    options: &ConvertOptions,
    diagnostics: &mut Diagnostics,
) -> Result<Block, ConvertError> {
    let first_width = match rows.first() {
        Some(row) => row.len(),
        None => return Err(ConvertError::InvalidInput("table without rows".to_string())),
    };
    let widest = rows.iter().map(Vec::len).max().unwrap_or(first_width);
    let ragged = rows.iter().any(|row| row.len() != first_width);

    let table_width = if ragged {
        diagnostics.warn(
            WarningKind::RaggedTable,
            format!(
                "table rows range from {} to {widest} cells",
                rows.iter().map(Vec::len).min().unwrap_or(0)
            ),
        );
        if options.pad_ragged_tables {
            for row in rows.iter_mut() {
                row.resize(widest, String::new());
            }
            widest
        } else {
            first_width
        }
    } else {
        first_width
    };

    let children = rows
        .into_iter()
        .map(|row| Block::TableRow {
            table_row: TableRowBody {
                cells: row
                    .iter()
                    .map(|cell| text_run(cell, options, diagnostics))
                    .collect(),
            },
        })
        .collect();

    Ok(Block::Table {
        table: TableBody {
            table_width,
            has_column_header: true,
            has_row_header: false,
            children,
        },
    })
}
