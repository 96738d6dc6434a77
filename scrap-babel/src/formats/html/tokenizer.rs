//! DOM → intermediate block tokenizer
//!
//! # The High-Level Concept
//!
//! A rendered article body is a mix of inline content (text, links, emphasis,
//! inline math) and block content (paragraphs, lists, quotes, widgets). The
//! tokenizer walks it depth-first, left to right, collecting inline content
//! into an open run stream and closing that stream into a paragraph whenever a
//! block-level element shows up.
//!
//! # The Algorithm
//!
//! 1. **Lock-step walk:** the children of each element are visited through a
//!    [`ChildCursor`], so every element step consumes exactly one entry of the
//!    parallel element cursor.
//!
//! 2. **Inline elements:** recurse with the element's marker pushed onto the
//!    active set, then splice the result back: paragraph runs join the open
//!    stream, anything else closes the stream and is appended as is.
//!
//! 3. **Block elements:** close the open stream, then emit one intermediate
//!    block. Containers (list items, quotes, callouts, toggles) tokenize their
//!    own content, turn it into blocks and split it into firstline/children.
//!
//! 4. **Failures:** unsupported elements are skipped with a warning; a missing
//!    required attribute or an unexpected structure aborts the whole call.

use super::cursor::{ChildCursor, Step};
use super::{
    attr, classes, element_children, find_all, find_first, fragment, has_attr, has_class,
    is_blank_text, is_tag, tag_name, text_content,
};
use crate::blocks::{Block, RichTextRun, RunKind};
use crate::common::block_factory::create_block;
use crate::common::rich_text::{append_text, apply_annotations, make_run, Marker};
use crate::diagnostics::{Diagnostics, WarningKind};
use crate::error::ConvertError;
use crate::ir::nodes::{CalloutKind, Container, IntermediateBlock, ListKind, Paragraph};
use crate::options::ConvertOptions;
use markup5ever_rcdom::Handle;
use std::mem;
use std::rc::Rc;
use url::Url;

/// Markup flavour of the site being converted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialect {
    Zenn,
    Note,
}

/// Tokenize the children of `root` into intermediate blocks.
///
/// Relative links and image sources are resolved against `base_url`.
pub fn tokenize_page(
    root: &Handle,
    dialect: Dialect,
    base_url: &Url,
    options: &ConvertOptions,
    diagnostics: &mut Diagnostics,
) -> Result<Vec<IntermediateBlock>, ConvertError> {
    let mut tokenizer = Tokenizer {
        dialect,
        base_url,
        options,
        diagnostics,
    };
    tokenizer.tokenize(root, &Inline::default())
}

/// Tokenize and build blocks in one go.
pub fn tokenize_blocks(
    root: &Handle,
    dialect: Dialect,
    base_url: &Url,
    options: &ConvertOptions,
    diagnostics: &mut Diagnostics,
) -> Result<Vec<Block>, ConvertError> {
    let mut tokenizer = Tokenizer {
        dialect,
        base_url,
        options,
        diagnostics,
    };
    let tokens = tokenizer.tokenize(root, &Inline::default())?;
    tokenizer.build(tokens)
}

/// Formatting inherited from enclosing inline elements.
#[derive(Debug, Clone, Default)]
struct Inline {
    markers: Vec<Marker>,
    link: Option<String>,
}

impl Inline {
    fn with_marker(&self, marker: Option<Marker>) -> Self {
        let mut next = self.clone();
        if let Some(marker) = marker {
            next.markers.push(marker);
        }
        next
    }
}

/// Blocks emitted so far plus the run stream of the open paragraph.
#[derive(Default)]
struct Output {
    blocks: Vec<IntermediateBlock>,
    runs: Vec<RichTextRun>,
}

impl Output {
    fn flush(&mut self) {
        if !self.runs.is_empty() {
            let runs = mem::take(&mut self.runs);
            self.blocks
                .push(IntermediateBlock::Paragraph(Paragraph::new(runs)));
        }
    }

    fn push(&mut self, block: IntermediateBlock) {
        self.flush();
        self.blocks.push(block);
    }

    fn splice(&mut self, inner: Vec<IntermediateBlock>) {
        for block in inner {
            match block {
                IntermediateBlock::Paragraph(paragraph) => self.runs.extend(paragraph.runs),
                other => self.push(other),
            }
        }
    }

    /// Append a newline to the open stream; a break at its start adds nothing.
    fn line_feed(&mut self, options: &ConvertOptions, diagnostics: &mut Diagnostics) {
        if let Some(last) = self.runs.last_mut() {
            append_text(last, "\n", options, diagnostics);
        }
    }

    fn finish(mut self) -> Vec<IntermediateBlock> {
        self.flush();
        self.blocks
    }
}

struct Tokenizer<'a> {
    dialect: Dialect,
    base_url: &'a Url,
    options: &'a ConvertOptions,
    diagnostics: &'a mut Diagnostics,
}

impl Tokenizer<'_> {
    fn tokenize(
        &mut self,
        parent: &Handle,
        inline: &Inline,
    ) -> Result<Vec<IntermediateBlock>, ConvertError> {
        let mut cursor = ChildCursor::new(parent);
        let mut out = Output::default();
        while let Some(step) = cursor.next_step()? {
            match step {
                Step::Text(text) => {
                    if !is_blank_text(&text) {
                        let runs = self.run(RunKind::Text, text.trim(), inline);
                        out.runs.extend(runs);
                    }
                }
                Step::Element(element) => self.element(&element, &mut cursor, inline, &mut out)?,
            }
        }
        Ok(out.finish())
    }

    /// Tokenize a container element and convert its content to blocks.
    fn contents(&mut self, parent: &Handle) -> Result<Vec<Block>, ConvertError> {
        let tokens = self.tokenize(parent, &Inline::default())?;
        self.build(tokens)
    }

    fn build(&mut self, tokens: Vec<IntermediateBlock>) -> Result<Vec<Block>, ConvertError> {
        let mut blocks = Vec::with_capacity(tokens.len());
        for token in tokens {
            blocks.push(create_block(token, self.options, self.diagnostics)?);
        }
        Ok(blocks)
    }

    fn run(&mut self, kind: RunKind, content: &str, inline: &Inline) -> Vec<RichTextRun> {
        let mut runs = make_run(
            kind,
            content,
            inline.link.as_deref(),
            self.options,
            self.diagnostics,
        );
        apply_annotations(&mut runs, &inline.markers);
        runs
    }

    fn element(
        &mut self,
        element: &Handle,
        cursor: &mut ChildCursor,
        inline: &Inline,
        out: &mut Output,
    ) -> Result<(), ConvertError> {
        let tag = tag_name(element).unwrap_or_default().to_string();
        match (tag.as_str(), self.dialect) {
            ("a", _) => {
                if has_attr(element, "style") {
                    return Ok(());
                }
                let mut nested = inline.clone();
                if let Some(href) = attr(element, "href") {
                    nested.link = Some(self.resolve(&href));
                }
                let inner = self.tokenize(element, &nested)?;
                out.splice(inner);
            }
            ("strong" | "b" | "em" | "i" | "s" | "del" | "code" | "sup" | "span", _) => {
                let marker = match tag.as_str() {
                    "strong" | "b" => Some(Marker::Strong),
                    "em" | "i" => Some(Marker::Emphasis),
                    "s" | "del" => Some(Marker::Strike),
                    "code" => Some(Marker::InlineCode),
                    _ => None,
                };
                let inner = self.tokenize(element, &inline.with_marker(marker))?;
                out.splice(inner);
            }
            ("embed-katex", Dialect::Zenn) => {
                let runs = self.run(RunKind::Equation, &math_source(element), inline);
                out.runs.extend(runs);
            }
            ("nwc-formula", Dialect::Note) => {
                let expression = math_source(element);
                if has_attr(element, "is-block") {
                    out.push(IntermediateBlock::Equation { expression });
                } else {
                    let runs = self.run(RunKind::Equation, &expression, inline);
                    out.runs.extend(runs);
                }
            }
            ("br", _) => self.line_break(element, cursor, out)?,
            ("p", _) => {
                let inner = self.tokenize(element, &Inline::default())?;
                if inner.is_empty() {
                    return Ok(());
                }
                out.flush();
                out.blocks.extend(inner);
                if cursor.peek_element().is_some_and(|next| is_tag(next, "p")) {
                    out.blocks.push(IntermediateBlock::LineBreak);
                }
            }
            ("ul" | "ol", _) => {
                let kind = if tag == "ul" {
                    ListKind::Bulleted
                } else {
                    ListKind::Numbered
                };
                out.flush();
                for item in element_children(element) {
                    let body = Container::arrange(self.contents(&item)?);
                    out.push(IntermediateBlock::ListItem { kind, body });
                }
            }
            ("h1" | "h2" | "h3" | "h4" | "h5" | "h6", _) => {
                let level = match tag.as_str() {
                    "h1" => 1,
                    "h2" => 2,
                    _ => 3,
                };
                let text = text_content(element).trim_start().to_string();
                out.push(IntermediateBlock::Heading { level, text });
            }
            ("hr", _) => out.push(IntermediateBlock::Divider),
            ("table", _) => {
                out.flush();
                self.table(element, out);
            }
            ("img", _) => {
                let src = required_attr(element, "src")?;
                out.push(IntermediateBlock::Image {
                    url: self.resolve(&src),
                });
            }
            ("blockquote", _) => {
                out.flush();
                let body = Container::arrange(self.contents(element)?);
                out.push(IntermediateBlock::Blockquote(body));
            }
            ("pre", _) => {
                let language = match find_first(element, |n| is_tag(n, "code")) {
                    Some(code) => pre_language(&code),
                    None => String::new(),
                };
                out.push(IntermediateBlock::Code {
                    text: code_text(element),
                    language,
                });
            }
            ("section", Dialect::Zenn) => self.section(element, out)?,
            ("aside", Dialect::Zenn) => self.aside(element, out)?,
            ("details", Dialect::Zenn) => self.details(element, out)?,
            ("div", Dialect::Zenn) => self.zenn_div(element, cursor, out)?,
            ("figure", Dialect::Note) => self.figure(element, out)?,
            ("script" | "style" | "noscript" | "template", _) => {}
            _ => self.not_implemented(element),
        }
        Ok(())
    }

    fn line_break(
        &mut self,
        element: &Handle,
        cursor: &mut ChildCursor,
        out: &mut Output,
    ) -> Result<(), ConvertError> {
        let next_is_break = cursor
            .peek_significant()
            .is_some_and(|next| is_tag(next, "br"));
        if next_is_break {
            cursor.consume_element()?;
            out.push(IntermediateBlock::LineBreak);
        } else if !attr(element, "style").is_some_and(|s| s.trim_start().starts_with("display")) {
            out.line_feed(self.options, self.diagnostics);
        }
        Ok(())
    }

    fn table(&mut self, element: &Handle, out: &mut Output) {
        let rows: Vec<Vec<String>> = find_all(element, |n| is_tag(n, "tr"))
            .iter()
            .map(|row| {
                element_children(row)
                    .iter()
                    .filter(|cell| is_tag(cell, "th") || is_tag(cell, "td"))
                    .map(|cell| text_content(cell).trim().to_string())
                    .collect::<Vec<_>>()
            })
            .filter(|row| !row.is_empty())
            .collect();
        if rows.is_empty() {
            self.diagnostics.warn_at(
                WarningKind::EmptyTable,
                "table without rows is skipped",
                fragment(element),
            );
            return;
        }
        out.push(IntermediateBlock::Table { rows });
    }

    fn section(&mut self, element: &Handle, out: &mut Output) -> Result<(), ConvertError> {
        if has_class(element, "footnotes") {
            out.flush();
            let mut children = Vec::new();
            for item in find_all(element, |n| has_class(n, "footnote-item")) {
                let body = find_first(&item, |n| is_tag(n, "p")).unwrap_or(item);
                let body = Container::arrange(self.contents(&body)?);
                let entry = IntermediateBlock::ListItem {
                    kind: ListKind::Numbered,
                    body,
                };
                children.push(create_block(entry, self.options, self.diagnostics)?);
            }
            let options = self.options;
            let label = self.run(RunKind::Text, &options.footnote_label, &Inline::default());
            out.push(IntermediateBlock::Footnote(Container::with_firstline(
                label, children,
            )));
        } else if has_class(element, "zenn-katex") {
            out.push(IntermediateBlock::Equation {
                expression: math_source(element),
            });
        } else {
            self.not_implemented(element);
        }
        Ok(())
    }

    fn aside(&mut self, element: &Handle, out: &mut Output) -> Result<(), ConvertError> {
        let kind = if !has_class(element, "msg") {
            None
        } else if has_class(element, "message") {
            Some(CalloutKind::Message)
        } else if has_class(element, "alert") {
            Some(CalloutKind::Alert)
        } else {
            None
        };
        let Some(kind) = kind else {
            self.not_implemented(element);
            return Ok(());
        };
        let content = find_first(element, |n| has_class(n, "msg-content"))
            .ok_or_else(|| unexpected("message without .msg-content", element))?;
        out.flush();
        let body = Container::arrange(self.contents(&content)?);
        out.push(IntermediateBlock::Callout { kind, body });
        Ok(())
    }

    fn details(&mut self, element: &Handle, out: &mut Output) -> Result<(), ConvertError> {
        let summary = find_first(element, |n| is_tag(n, "summary"))
            .ok_or_else(|| unexpected("details without summary", element))?;
        let content = find_first(element, |n| has_class(n, "details-content"))
            .ok_or_else(|| unexpected("details without .details-content", element))?;
        out.flush();
        let title = text_content(&summary).trim().to_string();
        let firstline = self.run(RunKind::Text, &title, &Inline::default());
        let children = self.contents(&content)?;
        out.push(IntermediateBlock::Details(Container::with_firstline(
            firstline, children,
        )));
        Ok(())
    }

    fn zenn_div(
        &mut self,
        element: &Handle,
        cursor: &mut ChildCursor,
        out: &mut Output,
    ) -> Result<(), ConvertError> {
        let class_list = classes(element);
        let base_class = class_list.first().map(String::as_str).unwrap_or_default();
        if base_class == "code-block-container" {
            let code = find_first(element, |n| is_tag(n, "code"))
                .ok_or_else(|| unexpected("code block without code element", element))?;
            let class = attr(&code, "class").unwrap_or_default();
            let language = class.rsplit('-').next().unwrap_or_default().trim().to_string();
            out.push(IntermediateBlock::Code {
                text: code_text(&code),
                language,
            });
        } else if base_class == "zenn-embedded" {
            let block = self.zenn_embed(element, class_list.get(1).map(String::as_str), cursor)?;
            out.push(block);
        } else if base_class.starts_with("embed-") {
            let src = find_first(element, |n| is_tag(n, "iframe")).and_then(|f| attr(&f, "src"));
            let block = match src {
                Some(src) => IntermediateBlock::Embed {
                    url: self.resolve(&src),
                },
                None => IntermediateBlock::Notice {
                    text: self.options.failed_embed_text.clone(),
                },
            };
            out.push(block);
        } else {
            self.not_implemented(element);
        }
        Ok(())
    }

    /// Map an embedded widget through the link that follows it.
    fn zenn_embed(
        &mut self,
        element: &Handle,
        embed_type: Option<&str>,
        cursor: &mut ChildCursor,
    ) -> Result<IntermediateBlock, ConvertError> {
        let Some(embed_type) = embed_type else {
            return Ok(self.unknown_embed("", element));
        };
        let anchor = cursor
            .peek_element()
            .filter(|next| is_tag(next, "a"))
            .cloned()
            .ok_or_else(|| unexpected("embedded element without a companion link", element))?;
        let href = required_attr(&anchor, "href")?;
        if cursor
            .peek_significant()
            .is_some_and(|next| Rc::ptr_eq(next, &anchor))
        {
            cursor.consume_element()?;
        }
        let url = self.resolve(&href);
        Ok(match embed_type {
            "zenn-embedded-link-card" | "zenn-embedded-github" => IntermediateBlock::Bookmark { url },
            "zenn-embedded-tweet" => IntermediateBlock::Embed { url },
            other => {
                let name = other.rsplit('-').next().unwrap_or(other);
                self.unknown_embed(name, element)
            }
        })
    }

    fn unknown_embed(&mut self, name: &str, element: &Handle) -> IntermediateBlock {
        self.diagnostics.warn_at(
            WarningKind::UnknownEmbed,
            format!("embedded element of type '{name}' cannot be converted"),
            fragment(element),
        );
        IntermediateBlock::Notice {
            text: self.options.unknown_embed_text.replace("{name}", name),
        }
    }

    fn figure(&mut self, element: &Handle, out: &mut Output) -> Result<(), ConvertError> {
        if let Some(service) = attr(element, "embedded-service") {
            let url = self.resolve(&required_attr(element, "data-src")?);
            match service.as_str() {
                "note" | "youtube" => out.push(IntermediateBlock::Bookmark { url }),
                "twitter" => out.push(IntermediateBlock::Embed { url }),
                _ => self.not_implemented(element),
            }
            return Ok(());
        }

        let parts = element_children(element);
        let Some(inner) = parts.first() else {
            self.not_implemented(element);
            return Ok(());
        };
        if is_tag(inner, "a") {
            let href = required_attr(inner, "href")?;
            out.push(IntermediateBlock::Image {
                url: self.resolve(&href),
            });
        } else if is_tag(inner, "blockquote") {
            let body = find_first(inner, |n| is_tag(n, "p")).unwrap_or_else(|| inner.clone());
            out.flush();
            let body = Container::arrange(self.contents(&body)?);
            out.push(IntermediateBlock::Blockquote(body));
        } else {
            self.not_implemented(inner);
        }
        if let Some(caption) = parts.get(1).filter(|c| is_tag(c, "figcaption")) {
            if !is_blank_text(&text_content(caption)) {
                let inner = self.tokenize(caption, &Inline::default())?;
                out.flush();
                out.blocks.extend(inner);
            }
        }
        Ok(())
    }

    fn not_implemented(&mut self, element: &Handle) {
        let tag = tag_name(element).unwrap_or("#node");
        self.diagnostics.warn_at(
            WarningKind::NotImplemented,
            format!("<{tag}> element is not implemented and was skipped"),
            fragment(element),
        );
    }

    fn resolve(&self, href: &str) -> String {
        self.base_url
            .join(href)
            .map(String::from)
            .unwrap_or_else(|_| href.to_string())
    }
}

fn required_attr(element: &Handle, name: &str) -> Result<String, ConvertError> {
    attr(element, name).ok_or_else(|| ConvertError::MissingAttribute {
        element: tag_name(element).unwrap_or("#node").to_string(),
        attribute: name.to_string(),
        fragment: fragment(element),
    })
}

fn unexpected(message: &str, element: &Handle) -> ConvertError {
    ConvertError::UnexpectedTree {
        message: message.to_string(),
        fragment: fragment(element),
    }
}

/// Raw expression of a math element: its first non-empty line, skipping
/// display delimiters.
fn math_source(element: &Handle) -> String {
    text_content(element)
        .lines()
        .map(str::trim)
        .find(|line| !line.is_empty() && *line != "$$")
        .unwrap_or_default()
        .to_string()
}

fn code_text(code: &Handle) -> String {
    let mut text = text_content(code);
    if text.ends_with('\n') {
        text.pop();
    }
    text
}

/// Language of a `pre > code` block: the last class token, without a
/// `language-` prefix.
fn pre_language(code: &Handle) -> String {
    let class = attr(code, "class").unwrap_or_default();
    let last = class.split_whitespace().last().unwrap_or_default();
    last.strip_prefix("language-").unwrap_or(last).to_string()
}
