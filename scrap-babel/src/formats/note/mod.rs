//! note article pages (`https://note.com/<user>/n/<key>`)

use crate::blocks::Icon;
use crate::common::nested_to_flat::IdSource;
use crate::diagnostics::Diagnostics;
use crate::error::ConvertError;
use crate::format::{Conversion, SiteFormat};
use crate::formats::common::{optional, require};
use crate::formats::html::tokenizer::{tokenize_blocks, Dialect};
use crate::formats::html::{attr, element_children, find_first, has_class, text_content, text_lines};
use crate::options::ConvertOptions;
use crate::page::{PageBuilder, PageMeta, ScrapInfo};
use markup5ever_rcdom::{Handle, RcDom};
use url::Url;

#[derive(Debug, Default, Clone, Copy)]
pub struct NoteArticle;

fn by_class(root: &Handle, class: &str) -> Option<Handle> {
    find_first(root, |n| has_class(n, class))
}

impl SiteFormat for NoteArticle {
    fn name(&self) -> &str {
        "note-article"
    }

    fn description(&self) -> &str {
        "note article page"
    }

    fn matches(&self, url: &Url) -> bool {
        url.host_str() == Some("note.com") && url.path().contains("/n/")
    }

    fn convert(
        &self,
        document: &RcDom,
        url: &Url,
        options: &ConvertOptions,
        ids: &mut dyn IdSource,
    ) -> Result<Conversion, ConvertError> {
        let mut diagnostics = Diagnostics::new();
        let root = &document.document;

        let title = require(document, by_class(root, "o-noteContentText__title"), "note title")?;
        let body = require(
            document,
            by_class(root, "note-common-styles__textnote-body"),
            "note body",
        )?;

        // The eyecatch wraps its image in a link to the full-size file.
        let icon = optional(by_class(root, "o-noteEyecatch"), "eyecatch", &mut diagnostics)
            .and_then(|eyecatch| element_children(&eyecatch).into_iter().next())
            .and_then(|link| attr(&link, "href"))
            .and_then(|href| url.join(&href).ok())
            .map(|href| Icon::external(href.as_str()));
        let author = optional(
            by_class(root, "o-noteContentText__author"),
            "author name",
            &mut diagnostics,
        )
        .and_then(|node| text_lines(&node).into_iter().next())
        .unwrap_or_default();
        let topics = optional(by_class(root, "m-tagList__body"), "tag list", &mut diagnostics)
            .map(|node| {
                text_lines(&node)
                    .iter()
                    .map(|tag| tag.replace('#', ""))
                    .filter(|tag| !tag.is_empty())
                    .collect()
            })
            .unwrap_or_default();
        let meta = PageMeta {
            title: text_content(&title).split_whitespace().collect(),
            author,
            topics,
            icon,
        };

        let blocks = tokenize_blocks(&body, Dialect::Note, url, options, &mut diagnostics)?;
        tracing::debug!(site = self.name(), blocks = blocks.len(), "tokenized note body");

        let mut builder: PageBuilder<'_, Option<ScrapInfo>> =
            PageBuilder::new(url.as_str(), ids, options);
        builder.push_blank();
        builder.push_reference();
        builder.push_blank();
        builder.push_blank();
        builder.push_group(blocks, &None);

        let page = builder.finish(meta, &mut diagnostics);
        Ok(Conversion { page, diagnostics })
    }
}
