//! Zenn article and scrap pages
//!
//! Articles have a single body; scraps are threads of comments, each comment
//! becoming its own content group on the page. Both share the zenn dialect of
//! the tokenizer.

use crate::blocks::Icon;
use crate::common::allow_lists::has_image_extension;
use crate::common::nested_to_flat::IdSource;
use crate::diagnostics::Diagnostics;
use crate::error::ConvertError;
use crate::format::{Conversion, SiteFormat};
use crate::formats::common::{by_class_prefix, missing, optional, require};
use crate::formats::html::tokenizer::{tokenize_blocks, Dialect};
use crate::formats::html::{
    attr, find_all, find_first, has_class, has_class_prefix, is_tag, parent_element,
    previous_element_sibling, text_content, text_lines,
};
use crate::options::ConvertOptions;
use crate::page::{PageBuilder, PageMeta, ScrapInfo};
use markup5ever_rcdom::{Handle, RcDom};
use url::Url;

const SCRAP_FALLBACK_ICON: &str = "\u{1F4D1}";

fn is_zenn(url: &Url) -> bool {
    url.host_str() == Some("zenn.dev")
}

fn trimmed_text(node: &Handle) -> String {
    text_content(node).trim().to_string()
}

fn author(document: &RcDom, diagnostics: &mut Diagnostics) -> String {
    optional(
        by_class_prefix(&document.document, "SidebarUserBio_name__"),
        "author name",
        diagnostics,
    )
    .map(|node| trimmed_text(&node))
    .unwrap_or_default()
}

fn topics(document: &RcDom, prefix: &str, diagnostics: &mut Diagnostics) -> Vec<String> {
    optional(
        by_class_prefix(&document.document, prefix),
        "topic list",
        diagnostics,
    )
    .map(|node| text_lines(&node))
    .unwrap_or_default()
}

/// Zenn article (`https://zenn.dev/<user>/articles/<slug>`)
#[derive(Debug, Default, Clone, Copy)]
pub struct ZennArticle;

impl SiteFormat for ZennArticle {
    fn name(&self) -> &str {
        "zenn-article"
    }

    fn description(&self) -> &str {
        "Zenn article page"
    }

    fn matches(&self, url: &Url) -> bool {
        is_zenn(url) && url.path().contains("/articles/")
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

        let title = require(
            document,
            by_class_prefix(root, "ArticleHeader_title__"),
            "article title",
        )?;
        let body = require(
            document,
            find_first(root, |n| {
                has_class(n, "znc") && has_class_prefix(n, "BodyContent_anchorToHeadings__")
            }),
            "article body",
        )?;

        let icon = optional(
            by_class_prefix(root, "Emoji_nativeEmoji__"),
            "article emoji",
            &mut diagnostics,
        )
        .map(|node| Icon::emoji(trimmed_text(&node)));
        let meta = PageMeta {
            title: trimmed_text(&title),
            author: author(document, &mut diagnostics),
            topics: topics(document, "ArticleSidebar_topicLinksContainer__", &mut diagnostics),
            icon,
        };

        let blocks = tokenize_blocks(&body, Dialect::Zenn, url, options, &mut diagnostics)?;
        tracing::debug!(site = self.name(), blocks = blocks.len(), "tokenized article body");

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

/// Zenn scrap (`https://zenn.dev/<user>/scraps/<id>`)
#[derive(Debug, Default, Clone, Copy)]
pub struct ZennScrap;

/// One comment of a scrap thread and where it sits.
struct Comment {
    info: ScrapInfo,
    body: Handle,
}

impl ZennScrap {
    fn comments(root: &Handle) -> Vec<Comment> {
        let mut comments = Vec::new();
        for (thread, item) in find_all(root, |n| has_class_prefix(n, "ScrapThread_item__"))
            .iter()
            .enumerate()
        {
            let bodies = find_all(item, |n| {
                has_class(n, "znc") && has_class_prefix(n, "BodyCommentContent_bodyCommentContainer__")
            });
            for (index, body) in bodies.into_iter().enumerate() {
                comments.push(Comment {
                    info: ScrapInfo {
                        thread_idx: thread.to_string(),
                        scrap_idx: format!("{thread}_{index}"),
                        date_time: Self::posted_at(&body),
                    },
                    body,
                });
            }
        }
        comments
    }

    /// Timestamp shown in the header that precedes the comment's wrapper.
    fn posted_at(body: &Handle) -> Option<String> {
        let wrapper = parent_element(body).and_then(|p| parent_element(&p))?;
        let header = previous_element_sibling(&wrapper)?;
        let date = by_class_prefix(&header, "ThreadItemContent_date__")?;
        attr(&date, "datetime")
    }

    fn icon(root: &Handle, url: &Url, diagnostics: &mut Diagnostics) -> Icon {
        let source = optional(
            by_class_prefix(root, "SidebarUserBio_container__"),
            "author avatar",
            diagnostics,
        )
        .and_then(|bio| find_first(&bio, |n| is_tag(n, "img")))
        .and_then(|img| attr(&img, "src"))
        .and_then(|src| url.join(&src).ok());
        match source {
            Some(src) if has_image_extension(src.as_str()) => Icon::external(src.as_str()),
            _ => Icon::emoji(SCRAP_FALLBACK_ICON),
        }
    }
}

impl SiteFormat for ZennScrap {
    fn name(&self) -> &str {
        "zenn-scrap"
    }

    fn description(&self) -> &str {
        "Zenn scrap (comment thread) page"
    }

    fn matches(&self, url: &Url) -> bool {
        is_zenn(url) && url.path().contains("/scraps/")
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

        let title = require(document, by_class_prefix(root, "View_title__"), "scrap title")?;
        let comments = Self::comments(root);
        if comments.is_empty() {
            return Err(missing(document, "scrap comment"));
        }

        let meta = PageMeta {
            title: trimmed_text(&title),
            author: author(document, &mut diagnostics),
            topics: topics(document, "TopicList_container__", &mut diagnostics),
            icon: Some(Self::icon(root, url, &mut diagnostics)),
        };

        let mut builder: PageBuilder<'_, Option<ScrapInfo>> =
            PageBuilder::new(url.as_str(), ids, options);
        builder.push_reference();
        let mut current_thread = "0".to_string();
        for comment in comments {
            let blocks =
                tokenize_blocks(&comment.body, Dialect::Zenn, url, options, &mut diagnostics)?;
            if comment.info.thread_idx != current_thread {
                builder.push_blank();
                builder.push_divider();
                builder.push_blank();
                current_thread = comment.info.thread_idx.clone();
            } else {
                builder.push_blank();
                builder.push_blank();
            }
            tracing::debug!(scrap = %comment.info.scrap_idx, blocks = blocks.len(), "tokenized comment");
            builder.push_group(blocks, &Some(comment.info));
        }

        let page = builder.finish(meta, &mut diagnostics);
        Ok(Conversion { page, diagnostics })
    }
}
