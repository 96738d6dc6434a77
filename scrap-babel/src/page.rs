//! Page assembly: the flattened, ready-to-publish form of one converted page.

use crate::blocks::{Block, Icon, RichTextRun, RunKind};
use crate::common::nested_to_flat::{nest_depth, FlatRecord, Flattener, IdSource};
use crate::common::rich_text::make_run;
use crate::diagnostics::Diagnostics;
use crate::options::ConvertOptions;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Id of the shared empty-paragraph spacer record.
pub const BLANK_ID: &str = "blank";
/// Id of the shared divider record.
pub const DIVIDER_ID: &str = "divider";

/// Everything the bridge needs to create a page and append its deep content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageDescriptor<T> {
    pub title: Vec<RichTextRun>,
    pub author: String,
    pub topics: Vec<String>,
    pub icon: Option<Icon>,
    /// Deepest nesting measured over all top-level blocks
    pub max: usize,
    /// Ids of the blocks sent with the create call, in page order
    pub topblock_ids: Vec<String>,
    /// Ids to append after creation, parents before descendants
    pub children_ids: Vec<String>,
    pub data: BTreeMap<String, FlatRecord<T>>,
}

impl<T> PageDescriptor<T> {
    pub fn record(&self, id: &str) -> Option<&FlatRecord<T>> {
        self.data.get(id)
    }

    /// Payloads of the top-level blocks, reserved ids included.
    pub fn top_blocks(&self) -> impl Iterator<Item = Option<&Block>> + '_ {
        self.topblock_ids
            .iter()
            .map(|id| self.data.get(id).map(|record| &record.block))
    }
}

/// Where a comment sits on a scrap (thread) page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScrapInfo {
    pub thread_idx: String,
    pub scrap_idx: String,
    pub date_time: Option<String>,
}

/// Descriptor produced by every site adapter; articles carry `None`.
pub type SitePage = PageDescriptor<Option<ScrapInfo>>;

/// Page metadata scraped alongside the body.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageMeta {
    pub title: String,
    pub author: String,
    pub topics: Vec<String>,
    pub icon: Option<Icon>,
}

/// Incrementally assembles a [`PageDescriptor`].
///
/// Seeds the reserved spacer records and the provenance quote, then takes the
/// converted content group by group, flattening each block and applying the
/// spacing policy.
pub struct PageBuilder<'a, T> {
    ids: &'a mut dyn IdSource,
    options: &'a ConvertOptions,
    records: BTreeMap<String, FlatRecord<T>>,
    topblock_ids: Vec<String>,
    children_ids: Vec<String>,
    source_url: String,
    reference_id: String,
    max: usize,
}

impl<'a, T: Clone + Default> PageBuilder<'a, T> {
    pub fn new(source_url: &str, ids: &'a mut dyn IdSource, options: &'a ConvertOptions) -> Self {
        let mut records = BTreeMap::new();
        records.insert(
            BLANK_ID.to_string(),
            FlatRecord::new(BLANK_ID, Block::blank(), None, T::default()),
        );
        records.insert(
            DIVIDER_ID.to_string(),
            FlatRecord::new(DIVIDER_ID, Block::divider(), None, T::default()),
        );
        let reference_id = ids.next_id();
        Self {
            ids,
            options,
            records,
            topblock_ids: Vec::new(),
            children_ids: Vec::new(),
            source_url: source_url.to_string(),
            reference_id,
            max: 0,
        }
    }

    pub fn push_blank(&mut self) {
        self.topblock_ids.push(BLANK_ID.to_string());
    }

    pub fn push_divider(&mut self) {
        self.topblock_ids.push(DIVIDER_ID.to_string());
    }

    pub fn push_reference(&mut self) {
        self.topblock_ids.push(self.reference_id.clone());
    }

    /// Flatten one group of content blocks and append it to the page.
    pub fn push_group(&mut self, blocks: Vec<Block>, options: &T) {
        let mut previous: Option<&'static str> = None;
        for block in blocks {
            let spacer = self.needs_spacer(&block, previous);
            previous = Some(block.kind_name());

            let depth = nest_depth(&block);
            self.max = self.max.max(depth);
            let flattened = Flattener::new(
                &mut *self.ids,
                &mut self.records,
                self.options.max_inline_depth,
            )
            .flatten(block, depth, None, options);

            self.children_ids.extend(flattened.deferred);
            if spacer {
                self.push_blank();
            }
            self.topblock_ids.push(flattened.id);
        }
    }

    fn needs_spacer(&self, block: &Block, previous: Option<&str>) -> bool {
        match block {
            Block::Callout { callout } => matches!(
                callout.rich_text.first(),
                Some(run) if run.kind == RunKind::Text && run.content == self.options.footnote_label
            ),
            Block::Heading3 { .. } => !matches!(previous, Some("heading_1" | "heading_2")),
            _ => false,
        }
    }

    /// Seal the page; the title and the provenance quote are capped like any other run.
    pub fn finish(mut self, meta: PageMeta, diagnostics: &mut Diagnostics) -> PageDescriptor<T> {
        let reference = Block::quote(
            make_run(
                RunKind::Text,
                &self.options.reference_label,
                Some(&self.source_url),
                self.options,
                diagnostics,
            ),
            None,
        );
        self.records.insert(
            self.reference_id.clone(),
            FlatRecord::new(self.reference_id.clone(), reference, None, T::default()),
        );
        PageDescriptor {
            title: make_run(RunKind::Text, &meta.title, None, self.options, diagnostics),
            author: meta.author,
            topics: meta.topics,
            icon: meta.icon,
            max: self.max,
            topblock_ids: self.topblock_ids,
            children_ids: self.children_ids,
            data: self.records,
        }
    }
}
