//! Page publishing pipeline.
//!
//! Sends a converted [`PageDescriptor`] to a page API. The API only accepts
//! a shallow tree on creation, so publishing is a strictly sequential chain:
//!
//! 1. create the page with the top-level blocks (children embedded up to the
//!    inline limit);
//! 2. list the new page's children to learn the remote id of each top-level
//!    block, since the create response only carries the page id;
//! 3. append the deferred blocks parent by parent, recording the remote ids
//!    each append returns so deeper levels can target them.
//!
//! A failed append only loses that parent's subtree. Failures are collected
//! into [`PublishOutcome::failures`] and the remaining parents still go
//! through. The transport lives behind [`PageApi`]; this module never does
//! I/O itself.

use crate::blocks::{Block, Icon, RichTextRun};
use crate::error::{ApiError, PublishError};
use crate::options::PublishOptions;
use crate::page::PageDescriptor;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageParent {
    pub page_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TitleProperty {
    pub title: Vec<RichTextRun>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageProperties {
    pub title: TitleProperty,
}

/// Body of the page-create call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreatePageRequest {
    pub parent: PageParent,
    pub properties: PageProperties,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<Icon>,
    pub children: Vec<Block>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatedPage {
    pub id: String,
}

/// One page of a children listing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChildrenPage {
    pub ids: Vec<String>,
    pub has_more: bool,
    pub next_cursor: Option<String>,
}

/// Remote page API.
///
/// Implementations perform one remote call per method. Calls are issued one
/// at a time and in order; implementations need not be reentrant.
pub trait PageApi {
    fn create_page(&mut self, request: &CreatePageRequest) -> Result<CreatedPage, ApiError>;

    fn list_children(
        &mut self,
        block_id: &str,
        cursor: Option<&str>,
        page_size: usize,
    ) -> Result<ChildrenPage, ApiError>;

    /// Append `children` under `block_id`, returning their remote ids in order.
    fn append_children(
        &mut self,
        block_id: &str,
        children: &[Block],
    ) -> Result<Vec<String>, ApiError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PublishStatus {
    /// Every block reached the page
    Complete,
    /// The page was created but nesting deeper than the inline limit was dropped
    OmittedDeepNesting,
    /// The page was created but some appends failed
    PartialFailure,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublishOutcome {
    pub page_id: String,
    pub status: PublishStatus,
    /// Failure messages keyed by `parent: <local id>`
    pub failures: BTreeMap<String, String>,
    /// Local id to remote id for every block whose remote id is known
    pub remote_ids: BTreeMap<String, String>,
}

impl PublishOutcome {
    fn new(page_id: String, status: PublishStatus) -> Self {
        Self {
            page_id,
            status,
            failures: BTreeMap::new(),
            remote_ids: BTreeMap::new(),
        }
    }
}

/// Publish `page` as a child of the page `target_id`.
pub fn publish<T>(
    api: &mut dyn PageApi,
    target_id: &str,
    page: &PageDescriptor<T>,
    options: &PublishOptions,
) -> Result<PublishOutcome, PublishError> {
    let children = payloads(page, &page.topblock_ids)?;
    let request = CreatePageRequest {
        parent: PageParent {
            page_id: target_id.to_string(),
        },
        properties: PageProperties {
            title: TitleProperty {
                title: page.title.clone(),
            },
        },
        icon: page.icon.clone(),
        children,
    };
    let created = api.create_page(&request).map_err(PublishError::CreatePage)?;
    tracing::info!(page_id = %created.id, blocks = page.topblock_ids.len(), "created page");

    if page.children_ids.is_empty() {
        return Ok(PublishOutcome::new(created.id, PublishStatus::Complete));
    }
    if page.max >= options.max_deferred_depth {
        tracing::warn!(
            depth = page.max,
            limit = options.max_deferred_depth,
            "nesting too deep, deferred blocks omitted"
        );
        return Ok(PublishOutcome::new(
            created.id,
            PublishStatus::OmittedDeepNesting,
        ));
    }

    let listed = list_all(api, &created.id, options.page_size)?;
    if listed.len() != page.topblock_ids.len() {
        tracing::debug!(
            expected = page.topblock_ids.len(),
            listed = listed.len(),
            "listing does not match the created blocks"
        );
    }
    let mut remote_ids: HashMap<String, String> = page
        .topblock_ids
        .iter()
        .cloned()
        .zip(listed)
        .collect();

    let mut failures = BTreeMap::new();
    let mut lost: HashSet<String> = HashSet::new();
    for (parent, group) in group_by_parent(page)? {
        if lost.contains(&parent) {
            tracing::debug!(%parent, "skipping children of a block that was not created");
            lost.extend(group);
            continue;
        }
        let Some(remote_parent) = remote_ids.get(&parent).cloned() else {
            tracing::error!(%parent, "missing remote id");
            failures.insert(format!("parent: {parent}"), "missing remote id".to_string());
            lost.extend(group);
            continue;
        };

        let blocks = payloads(page, &group)?;
        match api.append_children(&remote_parent, &blocks) {
            Ok(appended) => {
                tracing::debug!(%parent, count = appended.len(), "appended children");
                remote_ids.extend(group.into_iter().zip(appended));
            }
            Err(err) => {
                tracing::error!(%parent, error = %err, "failed to append children");
                failures.insert(format!("parent: {parent}"), err.to_string());
                lost.extend(group);
            }
        }
    }

    let status = if failures.is_empty() {
        PublishStatus::Complete
    } else {
        PublishStatus::PartialFailure
    };
    tracing::info!(page_id = %created.id, ?status, "publish finished");
    Ok(PublishOutcome {
        page_id: created.id,
        status,
        failures,
        remote_ids: remote_ids.into_iter().collect(),
    })
}

fn payloads<T>(page: &PageDescriptor<T>, ids: &[String]) -> Result<Vec<Block>, PublishError> {
    ids.iter()
        .map(|id| {
            page.record(id)
                .map(|record| record.block.clone())
                .ok_or_else(|| PublishError::MissingRecord(id.clone()))
        })
        .collect()
}

fn list_all(
    api: &mut dyn PageApi,
    page_id: &str,
    page_size: usize,
) -> Result<Vec<String>, PublishError> {
    let mut ids = Vec::new();
    let mut cursor: Option<String> = None;
    loop {
        let listing = api
            .list_children(page_id, cursor.as_deref(), page_size)
            .map_err(|source| PublishError::ListChildren {
                page_id: page_id.to_string(),
                source,
            })?;
        ids.extend(listing.ids);
        match listing.next_cursor {
            Some(next) if listing.has_more => cursor = Some(next),
            _ => break,
        }
    }
    Ok(ids)
}

/// Deferred ids bucketed by parent, buckets in first-appearance order.
///
/// The deferred list is in pre-order, so every bucket comes after the bucket
/// that holds its parent.
fn group_by_parent<T>(page: &PageDescriptor<T>) -> Result<Vec<(String, Vec<String>)>, PublishError> {
    let mut groups: Vec<(String, Vec<String>)> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();
    for id in &page.children_ids {
        let record = page
            .record(id)
            .ok_or_else(|| PublishError::MissingRecord(id.clone()))?;
        let Some(parent) = record.parent_id.clone() else {
            continue;
        };
        match index.get(&parent) {
            Some(&slot) => groups[slot].1.push(id.clone()),
            None => {
                index.insert(parent.clone(), groups.len());
                groups.push((parent, vec![id.clone()]));
            }
        }
    }
    Ok(groups)
}
