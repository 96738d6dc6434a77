use crate::common::{bullet, text};
use scrap_babel::blocks::Block;
use scrap_babel::page::{PageBuilder, PageMeta};
use scrap_babel::publish::{ChildrenPage, CreatePageRequest, CreatedPage};
use scrap_babel::{
    publish, ApiError, ConvertOptions, Diagnostics, Icon, PageApi, PageDescriptor, PublishError,
    PublishOptions, PublishStatus, SequentialIds,
};
use std::collections::HashSet;

const TARGET: &str = "target-page";

#[derive(Default)]
struct MockApi {
    created: Vec<CreatePageRequest>,
    listed: Vec<(String, Option<String>, usize)>,
    appended: Vec<(String, Vec<Block>)>,
    top_count: usize,
    fail_create: bool,
    fail_list: bool,
    fail_append_under: HashSet<String>,
    list_limit: Option<usize>,
    issued: usize,
}

impl PageApi for MockApi {
    fn create_page(&mut self, request: &CreatePageRequest) -> Result<CreatedPage, ApiError> {
        if self.fail_create {
            return Err(ApiError::with_status(401, "unauthorized"));
        }
        self.top_count = request.children.len();
        self.created.push(request.clone());
        Ok(CreatedPage {
            id: "page-1".to_string(),
        })
    }

    fn list_children(
        &mut self,
        block_id: &str,
        cursor: Option<&str>,
        page_size: usize,
    ) -> Result<ChildrenPage, ApiError> {
        self.listed
            .push((block_id.to_string(), cursor.map(str::to_string), page_size));
        if self.fail_list {
            return Err(ApiError::new("connection reset"));
        }
        let total = self
            .list_limit
            .map_or(self.top_count, |limit| limit.min(self.top_count));
        let start: usize = cursor.map_or(0, |c| c.parse().unwrap());
        let end = (start + page_size).min(total);
        let has_more = end < total;
        Ok(ChildrenPage {
            ids: (start..end).map(|i| format!("r-{i}")).collect(),
            has_more,
            next_cursor: has_more.then(|| end.to_string()),
        })
    }

    fn append_children(
        &mut self,
        block_id: &str,
        children: &[Block],
    ) -> Result<Vec<String>, ApiError> {
        self.appended.push((block_id.to_string(), children.to_vec()));
        if self.fail_append_under.contains(block_id) {
            return Err(ApiError::with_status(400, "validation failed"));
        }
        Ok(children
            .iter()
            .map(|_| {
                self.issued += 1;
                format!("a-{}", self.issued)
            })
            .collect())
    }
}

/// A list item nested one level per label.
fn chain(labels: &[&str]) -> Block {
    match labels {
        [] => panic!("chain needs at least one label"),
        [last] => bullet(last, vec![]),
        [first, rest @ ..] => bullet(first, vec![chain(rest)]),
    }
}

fn page(blocks: Vec<Block>) -> PageDescriptor<()> {
    let mut ids = SequentialIds::new();
    let options = ConvertOptions::default();
    let mut builder: PageBuilder<'_, ()> =
        PageBuilder::new("https://zenn.dev/alice/articles/sample", &mut ids, &options);
    builder.push_group(blocks, &());
    builder.finish(
        PageMeta {
            title: "Sample".to_string(),
            icon: Some(Icon::emoji("🦀")),
            ..PageMeta::default()
        },
        &mut Diagnostics::new(),
    )
}

fn options(max_deferred_depth: usize) -> PublishOptions {
    PublishOptions {
        max_deferred_depth,
        ..PublishOptions::default()
    }
}

#[test]
fn shallow_page_is_created_in_one_call() {
    let page = page(vec![
        Block::paragraph(text("one")),
        chain(&["a", "b", "c"]),
    ]);
    let mut api = MockApi::default();
    let outcome = publish(&mut api, TARGET, &page, &PublishOptions::default()).unwrap();

    assert_eq!(outcome.page_id, "page-1");
    assert_eq!(outcome.status, PublishStatus::Complete);
    assert!(api.listed.is_empty());
    assert!(api.appended.is_empty());

    let request = &api.created[0];
    assert_eq!(request.parent.page_id, TARGET);
    assert_eq!(request.properties.title.title, text("Sample"));
    assert_eq!(request.icon, Some(Icon::emoji("🦀")));
    assert_eq!(request.children[1], chain(&["a", "b", "c"]));
}

#[test]
fn deferred_children_are_appended_to_listed_parents() {
    let page = page(vec![chain(&["a", "b", "c", "d"]), Block::paragraph(text("p"))]);
    assert_eq!(page.children_ids, vec!["block-3"]);

    let mut api = MockApi::default();
    let outcome = publish(&mut api, TARGET, &page, &PublishOptions::default()).unwrap();

    assert_eq!(outcome.status, PublishStatus::Complete);
    assert_eq!(api.listed, vec![("page-1".to_string(), None, 100)]);
    assert_eq!(api.appended.len(), 1);
    assert_eq!(api.appended[0].0, "r-0");
    assert_eq!(api.appended[0].1, vec![chain(&["b", "c", "d"])]);
    assert_eq!(outcome.remote_ids["block-2"], "r-0");
    assert_eq!(outcome.remote_ids["block-4"], "r-1");
    assert_eq!(outcome.remote_ids["block-3"], "a-1");
    assert!(outcome.failures.is_empty());
}

#[test]
fn deeper_levels_target_the_ids_returned_by_earlier_appends() {
    let page = page(vec![chain(&["a", "b", "c", "d", "e"])]);
    let mut api = MockApi::default();
    let outcome = publish(&mut api, TARGET, &page, &options(5)).unwrap();

    assert_eq!(outcome.status, PublishStatus::Complete);
    let targets: Vec<&str> = api.appended.iter().map(|(id, _)| id.as_str()).collect();
    assert_eq!(targets, vec!["r-0", "a-1"]);
    assert_eq!(api.appended[1].1, vec![chain(&["c", "d", "e"])]);
}

#[test]
fn too_deep_pages_skip_the_append_phase() {
    let page = page(vec![chain(&["a", "b", "c", "d", "e"])]);
    assert_eq!(page.max, 4);
    let mut api = MockApi::default();
    let outcome = publish(&mut api, TARGET, &page, &PublishOptions::default()).unwrap();

    assert_eq!(outcome.status, PublishStatus::OmittedDeepNesting);
    assert_eq!(api.created.len(), 1);
    assert!(api.listed.is_empty());
    assert!(api.appended.is_empty());
}

#[test]
fn failed_append_loses_only_that_subtree() {
    let page = page(vec![
        chain(&["x", "xb", "xc", "xd", "xe"]),
        chain(&["y", "yb", "yc", "yd"]),
    ]);
    assert_eq!(page.children_ids, vec!["block-3", "block-4", "block-6"]);

    let mut api = MockApi {
        fail_append_under: HashSet::from(["r-0".to_string()]),
        ..MockApi::default()
    };
    let outcome = publish(&mut api, TARGET, &page, &options(5)).unwrap();

    assert_eq!(outcome.status, PublishStatus::PartialFailure);
    assert_eq!(outcome.failures.len(), 1);
    assert_eq!(
        outcome.failures["parent: block-2"],
        "[400] validation failed"
    );
    let targets: Vec<&str> = api.appended.iter().map(|(id, _)| id.as_str()).collect();
    assert_eq!(targets, vec!["r-0", "r-1"]);
    assert!(!outcome.remote_ids.contains_key("block-3"));
    assert_eq!(outcome.remote_ids["block-6"], "a-1");
}

#[test]
fn parent_missing_from_the_listing_is_reported() {
    let page = page(vec![chain(&["x", "xb", "xc", "xd"]), chain(&["y", "yb", "yc", "yd"])]);
    let mut api = MockApi {
        list_limit: Some(1),
        ..MockApi::default()
    };
    let outcome = publish(&mut api, TARGET, &page, &PublishOptions::default()).unwrap();

    assert_eq!(outcome.status, PublishStatus::PartialFailure);
    assert_eq!(outcome.failures["parent: block-4"], "missing remote id");
    assert_eq!(api.appended.len(), 1);
}

#[test]
fn listing_is_paginated() {
    let page = page(vec![
        Block::paragraph(text("one")),
        Block::paragraph(text("two")),
        chain(&["a", "b", "c", "d"]),
    ]);
    let mut api = MockApi::default();
    let options = PublishOptions {
        page_size: 2,
        ..PublishOptions::default()
    };
    let outcome = publish(&mut api, TARGET, &page, &options).unwrap();

    let cursors: Vec<Option<&str>> = api.listed.iter().map(|(_, c, _)| c.as_deref()).collect();
    assert_eq!(cursors, vec![None, Some("2")]);
    assert_eq!(api.appended[0].0, "r-2");
    assert_eq!(outcome.status, PublishStatus::Complete);
}

#[test]
fn listing_failure_is_fatal() {
    let page = page(vec![chain(&["a", "b", "c", "d"])]);
    let mut api = MockApi {
        fail_list: true,
        ..MockApi::default()
    };
    let err = publish(&mut api, TARGET, &page, &PublishOptions::default()).unwrap_err();
    assert_eq!(
        err,
        PublishError::ListChildren {
            page_id: "page-1".to_string(),
            source: ApiError::new("connection reset"),
        }
    );
    assert!(api.appended.is_empty());
}

#[test]
fn create_failure_is_fatal() {
    let page = page(vec![Block::paragraph(text("one"))]);
    let mut api = MockApi {
        fail_create: true,
        ..MockApi::default()
    };
    let err = publish(&mut api, TARGET, &page, &PublishOptions::default()).unwrap_err();
    assert!(matches!(err, PublishError::CreatePage(ref e) if e.status == Some(401)));
    assert!(api.listed.is_empty());
}

#[test]
fn dangling_top_level_id_is_rejected_before_any_call() {
    let mut page = page(vec![Block::paragraph(text("one"))]);
    page.topblock_ids.push("nowhere".to_string());
    let mut api = MockApi::default();
    let err = publish(&mut api, TARGET, &page, &PublishOptions::default()).unwrap_err();
    assert_eq!(err, PublishError::MissingRecord("nowhere".to_string()));
    assert!(api.created.is_empty());
}
