use super::{convert, top_kinds};
use scrap_babel::blocks::Block;
use scrap_babel::page::{BLANK_ID, DIVIDER_ID};
use scrap_babel::{Icon, ScrapInfo};

const ARTICLE_URL: &str = "https://zenn.dev/alice/articles/rust-html";
const SCRAP_URL: &str = "https://zenn.dev/alice/scraps/abc123";

#[test]
fn article_metadata() {
    let conversion = convert("zenn_article.html", ARTICLE_URL);
    let page = &conversion.page;
    assert_eq!(page.title[0].content, "Rust で HTML を変換する");
    assert_eq!(page.author, "alice");
    assert_eq!(page.topics, vec!["Rust", "HTML"]);
    assert_eq!(page.icon, Some(Icon::emoji("🦀")));
    assert!(
        conversion.diagnostics.is_empty(),
        "unexpected warnings: {:?}",
        conversion.diagnostics.warnings()
    );
}

#[test]
fn article_layout() {
    let page = convert("zenn_article.html", ARTICLE_URL).page;
    assert_eq!(
        top_kinds(&page),
        vec![
            "paragraph",
            "quote",
            "paragraph",
            "paragraph",
            "heading_2",
            "paragraph",
            "paragraph",
            "paragraph",
            "bulleted_list_item",
            "bulleted_list_item",
            "code",
            "callout",
            "toggle",
            "table",
            "bookmark",
            "image",
            "paragraph",
            "callout",
        ]
    );
    insta::assert_json_snapshot!(page.topblock_ids, @r#"
    [
      "blank",
      "block-1",
      "blank",
      "blank",
      "block-2",
      "block-3",
      "block-4",
      "block-5",
      "block-6",
      "block-8",
      "block-9",
      "block-10",
      "block-11",
      "block-12",
      "block-13",
      "block-14",
      "blank",
      "block-15"
    ]
    "#);
}

#[test]
fn article_detaches_the_deep_list() {
    let page = convert("zenn_article.html", ARTICLE_URL).page;
    assert_eq!(page.max, 3);
    assert_eq!(page.children_ids, vec!["block-7"]);

    let parent = page.record("block-6").unwrap();
    assert_eq!(parent.block.children(), None);
    let child = page.record("block-7").unwrap();
    assert_eq!(child.parent_id.as_deref(), Some("block-6"));
    assert_eq!(child.block.rich_text().unwrap()[0].content, "入れ子");
    assert_eq!(child.block.children().map(<[Block]>::len), Some(1));
}

#[test]
fn article_content_details() {
    let page = convert("zenn_article.html", ARTICLE_URL).page;

    let Block::Code { code } = &page.record("block-9").unwrap().block else {
        panic!("expected a code block");
    };
    assert_eq!(code.language, "typescript");

    let Block::Bookmark { bookmark } = &page.record("block-13").unwrap().block else {
        panic!("expected a bookmark");
    };
    assert_eq!(bookmark.url, "https://example.com/post");

    let Block::Image { image } = &page.record("block-14").unwrap().block else {
        panic!("expected an image");
    };
    assert_eq!(image.source.url(), "https://zenn.dev/images/diagram.png");

    let Block::Callout { callout } = &page.record("block-15").unwrap().block else {
        panic!("expected the footnote callout");
    };
    assert_eq!(callout.rich_text[0].content, "注釈");
    assert_eq!(callout.children.as_ref().map(Vec::len), Some(1));

    let runs = page.record("block-3").unwrap().block.rich_text().unwrap();
    assert!(runs.iter().any(|r| r.content == "最初" && r.annotations.bold));
    assert!(runs
        .iter()
        .any(|r| r.link.as_deref() == Some("https://zenn.dev/bob")));
}

#[test]
fn scrap_threads_are_separated_by_dividers() {
    let conversion = convert("zenn_scrap.html", SCRAP_URL);
    let page = &conversion.page;
    assert_eq!(page.title[0].content, "ビルドのメモ");
    assert_eq!(page.topics, vec!["Rust", "Cargo"]);
    assert_eq!(
        page.icon,
        Some(Icon::external("https://zenn.dev/images/alice.png"))
    );
    insta::assert_json_snapshot!(page.topblock_ids, @r#"
    [
      "block-1",
      "blank",
      "blank",
      "block-2",
      "blank",
      "blank",
      "block-3",
      "blank",
      "divider",
      "blank",
      "block-4"
    ]
    "#);
    assert!(page.data.contains_key(BLANK_ID) && page.data.contains_key(DIVIDER_ID));
}

#[test]
fn scrap_comments_carry_their_position() {
    let page = convert("zenn_scrap.html", SCRAP_URL).page;
    let info = |id: &str| page.record(id).unwrap().options.clone();
    assert_eq!(
        info("block-2"),
        Some(ScrapInfo {
            thread_idx: "0".to_string(),
            scrap_idx: "0_0".to_string(),
            date_time: Some("2024-01-02T03:04:05.000Z".to_string()),
        })
    );
    assert_eq!(info("block-3").unwrap().scrap_idx, "0_1");
    let last = info("block-4").unwrap();
    assert_eq!(last.thread_idx, "1");
    assert_eq!(last.date_time.as_deref(), Some("2024-01-03T09:30:00.000Z"));
    assert_eq!(info("block-1"), None);
}

#[test]
fn scrap_without_comments_is_rejected() {
    let html = r#"<html><body><h1 class="View_title__t1">empty</h1></body></html>"#;
    let mut ids = scrap_babel::SequentialIds::new();
    let result = scrap_babel::transforms::convert_html(
        html,
        SCRAP_URL,
        None,
        &scrap_babel::ConvertOptions::default(),
        &mut ids,
    );
    assert!(matches!(
        result,
        Err(scrap_babel::ConvertError::UnexpectedTree { .. })
    ));
}
