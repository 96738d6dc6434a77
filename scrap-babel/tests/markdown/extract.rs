use crate::common::text;
use comrak::nodes::{AstNode, NodeValue};
use comrak::{parse_document, Arena, Options};
use scrap_babel::blocks::{Block, Empty, TableBody, TableRowBody, TextBody};
use scrap_babel::formats::{blocks_to_markdown, load_blocks};
use scrap_babel::transforms::{convert_html, extract_markdown, page_to_json};
use scrap_babel::{ConvertError, ConvertOptions, ExtractOptions, SequentialIds};

fn comrak_options() -> Options<'static> {
    let mut options = Options::default();
    options.extension.table = true;
    options.extension.tasklist = true;
    options
}

fn collect<'a>(root: &'a AstNode<'a>, pick: impl Fn(&NodeValue) -> Option<String>) -> Vec<String> {
    root.descendants()
        .filter_map(|node| pick(&node.data.borrow().value))
        .collect()
}

fn zenn_markdown() -> String {
    let html = crate::common::fixture("sites", "zenn_article.html");
    let mut ids = SequentialIds::new();
    let conversion = convert_html(
        &html,
        "https://zenn.dev/alice/articles/rust-html",
        None,
        &ConvertOptions::default(),
        &mut ids,
    )
    .unwrap();
    let json = page_to_json(&conversion.page).unwrap();
    extract_markdown(&json, &ExtractOptions::default()).unwrap()
}

#[test]
fn converted_article_parses_as_markdown() {
    let markdown = zenn_markdown();
    let arena = Arena::new();
    let options = comrak_options();
    let root = parse_document(&arena, &markdown, &options);

    let headings = collect(root, |value| match value {
        NodeValue::Heading(heading) => Some(heading.level.to_string()),
        _ => None,
    });
    assert_eq!(headings, vec!["2"]);

    let code = collect(root, |value| match value {
        NodeValue::CodeBlock(block) => Some(format!("{}|{}", block.info, block.literal)),
        _ => None,
    });
    assert_eq!(code, vec!["typescript|const x = 1;\n"]);

    let links = collect(root, |value| match value {
        NodeValue::Link(link) => Some(link.url.clone()),
        _ => None,
    });
    assert!(links.contains(&"https://zenn.dev/alice/articles/rust-html".to_string()));
    assert!(links.contains(&"https://zenn.dev/bob".to_string()));

    let images = collect(root, |value| match value {
        NodeValue::Image(link) => Some(link.url.clone()),
        _ => None,
    });
    assert_eq!(images, vec!["https://zenn.dev/images/diagram.png"]);
}

#[test]
fn deferred_children_are_reattached_before_rendering() {
    let markdown = zenn_markdown();
    let arena = Arena::new();
    let options = comrak_options();
    let root = parse_document(&arena, &markdown, &options);

    let deepest = root
        .descendants()
        .find(|node| matches!(&node.data.borrow().value, NodeValue::Text(t) if t == "最も深い"))
        .expect("deepest list item to be rendered");
    let items = deepest
        .ancestors()
        .filter(|node| matches!(node.data.borrow().value, NodeValue::Item(_)))
        .count();
    assert_eq!(items, 4);
}

#[test]
fn tables_render_as_pipe_tables() {
    let row = |cells: &[&str]| Block::TableRow {
        table_row: TableRowBody {
            cells: cells.iter().map(|c| text(c)).collect(),
        },
    };
    let table = |has_column_header| Block::Table {
        table: TableBody {
            table_width: 2,
            has_column_header,
            has_row_header: false,
            children: vec![row(&["name", "value"]), row(&["a", "1"])],
        },
    };

    for (header, expected_rows) in [(true, 2), (false, 3)] {
        let markdown = blocks_to_markdown(&[table(header)], &ExtractOptions::default());
        let arena = Arena::new();
        let options = comrak_options();
        let root = parse_document(&arena, &markdown, &options);
        let rows = root
            .descendants()
            .filter(|node| matches!(node.data.borrow().value, NodeValue::TableRow(_)))
            .count();
        assert_eq!(rows, expected_rows, "{markdown}");
    }
}

#[test]
fn table_of_contents_links_every_heading() {
    let heading = |level: u8, content: &str| {
        let body = TextBody {
            rich_text: text(content),
        };
        match level {
            1 => Block::Heading1 { heading_1: body },
            _ => Block::Heading2 { heading_2: body },
        }
    };
    let blocks = vec![
        Block::TableOfContents {
            table_of_contents: Empty::default(),
        },
        heading(1, "Intro"),
        heading(2, "Sub Part"),
    ];
    let markdown = blocks_to_markdown(&blocks, &ExtractOptions::default());
    assert!(markdown.starts_with("- [**Intro**](#intro)\n  - [**Sub Part**](#sub-part)"));

    let arena = Arena::new();
    let options = comrak_options();
    let root = parse_document(&arena, &markdown, &options);
    let links = collect(root, |value| match value {
        NodeValue::Link(link) => Some(link.url.clone()),
        _ => None,
    });
    assert_eq!(links, vec!["#intro", "#sub-part"]);
}

#[test]
fn api_listing_with_unknown_blocks() {
    let json = r#"{
        "object": "list",
        "results": [
            {
                "object": "block",
                "id": "b1",
                "type": "paragraph",
                "paragraph": {
                    "rich_text": [{
                        "type": "text",
                        "text": {"content": "Hello", "link": null},
                        "annotations": {"bold": true, "italic": false, "strikethrough": false,
                                        "underline": false, "code": false, "color": "default"},
                        "plain_text": "Hello",
                        "href": null
                    }]
                }
            },
            {"object": "block", "id": "b2", "type": "synced_block", "synced_block": {}}
        ],
        "has_more": false
    }"#;
    let blocks = load_blocks(json).unwrap();
    assert_eq!(blocks.len(), 2);
    assert_eq!(blocks[1], Block::Unsupported);
    let markdown = blocks_to_markdown(&blocks, &ExtractOptions::default());
    assert_eq!(markdown, "**Hello**\nunsupported block");
}

#[test]
fn scalar_json_is_rejected() {
    assert!(matches!(load_blocks("42"), Err(ConvertError::InvalidInput(_))));
    assert!(matches!(
        load_blocks("{not json"),
        Err(ConvertError::Serialization(_))
    ));
}
