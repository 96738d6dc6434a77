use super::{convert, top_kinds};
use scrap_babel::blocks::{Block, RunKind};
use scrap_babel::Icon;

const NOTE_URL: &str = "https://note.com/alice/n/n0123456789ab";

#[test]
fn note_metadata() {
    let conversion = convert("note_article.html", NOTE_URL);
    let page = &conversion.page;
    assert_eq!(page.title[0].content, "タイトルテスト");
    assert_eq!(page.author, "alice");
    assert_eq!(page.topics, vec!["rust", "note"]);
    assert_eq!(
        page.icon,
        Some(Icon::external("https://note.com/img/eyecatch.png"))
    );
    assert!(conversion.diagnostics.is_empty());
}

#[test]
fn note_body_blocks() {
    let page = convert("note_article.html", NOTE_URL).page;
    assert_eq!(
        top_kinds(&page),
        vec![
            "paragraph",
            "quote",
            "paragraph",
            "paragraph",
            "heading_2",
            "paragraph",
            "image",
            "paragraph",
            "embed",
            "equation",
            "code",
        ]
    );

    let blocks: Vec<&Block> = page.top_blocks().flatten().collect();
    let runs = blocks[5].rich_text().unwrap();
    assert_eq!(runs[0].content, "note の本文です。\n");
    assert_eq!(runs[1].content, "二行目。");

    let Block::Image { image } = blocks[6] else {
        panic!("expected an image");
    };
    assert_eq!(image.source.url(), "https://assets.st-note.com/img/sample.png");
    assert_eq!(blocks[7].rich_text().unwrap()[0].content, "キャプション");
    assert_eq!(blocks[8], &Block::embed("https://twitter.com/alice/status/1"));

    let Block::Equation { equation } = blocks[9] else {
        panic!("expected an equation");
    };
    assert_eq!(equation.expression, "E = mc^2");
    let Block::Code { code } = blocks[10] else {
        panic!("expected a code block");
    };
    assert_eq!(code.language, "python");
    assert_eq!(code.rich_text[0].kind, RunKind::Text);
    assert_eq!(code.rich_text[0].content, "print(1)");
    assert!(page.children_ids.is_empty());
}

#[test]
fn missing_body_is_an_error() {
    let html = r#"<html><body><h1 class="o-noteContentText__title">t</h1></body></html>"#;
    let mut ids = scrap_babel::SequentialIds::new();
    let result = scrap_babel::transforms::convert_html(
        html,
        NOTE_URL,
        None,
        &scrap_babel::ConvertOptions::default(),
        &mut ids,
    );
    let err = result.unwrap_err();
    assert!(err.to_string().contains("note body not found"), "{err}");
}
