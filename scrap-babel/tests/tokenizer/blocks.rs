use crate::common::{bullet, kinds, text, tokenize, tokenize_with};
use scrap_babel::blocks::{Block, TableBody};
use scrap_babel::formats::html::tokenizer::Dialect;
use scrap_babel::{ConvertError, ConvertOptions, WarningKind};

#[test]
fn list_items_keep_their_first_line() {
    let (blocks, diagnostics) = tokenize("<ul><li>A</li><li>B</li></ul>").unwrap();
    assert_eq!(blocks, vec![bullet("A", vec![]), bullet("B", vec![])]);
    assert!(diagnostics.is_empty());
}

#[test]
fn nested_lists_become_children() {
    let (blocks, _) = tokenize("<ol><li>outer<ul><li>inner</li></ul></li></ol>").unwrap();
    let Block::NumberedListItem { numbered_list_item } = &blocks[0] else {
        panic!("expected a numbered item, got {:?}", blocks[0]);
    };
    assert_eq!(numbered_list_item.rich_text, text("outer"));
    assert_eq!(
        numbered_list_item.children,
        Some(vec![bullet("inner", vec![])])
    );
}

#[test]
fn double_break_is_one_blank_block() {
    let (blocks, _) = tokenize("<p>x<br><br>y</p>").unwrap();
    assert_eq!(kinds(&blocks), vec!["paragraph", "paragraph", "paragraph"]);
    assert_eq!(blocks.iter().filter(|b| b.is_blank()).count(), 1);
    assert!(blocks[1].is_blank());
}

#[test]
fn single_break_is_a_newline_in_the_run() {
    let (blocks, _) = tokenize("<p>x<br>y</p>").unwrap();
    assert_eq!(blocks.len(), 1);
    let runs = blocks[0].rich_text().unwrap();
    assert_eq!(runs[0].content, "x\n");
    assert_eq!(runs[1].content, "y");
}

#[test]
fn break_at_stream_start_adds_nothing() {
    let (blocks, _) = tokenize("<p><br>y</p>").unwrap();
    assert_eq!(blocks, vec![Block::paragraph(text("y"))]);
}

#[test]
fn quote_starting_with_an_image_has_no_first_line() {
    let (blocks, _) = tokenize(r#"<blockquote><img src="/i.png"><p>after</p></blockquote>"#).unwrap();
    assert_eq!(
        blocks,
        vec![Block::quote(
            vec![],
            Some(vec![
                Block::external_image("https://zenn.dev/i.png"),
                Block::paragraph(text("after")),
            ])
        )]
    );
}

#[test]
fn language_aliases_are_resolved() {
    let (blocks, diagnostics) = tokenize(
        r#"<div class="code-block-container"><pre><code class="language-ts">let a = 1;
</code></pre></div>"#,
    )
    .unwrap();
    let Block::Code { code } = &blocks[0] else {
        panic!("expected a code block");
    };
    assert_eq!(code.language, "typescript");
    assert_eq!(code.rich_text[0].content, "let a = 1;");
    assert!(diagnostics.is_empty());
}

#[test]
fn unknown_language_falls_back_to_plain_text() {
    let (blocks, diagnostics) = tokenize(
        r#"<div class="code-block-container"><pre><code class="language-zig">const a = 1;</code></pre></div>"#,
    )
    .unwrap();
    let Block::Code { code } = &blocks[0] else {
        panic!("expected a code block");
    };
    assert_eq!(code.language, "plain text");
    assert_eq!(diagnostics.count(WarningKind::UnknownLanguage), 1);
}

#[test]
fn non_image_source_becomes_an_embed() {
    let (blocks, diagnostics) = tokenize(r#"<img src="https://img.test/a/b.webp">"#).unwrap();
    assert_eq!(blocks, vec![Block::embed("https://img.test/a/b.webp")]);
    assert_eq!(diagnostics.count(WarningKind::NonImageUrl), 1);
}

#[test]
fn ragged_table_is_padded_to_the_widest_row() {
    let (blocks, diagnostics) = tokenize(
        "<table><tr><th>a</th><th>b</th></tr><tr><td>1</td><td>2</td><td>3</td></tr></table>",
    )
    .unwrap();
    let Block::Table {
        table: TableBody {
            table_width,
            children,
            ..
        },
    } = &blocks[0]
    else {
        panic!("expected a table");
    };
    assert_eq!(*table_width, 3);
    for row in children {
        let Block::TableRow { table_row } = row else {
            panic!("expected a table row");
        };
        assert_eq!(table_row.cells.len(), 3);
    }
    assert_eq!(diagnostics.count(WarningKind::RaggedTable), 1);
}

#[test]
fn ragged_table_keeps_first_row_width_when_padding_is_off() {
    let options = ConvertOptions {
        pad_ragged_tables: false,
        ..ConvertOptions::default()
    };
    let (blocks, _) = tokenize_with(
        Dialect::Zenn,
        "<table><tr><td>a</td></tr><tr><td>1</td><td>2</td></tr></table>",
        &options,
    )
    .unwrap();
    let Block::Table { table } = &blocks[0] else {
        panic!("expected a table");
    };
    assert_eq!(table.table_width, 1);
}

#[test]
fn empty_table_is_skipped_with_a_warning() {
    let (blocks, diagnostics) = tokenize("<table></table><p>after</p>").unwrap();
    assert_eq!(blocks, vec![Block::paragraph(text("after"))]);
    assert_eq!(diagnostics.count(WarningKind::EmptyTable), 1);
}

#[test]
fn long_text_is_truncated_to_the_limit() {
    let options = ConvertOptions {
        text_limit: 20,
        ..ConvertOptions::default()
    };
    let long = "あ".repeat(50);
    let (blocks, diagnostics) =
        tokenize_with(Dialect::Zenn, &format!("<p>{long}</p>"), &options).unwrap();
    let content = &blocks[0].rich_text().unwrap()[0].content;
    assert_eq!(content.chars().count(), 20);
    assert!(content.ends_with(&options.truncation_marker));
    assert_eq!(diagnostics.count(WarningKind::TextTruncated), 1);
}

#[test]
fn line_break_after_a_truncated_run_stays_within_the_limit() {
    let options = ConvertOptions {
        text_limit: 20,
        ..ConvertOptions::default()
    };
    let long = "あ".repeat(50);
    let (blocks, _) =
        tokenize_with(Dialect::Zenn, &format!("<p>{long}<br>tail</p>"), &options).unwrap();
    let runs = blocks[0].rich_text().unwrap();
    assert_eq!(runs[0].content.chars().count(), 20);
    assert!(runs[0].content.ends_with(&options.truncation_marker));
    assert_eq!(runs[1].content, "tail");
}

#[test]
fn message_and_alert_callouts() {
    let (blocks, _) = tokenize(
        r#"<aside class="msg message"><div class="msg-content"><p>note this</p></div></aside>
           <aside class="msg alert"><div class="msg-content"><p>careful</p></div></aside>"#,
    )
    .unwrap();
    let colors: Vec<&str> = blocks
        .iter()
        .map(|block| match block {
            Block::Callout { callout } => callout.color.as_str(),
            other => panic!("expected a callout, got {other:?}"),
        })
        .collect();
    assert_eq!(colors, vec!["yellow_background", "red_background"]);
    assert_eq!(blocks[1].rich_text().unwrap(), text("careful").as_slice());
}

#[test]
fn message_without_content_aborts() {
    let result = tokenize(r#"<aside class="msg message"><p>loose</p></aside>"#);
    assert!(matches!(result, Err(ConvertError::UnexpectedTree { .. })));
}

#[test]
fn iframe_embed_and_broken_embed() {
    let (blocks, _) = tokenize(
        r#"<div class="embed-youtube"><iframe src="https://www.youtube.com/embed/abc"></iframe></div>
           <div class="embed-speakerdeck"></div>"#,
    )
    .unwrap();
    assert_eq!(blocks[0], Block::embed("https://www.youtube.com/embed/abc"));
    let Block::Callout { callout } = &blocks[1] else {
        panic!("expected a notice callout");
    };
    assert_eq!(
        callout.rich_text[0].content,
        ConvertOptions::default().failed_embed_text
    );
}

#[test]
fn scripts_are_skipped_silently() {
    let (blocks, diagnostics) =
        tokenize("<script>var a = 1;</script><style>p {}</style><p>kept</p>").unwrap();
    assert_eq!(blocks, vec![Block::paragraph(text("kept"))]);
    assert!(diagnostics.is_empty());
}
