use crate::common::{tokenize, tokenize_with};
use proptest::prelude::*;
use scrap_babel::blocks::{Block, RichTextRun};
use scrap_babel::formats::html::tokenizer::Dialect;
use scrap_babel::ConvertOptions;

const FRAGMENTS: &[&str] = &[
    "<p>text</p>",
    "text",
    "<br>",
    "<strong>b</strong>",
    "<ul><li>i</li></ul>",
    "<hr>",
];

fn body() -> impl Strategy<Value = String> {
    prop::collection::vec(prop::sample::select(FRAGMENTS), 1..12).prop_map(|parts| parts.concat())
}

const LIMIT: usize = 24;

const LONG_FRAGMENTS: &[&str] = &[
    "<p>あいうえおかきくけこさしすせそたちつてとなにぬねの</p>",
    "abcdefghijklmnopqrstuvwxyz0123",
    "<br>",
    "<strong>boldboldboldboldboldbold</strong>",
    "<a href=\"/x\">linklinklinklinklinklink</a>",
    "<ul><li>itemitemitemitemitemitem<br>more</li></ul>",
];

fn long_body() -> impl Strategy<Value = String> {
    prop::collection::vec(prop::sample::select(LONG_FRAGMENTS), 1..10)
        .prop_map(|parts| parts.concat())
}

fn all_runs<'a>(blocks: &'a [Block], out: &mut Vec<&'a RichTextRun>) {
    for block in blocks {
        out.extend(block.rich_text().unwrap_or_default());
        if let Some(children) = block.children() {
            all_runs(children, out);
        }
    }
}

proptest! {
    #[test]
    fn every_run_respects_the_text_limit(html in long_body()) {
        let options = ConvertOptions {
            text_limit: LIMIT,
            ..ConvertOptions::default()
        };
        let (blocks, _) = tokenize_with(Dialect::Zenn, &html, &options).unwrap();
        let mut runs = Vec::new();
        all_runs(&blocks, &mut runs);
        for run in runs {
            prop_assert!(
                run.content.chars().count() <= LIMIT,
                "run {:?} is longer than {} in {:?}",
                run.content,
                LIMIT,
                html
            );
        }
    }

    #[test]
    fn no_two_consecutive_blank_blocks(html in body()) {
        prop_assume!(!html.contains("<br><br>"));
        let (blocks, _) = tokenize(&html).unwrap();
        for pair in blocks.windows(2) {
            prop_assert!(
                !(pair[0].is_blank() && pair[1].is_blank()),
                "consecutive blanks in {:?}",
                html
            );
        }
    }

    #[test]
    fn block_elements_map_one_to_one(html in body()) {
        let (blocks, diagnostics) = tokenize(&html).unwrap();
        prop_assert!(diagnostics.is_empty());
        let count = |kind: &str| blocks.iter().filter(|b| b.kind_name() == kind).count();
        prop_assert_eq!(count("divider"), html.matches("<hr>").count());
        prop_assert_eq!(count("bulleted_list_item"), html.matches("<li>").count());
    }
}
