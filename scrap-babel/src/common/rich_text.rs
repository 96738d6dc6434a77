//! Builds the API's atomic text runs from text or equation leaves.

use crate::blocks::{RichTextRun, RunKind};
use crate::diagnostics::{Diagnostics, WarningKind};
use crate::options::ConvertOptions;

/// Inline formatting active while walking the DOM.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Marker {
    Strong,
    Emphasis,
    Strike,
    InlineCode,
}

/// Make a single run, truncating content longer than the configured limit.
///
/// Returns a one-element vector so callers can splice the result into a run
/// stream directly.
pub fn make_run(
    kind: RunKind,
    content: &str,
    link: Option<&str>,
    options: &ConvertOptions,
    diagnostics: &mut Diagnostics,
) -> Vec<RichTextRun> {
    let content = truncate(content, options, diagnostics);
    let run = match kind {
        RunKind::Equation => RichTextRun::equation(content),
        RunKind::Text | RunKind::Mention => {
            let run = RichTextRun::text(content);
            match link {
                Some(href) if !href.is_empty() => run.with_link(href),
                _ => run,
            }
        }
    };
    vec![run]
}

/// Set the annotation flag of every marker on every run.
///
/// Applying the same marker twice is a no-op.
pub fn apply_annotations(runs: &mut [RichTextRun], markers: &[Marker]) {
    for run in runs.iter_mut() {
        for marker in markers {
            match marker {
                Marker::Strong => run.annotations.bold = true,
                Marker::Emphasis => run.annotations.italic = true,
                Marker::Strike => run.annotations.strikethrough = true,
                Marker::InlineCode => run.annotations.code = true,
            }
        }
    }
}

/// Append `suffix` to a run without letting it grow past the limit.
pub fn append_text(
    run: &mut RichTextRun,
    suffix: &str,
    options: &ConvertOptions,
    diagnostics: &mut Diagnostics,
) {
    run.content.push_str(suffix);
    if run.content.chars().count() > options.text_limit {
        run.content = truncate(&run.content, options, diagnostics);
    }
}

fn truncate(content: &str, options: &ConvertOptions, diagnostics: &mut Diagnostics) -> String {
    let length = content.chars().count();
    if length <= options.text_limit {
        return content.to_string();
    }
    let marker_len = options.truncation_marker.chars().count();
    let keep = options.text_limit.saturating_sub(marker_len);
    let mut truncated: String = content.chars().take(keep).collect();
    truncated.push_str(&options.truncation_marker);
    diagnostics.warn(
        WarningKind::TextTruncated,
        format!(
            "text of {length} characters exceeds the limit of {}; the rest is omitted",
            options.text_limit
        ),
    );
    truncated
}
