//! Process-wide allow-lists used by the block factory.

use std::collections::HashSet;
use std::sync::LazyLock;

/// Code languages accepted by the target API.
pub static VALID_LANGUAGES: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    [
        "abap",
        "arduino",
        "bash",
        "basic",
        "c",
        "clojure",
        "coffeescript",
        "c++",
        "c#",
        "css",
        "dart",
        "diff",
        "docker",
        "elixir",
        "elm",
        "erlang",
        "flow",
        "fortran",
        "f#",
        "gherkin",
        "glsl",
        "go",
        "graphql",
        "groovy",
        "haskell",
        "html",
        "java",
        "javascript",
        "json",
        "julia",
        "kotlin",
        "latex",
        "less",
        "lisp",
        "livescript",
        "lua",
        "makefile",
        "markdown",
        "markup",
        "matlab",
        "mermaid",
        "nix",
        "objective-c",
        "ocaml",
        "pascal",
        "perl",
        "php",
        "plain text",
        "powershell",
        "prolog",
        "protobuf",
        "python",
        "r",
        "reason",
        "ruby",
        "rust",
        "sass",
        "scala",
        "scheme",
        "scss",
        "shell",
        "solidity",
        "sql",
        "swift",
        "typescript",
        "vb.net",
        "verilog",
        "vhdl",
        "visual basic",
        "webassembly",
        "xml",
        "yaml",
        "java/c/c++/c#",
    ]
    .into_iter()
    .collect()
});

/// Short names mapped onto allowed languages.
const LANGUAGE_ALIASES: &[(&str, &str)] = &[
    ("ts", "typescript"),
    ("tsx", "typescript"),
    ("js", "javascript"),
    ("jsx", "javascript"),
];

/// File extensions the API renders as images.
pub static IMAGE_EXTENSIONS: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    [
        "png", "jpg", "jpeg", "gif", "tif", "tiff", "bmp", "svg", "heic",
    ]
    .into_iter()
    .collect()
});

pub const FALLBACK_LANGUAGE: &str = "plain text";

/// Resolve a language name against the allow-list and its aliases.
pub fn resolve_language(name: &str) -> Option<&'static str> {
    if let Some(found) = VALID_LANGUAGES.get(name) {
        return Some(*found);
    }
    LANGUAGE_ALIASES
        .iter()
        .find(|(alias, _)| *alias == name)
        .map(|(_, target)| *target)
}

/// Whether the URL's path ends with an allowed image extension.
///
/// Query strings and fragments are ignored; URLs that do not parse are
/// classified by their raw text.
pub fn has_image_extension(url: &str) -> bool {
    let path = match url::Url::parse(url) {
        Ok(parsed) => parsed.path().to_string(),
        Err(_) => url.split(['?', '#']).next().unwrap_or_default().to_string(),
    };
    let last_segment = path.rsplit('/').next().unwrap_or_default();
    match last_segment.rsplit_once('.') {
        Some((_, ext)) => IMAGE_EXTENSIONS.contains(ext.to_ascii_lowercase().as_str()),
        None => false,
    }
}
