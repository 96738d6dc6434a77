// Command-line interface for scrap
//
// This binary converts saved zenn and note pages into page payloads for a block-based page API,
// and renders block JSON back to markdown.
//
// The core capabilities use the scrap-babel crate; this program only deals with files, flags and
// configuration. Converted output goes to stdout (or -o), warnings go to stderr through tracing.
//
// Usage:
//  scrap <input.html> --url <URL> [--site <name>] [-o <file>]           - Convert a saved page (default)
//  scrap convert <input.html> --url <URL> [--site <name>] [-o <file>]   - Same as above (explicit)
//  scrap extract <blocks.json> [-o <file>]                              - Render blocks as markdown
//  scrap --list-sites                                                   - List supported sites
//
// Extra Parameters:
//
// Configuration keys can be overridden with --extra-<parameter-name> <value>.
// Example:
//  scrap page.html --url https://zenn.dev/a/articles/b --extra-max-depth 3 --extra-pad-tables false

use clap::{Arg, ArgAction, Command, ValueHint};
use scrap_babel::transforms::{convert_html, extract_markdown, page_to_json};
use scrap_babel::{
    ConvertOptions, ExtractOptions, IdSource, SequentialIds, SiteRegistry, UuidSource,
};
use scrap_config::{Loader, ScrapConfig};
use std::collections::HashMap;
use std::fs;
use std::io::IsTerminal;
use tracing_subscriber::EnvFilter;

/// Parse extra-* arguments from command line args
/// Returns (cleaned_args_without_extras, extra_params_map)
///
/// Supports both:
/// - `--extra-<key> <value>` (explicit value)
/// - `--extra-<key>` (boolean flag, defaults to "true")
fn parse_extra_args(args: &[String]) -> (Vec<String>, HashMap<String, String>) {
    let mut cleaned_args = Vec::new();
    let mut extra_params = HashMap::new();
    let mut i = 0;

    while i < args.len() {
        let arg = &args[i];

        if let Some(key) = arg.strip_prefix("--extra-") {
            let has_value = i + 1 < args.len() && !args[i + 1].starts_with('-');

            if has_value {
                extra_params.insert(key.to_string(), args[i + 1].clone());
                i += 2;
            } else {
                extra_params.insert(key.to_string(), "true".to_string());
                i += 1;
            }
            continue;
        }

        cleaned_args.push(arg.clone());
        i += 1;
    }

    (cleaned_args, extra_params)
}

fn build_cli() -> Command {
    Command::new("scrap")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Convert zenn and note pages into page blocks")
        .long_about(
            "scrap converts saved zenn and note pages into the block payloads of a\n\
            block-based page API, and renders block JSON back to markdown.\n\n\
            Commands:\n  \
            - convert: HTML page → page descriptor JSON (default command)\n  \
            - extract: block JSON → markdown\n\n\
            Extra Parameters:\n  \
            Use --extra-<name> [value] to override configuration.\n  \
            Boolean flags can omit the value (defaults to 'true').\n  \
            Known: max-depth, text-limit, pad-tables, callout-as-message\n\n\
            Examples:\n  \
            scrap page.html --url https://zenn.dev/a/articles/b         # Convert (stdout)\n  \
            scrap page.html --url https://note.com/a/n/n1 -o page.json  # Convert to a file\n  \
            scrap extract blocks.json                                   # Blocks to markdown",
        )
        .arg_required_else_help(true)
        .subcommand_required(false)
        .arg(
            Arg::new("list-sites")
                .long("list-sites")
                .help("List supported sites")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .value_name("PATH")
                .help("Path to a scrap.toml configuration file")
                .value_hint(ValueHint::FilePath)
                .global(true),
        )
        .subcommand(
            Command::new("convert")
                .about("Convert a saved page into a page descriptor (default command)")
                .long_about(
                    "Convert the HTML of a zenn article, zenn scrap or note article.\n\n\
                    The site is detected from --url unless --site names it.\n\
                    Output goes to stdout by default, or use -o to specify a file.\n\n\
                    Examples:\n  \
                    scrap convert page.html --url https://zenn.dev/a/scraps/x1\n  \
                    scrap page.html --url https://zenn.dev/a/articles/b   # 'convert' is optional",
                )
                .arg(
                    Arg::new("input")
                        .help("Saved HTML page")
                        .required(true)
                        .index(1)
                        .value_hint(ValueHint::FilePath),
                )
                .arg(
                    Arg::new("url")
                        .long("url")
                        .help("URL the page was saved from (required)")
                        .required(true)
                        .value_hint(ValueHint::Url),
                )
                .arg(
                    Arg::new("site")
                        .long("site")
                        .help("Site adapter to use instead of detecting it from the URL")
                        .value_hint(ValueHint::Other),
                )
                .arg(
                    Arg::new("output")
                        .long("output")
                        .short('o')
                        .help("Output file path (defaults to stdout)")
                        .value_hint(ValueHint::FilePath),
                )
                .arg(
                    Arg::new("deterministic-ids")
                        .long("deterministic-ids")
                        .help("Number blocks block-1, block-2, ... instead of random UUIDs")
                        .action(ArgAction::SetTrue),
                ),
        )
        .subcommand(
            Command::new("extract")
                .about("Render block JSON as markdown")
                .long_about(
                    "Render blocks as markdown.\n\n\
                    Accepts a JSON array of blocks, a children listing ({\"results\": [...]})\n\
                    or a page descriptor written by the convert command.",
                )
                .arg(
                    Arg::new("input")
                        .help("Block JSON file")
                        .required(true)
                        .index(1)
                        .value_hint(ValueHint::FilePath),
                )
                .arg(
                    Arg::new("output")
                        .long("output")
                        .short('o')
                        .help("Output file path (defaults to stdout)")
                        .value_hint(ValueHint::FilePath),
                ),
        )
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .with_target(false)
        .compact()
        .try_init();
}

fn main() {
    init_tracing();

    let args: Vec<String> = std::env::args().collect();

    // Parse extra-* arguments before clap processing
    let (cleaned_args, mut extra_params) = parse_extra_args(&args);

    let cli = build_cli();
    let matches = match cli.clone().try_get_matches_from(&cleaned_args) {
        Ok(m) => m,
        Err(e) => {
            // A bare file argument means "convert"
            if cleaned_args.len() > 1
                && !cleaned_args[1].starts_with('-')
                && cleaned_args[1] != "convert"
                && cleaned_args[1] != "extract"
                && cleaned_args[1] != "help"
            {
                let mut new_args = vec![cleaned_args[0].clone(), "convert".to_string()];
                new_args.extend_from_slice(&cleaned_args[1..]);

                match cli.try_get_matches_from(&new_args) {
                    Ok(m) => m,
                    Err(e2) => e2.exit(),
                }
            } else {
                e.exit();
            }
        }
    };

    if matches.get_flag("list-sites") {
        handle_list_sites_command();
        return;
    }

    let mut config = load_cli_config(matches.get_one::<String>("config").map(|s| s.as_str()));
    apply_config_overrides(&mut config, &mut extra_params);
    for key in extra_params.keys() {
        tracing::warn!("ignoring unknown parameter --extra-{key}");
    }

    match matches.subcommand() {
        Some(("convert", sub_matches)) => {
            let input = sub_matches
                .get_one::<String>("input")
                .expect("input is required");
            let url = sub_matches.get_one::<String>("url").expect("url is required");
            let site = sub_matches.get_one::<String>("site").map(|s| s.as_str());
            let output = sub_matches.get_one::<String>("output").map(|s| s.as_str());
            let deterministic = sub_matches.get_flag("deterministic-ids");
            handle_convert_command(input, url, site, output, deterministic, &config);
        }
        Some(("extract", sub_matches)) => {
            let input = sub_matches
                .get_one::<String>("input")
                .expect("input is required");
            let output = sub_matches.get_one::<String>("output").map(|s| s.as_str());
            handle_extract_command(input, output, &config);
        }
        _ => {
            eprintln!("Unknown subcommand. Use --help for usage information.");
            std::process::exit(1);
        }
    }
}

/// Handle the convert command
fn handle_convert_command(
    input: &str,
    url: &str,
    site: Option<&str>,
    output: Option<&str>,
    deterministic: bool,
    config: &ScrapConfig,
) {
    let html = fs::read_to_string(input).unwrap_or_else(|e| {
        eprintln!("Error reading file '{input}': {e}");
        std::process::exit(1);
    });

    let mut sequential = SequentialIds::new();
    let mut random = UuidSource;
    let ids: &mut dyn IdSource = if deterministic {
        &mut sequential
    } else {
        &mut random
    };

    let options = ConvertOptions::from(&config.convert);
    let conversion = convert_html(&html, url, site, &options, ids).unwrap_or_else(|e| {
        eprintln!("Conversion error: {e}");
        std::process::exit(1);
    });
    if !conversion.diagnostics.is_empty() {
        tracing::info!(
            warnings = conversion.diagnostics.len(),
            "converted with warnings"
        );
    }

    let json = page_to_json(&conversion.page).unwrap_or_else(|e| {
        eprintln!("Serialization error: {e}");
        std::process::exit(1);
    });
    write_output(output, &json);
}

/// Handle the extract command
fn handle_extract_command(input: &str, output: Option<&str>, config: &ScrapConfig) {
    let json = fs::read_to_string(input).unwrap_or_else(|e| {
        eprintln!("Error reading file '{input}': {e}");
        std::process::exit(1);
    });

    let options = ExtractOptions::from(&config.extract);
    let markdown = extract_markdown(&json, &options).unwrap_or_else(|e| {
        eprintln!("Extraction error: {e}");
        std::process::exit(1);
    });
    write_output(output, &markdown);
}

fn write_output(output: Option<&str>, text: &str) {
    match output {
        Some(path) => fs::write(path, text).unwrap_or_else(|e| {
            eprintln!("Error writing file '{path}': {e}");
            std::process::exit(1);
        }),
        None => println!("{text}"),
    }
}

/// Handle the list-sites command
fn handle_list_sites_command() {
    println!("Supported sites:\n");
    let registry = SiteRegistry::default();
    for name in registry.list_sites() {
        let description = registry
            .get(&name)
            .map(|site| site.description().to_string())
            .unwrap_or_default();
        println!("  {name:<14} {description}");
    }
}

fn load_cli_config(explicit_path: Option<&str>) -> ScrapConfig {
    let loader = Loader::new().with_optional_file("scrap.toml");
    let loader = if let Some(path) = explicit_path {
        loader.with_file(path)
    } else {
        loader
    };

    loader.build().unwrap_or_else(|err| {
        eprintln!("Failed to load configuration: {err}");
        std::process::exit(1);
    })
}

fn apply_config_overrides(config: &mut ScrapConfig, extra_params: &mut HashMap<String, String>) {
    if let Some(raw) = take_override(extra_params, &["max-depth", "max-inline-depth"]) {
        config.convert.max_inline_depth = parse_usize_arg("max-depth", &raw);
    }
    if let Some(raw) = extra_params.remove("text-limit") {
        config.convert.text_limit = parse_usize_arg("text-limit", &raw);
    }
    if let Some(raw) = take_override(extra_params, &["pad-tables", "pad-ragged-tables"]) {
        config.convert.pad_ragged_tables = parse_bool_arg("pad-tables", &raw);
    }
    if let Some(raw) = take_override(extra_params, &["callout-as-message", "message"]) {
        config.extract.callout_as_message = parse_bool_arg("callout-as-message", &raw);
    }
}

fn take_override(map: &mut HashMap<String, String>, keys: &[&str]) -> Option<String> {
    for key in keys {
        if let Some(value) = map.remove(*key) {
            return Some(value);
        }
    }
    None
}

fn parse_bool_arg(flag: &str, raw: &str) -> bool {
    match raw.to_lowercase().as_str() {
        "true" | "1" | "yes" | "y" => true,
        "false" | "0" | "no" | "n" => false,
        other => {
            eprintln!("Invalid boolean value '{other}' for --extra-{flag}");
            std::process::exit(1);
        }
    }
}

fn parse_usize_arg(flag: &str, raw: &str) -> usize {
    raw.parse().unwrap_or_else(|_| {
        eprintln!("Invalid number '{raw}' for --extra-{flag}");
        std::process::exit(1);
    })
}
