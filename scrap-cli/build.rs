use clap::{Arg, ArgAction, Command, ValueHint};
use clap_complete::{generate_to, shells::*};
use std::env;
use std::io::Error;

// Mirror of the site names from scrap-babel's registry
// We need to duplicate this here since build scripts can't access the library
const AVAILABLE_SITES: &[&str] = &["note-article", "zenn-article", "zenn-scrap"];

fn main() -> Result<(), Error> {
    let outdir = match env::var_os("OUT_DIR") {
        None => return Ok(()),
        Some(outdir) => outdir,
    };

    let mut cmd = Command::new("scrap")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Convert zenn and note pages into page blocks")
        .arg_required_else_help(true)
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
                .help("Path to a scrap.toml configuration file")
                .value_hint(ValueHint::FilePath)
                .global(true),
        )
        .subcommand(
            Command::new("convert")
                .about("Convert a saved page into a page descriptor")
                .arg(
                    Arg::new("input")
                        .required(true)
                        .index(1)
                        .value_hint(ValueHint::FilePath),
                )
                .arg(Arg::new("url").long("url").value_hint(ValueHint::Url))
                .arg(
                    Arg::new("site")
                        .long("site")
                        .value_parser(clap::builder::PossibleValuesParser::new(AVAILABLE_SITES)),
                )
                .arg(
                    Arg::new("output")
                        .long("output")
                        .short('o')
                        .value_hint(ValueHint::FilePath),
                )
                .arg(
                    Arg::new("deterministic-ids")
                        .long("deterministic-ids")
                        .action(ArgAction::SetTrue),
                ),
        )
        .subcommand(
            Command::new("extract")
                .about("Render block JSON as markdown")
                .arg(
                    Arg::new("input")
                        .required(true)
                        .index(1)
                        .value_hint(ValueHint::FilePath),
                )
                .arg(
                    Arg::new("output")
                        .long("output")
                        .short('o')
                        .value_hint(ValueHint::FilePath),
                ),
        );

    // Generate completions for bash
    generate_to(Bash, &mut cmd, "scrap", &outdir)?;

    // Generate completions for zsh
    generate_to(Zsh, &mut cmd, "scrap", &outdir)?;

    // Generate completions for fish
    generate_to(Fish, &mut cmd, "scrap", &outdir)?;

    println!("cargo:warning=Shell completions generated in {outdir:?}");

    Ok(())
}
