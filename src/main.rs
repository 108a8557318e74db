use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::Context;
use clap::{arg, command, value_parser, ArgMatches};
use log::{warn, LevelFilter};
use pbtrace::{decode_message, peek_field, write_trace, MAX_FIELD_NUMBER};

fn cli() -> clap::Command {
    let cmd = command!()
        .about("Decode a protobuf binary without its schema")
        .arg(
            arg!(<FILE>)
                .help("Path to the protobuf binary")
                .value_parser(value_parser!(PathBuf)),
        );

    #[cfg(feature = "serialize")]
    let cmd = cmd.arg(arg!(--json "Print the decoded field tree as JSON"));

    cmd
}

fn run(args: &ArgMatches) -> anyhow::Result<()> {
    let path = args
        .get_one::<PathBuf>("FILE")
        .context("missing input file")?;
    let content =
        fs::read(path).with_context(|| format!("can not read `{}`", path.display()))?;

    let (fields, rest) = decode_message(&content);
    if !rest.is_empty() {
        let offset = content.len() - rest.len();
        match peek_field(rest) {
            Err(e) if e.is_truncated() => warn!(
                "input truncated at offset {}, {} bytes left: {}",
                offset,
                rest.len(),
                e
            ),
            Err(e) => warn!(
                "invalid field at offset {}, {} bytes left: {}",
                offset,
                rest.len(),
                e
            ),
            Ok(field) => warn!(
                "field number {} above {} at offset {}, {} bytes left",
                field.number,
                MAX_FIELD_NUMBER,
                offset,
                rest.len()
            ),
        }
    }

    let stdout = io::stdout();
    let mut out = stdout.lock();

    #[cfg(feature = "serialize")]
    if args.get_flag("json") {
        serde_json::to_writer_pretty(&mut out, &fields)?;
        writeln!(out)?;
        return Ok(());
    }

    write_trace(&fields, &mut out)?;
    out.flush()?;
    Ok(())
}

fn main() -> anyhow::Result<()> {
    env_logger::builder()
        .filter_level(LevelFilter::Warn)
        .parse_default_env()
        .init();

    run(&cli().get_matches())
}
