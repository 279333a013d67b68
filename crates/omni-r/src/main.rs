//
// main.rs
//
// Copyright (C) 2024 Posit Software, PBC. All rights reserved.
//
//

use std::env;
use std::fs;
use std::path::Path;
use std::path::PathBuf;

use anyhow::anyhow;
use anyhow::Context;
use omni_complete::Engine;
use omni_complete::OfflineSession;
use omni_complete::OmniConfig;

fn print_usage() {
    println!("omni-r {}, R completions from nvim-R omni listings.", env!("CARGO_PKG_VERSION"));
    print!(
        r#"
Usage: omni-r [OPTIONS] --file <FILE> --line <LINE> --column <COLUMN>
       omni-r [--config <FILE>] --source-info

Available options:

--file <FILE>                R script to complete in
--line <LINE>                Line of the cursor, starting at 1
--column <COLUMN>            Number of characters before the cursor
--config <FILE>              JSON configuration, see `OmniConfig`
--source-info                Print how the source registers with the editor
--version                    Print the version
--help                       Print this help message

Listings are looked up in $NVIMR_COMPLDIR and $NVIMR_TMPDIR for the session
$NVIMR_ID unless the configuration says otherwise.

"#
    );
}

#[derive(Debug, Default, PartialEq)]
struct Request {
    file: PathBuf,
    line: usize,
    column: usize,
    config: Option<PathBuf>,
}

enum Command {
    Complete(Request),
    SourceInfo(Option<PathBuf>),
    Version,
    Help,
}

fn parse_args(mut argv: impl Iterator<Item = String>) -> anyhow::Result<Command> {
    let mut file = None;
    let mut line = None;
    let mut column = None;
    let mut config = None;
    let mut source_info = false;

    while let Some(arg) = argv.next() {
        let mut value = || argv.next().ok_or_else(|| anyhow!("Missing value for '{arg}'"));

        match arg.as_str() {
            "--file" => file = Some(PathBuf::from(value()?)),
            "--line" => line = Some(value()?.parse::<usize>().context("Invalid --line")?),
            "--column" => column = Some(value()?.parse::<usize>().context("Invalid --column")?),
            "--config" => config = Some(PathBuf::from(value()?)),
            "--source-info" => source_info = true,
            "--version" => return Ok(Command::Version),
            "--help" => return Ok(Command::Help),
            other => return Err(anyhow!("Unknown argument: '{other}'")),
        }
    }

    if source_info {
        return Ok(Command::SourceInfo(config));
    }

    let (Some(file), Some(line), Some(column)) = (file, line, column) else {
        return Ok(Command::Help);
    };

    if line == 0 {
        return Err(anyhow!("Lines start at 1"));
    }

    Ok(Command::Complete(Request {
        file,
        line: line - 1,
        column,
        config,
    }))
}

fn load_config(path: Option<&Path>) -> anyhow::Result<OmniConfig> {
    let config = match path {
        Some(path) => OmniConfig::from_file(path)?,
        None => OmniConfig::default(),
    };
    Ok(config.with_env_fallbacks())
}

/// Registration settings of the source: name, priority, scopes, and the
/// patterns the editor uses to know what to replace and when to ask again
fn source_info(config: &OmniConfig) -> anyhow::Result<String> {
    Ok(serde_json::to_string_pretty(&config.source)?)
}

fn complete(request: Request) -> anyhow::Result<()> {
    let config = load_config(request.config.as_deref())?;

    let text = fs::read_to_string(&request.file)
        .with_context(|| format!("Can't read '{}'", request.file.display()))?;
    let lines: Vec<&str> = text.lines().collect();

    let mut engine = Engine::new(config, OfflineSession)?;
    engine.load_package_listings()?;

    let response = engine.complete(&lines, request.line, request.column);
    println!("{}", serde_json::to_string_pretty(&response)?);

    Ok(())
}

fn main() -> anyhow::Result<()> {
    let mut argv = env::args();
    argv.next(); // skip executable name

    match parse_args(argv)? {
        Command::Complete(request) => {
            env_logger::init();
            log::info!("Completing {request:?}");
            complete(request)
        },
        Command::SourceInfo(config) => {
            let config = load_config(config.as_deref())?;
            println!("{}", source_info(&config)?);
            Ok(())
        },
        Command::Version => {
            println!("omni-r {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        },
        Command::Help => {
            print_usage();
            Ok(())
        },
    }
}
