//! Gridsheet - apply spreadsheet commands to an in-memory sheet

mod command;
mod config;
mod error;

use anyhow::Context;
use gridsheet_core::{Document, DocumentConfig};
use std::env;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process::ExitCode;

fn print_usage() {
    eprintln!("Usage: gridsheet [OPTIONS]");
    eprintln!();
    eprintln!("Reads one command per line from stdin unless -c is given.");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  -c, --command <CMD>       Run a command (can be repeated)");
    eprintln!("  --config <path>           Load settings from TOML file");
    eprintln!("  --no-config               Ignore the user config file");
    eprintln!("  -h, --help                Print help");
    eprintln!();
    eprintln!("Commands:");
    eprintln!("  set <cell> <text...>      get <cell>          style <cell> key=value...");
    eprintln!("  select <cell> <cell> [active]   deselect      active <cell>|none");
    eprintln!("  edit <cell>|none          bar <text...>       toolbar key=value...");
    eprintln!("  apply                     insert-row <row>    delete-row <row>");
    eprintln!("  insert-col <col>          delete-col <col>    undo    redo");
    eprintln!("  replace <find> <replace> [range]              dedup <range>");
    eprintln!("  print                     dims                functions");
}

/// Run every line against `doc`. Returns false if any line failed.
fn run_lines<I>(doc: &mut Document, lines: I) -> anyhow::Result<bool>
where
    I: IntoIterator<Item = io::Result<String>>,
{
    let stdout = io::stdout();
    let mut out = stdout.lock();
    let mut ok = true;
    for line in lines {
        let line = line.context("failed to read command")?;
        match command::run_line(doc, &line) {
            Ok(output) => {
                for text in output {
                    writeln!(out, "{}", text)?;
                }
            }
            Err(e) => {
                ok = false;
                eprintln!("Error: {}", e);
            }
        }
    }
    out.flush()?;
    Ok(ok)
}

fn main() -> anyhow::Result<ExitCode> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args: Vec<String> = env::args().collect();

    let mut commands: Vec<String> = Vec::new();
    let mut config_file: Option<PathBuf> = None;
    let mut use_config = true;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "-h" | "--help" => {
                print_usage();
                return Ok(ExitCode::SUCCESS);
            }
            "-c" | "--command" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("Error: --command requires a value");
                    return Ok(ExitCode::FAILURE);
                }
                commands.push(args[i].to_string());
            }
            "--config" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("Error: --config requires a file path");
                    return Ok(ExitCode::FAILURE);
                }
                config_file = Some(PathBuf::from(&args[i]));
            }
            "--no-config" => use_config = false,
            arg => {
                eprintln!("Error: Unknown option: {}", arg);
                print_usage();
                return Ok(ExitCode::FAILURE);
            }
        }
        i += 1;
    }

    let doc_config = if use_config || config_file.is_some() {
        let (doc_config, warnings) = config::load_config(config_file.as_ref());
        for warning in warnings {
            eprintln!("Warning: {}", warning);
        }
        doc_config
    } else {
        DocumentConfig::default()
    };
    let mut doc = Document::with_config(&doc_config);

    let ok = if commands.is_empty() {
        run_lines(&mut doc, io::stdin().lock().lines())?
    } else {
        run_lines(&mut doc, commands.into_iter().map(Ok))?
    };

    Ok(if ok {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
