/*
    ALICE-SWIFT
    Copyright (C) 2026 Moroya Sakamoto
*/

//! # alice-swift CLI
//!
//! Inspect, validate and re-emit SWIFT MT files. Every input file may hold a
//! single FIN message or several in RJE (`$`-separated) form.

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};

use alice_swift::{validate, writer, Config, MtView, RjeReader, SwiftMessage};

/// SWIFT MT message toolkit.
#[derive(Parser, Debug)]
#[command(name = "alice-swift", version, about)]
struct Cli {
    /// JSON configuration file (`parser` / `writer` sections).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Parse messages and print a summary, JSON or FIN.
    Parse {
        file: PathBuf,
        /// Print the messages as a JSON array.
        #[arg(long, conflicts_with = "fin")]
        json: bool,
        /// Re-emit the messages as FIN text.
        #[arg(long)]
        fin: bool,
        /// Fail on any structural irregularity.
        #[arg(long)]
        strict: bool,
    },
    /// Validate messages; exits non-zero if any problem is found.
    Validate {
        file: PathBuf,
        /// Print the problems of each message as JSON.
        #[arg(long)]
        json: bool,
    },
    /// List the sequences of each message with their fields.
    Sequences { file: PathBuf },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => Config::default(),
    };

    match cli.command {
        Commands::Parse {
            file,
            json,
            fin,
            strict,
        } => {
            if strict {
                config = config.with_strict_parser();
            }
            let msgs = read_messages(&file, &config)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&msgs)?);
            } else if fin {
                for msg in &msgs {
                    print!("{}", writer::write_with(msg, &config.writer));
                    println!("{}", config.writer.line_ending.as_str());
                }
            } else {
                for (i, msg) in msgs.iter().enumerate() {
                    println!("{}", summary(i, msg));
                }
            }
        }
        Commands::Validate { file, json } => {
            let msgs = read_messages(&file, &config)?;
            let mut total = 0;
            let mut report = Vec::new();
            for (i, msg) in msgs.iter().enumerate() {
                let problems = validate(msg);
                if json {
                    total += problems.len();
                    report.push(serde_json::json!({ "index": i, "problems": problems }));
                    continue;
                }
                if problems.is_empty() {
                    println!("#{i}: ok");
                    continue;
                }
                total += problems.len();
                for p in &problems {
                    println!("#{i}: {p}");
                }
            }
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            }
            if total > 0 {
                bail!("{total} validation problem(s) in {}", file.display());
            }
        }
        Commands::Sequences { file } => {
            for (i, msg) in read_messages(&file, &config)?.iter().enumerate() {
                println!("{}", summary(i, msg));
                let Some(view) = MtView::new(msg) else {
                    println!("  (no layout)");
                    continue;
                };
                for seq in view.present_sequences() {
                    println!("  {} {}", seq.name(), seq.title());
                    for tag in seq.tags() {
                        println!("    :{}:{}", tag.name, tag.value.replace("\r\n", " | "));
                    }
                }
            }
        }
    }

    Ok(())
}

fn load_config(path: &Path) -> anyhow::Result<Config> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("reading config {}", path.display()))?;
    Config::from_json(&json).with_context(|| format!("parsing config {}", path.display()))
}

fn read_messages(path: &Path, config: &Config) -> anyhow::Result<Vec<SwiftMessage>> {
    let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    RjeReader::with_config(BufReader::new(file), config.parser.clone())
        .collect::<Result<Vec<_>, _>>()
        .with_context(|| format!("reading {}", path.display()))
}

fn summary(index: usize, msg: &SwiftMessage) -> String {
    format!(
        "#{index}: MT{} {} -> {} ({} fields)",
        msg.message_type().unwrap_or("???"),
        msg.sender().unwrap_or_default(),
        msg.receiver().unwrap_or_default(),
        msg.body().map_or(0, |b| b.len()),
    )
}
