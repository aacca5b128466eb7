//! dnadb Binary
//!
//! Runs a command file against a DNA sequence database.

use std::path::PathBuf;

use clap::Parser;
use dnadb::commands;
use dnadb::{CommandOutput, Config, DnaDbError, Engine, FallbackScan, OpenMode, Report, TailRelease};
use tracing_subscriber::{fmt, EnvFilter};

/// dnadb
#[derive(Parser, Debug)]
#[command(name = "dnadb")]
#[command(about = "DNA sequence database backed by a single memory file")]
#[command(version)]
struct Args {
    /// Command file to execute
    command_file: PathBuf,

    /// Index snapshot file (written on exit)
    hash_file: PathBuf,

    /// Hash table size in slots (multiple of 32)
    table_size: usize,

    /// Binary memory file holding packed sequences
    memory_file: PathBuf,

    /// Let the table-wide fallback scan wrap around to slot 0
    #[arg(long)]
    wrap_fallback: bool,

    /// When a tail release exposes a free block at end-of-file, truncate it too
    #[arg(long)]
    cascade_tail: bool,

    /// Reopen the memory file using the snapshot in the hash file
    #[arg(long)]
    restore: bool,
}

fn main() {
    // Logs go to stderr; stdout carries the command results
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn,dnadb=info"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    tracing::info!("dnadb v{}", dnadb::VERSION);
    tracing::info!("Command file: {}", args.command_file.display());
    tracing::info!("Memory file: {}", args.memory_file.display());

    if args.table_size == 0 || args.table_size % dnadb::index::BUCKET_SIZE != 0 {
        println!("Illegal hash-table-size parameter.");
        std::process::exit(1);
    }

    let commands = match commands::parse_file(&args.command_file) {
        Ok(commands) => commands,
        Err(e) => {
            tracing::error!("Failed to read command file: {}", e);
            std::process::exit(1);
        }
    };

    // Build config from args
    let config = Config::builder()
        .memory_file(&args.memory_file)
        .hash_file(&args.hash_file)
        .table_capacity(args.table_size)
        .fallback_scan(if args.wrap_fallback {
            FallbackScan::Wrapping
        } else {
            FallbackScan::Forward
        })
        .tail_release(if args.cascade_tail {
            TailRelease::Cascade
        } else {
            TailRelease::Exact
        })
        .open_mode(if args.restore {
            OpenMode::Restore
        } else {
            OpenMode::Truncate
        })
        .build();

    let engine = match Engine::open(config) {
        Ok(engine) => engine,
        Err(e) => {
            tracing::error!("Failed to open engine: {}", e);
            std::process::exit(1);
        }
    };

    for command in commands {
        match engine.execute(command) {
            Ok(output) => print!("{}", render(&output)),
            Err(DnaDbError::InvalidSequence(sequence)) => {
                println!("Invalid Sequence: {}", sequence);
            }
            Err(e) => {
                tracing::error!("Command failed: {}", e);
                std::process::exit(1);
            }
        }
    }

    if let Err(e) = engine.close() {
        tracing::error!("Failed to close engine: {}", e);
        std::process::exit(1);
    }
}

/// Format one command result for the console
fn render(output: &CommandOutput) -> String {
    match output {
        CommandOutput::Inserted { .. } => String::new(),
        CommandOutput::Duplicate { id } => format!("SequenceID {} exists\n", id),
        CommandOutput::TableFull { id } => {
            format!("Bucket full. Sequence {} could not be inserted\n", id)
        }
        CommandOutput::Removed { id, sequence } => {
            format!("Sequence Removed {}:\n{}\n", id, sequence)
        }
        CommandOutput::Found { sequence, .. } => format!("Sequence Found: {}\n", sequence),
        CommandOutput::NotFound { id } => format!("SequenceID {} not found\n", id),
        CommandOutput::Report(report) => render_report(report),
    }
}

fn render_report(report: &Report) -> String {
    let mut out = String::from("Sequence IDs:\n");
    for (slot, id) in &report.entries {
        out.push_str(&format!("{}: hash slot [{}]\n", id, slot));
    }

    out.push_str("Free Block List:\n");
    if report.free_blocks.is_empty() {
        out.push_str("none\n");
    }
    for (n, block) in report.free_blocks.iter().enumerate() {
        out.push_str(&format!(
            "[Block {}] Starting Byte Location: {}, Size {} bytes\n",
            n + 1,
            block.position,
            block.len
        ));
    }

    out
}
