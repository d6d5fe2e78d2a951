use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::Colorize;
use log::{debug, info};
use oxitrace_tree::{Config, OutputFormat};
use std::io::{BufWriter, Write};
use std::time::Instant;

#[derive(Parser)]
#[command(name = "oxitrace")]
#[command(about = "Trace local import trees of JavaScript/TypeScript projects", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Print the local dependency tree of one or more entry files
    DependencyTree(Config),
}

fn main() -> Result<()> {
    env_logger::init();

    // stdio is blocked by LineWriter, use a BufWriter to reduce syscalls.
    // See https://github.com/rust-lang/rust/issues/60673
    let mut stdout = BufWriter::new(std::io::stdout());

    let cli = Cli::parse();
    debug!("Parsed CLI arguments: {:?}", cli.command);

    let start = Instant::now();

    match cli.command {
        Commands::DependencyTree(cfg) => {
            let num_threads = rayon::current_num_threads();
            info!(
                "Tracing {} entries as {:?} (using {} threads)",
                cfg.entries.len(),
                cfg.format,
                num_threads
            );

            let result = oxitrace_tree::run_dependency_trace(&cfg)?;

            match cfg.format {
                OutputFormat::Json => {
                    oxitrace_tree::print_json(&mut stdout, &result, cfg.compact)?
                }
                OutputFormat::Tree => oxitrace_tree::print_tree(&mut stdout, &result)?,
            }
            stdout.flush()?;

            // stderr keeps stdout parseable in JSON mode
            eprintln!(
                "\n{} Finished in {}ms on {} files (using {} threads).",
                "●".bright_blue(),
                start.elapsed().as_millis().to_string().cyan(),
                result.files_analyzed.to_string().cyan(),
                num_threads.to_string().cyan()
            );

            // A missing entry has nothing to report; it is not a failure
            for entry in result.missing_entries() {
                eprintln!("{} Entry not found: {}", "✗".yellow().bold(), entry.display());
            }

            Ok(())
        }
    }
}
