use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::Colorize;
use dashmap::DashMap;
use log::{debug, info};
use std::io::{BufWriter, Write};
use std::time::Instant;
use vendorsplit_core::{collect_externals, default_is_external};
use vendorsplit_pipeline::{Config, Esbuild, IdentityTransformer};

#[derive(Parser)]
#[command(name = "vendorsplit")]
#[command(about = "Split compiled bundles into first-party and vendor artifacts", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Print the external dependency closure of a set of entry files
    Scan(Config),
    /// Run the full split build (scan, compile, transform, vendor, rewrite)
    Split(Config),
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
        Commands::Scan(cfg) => {
            let entries = vendorsplit_pipeline::resolve_entries(&cfg)?;
            info!("Scanning {} entry files", entries.len());

            let resolve_cache = DashMap::new();
            let externals = collect_externals(&entries, &default_is_external, &resolve_cache)?;

            for external in &externals {
                writeln!(stdout, "{}", external.yellow())?;
            }
            writeln!(
                stdout,
                "\n{} Found {} external specifiers in {}ms.",
                "●".bright_blue(),
                externals.len().to_string().cyan(),
                start.elapsed().as_millis().to_string().cyan()
            )?;
            stdout.flush()?;
            Ok(())
        }
        Commands::Split(mut cfg) => {
            cfg.load_transform_options()?;
            info!("Running split build into {}", cfg.out_dir.display());

            let result = vendorsplit_pipeline::split_build(
                &cfg,
                &Esbuild::default(),
                &IdentityTransformer,
                None,
            )?;

            for line in &result.logs {
                writeln!(stdout, "{}", line.dimmed())?;
            }
            for artifact in &result.artifacts {
                writeln!(stdout, "{} {}", "→".green(), artifact.path.display())?;
            }
            if let Some(vendor) = &result.vendor {
                for artifact in &vendor.artifacts {
                    writeln!(stdout, "{} {}", "→".green(), artifact.path.display())?;
                }
                if !vendor.success {
                    writeln!(stdout, "{} vendor bundle failed, imports left unrewritten", "!".yellow())?;
                }
            }

            let elapsed_ms = start.elapsed().as_millis();
            if result.success {
                writeln!(
                    stdout,
                    "\n{} Finished in {}ms with {} artifacts.",
                    "●".bright_blue(),
                    elapsed_ms.to_string().cyan(),
                    result.artifacts.len().to_string().cyan()
                )?;
                stdout.flush()?;
            } else {
                writeln!(stdout, "\n{} Build failed after {}ms.", "✗".red(), elapsed_ms)?;
                stdout.flush()?;

                // Non-zero exit to fail CI
                std::process::exit(1);
            }

            Ok(())
        }
    }
}
