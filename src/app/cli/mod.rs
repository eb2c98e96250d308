//! CLI Adapter.

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::prelude::*;

use crate::adapters::DEFAULT_VALIDATOR;
use crate::domain::{AppError, Construct};
use crate::{ApplyOptions, Stage};

#[derive(Parser)]
#[command(name = "launchd-plist")]
#[command(version)]
#[command(about = "Build, merge and validate launchd service descriptors", long_about = None)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write every job declared in a TOML manifest
    #[clap(visible_alias = "a")]
    Apply {
        /// Manifest file
        manifest: PathBuf,
        /// Output directory for relative job names (overrides the manifest)
        #[arg(short, long)]
        prefix: Option<PathBuf>,
        /// Structure validator program, invoked as `<program> -lint <file>`
        #[arg(long, default_value = DEFAULT_VALIDATOR)]
        validator: String,
        /// Write without running the structure validator
        #[arg(long)]
        skip_validation: bool,
    },
    /// Print an existing plist as JSON
    #[clap(visible_alias = "i")]
    Inspect {
        /// Plist file
        path: PathBuf,
    },
    /// List the fields each construct accepts
    #[clap(visible_alias = "f")]
    Fields {
        /// Construct (job, keep-alive, calendar-interval, resource-limits,
        /// mach-service, socket, inetd-compatibility)
        construct: Option<String>,
    },
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    // A subscriber may already be installed when embedded; that one wins.
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(false).with_writer(std::io::stderr))
        .try_init();
}

/// Entry point for the CLI.
pub fn run() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result: Result<i32, AppError> = match cli.command {
        Commands::Apply { manifest, prefix, validator, skip_validation } => {
            let options =
                ApplyOptions { prefix, validator: validator.into(), validate: !skip_validation };
            run_apply(&manifest, &options)
        }
        Commands::Inspect { path } => run_inspect(&path).map(|_| 0),
        Commands::Fields { construct } => run_fields(construct.as_deref()).map(|_| 0),
    };

    match result {
        Ok(exit_code) => {
            if exit_code != 0 {
                std::process::exit(exit_code);
            }
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}

fn run_apply(manifest: &std::path::Path, options: &ApplyOptions) -> Result<i32, AppError> {
    let outcomes = crate::apply(manifest, options)?;
    let mut failed = 0;

    for outcome in &outcomes {
        match &outcome.result {
            Ok(report) if !report.written => {
                println!("✅ {} unchanged ({})", report.label, report.path.display());
            }
            Ok(report) if report.stage == Stage::Confirmed => {
                println!("✅ Wrote {} ({})", report.label, report.path.display());
            }
            Ok(report) => {
                println!(
                    "✅ Wrote {} ({}, not validated)",
                    report.label,
                    report.path.display()
                );
            }
            Err(e) => {
                failed += 1;
                eprintln!("Error: {}: {}", outcome.name, e);
            }
        }
    }

    Ok(if failed > 0 { 1 } else { 0 })
}

fn run_inspect(path: &std::path::Path) -> Result<(), AppError> {
    let document = crate::inspect(path)?;
    let json = serde_json::to_string_pretty(&document)
        .map_err(|e| AppError::Io(std::io::Error::other(e)))?;
    println!("{}", json);
    Ok(())
}

fn run_fields(construct: Option<&str>) -> Result<(), AppError> {
    let construct = construct.map(str::parse::<Construct>).transpose()?;
    for (construct, fields) in crate::fields(construct) {
        println!("{}:", construct);
        for field in fields {
            println!("  {:<28} {:<28} {}", field.name, field.key, field.kind);
        }
    }
    Ok(())
}
