//! CLI smoke entry point.
//!
//! # Responsibility
//! - Verify `documroller_core` linkage (`ping`).
//! - Drive module export/import against a store file for manual checks.

use clap::{Parser, Subcommand};
use documroller_core::{init_logging, Portable, RecordService, StoreConfig};
use std::error::Error;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(name = "documroller", version, about = "DocumRoller record store smoke tool")]
struct Cli {
    /// JSON store config file. Takes precedence over `--db`.
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// SQLite store file.
    #[arg(long, global = true, default_value = "documroller.sqlite3")]
    db: PathBuf,
    /// Absolute directory for rolling log files.
    #[arg(long, global = true)]
    log_dir: Option<String>,
    #[arg(long, global = true, default_value_t = documroller_core::default_log_level().to_string())]
    log_level: String,
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print core ping and version.
    Ping,
    /// Write a module's items as markup to stdout.
    Export {
        #[arg(long)]
        module: i64,
    },
    /// Import a markup file into a module.
    Import {
        #[arg(long)]
        module: i64,
        #[arg(long)]
        file: PathBuf,
        #[arg(long, default_value = "01.00.00")]
        version: String,
        #[arg(long, default_value_t = -1, allow_negative_numbers = true)]
        user: i64,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
    if let Some(log_dir) = cli.log_dir.as_deref() {
        init_logging(&cli.log_level, log_dir)?;
    }

    let config = match cli.config.as_ref() {
        Some(path) => StoreConfig::load(path)?,
        None => StoreConfig::new(cli.db.clone()),
    };
    let service = RecordService::new(config);

    match cli.command.unwrap_or(Command::Ping) {
        Command::Ping => {
            println!("documroller_core ping={}", documroller_core::ping());
            println!("documroller_core version={}", documroller_core::core_version());
        }
        Command::Export { module } => {
            println!("{}", service.export_module(module)?);
        }
        Command::Import {
            module,
            file,
            version,
            user,
        } => {
            let markup = std::fs::read_to_string(&file)?;
            service.import_module(module, &markup, &version, user)?;
            log::info!("event=cli_import module=cli status=ok module_id={}", module);
        }
    }

    Ok(())
}
