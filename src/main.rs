// logtools - main.rs
//
// Command-line entry point. Handles:
// 1. CLI argument parsing
// 2. config.toml loading
// 3. Logging initialisation (debug mode support, record output for `emit`)
// 4. Dispatch to the format/check/decode/rename/emit commands

use clap::{Parser, Subcommand};
use logtools::app::ingest::{self, TimeOrder};
use logtools::app::line_layer::line_layer;
use logtools::app::logger::Logger;
use logtools::app::rename;
use logtools::core::codec::{LineCodec, Sentinels};
use logtools::core::export;
use logtools::core::format::LogFormat;
use logtools::core::literal::parse_literal;
use logtools::core::model::Level;
use logtools::platform::config::{self, AppConfig, PlatformPaths};
use logtools::util::error::{ExportError, LogToolsError, Result};
use logtools::util::{constants, logging};
use std::fs::{File, OpenOptions};
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tracing_subscriber::Registry;

/// logtools - structured, delimited log lines and their analysis.
///
/// Writes records whose fields are joined by a configurable delimiter and
/// reads such files back into a sortable, exportable dataset.
#[derive(Parser, Debug)]
#[command(name = "logtools", version, about)]
struct Cli {
    /// Enable debug logging (equivalent to RUST_LOG=debug).
    #[arg(short = 'd', long = "debug", global = true)]
    debug: bool,

    /// Path to config.toml (default: platform config directory).
    #[arg(short = 'c', long = "config", global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the line template for the configured field declaration.
    Format,

    /// Validate config.toml and the field declaration.
    Check,

    /// Decode log files or directories into one dataset.
    Decode {
        /// Log files, or directories whose *.log* files are read.
        #[arg(required = true)]
        paths: Vec<PathBuf>,

        /// Write the dataset as CSV.
        #[arg(long)]
        csv: Option<PathBuf>,

        /// Write the dataset as JSON.
        #[arg(long)]
        json: Option<PathBuf>,

        /// Keep file order instead of sorting by timestamp.
        #[arg(long = "no-sort")]
        no_sort: bool,
    },

    /// Rename rotated log files in a directory to <base>_N.log.
    Rename {
        dir: PathBuf,
        base: String,
    },

    /// Write one record line (to the configured record file, else stdout).
    Emit {
        /// Message text; omitted, the line carries None.
        #[arg(short, long)]
        message: Option<String>,

        #[arg(short, long)]
        action: Option<String>,

        #[arg(short, long)]
        tag: Option<String>,

        /// Values payload in literal syntax, e.g. "{'count': 3}".
        #[arg(long)]
        values: Option<String>,

        #[arg(short, long)]
        exception: Option<String>,

        /// Overrides the captured function name.
        #[arg(short, long)]
        function: Option<String>,

        /// debug, info, warning, error or critical.
        #[arg(short, long, default_value = "info")]
        level: Level,

        /// Logger name written into the `name` field.
        #[arg(short, long, default_value = constants::APP_NAME)]
        name: String,
    },
}

fn main() {
    let cli = Cli::parse();

    // Config is read before logging exists; its warnings are replayed below.
    let (config, config_warnings) = match &cli.config {
        Some(path) => match config::load_config_file(path) {
            Ok(loaded) => loaded,
            Err(e) => {
                eprintln!("Error: {e}");
                std::process::exit(2);
            }
        },
        None => config::load_config(&PlatformPaths::resolve().config_file()),
    };

    let format = match LogFormat::validated(&config.fields, &config.delimiter) {
        Ok(format) => Arc::new(format),
        Err(e) => {
            eprintln!("Error: {}", LogToolsError::from(e));
            std::process::exit(2);
        }
    };

    let records = match &cli.command {
        Command::Emit { .. } => match record_layer(&config, &format) {
            Ok(layer) => Some(layer),
            Err(e) => {
                eprintln!("Error: {e}");
                std::process::exit(1);
            }
        },
        _ => None,
    };
    logging::init(cli.debug, config.log_level.as_deref(), records);

    for warning in &config_warnings {
        tracing::warn!("{}", warning);
    }
    tracing::debug!(
        version = constants::APP_VERSION,
        command = ?cli.command,
        "logtools starting"
    );

    if let Err(e) = run(cli.command, &config, &config_warnings, format) {
        tracing::error!(error = %e, "Command failed");
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn record_layer(
    config: &AppConfig,
    format: &Arc<LogFormat>,
) -> std::io::Result<logging::RecordLayer> {
    match &config.record_file {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)?;
            }
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            Ok(Box::new(line_layer::<Registry, _>(
                Arc::clone(format),
                Mutex::new(file),
            )))
        }
        None => Ok(Box::new(line_layer::<Registry, _>(
            Arc::clone(format),
            std::io::stdout,
        ))),
    }
}

fn run(
    command: Command,
    config: &AppConfig,
    config_warnings: &[String],
    format: Arc<LogFormat>,
) -> Result<()> {
    match command {
        Command::Format => {
            println!("{}", format.template());
        }
        Command::Check => {
            for warning in config_warnings {
                println!("warning: {warning}");
            }
            println!(
                "ok: {} fields, delimiter {:?}",
                format.fields().len(),
                format.delimiter()
            );
        }
        Command::Decode {
            paths,
            csv,
            json,
            no_sort,
        } => {
            let sentinels = Sentinels {
                error_key: config.error_key.clone(),
                ..Sentinels::default()
            };
            let codec = LineCodec::new(LogFormat::clone(&format)).with_sentinels(sentinels);
            let order = TimeOrder {
                field: config.timestamp_field.clone(),
                format: config.timestamp_format.clone(),
            };
            let (table, warnings) =
                ingest::load_table(&paths, &codec, (!no_sort).then_some(&order))?;
            for warning in &warnings {
                eprintln!("warning: {warning}");
            }

            println!(
                "{} rows, {} columns, {} malformed",
                table.len(),
                table.columns().len(),
                table.count_tagged(&config.error_key)
            );
            if let Some(path) = csv {
                let count = export::export_csv(&table, create_export(&path)?, &path)?;
                println!("wrote {count} rows to {}", path.display());
            }
            if let Some(path) = json {
                let count = export::export_json(&table, create_export(&path)?, &path)?;
                println!("wrote {count} rows to {}", path.display());
            }
        }
        Command::Rename { dir, base } => {
            for path in rename::rename_files(&dir, &base)? {
                println!("{}", path.display());
            }
        }
        Command::Emit {
            message,
            action,
            tag,
            values,
            exception,
            function,
            level,
            name,
        } => {
            let mut extra = logtools::extra!();
            if let Some(function) = function {
                extra = extra.function(function);
            }
            if let Some(action) = action {
                extra = extra.action(action);
            }
            if let Some(tag) = tag {
                extra = extra.tag(tag);
            }
            if let Some(exception) = exception {
                extra = extra.exception(exception);
            }
            if let Some(values) = values {
                match parse_literal(&values) {
                    Ok(literal) => extra = extra.values(literal),
                    Err(e) => {
                        eprintln!("Error: --values is not a literal: {e}");
                        std::process::exit(2);
                    }
                }
            }
            Logger::new(name, format).log(level, message.as_deref(), extra);
        }
    }
    Ok(())
}

fn create_export(path: &Path) -> std::result::Result<BufWriter<File>, ExportError> {
    File::create(path)
        .map(BufWriter::new)
        .map_err(|e| ExportError::Io {
            path: path.to_path_buf(),
            source: e,
        })
}
