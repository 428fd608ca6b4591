// logtools - util/logging.rs
//
// Diagnostics logging with runtime-selectable debug mode.
//
// Activation:
//   - Environment variable: RUST_LOG=debug (or trace)
//   - CLI flag: --debug
//   - Config file: [logging] level = "debug"
//
// Diagnostics go to stderr. Record events (target `LINE_TARGET`) are
// switched off there; they only reach the record layer, when one is given.

use super::constants;
use tracing_subscriber::filter::Directive;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, Registry};

/// A boxed layer installed next to the diagnostics output.
pub type RecordLayer = Box<dyn Layer<Registry> + Send + Sync>;

/// Build the diagnostics filter.
///
/// Priority: RUST_LOG env var > CLI --debug flag > config level > default "info".
pub fn diagnostics_filter(debug_flag: bool, config_level: Option<&str>) -> EnvFilter {
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if debug_flag {
        EnvFilter::new("debug")
    } else if let Some(level) = config_level {
        EnvFilter::new(level)
    } else {
        EnvFilter::new(constants::DEFAULT_LOG_LEVEL)
    };

    match format!("{}=off", constants::LINE_TARGET).parse::<Directive>() {
        Ok(directive) => filter.add_directive(directive),
        Err(_) => filter,
    }
}

/// Initialise the logging subsystem.
///
/// `debug_flag` is true when the user passed --debug on the CLI.
/// `config_level` is the level from config.toml (if present).
/// `record_layer` renders record events, see `app::line_layer`.
pub fn init(debug_flag: bool, config_level: Option<&str>, record_layer: Option<RecordLayer>) {
    let diagnostics = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true)
        .compact()
        .with_filter(diagnostics_filter(debug_flag, config_level));

    let has_records = record_layer.is_some();
    tracing_subscriber::registry()
        .with(record_layer)
        .with(diagnostics)
        .init();

    tracing::debug!(
        app = constants::APP_NAME,
        version = constants::APP_VERSION,
        records = has_records,
        "Logging initialised"
    );
}
