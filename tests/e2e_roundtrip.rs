// logtools - tests/e2e_roundtrip.rs
//
// End-to-end tests for the write -> file -> read pipeline.
//
// These tests exercise the real filesystem, the real tracing subscriber
// stack, real glob/walkdir listing and real chrono timestamp parsing.
// No mocks, no stubs: a record goes from a `Logger` call through the line
// layer into a file on disk and back out as a row of a sorted dataset.

use logtools::app::ingest::{decode_file, load_table, TimeOrder};
use logtools::app::line_layer::line_layer;
use logtools::app::logger::Logger;
use logtools::app::rename::rename_files;
use logtools::core::codec::LineCodec;
use logtools::core::export::{export_csv, export_json};
use logtools::core::format::LogFormat;
use logtools::core::literal::Literal;
use logtools::core::model::ExtraRecord;
use logtools::platform::config::load_config;
use std::fs;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use tracing_subscriber::layer::SubscriberExt;

// =============================================================================
// Helpers
// =============================================================================

/// Absolute path to the on-disk fixture files.
fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn messages(table: &logtools::core::table::LogTable) -> Vec<String> {
    table
        .column("message")
        .unwrap()
        .into_iter()
        .map(|cell| cell.map(Literal::cell_text).unwrap_or_default())
        .collect()
}

struct Service;

impl Service {
    fn handle(&self, logger: &Logger, job: i64) {
        logger.info(
            "job handled",
            logtools::extra!()
                .action("handle")
                .tag("JOB")
                .values(Literal::dict([
                    ("job", Literal::Int(job)),
                    ("timing", Literal::dict([("ms", Literal::Float(1.5))])),
                ])),
        );
    }
}

// =============================================================================
// Decode E2E
// =============================================================================

/// A fixture file decodes to typed fields with flattened values.
#[test]
fn e2e_decodes_fixture_file() {
    let result = decode_file(&fixture("logfile1.log"), &LineCodec::default()).unwrap();
    assert_eq!(result.lines_processed, 2);
    assert!(result.warnings.is_empty(), "{:?}", result.warnings);

    let first = &result.records[0];
    assert_eq!(first["message"], Literal::from("log from logger1 No.1"));
    assert_eq!(first["A"], Literal::from("AAA"));
    assert_eq!(first["int"], Literal::Int(3));
    assert_eq!(first["tag"], Literal::None);

    let second = &result.records[1];
    assert_eq!(second["function"], Literal::from("Worker.run"));
    assert_eq!(second["exception"], Literal::from("timeout: [-1]"));
    assert_eq!(second["nest-host"], Literal::from("db01"));
    assert_eq!(
        second["nest-ports"],
        Literal::List(vec![Literal::Int(5432), Literal::Int(5433)])
    );
}

/// Files given out of order come back sorted by asctime; malformed lines
/// stay in the dataset, tagged, after the timestamped rows.
#[test]
fn e2e_load_table_sorts_files_given_out_of_order() {
    let codec = LineCodec::default();
    let (table, warnings) = load_table(
        &[fixture("logfile2.log"), fixture("logfile1.log")],
        &codec,
        Some(&TimeOrder::default()),
    )
    .unwrap();

    assert!(warnings.is_empty(), "{warnings:?}");
    assert_eq!(table.len(), 5);
    assert_eq!(
        messages(&table),
        vec![
            "log from logger1 No.1",
            "log from logger1 No.2",
            "log from logger2 No.1",
            "log from logger2 No.2",
            "",
        ]
    );
    assert_eq!(table.count_tagged("error"), 2);

    let errors: Vec<Option<&Literal>> = table.column("error").unwrap();
    assert_eq!(errors[3], Some(&Literal::from("values warning")));
    assert_eq!(errors[4], Some(&Literal::from("strange format")));
}

/// The dataset exports to CSV and JSON files.
#[test]
fn e2e_exports_dataset() {
    let dir = tempfile::tempdir().unwrap();
    let (table, _) = load_table(
        &[fixture("logfile1.log")],
        &LineCodec::default(),
        Some(&TimeOrder::default()),
    )
    .unwrap();

    let csv_path = dir.path().join("out.csv");
    let count = export_csv(&table, fs::File::create(&csv_path).unwrap(), &csv_path).unwrap();
    assert_eq!(count, 2);
    let csv_text = fs::read_to_string(&csv_path).unwrap();
    let header = csv_text.lines().next().unwrap();
    assert!(header.starts_with("asctime,levelname,name,function,action,exception,message,tag"));
    assert!(header.contains("nest-ports"));
    assert!(csv_text.contains("\"[5432, 5433]\""));

    let json_path = dir.path().join("out.json");
    export_json(&table, fs::File::create(&json_path).unwrap(), &json_path).unwrap();
    let json: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&json_path).unwrap()).unwrap();
    assert_eq!(json[1]["nest-ports"], serde_json::json!([5432, 5433]));
}

// =============================================================================
// Write -> read E2E
// =============================================================================

/// Records written through the line layer to a file decode back to what
/// the caller supplied.
#[test]
fn e2e_logger_to_file_and_back() {
    let dir = tempfile::tempdir().unwrap();
    let log_path = dir.path().join("service.log");
    let file = fs::File::create(&log_path).unwrap();

    let format = Arc::new(LogFormat::default());
    let logger = Logger::new("svc", Arc::clone(&format));
    let subscriber =
        tracing_subscriber::registry().with(line_layer(Arc::clone(&format), Mutex::new(file)));

    tracing::subscriber::with_default(subscriber, || {
        let service = Service;
        service.handle(&logger, 7);
        logger.error(
            "job failed",
            ExtraRecord::new()
                .function("Service.handle")
                .exception("dummyError : [-1, -1, -1]"),
        );
        // Diagnostics are not records and must not reach the file.
        tracing::info!("not a record");
    });

    let (table, warnings) =
        load_table(&[log_path], &logger.codec(), Some(&TimeOrder::default())).unwrap();
    assert!(warnings.is_empty());
    assert_eq!(table.len(), 2);
    assert_eq!(table.count_tagged("error"), 0);

    let rows = table.rows();
    assert_eq!(rows[0]["name"], Literal::from("svc"));
    assert_eq!(rows[0]["levelname"], Literal::from("INFO"));
    assert_eq!(rows[0]["function"], Literal::from("Service.handle"));
    assert_eq!(rows[0]["action"], Literal::from("handle"));
    assert_eq!(rows[0]["tag"], Literal::from("JOB"));
    assert_eq!(rows[0]["job"], Literal::Int(7));
    assert_eq!(rows[0]["timing-ms"], Literal::Float(1.5));

    assert_eq!(rows[1]["levelname"], Literal::from("ERROR"));
    assert_eq!(
        rows[1]["exception"],
        Literal::from("dummyError : [-1, -1, -1]")
    );
    assert!(!rows[1].contains_key("values"));
}

/// A custom field declaration from config.toml drives both directions.
#[test]
fn e2e_config_declared_format_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let config_path = dir.path().join("config.toml");
    fs::write(
        &config_path,
        "[format]\nfields = [\"levelname\", \"name\", \"message\", \"tag\", \"values\"]\n\
         delimiter = \" | \"\n",
    )
    .unwrap();
    let (config, warnings) = load_config(&config_path);
    assert!(warnings.is_empty(), "{warnings:?}");

    let format = Arc::new(LogFormat::validated(&config.fields, &config.delimiter).unwrap());
    assert_eq!(
        format.template(),
        "%(levelname)s | %(name)s | %(message)s | %(tag)s | %(values)s"
    );

    let log_path = dir.path().join("custom.log");
    let logger = Logger::new("custom", Arc::clone(&format));
    let subscriber = tracing_subscriber::registry().with(line_layer(
        Arc::clone(&format),
        Mutex::new(fs::File::create(&log_path).unwrap()),
    ));
    tracing::subscriber::with_default(subscriber, || {
        logger.warning("disk low", ExtraRecord::new().tag("DISK").values(vec![1, 2]));
    });

    let content = fs::read_to_string(&log_path).unwrap();
    assert_eq!(content, "WARNING | custom | disk low | DISK | [1, 2]\n");

    let result = decode_file(&log_path, &logger.codec()).unwrap();
    assert_eq!(result.warnings.len(), 1);
    assert_eq!(result.records[0]["tag"], Literal::from("DISK"));
    assert_eq!(result.records[0]["error"], Literal::from("values warning"));
}

// =============================================================================
// Rename E2E
// =============================================================================

/// Rotation artifacts are normalised, a rerun is a no-op, and the renamed
/// directory still loads as one dataset.
#[test]
fn e2e_rename_then_load_directory() {
    let dir = tempfile::tempdir().unwrap();
    fs::copy(fixture("logfile1.log"), dir.path().join("app.log.1")).unwrap();
    fs::copy(fixture("logfile2.log"), dir.path().join("app.log")).unwrap();

    let renamed = rename_files(dir.path(), "after").unwrap();
    let names: Vec<String> = renamed
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, vec!["after_0.log", "after_1.log"]);
    assert_eq!(rename_files(dir.path(), "after").unwrap(), renamed);

    let (table, _) = load_table(
        &[dir.path().to_path_buf()],
        &LineCodec::default(),
        Some(&TimeOrder::default()),
    )
    .unwrap();
    assert_eq!(table.len(), 5);
    assert_eq!(messages(&table)[0], "log from logger1 No.1");
}
