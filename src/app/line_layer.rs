// logtools - app/line_layer.rs
//
// Encode direction of the line codec: a tracing formatter that renders
// record events into one delimited line per event.
//
// Only events on `LINE_TARGET` reach this layer. Built-in fields come from
// the event metadata, the clock and the process; extra fields come from
// the event's own fields. Anything absent renders as `None`.

use crate::core::format::LogFormat;
use crate::core::model::Level;
use crate::util::constants::{ASCTIME_FORMAT, LINE_TARGET, NONE_TEXT};
use chrono::{DateTime, Local};
use std::collections::BTreeMap;
use std::fmt::{self, Write as _};
use std::path::Path;
use std::sync::Arc;
use tracing::field::{Field, Visit};
use tracing::{Event, Metadata, Subscriber};
use tracing_subscriber::filter::filter_fn;
use tracing_subscriber::fmt::format::{FormatEvent, FormatFields, Writer};
use tracing_subscriber::fmt::{FmtContext, MakeWriter};
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::Layer;

// =============================================================================
// Field collection
// =============================================================================

/// Event fields by name, already rendered to text.
#[derive(Debug, Default)]
struct FieldCollector {
    fields: BTreeMap<&'static str, String>,
}

impl FieldCollector {
    fn get(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }
}

impl Visit for FieldCollector {
    fn record_str(&mut self, field: &Field, value: &str) {
        self.fields.insert(field.name(), value.to_string());
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.fields.insert(field.name(), value.to_string());
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        self.fields.insert(field.name(), value.to_string());
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        let text = if value { "True" } else { "False" };
        self.fields.insert(field.name(), text.to_string());
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        self.fields.insert(field.name(), format!("{value:?}"));
    }
}

// =============================================================================
// Formatter
// =============================================================================

/// Renders record events by walking the format's field list.
#[derive(Debug, Clone)]
pub struct LineFormatter {
    format: Arc<LogFormat>,
}

impl LineFormatter {
    pub fn new(format: Arc<LogFormat>) -> Self {
        Self { format }
    }

    pub fn format(&self) -> &LogFormat {
        &self.format
    }

    fn render_field(
        &self,
        name: &str,
        meta: &Metadata<'_>,
        fields: &FieldCollector,
        now: &DateTime<Local>,
    ) -> String {
        let none = || NONE_TEXT.to_string();
        let pathname = fields.get("pathname").or_else(|| meta.file());
        match name {
            "asctime" => now.format(ASCTIME_FORMAT).to_string(),
            "created" => format!("{}.{:06}", now.timestamp(), now.timestamp_subsec_micros()),
            "msecs" => now.timestamp_subsec_millis().to_string(),
            "levelname" => level_of(meta, fields).name().to_string(),
            "levelno" => level_of(meta, fields).number().to_string(),
            "name" => fields
                .get("logger")
                .unwrap_or_else(|| meta.target())
                .to_string(),
            "message" => fields.get("message").map(str::to_string).unwrap_or_else(none),
            "pathname" => pathname.map(str::to_string).unwrap_or_else(none),
            "filename" => pathname
                .and_then(|p| Path::new(p).file_name())
                .map(|f| f.to_string_lossy().into_owned())
                .unwrap_or_else(none),
            "module" => pathname
                .and_then(|p| Path::new(p).file_stem())
                .map(|f| f.to_string_lossy().into_owned())
                .unwrap_or_else(none),
            "lineno" => fields
                .get("lineno")
                .map(str::to_string)
                .or_else(|| meta.line().map(|l| l.to_string()))
                .unwrap_or_else(none),
            "process" => std::process::id().to_string(),
            "thread" => thread_ident(),
            "threadName" => std::thread::current()
                .name()
                .map(str::to_string)
                .unwrap_or_else(none),
            other => fields.get(other).map(str::to_string).unwrap_or_else(none),
        }
    }
}

/// `levelname` field when present, so CRITICAL survives the trip through
/// tracing's ERROR level.
fn level_of(meta: &Metadata<'_>, fields: &FieldCollector) -> Level {
    fields
        .get("levelname")
        .and_then(|name| name.parse().ok())
        .unwrap_or_else(|| Level::from_tracing(meta.level()))
}

fn thread_ident() -> String {
    let id = format!("{:?}", std::thread::current().id());
    id.trim_start_matches("ThreadId(")
        .trim_end_matches(')')
        .to_string()
}

impl<S, N> FormatEvent<S, N> for LineFormatter
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        _ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> fmt::Result {
        let mut fields = FieldCollector::default();
        event.record(&mut fields);
        let meta = event.metadata();
        let now = Local::now();

        for (i, name) in self.format.fields().iter().enumerate() {
            if i > 0 {
                writer.write_str(self.format.delimiter())?;
            }
            let text = self.render_field(name, meta, &fields, &now);
            // A line break inside a field would split the record on decode.
            if text.contains(['\n', '\r']) {
                writer.write_str(&text.replace(['\n', '\r'], " "))?;
            } else {
                writer.write_str(&text)?;
            }
        }
        writeln!(writer)
    }
}

// =============================================================================
// Layer
// =============================================================================

/// A layer writing record events to `make_writer`, one line each.
///
/// Everything not on `LINE_TARGET` is filtered out, so diagnostics never
/// end up in the record stream.
pub fn line_layer<S, W>(format: Arc<LogFormat>, make_writer: W) -> impl Layer<S>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    tracing_subscriber::fmt::layer()
        .with_ansi(false)
        .event_format(LineFormatter::new(format))
        .with_writer(make_writer)
        .with_filter(filter_fn(|meta| meta.target() == LINE_TARGET))
}


#[cfg(test)]
mod tests {
    use super::test_writer::SharedBuf;
    use super::*;
    use tracing_subscriber::layer::SubscriberExt;

    fn capture(format: LogFormat, emit: impl FnOnce()) -> String {
        let buf = SharedBuf::default();
        let subscriber =
            tracing_subscriber::registry().with(line_layer(Arc::new(format), buf.clone()));
        tracing::subscriber::with_default(subscriber, emit);
        buf.contents()
    }

    #[test]
    fn test_only_line_target_is_rendered() {
        let format = LogFormat::new(&["levelname", "message"], "|").unwrap();
        let out = capture(format, || {
            tracing::info!("diagnostic, not a record");
            tracing::info!(target: LINE_TARGET, "a record");
        });
        assert_eq!(out, "INFO|a record\n");
    }

    #[test]
    fn test_absent_fields_render_none() {
        let format = LogFormat::new(&["message", "action", "tag", "values"], "___").unwrap();
        let out = capture(format, || {
            tracing::warn!(target: LINE_TARGET, action = "run", "hello");
        });
        assert_eq!(out, "hello___run___None___None\n");
    }

    #[test]
    fn test_levelname_field_overrides_tracing_level() {
        let format = LogFormat::new(&["levelname", "levelno", "name"], " ").unwrap();
        let out = capture(format, || {
            tracing::error!(target: LINE_TARGET, levelname = "CRITICAL", logger = "app", "x");
            tracing::debug!(target: LINE_TARGET, "y");
        });
        assert_eq!(out, format!("CRITICAL 50 app\nDEBUG 10 {LINE_TARGET}\n"));
    }

    #[test]
    fn test_builtin_metadata_fields() {
        let format =
            LogFormat::new(&["asctime", "filename", "module", "lineno", "process"], "___")
                .unwrap();
        let out = capture(format, || {
            tracing::info!(target: LINE_TARGET, "x");
        });
        let tokens: Vec<&str> = out.trim_end().split("___").collect();
        assert_eq!(tokens.len(), 5);
        assert!(crate::core::table::parse_timestamp(tokens[0], ASCTIME_FORMAT).is_some());
        assert_eq!(tokens[1], "line_layer.rs");
        assert_eq!(tokens[2], "line_layer");
        assert!(tokens[3].parse::<u32>().is_ok());
        assert_eq!(tokens[4], std::process::id().to_string());
    }

    #[test]
    fn test_line_breaks_are_flattened() {
        let format = LogFormat::new(&["message", "values"], "___").unwrap();
        let out = capture(format, || {
            tracing::info!(target: LINE_TARGET, "two\nlines");
        });
        assert_eq!(out, "two lines___None\n");
    }
}
