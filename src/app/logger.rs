// logtools - app/logger.rs
//
// Producer side: turns a message plus an `ExtraRecord` into a record event
// on `LINE_TARGET`. Rendering happens in the line layer, so whatever
// subscriber is installed decides where lines go.

use crate::core::codec::LineCodec;
use crate::core::format::LogFormat;
use crate::core::model::{ExtraRecord, Level};
use crate::util::constants::LINE_TARGET;
use std::panic::Location;
use std::sync::Arc;
use tracing::field::display;

/// Named record producer bound to a line format.
#[derive(Debug, Clone)]
pub struct Logger {
    name: String,
    format: Arc<LogFormat>,
    threshold: Level,
}

impl Logger {
    pub fn new(name: impl Into<String>, format: Arc<LogFormat>) -> Self {
        Self {
            name: name.into(),
            format,
            threshold: Level::Debug,
        }
    }

    /// Drop records below `threshold`.
    pub fn with_threshold(mut self, threshold: Level) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn format(&self) -> &LogFormat {
        &self.format
    }

    pub fn threshold(&self) -> Level {
        self.threshold
    }

    /// Decoder for the lines this logger produces.
    pub fn codec(&self) -> LineCodec {
        LineCodec::new(LogFormat::clone(&self.format))
    }

    pub fn is_enabled(&self, level: Level) -> bool {
        level >= self.threshold
    }

    /// Emit one record.
    ///
    /// `message` may be `None`; the line then carries `None` in that field.
    /// `pathname` and `lineno` point at the caller, not at this method.
    #[track_caller]
    pub fn log<'m>(
        &self,
        level: Level,
        message: impl Into<Option<&'m str>>,
        extra: ExtraRecord,
    ) {
        if !self.is_enabled(level) {
            return;
        }
        let message: Option<&str> = message.into();
        let location = Location::caller();

        macro_rules! emit {
            ($lvl:expr) => {
                tracing::event!(
                    target: LINE_TARGET,
                    $lvl,
                    logger = %self.name,
                    levelname = level.name(),
                    pathname = location.file(),
                    lineno = location.line(),
                    action = extra.action.as_deref(),
                    exception = extra.exception.as_deref(),
                    function = extra.function.as_deref(),
                    tag = extra.tag.as_deref(),
                    values = extra.values.as_ref().map(display),
                    message = message
                )
            };
        }

        match level {
            Level::Debug => emit!(tracing::Level::DEBUG),
            Level::Info => emit!(tracing::Level::INFO),
            Level::Warning => emit!(tracing::Level::WARN),
            Level::Error | Level::Critical => emit!(tracing::Level::ERROR),
        }
    }

    #[track_caller]
    pub fn debug<'m>(&self, message: impl Into<Option<&'m str>>, extra: ExtraRecord) {
        self.log(Level::Debug, message, extra);
    }

    #[track_caller]
    pub fn info<'m>(&self, message: impl Into<Option<&'m str>>, extra: ExtraRecord) {
        self.log(Level::Info, message, extra);
    }

    #[track_caller]
    pub fn warning<'m>(&self, message: impl Into<Option<&'m str>>, extra: ExtraRecord) {
        self.log(Level::Warning, message, extra);
    }

    #[track_caller]
    pub fn error<'m>(&self, message: impl Into<Option<&'m str>>, extra: ExtraRecord) {
        self.log(Level::Error, message, extra);
    }

    #[track_caller]
    pub fn critical<'m>(&self, message: impl Into<Option<&'m str>>, extra: ExtraRecord) {
        self.log(Level::Critical, message, extra);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::line_layer::{line_layer, test_writer::SharedBuf};
    use crate::core::literal::Literal;
    use tracing_subscriber::layer::SubscriberExt;

    fn capture(logger: &Logger, emit: impl FnOnce(&Logger)) -> Vec<String> {
        let buf = SharedBuf::default();
        let format = Arc::new(logger.format().clone());
        let subscriber = tracing_subscriber::registry().with(line_layer(format, buf.clone()));
        tracing::subscriber::with_default(subscriber, || emit(logger));
        buf.contents().lines().map(str::to_string).collect()
    }

    fn default_logger() -> Logger {
        Logger::new("DUMMYLOG", Arc::new(LogFormat::default()))
    }

    #[test]
    fn test_round_trip_through_codec() {
        let logger = default_logger();
        let lines = capture(&logger, |log| {
            log.info(
                "valid",
                crate::extra!()
                    .action("run")
                    .tag("TAG")
                    .values(Literal::dict([
                        ("A", Literal::from("AAA")),
                        ("nest", Literal::dict([("x", 1)])),
                    ])),
            );
        });
        assert_eq!(lines.len(), 1);

        let decoded = logger.codec().decode_line(&lines[0]);
        assert!(decoded.warnings.is_empty(), "{:?}", decoded.warnings);
        let record = decoded.record;
        assert_eq!(record["levelname"], Literal::from("INFO"));
        assert_eq!(record["name"], Literal::from("DUMMYLOG"));
        assert_eq!(
            record["function"],
            Literal::from("test_round_trip_through_codec")
        );
        assert_eq!(record["action"], Literal::from("run"));
        assert_eq!(record["exception"], Literal::None);
        assert_eq!(record["message"], Literal::from("valid"));
        assert_eq!(record["tag"], Literal::from("TAG"));
        assert_eq!(record["A"], Literal::from("AAA"));
        assert_eq!(record["nest-x"], Literal::Int(1));
    }

    #[test]
    fn test_levels_and_exception() {
        let logger = default_logger();
        let lines = capture(&logger, |log| {
            log.debug("d", ExtraRecord::new());
            log.warning("w", ExtraRecord::new().exception("dummyError : [-1, -1, -1]"));
            log.error("e", ExtraRecord::new());
            log.critical("c", ExtraRecord::new());
        });
        let codec = logger.codec();
        let levels: Vec<Literal> = lines
            .iter()
            .map(|l| codec.decode_line(l).record["levelname"].clone())
            .collect();
        assert_eq!(
            levels,
            vec![
                Literal::from("DEBUG"),
                Literal::from("WARNING"),
                Literal::from("ERROR"),
                Literal::from("CRITICAL"),
            ]
        );
        let warning = codec.decode_line(&lines[1]).record;
        assert_eq!(
            warning["exception"],
            Literal::from("dummyError : [-1, -1, -1]")
        );
        assert_eq!(warning["function"], Literal::None);
    }

    #[test]
    fn test_missing_message_decodes_as_none() {
        let logger = default_logger();
        let lines = capture(&logger, |log| {
            log.info(None::<&str>, ExtraRecord::new().tag("NOMSG"));
            log.info("", ExtraRecord::new());
        });
        assert_eq!(lines.len(), 2);
        let codec = logger.codec();
        let absent = codec.decode_line(&lines[0]).record;
        assert_eq!(absent["message"], Literal::None);
        assert_eq!(absent["tag"], Literal::from("NOMSG"));
        let empty = codec.decode_line(&lines[1]).record;
        assert_eq!(empty["message"], Literal::from(""));
    }

    #[test]
    fn test_threshold_drops_lower_levels() {
        let logger = default_logger().with_threshold(Level::Warning);
        let lines = capture(&logger, |log| {
            log.info("dropped", ExtraRecord::new());
            log.warning("kept", ExtraRecord::new());
        });
        assert_eq!(lines.len(), 1);
        assert!(lines[0].contains("___kept___"));
    }

    #[test]
    fn test_location_points_at_caller() {
        let format = LogFormat::new(&["filename", "lineno", "values"], "___").unwrap();
        let logger = Logger::new("loc", Arc::new(format));
        let mut expected_line = 0;
        let lines = capture(&logger, |log| {
            expected_line = line!() + 1;
            log.info("here", ExtraRecord::new());
        });
        assert_eq!(lines, vec![format!("logger.rs___{expected_line}___None")]);
    }
}
