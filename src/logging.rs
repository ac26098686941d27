/// Structured logging for the reserve guide
///
/// Provides context-rich logging with component tags, optional reserve ids,
/// timestamps, and severity levels. Supports both console output and
/// file-based logging.

use chrono::Utc;
use std::fmt;
use std::fs::OpenOptions;
use std::io::Write;
use std::str::FromStr;
use std::sync::Mutex;

use crate::model::GuideError;

// ---------------------------------------------------------------------------
// Log Levels
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Debug,
    Info,
    Warning,
    Error,
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogLevel::Debug => write!(f, "DEBUG"),
            LogLevel::Info => write!(f, "INFO"),
            LogLevel::Warning => write!(f, "WARN"),
            LogLevel::Error => write!(f, "ERROR"),
        }
    }
}

impl FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warn" | "warning" => Ok(LogLevel::Warning),
            "error" => Ok(LogLevel::Error),
            other => Err(format!("unknown log level '{}'", other)),
        }
    }
}

// ---------------------------------------------------------------------------
// Components
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Component {
    Catalog,
    Navigator,
    Guide,
    Booking,
    System,
}

impl fmt::Display for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Component::Catalog => write!(f, "CATALOG"),
            Component::Navigator => write!(f, "NAV"),
            Component::Guide => write!(f, "GUIDE"),
            Component::Booking => write!(f, "BOOKING"),
            Component::System => write!(f, "SYS"),
        }
    }
}

// ---------------------------------------------------------------------------
// Failure Classification
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureType {
    /// Expected failure - e.g. the model returned nothing for a filtered prompt
    Expected,
    /// Unexpected failure - indicates endpoint degradation or configuration issue
    Unexpected,
    /// Unknown - cannot determine if this is expected or not
    Unknown,
}

impl fmt::Display for FailureType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureType::Expected => write!(f, "EXPECTED"),
            FailureType::Unexpected => write!(f, "UNEXPECTED"),
            FailureType::Unknown => write!(f, "UNKNOWN"),
        }
    }
}

// ---------------------------------------------------------------------------
// Logger Configuration
// ---------------------------------------------------------------------------

/// Global logger instance
static LOGGER: Mutex<Option<Logger>> = Mutex::new(None);

pub struct Logger {
    /// Minimum log level to display
    min_level: LogLevel,
    /// Optional file path for logging
    log_file: Option<String>,
    /// Whether to include timestamps in console output
    console_timestamps: bool,
}

impl Logger {
    /// Initialize the global logger
    pub fn init(min_level: LogLevel, log_file: Option<String>, console_timestamps: bool) {
        let logger = Logger {
            min_level,
            log_file,
            console_timestamps,
        };

        if let Ok(mut slot) = LOGGER.lock() {
            *slot = Some(logger);
        }
    }

    fn format_entry(level: LogLevel, component: Component, reserve_id: Option<&str>, message: &str) -> String {
        let timestamp = Utc::now().format("%Y-%m-%d %H:%M:%S UTC");
        let reserve_part = reserve_id.map(|s| format!(" [{}]", s)).unwrap_or_default();
        format!("{} {} {}{}: {}", timestamp, level, component, reserve_part, message)
    }

    /// The console line for an entry and whether it goes to stderr. Without
    /// timestamps the console is a terse progress view and debug is left out.
    fn console_line(
        &self,
        level: LogLevel,
        component: Component,
        reserve_id: Option<&str>,
        message: &str,
        entry: &str,
    ) -> Option<(bool, String)> {
        if self.console_timestamps {
            let to_stderr = matches!(level, LogLevel::Error | LogLevel::Warning);
            return Some((to_stderr, entry.to_string()));
        }

        let reserve_part = reserve_id.map(|s| format!(" [{}]", s)).unwrap_or_default();
        match level {
            LogLevel::Error => Some((true, format!("   ✗ {}{}: {}", component, reserve_part, message))),
            LogLevel::Warning => Some((true, format!("   ⚠ {}{}: {}", component, reserve_part, message))),
            LogLevel::Info => Some((false, format!("   {}", message))),
            LogLevel::Debug => None,
        }
    }

    fn log(&self, level: LogLevel, component: Component, reserve_id: Option<&str>, message: &str) {
        if level < self.min_level {
            return;
        }

        let log_entry = Self::format_entry(level, component, reserve_id, message);

        // Console output
        match self.console_line(level, component, reserve_id, message, &log_entry) {
            Some((true, line)) => eprintln!("{}", line),
            Some((false, line)) => println!("{}", line),
            None => {}
        }

        // File output
        if let Some(ref path) = self.log_file {
            if let Err(e) = Self::append_to_file(path, &log_entry) {
                eprintln!("Failed to write to log file {}: {}", path, e);
            }
        }
    }

    fn append_to_file(path: &str, entry: &str) -> std::io::Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)?;
        writeln!(file, "{}", entry)?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Public Logging Functions
// ---------------------------------------------------------------------------

/// Initialize the global logger
pub fn init_logger(min_level: LogLevel, log_file: Option<&str>, console_timestamps: bool) {
    Logger::init(min_level, log_file.map(String::from), console_timestamps);
}

fn emit(level: LogLevel, component: Component, reserve_id: Option<&str>, message: &str) {
    if let Ok(guard) = LOGGER.lock() {
        if let Some(logger) = guard.as_ref() {
            logger.log(level, component, reserve_id, message);
        }
    }
}

/// Log a general informational message
pub fn info(component: Component, reserve_id: Option<&str>, message: &str) {
    emit(LogLevel::Info, component, reserve_id, message);
}

/// Log a warning message
pub fn warn(component: Component, reserve_id: Option<&str>, message: &str) {
    emit(LogLevel::Warning, component, reserve_id, message);
}

/// Log an error message
pub fn error(component: Component, reserve_id: Option<&str>, message: &str) {
    emit(LogLevel::Error, component, reserve_id, message);
}

/// Log a debug message
pub fn debug(component: Component, reserve_id: Option<&str>, message: &str) {
    emit(LogLevel::Debug, component, reserve_id, message);
}

// ---------------------------------------------------------------------------
// Guide Failure Logging
// ---------------------------------------------------------------------------

/// Classify a guide endpoint failure.
///
/// An empty reply usually means the model declined or was safety-filtered,
/// which is routine. Auth and server errors point at configuration or an
/// outage. Rate limiting and transport errors could be either.
pub fn classify_guide_failure(err: &GuideError) -> FailureType {
    match err {
        GuideError::EmptyResponse => FailureType::Expected,
        GuideError::Http { status, .. } if *status == 429 => FailureType::Unknown,
        GuideError::Http { .. } => FailureType::Unexpected,
        // Response shape changed under us
        GuideError::Parse(_) => FailureType::Unexpected,
        GuideError::Transport(_) => FailureType::Unknown,
    }
}

/// Log a guide failure with automatic classification. `context` is the
/// reserve the user was viewing, if any.
pub fn log_guide_failure(context: Option<&str>, operation: &str, err: &GuideError) {
    let failure_type = classify_guide_failure(err);

    let message = format!("{} failed [{}]: {}", operation, failure_type, err);

    match failure_type {
        FailureType::Expected => debug(Component::Guide, context, &message),
        FailureType::Unexpected => error(Component::Guide, context, &message),
        FailureType::Unknown => warn(Component::Guide, context, &message),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_level_ordering() {
        assert!(LogLevel::Debug < LogLevel::Info);
        assert!(LogLevel::Info < LogLevel::Warning);
        assert!(LogLevel::Warning < LogLevel::Error);
    }

    #[test]
    fn test_log_level_parsing() {
        assert_eq!("debug".parse::<LogLevel>(), Ok(LogLevel::Debug));
        assert_eq!(" WARN ".parse::<LogLevel>(), Ok(LogLevel::Warning));
        assert_eq!("warning".parse::<LogLevel>(), Ok(LogLevel::Warning));
        assert!("loud".parse::<LogLevel>().is_err());
    }

    #[test]
    fn test_failure_classification() {
        assert_eq!(classify_guide_failure(&GuideError::EmptyResponse), FailureType::Expected);

        let server = GuideError::Http { status: 500, body: String::new() };
        assert_eq!(classify_guide_failure(&server), FailureType::Unexpected);

        let throttled = GuideError::Http { status: 429, body: String::new() };
        assert_eq!(classify_guide_failure(&throttled), FailureType::Unknown);

        let reset = GuideError::Transport("connection reset".into());
        assert_eq!(classify_guide_failure(&reset), FailureType::Unknown);
    }

    #[test]
    fn test_entry_format_includes_component_and_reserve() {
        let entry = Logger::format_entry(LogLevel::Warning, Component::Guide, Some("4"), "slow");
        assert!(entry.contains("WARN GUIDE [4]: slow"), "got '{}'", entry);
    }

    #[test]
    fn test_debug_is_not_echoed_without_timestamps() {
        let terse = Logger { min_level: LogLevel::Debug, log_file: None, console_timestamps: false };
        let entry = Logger::format_entry(LogLevel::Debug, Component::Guide, None, "reply ignored");
        assert_eq!(terse.console_line(LogLevel::Debug, Component::Guide, None, "reply ignored", &entry), None);

        let warn = terse.console_line(LogLevel::Warning, Component::Guide, Some("4"), "slow", &entry);
        assert_eq!(warn, Some((true, "   ⚠ GUIDE [4]: slow".to_string())));

        let stamped = Logger { console_timestamps: true, ..terse };
        let line = stamped.console_line(LogLevel::Debug, Component::Guide, None, "reply ignored", &entry);
        assert_eq!(line, Some((false, entry)));
    }

    #[test]
    fn test_file_logging_appends_entries() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("guide.log");
        let path_str = path.to_str().unwrap();

        Logger::append_to_file(path_str, "first").unwrap();
        Logger::append_to_file(path_str, "second").unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        assert_eq!(contents, "first\nsecond\n");
    }
}
