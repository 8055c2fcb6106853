/// Structured logging for the flood risk service
///
/// Provides context-rich logging tagged with the data source and an optional
/// subject (a location string or barrage id), timestamps, and severity
/// levels. Supports both console output and file-based logging.

use chrono::Utc;
use std::fmt;
use std::fs::OpenOptions;
use std::io::Write;
use std::str::FromStr;
use std::sync::Mutex;

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
            other => Err(format!("unknown log level: {}", other)),
        }
    }
}

// ---------------------------------------------------------------------------
// Data Source Types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataSource {
    Weather,
    Backend,
    River,
    Pipeline,
    System,
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataSource::Weather => write!(f, "WEATHER"),
            DataSource::Backend => write!(f, "BACKEND"),
            DataSource::River => write!(f, "RIVER"),
            DataSource::Pipeline => write!(f, "PIPE"),
            DataSource::System => write!(f, "SYS"),
        }
    }
}

// ---------------------------------------------------------------------------
// Failure Classification
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureType {
    /// Expected failure - optional source absent or not configured
    Expected,
    /// Unexpected failure - bad credentials, API change, or network fault
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

        if let Ok(mut guard) = LOGGER.lock() {
            *guard = Some(logger);
        }
    }

    fn log(&self, level: LogLevel, source: DataSource, subject: Option<&str>, message: &str) {
        if level < self.min_level {
            return;
        }

        let log_entry = format_entry(level, source, subject, message);
        let subject_part = subject.map(|s| format!(" [{}]", s)).unwrap_or_default();

        // Console output (stderr, so stdout stays clean for JSON results)
        if self.console_timestamps {
            eprintln!("{}", log_entry);
        } else {
            match level {
                LogLevel::Error => eprintln!("   ✗ {}{}: {}", source, subject_part, message),
                LogLevel::Warning => eprintln!("   ⚠ {}{}: {}", source, subject_part, message),
                LogLevel::Info => eprintln!("   {}", message),
                LogLevel::Debug => eprintln!("   [DEBUG] {}", message),
            }
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

/// Single-line entry as written to the log file.
pub fn format_entry(level: LogLevel, source: DataSource, subject: Option<&str>, message: &str) -> String {
    let timestamp = Utc::now().format("%Y-%m-%d %H:%M:%S UTC");
    let subject_part = subject.map(|s| format!(" [{}]", s)).unwrap_or_default();
    format!("{} {} {}{}: {}", timestamp, level, source, subject_part, message)
}

// ---------------------------------------------------------------------------
// Public Logging Functions
// ---------------------------------------------------------------------------

/// Initialize the global logger
pub fn init_logger(min_level: LogLevel, log_file: Option<&str>, console_timestamps: bool) {
    Logger::init(min_level, log_file.map(String::from), console_timestamps);
}

fn emit(level: LogLevel, source: DataSource, subject: Option<&str>, message: &str) {
    if let Ok(guard) = LOGGER.lock() {
        if let Some(logger) = guard.as_ref() {
            logger.log(level, source, subject, message);
        }
    }
}

/// Log a general informational message
pub fn info(source: DataSource, subject: Option<&str>, message: &str) {
    emit(LogLevel::Info, source, subject, message);
}

/// Log a warning message
pub fn warn(source: DataSource, subject: Option<&str>, message: &str) {
    emit(LogLevel::Warning, source, subject, message);
}

/// Log an error message
pub fn error(source: DataSource, subject: Option<&str>, message: &str) {
    emit(LogLevel::Error, source, subject, message);
}

/// Log a debug message
pub fn debug(source: DataSource, subject: Option<&str>, message: &str) {
    emit(LogLevel::Debug, source, subject, message);
}

// ---------------------------------------------------------------------------
// Failure Classification Helpers
// ---------------------------------------------------------------------------

/// Classify an outbound-call failure from its error text.
pub fn classify_failure(source: DataSource, error_message: &str) -> FailureType {
    // The river dataset is optional; an unconfigured or empty source is normal.
    if source == DataSource::River
        && (error_message.contains("not configured") || error_message.contains("No data"))
    {
        FailureType::Expected
    }
    // 5xx responses are usually transient provider trouble
    else if error_message.contains("API error: 5") {
        FailureType::Unknown
    }
    // 4xx responses mean a bad key, bad URL, or rejected payload
    else if error_message.contains("API error: 4") {
        FailureType::Unexpected
    }
    else if error_message.contains("Transport error") || error_message.contains("timed out") {
        FailureType::Unexpected
    }
    // Parse errors suggest API changes
    else if error_message.contains("Parse error") {
        FailureType::Unexpected
    }
    else {
        FailureType::Unknown
    }
}

/// Log a data source failure with automatic classification
pub fn log_failure(source: DataSource, subject: Option<&str>, operation: &str, err: &dyn std::error::Error) {
    let error_msg = err.to_string();
    let failure_type = classify_failure(source, &error_msg);

    let message = format!(
        "{} failed [{}]: {}",
        operation,
        failure_type,
        error_msg
    );

    match failure_type {
        FailureType::Expected => debug(source, subject, &message),
        FailureType::Unexpected => error(source, subject, &message),
        FailureType::Unknown => warn(source, subject, &message),
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
    fn test_log_level_from_config_string() {
        assert_eq!("warn".parse::<LogLevel>(), Ok(LogLevel::Warning));
        assert_eq!(" INFO ".parse::<LogLevel>(), Ok(LogLevel::Info));
        assert!("verbose".parse::<LogLevel>().is_err());
    }

    #[test]
    fn test_failure_classification() {
        let result = classify_failure(DataSource::Weather, "Weather API error: 401");
        assert_eq!(result, FailureType::Unexpected);

        let result = classify_failure(DataSource::Backend, "Backend API error: 503 - busy");
        assert_eq!(result, FailureType::Unknown);

        let result = classify_failure(DataSource::River, "River dataset not configured");
        assert_eq!(result, FailureType::Expected);

        let result = classify_failure(DataSource::Weather, "Parse error: missing field `forecast`");
        assert_eq!(result, FailureType::Unexpected);
    }

    #[test]
    fn test_entry_carries_source_and_subject() {
        let entry = format_entry(LogLevel::Warning, DataSource::River, Some("TARBELA"), "stale reading");
        assert!(entry.ends_with("WARN RIVER [TARBELA]: stale reading"), "entry: {}", entry);

        let entry = format_entry(LogLevel::Info, DataSource::System, None, "started");
        assert!(entry.ends_with("INFO SYS: started"), "entry: {}", entry);
    }
}
