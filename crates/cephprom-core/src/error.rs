//! Shared error type across cephprom crates.

use thiserror::Error;

/// Stable error kinds, used in logs and by tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Metric name does not match the exposition grammar.
    InvalidMetricName,
    /// Label name does not match the exposition grammar.
    InvalidLabelName,
    /// Same label name used twice in one sample.
    DuplicateLabel,
    /// Sample recorded for a metric that was never declared.
    UnknownMetric,
    /// Bad configuration.
    Config,
    /// External command could not be started.
    Spawn,
    /// External command exited with a non-zero status.
    CommandFailed,
    /// External command was killed by a signal.
    CommandTerminated,
    /// External command produced output that could not be decoded.
    MalformedOutput,
    /// Filesystem / socket failure.
    Io,
}

impl ErrorKind {
    /// String representation used in structured log fields.
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorKind::InvalidMetricName => "INVALID_METRIC_NAME",
            ErrorKind::InvalidLabelName => "INVALID_LABEL_NAME",
            ErrorKind::DuplicateLabel => "DUPLICATE_LABEL",
            ErrorKind::UnknownMetric => "UNKNOWN_METRIC",
            ErrorKind::Config => "CONFIG",
            ErrorKind::Spawn => "SPAWN",
            ErrorKind::CommandFailed => "COMMAND_FAILED",
            ErrorKind::CommandTerminated => "COMMAND_TERMINATED",
            ErrorKind::MalformedOutput => "MALFORMED_OUTPUT",
            ErrorKind::Io => "IO",
        }
    }
}

/// Shared result type.
pub type Result<T> = std::result::Result<T, Error>;

/// Unified error type used by core and exporter.
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid metric name: {0:?}")]
    InvalidMetricName(String),
    #[error("invalid label name {label:?} for metric {metric}")]
    InvalidLabelName { metric: String, label: String },
    #[error("duplicate label {label:?} for metric {metric}")]
    DuplicateLabel { metric: String, label: String },
    #[error("no metric named {0:?} has been declared")]
    UnknownMetric(String),
    #[error("config: {0}")]
    Config(String),
    #[error("failed to spawn {command:?}: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },
    #[error("command {command:?} exited with {status}: {stderr}")]
    CommandFailed {
        command: String,
        status: i32,
        stderr: String,
    },
    #[error("command {command:?} terminated by signal")]
    CommandTerminated { command: String },
    #[error("command {command:?} produced malformed output ({reason}): {output:?}")]
    MalformedOutput {
        command: String,
        reason: String,
        output: String,
    },
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Map the error to its stable kind.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::InvalidMetricName(_) => ErrorKind::InvalidMetricName,
            Error::InvalidLabelName { .. } => ErrorKind::InvalidLabelName,
            Error::DuplicateLabel { .. } => ErrorKind::DuplicateLabel,
            Error::UnknownMetric(_) => ErrorKind::UnknownMetric,
            Error::Config(_) => ErrorKind::Config,
            Error::Spawn { .. } => ErrorKind::Spawn,
            Error::CommandFailed { .. } => ErrorKind::CommandFailed,
            Error::CommandTerminated { .. } => ErrorKind::CommandTerminated,
            Error::MalformedOutput { .. } => ErrorKind::MalformedOutput,
            Error::Io(_) => ErrorKind::Io,
        }
    }
}
