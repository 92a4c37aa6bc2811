use thiserror::Error;

#[derive(Error, Debug)]
pub enum RedateError {
    #[error("Schedule file not found: {path}")]
    FileNotFound { path: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Rotating a schedule requires a 24-hour session, found {hours:.3} hours")]
    SessionTooShort { hours: f64 },

    #[error("Missing {record} record in {context}")]
    MissingRecord { record: String, context: String },

    #[error("Invalid schedule timestamp: '{value}'")]
    InvalidTimestamp { value: String },

    #[error("Invalid target time '{value}': use 'yyyy-mm-dd' or 'yyyy-mm-ddThh:mm:ss'")]
    InvalidTargetTime { value: String },

    #[error(
        "Turnaround between rotated blocks is {gap_seconds:.0} s, at least {required_seconds:.0} s required"
    )]
    InsufficientTurnaround {
        gap_seconds: f64,
        required_seconds: f64,
    },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration validation failed for '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Input,
    Schedule,
    Configuration,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl RedateError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            RedateError::FileNotFound { .. } | RedateError::InvalidTargetTime { .. } => {
                ErrorCategory::Input
            }
            RedateError::SessionTooShort { .. }
            | RedateError::MissingRecord { .. }
            | RedateError::InvalidTimestamp { .. }
            | RedateError::InsufficientTurnaround { .. } => ErrorCategory::Schedule,
            RedateError::ConfigError { .. }
            | RedateError::ConfigValidationError { .. }
            | RedateError::InvalidConfigValueError { .. } => ErrorCategory::Configuration,
            RedateError::IoError(_) | RedateError::SerializationError(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Input | ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::Schedule => match self {
                // 換個時間或調整轉場設定即可重試
                RedateError::InsufficientTurnaround { .. } => ErrorSeverity::Medium,
                _ => ErrorSeverity::High,
            },
            ErrorCategory::System => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            RedateError::FileNotFound { .. } => "Check the --skd path points to an existing .skd file",
            RedateError::SessionTooShort { .. } => {
                "Use the 'gmst' or 'sky' approach for sessions that are not exactly 24 hours long"
            }
            RedateError::MissingRecord { .. } | RedateError::InvalidTimestamp { .. } => {
                "Make sure the schedule has START/END records and a $SKED block with PREOB times (YYDDDHHMMSS)"
            }
            RedateError::InvalidTargetTime { .. } => {
                "Pass --time as 'yyyy-mm-dd' or 'yyyy-mm-ddThh:mm:ss' (UTC)"
            }
            RedateError::InsufficientTurnaround { .. } => {
                "Pick a different target start or set rotation.on_insufficient_turnaround = \"warn\""
            }
            RedateError::ConfigError { .. }
            | RedateError::ConfigValidationError { .. }
            | RedateError::InvalidConfigValueError { .. } => {
                "Review the TOML settings file and CLI flags"
            }
            RedateError::IoError(_) | RedateError::SerializationError(_) => {
                "Check file permissions and available disk space"
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Input => format!("Input problem: {}", self),
            ErrorCategory::Schedule => format!("Schedule cannot be redated: {}", self),
            ErrorCategory::Configuration => format!("Configuration problem: {}", self),
            ErrorCategory::System => format!("System error: {}", self),
        }
    }

    pub(crate) fn missing(record: &str, context: &str) -> Self {
        RedateError::MissingRecord {
            record: record.to_string(),
            context: context.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, RedateError>;
