use thiserror::Error;

#[derive(Error, Debug)]
pub enum KgError {
    #[error("Zip operation failed: {0}")]
    ZipError(#[from] zip::result::ZipError),

    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("HTTP {status} when fetching {url}")]
    HttpStatusError { url: String, status: u16 },

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Configuration validation failed for {field}: {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Data processing error: {message}")]
    ProcessingError { message: String },

    #[error("Validation error: {message}")]
    ValidationError { message: String },

    #[error("Entity not found: {name}")]
    EntityNotFound { name: String },
}

/// 錯誤分類，用於日誌與退出碼判斷
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Network,
    Data,
    System,
    Query,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl KgError {
    pub fn processing(message: impl Into<String>) -> Self {
        Self::ProcessingError {
            message: message.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::ValidationError {
            message: message.into(),
        }
    }

    pub fn not_found(name: impl Into<String>) -> Self {
        Self::EntityNotFound { name: name.into() }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::HttpError(_) | Self::HttpStatusError { .. } => ErrorCategory::Network,
            Self::CsvError(_) | Self::ProcessingError { .. } | Self::SerializationError(_) => {
                ErrorCategory::Data
            }
            Self::ZipError(_) | Self::IoError(_) => ErrorCategory::System,
            Self::ConfigError { .. }
            | Self::InvalidConfigValueError { .. }
            | Self::MissingConfigError { .. }
            | Self::ConfigValidationError { .. } => ErrorCategory::Configuration,
            Self::ValidationError { .. } | Self::EntityNotFound { .. } => ErrorCategory::Query,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            // 查無實體只是查詢結果為空
            Self::EntityNotFound { .. } => ErrorSeverity::Low,
            Self::HttpError(_) | Self::HttpStatusError { .. } => ErrorSeverity::Medium,
            Self::CsvError(_)
            | Self::ProcessingError { .. }
            | Self::SerializationError(_)
            | Self::ValidationError { .. }
            | Self::ConfigError { .. }
            | Self::InvalidConfigValueError { .. }
            | Self::MissingConfigError { .. }
            | Self::ConfigValidationError { .. } => ErrorSeverity::High,
            Self::ZipError(_) => ErrorSeverity::High,
            Self::IoError(e) if e.kind() == std::io::ErrorKind::NotFound => ErrorSeverity::High,
            Self::IoError(_) => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            Self::IoError(e) if e.kind() == std::io::ErrorKind::NotFound => {
                "Generate the knowledge graph first, or point --data-dir at the folder holding nasa_nodes.csv and nasa_edges.csv".to_string()
            }
            Self::IoError(_) => "Check file permissions and available disk space".to_string(),
            Self::HttpError(_) => "Check the network connection and the data URL".to_string(),
            Self::HttpStatusError { status, .. } if *status == 404 => {
                "The remote data file does not exist; verify the base URL and file names".to_string()
            }
            Self::HttpStatusError { .. } => "Retry later or use a local copy of the data".to_string(),
            Self::CsvError(_) => {
                "Make sure the CSV files have header rows (node,label / subject,predicate,object)".to_string()
            }
            Self::ProcessingError { .. } => "Inspect the reported row in the input tables".to_string(),
            Self::SerializationError(_) => "Report this as a bug together with the input data".to_string(),
            Self::ZipError(_) => "Check that the output directory is writable".to_string(),
            Self::ConfigError { .. }
            | Self::InvalidConfigValueError { .. }
            | Self::MissingConfigError { .. }
            | Self::ConfigValidationError { .. } => {
                "Review the command line options or the TOML configuration file".to_string()
            }
            Self::ValidationError { .. } => "Adjust the query parameters and try again".to_string(),
            Self::EntityNotFound { .. } => "Use `search` to find the exact entity name".to_string(),
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            Self::IoError(e) if e.kind() == std::io::ErrorKind::NotFound => {
                "Data files not found. Please ensure the knowledge graph has been generated.".to_string()
            }
            Self::HttpStatusError { url, status } => {
                format!("Could not download {} (HTTP {})", url, status)
            }
            Self::EntityNotFound { name } => format!("No entity named '{}' in the graph", name),
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, KgError>;
