use thiserror::Error;

#[derive(Error, Debug)]
pub enum ShipError {
    #[error("Schema error in {table} table: missing column '{column}' (found columns: {found:?})")]
    SchemaError {
        table: String,
        column: String,
        found: Vec<String>,
    },

    #[error("Duplicate identifier '{identifier}' in {table} table")]
    DuplicateIdentifier { table: String, identifier: String },

    #[error("Invalid weight for '{identifier}' in {table} table: {value}")]
    InvalidWeight {
        table: String,
        identifier: String,
        value: String,
    },

    #[error("Upload error at row {row}: {message}")]
    UploadError { row: usize, message: String },

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

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
    MasterData,
    Upload,
    Io,
    Configuration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl ShipError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            ShipError::SchemaError { .. }
            | ShipError::DuplicateIdentifier { .. }
            | ShipError::InvalidWeight { .. } => ErrorCategory::MasterData,
            ShipError::UploadError { .. } | ShipError::CsvError(_) => ErrorCategory::Upload,
            ShipError::IoError(_) | ShipError::SerializationError(_) => ErrorCategory::Io,
            ShipError::ConfigError { .. }
            | ShipError::ConfigValidationError { .. }
            | ShipError::InvalidConfigValueError { .. } => ErrorCategory::Configuration,
        }
    }

    /// Master-data problems abort startup; upload problems only abort the
    /// current action.
    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::MasterData => ErrorSeverity::Critical,
            ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::Io => ErrorSeverity::High,
            ErrorCategory::Upload => ErrorSeverity::Medium,
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            ShipError::SchemaError { column, .. } => format!(
                "Check that the master data file has a column named '{}' or update the column mapping in the config",
                column
            ),
            ShipError::DuplicateIdentifier { identifier, .. } => format!(
                "Remove or rename the duplicate '{}' rows in the master data",
                identifier
            ),
            ShipError::InvalidWeight { .. } => {
                "Weights must be non-negative numbers in kilograms".to_string()
            }
            ShipError::UploadError { .. } => {
                "Column A must hold the product code and column B an integer quantity".to_string()
            }
            ShipError::CsvError(_) => "Make sure the file is valid comma-separated text".to_string(),
            ShipError::IoError(_) => "Check that the file exists and is readable".to_string(),
            ShipError::SerializationError(_) => "Check the output directory is writable".to_string(),
            ShipError::ConfigError { .. }
            | ShipError::ConfigValidationError { .. }
            | ShipError::InvalidConfigValueError { .. } => {
                "Review the configuration file against the documented keys".to_string()
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::MasterData => format!("Master data could not be loaded: {}", self),
            ErrorCategory::Upload => format!("The uploaded list could not be read: {}", self),
            ErrorCategory::Io => format!("File access failed: {}", self),
            ErrorCategory::Configuration => format!("Invalid configuration: {}", self),
        }
    }
}

pub type Result<T> = std::result::Result<T, ShipError>;
