use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConvertError {
    #[error("Model blob not found: {}", path.display())]
    BlobNotFound { path: PathBuf },

    #[error("Invalid model manifest {}: {message}", path.display())]
    ManifestError { path: PathBuf, message: String },

    #[error("Manifest for '{model}' has no model layer")]
    ModelLayerMissing { model: String },

    #[error("Digest mismatch for {}: expected {expected}, got {actual}", path.display())]
    DigestMismatch {
        path: PathBuf,
        expected: String,
        actual: String,
    },

    #[error("Failed to launch '{program}': {source}")]
    ToolSpawnError {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("'{program}' exited with status {}: {stderr}", status.map(|c| c.to_string()).unwrap_or_else(|| "unknown".to_string()))]
    ToolFailed {
        program: String,
        status: Option<i32>,
        stderr: String,
    },

    #[error("'{program}' did not finish within {seconds}s")]
    ToolTimeout { program: String, seconds: u64 },

    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("API returned status {status}: {body}")]
    ApiStatusError { status: u16, body: String },

    #[error("Zip operation failed: {0}")]
    ZipError(#[from] zip::result::ZipError),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Package already exists: {}", path.display())]
    PackageExists { path: PathBuf },

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

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Processing error: {message}")]
    ProcessingError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Input,
    ExternalTool,
    Network,
    Storage,
    Configuration,
    Processing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl ErrorSeverity {
    /// Process exit code for a failed run.
    pub fn exit_code(self) -> i32 {
        match self {
            ErrorSeverity::Low => 0,      // 警告，但成功
            ErrorSeverity::Medium => 2,   // 可重試
            ErrorSeverity::High => 1,     // 處理錯誤
            ErrorSeverity::Critical => 3, // 系統錯誤
        }
    }
}

impl ConvertError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::BlobNotFound { .. }
            | Self::ManifestError { .. }
            | Self::ModelLayerMissing { .. }
            | Self::DigestMismatch { .. } => ErrorCategory::Input,
            Self::ToolSpawnError { .. } | Self::ToolFailed { .. } | Self::ToolTimeout { .. } => {
                ErrorCategory::ExternalTool
            }
            Self::ApiError(_) | Self::ApiStatusError { .. } => ErrorCategory::Network,
            Self::ZipError(_) | Self::IoError(_) | Self::PackageExists { .. } => {
                ErrorCategory::Storage
            }
            Self::ConfigError { .. }
            | Self::ConfigValidationError { .. }
            | Self::InvalidConfigValueError { .. }
            | Self::MissingConfigError { .. } => ErrorCategory::Configuration,
            Self::SerializationError(_) | Self::ProcessingError { .. } => {
                ErrorCategory::Processing
            }
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            // 外部工具或服務暫時不可用，或輸出已存在，可以重試
            Self::ToolTimeout { .. }
            | Self::ApiError(_)
            | Self::ApiStatusError { .. }
            | Self::PackageExists { .. } => ErrorSeverity::Medium,
            Self::IoError(_) | Self::ZipError(_) => ErrorSeverity::Critical,
            _ => ErrorSeverity::High,
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            Self::BlobNotFound { .. } => {
                "Pull the model first (`ollama pull <model>`) or pass --blob-path".to_string()
            }
            Self::ManifestError { .. } | Self::ModelLayerMissing { .. } => {
                "Re-pull the model to repair its manifest, or pass --blob-path explicitly"
                    .to_string()
            }
            Self::DigestMismatch { .. } => {
                "The blob is corrupted; remove it and pull the model again".to_string()
            }
            Self::ToolSpawnError { program, .. } => {
                format!("Make sure '{}' is installed and on PATH, or set --ollama-bin", program)
            }
            Self::ToolFailed { .. } => {
                "Check that the model name is correct and `ollama list` shows it".to_string()
            }
            Self::ToolTimeout { .. } => {
                "Increase --timeout-seconds or check that the Ollama service is responsive"
                    .to_string()
            }
            Self::ApiError(_) | Self::ApiStatusError { .. } => {
                "Start the Ollama server (`ollama serve`) or switch to --source cli".to_string()
            }
            Self::PackageExists { .. } => {
                "Remove the existing package or rerun with --force".to_string()
            }
            Self::IoError(_) | Self::ZipError(_) => {
                "Check free disk space and write permissions on the output path".to_string()
            }
            Self::ConfigError { .. }
            | Self::ConfigValidationError { .. }
            | Self::InvalidConfigValueError { .. }
            | Self::MissingConfigError { .. } => {
                "Fix the configuration value and run again".to_string()
            }
            Self::SerializationError(_) | Self::ProcessingError { .. } => {
                "Rerun with --verbose and inspect the logs".to_string()
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            Self::BlobNotFound { path } => {
                format!("Ollama blob not found at {}", path.display())
            }
            Self::ToolFailed { program, stderr, .. } => {
                let detail = stderr.trim();
                if detail.is_empty() {
                    format!("'{}' could not read the model metadata", program)
                } else {
                    format!("'{}' could not read the model metadata: {}", program, detail)
                }
            }
            Self::PackageExists { path } => {
                format!("{} already exists, nothing was written", path.display())
            }
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ConvertError>;
