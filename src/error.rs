use crate::image_loader::ImageLoadError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DtcError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image processing error: {0}")]
    Image(#[from] image::ImageError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Unexpected error: {0}")]
    Unknown(String),
}

impl DtcError {
    pub fn invalid_input(message: impl Into<String>) -> Self {
        DtcError::InvalidInput(message.into())
    }

    pub fn to_payload(&self) -> ErrorPayload {
        match self {
            DtcError::InvalidInput(msg) => {
                let lower = msg.to_ascii_lowercase();
                if lower.contains("hex color") {
                    ErrorPayload::new(
                        ErrorCategory::Input,
                        msg.to_string(),
                        "Use #RGB, #RRGGBB or #RRGGBBAA hex values, or an [r, g, b] triple.",
                    )
                } else if lower.contains("token") {
                    ErrorPayload::new(
                        ErrorCategory::Input,
                        msg.to_string(),
                        "Check the token file: color tokens need `path` and `value`, typography tokens need `role`, `family` and `size`.",
                    )
                } else if lower.contains("zero-area") || lower.contains("pixel buffer") {
                    ErrorPayload::new(
                        ErrorCategory::Input,
                        msg.to_string(),
                        "Provide a non-empty decoded image (width and height must be positive).",
                    )
                } else {
                    ErrorPayload::new(
                        ErrorCategory::Input,
                        msg.to_string(),
                        "Inspect the input files; rerun with --verbose for details.",
                    )
                }
            }
            DtcError::Io(e) => ErrorPayload::new(
                ErrorCategory::Config,
                e.to_string(),
                "Check file paths/permissions.",
            ),
            DtcError::Image(e) => ErrorPayload::new(
                ErrorCategory::Image,
                e.to_string(),
                "Verify image path/format and readability.",
            ),
            DtcError::Serialization(e) => ErrorPayload::new(
                ErrorCategory::Input,
                e.to_string(),
                "Check JSON inputs for syntax errors; run with --verbose for details.",
            ),
            DtcError::Config(msg) => {
                let lower = msg.to_ascii_lowercase();
                if lower.contains("file not found") {
                    ErrorPayload::new(
                        ErrorCategory::Config,
                        msg.to_string(),
                        "Verify the file exists; use an absolute path or run from the working directory.",
                    )
                } else if lower.contains("threshold") {
                    ErrorPayload::new(
                        ErrorCategory::Config,
                        msg.to_string(),
                        "Thresholds must be non-negative and the pass threshold must not exceed the warn threshold.",
                    )
                } else {
                    ErrorPayload::new(
                        ErrorCategory::Config,
                        msg.to_string(),
                        "Check flags and the [sampling]/[regions]/[matching]/[clustering] sections of the config file.",
                    )
                }
            }
            DtcError::Unknown(msg) => ErrorPayload::new(
                ErrorCategory::Unknown,
                msg.to_string(),
                "Re-run with --verbose; file an issue if persistent.",
            ),
        }
    }
}

impl From<ImageLoadError> for DtcError {
    fn from(err: ImageLoadError) -> Self {
        match err {
            ImageLoadError::Load(e) => DtcError::Image(e),
            ImageLoadError::NotFound(path) => DtcError::Config(format!("File not found: {}", path)),
            ImageLoadError::InvalidData(msg) => DtcError::InvalidInput(msg),
        }
    }
}

impl From<serde_yaml::Error> for DtcError {
    fn from(err: serde_yaml::Error) -> Self {
        DtcError::InvalidInput(format!("YAML parse error: {}", err))
    }
}

pub type Result<T> = std::result::Result<T, DtcError>;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ErrorCategory {
    Input,
    Config,
    Image,
    Unknown,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorPayload {
    pub category: ErrorCategory,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remediation: Option<String>,
}

impl ErrorPayload {
    pub fn new(category: ErrorCategory, message: String, remediation: impl Into<String>) -> Self {
        Self {
            category,
            message,
            remediation: Some(remediation.into()),
        }
    }
}
