// src/infra/errors.rs — Error types for mockprep

use thiserror::Error;

/// Failure to acquire capture devices (camera / microphone).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DeviceError {
    #[error("permission to use the camera or microphone was denied")]
    PermissionDenied,

    #[error("no camera or microphone was found")]
    NotFound,

    #[error("device capture failed: {0}")]
    Other(String),
}

impl DeviceError {
    /// Text shown to the user when recording cannot start.
    pub fn user_message(&self) -> &'static str {
        match self {
            DeviceError::PermissionDenied => {
                "Camera/microphone access was denied. Allow access in your system or browser \
                 permissions, then start again."
            }
            DeviceError::NotFound => {
                "No camera or microphone detected. Connect a device, then start again."
            }
            DeviceError::Other(_) => {
                "Failed to start recording. Please check your devices and try again."
            }
        }
    }
}

#[derive(Error, Debug)]
pub enum PrepError {
    // Recoverable at the question level
    #[error("Device error: {0}")]
    Device(#[from] DeviceError),

    #[error("Evaluation failed: {message}")]
    EvaluationFailed { message: String },

    #[error("Cannot {action} while {phase}")]
    InvalidTransition { action: &'static str, phase: String },

    // Results view
    #[error("No saved interview session found")]
    PersistenceNotFound,

    // User errors
    #[error("Not signed in. Sign in before starting an interview.")]
    Unauthorized,

    #[error("Catalog error: {0}")]
    Catalog(String),

    // Infra
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl PrepError {
    /// Errors that leave the session usable; the user can simply try again.
    pub fn is_retriable(&self) -> bool {
        matches!(
            self,
            PrepError::Device(_) | PrepError::EvaluationFailed { .. }
        )
    }

    pub(crate) fn invalid(action: &'static str, phase: impl std::fmt::Display) -> Self {
        PrepError::InvalidTransition {
            action,
            phase: phase.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_device_messages_are_distinct() {
        let denied = DeviceError::PermissionDenied.user_message();
        let missing = DeviceError::NotFound.user_message();
        let other = DeviceError::Other("busy".into()).user_message();
        assert_ne!(denied, missing);
        assert_ne!(missing, other);
        assert_ne!(denied, other);
        assert!(denied.contains("permissions"));
    }

    #[test]
    fn test_retriable_kinds() {
        assert!(PrepError::Device(DeviceError::NotFound).is_retriable());
        assert!(PrepError::EvaluationFailed {
            message: "timeout".into()
        }
        .is_retriable());
        assert!(!PrepError::PersistenceNotFound.is_retriable());
        assert!(!PrepError::Unauthorized.is_retriable());
    }

    #[test]
    fn test_invalid_transition_display() {
        let err = PrepError::invalid("start recording", "recording");
        assert_eq!(err.to_string(), "Cannot start recording while recording");
    }
}
