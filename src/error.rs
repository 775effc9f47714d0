use thiserror::Error;

#[derive(Debug, Error)]
pub enum RecitationError {
    #[error("failed to decode audio ({context}): {message}")]
    AudioDecode {
        context: &'static str,
        message: String,
    },
    #[error("{resource} is not initialized")]
    ModelUnavailable { resource: &'static str },
    #[error("phoneme conversion failed: {message}")]
    Conversion { message: String },
    #[error("I/O error while {context}: {source}")]
    Io {
        context: &'static str,
        #[source]
        source: std::io::Error,
    },
    #[error("JSON parse error while {context}: {source}")]
    Json {
        context: &'static str,
        #[source]
        source: serde_json::Error,
    },
    #[error("{context}: {message}")]
    Runtime {
        context: &'static str,
        message: String,
    },
    #[error("invalid input: {message}")]
    InvalidInput { message: String },
}

impl RecitationError {
    pub(crate) fn audio_decode(context: &'static str, err: impl std::fmt::Display) -> Self {
        Self::AudioDecode {
            context,
            message: err.to_string(),
        }
    }

    pub(crate) fn model_unavailable(resource: &'static str) -> Self {
        Self::ModelUnavailable { resource }
    }

    pub(crate) fn conversion(message: impl Into<String>) -> Self {
        Self::Conversion {
            message: message.into(),
        }
    }

    pub(crate) fn io(context: &'static str, source: std::io::Error) -> Self {
        Self::Io { context, source }
    }

    pub(crate) fn json(context: &'static str, source: serde_json::Error) -> Self {
        Self::Json { context, source }
    }

    pub(crate) fn runtime(context: &'static str, err: impl std::fmt::Display) -> Self {
        Self::Runtime {
            context,
            message: err.to_string(),
        }
    }

    pub(crate) fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }

    /// True for conditions a service layer should report as temporarily unavailable.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::ModelUnavailable { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn model_unavailable_is_transient() {
        let err = RecitationError::model_unavailable("recognizer");
        assert!(err.is_transient());
        assert_eq!(err.to_string(), "recognizer is not initialized");
    }

    #[test]
    fn decode_and_conversion_are_terminal() {
        assert!(!RecitationError::audio_decode("parse wav", "bad header").is_transient());
        assert!(!RecitationError::conversion("espeak-ng exited with 1").is_transient());
    }

    #[test]
    fn audio_decode_message_carries_context() {
        let err = RecitationError::audio_decode("sniff container", "unknown magic");
        assert_eq!(
            err.to_string(),
            "failed to decode audio (sniff container): unknown magic"
        );
    }

    #[test]
    fn io_error_keeps_source() {
        let err = RecitationError::io(
            "read config",
            std::io::Error::new(std::io::ErrorKind::NotFound, "missing"),
        );
        let as_std: &dyn std::error::Error = &err;
        assert!(as_std.source().is_some());
    }
}
