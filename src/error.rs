use thiserror::Error;

/// Failures reported by the external Directions / Places / matrix services.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProviderError {
    /// Credentials or endpoint not configured.
    #[error("provider unavailable")]
    Unavailable,
    #[error("request denied by provider")]
    Denied,
    #[error("provider quota exceeded")]
    QuotaExceeded,
    #[error("no route between the requested points")]
    NoRoute,
    #[error("request cancelled")]
    Cancelled,
    #[error("transport error: {0}")]
    Transport(String),
    #[error("invalid provider response: {0}")]
    InvalidResponse(String),
}

impl From<reqwest::Error> for ProviderError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ProviderError::InvalidResponse(err.to_string())
        } else {
            ProviderError::Transport(err.to_string())
        }
    }
}

/// Caller contract violations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error("anchor `{0}` has no coordinates")]
    AnchorWithoutCoordinates(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PolylineError {
    #[error("truncated polyline at byte {0}")]
    Truncated(usize),
    #[error("invalid polyline byte {byte:#04x} at {offset}")]
    InvalidByte { byte: u8, offset: usize },
    #[error("polyline coordinate out of range at byte {0}")]
    Overflow(usize),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error(transparent)]
    Parse(#[from] serde_json::Error),
    #[error("invalid config `{key}`: {reason}")]
    Invalid { key: &'static str, reason: &'static str },
}

impl ConfigError {
    pub fn invalid(key: &'static str, reason: &'static str) -> Self {
        Self::Invalid { key, reason }
    }
}
