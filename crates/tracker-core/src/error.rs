use thiserror::Error;

/// Errors raised by carriers and the carrier registry.
#[derive(Debug, Error)]
pub enum TrackError {
    /// The caller supplied an unusable argument (empty tracking number, ...).
    #[error("{0}")]
    BadRequest(String),

    /// The carrier or the shipment does not exist.
    #[error("{0}")]
    NotFound(String),

    /// The carrier's upstream service failed.
    #[error("Carrier upstream error: {0}")]
    Upstream(String),

    #[error("Fixture I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Fixture parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Carrier registry error: {0}")]
    Registry(String),
}

impl TrackError {
    /// Create a new BadRequest error
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest(message.into())
    }

    /// Create a new NotFound error
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    /// Create a new Upstream error
    pub fn upstream(message: impl Into<String>) -> Self {
        Self::Upstream(message.into())
    }

    /// Error code exposed to API clients, if this error is safe to surface.
    ///
    /// Errors without a code are treated as internal faults by the gateway.
    #[must_use]
    pub fn code(&self) -> Option<&'static str> {
        match self {
            Self::BadRequest(_) => Some("BAD_REQUEST"),
            Self::NotFound(_) => Some("NOT_FOUND"),
            Self::Upstream(_) | Self::Io(_) | Self::Json(_) | Self::Registry(_) => None,
        }
    }
}

/// Result type alias for tracker operations
pub type Result<T> = std::result::Result<T, TrackError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_facing_codes() {
        assert_eq!(TrackError::bad_request("x").code(), Some("BAD_REQUEST"));
        assert_eq!(TrackError::not_found("x").code(), Some("NOT_FOUND"));
        assert_eq!(TrackError::upstream("x").code(), None);
        assert_eq!(TrackError::Registry("x".into()).code(), None);
    }

    #[test]
    fn test_display_keeps_domain_message() {
        let err = TrackError::not_found("Shipment 123 not found");
        assert_eq!(err.to_string(), "Shipment 123 not found");
    }
}
