//! Error types for the REST client
//!
//! Transport failures are propagated verbatim and never retried here. A
//! non-2xx response displays as `HTTP <status>`.

/// Client error
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ClientError {
    /// Backend answered with a non-2xx status
    #[error("HTTP {status}")]
    Http {
        /// Status code
        status: u16,
    },

    /// Connection, DNS, TLS or timeout failure
    #[error("transport error: {0}")]
    Transport(String),

    /// Body was not the JSON shape expected
    #[error("invalid response body: {0}")]
    Decode(String),

    /// Invalid configuration
    #[error("configuration error: {0}")]
    Config(String),

    /// The resource was torn down before the response arrived
    #[error("resource closed")]
    Closed,
}

impl ClientError {
    /// HTTP status, for status errors
    #[inline]
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status } => Some(*status),
            _ => None,
        }
    }

    /// Check if the request never produced a response
    #[inline]
    #[must_use]
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_))
    }

    /// Check if the backend reported 404
    #[inline]
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        if let Some(status) = err.status() {
            Self::Http {
                status: status.as_u16(),
            }
        } else if err.is_decode() {
            Self::Decode(err.to_string())
        } else {
            Self::Transport(err.to_string())
        }
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(err: serde_json::Error) -> Self {
        Self::Decode(err.to_string())
    }
}

impl From<toml::de::Error> for ClientError {
    fn from(err: toml::de::Error) -> Self {
        Self::Config(err.to_string())
    }
}

/// Result alias for client operations
pub type Result<T> = std::result::Result<T, ClientError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn http_error_display() {
        let err = ClientError::Http { status: 503 };
        assert_eq!(err.to_string(), "HTTP 503");
        assert_eq!(err.status(), Some(503));
        assert!(!err.is_transport());
        assert!(ClientError::Http { status: 404 }.is_not_found());
    }

    #[test]
    fn decode_from_serde() {
        let err: ClientError = serde_json::from_str::<u32>("\"x\"").unwrap_err().into();
        assert!(matches!(err, ClientError::Decode(_)));
    }
}
