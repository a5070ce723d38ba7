//! Lookup failure types.
//!
//! Every variant ends the same way for the form (address fields cleared);
//! the split only matters for logging and for the direct lookup endpoint.

use std::fmt;

/// How a failed lookup is reported
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// The service answered but has no address for the code
    LookupNotFound,
    /// The request never produced a usable answer
    TransportFailure,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LookupNotFound => write!(f, "LOOKUP_NOT_FOUND"),
            Self::TransportFailure => write!(f, "TRANSPORT_FAILURE"),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum LookupError {
    #[error("no address found for postal code {code}")]
    NotFound { code: String },

    #[error("postal code {code:?} cannot be sent to the lookup service")]
    InvalidCode { code: String },

    #[error("lookup request failed: {0}")]
    Http(#[from] wreq::Error),

    #[error("lookup service answered {status}: {body}")]
    Status { status: u16, body: String },

    #[error("failed to parse lookup response: {0}")]
    Parse(#[from] serde_json::Error),
}

impl LookupError {
    pub fn kind(&self) -> FailureKind {
        match self {
            Self::NotFound { .. } => FailureKind::LookupNotFound,
            Self::InvalidCode { .. } | Self::Http(_) | Self::Status { .. } | Self::Parse(_) => {
                FailureKind::TransportFailure
            }
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.kind() == FailureKind::LookupNotFound
    }
}
