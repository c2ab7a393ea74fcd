//! Error types for the OneDrive provider

use thiserror::Error;

/// OneDrive provider errors
///
/// None of these are retried inside the provider. A failed materialization
/// leaves the folder unmaterialized, so calling the accessor again is a clean
/// retry.
#[derive(Error, Debug)]
pub enum OneDriveError {
    /// The server answered with a non-success status and a decodable error body
    #[error("OneDrive API error (status {status}): {code}: {message}")]
    Protocol {
        status: u16,
        code: String,
        message: String,
    },

    /// A body did not have the expected page, item or drive shape
    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    /// A structural invariant of the item model was violated
    #[error("Internal consistency violation: {0}")]
    InternalConsistency(String),

    /// A blocking wait ended without the network task delivering a result
    #[error("Interrupted while waiting for {0}")]
    InterruptedWait(String),

    /// The item exists but is not a folder
    #[error("Item {0} is not a folder")]
    NotAFolder(String),

    /// The transport failed before a response was received
    #[error(transparent)]
    Transport(#[from] bridge_traits::error::BridgeError),

    /// Client configuration or runtime setup failed
    #[error(transparent)]
    Runtime(#[from] core_runtime::Error),
}

/// Result type for OneDrive operations
pub type Result<T> = std::result::Result<T, OneDriveError>;

impl OneDriveError {
    /// HTTP status carried by a protocol error.
    pub fn status(&self) -> Option<u16> {
        match self {
            OneDriveError::Protocol { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<OneDriveError> for bridge_traits::error::BridgeError {
    fn from(error: OneDriveError) -> Self {
        use bridge_traits::error::BridgeError;

        match error {
            OneDriveError::Transport(e) => e,
            OneDriveError::Runtime(e) => BridgeError::NotAvailable(e.to_string()),
            other => BridgeError::OperationFailed(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bridge_traits::error::BridgeError;

    #[test]
    fn test_error_display() {
        let error = OneDriveError::Protocol {
            status: 404,
            code: "itemNotFound".to_string(),
            message: "Item does not exist".to_string(),
        };

        assert_eq!(
            error.to_string(),
            "OneDrive API error (status 404): itemNotFound: Item does not exist"
        );
        assert_eq!(error.status(), Some(404));
    }

    #[test]
    fn test_error_conversion() {
        let error = OneDriveError::InterruptedWait("GET /drive/root".to_string());
        let bridge_error: BridgeError = error.into();

        assert!(matches!(bridge_error, BridgeError::OperationFailed(_)));
    }

    #[test]
    fn test_transport_error_round_trips() {
        let error: OneDriveError = BridgeError::Timeout("30s".to_string()).into();
        assert_eq!(error.status(), None);

        let bridge_error: BridgeError = error.into();
        assert!(matches!(bridge_error, BridgeError::Timeout(_)));
    }
}
