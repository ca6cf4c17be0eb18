//! The `{status, message, data}` envelope every backend response uses.

use serde::{Deserialize, Serialize};

/// Backend response envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    /// Whether the backend considers the call successful.
    pub status: bool,
    /// Optional human-readable message.
    pub message: Option<String>,
    /// Payload, absent on failure.
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    /// Wrap a successful payload.
    pub fn ok(data: T) -> Self {
        Self {
            status: true,
            message: None,
            data: Some(data),
        }
    }

    /// Build a failed envelope with a message.
    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            status: false,
            message: Some(message.into()),
            data: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq, Deserialize)]
    struct Payload {
        count: u32,
    }

    #[test]
    fn test_payload_without_default_impl() {
        let parsed: ApiResponse<Payload> =
            serde_json::from_str(r#"{"status": true, "data": {"count": 2}}"#).expect("parse");
        assert_eq!(parsed.data, Some(Payload { count: 2 }));

        let failed: ApiResponse<Payload> =
            serde_json::from_str(r#"{"status": false, "message": "nope"}"#).expect("parse");
        assert!(!failed.status);
        assert_eq!(failed.message.as_deref(), Some("nope"));
        assert!(failed.data.is_none());
    }
}
