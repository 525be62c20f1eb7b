use serde::{Deserialize, Serialize};

/// Error envelope every non-2xx response carries on the wire.
///
/// `status` is always the literal `"error"`; clients branch on `code` and
/// show `message` to the user as-is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub status: String,
    pub code: String,
    pub message: String,
}

impl ErrorResponse {
    pub fn new(code: &str, message: &str) -> Self {
        Self {
            status: "error".to_string(),
            code: code.to_string(),
            message: message.to_string(),
        }
    }
}
