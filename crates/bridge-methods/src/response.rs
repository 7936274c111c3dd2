//! Response envelope returned by every tool method
//!
//! Serializes to `{"success":true,"message":..,"data":..}` or
//! `{"success":false,"error":..,"data":..}`; `data` is omitted when empty.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Tool method result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Response {
    /// Whether the operation succeeded
    pub success: bool,
    /// Success description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Failure description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Payload
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl Response {
    /// Successful response without data
    #[must_use]
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: Some(message.into()),
            error: None,
            data: None,
        }
    }

    /// Successful response carrying `data`
    #[must_use]
    pub fn success_with(message: impl Into<String>, data: impl Into<Value>) -> Self {
        Self {
            data: Some(data.into()),
            ..Self::success(message)
        }
    }

    /// Error response
    #[must_use]
    pub fn error(error: impl Into<String>) -> Self {
        Self {
            success: false,
            message: None,
            error: Some(error.into()),
            data: None,
        }
    }

    /// Error response carrying details
    #[must_use]
    pub fn error_with(error: impl Into<String>, data: impl Into<Value>) -> Self {
        Self {
            data: Some(data.into()),
            ..Self::error(error)
        }
    }

    /// Whether this is an error response
    #[inline]
    #[must_use]
    pub fn is_error(&self) -> bool {
        !self.success
    }

    /// Message or error text, whichever is set
    #[must_use]
    pub fn text(&self) -> &str {
        self.message
            .as_deref()
            .or(self.error.as_deref())
            .unwrap_or_default()
    }

    /// Convert into a JSON value
    #[must_use]
    pub fn to_json(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}

impl fmt::Display for Response {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match serde_json::to_string(self) {
            Ok(s) => f.write_str(&s),
            Err(_) => f.write_str(self.text()),
        }
    }
}
