//! Result envelopes returned to page script.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Outcome of a bound-function call as seen by the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Success,
    Failure,
}

impl Status {
    /// Numeric status passed to the page: `0` resolves, anything else rejects.
    pub fn code(self) -> i32 {
        match self {
            Status::Success => 0,
            Status::Failure => -1,
        }
    }
}

/// A status plus a JSON text payload.
///
/// On success the payload is the encoded return value (`null` when the
/// function returns nothing). On failure it is the error message encoded
/// as a JSON string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Envelope {
    pub status: Status,
    pub payload: String,
}

impl Envelope {
    pub fn success(value: &serde_json::Value) -> Self {
        Self {
            status: Status::Success,
            payload: value.to_string(),
        }
    }

    pub fn empty() -> Self {
        Self::success(&serde_json::Value::Null)
    }

    pub fn failure(error: impl fmt::Display) -> Self {
        Self {
            status: Status::Failure,
            payload: quote_json(&error.to_string()),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == Status::Success
    }

    /// Decoded success value, if this is a success.
    pub fn value(&self) -> Option<serde_json::Value> {
        match self.status {
            Status::Success => serde_json::from_str(&self.payload).ok(),
            Status::Failure => None,
        }
    }

    /// Decoded error message, if this is a failure.
    pub fn message(&self) -> Option<String> {
        match self.status {
            Status::Success => None,
            Status::Failure => serde_json::from_str(&self.payload).ok(),
        }
    }
}

/// Encode `text` as a JSON string literal, usable verbatim inside script.
pub fn quote_json(text: &str) -> String {
    serde_json::Value::String(text.to_owned()).to_string()
}
