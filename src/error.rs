use std::fmt;
use wasm_bindgen::JsValue;

// Error type for the ceremony transcoding layer
//
// All three kinds are non-retriable local failures: a payload that fails to
// decode once will fail identically on every retry, so callers surface these
// to the user instead of re-running the ceremony.
#[derive(Debug)]
pub enum CeremonyError {
    /// Input text is not valid URL-safe base64. Carries the name of the
    /// offending field so a mis-encoded server response is diagnosable.
    Decode { field: &'static str, reason: String },
    /// Server payload is missing a required field or matches no known shape.
    Protocol(String),
    /// Platform credential object is missing an expected binary field.
    Encoding(String),
}

impl CeremonyError {
    pub fn protocol(msg: impl Into<String>) -> Self {
        CeremonyError::Protocol(msg.into())
    }

    pub fn encoding(msg: impl Into<String>) -> Self {
        CeremonyError::Encoding(msg.into())
    }
}

impl fmt::Display for CeremonyError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            CeremonyError::Decode { field, reason } => {
                write!(f, "Base64url decode error in '{}': {}", field, reason)
            }
            CeremonyError::Protocol(msg) => write!(f, "Protocol error: {}", msg),
            CeremonyError::Encoding(msg) => write!(f, "Encoding error: {}", msg),
        }
    }
}

impl From<CeremonyError> for JsValue {
    fn from(err: CeremonyError) -> Self {
        JsValue::from_str(&err.to_string())
    }
}
