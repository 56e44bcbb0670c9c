mod authentication;
mod base64url;
mod ceremony;
mod config;
mod error;
mod extensions;
mod http;
mod platform;
mod registration;
mod types;


pub use authentication::{encode_assertion, prepare_request_options};
pub use base64url::{decode, decode_field, encode};
pub use config::UserHandlePolicy;
pub use error::CeremonyError;
pub use registration::{encode_attestation, prepare_creation_options};
pub use types::{
    AssertionCredential, AttestationCredential, CreationOptions, CredentialDescriptor,
    PubKeyCredParam, RequestOptions, WireAssertion, WireCreation,
};

use js_sys::JSON;
use serde_json::Value;
use wasm_bindgen::prelude::*;

// === CONSOLE LOGGING ===
// Backend for the `log` facade: records at or below CURRENT_LOG_LEVEL go to
// the browser console.

struct ConsoleLogger;

static LOGGER: ConsoleLogger = ConsoleLogger;

impl log::Log for ConsoleLogger {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        metadata.level() <= config::CURRENT_LOG_LEVEL
    }

    fn log(&self, record: &log::Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let line = format!("[{}] {}", record.level(), record.args());
        match record.level() {
            log::Level::Error => web_sys::console::error_1(&line.into()),
            log::Level::Warn => web_sys::console::warn_1(&line.into()),
            _ => web_sys::console::log_1(&line.into()),
        }
    }

    fn flush(&self) {}
}

#[wasm_bindgen(start)]
pub fn main() {
    console_error_panic_hook::set_once();
    if log::set_logger(&LOGGER).is_ok() {
        log::set_max_level(config::CURRENT_LOG_LEVEL.to_level_filter());
    }
}

// JsValue -> serde_json::Value through the engine's JSON serializer, so the
// payload crosses the boundary exactly as the server sent it
fn json_value_from_js(value: &JsValue) -> Result<Value, JsValue> {
    let text = JSON::stringify(value)
        .map_err(|_| JsValue::from_str("Failed to stringify payload"))?
        .as_string()
        .ok_or_else(|| JsValue::from_str("Payload is not JSON-serializable"))?;
    serde_json::from_str(&text)
        .map_err(|e| JsValue::from_str(&format!("Failed to parse payload: {}", e)))
}

fn js_from_serializable<T: serde::Serialize>(value: &T) -> Result<JsValue, JsValue> {
    let text = serde_json::to_string(value)
        .map_err(|e| JsValue::from_str(&format!("Failed to serialize result: {}", e)))?;
    JSON::parse(&text).map_err(|_| JsValue::from_str("Failed to parse result JSON"))
}

/// True iff this environment exposes the platform public-key-credential API.
#[wasm_bindgen]
pub fn is_webauthn_supported() -> bool {
    platform::is_webauthn_supported()
}

/// Transcode a server registration payload into the argument object for
/// `navigator.credentials.create` (binary fields decoded to Uint8Array).
#[wasm_bindgen]
pub fn prepare_registration_options(payload: JsValue) -> Result<JsValue, JsValue> {
    let payload = json_value_from_js(&payload)?;
    let options = registration::prepare_creation_options(&payload)?;
    Ok(platform::creation_options_to_js(&options))
}

/// Transcode a server login payload into the argument object for
/// `navigator.credentials.get`.
#[wasm_bindgen]
pub fn prepare_login_options(payload: JsValue) -> Result<JsValue, JsValue> {
    let payload = json_value_from_js(&payload)?;
    let options = authentication::prepare_request_options(&payload)?;
    Ok(platform::request_options_to_js(&options))
}

/// Transcode a platform attestation credential into the JSON-safe wire form
/// posted back to the server.
#[wasm_bindgen]
pub fn encode_registration_credential(credential: JsValue) -> Result<JsValue, JsValue> {
    let attestation = platform::attestation_from_js(&credential)?;
    let wire = registration::encode_attestation(&attestation);
    js_from_serializable(&wire)
}

/// Transcode a platform assertion credential into the JSON-safe wire form
/// posted back to the server, applying the configured userHandle policy.
#[wasm_bindgen]
pub fn encode_login_credential(credential: JsValue) -> Result<JsValue, JsValue> {
    let assertion = platform::assertion_from_js(&credential)?;
    let wire = authentication::encode_assertion(&assertion)
        .to_wire_value(config::USER_HANDLE_POLICY);
    js_from_serializable(&wire)
}

/// Run a complete registration ceremony against the configured server.
#[wasm_bindgen]
pub async fn register_user(
    username: String,
    display_name: String,
    credential_name: String,
) -> Result<JsValue, JsValue> {
    let result = ceremony::register(&username, &display_name, &credential_name)
        .await
        .map_err(|e| JsValue::from_str(&e))?;
    js_from_serializable(&result)
}

/// Run a complete login ceremony against the configured server.
#[wasm_bindgen]
pub async fn login_user(username: String) -> Result<JsValue, JsValue> {
    let result = ceremony::login(&username)
        .await
        .map_err(|e| JsValue::from_str(&e))?;
    js_from_serializable(&result)
}
