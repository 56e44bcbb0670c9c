// === CEREMONY ORCHESTRATOR ===
// Sequences one full registration or login exchange: fetch options from the
// server, transcode, invoke the platform credential API, transcode back,
// submit. Pure glue over the transcoders; every failure aborts the ceremony
// before the next step runs.

use log::info;
use serde_json::{json, Value};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;

use crate::authentication::{encode_assertion, prepare_request_options};
use crate::config;
use crate::http::{post_form, post_json};
use crate::platform::{
    assertion_from_js, attestation_from_js, creation_options_to_js, is_webauthn_supported,
    request_options_to_js,
};
use crate::registration::{encode_attestation, prepare_creation_options};

/// Run a full registration ceremony for `username`. Returns the server's
/// completion response.
pub async fn register(
    username: &str,
    display_name: &str,
    credential_name: &str,
) -> Result<Value, String> {
    if !is_webauthn_supported() {
        return Err("WebAuthn is not supported in this environment".to_string());
    }

    let base = config::api_base_url();
    let start = post_form(
        &format!("{}/auth/register", base),
        &[("username", username), ("display", display_name)],
    )
    .await?;
    check_server_status(&start)?;

    let options = prepare_creation_options(&start).map_err(|e| e.to_string())?;
    let credential = invoke_credentials_method("create", creation_options_to_js(&options)).await?;
    let attestation = attestation_from_js(&credential).map_err(|e| e.to_string())?;
    let wire = encode_attestation(&attestation);

    info!("Submitting registration credential {}", wire.id);

    let wire_json =
        serde_json::to_string(&wire).map_err(|e| format!("Failed to serialize credential: {}", e))?;
    post_json(
        &format!("{}/auth/finishRegistration", base),
        &json!({
            "credential": wire_json,
            "username": username,
            "credname": credential_name,
        }),
    )
    .await
}

/// Run a full login ceremony for `username`. Returns the server's completion
/// response.
pub async fn login(username: &str) -> Result<Value, String> {
    if !is_webauthn_supported() {
        return Err("WebAuthn is not supported in this environment".to_string());
    }

    let base = config::api_base_url();
    let start = post_form(&format!("{}/auth/login", base), &[("username", username)]).await?;
    check_server_status(&start)?;

    let options = prepare_request_options(&start).map_err(|e| e.to_string())?;
    let credential = invoke_credentials_method("get", request_options_to_js(&options)).await?;
    let assertion = assertion_from_js(&credential).map_err(|e| e.to_string())?;
    let wire = encode_assertion(&assertion).to_wire_value(config::USER_HANDLE_POLICY);

    post_json(
        &format!("{}/auth/finishLogin", base),
        &json!({
            "credential": wire.to_string(),
            "username": username,
        }),
    )
    .await
}

fn check_server_status(response: &Value) -> Result<(), String> {
    match response.get("status").and_then(Value::as_str) {
        Some("success") | None => Ok(()),
        _ => Err(response
            .get("message")
            .and_then(Value::as_str)
            .unwrap_or("Ceremony could not be started")
            .to_string()),
    }
}

/// Invoke `navigator.credentials.create` or `.get`. The platform call is the
/// only suspension point in the ceremony; cancellation and timeout of it stay
/// with the browser.
async fn invoke_credentials_method(method: &str, options: JsValue) -> Result<JsValue, String> {
    let global = js_sys::global();
    let navigator = js_sys::Reflect::get(&global, &JsValue::from_str("navigator"))
        .map_err(|_| "navigator is not available".to_string())?;
    let credentials = js_sys::Reflect::get(&navigator, &JsValue::from_str("credentials"))
        .map_err(|_| "credentials container is not available".to_string())?;
    let func = js_sys::Reflect::get(&credentials, &JsValue::from_str(method))
        .map_err(|_| format!("credentials.{} is not available", method))?
        .dyn_into::<js_sys::Function>()
        .map_err(|_| format!("credentials.{} is not a function", method))?;

    let promise = func
        .call1(&credentials, &options)
        .map_err(|e| format!("credentials.{} call failed: {:?}", method, e))?
        .dyn_into::<js_sys::Promise>()
        .map_err(|_| format!("credentials.{} did not return a Promise", method))?;

    JsFuture::from(promise)
        .await
        .map_err(|e| format!("Platform credential ceremony failed: {:?}", e))
}
