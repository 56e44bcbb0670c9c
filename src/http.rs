// === HTTP TRANSPORT (orchestrator collaborator) ===
// Thin fetch-based JSON transport for the ceremony endpoints. The server's
// challenge issuance and verification sit behind these calls as a black box.

use log::{debug, info};
use serde_json::Value;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Headers, Request, RequestCredentials, RequestInit, RequestMode, Response};

/// POST a JSON body and parse the JSON response.
pub async fn post_json(url: &str, body: &Value) -> Result<Value, String> {
    execute_request(url, "application/json", &body.to_string()).await
}

/// POST url-encoded form fields and parse the JSON response. The reference
/// backend takes ceremony-start parameters as form data.
pub async fn post_form(url: &str, fields: &[(&str, &str)]) -> Result<Value, String> {
    let body = fields
        .iter()
        .map(|(key, value)| format!("{}={}", url_encode(key), url_encode(value)))
        .collect::<Vec<_>>()
        .join("&");
    execute_request(url, "application/x-www-form-urlencoded", &body).await
}

fn url_encode(raw: &str) -> String {
    js_sys::encode_uri_component(raw)
        .as_string()
        .unwrap_or_else(|| raw.to_string())
}

/// Shared HTTP request execution logic
async fn execute_request(url: &str, content_type: &str, body: &str) -> Result<Value, String> {
    info!("POST {}", url);

    let headers = Headers::new().map_err(|e| format!("Failed to create headers: {:?}", e))?;
    headers
        .set("Content-Type", content_type)
        .map_err(|e| format!("Failed to set Content-Type header: {:?}", e))?;

    let opts = RequestInit::new();
    opts.set_method("POST");
    opts.set_mode(RequestMode::Cors);
    opts.set_credentials(RequestCredentials::Include);
    opts.set_headers(&headers);
    opts.set_body(&JsValue::from_str(body));

    let request = Request::new_with_str_and_init(url, &opts)
        .map_err(|e| format!("Failed to create request: {:?}", e))?;

    // Resolve fetch from the global scope so this works in both Window and
    // Worker contexts
    let global = js_sys::global();
    let fetch_fn = js_sys::Reflect::get(&global, &JsValue::from_str("fetch"))
        .map_err(|_| "fetch function not available".to_string())?;
    let fetch_fn = fetch_fn
        .dyn_into::<js_sys::Function>()
        .map_err(|_| "fetch is not a function".to_string())?;

    let fetch_promise = fetch_fn
        .call1(&global, &request)
        .map_err(|e| format!("fetch call failed: {:?}", e))?
        .dyn_into::<js_sys::Promise>()
        .map_err(|_| "fetch did not return a Promise".to_string())?;

    let resp_value = JsFuture::from(fetch_promise)
        .await
        .map_err(|e| format!("Fetch request failed: {:?}", e))?;

    let resp: Response = resp_value
        .dyn_into()
        .map_err(|e| format!("Failed to cast response: {:?}", e))?;

    if !resp.ok() {
        let error_text = match resp.text() {
            Ok(text_promise) => match JsFuture::from(text_promise).await {
                Ok(text_value) => text_value
                    .as_string()
                    .unwrap_or_else(|| "Unable to get error text".to_string()),
                Err(_) => "Failed to read error response".to_string(),
            },
            Err(_) => "Could not access error response".to_string(),
        };
        return Err(format!(
            "HTTP error: {} {} - Response: {}",
            resp.status(),
            resp.status_text(),
            error_text
        ));
    }

    let json_promise = resp
        .json()
        .map_err(|e| format!("Failed to get JSON from response: {:?}", e))?;

    let json_value = JsFuture::from(json_promise)
        .await
        .map_err(|e| format!("Failed to parse JSON: {:?}", e))?;

    let result: Value = serde_wasm_bindgen::from_value(json_value)
        .map_err(|e| format!("Failed to deserialize JSON: {:?}", e))?;

    debug!("Response from {} received", url);
    Ok(result)
}
