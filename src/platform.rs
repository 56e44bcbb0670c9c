// === PLATFORM CREDENTIAL API BOUNDARY ===
// Converts prepared options into the JS objects `navigator.credentials`
// expects (binary fields as Uint8Array) and extracts typed credentials from
// the platform's result objects. All property access goes through Reflect so
// a platform object missing an optional accessor degrades to "absent" instead
// of throwing.

use js_sys::{Array, Function, Object, Reflect, Uint8Array};
use serde_json::Value;
use wasm_bindgen::{JsCast, JsValue};

use crate::error::CeremonyError;
use crate::types::{
    AssertionCredential, AttestationCredential, CreationOptions, CredentialDescriptor,
    RequestOptions,
};

/// True iff the host environment exposes the public-key-credential API.
/// Probed on the global scope so it answers correctly in both Window and
/// Worker contexts.
pub fn is_webauthn_supported() -> bool {
    Reflect::get(&js_sys::global(), &JsValue::from_str("PublicKeyCredential"))
        .map(|v| !v.is_undefined() && !v.is_null())
        .unwrap_or(false)
}

// --- prepared options -> JS ---

fn set(target: &Object, key: &str, value: &JsValue) {
    // Reflect::set on a plain object cannot fail
    let _ = Reflect::set(target, &JsValue::from_str(key), value);
}

fn bytes_to_js(bytes: &[u8]) -> JsValue {
    Uint8Array::from(bytes).into()
}

fn string_list_to_js(items: &[String]) -> JsValue {
    items
        .iter()
        .map(|s| JsValue::from_str(s))
        .collect::<Array>()
        .into()
}

fn descriptors_to_js(descriptors: &[CredentialDescriptor]) -> JsValue {
    descriptors
        .iter()
        .map(|descriptor| {
            let entry = Object::new();
            set(&entry, "type", &JsValue::from_str(&descriptor.cred_type));
            set(&entry, "id", &bytes_to_js(&descriptor.id));
            set(&entry, "transports", &string_list_to_js(&descriptor.transports));
            JsValue::from(entry)
        })
        .collect::<Array>()
        .into()
}

fn extensions_to_js(extensions: &serde_json::Map<String, Value>) -> JsValue {
    serde_wasm_bindgen::to_value(extensions).unwrap_or_else(|_| Object::new().into())
}

/// Build the `{ publicKey: {...} }` argument for `navigator.credentials.create`.
pub fn creation_options_to_js(options: &CreationOptions) -> JsValue {
    let public_key = Object::new();

    set(&public_key, "challenge", &bytes_to_js(&options.challenge));

    let rp = Object::new();
    if let Some(rp_id) = &options.rp_id {
        set(&rp, "id", &JsValue::from_str(rp_id));
    }
    if let Some(rp_name) = &options.rp_name {
        set(&rp, "name", &JsValue::from_str(rp_name));
    }
    set(&public_key, "rp", &rp);

    let user = Object::new();
    set(&user, "id", &bytes_to_js(&options.user_id));
    set(&user, "name", &JsValue::from_str(&options.user_name));
    set(&user, "displayName", &JsValue::from_str(&options.user_display_name));
    set(&public_key, "user", &user);

    let params: Array = options
        .pub_key_cred_params
        .iter()
        .map(|param| {
            let entry = Object::new();
            set(&entry, "alg", &JsValue::from_f64(param.alg as f64));
            set(&entry, "type", &JsValue::from_str(&param.cred_type));
            JsValue::from(entry)
        })
        .collect();
    set(&public_key, "pubKeyCredParams", &params.into());

    set(&public_key, "timeout", &JsValue::from_f64(options.timeout as f64));
    set(
        &public_key,
        "excludeCredentials",
        &descriptors_to_js(&options.exclude_credentials),
    );

    let selection = Object::new();
    if let Some(attachment) = &options.authenticator_attachment {
        set(&selection, "authenticatorAttachment", &JsValue::from_str(attachment));
    }
    set(
        &selection,
        "requireResidentKey",
        &JsValue::from_bool(options.require_resident_key),
    );
    set(&selection, "residentKey", &JsValue::from_str(&options.resident_key));
    set(
        &selection,
        "userVerification",
        &JsValue::from_str(&options.user_verification),
    );
    set(&public_key, "authenticatorSelection", &selection);

    set(&public_key, "attestation", &JsValue::from_str(&options.attestation));
    set(&public_key, "extensions", &extensions_to_js(&options.extensions));

    let wrapper = Object::new();
    set(&wrapper, "publicKey", &public_key);
    wrapper.into()
}

/// Build the `{ publicKey: {...} }` argument for `navigator.credentials.get`.
/// Fields the server omitted are left off the object entirely.
pub fn request_options_to_js(options: &RequestOptions) -> JsValue {
    let public_key = Object::new();

    set(&public_key, "challenge", &bytes_to_js(&options.challenge));
    if let Some(rp_id) = &options.rp_id {
        set(&public_key, "rpId", &JsValue::from_str(rp_id));
    }
    if let Some(timeout) = options.timeout {
        set(&public_key, "timeout", &JsValue::from_f64(timeout as f64));
    }
    set(
        &public_key,
        "allowCredentials",
        &descriptors_to_js(&options.allow_credentials),
    );
    if let Some(user_verification) = &options.user_verification {
        set(&public_key, "userVerification", &JsValue::from_str(user_verification));
    }
    if let Some(extensions) = &options.extensions {
        set(&public_key, "extensions", &extensions_to_js(extensions));
    }

    let wrapper = Object::new();
    set(&wrapper, "publicKey", &public_key);
    wrapper.into()
}

// --- platform credential JS object -> typed credential ---

fn get(target: &JsValue, key: &str) -> JsValue {
    Reflect::get(target, &JsValue::from_str(key)).unwrap_or(JsValue::UNDEFINED)
}

fn require_string(target: &JsValue, key: &str, field: &'static str) -> Result<String, CeremonyError> {
    get(target, key)
        .as_string()
        .ok_or_else(|| CeremonyError::encoding(format!("credential is missing '{}'", field)))
}

/// Accept any byte-sequence-like JS value: ArrayBuffer or a Uint8Array view.
fn bytes_from_js(value: &JsValue) -> Option<Vec<u8>> {
    if let Some(buffer) = value.dyn_ref::<js_sys::ArrayBuffer>() {
        return Some(Uint8Array::new(buffer).to_vec());
    }
    value.dyn_ref::<Uint8Array>().map(|view| view.to_vec())
}

fn require_bytes(target: &JsValue, key: &str, field: &'static str) -> Result<Vec<u8>, CeremonyError> {
    bytes_from_js(&get(target, key))
        .ok_or_else(|| CeremonyError::encoding(format!("credential is missing binary field '{}'", field)))
}

/// Call a zero-argument method if the object exposes it. Platform objects
/// from older engines lack some accessors; absence is an empty result.
fn call_optional_method(target: &JsValue, name: &str) -> Option<JsValue> {
    get(target, name)
        .dyn_ref::<Function>()
        .and_then(|method| method.call0(target).ok())
}

fn extension_results_from(credential: &JsValue) -> Value {
    call_optional_method(credential, "getClientExtensionResults")
        .and_then(|results| serde_wasm_bindgen::from_value(results).ok())
        .unwrap_or_else(|| Value::Object(Default::default()))
}

fn transports_from(response: &JsValue) -> Option<Vec<String>> {
    let transports = call_optional_method(response, "getTransports")?;
    let list = transports.dyn_into::<Array>().ok()?;
    Some(list.iter().filter_map(|t| t.as_string()).collect())
}

/// Extract a typed attestation credential from the platform's creation result.
pub fn attestation_from_js(credential: &JsValue) -> Result<AttestationCredential, CeremonyError> {
    let response = get(credential, "response");
    if response.is_undefined() || response.is_null() {
        return Err(CeremonyError::encoding("credential has no response object"));
    }

    Ok(AttestationCredential {
        id: require_string(credential, "id", "id")?,
        raw_id: require_bytes(credential, "rawId", "rawId")?,
        cred_type: require_string(credential, "type", "type")?,
        attestation_object: require_bytes(&response, "attestationObject", "response.attestationObject")?,
        client_data_json: require_bytes(&response, "clientDataJSON", "response.clientDataJSON")?,
        transports: transports_from(&response),
        client_extension_results: extension_results_from(credential),
    })
}

/// Extract a typed assertion credential from the platform's login result.
/// A null or undefined userHandle is preserved as absence.
pub fn assertion_from_js(credential: &JsValue) -> Result<AssertionCredential, CeremonyError> {
    let response = get(credential, "response");
    if response.is_undefined() || response.is_null() {
        return Err(CeremonyError::encoding("credential has no response object"));
    }

    let user_handle = {
        let raw = get(&response, "userHandle");
        if raw.is_undefined() || raw.is_null() {
            None
        } else {
            bytes_from_js(&raw)
        }
    };

    Ok(AssertionCredential {
        id: require_string(credential, "id", "id")?,
        raw_id: require_bytes(credential, "rawId", "rawId")?,
        cred_type: require_string(credential, "type", "type")?,
        authenticator_data: require_bytes(&response, "authenticatorData", "response.authenticatorData")?,
        client_data_json: require_bytes(&response, "clientDataJSON", "response.clientDataJSON")?,
        signature: require_bytes(&response, "signature", "response.signature")?,
        user_handle,
        client_extension_results: extension_results_from(credential),
    })
}
