// === CEREMONY DATA TYPES ===
// Server payload shapes, prepared platform options, and wire credential forms.
// Everything here is an immutable value created for one ceremony call and
// discarded after the request/response pair that uses it.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::config::UserHandlePolicy;

// --- Server-issued payloads (decoded from JSON, binary fields still text) ---

#[derive(Deserialize, Debug, Clone)]
pub struct ServerCreationOptions {
    pub challenge: String,
    pub rp: Option<ServerRelyingParty>,
    pub user: ServerUser,
    #[serde(rename = "pubKeyCredParams")]
    pub pub_key_cred_params: Option<Vec<PubKeyCredParam>>,
    pub timeout: Option<u32>,
    #[serde(rename = "excludeCredentials")]
    pub exclude_credentials: Option<Vec<ServerCredentialDescriptor>>,
    #[serde(rename = "authenticatorSelection")]
    pub authenticator_selection: Option<ServerAuthenticatorSelection>,
    pub attestation: Option<String>,
    pub extensions: Option<Map<String, Value>>,
}

#[derive(Deserialize, Debug, Clone, Default)]
pub struct ServerRelyingParty {
    pub id: Option<String>,
    pub name: Option<String>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct ServerUser {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(rename = "displayName", default)]
    pub display_name: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct PubKeyCredParam {
    pub alg: i32,
    #[serde(rename = "type")]
    pub cred_type: String,
}

#[derive(Deserialize, Debug, Clone)]
pub struct ServerCredentialDescriptor {
    pub id: String,
    #[serde(rename = "type")]
    pub cred_type: Option<String>,
    // Left as raw JSON: malformed transport hints are dropped, not fatal
    pub transports: Option<Value>,
}

#[derive(Deserialize, Debug, Clone, Default)]
pub struct ServerAuthenticatorSelection {
    #[serde(rename = "authenticatorAttachment")]
    pub authenticator_attachment: Option<String>,
    #[serde(rename = "requireResidentKey")]
    pub require_resident_key: Option<bool>,
    #[serde(rename = "residentKey")]
    pub resident_key: Option<String>,
    #[serde(rename = "userVerification")]
    pub user_verification: Option<String>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct ServerRequestOptions {
    pub challenge: String,
    #[serde(rename = "rpId")]
    pub rp_id: Option<String>,
    pub timeout: Option<u32>,
    #[serde(rename = "allowCredentials")]
    pub allow_credentials: Option<Vec<ServerCredentialDescriptor>>,
    #[serde(rename = "userVerification")]
    pub user_verification: Option<String>,
    pub extensions: Option<Map<String, Value>>,
}

// --- Prepared options (binary fields decoded, ready for the platform API) ---

#[derive(Debug, Clone, PartialEq)]
pub struct CreationOptions {
    pub challenge: Vec<u8>,
    pub rp_id: Option<String>,
    pub rp_name: Option<String>,
    pub user_id: Vec<u8>,
    pub user_name: String,
    pub user_display_name: String,
    pub pub_key_cred_params: Vec<PubKeyCredParam>,
    pub timeout: u32,
    pub exclude_credentials: Vec<CredentialDescriptor>,
    pub authenticator_attachment: Option<String>,
    pub require_resident_key: bool,
    pub resident_key: String,
    pub user_verification: String,
    pub attestation: String,
    pub extensions: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RequestOptions {
    pub challenge: Vec<u8>,
    pub rp_id: Option<String>,
    /// Absent when the server omitted it: the platform API distinguishes
    /// "no timeout supplied" from any defaulted number
    pub timeout: Option<u32>,
    pub allow_credentials: Vec<CredentialDescriptor>,
    pub user_verification: Option<String>,
    pub extensions: Option<Map<String, Value>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CredentialDescriptor {
    pub id: Vec<u8>,
    pub cred_type: String,
    pub transports: Vec<String>,
}

// --- Platform-produced credentials (binary fields as raw bytes) ---

#[derive(Debug, Clone, PartialEq)]
pub struct AttestationCredential {
    pub id: String,
    pub raw_id: Vec<u8>,
    pub cred_type: String,
    pub attestation_object: Vec<u8>,
    pub client_data_json: Vec<u8>,
    pub transports: Option<Vec<String>>,
    pub client_extension_results: Value,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AssertionCredential {
    pub id: String,
    pub raw_id: Vec<u8>,
    pub cred_type: String,
    pub authenticator_data: Vec<u8>,
    pub client_data_json: Vec<u8>,
    pub signature: Vec<u8>,
    /// None when the authenticator returned no user handle; an empty buffer
    /// is a different (and preserved) value
    pub user_handle: Option<Vec<u8>>,
    pub client_extension_results: Value,
}

// --- Wire forms (JSON-safe, base64url text, ready for HTTP submission) ---

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct WireCreation {
    pub id: String,
    #[serde(rename = "type")]
    pub cred_type: String,
    pub response: WireCreationResponse,
    #[serde(rename = "clientExtensionResults")]
    pub client_extension_results: Value,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct WireCreationResponse {
    #[serde(rename = "attestationObject")]
    pub attestation_object: String,
    #[serde(rename = "clientDataJSON")]
    pub client_data_json: String,
    pub transports: Vec<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct WireAssertion {
    pub id: String,
    #[serde(rename = "type")]
    pub cred_type: String,
    pub response: WireAssertionResponse,
    #[serde(rename = "clientExtensionResults")]
    pub client_extension_results: Value,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct WireAssertionResponse {
    #[serde(rename = "authenticatorData")]
    pub authenticator_data: String,
    #[serde(rename = "clientDataJSON")]
    pub client_data_json: String,
    pub signature: String,
    #[serde(rename = "userHandle")]
    pub user_handle: Option<String>,
}

impl WireAssertion {
    /// Serialize for submission, applying the configured encoding of an
    /// absent userHandle: JSON null, or no key at all.
    pub fn to_wire_value(&self, policy: UserHandlePolicy) -> Value {
        let mut value = serde_json::to_value(self).unwrap_or_default();
        if policy == UserHandlePolicy::Omit && self.response.user_handle.is_none() {
            if let Some(response) = value.get_mut("response").and_then(Value::as_object_mut) {
                response.remove("userHandle");
            }
        }
        value
    }
}
