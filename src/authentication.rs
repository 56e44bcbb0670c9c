// === AUTHENTICATION TRANSCODER ===
// Server request-options payload -> prepared platform options (decode), and
// platform assertion credential -> server-postable wire form (encode).

use log::{debug, info};
use serde_json::Value;

use crate::base64url;
use crate::config;
use crate::error::CeremonyError;
use crate::registration::transports_from_value;
use crate::types::{
    AssertionCredential, CredentialDescriptor, RequestOptions, ServerRequestOptions,
    WireAssertion, WireAssertionResponse,
};

/// Locate the request options inside the server response.
///
/// The reference backend nests them under
/// `assertionRequest.publicKeyCredentialRequestOptions`; other variants nest
/// one level less or return them flat. Try nested shapes first.
fn locate_request_options(payload: &Value) -> &Value {
    payload
        .get("assertionRequest")
        .and_then(|r| r.get("publicKeyCredentialRequestOptions"))
        .filter(|v| v.is_object())
        .or_else(|| {
            payload
                .get("publicKeyCredentialRequestOptions")
                .filter(|v| v.is_object())
        })
        .unwrap_or(payload)
}

/// Decode a server login payload into options the platform credential API
/// accepts. Optional fields the server omitted stay absent: the platform
/// distinguishes an absent field from a defaulted one.
pub fn prepare_request_options(payload: &Value) -> Result<RequestOptions, CeremonyError> {
    let options = locate_request_options(payload);

    let server: ServerRequestOptions = serde_json::from_value(options.clone())
        .map_err(|e| CeremonyError::protocol(format!("unrecognized request options: {}", e)))?;

    let challenge = base64url::decode_field(&server.challenge, "challenge")?;

    let allow_credentials = server
        .allow_credentials
        .unwrap_or_default()
        .into_iter()
        .map(|cred| {
            Ok(CredentialDescriptor {
                id: base64url::decode_field(&cred.id, "allowCredentials.id")?,
                cred_type: cred
                    .cred_type
                    .unwrap_or_else(|| config::PUBLIC_KEY_CREDENTIAL_TYPE.to_string()),
                transports: transports_from_value(cred.transports.as_ref()),
            })
        })
        .collect::<Result<Vec<_>, CeremonyError>>()?;

    let prepared = RequestOptions {
        challenge,
        rp_id: server.rp_id,
        timeout: server.timeout,
        allow_credentials,
        user_verification: server.user_verification,
        extensions: server.extensions,
    };

    info!(
        "Prepared request options: {} allowed credential(s), rpId {}",
        prepared.allow_credentials.len(),
        prepared.rp_id.as_deref().unwrap_or("(absent)")
    );

    Ok(prepared)
}

/// Re-encode a platform assertion credential into its wire form. A missing
/// user handle stays `None` here; how that absence is spelled on the wire
/// (null vs omitted key) is the submitting caller's policy decision.
pub fn encode_assertion(credential: &AssertionCredential) -> WireAssertion {
    debug!("Encoding assertion credential {}", credential.id);

    WireAssertion {
        id: credential.id.clone(),
        cred_type: credential.cred_type.clone(),
        response: WireAssertionResponse {
            authenticator_data: base64url::encode(&credential.authenticator_data),
            client_data_json: base64url::encode(&credential.client_data_json),
            signature: base64url::encode(&credential.signature),
            user_handle: credential
                .user_handle
                .as_ref()
                .map(|handle| base64url::encode(handle)),
        },
        client_extension_results: credential.client_extension_results.clone(),
    }
}
