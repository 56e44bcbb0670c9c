// === REGISTRATION TRANSCODER ===
// Server creation-options payload -> prepared platform options (decode), and
// platform attestation credential -> server-postable wire form (encode).

use log::{debug, info};
use serde_json::Value;

use crate::base64url;
use crate::config;
use crate::error::CeremonyError;
use crate::extensions::filter_extensions;
use crate::types::{
    AttestationCredential, CreationOptions, CredentialDescriptor, PubKeyCredParam,
    ServerCreationOptions, WireCreation, WireCreationResponse,
};

/// Locate the creation options inside the server response.
///
/// Newer backends wrap the options in a status DTO under
/// `publicKeyCredentialCreationOptions`; older ones return them flat. Try the
/// nested shape first, fall back to flat.
fn locate_creation_options(payload: &Value) -> &Value {
    payload
        .get("publicKeyCredentialCreationOptions")
        .filter(|v| v.is_object())
        .unwrap_or(payload)
}

/// Decode a server registration payload into options the platform credential
/// API accepts, applying defaults for omitted optional fields.
pub fn prepare_creation_options(payload: &Value) -> Result<CreationOptions, CeremonyError> {
    let options = locate_creation_options(payload);

    let server: ServerCreationOptions = serde_json::from_value(options.clone())
        .map_err(|e| CeremonyError::protocol(format!("unrecognized creation options: {}", e)))?;

    let challenge = base64url::decode_field(&server.challenge, "challenge")?;
    let user_id = base64url::decode_field(&server.user.id, "user.id")?;

    let exclude_credentials = server
        .exclude_credentials
        .unwrap_or_default()
        .into_iter()
        .map(|cred| {
            Ok(CredentialDescriptor {
                id: base64url::decode_field(&cred.id, "excludeCredentials.id")?,
                cred_type: cred
                    .cred_type
                    .unwrap_or_else(|| config::PUBLIC_KEY_CREDENTIAL_TYPE.to_string()),
                transports: transports_from_value(cred.transports.as_ref()),
            })
        })
        .collect::<Result<Vec<_>, CeremonyError>>()?;

    let pub_key_cred_params = server.pub_key_cred_params.unwrap_or_else(|| {
        config::DEFAULT_PUB_KEY_CRED_ALGS
            .iter()
            .map(|&alg| PubKeyCredParam {
                alg,
                cred_type: config::PUBLIC_KEY_CREDENTIAL_TYPE.to_string(),
            })
            .collect()
    });

    let selection = server.authenticator_selection.unwrap_or_default();

    let extensions = server
        .extensions
        .map(|raw| filter_extensions(&raw))
        .unwrap_or_default();

    let rp = server.rp.unwrap_or_default();

    let prepared = CreationOptions {
        challenge,
        rp_id: rp.id,
        rp_name: rp.name,
        user_id,
        user_name: server.user.name,
        user_display_name: server.user.display_name,
        pub_key_cred_params,
        timeout: server.timeout.unwrap_or(config::DEFAULT_TIMEOUT_MS),
        exclude_credentials,
        authenticator_attachment: selection.authenticator_attachment,
        require_resident_key: selection.require_resident_key.unwrap_or(false),
        resident_key: selection
            .resident_key
            .unwrap_or_else(|| config::DEFAULT_RESIDENT_KEY.to_string()),
        user_verification: selection
            .user_verification
            .unwrap_or_else(|| config::DEFAULT_USER_VERIFICATION.to_string()),
        attestation: server
            .attestation
            .unwrap_or_else(|| config::DEFAULT_ATTESTATION.to_string()),
        extensions,
    };

    info!(
        "Prepared creation options: rp={}, user={}, {} excluded credential(s)",
        prepared.rp_name.as_deref().unwrap_or("(absent)"),
        prepared.user_name,
        prepared.exclude_credentials.len()
    );

    Ok(prepared)
}

/// Re-encode a platform attestation credential into its wire form. The
/// credential id is already text and passes through verbatim; missing
/// transport hints become an empty list, never an error.
pub fn encode_attestation(credential: &AttestationCredential) -> WireCreation {
    debug!("Encoding attestation credential {}", credential.id);

    WireCreation {
        id: credential.id.clone(),
        cred_type: credential.cred_type.clone(),
        response: WireCreationResponse {
            attestation_object: base64url::encode(&credential.attestation_object),
            client_data_json: base64url::encode(&credential.client_data_json),
            transports: credential.transports.clone().unwrap_or_default(),
        },
        client_extension_results: credential.client_extension_results.clone(),
    }
}

/// Carry transport hints through only when they are a well-formed string
/// list; anything else is treated as absent.
pub(crate) fn transports_from_value(value: Option<&Value>) -> Vec<String> {
    value
        .and_then(Value::as_array)
        .map(|list| {
            list.iter()
                .filter_map(|t| t.as_str().map(str::to_string))
                .collect()
        })
        .unwrap_or_default()
}
