/// Configuration constants for the ceremony client
///
/// Defaults applied to omitted server fields live here so the transcoders
/// stay pure data transformations. Changing a default is a data change in
/// this module, not a code change in the transcoders.

// === LOGGING CONFIGURATION ===

/// Log level for the ceremony client
/// Change this constant and recompile to adjust logging verbosity
pub const CURRENT_LOG_LEVEL: log::Level = log::Level::Debug;

// === CEREMONY DEFAULTS ===

/// Credential type discriminator used by the platform API
pub const PUBLIC_KEY_CREDENTIAL_TYPE: &str = "public-key";

/// Default ceremony timeout in milliseconds when the server omits one
/// (registration only; request options leave an omitted timeout absent)
pub const DEFAULT_TIMEOUT_MS: u32 = 60_000;

/// COSE algorithm identifiers accepted by default: ES256 and RS256,
/// the two algorithms with broad authenticator support
pub const DEFAULT_PUB_KEY_CRED_ALGS: [i32; 2] = [-7, -257];

/// Default attestation conveyance preference
pub const DEFAULT_ATTESTATION: &str = "none";

/// Default resident-key preference for authenticator selection
pub const DEFAULT_RESIDENT_KEY: &str = "preferred";

/// Default user-verification preference for authenticator selection
pub const DEFAULT_USER_VERIFICATION: &str = "preferred";

// === WIRE ENCODING POLICY ===

/// How an absent login userHandle is put on the wire.
///
/// Two server generations were observed: one expects `"userHandle": null`,
/// the other expects the key to be omitted entirely. The server distinguishes
/// both from an empty string, so the client must pick one explicitly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserHandlePolicy {
    /// Serialize `"userHandle": null` (what the reference backend accepts)
    Null,
    /// Drop the `userHandle` key from the response object
    Omit,
}

/// Policy applied by the orchestrator when submitting an assertion
pub const USER_HANDLE_POLICY: UserHandlePolicy = UserHandlePolicy::Null;

// === SERVER ENDPOINTS ===

/// Fallback API base URL when no override is baked in at build time
pub const DEFAULT_API_URL: &str = "http://localhost:8080/api";

/// Resolve the API base URL once: build-time environment override or default.
/// Deliberately not a runtime-mutable global.
pub fn api_base_url() -> &'static str {
    match option_env!("WEBAUTHN_API_URL") {
        Some(url) if !url.is_empty() => url,
        _ => DEFAULT_API_URL,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_algorithms() {
        assert_eq!(DEFAULT_PUB_KEY_CRED_ALGS, [-7, -257]);
    }

    #[test]
    fn test_api_base_url_has_no_trailing_slash() {
        assert!(!api_base_url().ends_with('/'));
    }
}
