// === BASE64URL CODEC ===
// Every byte sequence that crosses the wire goes through exactly one
// encode/decode pair here. The decoded bytes must be bit-identical to what
// the server or platform produced: they feed a signature check on the server
// that fails silently on a single flipped byte.

use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use base64::Engine;

use crate::error::CeremonyError;

// Standard-alphabet engine that tolerates non-canonical trailing bits: server
// challenges are arbitrary base64url text and the browser's atob accepts
// them, so a strict-canonical decoder would reject real server payloads.
const BASE64_ENGINE: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new()
        .with_decode_allow_trailing_bits(true)
        .with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

fn is_base64url_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '-' || c == '_'
}

/// Decode unpadded URL-safe base64 into raw bytes, naming the field the
/// text came from so decode failures point at the offending payload field.
pub fn decode_field(input: &str, field: &'static str) -> Result<Vec<u8>, CeremonyError> {
    if let Some(bad) = input.chars().find(|c| !is_base64url_char(*c)) {
        return Err(CeremonyError::Decode {
            field,
            reason: format!("character {:?} is outside the base64url alphabet", bad),
        });
    }
    // One stray character can never be padded out to a 4-char group
    if input.len() % 4 == 1 {
        return Err(CeremonyError::Decode {
            field,
            reason: format!(
                "length {} cannot be padded to a multiple of 4",
                input.len()
            ),
        });
    }

    let translated = input.replace('-', "+").replace('_', "/");
    let padding = "=".repeat((4 - translated.len() % 4) % 4);

    BASE64_ENGINE
        .decode(format!("{}{}", translated, padding))
        .map_err(|e| CeremonyError::Decode {
            field,
            reason: e.to_string(),
        })
}

/// Decode unpadded URL-safe base64 into raw bytes
pub fn decode(input: &str) -> Result<Vec<u8>, CeremonyError> {
    decode_field(input, "input")
}

/// Encode raw bytes as unpadded URL-safe base64
pub fn encode(bytes: impl AsRef<[u8]>) -> String {
    BASE64_ENGINE
        .encode(bytes.as_ref())
        .replace('+', "-")
        .replace('/', "_")
        .replace('=', "")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CeremonyError;

    // Deterministic byte generator so round-trip coverage is reproducible
    fn pseudo_random_bytes(len: usize) -> Vec<u8> {
        let mut state: u32 = 0x5eed_0000 ^ len as u32;
        (0..len)
            .map(|_| {
                state = state.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);
                (state >> 24) as u8
            })
            .collect()
    }

    #[test]
    fn test_decode_encode_roundtrip_all_lengths() {
        for len in 0..1024 {
            let bytes = pseudo_random_bytes(len);
            let encoded = encode(&bytes);
            let decoded = decode(&encoded).unwrap();
            assert_eq!(decoded, bytes, "round trip failed at length {}", len);
        }
    }

    #[test]
    fn test_encode_decode_roundtrip_strings() {
        for s in ["", "QQ", "abc-_10", "SGVsbG8gV29ybGQ", "_-_-", "AAAA"] {
            let decoded = decode(s).unwrap();
            assert_eq!(encode(&decoded), s, "string round trip failed for {:?}", s);
        }
    }

    #[test]
    fn test_decode_tolerates_noncanonical_trailing_bits() {
        // atob accepts trailing bits that are not zeroed; server challenges
        // rely on that, so strict-canonical rejection would break ceremonies
        let decoded = decode("abc-_12").unwrap();
        assert_eq!(decoded, decode("abc-_10").unwrap());
        // Re-encoding canonicalizes the final symbol
        assert_eq!(encode(&decoded), "abc-_10");
    }

    #[test]
    fn test_known_vectors() {
        assert_eq!(decode("SGVsbG8gV29ybGQ").unwrap(), b"Hello World");
        assert_eq!(decode("SGVsbG8").unwrap(), b"Hello");
        assert_eq!(encode(b"Hello"), "SGVsbG8");
        assert_eq!(decode("").unwrap(), b"");
        // 0xfb 0xff encodes to chars that differ between alphabets
        assert_eq!(encode([0xfb, 0xff]), "-_8");
        assert_eq!(decode("-_8").unwrap(), vec![0xfb, 0xff]);
    }

    #[test]
    fn test_rejects_standard_alphabet() {
        for bad in ["+w", "/w", "a+b/", "SGVsbG8=", "AB=="] {
            match decode(bad) {
                Err(CeremonyError::Decode { .. }) => {}
                other => panic!("expected Decode error for {:?}, got {:?}", bad, other),
            }
        }
    }

    #[test]
    fn test_rejects_unpaddable_length() {
        match decode("AAAAB") {
            Err(CeremonyError::Decode { reason, .. }) => {
                assert!(reason.contains("multiple of 4"));
            }
            other => panic!("expected Decode error, got {:?}", other),
        }
    }

    #[test]
    fn test_decode_field_names_offending_field() {
        let err = decode_field("%%%", "challenge").unwrap_err();
        assert!(err.to_string().contains("challenge"));
    }

    #[test]
    fn test_encode_accepts_byte_like_inputs() {
        let fixed: [u8; 4] = [1, 2, 3, 4];
        let vec = vec![1u8, 2, 3, 4];
        assert_eq!(encode(fixed), encode(&vec));
        assert_eq!(encode(&fixed[..]), "AQIDBA");
    }
}
