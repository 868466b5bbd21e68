//! Cryptographic Utilities
//!
//! Random secrets, URL-safe base64 and HMAC-SHA256 value signing with
//! secret rotation.

use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use hmac::{Hmac, Mac};
use rand::{RngCore, rngs::OsRng};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Separator between a signed value and its signature
const SIGNATURE_SEPARATOR: char = '.';

/// Generate cryptographically secure random bytes
pub fn random_bytes(len: usize) -> Vec<u8> {
    let mut bytes = vec![0u8; len];
    OsRng.fill_bytes(&mut bytes);
    bytes
}

/// Encode bytes as unpadded URL-safe base64 (cookie-safe alphabet)
pub fn to_base64url(bytes: &[u8]) -> String {
    URL_SAFE_NO_PAD.encode(bytes)
}

/// Decode unpadded URL-safe base64
pub fn from_base64url(s: &str) -> Result<Vec<u8>, base64::DecodeError> {
    URL_SAFE_NO_PAD.decode(s)
}

fn mac_for(secret: &[u8], value: &str) -> HmacSha256 {
    let mut mac = HmacSha256::new_from_slice(secret).expect("HMAC can take key of any size");
    mac.update(value.as_bytes());
    mac
}

/// Sign `value` as `value.signature` with HMAC-SHA256.
pub fn sign_value(value: &str, secret: &[u8]) -> String {
    let signature = mac_for(secret, value).finalize().into_bytes();
    format!("{value}{SIGNATURE_SEPARATOR}{}", to_base64url(&signature))
}

/// Verify a `value.signature` string against every secret in order.
///
/// Returns the unsigned value when any secret matches, so values signed
/// before a secret rotation keep verifying while the old secret is listed.
/// Comparison is constant time.
pub fn unsign_value<S: AsRef<[u8]>>(signed: &str, secrets: &[S]) -> Option<String> {
    let (value, signature_b64) = signed.rsplit_once(SIGNATURE_SEPARATOR)?;
    let signature = from_base64url(signature_b64).ok()?;

    secrets
        .iter()
        .any(|secret| {
            mac_for(secret.as_ref(), value)
                .verify_slice(&signature)
                .is_ok()
        })
        .then(|| value.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_random_bytes() {
        let bytes = random_bytes(32);
        assert_eq!(bytes.len(), 32);
        assert!(bytes.iter().any(|&b| b != 0));
        assert_ne!(random_bytes(32), bytes);
    }

    #[test]
    fn test_base64url_is_cookie_safe() {
        let encoded = to_base64url(&[0xfb, 0xff, 0xfe, 0x00]);
        assert!(!encoded.contains('+'));
        assert!(!encoded.contains('/'));
        assert!(!encoded.contains('='));
        assert_eq!(from_base64url(&encoded).unwrap(), vec![0xfb, 0xff, 0xfe, 0x00]);
    }

    #[test]
    fn test_hmac_known_vector() {
        // RFC 4231 test case 2
        let signed = sign_value("what do ya want for nothing?", b"Jefe");
        let (_, sig) = signed.rsplit_once('.').unwrap();
        let expected =
            hex::decode("5bdcc146bf60754e6a042426089575c75a003f089d2739839dec58b964ec3843")
                .unwrap();
        assert_eq!(from_base64url(sig).unwrap(), expected);
    }

    #[test]
    fn test_sign_and_unsign() {
        let signed = sign_value("payload", b"s3cr3t");
        assert_eq!(unsign_value(&signed, &[b"s3cr3t"]), Some("payload".to_string()));
    }

    #[test]
    fn test_unsign_rejects_tampering() {
        let signed = sign_value("payload", b"s3cr3t");
        let tampered = signed.replacen("payload", "paylobd", 1);
        assert_eq!(unsign_value(&tampered, &[b"s3cr3t"]), None);
        assert_eq!(unsign_value("no-signature", &[b"s3cr3t"]), None);
        assert_eq!(unsign_value("payload.!!!", &[b"s3cr3t"]), None);
    }

    #[test]
    fn test_unsign_with_rotated_secrets() {
        let old = sign_value("payload", b"old-secret");
        let secrets: [&[u8]; 2] = [b"new-secret", b"old-secret"];
        assert_eq!(unsign_value(&old, &secrets), Some("payload".to_string()));

        let dropped: [&[u8]; 1] = [b"new-secret"];
        assert_eq!(unsign_value(&old, &dropped), None);
    }

    #[test]
    fn test_values_containing_separator() {
        let signed = sign_value("a.b.c", b"k");
        assert_eq!(unsign_value(&signed, &[b"k"]), Some("a.b.c".to_string()));
    }
}
