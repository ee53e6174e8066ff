use base64ct::{Base64, Encoding};
use hmac::{Hmac, Mac};
use sha2::Sha256;

use crate::error::AppError;

type HmacSha256 = Hmac<Sha256>;

/// Checks `X-Line-Signature`: base64(HMAC-SHA256(channel secret, raw body)).
pub fn verify_signature(body: &[u8], signature: &str, channel_secret: &str) -> Result<(), AppError> {
    let expected = Base64::decode_vec(signature.trim()).map_err(|_| AppError::InvalidSignature)?;

    let mut mac = HmacSha256::new_from_slice(channel_secret.as_bytes())
        .map_err(|_| AppError::InvalidSignature)?;
    mac.update(body);
    // constant-time comparison
    mac.verify_slice(&expected)
        .map_err(|_| AppError::InvalidSignature)
}

/// Signature LINE would send for `body`.
#[cfg(test)]
pub fn sign(body: &[u8], channel_secret: &str) -> String {
    let mut mac = HmacSha256::new_from_slice(channel_secret.as_bytes())
        .expect("HMAC accepts keys of any length");
    mac.update(body);
    Base64::encode_string(&mac.finalize().into_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "channel-secret";

    #[test]
    fn accepts_matching_signature() {
        let body = br#"{"events":[]}"#;
        let sig = sign(body, SECRET);
        assert!(verify_signature(body, &sig, SECRET).is_ok());
    }

    #[test]
    fn rejects_tampered_body() {
        let sig = sign(br#"{"events":[]}"#, SECRET);
        let err = verify_signature(br#"{"events":[{}]}"#, &sig, SECRET).unwrap_err();
        assert!(matches!(err, AppError::InvalidSignature));
    }

    #[test]
    fn rejects_wrong_secret_and_garbage() {
        let body = b"payload";
        let sig = sign(body, "other-secret");
        assert!(verify_signature(body, &sig, SECRET).is_err());
        assert!(verify_signature(body, "not base64 !!", SECRET).is_err());
    }
}
