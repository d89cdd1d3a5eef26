//! Personal-message (EIP-191) hashing and signer recovery.

use alloy_primitives::{Address, FixedBytes};
use k256::{
    ecdsa::{RecoveryId, Signature, SigningKey, VerifyingKey},
    elliptic_curve::sec1::ToEncodedPoint,
};
use sha3::{Digest, Keccak256};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CryptoError {
    #[error("signature is not valid hex: {0}")]
    Hex(String),
    #[error("signature must be 65 bytes, got {0}")]
    Length(usize),
    #[error("unsupported recovery id v={0}")]
    RecoveryId(u8),
    #[error("malformed signature: {0}")]
    Signature(String),
    #[error("public key recovery failed: {0}")]
    Recovery(String),
}

pub fn keccak256_bytes(bytes: &[u8]) -> FixedBytes<32> {
    let mut h = Keccak256::new();
    h.update(bytes);
    let out = h.finalize();
    let mut b = [0u8; 32];
    b.copy_from_slice(out.as_slice());
    FixedBytes(b)
}

/// keccak256("\x19Ethereum Signed Message:\n" || len(message) || message)
pub fn personal_message_digest(message: &[u8]) -> FixedBytes<32> {
    let prefix = format!("\x19Ethereum Signed Message:\n{}", message.len());
    let mut buf = Vec::with_capacity(prefix.len() + message.len());
    buf.extend_from_slice(prefix.as_bytes());
    buf.extend_from_slice(message);
    keccak256_bytes(&buf)
}

pub fn address_of(key: &VerifyingKey) -> Address {
    let point = key.to_encoded_point(false);
    // Uncompressed SEC1: 0x04 || X || Y; the address is the low 20 bytes of keccak(X || Y).
    let hash = keccak256_bytes(&point.as_bytes()[1..]);
    Address::from_slice(&hash[12..32])
}

pub fn decode_signature_hex(signature: &str) -> Result<[u8; 65], CryptoError> {
    let raw = signature.strip_prefix("0x").unwrap_or(signature);
    let bytes = hex::decode(raw).map_err(|e| CryptoError::Hex(e.to_string()))?;
    if bytes.len() != 65 {
        return Err(CryptoError::Length(bytes.len()));
    }
    let mut sig = [0u8; 65];
    sig.copy_from_slice(&bytes);
    Ok(sig)
}

/// Recover the signer of a 32-byte digest from an `r || s || v` signature.
///
/// `v` may be given as 0/1 or 27/28.
pub fn recover_address(digest: FixedBytes<32>, sig: &[u8; 65]) -> Result<Address, CryptoError> {
    let v = match sig[64] {
        0 | 1 => sig[64],
        27 | 28 => sig[64] - 27,
        other => return Err(CryptoError::RecoveryId(other)),
    };
    let recovery_id = RecoveryId::from_byte(v).ok_or(CryptoError::RecoveryId(sig[64]))?;
    let signature =
        Signature::from_slice(&sig[..64]).map_err(|e| CryptoError::Signature(e.to_string()))?;
    let key = VerifyingKey::recover_from_prehash(digest.as_slice(), &signature, recovery_id)
        .map_err(|e| CryptoError::Recovery(e.to_string()))?;
    Ok(address_of(&key))
}

/// Sign `message` as a personal message, returning `0x`-prefixed `r || s || v` with v in {27, 28}.
pub fn sign_personal_message(
    key: &SigningKey,
    message: &str,
) -> Result<String, k256::ecdsa::Error> {
    let digest = personal_message_digest(message.as_bytes());
    let (signature, recovery_id) = key.sign_prehash_recoverable(digest.as_slice())?;
    let mut sig_bytes = Vec::with_capacity(65);
    sig_bytes.extend_from_slice(&signature.to_bytes());
    sig_bytes.push(27 + recovery_id.to_byte());
    Ok(format!("0x{}", hex::encode(sig_bytes)))
}
