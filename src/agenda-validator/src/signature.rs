//! Creator signature verification.
//!
//! Verification fails closed: malformed signatures and recovery errors yield `false`, never an
//! error.

use agenda_metadata_types::AgendaMetadata;
use alloy_primitives::Address;
use tracing::debug;

use crate::{
    messages::{signature_message, SignatureAction},
    patterns::normalize_address,
    utils::crypto::{decode_signature_hex, personal_message_digest, recover_address, CryptoError},
};

/// Recover the personal-message signer of `message`.
pub fn recover_signer(message: &str, signature: &str) -> Result<Address, CryptoError> {
    let sig = decode_signature_hex(signature)?;
    recover_address(personal_message_digest(message.as_bytes()), &sig)
}

/// `true` if `signature` over `message` recovers to `expected_address` (case-insensitive).
pub fn verify_signature(message: &str, signature: &str, expected_address: &str) -> bool {
    match recover_signer(message, signature) {
        Ok(recovered) => {
            let recovered = normalize_address(&recovered.to_string());
            let matches = recovered == normalize_address(expected_address);
            if !matches {
                debug!(
                    %recovered,
                    expected = expected_address,
                    "signature recovered to a different address"
                );
            }
            matches
        }
        Err(err) => {
            debug!(error = %err, "signature recovery failed");
            false
        }
    }
}

/// Canonical message for this document (create or update template).
pub fn agenda_signature_message(metadata: &AgendaMetadata) -> String {
    signature_message(
        SignatureAction::for_update(metadata.is_update()),
        metadata.id,
        &metadata.transaction,
        metadata.signed_timestamp(),
    )
}

pub fn verify_agenda_signature(metadata: &AgendaMetadata) -> bool {
    verify_signature(
        &agenda_signature_message(metadata),
        &metadata.creator.signature,
        &metadata.creator.address,
    )
}
