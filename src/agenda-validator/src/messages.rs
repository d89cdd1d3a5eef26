//! Canonical messages signed by agenda creators.
//!
//! The text is the exact payload signed off-chain by the signing page; any change here breaks
//! verification of every existing submission.

/// Which template applies to a submission.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SignatureAction {
    Create,
    Update,
}

impl SignatureAction {
    pub fn for_update(is_update: bool) -> Self {
        if is_update {
            SignatureAction::Update
        } else {
            SignatureAction::Create
        }
    }
}

/// Documentation form of the templates with placeholders.
pub const CREATE_TEMPLATE_DOC: &str = "I am the one who submitted agenda #<id> via transaction <tx-hash>. I am creating this metadata at <timestamp>. This signature proves that I am the one who submitted this agenda.";
pub const UPDATE_TEMPLATE_DOC: &str = "I am the one who submitted agenda #<id> via transaction <tx-hash>. I am updating this metadata at <timestamp>. This signature proves that I am the one who can update this agenda.";

pub fn create_message(agenda_id: u64, transaction_hash: &str, timestamp: &str) -> String {
    format!(
        "I am the one who submitted agenda #{agenda_id} via transaction {transaction_hash}. I am creating this metadata at {timestamp}. This signature proves that I am the one who submitted this agenda."
    )
}

pub fn update_message(agenda_id: u64, transaction_hash: &str, timestamp: &str) -> String {
    format!(
        "I am the one who submitted agenda #{agenda_id} via transaction {transaction_hash}. I am updating this metadata at {timestamp}. This signature proves that I am the one who can update this agenda."
    )
}

pub fn signature_message(
    action: SignatureAction,
    agenda_id: u64,
    transaction_hash: &str,
    timestamp: &str,
) -> String {
    match action {
        SignatureAction::Create => create_message(agenda_id, transaction_hash, timestamp),
        SignatureAction::Update => update_message(agenda_id, transaction_hash, timestamp),
    }
}
