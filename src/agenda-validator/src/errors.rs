use thiserror::Error;

use crate::schema::SchemaIssue;

/// Errors while decoding transaction input or event logs.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("invalid hex data: {0}")]
    Hex(String),
    #[error("failed to decode approveAndCall data: {0}")]
    OuterCall(String),
    #[error("failed to decode agenda parameters (legacy: {legacy}; new: {new})")]
    AgendaParams { legacy: String, new: String },
    #[error("failed to parse AgendaCreated event data: {0}")]
    Event(String),
}

/// Errors talking to the chain-data provider.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChainError {
    #[error("no RPC endpoint configured for {0}")]
    NoEndpoint(String),
    #[error("provider request failed: {0}")]
    Provider(String),
}

/// Hard failures of the on-chain cross-check. Mismatches are not errors; they are reported
/// through [`crate::cross_check::CrossCheckReport`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CrossCheckError {
    #[error("Transaction not found: {0}")]
    TransactionNotFound(String),
    #[error("Transaction receipt not found: {0}")]
    ReceiptNotFound(String),
    #[error("AgendaCreated event not found in transaction logs")]
    EventNotFound,
    #[error("invalid transaction hash: {0}")]
    InvalidHash(String),
    #[error(transparent)]
    Decode(#[from] DecodeError),
    #[error(transparent)]
    Chain(#[from] ChainError),
}

/// Timestamp freshness failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TimestampError {
    #[error("Invalid timestamp format: {0}. Expected ISO 8601 format.")]
    Invalid(String),
    #[error(
        "Signature has expired. Signature time: {signed}, Current time: {now}. Signatures must be created within {window_hours} hour(s)."
    )]
    Expired {
        signed: String,
        now: String,
        window_hours: u64,
    },
    #[error("updatedAt must be later than createdAt (createdAt: {created}, updatedAt: {updated})")]
    NotMonotonic { created: String, updated: String },
}

/// Failure of a single pipeline step, grouped by the kind of check that failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("schema validation failed ({} issue(s))", .0.len())]
    Structural(Vec<SchemaIssue>),
    #[error("metadata could not be read as an agenda document: {0}")]
    Unreadable(String),
    #[error("{0}")]
    Consistency(String),
    #[error(transparent)]
    Temporal(#[from] TimestampError),
    #[error("{0}")]
    Cryptographic(String),
    #[error(transparent)]
    OnChain(#[from] CrossCheckError),
    #[error("{0}")]
    Mismatch(String),
}
