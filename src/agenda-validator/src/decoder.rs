//! Decoding of agenda creation calldata and the `AgendaCreated` event.
//!
//! Agenda parameters reach the DAO as the `data` argument of `TON.approveAndCall`. Two
//! encodings exist on-chain: the legacy 5-tuple and the newer 6-tuple carrying a trailing memo.
//! The offset heuristic classifies a payload first; strict decoding then extracts the fields,
//! trying the classified version before the other.

use alloy_primitives::{Address, Bytes, U256};
use alloy_sol_types::{SolCall, SolEvent, SolType};
use tracing::debug;

use crate::{
    abi::{approveAndCallCall, AgendaCreated, LegacyAgendaParams, MemoAgendaParams},
    chain::ChainLog,
    errors::DecodeError,
    utils::{
        display::display_value,
        words::{offset_at, WORD},
    },
};

/// Shortest payload with a complete five-word head.
const MIN_HEAD_BYTES: usize = 5 * WORD;
/// Head size of the 6-tuple; a memo offset must point past it.
const MEMO_HEAD_BYTES: usize = 6 * WORD;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EncodingVersion {
    Legacy,
    New,
    Unknown,
}

/// Outer `approveAndCall(address,uint256,bytes)` arguments.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ApproveAndCall {
    pub spender: Address,
    pub amount: U256,
    pub data: Bytes,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DecodedAgendaParams {
    pub targets: Vec<Address>,
    pub notice_period: u128,
    pub voting_period: u128,
    pub atomic_execute: bool,
    pub calldatas: Vec<Bytes>,
    /// Present only for the newer encoding.
    pub memo: Option<String>,
    /// Encoding that decoded successfully (never `Unknown`).
    pub version: EncodingVersion,
}

/// Classify an agenda payload by its head offsets without decoding it.
///
/// Best effort only: a `New`/`Legacy` verdict still has to be confirmed by decoding.
pub fn detect_version_by_offset(payload: &[u8]) -> EncodingVersion {
    let len = payload.len();
    if len < MIN_HEAD_BYTES {
        return EncodingVersion::Unknown;
    }

    // Sixth head word: the memo offset in the new encoding, the targets length in the legacy one.
    if let Some(memo_offset) = offset_at(payload, 5) {
        if memo_offset > MEMO_HEAD_BYTES && memo_offset < len {
            return EncodingVersion::New;
        }
    }

    match offset_at(payload, 4) {
        Some(calldatas_offset) if calldatas_offset < len => EncodingVersion::Legacy,
        _ => EncodingVersion::Unknown,
    }
}

pub fn decode_hex(data: &str) -> Result<Vec<u8>, DecodeError> {
    let raw = data.strip_prefix("0x").unwrap_or(data);
    hex::decode(raw).map_err(|e| DecodeError::Hex(e.to_string()))
}

pub fn decode_approve_and_call(input: &[u8]) -> Result<ApproveAndCall, DecodeError> {
    let call = approveAndCallCall::abi_decode(input, false)
        .map_err(|e| DecodeError::OuterCall(e.to_string()))?;
    Ok(ApproveAndCall {
        spender: call.spender,
        amount: call.amount,
        data: call.data,
    })
}

fn decode_legacy(payload: &[u8]) -> Result<DecodedAgendaParams, String> {
    let (targets, notice_period, voting_period, atomic_execute, calldatas) =
        LegacyAgendaParams::abi_decode_params(payload, true).map_err(|e| e.to_string())?;
    Ok(DecodedAgendaParams {
        targets,
        notice_period,
        voting_period,
        atomic_execute,
        calldatas,
        memo: None,
        version: EncodingVersion::Legacy,
    })
}

fn decode_with_memo(payload: &[u8]) -> Result<DecodedAgendaParams, String> {
    let (targets, notice_period, voting_period, atomic_execute, calldatas, memo) =
        MemoAgendaParams::abi_decode_params(payload, true).map_err(|e| e.to_string())?;
    Ok(DecodedAgendaParams {
        targets,
        notice_period,
        voting_period,
        atomic_execute,
        calldatas,
        memo: Some(memo),
        version: EncodingVersion::New,
    })
}

/// Decode the inner agenda parameters, trying the heuristically detected encoding first.
///
/// Decoding is strict (the payload must re-encode byte for byte), so new-format data is never
/// accepted as legacy with its memo silently dropped.
pub fn decode_agenda_params(payload: &[u8]) -> Result<DecodedAgendaParams, DecodeError> {
    let detected = detect_version_by_offset(payload);
    debug!(?detected, len = payload.len(), "classified agenda payload");

    let (legacy, new) = if detected == EncodingVersion::New {
        match decode_with_memo(payload) {
            Ok(params) => return Ok(params),
            Err(new_err) => match decode_legacy(payload) {
                Ok(params) => return Ok(params),
                Err(legacy_err) => (legacy_err, new_err),
            },
        }
    } else {
        match decode_legacy(payload) {
            Ok(params) => return Ok(params),
            Err(legacy_err) => match decode_with_memo(payload) {
                Ok(params) => return Ok(params),
                Err(new_err) => (legacy_err, new_err),
            },
        }
    };
    Err(DecodeError::AgendaParams { legacy, new })
}

/// Find and decode the first `AgendaCreated` log.
///
/// `Ok(None)` if no log carries the event topic; `Err` if one does but cannot be decoded.
pub fn find_agenda_created(logs: &[ChainLog]) -> Result<Option<AgendaCreated>, DecodeError> {
    let Some(log) = logs
        .iter()
        .find(|l| l.topics.first() == Some(&AgendaCreated::SIGNATURE_HASH))
    else {
        return Ok(None);
    };

    AgendaCreated::decode_raw_log(log.topics.iter().copied(), &log.data, true)
        .map(Some)
        .map_err(|e| DecodeError::Event(e.to_string()))
}

/// Decoding seam of the cross-validator; injected at construction instead of living in a global.
pub trait AgendaDecoder: Send + Sync {
    fn decode_outer_call(&self, input: &[u8]) -> Result<ApproveAndCall, DecodeError>;

    fn decode_agenda_params(&self, payload: &[u8]) -> Result<DecodedAgendaParams, DecodeError>;

    fn find_agenda_created(&self, logs: &[ChainLog]) -> Result<Option<AgendaCreated>, DecodeError>;

    /// Outer call then inner parameters.
    fn decode_transaction_input(&self, input: &[u8]) -> Result<DecodedAgendaParams, DecodeError> {
        let outer = self.decode_outer_call(input)?;
        let params = self.decode_agenda_params(&outer.data)?;
        debug!(
            targets = params.targets.len(),
            notice_period = %display_value(&params.notice_period.to_string()),
            voting_period = %display_value(&params.voting_period.to_string()),
            memo = ?params.memo.as_deref().map(display_value),
            "decoded agenda parameters"
        );
        Ok(params)
    }
}

/// Decoder over the static `sol!` definitions in [`crate::abi`].
#[derive(Clone, Copy, Debug, Default)]
pub struct SolAgendaDecoder;

impl AgendaDecoder for SolAgendaDecoder {
    fn decode_outer_call(&self, input: &[u8]) -> Result<ApproveAndCall, DecodeError> {
        decode_approve_and_call(input)
    }

    fn decode_agenda_params(&self, payload: &[u8]) -> Result<DecodedAgendaParams, DecodeError> {
        decode_agenda_params(payload)
    }

    fn find_agenda_created(&self, logs: &[ChainLog]) -> Result<Option<AgendaCreated>, DecodeError> {
        find_agenda_created(logs)
    }
}
