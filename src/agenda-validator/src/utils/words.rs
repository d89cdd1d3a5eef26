//! Big-endian 32-byte word access over raw ABI payloads.
//!
//! Used by the offset heuristic, which inspects head words without a full decode.

use alloy_primitives::U256;

pub const WORD: usize = 32;

/// Word `index` of the payload head, or `None` if the payload is too short.
pub fn word_at(bytes: &[u8], index: usize) -> Option<U256> {
    let start = index.checked_mul(WORD)?;
    let end = start.checked_add(WORD)?;
    if bytes.len() < end {
        return None;
    }
    Some(U256::from_be_slice(&bytes[start..end]))
}

/// Word `index` interpreted as a byte offset; `None` if absent or wider than `usize`.
pub fn offset_at(bytes: &[u8], index: usize) -> Option<usize> {
    let word = word_at(bytes, index)?;
    if word > U256::from(usize::MAX) {
        return None;
    }
    Some(word.to::<usize>())
}
