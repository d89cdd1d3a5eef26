//! Shared helpers: secp256k1 recovery, ABI word access, display formatting.

pub mod crypto;
pub mod display;
pub mod words;
