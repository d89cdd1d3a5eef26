//! Solidity ABI surface touched by agenda creation: the TON `approveAndCall` envelope, the DAO
//! `AgendaCreated` event and the two historical encodings of the agenda parameters.

pub mod interfaces;

pub use interfaces::{approveAndCallCall, AgendaCreated, LegacyAgendaParams, MemoAgendaParams};
