//! Shared types for agenda metadata documents (submission format, networks).

pub mod metadata;
pub mod network;

pub use metadata::{AbiItem, AbiParam, Action, AgendaMetadata, Creator};
pub use network::{Network, UnknownNetwork};
