use alloy_sol_types::{sol, sol_data};

sol! {
    /// TON `approveAndCall`; agenda creation passes the agenda parameters as `data`.
    function approveAndCall(address spender, uint256 amount, bytes data) external returns (bool);

    /// Emitted by the DAO committee when an agenda is created.
    event AgendaCreated(
        address indexed from,
        uint256 indexed id,
        address[] targets,
        uint128 noticePeriodSeconds,
        uint128 votingPeriodSeconds,
        bool atomicExecute
    );
}

/// `(address[] targets, uint128 noticePeriod, uint128 votingPeriod, bool atomicExecute,
/// bytes[] calldatas)`
pub type LegacyAgendaParams = (
    sol_data::Array<sol_data::Address>,
    sol_data::Uint<128>,
    sol_data::Uint<128>,
    sol_data::Bool,
    sol_data::Array<sol_data::Bytes>,
);

/// Legacy parameters followed by a `string memo` (snapshot or discourse URL).
pub type MemoAgendaParams = (
    sol_data::Array<sol_data::Address>,
    sol_data::Uint<128>,
    sol_data::Uint<128>,
    sol_data::Bool,
    sol_data::Array<sol_data::Bytes>,
    sol_data::String,
);
