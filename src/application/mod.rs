//! Application layer containing the group ledger orchestration.
//!
//! `GroupLedger` owns the storage backend, validates mutations and recomputes
//! balances through the domain `SettlementEngine`.

pub mod ledger;
