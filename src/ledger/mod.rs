//! Ledger engine module.
//!
//! This module contains the authoritative account store including:
//! - `Ledger` - accounts plus an append-only transaction log
//! - `Account` - balance / on-hold state with its invariants
//! - `Transaction` types - the CREDIT/DEBIT/HOLD/RELEASE records
//! - `LedgerError` - the closed business-error taxonomy

mod account;
mod engine;
mod error;
mod transaction;

pub(crate) use rust_decimal::Decimal;

pub use account::{Account, AccountId};
pub use engine::Ledger;
pub use error::LedgerError;
pub use transaction::{Transaction, TransactionKind, TransactionStatus, TxId};
