//! Bank-side core of a money-movement bridge.
//!
//! An external transaction orchestrator stages transfer instructions and
//! drives each leg through a three-phase prepare/commit/abort handshake.
//! This crate implements the bank's half:
//!
//! - [`ledger`] - the in-memory account ledger with idempotent
//!   credit/debit/hold/release operations and an append-only transaction log
//! - [`gateway`] - pure validation of the wire-level transfer entry
//!   (address grammar, minor-unit amount, currency symbol)
//! - [`adapters`] - the inbound (credit) and outbound (debit) protocol state
//!   machines, including the hold/release/debit compensation sequence
//!
//! ```
//! use ledger_bridge::adapters::{BankAdapter, DebitAdapter, TransferContext, TransferEntry};
//! use ledger_bridge::gateway::Gateway;
//! use ledger_bridge::ledger::Ledger;
//! use rust_decimal::Decimal;
//!
//! let mut ledger = Ledger::new();
//! ledger.open_account("2");
//! ledger.credit("2", Decimal::from(70), None);
//!
//! let adapter = DebitAdapter::new(Gateway::default());
//! let context = TransferContext {
//!     entry: TransferEntry {
//!         schema: "debit".to_owned(),
//!         handle: "leg-1".to_owned(),
//!         amount: 5000,
//!         symbol: "cop".to_owned(),
//!         target: "other:payee@remote".to_owned(),
//!         source: "svgs:2@bbva".to_owned(),
//!     },
//!     previous: None,
//! };
//!
//! let prepared = adapter.prepare(&mut ledger, &context);
//! assert_eq!(prepared.status, ledger_bridge::ResultStatus::Prepared);
//!
//! let committed = adapter.commit(&mut ledger, &context);
//! assert_eq!(committed.status, ledger_bridge::ResultStatus::Committed);
//! assert_eq!(ledger.balance("2").unwrap(), Decimal::from(20));
//! ```

pub mod adapters;
pub mod gateway;
pub mod ledger;

pub use adapters::{BankAdapter, CreditAdapter, DebitAdapter, ProtocolResult, ResultStatus};
pub use gateway::{Gateway, GatewayConfig};
pub use ledger::Ledger;
