//! Protocol adapters for the prepare/commit/abort transfer handshake.
//!
//! This module contains the bank-side protocol surface including:
//! - `BankAdapter` - the trait the orchestrator drives, one impl per leg type
//! - `CreditAdapter` / `DebitAdapter` - the inbound and outbound state machines
//! - `TransferContext` / `ProtocolResult` - the wire types exchanged per call
//!
//! All three calls must tolerate orchestrator retries: the adapters derive an
//! idempotency token per ledger operation from the leg's unique handle, so a
//! replayed call observes the recorded transaction instead of re-executing it.

mod credit;
mod debit;

pub use credit::CreditAdapter;
pub use debit::DebitAdapter;

use serde::{Deserialize, Serialize};

use crate::ledger::{Ledger, TxId};

/// The staged transfer instruction for one leg, as received from the
/// orchestrator. `amount` is a positive integer in minor currency units.
#[derive(Debug, Deserialize, Clone)]
pub struct TransferEntry {
    /// Leg type tag ("credit" for inbound, anything else outbound)
    pub schema: String,
    /// Unique handle of this leg; source of the idempotency tokens
    pub handle: String,
    pub amount: i64,
    /// Currency code
    pub symbol: String,
    /// Target address in `[schema:]handle[@parent]` form
    pub target: String,
    /// Source address in `[schema:]handle[@parent]` form
    pub source: String,
}

/// Everything an adapter call gets to see.
#[derive(Debug, Deserialize, Clone)]
pub struct TransferContext {
    pub entry: TransferEntry,
    /// Recorded status of this leg's previous protocol step, if any.
    /// Consumed by the debit flow's abort to decide whether compensation
    /// is needed.
    #[serde(default)]
    pub previous: Option<ResultStatus>,
}

/// Outcome of one protocol call.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub enum ResultStatus {
    Prepared,
    Committed,
    Aborted,
    Failed,
    /// Indeterminate outcome after a commit-phase failure; an effect may
    /// have landed. Requires reconciliation, not blind retry.
    Suspended,
}

/// Machine-facing classification of a Failed result.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum ErrorReason {
    UnexpectedCoreError,
}

/// Error payload carried by Failed results.
#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
pub struct ProtocolError {
    pub reason: ErrorReason,
    pub detail: String,
}

/// Result of a prepare/commit/abort call. Produced fresh on every call and
/// never persisted by the core; recording it is the orchestrator's concern.
#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct ProtocolResult {
    pub status: ResultStatus,
    /// Ledger transaction id backing this step, where one exists
    #[serde(rename = "coreId", skip_serializing_if = "Option::is_none")]
    pub core_id: Option<TxId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ProtocolError>,
}

impl ProtocolResult {
    pub fn prepared() -> Self {
        Self::bare(ResultStatus::Prepared)
    }

    pub fn prepared_with(core_id: TxId) -> Self {
        Self::with_core_id(ResultStatus::Prepared, core_id)
    }

    pub fn committed(core_id: TxId) -> Self {
        Self::with_core_id(ResultStatus::Committed, core_id)
    }

    pub fn aborted() -> Self {
        Self::bare(ResultStatus::Aborted)
    }

    pub fn aborted_with(core_id: TxId) -> Self {
        Self::with_core_id(ResultStatus::Aborted, core_id)
    }

    pub fn suspended() -> Self {
        Self::bare(ResultStatus::Suspended)
    }

    pub fn failed(detail: impl Into<String>) -> Self {
        Self {
            status: ResultStatus::Failed,
            core_id: None,
            error: Some(ProtocolError {
                reason: ErrorReason::UnexpectedCoreError,
                detail: detail.into(),
            }),
        }
    }

    fn bare(status: ResultStatus) -> Self {
        Self {
            status,
            core_id: None,
            error: None,
        }
    }

    fn with_core_id(status: ResultStatus, core_id: TxId) -> Self {
        Self {
            status,
            core_id: Some(core_id),
            error: None,
        }
    }
}

/// One transfer leg's protocol surface, driven by the external orchestrator.
///
/// The orchestrator invokes `prepare` first and later exactly one of
/// `commit` or `abort`, but may retry any call with the same entry. The
/// ledger is injected per call; exclusive access comes from the `&mut`
/// borrow rather than any locking inside the adapters.
pub trait BankAdapter {
    /// Tentatively validate (and for outbound legs, reserve) this leg.
    fn prepare(&self, ledger: &mut Ledger, context: &TransferContext) -> ProtocolResult;

    /// Finalize this leg. Never reports Failed: after this point an effect
    /// may already have landed, so failures collapse to Suspended.
    fn commit(&self, ledger: &mut Ledger, context: &TransferContext) -> ProtocolResult;

    /// Undo this leg, best effort. Always reports Aborted.
    fn abort(&self, ledger: &mut Ledger, context: &TransferContext) -> ProtocolResult;
}

/// Idempotency token for one ledger operation of one leg.
pub(crate) fn idempotency_token(handle: &str, operation: &str) -> String {
    format!("{handle}-{operation}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_result_serializes_without_empty_fields() {
        let json = serde_json::to_string(&ProtocolResult::aborted()).unwrap();
        assert_eq!(json, r#"{"status":"Aborted"}"#);

        let json = serde_json::to_string(&ProtocolResult::committed(7)).unwrap();
        assert_eq!(json, r#"{"status":"Committed","coreId":7}"#);
    }

    #[test]
    fn test_failed_result_carries_reason_and_detail() {
        let result = ProtocolResult::failed("Account 9 does not exist");
        let json = serde_json::to_string(&result).unwrap();
        assert_eq!(
            json,
            r#"{"status":"Failed","error":{"reason":"unexpected-core-error","detail":"Account 9 does not exist"}}"#
        );
    }

    #[test]
    fn test_context_deserializes_with_optional_previous() {
        let entry = r#""entry": {
            "schema": "debit",
            "handle": "leg-7",
            "amount": 5000,
            "symbol": "cop",
            "target": "other:x@remote",
            "source": "svgs:2@bbva"
        }"#;

        let json = format!(r#"{{ {entry}, "previous": "Prepared" }}"#);
        let context: TransferContext = serde_json::from_str(&json).unwrap();
        assert_eq!(context.previous, Some(ResultStatus::Prepared));
        assert_eq!(context.entry.amount, 5000);

        let json = format!("{{ {entry} }}");
        let context: TransferContext = serde_json::from_str(&json).unwrap();
        assert_eq!(context.previous, None);
    }
}
