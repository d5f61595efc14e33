use super::account::AccountId;
use super::Decimal;
use serde::Serialize;

pub type TxId = u64;

/// The four ledger operations.
#[derive(Debug, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum TransactionKind {
    Credit,
    Debit,
    Hold,
    Release,
}

impl std::fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TransactionKind::Credit => write!(f, "CREDIT"),
            TransactionKind::Debit => write!(f, "DEBIT"),
            TransactionKind::Hold => write!(f, "HOLD"),
            TransactionKind::Release => write!(f, "RELEASE"),
        }
    }
}

/// Lifecycle of a ledger record. PENDING is transient within one processing
/// step; a record is immutable once COMPLETED or FAILED.
#[derive(Debug, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum TransactionStatus {
    Pending,
    Completed,
    Failed,
}

impl std::fmt::Display for TransactionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TransactionStatus::Pending => write!(f, "PENDING"),
            TransactionStatus::Completed => write!(f, "COMPLETED"),
            TransactionStatus::Failed => write!(f, "FAILED"),
        }
    }
}

/// One record in the ledger's append-only transaction log.
///
/// Created once per processed request. A FAILED record carries the business
/// error's message and code; the error itself never escapes the ledger.
#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct Transaction {
    pub id: TxId,
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    pub account: AccountId,
    pub amount: Decimal,
    pub status: TransactionStatus,
    #[serde(rename = "idempotencyToken")]
    pub idempotency_token: Option<String>,
    #[serde(rename = "errorReason")]
    pub error_reason: Option<String>,
    #[serde(rename = "errorCode")]
    pub error_code: Option<String>,
}

impl Transaction {
    pub(super) fn pending(
        id: TxId,
        kind: TransactionKind,
        account: AccountId,
        amount: Decimal,
        idempotency_token: Option<String>,
    ) -> Self {
        Self {
            id,
            kind,
            account,
            amount,
            status: TransactionStatus::Pending,
            idempotency_token,
            error_reason: None,
            error_code: None,
        }
    }

    /// Whether the operation took effect.
    pub fn is_completed(&self) -> bool {
        self.status == TransactionStatus::Completed
    }
}

impl std::fmt::Display for Transaction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[{}] tx={} account={} amount={} status={}",
            self.kind, self.id, self.account, self.amount, self.status
        )?;
        if let Some(reason) = &self.error_reason {
            write!(f, " error={reason}")?;
        }
        Ok(())
    }
}
