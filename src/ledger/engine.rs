use std::collections::HashMap;

use super::account::{Account, AccountId};
use super::error::LedgerError;
use super::transaction::{Transaction, TransactionKind, TransactionStatus, TxId};
use super::Decimal;

/// The core account ledger.
///
/// Owns the authoritative account table and an append-only transaction log,
/// and exposes idempotent credit/debit/hold/release operations over them.
/// Construct one explicitly and pass it where it is needed; there is no
/// process-wide instance, so independent ledgers (per test, per tenant) can
/// coexist.
///
/// The ledger is a plain `&mut self` store with no internal locking: every
/// operation runs to completion before returning, and exclusive access is
/// the caller's responsibility (a `&mut Ledger` cannot be shared across
/// concurrent writers).
#[derive(Debug, Default)]
pub struct Ledger {
    /// Maps account ID to its state
    accounts: HashMap<AccountId, Account>,
    /// Append-only transaction log, in creation order
    transactions: Vec<Transaction>,
    /// Next transaction id; always equals the number of records created
    next_id: TxId,
}

impl Ledger {
    /// Create an empty `Ledger` with no accounts and no transactions
    pub fn new() -> Self {
        log::trace!("Ledger initialized");
        Self::default()
    }

    /// Open an active account with zero balance. Opening an id that already
    /// exists leaves the existing account untouched.
    pub fn open_account(&mut self, id: impl Into<AccountId>) {
        let id = id.into();
        if self.accounts.contains_key(&id) {
            log::debug!("[open] account {id} already exists, left untouched");
            return;
        }
        log::debug!("[open] created account {id}");
        self.accounts.insert(id.clone(), Account::new(id));
    }

    /// Look up an account, failing with [`LedgerError::UnknownAccount`].
    pub fn get_account(&self, id: &str) -> Result<&Account, LedgerError> {
        self.accounts
            .get(id)
            .ok_or_else(|| LedgerError::UnknownAccount(id.to_owned()))
    }

    /// Add settled funds to an account.
    pub fn credit(&mut self, id: &str, amount: Decimal, token: Option<&str>) -> Transaction {
        self.process_transaction(TransactionKind::Credit, id, amount, token)
    }

    /// Remove settled funds from an account.
    pub fn debit(&mut self, id: &str, amount: Decimal, token: Option<&str>) -> Transaction {
        self.process_transaction(TransactionKind::Debit, id, amount, token)
    }

    /// Reserve funds on an account, excluding them from the available balance.
    pub fn hold(&mut self, id: &str, amount: Decimal, token: Option<&str>) -> Transaction {
        self.process_transaction(TransactionKind::Hold, id, amount, token)
    }

    /// Free previously reserved funds.
    pub fn release(&mut self, id: &str, amount: Decimal, token: Option<&str>) -> Transaction {
        self.process_transaction(TransactionKind::Release, id, amount, token)
    }

    /// Re-enable a deactivated account.
    pub fn activate(&mut self, id: &str) -> Result<(), LedgerError> {
        self.account_mut(id)?.set_active(true);
        log::debug!("[activate] account {id}");
        Ok(())
    }

    /// Deactivate an account. Every subsequent mutating operation on it
    /// fails, inbound credits included.
    pub fn inactivate(&mut self, id: &str) -> Result<(), LedgerError> {
        self.account_mut(id)?.set_active(false);
        log::debug!("[inactivate] account {id}");
        Ok(())
    }

    fn account_mut(&mut self, id: &str) -> Result<&mut Account, LedgerError> {
        self.accounts
            .get_mut(id)
            .ok_or_else(|| LedgerError::UnknownAccount(id.to_owned()))
    }

    /// Apply one operation, recording it on the log.
    ///
    /// If `token` matches an existing record's idempotency token, that record
    /// is returned unchanged and nothing is re-executed. The replay does not
    /// re-check kind/account/amount against the original request. Otherwise a
    /// PENDING record is created under the next sequential id and finalized
    /// to COMPLETED or FAILED; business errors are captured on the FAILED
    /// record rather than returned, so callers must inspect `status`.
    fn process_transaction(
        &mut self,
        kind: TransactionKind,
        id: &str,
        amount: Decimal,
        token: Option<&str>,
    ) -> Transaction {
        if let Some(token) = token {
            if let Some(existing) = self
                .transactions
                .iter()
                .find(|t| t.idempotency_token.as_deref() == Some(token))
            {
                log::debug!("[{kind}] replayed token {token} -> tx={}", existing.id);
                return existing.clone();
            }
        }

        let tx_id = self.next_id;
        self.next_id += 1;
        let mut transaction = Transaction::pending(
            tx_id,
            kind,
            id.to_owned(),
            amount,
            token.map(str::to_owned),
        );

        let outcome = self.apply(kind, id, amount);
        match outcome {
            Ok(()) => {
                transaction.status = TransactionStatus::Completed;
                log::trace!("[{kind}] account={id} amount={amount} -> tx={tx_id} COMPLETED");
            }
            Err(error) => {
                transaction.error_reason = Some(error.to_string());
                transaction.error_code = Some(error.code().to_owned());
                transaction.status = TransactionStatus::Failed;
                log::debug!("[{kind}] account={id} amount={amount} -> tx={tx_id} FAILED: {error}");
            }
        }

        self.transactions.push(transaction.clone());
        transaction
    }

    fn apply(&mut self, kind: TransactionKind, id: &str, amount: Decimal) -> Result<(), LedgerError> {
        let account = self.account_mut(id)?;
        match kind {
            TransactionKind::Credit => account.credit(amount),
            TransactionKind::Debit => account.debit(amount),
            TransactionKind::Hold => account.hold(amount),
            TransactionKind::Release => account.release(amount),
        }
    }
}

// =============================================================================
// Diagnostics
// =============================================================================

impl Ledger {
    /// Returns the settled balance of an account
    pub fn balance(&self, id: &str) -> Result<Decimal, LedgerError> {
        Ok(self.get_account(id)?.balance())
    }

    /// Returns the balance available for debits and holds
    pub fn available_balance(&self, id: &str) -> Result<Decimal, LedgerError> {
        Ok(self.get_account(id)?.available_balance())
    }

    /// Returns the amount currently reserved on an account
    pub fn on_hold(&self, id: &str) -> Result<Decimal, LedgerError> {
        Ok(self.get_account(id)?.on_hold())
    }

    /// Returns whether an account accepts mutating operations
    pub fn is_active(&self, id: &str) -> Result<bool, LedgerError> {
        Ok(self.get_account(id)?.is_active())
    }

    /// All transactions touching an account, in creation order
    pub fn account_transactions(&self, id: &str) -> Vec<&Transaction> {
        self.transactions.iter().filter(|t| t.account == id).collect()
    }

    /// Number of records created so far
    pub fn transaction_count(&self) -> usize {
        self.transactions.len()
    }
}
