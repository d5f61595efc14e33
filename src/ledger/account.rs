use super::error::LedgerError;
use super::Decimal;
use serde::{Serialize, Serializer};

pub type AccountId = String;

/// Serialize Decimal with exactly 2 decimal places (major currency units)
fn serialize_decimal_2dp<S: Serializer>(value: &Decimal, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&format!("{value:.2}"))
}

/// A bank account with settled and reserved funds.
///
/// `balance` is settled money; `on_hold` is money reserved for an in-flight
/// outbound transfer. Available balance is the difference. Invariants held
/// at every observed state: `on_hold <= balance` and available is never
/// negative. Accounts are never deleted, only deactivated.
#[derive(Debug, Serialize, PartialEq)]
pub struct Account {
    id: AccountId,
    active: bool,
    #[serde(serialize_with = "serialize_decimal_2dp")]
    balance: Decimal,
    #[serde(rename = "onHold", serialize_with = "serialize_decimal_2dp")]
    on_hold: Decimal,
}

impl Account {
    pub(super) fn new(id: AccountId) -> Self {
        Self {
            id,
            active: true,
            balance: Decimal::ZERO,
            on_hold: Decimal::ZERO,
        }
    }

    /// Returns the account ID
    pub fn id(&self) -> &AccountId {
        &self.id
    }

    /// Returns the settled balance
    pub fn balance(&self) -> Decimal {
        self.balance
    }

    /// Returns the amount currently reserved
    pub fn on_hold(&self) -> Decimal {
        self.on_hold
    }

    /// Returns the balance available for debits and holds
    pub fn available_balance(&self) -> Decimal {
        self.balance - self.on_hold
    }

    /// Returns whether the account accepts mutating operations
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Fails with [`LedgerError::InactiveAccount`] unless the account is active.
    pub fn assert_is_active(&self) -> Result<(), LedgerError> {
        if self.active {
            Ok(())
        } else {
            Err(LedgerError::InactiveAccount(self.id.clone()))
        }
    }

    /// Add settled funds. No upper bound; inactive accounts reject credits too.
    pub(super) fn credit(&mut self, amount: Decimal) -> Result<(), LedgerError> {
        self.assert_is_active()?;
        self.balance += amount;
        self.normalize();
        #[cfg(debug_assertions)]
        self.assert_invariant();
        Ok(())
    }

    /// Remove settled funds. Requires `available_balance() >= amount`.
    pub(super) fn debit(&mut self, amount: Decimal) -> Result<(), LedgerError> {
        self.assert_is_active()?;
        if self.available_balance() < amount {
            return Err(LedgerError::InsufficientBalance(self.id.clone()));
        }
        self.balance -= amount;
        self.normalize();
        #[cfg(debug_assertions)]
        self.assert_invariant();
        Ok(())
    }

    /// Reserve funds for an in-flight transfer. Requires
    /// `available_balance() >= amount`, so holds can never overdraw.
    pub(super) fn hold(&mut self, amount: Decimal) -> Result<(), LedgerError> {
        self.assert_is_active()?;
        if self.available_balance() < amount {
            return Err(LedgerError::InsufficientBalance(self.id.clone()));
        }
        self.on_hold += amount;
        self.normalize();
        #[cfg(debug_assertions)]
        self.assert_invariant();
        Ok(())
    }

    /// Free previously reserved funds. Requires `on_hold >= amount`.
    pub(super) fn release(&mut self, amount: Decimal) -> Result<(), LedgerError> {
        self.assert_is_active()?;
        if self.on_hold < amount {
            return Err(LedgerError::InsufficientHold(self.id.clone()));
        }
        self.on_hold -= amount;
        self.normalize();
        #[cfg(debug_assertions)]
        self.assert_invariant();
        Ok(())
    }

    pub(super) fn set_active(&mut self, active: bool) {
        self.active = active;
    }

    /// Assert the fundamental accounting invariants:
    /// on_hold <= balance
    /// available = balance - on_hold >= 0
    #[cfg(debug_assertions)]
    fn assert_invariant(&self) {
        debug_assert!(
            self.on_hold <= self.balance,
            "Invariant violated: on_hold ({}) > balance ({}) in account {}",
            self.on_hold,
            self.balance,
            self.id
        );
        debug_assert!(
            self.available_balance() >= Decimal::ZERO,
            "Invariant violated: available balance ({}) negative in account {}",
            self.available_balance(),
            self.id
        );
    }

    /// Normalize all decimal fields to trim trailing zeros.
    /// Keeps internal representation compact and consistent.
    fn normalize(&mut self) {
        self.balance = self.balance.normalize();
        self.on_hold = self.on_hold.normalize();
    }
}
