use super::account::AccountId;

/// Business errors raised while applying a ledger operation.
///
/// The original core modeled these as an error-class hierarchy with a
/// numeric code on a shared base; here they are a closed enum and the code
/// lives in [`LedgerError::code`]. Callers match on the variant, not on
/// type identity.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LedgerError {
    #[error("Insufficient available balance in account {0}")]
    InsufficientBalance(AccountId),

    #[error("Insufficient balance on hold in account {0}")]
    InsufficientHold(AccountId),

    #[error("Account {0} is inactive")]
    InactiveAccount(AccountId),

    #[error("Account {0} does not exist")]
    UnknownAccount(AccountId),
}

impl LedgerError {
    /// Stable numeric code recorded on FAILED transactions ("100" is the
    /// family base and never appears on its own).
    pub fn code(&self) -> &'static str {
        match self {
            LedgerError::InsufficientBalance(_) | LedgerError::InsufficientHold(_) => "101",
            LedgerError::InactiveAccount(_) => "102",
            LedgerError::UnknownAccount(_) => "103",
        }
    }
}
