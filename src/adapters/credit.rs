use super::{idempotency_token, BankAdapter, ProtocolResult, TransferContext};
use crate::gateway::Gateway;
use crate::ledger::Ledger;

/// Inbound-funds state machine: Idle -> Prepared | Failed, then
/// Committed | Aborted | Suspended.
///
/// Unlike the debit flow, no funds are reserved at prepare time: an inbound
/// credit carries no risk of the account coming up short, so the money moves
/// only at commit. Preserve this asymmetry; it is a business rule, not an
/// accident.
pub struct CreditAdapter {
    gateway: Gateway,
}

impl CreditAdapter {
    pub fn new(gateway: Gateway) -> Self {
        Self { gateway }
    }
}

impl BankAdapter for CreditAdapter {
    /// Validate the entry and check the target account exists and is active.
    /// No ledger record is created.
    fn prepare(&self, ledger: &mut Ledger, context: &TransferContext) -> ProtocolResult {
        log::trace!("[credit/prepare] handle={}", context.entry.handle);

        let validated = match self.gateway.validate_entry(&context.entry) {
            Ok(validated) => validated,
            Err(e) => return ProtocolResult::failed(e.to_string()),
        };

        let account = match ledger.get_account(&validated.address.account) {
            Ok(account) => account,
            Err(e) => return ProtocolResult::failed(e.to_string()),
        };
        if let Err(e) = account.assert_is_active() {
            return ProtocolResult::failed(e.to_string());
        }

        ProtocolResult::prepared()
    }

    /// Re-validate and credit the target account under the leg's credit
    /// token. Anything short of a COMPLETED record is Suspended: the
    /// orchestrator must not assume no effect occurred.
    fn commit(&self, ledger: &mut Ledger, context: &TransferContext) -> ProtocolResult {
        log::trace!("[credit/commit] handle={}", context.entry.handle);

        let validated = match self.gateway.validate_entry(&context.entry) {
            Ok(validated) => validated,
            Err(e) => {
                log::warn!("[credit/commit] handle={} suspended: {e}", context.entry.handle);
                return ProtocolResult::suspended();
            }
        };

        let token = idempotency_token(&context.entry.handle, "credit");
        let transaction = ledger.credit(&validated.address.account, validated.amount, Some(&token));
        if !transaction.is_completed() {
            log::warn!(
                "[credit/commit] handle={} suspended: {}",
                context.entry.handle,
                transaction.error_reason.as_deref().unwrap_or("credit not completed")
            );
            return ProtocolResult::suspended();
        }

        ProtocolResult::committed(transaction.id)
    }

    /// Nothing to undo: prepare reserved no funds, so abort is unconditional.
    fn abort(&self, _ledger: &mut Ledger, context: &TransferContext) -> ProtocolResult {
        log::trace!("[credit/abort] handle={}", context.entry.handle);
        ProtocolResult::aborted()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::{ResultStatus, TransferEntry};
    use rust_decimal_macros::dec;

    fn context(account: &str, amount: i64) -> TransferContext {
        TransferContext {
            entry: TransferEntry {
                schema: "credit".to_owned(),
                handle: "credit-leg-1".to_owned(),
                amount,
                symbol: "cop".to_owned(),
                target: format!("svgs:{account}@bbva"),
                source: "other:payer@remote".to_owned(),
            },
            previous: None,
        }
    }

    fn adapter() -> CreditAdapter {
        CreditAdapter::new(Gateway::default())
    }

    #[test]
    fn test_prepare_moves_no_funds() {
        let mut ledger = Ledger::new();
        ledger.open_account("1");

        let result = adapter().prepare(&mut ledger, &context("1", 5000));
        assert_eq!(result.status, ResultStatus::Prepared);
        assert_eq!(result.core_id, None);
        assert_eq!(ledger.balance("1").unwrap(), dec!(0));
        assert_eq!(ledger.transaction_count(), 0);
    }

    #[test]
    fn test_prepare_fails_on_unknown_account() {
        let mut ledger = Ledger::new();

        let result = adapter().prepare(&mut ledger, &context("9", 5000));
        assert_eq!(result.status, ResultStatus::Failed);
        assert_eq!(
            result.error.unwrap().detail,
            "Account 9 does not exist"
        );
    }

    #[test]
    fn test_prepare_fails_on_inactive_account() {
        let mut ledger = Ledger::new();
        ledger.open_account("4");
        ledger.inactivate("4").unwrap();

        let result = adapter().prepare(&mut ledger, &context("4", 5000));
        assert_eq!(result.status, ResultStatus::Failed);
        assert_eq!(result.error.unwrap().detail, "Account 4 is inactive");
    }

    #[test]
    fn test_prepare_fails_on_validation_error() {
        let mut ledger = Ledger::new();
        let mut context = context("1", 5000);
        context.entry.symbol = "usd".to_owned();

        let result = adapter().prepare(&mut ledger, &context);
        assert_eq!(result.status, ResultStatus::Failed);
        assert_eq!(result.error.unwrap().detail, "Symbol cop expected, got usd");
    }

    #[test]
    fn test_commit_credits_account() {
        let mut ledger = Ledger::new();
        ledger.open_account("1");

        let result = adapter().commit(&mut ledger, &context("1", 5000));
        assert_eq!(result.status, ResultStatus::Committed);
        assert!(result.core_id.is_some());
        assert_eq!(ledger.balance("1").unwrap(), dec!(50));
    }

    #[test]
    fn test_commit_is_idempotent_per_handle() {
        let mut ledger = Ledger::new();
        ledger.open_account("1");
        let context = context("1", 5000);

        let first = adapter().commit(&mut ledger, &context);
        let second = adapter().commit(&mut ledger, &context);

        assert_eq!(first, second);
        assert_eq!(ledger.balance("1").unwrap(), dec!(50));
        assert_eq!(ledger.transaction_count(), 1);
    }

    #[test]
    fn test_commit_suspends_on_inactive_account() {
        let mut ledger = Ledger::new();
        ledger.open_account("4");
        ledger.inactivate("4").unwrap();

        let result = adapter().commit(&mut ledger, &context("4", 5000));
        assert_eq!(result.status, ResultStatus::Suspended);
        assert_eq!(result.error, None);
    }

    #[test]
    fn test_commit_suspends_on_validation_error() {
        let mut ledger = Ledger::new();
        ledger.open_account("1");
        let mut context = context("1", 5000);
        context.entry.target = "svgs:1@other".to_owned();

        let result = adapter().commit(&mut ledger, &context);
        assert_eq!(result.status, ResultStatus::Suspended);
    }

    #[test]
    fn test_abort_is_unconditional() {
        let mut ledger = Ledger::new();

        // no account, malformed entry, still Aborted
        let mut context = context("9", -1);
        context.entry.target = String::new();

        let result = adapter().abort(&mut ledger, &context);
        assert_eq!(result.status, ResultStatus::Aborted);
        assert_eq!(result.core_id, None);
        assert_eq!(ledger.transaction_count(), 0);
    }
}
