use super::{idempotency_token, BankAdapter, ProtocolResult, ResultStatus, TransferContext};
use crate::gateway::Gateway;
use crate::ledger::Ledger;

/// Outbound-funds state machine: Idle -> Prepared | Failed, then
/// Committed | Aborted | Suspended.
///
/// Funds are reserved at prepare time with a hold, so the orchestrator has
/// assurance the money exists before the transfer proceeds. Commit then
/// releases the hold and debits; abort compensates with a release.
pub struct DebitAdapter {
    gateway: Gateway,
}

impl DebitAdapter {
    pub fn new(gateway: Gateway) -> Self {
        Self { gateway }
    }
}

impl BankAdapter for DebitAdapter {
    /// Validate the entry and reserve the amount under the leg's hold token.
    fn prepare(&self, ledger: &mut Ledger, context: &TransferContext) -> ProtocolResult {
        log::trace!("[debit/prepare] handle={}", context.entry.handle);

        let validated = match self.gateway.validate_entry(&context.entry) {
            Ok(validated) => validated,
            Err(e) => return ProtocolResult::failed(e.to_string()),
        };

        let token = idempotency_token(&context.entry.handle, "hold");
        let transaction = ledger.hold(&validated.address.account, validated.amount, Some(&token));
        if !transaction.is_completed() {
            let detail = transaction
                .error_reason
                .clone()
                .unwrap_or_else(|| "hold not completed".to_owned());
            return ProtocolResult::failed(detail);
        }

        ProtocolResult::prepared_with(transaction.id)
    }

    /// Release the hold, then debit; release must come first because the
    /// amount is parked in on-hold and cannot be subtracted from the balance
    /// until freed. Any shortfall on either step is Suspended, never Failed.
    fn commit(&self, ledger: &mut Ledger, context: &TransferContext) -> ProtocolResult {
        log::trace!("[debit/commit] handle={}", context.entry.handle);
        let handle = &context.entry.handle;

        let validated = match self.gateway.validate_entry(&context.entry) {
            Ok(validated) => validated,
            Err(e) => {
                log::warn!("[debit/commit] handle={handle} suspended: {e}");
                return ProtocolResult::suspended();
            }
        };
        let account = &validated.address.account;

        let release_token = idempotency_token(handle, "release");
        let release = ledger.release(account, validated.amount, Some(&release_token));
        if !release.is_completed() {
            log::warn!(
                "[debit/commit] handle={handle} suspended: {}",
                release.error_reason.as_deref().unwrap_or("release not completed")
            );
            return ProtocolResult::suspended();
        }

        let debit_token = idempotency_token(handle, "debit");
        let debit = ledger.debit(account, validated.amount, Some(&debit_token));
        if !debit.is_completed() {
            log::warn!(
                "[debit/commit] handle={handle} suspended: {}",
                debit.error_reason.as_deref().unwrap_or("debit not completed")
            );
            return ProtocolResult::suspended();
        }

        ProtocolResult::committed(debit.id)
    }

    /// Best-effort compensation. Only a leg whose prepare was recorded as
    /// Prepared has a hold to undo; in that case release it under the leg's
    /// release token. Every failure on this path is swallowed and the call
    /// still reports Aborted; the dropped detail goes to the log so operators
    /// can see compensations that did not stick.
    fn abort(&self, ledger: &mut Ledger, context: &TransferContext) -> ProtocolResult {
        log::trace!("[debit/abort] handle={}", context.entry.handle);
        let handle = &context.entry.handle;

        let validated = match self.gateway.validate_entry(&context.entry) {
            Ok(validated) => validated,
            Err(e) => {
                log::warn!("[debit/abort] handle={handle} aborted without compensation: {e}");
                return ProtocolResult::aborted();
            }
        };

        if context.previous != Some(ResultStatus::Prepared) {
            // prepare never reserved funds, nothing to compensate
            return ProtocolResult::aborted();
        }

        let token = idempotency_token(handle, "release");
        let release = ledger.release(&validated.address.account, validated.amount, Some(&token));
        if !release.is_completed() {
            log::warn!(
                "[debit/abort] handle={handle} compensation failed: {}",
                release.error_reason.as_deref().unwrap_or("release not completed")
            );
            return ProtocolResult::aborted();
        }

        ProtocolResult::aborted_with(release.id)
    }
}
