//! Read access to the last-closed ledger.

use hayashi_common::{AccountId, Hash256};
use hayashi_tx::TransactionFrame;

/// Header of the last-closed ledger, as the queueing layer sees it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LedgerHeader {
    /// Hash of this header.
    pub hash: Hash256,
    /// Sequence number of the ledger this header closed.
    pub ledger_seq: u32,
    /// Protocol version in force.
    pub ledger_version: u32,
    /// Maximum total operations a single transaction set may carry.
    pub max_tx_set_size_ops: u32,
}

/// Trait for reading ledger state during transaction queue operations.
///
/// Implementations validate candidate transactions against the last-closed
/// ledger and answer balance lookups. All calls are synchronous; the queue
/// runs on the herder thread and never suspends.
pub trait LedgerView {
    /// Validate `tx` against the last-closed ledger.
    ///
    /// `prior_seq` is the sequence number the transaction should follow:
    /// the tail of the account's pending queue, or 0 to check against the
    /// account's current sequence in the ledger. On failure the
    /// implementation records the reason via
    /// [`TransactionFrame::set_result_code`] and returns `false`.
    fn check_valid(&self, tx: &TransactionFrame, prior_seq: i64) -> bool;

    /// Get the balance an account can spend on fees, net of reserves, or
    /// `None` if the account does not exist.
    fn available_balance(&self, account: &AccountId) -> Option<i64>;

    /// The last-closed ledger header.
    fn last_closed_header(&self) -> LedgerHeader;
}
