//! Transaction queue management for hayashi.
//!
//! The herder sits between the network and the ledger: it accumulates
//! submitted transactions, keeps them valid against the last-closed ledger,
//! and proposes candidate transaction sets for the next one. This crate
//! provides the pending-transaction side of that job:
//!
//! - [`TransactionQueue`] - the bounded, per-account-ordered admission
//!   queue: validation, replace-by-fee, fee reservations, aging, and
//!   banning
//! - [`TxSetFrame`] - candidate transaction sets in canonical hash order
//! - [`LedgerView`] - the read-only ledger capability the queue validates
//!   against
//! - [`Counter`] / [`MetricsRegistry`] - queue observability
//!
//! # Lifecycle
//!
//! The embedding node drives the queue once per closed ledger, on a single
//! thread:
//!
//! 1. [`TransactionQueue::remove_applied`] with the transactions the ledger
//!    just applied
//! 2. [`TransactionQueue::shift`] to age the remainder and rotate bans
//! 3. [`TransactionQueue::maybe_version_upgraded`] to rebuild envelopes
//!    across a protocol upgrade
//!
//! Between closes, [`TransactionQueue::try_add`] admits submissions and
//! [`TransactionQueue::to_tx_set`] proposes the next candidate set.

pub mod error;
pub mod ledger_view;
pub mod metrics;
pub mod tx_queue;

pub use error::{HerderError, Result};
pub use ledger_view::{LedgerHeader, LedgerView};
pub use metrics::{Counter, InMemoryMetrics, MetricsRegistry};
pub use tx_queue::{
    AccountTxQueueInfo, AddResult, ReplacedTransaction, TransactionQueue, TxQueueConfig,
    TxSetFrame, FEE_MULTIPLIER,
};
