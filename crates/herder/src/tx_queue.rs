//! Pending-transaction queue.
//!
//! The [`TransactionQueue`] holds transactions waiting to be included in a
//! ledger. It handles:
//!
//! - **Admission**: ban checks, duplicate detection, capacity limits,
//!   validation against the last-closed ledger, and fee-balance checks
//! - **Per-account ordering**: each account's pending transactions form a
//!   contiguous run of sequence numbers; there is no ordering across
//!   accounts
//! - **Replace-by-fee**: a fee-bump can replace a queued transaction at the
//!   same sequence number if it bids at least [`FEE_MULTIPLIER`] times the
//!   old per-operation fee rate
//! - **Fee reservations**: the queue tracks the total fees each account is
//!   liable for, across transactions it pays for on behalf of others
//! - **Aging**: transactions that sit in the queue for `pending_depth`
//!   ledgers are banned and dropped
//! - **Banning**: recently dropped or explicitly invalidated hashes are
//!   refused for `ban_depth` ledgers
//!
//! # Sequence Number Rules
//!
//! For a given account, queued sequence numbers are strictly increasing and
//! gap-free. Removing a transaction from the middle therefore invalidates
//! everything behind it; the lifecycle operations drop and ban such suffixes
//! as a unit.
//!
//! # Threading
//!
//! All operations take `&mut self` and complete synchronously; the herder
//! thread owns the queue and serializes access. Calls out to the
//! [`LedgerView`] are synchronous as well.

use std::collections::{BTreeMap, HashMap, HashSet, VecDeque};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use hayashi_common::protocol::{starting_sequence_number, unified_envelopes_supported};
use hayashi_common::{AccountId, Hash256};
use hayashi_tx::{convert_for_v13, TransactionFrame, TransactionFramePtr, TxResultCode};

use crate::error::{HerderError, Result};
use crate::ledger_view::{LedgerHeader, LedgerView};
use crate::metrics::{Counter, MetricsRegistry};

mod tx_set;

pub use tx_set::TxSetFrame;

/// Fee multiplier required for replace-by-fee.
///
/// A replacement must bid at least this multiple of the replaced
/// transaction's per-operation fee rate.
pub const FEE_MULTIPLIER: i64 = 10;

/// Result of attempting to add a transaction to the queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddResult {
    /// Transaction was added and is pending inclusion.
    Pending,
    /// Transaction (or its fee-bump wrapping) is already queued.
    Duplicate,
    /// Transaction was rejected; the reason is recorded in its result code.
    Error,
    /// Transaction is banned or the queue is at capacity. Resubmitting
    /// later may succeed.
    TryAgainLater,
}

/// Configuration for the transaction queue.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TxQueueConfig {
    /// Number of ledgers a transaction may stay queued before it is banned.
    /// Also the number of age buckets reported to metrics.
    #[serde(default = "default_pending_depth")]
    pub pending_depth: u32,
    /// Number of ledgers a banned hash stays banned.
    #[serde(default = "default_ban_depth")]
    pub ban_depth: u32,
    /// The queue admits this many ledgers' worth of operations.
    #[serde(default = "default_pool_ledger_multiplier")]
    pub pool_ledger_multiplier: u32,
}

fn default_pending_depth() -> u32 {
    4
}

fn default_ban_depth() -> u32 {
    10
}

fn default_pool_ledger_multiplier() -> u32 {
    2
}

impl Default for TxQueueConfig {
    fn default() -> Self {
        Self {
            pending_depth: default_pending_depth(),
            ban_depth: default_ban_depth(),
            pool_ledger_multiplier: default_pool_ledger_multiplier(),
        }
    }
}

/// Per-account state in the transaction queue.
///
/// An account is tracked if and only if it is the sequence-number source of
/// at least one queued transaction, or the fee source of at least one
/// queued transaction (`total_fees > 0`). The two roles can belong to
/// different accounts: a fee-bump pays for another account's transaction.
#[derive(Debug, Clone, Default)]
struct AccountState {
    /// Queued transactions for which this account is the sequence-number
    /// source, in strictly increasing, gap-free sequence order.
    transactions: Vec<TransactionFramePtr>,
    /// Sum of fee bids across all queued transactions this account pays
    /// for, including transactions whose sequence-number source is another
    /// account.
    total_fees: i64,
    /// Sum of operation counts over `transactions`.
    queue_size_ops: i64,
    /// Ledgers closed since the oldest queued transaction entered. Always 0
    /// when `transactions` is empty.
    age: u32,
}

/// Summary of an account's pending queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AccountTxQueueInfo {
    /// Highest queued sequence number, or 0 if none are queued.
    pub max_seq: i64,
    /// Total fees this account is liable for.
    pub total_fees: i64,
    /// Total operations queued under this account's sequence numbers.
    pub queue_size_ops: i64,
    /// Ledgers since the oldest queued transaction entered.
    pub age: u32,
}

/// A queued transaction that was rebuilt during a protocol upgrade.
///
/// The old frame has been dropped from the queue; the new one replaces it
/// and must be re-announced to peers under its new hash.
#[derive(Debug, Clone)]
pub struct ReplacedTransaction {
    pub old: TransactionFramePtr,
    pub new: TransactionFramePtr,
}

/// Check whether `tx` may replace `old_tx` at the same sequence slot.
///
/// The replacement must bid at least [`FEE_MULTIPLIER`] times the old
/// per-operation fee rate:
///
/// `newFee / newNumOps >= FEE_MULTIPLIER * oldFee / oldNumOps`
///
/// which cross-multiplies to
///
/// `newFee * oldNumOps >= FEE_MULTIPLIER * oldFee * newNumOps`.
///
/// The products are taken in 128 bits and cannot overflow there: fees are
/// bounded by `i64::MAX` while operation counts and the multiplier are
/// small.
fn can_replace_by_fee(tx: &TransactionFrame, old_tx: &TransactionFrame) -> bool {
    debug_assert!(tx.fee_bid() >= 0 && old_tx.fee_bid() >= 0);
    let new_fee = tx.fee_bid() as u128;
    let new_num_ops = tx.num_operations().max(1) as u128;
    let old_fee = old_tx.fee_bid() as u128;
    let old_num_ops = old_tx.num_operations().max(1) as u128;

    new_fee * old_num_ops >= (FEE_MULTIPLIER as u128) * old_fee * new_num_ops
}

/// Locate `seq` in a contiguous run of queued transactions.
///
/// Returns the offset of the transaction carrying `seq`, or
/// `transactions.len()` when `seq` is one past the tail (a new slot). Any
/// sequence outside `[first, last + 1]` returns `None`.
fn find_by_seq(seq: i64, transactions: &[TransactionFramePtr]) -> Option<usize> {
    let (Some(first), Some(last)) = (transactions.first(), transactions.last()) else {
        return None;
    };
    let first_seq = first.seq_num();
    let last_seq = last.seq_num();
    if seq < first_seq || seq > last_seq + 1 {
        return None;
    }

    // Contiguity makes the offset exact.
    let offset = (seq - first_seq) as usize;
    debug_assert!(offset <= transactions.len());
    debug_assert!(offset == transactions.len() || transactions[offset].seq_num() == seq);
    Some(offset)
}

/// Locate a queued transaction matching `tx` by hash at its sequence slot.
fn find_tx(tx: &TransactionFrame, transactions: &[TransactionFramePtr]) -> Option<usize> {
    let index = find_by_seq(tx.seq_num(), transactions)?;
    if index < transactions.len() && transactions[index].full_hash() == tx.full_hash() {
        Some(index)
    } else {
        None
    }
}

/// Check whether `new_tx` is a resubmission of `old_tx`.
///
/// Same-form envelopes compare by full hash. A plain transaction also
/// duplicates a queued fee-bump that wraps it.
fn is_duplicate_tx(old_tx: &TransactionFrame, new_tx: &TransactionFrame) -> bool {
    if old_tx.is_fee_bump() == new_tx.is_fee_bump() {
        old_tx.full_hash() == new_tx.full_hash()
    } else if old_tx.is_fee_bump() {
        old_tx.inner_full_hash() == Some(new_tx.full_hash())
    } else {
        false
    }
}

/// Queue of transactions pending inclusion in a ledger.
///
/// See the [module documentation](self) for behavior. Owned and driven by
/// the herder: [`try_add`](Self::try_add) as submissions arrive, then at
/// each ledger close [`remove_applied`](Self::remove_applied) followed by
/// [`shift`](Self::shift).
pub struct TransactionQueue {
    // No interior locking: the herder's control thread owns the queue and
    // every public operation takes &mut self.
    ledger: Arc<dyn LedgerView>,
    pending_depth: u32,
    pool_ledger_multiplier: u32,
    /// Tracked accounts: sequence-number sources with queued transactions
    /// and fee sources with outstanding reservations.
    account_states: HashMap<AccountId, AccountState>,
    /// Banned hashes, one set per ledger. The front set is the current
    /// ledger's and receives new bans; the back set is dropped on shift.
    banned_transactions: VecDeque<HashSet<Hash256>>,
    /// Sum of operation counts over all queued transactions.
    queue_size_ops: i64,
    /// Protocol version observed at the last lifecycle step, for upgrade
    /// detection.
    ledger_version: u32,
    /// Queued-transaction counts bucketed by account age.
    size_by_age: Vec<Arc<Counter>>,
}

impl TransactionQueue {
    /// Create a queue against the given ledger view.
    ///
    /// Registers one `herder.pending-txs.age{i}` counter per age bucket.
    pub fn new(
        ledger: Arc<dyn LedgerView>,
        config: TxQueueConfig,
        metrics: &dyn MetricsRegistry,
    ) -> Result<Self> {
        if config.pending_depth == 0 {
            return Err(HerderError::Config("pending_depth must be positive".into()));
        }
        if config.ban_depth == 0 {
            return Err(HerderError::Config("ban_depth must be positive".into()));
        }
        if config.pool_ledger_multiplier == 0 {
            return Err(HerderError::Config(
                "pool_ledger_multiplier must be positive".into(),
            ));
        }

        let ledger_version = ledger.last_closed_header().ledger_version;
        let size_by_age = (0..config.pending_depth)
            .map(|age| metrics.new_counter(&format!("herder.pending-txs.age{}", age)))
            .collect();
        let banned_transactions = (0..config.ban_depth).map(|_| HashSet::new()).collect();

        Ok(Self {
            ledger,
            pending_depth: config.pending_depth,
            pool_ledger_multiplier: config.pool_ledger_multiplier,
            account_states: HashMap::new(),
            banned_transactions,
            queue_size_ops: 0,
            ledger_version,
            size_by_age,
        })
    }

    /// Number of ledgers a transaction may stay queued.
    pub fn pending_depth(&self) -> u32 {
        self.pending_depth
    }

    /// Number of ledgers a banned hash stays banned.
    pub fn ban_depth(&self) -> u32 {
        self.banned_transactions.len() as u32
    }

    /// Sum of operation counts over all queued transactions.
    pub fn queue_size_ops(&self) -> i64 {
        self.queue_size_ops
    }

    /// The queue's operation capacity, derived from the last-closed
    /// ledger's per-ledger limit.
    pub fn max_queue_size_ops(&self) -> i64 {
        let max_ops_ledger = self.ledger.last_closed_header().max_tx_set_size_ops as i64;
        max_ops_ledger.saturating_mul(self.pool_ledger_multiplier as i64)
    }

    /// Try to add a transaction to the queue.
    pub fn try_add(&mut self, tx: TransactionFramePtr) -> AddResult {
        let (res, old_tx_index) = self.can_add(&tx);
        if res != AddResult::Pending {
            return res;
        }

        let source = tx.source_id();
        let num_ops = tx.num_operations() as i64;

        if !self.account_states.contains_key(&source) {
            self.account_states.insert(source, AccountState::default());
        }

        match old_tx_index {
            Some(index) => {
                let old_tx = self.account_states[&source].transactions[index].clone();
                // Releasing the replaced fee may erase other account
                // entries, but never this one: it still holds at least one
                // transaction.
                self.release_fee_maybe_erase_account_state(&old_tx);
                let old_ops = old_tx.num_operations() as i64;
                self.queue_size_ops -= old_ops;
                let state = self
                    .account_states
                    .get_mut(&source)
                    .expect("sequence-source entry survives fee release");
                state.queue_size_ops -= old_ops;
                state.transactions[index] = tx.clone();
            }
            None => {
                let state = self
                    .account_states
                    .get_mut(&source)
                    .expect("entry created above");
                state.transactions.push(tx.clone());
                self.size_by_age[state.age as usize].inc();
            }
        }

        let state = self
            .account_states
            .get_mut(&source)
            .expect("entry created above");
        state.queue_size_ops += num_ops;
        self.queue_size_ops += num_ops;

        self.account_states
            .entry(tx.fee_source_id())
            .or_default()
            .total_fees += tx.fee_bid();

        debug!(hash = %tx.full_hash(), source = ?source, seq = tx.seq_num(), "queued transaction");
        AddResult::Pending
    }

    /// The admission pipeline, up to but not including the state mutation.
    ///
    /// On `Pending`, the second value is the slot to replace within the
    /// source account's queue, or `None` to append at the tail.
    fn can_add(&mut self, tx: &TransactionFramePtr) -> (AddResult, Option<usize>) {
        if self.is_banned(&tx.full_hash()) {
            return (AddResult::TryAgainLater, None);
        }

        let mut net_fee = tx.fee_bid();
        let mut net_ops = tx.num_operations() as i64;
        let mut prior_seq = 0i64;
        let mut old_tx_index = None;

        if let Some(state) = self.account_states.get(&tx.source_id()) {
            let transactions = &state.transactions;
            if !transactions.is_empty() {
                if !tx.is_fee_bump() {
                    if let Some(index) = find_by_seq(tx.seq_num(), transactions) {
                        if index < transactions.len()
                            && is_duplicate_tx(&transactions[index], tx)
                        {
                            return (AddResult::Duplicate, None);
                        }
                    }

                    // Only appends are permitted for plain envelopes; the
                    // validator rejects anything that does not follow the
                    // tail.
                    prior_seq = transactions[transactions.len() - 1].seq_num();
                } else {
                    match find_by_seq(tx.seq_num(), transactions) {
                        None => {
                            tx.set_result_code(TxResultCode::BadSeq);
                            return (AddResult::Error, None);
                        }
                        Some(index) if index < transactions.len() => {
                            let old_tx = &transactions[index];
                            if is_duplicate_tx(old_tx, tx) {
                                return (AddResult::Duplicate, None);
                            }
                            if !can_replace_by_fee(tx, old_tx) {
                                tx.set_result_code(TxResultCode::InsufficientFee);
                                return (AddResult::Error, None);
                            }

                            net_ops -= old_tx.num_operations() as i64;
                            if old_tx.fee_source_id() == tx.fee_source_id() {
                                net_fee -= old_tx.fee_bid();
                            }
                            old_tx_index = Some(index);
                        }
                        // One past the tail: an ordinary append.
                        Some(_) => {}
                    }

                    prior_seq = tx.seq_num() - 1;
                }
            }
        }

        if net_ops + self.queue_size_ops > self.max_queue_size_ops() {
            debug!(hash = %tx.full_hash(), "queue at capacity, banning submission");
            self.ban(&[tx.clone()]);
            return (AddResult::TryAgainLater, None);
        }

        if !self.ledger.check_valid(tx, prior_seq) {
            return (AddResult::Error, None);
        }

        // The sequence-number source and the fee source are not necessarily
        // the same account.
        let fee_source = tx.fee_source_id();
        let total_fees = self
            .account_states
            .get(&fee_source)
            .map(|state| state.total_fees)
            .unwrap_or(0);
        let Some(available) = self.ledger.available_balance(&fee_source) else {
            tx.set_result_code(TxResultCode::NoAccount);
            return (AddResult::Error, None);
        };
        if available - net_fee < total_fees {
            tx.set_result_code(TxResultCode::InsufficientBalance);
            return (AddResult::Error, None);
        }

        (AddResult::Pending, old_tx_index)
    }

    /// Release a transaction's fee reservation, erasing the fee-source
    /// entry when nothing keeps it alive.
    ///
    /// May erase account entries other than the caller's; callers iterating
    /// an account must re-look it up afterwards, unless that account still
    /// holds at least one queued transaction (a non-empty entry is never
    /// erased here).
    fn release_fee_maybe_erase_account_state(&mut self, tx: &TransactionFrame) {
        let fee_source = tx.fee_source_id();
        let state = self
            .account_states
            .get_mut(&fee_source)
            .expect("fee-source entry exists while its fee is reserved");
        assert!(state.total_fees >= tx.fee_bid());

        state.total_fees -= tx.fee_bid();
        if state.transactions.is_empty() && state.total_fees == 0 {
            self.account_states.remove(&fee_source);
        }
    }

    /// Drop the queued transactions of `account` in `[begin, end)`,
    /// releasing fees and updating counters.
    ///
    /// Erases the account entry if nothing remains, otherwise resets its
    /// age when the queue emptied.
    fn drop_transactions(&mut self, account: AccountId, begin: usize, end: usize) {
        // Release fees while the queue still holds the transactions: a
        // non-empty entry cannot be erased by the release, so `account`
        // stays valid through the loop even when it pays its own fees.
        let dropped: Vec<TransactionFramePtr> = {
            let state = self
                .account_states
                .get(&account)
                .expect("dropping from a tracked account");
            state.transactions[begin..end].to_vec()
        };
        for tx in &dropped {
            let ops = tx.num_operations() as i64;
            let state = self
                .account_states
                .get_mut(&account)
                .expect("entry retains transactions until drained below");
            state.queue_size_ops -= ops;
            self.queue_size_ops -= ops;
            self.release_fee_maybe_erase_account_state(tx);
        }

        let state = self
            .account_states
            .get_mut(&account)
            .expect("entry retains transactions until drained below");
        state.transactions.drain(begin..end);
        let erase = state.transactions.is_empty() && state.total_fees == 0;
        if state.transactions.is_empty() && !erase {
            state.age = 0;
        }
        if erase {
            self.account_states.remove(&account);
        }
    }

    /// Remove transactions that were applied in the ledger that just
    /// closed. Call before [`shift`](Self::shift).
    pub fn remove_applied(&mut self, applied: &[TransactionFramePtr]) {
        // Highest applied sequence number per source account.
        let mut max_seq_by_account: BTreeMap<AccountId, i64> = BTreeMap::new();
        for tx in applied {
            let seq = max_seq_by_account.entry(tx.source_id()).or_insert(0);
            *seq = (*seq).max(tx.seq_num());
        }

        for (account, max_seq) in max_seq_by_account {
            let Some(state) = self.account_states.get_mut(&account) else {
                continue;
            };
            if state.transactions.is_empty() {
                continue;
            }
            // Sequence numbers are monotonic: a head above the applied
            // sequence means nothing here was applied or invalidated.
            if state.transactions[0].seq_num() > max_seq {
                continue;
            }

            // Match by sequence number rather than hash: every queued
            // transaction at or below the highest applied sequence has
            // either been applied or become unapplyable.
            let end = match find_by_seq(max_seq, &state.transactions) {
                Some(index) if index < state.transactions.len() => index + 1,
                _ => state.transactions.len(),
            };

            // At least one transaction was applied for this account, so its
            // age resets: the current bucket loses the whole queue and
            // bucket zero gains the survivors.
            let total = state.transactions.len() as i64;
            let survivors = total - end as i64;
            let age = state.age;
            state.age = 0;
            self.size_by_age[age as usize].dec(total);
            self.size_by_age[0].add(survivors);

            self.drop_transactions(account, 0, end);
        }
    }

    /// Ban the given transactions and drop any of them that are queued,
    /// along with everything queued behind them.
    ///
    /// Hashes stay banned for `ban_depth` ledgers whether or not they were
    /// queued.
    pub fn ban(&mut self, ban_txs: &[TransactionFramePtr]) {
        // Group by source account; every input hash goes into the current
        // ledger's ban set regardless of queue membership.
        let mut txs_by_account: BTreeMap<AccountId, Vec<TransactionFramePtr>> = BTreeMap::new();
        for tx in ban_txs {
            txs_by_account
                .entry(tx.source_id())
                .or_default()
                .push(tx.clone());
            self.ban_hash(tx.full_hash());
        }

        for (account, banned) in txs_by_account {
            let Some(state) = self.account_states.get(&account) else {
                continue;
            };
            if state.transactions.is_empty() {
                continue;
            }

            // Queued position of the lowest-sequence banned transaction
            // that matches by hash. The inputs are not sorted.
            let len = state.transactions.len();
            let mut start = len;
            for tx in &banned {
                if start == len || tx.seq_num() < state.transactions[start].seq_num() {
                    if let Some(index) = find_tx(tx, &state.transactions) {
                        start = index;
                    }
                }
            }

            // Every transaction behind the first banned slot has lost its
            // place in the sequence run and goes with it.
            let suffix: Vec<Hash256> = state.transactions[start..]
                .iter()
                .map(|tx| tx.full_hash())
                .collect();
            let age = state.age;

            for hash in suffix {
                self.ban_hash(hash);
            }
            self.size_by_age[age as usize].dec((len - start) as i64);
            self.drop_transactions(account, start, len);
        }
    }

    fn ban_hash(&mut self, hash: Hash256) {
        if let Some(front) = self.banned_transactions.front_mut() {
            front.insert(hash);
        }
    }

    /// Advance the queue by one ledger. Call after
    /// [`remove_applied`](Self::remove_applied).
    ///
    /// Rotates the ban ring, ages every account with queued transactions,
    /// and bans the whole queue of any account reaching `pending_depth`.
    pub fn shift(&mut self) {
        self.banned_transactions.pop_back();
        self.banned_transactions.push_front(HashSet::new());

        let mut sizes = vec![0i64; self.pending_depth as usize];

        // Entries can be erased while other accounts' fees are released, so
        // walk a snapshot of the keys and re-look each one up.
        let accounts: Vec<AccountId> = self.account_states.keys().copied().collect();
        for account in accounts {
            let evicted = {
                let Some(state) = self.account_states.get_mut(&account) else {
                    continue;
                };
                // Fee-source-only entries hold no transactions and never
                // age.
                if !state.transactions.is_empty() {
                    state.age += 1;
                }
                if state.age == self.pending_depth {
                    state.transactions.clone()
                } else {
                    sizes[state.age as usize] += state.transactions.len() as i64;
                    continue;
                }
            };

            info!(
                account = ?account,
                count = evicted.len(),
                "banning transactions pending for too many ledgers"
            );
            // Release fees before clearing the queue: the entry still holds
            // its transactions, so the release cannot erase it mid-loop.
            for tx in &evicted {
                self.release_fee_maybe_erase_account_state(tx);
                self.ban_hash(tx.full_hash());
            }

            let state = self
                .account_states
                .get_mut(&account)
                .expect("entry retains transactions until cleared below");
            self.queue_size_ops -= state.queue_size_ops;
            state.queue_size_ops = 0;
            state.transactions.clear();
            let erase = state.total_fees == 0;
            if !erase {
                state.age = 0;
            }
            if erase {
                self.account_states.remove(&account);
            }
        }

        for (age, size) in sizes.iter().enumerate() {
            self.size_by_age[age].set(*size);
        }
    }

    /// Check whether a hash is banned in any slot of the ring.
    pub fn is_banned(&self, hash: &Hash256) -> bool {
        self.banned_transactions
            .iter()
            .any(|transactions| transactions.contains(hash))
    }

    /// Number of hashes banned in slot `index` (0 is the current ledger's
    /// slot).
    pub fn count_banned(&self, index: usize) -> usize {
        self.banned_transactions
            .get(index)
            .map(|transactions| transactions.len())
            .unwrap_or(0)
    }

    /// Summary of an account's pending queue; zeros if untracked.
    pub fn account_tx_queue_info(&self, account: &AccountId) -> AccountTxQueueInfo {
        match self.account_states.get(account) {
            None => AccountTxQueueInfo::default(),
            Some(state) => AccountTxQueueInfo {
                max_seq: state
                    .transactions
                    .last()
                    .map(|tx| tx.seq_num())
                    .unwrap_or(0),
                total_fees: state.total_fees,
                queue_size_ops: state.queue_size_ops,
                age: state.age,
            },
        }
    }

    /// Build a candidate transaction set for the ledger following `lcl`.
    ///
    /// Per account, transactions are taken in sequence order up to and
    /// including the one at `starting_sequence_number(next) - 1`: an
    /// account's transactions in one set must all lie on the same side of
    /// the starting-sequence boundary.
    pub fn to_tx_set(&self, lcl: &LedgerHeader) -> TxSetFrame {
        let next_ledger_seq = lcl.ledger_seq + 1;
        let starting_seq = starting_sequence_number(next_ledger_seq);

        let mut transactions = Vec::new();
        for state in self.account_states.values() {
            for tx in &state.transactions {
                transactions.push(tx.clone());
                if tx.seq_num() == starting_seq - 1 {
                    break;
                }
            }
        }

        TxSetFrame::new(lcl.hash, transactions)
    }

    /// Detect a protocol upgrade across the last ledger close and rebuild
    /// queued envelopes for it.
    ///
    /// Crossing into V13 rewrites every queued envelope to the unified form
    /// and clears the ban ring (banned hashes were computed over the old
    /// forms). Returns the `(old, new)` pairs so the caller can re-announce
    /// the rebuilt transactions.
    pub fn maybe_version_upgraded(&mut self) -> Vec<ReplacedTransaction> {
        let mut res = Vec::new();

        let lcl = self.ledger.last_closed_header();
        if !unified_envelopes_supported(self.ledger_version)
            && unified_envelopes_supported(lcl.ledger_version)
        {
            for banned in self.banned_transactions.iter_mut() {
                banned.clear();
            }

            for state in self.account_states.values_mut() {
                for tx in state.transactions.iter_mut() {
                    let old = tx.clone();
                    let new = TransactionFrame::new(convert_for_v13(old.envelope()));
                    *tx = new.clone();
                    res.push(ReplacedTransaction { old, new });
                }
            }
            info!(count = res.len(), "rebuilt queued transactions for protocol 13");
        }
        self.ledger_version = lcl.ledger_version;

        res
    }
}
