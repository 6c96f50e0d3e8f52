//! Candidate transaction sets.

use hayashi_common::{Hash256, Sha256Hasher};
use hayashi_tx::TransactionFramePtr;

/// A candidate set of transactions for the next ledger.
///
/// Transactions are kept in hash order so two nodes assembling the same
/// contents produce byte-identical sets, and the contents hash identifies
/// the set during consensus.
#[derive(Debug, Clone)]
pub struct TxSetFrame {
    previous_ledger_hash: Hash256,
    transactions: Vec<TransactionFramePtr>,
}

impl TxSetFrame {
    /// Create a set on top of the given previous ledger.
    pub fn new(previous_ledger_hash: Hash256, transactions: Vec<TransactionFramePtr>) -> Self {
        let mut transactions = transactions;
        transactions.sort_by(|a, b| a.full_hash().cmp(&b.full_hash()));
        Self {
            previous_ledger_hash,
            transactions,
        }
    }

    /// The previous ledger this set builds on.
    pub fn previous_ledger_hash(&self) -> Hash256 {
        self.previous_ledger_hash
    }

    /// The transactions, in hash order.
    pub fn transactions(&self) -> &[TransactionFramePtr] {
        &self.transactions
    }

    /// Number of transactions in the set.
    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    /// Check if the set is empty.
    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }

    /// Sum of operation counts across the set.
    pub fn size_ops(&self) -> i64 {
        self.transactions
            .iter()
            .map(|tx| tx.num_operations() as i64)
            .sum()
    }

    /// Hash of the set contents: the previous ledger hash followed by every
    /// transaction digest in order.
    pub fn contents_hash(&self) -> Hash256 {
        let mut hasher = Sha256Hasher::new();
        hasher.update(self.previous_ledger_hash.as_bytes());
        for tx in &self.transactions {
            hasher.update(tx.full_hash().as_bytes());
        }
        hasher.finalize()
    }

    /// Summarize the set for logging.
    pub fn summary(&self) -> String {
        if self.transactions.is_empty() {
            return "empty tx set".to_string();
        }
        format!("txs:{}, ops:{}", self.len(), self.size_ops())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hayashi_common::AccountId;
    use hayashi_tx::{
        DecoratedSignature, Operation, Transaction, TransactionEnvelope, TransactionFrame,
        TransactionV1Envelope,
    };

    fn make_tx(seed: u8, seq_num: i64) -> TransactionFramePtr {
        TransactionFrame::new(TransactionEnvelope::Tx(TransactionV1Envelope {
            tx: Transaction {
                source_account: AccountId::from_bytes([seed; 32]),
                fee: 100,
                seq_num,
                operations: vec![Operation::BumpSequence { bump_to: 0 }],
            },
            signatures: vec![DecoratedSignature {
                hint: [seed; 4],
                signature: vec![seed; 64],
            }],
        }))
    }

    #[test]
    fn test_transactions_sorted_by_hash() {
        let txs = vec![make_tx(3, 1), make_tx(1, 1), make_tx(2, 1)];
        let set = TxSetFrame::new(Hash256::hash(b"prev"), txs);
        let hashes: Vec<_> = set.transactions().iter().map(|t| t.full_hash()).collect();
        let mut sorted = hashes.clone();
        sorted.sort();
        assert_eq!(hashes, sorted);
    }

    #[test]
    fn test_contents_hash_is_order_independent() {
        let prev = Hash256::hash(b"prev");
        let a = TxSetFrame::new(prev, vec![make_tx(1, 1), make_tx(2, 1)]);
        let b = TxSetFrame::new(prev, vec![make_tx(2, 1), make_tx(1, 1)]);
        assert_eq!(a.contents_hash(), b.contents_hash());

        let c = TxSetFrame::new(prev, vec![make_tx(1, 1)]);
        assert_ne!(a.contents_hash(), c.contents_hash());
    }

    #[test]
    fn test_summary() {
        let set = TxSetFrame::new(Hash256::ZERO, Vec::new());
        assert_eq!(set.summary(), "empty tx set");

        let set = TxSetFrame::new(Hash256::ZERO, vec![make_tx(1, 1), make_tx(2, 1)]);
        assert_eq!(set.summary(), "txs:2, ops:2");
    }
}
