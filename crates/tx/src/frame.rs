//! Transaction frame: the node-internal view of a decoded envelope.

use std::sync::Arc;

use parking_lot::Mutex;

use hayashi_common::{AccountId, Hash256};

use crate::envelope::TransactionEnvelope;
use crate::result::TxResultCode;

/// Shared handle to a [`TransactionFrame`].
///
/// Frames move between the queueing, flooding, and apply layers by
/// reference counting; whichever layer drops a transaction simply drops its
/// handle.
pub type TransactionFramePtr = Arc<TransactionFrame>;

/// An immutable envelope plus the derived attributes the node consults
/// repeatedly: content digests, source accounts, sequence number, fee bid.
///
/// Digests are computed once at construction. The only mutable part is the
/// result slot, which validation writes through a shared handle when it
/// rejects the transaction.
pub struct TransactionFrame {
    envelope: TransactionEnvelope,
    full_hash: Hash256,
    inner_full_hash: Option<Hash256>,
    result_code: Mutex<TxResultCode>,
}

impl TransactionFrame {
    /// Wrap an envelope, computing its digests.
    pub fn new(envelope: TransactionEnvelope) -> TransactionFramePtr {
        let full_hash = envelope.full_hash();
        let inner_full_hash = match &envelope {
            TransactionEnvelope::TxFeeBump(env) => {
                Some(TransactionEnvelope::Tx(env.tx.inner_tx.clone()).full_hash())
            }
            _ => None,
        };

        Arc::new(Self {
            envelope,
            full_hash,
            inner_full_hash,
            result_code: Mutex::new(TxResultCode::Success),
        })
    }

    /// The wrapped envelope.
    pub fn envelope(&self) -> &TransactionEnvelope {
        &self.envelope
    }

    /// Whether this is a fee-bump envelope.
    pub fn is_fee_bump(&self) -> bool {
        self.envelope.is_fee_bump()
    }

    /// Content digest over the whole envelope, signatures included.
    pub fn full_hash(&self) -> Hash256 {
        self.full_hash
    }

    /// For fee-bump envelopes, the digest the wrapped inner transaction
    /// would have as a standalone `Tx` envelope. `None` for other forms.
    pub fn inner_full_hash(&self) -> Option<Hash256> {
        self.inner_full_hash
    }

    /// The sequence-number source account (the inner source for fee-bumps).
    pub fn source_id(&self) -> AccountId {
        match &self.envelope {
            TransactionEnvelope::TxV0(env) => env.tx.source_account,
            TransactionEnvelope::Tx(env) => env.tx.source_account,
            TransactionEnvelope::TxFeeBump(env) => env.tx.inner_tx.tx.source_account,
        }
    }

    /// The account paying the fee. Equals [`source_id`](Self::source_id)
    /// except for fee-bumps, where the outer fee source pays.
    pub fn fee_source_id(&self) -> AccountId {
        match &self.envelope {
            TransactionEnvelope::TxV0(env) => env.tx.source_account,
            TransactionEnvelope::Tx(env) => env.tx.source_account,
            TransactionEnvelope::TxFeeBump(env) => env.tx.fee_source,
        }
    }

    /// The sequence number consumed on the sequence-number source account.
    pub fn seq_num(&self) -> i64 {
        match &self.envelope {
            TransactionEnvelope::TxV0(env) => env.tx.seq_num,
            TransactionEnvelope::Tx(env) => env.tx.seq_num,
            TransactionEnvelope::TxFeeBump(env) => env.tx.inner_tx.tx.seq_num,
        }
    }

    /// Number of operations (the inner operations for fee-bumps).
    pub fn num_operations(&self) -> u32 {
        let operations = match &self.envelope {
            TransactionEnvelope::TxV0(env) => &env.tx.operations,
            TransactionEnvelope::Tx(env) => &env.tx.operations,
            TransactionEnvelope::TxFeeBump(env) => &env.tx.inner_tx.tx.operations,
        };
        operations.len() as u32
    }

    /// Total fee offered: the outer fee for fee-bumps.
    pub fn fee_bid(&self) -> i64 {
        match &self.envelope {
            TransactionEnvelope::TxV0(env) => env.tx.fee,
            TransactionEnvelope::Tx(env) => env.tx.fee,
            TransactionEnvelope::TxFeeBump(env) => env.tx.fee,
        }
    }

    /// The most recently recorded result code.
    pub fn result_code(&self) -> TxResultCode {
        *self.result_code.lock()
    }

    /// Record a result code. Written through shared handles when validation
    /// rejects the transaction.
    pub fn set_result_code(&self, code: TxResultCode) {
        *self.result_code.lock() = code;
    }
}

impl std::fmt::Debug for TransactionFrame {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransactionFrame")
            .field("hash", &self.full_hash)
            .field("source", &self.source_id())
            .field("seq_num", &self.seq_num())
            .field("fee_bid", &self.fee_bid())
            .field("ops", &self.num_operations())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::envelope::{
        DecoratedSignature, FeeBumpTransaction, FeeBumpTransactionEnvelope, Operation,
        Transaction, TransactionV1Envelope,
    };

    fn make_envelope(seed: u8, seq_num: i64, fee: i64, ops: usize) -> TransactionEnvelope {
        let operations = (0..ops)
            .map(|_| Operation::Payment {
                destination: AccountId::from_bytes([9u8; 32]),
                amount: 10,
            })
            .collect();
        TransactionEnvelope::Tx(TransactionV1Envelope {
            tx: Transaction {
                source_account: AccountId::from_bytes([seed; 32]),
                fee,
                seq_num,
                operations,
            },
            signatures: vec![DecoratedSignature {
                hint: [seed; 4],
                signature: vec![seed; 64],
            }],
        })
    }

    fn bump(envelope: TransactionEnvelope, fee_source: AccountId, fee: i64) -> TransactionEnvelope {
        let inner = match envelope {
            TransactionEnvelope::Tx(env) => env,
            other => panic!("expected Tx form, got {:?}", other),
        };
        TransactionEnvelope::TxFeeBump(FeeBumpTransactionEnvelope {
            tx: FeeBumpTransaction {
                fee_source,
                fee,
                inner_tx: inner,
            },
            signatures: vec![DecoratedSignature {
                hint: [0xfe; 4],
                signature: vec![0xfe; 64],
            }],
        })
    }

    #[test]
    fn test_plain_accessors() {
        let frame = TransactionFrame::new(make_envelope(1, 5, 300, 3));
        assert_eq!(frame.source_id(), AccountId::from_bytes([1u8; 32]));
        assert_eq!(frame.fee_source_id(), frame.source_id());
        assert_eq!(frame.seq_num(), 5);
        assert_eq!(frame.num_operations(), 3);
        assert_eq!(frame.fee_bid(), 300);
        assert!(!frame.is_fee_bump());
        assert_eq!(frame.inner_full_hash(), None);
    }

    #[test]
    fn test_fee_bump_accessors() {
        let inner = make_envelope(1, 5, 300, 2);
        let inner_hash = inner.full_hash();
        let fee_source = AccountId::from_bytes([2u8; 32]);
        let frame = TransactionFrame::new(bump(inner, fee_source, 3000));

        assert!(frame.is_fee_bump());
        assert_eq!(frame.source_id(), AccountId::from_bytes([1u8; 32]));
        assert_eq!(frame.fee_source_id(), fee_source);
        assert_eq!(frame.seq_num(), 5);
        assert_eq!(frame.num_operations(), 2);
        assert_eq!(frame.fee_bid(), 3000);
        // The inner digest matches what the inner transaction would hash to
        // as a standalone envelope.
        assert_eq!(frame.inner_full_hash(), Some(inner_hash));
        assert_ne!(frame.full_hash(), inner_hash);
    }

    #[test]
    fn test_result_slot() {
        let frame = TransactionFrame::new(make_envelope(1, 5, 100, 1));
        assert_eq!(frame.result_code(), TxResultCode::Success);
        frame.set_result_code(TxResultCode::BadSeq);
        assert_eq!(frame.result_code(), TxResultCode::BadSeq);
    }
}
