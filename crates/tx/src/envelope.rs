//! Transaction envelope forms and their canonical digest rendering.

use hayashi_common::{AccountId, Hash256, Sha256Hasher};

/// A single ledger operation.
///
/// The queueing and flooding layers treat operations as opaque; only their
/// count feeds capacity and fee-rate math. The variants here cover the
/// operation set the node applies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    /// Create a new account funded with a starting balance.
    CreateAccount {
        destination: AccountId,
        starting_balance: i64,
    },
    /// Move native balance between accounts.
    Payment { destination: AccountId, amount: i64 },
    /// Raise the source account's sequence number without other effects.
    BumpSequence { bump_to: i64 },
}

impl Operation {
    fn digest_into(&self, hasher: &mut Sha256Hasher) {
        match self {
            Operation::CreateAccount {
                destination,
                starting_balance,
            } => {
                hasher.update(&[0u8]);
                hasher.update(destination.as_bytes());
                hasher.update(&starting_balance.to_be_bytes());
            }
            Operation::Payment {
                destination,
                amount,
            } => {
                hasher.update(&[1u8]);
                hasher.update(destination.as_bytes());
                hasher.update(&amount.to_be_bytes());
            }
            Operation::BumpSequence { bump_to } => {
                hasher.update(&[2u8]);
                hasher.update(&bump_to.to_be_bytes());
            }
        }
    }
}

/// A signature over the transaction digest, with a hint identifying the key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecoratedSignature {
    /// Last four bytes of the signing public key.
    pub hint: [u8; 4],
    /// The signature bytes. Verification is the ledger's concern; the
    /// queueing layer only folds these into the content digest.
    pub signature: Vec<u8>,
}

impl DecoratedSignature {
    fn digest_into(&self, hasher: &mut Sha256Hasher) {
        hasher.update(&self.hint);
        hasher.update(&(self.signature.len() as u32).to_be_bytes());
        hasher.update(&self.signature);
    }
}

/// The signed payload common to the `TxV0` and `Tx` envelope forms.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transaction {
    /// The sequence-number source account.
    pub source_account: AccountId,
    /// Total fee offered, in stroops.
    pub fee: i64,
    /// Sequence number; must be one past the account's current sequence at
    /// apply time.
    pub seq_num: i64,
    /// The operations to apply, in order.
    pub operations: Vec<Operation>,
}

impl Transaction {
    fn digest_into(&self, hasher: &mut Sha256Hasher) {
        hasher.update(self.source_account.as_bytes());
        hasher.update(&self.fee.to_be_bytes());
        hasher.update(&self.seq_num.to_be_bytes());
        hasher.update(&(self.operations.len() as u32).to_be_bytes());
        for op in &self.operations {
            op.digest_into(hasher);
        }
    }
}

/// Legacy envelope form, retired at protocol V13.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionV0Envelope {
    pub tx: Transaction,
    pub signatures: Vec<DecoratedSignature>,
}

/// The unified envelope form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionV1Envelope {
    pub tx: Transaction,
    pub signatures: Vec<DecoratedSignature>,
}

/// A fee-bump: a new fee payer wraps an existing signed transaction
/// unchanged and bids a replacement fee on its behalf.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeeBumpTransaction {
    /// The account paying the (outer) fee.
    pub fee_source: AccountId,
    /// Total fee offered by the fee source, in stroops.
    pub fee: i64,
    /// The wrapped transaction, byte-for-byte as originally signed.
    pub inner_tx: TransactionV1Envelope,
}

/// Envelope for a [`FeeBumpTransaction`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeeBumpTransactionEnvelope {
    pub tx: FeeBumpTransaction,
    pub signatures: Vec<DecoratedSignature>,
}

/// A transaction as decoded from the wire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransactionEnvelope {
    TxV0(TransactionV0Envelope),
    Tx(TransactionV1Envelope),
    TxFeeBump(FeeBumpTransactionEnvelope),
}

// Digest discriminants. Part of the content hash, so the same payload in a
// different envelope form hashes differently.
const ENVELOPE_TYPE_TX_V0: u8 = 0;
const ENVELOPE_TYPE_TX: u8 = 2;
const ENVELOPE_TYPE_TX_FEE_BUMP: u8 = 5;

impl TransactionEnvelope {
    /// Compute the full content digest: envelope discriminant, payload, and
    /// signatures.
    pub fn full_hash(&self) -> Hash256 {
        let mut hasher = Sha256Hasher::new();
        self.digest_into(&mut hasher);
        hasher.finalize()
    }

    fn digest_into(&self, hasher: &mut Sha256Hasher) {
        match self {
            TransactionEnvelope::TxV0(env) => {
                hasher.update(&[ENVELOPE_TYPE_TX_V0]);
                env.tx.digest_into(hasher);
                digest_signatures(&env.signatures, hasher);
            }
            TransactionEnvelope::Tx(env) => {
                hasher.update(&[ENVELOPE_TYPE_TX]);
                env.tx.digest_into(hasher);
                digest_signatures(&env.signatures, hasher);
            }
            TransactionEnvelope::TxFeeBump(env) => {
                hasher.update(&[ENVELOPE_TYPE_TX_FEE_BUMP]);
                hasher.update(env.tx.fee_source.as_bytes());
                hasher.update(&env.tx.fee.to_be_bytes());
                hasher.update(&[ENVELOPE_TYPE_TX]);
                env.tx.inner_tx.tx.digest_into(hasher);
                digest_signatures(&env.tx.inner_tx.signatures, hasher);
                digest_signatures(&env.signatures, hasher);
            }
        }
    }

    /// Whether this is a fee-bump envelope.
    pub fn is_fee_bump(&self) -> bool {
        matches!(self, TransactionEnvelope::TxFeeBump(_))
    }
}

fn digest_signatures(signatures: &[DecoratedSignature], hasher: &mut Sha256Hasher) {
    hasher.update(&(signatures.len() as u32).to_be_bytes());
    for sig in signatures {
        sig.digest_into(hasher);
    }
}

/// Rewrite a legacy `TxV0` envelope into the unified `Tx` form introduced at
/// protocol V13. Other forms pass through unchanged.
///
/// The payload and signatures are preserved; only the envelope discriminant
/// changes, so the rewritten envelope hashes differently and must be
/// re-announced to peers.
pub fn convert_for_v13(envelope: &TransactionEnvelope) -> TransactionEnvelope {
    match envelope {
        TransactionEnvelope::TxV0(env) => TransactionEnvelope::Tx(TransactionV1Envelope {
            tx: env.tx.clone(),
            signatures: env.signatures.clone(),
        }),
        other => other.clone(),
    }
}
