//! Transaction data model for hayashi.
//!
//! This crate defines the transaction envelope forms a node exchanges and
//! the [`TransactionFrame`] wrapper the rest of the node works with. The
//! frame caches the content digest at construction and exposes the
//! attributes downstream components consume: source and fee-source
//! accounts, sequence number, operation count, fee bid, and a mutable
//! result slot for recording why a transaction was rejected.
//!
//! # Envelope Forms
//!
//! - [`TransactionEnvelope::TxV0`] - legacy form, retired at protocol V13
//! - [`TransactionEnvelope::Tx`] - the unified form
//! - [`TransactionEnvelope::TxFeeBump`] - wraps an inner transaction
//!   unchanged and substitutes a different fee payer and fee amount
//!
//! Frames are shared by `Arc` ([`TransactionFramePtr`]); the envelope is
//! immutable once wrapped, so replacing a transaction means building a new
//! frame.

pub mod envelope;
pub mod frame;
pub mod result;

pub use envelope::{
    convert_for_v13, DecoratedSignature, FeeBumpTransaction, FeeBumpTransactionEnvelope,
    Operation, Transaction, TransactionEnvelope, TransactionV0Envelope, TransactionV1Envelope,
};
pub use frame::{TransactionFrame, TransactionFramePtr};
pub use result::TxResultCode;
