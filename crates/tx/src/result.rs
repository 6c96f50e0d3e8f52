//! Transaction result codes.

use std::fmt;

/// Outcome code recorded on a transaction after validation or apply.
///
/// Components that reject a transaction write the reason here so the
/// submitting peer or client can be told why.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TxResultCode {
    /// All operations succeeded (or the transaction has not been judged yet).
    #[default]
    Success,
    /// The transaction was submitted too late for its time bounds.
    TooLate,
    /// The transaction has no operations.
    MissingOperation,
    /// The sequence number does not follow the source account's sequence.
    BadSeq,
    /// Not enough valid signatures, or wrong network.
    BadAuth,
    /// The fee bid is below what admission requires.
    InsufficientFee,
    /// The fee source cannot cover the fee on top of its existing
    /// obligations.
    InsufficientBalance,
    /// The source account was not found.
    NoAccount,
    /// An unknown internal failure.
    InternalError,
}

impl fmt::Display for TxResultCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TxResultCode::Success => "txSUCCESS",
            TxResultCode::TooLate => "txTOO_LATE",
            TxResultCode::MissingOperation => "txMISSING_OPERATION",
            TxResultCode::BadSeq => "txBAD_SEQ",
            TxResultCode::BadAuth => "txBAD_AUTH",
            TxResultCode::InsufficientFee => "txINSUFFICIENT_FEE",
            TxResultCode::InsufficientBalance => "txINSUFFICIENT_BALANCE",
            TxResultCode::NoAccount => "txNO_ACCOUNT",
            TxResultCode::InternalError => "txINTERNAL_ERROR",
        };
        write!(f, "{}", name)
    }
}
