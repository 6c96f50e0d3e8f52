//! Protocol version utilities.
//!
//! The network coordinates upgrades through validator voting; each protocol
//! version may introduce new transaction forms or behavioral changes. Use the
//! helpers in this module to gate features on the current ledger version.
//!
//! # Key Protocol Versions
//!
//! - **V13**: legacy (`TxV0`) transaction envelopes are rewritten to the
//!   unified `Tx` form; nodes must re-hash and re-flood pending transactions
//!   across this boundary.

/// Protocol version enumeration for type-safe version comparisons.
///
/// The enum uses `#[repr(u32)]` so the discriminant values match the actual
/// protocol version numbers used on-chain.
#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ProtocolVersion {
    V0 = 0,
    V1 = 1,
    V2 = 2,
    V3 = 3,
    V4 = 4,
    V5 = 5,
    V6 = 6,
    V7 = 7,
    V8 = 8,
    V9 = 9,
    V10 = 10,
    V11 = 11,
    V12 = 12,
    V13 = 13,
    V14 = 14,
    V15 = 15,
}

/// Check whether `current_version` is at least `version`.
///
/// # Example
///
/// ```
/// use hayashi_common::protocol::{protocol_version_starts_from, ProtocolVersion};
///
/// assert!(protocol_version_starts_from(14, ProtocolVersion::V13));
/// assert!(!protocol_version_starts_from(12, ProtocolVersion::V13));
/// ```
pub fn protocol_version_starts_from(current_version: u32, version: ProtocolVersion) -> bool {
    current_version >= version as u32
}

/// Check whether the unified transaction envelope form is required.
///
/// From V13 onward, legacy `TxV0` envelopes are rewritten to the `Tx` form
/// before further processing.
pub fn unified_envelopes_supported(current_version: u32) -> bool {
    protocol_version_starts_from(current_version, ProtocolVersion::V13)
}

/// The lowest sequence number an account created in ledger `ledger_seq` can
/// use.
///
/// Accounts are seeded with `ledger_seq << 32`, so every sequence number
/// encodes the ledger in which its account was created. Candidate-set
/// building uses this boundary to split each account's pending queue: a
/// transaction set for ledger N may carry any number of transactions per
/// source account, but all of them must lie on the same side of
/// `starting_sequence_number(N)`.
pub fn starting_sequence_number(ledger_seq: u32) -> i64 {
    (ledger_seq as i64) << 32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_gating() {
        assert!(protocol_version_starts_from(13, ProtocolVersion::V13));
        assert!(protocol_version_starts_from(15, ProtocolVersion::V13));
        assert!(!protocol_version_starts_from(12, ProtocolVersion::V13));

        assert!(unified_envelopes_supported(13));
        assert!(!unified_envelopes_supported(12));
    }

    #[test]
    fn test_starting_sequence_number() {
        assert_eq!(starting_sequence_number(0), 0);
        assert_eq!(starting_sequence_number(1), 1 << 32);
        assert_eq!(starting_sequence_number(100), 100i64 << 32);
        assert_eq!(starting_sequence_number(0x7fff_ffff), 0x7fff_ffffi64 << 32);
    }
}
