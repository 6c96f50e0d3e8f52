//! Shared foundation types for hayashi.
//!
//! This crate provides the small set of types used across the hayashi
//! crates:
//!
//! - [`Hash256`] - 32-byte SHA-256 digest with hex rendering
//! - [`AccountId`] - account identifier, usable directly as a map key
//! - [`protocol`] - protocol-version gating and sequence-number rules

pub mod protocol;
pub mod types;

pub use types::{AccountId, Hash256, Sha256Hasher};
