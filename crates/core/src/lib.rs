//! # Lifeline Core
//!
//! Domain types, traits, and error definitions for the Lifeline heartbeat
//! runtime. This crate performs **no I/O**: it defines the vocabulary every
//! other crate builds on.
//!
//! ## Design Philosophy
//!
//! Each external collaborator of a heartbeat cycle is a trait here:
//! - [`BalanceSource`] reports an account's currency balance
//! - [`TierClassifier`] maps a credit balance to a [`SurvivalTier`]
//!
//! Implementations live in their respective crates, so tests can swap in
//! scripted stand-ins without touching the network.

pub mod balance;
pub mod cycle_id;
pub mod error;
pub mod tier;

// Re-export key types at crate root for ergonomics
pub use balance::{BalanceSource, credits_from_currency};
pub use cycle_id::{CycleId, CycleIdGenerator};
pub use error::{BalanceError, Error, Result};
pub use tier::{SurvivalTier, ThresholdClassifier, TierClassifier};
