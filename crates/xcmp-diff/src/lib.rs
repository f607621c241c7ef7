//! Comparison of two fingerprinted XML documents.
//!
//! Equal root fingerprints short-circuit to "equal". Otherwise the trees are
//! walked in parallel, pairing children by fingerprint first and by name
//! second, and every mismatch is reported with the paths of the nodes
//! involved.
//!
//! # Key Types
//!
//! - [`Comparison`] / [`Difference`] -- Result of [`compare`]
//! - [`CompareConfig`] -- Child ordering, namespace and result-limit options

pub mod compare;
pub mod config;
pub mod error;

pub use compare::{compare, Comparison, Difference};
pub use config::CompareConfig;
pub use error::{DiffError, DiffResult};
