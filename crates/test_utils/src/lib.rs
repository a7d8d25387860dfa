//! Test Utilities Crate
//!
//! Provides shared test infrastructure, fixtures, and helpers for the
//! dunning engine test suite.
//!
//! # Modules
//!
//! - `fixtures`: Pre-built test data (dates, amounts, policies)
//! - `builders`: Builder patterns for invoice snapshots and reminder history
//! - `assertions`: Custom assertion helpers for domain types
//! - `generators`: Property-based test data generators

pub mod fixtures;
pub mod builders;
pub mod assertions;
pub mod generators;

pub use fixtures::*;
pub use builders::*;
pub use assertions::*;
pub use generators::*;
