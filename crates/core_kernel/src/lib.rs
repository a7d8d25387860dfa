//! Core Kernel - Foundational types and utilities for the dunning engine
//!
//! This crate provides the fundamental building blocks used by the dunning domain:
//! - Money types with precise decimal arithmetic
//! - Calendar date arithmetic and organization timezones
//! - Strongly-typed identifiers

pub mod money;
pub mod temporal;
pub mod identifiers;
pub mod error;

pub use money::{Money, Currency, MoneyError};
pub use temporal::{Timezone, TemporalError};
pub use identifiers::{InvoiceId, ReminderId, DunningEventId};
pub use error::CoreError;
