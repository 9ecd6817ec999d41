//! ft-core - Core library for fiscal-tracker
//!
//! This crate provides the domain model of the municipal fiscal incentive
//! tracker: company records, client-side filtering, CSV export, the
//! authentication session and configuration.

pub mod error;
pub mod types;
pub mod config;
pub mod record;
pub mod filter;
pub mod export;
pub mod session;
pub mod sample;
pub mod view;

pub use error::{FiscalError, Result};
pub use record::Record;
pub use types::*;
