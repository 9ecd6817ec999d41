//! ft-api - REST client library for fiscal-tracker
//!
//! This crate talks to the SEMDEC incentive backend.
//!
//! ## Features
//!
//! - `FiscalApi` trait over every endpoint the dashboard uses
//! - reqwest implementation with bearer-token auth
//! - Login against the auth endpoint, persisted through a key/value store
//! - Company loading with sample-data fallback, and server-side CSV export
//! - Per-company detail lookup by CNPJ
//! - CSV bulk upload
//!
//! ## Usage
//!
//! ```rust,ignore
//! use ft_api::{load_records, HttpClient};
//!
//! let api = HttpClient::new(&config.api)?.with_session(&session);
//! let loaded = load_records(&api, true).await?;
//! println!("{} companies from {}", loaded.records.len(), loaded.source);
//! ```

pub mod auth;
pub mod client;
pub mod data;
pub mod models;
pub mod upload;

#[cfg(test)]
mod testing;

pub use client::{export_query, FiscalApi, HttpClient};
pub use data::{export_via_server, fetch_detalhe, load_records, DataSource, LoadedRecords};
pub use models::{
    Alerta, DashboardSummary, GeneratedAlerts, LoginResponse, RankingEntry, RankingKind,
    Severidade, UploadReport,
};
pub use upload::{UploadFile, UploadKind, MAX_UPLOAD_BYTES};
