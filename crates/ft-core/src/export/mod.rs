//! Export of the visible company list
//!
//! This module turns an ordered slice of [`Record`](crate::record::Record)s
//! into a CSV document and hands it to a download sink.
//!
//! # Overview
//!
//! Export functionality supports:
//! - CSV encoding with RFC 4180 quoting and a UTF-8 BOM
//! - Date-stamped filenames (`empresas-report-2024-03-07.csv`)
//! - Directory, stdout and in-memory sinks
//!
//! # Example
//!
//! ```ignore
//! use ft_core::export::{DirectorySink, RecordExporter};
//!
//! let visible = criteria.apply(&records);
//! let outcome = RecordExporter::new().export(&visible, &DirectorySink::new("."), today)?;
//! println!("{}", outcome.message());
//! ```

mod csv;
mod exporter;
mod filename;
mod sink;

pub use self::csv::{count_data_rows, escape_field, quote_field, CsvExporter, BOM, HEADERS};
pub use exporter::{ExportOutcome, Exporter, RecordExporter};
pub use filename::{export_date, export_date_at, export_filename, sanitize_prefix, DEFAULT_PREFIX};
pub use sink::{Blob, DirectorySink, DownloadSink, MemorySink, SaveLocation, StdoutSink};
