//! Exporter trait and the export pipeline

use chrono::NaiveDate;
use tracing::{debug, info};

use super::csv::CsvExporter;
use super::filename::{export_filename, DEFAULT_PREFIX};
use super::sink::{Blob, DownloadSink, SaveLocation};
use crate::error::{FiscalError, Result};
use crate::record::Record;

/// Trait for record document encoders
pub trait Exporter: Send + Sync {
    /// Encode records to a complete document
    fn export(&self, records: &[Record]) -> Result<String>;

    /// Get the format name
    fn format_name(&self) -> &str;

    /// Get the file extension
    fn file_extension(&self) -> &str;

    /// MIME type of the produced document
    fn mime_type(&self) -> &str;
}

/// Result of an export request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportOutcome {
    /// A file was produced and handed to the sink
    Exported {
        filename: String,
        location: SaveLocation,
        rows: usize,
        bytes: usize,
    },
    /// Nothing was selected; no file was produced
    NothingToExport,
}

impl ExportOutcome {
    /// Message suitable for showing to the user
    pub fn message(&self) -> String {
        match self {
            ExportOutcome::Exported { rows, location, .. } => {
                format!("Exported {} companies to {}", rows, location)
            }
            ExportOutcome::NothingToExport => "No companies to export".to_string(),
        }
    }
}

/// Turns the visible record set into a downloaded file
pub struct RecordExporter {
    exporter: Box<dyn Exporter>,
    prefix: String,
}

impl RecordExporter {
    /// CSV exporter with the default filename prefix
    pub fn new() -> Self {
        Self::with_exporter(Box::new(CsvExporter::new()))
    }

    /// Use a different encoder
    pub fn with_exporter(exporter: Box<dyn Exporter>) -> Self {
        Self {
            exporter,
            prefix: DEFAULT_PREFIX.to_string(),
        }
    }

    /// Set the filename prefix
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    /// Filename an export on `date` would get
    pub fn filename(&self, date: NaiveDate) -> String {
        export_filename(&self.prefix, date, self.exporter.file_extension())
    }

    /// Encode `records` into a blob without saving it
    pub fn to_blob(&self, records: &[Record]) -> Result<Blob> {
        let document = self
            .exporter
            .export(records)
            .map_err(|e| FiscalError::ExportFailed(e.to_string()))?;
        Ok(Blob::from_text(self.exporter.mime_type(), document))
    }

    /// Export exactly `records`, in order, to `sink`.
    ///
    /// An empty slice is not an error: it yields
    /// [`ExportOutcome::NothingToExport`] and the sink is never touched.
    pub fn export(
        &self,
        records: &[Record],
        sink: &dyn DownloadSink,
        date: NaiveDate,
    ) -> Result<ExportOutcome> {
        if records.is_empty() {
            debug!("Export requested with no records");
            return Ok(ExportOutcome::NothingToExport);
        }

        let blob = self.to_blob(records)?;
        let filename = self.filename(date);
        let location = sink.deliver(&blob, &filename).map_err(|e| match e {
            FiscalError::ExportFailed(_) => e,
            other => FiscalError::ExportFailed(other.to_string()),
        })?;

        info!(
            rows = records.len(),
            bytes = blob.len(),
            "exported {} as {}",
            filename,
            self.exporter.format_name()
        );

        Ok(ExportOutcome::Exported {
            filename,
            location,
            rows: records.len(),
            bytes: blob.len(),
        })
    }
}

impl Default for RecordExporter {
    fn default() -> Self {
        Self::new()
    }
}
