//! Loading the company list and server-side export

use chrono::NaiveDate;
use ft_core::error::{FiscalError, Result};
use ft_core::export::{count_data_rows, export_filename, Blob, DownloadSink, ExportOutcome};
use ft_core::filter::FilterCriteria;
use ft_core::sample::sample_records;
use ft_core::{Cnpj, Record};
use std::fmt;
use tracing::{info, warn};

use crate::client::FiscalApi;

/// Where the loaded records came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataSource {
    Api,
    Sample,
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataSource::Api => write!(f, "API"),
            DataSource::Sample => write!(f, "sample data"),
        }
    }
}

/// Company list together with its origin
#[derive(Debug, Clone)]
pub struct LoadedRecords {
    pub records: Vec<Record>,
    pub source: DataSource,
}

impl LoadedRecords {
    pub fn sample() -> Self {
        Self {
            records: sample_records(),
            source: DataSource::Sample,
        }
    }
}

/// Fetch all companies. With `fallback` set, a network failure yields the
/// built-in sample set instead of an error.
pub async fn load_records(api: &dyn FiscalApi, fallback: bool) -> Result<LoadedRecords> {
    match api.list_empresas().await {
        Ok(records) => Ok(LoadedRecords {
            records,
            source: DataSource::Api,
        }),
        Err(e) if fallback && e.is_network() => {
            warn!("Could not load companies from the API, using sample data: {}", e);
            Ok(LoadedRecords::sample())
        }
        Err(e) => Err(e.with_context("Failed to load companies")),
    }
}

/// Full detail of the company with CNPJ `raw`, as the backend returns it.
///
/// The CNPJ is checked locally first so a typo never reaches the API.
pub async fn fetch_detalhe(api: &dyn FiscalApi, raw: &str) -> Result<serde_json::Value> {
    let cnpj = Cnpj::parse(raw)?;
    api.empresa_detalhe(&cnpj)
        .await
        .map_err(|e| e.with_context(format!("Failed to load company {}", cnpj.formatted())))
}

/// Let the backend render the CSV for `criteria` and save what it returns.
///
/// A document with a header but no data rows is reported as
/// [`ExportOutcome::NothingToExport`] and nothing is saved.
pub async fn export_via_server(
    api: &dyn FiscalApi,
    criteria: &FilterCriteria,
    sink: &dyn DownloadSink,
    prefix: &str,
    date: NaiveDate,
) -> Result<ExportOutcome> {
    let bytes = api
        .exportar(criteria)
        .await
        .map_err(|e| FiscalError::ExportFailed(e.to_string()))?;

    let rows =
        count_data_rows(&bytes).map_err(|e| FiscalError::ExportFailed(e.to_string()))?;
    if rows == 0 {
        return Ok(ExportOutcome::NothingToExport);
    }

    let blob = Blob::new("text/csv;charset=utf-8", bytes);
    let filename = export_filename(prefix, date, "csv");
    let location = sink
        .deliver(&blob, &filename)
        .map_err(|e| FiscalError::ExportFailed(e.to_string()))?;

    info!(rows, bytes = blob.len(), "server export saved as {}", filename);
    Ok(ExportOutcome::Exported {
        filename,
        location,
        rows,
        bytes: blob.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeApi;
    use ft_core::export::{MemorySink, SaveLocation};
    use ft_core::Porte;
    use pretty_assertions::assert_eq;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 7).unwrap()
    }

    #[tokio::test]
    async fn test_load_from_api() {
        let api = FakeApi::default().with_records(vec![Record::new(1, "11222333000181")]);
        let loaded = load_records(&api, true).await.unwrap();
        assert_eq!(loaded.source, DataSource::Api);
        assert_eq!(loaded.records.len(), 1);
    }

    #[tokio::test]
    async fn test_network_failure_falls_back_to_sample() {
        let api = FakeApi::default();
        let loaded = load_records(&api, true).await.unwrap();
        assert_eq!(loaded.source, DataSource::Sample);
        assert_eq!(loaded.records.len(), 10);
    }

    #[tokio::test]
    async fn test_no_fallback_propagates() {
        let api = FakeApi::default();
        let err = load_records(&api, false).await.unwrap_err();
        assert!(err.is_network());
    }

    #[tokio::test]
    async fn test_detalhe_normalizes_cnpj() {
        let detail = serde_json::json!({"cnpj": "11222333000181", "razao_social": "Alpha"});
        let api = FakeApi::default().with_detalhe(detail.clone());

        let fetched = fetch_detalhe(&api, "11.222.333/0001-81").await.unwrap();

        assert_eq!(fetched, detail);
        assert_eq!(api.last_detalhe(), Some(Cnpj::new("11222333000181")));
    }

    #[tokio::test]
    async fn test_detalhe_invalid_cnpj_never_calls_api() {
        let api = FakeApi::default().with_detalhe(serde_json::json!({}));

        let err = fetch_detalhe(&api, "11.222.333/0001-00").await.unwrap_err();

        assert!(matches!(err, FiscalError::InvalidCnpj { .. }));
        assert_eq!(api.last_detalhe(), None);
    }

    #[tokio::test]
    async fn test_detalhe_network_failure_keeps_kind() {
        let api = FakeApi::default();
        let err = fetch_detalhe(&api, "11222333000181").await.unwrap_err();
        assert!(err.is_network());
        assert!(err.to_string().contains("11.222.333/0001-81"));
    }

    #[tokio::test]
    async fn test_server_export_direct_save_path() {
        struct DirectSink(std::sync::Mutex<Vec<String>>);

        impl DownloadSink for DirectSink {
            fn save_blob(&self, _blob: &Blob, filename: &str) -> Option<Result<SaveLocation>> {
                self.0.lock().unwrap().push(filename.to_string());
                Some(Ok(SaveLocation::Stdout))
            }

            fn save(&self, _blob: &Blob, _filename: &str) -> Result<SaveLocation> {
                panic!("staged path used although a direct one exists")
            }
        }

        let api = FakeApi::default().with_export_body("ID,CNPJ\n1,\"11222333000181\"\n");
        let sink = DirectSink(std::sync::Mutex::new(Vec::new()));

        let outcome = export_via_server(&api, &FilterCriteria::new(), &sink, "x", date())
            .await
            .unwrap();

        assert!(matches!(outcome, ExportOutcome::Exported { location: SaveLocation::Stdout, .. }));
        assert_eq!(*sink.0.lock().unwrap(), vec!["x-2024-03-07.csv".to_string()]);
    }

    #[tokio::test]
    async fn test_server_export_saves_body_verbatim() {
        let body = "\u{feff}ID,CNPJ\n1,\"11222333000181\"\n";
        let api = FakeApi::default().with_export_body(body);
        let sink = MemorySink::new();
        let criteria = FilterCriteria::new().with_porte(Porte::Me);

        let outcome = export_via_server(&api, &criteria, &sink, "empresas-report", date())
            .await
            .unwrap();

        assert_eq!(
            outcome,
            ExportOutcome::Exported {
                filename: "empresas-report-2024-03-07.csv".to_string(),
                location: SaveLocation::Memory,
                rows: 1,
                bytes: body.len(),
            }
        );
        assert_eq!(sink.saved()[0].1.as_bytes(), body.as_bytes());
        assert_eq!(api.last_export(), Some(criteria));
    }

    #[tokio::test]
    async fn test_server_export_header_only_is_nothing() {
        let api = FakeApi::default().with_export_body("ID,CNPJ\n");
        let sink = MemorySink::new();

        let outcome = export_via_server(&api, &FilterCriteria::new(), &sink, "x", date())
            .await
            .unwrap();
        assert_eq!(outcome, ExportOutcome::NothingToExport);
        assert!(sink.saved().is_empty());
    }

    #[tokio::test]
    async fn test_server_export_failure() {
        let api = FakeApi::default();
        let sink = MemorySink::new();
        let err = export_via_server(&api, &FilterCriteria::new(), &sink, "x", date())
            .await
            .unwrap_err();
        assert!(matches!(err, FiscalError::ExportFailed(_)));
    }
}
