//! In-process stand-in for the API used by unit tests

use async_trait::async_trait;
use ft_core::error::{FiscalError, Result};
use ft_core::filter::FilterCriteria;
use ft_core::{Cnpj, Record};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use crate::client::FiscalApi;
use crate::models::{
    Alerta, DashboardSummary, GeneratedAlerts, LoginResponse, RankingEntry, RankingKind,
    UploadReport,
};
use crate::upload::{UploadFile, UploadKind};

/// Canned responses; anything not configured fails as unreachable
#[derive(Default)]
pub(crate) struct FakeApi {
    records: Option<Vec<Record>>,
    export_body: Option<Vec<u8>>,
    detalhe: Option<serde_json::Value>,
    last_detalhe: Mutex<Option<Cnpj>>,
    login: Mutex<Option<Result<LoginResponse>>>,
    login_calls: AtomicUsize,
    last_export: Mutex<Option<FilterCriteria>>,
}

fn unreachable() -> FiscalError {
    FiscalError::Http("connection refused".to_string())
}

impl FakeApi {
    pub(crate) fn with_records(mut self, records: Vec<Record>) -> Self {
        self.records = Some(records);
        self
    }

    pub(crate) fn with_export_body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.export_body = Some(body.into());
        self
    }

    pub(crate) fn with_detalhe(mut self, detail: serde_json::Value) -> Self {
        self.detalhe = Some(detail);
        self
    }

    pub(crate) fn last_detalhe(&self) -> Option<Cnpj> {
        self.last_detalhe.lock().unwrap().clone()
    }

    pub(crate) fn with_login(self, response: Result<LoginResponse>) -> Self {
        *self.login.lock().unwrap() = Some(response);
        self
    }

    pub(crate) fn login_calls(&self) -> usize {
        self.login_calls.load(Ordering::SeqCst)
    }

    pub(crate) fn last_export(&self) -> Option<FilterCriteria> {
        self.last_export.lock().unwrap().clone()
    }
}

#[async_trait]
impl FiscalApi for FakeApi {
    async fn resumo(&self) -> Result<DashboardSummary> {
        Err(unreachable())
    }

    async fn list_empresas(&self) -> Result<Vec<Record>> {
        self.records.clone().ok_or_else(unreachable)
    }

    async fn empresa_detalhe(&self, cnpj: &Cnpj) -> Result<serde_json::Value> {
        *self.last_detalhe.lock().unwrap() = Some(cnpj.clone());
        self.detalhe.clone().ok_or_else(unreachable)
    }

    async fn exportar(&self, criteria: &FilterCriteria) -> Result<Vec<u8>> {
        *self.last_export.lock().unwrap() = Some(criteria.clone());
        self.export_body.clone().ok_or_else(unreachable)
    }

    async fn upload_csv(&self, _kind: UploadKind, _file: &UploadFile) -> Result<UploadReport> {
        Err(unreachable())
    }

    async fn ranking(&self, _kind: RankingKind, _limite: u32) -> Result<Vec<RankingEntry>> {
        Err(unreachable())
    }

    async fn alertas(&self) -> Result<Vec<Alerta>> {
        Err(unreachable())
    }

    async fn gerar_alertas(&self) -> Result<GeneratedAlerts> {
        Err(unreachable())
    }

    async fn login(&self, _username: &str, _senha: &str) -> Result<LoginResponse> {
        self.login_calls.fetch_add(1, Ordering::SeqCst);
        self.login
            .lock()
            .unwrap()
            .take()
            .unwrap_or_else(|| Err(unreachable()))
    }
}
