//! Response payloads of the incentive API

use chrono::NaiveDate;
use ft_core::session::Usuario;
use ft_core::{Cnpj, Porte, Record, RecordId};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use ft_core::error::{FiscalError, Result};

/// Executive summary from `/dashboard/resumo/`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardSummary {
    pub total_incentivos_ativos: u64,
    pub total_empresas: u64,
    pub custo_fiscal_total: f64,
    pub arrecadacao_incremental_total: f64,
    pub impacto_liquido_total: f64,
    pub bc_medio: f64,
    pub total_alertas_ativos: u64,
    pub distribuicao_porte: Vec<PorteCount>,
    pub top_setores: Vec<SetorCount>,
    pub data_atualizacao: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PorteCount {
    pub porte: String,
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetorCount {
    pub cnae_descricao: String,
    pub count: u64,
}

/// Ordering of `/calculos/ranking/`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RankingKind {
    /// Highest B/C ratio first
    #[default]
    Melhores,
    /// Lowest B/C ratio first
    Piores,
    /// Highest net impact first
    Impacto,
}

impl RankingKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RankingKind::Melhores => "melhores",
            RankingKind::Piores => "piores",
            RankingKind::Impacto => "impacto",
        }
    }
}

impl fmt::Display for RankingKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RankingKind {
    type Err = FiscalError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "melhores" => Ok(RankingKind::Melhores),
            "piores" => Ok(RankingKind::Piores),
            "impacto" => Ok(RankingKind::Impacto),
            other => Err(FiscalError::Validation(format!(
                "Unknown ranking type: {}",
                other
            ))),
        }
    }
}

/// Company as nested inside a ranking entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedEmpresa {
    pub id: RecordId,
    pub cnpj: Cnpj,
    #[serde(default)]
    pub razao_social: Option<String>,
    #[serde(default)]
    pub cnae_descricao: Option<String>,
    #[serde(default)]
    pub bairro: Option<String>,
    #[serde(default)]
    pub porte: Option<Porte>,
}

/// One row of the impact ranking
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankingEntry {
    pub id: RecordId,
    pub empresa: RankedEmpresa,
    pub bc_ratio: f64,
    pub impacto_liquido: f64,
    #[serde(default)]
    pub custo_fiscal: Option<f64>,
    #[serde(default)]
    pub arrecadacao_incremental: Option<f64>,
    #[serde(default)]
    pub payback_meses: Option<f64>,
    #[serde(default)]
    pub periodo_inicio: Option<NaiveDate>,
    #[serde(default)]
    pub periodo_fim: Option<NaiveDate>,
}

impl RankingEntry {
    /// Flatten into an exportable company record
    pub fn to_record(&self) -> Record {
        Record {
            id: self.empresa.id.clone(),
            cnpj: self.empresa.cnpj.clone(),
            razao_social: self.empresa.razao_social.clone(),
            cnae_descricao: self.empresa.cnae_descricao.clone(),
            bairro: self.empresa.bairro.clone(),
            porte: self.empresa.porte,
            bc_ratio: Some(self.bc_ratio),
            impacto_liquido: Some(self.impacto_liquido),
        }
    }
}

/// Alert severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severidade {
    Baixa,
    Media,
    Alta,
    Critica,
}

impl fmt::Display for Severidade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Severidade::Baixa => "BAIXA",
            Severidade::Media => "MEDIA",
            Severidade::Alta => "ALTA",
            Severidade::Critica => "CRITICA",
        })
    }
}

/// Alert from `/alertas/`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alerta {
    pub id: i64,
    /// CNPJ of the company the alert concerns
    pub empresa: Cnpj,
    #[serde(default)]
    pub empresa_razao_social: Option<String>,
    pub tipo_alerta: String,
    #[serde(default)]
    pub tipo_display: Option<String>,
    pub descricao: String,
    pub severidade: Severidade,
    #[serde(default)]
    pub data_alerta: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

/// Alert listing; the API may paginate
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum AlertaPage {
    Paginated { results: Vec<Alerta> },
    Plain(Vec<Alerta>),
}

impl AlertaPage {
    pub fn into_alertas(self) -> Vec<Alerta> {
        match self {
            AlertaPage::Paginated { results } => results,
            AlertaPage::Plain(alertas) => alertas,
        }
    }
}

/// Alert created by `/alertas/gerar-alertas/`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratedAlert {
    pub tipo: String,
    pub empresa: String,
    pub cnpj: Cnpj,
    #[serde(default)]
    pub dias_restantes: Option<i64>,
}

/// Response of `/alertas/gerar-alertas/`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratedAlerts {
    pub message: String,
    pub alertas: Vec<GeneratedAlert>,
}

/// Response of a CSV upload
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UploadReport {
    pub message: String,
    pub total: Option<u64>,
    pub errors: Vec<String>,
}

/// Response of `/auth/login/`, both success and rejection
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct LoginResponse {
    pub success: bool,
    pub token: Option<String>,
    pub usuario: Option<Usuario>,
    pub message: Option<String>,
    pub error: Option<String>,
}

/// Error payload the API sends with non-2xx responses
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub(crate) struct ErrorBody {
    pub error: Option<String>,
    pub detail: Option<String>,
}

impl ErrorBody {
    /// Extract a human message from a response body, if it carries one
    pub(crate) fn message_from(body: &str) -> Option<String> {
        let parsed: ErrorBody = serde_json::from_str(body).ok()?;
        parsed.error.or(parsed.detail)
    }
}
