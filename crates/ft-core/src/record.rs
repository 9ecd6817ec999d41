//! Company record as listed and exported by the dashboard

use serde::{Deserialize, Serialize};

use crate::types::{Cnpj, Porte, RecordId};

/// One company/incentive row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub id: RecordId,
    pub cnpj: Cnpj,
    #[serde(default)]
    pub razao_social: Option<String>,
    /// Sector label (CNAE description)
    #[serde(default, alias = "setor")]
    pub cnae_descricao: Option<String>,
    #[serde(default)]
    pub bairro: Option<String>,
    #[serde(default)]
    pub porte: Option<Porte>,
    #[serde(default)]
    pub bc_ratio: Option<f64>,
    /// Net fiscal impact in reais
    #[serde(default)]
    pub impacto_liquido: Option<f64>,
}

impl Record {
    /// Create a record with only the identifying fields set
    pub fn new(id: impl Into<RecordId>, cnpj: impl Into<Cnpj>) -> Self {
        Self {
            id: id.into(),
            cnpj: cnpj.into(),
            razao_social: None,
            cnae_descricao: None,
            bairro: None,
            porte: None,
            bc_ratio: None,
            impacto_liquido: None,
        }
    }

    /// Set the legal name
    pub fn with_razao_social(mut self, name: impl Into<String>) -> Self {
        self.razao_social = Some(name.into());
        self
    }

    /// Set the sector label
    pub fn with_setor(mut self, setor: impl Into<String>) -> Self {
        self.cnae_descricao = Some(setor.into());
        self
    }

    /// Set the neighbourhood
    pub fn with_bairro(mut self, bairro: impl Into<String>) -> Self {
        self.bairro = Some(bairro.into());
        self
    }

    /// Set the size class
    pub fn with_porte(mut self, porte: Porte) -> Self {
        self.porte = Some(porte);
        self
    }

    /// Set benefit/cost ratio and net impact
    pub fn with_metrics(mut self, bc_ratio: f64, impacto_liquido: f64) -> Self {
        self.bc_ratio = Some(bc_ratio);
        self.impacto_liquido = Some(impacto_liquido);
        self
    }

    /// Sector label, if any
    pub fn setor(&self) -> Option<&str> {
        self.cnae_descricao.as_deref()
    }

    /// Rating of the B/C ratio used for highlighting
    pub fn bc_rating(&self) -> Option<BcRating> {
        self.bc_ratio.map(BcRating::from_ratio)
    }
}

/// Coarse rating of a benefit/cost ratio
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BcRating {
    /// >= 1.5
    Good,
    /// >= 1.0
    Ok,
    /// < 1.0, the incentive costs more than it returns
    Bad,
}

impl BcRating {
    pub fn from_ratio(ratio: f64) -> Self {
        if ratio >= 1.5 {
            BcRating::Good
        } else if ratio >= 1.0 {
            BcRating::Ok
        } else {
            BcRating::Bad
        }
    }
}

/// Company listing as returned by `/empresas/`: either a bare array or a
/// paginated `results` envelope.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RecordPage {
    Paginated {
        #[serde(default)]
        count: Option<u64>,
        #[serde(default)]
        next: Option<String>,
        results: Vec<Record>,
    },
    Plain(Vec<Record>),
}

impl RecordPage {
    /// The records, regardless of envelope
    pub fn into_records(self) -> Vec<Record> {
        match self {
            RecordPage::Paginated { results, .. } => results,
            RecordPage::Plain(records) => records,
        }
    }

    /// URL of the next page, if the server paginates
    pub fn next_page(&self) -> Option<&str> {
        match self {
            RecordPage::Paginated { next, .. } => next.as_deref(),
            RecordPage::Plain(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_record_deserialize_full() {
        let json = r#"{
            "id": 1,
            "cnpj": "01234567000199",
            "razao_social": "Empresa Alpha Ltda",
            "cnae_descricao": "Tecnologia",
            "bairro": "Centro",
            "porte": "ME",
            "bc_ratio": 2.5,
            "impacto_liquido": 450000
        }"#;
        let record: Record = serde_json::from_str(json).unwrap();
        assert_eq!(record.cnpj.as_str(), "01234567000199");
        assert_eq!(record.setor(), Some("Tecnologia"));
        assert_eq!(record.porte, Some(Porte::Me));
        assert_eq!(record.impacto_liquido, Some(450000.0));
    }

    #[test]
    fn test_record_accepts_setor_alias_and_missing_fields() {
        let json = r#"{"id": "a-1", "cnpj": "11222333000181", "setor": "Comércio"}"#;
        let record: Record = serde_json::from_str(json).unwrap();
        assert_eq!(record.id, RecordId::Text("a-1".into()));
        assert_eq!(record.setor(), Some("Comércio"));
        assert!(record.razao_social.is_none());
        assert!(record.bc_ratio.is_none());
    }

    #[test]
    fn test_record_page_envelopes() {
        let plain = r#"[{"id": 1, "cnpj": "11222333000181"}]"#;
        let page: RecordPage = serde_json::from_str(plain).unwrap();
        assert!(page.next_page().is_none());
        assert_eq!(page.into_records().len(), 1);

        let paged = r#"{"count": 2, "next": "http://x/?page=2", "results": [{"id": 1, "cnpj": "11222333000181"}]}"#;
        let page: RecordPage = serde_json::from_str(paged).unwrap();
        assert_eq!(page.next_page(), Some("http://x/?page=2"));
        assert_eq!(page.into_records().len(), 1);
    }

    #[test]
    fn test_bc_rating_thresholds() {
        assert_eq!(BcRating::from_ratio(2.0), BcRating::Good);
        assert_eq!(BcRating::from_ratio(1.5), BcRating::Good);
        assert_eq!(BcRating::from_ratio(1.0), BcRating::Ok);
        assert_eq!(BcRating::from_ratio(0.8), BcRating::Bad);
    }
}
