//! Bulk CSV ingestion

use ft_core::error::{FiscalError, Result};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Largest file the backend accepts
pub const MAX_UPLOAD_BYTES: u64 = 10 * 1024 * 1024;

/// Dataset an uploaded CSV feeds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadKind {
    Empresas,
    Incentivos,
    Iss,
    Iptu,
}

impl UploadKind {
    pub const ALL: [UploadKind; 4] = [
        UploadKind::Empresas,
        UploadKind::Incentivos,
        UploadKind::Iss,
        UploadKind::Iptu,
    ];

    /// API path of the upload endpoint
    pub fn endpoint(&self) -> &'static str {
        match self {
            UploadKind::Empresas => "/empresas/upload-csv/",
            UploadKind::Incentivos => "/incentivos/upload-csv/",
            UploadKind::Iss => "/arrecadacao-iss/upload-csv/",
            UploadKind::Iptu => "/arrecadacao-iptu/upload-csv/",
        }
    }

    /// Header line the backend expects
    pub fn expected_format(&self) -> &'static str {
        match self {
            UploadKind::Empresas => "cnpj,razao_social,bairro",
            UploadKind::Incentivos => "cnpj,tipo_incentivo,percentual",
            UploadKind::Iss => "cnpj,mes_ref,valor_iss",
            UploadKind::Iptu => "cnpj,ano_ref,valor_iptu",
        }
    }

    pub fn key(&self) -> &'static str {
        match self {
            UploadKind::Empresas => "empresas",
            UploadKind::Incentivos => "incentivos",
            UploadKind::Iss => "iss",
            UploadKind::Iptu => "iptu",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            UploadKind::Empresas => "Empresas",
            UploadKind::Incentivos => "Incentivos",
            UploadKind::Iss => "Arrecadação ISS",
            UploadKind::Iptu => "Arrecadação IPTU",
        }
    }
}

impl fmt::Display for UploadKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for UploadKind {
    type Err = FiscalError;

    fn from_str(s: &str) -> Result<Self> {
        UploadKind::ALL
            .into_iter()
            .find(|k| k.key().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| FiscalError::Validation(format!("Unknown upload type: {}", s)))
    }
}

/// A CSV file checked and read for upload
#[derive(Debug, Clone)]
pub struct UploadFile {
    pub path: PathBuf,
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl UploadFile {
    /// Check the file is a `.csv` no larger than [`MAX_UPLOAD_BYTES`], then read it
    pub fn read(path: &Path) -> Result<Self> {
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| FiscalError::Validation("Please select a file".to_string()))?
            .to_string();

        let is_csv = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));
        if !is_csv {
            return Err(FiscalError::Validation(
                "Only CSV files are allowed".to_string(),
            ));
        }

        let metadata = fs::metadata(path).map_err(|e| {
            FiscalError::Io(std::io::Error::new(
                e.kind(),
                format!("Cannot read {}: {}", path.display(), e),
            ))
        })?;
        if metadata.len() > MAX_UPLOAD_BYTES {
            return Err(FiscalError::Validation(
                "File too large. Maximum 10MB".to_string(),
            ));
        }

        Ok(Self {
            path: path.to_path_buf(),
            file_name,
            bytes: fs::read(path)?,
        })
    }

    /// Whether the first line matches the columns `kind` expects
    pub fn header_matches(&self, kind: UploadKind) -> bool {
        let text = String::from_utf8_lossy(&self.bytes);
        let header = text
            .trim_start_matches('\u{feff}')
            .lines()
            .next()
            .unwrap_or_default();
        let columns: Vec<String> = header
            .split(',')
            .map(|c| c.trim().trim_matches('"').to_ascii_lowercase())
            .collect();
        kind.expected_format()
            .split(',')
            .all(|expected| columns.iter().any(|c| c == expected))
    }
}
