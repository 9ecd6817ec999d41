//! Dashboard views

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{FiscalError, Result};

/// A navigation target. Unknown targets cannot be represented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum View {
    Dashboard,
    Empresas,
    Upload,
    Alertas,
}

impl View {
    /// All views in menu order
    pub const ALL: [View; 4] = [View::Dashboard, View::Empresas, View::Upload, View::Alertas];

    /// Navigation key
    pub fn key(&self) -> &'static str {
        match self {
            View::Dashboard => "dashboard",
            View::Empresas => "empresas",
            View::Upload => "upload",
            View::Alertas => "alertas",
        }
    }

    /// Page title
    pub fn title(&self) -> &'static str {
        match self {
            View::Dashboard => "Dashboard",
            View::Empresas => "Empresas",
            View::Upload => "Upload de Dados",
            View::Alertas => "Alertas",
        }
    }
}

impl Default for View {
    fn default() -> Self {
        View::Dashboard
    }
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for View {
    type Err = FiscalError;

    fn from_str(s: &str) -> Result<Self> {
        View::ALL
            .into_iter()
            .find(|v| v.key() == s.trim().to_ascii_lowercase())
            .ok_or_else(|| FiscalError::Validation(format!("Unknown view: {}", s)))
    }
}
