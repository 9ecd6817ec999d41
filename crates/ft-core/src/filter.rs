//! Client-side record filtering
//!
//! Filtering is a view over the loaded records: it never mutates or drops
//! the underlying collection, and whatever it returns is exactly what an
//! export writes.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

use crate::record::Record;
use crate::types::Porte;

/// Value the dashboard used for "any" in its select boxes
pub const ALL_SENTINEL: &str = "todos";

/// Filter predicates applied to the company list
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterCriteria {
    /// Matches name (case-insensitive) or CNPJ (verbatim)
    #[serde(default)]
    pub busca: String,
    /// Exact sector label
    #[serde(default)]
    pub setor: Option<String>,
    /// Exact size class
    #[serde(default)]
    pub porte: Option<Porte>,
}

impl FilterCriteria {
    /// Criteria matching everything
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the name/CNPJ search text
    pub fn with_busca(mut self, busca: impl Into<String>) -> Self {
        self.busca = busca.into();
        self
    }

    /// Restrict to a sector; empty or `todos` clears the restriction
    pub fn with_setor(mut self, setor: impl Into<String>) -> Self {
        let setor = setor.into();
        self.setor = if is_unrestricted(&setor) {
            None
        } else {
            Some(setor)
        };
        self
    }

    /// Restrict to a size class
    pub fn with_porte(mut self, porte: Porte) -> Self {
        self.porte = Some(porte);
        self
    }

    /// Whether no predicate is active
    pub fn is_empty(&self) -> bool {
        self.busca.is_empty() && self.setor.is_none() && self.porte.is_none()
    }

    /// Test one record
    pub fn matches(&self, record: &Record) -> bool {
        self.matches_busca(record) && self.matches_setor(record) && self.matches_porte(record)
    }

    /// Records passing the filter, in their original order
    pub fn apply(&self, records: &[Record]) -> Vec<Record> {
        records.iter().filter(|r| self.matches(r)).cloned().collect()
    }

    fn matches_busca(&self, record: &Record) -> bool {
        if self.busca.is_empty() {
            return true;
        }
        let needle = self.busca.to_lowercase();
        let by_name = record
            .razao_social
            .as_deref()
            .is_some_and(|name| name.to_lowercase().contains(&needle));
        by_name || record.cnpj.contains(&self.busca)
    }

    fn matches_setor(&self, record: &Record) -> bool {
        match &self.setor {
            None => true,
            Some(setor) => record.setor() == Some(setor.as_str()),
        }
    }

    fn matches_porte(&self, record: &Record) -> bool {
        match self.porte {
            None => true,
            Some(porte) => record.porte == Some(porte),
        }
    }
}

/// Whether a select-box value means "no restriction"
pub fn is_unrestricted(value: &str) -> bool {
    let value = value.trim();
    value.is_empty() || value.eq_ignore_ascii_case(ALL_SENTINEL)
}

/// Distinct sector labels in first-seen order
pub fn distinct_setores(records: &[Record]) -> Vec<String> {
    let mut seen = HashSet::new();
    records
        .iter()
        .filter_map(|r| r.setor())
        .filter(|s| seen.insert(*s))
        .map(str::to_string)
        .collect()
}

/// Distinct size classes in first-seen order
pub fn distinct_portes(records: &[Record]) -> Vec<Porte> {
    let mut seen = HashSet::new();
    records
        .iter()
        .filter_map(|r| r.porte)
        .filter(|p| seen.insert(*p))
        .collect()
}

/// How many records a filter kept out of how many were loaded
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilterSummary {
    pub shown: usize,
    pub total: usize,
}

impl FilterSummary {
    pub fn new(shown: usize, total: usize) -> Self {
        Self { shown, total }
    }
}

impl fmt::Display for FilterSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Showing {} of {} companies", self.shown, self.total)
    }
}
