//! Core type definitions for fiscal-tracker

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::error::{FiscalError, Result};

/// Number of digits in a CNPJ
pub const CNPJ_LEN: usize = 14;

/// Brazilian company registration number.
///
/// Always held as text. A CNPJ is an identifier, not a quantity: turning it
/// into a number drops the leading zeros, so no code path here ever does.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Cnpj(String);

impl Cnpj {
    /// Wrap a CNPJ exactly as given
    pub fn new(s: impl Into<String>) -> Self {
        Cnpj(s.into())
    }

    /// Parse and validate a CNPJ, accepting punctuated input
    pub fn parse(s: &str) -> Result<Self> {
        let cnpj = Cnpj(s.trim().to_string());
        cnpj.validate()?;
        Ok(Cnpj(cnpj.normalized()))
    }

    /// The raw text
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Digits only (`12.345.678/0001-95` -> `12345678000195`)
    pub fn normalized(&self) -> String {
        self.0.chars().filter(|c| c.is_ascii_digit()).collect()
    }

    /// Display form `00.000.000/0000-00`; falls back to the raw text when the
    /// value does not have 14 digits.
    pub fn formatted(&self) -> String {
        let d = self.normalized();
        if d.len() != CNPJ_LEN {
            return self.0.clone();
        }
        format!(
            "{}.{}.{}/{}-{}",
            &d[0..2],
            &d[2..5],
            &d[5..8],
            &d[8..12],
            &d[12..14]
        )
    }

    /// Check length and both mod-11 check digits
    pub fn validate(&self) -> Result<()> {
        let digits: Vec<u32> = self
            .normalized()
            .chars()
            .filter_map(|c| c.to_digit(10))
            .collect();

        if digits.len() != CNPJ_LEN {
            return Err(self.invalid("must have 14 digits"));
        }
        if digits.iter().all(|&d| d == digits[0]) {
            return Err(self.invalid("all digits are equal"));
        }

        const FIRST: [u32; 12] = [5, 4, 3, 2, 9, 8, 7, 6, 5, 4, 3, 2];
        const SECOND: [u32; 13] = [6, 5, 4, 3, 2, 9, 8, 7, 6, 5, 4, 3, 2];

        if check_digit(&digits[..12], &FIRST) != digits[12] {
            return Err(self.invalid("first check digit mismatch"));
        }
        if check_digit(&digits[..13], &SECOND) != digits[13] {
            return Err(self.invalid("second check digit mismatch"));
        }
        Ok(())
    }

    /// Whether the text contains `needle` verbatim
    pub fn contains(&self, needle: &str) -> bool {
        self.0.contains(needle)
    }

    fn invalid(&self, reason: &str) -> FiscalError {
        FiscalError::InvalidCnpj {
            cnpj: self.0.clone(),
            reason: reason.to_string(),
        }
    }
}

fn check_digit(digits: &[u32], weights: &[u32]) -> u32 {
    let sum: u32 = digits.iter().zip(weights).map(|(d, w)| d * w).sum();
    match sum % 11 {
        r if r < 2 => 0,
        r => 11 - r,
    }
}

impl fmt::Display for Cnpj {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for Cnpj {
    fn from(s: &str) -> Self {
        Cnpj::new(s)
    }
}

impl Serialize for Cnpj {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for Cnpj {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        deserializer.deserialize_any(CnpjVisitor)
    }
}

struct CnpjVisitor;

impl<'de> Visitor<'de> for CnpjVisitor {
    type Value = Cnpj;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a CNPJ as a string or a non-negative integer")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> std::result::Result<Cnpj, E> {
        Ok(Cnpj::new(v))
    }

    fn visit_string<E: de::Error>(self, v: String) -> std::result::Result<Cnpj, E> {
        Ok(Cnpj(v))
    }

    // Backends that store the CNPJ numerically have already lost the zeros;
    // pad them back.
    fn visit_u64<E: de::Error>(self, v: u64) -> std::result::Result<Cnpj, E> {
        Ok(Cnpj(format!("{:0width$}", v, width = CNPJ_LEN)))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> std::result::Result<Cnpj, E> {
        let v = u64::try_from(v).map_err(|_| E::custom("negative CNPJ"))?;
        self.visit_u64(v)
    }
}

/// Record identifier, numeric or textual depending on the backend
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecordId {
    Int(i64),
    Text(String),
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordId::Int(n) => write!(f, "{}", n),
            RecordId::Text(s) => write!(f, "{}", s),
        }
    }
}

impl From<i64> for RecordId {
    fn from(n: i64) -> Self {
        RecordId::Int(n)
    }
}

impl From<i32> for RecordId {
    fn from(n: i32) -> Self {
        RecordId::Int(n.into())
    }
}

/// Company size classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Porte {
    /// Microempreendedor Individual
    Mei,
    /// Microempresa
    Me,
    /// Empresa de Pequeno Porte
    Epp,
    /// Empresa de Médio Porte
    Media,
    /// Empresa de Grande Porte
    Grande,
}

impl Porte {
    /// All size classes, smallest first
    pub const ALL: [Porte; 5] = [
        Porte::Mei,
        Porte::Me,
        Porte::Epp,
        Porte::Media,
        Porte::Grande,
    ];

    /// Wire code (`ME`, `EPP`, ...)
    pub fn code(&self) -> &'static str {
        match self {
            Porte::Mei => "MEI",
            Porte::Me => "ME",
            Porte::Epp => "EPP",
            Porte::Media => "MEDIA",
            Porte::Grande => "GRANDE",
        }
    }

    /// Human-readable label
    pub fn label(&self) -> &'static str {
        match self {
            Porte::Mei => "Microempreendedor Individual",
            Porte::Me => "Microempresa",
            Porte::Epp => "Empresa de Pequeno Porte",
            Porte::Media => "Empresa de Médio Porte",
            Porte::Grande => "Empresa de Grande Porte",
        }
    }
}

impl fmt::Display for Porte {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Porte {
    type Err = FiscalError;

    fn from_str(s: &str) -> Result<Self> {
        Porte::ALL
            .into_iter()
            .find(|p| p.code().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| FiscalError::Validation(format!("Unknown porte: {}", s)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_cnpj_keeps_leading_zeros() {
        let cnpj = Cnpj::new("01234567000199");
        assert_eq!(cnpj.as_str(), "01234567000199");
        assert_eq!(cnpj.to_string().len(), 14);
    }

    #[test]
    fn test_cnpj_deserialize_from_string() {
        let cnpj: Cnpj = serde_json::from_str("\"01234567000199\"").unwrap();
        assert_eq!(cnpj.as_str(), "01234567000199");
    }

    #[test]
    fn test_cnpj_deserialize_from_number_pads_zeros() {
        let cnpj: Cnpj = serde_json::from_str("1234567000199").unwrap();
        assert_eq!(cnpj.as_str(), "01234567000199");
    }

    #[test]
    fn test_cnpj_serializes_as_string() {
        let json = serde_json::to_string(&Cnpj::new("00000000000191")).unwrap();
        assert_eq!(json, "\"00000000000191\"");
    }

    #[test]
    fn test_cnpj_validate() {
        assert!(Cnpj::new("11222333000181").validate().is_ok());
        assert!(Cnpj::new("11.222.333/0001-81").validate().is_ok());
        assert!(Cnpj::new("11222333000182").validate().is_err());
        assert!(Cnpj::new("11111111111111").validate().is_err());
        assert!(Cnpj::new("1122233300018").validate().is_err());
    }

    #[test]
    fn test_cnpj_parse_normalizes() {
        let cnpj = Cnpj::parse(" 11.222.333/0001-81 ").unwrap();
        assert_eq!(cnpj.as_str(), "11222333000181");
    }

    #[test]
    fn test_cnpj_formatted() {
        assert_eq!(Cnpj::new("11222333000181").formatted(), "11.222.333/0001-81");
        assert_eq!(Cnpj::new("123").formatted(), "123");
    }

    #[test]
    fn test_record_id_untagged() {
        let id: RecordId = serde_json::from_str("7").unwrap();
        assert_eq!(id, RecordId::Int(7));
        let id: RecordId = serde_json::from_str("\"abc\"").unwrap();
        assert_eq!(id, RecordId::Text("abc".into()));
        assert_eq!(id.to_string(), "abc");
    }

    #[test]
    fn test_porte_roundtrip_codes() {
        for porte in Porte::ALL {
            assert_eq!(porte.code().parse::<Porte>().unwrap(), porte);
        }
        assert_eq!("epp".parse::<Porte>().unwrap(), Porte::Epp);
        assert!("HUGE".parse::<Porte>().is_err());
    }

    #[test]
    fn test_porte_serde() {
        let p: Porte = serde_json::from_str("\"GRANDE\"").unwrap();
        assert_eq!(p, Porte::Grande);
        assert!(serde_json::from_str::<Porte>("\"SMALL\"").is_err());
    }
}
