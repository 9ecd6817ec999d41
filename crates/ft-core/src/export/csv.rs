//! CSV exporter for company records
//!
//! Output is RFC 4180 style: comma separated, LF line endings, fields holding
//! a comma, quote, CR or LF are quoted with inner quotes doubled. The
//! document starts with a UTF-8 BOM so spreadsheet tools pick the right
//! encoding for accented names.

use super::exporter::Exporter;
use crate::error::{FiscalError, Result};
use crate::record::Record;

/// Byte order mark written at the start of every document
pub const BOM: char = '\u{feff}';

const BOM_BYTES: &[u8] = b"\xEF\xBB\xBF";

/// Column labels, in output order
pub const HEADERS: [&str; 8] = [
    "ID",
    "CNPJ",
    "Razão Social",
    "Setor",
    "Bairro",
    "Porte",
    "B/C Ratio",
    "Impacto Líquido",
];

const DELIMITER: char = ',';
const LINE_SEPARATOR: char = '\n';

/// Encode one field: absent becomes empty, values needing it get quoted.
pub fn escape_field(value: Option<&str>) -> String {
    match value {
        None => String::new(),
        Some(s) if needs_quoting(s) => quote_field(s),
        Some(s) => s.to_string(),
    }
}

/// Wrap in quotes unconditionally, doubling inner quotes
pub fn quote_field(value: &str) -> String {
    format!("\"{}\"", value.replace('"', "\"\""))
}

fn needs_quoting(s: &str) -> bool {
    s.contains([DELIMITER, '"', LINE_SEPARATOR, '\r'])
}

/// Number of data rows (records after the header) in a CSV document.
///
/// Read with an RFC 4180 reader, so line breaks inside quoted fields do not
/// end a row and a trailing line break does not start one. A leading BOM is
/// ignored.
pub fn count_data_rows(document: &[u8]) -> Result<usize> {
    let body = document.strip_prefix(BOM_BYTES).unwrap_or(document);
    let mut reader = ::csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(body);

    let mut rows = 0;
    for record in reader.byte_records() {
        record.map_err(|e| FiscalError::Validation(format!("Malformed CSV document: {}", e)))?;
        rows += 1;
    }
    Ok(rows)
}

/// CSV exporter
#[derive(Debug, Clone, Default)]
pub struct CsvExporter;

impl CsvExporter {
    /// Create a new CSV exporter
    pub fn new() -> Self {
        Self
    }

    /// Header line
    pub fn header_line(&self) -> String {
        HEADERS
            .iter()
            .map(|h| escape_field(Some(*h)))
            .collect::<Vec<_>>()
            .join(",")
    }

    /// One record as a CSV line, without terminator
    pub fn record_line(&self, record: &Record) -> String {
        let fields = [
            escape_field(Some(&record.id.to_string())),
            // Quoted even when plain so spreadsheets keep it as text
            quote_field(record.cnpj.as_str()),
            escape_field(record.razao_social.as_deref()),
            escape_field(record.cnae_descricao.as_deref()),
            escape_field(record.bairro.as_deref()),
            escape_field(record.porte.map(|p| p.code())),
            escape_field(record.bc_ratio.map(|v| v.to_string()).as_deref()),
            escape_field(record.impacto_liquido.map(|v| v.to_string()).as_deref()),
        ];
        fields.join(",")
    }

    /// Full document body (header plus records), without the BOM
    pub fn encode(&self, records: &[Record]) -> String {
        std::iter::once(self.header_line())
            .chain(records.iter().map(|r| self.record_line(r)))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl Exporter for CsvExporter {
    fn export(&self, records: &[Record]) -> Result<String> {
        let body = self.encode(records);
        let mut document = String::with_capacity(body.len() + BOM.len_utf8());
        document.push(BOM);
        document.push_str(&body);
        Ok(document)
    }

    fn format_name(&self) -> &str {
        "csv"
    }

    fn file_extension(&self) -> &str {
        "csv"
    }

    fn mime_type(&self) -> &str {
        "text/csv;charset=utf-8"
    }
}
