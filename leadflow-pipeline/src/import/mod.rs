//! Bulk lead import from CSV and JSON files
//!
//! Parsing is forgiving: header names are matched case-insensitively against
//! a synonym table (so `Nome`, `E-mail` or `valorEstimado` all work), missing
//! optional fields get defaults, and unusable records are skipped and
//! reported rather than failing the whole file.

mod fields;
mod template;

pub use fields::{map_record, normalize_key, FIELD_SYNONYMS};
pub use template::template;

use crate::error::{PipelineError, Result};
use crate::types::{Column, NewLead};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A raw record: field name to value, before mapping
pub type RawRecord = Map<String, Value>;

/// Supported import file formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImportFormat {
    Csv,
    Json,
}

impl ImportFormat {
    /// Detect the format from a file name's extension
    pub fn from_file_name(name: &str) -> Option<Self> {
        let (_, extension) = name.rsplit_once('.')?;
        match extension.to_ascii_lowercase().as_str() {
            "csv" => Some(Self::Csv),
            "json" => Some(Self::Json),
            _ => None,
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Json => "json",
        }
    }
}

/// A record that could not be turned into a lead
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedRecord {
    /// Zero-based position in the file, header row excluded
    pub index: usize,
    pub reason: String,
}

/// Outcome of parsing a file: the accepted leads and what was left out
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportReport {
    pub leads: Vec<NewLead>,
    pub skipped: Vec<SkippedRecord>,
}

impl ImportReport {
    /// Records read from the file
    pub fn total(&self) -> usize {
        self.leads.len() + self.skipped.len()
    }

    pub fn skipped_count(&self) -> usize {
        self.skipped.len()
    }
}

/// Parse a file and map every record onto the board's columns.
///
/// Fails with `ImportParse` when the content cannot be read at all, holds no
/// records, or none of its records is usable.
pub fn parse(content: &str, format: ImportFormat, columns: &[Column]) -> Result<ImportReport> {
    let default_status = columns
        .iter()
        .min_by_key(|c| c.order)
        .map(|c| c.id.clone())
        .ok_or_else(|| PipelineError::import_parse("the board has no column to import into"))?;

    let records = match format {
        ImportFormat::Csv => read_csv(content)?,
        ImportFormat::Json => read_json(content)?,
    };
    if records.is_empty() {
        return Err(PipelineError::import_parse("the file holds no records"));
    }

    let mut report = ImportReport {
        leads: Vec::new(),
        skipped: Vec::new(),
    };
    for (index, record) in records.iter().enumerate() {
        match map_record(record, &default_status, columns) {
            Ok(lead) => report.leads.push(lead),
            Err(error) => {
                tracing::debug!(index, %error, "import record skipped");
                report.skipped.push(SkippedRecord {
                    index,
                    reason: error.to_string(),
                });
            }
        }
    }

    if report.leads.is_empty() {
        return Err(PipelineError::import_parse(
            "no valid leads found; records need a name and an email",
        ));
    }
    Ok(report)
}

/// Read CSV rows keyed by the header row; blank rows are ignored
pub fn read_csv(content: &str) -> Result<Vec<RawRecord>> {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(content.as_bytes());

    let headers = reader.headers()?.clone();
    let mut records = Vec::new();
    for row in reader.records() {
        let row = row?;
        if row.iter().all(str::is_empty) {
            continue;
        }
        let record: RawRecord = headers
            .iter()
            .zip(row.iter())
            .map(|(key, value)| (key.to_string(), Value::String(value.to_string())))
            .collect();
        records.push(record);
    }
    Ok(records)
}

/// Read a JSON array of objects; a single object counts as one record
pub fn read_json(content: &str) -> Result<Vec<RawRecord>> {
    let value: Value = serde_json::from_str(content)
        .map_err(|e| PipelineError::import_parse(format!("invalid JSON: {e}")))?;

    match value {
        Value::Array(items) => Ok(items
            .into_iter()
            .map(|item| match item {
                Value::Object(map) => map,
                // mapped to nothing, reported as skipped
                _ => RawRecord::new(),
            })
            .collect()),
        Value::Object(map) => Ok(vec![map]),
        _ => Err(PipelineError::import_parse(
            "JSON must be an object or an array of objects",
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::defaults::default_columns;

    #[test]
    fn test_format_detection() {
        assert_eq!(ImportFormat::from_file_name("leads.CSV"), Some(ImportFormat::Csv));
        assert_eq!(
            ImportFormat::from_file_name("export.2024.json"),
            Some(ImportFormat::Json)
        );
        assert_eq!(ImportFormat::from_file_name("leads.xlsx"), None);
        assert_eq!(ImportFormat::from_file_name("leads"), None);
    }

    #[test]
    fn test_parse_csv_with_synonyms() {
        let content = "Nome,E-mail,Telefone,Valor,Fonte,Cidade,Tags\n\
                       Ana,ana@x.io,(81) 9999,1500,linkedin,Recife,\"vip, b2b\"\n\
                       ,,,,,,\n\
                       Bruno,bruno@x.io,,abc,,Natal,\n";
        let report = parse(content, ImportFormat::Csv, &default_columns()).unwrap();

        assert_eq!(report.leads.len(), 2);
        assert_eq!(report.total(), 2);
        let ana = &report.leads[0];
        assert_eq!(ana.name, "Ana");
        assert_eq!(ana.value, 1500.0);
        assert_eq!(ana.source, "linkedin");
        assert_eq!(ana.location, "Recife");
        assert_eq!(ana.tags, vec!["vip", "b2b"]);
        assert_eq!(ana.status, "new");

        let bruno = &report.leads[1];
        assert_eq!(bruno.value, 0.0);
        assert_eq!(bruno.source, "other");
    }

    #[test]
    fn test_parse_reports_skipped_records() {
        let content = r#"[
            {"name": "Ana", "email": "ana@x.io"},
            {"name": "No Email"},
            {"email": "nobody@x.io"},
            "not an object"
        ]"#;
        let report = parse(content, ImportFormat::Json, &default_columns()).unwrap();

        assert_eq!(report.leads.len(), 1);
        assert_eq!(report.skipped_count(), 3);
        assert_eq!(report.total(), 4);
        assert_eq!(report.skipped[0].index, 1);
    }

    #[test]
    fn test_single_json_object() {
        let content = r#"{"nome": "Ana", "email": "ana@x.io", "status": "won"}"#;
        let report = parse(content, ImportFormat::Json, &default_columns()).unwrap();
        assert_eq!(report.leads.len(), 1);
        assert_eq!(report.leads[0].status, "won");
    }

    #[test]
    fn test_nothing_usable_fails() {
        let content = r#"[{"name": "Ana"}]"#;
        let result = parse(content, ImportFormat::Json, &default_columns());
        assert!(matches!(result, Err(PipelineError::ImportParse { .. })));

        let result = parse("[]", ImportFormat::Json, &default_columns());
        assert!(matches!(result, Err(PipelineError::ImportParse { .. })));

        let result = parse("{not json", ImportFormat::Json, &default_columns());
        assert!(matches!(result, Err(PipelineError::ImportParse { .. })));

        let result = parse("name,email\n", ImportFormat::Csv, &default_columns());
        assert!(matches!(result, Err(PipelineError::ImportParse { .. })));
    }

    #[test]
    fn test_no_columns_fails() {
        let content = r#"[{"name": "Ana", "email": "ana@x.io"}]"#;
        let result = parse(content, ImportFormat::Json, &[]);
        assert!(matches!(result, Err(PipelineError::ImportParse { .. })));
    }

    #[test]
    fn test_csv_bom_is_ignored() {
        let content = "\u{feff}name,email\nAna,ana@x.io\n";
        let records = read_csv(content).unwrap();
        assert_eq!(records[0]["name"], "Ana");
    }
}
