//! Field mapping from raw import records to lead payloads

use super::RawRecord;
use crate::defaults::DEFAULT_SOURCE;
use crate::error::{PipelineError, Result};
use crate::types::{Column, ColumnId, NewLead};
use serde_json::Value;

/// Accepted header spellings per lead field, after [`normalize_key`].
///
/// Earlier synonyms win when a record carries several.
pub const FIELD_SYNONYMS: &[(&str, &[&str])] = &[
    ("name", &["name", "nome"]),
    ("email", &["email"]),
    ("phone", &["phone", "telefone", "tel"]),
    ("value", &["value", "valor", "valorestimado", "estimatedvalue"]),
    ("source", &["source", "fonte"]),
    ("status", &["status"]),
    ("location", &["location", "localizacao", "cidade", "city"]),
    ("tags", &["tags"]),
    ("category", &["category", "categoria"]),
];

/// Lowercase, fold accents and drop everything but letters and digits:
/// `E-mail` → `email`, `Localização` → `localizacao`
pub fn normalize_key(key: &str) -> String {
    key.chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(char::to_lowercase)
        .map(fold_accent)
        .collect()
}

fn fold_accent(c: char) -> char {
    match c {
        'á' | 'à' | 'â' | 'ã' | 'ä' => 'a',
        'é' | 'è' | 'ê' | 'ë' => 'e',
        'í' | 'ì' | 'î' | 'ï' => 'i',
        'ó' | 'ò' | 'ô' | 'õ' | 'ö' => 'o',
        'ú' | 'ù' | 'û' | 'ü' => 'u',
        'ç' => 'c',
        other => other,
    }
}

/// Map one raw record to a validated lead payload.
///
/// Statuses that name no column fall back to `default_status`. Unparsable or
/// negative values become 0.
pub fn map_record(
    record: &RawRecord,
    default_status: &ColumnId,
    columns: &[Column],
) -> Result<NewLead> {
    let fields = Fields::new(record);

    let name = fields.text("name");
    let email = fields.text("email");
    if name.is_empty() || email.is_empty() {
        return Err(PipelineError::validation(
            if name.is_empty() { "name" } else { "email" },
            "required for import",
        ));
    }

    let status = match fields.text("status") {
        s if columns.iter().any(|c| c.id == s.as_str()) => ColumnId::from_string(s),
        _ => default_status.clone(),
    };
    let source = match fields.text("source") {
        s if s.is_empty() => DEFAULT_SOURCE.to_string(),
        s => s,
    };

    let mut lead = NewLead::new(name, email, status)
        .with_phone(fields.text("phone"))
        .with_value(fields.number("value"))
        .with_source(source)
        .with_location(fields.text("location"))
        .with_tags(fields.tags("tags"));
    let category = fields.text("category");
    if !category.is_empty() {
        lead = lead.with_category(category);
    }

    lead.validate()?;
    Ok(lead)
}

/// Lookup of canonical fields in a record with normalized keys
struct Fields<'a> {
    entries: Vec<(String, &'a Value)>,
}

impl<'a> Fields<'a> {
    fn new(record: &'a RawRecord) -> Self {
        Self {
            entries: record
                .iter()
                .map(|(key, value)| (normalize_key(key), value))
                .collect(),
        }
    }

    /// First non-empty value among the field's synonyms
    fn get(&self, field: &str) -> Option<&'a Value> {
        let synonyms = FIELD_SYNONYMS
            .iter()
            .find(|(name, _)| *name == field)
            .map(|(_, synonyms)| *synonyms)
            .unwrap_or_default();

        synonyms.iter().find_map(|synonym| {
            self.entries
                .iter()
                .find(|(key, value)| key == synonym && !is_blank(value))
                .map(|(_, value)| *value)
        })
    }

    fn text(&self, field: &str) -> String {
        match self.get(field) {
            Some(Value::String(s)) => s.trim().to_string(),
            Some(Value::Number(n)) => n.to_string(),
            Some(Value::Bool(b)) => b.to_string(),
            _ => String::new(),
        }
    }

    fn number(&self, field: &str) -> f64 {
        let parsed = match self.get(field) {
            Some(Value::Number(n)) => n.as_f64(),
            Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
            _ => None,
        };
        match parsed {
            Some(v) if v.is_finite() && v >= 0.0 => v,
            _ => 0.0,
        }
    }

    fn tags(&self, field: &str) -> Vec<String> {
        let raw: Vec<String> = match self.get(field) {
            Some(Value::Array(items)) => items
                .iter()
                .filter_map(|item| item.as_str().map(str::to_string))
                .collect(),
            Some(Value::String(s)) => s.split(',').map(str::to_string).collect(),
            _ => Vec::new(),
        };
        raw.into_iter()
            .map(|tag| tag.trim().to_string())
            .filter(|tag| !tag.is_empty())
            .collect()
    }
}

fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::defaults::default_columns;
    use serde_json::json;

    fn record(value: Value) -> RawRecord {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected object"),
        }
    }

    fn map(value: Value) -> Result<NewLead> {
        map_record(&record(value), &ColumnId::from_string("new"), &default_columns())
    }

    #[test]
    fn test_normalize_key() {
        assert_eq!(normalize_key("E-mail"), "email");
        assert_eq!(normalize_key("valorEstimado"), "valorestimado");
        assert_eq!(normalize_key("Estimated Value"), "estimatedvalue");
        assert_eq!(normalize_key("Localização"), "localizacao");
    }

    #[test]
    fn test_synonym_priority() {
        let lead = map(json!({
            "nome": "Second",
            "name": "First",
            "email": "a@x.io"
        }))
        .unwrap();
        assert_eq!(lead.name, "First");

        let lead = map(json!({ "name": "", "nome": "Fallback", "email": "a@x.io" })).unwrap();
        assert_eq!(lead.name, "Fallback");
    }

    #[test]
    fn test_value_coercion() {
        let lead = map(json!({ "name": "A", "email": "a@x.io", "valorEstimado": 2500 })).unwrap();
        assert_eq!(lead.value, 2500.0);

        let lead = map(json!({ "name": "A", "email": "a@x.io", "value": "12.5" })).unwrap();
        assert_eq!(lead.value, 12.5);

        let lead = map(json!({ "name": "A", "email": "a@x.io", "value": -40 })).unwrap();
        assert_eq!(lead.value, 0.0);

        let lead = map(json!({ "name": "A", "email": "a@x.io", "value": "lots" })).unwrap();
        assert_eq!(lead.value, 0.0);
    }

    #[test]
    fn test_status_fallback() {
        let lead = map(json!({ "name": "A", "email": "a@x.io", "status": "won" })).unwrap();
        assert_eq!(lead.status, "won");

        let lead = map(json!({ "name": "A", "email": "a@x.io", "status": "archived" })).unwrap();
        assert_eq!(lead.status, "new");
    }

    #[test]
    fn test_tags_array_or_string() {
        let lead = map(json!({ "name": "A", "email": "a@x.io", "tags": ["vip", " b2b "] })).unwrap();
        assert_eq!(lead.tags, vec!["vip", "b2b"]);

        let lead = map(json!({ "name": "A", "email": "a@x.io", "tags": "vip,,vip,cold" })).unwrap();
        assert_eq!(lead.tags, vec!["vip", "cold"]);
    }

    #[test]
    fn test_category_and_location() {
        let lead = map(json!({
            "name": "A",
            "email": "a@x.io",
            "categoria": "small_business",
            "city": "Lisbon"
        }))
        .unwrap();
        assert_eq!(lead.category.as_deref(), Some("small_business"));
        assert_eq!(lead.location, "Lisbon");
    }

    #[test]
    fn test_required_fields() {
        assert!(map(json!({ "name": "A" })).is_err());
        assert!(map(json!({ "email": "a@x.io" })).is_err());
        // present but not an address
        assert!(map(json!({ "name": "A", "email": "nope" })).is_err());
    }
}
