//! Sample import files with one record

use super::ImportFormat;
use crate::error::Result;
use serde::Serialize;

#[derive(Serialize)]
struct TemplateRecord {
    name: &'static str,
    email: &'static str,
    phone: &'static str,
    value: f64,
    source: &'static str,
    location: &'static str,
    tags: &'static str,
    category: &'static str,
}

const SAMPLE: TemplateRecord = TemplateRecord {
    name: "Jane Doe",
    email: "jane@company.com",
    phone: "(11) 98765-4321",
    value: 15000.0,
    source: "linkedin",
    location: "São Paulo, SP",
    tags: "urgent,b2b",
    category: "medium_business",
};

/// A ready-to-fill import file in the given format
pub fn template(format: ImportFormat) -> Result<String> {
    match format {
        ImportFormat::Csv => {
            let mut writer = csv::Writer::from_writer(Vec::new());
            writer.serialize(&SAMPLE)?;
            let bytes = writer
                .into_inner()
                .map_err(|e| std::io::Error::other(e.to_string()))?;
            Ok(String::from_utf8_lossy(&bytes).into_owned())
        }
        ImportFormat::Json => Ok(serde_json::to_string_pretty(&[&SAMPLE])?),
    }
}
