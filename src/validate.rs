use serde::Serialize;
use serde_json::{Map, Value};

use crate::models::descriptor::TableDescriptor;

/// Outcome of checking a submitted payload against a descriptor. Both lists
/// empty means the payload is acceptable.
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct ValidationReport {
    pub missing_fields: Vec<String>,
    pub incorrect_fields: Vec<String>,
}

impl ValidationReport {
    pub fn is_empty(&self) -> bool {
        self.missing_fields.is_empty() && self.incorrect_fields.is_empty()
    }
}

/// Reports required declared fields absent from the payload and payload
/// keys that are not declared at all. Primary key columns are exempt from
/// the required check. Runs before any statement is built, so findings are
/// structured data rather than engine errors.
pub fn validate_fields(payload: &Map<String, Value>, descriptor: &TableDescriptor) -> ValidationReport {
    let mut report = ValidationReport::default();

    for spec in descriptor.columns() {
        if spec.required && !spec.primary && !payload.contains_key(&spec.name) {
            report.missing_fields.push(spec.name.clone());
        }
    }

    for key in payload.keys() {
        if descriptor.column(key).is_none() {
            report.incorrect_fields.push(key.clone());
        }
    }

    report
}
