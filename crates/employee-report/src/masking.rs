//! Field-level masking of personally identifiable employee data
//!
//! Sensitive fields are recognized by name. The name is normalized (lowercased,
//! spaces and periods removed) and looked up in a fixed alias table, so
//! `"Employee Code"`, `"employee_code"` and `"EMPLOYEECODE"` all resolve to
//! [`SensitiveField::EmployeeCode`].

use serde_json::Value;

use crate::constants::{MASK_CHAR, MASK_VISIBLE_PREFIX};

/// An employee record: field name to value, in source order
pub type Record = serde_json::Map<String, Value>;

/// Canonical sensitive employee attributes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SensitiveField {
    EmployeeCode,
    FirstName,
    MiddleName,
    LastName,
    PanNumber,
}

impl SensitiveField {
    pub const ALL: [Self; 5] = [
        Self::EmployeeCode,
        Self::FirstName,
        Self::MiddleName,
        Self::LastName,
        Self::PanNumber,
    ];

    /// Normalized spellings accepted for this field
    #[must_use]
    pub const fn aliases(self) -> &'static [&'static str] {
        match self {
            Self::EmployeeCode => &["employee_code", "employeecode", "employeeid", "employee_id"],
            Self::FirstName => &["first_name", "firstname"],
            Self::MiddleName => &["middle_name", "middlename"],
            Self::LastName => &["last_name", "lastname"],
            Self::PanNumber => &["pan_no", "panno", "pan_number", "pannumber"],
        }
    }

    /// Resolve a raw field or column name to its canonical field
    #[must_use]
    pub fn from_field_name(name: &str) -> Option<Self> {
        let normalized = normalize_field_name(name);
        Self::ALL
            .into_iter()
            .find(|field| field.aliases().contains(&normalized.as_str()))
    }
}

/// Lowercase and drop spaces and periods
#[must_use]
pub fn normalize_field_name(name: &str) -> String {
    name.chars()
        .filter(|c| *c != ' ' && *c != '.')
        .flat_map(char::to_lowercase)
        .collect()
}

#[must_use]
pub fn is_sensitive(name: &str) -> bool {
    SensitiveField::from_field_name(name).is_some()
}

/// Mask a single value.
///
/// Null and empty strings map to null. Anything else is stringified; up to
/// two characters become all asterisks, longer values keep their first two
/// characters and replace the rest one for one.
#[must_use]
pub fn mask_value(value: &Value) -> Value {
    let text = match value {
        Value::Null => return Value::Null,
        Value::String(s) if s.is_empty() => return Value::Null,
        Value::String(s) => s.clone(),
        other => other.to_string(),
    };

    let len = text.chars().count();
    let masked: String = if len <= MASK_VISIBLE_PREFIX {
        std::iter::repeat_n(MASK_CHAR, len).collect()
    } else {
        text.chars()
            .take(MASK_VISIBLE_PREFIX)
            .chain(std::iter::repeat_n(MASK_CHAR, len - MASK_VISIBLE_PREFIX))
            .collect()
    };

    Value::String(masked)
}

/// Mask one field if its name is sensitive, otherwise return it unchanged
#[must_use]
pub fn mask_field(name: &str, value: &Value) -> Value {
    if is_sensitive(name) {
        mask_value(value)
    } else {
        value.clone()
    }
}

/// Produce a masked copy of a record; the input is left untouched
#[must_use]
pub fn mask_record(record: &Record) -> Record {
    record
        .iter()
        .map(|(name, value)| (name.clone(), mask_field(name, value)))
        .collect()
}
