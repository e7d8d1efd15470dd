//! Patient visit records.

use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Serialize};

/// Calendar date format used for stored visit dates.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// A persisted patient visit entry.
///
/// Records come back from the store exactly as they were written, which for
/// legacy data may mean blank fields or a date that does not parse. Nothing
/// here assumes the business fields are well formed; use [`Record::visit_date`]
/// and [`Record::hospital_name`] wherever a comparison is made.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Record {
    /// Store-assigned identifier, immutable after creation
    pub id: String,
    /// Patient name
    #[serde(default)]
    pub name: String,
    /// Registration number (not guaranteed unique)
    #[serde(default, rename = "regNo", alias = "reg_no")]
    pub reg_no: String,
    /// Facility name
    #[serde(default)]
    pub hospital: String,
    /// Visit date, ISO `YYYY-MM-DD`
    #[serde(default)]
    pub date: String,
}

impl Record {
    /// Attach a store-assigned id to submitted fields.
    pub fn from_new(id: String, fields: NewRecord) -> Self {
        Self {
            id,
            name: fields.name,
            reg_no: fields.reg_no,
            hospital: fields.hospital,
            date: fields.date,
        }
    }

    /// Parsed visit date, or `None` if the stored value is not a date.
    pub fn visit_date(&self) -> Option<NaiveDate> {
        parse_visit_date(&self.date)
    }

    /// Facility name, or `None` if blank.
    pub fn hospital_name(&self) -> Option<&str> {
        let trimmed = self.hospital.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(self.hospital.as_str())
        }
    }

    /// `YYYY-MM` key of the visit month.
    pub fn month_key(&self) -> Option<String> {
        self.visit_date().map(|d| d.format("%Y-%m").to_string())
    }
}

/// Parse a stored visit date.
///
/// Accepts `YYYY-MM-DD`, and RFC 3339 timestamps truncated to their date.
pub fn parse_visit_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    NaiveDate::parse_from_str(value, DATE_FORMAT)
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(value).ok().map(|dt| dt.date_naive()))
}

/// Fields submitted to create a record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NewRecord {
    pub name: String,
    #[serde(rename = "regNo", alias = "reg_no")]
    pub reg_no: String,
    pub hospital: String,
    pub date: String,
}

/// Reasons a submission is rejected before reaching the store.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    #[error("Invalid visit date: {0}")]
    InvalidDate(String),
}

impl NewRecord {
    /// Build a submission, trimming surrounding whitespace from every field.
    pub fn new(
        name: impl Into<String>,
        reg_no: impl Into<String>,
        hospital: impl Into<String>,
        date: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into().trim().to_string(),
            reg_no: reg_no.into().trim().to_string(),
            hospital: hospital.into().trim().to_string(),
            date: date.into().trim().to_string(),
        }
    }

    /// Check that all four fields are present and the date parses.
    ///
    /// The stored date is normalised to `YYYY-MM-DD`.
    pub fn validate(mut self) -> Result<Self, ValidationError> {
        for (field, value) in [
            ("name", &self.name),
            ("regNo", &self.reg_no),
            ("hospital", &self.hospital),
            ("date", &self.date),
        ] {
            if value.trim().is_empty() {
                return Err(ValidationError::MissingField(field));
            }
        }

        let date = parse_visit_date(&self.date)
            .ok_or_else(|| ValidationError::InvalidDate(self.date.clone()))?;
        self.date = date.format(DATE_FORMAT).to_string();
        Ok(self)
    }
}
