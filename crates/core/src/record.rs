//! Doctor records and payload ingestion
//!
//! The remote endpoint returns loosely typed JSON. Everything here turns that payload into
//! a single canonical [`DoctorRecord`] shape, once, at load time. Individual fields are
//! defaulted independently so a malformed record never aborts a load.

use std::collections::BTreeSet;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;

static NON_DIGITS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^\d]").unwrap());
static LEADING_INTEGER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*([+-]?\d+)").unwrap());

/// Error returned when the record list cannot be loaded
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LoadError {
    #[error("HTTP error! Status: {status}")]
    Http { status: u16 },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Invalid JSON: {0}")]
    InvalidJson(String),

    #[error("Invalid data format: {0}")]
    InvalidFormat(String),
}

/// A single specialty attached to a doctor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Specialty {
    pub name: String,
}

/// Raw specialty entry as it appears in the payload
///
/// The endpoint mixes plain strings and `{ "name": ... }` objects in the same array.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RawSpecialty {
    Name(String),
    Object { name: Option<String> },
}

impl RawSpecialty {
    /// Normalize into a [`Specialty`], dropping entries without a usable name
    pub fn into_specialty(self) -> Option<Specialty> {
        let name = match self {
            RawSpecialty::Name(name) => name,
            RawSpecialty::Object { name } => name?,
        };

        if name.is_empty() {
            None
        } else {
            Some(Specialty { name })
        }
    }
}

/// Clinic address
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    pub address_line1: Option<String>,
    pub locality: Option<String>,
    pub city: Option<String>,
}

/// Clinic where the doctor practices
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Clinic {
    pub name: String,
    pub address: Option<Address>,
}

/// Canonical doctor record consumed by filtering, sorting and suggestions
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DoctorRecord {
    pub id: String,
    pub name: String,
    /// Numeric fee parsed from `fees`, 0 when absent or unparseable
    pub fee: u64,
    /// Raw fee string as received, e.g. `"₹ 500"`
    pub fees: Option<String>,
    /// Raw experience string, e.g. `"13 Years of experience"`
    pub experience: String,
    pub specialties: Vec<Specialty>,
    pub video_consult: bool,
    pub in_clinic: bool,
    pub image: String,
    pub clinic: Option<Clinic>,
}

impl DoctorRecord {
    /// Fee used for sorting, `None` when the raw fee string holds no number
    pub fn fee_key(&self) -> Option<u64> {
        if self.fee > 0 {
            return Some(self.fee);
        }

        match &self.fees {
            Some(fees) if !fees.is_empty() => parse_fee(fees),
            _ => Some(0),
        }
    }

    /// Years of experience used for sorting, `None` when not parseable
    pub fn experience_key(&self) -> Option<i64> {
        if self.experience.is_empty() {
            return Some(0);
        }
        parse_experience_years(&self.experience)
    }

    /// Whether any of the doctor's specialties is in `selected`
    pub fn has_any_specialty(&self, selected: &[String]) -> bool {
        self.specialties
            .iter()
            .any(|specialty| selected.iter().any(|s| *s == specialty.name))
    }

    /// Case-insensitive substring match on the doctor's name
    pub fn name_matches(&self, needle: &str) -> bool {
        self.name.to_lowercase().contains(&needle.to_lowercase())
    }
}

/// Parse a currency formatted fee by stripping every non-digit character
///
/// `"₹ 1,500"` becomes `1500`. Returns `None` when no digits remain or the number
/// does not fit.
pub fn parse_fee(fees: &str) -> Option<u64> {
    let digits = NON_DIGITS.replace_all(fees, "");
    if digits.is_empty() {
        return None;
    }
    digits.parse::<u64>().ok()
}

/// Extract the leading integer from an experience string
///
/// `"13 Years of experience"` becomes `13`. Leading whitespace and a sign are accepted.
pub fn parse_experience_years(experience: &str) -> Option<i64> {
    LEADING_INTEGER
        .captures(experience)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse::<i64>().ok())
}

/// Normalize one raw doctor object
///
/// Returns `None` when the value is not a JSON object.
pub fn normalize_doctor(raw: &Value) -> Option<DoctorRecord> {
    let object = raw.as_object()?;

    let string_field = |key: &str| -> Option<String> {
        object.get(key).and_then(Value::as_str).map(str::to_string)
    };

    let id = match object.get("id") {
        Some(Value::String(id)) => id.clone(),
        Some(Value::Number(id)) => id.to_string(),
        _ => String::new(),
    };

    let fees = string_field("fees");
    let fee = fees.as_deref().and_then(parse_fee).unwrap_or(0);

    let specialties = match object.get("specialities") {
        Some(Value::Array(entries)) => entries
            .iter()
            .filter_map(|entry| serde_json::from_value::<RawSpecialty>(entry.clone()).ok())
            .filter_map(RawSpecialty::into_specialty)
            .collect(),
        _ => Vec::new(),
    };

    let clinic = object
        .get("clinic")
        .and_then(|clinic| serde_json::from_value::<Clinic>(clinic.clone()).ok());

    Some(DoctorRecord {
        id,
        name: string_field("name").unwrap_or_default(),
        fee,
        fees,
        experience: string_field("experience").unwrap_or_default(),
        specialties,
        video_consult: object.get("video_consult") == Some(&Value::Bool(true)),
        in_clinic: object.get("in_clinic") == Some(&Value::Bool(true)),
        image: string_field("photo").unwrap_or_default(),
        clinic,
    })
}

/// Normalize the full payload returned by the endpoint
///
/// The payload must be a JSON array. Array elements that are not objects are skipped.
pub fn normalize_payload(payload: Value) -> Result<Vec<DoctorRecord>, LoadError> {
    let Value::Array(entries) = payload else {
        return Err(LoadError::InvalidFormat(
            "Expected array of doctors".to_string(),
        ));
    };

    Ok(entries.iter().filter_map(normalize_doctor).collect())
}

/// Parse and normalize a raw response body
pub fn parse_payload(body: &str) -> Result<Vec<DoctorRecord>, LoadError> {
    let payload: Value =
        serde_json::from_str(body).map_err(|e| LoadError::InvalidJson(e.to_string()))?;
    normalize_payload(payload)
}

/// Every distinct specialty name across `records`, sorted
pub fn unique_specialties(records: &[DoctorRecord]) -> Vec<String> {
    records
        .iter()
        .flat_map(|record| record.specialties.iter().map(|s| s.name.clone()))
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}
