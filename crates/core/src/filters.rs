//! Filter and sort engine
//!
//! Every call recomputes the result from the full record list. The pipeline runs in a fixed
//! order: name, consultation mode, specialties, then sort.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::record::DoctorRecord;

/// Consultation mode filter
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConsultationType {
    #[default]
    None,
    VideoConsult,
    InClinic,
}

impl ConsultationType {
    pub const VIDEO_CONSULT: &'static str = "Video Consult";
    pub const IN_CLINIC: &'static str = "In Clinic";

    /// Parse the query string / UI label. Anything unrecognized means no filter.
    pub fn parse(value: &str) -> Self {
        match value {
            Self::VIDEO_CONSULT => ConsultationType::VideoConsult,
            Self::IN_CLINIC => ConsultationType::InClinic,
            _ => ConsultationType::None,
        }
    }

    /// Label used in the query string, `None` when no filter is set
    pub fn as_str(&self) -> Option<&'static str> {
        match self {
            ConsultationType::None => None,
            ConsultationType::VideoConsult => Some(Self::VIDEO_CONSULT),
            ConsultationType::InClinic => Some(Self::IN_CLINIC),
        }
    }

    fn accepts(&self, record: &DoctorRecord) -> bool {
        match self {
            ConsultationType::None => true,
            ConsultationType::VideoConsult => record.video_consult,
            ConsultationType::InClinic => record.in_clinic,
        }
    }
}

/// Sort order applied after filtering
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortKey {
    #[default]
    None,
    /// Fee, lowest first
    Fee,
    /// Years of experience, most first
    Experience,
}

impl SortKey {
    /// Parse the query string value. Anything unrecognized leaves the order untouched.
    pub fn parse(value: &str) -> Self {
        match value {
            "fee" => SortKey::Fee,
            "experience" => SortKey::Experience,
            _ => SortKey::None,
        }
    }

    pub fn as_str(&self) -> Option<&'static str> {
        match self {
            SortKey::None => None,
            SortKey::Fee => Some("fee"),
            SortKey::Experience => Some("experience"),
        }
    }
}

/// The user's current search, filter and sort criteria
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterState {
    pub search: String,
    pub consultation: ConsultationType,
    /// Selected specialties in selection order, without duplicates
    pub specialties: Vec<String>,
    pub sort: SortKey,
}

impl FilterState {
    /// Add `specialty` if it is not selected, remove it otherwise
    pub fn toggle_specialty(&mut self, specialty: &str) {
        if let Some(pos) = self.specialties.iter().position(|s| s == specialty) {
            self.specialties.remove(pos);
        } else {
            self.specialties.push(specialty.to_string());
        }
    }

    /// Select `consultation`, or clear it when it is already the active mode
    pub fn toggle_consultation(&mut self, consultation: ConsultationType) {
        self.consultation = if self.consultation == consultation {
            ConsultationType::None
        } else {
            consultation
        };
    }

    /// Select `sort`, or clear it when it is already the active key
    pub fn toggle_sort(&mut self, sort: SortKey) {
        self.sort = if self.sort == sort { SortKey::None } else { sort };
    }
}

/// Apply `state` to `records` and return the matching records in display order
pub fn apply(records: &[DoctorRecord], state: &FilterState) -> Vec<DoctorRecord> {
    let mut filtered: Vec<DoctorRecord> = records
        .iter()
        .filter(|record| state.search.trim().is_empty() || record.name_matches(&state.search))
        .filter(|record| state.consultation.accepts(record))
        .filter(|record| {
            state.specialties.is_empty() || record.has_any_specialty(&state.specialties)
        })
        .cloned()
        .collect();

    sort_doctors(&mut filtered, state.sort);
    filtered
}

/// String-typed entry point mirroring the query parameters
///
/// Unrecognized `consultation_type` or `sort_by` values are treated as "no filter" and
/// "no sort" respectively.
pub fn filter_doctors(
    records: &[DoctorRecord],
    search: &str,
    consultation_type: &str,
    specialties: &[String],
    sort_by: &str,
) -> Vec<DoctorRecord> {
    let state = FilterState {
        search: search.to_string(),
        consultation: ConsultationType::parse(consultation_type),
        specialties: specialties.to_vec(),
        sort: SortKey::parse(sort_by),
    };
    apply(records, &state)
}

/// Stable in-place sort of `records` by `key`
///
/// Records whose key cannot be parsed always end up after the ones that can.
pub fn sort_doctors(records: &mut [DoctorRecord], key: SortKey) {
    match key {
        SortKey::None => {}
        SortKey::Fee => {
            records.sort_by(|a, b| valid_first(a.fee_key(), b.fee_key(), |a, b| a.cmp(&b)))
        }
        SortKey::Experience => records.sort_by(|a, b| {
            valid_first(a.experience_key(), b.experience_key(), |a, b| b.cmp(&a))
        }),
    }
}

/// Order two optional keys with `compare`, placing `None` after everything else
fn valid_first<T>(a: Option<T>, b: Option<T>, compare: impl FnOnce(T, T) -> Ordering) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => compare(a, b),
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Greater,
        (Some(_), None) => Ordering::Less,
    }
}
