//! Autocomplete suggestions for the name search

use crate::record::DoctorRecord;

/// Maximum number of suggestions surfaced while typing
pub const MAX_SUGGESTIONS: usize = 3;

/// First [`MAX_SUGGESTIONS`] records, in fetch order, whose name contains `search`
///
/// Returns an empty list when `search` is blank.
pub fn suggest(records: &[DoctorRecord], search: &str) -> Vec<DoctorRecord> {
    if search.trim().is_empty() {
        return Vec::new();
    }

    records
        .iter()
        .filter(|record| record.name_matches(search))
        .take(MAX_SUGGESTIONS)
        .cloned()
        .collect()
}
