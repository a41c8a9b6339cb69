//! Query string codec for [`FilterState`]
//!
//! Produces and reads `application/x-www-form-urlencoded` query strings:
//!
//! ```text
//! search=Dr+A&consultation=Video+Consult&specialty=Dentist&specialty=ENT&sort=fee
//! ```
//!
//! Empty fields are omitted entirely. `specialty` repeats once per selected specialty.

use crate::filters::{ConsultationType, FilterState, SortKey};

const SEARCH: &str = "search";
const CONSULTATION: &str = "consultation";
const SPECIALTY: &str = "specialty";
const SORT: &str = "sort";

/// Error decoding a query string
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UrlStateError {
    #[error("Invalid encoding in query parameter '{key}': {reason}")]
    InvalidEncoding { key: String, reason: String },
}

fn encode_component(value: &str) -> String {
    urlencoding::encode(value).replace("%20", "+")
}

fn decode_component(value: &str) -> Result<String, String> {
    urlencoding::decode(&value.replace('+', " "))
        .map(|decoded| decoded.into_owned())
        .map_err(|e| e.to_string())
}

/// Encode `state` into a query string without the leading `?`
pub fn encode(state: &FilterState) -> String {
    let mut pairs: Vec<(&str, &str)> = Vec::new();

    if !state.search.is_empty() {
        pairs.push((SEARCH, &state.search));
    }

    if let Some(consultation) = state.consultation.as_str() {
        pairs.push((CONSULTATION, consultation));
    }

    for specialty in state.specialties.iter().filter(|s| !s.is_empty()) {
        pairs.push((SPECIALTY, specialty));
    }

    if let Some(sort) = state.sort.as_str() {
        pairs.push((SORT, sort));
    }

    pairs
        .into_iter()
        .map(|(key, value)| format!("{key}={}", encode_component(value)))
        .collect::<Vec<_>>()
        .join("&")
}

/// Decode a query string, reporting values that are not valid UTF-8
///
/// A leading `?` is accepted. Single valued keys take their first occurrence, unknown
/// keys are ignored and unrecognized consultation or sort values decode to `None`.
pub fn try_decode(query: &str) -> Result<FilterState, UrlStateError> {
    let query = query.strip_prefix('?').unwrap_or(query);

    let mut search: Option<String> = None;
    let mut consultation: Option<String> = None;
    let mut sort: Option<String> = None;
    let mut specialties: Vec<String> = Vec::new();

    for pair in query.split('&').filter(|pair| !pair.is_empty()) {
        let (raw_key, raw_value) = pair.split_once('=').unwrap_or((pair, ""));

        let key = decode_component(raw_key).map_err(|reason| UrlStateError::InvalidEncoding {
            key: raw_key.to_string(),
            reason,
        })?;
        let value =
            decode_component(raw_value).map_err(|reason| UrlStateError::InvalidEncoding {
                key: key.clone(),
                reason,
            })?;

        match key.as_str() {
            SEARCH => {
                search.get_or_insert(value);
            }
            CONSULTATION => {
                consultation.get_or_insert(value);
            }
            SORT => {
                sort.get_or_insert(value);
            }
            SPECIALTY => {
                if !value.is_empty() && !specialties.contains(&value) {
                    specialties.push(value);
                }
            }
            _ => {}
        }
    }

    Ok(FilterState {
        search: search.unwrap_or_default(),
        consultation: consultation
            .as_deref()
            .map(ConsultationType::parse)
            .unwrap_or_default(),
        specialties,
        sort: sort.as_deref().map(SortKey::parse).unwrap_or_default(),
    })
}

/// Decode a query string, falling back to the empty state when it is malformed
pub fn decode(query: &str) -> FilterState {
    try_decode(query).unwrap_or_default()
}

/// Render `path` followed by the encoded query, or just `path` when there is nothing to encode
pub fn location_for(path: &str, state: &FilterState) -> String {
    let query = encode(state);
    if query.is_empty() {
        path.to_string()
    } else {
        format!("{path}?{query}")
    }
}

/// Split a location into its path and query parts
pub fn split_location(location: &str) -> (&str, &str) {
    location.split_once('?').unwrap_or((location, ""))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_state() -> FilterState {
        FilterState {
            search: "Dr A".to_string(),
            consultation: ConsultationType::VideoConsult,
            specialties: vec!["Dentist".to_string(), "General Physician".to_string()],
            sort: SortKey::Fee,
        }
    }

    #[test]
    fn test_encode_empty_state() {
        assert_eq!(encode(&FilterState::default()), "");
    }

    #[test]
    fn test_encode_full_state() {
        assert_eq!(
            encode(&full_state()),
            "search=Dr+A&consultation=Video+Consult&specialty=Dentist&specialty=General+Physician&sort=fee"
        );
    }

    #[test]
    fn test_encode_escapes_reserved_characters() {
        let state = FilterState {
            search: "a&b=c".to_string(),
            ..Default::default()
        };
        assert_eq!(encode(&state), "search=a%26b%3Dc");
        assert_eq!(decode(&encode(&state)), state);
    }

    #[test]
    fn test_round_trip() {
        let state = full_state();
        assert_eq!(decode(&encode(&state)), state);

        let state = FilterState {
            search: String::new(),
            consultation: ConsultationType::InClinic,
            specialties: vec![],
            sort: SortKey::Experience,
        };
        assert_eq!(decode(&encode(&state)), state);
    }

    #[test]
    fn test_decode_leading_question_mark_and_percent_spaces() {
        let state = decode("?search=Dr%20A&sort=experience");
        assert_eq!(state.search, "Dr A");
        assert_eq!(state.sort, SortKey::Experience);
    }

    #[test]
    fn test_decode_first_occurrence_wins() {
        let state = decode("search=one&search=two&sort=fee&sort=experience");
        assert_eq!(state.search, "one");
        assert_eq!(state.sort, SortKey::Fee);
    }

    #[test]
    fn test_decode_collects_specialties_in_order() {
        let state = decode("specialty=ENT&specialty=Dentist&specialty=&specialty=ENT");
        assert_eq!(state.specialties, vec!["ENT", "Dentist"]);
    }

    #[test]
    fn test_decode_unknown_values() {
        let state = decode("consultation=Home+Visit&sort=rating&page=2&flag");
        assert_eq!(state, FilterState::default());
    }

    #[test]
    fn test_try_decode_invalid_utf8() {
        let result = try_decode("search=%FF%FE");
        assert!(matches!(
            result,
            Err(UrlStateError::InvalidEncoding { ref key, .. }) if key == "search"
        ));
        assert_eq!(decode("search=%FF%FE&sort=fee"), FilterState::default());
    }

    #[test]
    fn test_location_for() {
        assert_eq!(location_for("/", &FilterState::default()), "/");
        assert_eq!(
            location_for(
                "/doctors",
                &FilterState {
                    sort: SortKey::Fee,
                    ..Default::default()
                }
            ),
            "/doctors?sort=fee"
        );
    }

    #[test]
    fn test_split_location() {
        assert_eq!(split_location("/a?sort=fee"), ("/a", "sort=fee"));
        assert_eq!(split_location("/a"), ("/a", ""));
    }
}
