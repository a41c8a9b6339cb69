//! Search session state-holder
//!
//! [`DoctorSearch`] owns the loaded records and the user's [`FilterState`]. Each handler
//! mutates the state and synchronously re-derives suggestions, the filtered list and the
//! location. The location is reached only through the [`Location`] port, so the same logic
//! runs against a browser history, a terminal session or a test double.

use crate::filters::{apply, ConsultationType, FilterState, SortKey};
use crate::record::{unique_specialties, DoctorRecord, LoadError};
use crate::suggest::suggest;
use crate::url_state::{location_for, split_location, try_decode, UrlStateError};

/// Port to the current navigation entry
pub trait Location {
    /// Path of the current entry, e.g. `/` or `/doctors`
    fn path(&self) -> String;

    /// Query of the current entry, with or without the leading `?`
    fn query(&self) -> String;

    /// Replace the current entry with `location` without adding a history record
    fn replace(&mut self, location: &str);
}

/// In-memory [`Location`] that keeps every written entry
#[derive(Debug, Clone, Default)]
pub struct MemoryLocation {
    current: String,
    history: Vec<String>,
}

impl MemoryLocation {
    pub fn new(location: impl Into<String>) -> Self {
        Self {
            current: location.into(),
            history: Vec::new(),
        }
    }

    /// Full path and query of the current entry
    pub fn current(&self) -> &str {
        &self.current
    }

    /// Every location written through [`Location::replace`], oldest first
    pub fn history(&self) -> &[String] {
        &self.history
    }
}

impl Location for MemoryLocation {
    fn path(&self) -> String {
        split_location(&self.current).0.to_string()
    }

    fn query(&self) -> String {
        split_location(&self.current).1.to_string()
    }

    fn replace(&mut self, location: &str) {
        self.current = location.to_string();
        self.history.push(location.to_string());
    }
}

/// Identifies one load request. Only the most recent ticket may complete a load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadTicket(u64);

/// Progress of the record list load
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadStatus {
    Loading,
    Ready,
    Failed(String),
}

/// State-holder for one doctor search session
#[derive(Debug)]
pub struct DoctorSearch<L: Location> {
    location: L,
    status: LoadStatus,
    generation: u64,
    doctors: Vec<DoctorRecord>,
    filtered: Vec<DoctorRecord>,
    suggestions: Vec<DoctorRecord>,
    state: FilterState,
    url_error: Option<UrlStateError>,
}

impl<L: Location> DoctorSearch<L> {
    pub fn new(location: L) -> Self {
        Self {
            location,
            status: LoadStatus::Loading,
            generation: 0,
            doctors: Vec::new(),
            filtered: Vec::new(),
            suggestions: Vec::new(),
            state: FilterState::default(),
            url_error: None,
        }
    }

    pub fn status(&self) -> &LoadStatus {
        &self.status
    }

    pub fn doctors(&self) -> &[DoctorRecord] {
        &self.doctors
    }

    pub fn filtered(&self) -> &[DoctorRecord] {
        &self.filtered
    }

    pub fn suggestions(&self) -> &[DoctorRecord] {
        &self.suggestions
    }

    pub fn state(&self) -> &FilterState {
        &self.state
    }

    pub fn location(&self) -> &L {
        &self.location
    }

    /// Decoding error hit while seeding from the location, if any
    pub fn url_error(&self) -> Option<&UrlStateError> {
        self.url_error.as_ref()
    }

    /// Sorted list of every specialty among the loaded records
    pub fn all_specialties(&self) -> Vec<String> {
        unique_specialties(&self.doctors)
    }

    /// Start a load, superseding any request still in flight
    pub fn begin_load(&mut self) -> LoadTicket {
        self.generation += 1;
        self.status = LoadStatus::Loading;
        LoadTicket(self.generation)
    }

    /// Complete the load identified by `ticket`
    ///
    /// Returns `false` and leaves the session untouched when a newer load was started.
    pub fn finish_load(
        &mut self,
        ticket: LoadTicket,
        result: Result<Vec<DoctorRecord>, LoadError>,
    ) -> bool {
        if ticket.0 != self.generation {
            return false;
        }

        match result {
            Ok(doctors) => {
                self.doctors = doctors;
                self.filtered = self.doctors.clone();
                self.seed_from_location();
                self.status = LoadStatus::Ready;
                self.refresh_suggestions();
                self.refresh();
            }
            Err(error) => {
                self.doctors.clear();
                self.filtered.clear();
                self.suggestions.clear();
                self.status = LoadStatus::Failed(error.to_string());
            }
        }

        true
    }

    /// Overlay the fields present in the current location on the filter state
    fn seed_from_location(&mut self) {
        self.url_error = None;
        let params = match try_decode(&self.location.query()) {
            Ok(params) => params,
            Err(error) => {
                self.url_error = Some(error);
                FilterState::default()
            }
        };

        if !params.search.is_empty() {
            self.state.search = params.search;
        }
        if params.consultation != ConsultationType::None {
            self.state.consultation = params.consultation;
        }
        if !params.specialties.is_empty() {
            self.state.specialties = params.specialties;
        }
        if params.sort != SortKey::None {
            self.state.sort = params.sort;
        }
    }

    pub fn set_search(&mut self, search: &str) {
        self.state.search = search.to_string();
        self.refresh_suggestions();
        self.refresh();
    }

    /// Commit a suggestion (or the typed text) as the search and close the suggestion list
    pub fn select_suggestion(&mut self, name: &str) {
        self.state.search = name.to_string();
        self.suggestions.clear();
        self.refresh();
    }

    pub fn toggle_consultation(&mut self, consultation: ConsultationType) {
        self.state.toggle_consultation(consultation);
        self.refresh();
    }

    pub fn toggle_specialty(&mut self, specialty: &str) {
        self.state.toggle_specialty(specialty);
        self.refresh();
    }

    pub fn toggle_sort(&mut self, sort: SortKey) {
        self.state.toggle_sort(sort);
        self.refresh();
    }

    /// Reset every criterion and write the bare path back to the location
    pub fn clear_filters(&mut self) {
        self.state = FilterState::default();
        self.suggestions.clear();
        self.refresh();
    }

    /// Location the current state encodes to
    pub fn shareable_location(&self) -> String {
        location_for(&self.location.path(), &self.state)
    }

    fn refresh_suggestions(&mut self) {
        self.suggestions = suggest(&self.doctors, &self.state.search);
    }

    fn refresh(&mut self) {
        if self.doctors.is_empty() {
            return;
        }

        let location = self.shareable_location();
        self.location.replace(&location);
        self.filtered = apply(&self.doctors, &self.state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::Specialty;

    fn record(name: &str, fee: u64, video: bool, specialty: &str) -> DoctorRecord {
        DoctorRecord {
            name: name.to_string(),
            fee,
            fees: Some(format!("₹ {fee}")),
            video_consult: video,
            in_clinic: !video,
            specialties: vec![Specialty {
                name: specialty.to_string(),
            }],
            ..Default::default()
        }
    }

    fn doctors() -> Vec<DoctorRecord> {
        vec![
            record("Dr. Meera", 400, true, "Dentist"),
            record("Dr. Mohan", 200, false, "ENT"),
            record("Dr. Rahul", 300, true, "ENT"),
        ]
    }

    fn names(records: &[DoctorRecord]) -> Vec<&str> {
        records.iter().map(|r| r.name.as_str()).collect()
    }

    fn loaded(location: &str) -> DoctorSearch<MemoryLocation> {
        let mut session = DoctorSearch::new(MemoryLocation::new(location));
        let ticket = session.begin_load();
        assert!(session.finish_load(ticket, Ok(doctors())));
        session
    }

    #[test]
    fn test_new_session_is_loading() {
        let session = DoctorSearch::new(MemoryLocation::new("/"));
        assert_eq!(session.status(), &LoadStatus::Loading);
        assert!(session.filtered().is_empty());
    }

    #[test]
    fn test_finish_load_without_params() {
        let session = loaded("/");
        assert_eq!(session.status(), &LoadStatus::Ready);
        assert_eq!(session.filtered(), doctors().as_slice());
        assert_eq!(session.location().current(), "/");
    }

    #[test]
    fn test_finish_load_seeds_from_location() {
        let session = loaded("/doctors?consultation=Video+Consult&sort=fee");
        assert_eq!(session.state().consultation, ConsultationType::VideoConsult);
        assert_eq!(session.state().sort, SortKey::Fee);
        assert_eq!(names(session.filtered()), vec!["Dr. Rahul", "Dr. Meera"]);
        assert_eq!(
            session.location().current(),
            "/doctors?consultation=Video+Consult&sort=fee"
        );
    }

    #[test]
    fn test_malformed_location_is_ignored() {
        let session = loaded("/?search=%FF");
        assert!(session.url_error().is_some());
        assert_eq!(session.state(), &FilterState::default());
        assert_eq!(session.filtered().len(), 3);
    }

    #[test]
    fn test_stale_load_is_discarded() {
        let mut session = DoctorSearch::new(MemoryLocation::new("/"));
        let first = session.begin_load();
        let second = session.begin_load();

        assert!(!session.finish_load(first, Ok(doctors())));
        assert!(session.doctors().is_empty());
        assert_eq!(session.status(), &LoadStatus::Loading);

        assert!(session.finish_load(second, Ok(doctors())));
        assert_eq!(session.doctors().len(), 3);
    }

    #[test]
    fn test_failed_load() {
        let mut session = DoctorSearch::new(MemoryLocation::new("/"));
        let ticket = session.begin_load();
        session.finish_load(ticket, Err(LoadError::Http { status: 404 }));

        assert_eq!(
            session.status(),
            &LoadStatus::Failed("HTTP error! Status: 404".to_string())
        );
        assert!(session.doctors().is_empty());
        assert!(session.filtered().is_empty());
    }

    #[test]
    fn test_changes_before_load_apply_after_load() {
        let mut session = DoctorSearch::new(MemoryLocation::new("/"));
        let ticket = session.begin_load();

        session.toggle_specialty("ENT");
        assert!(session.location().history().is_empty());

        session.finish_load(ticket, Ok(doctors()));
        assert_eq!(names(session.filtered()), vec!["Dr. Mohan", "Dr. Rahul"]);
        assert_eq!(session.location().current(), "/?specialty=ENT");
    }

    #[test]
    fn test_every_change_replaces_location() {
        let mut session = loaded("/");
        session.toggle_sort(SortKey::Fee);
        session.toggle_consultation(ConsultationType::InClinic);
        session.toggle_consultation(ConsultationType::InClinic);

        assert_eq!(
            session.location().history(),
            &[
                "/".to_string(),
                "/?sort=fee".to_string(),
                "/?consultation=In+Clinic&sort=fee".to_string(),
                "/?sort=fee".to_string(),
            ]
        );
        assert_eq!(
            names(session.filtered()),
            vec!["Dr. Mohan", "Dr. Rahul", "Dr. Meera"]
        );
    }

    #[test]
    fn test_search_updates_suggestions_and_results() {
        let mut session = loaded("/");
        session.set_search("dr. m");

        assert_eq!(names(session.suggestions()), vec!["Dr. Meera", "Dr. Mohan"]);
        assert_eq!(names(session.filtered()), vec!["Dr. Meera", "Dr. Mohan"]);
        assert_eq!(session.location().current(), "/?search=dr.+m");

        session.set_search(" ");
        assert!(session.suggestions().is_empty());
        assert_eq!(session.filtered().len(), 3);
    }

    #[test]
    fn test_select_suggestion_closes_list() {
        let mut session = loaded("/");
        session.set_search("Mo");
        session.select_suggestion("Dr. Mohan");

        assert!(session.suggestions().is_empty());
        assert_eq!(session.state().search, "Dr. Mohan");
        assert_eq!(names(session.filtered()), vec!["Dr. Mohan"]);
    }

    #[test]
    fn test_clear_filters_writes_bare_path() {
        let mut session = loaded("/doctors?sort=fee&specialty=ENT");
        session.clear_filters();

        assert_eq!(session.state(), &FilterState::default());
        assert_eq!(session.location().current(), "/doctors");
        assert_eq!(session.filtered().len(), 3);
    }

    #[test]
    fn test_all_specialties() {
        let session = loaded("/");
        assert_eq!(session.all_specialties(), vec!["Dentist", "ENT"]);
    }
}
