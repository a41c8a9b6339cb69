use doctors_core::filters::{ConsultationType, FilterState, SortKey};
use doctors_core::session::{DoctorSearch, Location};

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum, serde::Serialize, serde::Deserialize,
)]
pub enum ConsultationArg {
    /// Video Consult
    Video,
    /// In Clinic
    Clinic,
}

impl From<ConsultationArg> for ConsultationType {
    fn from(arg: ConsultationArg) -> Self {
        match arg {
            ConsultationArg::Video => ConsultationType::VideoConsult,
            ConsultationArg::Clinic => ConsultationType::InClinic,
        }
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum, serde::Serialize, serde::Deserialize,
)]
pub enum SortArg {
    /// Price: Low-High
    Fee,
    /// Experience: Most Experience first
    Experience,
}

impl From<SortArg> for SortKey {
    fn from(arg: SortArg) -> Self {
        match arg {
            SortArg::Fee => SortKey::Fee,
            SortArg::Experience => SortKey::Experience,
        }
    }
}

/// Filter flags shared by every command that builds a filter state
#[derive(Debug, Clone, Default, clap::Args, serde::Serialize, serde::Deserialize)]
pub struct FilterArgs {
    /// Case-insensitive search on the doctor's name
    #[arg(short, long)]
    pub search: Option<String>,

    /// Mode of consultation
    #[arg(short, long, value_enum)]
    pub consultation: Option<ConsultationArg>,

    /// Specialty to include (repeat for several, any of them matches)
    #[arg(long = "specialty", value_name = "SPECIALTY")]
    pub specialties: Vec<String>,

    /// Sort order
    #[arg(long, value_enum)]
    pub sort: Option<SortArg>,
}

impl FilterArgs {
    pub fn to_state(&self) -> FilterState {
        let mut state = FilterState {
            search: self.search.clone().unwrap_or_default(),
            consultation: self.consultation.map(Into::into).unwrap_or_default(),
            specialties: Vec::new(),
            sort: self.sort.map(Into::into).unwrap_or_default(),
        };

        for specialty in &self.specialties {
            if !state.specialties.contains(specialty) {
                state.specialties.push(specialty.clone());
            }
        }

        state
    }

    /// Replay the flags as user events on `session`
    ///
    /// Flags select a value; they never toggle off one already seeded from the URL.
    pub fn apply_to<L: Location>(&self, session: &mut DoctorSearch<L>) {
        if let Some(search) = &self.search {
            session.select_suggestion(search);
        }

        if let Some(consultation) = self.consultation.map(ConsultationType::from) {
            if session.state().consultation != consultation {
                session.toggle_consultation(consultation);
            }
        }

        for specialty in &self.specialties {
            if !session.state().specialties.contains(specialty) {
                session.toggle_specialty(specialty);
            }
        }

        if let Some(sort) = self.sort.map(SortKey::from) {
            if session.state().sort != sort {
                session.toggle_sort(sort);
            }
        }
    }
}
