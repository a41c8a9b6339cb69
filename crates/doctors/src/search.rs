use crate::prelude::{eprintln, println, *};
use crate::render::{format_search_text, to_json, SearchOutput};
use doctors_core::session::{DoctorSearch, LoadStatus, MemoryLocation};
use doctors_core::url_state::location_for;

use crate::args::FilterArgs;

#[derive(Debug, clap::Args, serde::Serialize, serde::Deserialize, Clone)]
pub struct SearchOptions {
    #[command(flatten)]
    pub filters: FilterArgs,

    /// Query string to start from, as copied from a shared URL
    #[arg(short, long, value_name = "QUERY")]
    pub query: Option<String>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

pub async fn run(options: SearchOptions, global: crate::Global) -> Result<()> {
    let output = search_data(&options, &global).await?;

    if options.json {
        println!("{}", to_json(&output)?);
    } else {
        println!("{}", format_search_text(&output));
    }

    Ok(())
}

/// Build the starting location for a session from the base path and a shared query
pub fn initial_location(base_path: &str, query: Option<&str>) -> String {
    match query.map(|q| q.trim_start_matches('?')) {
        Some(query) if !query.is_empty() => format!("{base_path}?{query}"),
        _ => base_path.to_string(),
    }
}

/// Load the doctors, seed the filters from `--query`, then apply the filter flags
pub async fn search_data(options: &SearchOptions, global: &crate::Global) -> Result<SearchOutput> {
    let location = initial_location(&global.base_path, options.query.as_deref());
    let mut session = DoctorSearch::new(MemoryLocation::new(location));

    let ticket = session.begin_load();
    let client = reqwest::Client::new();
    let result = crate::api::fetch_doctors(&client, &global.endpoint).await;
    session.finish_load(ticket, result);

    if let LoadStatus::Failed(message) = session.status() {
        return Err(Error::Load(message.clone()).into());
    }

    if let Some(error) = session.url_error() {
        log::warn!("Ignoring malformed query: {error}");
    }

    options.filters.apply_to(&mut session);

    if global.verbose {
        eprintln!(
            "{} of {} doctors match",
            session.filtered().len(),
            session.doctors().len()
        );
    }

    Ok(SearchOutput {
        location: location_for(&global.base_path, session.state()),
        total: session.filtered().len(),
        doctors: session.filtered().to_vec(),
    })
}
