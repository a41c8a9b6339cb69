use crate::prelude::{eprintln, *};
use doctors_core::record::{parse_payload, DoctorRecord, LoadError};

pub const DEFAULT_ENDPOINT: &str = "https://srijandubey.github.io/campus-api-mock/SRM-C1-25.json";

/// Fetch and normalize the doctor list
///
/// A single unauthenticated GET, no retries. Every failure is mapped onto a [`LoadError`] so
/// the session can surface it as a load status.
pub async fn fetch_doctors(
    client: &reqwest::Client,
    endpoint: &str,
) -> Result<Vec<DoctorRecord>, LoadError> {
    log::debug!("Fetching doctors from {endpoint}");

    let response = client
        .get(endpoint)
        .header("Accept", "application/json")
        .header("User-Agent", "doctors-search")
        .send()
        .await
        .map_err(|e| LoadError::Network(e.to_string()))?;

    if !response.status().is_success() {
        return Err(LoadError::Http {
            status: response.status().as_u16(),
        });
    }

    let body = response
        .text()
        .await
        .map_err(|e| LoadError::Network(e.to_string()))?;

    let doctors = parse_payload(&body)?;
    log::debug!("Loaded {} doctors", doctors.len());

    Ok(doctors)
}

/// Fetch the doctor list for one-shot commands, turning a load failure into a report
pub async fn load_doctors_data(global: &crate::Global) -> Result<Vec<DoctorRecord>> {
    if global.verbose {
        eprintln!("Fetching doctors from {}", global.endpoint);
    }

    let client = reqwest::Client::new();
    fetch_doctors(&client, &global.endpoint)
        .await
        .map_err(|e| Error::Load(e.to_string()))
        .with_context(|| format!("Failed to load doctors from {}", global.endpoint))
}
