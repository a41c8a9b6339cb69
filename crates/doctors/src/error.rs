#[derive(thiserror::Error, Debug, serde::Deserialize, serde::Serialize)]
pub enum Error {
    #[error("Failed to load doctors: {0}")]
    Load(String),

    #[error("Invalid URL state: {0}")]
    UrlState(String),

    #[error("Unknown command: {0}")]
    UnknownCommand(String),
}
