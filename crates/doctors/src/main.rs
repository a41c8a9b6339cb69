use crate::prelude::*;
use clap::Parser;

mod api;
mod args;
mod browse;
mod error;
mod loader;
mod prelude;
mod render;
mod search;
mod specialties;
mod suggest;
mod url;

#[derive(Debug, clap::Parser)]
#[command(
    author,
    version,
    about,
    long_about = "Search doctors by name, consultation mode and specialty, sort by fee or experience, and share the view as a URL"
)]
pub struct App {
    #[command(subcommand)]
    pub command: SubCommands,

    #[clap(flatten)]
    global: Global,
}

#[derive(Debug, Clone, clap::Args)]
pub struct Global {
    /// Endpoint returning the doctor list as a JSON array
    #[clap(
        long,
        env = "DOCTORS_API_URL",
        global = true,
        default_value = crate::api::DEFAULT_ENDPOINT
    )]
    endpoint: String,

    /// Path the shareable location is built on
    #[clap(long, env = "DOCTORS_BASE_PATH", global = true, default_value = "/")]
    base_path: String,

    /// Whether to display additional information.
    #[clap(long, env = "DOCTORS_VERBOSE", global = true, default_value = "false")]
    verbose: bool,
}

#[derive(Debug, clap::Parser)]
pub enum SubCommands {
    /// Filter and sort the doctor list
    Search(crate::search::SearchOptions),

    /// Autocomplete suggestions for a name search
    Suggest(crate::suggest::SuggestOptions),

    /// List every specialty available for filtering
    Specialties(crate::specialties::SpecialtiesOptions),

    /// Encode or decode the shareable URL state
    Url(crate::url::App),

    /// Interactive search session, one command per line
    Browse(crate::browse::BrowseOptions),
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();
    color_eyre::install()?;

    let app = App::parse();

    match app.command {
        SubCommands::Search(options) => crate::search::run(options, app.global).await,
        SubCommands::Suggest(options) => crate::suggest::run(options, app.global).await,
        SubCommands::Specialties(options) => crate::specialties::run(options, app.global).await,
        SubCommands::Url(sub_app) => crate::url::run(sub_app, app.global),
        SubCommands::Browse(options) => crate::browse::run(options, app.global).await,
    }
    .map_err(|err: color_eyre::eyre::Report| eyre!(err))
}
