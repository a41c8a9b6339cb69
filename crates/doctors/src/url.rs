use crate::prelude::{println, *};
use crate::render::to_json;
use doctors_core::url_state::{location_for, try_decode};

use crate::args::FilterArgs;

#[derive(Debug, clap::Parser)]
#[command(name = "url")]
#[command(about = "Encode or decode the shareable URL state")]
pub struct App {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, clap::Subcommand)]
pub enum Commands {
    /// Print the location for a set of filters
    #[clap(name = "encode")]
    Encode(FilterArgs),

    /// Print the filters stored in a query string
    #[clap(name = "decode")]
    Decode(DecodeOptions),
}

#[derive(Debug, clap::Args)]
pub struct DecodeOptions {
    /// Query string, with or without the leading '?'
    #[arg(value_name = "QUERY")]
    pub query: String,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

pub fn run(app: App, global: crate::Global) -> Result<()> {
    match app.command {
        Commands::Encode(filters) => {
            println!("{}", location_for(&global.base_path, &filters.to_state()));
        }
        Commands::Decode(options) => {
            let state =
                try_decode(&options.query).map_err(|e| Error::UrlState(e.to_string()))?;

            if options.json {
                println!("{}", to_json(&state)?);
            } else {
                println!("search:       {}", state.search);
                println!(
                    "consultation: {}",
                    state.consultation.as_str().unwrap_or("")
                );
                println!("specialties:  {}", state.specialties.join(", "));
                println!("sort:         {}", state.sort.as_str().unwrap_or(""));
            }
        }
    }

    Ok(())
}
