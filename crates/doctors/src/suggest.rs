use crate::prelude::{println, *};
use crate::render::to_json;
use colored::Colorize;
use doctors_core::suggest::suggest;

#[derive(Debug, clap::Args, serde::Serialize, serde::Deserialize, Clone)]
pub struct SuggestOptions {
    /// Partial doctor name
    #[arg(value_name = "TEXT")]
    pub text: String,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

pub async fn run(options: SuggestOptions, global: crate::Global) -> Result<()> {
    let doctors = crate::api::load_doctors_data(&global).await?;
    let names: Vec<String> = suggest(&doctors, &options.text)
        .into_iter()
        .map(|doctor| doctor.name)
        .collect();

    if options.json {
        println!("{}", to_json(&names)?);
    } else if names.is_empty() {
        println!("{}", "No suggestions.".yellow());
    } else {
        for name in names {
            println!("{name}");
        }
    }

    Ok(())
}
