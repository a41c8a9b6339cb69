use crate::prelude::{println, *};
use crate::render::to_json;
use doctors_core::record::unique_specialties;

#[derive(Debug, clap::Args, serde::Serialize, serde::Deserialize, Clone)]
pub struct SpecialtiesOptions {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

pub async fn run(options: SpecialtiesOptions, global: crate::Global) -> Result<()> {
    let doctors = crate::api::load_doctors_data(&global).await?;
    let specialties = unique_specialties(&doctors);

    if options.json {
        println!("{}", to_json(&specialties)?);
    } else {
        for specialty in specialties {
            println!("{specialty}");
        }
    }

    Ok(())
}
