use colored::Colorize;
use doctors_core::record::{Clinic, DoctorRecord};
use prettytable::row;
use serde::Serialize;

use crate::prelude::new_table;

/// Filtered list plus the location encoding the filters that produced it
#[derive(Debug, Serialize, Clone)]
pub struct SearchOutput {
    pub location: String,
    pub total: usize,
    pub doctors: Vec<DoctorRecord>,
}

pub fn format_fee(doctor: &DoctorRecord) -> String {
    if doctor.fee > 0 {
        format!("₹ {}", doctor.fee)
    } else {
        "Fee not specified".to_string()
    }
}

pub fn format_clinic(clinic: Option<&Clinic>) -> String {
    let Some(clinic) = clinic else {
        return "Clinic information not available".to_string();
    };

    let address = clinic
        .address
        .iter()
        .flat_map(|address| [&address.address_line1, &address.locality, &address.city])
        .filter_map(|part| part.as_deref())
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(", ");

    if address.is_empty() {
        clinic.name.clone()
    } else {
        format!("{} ({address})", clinic.name)
    }
}

pub fn format_modes(doctor: &DoctorRecord) -> String {
    let mut modes = Vec::new();
    if doctor.video_consult {
        modes.push("Video Consult");
    }
    if doctor.in_clinic {
        modes.push("In Clinic");
    }
    modes.join(" | ")
}

fn display_name(doctor: &DoctorRecord) -> &str {
    if doctor.name.is_empty() {
        "Doctor"
    } else {
        &doctor.name
    }
}

/// One doctor as a colored text card
pub fn format_doctor_card(index: usize, doctor: &DoctorRecord) -> String {
    let mut result = String::new();

    result.push_str(&format!(
        "\n{} {}\n",
        format!("[{}]", index + 1).yellow().bold(),
        display_name(doctor).white().bold()
    ));

    let specialties = doctor
        .specialties
        .iter()
        .map(|s| s.name.as_str())
        .collect::<Vec<_>>()
        .join(", ");
    if !specialties.is_empty() {
        result.push_str(&format!("    {}: {}\n", "Specialties".green(), specialties));
    }

    if !doctor.experience.is_empty() {
        result.push_str(&format!(
            "    {}: {}\n",
            "Experience".green(),
            doctor.experience.bright_white()
        ));
    }

    result.push_str(&format!(
        "    {}: {}\n",
        "Clinic".green(),
        format_clinic(doctor.clinic.as_ref())
    ));

    result.push_str(&format!(
        "    {}: {} | {}: {}\n",
        "Fee".green(),
        format_fee(doctor).bright_yellow(),
        "Mode".green(),
        format_modes(doctor).bright_magenta()
    ));

    result
}

/// Whole search result as colored text
pub fn format_search_text(output: &SearchOutput) -> String {
    let mut result = String::new();

    result.push_str(&format!("\n{}\n", "=".repeat(80).bright_cyan()));
    result.push_str(&format!(
        "{}\n",
        format!("DOCTORS ({} found)", output.total).bright_cyan().bold()
    ));
    result.push_str(&format!("{}\n", "=".repeat(80).bright_cyan()));

    if output.doctors.is_empty() {
        result.push_str(&format!(
            "\n{}\n",
            "No doctors found matching your criteria.".yellow()
        ));
    } else {
        for (idx, doctor) in output.doctors.iter().enumerate() {
            result.push_str(&format_doctor_card(idx, doctor));
        }
    }

    result.push_str(&format!(
        "\n{}: {}\n",
        "Share".green(),
        output.location.cyan().underline()
    ));

    result
}

/// Compact table of doctors, used by the interactive session
pub fn doctors_table(doctors: &[DoctorRecord]) -> prettytable::Table {
    let mut table = new_table();
    table.add_row(row![b => "#", "Name", "Fee", "Experience", "Mode", "Specialties"]);

    for (idx, doctor) in doctors.iter().enumerate() {
        let specialties = doctor
            .specialties
            .iter()
            .map(|s| s.name.as_str())
            .collect::<Vec<_>>()
            .join(", ");

        table.add_row(row![
            idx + 1,
            display_name(doctor),
            format_fee(doctor),
            doctor.experience,
            format_modes(doctor),
            specialties
        ]);
    }

    table
}

pub fn to_json<T: Serialize>(value: &T) -> color_eyre::eyre::Result<String> {
    serde_json::to_string_pretty(value)
        .map_err(|e| color_eyre::eyre::eyre!("JSON serialization failed: {}", e))
}
