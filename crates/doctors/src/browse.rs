//! Interactive search session
//!
//! Each input line is one user event. Filters can be changed while the doctor list is still
//! loading; they take effect as soon as the records arrive.

use crate::prelude::{eprintln, println, *};
use colored::Colorize;
use doctors_core::filters::{ConsultationType, SortKey};
use doctors_core::session::{DoctorSearch, LoadStatus, Location, MemoryLocation};
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::loader::{complete_pending, LoadTask};
use crate::render::doctors_table;

const HELP: &str = "\
Commands:
  search <text>       Search by name (empty text clears the search)
  select [name]       Commit a suggestion, or the current text, as the search
  video | clinic      Toggle the consultation mode
  specialty <name>    Toggle a specialty
  sort fee|experience Toggle the sort order
  clear               Reset every filter
  list                Show the matching doctors
  suggest             Show the current suggestions
  specialties         Show every specialty
  url                 Show the shareable location
  status              Show the load status
  reload              Fetch the doctor list again
  help                Show this message
  quit                Leave the session";

#[derive(Debug, clap::Args, Clone)]
pub struct BrowseOptions {
    /// Query string to start from, as copied from a shared URL
    #[arg(short, long, value_name = "QUERY")]
    pub query: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BrowseCommand {
    Search(String),
    Select(Option<String>),
    Consultation(ConsultationType),
    Specialty(String),
    Sort(SortKey),
    Clear,
    List,
    Suggest,
    Specialties,
    Url,
    Status,
    Reload,
    Help,
    Quit,
}

/// Parse one input line
pub fn parse_command(line: &str) -> Result<BrowseCommand, Error> {
    let line = line.trim();
    let (name, rest) = line.split_once(' ').unwrap_or((line, ""));
    let rest = rest.trim();

    let command = match name.to_lowercase().as_str() {
        "search" | "s" => BrowseCommand::Search(rest.to_string()),
        "select" => BrowseCommand::Select((!rest.is_empty()).then(|| rest.to_string())),
        "video" => BrowseCommand::Consultation(ConsultationType::VideoConsult),
        "clinic" => BrowseCommand::Consultation(ConsultationType::InClinic),
        "specialty" if !rest.is_empty() => BrowseCommand::Specialty(rest.to_string()),
        "sort" => match SortKey::parse(rest) {
            SortKey::None => return Err(Error::UnknownCommand(format!("sort {rest}"))),
            key => BrowseCommand::Sort(key),
        },
        "clear" => BrowseCommand::Clear,
        "list" | "ls" => BrowseCommand::List,
        "suggest" => BrowseCommand::Suggest,
        "specialties" => BrowseCommand::Specialties,
        "url" => BrowseCommand::Url,
        "status" => BrowseCommand::Status,
        "reload" => BrowseCommand::Reload,
        "help" | "?" => BrowseCommand::Help,
        "quit" | "exit" | "q" => BrowseCommand::Quit,
        _ => return Err(Error::UnknownCommand(line.to_string())),
    };

    Ok(command)
}

fn status_line<L: Location>(session: &DoctorSearch<L>) -> String {
    match session.status() {
        LoadStatus::Loading => "Loading doctors...".to_string(),
        LoadStatus::Failed(message) => format!("Error: {message}"),
        LoadStatus::Ready => format!(
            "{} of {} doctors | {}",
            session.filtered().len(),
            session.doctors().len(),
            session.shareable_location()
        ),
    }
}

fn suggestion_lines<L: Location>(session: &DoctorSearch<L>) -> String {
    session
        .suggestions()
        .iter()
        .map(|doctor| format!("  > {}", doctor.name))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Apply `command` to `session` and return the text to show the user
///
/// `Reload` and `Quit` are handled by the caller.
pub fn execute<L: Location>(session: &mut DoctorSearch<L>, command: BrowseCommand) -> String {
    match command {
        BrowseCommand::Search(text) => {
            session.set_search(&text);
            let suggestions = suggestion_lines(session);
            if suggestions.is_empty() {
                status_line(session)
            } else {
                format!("{suggestions}\n{}", status_line(session))
            }
        }
        BrowseCommand::Select(name) => {
            let name = name.unwrap_or_else(|| session.state().search.clone());
            session.select_suggestion(&name);
            status_line(session)
        }
        BrowseCommand::Consultation(consultation) => {
            session.toggle_consultation(consultation);
            status_line(session)
        }
        BrowseCommand::Specialty(specialty) => {
            session.toggle_specialty(&specialty);
            status_line(session)
        }
        BrowseCommand::Sort(key) => {
            session.toggle_sort(key);
            status_line(session)
        }
        BrowseCommand::Clear => {
            session.clear_filters();
            status_line(session)
        }
        BrowseCommand::List => match session.status() {
            LoadStatus::Ready if session.filtered().is_empty() => {
                "No doctors found matching your criteria.".to_string()
            }
            LoadStatus::Ready => doctors_table(session.filtered()).to_string(),
            _ => status_line(session),
        },
        BrowseCommand::Suggest => {
            let suggestions = suggestion_lines(session);
            if suggestions.is_empty() {
                "No suggestions.".to_string()
            } else {
                suggestions
            }
        }
        BrowseCommand::Specialties => session
            .all_specialties()
            .into_iter()
            .map(|specialty| {
                let mark = if session.state().specialties.contains(&specialty) {
                    "[x]"
                } else {
                    "[ ]"
                };
                format!("{mark} {specialty}")
            })
            .collect::<Vec<_>>()
            .join("\n"),
        BrowseCommand::Url => session.shareable_location(),
        BrowseCommand::Status => status_line(session),
        BrowseCommand::Help => HELP.to_string(),
        BrowseCommand::Reload | BrowseCommand::Quit => String::new(),
    }
}

fn start_fetch(
    session: &mut DoctorSearch<MemoryLocation>,
    previous: Option<LoadTask>,
    client: &reqwest::Client,
    endpoint: &str,
) -> LoadTask {
    let client = client.clone();
    let endpoint = endpoint.to_string();
    LoadTask::start(session, previous, async move {
        crate::api::fetch_doctors(&client, &endpoint).await
    })
}

pub async fn run(options: BrowseOptions, global: crate::Global) -> Result<()> {
    let location = crate::search::initial_location(&global.base_path, options.query.as_deref());
    let mut session = DoctorSearch::new(MemoryLocation::new(location));
    let client = reqwest::Client::new();

    if global.verbose {
        eprintln!("Fetching doctors from {}", global.endpoint);
    }

    let mut pending = Some(start_fetch(&mut session, None, &client, &global.endpoint));
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    println!("{}", "Type 'help' for the list of commands.".bright_black());

    loop {
        tokio::select! {
            accepted = complete_pending(&mut pending, &mut session), if pending.is_some() => {
                if accepted {
                    if let Some(error) = session.url_error() {
                        log::warn!("Ignoring malformed query: {error}");
                    }
                    println!("{}", status_line(&session).bright_cyan());
                }
            }
            line = lines.next_line() => {
                let Some(line) = line? else {
                    break;
                };

                if line.trim().is_empty() {
                    continue;
                }

                match parse_command(&line) {
                    Ok(BrowseCommand::Quit) => break,
                    Ok(BrowseCommand::Reload) => {
                        pending = Some(start_fetch(
                            &mut session,
                            pending.take(),
                            &client,
                            &global.endpoint,
                        ));
                        println!("{}", status_line(&session));
                    }
                    Ok(command) => {
                        log::debug!("Executing {command:?}");
                        println!("{}", execute(&mut session, command));
                    }
                    Err(e) => eprintln!("{}", e.to_string().red()),
                }
            }
        }
    }

    if let Some(task) = pending {
        task.abort();
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use doctors_core::record::{DoctorRecord, Specialty};

    fn session() -> DoctorSearch<MemoryLocation> {
        let doctors = vec![
            DoctorRecord {
                name: "Dr. Neha".to_string(),
                fee: 300,
                video_consult: true,
                specialties: vec![Specialty {
                    name: "Dentist".to_string(),
                }],
                ..Default::default()
            },
            DoctorRecord {
                name: "Dr. Nikhil".to_string(),
                fee: 100,
                in_clinic: true,
                specialties: vec![Specialty {
                    name: "ENT".to_string(),
                }],
                ..Default::default()
            },
        ];

        let mut session = DoctorSearch::new(MemoryLocation::new("/"));
        let ticket = session.begin_load();
        session.finish_load(ticket, Ok(doctors));
        session
    }

    #[test]
    fn test_parse_command() {
        assert_eq!(
            parse_command("search Dr N").unwrap(),
            BrowseCommand::Search("Dr N".to_string())
        );
        assert_eq!(
            parse_command("search").unwrap(),
            BrowseCommand::Search(String::new())
        );
        assert_eq!(parse_command("select").unwrap(), BrowseCommand::Select(None));
        assert_eq!(
            parse_command("VIDEO").unwrap(),
            BrowseCommand::Consultation(ConsultationType::VideoConsult)
        );
        assert_eq!(
            parse_command("specialty General Physician").unwrap(),
            BrowseCommand::Specialty("General Physician".to_string())
        );
        assert_eq!(
            parse_command("sort experience").unwrap(),
            BrowseCommand::Sort(SortKey::Experience)
        );
        assert_eq!(parse_command(" quit ").unwrap(), BrowseCommand::Quit);
    }

    #[test]
    fn test_parse_command_errors() {
        assert!(matches!(
            parse_command("sort rating"),
            Err(Error::UnknownCommand(_))
        ));
        assert!(matches!(
            parse_command("specialty"),
            Err(Error::UnknownCommand(_))
        ));
        assert!(matches!(
            parse_command("dance"),
            Err(Error::UnknownCommand(_))
        ));
    }

    #[test]
    fn test_execute_search_shows_suggestions() {
        let mut session = session();
        let output = execute(&mut session, BrowseCommand::Search("dr. n".to_string()));
        assert!(output.contains("> Dr. Neha"));
        assert!(output.contains("> Dr. Nikhil"));
        assert!(output.contains("2 of 2 doctors | /?search=dr.+n"));
    }

    #[test]
    fn test_execute_select_without_name_commits_search() {
        let mut session = session();
        execute(&mut session, BrowseCommand::Search("Nikhil".to_string()));
        let output = execute(&mut session, BrowseCommand::Select(None));

        assert!(session.suggestions().is_empty());
        assert_eq!(output, "1 of 2 doctors | /?search=Nikhil");
    }

    #[test]
    fn test_execute_filters_and_url() {
        let mut session = session();
        execute(&mut session, BrowseCommand::Sort(SortKey::Fee));
        execute(&mut session, BrowseCommand::Specialty("Dentist".to_string()));

        assert_eq!(
            execute(&mut session, BrowseCommand::Url),
            "/?specialty=Dentist&sort=fee"
        );
        assert_eq!(
            execute(&mut session, BrowseCommand::Specialties),
            "[x] Dentist\n[ ] ENT"
        );

        execute(
            &mut session,
            BrowseCommand::Consultation(ConsultationType::InClinic),
        );
        assert_eq!(
            execute(&mut session, BrowseCommand::List),
            "No doctors found matching your criteria."
        );

        let output = execute(&mut session, BrowseCommand::Clear);
        assert_eq!(output, "2 of 2 doctors | /");
    }

    #[test]
    fn test_execute_while_loading() {
        let mut session = DoctorSearch::new(MemoryLocation::new("/"));
        session.begin_load();

        let output = execute(
            &mut session,
            BrowseCommand::Consultation(ConsultationType::VideoConsult),
        );
        assert_eq!(output, "Loading doctors...");
        assert_eq!(
            execute(&mut session, BrowseCommand::List),
            "Loading doctors..."
        );
    }
}
