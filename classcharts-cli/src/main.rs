//! ClassCharts CLI - read a student's ClassCharts records from the terminal

mod cli;
mod config;
mod error;
mod logging;
mod output;

use clap::Parser;
use classcharts_client::{HomeworkClient, StudentClient};
use cli::Args;
use config::{Config, Credentials, StudentQuery, Target};
use error::CliError;
use output::OutputFormatter;

fn main() {
    logging::init_logging();
    let args = Args::parse();

    if let Err(e) = run(args) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<(), CliError> {
    let config = Config::from_args(args)?;
    let formatter = OutputFormatter::new(config.output);

    match config.target {
        Target::PublicHomework { school, year, date } => {
            let client = HomeworkClient::builder(school)
                .base_url(config.base_url.as_str())?
                .build()?;
            formatter.print_list(&client.fetch(date, year)?)
        }
        Target::Student { credentials, query } => {
            run_student(&config.base_url, credentials, query, &formatter)
        }
    }
}

/// Run one query and log out, whether or not the query succeeded
fn run_student(
    base_url: &str,
    credentials: Credentials,
    query: StudentQuery,
    formatter: &OutputFormatter,
) -> Result<(), CliError> {
    let mut client = StudentClient::builder(credentials.code.as_str(), credentials.date_of_birth)
        .base_url(base_url)?
        .build()?;

    let result = run_query(&mut client, query, formatter);
    let logout = client.logout();

    match (result, logout) {
        (Err(e), Err(logout_err)) => {
            tracing::warn!(error = %logout_err, "Logout failed after an earlier error");
            Err(e)
        }
        (Err(e), Ok(())) => Err(e),
        (Ok(()), logout) => logout.map_err(CliError::from),
    }
}

fn run_query(
    client: &mut StudentClient,
    query: StudentQuery,
    formatter: &OutputFormatter,
) -> Result<(), CliError> {
    match query {
        StudentQuery::Activity(range) => {
            formatter.print_list(&client.activity(range.after, range.before)?)
        }
        StudentQuery::Homework {
            range,
            display_date,
        } => formatter.print_list(&client.homeworks(display_date, range.after, range.before)?),
        StudentQuery::Detentions(range) => {
            formatter.print_list(&client.detentions(range.after, range.before)?)
        }
        StudentQuery::Timetable { day } => formatter.print_one(&client.timetable(day)?),
        StudentQuery::Attendance(range) => {
            formatter.print_one(&client.attendance(range.after, range.before)?)
        }
        StudentQuery::Announcements => formatter.print_list(&client.announcements()?),
        StudentQuery::Profile => {
            let profile = client.ping()?.clone();
            formatter.print_one(&profile)
        }
    }
}
