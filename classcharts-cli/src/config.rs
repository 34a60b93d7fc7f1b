//! Configuration resolution from CLI args

use crate::cli::{Args, Command, DisplayDateArg, Range};
use crate::error::CliError;
use crate::output::OutputMode;
use chrono::{Local, NaiveDate};
use classcharts_client::DisplayDate;
use zeroize::Zeroizing;

const CODE_ENV: &str = "CLASSCHARTS_CODE";
const DOB_ENV: &str = "CLASSCHARTS_DOB";

/// Resolved runtime configuration
pub struct Config {
    /// ClassCharts server
    pub base_url: String,
    /// How records are printed
    pub output: OutputMode,
    /// What to fetch
    pub target: Target,
}

/// Login details for a student command
pub struct Credentials {
    /// Access code (zeroized on drop)
    pub code: Zeroizing<String>,
    pub date_of_birth: NaiveDate,
}

pub enum Target {
    /// An authenticated query for one student
    Student {
        credentials: Credentials,
        query: StudentQuery,
    },
    /// The public homework listing of a school
    PublicHomework {
        school: String,
        year: u32,
        date: NaiveDate,
    },
}

/// A query run against a logged-in student session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StudentQuery {
    Activity(Range),
    Homework {
        range: Range,
        display_date: DisplayDate,
    },
    Detentions(Range),
    Timetable {
        day: Option<NaiveDate>,
    },
    Attendance(Range),
    Announcements,
    Profile,
}

impl Config {
    /// Build config from CLI args, resolving credentials for student commands
    pub fn from_args(args: Args) -> Result<Self, CliError> {
        let output = OutputMode::from_flags(args.quiet, args.json);

        let query = match args.command {
            Command::PublicHomework { school, year, date } => {
                return Ok(Config {
                    base_url: args.base_url,
                    output,
                    target: Target::PublicHomework {
                        school,
                        year,
                        date: date.unwrap_or_else(|| Local::now().date_naive()),
                    },
                });
            }
            Command::Activity(range) => StudentQuery::Activity(range),
            Command::Homework {
                range,
                display_date,
            } => StudentQuery::Homework {
                range,
                display_date: display_date.into(),
            },
            Command::Detentions(range) => StudentQuery::Detentions(range),
            Command::Timetable { day } => StudentQuery::Timetable { day },
            Command::Attendance(range) => StudentQuery::Attendance(range),
            Command::Announcements => StudentQuery::Announcements,
            Command::Profile => StudentQuery::Profile,
        };

        let date_of_birth = resolve_dob(args.dob, std::env::var(DOB_ENV).ok())?;
        let code = match resolve_code(args.code, std::env::var(CODE_ENV).ok()) {
            Some(code) => code,
            None => prompt_code()?,
        };

        Ok(Config {
            base_url: args.base_url,
            output,
            target: Target::Student {
                credentials: Credentials {
                    code,
                    date_of_birth,
                },
                query,
            },
        })
    }
}

impl From<DisplayDateArg> for DisplayDate {
    fn from(arg: DisplayDateArg) -> Self {
        match arg {
            DisplayDateArg::Due => DisplayDate::Due,
            DisplayDateArg::Issue => DisplayDate::Issue,
        }
    }
}

/// The access code from the flag, then the environment; empty values count as missing
fn resolve_code(flag: Option<String>, env: Option<String>) -> Option<Zeroizing<String>> {
    flag.into_iter()
        .chain(env)
        .map(Zeroizing::new)
        .find(|code| !code.trim().is_empty())
}

fn resolve_dob(flag: Option<NaiveDate>, env: Option<String>) -> Result<NaiveDate, CliError> {
    if let Some(dob) = flag {
        return Ok(dob);
    }
    let raw = env.ok_or_else(|| {
        CliError::Config(format!("Date of birth required: pass --dob or set {DOB_ENV}"))
    })?;
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").map_err(|e| {
        CliError::Config(format!("Invalid {DOB_ENV} '{raw}', expected YYYY-MM-DD: {e}"))
    })
}

/// Prompt user for the student access code
pub fn prompt_code() -> Result<Zeroizing<String>, CliError> {
    println!("No access code provided ({CODE_ENV} is not set).");
    let s = rpassword::prompt_password("Enter ClassCharts access code: ")
        .map_err(|e| CliError::Config(format!("Failed to read access code: {}", e)))?;
    let code = Zeroizing::new(s);
    if code.trim().is_empty() {
        return Err(CliError::Config("Access code is required.".to_string()));
    }
    Ok(code)
}
