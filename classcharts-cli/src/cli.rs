//! CLI argument parsing using clap

use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};

/// Which homework date a range filters on
#[derive(Debug, Clone, Copy, Default, ValueEnum, PartialEq, Eq)]
pub enum DisplayDateArg {
    /// Filter on the due date (default)
    #[default]
    Due,
    /// Filter on the date the homework was set
    Issue,
}

/// Optional date range; omitted bounds use the service defaults
#[derive(clap::Args, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Range {
    /// First day of the range (YYYY-MM-DD)
    #[arg(long)]
    pub after: Option<NaiveDate>,

    /// Last day of the range (YYYY-MM-DD)
    #[arg(long)]
    pub before: Option<NaiveDate>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Behaviour points, detentions included
    Activity(Range),
    /// Homework set or due in a range
    Homework {
        #[command(flatten)]
        range: Range,
        /// Date the range applies to
        #[arg(long, value_enum, default_value = "due")]
        display_date: DisplayDateArg,
    },
    /// Detentions in a range
    Detentions(Range),
    /// Lessons for one day
    Timetable {
        /// Day to show (service default when omitted)
        #[arg(long)]
        day: Option<NaiveDate>,
    },
    /// Attendance statistics
    Attendance(Range),
    /// Announcements published to the student
    Announcements,
    /// The logged-in student's profile
    Profile,
    /// A school's public homework listing, no login needed
    PublicHomework {
        /// The school's public homework identifier
        #[arg(long)]
        school: String,
        /// Year group
        #[arg(long)]
        year: u32,
        /// Any day of the week to list (defaults to today)
        #[arg(long)]
        date: Option<NaiveDate>,
    },
}

/// ClassCharts student records from the command line
#[derive(Parser, Debug)]
#[command(name = "classcharts", about = "Read ClassCharts student records", version)]
pub struct Args {
    /// Student access code (falls back to CLASSCHARTS_CODE, then a prompt)
    #[arg(long, global = true)]
    pub code: Option<String>,

    /// Date of birth, YYYY-MM-DD (falls back to CLASSCHARTS_DOB)
    #[arg(long, global = true)]
    pub dob: Option<NaiveDate>,

    /// ClassCharts server
    #[arg(long, global = true, default_value = "https://www.classcharts.com")]
    pub base_url: String,

    /// Print records as pretty JSON
    #[arg(long, global = true, conflicts_with = "quiet")]
    pub json: bool,

    /// Quiet mode - one line per record
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Command,
}
