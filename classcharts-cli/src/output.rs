//! Output formatting for ClassCharts records

use crate::error::CliError;
use classcharts_client::models::Lesson;
use classcharts_client::{
    ActivityPoint, Announcement, Attendance, Detention, Homework, PublicHomework, StudentProfile,
    Timetable,
};
use serde::Serialize;

/// How records are printed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputMode {
    /// Multi-line view per record with a count at the end
    #[default]
    Full,
    /// One line per record
    Quiet,
    /// Pretty JSON
    Json,
}

impl OutputMode {
    pub fn from_flags(quiet: bool, json: bool) -> Self {
        match (quiet, json) {
            (_, true) => OutputMode::Json,
            (true, false) => OutputMode::Quiet,
            (false, false) => OutputMode::Full,
        }
    }
}

/// Text rendering of a record
pub trait Describe {
    /// A single line
    fn summary(&self) -> String;

    /// The full view, defaulting to the summary
    fn details(&self) -> String {
        self.summary()
    }
}

/// Output formatter for records
pub struct OutputFormatter {
    mode: OutputMode,
}

impl OutputFormatter {
    pub fn new(mode: OutputMode) -> Self {
        Self { mode }
    }

    /// Print a list of records to stdout
    pub fn print_list<T: Serialize + Describe>(&self, records: &[T]) -> Result<(), CliError> {
        let text = self.format_list(records)?;
        if !text.is_empty() {
            println!("{}", text);
        }
        Ok(())
    }

    /// Print a single record to stdout
    pub fn print_one<T: Serialize + Describe>(&self, record: &T) -> Result<(), CliError> {
        println!("{}", self.format_one(record)?);
        Ok(())
    }

    pub fn format_list<T: Serialize + Describe>(&self, records: &[T]) -> Result<String, CliError> {
        let text = match self.mode {
            OutputMode::Json => serde_json::to_string_pretty(records)?,
            OutputMode::Quiet => records
                .iter()
                .map(Describe::summary)
                .collect::<Vec<_>>()
                .join("\n"),
            OutputMode::Full if records.is_empty() => "No records found.".to_string(),
            OutputMode::Full => {
                let mut blocks: Vec<String> = records.iter().map(Describe::details).collect();
                blocks.push(format!("--- {} record(s) ---", records.len()));
                blocks.join("\n\n")
            }
        };
        Ok(text)
    }

    pub fn format_one<T: Serialize + Describe>(&self, record: &T) -> Result<String, CliError> {
        let text = match self.mode {
            OutputMode::Json => serde_json::to_string_pretty(record)?,
            OutputMode::Quiet => record.summary(),
            OutputMode::Full => record.details(),
        };
        Ok(text)
    }
}

/// Append `label: value` lines, skipping empty values
fn with_fields(head: String, fields: &[(&str, String)]) -> String {
    let mut out = head;
    for (label, value) in fields {
        if !value.is_empty() {
            out.push_str(&format!("\n  {}: {}", label, value.replace('\n', "\n    ")));
        }
    }
    out
}

impl Describe for ActivityPoint {
    fn summary(&self) -> String {
        let point = ActivityPoint::details(self);
        let line = format!(
            "{} {:+} {}",
            point.timestamp.format("%Y-%m-%d %H:%M"),
            point.score,
            point.reason
        );
        match self {
            ActivityPoint::Detention { detention, .. } => format!(
                "{} (detention {} {})",
                line,
                detention.date.format("%Y-%m-%d"),
                detention.time.format("%H:%M")
            ),
            _ => line,
        }
    }

    fn details(&self) -> String {
        let point = ActivityPoint::details(self);
        let kind = match self {
            ActivityPoint::Positive(_) => "positive",
            ActivityPoint::Negative(_) => "negative",
            ActivityPoint::Detention { .. } => "detention",
        };
        let mut fields = vec![
            ("Kind", kind.to_string()),
            ("Teacher", point.teacher.clone()),
            ("Lesson", point.lesson.clone().unwrap_or_default()),
            ("Note", point.note.clone().unwrap_or_default()),
        ];
        if let ActivityPoint::Detention { detention, .. } = self {
            fields.push(("Location", detention.location.clone().unwrap_or_default()));
            fields.push(("Type", detention.detention_type.clone().unwrap_or_default()));
        }
        with_fields(self.summary(), &fields)
    }
}

impl Describe for Homework {
    fn summary(&self) -> String {
        let ticked = if self.status.ticked { "x" } else { " " };
        format!("[{}] due {} {}: {}", ticked, self.due_date, self.lesson, self.title)
    }

    fn details(&self) -> String {
        let completion = match (&self.completion_time.unit, self.completion_time.value) {
            (_, 0) => String::new(),
            (Some(unit), value) => format!("{} {}", value, unit),
            (None, value) => value.to_string(),
        };
        with_fields(
            self.summary(),
            &[
                ("Subject", self.subject.clone().unwrap_or_default()),
                ("Teacher", self.teacher.clone()),
                ("Set", self.issue_date.to_string()),
                ("Completion time", completion),
                ("Attachments", self.validated_attachments.len().to_string()),
                ("Description", self.description.clone()),
            ],
        )
    }
}

impl Describe for Detention {
    fn summary(&self) -> String {
        format!(
            "{} {}min {}: {}",
            self.date.format("%Y-%m-%d %H:%M"),
            self.length,
            self.detention_type,
            self.lesson_pupil_behaviour
        )
    }

    fn details(&self) -> String {
        with_fields(
            self.summary(),
            &[
                ("Attended", if self.attended { "yes" } else { "no" }.to_string()),
                ("Location", self.location.clone().unwrap_or_default()),
                ("Teacher", self.teacher.name.clone()),
                ("Lesson", self.lesson.name.clone()),
            ],
        )
    }
}

impl Describe for Lesson {
    fn summary(&self) -> String {
        let room = self.room.as_deref().map(|room| format!(" in {}", room)).unwrap_or_default();
        format!(
            "{} {}-{} {} ({}){}",
            self.period.name,
            self.start.format("%H:%M"),
            self.end.format("%H:%M"),
            self.name,
            self.teacher.name,
            room
        )
    }
}

impl Describe for Timetable {
    fn summary(&self) -> String {
        format!("Timetable for {}: {} lesson(s)", self.date, self.lessons.len())
    }

    fn details(&self) -> String {
        let mut lines = vec![self.summary()];
        lines.extend(self.lessons.iter().map(|lesson| format!("  {}", lesson.summary())));
        lines.join("\n")
    }
}

impl Describe for Attendance {
    fn summary(&self) -> String {
        format!(
            "Attendance {}% ({}% since August), {} to {}",
            self.percentage, self.percentage_since_august, self.start, self.end
        )
    }

    fn details(&self) -> String {
        let mut lines = vec![self.summary()];
        for (day, lessons) in &self.days {
            let marks: Vec<String> = lessons
                .iter()
                .map(|lesson| format!("{}={}", lesson.name, lesson.status))
                .collect();
            lines.push(format!("  {}: {}", day, marks.join(", ")));
        }
        lines.join("\n")
    }
}

impl Describe for Announcement {
    fn summary(&self) -> String {
        let unread = if self.viewed { " " } else { "*" };
        format!("{}{} {}", unread, self.timestamp.format("%Y-%m-%d"), self.title)
    }

    fn details(&self) -> String {
        with_fields(
            self.summary(),
            &[
                ("From", self.school_name.clone()),
                ("Message", self.description.clone()),
            ],
        )
    }
}

impl Describe for StudentProfile {
    fn summary(&self) -> String {
        format!("{} (id {})", self.name, self.id)
    }

    fn details(&self) -> String {
        let mut fields = vec![
            ("Account disabled", self.account_disabled.to_string()),
            ("Announcements", self.announcements_count.to_string()),
        ];
        let features: Vec<String> = self
            .features
            .iter()
            .map(|(key, value)| format!("{}={}", key, value))
            .collect();
        fields.push(("Features", features.join(", ")));
        with_fields(self.summary(), &fields)
    }
}

impl Describe for PublicHomework {
    fn summary(&self) -> String {
        format!(
            "due {} {}: {}",
            self.due_date.format("%Y-%m-%d"),
            self.lesson.name,
            self.title
        )
    }

    fn details(&self) -> String {
        let attachments: Vec<&str> = self
            .attachments
            .iter()
            .map(|attachment| attachment.file_name.as_str())
            .collect();
        with_fields(
            self.summary(),
            &[
                ("Subject", self.lesson.subject.clone().unwrap_or_default()),
                ("Teacher", self.teacher.name.clone()),
                ("Set", self.issue_date.format("%Y-%m-%d").to_string()),
                ("Attachments", attachments.join(", ")),
                ("Description", self.description.clone()),
            ],
        )
    }
}
