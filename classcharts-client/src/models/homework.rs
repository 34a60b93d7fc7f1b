//! Homework from the authenticated student feed

use crate::de;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Which date the homework range filters on
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DisplayDate {
    /// Filter by due date (default)
    #[default]
    Due,
    /// Filter by issue date
    Issue,
}

impl DisplayDate {
    /// Value sent as the `display_date` form field
    pub fn as_str(self) -> &'static str {
        match self {
            DisplayDate::Due => "due_date",
            DisplayDate::Issue => "issue_date",
        }
    }
}

/// A homework task set for the student
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Homework {
    pub id: u64,
    pub lesson: String,
    #[serde(default)]
    pub subject: Option<String>,
    pub teacher: String,
    #[serde(deserialize_with = "de::sanitized")]
    pub title: String,
    #[serde(deserialize_with = "de::sanitized")]
    pub description: String,
    #[serde(deserialize_with = "de::ymd_date")]
    pub issue_date: NaiveDate,
    #[serde(deserialize_with = "de::ymd_date")]
    pub due_date: NaiveDate,
    pub status: HomeworkStatus,
    #[serde(default)]
    pub validated_attachments: Vec<Attachment>,
    #[serde(flatten)]
    pub completion_time: CompletionTime,
}

/// The student's progress on a homework task
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HomeworkStatus {
    pub id: u64,
    #[serde(deserialize_with = "de::yes_flag")]
    pub ticked: bool,
    #[serde(rename(deserialize = "attachments"), default)]
    pub submitted_attachments: Vec<Attachment>,
}

/// A file attached to, or submitted for, a homework task
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    pub id: u64,
    pub file_name: String,
    pub file: String,
    #[serde(rename(deserialize = "validated_attachment"), default)]
    pub validated_file: Option<String>,
}

/// Expected time to complete a task, e.g. `30 minutes`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionTime {
    #[serde(rename = "completion_time_value", default, deserialize_with = "de::lenient_u32")]
    pub value: u32,
    #[serde(rename = "completion_time_unit", default)]
    pub unit: Option<String>,
}
