//! Records from the unauthenticated public homework feed

use super::common::{BasicLesson, Teacher};
use crate::de;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

const NO_TITLE: &str = "No Title Given.";
const NO_DESCRIPTION: &str = "No Description Given.";

/// A homework entry as shown on a school's public homework page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "PublicHomeworkFields")]
pub struct PublicHomework {
    pub title: String,
    pub description: String,
    pub issue_date: NaiveDateTime,
    pub due_date: NaiveDateTime,
    pub teacher: Teacher,
    pub lesson: BasicLesson,
    pub attachments: Vec<PublicAttachment>,
}

/// A file attached to a public homework entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicAttachment {
    pub file: String,
    pub file_name: String,
}

#[derive(Deserialize)]
struct PublicHomeworkFields {
    #[serde(default, deserialize_with = "de::sanitized")]
    title: String,
    #[serde(default, deserialize_with = "de::sanitized")]
    description: String,
    #[serde(deserialize_with = "de::iso_datetime")]
    issue_date: NaiveDateTime,
    #[serde(deserialize_with = "de::iso_datetime")]
    due_date: NaiveDateTime,
    teacher: Teacher,
    lesson: BasicLesson,
    #[serde(default)]
    homework_attachments: Vec<PublicAttachment>,
}

impl From<PublicHomeworkFields> for PublicHomework {
    fn from(fields: PublicHomeworkFields) -> Self {
        let or_placeholder = |text: String, placeholder: &str| {
            if text.is_empty() {
                placeholder.to_string()
            } else {
                text
            }
        };

        Self {
            title: or_placeholder(fields.title, NO_TITLE),
            description: or_placeholder(fields.description, NO_DESCRIPTION),
            issue_date: fields.issue_date,
            due_date: fields.due_date,
            teacher: fields.teacher,
            lesson: fields.lesson,
            attachments: fields.homework_attachments,
        }
    }
}
