//! Scheduled detentions

use super::common::{BasicLesson, Teacher};
use crate::de;
use chrono::{NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

/// A detention the student has been given
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "DetentionFields")]
pub struct Detention {
    pub id: u64,
    pub attended: bool,
    /// The detention day combined with its start time
    pub date: NaiveDateTime,
    /// Length in minutes
    pub length: u32,
    pub location: Option<String>,
    pub lesson: BasicLesson,
    pub teacher: Teacher,
    /// Reason recorded for the behaviour that led to the detention
    pub lesson_pupil_behaviour: String,
    pub detention_type: String,
}

#[derive(Deserialize)]
struct DetentionFields {
    id: u64,
    #[serde(deserialize_with = "de::yes_flag")]
    attended: bool,
    #[serde(deserialize_with = "de::iso_datetime")]
    date: NaiveDateTime,
    #[serde(deserialize_with = "de::hm_time")]
    time: NaiveTime,
    #[serde(deserialize_with = "de::required_u32")]
    length: u32,
    #[serde(default)]
    location: Option<String>,
    lesson: BasicLesson,
    teacher: Teacher,
    lesson_pupil_behaviour: Reason,
    detention_type: Named,
}

#[derive(Deserialize)]
struct Reason {
    reason: String,
}

#[derive(Deserialize)]
struct Named {
    name: String,
}

impl From<DetentionFields> for Detention {
    fn from(fields: DetentionFields) -> Self {
        Self {
            id: fields.id,
            attended: fields.attended,
            date: fields.date.date().and_time(fields.time),
            length: fields.length,
            location: fields.location,
            lesson: fields.lesson,
            teacher: fields.teacher,
            lesson_pupil_behaviour: fields.lesson_pupil_behaviour.reason,
            detention_type: fields.detention_type.name,
        }
    }
}
