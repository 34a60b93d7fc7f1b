//! A day's timetable

use super::common::Teacher;
use crate::de;
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// The lessons of one school day, in timetable order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "TimetableFields")]
pub struct Timetable {
    pub lessons: Vec<Lesson>,
    pub date: NaiveDate,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

/// One timetabled lesson
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "LessonFields")]
pub struct Lesson {
    pub name: String,
    pub subject: Option<String>,
    pub teacher: Teacher,
    pub room: Option<String>,
    pub date: NaiveDate,
    pub period: Period,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    pub note: Option<String>,
}

/// A timetable period, e.g. name `"P1"` number `"1"`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Period {
    pub name: String,
    pub number: String,
}

#[derive(Deserialize)]
struct TimetableFields {
    data: Vec<Lesson>,
    meta: TimetableMeta,
}

#[derive(Deserialize)]
struct TimetableMeta {
    #[serde(default, deserialize_with = "de::iso_dates")]
    dates: Vec<NaiveDate>,
    #[serde(deserialize_with = "de::iso_datetime")]
    start_time: NaiveDateTime,
    #[serde(deserialize_with = "de::iso_datetime")]
    end_time: NaiveDateTime,
}

impl TryFrom<TimetableFields> for Timetable {
    type Error = String;

    fn try_from(fields: TimetableFields) -> Result<Self, Self::Error> {
        let date = fields
            .meta
            .dates
            .first()
            .copied()
            .ok_or_else(|| "timetable `meta.dates` is empty".to_string())?;

        Ok(Self {
            lessons: fields.data,
            date,
            start: fields.meta.start_time,
            end: fields.meta.end_time,
        })
    }
}

#[derive(Deserialize)]
struct LessonFields {
    lesson_name: String,
    #[serde(default)]
    subject_name: Option<String>,
    teacher_name: String,
    #[serde(default)]
    room_name: Option<String>,
    #[serde(deserialize_with = "de::ymd_date")]
    date: NaiveDate,
    #[serde(deserialize_with = "de::string_or_number")]
    period_name: String,
    #[serde(deserialize_with = "de::string_or_number")]
    period_number: String,
    #[serde(deserialize_with = "de::iso_datetime")]
    start_time: NaiveDateTime,
    #[serde(deserialize_with = "de::iso_datetime")]
    end_time: NaiveDateTime,
    #[serde(default, deserialize_with = "de::empty_as_none")]
    note: Option<String>,
}

impl From<LessonFields> for Lesson {
    fn from(fields: LessonFields) -> Self {
        Self {
            name: fields.lesson_name,
            subject: fields.subject_name,
            teacher: Teacher::from_display_name(&fields.teacher_name),
            room: fields.room_name,
            date: fields.date,
            period: Period {
                name: fields.period_name,
                number: fields.period_number,
            },
            start: fields.start_time,
            end: fields.end_time,
            note: fields.note,
        }
    }
}
