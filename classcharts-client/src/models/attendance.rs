//! Attendance statistics

use crate::de;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Attendance over a reporting period
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "AttendanceFields")]
pub struct Attendance {
    pub percentage: u32,
    pub percentage_since_august: u32,
    pub dates: Vec<NaiveDate>,
    /// Per-day lesson records, each day in the order the service lists them
    pub days: BTreeMap<NaiveDate, Vec<AttendanceLesson>>,
    pub sessions: u32,
    pub start: NaiveDate,
    pub end: NaiveDate,
}

/// Attendance mark for one lesson
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendanceLesson {
    /// Lesson name, the key of the record in the payload
    #[serde(default)]
    pub name: String,
    #[serde(default, deserialize_with = "de::empty_as_none")]
    pub code: Option<String>,
    #[serde(default, deserialize_with = "de::lenient_u32")]
    pub late_minutes: u32,
    pub status: String,
}

#[derive(Deserialize)]
struct AttendanceFields {
    #[serde(deserialize_with = "de::object_or_empty_array")]
    data: Map<String, Value>,
    meta: AttendanceMeta,
}

#[derive(Deserialize)]
struct AttendanceMeta {
    #[serde(deserialize_with = "de::required_u32")]
    percentage: u32,
    // The service spells it "singe"
    #[serde(alias = "percentage_singe_august", deserialize_with = "de::required_u32")]
    percentage_since_august: u32,
    #[serde(default, deserialize_with = "de::iso_dates")]
    dates: Vec<NaiveDate>,
    #[serde(default, deserialize_with = "de::count_or_len")]
    sessions: u32,
    #[serde(deserialize_with = "de::iso_date")]
    start_date: NaiveDate,
    #[serde(deserialize_with = "de::iso_date")]
    end_date: NaiveDate,
}

impl AttendanceLesson {
    /// Decode one `lesson name → record` entry of a day
    fn from_entry(name: String, record: Value) -> Result<Self, serde_json::Error> {
        let mut lesson: AttendanceLesson = serde_json::from_value(record)?;
        lesson.name = name;
        Ok(lesson)
    }
}

impl TryFrom<AttendanceFields> for Attendance {
    type Error = String;

    fn try_from(fields: AttendanceFields) -> Result<Self, Self::Error> {
        let mut days = BTreeMap::new();
        for (date, lessons) in fields.data {
            let day = de::parse_iso_date(&date)?;
            let lessons = de::object_or_empty_array(lessons)
                .map_err(|e| format!("attendance for {date}: {e}"))?
                .into_iter()
                .map(|(name, record)| {
                    AttendanceLesson::from_entry(name.clone(), record)
                        .map_err(|e| format!("attendance for {date} lesson `{name}`: {e}"))
                })
                .collect::<Result<Vec<_>, _>>()?;
            days.insert(day, lessons);
        }

        Ok(Self {
            percentage: fields.meta.percentage,
            percentage_since_august: fields.meta.percentage_since_august,
            dates: fields.meta.dates,
            days,
            sessions: fields.meta.sessions,
            start: fields.meta.start_date,
            end: fields.meta.end_date,
        })
    }
}
