//! Typed records decoded from ClassCharts payloads
//!
//! Each record declares its required and optional fields up front. A required field
//! that is missing or malformed fails the whole decode with
//! [`ClassChartsError::Mapping`], naming the field.

mod activity;
mod announcement;
mod attendance;
mod common;
mod detention;
mod homework;
mod profile;
mod public;
mod timetable;

pub use activity::{ActivityPoint, DetentionSlot, PointDetails};
pub use announcement::Announcement;
pub use attendance::{Attendance, AttendanceLesson};
pub use common::{BasicLesson, Teacher};
pub use detention::Detention;
pub use homework::{Attachment, CompletionTime, DisplayDate, Homework, HomeworkStatus};
pub use profile::StudentProfile;
pub use public::{PublicAttachment, PublicHomework};
pub use timetable::{Lesson, Period, Timetable};

pub(crate) use profile::PingResponse;

use crate::error::ClassChartsError;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

/// The `data` member every list endpoint wraps its records in
#[derive(Debug, Deserialize)]
pub(crate) struct DataEnvelope<T> {
    pub data: T,
}

/// Decode a payload into a record, tagging failures with the record name
pub(crate) fn decode<T: DeserializeOwned>(
    entity: &'static str,
    payload: Value,
) -> Result<T, ClassChartsError> {
    serde_json::from_value(payload).map_err(ClassChartsError::mapping(entity))
}

/// Decode the `data` list of a response
pub(crate) fn decode_list<T: DeserializeOwned>(
    entity: &'static str,
    payload: Value,
) -> Result<Vec<T>, ClassChartsError> {
    decode::<DataEnvelope<Vec<T>>>(entity, payload).map(|envelope| envelope.data)
}
