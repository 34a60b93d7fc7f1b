//! Behaviour points

use crate::de;
use crate::error::ClassChartsError;
use chrono::{NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A single behaviour event recorded against the student
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ActivityPoint {
    /// A merit
    Positive(PointDetails),
    /// A demerit
    Negative(PointDetails),
    /// A point that came with a detention
    Detention {
        point: PointDetails,
        detention: DetentionSlot,
    },
}

/// Fields common to every activity point
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PointDetails {
    pub id: u64,
    #[serde(rename(deserialize = "type"))]
    pub point_type: String,
    pub score: i64,
    pub reason: String,
    #[serde(deserialize_with = "de::iso_datetime")]
    pub timestamp: NaiveDateTime,
    #[serde(rename(deserialize = "lesson_name"), default)]
    pub lesson: Option<String>,
    #[serde(rename(deserialize = "teacher_name"))]
    pub teacher: String,
    #[serde(default, deserialize_with = "de::empty_as_none")]
    pub note: Option<String>,
}

/// When and where a detention attached to a point takes place
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetentionSlot {
    #[serde(rename(deserialize = "detention_date"), deserialize_with = "de::iso_datetime")]
    pub date: NaiveDateTime,
    #[serde(rename(deserialize = "detention_time"), deserialize_with = "de::hm_time")]
    pub time: NaiveTime,
    #[serde(rename(deserialize = "detention_location"), default)]
    pub location: Option<String>,
    #[serde(rename(deserialize = "detention_type"), default)]
    pub detention_type: Option<String>,
}

/// The dispatch tags of a point payload
#[derive(Deserialize)]
struct PointTag {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    polarity: Option<String>,
}

impl ActivityPoint {
    /// Decode one entry of the activity feed.
    ///
    /// A `type` of `"detention"` always yields [`ActivityPoint::Detention`], whatever
    /// the polarity. Otherwise `polarity` picks positive or negative; any other
    /// polarity yields `None`.
    pub fn from_payload(payload: &Value) -> Result<Option<Self>, ClassChartsError> {
        let mapping = ClassChartsError::mapping;
        let tag = PointTag::deserialize(payload).map_err(mapping("activity point"))?;

        if tag.kind == "detention" {
            let point = PointDetails::deserialize(payload).map_err(mapping("activity point"))?;
            let detention =
                DetentionSlot::deserialize(payload).map_err(mapping("detention point"))?;
            return Ok(Some(ActivityPoint::Detention { point, detention }));
        }

        let wrap = match tag.polarity.as_deref() {
            Some("positive") => ActivityPoint::Positive,
            Some("negative") => ActivityPoint::Negative,
            _ => return Ok(None),
        };
        let point = PointDetails::deserialize(payload).map_err(mapping("activity point"))?;
        Ok(Some(wrap(point)))
    }

    /// The fields shared by every variant
    pub fn details(&self) -> &PointDetails {
        match self {
            ActivityPoint::Positive(point) | ActivityPoint::Negative(point) => point,
            ActivityPoint::Detention { point, .. } => point,
        }
    }
}
