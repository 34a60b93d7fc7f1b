//! School announcements

use crate::de;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// A school announcement shown to the student
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Announcement {
    pub id: u64,
    #[serde(deserialize_with = "de::sanitized")]
    pub title: String,
    #[serde(deserialize_with = "de::sanitized")]
    pub description: String,
    #[serde(rename(deserialize = "state"), default, deserialize_with = "de::viewed_state")]
    pub viewed: bool,
    #[serde(deserialize_with = "de::iso_datetime")]
    pub timestamp: NaiveDateTime,
    pub school_name: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_announcement_mapping() {
        let announcement: Announcement = serde_json::from_value(json!({
            "id": 12,
            "title": "<h1>Sports day</h1>",
            "description": "<p>Bring a water bottle.</p>\n\n\n<p>Sun cream too.</p>",
            "state": "viewed",
            "timestamp": "2021-07-01 08:30:00",
            "school_name": "Example Academy"
        }))
        .unwrap();

        assert_eq!(announcement.title, "Sports day");
        assert_eq!(announcement.description, "Bring a water bottle.\nSun cream too.");
        assert!(announcement.viewed);
        assert_eq!(announcement.timestamp.format("%H:%M").to_string(), "08:30");
    }

    #[test]
    fn test_unviewed_state() {
        let announcement: Announcement = serde_json::from_value(json!({
            "id": 13,
            "title": "Trip",
            "description": "",
            "state": null,
            "timestamp": "2021-07-02",
            "school_name": "Example Academy"
        }))
        .unwrap();
        assert!(!announcement.viewed);
    }
}
