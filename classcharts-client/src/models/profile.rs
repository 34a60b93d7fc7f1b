//! The logged-in student's profile, as returned by ping

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Snapshot of the student's account
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Map<String, Value>")]
pub struct StudentProfile {
    pub id: u64,
    pub name: String,
    pub account_disabled: bool,
    pub announcements_count: u32,
    /// Every other user key, mostly `display_*`/`allow_*` feature switches
    pub features: Map<String, Value>,
}

/// Keys dropped from the user object; `name` already carries them
const NAME_PARTS: [&str; 2] = ["first_name", "last_name"];

fn take<T: DeserializeOwned>(user: &mut Map<String, Value>, key: &str) -> Result<T, String> {
    let value = user
        .shift_remove(key)
        .ok_or_else(|| format!("missing field `{key}`"))?;
    serde_json::from_value(value).map_err(|e| format!("invalid field `{key}`: {e}"))
}

impl TryFrom<Map<String, Value>> for StudentProfile {
    type Error = String;

    fn try_from(mut user: Map<String, Value>) -> Result<Self, Self::Error> {
        for key in NAME_PARTS {
            user.shift_remove(key);
        }

        Ok(Self {
            id: take(&mut user, "id")?,
            name: take(&mut user, "name")?,
            account_disabled: take(&mut user, "is_disabled")?,
            announcements_count: take(&mut user, "announcements_count")?,
            features: user,
        })
    }
}

/// Body of the ping endpoint
#[derive(Debug, Deserialize)]
pub(crate) struct PingResponse {
    pub meta: PingMeta,
    pub data: PingData,
}

#[derive(Debug, Deserialize)]
pub(crate) struct PingMeta {
    pub session_id: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct PingData {
    pub user: StudentProfile,
}
