//! Records shared by the student and public feeds

use crate::de;
use serde::{Deserialize, Serialize};

/// A teacher, with the short display name ClassCharts shows ("Mr J Smith")
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "TeacherFields")]
pub struct Teacher {
    pub title: String,
    pub first_name: String,
    pub last_name: String,
    /// `"<title> <first initial> <last name>"`, skipping empty parts
    pub name: String,
}

#[derive(Deserialize)]
struct TeacherFields {
    title: Option<String>,
    first_name: Option<String>,
    last_name: String,
}

impl From<TeacherFields> for Teacher {
    fn from(fields: TeacherFields) -> Self {
        Teacher::new(
            fields.title.unwrap_or_default(),
            fields.first_name.unwrap_or_default(),
            fields.last_name,
        )
    }
}

impl Teacher {
    pub fn new(
        title: impl Into<String>,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
    ) -> Self {
        let (title, first_name, last_name) = (title.into(), first_name.into(), last_name.into());
        let initial = first_name.chars().next().map(String::from).unwrap_or_default();
        let name = [title.as_str(), initial.as_str(), last_name.as_str()]
            .into_iter()
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(" ");

        Self {
            title,
            first_name,
            last_name,
            name,
        }
    }

    /// Split a display name of the form `"<title> <first name> <last name>"`.
    ///
    /// Extra middle words join the first name; with two words there is no first
    /// name and a single word is taken as the last name.
    pub fn from_display_name(display: &str) -> Self {
        let parts: Vec<&str> = display.split_whitespace().collect();
        match parts.as_slice() {
            [] => Teacher::new("", "", ""),
            [last] => Teacher::new("", "", *last),
            [title, last] => Teacher::new(*title, "", *last),
            [title, middle @ .., last] => Teacher::new(*title, middle.join(" "), *last),
        }
    }
}

/// A lesson name with the subject it belongs to, when it has one
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BasicLesson {
    pub name: String,
    #[serde(default, deserialize_with = "de::nested_name")]
    pub subject: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_teacher_display_name() {
        let teacher: Teacher =
            serde_json::from_value(json!({"title": "Mrs", "first_name": "Anne", "last_name": "Jones"}))
                .unwrap();
        assert_eq!(teacher.name, "Mrs A Jones");
        assert_eq!(teacher.first_name, "Anne");
    }

    #[test]
    fn test_teacher_without_first_name() {
        let teacher: Teacher =
            serde_json::from_value(json!({"title": "Dr", "first_name": "", "last_name": "Who"}))
                .unwrap();
        assert_eq!(teacher.name, "Dr Who");
    }

    #[test]
    fn test_teacher_requires_last_name() {
        let err = serde_json::from_value::<Teacher>(json!({"title": "Mr", "first_name": "A"}))
            .unwrap_err();
        assert!(err.to_string().contains("missing field `last_name`"));
    }

    #[test]
    fn test_teacher_from_display_name() {
        assert_eq!(Teacher::from_display_name("Mr J Smith"), Teacher::new("Mr", "J", "Smith"));
        assert_eq!(
            Teacher::from_display_name("Ms Mary Ann Lee"),
            Teacher::new("Ms", "Mary Ann", "Lee")
        );
        assert_eq!(Teacher::from_display_name("Mr Smith").name, "Mr Smith");
        assert_eq!(Teacher::from_display_name("Smith").last_name, "Smith");
        assert_eq!(Teacher::from_display_name("  ").name, "");
    }

    #[test]
    fn test_basic_lesson_subject_shapes() {
        let with: BasicLesson =
            serde_json::from_value(json!({"name": "10A/Ma1", "subject": {"name": "Maths"}})).unwrap();
        assert_eq!(with.subject.as_deref(), Some("Maths"));

        let null: BasicLesson =
            serde_json::from_value(json!({"name": "Tutor", "subject": null})).unwrap();
        assert_eq!(null.subject, None);

        let absent: BasicLesson = serde_json::from_value(json!({"name": "Tutor"})).unwrap();
        assert_eq!(absent.subject, None);
    }
}
