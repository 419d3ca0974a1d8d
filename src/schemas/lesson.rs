use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::core::time::format_primitive;
use crate::db::models::Lesson;

#[derive(Debug, Deserialize, Validate)]
pub(crate) struct LessonCreate {
    #[validate(length(min = 1, message = "title must not be empty"))]
    pub(crate) title: String,
    #[serde(default)]
    pub(crate) content: String,
    /// Desired 1-based position among the class's lessons. Absent or
    /// non-positive appends; past-the-end clamps. Accepted as `order` for
    /// older clients.
    #[serde(default)]
    #[serde(alias = "order")]
    pub(crate) position: Option<i32>,
}

#[derive(Debug, Deserialize, Validate)]
pub(crate) struct LessonUpdate {
    #[validate(length(min = 1, message = "title must not be empty"))]
    pub(crate) title: Option<String>,
    pub(crate) content: Option<String>,
    #[serde(default)]
    #[serde(alias = "order")]
    pub(crate) position: Option<i32>,
}

#[derive(Debug, Serialize)]
pub(crate) struct LessonResponse {
    pub(crate) id: String,
    pub(crate) class_id: String,
    pub(crate) title: String,
    pub(crate) content: String,
    pub(crate) position: i32,
    pub(crate) created_at: String,
    pub(crate) updated_at: String,
}

impl From<Lesson> for LessonResponse {
    fn from(lesson: Lesson) -> Self {
        Self {
            id: lesson.id,
            class_id: lesson.class_id,
            title: lesson.title,
            content: lesson.content,
            position: lesson.position,
            created_at: format_primitive(lesson.created_at),
            updated_at: format_primitive(lesson.updated_at),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_accepts_order_alias() {
        let payload: LessonCreate =
            serde_json::from_str(r#"{"title": "Intro", "order": 2}"#).expect("payload");
        assert_eq!(payload.position, Some(2));
    }

    #[test]
    fn create_defaults_to_append() {
        let payload: LessonCreate =
            serde_json::from_str(r#"{"title": "Intro"}"#).expect("payload");
        assert_eq!(payload.position, None);
        assert_eq!(payload.content, "");
    }

    #[test]
    fn empty_title_fails_validation() {
        let payload: LessonCreate = serde_json::from_str(r#"{"title": ""}"#).expect("payload");
        assert!(payload.validate().is_err());
    }
}
