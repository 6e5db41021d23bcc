use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A row in the `sessions` collection: one lesson within a course.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub id: String,
    pub course_id: String,
    pub title: String,
    /// Public path of the uploaded lesson video, if any.
    pub video_url: Option<String>,
}

impl Session {
    pub fn new(course_id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            course_id: course_id.into(),
            title: title.into(),
            video_url: None,
        }
    }
}
