use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::role::Role;

/// A row in the `teachers` collection.
///
/// Teachers share the account fields with users but carry the courses they
/// run and a free-form list of skill tags instead of purchase state.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Teacher {
    pub id: String,
    pub username: String,
    pub password_hash: String,
    pub email: String,
    pub fullname: String,
    pub phonenumber: String,
    pub role: Role,
    pub is_banned: bool,
    pub course_ids: Vec<String>,
    pub stack: Vec<String>,
}

impl Teacher {
    pub fn new(
        username: impl Into<String>,
        password_hash: impl Into<String>,
        email: impl Into<String>,
        fullname: impl Into<String>,
        phonenumber: impl Into<String>,
        course_ids: Vec<String>,
        stack: Vec<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            username: username.into(),
            password_hash: password_hash.into(),
            email: email.into(),
            fullname: fullname.into(),
            phonenumber: phonenumber.into(),
            role: Role::Teacher,
            is_banned: false,
            course_ids,
            stack,
        }
    }
}
