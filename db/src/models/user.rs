use argon2::{
    Argon2,
    password_hash::{self, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
};
use rand::rngs::OsRng;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::role::Role;

/// A row in the `users` collection.
///
/// `purchased_courses` and `cart` hold course ids with set semantics: no
/// duplicates, order irrelevant. They are plain vectors in the persisted
/// document for parity with the store file format.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub username: String,
    pub password_hash: String,
    pub email: String,
    pub fullname: String,
    pub phonenumber: String,
    pub role: Role,
    pub is_banned: bool,
    pub purchased_courses: Vec<String>,
    pub cart: Vec<String>,
}

impl User {
    /// Builds a fresh, unbanned user with a generated id and empty
    /// purchase/cart state. The password must already be hashed.
    pub fn new(
        username: impl Into<String>,
        password_hash: impl Into<String>,
        email: impl Into<String>,
        fullname: impl Into<String>,
        phonenumber: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            username: username.into(),
            password_hash: password_hash.into(),
            email: email.into(),
            fullname: fullname.into(),
            phonenumber: phonenumber.into(),
            role: Role::User,
            is_banned: false,
            purchased_courses: Vec::new(),
            cart: Vec::new(),
        }
    }
}

/// Hashes a plaintext password with Argon2 and a fresh OS-random salt.
pub fn hash_password(password: &str) -> Result<String, password_hash::Error> {
    let salt = SaltString::generate(&mut OsRng);
    Ok(Argon2::default()
        .hash_password(password.as_bytes(), &salt)?
        .to_string())
}

/// Verifies a plaintext password against a stored Argon2 hash.
///
/// An unparseable stored hash counts as a failed verification rather than an
/// error; login treats both identically.
pub fn verify_password(password: &str, hash: &str) -> bool {
    PasswordHash::new(hash)
        .map(|parsed| {
            Argon2::default()
                .verify_password(password.as_bytes(), &parsed)
                .is_ok()
        })
        .unwrap_or(false)
}
