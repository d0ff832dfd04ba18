//! Staff accounts
//!
//! A user's roles and departments live only in the link tables
//! (`user_roles`, `user_departments`); see [`super::role`] and
//! [`super::department`].

use std::fmt;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::validation::{required, ValidationError};

const TEXT_LEN: usize = 255;

/// Row of `users`
#[derive(Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct User {
    pub user_id: i32,
    pub username: String,
    #[serde(skip_serializing)]
    pub password: String,
    pub email: String,
    pub phone_number: String,
    pub country_code: String,
    pub is_active: bool,
    pub date_added: NaiveDateTime,
}

// Keep stored credentials out of logs.
impl fmt::Debug for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("User")
            .field("user_id", &self.user_id)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("email", &self.email)
            .field("phone_number", &self.phone_number)
            .field("country_code", &self.country_code)
            .field("is_active", &self.is_active)
            .field("date_added", &self.date_added)
            .finish()
    }
}

/// Insert payload for `users`.
///
/// `password` is stored as given; hashing belongs to the authentication layer.
#[derive(Clone, Deserialize)]
pub struct NewUser {
    pub username: String,
    pub password: String,
    pub email: String,
    pub phone_number: String,
    pub country_code: String,
    /// Defaults to active when omitted
    pub is_active: Option<bool>,
    pub date_added: Option<NaiveDateTime>,
}

impl NewUser {
    pub fn new(
        username: impl Into<String>,
        password: impl Into<String>,
        email: impl Into<String>,
        phone_number: impl Into<String>,
        country_code: impl Into<String>,
    ) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
            email: email.into(),
            phone_number: phone_number.into(),
            country_code: country_code.into(),
            is_active: None,
            date_added: None,
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        required("username", &self.username, TEXT_LEN)?;
        required("password", &self.password, TEXT_LEN)?;
        required("email", &self.email, TEXT_LEN)?;
        required("phone_number", &self.phone_number, TEXT_LEN)?;
        required("country_code", &self.country_code, TEXT_LEN)?;
        Ok(())
    }
}

impl fmt::Debug for NewUser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NewUser")
            .field("username", &self.username)
            .field("email", &self.email)
            .finish_non_exhaustive()
    }
}

/// Contact details that may change after registration.
#[derive(Debug, Clone, Deserialize)]
pub struct ContactUpdate {
    pub email: String,
    pub phone_number: String,
    pub country_code: String,
}

impl ContactUpdate {
    pub fn validate(&self) -> Result<(), ValidationError> {
        required("email", &self.email, TEXT_LEN)?;
        required("phone_number", &self.phone_number, TEXT_LEN)?;
        required("country_code", &self.country_code, TEXT_LEN)?;
        Ok(())
    }
}
