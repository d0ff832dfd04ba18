//! Departments and the `user_departments` link table

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::validation::{required, ValidationError};

const NAME_LEN: usize = 255;

/// Row of `departments`
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct Department {
    pub department_id: i32,
    pub department_name: String,
    pub date_created: NaiveDateTime,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewDepartment {
    pub department_name: String,
    pub date_created: Option<NaiveDateTime>,
}

impl NewDepartment {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            department_name: name.into(),
            date_created: None,
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_name(&self.department_name)
    }
}

pub(crate) fn validate_name(name: &str) -> Result<(), ValidationError> {
    required("department_name", name, NAME_LEN)
}

/// Row of `user_departments`
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct UserDepartment {
    pub id: i32,
    pub user_id: i32,
    pub department_id: i32,
    pub date_modified: NaiveDateTime,
}
