use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::appointment::STATUS_LEN;
use super::validation::{bounded, ValidationError};

/// Row of `admissions`
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct Admission {
    pub admission_id: i32,
    pub patient_id: Option<i32>,
    pub ward_id: Option<i32>,
    pub admission_date: NaiveDateTime,
    /// Unset while the patient is still on the ward
    pub discharge_date: Option<NaiveDate>,
    /// Admitting user
    pub admitted_by: Option<i32>,
    pub admitted_note: Option<String>,
    pub status: Option<String>,
}

impl Admission {
    pub fn is_discharged(&self) -> bool {
        self.discharge_date.is_some()
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewAdmission {
    pub patient_id: Option<i32>,
    pub ward_id: Option<i32>,
    pub admission_date: Option<NaiveDateTime>,
    pub admitted_by: Option<i32>,
    pub admitted_note: Option<String>,
    pub status: Option<String>,
}

impl NewAdmission {
    pub fn validate(&self) -> Result<(), ValidationError> {
        bounded("status", self.status.as_deref(), STATUS_LEN)
    }
}
