//! Appointments between a patient and a provider

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::validation::{bounded, ValidationError};

pub(crate) const STATUS_LEN: usize = 20;

/// Row of `appointments`
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct Appointment {
    pub appointment_id: i32,
    pub patient_id: Option<i32>,
    /// Provider
    pub user_id: Option<i32>,
    pub department_id: Option<i32>,
    pub appointment_details: Option<String>,
    pub appointment_date: NaiveDateTime,
    pub appointment_type: Option<String>,
    pub status: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewAppointment {
    pub patient_id: Option<i32>,
    pub user_id: Option<i32>,
    pub department_id: Option<i32>,
    pub appointment_details: Option<String>,
    pub appointment_date: Option<NaiveDateTime>,
    pub appointment_type: Option<String>,
    pub status: Option<String>,
}

impl NewAppointment {
    pub fn validate(&self) -> Result<(), ValidationError> {
        bounded("appointment_type", self.appointment_type.as_deref(), STATUS_LEN)?;
        bounded("status", self.status.as_deref(), STATUS_LEN)?;
        Ok(())
    }
}
