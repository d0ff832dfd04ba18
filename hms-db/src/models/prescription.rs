use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::validation::{bounded, ValidationError};

/// Row of `prescriptions`
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct Prescription {
    pub prescription_id: i32,
    pub appointment_id: Option<i32>,
    /// Prescribing user
    pub user_id: Option<i32>,
    pub patient_id: Option<i32>,
    /// Kind of item prescribed (drug, test, ...); `item_id` is interpreted by it
    pub prescription_type: Option<String>,
    pub item_id: Option<i32>,
    pub prescription_details: Option<String>,
    pub date_prescribed: NaiveDateTime,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewPrescription {
    pub appointment_id: Option<i32>,
    pub user_id: Option<i32>,
    pub patient_id: Option<i32>,
    pub prescription_type: Option<String>,
    pub item_id: Option<i32>,
    pub prescription_details: Option<String>,
    pub date_prescribed: Option<NaiveDateTime>,
}

impl NewPrescription {
    pub fn validate(&self) -> Result<(), ValidationError> {
        bounded("prescription_type", self.prescription_type.as_deref(), 255)
    }
}
