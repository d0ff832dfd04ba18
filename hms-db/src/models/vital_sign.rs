use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::validation::{bounded, non_negative, ValidationError};

/// Row of `vital_signs`. Every measurement is optional.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct VitalSign {
    pub vital_signs_id: i32,
    pub patient_id: Option<i32>,
    pub user_id: Option<i32>,
    pub heart_rate: Option<i32>,
    /// e.g. "120/80"
    pub blood_pressure: Option<String>,
    pub temperature: Option<f64>,
    pub respiratory_rate: Option<i32>,
    pub oxygen_level: Option<f64>,
    pub height: Option<f64>,
    pub weight: Option<f64>,
    pub recorded_at: NaiveDateTime,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewVitalSign {
    pub patient_id: Option<i32>,
    pub user_id: Option<i32>,
    pub heart_rate: Option<i32>,
    pub blood_pressure: Option<String>,
    pub temperature: Option<f64>,
    pub respiratory_rate: Option<i32>,
    pub oxygen_level: Option<f64>,
    pub height: Option<f64>,
    pub weight: Option<f64>,
    pub recorded_at: Option<NaiveDateTime>,
}

impl NewVitalSign {
    pub fn validate(&self) -> Result<(), ValidationError> {
        bounded("blood_pressure", self.blood_pressure.as_deref(), 20)?;
        non_negative("height", self.height)?;
        non_negative("weight", self.weight)?;
        non_negative("oxygen_level", self.oxygen_level)?;
        Ok(())
    }
}
