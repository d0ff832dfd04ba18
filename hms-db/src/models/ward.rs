use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::validation::{bounded, non_negative, ValidationError};

/// Row of `wards`
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct Ward {
    pub ward_id: i32,
    pub ward_number: Option<i32>,
    pub ward_type: Option<String>,
    pub price_per_night: Option<f64>,
    pub date_added: NaiveDateTime,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewWard {
    pub ward_number: Option<i32>,
    pub ward_type: Option<String>,
    pub price_per_night: Option<f64>,
    pub date_added: Option<NaiveDateTime>,
}

impl NewWard {
    pub fn validate(&self) -> Result<(), ValidationError> {
        bounded("ward_type", self.ward_type.as_deref(), 255)?;
        non_negative("price_per_night", self.price_per_night)?;
        Ok(())
    }
}
