use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::validation::{bounded, non_negative, ValidationError};

/// Row of `drugs` (pharmacy inventory)
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct Drug {
    pub drug_id: i32,
    pub drug_name: Option<String>,
    pub manufacturer: Option<String>,
    pub expiry_date: Option<NaiveDate>,
    pub price: Option<f64>,
    pub quantity_available: Option<i32>,
    pub date_added: NaiveDateTime,
}

impl Drug {
    /// Expired on or before `today`. Drugs without an expiry never expire.
    pub fn is_expired(&self, today: NaiveDate) -> bool {
        self.expiry_date.is_some_and(|d| d <= today)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewDrug {
    pub drug_name: Option<String>,
    pub manufacturer: Option<String>,
    pub expiry_date: Option<NaiveDate>,
    pub price: Option<f64>,
    pub quantity_available: Option<i32>,
    pub date_added: Option<NaiveDateTime>,
}

impl NewDrug {
    pub fn validate(&self) -> Result<(), ValidationError> {
        bounded("drug_name", self.drug_name.as_deref(), 255)?;
        bounded("manufacturer", self.manufacturer.as_deref(), 255)?;
        non_negative("price", self.price)?;
        if self.quantity_available.is_some_and(|q| q < 0) {
            return Err(ValidationError::OutOfRange {
                field: "quantity_available",
                reason: "stock cannot be negative",
            });
        }
        Ok(())
    }
}
