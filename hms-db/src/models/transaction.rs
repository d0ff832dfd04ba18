use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::validation::{bounded, ValidationError};

/// Row of `transactions` (payments against an appointment)
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct Transaction {
    pub transaction_id: i32,
    pub appointment_id: Option<i32>,
    pub transaction_date: NaiveDateTime,
    pub transaction_type: Option<String>,
    /// Signed; refunds are negative
    pub amount: Option<f64>,
    pub payment_method: Option<String>,
    pub transaction_details: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewTransaction {
    pub appointment_id: Option<i32>,
    pub transaction_date: Option<NaiveDateTime>,
    pub transaction_type: Option<String>,
    pub amount: Option<f64>,
    pub payment_method: Option<String>,
    pub transaction_details: Option<String>,
}

impl NewTransaction {
    pub fn validate(&self) -> Result<(), ValidationError> {
        bounded("transaction_type", self.transaction_type.as_deref(), 20)?;
        bounded("payment_method", self.payment_method.as_deref(), 255)?;
        Ok(())
    }
}
