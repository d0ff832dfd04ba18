//! Patient expenses and bills

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::validation::{bounded, non_negative, ValidationError};

/// Row of `patient_expenses`
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct PatientExpense {
    pub expense_id: i32,
    pub patient_id: Option<i32>,
    pub appointment_id: Option<i32>,
    /// Free-form reference to the billed item (drug, test, ward, ...)
    pub item_id: Option<String>,
    pub total_amount: Option<f64>,
    pub expense_type: Option<String>,
    pub date_created: NaiveDateTime,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewPatientExpense {
    pub patient_id: Option<i32>,
    pub appointment_id: Option<i32>,
    pub item_id: Option<String>,
    pub total_amount: Option<f64>,
    pub expense_type: Option<String>,
    pub date_created: Option<NaiveDateTime>,
}

impl NewPatientExpense {
    pub fn validate(&self) -> Result<(), ValidationError> {
        bounded("item_id", self.item_id.as_deref(), 255)?;
        bounded("expense_type", self.expense_type.as_deref(), 255)?;
        non_negative("total_amount", self.total_amount)?;
        Ok(())
    }
}

/// Row of `billings`
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct Billing {
    pub bill_id: i32,
    pub patient_id: Option<i32>,
    /// Billing doctor
    pub user_id: Option<i32>,
    pub admission_id: Option<i32>,
    pub appointment_id: Option<i32>,
    pub total_amount: Option<f64>,
    pub billing_date: NaiveDateTime,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewBilling {
    pub patient_id: Option<i32>,
    pub user_id: Option<i32>,
    pub admission_id: Option<i32>,
    pub appointment_id: Option<i32>,
    pub total_amount: Option<f64>,
    pub billing_date: Option<NaiveDateTime>,
}

impl NewBilling {
    pub fn validate(&self) -> Result<(), ValidationError> {
        non_negative("total_amount", self.total_amount)
    }
}
