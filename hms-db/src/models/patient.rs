//! Patient registration records

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::validation::{bounded, required, ValidationError};

/// Row of `patients`
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct Patient {
    pub patient_id: i32,
    pub first_name: String,
    pub last_name: String,
    pub gender: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub contact_number: Option<String>,
    pub address: Option<String>,
    pub emergency_contact_name: Option<String>,
    pub emergency_contact_phone_number: Option<String>,
    pub health_insurance_number: Option<String>,
    pub health_insurance_provider: Option<String>,
    pub medical_history: Option<String>,
    /// Registering user
    pub user_id: Option<i32>,
    pub date_added: NaiveDateTime,
}

impl Patient {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewPatient {
    pub first_name: String,
    pub last_name: String,
    pub gender: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub contact_number: Option<String>,
    pub address: Option<String>,
    pub emergency_contact_name: Option<String>,
    pub emergency_contact_phone_number: Option<String>,
    pub health_insurance_number: Option<String>,
    pub health_insurance_provider: Option<String>,
    pub medical_history: Option<String>,
    pub user_id: Option<i32>,
    pub date_added: Option<NaiveDateTime>,
}

impl NewPatient {
    pub fn named(first_name: impl Into<String>, last_name: impl Into<String>) -> Self {
        Self {
            first_name: first_name.into(),
            last_name: last_name.into(),
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        required("first_name", &self.first_name, 255)?;
        required("last_name", &self.last_name, 255)?;
        bounded("gender", self.gender.as_deref(), 10)?;
        bounded("contact_number", self.contact_number.as_deref(), 20)?;
        bounded("address", self.address.as_deref(), 255)?;
        bounded(
            "emergency_contact_name",
            self.emergency_contact_name.as_deref(),
            255,
        )?;
        bounded(
            "emergency_contact_phone_number",
            self.emergency_contact_phone_number.as_deref(),
            255,
        )?;
        bounded(
            "health_insurance_number",
            self.health_insurance_number.as_deref(),
            255,
        )?;
        bounded(
            "health_insurance_provider",
            self.health_insurance_provider.as_deref(),
            255,
        )?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_required() {
        assert!(NewPatient::named("Ada", "Obi").validate().is_ok());
        assert_eq!(
            NewPatient::named("Ada", "").validate(),
            Err(ValidationError::Empty { field: "last_name" })
        );
    }

    #[test]
    fn short_columns_enforced() {
        let mut patient = NewPatient::named("Ada", "Obi");
        patient.contact_number = Some("0".repeat(21));
        assert_eq!(
            patient.validate(),
            Err(ValidationError::TooLong { field: "contact_number", max: 20 })
        );

        let mut patient = NewPatient::named("Ada", "Obi");
        patient.gender = Some("female".into());
        assert!(patient.validate().is_ok());
    }
}
