//! Roles and the `user_roles` link table

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::validation::{bounded, ValidationError};

const ROLE_TEXT_LEN: usize = 655;

/// Row of `roles`
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct Role {
    pub id: i32,
    pub role_name: Option<String>,
    pub description: Option<String>,
    pub date_created: NaiveDateTime,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewRole {
    pub role_name: Option<String>,
    pub description: Option<String>,
    pub date_created: Option<NaiveDateTime>,
}

impl NewRole {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            role_name: Some(name.into()),
            ..Self::default()
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        bounded("role_name", self.role_name.as_deref(), ROLE_TEXT_LEN)?;
        bounded("description", self.description.as_deref(), ROLE_TEXT_LEN)?;
        Ok(())
    }
}

/// Row of `user_roles`
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct UserRole {
    pub id: i32,
    pub user_id: i32,
    pub role_id: i32,
    pub date_modified: NaiveDateTime,
}

/// Hospital role catalogue used to seed a fresh database.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StandardRole {
    Administrator,
    Doctor,
    Nurse,
    Receptionist,
    Accountant,
    LaboratoryTechnician,
    Pharmacist,
    SecurityPersonnel,
    ItSupport,
}

impl StandardRole {
    pub const ALL: [StandardRole; 9] = [
        StandardRole::Administrator,
        StandardRole::Doctor,
        StandardRole::Nurse,
        StandardRole::Receptionist,
        StandardRole::Accountant,
        StandardRole::LaboratoryTechnician,
        StandardRole::Pharmacist,
        StandardRole::SecurityPersonnel,
        StandardRole::ItSupport,
    ];

    /// Name stored in `roles.role_name`.
    pub fn name(self) -> &'static str {
        match self {
            StandardRole::Administrator => "Administrator",
            StandardRole::Doctor => "Doctor",
            StandardRole::Nurse => "Nurse",
            StandardRole::Receptionist => "Receptionist",
            StandardRole::Accountant => "Accountant",
            StandardRole::LaboratoryTechnician => "Laboratory Technician",
            StandardRole::Pharmacist => "Pharmacist",
            StandardRole::SecurityPersonnel => "Security Personnel",
            StandardRole::ItSupport => "IT Support",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            StandardRole::Administrator => {
                "Manages user accounts and roles; full access to the system"
            }
            StandardRole::Doctor => {
                "Manages appointments, patient records, prescriptions and test results"
            }
            StandardRole::Nurse => {
                "Records vital signs, administers treatment, manages admissions and discharges"
            }
            StandardRole::Receptionist => {
                "Schedules appointments and registers or updates patients"
            }
            StandardRole::Accountant => "Manages billing, payments and insurance claims",
            StandardRole::LaboratoryTechnician => "Conducts medical tests and records results",
            StandardRole::Pharmacist => "Dispenses medication and monitors drug stock",
            StandardRole::SecurityPersonnel => "Monitors premises and assists in emergencies",
            StandardRole::ItSupport => "Maintains the hospital management system",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|role| role.name().eq_ignore_ascii_case(name.trim()))
    }

    pub fn to_new_role(self) -> NewRole {
        NewRole::named(self.name()).with_description(self.description())
    }
}
