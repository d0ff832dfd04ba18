//! Entity records and insert payloads
//!
//! Each table has a row type (`FromRow`) and a `New*` payload carrying only
//! caller-supplied columns. Payloads are validated against the column
//! limits before any SQL is issued; invalid input returns
//! [`ValidationError`], never a panic.

pub mod admission;
pub mod appointment;
pub mod billing;
pub mod department;
pub mod drug;
pub mod pagination;
pub mod patient;
pub mod prescription;
pub mod role;
pub mod transaction;
pub mod user;
pub mod validation;
pub mod vital_sign;
pub mod ward;

pub use admission::{Admission, NewAdmission};
pub use appointment::{Appointment, NewAppointment};
pub use billing::{Billing, NewBilling, NewPatientExpense, PatientExpense};
pub use department::{Department, NewDepartment, UserDepartment};
pub use drug::{Drug, NewDrug};
pub use medical_test::{MedicalTest, MedicalTestResult, NewMedicalTest, NewMedicalTestResult};
pub use pagination::{Page, Pagination};
pub use patient::{NewPatient, Patient};
pub use prescription::{NewPrescription, Prescription};
pub use role::{NewRole, Role, StandardRole, UserRole};
pub use transaction::{NewTransaction, Transaction};
pub use user::{ContactUpdate, NewUser, User};
pub use validation::ValidationError;
pub use vital_sign::{NewVitalSign, VitalSign};
pub use ward::{NewWard, Ward};
