//! Repository implementations for database access
//!
//! Each repository follows these patterns:
//! - Borrows one connection for its lifetime (session or transaction)
//! - Validates payloads before issuing SQL
//! - Lets `DEFAULT now()` fill timestamps the caller leaves unset
//! - Uses `COUNT(*) OVER()` for paginated lists (single query)

pub mod admissions;
pub mod appointments;
pub mod billing;
pub mod departments;
pub mod drugs;
pub mod patients;
pub mod prescriptions;
pub mod roles;
pub mod transactions;
pub mod users;
pub mod vitals;
pub mod wards;

pub use admissions::AdmissionRepo;
pub use appointments::AppointmentRepo;
pub use billing::BillingRepo;
pub use departments::DepartmentRepo;
pub use drugs::DrugRepo;
pub use medical_tests::MedicalTestRepo;
pub use patients::PatientRepo;
pub use prescriptions::PrescriptionRepo;
pub use roles::RoleRepo;
pub use transactions::TransactionRepo;
pub use users::UserRepo;
pub use vitals::VitalSignRepo;
pub use wards::WardRepo;

use sqlx::postgres::PgRow;
use sqlx::{FromRow, PgPool, Row};

use super::Session;
use crate::models::{Page, Pagination};
use crate::Result;

/// Map windowed rows (carrying a `total` column) into a page.
pub(crate) fn into_page<T>(rows: Vec<PgRow>, window: Pagination) -> Result<Page<T>>
where
    T: for<'r> FromRow<'r, PgRow>,
{
    let total = rows.first().map(|r| r.get::<i64, _>("total")).unwrap_or(0);
    let items = rows
        .iter()
        .map(T::from_row)
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(Page::new(items, total, window))
}

/// A window past the last page yields no rows, so `COUNT(*) OVER()` cannot
/// report the total; the caller must count separately.
pub(crate) fn needs_recount<T>(page: &Page<T>, window: Pagination) -> bool {
    page.items.is_empty() && window.offset() > 0
}

/// Repository accessors on a pooled session.
impl Session<'_, PgPool> {
    pub fn users(&mut self) -> UserRepo<'_> {
        UserRepo::new(self.pg())
    }

    pub fn roles(&mut self) -> RoleRepo<'_> {
        RoleRepo::new(self.pg())
    }

    pub fn departments(&mut self) -> DepartmentRepo<'_> {
        DepartmentRepo::new(self.pg())
    }

    pub fn patients(&mut self) -> PatientRepo<'_> {
        PatientRepo::new(self.pg())
    }

    pub fn appointments(&mut self) -> AppointmentRepo<'_> {
        AppointmentRepo::new(self.pg())
    }

    pub fn vitals(&mut self) -> VitalSignRepo<'_> {
        VitalSignRepo::new(self.pg())
    }

    pub fn prescriptions(&mut self) -> PrescriptionRepo<'_> {
        PrescriptionRepo::new(self.pg())
    }

    pub fn medical_tests(&mut self) -> MedicalTestRepo<'_> {
        MedicalTestRepo::new(self.pg())
    }

    pub fn drugs(&mut self) -> DrugRepo<'_> {
        DrugRepo::new(self.pg())
    }

    pub fn wards(&mut self) -> WardRepo<'_> {
        WardRepo::new(self.pg())
    }

    pub fn admissions(&mut self) -> AdmissionRepo<'_> {
        AdmissionRepo::new(self.pg())
    }

    pub fn billing(&mut self) -> BillingRepo<'_> {
        BillingRepo::new(self.pg())
    }

    pub fn transactions(&mut self) -> TransactionRepo<'_> {
        TransactionRepo::new(self.pg())
    }
}
