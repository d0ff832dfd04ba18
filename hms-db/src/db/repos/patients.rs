//! Patient repository

use sqlx::PgConnection;

use crate::error::DbError;
use crate::models::{NewPatient, Page, Pagination, Patient};
use crate::Result;

use super::{into_page, needs_recount};

pub struct PatientRepo<'a> {
    conn: &'a mut PgConnection,
}

impl<'a> PatientRepo<'a> {
    pub fn new(conn: &'a mut PgConnection) -> Self {
        Self { conn }
    }

    pub async fn create(&mut self, new: &NewPatient) -> Result<Patient> {
        new.validate()?;

        let patient: Patient = sqlx::query_as(
            r#"
            INSERT INTO patients (
                first_name, last_name, gender, date_of_birth, contact_number, address,
                emergency_contact_name, emergency_contact_phone_number,
                health_insurance_number, health_insurance_provider, medical_history,
                user_id, date_added
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12,
                    COALESCE($13, now()::timestamp))
            RETURNING *
            "#,
        )
        .bind(&new.first_name)
        .bind(&new.last_name)
        .bind(new.gender.as_deref())
        .bind(new.date_of_birth)
        .bind(new.contact_number.as_deref())
        .bind(new.address.as_deref())
        .bind(new.emergency_contact_name.as_deref())
        .bind(new.emergency_contact_phone_number.as_deref())
        .bind(new.health_insurance_number.as_deref())
        .bind(new.health_insurance_provider.as_deref())
        .bind(new.medical_history.as_deref())
        .bind(new.user_id)
        .bind(new.date_added)
        .fetch_one(&mut *self.conn)
        .await?;

        tracing::debug!(patient_id = patient.patient_id, "patient registered");
        Ok(patient)
    }

    pub async fn get(&mut self, patient_id: i32) -> Result<Patient> {
        sqlx::query_as("SELECT * FROM patients WHERE patient_id = $1")
            .bind(patient_id)
            .fetch_optional(&mut *self.conn)
            .await?
            .ok_or_else(|| DbError::not_found("patient", patient_id))
    }

    pub async fn list(&mut self, page: Pagination) -> Result<Page<Patient>> {
        let rows = sqlx::query(
            r#"
            SELECT *, COUNT(*) OVER() AS total
            FROM patients
            ORDER BY last_name, first_name, patient_id
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(&mut *self.conn)
        .await?;

        let mut patients = into_page(rows, page)?;
        if needs_recount(&patients, page) {
            patients.total = sqlx::query_scalar("SELECT COUNT(*) FROM patients")
                .fetch_one(&mut *self.conn)
                .await?;
        }
        Ok(patients)
    }

    /// Case-insensitive substring match on first or last name.
    pub async fn search_by_name(&mut self, term: &str, page: Pagination) -> Result<Page<Patient>> {
        let pattern = format!("%{}%", escape_like(term.trim()));

        let rows = sqlx::query(
            r#"
            SELECT *, COUNT(*) OVER() AS total
            FROM patients
            WHERE first_name ILIKE $1 OR last_name ILIKE $1
            ORDER BY last_name, first_name, patient_id
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(&pattern)
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(&mut *self.conn)
        .await?;

        let mut patients = into_page(rows, page)?;
        if needs_recount(&patients, page) {
            patients.total = sqlx::query_scalar(
                "SELECT COUNT(*) FROM patients WHERE first_name ILIKE $1 OR last_name ILIKE $1",
            )
            .bind(&pattern)
            .fetch_one(&mut *self.conn)
            .await?;
        }
        Ok(patients)
    }

    pub async fn update_medical_history(
        &mut self,
        patient_id: i32,
        medical_history: Option<&str>,
    ) -> Result<Patient> {
        sqlx::query_as(
            "UPDATE patients SET medical_history = $2 WHERE patient_id = $1 RETURNING *",
        )
        .bind(patient_id)
        .bind(medical_history)
        .fetch_optional(&mut *self.conn)
        .await?
        .ok_or_else(|| DbError::not_found("patient", patient_id))
    }

    /// Patients registered by a given user.
    pub async fn registered_by(&mut self, user_id: i32) -> Result<Vec<Patient>> {
        let patients = sqlx::query_as(
            "SELECT * FROM patients WHERE user_id = $1 ORDER BY date_added, patient_id",
        )
        .bind(user_id)
        .fetch_all(&mut *self.conn)
        .await?;

        Ok(patients)
    }
}

/// Escape LIKE wildcards so user input matches literally.
fn escape_like(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len());
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn like_wildcards_escaped() {
        assert_eq!(escape_like("obi"), "obi");
        assert_eq!(escape_like("50%_off"), "50\\%\\_off");
        assert_eq!(escape_like("a\\b"), "a\\\\b");
    }
}
