//! Ward admission repository

use chrono::NaiveDate;
use sqlx::PgConnection;

use crate::error::DbError;
use crate::models::appointment::STATUS_LEN;
use crate::models::validation::bounded;
use crate::models::{Admission, NewAdmission};
use crate::Result;

pub struct AdmissionRepo<'a> {
    conn: &'a mut PgConnection,
}

impl<'a> AdmissionRepo<'a> {
    pub fn new(conn: &'a mut PgConnection) -> Self {
        Self { conn }
    }

    pub async fn admit(&mut self, new: &NewAdmission) -> Result<Admission> {
        new.validate()?;

        let admission: Admission = sqlx::query_as(
            r#"
            INSERT INTO admissions (
                patient_id, ward_id, admission_date, admitted_by, admitted_note, status
            )
            VALUES ($1, $2, COALESCE($3, now()::timestamp), $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(new.patient_id)
        .bind(new.ward_id)
        .bind(new.admission_date)
        .bind(new.admitted_by)
        .bind(new.admitted_note.as_deref())
        .bind(new.status.as_deref())
        .fetch_one(&mut *self.conn)
        .await?;

        tracing::info!(
            admission_id = admission.admission_id,
            ward_id = ?admission.ward_id,
            "patient admitted"
        );
        Ok(admission)
    }

    pub async fn get(&mut self, admission_id: i32) -> Result<Admission> {
        sqlx::query_as("SELECT * FROM admissions WHERE admission_id = $1")
            .bind(admission_id)
            .fetch_optional(&mut *self.conn)
            .await?
            .ok_or_else(|| DbError::not_found("admission", admission_id))
    }

    pub async fn for_patient(&mut self, patient_id: i32) -> Result<Vec<Admission>> {
        let admissions = sqlx::query_as(
            r#"
            SELECT * FROM admissions
            WHERE patient_id = $1
            ORDER BY admission_date DESC, admission_id DESC
            "#,
        )
        .bind(patient_id)
        .fetch_all(&mut *self.conn)
        .await?;

        Ok(admissions)
    }

    /// Admissions on a ward that have not been discharged.
    pub async fn current_in_ward(&mut self, ward_id: i32) -> Result<Vec<Admission>> {
        let admissions = sqlx::query_as(
            r#"
            SELECT * FROM admissions
            WHERE ward_id = $1 AND discharge_date IS NULL
            ORDER BY admission_date, admission_id
            "#,
        )
        .bind(ward_id)
        .fetch_all(&mut *self.conn)
        .await?;

        Ok(admissions)
    }

    pub async fn discharge(&mut self, admission_id: i32, on: NaiveDate) -> Result<Admission> {
        let admission: Admission = sqlx::query_as(
            "UPDATE admissions SET discharge_date = $2 WHERE admission_id = $1 RETURNING *",
        )
        .bind(admission_id)
        .bind(on)
        .fetch_optional(&mut *self.conn)
        .await?
        .ok_or_else(|| DbError::not_found("admission", admission_id))?;

        tracing::info!(admission_id, discharge_date = %on, "patient discharged");
        Ok(admission)
    }

    pub async fn set_status(&mut self, admission_id: i32, status: &str) -> Result<Admission> {
        bounded("status", Some(status), STATUS_LEN)?;

        sqlx::query_as("UPDATE admissions SET status = $2 WHERE admission_id = $1 RETURNING *")
            .bind(admission_id)
            .bind(status)
            .fetch_optional(&mut *self.conn)
            .await?
            .ok_or_else(|| DbError::not_found("admission", admission_id))
    }
}
