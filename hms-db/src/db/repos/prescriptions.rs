use sqlx::PgConnection;

use crate::error::DbError;
use crate::models::{NewPrescription, Prescription};
use crate::Result;

pub struct PrescriptionRepo<'a> {
    conn: &'a mut PgConnection,
}

impl<'a> PrescriptionRepo<'a> {
    pub fn new(conn: &'a mut PgConnection) -> Self {
        Self { conn }
    }

    pub async fn create(&mut self, new: &NewPrescription) -> Result<Prescription> {
        new.validate()?;

        let prescription = sqlx::query_as(
            r#"
            INSERT INTO prescriptions (
                appointment_id, user_id, patient_id, prescription_type,
                item_id, prescription_details, date_prescribed
            )
            VALUES ($1, $2, $3, $4, $5, $6, COALESCE($7, now()::timestamp))
            RETURNING *
            "#,
        )
        .bind(new.appointment_id)
        .bind(new.user_id)
        .bind(new.patient_id)
        .bind(new.prescription_type.as_deref())
        .bind(new.item_id)
        .bind(new.prescription_details.as_deref())
        .bind(new.date_prescribed)
        .fetch_one(&mut *self.conn)
        .await?;

        Ok(prescription)
    }

    pub async fn get(&mut self, prescription_id: i32) -> Result<Prescription> {
        sqlx::query_as("SELECT * FROM prescriptions WHERE prescription_id = $1")
            .bind(prescription_id)
            .fetch_optional(&mut *self.conn)
            .await?
            .ok_or_else(|| DbError::not_found("prescription", prescription_id))
    }

    pub async fn for_appointment(&mut self, appointment_id: i32) -> Result<Vec<Prescription>> {
        let prescriptions = sqlx::query_as(
            r#"
            SELECT * FROM prescriptions
            WHERE appointment_id = $1
            ORDER BY date_prescribed, prescription_id
            "#,
        )
        .bind(appointment_id)
        .fetch_all(&mut *self.conn)
        .await?;

        Ok(prescriptions)
    }

    pub async fn for_patient(&mut self, patient_id: i32) -> Result<Vec<Prescription>> {
        let prescriptions = sqlx::query_as(
            r#"
            SELECT * FROM prescriptions
            WHERE patient_id = $1
            ORDER BY date_prescribed DESC, prescription_id DESC
            "#,
        )
        .bind(patient_id)
        .fetch_all(&mut *self.conn)
        .await?;

        Ok(prescriptions)
    }
}
