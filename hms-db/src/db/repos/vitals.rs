//! Vital sign repository

use sqlx::PgConnection;

use crate::error::DbError;
use crate::models::{NewVitalSign, VitalSign};
use crate::Result;

pub struct VitalSignRepo<'a> {
    conn: &'a mut PgConnection,
}

impl<'a> VitalSignRepo<'a> {
    pub fn new(conn: &'a mut PgConnection) -> Self {
        Self { conn }
    }

    pub async fn record(&mut self, new: &NewVitalSign) -> Result<VitalSign> {
        new.validate()?;

        let vitals = sqlx::query_as(
            r#"
            INSERT INTO vital_signs (
                patient_id, user_id, heart_rate, blood_pressure, temperature,
                respiratory_rate, oxygen_level, height, weight, recorded_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, COALESCE($10, now()::timestamp))
            RETURNING *
            "#,
        )
        .bind(new.patient_id)
        .bind(new.user_id)
        .bind(new.heart_rate)
        .bind(new.blood_pressure.as_deref())
        .bind(new.temperature)
        .bind(new.respiratory_rate)
        .bind(new.oxygen_level)
        .bind(new.height)
        .bind(new.weight)
        .bind(new.recorded_at)
        .fetch_one(&mut *self.conn)
        .await?;

        Ok(vitals)
    }

    pub async fn get(&mut self, vital_signs_id: i32) -> Result<VitalSign> {
        sqlx::query_as("SELECT * FROM vital_signs WHERE vital_signs_id = $1")
            .bind(vital_signs_id)
            .fetch_optional(&mut *self.conn)
            .await?
            .ok_or_else(|| DbError::not_found("vital signs", vital_signs_id))
    }

    /// Chronological history for a patient.
    pub async fn for_patient(&mut self, patient_id: i32) -> Result<Vec<VitalSign>> {
        let history = sqlx::query_as(
            r#"
            SELECT * FROM vital_signs
            WHERE patient_id = $1
            ORDER BY recorded_at, vital_signs_id
            "#,
        )
        .bind(patient_id)
        .fetch_all(&mut *self.conn)
        .await?;

        Ok(history)
    }

    pub async fn latest_for_patient(&mut self, patient_id: i32) -> Result<Option<VitalSign>> {
        let latest = sqlx::query_as(
            r#"
            SELECT * FROM vital_signs
            WHERE patient_id = $1
            ORDER BY recorded_at DESC, vital_signs_id DESC
            LIMIT 1
            "#,
        )
        .bind(patient_id)
        .fetch_optional(&mut *self.conn)
        .await?;

        Ok(latest)
    }
}
