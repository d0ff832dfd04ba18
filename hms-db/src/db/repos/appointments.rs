//! Appointment repository

use sqlx::PgConnection;

use crate::error::DbError;
use crate::models::appointment::STATUS_LEN;
use crate::models::validation::bounded;
use crate::models::{Appointment, NewAppointment};
use crate::Result;

pub struct AppointmentRepo<'a> {
    conn: &'a mut PgConnection,
}

impl<'a> AppointmentRepo<'a> {
    pub fn new(conn: &'a mut PgConnection) -> Self {
        Self { conn }
    }

    pub async fn create(&mut self, new: &NewAppointment) -> Result<Appointment> {
        new.validate()?;

        let appointment = sqlx::query_as(
            r#"
            INSERT INTO appointments (
                patient_id, user_id, department_id, appointment_details,
                appointment_date, appointment_type, status
            )
            VALUES ($1, $2, $3, $4, COALESCE($5, now()::timestamp), $6, $7)
            RETURNING *
            "#,
        )
        .bind(new.patient_id)
        .bind(new.user_id)
        .bind(new.department_id)
        .bind(new.appointment_details.as_deref())
        .bind(new.appointment_date)
        .bind(new.appointment_type.as_deref())
        .bind(new.status.as_deref())
        .fetch_one(&mut *self.conn)
        .await?;

        Ok(appointment)
    }

    pub async fn get(&mut self, appointment_id: i32) -> Result<Appointment> {
        sqlx::query_as("SELECT * FROM appointments WHERE appointment_id = $1")
            .bind(appointment_id)
            .fetch_optional(&mut *self.conn)
            .await?
            .ok_or_else(|| DbError::not_found("appointment", appointment_id))
    }

    /// Newest first.
    pub async fn for_patient(&mut self, patient_id: i32) -> Result<Vec<Appointment>> {
        let appointments = sqlx::query_as(
            r#"
            SELECT * FROM appointments
            WHERE patient_id = $1
            ORDER BY appointment_date DESC, appointment_id DESC
            "#,
        )
        .bind(patient_id)
        .fetch_all(&mut *self.conn)
        .await?;

        Ok(appointments)
    }

    /// Provider's appointments, optionally narrowed to one status.
    pub async fn for_provider(
        &mut self,
        user_id: i32,
        status: Option<&str>,
    ) -> Result<Vec<Appointment>> {
        let appointments = sqlx::query_as(
            r#"
            SELECT * FROM appointments
            WHERE user_id = $1 AND ($2::varchar IS NULL OR status = $2)
            ORDER BY appointment_date, appointment_id
            "#,
        )
        .bind(user_id)
        .bind(status)
        .fetch_all(&mut *self.conn)
        .await?;

        Ok(appointments)
    }

    pub async fn set_status(&mut self, appointment_id: i32, status: &str) -> Result<Appointment> {
        bounded("status", Some(status), STATUS_LEN)?;

        sqlx::query_as(
            "UPDATE appointments SET status = $2 WHERE appointment_id = $1 RETURNING *",
        )
        .bind(appointment_id)
        .bind(status)
        .fetch_optional(&mut *self.conn)
        .await?
        .ok_or_else(|| DbError::not_found("appointment", appointment_id))
    }

    pub async fn update_details(
        &mut self,
        appointment_id: i32,
        details: Option<&str>,
    ) -> Result<Appointment> {
        sqlx::query_as(
            r#"
            UPDATE appointments SET appointment_details = $2
            WHERE appointment_id = $1
            RETURNING *
            "#,
        )
        .bind(appointment_id)
        .bind(details)
        .fetch_optional(&mut *self.conn)
        .await?
        .ok_or_else(|| DbError::not_found("appointment", appointment_id))
    }
}
