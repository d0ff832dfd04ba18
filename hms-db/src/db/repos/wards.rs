use sqlx::PgConnection;

use crate::error::DbError;
use crate::models::{NewWard, Ward};
use crate::Result;

pub struct WardRepo<'a> {
    conn: &'a mut PgConnection,
}

impl<'a> WardRepo<'a> {
    pub fn new(conn: &'a mut PgConnection) -> Self {
        Self { conn }
    }

    pub async fn create(&mut self, new: &NewWard) -> Result<Ward> {
        new.validate()?;

        let ward = sqlx::query_as(
            r#"
            INSERT INTO wards (ward_number, ward_type, price_per_night, date_added)
            VALUES ($1, $2, $3, COALESCE($4, now()::timestamp))
            RETURNING *
            "#,
        )
        .bind(new.ward_number)
        .bind(new.ward_type.as_deref())
        .bind(new.price_per_night)
        .bind(new.date_added)
        .fetch_one(&mut *self.conn)
        .await?;

        Ok(ward)
    }

    pub async fn get(&mut self, ward_id: i32) -> Result<Ward> {
        sqlx::query_as("SELECT * FROM wards WHERE ward_id = $1")
            .bind(ward_id)
            .fetch_optional(&mut *self.conn)
            .await?
            .ok_or_else(|| DbError::not_found("ward", ward_id))
    }

    pub async fn list(&mut self) -> Result<Vec<Ward>> {
        let wards = sqlx::query_as("SELECT * FROM wards ORDER BY ward_number, ward_id")
            .fetch_all(&mut *self.conn)
            .await?;

        Ok(wards)
    }
}
