//! Drug inventory repository

use chrono::NaiveDate;
use sqlx::PgConnection;

use crate::error::DbError;
use crate::models::{Drug, NewDrug, ValidationError};
use crate::Result;

pub struct DrugRepo<'a> {
    conn: &'a mut PgConnection,
}

impl<'a> DrugRepo<'a> {
    pub fn new(conn: &'a mut PgConnection) -> Self {
        Self { conn }
    }

    pub async fn create(&mut self, new: &NewDrug) -> Result<Drug> {
        new.validate()?;

        let drug = sqlx::query_as(
            r#"
            INSERT INTO drugs (
                drug_name, manufacturer, expiry_date, price, quantity_available, date_added
            )
            VALUES ($1, $2, $3, $4, $5, COALESCE($6, now()::timestamp))
            RETURNING *
            "#,
        )
        .bind(new.drug_name.as_deref())
        .bind(new.manufacturer.as_deref())
        .bind(new.expiry_date)
        .bind(new.price)
        .bind(new.quantity_available)
        .bind(new.date_added)
        .fetch_one(&mut *self.conn)
        .await?;

        Ok(drug)
    }

    pub async fn get(&mut self, drug_id: i32) -> Result<Drug> {
        sqlx::query_as("SELECT * FROM drugs WHERE drug_id = $1")
            .bind(drug_id)
            .fetch_optional(&mut *self.conn)
            .await?
            .ok_or_else(|| DbError::not_found("drug", drug_id))
    }

    pub async fn list(&mut self) -> Result<Vec<Drug>> {
        let drugs = sqlx::query_as("SELECT * FROM drugs ORDER BY drug_name, drug_id")
            .fetch_all(&mut *self.conn)
            .await?;

        Ok(drugs)
    }

    /// Add `delta` (negative to dispense) to the stock level.
    ///
    /// An unset quantity counts as zero. The update is refused if it
    /// would leave the stock negative.
    pub async fn adjust_quantity(&mut self, drug_id: i32, delta: i32) -> Result<Drug> {
        let updated: Option<Drug> = sqlx::query_as(
            r#"
            UPDATE drugs
            SET quantity_available = COALESCE(quantity_available, 0) + $2
            WHERE drug_id = $1 AND COALESCE(quantity_available, 0) + $2 >= 0
            RETURNING *
            "#,
        )
        .bind(drug_id)
        .bind(delta)
        .fetch_optional(&mut *self.conn)
        .await?;

        if let Some(drug) = updated {
            tracing::debug!(drug_id, delta, "drug stock adjusted");
            return Ok(drug);
        }

        // Distinguish a missing drug from insufficient stock
        self.get(drug_id).await?;
        Err(ValidationError::OutOfRange {
            field: "quantity_available",
            reason: "insufficient stock",
        }
        .into())
    }

    /// Drugs with an expiry date strictly before `date`, soonest first.
    pub async fn expiring_before(&mut self, date: NaiveDate) -> Result<Vec<Drug>> {
        let drugs = sqlx::query_as(
            r#"
            SELECT * FROM drugs
            WHERE expiry_date IS NOT NULL AND expiry_date < $1
            ORDER BY expiry_date, drug_id
            "#,
        )
        .bind(date)
        .fetch_all(&mut *self.conn)
        .await?;

        Ok(drugs)
    }
}
