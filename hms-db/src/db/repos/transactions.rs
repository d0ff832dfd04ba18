//! Payment transactions recorded against appointments

use sqlx::PgConnection;

use crate::error::DbError;
use crate::models::{NewTransaction, Transaction};
use crate::Result;

pub struct TransactionRepo<'a> {
    conn: &'a mut PgConnection,
}

impl<'a> TransactionRepo<'a> {
    pub fn new(conn: &'a mut PgConnection) -> Self {
        Self { conn }
    }

    pub async fn create(&mut self, new: &NewTransaction) -> Result<Transaction> {
        new.validate()?;

        let transaction = sqlx::query_as(
            r#"
            INSERT INTO transactions (
                appointment_id, transaction_date, transaction_type,
                amount, payment_method, transaction_details
            )
            VALUES ($1, COALESCE($2, now()::timestamp), $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(new.appointment_id)
        .bind(new.transaction_date)
        .bind(new.transaction_type.as_deref())
        .bind(new.amount)
        .bind(new.payment_method.as_deref())
        .bind(new.transaction_details.as_deref())
        .fetch_one(&mut *self.conn)
        .await?;

        Ok(transaction)
    }

    pub async fn get(&mut self, transaction_id: i32) -> Result<Transaction> {
        sqlx::query_as("SELECT * FROM transactions WHERE transaction_id = $1")
            .bind(transaction_id)
            .fetch_optional(&mut *self.conn)
            .await?
            .ok_or_else(|| DbError::not_found("transaction", transaction_id))
    }

    pub async fn for_appointment(&mut self, appointment_id: i32) -> Result<Vec<Transaction>> {
        let transactions = sqlx::query_as(
            r#"
            SELECT * FROM transactions
            WHERE appointment_id = $1
            ORDER BY transaction_date, transaction_id
            "#,
        )
        .bind(appointment_id)
        .fetch_all(&mut *self.conn)
        .await?;

        Ok(transactions)
    }
}
