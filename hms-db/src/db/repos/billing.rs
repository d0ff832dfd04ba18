//! Patient expenses and bills

use sqlx::PgConnection;

use crate::error::DbError;
use crate::models::{Billing, NewBilling, NewPatientExpense, PatientExpense};
use crate::Result;

pub struct BillingRepo<'a> {
    conn: &'a mut PgConnection,
}

impl<'a> BillingRepo<'a> {
    pub fn new(conn: &'a mut PgConnection) -> Self {
        Self { conn }
    }

    pub async fn record_expense(&mut self, new: &NewPatientExpense) -> Result<PatientExpense> {
        new.validate()?;

        let expense = sqlx::query_as(
            r#"
            INSERT INTO patient_expenses (
                patient_id, appointment_id, item_id, total_amount, expense_type, date_created
            )
            VALUES ($1, $2, $3, $4, $5, COALESCE($6, now()::timestamp))
            RETURNING *
            "#,
        )
        .bind(new.patient_id)
        .bind(new.appointment_id)
        .bind(new.item_id.as_deref())
        .bind(new.total_amount)
        .bind(new.expense_type.as_deref())
        .bind(new.date_created)
        .fetch_one(&mut *self.conn)
        .await?;

        Ok(expense)
    }

    pub async fn expenses_for_patient(&mut self, patient_id: i32) -> Result<Vec<PatientExpense>> {
        let expenses = sqlx::query_as(
            r#"
            SELECT * FROM patient_expenses
            WHERE patient_id = $1
            ORDER BY date_created, expense_id
            "#,
        )
        .bind(patient_id)
        .fetch_all(&mut *self.conn)
        .await?;

        Ok(expenses)
    }

    /// Sum of recorded expense amounts; unset amounts count as zero.
    pub async fn expense_total_for_patient(&mut self, patient_id: i32) -> Result<f64> {
        let total = sqlx::query_scalar(
            r#"
            SELECT COALESCE(SUM(total_amount), 0)::double precision
            FROM patient_expenses
            WHERE patient_id = $1
            "#,
        )
        .bind(patient_id)
        .fetch_one(&mut *self.conn)
        .await?;

        Ok(total)
    }

    pub async fn create_bill(&mut self, new: &NewBilling) -> Result<Billing> {
        new.validate()?;

        let bill: Billing = sqlx::query_as(
            r#"
            INSERT INTO billings (
                patient_id, user_id, admission_id, appointment_id, total_amount, billing_date
            )
            VALUES ($1, $2, $3, $4, $5, COALESCE($6, now()::timestamp))
            RETURNING *
            "#,
        )
        .bind(new.patient_id)
        .bind(new.user_id)
        .bind(new.admission_id)
        .bind(new.appointment_id)
        .bind(new.total_amount)
        .bind(new.billing_date)
        .fetch_one(&mut *self.conn)
        .await?;

        tracing::debug!(bill_id = bill.bill_id, "bill created");
        Ok(bill)
    }

    pub async fn get_bill(&mut self, bill_id: i32) -> Result<Billing> {
        sqlx::query_as("SELECT * FROM billings WHERE bill_id = $1")
            .bind(bill_id)
            .fetch_optional(&mut *self.conn)
            .await?
            .ok_or_else(|| DbError::not_found("bill", bill_id))
    }

    pub async fn bills_for_patient(&mut self, patient_id: i32) -> Result<Vec<Billing>> {
        let bills = sqlx::query_as(
            r#"
            SELECT * FROM billings
            WHERE patient_id = $1
            ORDER BY billing_date DESC, bill_id DESC
            "#,
        )
        .bind(patient_id)
        .fetch_all(&mut *self.conn)
        .await?;

        Ok(bills)
    }
}
