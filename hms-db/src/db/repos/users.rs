//! User repository
//!
//! Accounts are never deleted; `deactivate` clears `is_active` instead.

use sqlx::PgConnection;

use crate::error::DbError;
use crate::models::validation::required;
use crate::models::{ContactUpdate, NewUser, Page, Pagination, User};
use crate::Result;

use super::{into_page, needs_recount};

pub struct UserRepo<'a> {
    conn: &'a mut PgConnection,
}

impl<'a> UserRepo<'a> {
    pub fn new(conn: &'a mut PgConnection) -> Self {
        Self { conn }
    }

    /// Register a user. `is_active` and `date_added` default when unset.
    pub async fn create(&mut self, new: &NewUser) -> Result<User> {
        new.validate()?;

        let user: User = sqlx::query_as(
            r#"
            INSERT INTO users
                (username, password, email, phone_number, country_code, is_active, date_added)
            VALUES ($1, $2, $3, $4, $5, COALESCE($6, TRUE), COALESCE($7, now()::timestamp))
            RETURNING *
            "#,
        )
        .bind(&new.username)
        .bind(&new.password)
        .bind(&new.email)
        .bind(&new.phone_number)
        .bind(&new.country_code)
        .bind(new.is_active)
        .bind(new.date_added)
        .fetch_one(&mut *self.conn)
        .await?;

        tracing::debug!(user_id = user.user_id, username = %user.username, "user created");
        Ok(user)
    }

    pub async fn get(&mut self, user_id: i32) -> Result<User> {
        sqlx::query_as("SELECT * FROM users WHERE user_id = $1")
            .bind(user_id)
            .fetch_optional(&mut *self.conn)
            .await?
            .ok_or_else(|| DbError::not_found("user", user_id))
    }

    /// Oldest account with this username (usernames are not unique).
    pub async fn find_by_username(&mut self, username: &str) -> Result<Option<User>> {
        let user = sqlx::query_as(
            r#"
            SELECT * FROM users
            WHERE username = $1
            ORDER BY user_id
            LIMIT 1
            "#,
        )
        .bind(username)
        .fetch_optional(&mut *self.conn)
        .await?;

        Ok(user)
    }

    pub async fn list(&mut self, page: Pagination) -> Result<Page<User>> {
        let rows = sqlx::query(
            r#"
            SELECT *, COUNT(*) OVER() AS total
            FROM users
            ORDER BY user_id
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(&mut *self.conn)
        .await?;

        let mut users = into_page(rows, page)?;
        if needs_recount(&users, page) {
            users.total = sqlx::query_scalar("SELECT COUNT(*) FROM users")
                .fetch_one(&mut *self.conn)
                .await?;
        }
        Ok(users)
    }

    pub async fn list_active(&mut self, page: Pagination) -> Result<Page<User>> {
        let rows = sqlx::query(
            r#"
            SELECT *, COUNT(*) OVER() AS total
            FROM users
            WHERE is_active
            ORDER BY user_id
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(&mut *self.conn)
        .await?;

        let mut users = into_page(rows, page)?;
        if needs_recount(&users, page) {
            users.total = sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE is_active")
                .fetch_one(&mut *self.conn)
                .await?;
        }
        Ok(users)
    }

    pub async fn update_contact(&mut self, user_id: i32, contact: &ContactUpdate) -> Result<User> {
        contact.validate()?;

        sqlx::query_as(
            r#"
            UPDATE users
            SET email = $2, phone_number = $3, country_code = $4
            WHERE user_id = $1
            RETURNING *
            "#,
        )
        .bind(user_id)
        .bind(&contact.email)
        .bind(&contact.phone_number)
        .bind(&contact.country_code)
        .fetch_optional(&mut *self.conn)
        .await?
        .ok_or_else(|| DbError::not_found("user", user_id))
    }

    /// Replace the stored password (already hashed by the caller).
    pub async fn set_password(&mut self, user_id: i32, password: &str) -> Result<()> {
        required("password", password, 255)?;

        let result = sqlx::query("UPDATE users SET password = $2 WHERE user_id = $1")
            .bind(user_id)
            .bind(password)
            .execute(&mut *self.conn)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("user", user_id));
        }
        Ok(())
    }

    pub async fn deactivate(&mut self, user_id: i32) -> Result<User> {
        self.set_active(user_id, false).await
    }

    pub async fn reactivate(&mut self, user_id: i32) -> Result<User> {
        self.set_active(user_id, true).await
    }

    async fn set_active(&mut self, user_id: i32, active: bool) -> Result<User> {
        let user: User = sqlx::query_as(
            "UPDATE users SET is_active = $2 WHERE user_id = $1 RETURNING *",
        )
        .bind(user_id)
        .bind(active)
        .fetch_optional(&mut *self.conn)
        .await?
        .ok_or_else(|| DbError::not_found("user", user_id))?;

        tracing::info!(user_id, active, "user activation changed");
        Ok(user)
    }
}
