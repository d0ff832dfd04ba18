//! Role repository
//!
//! Role membership is expressed only through `user_roles`; every
//! "roles of a user" question is a join over that table.

use sqlx::PgConnection;

use crate::error::DbError;
use crate::models::{NewRole, Role, StandardRole, User, UserRole};
use crate::Result;

pub struct RoleRepo<'a> {
    conn: &'a mut PgConnection,
}

impl<'a> RoleRepo<'a> {
    pub fn new(conn: &'a mut PgConnection) -> Self {
        Self { conn }
    }

    pub async fn create(&mut self, new: &NewRole) -> Result<Role> {
        new.validate()?;

        let role = sqlx::query_as(
            r#"
            INSERT INTO roles (role_name, description, date_created)
            VALUES ($1, $2, COALESCE($3, now()::timestamp))
            RETURNING id, role_name, description, date_created
            "#,
        )
        .bind(new.role_name.as_deref())
        .bind(new.description.as_deref())
        .bind(new.date_created)
        .fetch_one(&mut *self.conn)
        .await?;

        Ok(role)
    }

    pub async fn get(&mut self, id: i32) -> Result<Role> {
        sqlx::query_as("SELECT id, role_name, description, date_created FROM roles WHERE id = $1")
            .bind(id)
            .fetch_optional(&mut *self.conn)
            .await?
            .ok_or_else(|| DbError::not_found("role", id))
    }

    pub async fn find_by_name(&mut self, name: &str) -> Result<Option<Role>> {
        let role = sqlx::query_as(
            r#"
            SELECT id, role_name, description, date_created
            FROM roles
            WHERE role_name = $1
            ORDER BY id
            LIMIT 1
            "#,
        )
        .bind(name)
        .fetch_optional(&mut *self.conn)
        .await?;

        Ok(role)
    }

    pub async fn list(&mut self) -> Result<Vec<Role>> {
        let roles = sqlx::query_as(
            "SELECT id, role_name, description, date_created FROM roles ORDER BY id",
        )
        .fetch_all(&mut *self.conn)
        .await?;

        Ok(roles)
    }

    /// Link a user to a role.
    ///
    /// A missing user or role surfaces as [`DbError::ForeignKeyViolation`].
    pub async fn assign(&mut self, user_id: i32, role_id: i32) -> Result<UserRole> {
        let link = sqlx::query_as(
            r#"
            INSERT INTO user_roles (user_id, role_id)
            VALUES ($1, $2)
            RETURNING id, user_id, role_id, date_modified
            "#,
        )
        .bind(user_id)
        .bind(role_id)
        .fetch_one(&mut *self.conn)
        .await?;

        tracing::debug!(user_id, role_id, "role assigned");
        Ok(link)
    }

    /// Point an existing link at another role; `date_modified` is bumped.
    pub async fn reassign(&mut self, link_id: i32, role_id: i32) -> Result<UserRole> {
        sqlx::query_as(
            r#"
            UPDATE user_roles
            SET role_id = $2
            WHERE id = $1
            RETURNING id, user_id, role_id, date_modified
            "#,
        )
        .bind(link_id)
        .bind(role_id)
        .fetch_optional(&mut *self.conn)
        .await?
        .ok_or_else(|| DbError::not_found("user role", link_id))
    }

    pub async fn links_for_user(&mut self, user_id: i32) -> Result<Vec<UserRole>> {
        let links = sqlx::query_as(
            r#"
            SELECT id, user_id, role_id, date_modified
            FROM user_roles
            WHERE user_id = $1
            ORDER BY id
            "#,
        )
        .bind(user_id)
        .fetch_all(&mut *self.conn)
        .await?;

        Ok(links)
    }

    pub async fn role_names_for_user(&mut self, user_id: i32) -> Result<Vec<String>> {
        let names = sqlx::query_scalar(
            r#"
            SELECT DISTINCT r.role_name
            FROM user_roles ur
            JOIN roles r ON r.id = ur.role_id
            WHERE ur.user_id = $1 AND r.role_name IS NOT NULL
            ORDER BY r.role_name
            "#,
        )
        .bind(user_id)
        .fetch_all(&mut *self.conn)
        .await?;

        Ok(names)
    }

    pub async fn role_names_for_username(&mut self, username: &str) -> Result<Vec<String>> {
        let names = sqlx::query_scalar(
            r#"
            SELECT DISTINCT r.role_name
            FROM users u
            JOIN user_roles ur ON ur.user_id = u.user_id
            JOIN roles r ON r.id = ur.role_id
            WHERE u.username = $1 AND r.role_name IS NOT NULL
            ORDER BY r.role_name
            "#,
        )
        .bind(username)
        .fetch_all(&mut *self.conn)
        .await?;

        Ok(names)
    }

    /// Active users holding the named role.
    pub async fn users_with_role(&mut self, role_name: &str) -> Result<Vec<User>> {
        let users = sqlx::query_as(
            r#"
            SELECT DISTINCT u.*
            FROM users u
            JOIN user_roles ur ON ur.user_id = u.user_id
            JOIN roles r ON r.id = ur.role_id
            WHERE r.role_name = $1 AND u.is_active
            ORDER BY u.user_id
            "#,
        )
        .bind(role_name)
        .fetch_all(&mut *self.conn)
        .await?;

        Ok(users)
    }

    /// Insert any standard role not already present by name.
    ///
    /// Returns only the roles created by this call.
    pub async fn seed_standard_roles(&mut self) -> Result<Vec<Role>> {
        let mut created = Vec::new();

        for standard in StandardRole::ALL {
            let role: Option<Role> = sqlx::query_as(
                r#"
                INSERT INTO roles (role_name, description)
                SELECT $1, $2
                WHERE NOT EXISTS (SELECT 1 FROM roles WHERE role_name = $1)
                RETURNING id, role_name, description, date_created
                "#,
            )
            .bind(standard.name())
            .bind(standard.description())
            .fetch_optional(&mut *self.conn)
            .await?;

            if let Some(role) = role {
                created.push(role);
            }
        }

        tracing::info!(created = created.len(), "standard roles seeded");
        Ok(created)
    }
}
