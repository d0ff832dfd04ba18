//! Department repository and `user_departments` links

use sqlx::PgConnection;

use crate::error::DbError;
use crate::models::department::validate_name;
use crate::models::{Department, NewDepartment, User, UserDepartment};
use crate::Result;

pub struct DepartmentRepo<'a> {
    conn: &'a mut PgConnection,
}

impl<'a> DepartmentRepo<'a> {
    pub fn new(conn: &'a mut PgConnection) -> Self {
        Self { conn }
    }

    pub async fn create(&mut self, new: &NewDepartment) -> Result<Department> {
        new.validate()?;

        let department = sqlx::query_as(
            r#"
            INSERT INTO departments (department_name, date_created)
            VALUES ($1, COALESCE($2, now()::timestamp))
            RETURNING department_id, department_name, date_created
            "#,
        )
        .bind(&new.department_name)
        .bind(new.date_created)
        .fetch_one(&mut *self.conn)
        .await?;

        Ok(department)
    }

    pub async fn get(&mut self, department_id: i32) -> Result<Department> {
        sqlx::query_as(
            r#"
            SELECT department_id, department_name, date_created
            FROM departments
            WHERE department_id = $1
            "#,
        )
        .bind(department_id)
        .fetch_optional(&mut *self.conn)
        .await?
        .ok_or_else(|| DbError::not_found("department", department_id))
    }

    pub async fn list(&mut self) -> Result<Vec<Department>> {
        let departments = sqlx::query_as(
            r#"
            SELECT department_id, department_name, date_created
            FROM departments
            ORDER BY department_name
            "#,
        )
        .fetch_all(&mut *self.conn)
        .await?;

        Ok(departments)
    }

    pub async fn rename(&mut self, department_id: i32, name: &str) -> Result<Department> {
        validate_name(name)?;

        sqlx::query_as(
            r#"
            UPDATE departments
            SET department_name = $2
            WHERE department_id = $1
            RETURNING department_id, department_name, date_created
            "#,
        )
        .bind(department_id)
        .bind(name)
        .fetch_optional(&mut *self.conn)
        .await?
        .ok_or_else(|| DbError::not_found("department", department_id))
    }

    /// Link a user to a department.
    ///
    /// A missing user or department surfaces as
    /// [`DbError::ForeignKeyViolation`].
    pub async fn assign(&mut self, user_id: i32, department_id: i32) -> Result<UserDepartment> {
        let link = sqlx::query_as(
            r#"
            INSERT INTO user_departments (user_id, department_id)
            VALUES ($1, $2)
            RETURNING id, user_id, department_id, date_modified
            "#,
        )
        .bind(user_id)
        .bind(department_id)
        .fetch_one(&mut *self.conn)
        .await?;

        Ok(link)
    }

    /// Move an existing link to another department; `date_modified` is bumped.
    pub async fn reassign(&mut self, link_id: i32, department_id: i32) -> Result<UserDepartment> {
        sqlx::query_as(
            r#"
            UPDATE user_departments
            SET department_id = $2
            WHERE id = $1
            RETURNING id, user_id, department_id, date_modified
            "#,
        )
        .bind(link_id)
        .bind(department_id)
        .fetch_optional(&mut *self.conn)
        .await?
        .ok_or_else(|| DbError::not_found("user department", link_id))
    }

    pub async fn departments_for_user(&mut self, user_id: i32) -> Result<Vec<Department>> {
        let departments = sqlx::query_as(
            r#"
            SELECT DISTINCT d.department_id, d.department_name, d.date_created
            FROM user_departments ud
            JOIN departments d ON d.department_id = ud.department_id
            WHERE ud.user_id = $1
            ORDER BY d.department_name
            "#,
        )
        .bind(user_id)
        .fetch_all(&mut *self.conn)
        .await?;

        Ok(departments)
    }

    pub async fn department_names_for_username(&mut self, username: &str) -> Result<Vec<String>> {
        let names = sqlx::query_scalar(
            r#"
            SELECT DISTINCT d.department_name
            FROM users u
            JOIN user_departments ud ON ud.user_id = u.user_id
            JOIN departments d ON d.department_id = ud.department_id
            WHERE u.username = $1
            ORDER BY d.department_name
            "#,
        )
        .bind(username)
        .fetch_all(&mut *self.conn)
        .await?;

        Ok(names)
    }

    /// Users linked to a department, active or not.
    pub async fn members(&mut self, department_id: i32) -> Result<Vec<User>> {
        let users = sqlx::query_as(
            r#"
            SELECT DISTINCT u.*
            FROM user_departments ud
            JOIN users u ON u.user_id = ud.user_id
            WHERE ud.department_id = $1
            ORDER BY u.user_id
            "#,
        )
        .bind(department_id)
        .fetch_all(&mut *self.conn)
        .await?;

        Ok(users)
    }
}
