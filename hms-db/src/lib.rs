//! hms-db: persistence layer for the hospital management system
//!
//! Declares the relational schema (users, roles, departments, patients,
//! appointments, vitals, prescriptions, tests, drugs, wards, admissions,
//! billing and transactions), typed records for each table, per-entity
//! repositories, and an async session provider over a Postgres pool.

pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod schema;

pub use config::{load_dotenv, ConfigError, DbConfig};
pub use db::{create_pool, ConnectionSource, Session, SessionProvider};
pub use error::{DbError, Result};
pub use sqlx::PgPool;
