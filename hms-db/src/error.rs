//! Error types for hms-db
//!
//! Every repository and session operation returns [`DbError`]. Raw sqlx
//! errors are classified on the way in so callers can match on constraint
//! violations and transient connectivity loss without parsing messages.

use thiserror::Error;

use crate::models::ValidationError;

/// Message the server reports when the connection was dropped under us.
const GONE_AWAY: &str = "server has gone away";

/// Postgres SQLSTATE codes we surface as dedicated variants.
const FOREIGN_KEY_VIOLATION: &str = "23503";
const NOT_NULL_VIOLATION: &str = "23502";
const UNIQUE_VIOLATION: &str = "23505";

/// admin_shutdown, crash_shutdown, cannot_connect_now
const SHUTDOWN_CODES: [&str; 3] = ["57P01", "57P02", "57P03"];
/// SQLSTATE class 08: connection_exception
const CONNECTION_EXCEPTION_CLASS: &str = "08";

pub type Result<T> = std::result::Result<T, DbError>;

#[derive(Error, Debug)]
pub enum DbError {
    #[error("database error: {0}")]
    Sqlx(sqlx::Error),

    #[error("not found: {resource} '{id}'")]
    NotFound { resource: &'static str, id: String },

    #[error("validation failed: {0}")]
    Validation(#[from] ValidationError),

    /// Recoverable connectivity loss; the unit of work may be retried.
    #[error("transient connectivity error: {0}")]
    Transient(String),

    #[error("foreign key violation: {0}")]
    ForeignKeyViolation(String),

    #[error("required column missing: {0}")]
    NotNullViolation(String),

    #[error("unique constraint violated: {0}")]
    UniqueViolation(String),
}

impl DbError {
    /// Create a not-found error for an integer-keyed resource.
    pub fn not_found(resource: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            resource,
            id: id.to_string(),
        }
    }

    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Transient(_))
    }

    /// True for any referential or column constraint raised by the store.
    pub fn is_constraint_violation(&self) -> bool {
        matches!(
            self,
            Self::ForeignKeyViolation(_) | Self::NotNullViolation(_) | Self::UniqueViolation(_)
        )
    }
}

impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        if is_gone_away(&err) {
            return Self::Transient(err.to_string());
        }

        if let sqlx::Error::Database(db) = &err {
            let message = db.message().to_owned();
            match db.code().as_deref() {
                Some(FOREIGN_KEY_VIOLATION) => return Self::ForeignKeyViolation(message),
                Some(NOT_NULL_VIOLATION) => return Self::NotNullViolation(message),
                Some(UNIQUE_VIOLATION) => return Self::UniqueViolation(message),
                Some(code) if is_connection_lost_code(code) => {
                    return Self::Transient(format!("{message} (SQLSTATE {code})"))
                }
                _ => {}
            }
        }

        Self::Sqlx(err)
    }
}

/// Whether an error means the server dropped the connection.
pub fn is_gone_away(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Io(io) => matches!(
            io.kind(),
            std::io::ErrorKind::ConnectionReset
                | std::io::ErrorKind::ConnectionAborted
                | std::io::ErrorKind::BrokenPipe
                | std::io::ErrorKind::UnexpectedEof
        ),
        other => mentions_gone_away(&other.to_string()),
    }
}

/// Postgres codes sent when the server ends or cannot keep the session.
fn is_connection_lost_code(code: &str) -> bool {
    SHUTDOWN_CODES.contains(&code) || code.starts_with(CONNECTION_EXCEPTION_CLASS)
}

fn mentions_gone_away(message: &str) -> bool {
    message.to_ascii_lowercase().contains(GONE_AWAY)
}
