//! Database layer - pool, sessions and repositories
//!
//! # Design Principles
//!
//! - One pool per process, passed explicitly - no globals
//! - One session (pooled connection) per unit of work, released by guard
//! - Repositories borrow a `&mut PgConnection`, so they run the same way on
//!   a plain session or inside a transaction
//! - Relations are foreign-key ids plus join queries - no object graph
//! - Rely on DB constraints for referential integrity - no check-then-insert

pub mod pool;
pub mod repos;
pub mod session;

pub use pool::{connect, create_pool, ping};
pub use repos::*;
pub use session::{ConnectionSource, Session, SessionProvider};
