//! # files-entity
//!
//! Domain entity models for Files Manager. Every struct in this crate
//! represents a database table row or a domain value object. Database
//! entities derive `sqlx::FromRow`.

pub mod file;
pub mod job;
pub mod user;
