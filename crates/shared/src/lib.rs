//! Shared types, errors, and configuration for Assessoria.
//!
//! This crate provides common types used across all other crates:
//! - Money helpers with decimal precision
//! - Typed IDs for advisors and clients
//! - `YearMonth` for the `YYYY-MM` reference months used by every table
//! - Pagination types for list endpoints
//! - Application-wide error types
//! - Configuration management
//! - JWT claims issued by the identity provider

pub mod auth;
pub mod config;
pub mod error;
pub mod jwt;
pub mod types;

pub use auth::Claims;
pub use config::{AppConfig, RunMode};
pub use error::{AppError, AppResult};
pub use jwt::{JwtConfig, JwtError, JwtService};
pub use types::{AdvisorId, ClientId, YearMonth};
