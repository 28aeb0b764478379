//! `finback-core`: shared building blocks for the back-office crates.
//!
//! Identifiers, the domain error model, and the `Entity` trait. No IO here.

pub mod entity;
pub mod error;
pub mod id;

pub use entity::Entity;
pub use error::{DomainError, DomainResult};
pub use id::{ForecastId, TenantId};
