#![forbid(unsafe_code)]
//! supportflow-core library.
//!
//! The authoritative in-memory state for a support workspace: users, tickets
//! (with embedded messages and internal notes), knowledge-base articles, the
//! outbound message log, and notifications. All mutation goes through
//! [`Store`]; reads are plain slices handed to the projection layer.
//!
//! # Conventions
//!
//! - **Errors**: typed [`Error`] for domain failures; `anyhow::Result` at
//!   filesystem boundaries.
//! - **Logging**: use `tracing` macros (`info!`, `warn!`, `error!`, `debug!`).

pub mod auth;
pub mod config;
pub mod error;
pub mod lifecycle;
pub mod model;
pub mod notify;
pub mod persist;
pub mod seed;
pub mod store;

pub use error::{Error, ErrorCode};
pub use store::Store;
