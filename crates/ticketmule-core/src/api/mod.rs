//! REST API client module for the TicketMule server.
//!
//! This module provides the `ApiClient` for signing in and out and for
//! reading the time-type lookup table. The server keeps the session in a
//! cookie, so every clone of the client shares one cookie store.

pub mod client;
pub mod error;

pub use client::{ApiClient, ApiConfig};
pub use error::ApiError;
