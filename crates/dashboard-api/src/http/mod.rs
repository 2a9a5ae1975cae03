//! HTTP endpoints.

pub mod handlers;
pub mod monitoring;
pub mod routes;
