//! Read-only GitHub repository statistics service
//!
//! - REST API endpoints in `endpoints/`
//! - PostgreSQL schema, models and queries in `db/`
//! - Requires DATABASE_URL env var (see `config`)

pub mod app;
pub mod config;
pub mod db;
pub mod endpoints;
