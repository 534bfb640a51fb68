//! Storefront Kernel Library
//!
//! Category facets and similar-product lookups over the storefront schema.
//! The main entry point for running the HTTP server is the `storefront` binary.

pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod routes;
pub mod schema;
pub mod search;
pub mod state;
pub mod storefront;

pub use config::Config;
pub use state::AppState;
