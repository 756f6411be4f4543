//! # retail-api
//!
//! HTTP facade over the retail stores, for deployments where the
//! storage tier runs as its own service and clients talk to it
//! remotely. Handlers stay thin: extract, delegate to the store, map
//! the outcome to a status code.

pub mod app_context;
pub mod handlers;
pub mod models;
pub mod routes;

pub use app_context::AppContext;
pub use routes::configure_routes;
