//! HTTP API: server wiring, session handling, route handlers and views.

pub mod app;
pub mod authz;
pub mod config;
pub mod context;
pub mod middleware;
pub mod views;
