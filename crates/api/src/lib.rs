//! Holocron API server library.
//!
//! Exposes the building blocks (config, state, error boundary, directories,
//! routes) so integration tests and the binaries can share them.

pub mod app;
pub mod config;
pub mod directory;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod routes;
pub mod state;
