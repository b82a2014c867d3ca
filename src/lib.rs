pub mod app;
pub mod appointments;
pub mod auth;
pub mod config;
pub mod enrichment;
pub mod error;
pub mod memory;
pub mod state;
pub mod validation;
