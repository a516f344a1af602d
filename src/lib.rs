pub mod api;
pub mod cli;
pub mod config;
pub mod error;
pub mod models;
pub mod partition;
pub mod points;
pub mod services;
pub mod session;
pub mod validation;
