//! Persistent storage for the application configuration.

pub mod config;
