//! Configuration management for database and application settings.

/// Database configuration and connection management
pub mod database;
