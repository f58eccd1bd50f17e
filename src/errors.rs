//! Unified error types and result handling.

use thiserror::Error;

/// Crate-wide error type covering configuration, validation, lookups,
/// and database failures.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Configuration error: {message}")]
    Config {
        /// Description of what was wrong
        message: String,
    },

    #[error("Invalid transaction amount: {amount}")]
    InvalidAmount {
        /// The rejected amount
        amount: f64,
    },

    #[error("Unknown status: {status}")]
    InvalidStatus {
        /// The unrecognized status string
        status: String,
    },

    #[error("Contact not found: {id}")]
    ContactNotFound {
        /// The missing contact's ID
        id: i64,
    },

    #[error("Campaign not found: {id}")]
    CampaignNotFound {
        /// The missing campaign's ID
        id: i64,
    },

    #[error("Pledge not found: {id}")]
    PledgeNotFound {
        /// The missing pledge's ID
        id: i64,
    },

    #[error("Transaction not found: {id}")]
    TransactionNotFound {
        /// The missing transaction's ID
        id: i64,
    },

    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),
}

/// Convenience `Result` type used throughout the crate
pub type Result<T> = std::result::Result<T, Error>;
