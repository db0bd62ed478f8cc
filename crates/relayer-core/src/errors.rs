//! Error types for the batch relayer

use alloy::primitives::{Address, B256};
use thiserror::Error;

/// Core errors that can occur while building a relayer batch
#[derive(Debug, Error)]
pub enum Error {
    #[error("Lookup failed: {0}")]
    Lookup(#[from] LookupError),

    #[error("Router error: {0}")]
    Router(#[from] RouterError),

    #[error("Invalid request: {message}")]
    InvalidRequest { message: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Pool topology and token lookups against the current pool snapshot.
///
/// All of these abort the operation that triggered them.
#[derive(Debug, Error)]
pub enum LookupError {
    #[error("No pool found with id: {id}")]
    PoolNotFound { id: B256 },

    #[error("No linear pool found for wrapped token: {wrapped_token}")]
    LinearPoolNotFound { wrapped_token: Address },

    #[error("No token found with address: {address}")]
    TokenNotFound { address: Address },

    #[error("Linear pool {pool} declares unknown wrapper protocol '{tag}'")]
    UnknownWrapperProtocol { pool: Address, tag: String },
}

/// Failures reported by the router oracle
#[derive(Debug, Error)]
pub enum RouterError {
    #[error("No route found for any of the requested pairs (first: {token_in} -> {token_out})")]
    NoRoute { token_in: Address, token_out: Address },

    #[error("Router query failed: {message}")]
    QueryFailed { message: String },

    #[error("Router returned malformed data: {message}")]
    Malformed { message: String },
}

/// Result type alias for relayer operations
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Shorthand for an [`Error::InvalidRequest`]
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::InvalidRequest {
            message: message.into(),
        }
    }

    /// Get a stable, machine-friendly error code
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Lookup(e) => e.error_code(),
            Self::Router(e) => e.error_code(),
            Self::InvalidRequest { .. } => "invalid_request",
            Self::Config(_) => "config_error",
            Self::Serialization(_) => "serialization_error",
        }
    }
}

impl LookupError {
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::PoolNotFound { .. } => "pool_not_found",
            Self::LinearPoolNotFound { .. } => "linear_pool_not_found",
            Self::TokenNotFound { .. } => "token_not_found",
            Self::UnknownWrapperProtocol { .. } => "unknown_wrapper_protocol",
        }
    }
}

impl RouterError {
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::NoRoute { .. } => "no_route",
            Self::QueryFailed { .. } => "router_query_failed",
            Self::Malformed { .. } => "router_malformed_response",
        }
    }
}
