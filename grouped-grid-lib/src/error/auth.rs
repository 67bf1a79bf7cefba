//! Authentication error types

/// Errors raised by a [`TokenProvider`](crate::auth::TokenProvider).
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// No token is configured for the environment.
    #[error("No access token available for {resource}")]
    MissingToken { resource: String },

    /// Access token expired and could not be renewed.
    #[error("Token expired: {message}")]
    TokenExpired { message: String },

    /// Network error during authentication.
    #[error("Network error during auth: {0}")]
    Network(#[from] reqwest::Error),
}
