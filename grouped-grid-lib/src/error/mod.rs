//! Error types

mod api;
mod auth;
mod field;
mod grid;
mod metadata;

pub use api::*;
pub use auth::*;
pub use field::*;
pub use grid::*;
pub use metadata::*;

/// Top-level error returned by the grid library.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Web API call failed.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// Token acquisition failed.
    #[error(transparent)]
    Auth(#[from] AuthError),

    /// Requested metadata does not exist.
    #[error(transparent)]
    Metadata(#[from] MetadataError),

    /// Record field access failed.
    #[error(transparent)]
    Field(#[from] FieldError),

    /// Grid state or configuration is invalid.
    #[error(transparent)]
    Grid(#[from] GridError),
}
