//! Grouped grid library
//!
//! Sorting, one- and two-level grouping and column layout for a Dataverse
//! dataset grid, with option-set metadata resolved through a [`MetadataHost`].

pub mod auth;
pub mod config;
pub mod controller;
pub mod engine;
pub mod error;
pub mod filter;
pub mod footer;
pub mod host;
pub mod intent;
pub mod menu;
pub mod model;
pub mod resources;
pub mod selection;
pub mod service;

pub use config::GridConfig;
pub use controller::DatasetUpdate;
pub use controller::GridController;
pub use controller::UpdateOutcome;
pub use error::Error;
pub use host::DatasetHost;
pub use host::MetadataHost;
pub use intent::GridIntent;
pub use service::GridService;
