//! Typed models

mod column;
mod condition;
mod dataset;
mod group;
pub mod metadata;
mod record;
mod record_serde;
pub mod types;
mod value;

pub use column::*;
pub use condition::*;
pub use dataset::*;
pub use group::*;
pub use metadata::EntityMetadata;
pub use record::*;
pub use value::*;
