//! Host-neutral entity metadata

mod attribute;
mod entity;

pub use attribute::*;
pub use entity::*;
