//! Grid state and the update cycle
//!
//! [`GridStore`] holds everything one grid renders from, [`DatasetController`]
//! talks back to the host's dataset, and [`GridController`] ties both to the
//! engines.

mod dataset;
mod grid;
mod store;

pub use dataset::DatasetController;
pub use grid::GridController;
pub use grid::UpdateOutcome;
pub use store::DatasetUpdate;
pub use store::Generation;
pub use store::GridSnapshotView;
pub use store::GridStore;
