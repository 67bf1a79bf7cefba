//! Seams to the hosting platform
//!
//! The grid never talks to storage directly. Everything it needs from the
//! platform goes through two traits:
//!
//! - [`MetadataHost`]: async metadata, record retrieval and form navigation
//! - [`DatasetHost`]: the synchronous outbound dataset contract (selection,
//!   sorting, filtering, paging, full screen)
//!
//! [`StaticHost`] and [`StaticDataset`] implement them over an in-memory
//! [`Snapshot`]; [`WebApiHost`] implements [`MetadataHost`] against the Dataverse Web API.

mod snapshot;
mod web_api;

pub use snapshot::Snapshot;
pub use snapshot::StaticDataset;
pub use snapshot::StaticHost;
pub use web_api::Missing;
pub use web_api::Set;
pub use web_api::WebApiHost;
pub use web_api::WebApiHostBuilder;

use async_trait::async_trait;

use crate::error::Error;
use crate::model::EntityMetadata;
use crate::model::FilterExpression;
use crate::model::Record;
use crate::model::SortStatus;
use crate::model::types::EntityReference;

/// Metadata, retrieval and navigation capabilities of the host.
///
/// Every call is a pass-through; nothing is cached on the grid side.
#[async_trait]
pub trait MetadataHost: Send + Sync {
    /// Fetches entity metadata, restricted to `attributes` when non-empty.
    async fn get_entity_metadata(
        &self,
        entity: &str,
        attributes: &[&str],
    ) -> Result<EntityMetadata, Error>;

    /// Runs an OData query string (starting with `?`) against an entity.
    async fn retrieve_multiple_records(
        &self,
        entity: &str,
        query: &str,
    ) -> Result<Vec<Record>, Error>;

    /// Opens the host's form for a record.
    async fn open_form(&self, entity: &str, id: &str) -> Result<(), Error>;
}

/// Outbound dataset contract: what the grid may ask the host to do.
pub trait DatasetHost {
    fn set_selected_record_ids(&mut self, ids: &[String]);

    fn open_dataset_item(&mut self, reference: &EntityReference);

    /// The dataset's live sort list; mutate then [`refresh`](Self::refresh).
    fn sorting_mut(&mut self) -> &mut Vec<SortStatus>;

    fn set_filter(&mut self, filter: FilterExpression);

    fn clear_filter(&mut self);

    /// Asks the host to re-query with the current sort and filter.
    fn refresh(&mut self);

    fn set_page_size(&mut self, size: usize);

    fn load_next_page(&mut self);

    fn load_exact_page(&mut self, page: u32);

    fn set_full_screen(&mut self, full_screen: bool);
}
