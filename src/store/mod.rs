//! Document store seam. Every engine component reads and writes through
//! [`DocumentStore`]; the concrete store is chosen at startup.

pub mod memory;
pub mod notify;
pub mod postgres;
pub mod timeout;

pub use memory::MemoryStore;
pub use postgres::PostgresStore;
pub use timeout::TimeoutStore;

use crate::entities::ListingCollection;
use crate::error::AppResult;
use crate::models::{EntitlementRecord, GateKind, Listing, ListingQuery, NewListing};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::watch;

#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Writes a new listing. The store assigns the id unless `new.id` is set;
    /// an explicit id that already exists fails with `AppError::Conflict`.
    async fn insert_listing(&self, new: NewListing) -> AppResult<Listing>;

    async fn get_listing(
        &self,
        collection: ListingCollection,
        id: &str,
    ) -> AppResult<Option<Listing>>;

    /// Sets `deleted_at` if the listing is live. Returns false when the
    /// listing is missing or already deleted.
    async fn soft_delete_listing(
        &self,
        collection: ListingCollection,
        id: &str,
        deleted_at: DateTime<Utc>,
    ) -> AppResult<bool>;

    async fn query_listings(&self, query: &ListingQuery) -> AppResult<Vec<Listing>>;

    async fn entitlement_exists(&self, gate: GateKind, document_key: &str) -> AppResult<bool>;

    /// Idempotent write keyed by `(gate, document_key)`. An existing record is
    /// left untouched.
    async fn upsert_entitlement(&self, record: &EntitlementRecord) -> AppResult<()>;

    /// Atomic create-if-absent. Returns true only for the writer that created
    /// the record.
    async fn create_entitlement_if_absent(&self, record: &EntitlementRecord) -> AppResult<bool>;

    /// Change notifications for one collection: the value is a version counter
    /// that moves whenever the collection may have changed.
    fn watch_collection(&self, collection: ListingCollection) -> watch::Receiver<u64>;
}
