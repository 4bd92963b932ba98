use super::DocumentStore;
use crate::entities::ListingCollection;
use crate::error::{AppError, AppResult};
use crate::models::{EntitlementRecord, GateKind, Listing, ListingQuery, NewListing};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;

/// Puts a deadline on every store call. An elapsed deadline surfaces as
/// `AppError::StoreTimeout`, never as a hang.
pub struct TimeoutStore {
    inner: Arc<dyn DocumentStore>,
    timeout: Duration,
}

impl TimeoutStore {
    pub fn new(inner: Arc<dyn DocumentStore>, timeout: Duration) -> Self {
        Self { inner, timeout }
    }

    async fn guard<T, F>(&self, op: &str, fut: F) -> AppResult<T>
    where
        F: Future<Output = AppResult<T>> + Send,
    {
        match tokio::time::timeout(self.timeout, fut).await {
            Ok(result) => result,
            Err(_) => {
                let ms = self.timeout.as_millis() as u64;
                log::warn!("Store call {op} timed out after {ms} ms");
                Err(AppError::StoreTimeout(ms))
            }
        }
    }
}

#[async_trait]
impl DocumentStore for TimeoutStore {
    async fn insert_listing(&self, new: NewListing) -> AppResult<Listing> {
        self.guard("insert_listing", self.inner.insert_listing(new))
            .await
    }

    async fn get_listing(
        &self,
        collection: ListingCollection,
        id: &str,
    ) -> AppResult<Option<Listing>> {
        self.guard("get_listing", self.inner.get_listing(collection, id))
            .await
    }

    async fn soft_delete_listing(
        &self,
        collection: ListingCollection,
        id: &str,
        deleted_at: DateTime<Utc>,
    ) -> AppResult<bool> {
        self.guard(
            "soft_delete_listing",
            self.inner.soft_delete_listing(collection, id, deleted_at),
        )
        .await
    }

    async fn query_listings(&self, query: &ListingQuery) -> AppResult<Vec<Listing>> {
        self.guard("query_listings", self.inner.query_listings(query))
            .await
    }

    async fn entitlement_exists(&self, gate: GateKind, document_key: &str) -> AppResult<bool> {
        self.guard(
            "entitlement_exists",
            self.inner.entitlement_exists(gate, document_key),
        )
        .await
    }

    async fn upsert_entitlement(&self, record: &EntitlementRecord) -> AppResult<()> {
        self.guard("upsert_entitlement", self.inner.upsert_entitlement(record))
            .await
    }

    async fn create_entitlement_if_absent(&self, record: &EntitlementRecord) -> AppResult<bool> {
        self.guard(
            "create_entitlement_if_absent",
            self.inner.create_entitlement_if_absent(record),
        )
        .await
    }

    fn watch_collection(&self, collection: ListingCollection) -> watch::Receiver<u64> {
        self.inner.watch_collection(collection)
    }
}
