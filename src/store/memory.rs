use super::DocumentStore;
use super::notify::CollectionNotifier;
use crate::entities::ListingCollection;
use crate::error::{AppError, AppResult};
use crate::models::{
    EntitlementRecord, GateKind, Listing, ListingOrder, ListingQuery, NewListing,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use tokio::sync::{RwLock, watch};
use uuid::Uuid;

/// In-process store for development and tests. Same contract as the
/// Postgres store, including first-writer-wins on entitlement keys.
pub struct MemoryStore {
    listings: RwLock<HashMap<(ListingCollection, String), Listing>>,
    entitlements: RwLock<HashMap<(GateKind, String), EntitlementRecord>>,
    notifier: CollectionNotifier,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            listings: RwLock::new(HashMap::new()),
            entitlements: RwLock::new(HashMap::new()),
            notifier: CollectionNotifier::new(),
        }
    }

    /// All records of one gate, sorted by document key.
    pub async fn entitlement_records(&self, gate: GateKind) -> Vec<EntitlementRecord> {
        let map = self.entitlements.read().await;
        let mut records: Vec<EntitlementRecord> = map
            .iter()
            .filter(|((g, _), _)| *g == gate)
            .map(|(_, r)| r.clone())
            .collect();
        records.sort_by(|a, b| a.document_key.cmp(&b.document_key));
        records
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn insert_listing(&self, new: NewListing) -> AppResult<Listing> {
        let collection = new.collection;
        let id = new
            .id
            .clone()
            .unwrap_or_else(|| Uuid::new_v4().to_string());
        let mut map = self.listings.write().await;
        let key = (collection, id.clone());
        if map.contains_key(&key) {
            return Err(AppError::Conflict(format!(
                "listing {id} already exists in {collection}"
            )));
        }
        let listing = new.into_listing(id);
        map.insert(key, listing.clone());
        drop(map);

        self.notifier.bump(collection);
        Ok(listing)
    }

    async fn get_listing(
        &self,
        collection: ListingCollection,
        id: &str,
    ) -> AppResult<Option<Listing>> {
        let map = self.listings.read().await;
        Ok(map.get(&(collection, id.to_string())).cloned())
    }

    async fn soft_delete_listing(
        &self,
        collection: ListingCollection,
        id: &str,
        deleted_at: DateTime<Utc>,
    ) -> AppResult<bool> {
        let changed = {
            let mut map = self.listings.write().await;
            match map.get_mut(&(collection, id.to_string())) {
                Some(listing) if listing.deleted_at.is_none() => {
                    listing.deleted_at = Some(deleted_at);
                    true
                }
                _ => false,
            }
        };
        if changed {
            self.notifier.bump(collection);
        }
        Ok(changed)
    }

    async fn query_listings(&self, query: &ListingQuery) -> AppResult<Vec<Listing>> {
        let map = self.listings.read().await;
        let mut rows: Vec<Listing> = map
            .values()
            .filter(|l| query.matches(l))
            .cloned()
            .collect();
        drop(map);

        match query.order {
            ListingOrder::CreatedAtDesc => rows.sort_by(|a, b| {
                b.created_at
                    .cmp(&a.created_at)
                    .then_with(|| a.id.cmp(&b.id))
            }),
            ListingOrder::ExpiresAtAsc => rows.sort_by(|a, b| {
                a.expires_at
                    .cmp(&b.expires_at)
                    .then_with(|| a.id.cmp(&b.id))
            }),
        }
        if let Some(limit) = query.limit {
            rows.truncate(limit as usize);
        }
        Ok(rows)
    }

    async fn entitlement_exists(&self, gate: GateKind, document_key: &str) -> AppResult<bool> {
        let map = self.entitlements.read().await;
        Ok(map.contains_key(&(gate, document_key.to_string())))
    }

    async fn upsert_entitlement(&self, record: &EntitlementRecord) -> AppResult<()> {
        self.create_entitlement_if_absent(record).await.map(|_| ())
    }

    async fn create_entitlement_if_absent(&self, record: &EntitlementRecord) -> AppResult<bool> {
        let mut map = self.entitlements.write().await;
        let key = (record.gate, record.document_key.clone());
        if map.contains_key(&key) {
            return Ok(false);
        }
        map.insert(key, record.clone());
        Ok(true)
    }

    fn watch_collection(&self, collection: ListingCollection) -> watch::Receiver<u64> {
        self.notifier.subscribe(collection)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::AdTier;
    use crate::models::ListingContent;
    use chrono::{Duration, TimeZone};

    fn new_listing(id: Option<&str>, created_at: DateTime<Utc>, tier: AdTier) -> NewListing {
        NewListing {
            id: id.map(str::to_string),
            collection: ListingCollection::Ads,
            owner_key: "uid:u1".to_string(),
            tier,
            content: ListingContent {
                business_name: "Halal Bites".to_string(),
                city: "Clifton".to_string(),
                state: "NJ".to_string(),
                ..Default::default()
            },
            transaction_id: None,
            created_at,
            expires_at: created_at + Duration::days(7),
        }
    }

    fn record(gate: GateKind, key: &str) -> EntitlementRecord {
        EntitlementRecord {
            gate,
            document_key: key.to_string(),
            uid: "u1".to_string(),
            key: key.to_string(),
            month: None,
            used_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_insert_assigns_id_and_rejects_duplicate_explicit_id() {
        let store = MemoryStore::new();
        let t = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
        let a = store.insert_listing(new_listing(None, t, AdTier::Free)).await.unwrap();
        assert!(!a.id.is_empty());

        store
            .insert_listing(new_listing(Some("fixed"), t, AdTier::Prime))
            .await
            .unwrap();
        let dup = store
            .insert_listing(new_listing(Some("fixed"), t, AdTier::Prime))
            .await;
        assert!(matches!(dup, Err(AppError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_query_orders_by_created_at_desc() {
        let store = MemoryStore::new();
        let t = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
        for (i, id) in ["a", "b", "c"].iter().enumerate() {
            store
                .insert_listing(new_listing(Some(id), t + Duration::hours(i as i64), AdTier::Free))
                .await
                .unwrap();
        }
        let rows = store
            .query_listings(&ListingQuery::collection(ListingCollection::Ads))
            .await
            .unwrap();
        let ids: Vec<&str> = rows.iter().map(|l| l.id.as_str()).collect();
        assert_eq!(ids, vec!["c", "b", "a"]);

        let mut q = ListingQuery::collection(ListingCollection::Ads);
        q.limit = Some(1);
        assert_eq!(store.query_listings(&q).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_soft_delete_is_one_shot_and_notifies() {
        let store = MemoryStore::new();
        let mut rx = store.watch_collection(ListingCollection::Ads);
        let t = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
        store
            .insert_listing(new_listing(Some("x"), t, AdTier::Weekly))
            .await
            .unwrap();
        assert!(rx.has_changed().unwrap());
        rx.borrow_and_update();

        assert!(
            store
                .soft_delete_listing(ListingCollection::Ads, "x", t)
                .await
                .unwrap()
        );
        assert!(rx.has_changed().unwrap());
        assert!(
            !store
                .soft_delete_listing(ListingCollection::Ads, "x", t)
                .await
                .unwrap()
        );
        assert!(
            !store
                .soft_delete_listing(ListingCollection::Ads, "missing", t)
                .await
                .unwrap()
        );
    }

    #[tokio::test]
    async fn test_create_if_absent_first_writer_wins() {
        let store = MemoryStore::new();
        let r = record(GateKind::Monthly, "uid:u1|2026-01");
        assert!(store.create_entitlement_if_absent(&r).await.unwrap());
        assert!(!store.create_entitlement_if_absent(&r).await.unwrap());
        store.upsert_entitlement(&r).await.unwrap();
        assert_eq!(store.entitlement_records(GateKind::Monthly).await.len(), 1);
        assert!(store.entitlement_records(GateKind::OnceEver).await.is_empty());
    }
}
