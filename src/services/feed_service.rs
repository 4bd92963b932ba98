use super::lifecycle::describe;
use super::ranking::order_listings;
use crate::entities::ListingCollection;
use crate::error::AppResult;
use crate::models::{FeedResponse, Listing, ListingQuery};
use crate::store::DocumentStore;
use crate::subscription::ListingSubscription;
use chrono::Utc;
use sea_orm::Iterable;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, watch};

type Snapshot = Option<Arc<Vec<Listing>>>;

/// Ranked public feeds. One live subscription per collection keeps the latest
/// snapshot; every read re-ranks it against the current clock so expiry is
/// never stale.
#[derive(Clone)]
pub struct FeedService {
    store: Arc<dyn DocumentStore>,
    snapshots: Arc<HashMap<ListingCollection, watch::Sender<Snapshot>>>,
    subscriptions: Arc<Mutex<Vec<ListingSubscription>>>,
}

impl FeedService {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        let snapshots = ListingCollection::iter()
            .map(|c| (c, watch::channel(None).0))
            .collect();
        Self {
            store,
            snapshots: Arc::new(snapshots),
            subscriptions: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub async fn start(&self) {
        let mut subs = self.subscriptions.lock().await;
        subs.clear();
        for (collection, tx) in self.snapshots.iter() {
            let tx = tx.clone();
            let mut sub = ListingSubscription::live_feed(self.store.clone(), *collection);
            sub.start(move |rows| {
                tx.send_replace(Some(Arc::new(rows)));
            });
            subs.push(sub);
        }
        log::info!("Feed subscriptions started for {} collections", subs.len());
    }

    pub async fn stop(&self) {
        let mut subs = self.subscriptions.lock().await;
        for sub in subs.iter_mut() {
            sub.stop();
        }
        subs.clear();
    }

    fn snapshot(&self, collection: ListingCollection) -> Snapshot {
        self.snapshots
            .get(&collection)
            .and_then(|tx| tx.borrow().clone())
    }

    /// Ranked active listings. Falls back to a direct query until the first
    /// snapshot for the collection has arrived.
    pub async fn feed(&self, collection: ListingCollection) -> AppResult<FeedResponse> {
        let rows = match self.snapshot(collection) {
            Some(rows) => rows,
            None => {
                let now = Utc::now();
                Arc::new(
                    self.store
                        .query_listings(&ListingQuery::live_feed(collection, now))
                        .await?,
                )
            }
        };
        let now = Utc::now();
        let listings = order_listings(&rows, now)
            .into_iter()
            .map(|l| describe(l, now))
            .collect();
        Ok(FeedResponse {
            collection,
            generated_at: now,
            listings,
        })
    }
}
