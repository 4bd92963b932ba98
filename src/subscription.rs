//! Push-style listing subscriptions over the store's change notifications.
//! Every delivery is the complete current result set; consumers replace
//! their snapshot, they never merge.

use crate::entities::ListingCollection;
use crate::models::{Listing, ListingQuery};
use crate::services::ranking::order_listings;
use crate::store::DocumentStore;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tokio::task::JoinHandle;

type QueryFactory = Arc<dyn Fn(DateTime<Utc>) -> ListingQuery + Send + Sync>;

pub struct ListingSubscription {
    store: Arc<dyn DocumentStore>,
    collection: ListingCollection,
    query: QueryFactory,
    task: Option<JoinHandle<()>>,
}

impl ListingSubscription {
    /// `query` is rebuilt against the clock on every load.
    pub fn new<Q>(store: Arc<dyn DocumentStore>, collection: ListingCollection, query: Q) -> Self
    where
        Q: Fn(DateTime<Utc>) -> ListingQuery + Send + Sync + 'static,
    {
        Self {
            store,
            collection,
            query: Arc::new(query),
            task: None,
        }
    }

    pub fn live_feed(store: Arc<dyn DocumentStore>, collection: ListingCollection) -> Self {
        Self::new(store, collection, move |now| {
            ListingQuery::live_feed(collection, now)
        })
    }

    pub fn collection(&self) -> ListingCollection {
        self.collection
    }

    pub fn is_running(&self) -> bool {
        self.task.as_ref().is_some_and(|t| !t.is_finished())
    }

    /// Delivers the ranked result set now and again after every change.
    /// Restarting replaces the previous task.
    pub fn start<F>(&mut self, on_snapshot: F)
    where
        F: Fn(Vec<Listing>) + Send + Sync + 'static,
    {
        self.stop();

        // subscribe before the first load so no change slips between them
        let mut changes = self.store.watch_collection(self.collection);
        let store = self.store.clone();
        let query = self.query.clone();
        let collection = self.collection;

        self.task = Some(tokio::spawn(async move {
            loop {
                changes.borrow_and_update();
                let now = Utc::now();
                match store.query_listings(&query(now)).await {
                    Ok(rows) => on_snapshot(order_listings(&rows, now)),
                    Err(e) => log::error!("Subscription load for {collection} failed: {e}"),
                }
                if changes.changed().await.is_err() {
                    log::debug!("Change feed for {collection} closed");
                    break;
                }
            }
        }));
    }

    /// Detaches from the store. No callback runs after this returns control
    /// to the runtime.
    pub fn stop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

impl Drop for ListingSubscription {
    fn drop(&mut self) {
        self.stop();
    }
}
