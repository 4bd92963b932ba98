use crate::entities::ListingCollection;
use tokio::sync::watch;

/// One version counter per listing collection. Subscribers only learn that
/// something changed; they always re-read the full result set.
pub struct CollectionNotifier {
    places_tx: watch::Sender<u64>,
    ads_tx: watch::Sender<u64>,
    events_tx: watch::Sender<u64>,
}

impl Default for CollectionNotifier {
    fn default() -> Self {
        Self::new()
    }
}

impl CollectionNotifier {
    pub fn new() -> Self {
        Self {
            places_tx: watch::channel(0).0,
            ads_tx: watch::channel(0).0,
            events_tx: watch::channel(0).0,
        }
    }

    fn sender(&self, collection: ListingCollection) -> &watch::Sender<u64> {
        match collection {
            ListingCollection::PlaceSubmissions => &self.places_tx,
            ListingCollection::Ads => &self.ads_tx,
            ListingCollection::CityEventAds => &self.events_tx,
        }
    }

    pub fn bump(&self, collection: ListingCollection) {
        self.sender(collection).send_modify(|v| *v = v.wrapping_add(1));
    }

    pub fn bump_all(&self) {
        for tx in [&self.places_tx, &self.ads_tx, &self.events_tx] {
            tx.send_modify(|v| *v = v.wrapping_add(1));
        }
    }

    pub fn subscribe(&self, collection: ListingCollection) -> watch::Receiver<u64> {
        self.sender(collection).subscribe()
    }
}
