use super::copy_generator::generate_for_listing;
use super::entitlement_gate::EntitlementGate;
use super::lifecycle::{TierDurations, describe};
use crate::config::KeyPolicy;
use crate::entities::{AdTier, ListingCollection};
use crate::error::{AppError, AppResult};
use crate::identity::IdentityResolver;
use crate::models::{
    CopyLanguage, CopyResponse, EligibilityResponse, EntitlementKey, GateKind, Listing,
    ListingContent, ListingQuery, ListingResponse, NewListing,
};
use crate::store::DocumentStore;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use utoipa::ToSchema;

/// Result of a free submission. `Denied` is an expected answer, not an error.
#[derive(Debug, Serialize, ToSchema)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum FreeClaimOutcome {
    Created(ListingResponse),
    Denied {
        gate: GateKind,
        period: Option<String>,
    },
}

#[derive(Clone)]
pub struct ListingService {
    store: Arc<dyn DocumentStore>,
    durations: TierDurations,
    once_gate: EntitlementGate,
    monthly_gate: EntitlementGate,
}

impl ListingService {
    pub fn new(store: Arc<dyn DocumentStore>, durations: TierDurations, policy: KeyPolicy) -> Self {
        Self {
            once_gate: EntitlementGate::new(store.clone(), GateKind::OnceEver, policy),
            monthly_gate: EntitlementGate::new(store.clone(), GateKind::Monthly, policy),
            store,
            durations,
        }
    }

    fn gate(&self, kind: GateKind) -> &EntitlementGate {
        match kind {
            GateKind::OnceEver => &self.once_gate,
            GateKind::Monthly => &self.monthly_gate,
        }
    }

    async fn owner_key(identity: &dyn IdentityResolver) -> AppResult<String> {
        let token = identity.ensure_identity().await?;
        Ok(EntitlementKey::uid(token.as_str()).as_str().to_string())
    }

    pub async fn eligibility(
        &self,
        kind: GateKind,
        identity: &dyn IdentityResolver,
        phone: Option<&str>,
    ) -> AppResult<EligibilityResponse> {
        let now = Utc::now();
        let gate = self.gate(kind);
        let eligible = gate.can_claim_at(identity, phone, now).await?;
        Ok(EligibilityResponse {
            gate: kind,
            period: gate.period_for(now).map(|p| p.to_string()),
            eligible,
        })
    }

    /// Free ad, once per key ever.
    pub async fn submit_free_ad(
        &self,
        identity: &dyn IdentityResolver,
        content: ListingContent,
    ) -> AppResult<FreeClaimOutcome> {
        self.submit_gated(GateKind::OnceEver, ListingCollection::Ads, identity, content, Utc::now())
            .await
    }

    /// Free place submission, once per key per calendar month.
    pub async fn submit_place(
        &self,
        identity: &dyn IdentityResolver,
        content: ListingContent,
    ) -> AppResult<FreeClaimOutcome> {
        self.submit_gated(
            GateKind::Monthly,
            ListingCollection::PlaceSubmissions,
            identity,
            content,
            Utc::now(),
        )
        .await
    }

    /// Check, write, then claim. The claim is a create-if-absent, so when two
    /// submissions race only one listing survives; the loser's listing is
    /// soft-deleted again. A failed write leaves the slot unclaimed.
    pub async fn submit_gated(
        &self,
        kind: GateKind,
        collection: ListingCollection,
        identity: &dyn IdentityResolver,
        content: ListingContent,
        now: DateTime<Utc>,
    ) -> AppResult<FreeClaimOutcome> {
        let content = content.validated(collection).inspect_err(|e| {
            log::warn!("Rejected {collection} submission: {e}");
        })?;
        let gate = self.gate(kind);
        let period = gate.period_for(now).map(|p| p.to_string());
        let phone = Some(content.phone.as_str()).filter(|p| !p.is_empty());

        if !gate.can_claim_at(identity, phone, now).await? {
            return Ok(FreeClaimOutcome::Denied { gate: kind, period });
        }

        let owner_key = Self::owner_key(identity).await?;
        let phone_owned = phone.map(str::to_string);
        let listing = self
            .store
            .insert_listing(NewListing {
                id: None,
                collection,
                owner_key,
                tier: AdTier::Free,
                content,
                transaction_id: None,
                created_at: now,
                expires_at: self.durations.compute_expiry(AdTier::Free, now),
            })
            .await?;

        let claimed = gate
            .claim_if_absent_at(identity, phone_owned.as_deref(), now)
            .await;
        match claimed {
            Ok(true) => {
                log::info!("Free {} listing {} created", collection, listing.id);
                Ok(FreeClaimOutcome::Created(describe(listing, now)))
            }
            Ok(false) => {
                self.retract(collection, &listing.id, now).await;
                Ok(FreeClaimOutcome::Denied { gate: kind, period })
            }
            Err(e) => {
                // the claim may have committed before the call failed; if the
                // slot is now spent, the listing just written is what spent it
                if let Ok(false) = gate
                    .can_claim_at(identity, phone_owned.as_deref(), now)
                    .await
                {
                    log::warn!(
                        "Claim on {} reported {} but was recorded, keeping listing {}",
                        kind,
                        e,
                        listing.id
                    );
                    return Ok(FreeClaimOutcome::Created(describe(listing, now)));
                }
                log::error!("Claim on {} failed after write: {}", kind, e);
                self.retract(collection, &listing.id, now).await;
                Err(e)
            }
        }
    }

    async fn retract(&self, collection: ListingCollection, id: &str, now: DateTime<Utc>) {
        if let Err(e) = self.store.soft_delete_listing(collection, id, now).await {
            log::error!("Failed to retract unclaimed listing {id}: {e}");
        }
    }

    /// Community events are free and not gated.
    pub async fn submit_event(
        &self,
        identity: &dyn IdentityResolver,
        content: ListingContent,
    ) -> AppResult<ListingResponse> {
        let collection = ListingCollection::CityEventAds;
        let content = content.validated(collection).inspect_err(|e| {
            log::warn!("Rejected event submission: {e}");
        })?;
        let owner_key = Self::owner_key(identity).await?;
        let now = Utc::now();
        let listing = self
            .store
            .insert_listing(NewListing {
                id: None,
                collection,
                owner_key,
                tier: AdTier::Free,
                content,
                transaction_id: None,
                created_at: now,
                expires_at: self.durations.compute_expiry(AdTier::Free, now),
            })
            .await?;
        Ok(describe(listing, now))
    }

    pub async fn list_mine(
        &self,
        collection: ListingCollection,
        identity: &dyn IdentityResolver,
    ) -> AppResult<Vec<ListingResponse>> {
        let owner_key = Self::owner_key(identity).await?;
        let rows = self
            .store
            .query_listings(&ListingQuery::owned_by(collection, &owner_key))
            .await?;
        let now = Utc::now();
        Ok(rows.into_iter().map(|l| describe(l, now)).collect())
    }

    pub async fn get_listing(
        &self,
        collection: ListingCollection,
        id: &str,
    ) -> AppResult<Listing> {
        self.store
            .get_listing(collection, id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("listing {id} not found in {collection}")))
    }

    /// Owner-only soft delete. Deleting twice is a no-op.
    pub async fn delete_listing(
        &self,
        collection: ListingCollection,
        id: &str,
        identity: &dyn IdentityResolver,
    ) -> AppResult<()> {
        let owner_key = Self::owner_key(identity).await?;
        let listing = self.get_listing(collection, id).await?;
        if listing.owner_key != owner_key {
            log::warn!("Delete of {id} in {collection} refused: not the owner");
            return Err(AppError::Forbidden);
        }
        if self
            .store
            .soft_delete_listing(collection, id, Utc::now())
            .await?
        {
            log::info!("Listing {id} in {collection} deleted by owner");
        }
        Ok(())
    }

    pub async fn listing_copy(
        &self,
        collection: ListingCollection,
        id: &str,
        lang: CopyLanguage,
    ) -> AppResult<CopyResponse> {
        let listing = self.get_listing(collection, id).await?;
        let text = generate_for_listing(&listing, lang)?;
        Ok(CopyResponse { lang, text })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{BusinessType, EventTemplate};
    use crate::identity::RequestIdentity;
    use crate::models::{EntitlementRecord, ListingState};
    use crate::store::{MemoryStore, TimeoutStore};
    use async_trait::async_trait;
    use chrono::{NaiveDate, TimeZone};
    use tokio::sync::watch;

    fn identity(sub: &str) -> RequestIdentity {
        RequestIdentity::new(Some(sub.to_string()))
    }

    fn ad_content(phone: &str) -> ListingContent {
        ListingContent {
            business_name: "Halal Bites".to_string(),
            business_type: Some(BusinessType::Restaurant),
            phone: phone.to_string(),
            city: "Clifton".to_string(),
            state: "NJ".to_string(),
            ..Default::default()
        }
    }

    fn service(store: Arc<dyn DocumentStore>) -> ListingService {
        ListingService::new(store, TierDurations::default(), KeyPolicy::default())
    }

    /// Memory store whose listing writes always fail.
    struct BrokenWrites {
        inner: MemoryStore,
    }

    #[async_trait]
    impl DocumentStore for BrokenWrites {
        async fn insert_listing(&self, _new: NewListing) -> AppResult<Listing> {
            Err(AppError::StoreError("permission denied".to_string()))
        }
        async fn get_listing(
            &self,
            collection: ListingCollection,
            id: &str,
        ) -> AppResult<Option<Listing>> {
            self.inner.get_listing(collection, id).await
        }
        async fn soft_delete_listing(
            &self,
            collection: ListingCollection,
            id: &str,
            deleted_at: DateTime<Utc>,
        ) -> AppResult<bool> {
            self.inner.soft_delete_listing(collection, id, deleted_at).await
        }
        async fn query_listings(&self, query: &ListingQuery) -> AppResult<Vec<Listing>> {
            self.inner.query_listings(query).await
        }
        async fn entitlement_exists(&self, gate: GateKind, key: &str) -> AppResult<bool> {
            self.inner.entitlement_exists(gate, key).await
        }
        async fn upsert_entitlement(&self, record: &EntitlementRecord) -> AppResult<()> {
            self.inner.upsert_entitlement(record).await
        }
        async fn create_entitlement_if_absent(
            &self,
            record: &EntitlementRecord,
        ) -> AppResult<bool> {
            self.inner.create_entitlement_if_absent(record).await
        }
        fn watch_collection(&self, collection: ListingCollection) -> watch::Receiver<u64> {
            self.inner.watch_collection(collection)
        }
    }

    enum Lookup {
        Pass,
        Fail,
        Stall,
    }

    /// Memory store with faulty entitlement calls. `claim_then_fail` records
    /// the claim and still reports an error, like a commit whose reply is lost.
    struct FaultyEntitlements {
        inner: MemoryStore,
        lookup: Lookup,
        claim_then_fail: bool,
    }

    impl FaultyEntitlements {
        fn new(lookup: Lookup, claim_then_fail: bool) -> Self {
            Self {
                inner: MemoryStore::new(),
                lookup,
                claim_then_fail,
            }
        }
    }

    #[async_trait]
    impl DocumentStore for FaultyEntitlements {
        async fn insert_listing(&self, new: NewListing) -> AppResult<Listing> {
            self.inner.insert_listing(new).await
        }
        async fn get_listing(
            &self,
            collection: ListingCollection,
            id: &str,
        ) -> AppResult<Option<Listing>> {
            self.inner.get_listing(collection, id).await
        }
        async fn soft_delete_listing(
            &self,
            collection: ListingCollection,
            id: &str,
            deleted_at: DateTime<Utc>,
        ) -> AppResult<bool> {
            self.inner.soft_delete_listing(collection, id, deleted_at).await
        }
        async fn query_listings(&self, query: &ListingQuery) -> AppResult<Vec<Listing>> {
            self.inner.query_listings(query).await
        }
        async fn entitlement_exists(&self, gate: GateKind, key: &str) -> AppResult<bool> {
            match self.lookup {
                Lookup::Pass => self.inner.entitlement_exists(gate, key).await,
                Lookup::Fail => Err(AppError::StoreError("unavailable".to_string())),
                Lookup::Stall => {
                    tokio::time::sleep(std::time::Duration::from_secs(5)).await;
                    Ok(false)
                }
            }
        }
        async fn upsert_entitlement(&self, record: &EntitlementRecord) -> AppResult<()> {
            self.inner.upsert_entitlement(record).await
        }
        async fn create_entitlement_if_absent(
            &self,
            record: &EntitlementRecord,
        ) -> AppResult<bool> {
            let won = self.inner.create_entitlement_if_absent(record).await?;
            if self.claim_then_fail {
                return Err(AppError::StoreTimeout(50));
            }
            Ok(won)
        }
        fn watch_collection(&self, collection: ListingCollection) -> watch::Receiver<u64> {
            self.inner.watch_collection(collection)
        }
    }

    #[tokio::test]
    async fn test_free_ad_once_then_denied() {
        let store = Arc::new(MemoryStore::new());
        let svc = service(store.clone());
        let u1 = identity("u1");

        let first = svc.submit_free_ad(&u1, ad_content("")).await.unwrap();
        let created = match first {
            FreeClaimOutcome::Created(view) => view,
            other => panic!("expected created, got {other:?}"),
        };
        assert_eq!(created.listing.tier, AdTier::Free);
        assert_eq!(created.state, ListingState::Active);
        assert!(created.featured);
        assert_eq!(
            created.listing.expires_at - created.listing.created_at,
            chrono::Duration::days(30)
        );

        let second = svc.submit_free_ad(&u1, ad_content("")).await.unwrap();
        assert!(matches!(
            second,
            FreeClaimOutcome::Denied {
                gate: GateKind::OnceEver,
                period: None
            }
        ));
        assert_eq!(store.entitlement_records(GateKind::OnceEver).await.len(), 1);
    }

    #[tokio::test]
    async fn test_phone_key_spans_identities_for_places() {
        let svc = service(Arc::new(MemoryStore::new()));
        let first = svc
            .submit_place(&identity("u1"), ad_content("(201) 555-0147"))
            .await
            .unwrap();
        assert!(matches!(first, FreeClaimOutcome::Created(_)));
        let second = svc
            .submit_place(&identity("u2"), ad_content("201-555-0147"))
            .await
            .unwrap();
        assert!(matches!(second, FreeClaimOutcome::Denied { .. }));
    }

    #[tokio::test]
    async fn test_free_ad_is_once_per_identity_whatever_the_phone() {
        let store = Arc::new(MemoryStore::new());
        let svc = service(store.clone());
        let u1 = identity("u1");

        let first = svc.submit_free_ad(&u1, ad_content("")).await.unwrap();
        assert!(matches!(first, FreeClaimOutcome::Created(_)));
        for phone in ["2015550101", "2015550102", "2015550103"] {
            let again = svc.submit_free_ad(&u1, ad_content(phone)).await.unwrap();
            assert!(matches!(again, FreeClaimOutcome::Denied { .. }));
        }

        let records = store.entitlement_records(GateKind::OnceEver).await;
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].document_key, "uid:u1");
        let live = store
            .query_listings(&ListingQuery::collection(ListingCollection::Ads))
            .await
            .unwrap();
        assert_eq!(live.len(), 1);
    }

    #[tokio::test]
    async fn test_failed_write_does_not_burn_slot() {
        let store = Arc::new(BrokenWrites {
            inner: MemoryStore::new(),
        });
        let svc = service(store.clone());
        let u1 = identity("u1");

        let result = svc.submit_free_ad(&u1, ad_content("")).await;
        assert!(matches!(result, Err(AppError::StoreError(_))));
        assert!(store.inner.entitlement_records(GateKind::OnceEver).await.is_empty());
        assert!(
            svc.eligibility(GateKind::OnceEver, &u1, None)
                .await
                .unwrap()
                .eligible
        );
    }

    #[tokio::test]
    async fn test_concurrent_claims_leave_one_live_listing() {
        let store = Arc::new(MemoryStore::new());
        let svc = service(store.clone());
        let now = Utc.with_ymd_and_hms(2026, 4, 10, 9, 0, 0).unwrap();
        let (a, b) = (identity("u1"), identity("u1"));

        let (ra, rb) = tokio::join!(
            svc.submit_gated(
                GateKind::Monthly,
                ListingCollection::PlaceSubmissions,
                &a,
                ad_content(""),
                now
            ),
            svc.submit_gated(
                GateKind::Monthly,
                ListingCollection::PlaceSubmissions,
                &b,
                ad_content(""),
                now
            ),
        );
        let created = [ra.unwrap(), rb.unwrap()]
            .iter()
            .filter(|o| matches!(o, FreeClaimOutcome::Created(_)))
            .count();
        assert_eq!(created, 1);

        let live = store
            .query_listings(&ListingQuery::collection(ListingCollection::PlaceSubmissions))
            .await
            .unwrap();
        assert_eq!(live.len(), 1);
    }

    #[tokio::test]
    async fn test_monthly_places_reopen_next_month() {
        let svc = service(Arc::new(MemoryStore::new()));
        let u1 = identity("u1");
        let dec = Utc.with_ymd_and_hms(2025, 12, 15, 0, 0, 0).unwrap();
        let jan = Utc.with_ymd_and_hms(2026, 1, 3, 0, 0, 0).unwrap();
        let places = ListingCollection::PlaceSubmissions;

        let r = svc
            .submit_gated(GateKind::Monthly, places, &u1, ad_content(""), dec)
            .await
            .unwrap();
        assert!(matches!(r, FreeClaimOutcome::Created(_)));
        let r = svc
            .submit_gated(GateKind::Monthly, places, &u1, ad_content(""), dec)
            .await
            .unwrap();
        match r {
            FreeClaimOutcome::Denied { period, .. } => assert_eq!(period.as_deref(), Some("2025-12")),
            other => panic!("expected denial, got {other:?}"),
        }
        let r = svc
            .submit_gated(GateKind::Monthly, places, &u1, ad_content(""), jan)
            .await
            .unwrap();
        assert!(matches!(r, FreeClaimOutcome::Created(_)));
    }

    #[tokio::test]
    async fn test_validation_runs_before_the_gate() {
        let store = Arc::new(MemoryStore::new());
        let svc = service(store.clone());
        let mut content = ad_content("");
        content.business_name = "  ".to_string();
        let result = svc.submit_free_ad(&identity("u1"), content).await;
        assert!(matches!(result, Err(AppError::ValidationError(_))));
        assert!(store.entitlement_records(GateKind::OnceEver).await.is_empty());
    }

    #[tokio::test]
    async fn test_missing_identity_is_an_error_not_a_denial() {
        let svc = service(Arc::new(MemoryStore::new()));
        let result = svc
            .submit_free_ad(&RequestIdentity::new(None), ad_content(""))
            .await;
        assert!(matches!(result, Err(AppError::IdentityError(_))));
    }

    #[tokio::test]
    async fn test_owner_delete_and_mine() {
        let svc = service(Arc::new(MemoryStore::new()));
        let (u1, u2) = (identity("u1"), identity("u2"));
        let id = match svc.submit_free_ad(&u1, ad_content("")).await.unwrap() {
            FreeClaimOutcome::Created(view) => view.listing.id,
            other => panic!("expected created, got {other:?}"),
        };

        let denied = svc.delete_listing(ListingCollection::Ads, &id, &u2).await;
        assert!(matches!(denied, Err(AppError::Forbidden)));

        svc.delete_listing(ListingCollection::Ads, &id, &u1)
            .await
            .unwrap();
        svc.delete_listing(ListingCollection::Ads, &id, &u1)
            .await
            .unwrap();

        let mine = svc.list_mine(ListingCollection::Ads, &u1).await.unwrap();
        assert_eq!(mine.len(), 1);
        assert_eq!(mine[0].state, ListingState::Deleted);
        assert!(svc.list_mine(ListingCollection::Ads, &u2).await.unwrap().is_empty());

        let missing = svc.delete_listing(ListingCollection::Ads, "nope", &u1).await;
        assert!(matches!(missing, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_event_submission_and_copy() {
        let svc = service(Arc::new(MemoryStore::new()));
        let u1 = identity("u1");
        let content = ListingContent {
            business_name: "Iftar Night".to_string(),
            address_line: "Islamic Center".to_string(),
            city: "Paterson".to_string(),
            state: "NJ".to_string(),
            event_template: Some(EventTemplate::RamadanIftar),
            event_date: NaiveDate::from_ymd_opt(2026, 3, 1),
            ..Default::default()
        };
        let view = svc.submit_event(&u1, content.clone()).await.unwrap();
        // events are not gated
        svc.submit_event(&u1, content).await.unwrap();

        let copy = svc
            .listing_copy(ListingCollection::CityEventAds, &view.listing.id, CopyLanguage::En)
            .await
            .unwrap();
        assert_eq!(
            copy.text,
            "Community iftar at Islamic Center — Paterson on Mar 1, 2026. Info: to be provided."
        );
    }

    #[tokio::test]
    async fn test_ad_copy_is_stable() {
        let svc = service(Arc::new(MemoryStore::new()));
        let id = match svc
            .submit_free_ad(&identity("u1"), ad_content("2015550147"))
            .await
            .unwrap()
        {
            FreeClaimOutcome::Created(view) => view.listing.id,
            other => panic!("expected created, got {other:?}"),
        };
        let a = svc
            .listing_copy(ListingCollection::Ads, &id, CopyLanguage::En)
            .await
            .unwrap();
        let b = svc
            .listing_copy(ListingCollection::Ads, &id, CopyLanguage::En)
            .await
            .unwrap();
        assert_eq!(a.text, b.text);
        assert_eq!(a.text, "Halal Bites is your halal destination in Clifton, NJ.");
    }

    #[tokio::test]
    async fn test_store_error_fails_closed() {
        let store = Arc::new(FaultyEntitlements::new(Lookup::Fail, false));
        let svc = service(store.clone());
        let u1 = identity("u1");

        let check = svc.eligibility(GateKind::OnceEver, &u1, None).await;
        assert!(matches!(check, Err(AppError::StoreError(_))));
        let result = svc.submit_free_ad(&u1, ad_content("")).await;
        assert!(matches!(result, Err(AppError::StoreError(_))));

        let rows = store
            .inner
            .query_listings(&ListingQuery {
                include_deleted: true,
                ..ListingQuery::collection(ListingCollection::Ads)
            })
            .await
            .unwrap();
        assert!(rows.is_empty());
        assert!(store.inner.entitlement_records(GateKind::OnceEver).await.is_empty());
    }

    #[tokio::test]
    async fn test_stalled_lookup_times_out_closed() {
        let faulty = Arc::new(FaultyEntitlements::new(Lookup::Stall, false));
        let store = Arc::new(TimeoutStore::new(
            faulty.clone(),
            std::time::Duration::from_millis(20),
        ));
        let svc = service(store);
        let u1 = identity("u1");

        let check = svc.eligibility(GateKind::Monthly, &u1, None).await;
        assert!(matches!(check, Err(AppError::StoreTimeout(20))));
        let result = svc.submit_place(&u1, ad_content("")).await;
        assert!(matches!(result, Err(AppError::StoreTimeout(20))));

        let rows = faulty
            .inner
            .query_listings(&ListingQuery {
                include_deleted: true,
                ..ListingQuery::collection(ListingCollection::PlaceSubmissions)
            })
            .await
            .unwrap();
        assert!(rows.is_empty());
    }

    #[tokio::test]
    async fn test_committed_claim_keeps_listing_despite_error() {
        let store = Arc::new(FaultyEntitlements::new(Lookup::Pass, true));
        let svc = service(store.clone());
        let u1 = identity("u1");

        let first = svc.submit_free_ad(&u1, ad_content("")).await.unwrap();
        let id = match first {
            FreeClaimOutcome::Created(view) => view.listing.id,
            other => panic!("expected created, got {other:?}"),
        };
        let kept = store
            .inner
            .get_listing(ListingCollection::Ads, &id)
            .await
            .unwrap()
            .unwrap();
        assert!(kept.deleted_at.is_none());
        assert_eq!(store.inner.entitlement_records(GateKind::OnceEver).await.len(), 1);

        let second = svc.submit_free_ad(&u1, ad_content("")).await.unwrap();
        assert!(matches!(second, FreeClaimOutcome::Denied { .. }));
    }
}
