use super::lifecycle::{TierDurations, describe};
use crate::entities::{AdTier, ListingCollection};
use crate::error::{AppError, AppResult};
use crate::identity::IdentityResolver;
use crate::models::{EntitlementKey, ListingResponse, NewListing, PurchaseListingRequest};
use crate::store::DocumentStore;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

/// Turns a completed in-app purchase into a paid listing. Payment itself is
/// verified elsewhere; this only maps product -> tier and writes once per
/// transaction.
#[derive(Clone)]
pub struct PurchaseService {
    store: Arc<dyn DocumentStore>,
    durations: TierDurations,
    products: Arc<HashMap<String, AdTier>>,
}

impl PurchaseService {
    pub fn new(
        store: Arc<dyn DocumentStore>,
        durations: TierDurations,
        products: HashMap<String, AdTier>,
    ) -> Self {
        Self {
            store,
            durations,
            products: Arc::new(products),
        }
    }

    pub fn tier_for_product(&self, product_id: &str) -> AppResult<AdTier> {
        self.products
            .get(product_id)
            .copied()
            .ok_or_else(|| AppError::ValidationError(format!("unknown product {product_id}")))
    }

    /// Listing ids for purchases are derived from the transaction id, so a
    /// redelivered completion lands on the same row.
    pub fn listing_id_for(transaction_id: &str) -> String {
        Uuid::new_v5(&Uuid::NAMESPACE_OID, transaction_id.as_bytes()).to_string()
    }

    pub async fn complete_purchase(
        &self,
        identity: &dyn IdentityResolver,
        req: PurchaseListingRequest,
    ) -> AppResult<ListingResponse> {
        self.complete_purchase_at(identity, req, Utc::now()).await
    }

    pub async fn complete_purchase_at(
        &self,
        identity: &dyn IdentityResolver,
        req: PurchaseListingRequest,
        now: DateTime<Utc>,
    ) -> AppResult<ListingResponse> {
        let transaction_id = req.transaction_id.trim().to_string();
        if transaction_id.is_empty() {
            return Err(AppError::ValidationError(
                "transaction_id is required".to_string(),
            ));
        }
        let tier = self.tier_for_product(req.product_id.trim())?;
        let collection = ListingCollection::Ads;
        let content = req.content.validated(collection)?;

        let token = identity.ensure_identity().await?;
        let owner_key = EntitlementKey::uid(token.as_str()).as_str().to_string();
        let id = Self::listing_id_for(&transaction_id);

        let inserted = self
            .store
            .insert_listing(NewListing {
                id: Some(id.clone()),
                collection,
                owner_key: owner_key.clone(),
                tier,
                content,
                transaction_id: Some(transaction_id.clone()),
                created_at: now,
                expires_at: self.durations.compute_expiry(tier, now),
            })
            .await;

        match inserted {
            Ok(listing) => {
                log::info!(
                    "Paid {} listing {} created for transaction {}",
                    tier,
                    listing.id,
                    transaction_id
                );
                Ok(describe(listing, now))
            }
            Err(AppError::Conflict(_)) => {
                let existing = self
                    .store
                    .get_listing(collection, &id)
                    .await?
                    .ok_or_else(|| {
                        AppError::InternalError(format!("listing {id} vanished after conflict"))
                    })?;
                if existing.owner_key != owner_key {
                    return Err(AppError::Conflict(format!(
                        "transaction {transaction_id} already used"
                    )));
                }
                log::info!("Replayed purchase {transaction_id}, returning listing {id}");
                Ok(describe(existing, now))
            }
            Err(e) => Err(e),
        }
    }
}
