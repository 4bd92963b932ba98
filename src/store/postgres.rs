use super::DocumentStore;
use super::notify::CollectionNotifier;
use crate::entities::{ListingCollection, entitlement_record_entity as er, listing_entity as le};
use crate::error::{AppError, AppResult};
use crate::models::{
    EntitlementRecord, GateKind, Listing, ListingOrder, ListingQuery, NewListing,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::sea_query::{Expr, OnConflict};
use sea_orm::{
    ColumnTrait, ConnectionTrait, DatabaseBackend, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, QuerySelect, QueryTrait, Set,
};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use uuid::Uuid;

/// Postgres-backed store. Local writes bump the collection's version right
/// away; writes made by other instances show up on the next poll tick.
pub struct PostgresStore {
    pool: DatabaseConnection,
    notifier: CollectionNotifier,
}

impl PostgresStore {
    pub fn new(pool: DatabaseConnection) -> Self {
        Self {
            pool,
            notifier: CollectionNotifier::new(),
        }
    }

    /// Bumps every collection on a fixed interval. The task ends once the
    /// store is dropped.
    pub fn spawn_poller(self: &Arc<Self>, interval: Duration) -> JoinHandle<()> {
        let weak = Arc::downgrade(self);
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            // first tick fires immediately
            ticker.tick().await;
            loop {
                ticker.tick().await;
                match weak.upgrade() {
                    Some(store) => store.notifier.bump_all(),
                    None => break,
                }
            }
        })
    }
}

fn to_active_model(id: &str, new: &NewListing) -> le::ActiveModel {
    let c = &new.content;
    le::ActiveModel {
        id: Set(id.to_string()),
        collection: Set(new.collection),
        owner_key: Set(new.owner_key.clone()),
        tier: Set(new.tier),
        business_name: Set(c.business_name.clone()),
        business_type: Set(c.business_type),
        copy_style: Set(c.copy_style),
        phone: Set(c.phone.clone()),
        address_line: Set(c.address_line.clone()),
        city: Set(c.city.clone()),
        state: Set(c.state.clone()),
        description: Set(c.description.clone()),
        event_template: Set(c.event_template),
        event_date: Set(c.event_date),
        transaction_id: Set(new.transaction_id.clone()),
        created_at: Set(new.created_at),
        expires_at: Set(new.expires_at),
        deleted_at: Set(None),
    }
}

#[async_trait]
impl DocumentStore for PostgresStore {
    async fn insert_listing(&self, new: NewListing) -> AppResult<Listing> {
        let collection = new.collection;
        let id = new
            .id
            .clone()
            .unwrap_or_else(|| Uuid::new_v4().to_string());

        // ON CONFLICT DO NOTHING so a replayed explicit id is reported, not raised
        let stmt = le::Entity::insert(to_active_model(&id, &new))
            .on_conflict(OnConflict::column(le::Column::Id).do_nothing().to_owned())
            .build(DatabaseBackend::Postgres);
        let res = self.pool.execute(stmt).await?;
        if res.rows_affected() == 0 {
            return Err(AppError::Conflict(format!(
                "listing {id} already exists in {collection}"
            )));
        }

        self.notifier.bump(collection);
        Ok(new.into_listing(id))
    }

    async fn get_listing(
        &self,
        collection: ListingCollection,
        id: &str,
    ) -> AppResult<Option<Listing>> {
        let row = le::Entity::find_by_id(id.to_string())
            .filter(le::Column::Collection.eq(collection.as_str()))
            .one(&self.pool)
            .await?;
        Ok(row.map(Listing::from))
    }

    async fn soft_delete_listing(
        &self,
        collection: ListingCollection,
        id: &str,
        deleted_at: DateTime<Utc>,
    ) -> AppResult<bool> {
        let res = le::Entity::update_many()
            .col_expr(le::Column::DeletedAt, Expr::value(deleted_at))
            .filter(le::Column::Id.eq(id))
            .filter(le::Column::Collection.eq(collection.as_str()))
            .filter(le::Column::DeletedAt.is_null())
            .exec(&self.pool)
            .await?;

        let changed = res.rows_affected > 0;
        if changed {
            self.notifier.bump(collection);
        }
        Ok(changed)
    }

    async fn query_listings(&self, query: &ListingQuery) -> AppResult<Vec<Listing>> {
        let mut select =
            le::Entity::find().filter(le::Column::Collection.eq(query.collection.as_str()));
        if let Some(owner) = &query.owner_key {
            select = select.filter(le::Column::OwnerKey.eq(owner.as_str()));
        }
        if let Some(tier) = query.tier {
            select = select.filter(le::Column::Tier.eq(tier.as_str()));
        }
        if let Some(after) = query.expires_after {
            select = select.filter(le::Column::ExpiresAt.gt(after));
        }
        if !query.include_deleted {
            select = select.filter(le::Column::DeletedAt.is_null());
        }
        select = match query.order {
            ListingOrder::CreatedAtDesc => select
                .order_by_desc(le::Column::CreatedAt)
                .order_by_asc(le::Column::Id),
            ListingOrder::ExpiresAtAsc => select
                .order_by_asc(le::Column::ExpiresAt)
                .order_by_asc(le::Column::Id),
        };
        if let Some(limit) = query.limit {
            select = select.limit(limit);
        }

        let rows = select.all(&self.pool).await?;
        Ok(rows.into_iter().map(Listing::from).collect())
    }

    async fn entitlement_exists(&self, gate: GateKind, document_key: &str) -> AppResult<bool> {
        let row = er::Entity::find_by_id((gate.collection().to_string(), document_key.to_string()))
            .one(&self.pool)
            .await?;
        Ok(row.is_some())
    }

    async fn upsert_entitlement(&self, record: &EntitlementRecord) -> AppResult<()> {
        // merge semantics: the first usedAt stays
        self.create_entitlement_if_absent(record).await.map(|_| ())
    }

    async fn create_entitlement_if_absent(&self, record: &EntitlementRecord) -> AppResult<bool> {
        let am = er::ActiveModel {
            gate: Set(record.gate.collection().to_string()),
            document_key: Set(record.document_key.clone()),
            uid: Set(record.uid.clone()),
            entitlement_key: Set(record.key.clone()),
            month: Set(record.month.clone()),
            used_at: Set(record.used_at),
        };
        let stmt = er::Entity::insert(am)
            .on_conflict(
                OnConflict::columns([er::Column::Gate, er::Column::DocumentKey])
                    .do_nothing()
                    .to_owned(),
            )
            .build(DatabaseBackend::Postgres);
        let res = self.pool.execute(stmt).await?;
        Ok(res.rows_affected() > 0)
    }

    fn watch_collection(&self, collection: ListingCollection) -> watch::Receiver<u64> {
        self.notifier.subscribe(collection)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{AdTier, BusinessType, CopyStyle};
    use crate::models::ListingContent;
    use chrono::TimeZone;
    use sea_orm::ActiveValue;

    #[test]
    fn test_active_model_carries_every_field() {
        let t = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
        let new = NewListing {
            id: None,
            collection: ListingCollection::Ads,
            owner_key: "phone:+12015550123".to_string(),
            tier: AdTier::Free,
            content: ListingContent {
                business_name: "Halal Bites".to_string(),
                business_type: Some(BusinessType::Restaurant),
                copy_style: Some(CopyStyle::Popular),
                phone: "(201) 555-0123".to_string(),
                city: "Clifton".to_string(),
                state: "NJ".to_string(),
                ..Default::default()
            },
            transaction_id: None,
            created_at: t,
            expires_at: t + chrono::Duration::days(30),
        };
        let am = to_active_model("abc", &new);
        assert_eq!(am.id, ActiveValue::Set("abc".to_string()));
        assert_eq!(am.collection, ActiveValue::Set(ListingCollection::Ads));
        assert_eq!(am.copy_style, ActiveValue::Set(Some(CopyStyle::Popular)));
        assert_eq!(am.deleted_at, ActiveValue::Set(None));
        assert_eq!(am.expires_at, ActiveValue::Set(t + chrono::Duration::days(30)));
    }

    #[test]
    fn test_model_maps_to_listing() {
        let t = Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap();
        let model = le::Model {
            id: "l1".to_string(),
            collection: ListingCollection::PlaceSubmissions,
            owner_key: "uid:u1".to_string(),
            tier: AdTier::Free,
            business_name: "Sahara Market".to_string(),
            business_type: Some(BusinessType::Market),
            copy_style: None,
            phone: String::new(),
            address_line: "12 Main St".to_string(),
            city: "Paterson".to_string(),
            state: "NJ".to_string(),
            description: None,
            event_template: None,
            event_date: None,
            transaction_id: None,
            created_at: t,
            expires_at: t + chrono::Duration::days(30),
            deleted_at: Some(t),
        };
        let listing = Listing::from(model);
        assert_eq!(listing.collection, ListingCollection::PlaceSubmissions);
        assert_eq!(listing.content.address_line, "12 Main St");
        assert_eq!(listing.deleted_at, Some(t));
    }
}
