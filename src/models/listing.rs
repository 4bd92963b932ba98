use crate::entities::{
    AdTier, BusinessType, CopyStyle, EventTemplate, ListingCollection, listing_entity as le,
};
use crate::error::{AppError, AppResult};
use crate::utils::{format_us_phone, validate_us_phone};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

const MAX_FIELD_LEN: usize = 120;
const MAX_DESCRIPTION_LEN: usize = 1_000;

/// Structured content of a listing. Opaque to the engine except as copy
/// template inputs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema, Default)]
pub struct ListingContent {
    pub business_name: String,
    #[serde(default)]
    pub business_type: Option<BusinessType>,
    #[serde(default)]
    pub copy_style: Option<CopyStyle>,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub address_line: String,
    pub city: String,
    pub state: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub event_template: Option<EventTemplate>,
    #[serde(default)]
    pub event_date: Option<NaiveDate>,
}

impl ListingContent {
    /// Checks required structured fields for the target collection and
    /// normalizes the phone. Runs before any store call.
    pub fn validated(mut self, collection: ListingCollection) -> AppResult<Self> {
        self.business_name = required("business_name", &self.business_name)?;
        self.city = required("city", &self.city)?;
        self.state = required("state", &self.state)?;
        self.address_line = self.address_line.trim().to_string();
        if self.address_line.chars().count() > MAX_FIELD_LEN {
            return Err(AppError::ValidationError(
                "address_line is too long".to_string(),
            ));
        }

        let phone = self.phone.trim();
        self.phone = if phone.is_empty() {
            String::new()
        } else {
            let formatted = format_us_phone(phone);
            validate_us_phone(&formatted)?;
            formatted
        };

        match collection {
            ListingCollection::Ads => {
                if self.business_type.is_none() {
                    return Err(AppError::ValidationError(
                        "business_type is required for ads".to_string(),
                    ));
                }
                if self.copy_style.is_none() {
                    self.copy_style = Some(CopyStyle::Simple);
                }
                self.description = None;
            }
            ListingCollection::PlaceSubmissions => {
                if self.business_type.is_none() {
                    self.business_type = Some(BusinessType::Other);
                }
                self.description = None;
            }
            ListingCollection::CityEventAds => {
                if self.event_template.is_none() {
                    return Err(AppError::ValidationError(
                        "event_template is required for events".to_string(),
                    ));
                }
                if self.event_date.is_none() {
                    return Err(AppError::ValidationError(
                        "event_date is required for events".to_string(),
                    ));
                }
                if let Some(desc) = self.description.as_ref() {
                    let trimmed = desc.trim();
                    if trimmed.chars().count() > MAX_DESCRIPTION_LEN {
                        return Err(AppError::ValidationError(
                            "description is too long".to_string(),
                        ));
                    }
                    self.description = (!trimmed.is_empty()).then(|| trimmed.to_string());
                }
            }
        }

        Ok(self)
    }
}

fn required(field: &str, value: &str) -> AppResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AppError::ValidationError(format!("{field} is required")));
    }
    if trimmed.chars().count() > MAX_FIELD_LEN {
        return Err(AppError::ValidationError(format!("{field} is too long")));
    }
    Ok(trimmed.to_string())
}

/// A stored listing. There is deliberately no `is_active` field; activity is
/// derived from `deleted_at` and `expires_at` against the caller's clock.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Listing {
    pub id: String,
    pub collection: ListingCollection,
    pub owner_key: String,
    pub tier: AdTier,
    #[serde(flatten)]
    pub content: ListingContent,
    pub transaction_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

/// A listing about to be written. `id` is set only when the caller needs a
/// deterministic id (purchase replays); otherwise the store assigns one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewListing {
    pub id: Option<String>,
    pub collection: ListingCollection,
    pub owner_key: String,
    pub tier: AdTier,
    pub content: ListingContent,
    pub transaction_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl NewListing {
    pub fn into_listing(self, id: String) -> Listing {
        Listing {
            id,
            collection: self.collection,
            owner_key: self.owner_key,
            tier: self.tier,
            content: self.content,
            transaction_id: self.transaction_id,
            created_at: self.created_at,
            expires_at: self.expires_at,
            deleted_at: None,
        }
    }
}

impl From<le::Model> for Listing {
    fn from(m: le::Model) -> Self {
        Self {
            id: m.id,
            collection: m.collection,
            owner_key: m.owner_key,
            tier: m.tier,
            content: ListingContent {
                business_name: m.business_name,
                business_type: m.business_type,
                copy_style: m.copy_style,
                phone: m.phone,
                address_line: m.address_line,
                city: m.city,
                state: m.state,
                description: m.description,
                event_template: m.event_template,
                event_date: m.event_date,
            },
            transaction_id: m.transaction_id,
            created_at: m.created_at,
            expires_at: m.expires_at,
            deleted_at: m.deleted_at,
        }
    }
}

/// Derived at read time, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ListingState {
    Active,
    Expired,
    Deleted,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ListingOrder {
    CreatedAtDesc,
    ExpiresAtAsc,
}

/// Equality and range filters over one collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingQuery {
    pub collection: ListingCollection,
    pub owner_key: Option<String>,
    pub tier: Option<AdTier>,
    /// keeps rows with `expires_at > expires_after`
    pub expires_after: Option<DateTime<Utc>>,
    pub include_deleted: bool,
    pub order: ListingOrder,
    pub limit: Option<u64>,
}

impl ListingQuery {
    pub fn collection(collection: ListingCollection) -> Self {
        Self {
            collection,
            owner_key: None,
            tier: None,
            expires_after: None,
            include_deleted: false,
            order: ListingOrder::CreatedAtDesc,
            limit: None,
        }
    }

    /// Candidate rows for a live feed. The expiry filter only narrows what is
    /// fetched; ranking still re-checks activity against its own `now`.
    pub fn live_feed(collection: ListingCollection, now: DateTime<Utc>) -> Self {
        Self {
            expires_after: Some(now),
            ..Self::collection(collection)
        }
    }

    pub fn owned_by(collection: ListingCollection, owner_key: &str) -> Self {
        Self {
            owner_key: Some(owner_key.to_string()),
            include_deleted: true,
            ..Self::collection(collection)
        }
    }

    pub fn matches(&self, listing: &Listing) -> bool {
        if listing.collection != self.collection {
            return false;
        }
        if let Some(owner) = self.owner_key.as_deref()
            && listing.owner_key != owner
        {
            return false;
        }
        if let Some(tier) = self.tier
            && listing.tier != tier
        {
            return false;
        }
        if let Some(after) = self.expires_after
            && listing.expires_at <= after
        {
            return false;
        }
        self.include_deleted || listing.deleted_at.is_none()
    }
}

// ---- HTTP payloads ----

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SubmitListingRequest {
    #[serde(flatten)]
    pub content: ListingContent,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PurchaseListingRequest {
    pub product_id: String,
    pub transaction_id: String,
    #[serde(flatten)]
    pub content: ListingContent,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ListingResponse {
    #[serde(flatten)]
    pub listing: Listing,
    pub state: ListingState,
    pub featured: bool,
    pub remaining_seconds: i64,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct FeedResponse {
    pub collection: ListingCollection,
    pub generated_at: DateTime<Utc>,
    pub listings: Vec<ListingResponse>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn content() -> ListingContent {
        ListingContent {
            business_name: "  Zam Zam Grill ".to_string(),
            business_type: Some(BusinessType::Restaurant),
            copy_style: None,
            phone: "(201) 555-0147".to_string(),
            address_line: "12 Main St".to_string(),
            city: "Paterson".to_string(),
            state: "NJ".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_validated_trims_and_normalizes_phone() {
        let c = content().validated(ListingCollection::Ads).unwrap();
        assert_eq!(c.business_name, "Zam Zam Grill");
        assert_eq!(c.phone, "+12015550147");
        assert_eq!(c.copy_style, Some(CopyStyle::Simple));
    }

    #[test]
    fn test_validated_rejects_missing_fields() {
        let mut c = content();
        c.city = "   ".to_string();
        assert!(matches!(
            c.validated(ListingCollection::Ads),
            Err(AppError::ValidationError(_))
        ));

        let mut c = content();
        c.business_type = None;
        assert!(c.validated(ListingCollection::Ads).is_err());

        let mut c = content();
        c.phone = "12345".to_string();
        assert!(c.validated(ListingCollection::Ads).is_err());
    }

    #[test]
    fn test_place_submission_defaults_type_and_allows_empty_phone() {
        let mut c = content();
        c.business_type = None;
        c.phone = String::new();
        let c = c.validated(ListingCollection::PlaceSubmissions).unwrap();
        assert_eq!(c.business_type, Some(BusinessType::Other));
        assert!(c.phone.is_empty());
    }

    #[test]
    fn test_event_requires_template_and_date() {
        let mut c = content();
        c.description = Some("  Bring the family  ".to_string());
        assert!(c.clone().validated(ListingCollection::CityEventAds).is_err());

        c.event_template = Some(EventTemplate::RamadanIftar);
        c.event_date = NaiveDate::from_ymd_opt(2026, 3, 1);
        let c = c.validated(ListingCollection::CityEventAds).unwrap();
        assert_eq!(c.description.as_deref(), Some("Bring the family"));
    }

    #[test]
    fn test_query_matches_filters() {
        let created = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
        let listing = Listing {
            id: "a".to_string(),
            collection: ListingCollection::Ads,
            owner_key: "uid:u1".to_string(),
            tier: AdTier::Weekly,
            content: content(),
            transaction_id: None,
            created_at: created,
            expires_at: created + chrono::Duration::days(7),
            deleted_at: None,
        };

        assert!(ListingQuery::collection(ListingCollection::Ads).matches(&listing));
        assert!(!ListingQuery::collection(ListingCollection::CityEventAds).matches(&listing));
        assert!(ListingQuery::owned_by(ListingCollection::Ads, "uid:u1").matches(&listing));
        assert!(!ListingQuery::owned_by(ListingCollection::Ads, "uid:u2").matches(&listing));
        assert!(
            ListingQuery::live_feed(ListingCollection::Ads, created).matches(&listing)
        );
        assert!(
            !ListingQuery::live_feed(ListingCollection::Ads, listing.expires_at)
                .matches(&listing)
        );

        let mut deleted = listing.clone();
        deleted.deleted_at = Some(created);
        assert!(!ListingQuery::collection(ListingCollection::Ads).matches(&deleted));
        assert!(ListingQuery::owned_by(ListingCollection::Ads, "uid:u1").matches(&deleted));
    }
}
