use crate::config::AdsConfig;
use crate::entities::AdTier;
use crate::models::{Listing, ListingResponse, ListingState};
use chrono::{DateTime, Duration, Utc};

/// Tier -> run length. Built once from configuration; lookups are total over
/// the tier set.
#[derive(Debug, Clone, Copy)]
pub struct TierDurations {
    free: Duration,
    weekly: Duration,
    monthly: Duration,
    prime: Duration,
}

impl Default for TierDurations {
    fn default() -> Self {
        Self::from_config(&AdsConfig::default())
    }
}

impl TierDurations {
    pub fn from_config(config: &AdsConfig) -> Self {
        Self {
            free: Duration::days(config.free_days),
            weekly: Duration::days(config.weekly_days),
            monthly: Duration::days(config.monthly_days),
            prime: Duration::days(config.prime_days),
        }
    }

    pub fn duration_for(&self, tier: AdTier) -> Duration {
        match tier {
            AdTier::Free => self.free,
            AdTier::Weekly => self.weekly,
            AdTier::Monthly => self.monthly,
            AdTier::Prime => self.prime,
        }
    }

    pub fn compute_expiry(&self, tier: AdTier, created_at: DateTime<Utc>) -> DateTime<Utc> {
        created_at + self.duration_for(tier)
    }
}

/// Live means not soft-deleted and `now` strictly before expiry.
pub fn is_active(listing: &Listing, now: DateTime<Utc>) -> bool {
    listing.deleted_at.is_none() && now < listing.expires_at
}

pub fn state(listing: &Listing, now: DateTime<Utc>) -> ListingState {
    if listing.deleted_at.is_some() {
        ListingState::Deleted
    } else if now < listing.expires_at {
        ListingState::Active
    } else {
        ListingState::Expired
    }
}

/// Time left before expiry, zero once the listing is no longer active.
pub fn remaining(listing: &Listing, now: DateTime<Utc>) -> Duration {
    if is_active(listing, now) {
        listing.expires_at - now
    } else {
        Duration::zero()
    }
}

/// Listing plus everything derived from it at `now`.
pub fn describe(listing: Listing, now: DateTime<Utc>) -> ListingResponse {
    ListingResponse {
        state: state(&listing, now),
        featured: listing.tier.is_featured(),
        remaining_seconds: remaining(&listing, now).num_seconds(),
        listing,
    }
}
