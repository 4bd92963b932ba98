use super::lifecycle::is_active;
use crate::entities::AdTier;
use crate::models::Listing;
use chrono::{DateTime, Utc};

/// Display rank, lowest first. Business policy, not derived from anything.
pub fn tier_rank(tier: AdTier) -> u8 {
    match tier {
        AdTier::Prime => 0,
        AdTier::Monthly => 1,
        AdTier::Weekly => 2,
        AdTier::Free => 3,
    }
}

/// Drops inactive listings and orders the rest by tier rank, then newest
/// first, then id. Pure: the same snapshot and `now` always give the same
/// order.
pub fn order_listings(listings: &[Listing], now: DateTime<Utc>) -> Vec<Listing> {
    let mut active: Vec<Listing> = listings
        .iter()
        .filter(|l| is_active(l, now))
        .cloned()
        .collect();
    active.sort_by(|a, b| {
        tier_rank(a.tier)
            .cmp(&tier_rank(b.tier))
            .then_with(|| b.created_at.cmp(&a.created_at))
            .then_with(|| a.id.cmp(&b.id))
    });
    active
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::ListingCollection;
    use crate::models::ListingContent;
    use chrono::{Duration, TimeZone};

    fn listing(id: &str, tier: AdTier, created_at: DateTime<Utc>) -> Listing {
        Listing {
            id: id.to_string(),
            collection: ListingCollection::Ads,
            owner_key: format!("uid:{id}"),
            tier,
            content: ListingContent::default(),
            transaction_id: None,
            created_at,
            expires_at: created_at + Duration::days(30),
            deleted_at: None,
        }
    }

    fn ids(listings: &[Listing]) -> Vec<&str> {
        listings.iter().map(|l| l.id.as_str()).collect()
    }

    #[test]
    fn test_prime_beats_newer_weekly() {
        let t = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
        let snapshot = vec![
            listing("weekly", AdTier::Weekly, t + Duration::hours(5)),
            listing("prime", AdTier::Prime, t),
        ];
        let ordered = order_listings(&snapshot, t + Duration::days(1));
        assert_eq!(ids(&ordered), vec!["prime", "weekly"]);
    }

    #[test]
    fn test_inactive_listings_are_dropped() {
        let t = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
        let mut deleted = listing("deleted", AdTier::Prime, t);
        deleted.deleted_at = Some(t);
        let mut expired = listing("expired", AdTier::Prime, t);
        expired.expires_at = t + Duration::hours(1);
        let live = listing("live", AdTier::Free, t);

        let ordered = order_listings(&[deleted, expired, live], t + Duration::hours(2));
        assert_eq!(ids(&ordered), vec!["live"]);
    }

    #[test]
    fn test_full_order_with_ties() {
        let t = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
        let snapshot = vec![
            listing("f-old", AdTier::Free, t),
            listing("m", AdTier::Monthly, t),
            listing("f-new", AdTier::Free, t + Duration::hours(3)),
            listing("p-b", AdTier::Prime, t),
            listing("w", AdTier::Weekly, t),
            listing("p-a", AdTier::Prime, t),
        ];
        let now = t + Duration::days(1);
        let ordered = order_listings(&snapshot, now);
        assert_eq!(ids(&ordered), vec!["p-a", "p-b", "m", "w", "f-new", "f-old"]);

        // reordering the input does not change the output
        let mut reversed = snapshot.clone();
        reversed.reverse();
        assert_eq!(ids(&order_listings(&reversed, now)), ids(&ordered));
    }

    #[test]
    fn test_order_invariants_hold_over_a_mixed_set() {
        let t = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
        let tiers = [AdTier::Free, AdTier::Weekly, AdTier::Monthly, AdTier::Prime];
        let snapshot: Vec<Listing> = (0..40)
            .map(|i| {
                listing(
                    &format!("l{i:02}"),
                    tiers[(i * 7) % 4],
                    t + Duration::minutes(((i * 13) % 17) as i64),
                )
            })
            .collect();
        let ordered = order_listings(&snapshot, t + Duration::days(1));
        assert_eq!(ordered.len(), snapshot.len());

        let first_non_prime = ordered
            .iter()
            .position(|l| l.tier != AdTier::Prime)
            .unwrap_or(ordered.len());
        assert!(ordered[first_non_prime..].iter().all(|l| l.tier != AdTier::Prime));

        for pair in ordered.windows(2) {
            let (a, b) = (&pair[0], &pair[1]);
            assert!(tier_rank(a.tier) <= tier_rank(b.tier));
            if a.tier == b.tier {
                assert!(a.created_at >= b.created_at);
            }
        }
    }
}
