pub mod copy_generator;
pub mod copy_library;
pub mod entitlement_gate;
pub mod event_copy;
pub mod feed_service;
pub mod lifecycle;
pub mod listing_service;
pub mod purchase_service;
pub mod ranking;

pub use entitlement_gate::{EntitlementGate, derive_entitlement_key};
pub use feed_service::FeedService;
pub use lifecycle::TierDurations;
pub use listing_service::{FreeClaimOutcome, ListingService};
pub use purchase_service::PurchaseService;
