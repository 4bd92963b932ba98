pub mod entitlement_records;
pub mod listings;

pub use entitlement_records as entitlement_record_entity;
pub use listings as listing_entity;
pub use listings::{AdTier, BusinessType, CopyStyle, EventTemplate, ListingCollection};
