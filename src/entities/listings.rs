use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::{DeriveActiveEnum, EnumIter};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Promotional level of a listing. Closed set; duration and display rank are
/// both total functions over it.
#[derive(
    Debug,
    Clone,
    Copy,
    Hash,
    Serialize,
    Deserialize,
    PartialEq,
    Eq,
    ToSchema,
    DeriveActiveEnum,
    EnumIter,
)]
#[sea_orm(rs_type = "String", db_type = "String(Some(16))")]
#[serde(rename_all = "snake_case")]
pub enum AdTier {
    #[sea_orm(string_value = "free")]
    Free,
    #[sea_orm(string_value = "weekly")]
    Weekly,
    #[sea_orm(string_value = "monthly")]
    Monthly,
    #[sea_orm(string_value = "prime")]
    Prime,
}

impl AdTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            AdTier::Free => "free",
            AdTier::Weekly => "weekly",
            AdTier::Monthly => "monthly",
            AdTier::Prime => "prime",
        }
    }

    /// Free and prime listings get the home banner placement.
    pub fn is_featured(&self) -> bool {
        match self {
            AdTier::Free | AdTier::Prime => true,
            AdTier::Weekly | AdTier::Monthly => false,
        }
    }
}

impl std::fmt::Display for AdTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Record collections that hold listings.
#[derive(
    Debug,
    Clone,
    Copy,
    Hash,
    Serialize,
    Deserialize,
    PartialEq,
    Eq,
    ToSchema,
    DeriveActiveEnum,
    EnumIter,
)]
#[sea_orm(rs_type = "String", db_type = "String(Some(32))")]
pub enum ListingCollection {
    #[sea_orm(string_value = "place_submissions")]
    #[serde(rename = "place_submissions")]
    PlaceSubmissions,
    #[sea_orm(string_value = "ads")]
    #[serde(rename = "ads")]
    Ads,
    #[sea_orm(string_value = "cityEventAds")]
    #[serde(rename = "cityEventAds")]
    CityEventAds,
}

impl ListingCollection {
    pub fn as_str(&self) -> &'static str {
        match self {
            ListingCollection::PlaceSubmissions => "place_submissions",
            ListingCollection::Ads => "ads",
            ListingCollection::CityEventAds => "cityEventAds",
        }
    }
}

impl std::fmt::Display for ListingCollection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(
    Debug,
    Clone,
    Copy,
    Hash,
    Serialize,
    Deserialize,
    PartialEq,
    Eq,
    ToSchema,
    DeriveActiveEnum,
    EnumIter,
)]
#[sea_orm(rs_type = "String", db_type = "String(Some(32))")]
#[serde(rename_all = "snake_case")]
pub enum BusinessType {
    #[sea_orm(string_value = "restaurant")]
    Restaurant,
    #[sea_orm(string_value = "grocery")]
    Grocery,
    #[sea_orm(string_value = "butcher")]
    Butcher,
    #[sea_orm(string_value = "deli")]
    Deli,
    #[sea_orm(string_value = "bakery")]
    Bakery,
    #[sea_orm(string_value = "cafe")]
    Cafe,
    #[sea_orm(string_value = "food_truck")]
    FoodTruck,
    #[sea_orm(string_value = "market")]
    Market,
    #[sea_orm(string_value = "other")]
    Other,
}

/// Style layer applied on top of a category phrase. Distinct from the tier.
#[derive(
    Debug,
    Clone,
    Copy,
    Hash,
    Serialize,
    Deserialize,
    PartialEq,
    Eq,
    ToSchema,
    DeriveActiveEnum,
    EnumIter,
)]
#[sea_orm(rs_type = "String", db_type = "String(Some(32))")]
#[serde(rename_all = "snake_case")]
pub enum CopyStyle {
    #[sea_orm(string_value = "simple")]
    Simple,
    #[sea_orm(string_value = "halal_focused")]
    HalalFocused,
    #[sea_orm(string_value = "family_friendly")]
    FamilyFriendly,
    #[sea_orm(string_value = "new_opening")]
    NewOpening,
    #[sea_orm(string_value = "community_support")]
    CommunitySupport,
    #[sea_orm(string_value = "popular")]
    Popular,
    #[sea_orm(string_value = "delivery_or_call")]
    DeliveryOrCall,
    #[sea_orm(string_value = "location_highlight")]
    LocationHighlight,
    #[sea_orm(string_value = "best_time_to_visit")]
    BestTimeToVisit,
    #[sea_orm(string_value = "special_offer")]
    SpecialOffer,
    #[sea_orm(string_value = "friday_special")]
    FridaySpecial,
    #[sea_orm(string_value = "weekend")]
    Weekend,
    #[sea_orm(string_value = "easy_parking")]
    EasyParking,
    #[sea_orm(string_value = "accessible")]
    Accessible,
    #[sea_orm(string_value = "contact_now")]
    ContactNow,
}

#[derive(
    Debug,
    Clone,
    Copy,
    Hash,
    Serialize,
    Deserialize,
    PartialEq,
    Eq,
    ToSchema,
    DeriveActiveEnum,
    EnumIter,
)]
#[sea_orm(rs_type = "String", db_type = "String(Some(32))")]
#[serde(rename_all = "snake_case")]
pub enum EventTemplate {
    #[sea_orm(string_value = "friday_prayer")]
    FridayPrayer,
    #[sea_orm(string_value = "quran_circle")]
    QuranCircle,
    #[sea_orm(string_value = "youth_night")]
    YouthNight,
    #[sea_orm(string_value = "sisters_halaqa")]
    SistersHalaqa,
    #[sea_orm(string_value = "eid_prayer")]
    EidPrayer,
    #[sea_orm(string_value = "ramadan_iftar")]
    RamadanIftar,
    #[sea_orm(string_value = "charity_fundraiser")]
    CharityFundraiser,
    #[sea_orm(string_value = "community_meeting")]
    CommunityMeeting,
    #[sea_orm(string_value = "lecture_talk")]
    LectureTalk,
    #[sea_orm(string_value = "food_bazaar")]
    FoodBazaar,
    #[sea_orm(string_value = "weekend_school")]
    WeekendSchool,
    #[sea_orm(string_value = "volunteer_drive")]
    VolunteerDrive,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "listings")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub collection: ListingCollection,
    pub owner_key: String,
    pub tier: AdTier,
    pub business_name: String,
    pub business_type: Option<BusinessType>,
    pub copy_style: Option<CopyStyle>,
    pub phone: String,
    pub address_line: String,
    pub city: String,
    pub state: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,
    pub event_template: Option<EventTemplate>,
    pub event_date: Option<NaiveDate>,
    pub transaction_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
