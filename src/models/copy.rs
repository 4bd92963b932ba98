use crate::entities::{BusinessType, CopyStyle};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema, Default)]
#[serde(rename_all = "snake_case")]
pub enum CopyLanguage {
    #[default]
    En,
    Ar,
}

/// Structured inputs to the copy generator. Field order in the stable hash key
/// is business_name, phone, city, state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct CopyFields {
    pub business_name: String,
    pub phone: String,
    pub city: String,
    pub state: String,
    pub address_line: String,
}

#[derive(Debug, Deserialize)]
pub struct CopyQuery {
    #[serde(default)]
    pub lang: CopyLanguage,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CopyPreviewRequest {
    pub business_type: BusinessType,
    pub style: CopyStyle,
    #[serde(default)]
    pub lang: CopyLanguage,
    #[serde(flatten)]
    pub fields: CopyFields,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CopyResponse {
    pub lang: CopyLanguage,
    pub text: String,
}
