use actix_web::web;
use utoipa::OpenApi;
use utoipa::{
    Modify,
    openapi::security::{Http, HttpAuthScheme, SecurityScheme},
};
use utoipa_swagger_ui::SwaggerUi;

use crate::entities::{AdTier, BusinessType, CopyStyle, EventTemplate, ListingCollection};
use crate::handlers;
use crate::models::*;
use crate::services::FreeClaimOutcome;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
            )
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::gates::check_eligibility,
        handlers::ads::submit_free_ad,
        handlers::ads::complete_purchase,
        handlers::ads::get_ad_copy,
        handlers::listings::submit_place,
        handlers::listings::submit_event,
        handlers::listings::get_feed,
        handlers::listings::get_my_listings,
        handlers::listings::delete_listing,
        handlers::copy::preview_copy,
    ),
    components(
        schemas(
            ListingContent,
            Listing,
            ListingState,
            ListingResponse,
            FeedResponse,
            SubmitListingRequest,
            PurchaseListingRequest,
            FreeClaimOutcome,
            GateKind,
            EligibilityResponse,
            AdTier,
            ListingCollection,
            BusinessType,
            CopyStyle,
            EventTemplate,
            CopyLanguage,
            CopyFields,
            CopyPreviewRequest,
            CopyResponse,
            ApiError,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "gates", description = "Free-slot eligibility API"),
        (name = "ads", description = "Free and paid ads API"),
        (name = "listings", description = "Places, events and ranked feeds API"),
        (name = "copy", description = "Deterministic ad copy API"),
    ),
    info(
        title = "Halal Ads Backend API",
        version = "1.0.0",
        description = "Ad entitlement, ranking, lifecycle and copy REST API documentation"
    ),
    servers(
        (url = "/api/v1", description = "Local server")
    )
)]
pub struct ApiDoc;

pub fn swagger_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        SwaggerUi::new("/swagger-ui/{_:.*}").url("/api-docs/openapi.json", ApiDoc::openapi()),
    )
    .route(
        "/swagger-ui",
        web::get().to(|| async {
            actix_web::HttpResponse::Found()
                .append_header(("Location", "/swagger-ui/"))
                .finish()
        }),
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_lists_every_route() {
        let doc = ApiDoc::openapi();
        for path in [
            "/gates/{gate}/eligibility",
            "/ads/free",
            "/ads/purchase",
            "/ads/{id}/copy",
            "/places",
            "/events",
            "/listings/{collection}",
            "/listings/{collection}/mine",
            "/listings/{collection}/{id}",
            "/copy/preview",
        ] {
            assert!(doc.paths.paths.contains_key(path), "missing {path}");
        }
        let schemes = doc.components.map(|c| c.security_schemes).unwrap_or_default();
        assert!(schemes.contains_key("bearer_auth"));
    }
}
