use super::claim_response;
use crate::entities::ListingCollection;
use crate::middlewares::request_identity;
use crate::models::{CopyQuery, PurchaseListingRequest, SubmitListingRequest};
use crate::services::{ListingService, PurchaseService};
use actix_web::{HttpRequest, HttpResponse, ResponseError, Result, web};
use serde_json::json;

#[utoipa::path(
    post,
    path = "/ads/free",
    tag = "ads",
    request_body = SubmitListingRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Free ad created", body = crate::services::FreeClaimOutcome),
        (status = 409, description = "Free ad already used (ENTITLEMENT_DENIED)", body = crate::services::FreeClaimOutcome),
        (status = 400, description = "Missing required fields"),
        (status = 503, description = "Store unavailable, retry")
    )
)]
pub async fn submit_free_ad(
    service: web::Data<ListingService>,
    req: HttpRequest,
    request: web::Json<SubmitListingRequest>,
) -> Result<HttpResponse> {
    let identity = request_identity(&req);

    match service
        .submit_free_ad(&identity, request.into_inner().content)
        .await
    {
        Ok(outcome) => Ok(claim_response(outcome)),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/ads/purchase",
    tag = "ads",
    request_body = PurchaseListingRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Paid ad created, or the existing one for a replayed transaction", body = crate::models::ListingResponse),
        (status = 400, description = "Unknown product or missing fields"),
        (status = 409, description = "Transaction belongs to another identity")
    )
)]
pub async fn complete_purchase(
    service: web::Data<PurchaseService>,
    req: HttpRequest,
    request: web::Json<PurchaseListingRequest>,
) -> Result<HttpResponse> {
    let identity = request_identity(&req);

    match service
        .complete_purchase(&identity, request.into_inner())
        .await
    {
        Ok(resp) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": resp
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/ads/{id}/copy",
    tag = "ads",
    params(
        ("id" = String, Path, description = "Ad id"),
        ("lang" = Option<String>, Query, description = "en | ar (default en)")
    ),
    responses(
        (status = 200, description = "Deterministic ad copy", body = crate::models::CopyResponse),
        (status = 404, description = "Ad not found")
    )
)]
pub async fn get_ad_copy(
    service: web::Data<ListingService>,
    path: web::Path<String>,
    query: web::Query<CopyQuery>,
) -> Result<HttpResponse> {
    match service
        .listing_copy(ListingCollection::Ads, &path.into_inner(), query.lang)
        .await
    {
        Ok(resp) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": resp
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn ads_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/ads")
            .route("/free", web::post().to(submit_free_ad))
            .route("/purchase", web::post().to(complete_purchase))
            .route("/{id}/copy", web::get().to(get_ad_copy)),
    );
}
