use super::claim_response;
use crate::entities::ListingCollection;
use crate::middlewares::request_identity;
use crate::models::SubmitListingRequest;
use crate::services::{FeedService, ListingService};
use actix_web::{HttpRequest, HttpResponse, ResponseError, Result, web};
use serde_json::json;

#[utoipa::path(
    post,
    path = "/places",
    tag = "listings",
    request_body = SubmitListingRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Place submitted", body = crate::services::FreeClaimOutcome),
        (status = 409, description = "Monthly free submission already used (ENTITLEMENT_DENIED)", body = crate::services::FreeClaimOutcome),
        (status = 400, description = "Missing required fields")
    )
)]
pub async fn submit_place(
    service: web::Data<ListingService>,
    req: HttpRequest,
    request: web::Json<SubmitListingRequest>,
) -> Result<HttpResponse> {
    let identity = request_identity(&req);

    match service
        .submit_place(&identity, request.into_inner().content)
        .await
    {
        Ok(outcome) => Ok(claim_response(outcome)),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/events",
    tag = "listings",
    request_body = SubmitListingRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Event listed", body = crate::models::ListingResponse),
        (status = 400, description = "Missing template, date or required fields")
    )
)]
pub async fn submit_event(
    service: web::Data<ListingService>,
    req: HttpRequest,
    request: web::Json<SubmitListingRequest>,
) -> Result<HttpResponse> {
    let identity = request_identity(&req);

    match service
        .submit_event(&identity, request.into_inner().content)
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
    path = "/listings/{collection}",
    tag = "listings",
    params(
        ("collection" = ListingCollection, Path, description = "place_submissions | ads | cityEventAds")
    ),
    responses(
        (status = 200, description = "Active listings, ranked by tier then recency", body = crate::models::FeedResponse)
    )
)]
pub async fn get_feed(
    feeds: web::Data<FeedService>,
    path: web::Path<ListingCollection>,
) -> Result<HttpResponse> {
    match feeds.feed(path.into_inner()).await {
        Ok(resp) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": resp
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/listings/{collection}/mine",
    tag = "listings",
    params(
        ("collection" = ListingCollection, Path, description = "place_submissions | ads | cityEventAds")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Caller's listings with derived state", body = [crate::models::ListingResponse]),
        (status = 401, description = "No identity")
    )
)]
pub async fn get_my_listings(
    service: web::Data<ListingService>,
    req: HttpRequest,
    path: web::Path<ListingCollection>,
) -> Result<HttpResponse> {
    let identity = request_identity(&req);

    match service.list_mine(path.into_inner(), &identity).await {
        Ok(listings) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": {
                "listings": listings
            }
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    delete,
    path = "/listings/{collection}/{id}",
    tag = "listings",
    params(
        ("collection" = ListingCollection, Path, description = "place_submissions | ads | cityEventAds"),
        ("id" = String, Path, description = "Listing id")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Listing soft-deleted"),
        (status = 403, description = "Not the owner"),
        (status = 404, description = "Listing not found")
    )
)]
pub async fn delete_listing(
    service: web::Data<ListingService>,
    req: HttpRequest,
    path: web::Path<(ListingCollection, String)>,
) -> Result<HttpResponse> {
    let identity = request_identity(&req);
    let (collection, id) = path.into_inner();

    match service.delete_listing(collection, &id, &identity).await {
        Ok(()) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": {
                "id": id
            }
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn listings_config(cfg: &mut web::ServiceConfig) {
    cfg.route("/places", web::post().to(submit_place))
        .route("/events", web::post().to(submit_event))
        .service(
            web::scope("/listings")
                .route("/{collection}", web::get().to(get_feed))
                .route("/{collection}/mine", web::get().to(get_my_listings))
                .route("/{collection}/{id}", web::delete().to(delete_listing)),
        );
}
