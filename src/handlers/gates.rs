use crate::middlewares::request_identity;
use crate::models::{EligibilityQuery, GateKind};
use crate::services::ListingService;
use actix_web::{HttpRequest, HttpResponse, ResponseError, Result, web};
use serde_json::json;

#[utoipa::path(
    get,
    path = "/gates/{gate}/eligibility",
    tag = "gates",
    params(
        ("gate" = GateKind, Path, description = "once_ever | monthly"),
        ("phone" = Option<String>, Query, description = "Phone to key the check on; identity is used when blank")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Whether a free slot is still available", body = crate::models::EligibilityResponse),
        (status = 401, description = "No identity"),
        (status = 503, description = "Store unavailable, retry")
    )
)]
pub async fn check_eligibility(
    service: web::Data<ListingService>,
    req: HttpRequest,
    path: web::Path<GateKind>,
    query: web::Query<EligibilityQuery>,
) -> Result<HttpResponse> {
    let identity = request_identity(&req);
    let phone = query.phone.as_deref();

    match service
        .eligibility(path.into_inner(), &identity, phone)
        .await
    {
        Ok(resp) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": resp
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn gates_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/gates").route("/{gate}/eligibility", web::get().to(check_eligibility)),
    );
}
