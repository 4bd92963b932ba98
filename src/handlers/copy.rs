use crate::models::{CopyPreviewRequest, CopyResponse};
use crate::services::copy_generator::generate;
use actix_web::{HttpResponse, ResponseError, Result, web};
use serde_json::json;

#[utoipa::path(
    post,
    path = "/copy/preview",
    tag = "copy",
    request_body = CopyPreviewRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Copy the chosen style would render", body = CopyResponse)
    )
)]
pub async fn preview_copy(request: web::Json<CopyPreviewRequest>) -> Result<HttpResponse> {
    let req = request.into_inner();

    match generate(req.business_type, req.style, req.lang, &req.fields) {
        Ok(text) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": CopyResponse { lang: req.lang, text }
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn copy_config(cfg: &mut web::ServiceConfig) {
    cfg.service(web::scope("/copy").route("/preview", web::post().to(preview_copy)));
}
