pub mod ads;
pub mod copy;
pub mod gates;
pub mod listings;

pub use ads::ads_config;
pub use copy::copy_config;
pub use gates::gates_config;
pub use listings::listings_config;

use crate::models::{ApiResponse, GateKind};
use crate::services::FreeClaimOutcome;
use actix_web::HttpResponse;

/// Created -> 200 with the listing; denied -> 409 ENTITLEMENT_DENIED, which
/// clients show as "already used" with no retry.
pub(crate) fn claim_response(outcome: FreeClaimOutcome) -> HttpResponse {
    let message = match &outcome {
        FreeClaimOutcome::Created(_) => None,
        FreeClaimOutcome::Denied {
            gate: GateKind::OnceEver,
            ..
        } => Some("Free ad already used".to_string()),
        FreeClaimOutcome::Denied { period, .. } => Some(match period {
            Some(p) => format!("Free submission for {p} already used"),
            None => "Free submission already used this month".to_string(),
        }),
    };
    match message {
        None => HttpResponse::Ok().json(ApiResponse::success(outcome)),
        Some(message) => HttpResponse::Conflict().json(ApiResponse::denied(outcome, message)),
    }
}
