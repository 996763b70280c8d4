use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Router,
};
use serde::Deserialize;
use serde_json::json;

use super::domain::{CandidateId, OpportunityId};
use super::eligibility::evaluate_payload;
use super::intake::{CandidatePayload, OpportunityPayload};
use super::repository::{NotificationPublisher, PlacementRepository, RepositoryError};
use super::service::{PlacementService, PlacementServiceError};
use super::status::ApplicationStatus;

/// Inline eligibility check for clients holding both records already.
#[derive(Debug, Deserialize)]
pub struct EligibilityCheckRequest {
    #[serde(default)]
    pub candidate: Option<CandidatePayload>,
    #[serde(default)]
    pub opportunity: Option<OpportunityPayload>,
}

#[derive(Debug, Deserialize)]
pub struct ApplyRequest {
    pub candidate_id: String,
}

#[derive(Debug, Deserialize)]
pub struct StatusUpdateRequest {
    pub status: ApplicationStatus,
}

/// Router builder exposing HTTP endpoints for profiles, postings and applications.
pub fn placement_router<R, N>(service: Arc<PlacementService<R, N>>) -> Router
where
    R: PlacementRepository + 'static,
    N: NotificationPublisher + 'static,
{
    Router::new()
        .route("/api/v1/placement/eligibility", post(eligibility_check_handler))
        .route(
            "/api/v1/placement/candidates/:candidate_id",
            put(register_candidate_handler::<R, N>),
        )
        .route(
            "/api/v1/placement/candidates/:candidate_id/opportunities",
            get(listings_handler::<R, N>),
        )
        .route(
            "/api/v1/placement/opportunities/:opportunity_id",
            put(publish_opportunity_handler::<R, N>),
        )
        .route(
            "/api/v1/placement/opportunities/:opportunity_id/eligibility/:candidate_id",
            get(eligibility_handler::<R, N>),
        )
        .route(
            "/api/v1/placement/opportunities/:opportunity_id/applications",
            post(apply_handler::<R, N>),
        )
        .route(
            "/api/v1/placement/opportunities/:opportunity_id/applications/:candidate_id",
            get(status_handler::<R, N>).patch(update_status_handler::<R, N>),
        )
        .with_state(service)
}

pub(crate) async fn eligibility_check_handler(
    axum::Json(request): axum::Json<EligibilityCheckRequest>,
) -> Response {
    let outcome = evaluate_payload(request.candidate.as_ref(), request.opportunity.as_ref());
    let payload = json!({
        "eligible": outcome.is_eligible(),
        "summary": outcome.decision.summary(),
        "outcome": outcome,
    });
    (StatusCode::OK, axum::Json(payload)).into_response()
}

pub(crate) async fn register_candidate_handler<R, N>(
    State(service): State<Arc<PlacementService<R, N>>>,
    Path(candidate_id): Path<String>,
    axum::Json(payload): axum::Json<CandidatePayload>,
) -> Response
where
    R: PlacementRepository + 'static,
    N: NotificationPublisher + 'static,
{
    match service.register_candidate(CandidateId(candidate_id), &payload) {
        Ok(profile) => (StatusCode::OK, axum::Json(profile)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn publish_opportunity_handler<R, N>(
    State(service): State<Arc<PlacementService<R, N>>>,
    Path(opportunity_id): Path<String>,
    axum::Json(payload): axum::Json<OpportunityPayload>,
) -> Response
where
    R: PlacementRepository + 'static,
    N: NotificationPublisher + 'static,
{
    match service.publish_opportunity(OpportunityId(opportunity_id), &payload) {
        Ok(record) => (StatusCode::OK, axum::Json(record)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn listings_handler<R, N>(
    State(service): State<Arc<PlacementService<R, N>>>,
    Path(candidate_id): Path<String>,
) -> Response
where
    R: PlacementRepository + 'static,
    N: NotificationPublisher + 'static,
{
    match service.listings(&CandidateId(candidate_id)) {
        Ok(listings) => (StatusCode::OK, axum::Json(listings)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn eligibility_handler<R, N>(
    State(service): State<Arc<PlacementService<R, N>>>,
    Path((opportunity_id, candidate_id)): Path<(String, String)>,
) -> Response
where
    R: PlacementRepository + 'static,
    N: NotificationPublisher + 'static,
{
    match service.eligibility(&CandidateId(candidate_id), &OpportunityId(opportunity_id)) {
        Ok(outcome) => (StatusCode::OK, axum::Json(outcome)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn apply_handler<R, N>(
    State(service): State<Arc<PlacementService<R, N>>>,
    Path(opportunity_id): Path<String>,
    axum::Json(request): axum::Json<ApplyRequest>,
) -> Response
where
    R: PlacementRepository + 'static,
    N: NotificationPublisher + 'static,
{
    match service.apply(
        &CandidateId(request.candidate_id),
        &OpportunityId(opportunity_id),
    ) {
        Ok(record) => {
            let view = record.status_view();
            (StatusCode::ACCEPTED, axum::Json(view)).into_response()
        }
        Err(error) => error_response(error),
    }
}

pub(crate) async fn status_handler<R, N>(
    State(service): State<Arc<PlacementService<R, N>>>,
    Path((opportunity_id, candidate_id)): Path<(String, String)>,
) -> Response
where
    R: PlacementRepository + 'static,
    N: NotificationPublisher + 'static,
{
    match service.status(&CandidateId(candidate_id), &OpportunityId(opportunity_id)) {
        Ok(view) => (StatusCode::OK, axum::Json(view)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn update_status_handler<R, N>(
    State(service): State<Arc<PlacementService<R, N>>>,
    Path((opportunity_id, candidate_id)): Path<(String, String)>,
    axum::Json(request): axum::Json<StatusUpdateRequest>,
) -> Response
where
    R: PlacementRepository + 'static,
    N: NotificationPublisher + 'static,
{
    match service.update_status(
        &CandidateId(candidate_id),
        &OpportunityId(opportunity_id),
        request.status,
    ) {
        Ok(record) => (StatusCode::OK, axum::Json(record.status_view())).into_response(),
        Err(error) => error_response(error),
    }
}

fn error_response(error: PlacementServiceError) -> Response {
    let status = match &error {
        PlacementServiceError::Intake(_) => StatusCode::UNPROCESSABLE_ENTITY,
        PlacementServiceError::UnknownCandidate(_)
        | PlacementServiceError::UnknownOpportunity(_)
        | PlacementServiceError::NotApplied { .. }
        | PlacementServiceError::Repository(RepositoryError::NotFound) => StatusCode::NOT_FOUND,
        PlacementServiceError::Ineligible { .. } => StatusCode::FORBIDDEN,
        PlacementServiceError::InvalidTransition { .. }
        | PlacementServiceError::Repository(RepositoryError::Conflict) => StatusCode::CONFLICT,
        PlacementServiceError::Repository(RepositoryError::Unavailable(_)) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };

    let payload = match &error {
        PlacementServiceError::Ineligible { reasons, .. } => json!({
            "error": error.to_string(),
            "reasons": reasons,
        }),
        _ => json!({
            "error": error.to_string(),
        }),
    };

    (status, axum::Json(payload)).into_response()
}
