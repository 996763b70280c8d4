use crate::infra::AppState;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use campus_placement::error::AppError;
use campus_placement::workflows::catalog::{CatalogImport, OpportunityCatalogImporter, RejectedRow};
use campus_placement::workflows::placement::{
    candidate_from_payload, classify_slab, evaluate, CandidateId, CandidatePayload,
    NotificationPublisher, OpportunityId, OpportunityType, PlacementRepository, PlacementService,
    PlacementServiceError, Slab,
};
use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::io::Cursor;
use std::sync::Arc;

#[derive(Debug, Deserialize)]
pub(crate) struct CatalogReportRequest {
    pub(crate) csv: String,
    #[serde(default)]
    pub(crate) candidate: Option<CandidatePayload>,
}

#[derive(Debug, Serialize)]
pub(crate) struct CatalogReport {
    pub(crate) generated_on: NaiveDate,
    pub(crate) opportunities: Vec<CatalogReportEntry>,
    pub(crate) rejected: Vec<RejectedRow>,
}

#[derive(Debug, Serialize)]
pub(crate) struct CatalogReportEntry {
    pub(crate) opportunity_id: OpportunityId,
    pub(crate) company_name: String,
    pub(crate) role: String,
    pub(crate) opportunity_type: OpportunityType,
    pub(crate) ctc: String,
    pub(crate) offer_slab: Option<Slab>,
    /// Present only when the report was run for a specific candidate.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) eligible: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) eligibility: Option<String>,
}

pub(crate) fn with_placement_routes<R, N>(service: Arc<PlacementService<R, N>>) -> axum::Router
where
    R: PlacementRepository + 'static,
    N: NotificationPublisher + 'static,
{
    campus_placement::workflows::placement::placement_router(service)
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
        .route(
            "/api/v1/placement/catalog/report",
            axum::routing::post(catalog_report_endpoint),
        )
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

pub(crate) async fn catalog_report_endpoint(
    Json(payload): Json<CatalogReportRequest>,
) -> Result<Json<CatalogReport>, AppError> {
    let CatalogReportRequest { csv, candidate } = payload;

    let import = OpportunityCatalogImporter::from_reader(Cursor::new(csv.into_bytes()))?;
    let report = catalog_report(import, candidate.as_ref(), Local::now().date_naive())?;

    Ok(Json(report))
}

/// Summarize an imported catalog, optionally evaluating every posting for one candidate.
pub(crate) fn catalog_report(
    import: CatalogImport,
    candidate: Option<&CandidatePayload>,
    generated_on: NaiveDate,
) -> Result<CatalogReport, AppError> {
    let profile = candidate
        .map(|payload| candidate_from_payload(CandidateId::unassigned(), payload))
        .transpose()
        .map_err(PlacementServiceError::from)?;

    let opportunities = import
        .opportunities
        .iter()
        .map(|record| {
            let outcome = profile.as_ref().map(|profile| evaluate(profile, record));
            CatalogReportEntry {
                opportunity_id: record.opportunity_id.clone(),
                company_name: record.company_name.clone(),
                role: record.role.clone(),
                opportunity_type: record.opportunity_type,
                ctc: record.ctc.label.clone(),
                offer_slab: record.ctc.amount.map(classify_slab),
                eligible: outcome.as_ref().map(|outcome| outcome.is_eligible()),
                eligibility: outcome.map(|outcome| outcome.decision.summary()),
            }
        })
        .collect();

    Ok(CatalogReport {
        generated_on,
        opportunities,
        rejected: import.rejected,
    })
}
