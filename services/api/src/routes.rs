use crate::infra::AppState;
use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Extension, Json, Router};
use patent_uig::address::AddressRule;
use patent_uig::{
    AddressResolution, Category, ClassificationEngine, CollaborationRecord, TechProfile,
    RULE_TABLE_VERSION,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;

#[derive(Debug, Deserialize)]
pub(crate) struct AddressRequest {
    pub(crate) address: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct AddressResponse {
    #[serde(flatten)]
    pub(crate) resolution: AddressResolution,
    pub(crate) rule: AddressRule,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ApplicantRequest {
    pub(crate) name: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct ApplicantResponse {
    pub(crate) category: Category,
    pub(crate) rule: Option<&'static str>,
    pub(crate) rule_table_version: &'static str,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CollaborationRequest {
    #[serde(default)]
    pub(crate) application_id: Option<String>,
    pub(crate) applicants: String,
    #[serde(default)]
    pub(crate) address: Option<String>,
    #[serde(default)]
    pub(crate) include_orgs: bool,
}

#[derive(Debug, Serialize)]
pub(crate) struct CollaborationResponse {
    #[serde(flatten)]
    pub(crate) record: CollaborationRecord,
    pub(crate) code: String,
}

impl From<CollaborationRecord> for CollaborationResponse {
    fn from(record: CollaborationRecord) -> Self {
        let code = record.code();
        Self { record, code }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct TechCodesRequest {
    pub(crate) int_cl: String,
}

pub(crate) fn classification_router(engine: Arc<ClassificationEngine>) -> Router {
    Router::new()
        .route("/api/v1/address", post(address_handler))
        .route("/api/v1/applicant", post(applicant_handler))
        .route("/api/v1/collaboration", post(collaboration_handler))
        .route("/api/v1/tech-codes", post(tech_codes_handler))
        .with_state(engine)
}

pub(crate) fn with_service_routes(engine: Arc<ClassificationEngine>) -> Router {
    classification_router(engine)
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
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

pub(crate) async fn address_handler(
    State(engine): State<Arc<ClassificationEngine>>,
    Json(payload): Json<AddressRequest>,
) -> Json<AddressResponse> {
    let (resolution, rule) = engine.explain_address(&payload.address);
    Json(AddressResponse { resolution, rule })
}

pub(crate) async fn applicant_handler(
    State(engine): State<Arc<ClassificationEngine>>,
    Json(payload): Json<ApplicantRequest>,
) -> Json<ApplicantResponse> {
    let verdict = engine.explain_applicant(&payload.name);
    Json(ApplicantResponse {
        category: verdict.category,
        rule: verdict.rule,
        rule_table_version: RULE_TABLE_VERSION,
    })
}

pub(crate) async fn collaboration_handler(
    State(engine): State<Arc<ClassificationEngine>>,
    Json(payload): Json<CollaborationRequest>,
) -> Json<CollaborationResponse> {
    let CollaborationRequest {
        application_id,
        applicants,
        address,
        include_orgs,
    } = payload;

    let application_id = application_id.as_deref();
    let address = address.as_deref();
    let record = if include_orgs {
        engine.aggregate_with_orgs(application_id, &applicants, address)
    } else {
        engine.aggregate(application_id, &applicants, address)
    };
    Json(record.into())
}

pub(crate) async fn tech_codes_handler(
    State(engine): State<Arc<ClassificationEngine>>,
    Json(payload): Json<TechCodesRequest>,
) -> Json<TechProfile> {
    Json(engine.classify_tech_codes(&payload.int_cl))
}
