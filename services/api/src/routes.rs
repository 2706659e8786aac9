use crate::infra::AppState;
use axum::extract::{Path, Query};
use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Extension, Json, Router};
use costsheet::error::AppError;
use costsheet::progress::TracingProgress;
use costsheet::workflows::catalog::{
    available_units, find_project, search_units, sorted_projects, HandoffStore, InventoryUnit,
    ProjectCard, ProjectDetail, UnitRoute,
};
use costsheet::workflows::costing::{
    prepare_cost_sheet, registered_keys, CostSheetView, CostingOutcome, NotConfiguredNotice,
    PlanId, RawUnitAttributes,
};
use costsheet::workflows::export::cost_sheet_document;
use serde::{Deserialize, Serialize};
use serde_json::json;

pub(crate) fn router() -> Router {
    Router::new()
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
        .route("/api/v1/plans", get(plans_endpoint))
        .route("/api/v1/costing", post(costing_endpoint))
        .route("/api/v1/costing/pdf", post(costing_pdf_endpoint))
        .route("/api/v1/projects", get(projects_endpoint))
        .route("/api/v1/projects/:name", get(project_detail_endpoint))
        .route("/api/v1/inventory", get(inventory_endpoint))
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

#[derive(Debug, Serialize)]
pub(crate) struct PlanSummary {
    pub(crate) plan: PlanId,
    pub(crate) label: &'static str,
    pub(crate) page: &'static str,
    pub(crate) area_unit: &'static str,
    pub(crate) milestones: Vec<String>,
    pub(crate) selector_keys: Vec<String>,
}

pub(crate) fn plan_summaries() -> Vec<PlanSummary> {
    let keys = registered_keys();
    PlanId::ordered()
        .into_iter()
        .map(|plan| {
            let definition = plan.definition();
            PlanSummary {
                plan,
                label: plan.label(),
                page: plan.page(),
                area_unit: definition.area_unit,
                milestones: definition
                    .milestones
                    .iter()
                    .map(|milestone| milestone.label())
                    .collect(),
                selector_keys: keys
                    .iter()
                    .filter(|(_, registered)| *registered == plan)
                    .map(|(key, _)| key.clone())
                    .collect(),
            }
        })
        .collect()
}

pub(crate) async fn plans_endpoint() -> Json<Vec<PlanSummary>> {
    Json(plan_summaries())
}

fn not_configured_response(notice: NotConfiguredNotice) -> Response {
    let body = json!({
        "status": "not_configured",
        "message": notice.message(),
        "plan_label": notice.plan_label,
        "contact": notice.contact,
    });
    (StatusCode::UNPROCESSABLE_ENTITY, Json(body)).into_response()
}

pub(crate) async fn costing_endpoint(
    Extension(state): Extension<AppState>,
    Json(raw): Json<RawUnitAttributes>,
) -> Response {
    match prepare_cost_sheet(raw.coerce(), &state.support_contact, &TracingProgress) {
        CostingOutcome::Ready(sheet) => Json(CostSheetView::from_sheet(&sheet)).into_response(),
        CostingOutcome::NotConfigured(notice) => not_configured_response(notice),
    }
}

pub(crate) async fn costing_pdf_endpoint(
    Extension(state): Extension<AppState>,
    Json(raw): Json<RawUnitAttributes>,
) -> Result<Response, AppError> {
    let sheet = match prepare_cost_sheet(raw.coerce(), &state.support_contact, &TracingProgress) {
        CostingOutcome::Ready(sheet) => sheet,
        CostingOutcome::NotConfigured(notice) => return Ok(not_configured_response(notice)),
    };

    let document = cost_sheet_document(&CostSheetView::from_sheet(&sheet));
    let rendered = state.exporter.render(&document, &TracingProgress).await?;

    let disposition = format!("attachment; filename=\"{}\"", rendered.file_name);
    let mut response = rendered.bytes.into_response();
    let headers = response.headers_mut();
    if let Ok(value) = HeaderValue::from_str(rendered.content_type.as_ref()) {
        headers.insert(header::CONTENT_TYPE, value);
    }
    if let Ok(value) = HeaderValue::from_str(&disposition) {
        headers.insert(header::CONTENT_DISPOSITION, value);
    }
    Ok(response)
}

pub(crate) async fn projects_endpoint(
    Extension(state): Extension<AppState>,
) -> Json<Vec<ProjectCard>> {
    let records = state.catalog.projects().await;
    Json(sorted_projects(&records))
}

pub(crate) async fn project_detail_endpoint(
    Extension(state): Extension<AppState>,
    Path(name): Path<String>,
) -> Result<Json<ProjectDetail>, StatusCode> {
    let records = state.catalog.projects().await;
    find_project(&records, &name)
        .map(Json)
        .ok_or(StatusCode::NOT_FOUND)
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct InventoryQuery {
    #[serde(default)]
    pub(crate) project: Option<String>,
    #[serde(default)]
    pub(crate) q: Option<String>,
}

#[derive(Debug, Serialize)]
pub(crate) struct InventoryEntry {
    #[serde(flatten)]
    pub(crate) unit: InventoryUnit,
    pub(crate) route: UnitRoute,
}

#[derive(Debug, Serialize)]
pub(crate) struct InventoryResponse {
    pub(crate) project: Option<String>,
    pub(crate) units: Vec<InventoryEntry>,
}

pub(crate) async fn inventory_endpoint(
    Extension(state): Extension<AppState>,
    Query(query): Query<InventoryQuery>,
) -> Json<InventoryResponse> {
    let records = state.catalog.inventory().await;
    let project = query.project.filter(|project| !project.trim().is_empty());
    let available = available_units(&records, project.as_deref());
    let matches = search_units(&available, query.q.as_deref().unwrap_or_default());

    let units = matches
        .into_iter()
        .map(|record| {
            let mut handoff = HandoffStore::default();
            handoff.select_unit(record, project.as_deref().unwrap_or_default());
            InventoryEntry {
                unit: InventoryUnit::from_record(record),
                route: handoff.route(&state.support_contact),
            }
        })
        .collect();

    Json(InventoryResponse { project, units })
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use costsheet::config::AppConfig;
    use costsheet::workflows::catalog::{Catalog, CatalogRecord, CatalogSnapshot};
    use metrics_exporter_prometheus::PrometheusBuilder;
    use serde_json::Value;
    use tower::ServiceExt;

    fn test_app() -> Router {
        let config = AppConfig::load().expect("config loads");
        let snapshot = CatalogSnapshot {
            projects: vec![
                CatalogRecord::from_pairs([("Project Name", "Terra"), ("RERA", "RC/1")]),
                CatalogRecord::from_pairs([("Project Name", "Amara"), ("City", "Sohna")]),
            ],
            inventory: vec![
                CatalogRecord::from_pairs([
                    ("Project Name", "Amara"),
                    ("Unit No", "P-17"),
                    ("Status", "Available"),
                    ("Costing Plan", "Costing 102 Plots New"),
                ]),
                CatalogRecord::from_pairs([
                    ("Project Name", "Amara"),
                    ("Unit No", "P-18"),
                    ("Status", "Available"),
                    ("Costing Plan", "Costing 102 Plots Old"),
                ]),
                CatalogRecord::from_pairs([
                    ("Project Name", "Amara"),
                    ("Unit No", "P-19"),
                    ("Status", "Sold"),
                ]),
            ],
        };
        let metrics = PrometheusBuilder::new().build_recorder().handle();
        let state = AppState::new(&config, Catalog::snapshot(snapshot), metrics);
        router().layer(Extension(state))
    }

    async fn send(app: Router, request: Request<Body>) -> (StatusCode, Vec<u8>) {
        let response = app.oneshot(request).await.expect("response");
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body");
        (status, body.to_vec())
    }

    fn json_post(uri: &str, body: Value) -> Request<Body> {
        Request::post(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .expect("request")
    }

    fn plots_unit(plan: &str) -> Value {
        json!({
            "project_name": "Amara Plots",
            "unit_no": "P-17",
            "unit_size": "150",
            "unit_type": "Plot",
            "price_rate": "5,000",
            "plc_rate": "200",
            "costing_plan": plan,
        })
    }

    #[tokio::test]
    async fn readiness_reports_initializing_until_flagged() {
        let request = Request::get("/ready").body(Body::empty()).expect("request");
        let (status, _) = send(test_app(), request).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn plans_lists_every_configured_plan() {
        let request = Request::get("/api/v1/plans")
            .body(Body::empty())
            .expect("request");
        let (status, body) = send(test_app(), request).await;
        assert_eq!(status, StatusCode::OK);

        let plans: Value = serde_json::from_slice(&body).expect("json");
        let plans = plans.as_array().expect("array");
        assert_eq!(plans.len(), 3);
        assert_eq!(plans[1]["plan"], "plots_new102");
        assert_eq!(plans[1]["selector_keys"][0], "costing102plotsnew");
    }

    #[tokio::test]
    async fn costing_returns_the_formatted_sheet() {
        let request = json_post("/api/v1/costing", plots_unit("Costing - 102 Plots (New)"));
        let (status, body) = send(test_app(), request).await;
        assert_eq!(status, StatusCode::OK);

        let sheet: Value = serde_json::from_slice(&body).expect("json");
        assert_eq!(sheet["grand_total"]["display"], "10,52,200");
        assert_eq!(sheet["schedule_total"]["display"], "10,52,200");
        assert_eq!(sheet["page"], "costing-102-plotsnew.html");
    }

    #[tokio::test]
    async fn unknown_plan_is_unprocessable_with_contact() {
        let request = json_post("/api/v1/costing", plots_unit("unknown plan xyz"));
        let (status, body) = send(test_app(), request).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

        let notice: Value = serde_json::from_slice(&body).expect("json");
        assert_eq!(notice["status"], "not_configured");
        assert!(notice["message"]
            .as_str()
            .expect("message")
            .starts_with("No cost sheet configured for this unit."));
    }

    #[tokio::test]
    async fn costing_pdf_is_an_attachment() {
        let request = json_post("/api/v1/costing/pdf", plots_unit("Costing 102 Plots New"));
        let response = test_app().oneshot(request).await.expect("response");
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            mime::APPLICATION_PDF.as_ref()
        );
        assert_eq!(
            response.headers()[header::CONTENT_DISPOSITION],
            "attachment; filename=\"Amara_Plots_Costing_P-17.pdf\""
        );
        let body = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body");
        assert!(body.starts_with(b"%PDF"));
    }

    #[tokio::test]
    async fn projects_are_sorted_and_detail_falls_back() {
        let request = Request::get("/api/v1/projects")
            .body(Body::empty())
            .expect("request");
        let (_, body) = send(test_app(), request).await;
        let cards: Value = serde_json::from_slice(&body).expect("json");
        assert_eq!(cards[0]["name"], "Amara");
        assert_eq!(cards[0]["location"], "Sohna");

        let request = Request::get("/api/v1/projects/Missing")
            .body(Body::empty())
            .expect("request");
        let (status, body) = send(test_app(), request).await;
        assert_eq!(status, StatusCode::OK);
        let detail: Value = serde_json::from_slice(&body).expect("json");
        assert_eq!(detail["name"], "Terra");
    }

    #[tokio::test]
    async fn inventory_filters_searches_and_routes() {
        let request = Request::get("/api/v1/inventory?project=amara")
            .body(Body::empty())
            .expect("request");
        let (status, body) = send(test_app(), request).await;
        assert_eq!(status, StatusCode::OK);

        let inventory: Value = serde_json::from_slice(&body).expect("json");
        let units = inventory["units"].as_array().expect("units");
        assert_eq!(units.len(), 2);
        assert_eq!(units[0]["unit_no"], "P-17");
        assert_eq!(units[0]["route"]["route"], "cost_sheet");
        assert_eq!(units[1]["route"]["route"], "not_configured");

        let request = Request::get("/api/v1/inventory?project=amara&q=p-18")
            .body(Body::empty())
            .expect("request");
        let (_, body) = send(test_app(), request).await;
        let inventory: Value = serde_json::from_slice(&body).expect("json");
        assert_eq!(inventory["units"].as_array().expect("units").len(), 1);
    }
}
