use crate::infra::{cors_headers, AppState};
use axum::extract::Query;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use chrono::Local;
use sales_sim::analytics::{AnalyticsReport, SalesAnalytics};
use sales_sim::dataset::{DatasetCounts, SalesDataGenerator, SalesDataset};
use sales_sim::error::AppError;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::collections::HashMap;

#[derive(Debug, Default, Deserialize)]
pub(crate) struct SalesDataQuery {
    /// Fixes the generator seed so repeated calls return the same payload.
    pub(crate) seed: Option<u64>,
}

#[derive(Debug, Serialize)]
pub(crate) struct SalesDataResponse {
    pub(crate) opportunities: Vec<OpportunityView>,
    pub(crate) generated_at: String,
    pub(crate) count: usize,
}

/// Dashboard-shaped opportunity row: foreign keys already joined into
/// display values, dates truncated to days.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct OpportunityView {
    pub(crate) id: String,
    pub(crate) account_name: String,
    pub(crate) stage: &'static str,
    pub(crate) product: String,
    pub(crate) amount: f64,
    pub(crate) probability: u8,
    pub(crate) region: String,
    pub(crate) owner: String,
    pub(crate) industry: String,
    pub(crate) created_date: String,
    pub(crate) close_date: String,
    pub(crate) days_in_stage: u32,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct AnalyticsReportRequest {
    #[serde(default)]
    pub(crate) seed: Option<u64>,
    #[serde(default)]
    pub(crate) sales_reps: Option<usize>,
    #[serde(default)]
    pub(crate) accounts: Option<usize>,
    #[serde(default)]
    pub(crate) opportunities: Option<usize>,
    #[serde(default)]
    pub(crate) activities: Option<usize>,
}

impl AnalyticsReportRequest {
    fn counts(&self) -> DatasetCounts {
        let defaults = DatasetCounts::default();
        DatasetCounts {
            sales_reps: self.sales_reps.unwrap_or(defaults.sales_reps),
            accounts: self.accounts.unwrap_or(defaults.accounts),
            opportunities: self.opportunities.unwrap_or(defaults.opportunities),
            activities: self.activities.unwrap_or(defaults.activities),
        }
    }
}

pub(crate) fn router() -> axum::Router {
    axum::Router::new()
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
        .route(
            "/api/v1/sales-data",
            axum::routing::get(sales_data_endpoint).options(sales_data_preflight),
        )
        .route(
            "/api/v1/analytics/report",
            axum::routing::post(analytics_report_endpoint),
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

/// Stateless dashboard feed: a fresh dataset every call, nothing kept
/// between requests.
pub(crate) async fn sales_data_endpoint(
    Query(query): Query<SalesDataQuery>,
) -> Result<impl IntoResponse, AppError> {
    let now = Local::now().naive_local();
    let mut generator = match query.seed {
        Some(seed) => SalesDataGenerator::seeded(seed, now),
        None => SalesDataGenerator::from_entropy(now),
    };
    let dataset = generator.generate(&DatasetCounts::default())?;

    let response = SalesDataResponse {
        count: dataset.opportunities.len(),
        opportunities: dashboard_views(&dataset),
        generated_at: now.format("%Y-%m-%dT%H:%M:%S").to_string(),
    };

    Ok((cors_headers(), Json(response)))
}

/// CORS preflight: permissive headers, empty body.
pub(crate) async fn sales_data_preflight() -> impl IntoResponse {
    (StatusCode::OK, cors_headers(), ())
}

pub(crate) async fn analytics_report_endpoint(
    Json(payload): Json<AnalyticsReportRequest>,
) -> Result<Json<AnalyticsReport>, AppError> {
    let now = Local::now().naive_local();
    let mut generator = match payload.seed {
        Some(seed) => SalesDataGenerator::seeded(seed, now),
        None => SalesDataGenerator::from_entropy(now),
    };
    let dataset = generator.generate(&payload.counts())?;
    let report = SalesAnalytics::new(&dataset).report(now);
    Ok(Json(report))
}

pub(crate) fn dashboard_views(dataset: &SalesDataset) -> Vec<OpportunityView> {
    let accounts: HashMap<&str, _> = dataset
        .accounts
        .iter()
        .map(|account| (account.account_id.as_str(), account))
        .collect();
    let territories: HashMap<&str, _> = dataset
        .territories
        .iter()
        .map(|territory| (territory.territory_id.as_str(), territory))
        .collect();
    let reps: HashMap<&str, _> = dataset
        .sales_reps
        .iter()
        .map(|rep| (rep.rep_id.as_str(), rep))
        .collect();
    let products: HashMap<&str, _> = dataset
        .products
        .iter()
        .map(|product| (product.product_id.as_str(), product))
        .collect();

    dataset
        .opportunities
        .iter()
        .map(|opp| {
            let account = accounts.get(opp.account_id.as_str());
            let region = account
                .and_then(|account| territories.get(account.territory_id.as_str()))
                .map(|territory| territory.territory_name.clone())
                .unwrap_or_default();

            OpportunityView {
                id: opp.opportunity_id.clone(),
                account_name: account
                    .map(|account| account.account_name.clone())
                    .unwrap_or_default(),
                stage: opp.stage.label(),
                product: products
                    .get(opp.product_id.as_str())
                    .map(|product| product.product_name.clone())
                    .unwrap_or_default(),
                amount: opp.amount,
                probability: opp.probability,
                region,
                owner: reps
                    .get(opp.rep_id.as_str())
                    .map(|rep| rep.full_name())
                    .unwrap_or_default(),
                industry: account
                    .map(|account| account.industry.clone())
                    .unwrap_or_default(),
                created_date: opp.created_date.format("%Y-%m-%d").to_string(),
                close_date: opp.close_date.format("%Y-%m-%d").to_string(),
                days_in_stage: opp.days_in_stage,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::header::ACCESS_CONTROL_ALLOW_ORIGIN;

    #[tokio::test]
    async fn router_wires_health_and_preflight() {
        use axum::body::Body;
        use axum::http::Request;
        use tower::ServiceExt;

        let app = router();
        let health = app
            .clone()
            .oneshot(
                Request::builder()
                    .uri("/health")
                    .body(Body::empty())
                    .expect("request builds"),
            )
            .await
            .expect("health responds");
        assert_eq!(health.status(), StatusCode::OK);

        let preflight = app
            .oneshot(
                Request::builder()
                    .method("OPTIONS")
                    .uri("/api/v1/sales-data")
                    .body(Body::empty())
                    .expect("request builds"),
            )
            .await
            .expect("preflight responds");
        assert_eq!(preflight.status(), StatusCode::OK);
        assert_eq!(
            preflight
                .headers()
                .get(ACCESS_CONTROL_ALLOW_ORIGIN)
                .and_then(|v| v.to_str().ok()),
            Some("*")
        );
    }

    #[tokio::test]
    async fn sales_data_endpoint_returns_dashboard_rows() {
        let query = SalesDataQuery { seed: Some(42) };
        let response = sales_data_endpoint(Query(query))
            .await
            .expect("payload builds")
            .into_response();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response
                .headers()
                .get(ACCESS_CONTROL_ALLOW_ORIGIN)
                .and_then(|v| v.to_str().ok()),
            Some("*")
        );
    }

    #[tokio::test]
    async fn seeded_payloads_are_reproducible_rows() {
        let now = Local::now().naive_local();
        let first = SalesDataGenerator::seeded(7, now)
            .generate(&DatasetCounts::default())
            .expect("generates");
        let second = SalesDataGenerator::seeded(7, now)
            .generate(&DatasetCounts::default())
            .expect("generates");

        let left = serde_json::to_string(&dashboard_views(&first)).expect("serializes");
        let right = serde_json::to_string(&dashboard_views(&second)).expect("serializes");
        assert_eq!(left, right);
    }

    #[tokio::test]
    async fn preflight_carries_cors_headers_and_no_body() {
        let response = sales_data_preflight().await.into_response();
        assert_eq!(response.status(), StatusCode::OK);
        let headers = response.headers();
        assert_eq!(
            headers
                .get("access-control-allow-methods")
                .and_then(|v| v.to_str().ok()),
            Some("GET, OPTIONS")
        );
        assert_eq!(
            headers
                .get("access-control-allow-headers")
                .and_then(|v| v.to_str().ok()),
            Some("Content-Type")
        );
    }

    #[tokio::test]
    async fn analytics_report_endpoint_honors_counts() {
        let request = AnalyticsReportRequest {
            seed: Some(42),
            sales_reps: Some(3),
            accounts: Some(10),
            opportunities: Some(25),
            activities: Some(30),
        };

        let Json(report) = analytics_report_endpoint(Json(request))
            .await
            .expect("report builds");

        assert_eq!(report.key_metrics.total_opportunities, 25);
        assert_eq!(report.pipeline_by_stage.len(), 6);
        assert!(report.rep_performance.len() <= 3);
    }

    #[tokio::test]
    async fn analytics_report_endpoint_rejects_empty_dependencies() {
        let request = AnalyticsReportRequest {
            seed: Some(1),
            sales_reps: Some(0),
            accounts: Some(10),
            opportunities: Some(5),
            activities: Some(5),
        };

        let err = analytics_report_endpoint(Json(request))
            .await
            .expect_err("empty rep table must fail");
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn dashboard_views_join_reference_tables() {
        let now = Local::now().naive_local();
        let dataset = SalesDataGenerator::seeded(5, now)
            .generate(&DatasetCounts {
                sales_reps: 4,
                accounts: 10,
                opportunities: 20,
                activities: 25,
            })
            .expect("generates");

        let views = dashboard_views(&dataset);
        assert_eq!(views.len(), 20);
        for view in &views {
            assert!(!view.account_name.is_empty());
            assert!(!view.region.is_empty());
            assert!(!view.owner.is_empty());
            assert_eq!(view.created_date.len(), 10, "dates are YYYY-MM-DD");
        }
    }
}
