use crate::dataset::Stage;
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct KeyMetrics {
    pub total_pipeline: f64,
    pub weighted_pipeline: f64,
    pub total_revenue: f64,
    pub win_rate: f64,
    pub avg_deal_size: f64,
    pub total_opportunities: usize,
    pub open_opportunities: usize,
    pub closed_won: usize,
    /// Mean days from creation to close over closed opportunities;
    /// absent when nothing has closed yet.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avg_sales_cycle_days: Option<f64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct StagePipelineEntry {
    pub stage: Stage,
    pub stage_label: &'static str,
    pub amount: f64,
    pub count: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct RepPerformanceEntry {
    pub rep_id: String,
    pub rep_name: String,
    pub territory_id: String,
    pub pipeline_value: f64,
    pub revenue: f64,
    pub win_rate: f64,
    pub avg_deal_size: f64,
    pub total_opps: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct ForecastSummary {
    pub best_case: f64,
    pub weighted: f64,
    pub conservative: f64,
    pub opportunities_in_forecast: usize,
}

/// Everything the dashboard surfaces in one serializable bundle.
#[derive(Debug, Clone, Serialize)]
pub struct AnalyticsReport {
    pub key_metrics: KeyMetrics,
    pub sales_velocity: f64,
    pub pipeline_by_stage: Vec<StagePipelineEntry>,
    pub rep_performance: Vec<RepPerformanceEntry>,
    pub forecast_next_quarter: ForecastSummary,
    pub data_quality: Vec<String>,
}
