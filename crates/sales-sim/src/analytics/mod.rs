mod summary;
pub mod views;

pub use summary::SalesAnalytics;
pub use views::{
    AnalyticsReport, ForecastSummary, KeyMetrics, RepPerformanceEntry, StagePipelineEntry,
};
