use super::views::{
    AnalyticsReport, ForecastSummary, KeyMetrics, RepPerformanceEntry, StagePipelineEntry,
};
use crate::dataset::{Opportunity, SalesDataset, SalesRep, Stage};
use chrono::{Duration, NaiveDateTime};
use std::cmp::Ordering;
use std::collections::HashMap;

/// Read-only aggregates over the opportunity and rep tables. Borrows
/// its inputs and never mutates them; every call re-scans the tables.
pub struct SalesAnalytics<'a> {
    opportunities: &'a [Opportunity],
    sales_reps: &'a [SalesRep],
}

impl<'a> SalesAnalytics<'a> {
    pub fn new(dataset: &'a SalesDataset) -> Self {
        Self::with_tables(&dataset.opportunities, &dataset.sales_reps)
    }

    /// Analyze externally supplied tables of the same shape.
    pub fn with_tables(opportunities: &'a [Opportunity], sales_reps: &'a [SalesRep]) -> Self {
        Self {
            opportunities,
            sales_reps,
        }
    }

    pub fn key_metrics(&self) -> KeyMetrics {
        let open: Vec<&Opportunity> = self
            .opportunities
            .iter()
            .filter(|opp| !opp.stage.is_closed())
            .collect();
        let closed: Vec<&Opportunity> = self
            .opportunities
            .iter()
            .filter(|opp| opp.stage.is_closed())
            .collect();
        let won: Vec<&Opportunity> = closed
            .iter()
            .copied()
            .filter(|opp| opp.stage == Stage::ClosedWon)
            .collect();

        let win_rate = if closed.is_empty() {
            0.0
        } else {
            won.len() as f64 / closed.len() as f64 * 100.0
        };

        let avg_deal_size = if self.opportunities.is_empty() {
            0.0
        } else {
            self.opportunities.iter().map(|opp| opp.amount).sum::<f64>()
                / self.opportunities.len() as f64
        };

        let avg_sales_cycle_days = if closed.is_empty() {
            None
        } else {
            let total: i64 = closed
                .iter()
                .map(|opp| (opp.close_date - opp.created_date).num_days())
                .sum();
            Some(total as f64 / closed.len() as f64)
        };

        KeyMetrics {
            total_pipeline: open.iter().map(|opp| opp.amount).sum(),
            weighted_pipeline: open.iter().map(|opp| opp.expected_revenue).sum(),
            total_revenue: won.iter().map(|opp| opp.amount).sum(),
            win_rate,
            avg_deal_size,
            total_opportunities: self.opportunities.len(),
            open_opportunities: open.len(),
            closed_won: won.len(),
            avg_sales_cycle_days,
        }
    }

    /// (open count x avg deal size x win rate) / cycle length, with the
    /// cycle floored at one day to keep the division defined.
    pub fn sales_velocity(&self) -> f64 {
        let metrics = self.key_metrics();
        let cycle_days = metrics.avg_sales_cycle_days.unwrap_or(0.0).max(1.0);

        (metrics.open_opportunities as f64 * metrics.avg_deal_size * (metrics.win_rate / 100.0))
            / cycle_days
    }

    /// Amount and count per stage. Every canonical stage appears, with
    /// zero defaults when no opportunity sits in it.
    pub fn pipeline_by_stage(&self) -> Vec<StagePipelineEntry> {
        Stage::ordered()
            .into_iter()
            .map(|stage| {
                let mut amount = 0.0;
                let mut count = 0;
                for opp in self.opportunities.iter().filter(|opp| opp.stage == stage) {
                    amount += opp.amount;
                    count += 1;
                }
                StagePipelineEntry {
                    stage,
                    stage_label: stage.label(),
                    amount,
                    count,
                }
            })
            .collect()
    }

    /// Per-rep rollup for every rep appearing in the opportunity table,
    /// sorted descending by revenue. The sort is stable, so revenue
    /// ties keep first-appearance order.
    pub fn rep_performance(&self) -> Vec<RepPerformanceEntry> {
        let rep_index: HashMap<&str, &SalesRep> = self
            .sales_reps
            .iter()
            .map(|rep| (rep.rep_id.as_str(), rep))
            .collect();

        let mut order: Vec<&str> = Vec::new();
        let mut grouped: HashMap<&str, Vec<&Opportunity>> = HashMap::new();
        for opp in self.opportunities {
            let entry = grouped.entry(opp.rep_id.as_str()).or_default();
            if entry.is_empty() {
                order.push(opp.rep_id.as_str());
            }
            entry.push(opp);
        }

        let mut entries: Vec<RepPerformanceEntry> = order
            .into_iter()
            .map(|rep_id| {
                let opps = &grouped[rep_id];
                let won: Vec<&&Opportunity> = opps
                    .iter()
                    .filter(|opp| opp.stage == Stage::ClosedWon)
                    .collect();
                let closed_count = opps.iter().filter(|opp| opp.stage.is_closed()).count();

                let win_rate = if closed_count == 0 {
                    0.0
                } else {
                    won.len() as f64 / closed_count as f64 * 100.0
                };

                let (rep_name, territory_id) = match rep_index.get(rep_id) {
                    Some(rep) => (rep.full_name(), rep.territory_id.clone()),
                    // Externally supplied opportunities may reference
                    // reps outside the table we were handed.
                    None => (rep_id.to_string(), String::new()),
                };

                RepPerformanceEntry {
                    rep_id: rep_id.to_string(),
                    rep_name,
                    territory_id,
                    pipeline_value: opps
                        .iter()
                        .filter(|opp| !opp.stage.is_closed())
                        .map(|opp| opp.amount)
                        .sum(),
                    revenue: won.iter().map(|opp| opp.amount).sum(),
                    win_rate,
                    avg_deal_size: opps.iter().map(|opp| opp.amount).sum::<f64>()
                        / opps.len() as f64,
                    total_opps: opps.len(),
                }
            })
            .collect();

        entries.sort_by(|a, b| {
            b.revenue
                .partial_cmp(&a.revenue)
                .unwrap_or(Ordering::Equal)
        });
        entries
    }

    /// Open opportunities expected to close within 90 days of `as_of`.
    pub fn forecast_next_quarter(&self, as_of: NaiveDateTime) -> ForecastSummary {
        let horizon = as_of + Duration::days(90);
        let in_window: Vec<&Opportunity> = self
            .opportunities
            .iter()
            .filter(|opp| !opp.stage.is_closed())
            .filter(|opp| opp.close_date >= as_of && opp.close_date <= horizon)
            .collect();

        ForecastSummary {
            best_case: in_window.iter().map(|opp| opp.amount).sum(),
            weighted: in_window.iter().map(|opp| opp.expected_revenue).sum(),
            conservative: in_window
                .iter()
                .filter(|opp| opp.probability >= 75)
                .map(|opp| opp.amount)
                .sum(),
            opportunities_in_forecast: in_window.len(),
        }
    }

    /// Human-readable findings, one per non-empty condition.
    pub fn data_quality_report(&self, as_of: NaiveDateTime) -> Vec<String> {
        let mut findings = Vec::new();

        let missing_product = self
            .opportunities
            .iter()
            .filter(|opp| opp.product_id.trim().is_empty())
            .count();
        if missing_product > 0 {
            findings.push(format!("Missing product: {missing_product} opportunities"));
        }

        let open_past_due = self
            .opportunities
            .iter()
            .filter(|opp| !opp.stage.is_closed() && opp.close_date < as_of)
            .count();
        if open_past_due > 0 {
            findings.push(format!(
                "Past close date in open stage: {open_past_due} opportunities"
            ));
        }

        let zero_amount = self
            .opportunities
            .iter()
            .filter(|opp| opp.amount == 0.0)
            .count();
        if zero_amount > 0 {
            findings.push(format!("Zero amount: {zero_amount} opportunities"));
        }

        let stale = self
            .opportunities
            .iter()
            .filter(|opp| opp.days_in_stage > 60)
            .count();
        if stale > 0 {
            findings.push(format!("Stale deals (>60 days): {stale} opportunities"));
        }

        if findings.is_empty() {
            findings.push("No data quality issues found".to_string());
        }
        findings
    }

    pub fn report(&self, as_of: NaiveDateTime) -> AnalyticsReport {
        AnalyticsReport {
            key_metrics: self.key_metrics(),
            sales_velocity: self.sales_velocity(),
            pipeline_by_stage: self.pipeline_by_stage(),
            rep_performance: self.rep_performance(),
            forecast_next_quarter: self.forecast_next_quarter(as_of),
            data_quality: self.data_quality_report(as_of),
        }
    }
}
