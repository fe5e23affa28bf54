use chrono::NaiveDate;
use sales_sim::dataset::{DatasetCounts, SalesDataGenerator, Stage};
use sales_sim::export::{export_dataset, EXPORT_FILES};

fn run_timestamp() -> chrono::NaiveDateTime {
    NaiveDate::from_ymd_opt(2026, 5, 1)
        .and_then(|d| d.and_hms_opt(8, 30, 0))
        .expect("valid run timestamp")
}

#[test]
fn default_counts_produce_full_dataset() {
    let mut generator = SalesDataGenerator::seeded(42, run_timestamp());
    let dataset = generator
        .generate(&DatasetCounts::default())
        .expect("default generation succeeds");

    assert_eq!(dataset.territories.len(), 4);
    assert_eq!(dataset.sales_reps.len(), 8);
    assert_eq!(dataset.products.len(), 5);
    assert_eq!(dataset.accounts.len(), 100);
    assert_eq!(dataset.opportunities.len(), 200);
    assert_eq!(dataset.activities.len(), 500);
}

#[test]
fn generated_invariants_hold_across_seeds() {
    let now = run_timestamp();
    let counts = DatasetCounts {
        sales_reps: 5,
        accounts: 30,
        opportunities: 120,
        activities: 200,
    };

    for seed in [1_u64, 7, 42, 999] {
        let dataset = SalesDataGenerator::seeded(seed, now)
            .generate(&counts)
            .expect("generation succeeds");

        for opp in &dataset.opportunities {
            assert_eq!(opp.probability, opp.stage.probability());
            let recomputed =
                (opp.amount * f64::from(opp.probability) / 100.0 * 100.0).round() / 100.0;
            assert_eq!(opp.expected_revenue, recomputed);
            assert!((opp.amount * 100.0).round() / 100.0 == opp.amount);
            if opp.stage.is_closed() {
                assert!(opp.close_date >= opp.created_date);
            } else {
                assert!(opp.close_date >= now);
            }
            assert!(opp.days_in_stage >= 5);
        }

        for activity in &dataset.activities {
            assert!(activity.activity_date <= now);
        }
    }
}

#[test]
fn stage_mix_covers_open_and_closed_pipeline() {
    let dataset = SalesDataGenerator::seeded(42, run_timestamp())
        .generate(&DatasetCounts::default())
        .expect("generation succeeds");

    // With 200 draws over the fixed weights, both halves of the funnel
    // are expected to be occupied.
    let open = dataset
        .opportunities
        .iter()
        .filter(|o| !o.stage.is_closed())
        .count();
    let closed = dataset.opportunities.len() - open;
    assert!(open > 0, "open pipeline should not be empty");
    assert!(closed > 0, "closed opportunities should appear");
    assert!(dataset
        .opportunities
        .iter()
        .any(|o| o.stage == Stage::Prospecting));
}

#[test]
fn export_round_trips_against_generated_tables() {
    let dataset = SalesDataGenerator::seeded(8, run_timestamp())
        .generate(&DatasetCounts {
            sales_reps: 4,
            accounts: 12,
            opportunities: 25,
            activities: 40,
        })
        .expect("generation succeeds");

    let dir = tempfile::tempdir().expect("temp dir");
    let written = export_dataset(&dataset, dir.path()).expect("export succeeds");
    assert_eq!(written.len(), EXPORT_FILES.len());

    let opportunities = std::fs::read_to_string(dir.path().join("opportunities.csv"))
        .expect("opportunities.csv readable");
    assert_eq!(opportunities.lines().count(), 1 + dataset.opportunities.len());
    assert!(opportunities.contains("OPP-3000"));

    let reps =
        std::fs::read_to_string(dir.path().join("sales_reps.csv")).expect("sales_reps readable");
    assert!(reps.starts_with("rep_id,first_name,last_name,email,territory_id"));
}
