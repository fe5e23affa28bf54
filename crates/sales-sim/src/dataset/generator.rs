use super::catalog::{
    standard_products, standard_territories, ACTIVITY_OUTCOMES, ACTIVITY_TYPES, COMPANY_SIZES,
    INDUSTRIES, LEAD_SOURCES,
};
use super::domain::{
    Account, Activity, Opportunity, Product, SalesDataset, SalesRep, Stage, Territory,
};
use super::sampling::{date_between, datetime_between, round2, weighted_choice};
use chrono::{Duration, NaiveDateTime};
use fake::faker::company::en::{CatchPhrase, CompanyName};
use fake::faker::internet::en::SafeEmail;
use fake::faker::name::en::{FirstName, LastName, Name};
use fake::Fake;
use rand::prelude::*;
use rand::rngs::SmallRng;

/// Funnel distribution for newly generated opportunities, aligned with
/// `Stage::ordered()`. Arbitrary weights chosen for plausibility.
const STAGE_WEIGHTS: [f64; 6] = [0.25, 0.25, 0.20, 0.15, 0.10, 0.05];

/// Stream separator so name synthesis draws do not disturb the general
/// sampling sequence while both stay derived from the one seed.
const NAME_STREAM: u64 = 0x9e37_79b9_7f4a_7c15;

#[derive(Debug, thiserror::Error)]
pub enum GeneratorError {
    #[error("cannot sample from {table}: table has no rows")]
    EmptyTable { table: &'static str },
}

/// Row counts for the randomized tables. Territories and products come
/// from fixed catalogs and have no count.
#[derive(Debug, Clone, Copy)]
pub struct DatasetCounts {
    pub sales_reps: usize,
    pub accounts: usize,
    pub opportunities: usize,
    pub activities: usize,
}

impl Default for DatasetCounts {
    fn default() -> Self {
        Self {
            sales_reps: 8,
            accounts: 100,
            opportunities: 200,
            activities: 500,
        }
    }
}

/// Synthesizes the six CRM tables in dependency order.
///
/// Two rng streams are derived from the one seed: `rng` drives general
/// sampling, `names` drives faker name/company synthesis. The clock is
/// injected so a fixed `(seed, now)` pair reproduces every table
/// byte-for-byte.
pub struct SalesDataGenerator {
    rng: SmallRng,
    names: SmallRng,
    now: NaiveDateTime,
}

impl SalesDataGenerator {
    pub fn seeded(seed: u64, now: NaiveDateTime) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(seed),
            names: SmallRng::seed_from_u64(seed ^ NAME_STREAM),
            now,
        }
    }

    pub fn from_entropy(now: NaiveDateTime) -> Self {
        Self::seeded(rand::thread_rng().gen(), now)
    }

    pub fn now(&self) -> NaiveDateTime {
        self.now
    }

    /// Generate every table in dependency order.
    pub fn generate(&mut self, counts: &DatasetCounts) -> Result<SalesDataset, GeneratorError> {
        let territories = self.territories();
        let sales_reps = self.sales_reps(counts.sales_reps);
        let products = self.products();
        let accounts = self.accounts(counts.accounts);
        let opportunities =
            self.opportunities(&accounts, &sales_reps, &products, counts.opportunities)?;
        let activities = self.activities(&opportunities, counts.activities)?;

        Ok(SalesDataset {
            territories,
            sales_reps,
            products,
            accounts,
            opportunities,
            activities,
        })
    }

    /// Fixed catalog, no randomness.
    pub fn territories(&self) -> Vec<Territory> {
        standard_territories()
    }

    /// Fixed catalog, no randomness.
    pub fn products(&self) -> Vec<Product> {
        standard_products()
    }

    pub fn sales_reps(&mut self, count: usize) -> Vec<SalesRep> {
        let territories = standard_territories();
        let hire_window_start = (self.now - Duration::days(365 * 3)).date();
        let hire_window_end = (self.now - Duration::days(182)).date();

        (0..count)
            .map(|i| {
                let territory = &territories[i % territories.len()];
                SalesRep {
                    rep_id: format!("REP-{}", 1000 + i),
                    first_name: FirstName().fake_with_rng(&mut self.names),
                    last_name: LastName().fake_with_rng(&mut self.names),
                    email: SafeEmail().fake_with_rng(&mut self.names),
                    territory_id: territory.territory_id.clone(),
                    hire_date: date_between(&mut self.rng, hire_window_start, hire_window_end),
                    role: "Account Executive".to_string(),
                    quota_annual: self.rng.gen_range(1_000_000..=2_000_000),
                    active: true,
                }
            })
            .collect()
    }

    pub fn accounts(&mut self, count: usize) -> Vec<Account> {
        let territories = standard_territories();
        let created_window_start = self.now - Duration::days(365 * 2);
        let created_window_end = self.now - Duration::days(365);

        (0..count)
            .map(|i| {
                let name: String = CompanyName().fake_with_rng(&mut self.names);
                let website = format!(
                    "https://www.{}.example.com",
                    name.to_lowercase().replace([' ', ',', '.', '\''], "")
                );
                let territory = territories
                    .choose(&mut self.rng)
                    .expect("territory catalog is never empty");

                Account {
                    account_id: format!("ACC-{}", 2000 + i),
                    account_name: name,
                    industry: pick(&mut self.rng, &INDUSTRIES),
                    company_size: pick(&mut self.rng, &COMPANY_SIZES),
                    territory_id: territory.territory_id.clone(),
                    annual_revenue: self.rng.gen_range(1_000_000..=50_000_000),
                    website,
                    primary_contact_name: Name().fake_with_rng(&mut self.names),
                    primary_contact_email: SafeEmail().fake_with_rng(&mut self.names),
                    account_status: "Active".to_string(),
                    created_date: datetime_between(
                        &mut self.rng,
                        created_window_start,
                        created_window_end,
                    ),
                }
            })
            .collect()
    }

    pub fn opportunities(
        &mut self,
        accounts: &[Account],
        sales_reps: &[SalesRep],
        products: &[Product],
        count: usize,
    ) -> Result<Vec<Opportunity>, GeneratorError> {
        if accounts.is_empty() {
            return Err(GeneratorError::EmptyTable { table: "accounts" });
        }
        if sales_reps.is_empty() {
            return Err(GeneratorError::EmptyTable {
                table: "sales_reps",
            });
        }
        if products.is_empty() {
            return Err(GeneratorError::EmptyTable { table: "products" });
        }

        let created_window_start = self.now - Duration::days(182);
        let stages = Stage::ordered();

        let mut opportunities = Vec::with_capacity(count);
        for i in 0..count {
            let created_date =
                datetime_between(&mut self.rng, created_window_start, self.now);

            let draw: f64 = self.rng.gen();
            let stage = *weighted_choice(&stages, &STAGE_WEIGHTS, draw)
                .expect("stage catalog is never empty");
            let probability = stage.probability();

            let product = products
                .choose(&mut self.rng)
                .expect("products checked non-empty above");
            let amount = round2(
                product.unit_price
                    * self.rng.gen_range(0.5..3.0)
                    * self.rng.gen_range(1..=10) as f64,
            );

            let close_date = if stage.is_closed() {
                created_date + Duration::days(self.rng.gen_range(30..=120))
            } else {
                self.now + Duration::days(self.rng.gen_range(15..=90))
            };

            let days_in_stage =
                self.rng.gen_range(5..=45) + (stage.index() as u32) * 5;

            let account = accounts
                .choose(&mut self.rng)
                .expect("accounts checked non-empty above");
            let rep = sales_reps
                .choose(&mut self.rng)
                .expect("sales_reps checked non-empty above");
            let catch_phrase: String = CatchPhrase().fake_with_rng(&mut self.names);

            opportunities.push(Opportunity {
                opportunity_id: format!("OPP-{}", 3000 + i),
                account_id: account.account_id.clone(),
                rep_id: rep.rep_id.clone(),
                opportunity_name: format!("{} - {}", catch_phrase, product.product_name),
                stage,
                product_id: product.product_id.clone(),
                amount,
                probability,
                expected_revenue: round2(amount * f64::from(probability) / 100.0),
                close_date,
                created_date,
                last_modified_date: self.now,
                days_in_stage,
                previous_stage: stage.previous(),
                lead_source: pick(&mut self.rng, &LEAD_SOURCES),
            });
        }

        Ok(opportunities)
    }

    pub fn activities(
        &mut self,
        opportunities: &[Opportunity],
        count: usize,
    ) -> Result<Vec<Activity>, GeneratorError> {
        if opportunities.is_empty() {
            return Err(GeneratorError::EmptyTable {
                table: "opportunities",
            });
        }

        let mut activities = Vec::with_capacity(count);
        for i in 0..count {
            let opportunity = opportunities
                .choose(&mut self.rng)
                .expect("opportunities checked non-empty above");

            activities.push(Activity {
                activity_id: format!("ACT-{}", 4000 + i),
                opportunity_id: opportunity.opportunity_id.clone(),
                account_id: opportunity.account_id.clone(),
                rep_id: opportunity.rep_id.clone(),
                activity_type: pick(&mut self.rng, &ACTIVITY_TYPES),
                activity_date: datetime_between(
                    &mut self.rng,
                    opportunity.created_date,
                    self.now,
                ),
                duration_minutes: self.rng.gen_range(15..=120),
                outcome: pick(&mut self.rng, &ACTIVITY_OUTCOMES),
            });
        }

        Ok(activities)
    }
}

fn pick<R: Rng + ?Sized>(rng: &mut R, options: &[&str]) -> String {
    options
        .choose(rng)
        .expect("catalog slices are never empty")
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn fixed_now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 3, 15)
            .and_then(|d| d.and_hms_opt(12, 0, 0))
            .expect("valid timestamp")
    }

    fn small_counts() -> DatasetCounts {
        DatasetCounts {
            sales_reps: 6,
            accounts: 20,
            opportunities: 60,
            activities: 90,
        }
    }

    #[test]
    fn reps_round_robin_across_territories() {
        let mut generator = SalesDataGenerator::seeded(1, fixed_now());
        let reps = generator.sales_reps(6);
        assert_eq!(reps[0].territory_id, "TERR-NW");
        assert_eq!(reps[3].territory_id, "TERR-SW");
        assert_eq!(reps[4].territory_id, "TERR-NW");
        assert!(reps
            .iter()
            .all(|rep| (1_000_000..=2_000_000).contains(&rep.quota_annual)));
    }

    #[test]
    fn rep_hire_dates_stay_in_window() {
        let now = fixed_now();
        let mut generator = SalesDataGenerator::seeded(9, now);
        let earliest = (now - Duration::days(365 * 3)).date();
        let latest = (now - Duration::days(182)).date();
        for rep in generator.sales_reps(50) {
            assert!(rep.hire_date >= earliest && rep.hire_date <= latest);
        }
    }

    #[test]
    fn opportunity_probability_matches_stage() {
        let mut generator = SalesDataGenerator::seeded(3, fixed_now());
        let dataset = generator.generate(&small_counts()).expect("generates");
        for opp in &dataset.opportunities {
            assert_eq!(opp.probability, opp.stage.probability());
            assert_eq!(
                opp.expected_revenue,
                round2(opp.amount * f64::from(opp.probability) / 100.0)
            );
            assert_eq!(opp.previous_stage, opp.stage.previous());
        }
    }

    #[test]
    fn close_dates_respect_stage_semantics() {
        let now = fixed_now();
        let mut generator = SalesDataGenerator::seeded(4, now);
        let dataset = generator.generate(&small_counts()).expect("generates");
        for opp in &dataset.opportunities {
            if opp.stage.is_closed() {
                assert!(opp.close_date >= opp.created_date);
            } else {
                assert!(opp.close_date >= now);
            }
        }
    }

    #[test]
    fn references_resolve_to_parent_tables() {
        let mut generator = SalesDataGenerator::seeded(5, fixed_now());
        let dataset = generator.generate(&small_counts()).expect("generates");

        for rep in &dataset.sales_reps {
            assert!(dataset
                .territories
                .iter()
                .any(|t| t.territory_id == rep.territory_id));
        }
        for account in &dataset.accounts {
            assert!(dataset
                .territories
                .iter()
                .any(|t| t.territory_id == account.territory_id));
        }
        for opp in &dataset.opportunities {
            assert!(dataset
                .accounts
                .iter()
                .any(|a| a.account_id == opp.account_id));
            assert!(dataset.sales_reps.iter().any(|r| r.rep_id == opp.rep_id));
            assert!(dataset
                .products
                .iter()
                .any(|p| p.product_id == opp.product_id));
        }
        for activity in &dataset.activities {
            let opp = dataset
                .opportunities
                .iter()
                .find(|o| o.opportunity_id == activity.opportunity_id)
                .expect("activity references an opportunity");
            assert_eq!(activity.account_id, opp.account_id);
            assert_eq!(activity.rep_id, opp.rep_id);
            assert!(activity.activity_date >= opp.created_date);
            assert!(activity.activity_date <= generator.now());
            assert!((15..=120).contains(&activity.duration_minutes));
        }
    }

    #[test]
    fn seeded_runs_reproduce_every_table() {
        let counts = small_counts();
        let first = SalesDataGenerator::seeded(42, fixed_now())
            .generate(&counts)
            .expect("generates");
        let second = SalesDataGenerator::seeded(42, fixed_now())
            .generate(&counts)
            .expect("generates");

        let left = serde_json::to_string(&first).expect("serializes");
        let right = serde_json::to_string(&second).expect("serializes");
        assert_eq!(left, right);
    }

    #[test]
    fn distinct_seeds_diverge() {
        let counts = small_counts();
        let first = SalesDataGenerator::seeded(1, fixed_now())
            .generate(&counts)
            .expect("generates");
        let second = SalesDataGenerator::seeded(2, fixed_now())
            .generate(&counts)
            .expect("generates");
        assert_ne!(
            serde_json::to_string(&first.opportunities).expect("serializes"),
            serde_json::to_string(&second.opportunities).expect("serializes"),
        );
    }

    #[test]
    fn empty_dependency_tables_fail_fast() {
        let mut generator = SalesDataGenerator::seeded(6, fixed_now());
        let reps = generator.sales_reps(2);
        let products = generator.products();

        let err = generator
            .opportunities(&[], &reps, &products, 10)
            .expect_err("empty accounts must error");
        assert!(err.to_string().contains("accounts"));

        let err = generator
            .activities(&[], 10)
            .expect_err("empty opportunities must error");
        assert!(err.to_string().contains("opportunities"));
    }
}
