use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Pipeline phase of an opportunity, in canonical funnel order.
///
/// The two `Closed*` variants are terminal; everything else counts as
/// open pipeline. Serialized with the human labels the CRM exports use
/// ("Closed Won"), not the Rust identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Stage {
    Prospecting,
    Qualification,
    Proposal,
    Negotiation,
    #[serde(rename = "Closed Won")]
    ClosedWon,
    #[serde(rename = "Closed Lost")]
    ClosedLost,
}

impl Stage {
    pub const fn ordered() -> [Self; 6] {
        [
            Self::Prospecting,
            Self::Qualification,
            Self::Proposal,
            Self::Negotiation,
            Self::ClosedWon,
            Self::ClosedLost,
        ]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Prospecting => "Prospecting",
            Self::Qualification => "Qualification",
            Self::Proposal => "Proposal",
            Self::Negotiation => "Negotiation",
            Self::ClosedWon => "Closed Won",
            Self::ClosedLost => "Closed Lost",
        }
    }

    /// Win probability in percent, fixed per stage.
    pub const fn probability(self) -> u8 {
        match self {
            Self::Prospecting => 10,
            Self::Qualification => 25,
            Self::Proposal => 50,
            Self::Negotiation => 75,
            Self::ClosedWon => 100,
            Self::ClosedLost => 0,
        }
    }

    pub const fn is_closed(self) -> bool {
        matches!(self, Self::ClosedWon | Self::ClosedLost)
    }

    /// Zero-based position in the canonical funnel order.
    pub const fn index(self) -> usize {
        match self {
            Self::Prospecting => 0,
            Self::Qualification => 1,
            Self::Proposal => 2,
            Self::Negotiation => 3,
            Self::ClosedWon => 4,
            Self::ClosedLost => 5,
        }
    }

    /// Canonical stage immediately before this one, if any.
    pub fn previous(self) -> Option<Self> {
        let idx = self.index();
        if idx == 0 {
            None
        } else {
            Some(Self::ordered()[idx - 1])
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Territory {
    pub territory_id: String,
    pub territory_name: String,
    pub region: String,
    pub quota_monthly: u32,
    pub active: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SalesRep {
    pub rep_id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub territory_id: String,
    pub hire_date: NaiveDate,
    pub role: String,
    pub quota_annual: u32,
    pub active: bool,
}

impl SalesRep {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    pub product_id: String,
    pub product_name: String,
    pub product_category: String,
    pub unit_price: f64,
    pub recurring: bool,
    pub active: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    pub account_id: String,
    pub account_name: String,
    pub industry: String,
    pub company_size: String,
    pub territory_id: String,
    pub annual_revenue: u64,
    pub website: String,
    pub primary_contact_name: String,
    pub primary_contact_email: String,
    pub account_status: String,
    pub created_date: NaiveDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Opportunity {
    pub opportunity_id: String,
    pub account_id: String,
    pub rep_id: String,
    pub opportunity_name: String,
    pub stage: Stage,
    pub product_id: String,
    pub amount: f64,
    pub probability: u8,
    pub expected_revenue: f64,
    pub close_date: NaiveDateTime,
    pub created_date: NaiveDateTime,
    pub last_modified_date: NaiveDateTime,
    pub days_in_stage: u32,
    pub previous_stage: Option<Stage>,
    pub lead_source: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Activity {
    pub activity_id: String,
    pub opportunity_id: String,
    pub account_id: String,
    pub rep_id: String,
    pub activity_type: String,
    pub activity_date: NaiveDateTime,
    pub duration_minutes: u32,
    pub outcome: String,
}

/// The six generated tables, in dependency order.
#[derive(Debug, Clone, Serialize)]
pub struct SalesDataset {
    pub territories: Vec<Territory>,
    pub sales_reps: Vec<SalesRep>,
    pub products: Vec<Product>,
    pub accounts: Vec<Account>,
    pub opportunities: Vec<Opportunity>,
    pub activities: Vec<Activity>,
}
