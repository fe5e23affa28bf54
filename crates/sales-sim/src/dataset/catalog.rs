use super::domain::{Product, Territory};

/// Static territory catalog: (id, name, region, monthly quota).
const TERRITORIES: [(&str, &str, &str, u32); 4] = [
    ("TERR-NW", "Northwest", "Pacific Northwest", 500_000),
    ("TERR-MW", "Mountain West", "Mountain", 450_000),
    ("TERR-PAC", "Pacific", "West Coast", 600_000),
    ("TERR-SW", "Southwest", "Southwest", 480_000),
];

/// Static product catalog: (id, name, category, unit price, recurring).
const PRODUCTS: [(&str, &str, &str, f64, bool); 5] = [
    ("PROD-001", "Fiber Internet", "Connectivity", 2_500.0, true),
    ("PROD-002", "Dark Fiber", "Infrastructure", 15_000.0, true),
    ("PROD-003", "Ethernet", "Connectivity", 1_800.0, true),
    ("PROD-004", "Cloud Connect", "Cloud Services", 3_200.0, true),
    (
        "PROD-005",
        "Managed Services",
        "Professional Services",
        5_000.0,
        false,
    ),
];

pub const INDUSTRIES: [&str; 6] = [
    "Technology",
    "Healthcare",
    "Finance",
    "Manufacturing",
    "Retail",
    "Education",
];

pub const COMPANY_SIZES: [&str; 4] = [
    "Small (1-50)",
    "Medium (51-200)",
    "Large (201-1000)",
    "Enterprise (1000+)",
];

pub const LEAD_SOURCES: [&str; 5] =
    ["Website", "Referral", "Cold Call", "Trade Show", "Partner"];

pub const ACTIVITY_TYPES: [&str; 5] = ["Call", "Email", "Meeting", "Demo", "Proposal Review"];

pub const ACTIVITY_OUTCOMES: [&str; 4] =
    ["Positive", "Neutral", "Needs Follow-up", "No Response"];

pub fn standard_territories() -> Vec<Territory> {
    TERRITORIES
        .into_iter()
        .map(|(id, name, region, quota)| Territory {
            territory_id: id.to_string(),
            territory_name: name.to_string(),
            region: region.to_string(),
            quota_monthly: quota,
            active: true,
        })
        .collect()
}

pub fn standard_products() -> Vec<Product> {
    PRODUCTS
        .into_iter()
        .map(|(id, name, category, price, recurring)| Product {
            product_id: id.to_string(),
            product_name: name.to_string(),
            product_category: category.to_string(),
            unit_price: price,
            recurring,
            active: true,
        })
        .collect()
}
