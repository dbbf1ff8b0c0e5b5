use std::collections::HashMap;
use std::sync::OnceLock;

use clap::ValueEnum;
use serde::Serialize;

use crate::error::DashboardError;

/// One intent category: the label shown in the UI and the prefix of its
/// `*_sessions` / `*_messages` columns in the dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Category {
    pub label: &'static str,
    pub prefix: &'static str,
}

/// The fixed intent registry. Declaration order is the display order used
/// for category selection; the set never changes after startup.
///
/// "Payment Acceptence" keeps the misspelled display label the dataset's
/// consumers already know, while its columns use the corrected
/// `payment_acceptance` prefix (the loader renames the legacy headers).
pub const CATEGORIES: [Category; 12] = [
    Category { label: "Soundbox Hardware", prefix: "sb_hardware" },
    Category { label: "Device Return", prefix: "device_return" },
    Category { label: "Business Loan", prefix: "business_loan" },
    Category { label: "Customer Care", prefix: "customer_care" },
    Category { label: "Profile", prefix: "profile" },
    Category { label: "EDC Hardware", prefix: "edc_hardware" },
    Category { label: "Payment Acceptence", prefix: "payment_acceptance" },
    Category { label: "Refund", prefix: "refund" },
    Category { label: "Rental Charges", prefix: "rental_charges" },
    Category { label: "Generic Query", prefix: "generic_query" },
    Category { label: "Settlement & Deductions", prefix: "settlement_deductions" },
    Category { label: "Others", prefix: "other" },
];

/// Which of the two per-category counters a chart plots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricKind {
    Sessions,
    Messages,
}

impl MetricKind {
    pub fn suffix(&self) -> &'static str {
        match self {
            MetricKind::Sessions => "sessions",
            MetricKind::Messages => "messages",
        }
    }

    /// Derive the dataset column name for a category prefix.
    pub fn column_for(&self, prefix: &str) -> String {
        format!("{}_{}", prefix, self.suffix())
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            MetricKind::Sessions => "Sessions",
            MetricKind::Messages => "Messages",
        }
    }
}

/// Look up a category by its display label.
pub fn lookup(label: &str) -> Result<&'static Category, DashboardError> {
    CATEGORIES
        .iter()
        .find(|c| c.label == label)
        .ok_or_else(|| DashboardError::UnknownCategory(label.to_string()))
}

static COLUMN_TO_LABEL: OnceLock<HashMap<String, &'static str>> = OnceLock::new();

/// Reverse index from derived column name back to the category label.
/// Built once at first use; replaces prefix scanning with exact lookups
/// (all 12 prefixes are mutually non-prefixing, so this is unambiguous).
pub fn label_for_column(column: &str) -> Option<&'static str> {
    let index = COLUMN_TO_LABEL.get_or_init(|| {
        let mut map = HashMap::with_capacity(CATEGORIES.len() * 2);
        for category in &CATEGORIES {
            for kind in [MetricKind::Sessions, MetricKind::Messages] {
                map.insert(kind.column_for(category.prefix), category.label);
            }
        }
        map
    });
    index.get(column).copied()
}
