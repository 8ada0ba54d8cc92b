//! Dataset type detection and canonical column aliasing
//!
//! Both tables are declarative data: a signal set that labels a dataset, and
//! an alias map that folds spelling variants onto canonical names. The label
//! selects which aliases and summary blocks apply; it never gates
//! question-answering.

use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Domain-indicative column names. Two or more hits label a dataset `Sales`.
/// A heuristic, not a guarantee: sparsely-named sales data and coincidental
/// generic names are accepted misclassifications.
const SALES_SIGNALS: &[&str] = &[
    "order_id",
    "order_date",
    "date",
    "category",
    "style",
    "sku",
    "qty",
    "pcs",
    "amount",
    "revenue",
    "gross_amt",
    "state",
    "ship_state",
];

const SALES_SIGNAL_THRESHOLD: usize = 2;

lazy_static! {
    /// Spelling variants folded onto one canonical column name. Applied only
    /// to datasets labelled `Sales`.
    static ref CANONICAL_COLUMNS: HashMap<&'static str, &'static str> = [
        ("order_id", "order_id"),
        ("orderid", "order_id"),
        ("date", "order_date"),
        ("order_date", "order_date"),
        ("category", "category"),
        ("style", "category"),
        ("product", "category"),
        ("qty", "qty"),
        ("quantity", "qty"),
        ("pcs", "qty"),
        ("amount", "revenue"),
        ("revenue", "revenue"),
        ("gross_amt", "revenue"),
        ("state", "state"),
        ("ship_state", "state"),
        ("city", "city"),
        ("ship_city", "city"),
        ("country", "country"),
        ("ship_country", "country"),
        ("status", "status"),
    ]
    .into_iter()
    .collect();
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DatasetKind {
    Sales,
    Generic,
}

impl std::fmt::Display for DatasetKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DatasetKind::Sales => write!(f, "sales"),
            DatasetKind::Generic => write!(f, "generic"),
        }
    }
}

/// Label a dataset from its normalized (pre-alias) column names.
pub fn detect_dataset_kind(columns: &[String]) -> DatasetKind {
    let hits = columns
        .iter()
        .filter(|c| SALES_SIGNALS.contains(&c.as_str()))
        .count();

    if hits >= SALES_SIGNAL_THRESHOLD {
        DatasetKind::Sales
    } else {
        DatasetKind::Generic
    }
}

/// Apply the canonical alias map to a name sequence. Names without an alias
/// pass through unchanged; aliasing can create repeats, which the
/// deduplicator resolves afterwards.
pub fn apply_canonical_aliases(columns: &[String]) -> Vec<String> {
    columns
        .iter()
        .map(|c| {
            CANONICAL_COLUMNS
                .get(c.as_str())
                .map(|v| v.to_string())
                .unwrap_or_else(|| c.clone())
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn order_id_and_revenue_label_sales() {
        assert_eq!(
            detect_dataset_kind(&names(&["order_id", "revenue"])),
            DatasetKind::Sales
        );
    }

    #[test]
    fn name_and_description_label_generic() {
        assert_eq!(
            detect_dataset_kind(&names(&["name", "description"])),
            DatasetKind::Generic
        );
    }

    #[test]
    fn one_signal_is_not_enough() {
        assert_eq!(
            detect_dataset_kind(&names(&["amount", "notes"])),
            DatasetKind::Generic
        );
    }

    #[test]
    fn aliases_fold_variants_onto_canonical_names() {
        let out = apply_canonical_aliases(&names(&["gross_amt", "pcs", "ship_state", "sku"]));
        assert_eq!(out, vec!["revenue", "qty", "state", "sku"]);
    }

    #[test]
    fn aliasing_may_introduce_repeats() {
        let out = apply_canonical_aliases(&names(&["amount", "revenue"]));
        assert_eq!(out, vec!["revenue", "revenue"]);
    }
}
