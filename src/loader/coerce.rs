//! Type Coercion Stage
//!
//! Cleans currency/numeric-looking text columns into Float64 and the order
//! date column into a temporal value. Values that fail to parse become null
//! rather than raising. The whole pass is idempotent: a second run over an
//! already-coerced frame is a no-op.

use crate::error::Result;
use polars::prelude::*;

/// Canonical names whose values are cleaned and parsed as numbers.
pub const NUMERIC_CANDIDATES: &[&str] = &[
    // sales numeric columns
    "qty",
    "revenue",
    "amount",
    "gross_amt",
    // expense numeric columns (amount-like)
    "received_amount",
    "recived_amount",
    "expense_amount",
    // pricing and margin datasets
    "tp",
    "tp_1",
    "tp_2",
    "mrp_old",
    "final_mrp",
    "final_mrp_old",
    // marketplace MRPs
    "ajio_mrp",
    "amazon_mrp",
    "amazon_fba_mrp",
    "flipkart_mrp",
    "limeroad_mrp",
    "myntra_mrp",
    "paytm_mrp",
    "snapdeal_mrp",
];

/// Canonical order date column.
pub const ORDER_DATE_COLUMN: &str = "order_date";

/// Strip thousands separators, the currency symbol, and the trailing
/// slash-dash unit marker, then parse as Float64. Re-stripping already-clean
/// text is a no-op, so the expression is idempotent over its own output.
fn clean_numeric_expr(name: &str) -> Expr {
    col(name)
        .str()
        .replace_all(lit(","), lit(""), true)
        .str()
        .replace_all(lit("₹"), lit(""), true)
        .str()
        .replace_all(lit("/-"), lit(""), true)
        .str()
        .strip_chars(lit(NULL))
        .cast(DataType::Float64)
        .alias(name)
}

/// Coerce numeric-candidate and order-date columns in place.
pub fn coerce_columns(df: DataFrame) -> Result<DataFrame> {
    let mut frame = df;

    for name in NUMERIC_CANDIDATES {
        let dtype = match frame.column(name) {
            Ok(column) => column.dtype().clone(),
            Err(_) => continue,
        };

        match dtype {
            DataType::Float64 => {}
            DataType::String => {
                frame = frame
                    .lazy()
                    .with_columns([clean_numeric_expr(name)])
                    .collect()?;
            }
            dt if dt.is_numeric() => {
                frame = frame
                    .lazy()
                    .with_columns([col(name).cast(DataType::Float64)])
                    .collect()?;
            }
            _ => {}
        }
    }

    if let Ok(column) = frame.column(ORDER_DATE_COLUMN) {
        if matches!(column.dtype(), DataType::String) {
            let options = StrptimeOptions {
                strict: false,
                ..Default::default()
            };
            frame = frame
                .lazy()
                .with_columns([col(ORDER_DATE_COLUMN)
                    .str()
                    .to_datetime(
                        Some(TimeUnit::Microseconds),
                        None,
                        options,
                        lit("raise"),
                    )
                    .alias(ORDER_DATE_COLUMN)])
                .collect()?;
        }
    }

    Ok(frame)
}
