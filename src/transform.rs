use polars::prelude::*;
use tracing::warn;

use crate::constants::{
    LAST_REVIEW_COL, LAST_REVIEW_FORMAT, LATITUDE_COL, LONGITUDE_COL, MAX_LATITUDE, MAX_LONGITUDE,
    MIN_LATITUDE, MIN_LONGITUDE, PRICE_COL,
};
use crate::error::{CleaningError, Result};

fn require_columns(df: &DataFrame, columns: &[&str]) -> Result<()> {
    for &column in columns {
        if df.column(column).is_err() {
            return Err(CleaningError::MissingColumn(column.to_string()));
        }
    }
    Ok(())
}

/// Keep rows with `min_price <= price <= max_price`, inclusive on both ends.
/// Rows with a null price are dropped.
///
/// An inverted range is not an error; it yields an empty frame, matching the
/// upstream step. A warning is logged so an all-empty output is diagnosable.
pub fn filter_price_range(df: DataFrame, min_price: i64, max_price: i64) -> Result<DataFrame> {
    require_columns(&df, &[PRICE_COL])?;
    if min_price > max_price {
        warn!(
            min_price,
            max_price, "min_price exceeds max_price; the price filter will drop every row"
        );
    }
    let filtered = df
        .lazy()
        .filter(
            col(PRICE_COL)
                .gt_eq(lit(min_price))
                .and(col(PRICE_COL).lt_eq(lit(max_price))),
        )
        .collect()?;
    Ok(filtered)
}

/// Parse `last_review` into a Date column. Unparseable or missing values
/// become null rather than failing the run. A column that is already typed
/// as Date passes through untouched, which keeps the step idempotent.
pub fn normalize_last_review(df: DataFrame) -> Result<DataFrame> {
    require_columns(&df, &[LAST_REVIEW_COL])?;
    if df.column(LAST_REVIEW_COL)?.dtype() == &DataType::Date {
        return Ok(df);
    }
    let normalized = df
        .lazy()
        .with_column(
            col(LAST_REVIEW_COL)
                .cast(DataType::String)
                .str()
                .to_date(StrptimeOptions {
                    format: Some(LAST_REVIEW_FORMAT.into()),
                    strict: false,
                    exact: true,
                    cache: true,
                }),
        )
        .collect()?;
    Ok(normalized)
}

/// Keep rows inside the fixed geographic bounding box. Rows with null
/// coordinates are dropped.
pub fn filter_bounding_box(df: DataFrame) -> Result<DataFrame> {
    require_columns(&df, &[LONGITUDE_COL, LATITUDE_COL])?;
    let filtered = df
        .lazy()
        .filter(
            col(LONGITUDE_COL)
                .gt_eq(lit(MIN_LONGITUDE))
                .and(col(LONGITUDE_COL).lt_eq(lit(MAX_LONGITUDE)))
                .and(col(LATITUDE_COL).gt_eq(lit(MIN_LATITUDE)))
                .and(col(LATITUDE_COL).lt_eq(lit(MAX_LATITUDE))),
        )
        .collect()?;
    Ok(filtered)
}
