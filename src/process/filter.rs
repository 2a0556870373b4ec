use crate::process::schema::{DATE, TOTAL_AMOUNT};
use anyhow::{anyhow, Context, Result};
use arrow::{
    compute::{and, filter_record_batch, is_not_null},
    record_batch::RecordBatch,
};

/// Keep only records with both essential fields (Date, Total_Amount).
/// Order is preserved; nulls in any other column are left alone.
pub fn filter(batch: &RecordBatch) -> Result<RecordBatch> {
    let date = batch
        .column_by_name(DATE)
        .ok_or_else(|| anyhow!("missing column {DATE}"))?;
    let amount = batch
        .column_by_name(TOTAL_AMOUNT)
        .ok_or_else(|| anyhow!("missing column {TOTAL_AMOUNT}"))?;

    let keep = and(&is_not_null(date)?, &is_not_null(amount)?)?;
    filter_record_batch(batch, &keep).context("filtering incomplete records")
}
