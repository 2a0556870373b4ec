// src/stats.rs
use crate::process::{
    column_as,
    date_parser::from_date32,
    schema::{DATE, QTY, STATE, TOTAL_AMOUNT},
};
use anyhow::Result;
use arrow::{
    array::{Date32Array, Float64Array, StringArray},
    record_batch::RecordBatch,
};
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::HashMap;

/// Reported when there is no state to rank.
pub const NO_TOP_STATE: &str = "N/A";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

/// Headline numbers for the dashboard, recomputed from the clean set on demand.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryStats {
    pub total_orders: usize,
    pub total_revenue: f64,
    pub total_qty: f64,
    /// `None` when there are no orders.
    pub avg_order: Option<f64>,
    pub top_state: String,
    pub date_range: Option<DateRange>,
}

impl Default for SummaryStats {
    fn default() -> Self {
        Self {
            total_orders: 0,
            total_revenue: 0.0,
            total_qty: 0.0,
            avg_order: None,
            top_state: NO_TOP_STATE.to_string(),
            date_range: None,
        }
    }
}

/// Summarize a clean record set. An empty set gives [`SummaryStats::default`].
pub fn aggregate(batch: &RecordBatch) -> Result<SummaryStats> {
    if batch.num_rows() == 0 {
        return Ok(SummaryStats::default());
    }

    let amount = column_as::<Float64Array>(batch, TOTAL_AMOUNT)?;
    let qty = column_as::<Float64Array>(batch, QTY)?;
    let state = column_as::<StringArray>(batch, STATE)?;
    let date = column_as::<Date32Array>(batch, DATE)?;

    let total_orders = batch.num_rows();
    let total_revenue: f64 = amount.iter().map(|v| v.unwrap_or(0.0)).sum();
    let total_qty: f64 = qty.iter().flatten().sum();

    Ok(SummaryStats {
        total_orders,
        total_revenue,
        total_qty,
        avg_order: Some(total_revenue / total_orders as f64),
        top_state: top_state(state, amount).unwrap_or_else(|| NO_TOP_STATE.to_string()),
        date_range: date_range(date),
    })
}

/// State with the highest summed amount; ties go to the state seen first.
fn top_state(state: &StringArray, amount: &Float64Array) -> Option<String> {
    // groups in first-seen order
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut totals: Vec<(&str, f64)> = Vec::new();
    for (s, a) in state.iter().zip(amount.iter()) {
        let Some(s) = s else { continue };
        let a = a.unwrap_or(0.0);
        match index.get(s) {
            Some(&i) => totals[i].1 += a,
            None => {
                index.insert(s, totals.len());
                totals.push((s, a));
            }
        }
    }

    let mut best: Option<(&str, f64)> = None;
    for (s, total) in totals {
        if best.map_or(true, |(_, b)| total > b) {
            best = Some((s, total));
        }
    }
    best.map(|(s, _)| s.to_string())
}

fn date_range(date: &Date32Array) -> Option<DateRange> {
    let start = date.iter().flatten().min()?;
    let end = date.iter().flatten().max()?;
    Some(DateRange {
        start: from_date32(start)?,
        end: from_date32(end)?,
    })
}
