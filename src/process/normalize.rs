use crate::process::{
    date_parser,
    extract::ExtractedRecord,
    schema::normalized_schema,
    utils::{normalize_company, normalize_product, normalize_state, parse_amount, parse_qty},
};
use anyhow::{Context, Result};
use arrow::{
    array::{Array, ArrayRef, Date32Array, Float64Array, StringArray},
    record_batch::RecordBatch,
};
use std::sync::Arc;
use tracing::debug;

/// Convert extracted text fields into typed, normalized columns.
///
/// Each column is built in one pass over all records, so a column-wide
/// decision (the date format) applies to every row. Bad cells become nulls
/// (or the quantity default), never errors.
pub fn normalize(records: &[ExtractedRecord]) -> Result<RecordBatch> {
    let date = date_column(records.iter().map(|r| r.date.as_str()));
    let edd = date_column(records.iter().map(|r| r.edd.as_str()));

    let total_amount: Float64Array = records
        .iter()
        .map(|r| parse_amount(&r.total_amount))
        .collect();
    let qty: Float64Array = records.iter().map(|r| Some(parse_qty(&r.qty))).collect();

    let inquiry_no = text_column(records, |r| r.inquiry_no.clone());
    let company = text_column(records, |r| normalize_company(&r.company));
    let product = text_column(records, |r| normalize_product(&r.product));
    let state = text_column(records, |r| normalize_state(&r.state));

    debug!(
        rows = records.len(),
        null_dates = date.null_count(),
        null_amounts = total_amount.null_count(),
        null_edd = edd.null_count(),
        "normalized order fields"
    );

    let columns: Vec<ArrayRef> = vec![
        Arc::new(date),
        inquiry_no,
        company,
        product,
        Arc::new(qty),
        state,
        Arc::new(total_amount),
        Arc::new(edd),
    ];
    RecordBatch::try_new(normalized_schema(), columns).context("building normalized batch")
}

fn date_column<'a>(values: impl Iterator<Item = &'a str>) -> Date32Array {
    let values: Vec<&str> = values.collect();
    date_parser::parse_column(&values)
        .into_iter()
        .map(|d| d.map(date_parser::to_date32))
        .collect()
}

fn text_column(records: &[ExtractedRecord], f: impl Fn(&ExtractedRecord) -> String) -> ArrayRef {
    let arr: StringArray = records.iter().map(|r| Some(f(r))).collect();
    Arc::new(arr)
}
