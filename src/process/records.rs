use crate::process::{column_as, schema::*};
use anyhow::{Context, Result};
use arrow::{
    array::{Array, Date32Array, Float64Array, Int32Array, Int64Array, StringArray},
    record_batch::RecordBatch,
};
use chrono::NaiveDate;
use serde::Serialize;

/// One clean order, row-oriented, for display or JSON output.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct CleanRecord {
    pub date: NaiveDate,
    #[serde(rename = "Inquiry_No")]
    pub inquiry_no: String,
    pub company: String,
    pub product: String,
    pub qty: f64,
    pub state: String,
    #[serde(rename = "Total_Amount")]
    pub total_amount: f64,
    #[serde(rename = "EDD")]
    pub edd: Option<NaiveDate>,
    #[serde(rename = "Lead_Time_Days")]
    pub lead_time_days: Option<i64>,
    pub year: Option<i32>,
    pub month: Option<i32>,
    #[serde(rename = "Month_Name")]
    pub month_name: Option<String>,
}

/// Turn a clean batch into rows. Fails if an essential field is null,
/// which the record filter rules out.
pub fn to_records(batch: &RecordBatch) -> Result<Vec<CleanRecord>> {
    let date = column_as::<Date32Array>(batch, DATE)?;
    let inquiry_no = column_as::<StringArray>(batch, INQUIRY_NO)?;
    let company = column_as::<StringArray>(batch, COMPANY)?;
    let product = column_as::<StringArray>(batch, PRODUCT)?;
    let qty = column_as::<Float64Array>(batch, QTY)?;
    let state = column_as::<StringArray>(batch, STATE)?;
    let amount = column_as::<Float64Array>(batch, TOTAL_AMOUNT)?;
    let edd = column_as::<Date32Array>(batch, EDD)?;
    let lead = column_as::<Int64Array>(batch, LEAD_TIME_DAYS)?;
    let year = column_as::<Int32Array>(batch, YEAR)?;
    let month = column_as::<Int32Array>(batch, MONTH)?;
    let month_name = column_as::<StringArray>(batch, MONTH_NAME)?;

    (0..batch.num_rows())
        .map(|i| {
            let day = date
                .is_valid(i)
                .then(|| date.value_as_date(i))
                .flatten()
                .with_context(|| format!("row {i}: Date is null"))?;
            anyhow::ensure!(amount.is_valid(i), "row {i}: Total_Amount is null");
            Ok(CleanRecord {
                date: day,
                inquiry_no: inquiry_no.value(i).to_string(),
                company: company.value(i).to_string(),
                product: product.value(i).to_string(),
                qty: qty.value(i),
                state: state.value(i).to_string(),
                total_amount: amount.value(i),
                edd: edd.is_valid(i).then(|| edd.value_as_date(i)).flatten(),
                lead_time_days: lead.is_valid(i).then(|| lead.value(i)),
                year: year.is_valid(i).then(|| year.value(i)),
                month: month.is_valid(i).then(|| month.value(i)),
                month_name: month_name.is_valid(i).then(|| month_name.value(i).to_string()),
            })
        })
        .collect()
}
