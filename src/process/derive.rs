use crate::process::{
    column_as,
    date_parser::from_date32,
    schema::{clean_schema, DATE, EDD},
};
use anyhow::{Context, Result};
use arrow::{
    array::{ArrayRef, Date32Array, Int32Array, Int64Array, StringArray},
    record_batch::RecordBatch,
};
use chrono::{Datelike, NaiveDate};
use std::sync::Arc;

/// Append lead time and calendar columns computed from the normalized dates.
///
/// Lead time is `EDD - Date` in days and may be negative; every derived
/// value is null when the date it depends on is null.
pub fn derive(batch: &RecordBatch) -> Result<RecordBatch> {
    let date = column_as::<Date32Array>(batch, DATE)?;
    let edd = column_as::<Date32Array>(batch, EDD)?;

    let lead_time: Int64Array = date
        .iter()
        .zip(edd.iter())
        .map(|(d, e)| Some(i64::from(e?) - i64::from(d?)))
        .collect();

    let dates: Vec<Option<NaiveDate>> = date.iter().map(|d| d.and_then(from_date32)).collect();
    let year: Int32Array = dates.iter().map(|d| d.map(|d| d.year())).collect();
    let month: Int32Array = dates.iter().map(|d| d.map(|d| d.month() as i32)).collect();
    let month_name: StringArray = dates
        .iter()
        .map(|d| d.map(|d| d.format("%B").to_string()))
        .collect();

    let mut columns: Vec<ArrayRef> = batch.columns().to_vec();
    columns.extend([
        Arc::new(lead_time) as ArrayRef,
        Arc::new(year),
        Arc::new(month),
        Arc::new(month_name),
    ]);
    RecordBatch::try_new(clean_schema(), columns).context("building derived batch")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::process::{
        extract::ExtractedRecord,
        normalize::normalize,
        schema::{LEAD_TIME_DAYS, MONTH, MONTH_NAME, YEAR},
    };
    use arrow::array::Array;

    fn rec(date: &str, edd: &str) -> ExtractedRecord {
        ExtractedRecord {
            date: date.into(),
            edd: edd.into(),
            total_amount: "100".into(),
            ..Default::default()
        }
    }

    #[test]
    fn lead_time_and_calendar() -> Result<()> {
        let batch = derive(&normalize(&[
            rec("15/03/2024", "25/03/2024"),
            rec("20/12/2023", "18/12/2023"),
        ])?)?;

        let lead = column_as::<Int64Array>(&batch, LEAD_TIME_DAYS)?;
        assert_eq!(lead.value(0), 10);
        assert_eq!(lead.value(1), -2);

        let year = column_as::<Int32Array>(&batch, YEAR)?;
        let month = column_as::<Int32Array>(&batch, MONTH)?;
        let name = column_as::<StringArray>(&batch, MONTH_NAME)?;
        assert_eq!((year.value(0), month.value(0), name.value(0)), (2024, 3, "March"));
        assert_eq!((year.value(1), month.value(1), name.value(1)), (2023, 12, "December"));
        Ok(())
    }

    #[test]
    fn nulls_propagate() -> Result<()> {
        let batch = derive(&normalize(&[
            rec("15/03/2024", ""),
            rec("", "25/03/2024"),
        ])?)?;

        let lead = column_as::<Int64Array>(&batch, LEAD_TIME_DAYS)?;
        assert!(lead.is_null(0));
        assert!(lead.is_null(1));

        let year = column_as::<Int32Array>(&batch, YEAR)?;
        assert!(year.is_valid(0));
        assert!(year.is_null(1));
        assert!(column_as::<Int32Array>(&batch, MONTH)?.is_null(1));
        assert!(column_as::<StringArray>(&batch, MONTH_NAME)?.is_null(1));
        Ok(())
    }
}
