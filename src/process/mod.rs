// src/process/mod.rs
pub mod date_parser;
pub mod derive;
pub mod extract;
pub mod filter;
pub mod normalize;
pub mod raw_table;
pub mod records;
pub mod schema;
pub mod utils;

pub use raw_table::RawTable;
pub use records::CleanRecord;

use anyhow::{anyhow, Result};
use arrow::{array::Array, record_batch::RecordBatch};
use serde::Serialize;
use tracing::info;

/// Row counts at each stage of one pipeline run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PipelineReport {
    /// Data rows handed to the extractor (header excluded).
    pub raw_rows: usize,
    pub extracted: usize,
    /// Rows dropped by the extractor (too few columns).
    pub skipped_rows: usize,
    /// Records dropped for a missing Date or Total_Amount.
    pub dropped_records: usize,
    pub clean_records: usize,
}

/// The clean record set of one run plus how it was arrived at.
#[derive(Debug, Clone)]
pub struct CleanOrders {
    pub batch: RecordBatch,
    pub report: PipelineReport,
}

impl CleanOrders {
    pub fn len(&self) -> usize {
        self.batch.num_rows()
    }

    pub fn is_empty(&self) -> bool {
        self.batch.num_rows() == 0
    }
}

/// Run extract → normalize → derive → filter over the data rows of a table.
///
/// Malformed input never makes this fail: bad rows are skipped, bad cells
/// become nulls and incomplete records are dropped. Errors only come from
/// building Arrow batches.
#[tracing::instrument(level = "info", skip(rows), fields(rows = rows.len()))]
pub fn clean_rows(rows: &[Vec<String>]) -> Result<CleanOrders> {
    let extracted = extract::extract(rows);
    let normalized = normalize::normalize(&extracted)?;
    let derived = derive::derive(&normalized)?;
    let batch = filter::filter(&derived)?;

    let report = PipelineReport {
        raw_rows: rows.len(),
        extracted: extracted.len(),
        skipped_rows: rows.len() - extracted.len(),
        dropped_records: derived.num_rows() - batch.num_rows(),
        clean_records: batch.num_rows(),
    };
    info!(
        raw_rows = report.raw_rows,
        skipped = report.skipped_rows,
        dropped = report.dropped_records,
        clean = report.clean_records,
        "cleaned order rows"
    );

    Ok(CleanOrders { batch, report })
}

/// [`clean_rows`] over a fetched table (its header row is already split off).
pub fn clean_table(table: &RawTable) -> Result<CleanOrders> {
    clean_rows(&table.rows)
}

/// Typed view of a named column.
pub fn column_as<'a, T: Array + 'static>(batch: &'a RecordBatch, name: &str) -> Result<&'a T> {
    batch
        .column_by_name(name)
        .ok_or_else(|| anyhow!("missing column {name}"))?
        .as_any()
        .downcast_ref::<T>()
        .ok_or_else(|| anyhow!("column {name} has unexpected type"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::process::schema::*;
    use arrow::array::{Date32Array, Float64Array, Int32Array, Int64Array, StringArray};
    use chrono::NaiveDate;
    use tracing_subscriber::{EnvFilter, FmtSubscriber};

    fn init_test_logging() {
        let subscriber = FmtSubscriber::builder()
            .with_env_filter(
                EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| EnvFilter::new("info,ordersheet::process=debug")),
            )
            .with_test_writer()
            .finish();
        let _ = tracing::subscriber::set_global_default(subscriber);
    }

    fn row(cells: &[&str]) -> Vec<String> {
        cells.iter().map(|s| s.to_string()).collect()
    }

    /// A 19-cell sheet row with the order columns filled in.
    fn order(date: &str, company: &str, qty: &str, state: &str, amount: &str, edd: &str) -> Vec<String> {
        let mut r = vec![String::new(); 19];
        r[0] = date.into();
        r[1] = "INQ1".into();
        r[2] = "X".into();
        r[3] = company.into();
        r[7] = qty.into();
        r[8] = state.into();
        r[14] = amount.into();
        r[18] = edd.into();
        r
    }

    #[test]
    fn scenario_row_end_to_end() -> Result<()> {
        init_test_logging();
        let rows = vec![row(&[
            "15/03/2024",
            "INQ1",
            "X",
            "ACME India",
            "",
            "",
            "",
            "",
            "Delhi",
            "",
            "",
            "",
            "",
            "",
            "₹50,000",
            "",
            "",
            "",
            "25/03/2024",
        ])];
        let out = clean_rows(&rows)?;
        assert_eq!(out.len(), 1);
        let b = &out.batch;

        assert_eq!(
            column_as::<Date32Array>(b, DATE)?.value_as_date(0),
            NaiveDate::from_ymd_opt(2024, 3, 15)
        );
        assert_eq!(column_as::<StringArray>(b, COMPANY)?.value(0), "Acme India");
        assert_eq!(column_as::<StringArray>(b, PRODUCT)?.value(0), "");
        assert_eq!(column_as::<Float64Array>(b, TOTAL_AMOUNT)?.value(0), 50000.0);
        assert_eq!(column_as::<Float64Array>(b, QTY)?.value(0), 1.0);
        assert_eq!(column_as::<Int64Array>(b, LEAD_TIME_DAYS)?.value(0), 10);
        assert_eq!(column_as::<Int32Array>(b, YEAR)?.value(0), 2024);
        assert_eq!(column_as::<Int32Array>(b, MONTH)?.value(0), 3);
        assert_eq!(column_as::<StringArray>(b, MONTH_NAME)?.value(0), "March");
        Ok(())
    }

    #[test]
    fn report_counts_each_stage() -> Result<()> {
        let rows = vec![
            order("01/03/2024", "a", "2", "Goa", "100", ""),
            row(&["too", "short"]),
            order("02/03/2024", "b", "", "Goa", "abc", ""),
            order("", "c", "", "Goa", "300", ""),
            order("04/03/2024", "d", "1", "Goa", "400", ""),
        ];
        let out = clean_rows(&rows)?;
        assert_eq!(
            out.report,
            PipelineReport {
                raw_rows: 5,
                extracted: 4,
                skipped_rows: 1,
                dropped_records: 2,
                clean_records: 2,
            }
        );
        Ok(())
    }

    #[test]
    fn essential_fields_never_null_after_cleaning() -> Result<()> {
        let rows = vec![
            order("01/03/2024", "a", "x", " n/a ", "₹1,23,456.00", "bad"),
            order("junk", "b", "-1", "", "10", ""),
            order("03/03/2024", "c", "0", "kerala", "", "05/03/2024"),
        ];
        let out = clean_rows(&rows)?;
        let b = &out.batch;
        assert_eq!(column_as::<Date32Array>(b, DATE)?.null_count(), 0);
        assert_eq!(column_as::<Float64Array>(b, TOTAL_AMOUNT)?.null_count(), 0);
        assert_eq!(column_as::<Float64Array>(b, TOTAL_AMOUNT)?.value(0), 123456.0);
        assert_eq!(column_as::<StringArray>(b, STATE)?.value(0), "Not Specified");
        assert!(column_as::<Float64Array>(b, QTY)?.iter().flatten().all(|q| q > 0.0));
        assert_eq!(out.len(), 1);
        Ok(())
    }

    #[test]
    fn pipeline_is_idempotent() -> Result<()> {
        let rows = vec![
            order("01/03/2024", "a", "2", "Goa", "100", "05/03/2024"),
            order("02/03/2024", "b", "", "delhi", "₹2,000", ""),
        ];
        let first = clean_rows(&rows)?;
        let second = clean_rows(&rows)?;
        assert_eq!(first.batch, second.batch);
        assert_eq!(first.report, second.report);
        Ok(())
    }

    #[test]
    fn empty_table_is_fine() -> Result<()> {
        let out = clean_table(&RawTable::default())?;
        assert!(out.is_empty());
        assert_eq!(out.batch.schema(), clean_schema());
        assert_eq!(out.report, PipelineReport::default());
        Ok(())
    }
}
