// src/export.rs
use crate::{
    process::{CleanOrders, PipelineReport},
    stats::SummaryStats,
};
use anyhow::{Context, Result};
use arrow::record_batch::RecordBatch;
use chrono::{DateTime, Utc};
use parquet::{
    arrow::ArrowWriter,
    basic::{BrotliLevel, Compression},
    file::properties::WriterProperties,
};
use serde::Serialize;
use std::{
    fs::{self, File},
    path::{Path, PathBuf},
};
use tracing::info;

pub const ORDERS_FILE: &str = "orders.parquet";
pub const SUMMARY_FILE: &str = "summary.json";

#[derive(Debug, Serialize)]
struct Summary<'a> {
    generated_at: DateTime<Utc>,
    stats: &'a SummaryStats,
    report: &'a PipelineReport,
}

/// Write the clean record set as a single Parquet file. Returns bytes written.
pub fn write_parquet(batch: &RecordBatch, path: &Path) -> Result<u64> {
    let tmp = tmp_path(path);
    let file =
        File::create(&tmp).with_context(|| format!("creating file {}", tmp.display()))?;

    let props = WriterProperties::builder()
        .set_compression(Compression::BROTLI(BrotliLevel::try_new(5)?))
        .build();

    let mut writer =
        ArrowWriter::try_new(file, batch.schema(), Some(props)).context("creating parquet writer")?;
    writer.write(batch).context("writing batch to parquet")?;
    writer.close().context("closing parquet writer")?;

    fs::rename(&tmp, path).with_context(|| format!("renaming to {}", path.display()))?;
    let metadata = fs::metadata(path).context("getting file metadata")?;
    Ok(metadata.len())
}

pub fn write_summary_json(stats: &SummaryStats, report: &PipelineReport, path: &Path) -> Result<()> {
    let summary = Summary {
        generated_at: Utc::now(),
        stats,
        report,
    };
    let json = serde_json::to_vec_pretty(&summary).context("serializing summary")?;
    let tmp = tmp_path(path);
    fs::write(&tmp, json).with_context(|| format!("writing {}", tmp.display()))?;
    fs::rename(&tmp, path).with_context(|| format!("renaming to {}", path.display()))?;
    Ok(())
}

/// Write `orders.parquet` and `summary.json` into `dir`, creating it if needed.
pub fn export_all(orders: &CleanOrders, stats: &SummaryStats, dir: &Path) -> Result<()> {
    fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;
    let bytes = write_parquet(&orders.batch, &dir.join(ORDERS_FILE))?;
    write_summary_json(stats, &orders.report, &dir.join(SUMMARY_FILE))?;
    info!(dir = %dir.display(), rows = orders.len(), bytes, "exported orders");
    Ok(())
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".tmp");
    path.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        process::{clean_rows, schema::clean_schema},
        stats::aggregate,
    };
    use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
    use tempfile::tempdir;

    fn order(date: &str, state: &str, amount: &str) -> Vec<String> {
        let mut r = vec![String::new(); 19];
        r[0] = date.into();
        r[8] = state.into();
        r[14] = amount.into();
        r[18] = "20/03/2024".into();
        r
    }

    #[test]
    fn parquet_reads_back_identically() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join(ORDERS_FILE);
        let out = clean_rows(&[
            order("01/03/2024", "goa", "100"),
            order("02/03/2024", "delhi", "₹2,500"),
        ])?;

        let bytes = write_parquet(&out.batch, &path)?;
        assert!(bytes > 0);
        assert!(!tmp_path(&path).exists());

        let mut reader = ParquetRecordBatchReaderBuilder::try_new(File::open(&path)?)?.build()?;
        let back = reader.next().transpose()?.expect("one batch");
        assert_eq!(back.schema(), clean_schema());
        assert_eq!(back, out.batch);
        Ok(())
    }

    #[test]
    fn empty_set_still_writes_schema() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join(ORDERS_FILE);
        let out = clean_rows(&[])?;
        write_parquet(&out.batch, &path)?;

        let builder = ParquetRecordBatchReaderBuilder::try_new(File::open(&path)?)?;
        assert_eq!(builder.schema(), &clean_schema());
        Ok(())
    }

    #[test]
    fn export_all_writes_both_files() -> Result<()> {
        let dir = tempdir()?;
        let target = dir.path().join("out");
        let out = clean_rows(&[order("01/03/2024", "goa", "100"), vec!["short".into()]])?;
        let stats = aggregate(&out.batch)?;

        export_all(&out, &stats, &target)?;
        assert!(target.join(ORDERS_FILE).exists());

        let json: serde_json::Value =
            serde_json::from_slice(&fs::read(target.join(SUMMARY_FILE))?)?;
        assert_eq!(json["stats"]["total_orders"], 1);
        assert_eq!(json["stats"]["top_state"], "Goa");
        assert_eq!(json["report"]["skipped_rows"], 1);
        assert!(json["generated_at"].is_string());
        Ok(())
    }
}
