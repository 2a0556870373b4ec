use serde::Serialize;
use tracing::{debug, trace};

/// Rows shorter than this are incomplete form submissions.
pub const MIN_COLUMNS: usize = 19;

// Sheet columns: A=0, B=1, D=3, G=6, H=7, I=8, O=14, S=18
const COL_DATE: usize = 0;
const COL_INQUIRY_NO: usize = 1;
const COL_COMPANY: usize = 3;
const COL_PRODUCT: usize = 6;
const COL_QTY: usize = 7;
const COL_STATE: usize = 8;
const COL_TOTAL_AMOUNT: usize = 14;
const COL_EDD: usize = 18;

/// The order fields of one sheet row, still as raw cell text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ExtractedRecord {
    pub date: String,
    pub inquiry_no: String,
    pub company: String,
    pub product: String,
    pub qty: String,
    pub state: String,
    pub total_amount: String,
    pub edd: String,
}

impl ExtractedRecord {
    /// Copy the order columns out of `row`; `None` if any of them is missing.
    pub fn from_row(row: &[String]) -> Option<Self> {
        let cell = |i: usize| row.get(i).cloned();
        Some(Self {
            date: cell(COL_DATE)?,
            inquiry_no: cell(COL_INQUIRY_NO)?,
            company: cell(COL_COMPANY)?,
            product: cell(COL_PRODUCT)?,
            qty: cell(COL_QTY)?,
            state: cell(COL_STATE)?,
            total_amount: cell(COL_TOTAL_AMOUNT)?,
            edd: cell(COL_EDD)?,
        })
    }
}

/// Pick the order columns out of every data row (header already removed).
/// Short or otherwise unusable rows are skipped without error.
pub fn extract(rows: &[Vec<String>]) -> Vec<ExtractedRecord> {
    let out: Vec<ExtractedRecord> = rows
        .iter()
        .enumerate()
        .filter_map(|(idx, row)| {
            if row.len() < MIN_COLUMNS {
                trace!(row = idx, cells = row.len(), "short row skipped");
                return None;
            }
            ExtractedRecord::from_row(row)
        })
        .collect();

    debug!(
        rows = rows.len(),
        extracted = out.len(),
        "extracted order records"
    );
    out
}
