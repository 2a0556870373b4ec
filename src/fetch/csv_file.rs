// src/fetch/csv_file.rs
use crate::{fetch::FetchError, process::RawTable};
use csv::ReaderBuilder;
use std::{fs::File, io::Read, path::Path};

/// Load a CSV export of the order sheet. Rows may have differing cell counts.
pub fn load_table(path: impl AsRef<Path>) -> Result<RawTable, FetchError> {
    let file = File::open(path)?;
    parse_table(file)
}

pub fn parse_table<R: Read>(reader: R) -> Result<RawTable, FetchError> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true) // short rows are handled by the extractor
        .from_reader(reader);

    let mut values = Vec::new();
    for record in rdr.records() {
        let record = record?;
        values.push(record.iter().map(str::to_string).collect::<Vec<_>>());
    }
    Ok(RawTable::from_values(values))
}
