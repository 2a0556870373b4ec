use arrow::datatypes::{DataType, Field, Schema, SchemaRef};
use once_cell::sync::Lazy;
use std::sync::Arc;

pub const DATE: &str = "Date";
pub const INQUIRY_NO: &str = "Inquiry_No";
pub const COMPANY: &str = "Company";
pub const PRODUCT: &str = "Product";
pub const QTY: &str = "Qty";
pub const STATE: &str = "State";
pub const TOTAL_AMOUNT: &str = "Total_Amount";
pub const EDD: &str = "EDD";
pub const LEAD_TIME_DAYS: &str = "Lead_Time_Days";
pub const YEAR: &str = "Year";
pub const MONTH: &str = "Month";
pub const MONTH_NAME: &str = "Month_Name";

static NORMALIZED: Lazy<SchemaRef> = Lazy::new(|| Arc::new(Schema::new(base_fields())));

static CLEAN: Lazy<SchemaRef> = Lazy::new(|| {
    let mut fields = base_fields();
    fields.extend([
        Field::new(LEAD_TIME_DAYS, DataType::Int64, true),
        Field::new(YEAR, DataType::Int32, true),
        Field::new(MONTH, DataType::Int32, true),
        Field::new(MONTH_NAME, DataType::Utf8, true),
    ]);
    Arc::new(Schema::new(fields))
});

/// Typed order columns as produced by the normalizer.
fn base_fields() -> Vec<Field> {
    vec![
        Field::new(DATE, DataType::Date32, true),
        Field::new(INQUIRY_NO, DataType::Utf8, false),
        Field::new(COMPANY, DataType::Utf8, false),
        Field::new(PRODUCT, DataType::Utf8, false),
        Field::new(QTY, DataType::Float64, false),
        Field::new(STATE, DataType::Utf8, false),
        Field::new(TOTAL_AMOUNT, DataType::Float64, true),
        Field::new(EDD, DataType::Date32, true),
    ]
}

/// Schema after field normalization.
pub fn normalized_schema() -> SchemaRef {
    NORMALIZED.clone()
}

/// Schema of the clean record set: normalized columns plus derived ones.
pub fn clean_schema() -> SchemaRef {
    CLEAN.clone()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clean_schema_extends_normalized() {
        let normalized = normalized_schema();
        let clean = clean_schema();
        assert_eq!(clean.fields().len(), normalized.fields().len() + 4);
        for (a, b) in normalized.fields().iter().zip(clean.fields().iter()) {
            assert_eq!(a, b);
        }
        assert_eq!(
            clean.field_with_name(LEAD_TIME_DAYS).unwrap().data_type(),
            &DataType::Int64
        );
    }
}
