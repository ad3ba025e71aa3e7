//! CSV rendering of record lists

use anyhow::Result;
use serde::Serialize;

/// Export columns of an energy record, in field order
pub const ENERGY_COLUMNS: &[&str] = &[
    "id",
    "energy_record_id",
    "site_name",
    "reporting_period_start",
    "reporting_period_end",
    "energy_type",
    "consumption_mwh",
    "cost",
    "supplier_name",
    "energy_source_mix",
    "reduction_target_mwh",
    "remarks",
    "created_by",
    "created_at",
    "updated_at",
];

/// Export columns of a waste record, in field order
pub const WASTE_COLUMNS: &[&str] = &[
    "id",
    "waste_record_id",
    "site_name",
    "waste_type",
    "quantity_tons",
    "disposal_method",
    "reporting_period_start",
    "reporting_period_end",
    "disposal_date",
    "contractor_name",
    "regulatory_compliance",
    "remarks",
    "created_by",
    "created_at",
    "updated_at",
];

/// Render records as CSV with a header row, even when there are none
pub fn to_csv<R: Serialize>(columns: &[&str], records: &[R]) -> Result<String> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(Vec::new());

    writer.write_record(columns)?;
    for record in records {
        writer.serialize(record)?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| anyhow::anyhow!("Failed to flush CSV output: {}", e))?;
    Ok(String::from_utf8(bytes)?)
}
