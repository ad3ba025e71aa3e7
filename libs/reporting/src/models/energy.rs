//! Energy consumption records

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{EnergyType, NumericInput, OwnedRecord, RecordDraft};

/// Energy consumption record entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnergyRecord {
    pub id: Uuid,
    #[serde(rename = "energy_record_id")]
    pub display_id: String,
    pub site_name: String,
    pub reporting_period_start: NaiveDate,
    pub reporting_period_end: NaiveDate,
    pub energy_type: EnergyType,
    pub consumption_mwh: f64,
    pub cost: Option<f64>,
    pub supplier_name: Option<String>,
    pub energy_source_mix: Option<String>,
    pub reduction_target_mwh: Option<f64>,
    pub remarks: Option<String>,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Energy record payload as submitted by a client, before validation
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EnergyPayload {
    pub site_name: Option<String>,
    pub reporting_period_start: Option<String>,
    pub reporting_period_end: Option<String>,
    pub energy_type: Option<String>,
    pub consumption_mwh: Option<NumericInput>,
    pub cost: Option<NumericInput>,
    pub supplier_name: Option<String>,
    pub energy_source_mix: Option<String>,
    pub reduction_target_mwh: Option<NumericInput>,
    pub remarks: Option<String>,
}

/// Validated energy record body
#[derive(Debug, Clone, PartialEq)]
pub struct EnergyDraft {
    pub site_name: String,
    pub reporting_period_start: NaiveDate,
    pub reporting_period_end: NaiveDate,
    pub energy_type: EnergyType,
    pub consumption_mwh: f64,
    pub cost: Option<f64>,
    pub supplier_name: Option<String>,
    pub energy_source_mix: Option<String>,
    pub reduction_target_mwh: Option<f64>,
    pub remarks: Option<String>,
}

impl OwnedRecord for EnergyRecord {
    fn id(&self) -> Uuid {
        self.id
    }

    fn display_id(&self) -> &str {
        &self.display_id
    }

    fn created_by(&self) -> Uuid {
        self.created_by
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    fn site_name(&self) -> &str {
        &self.site_name
    }

    fn category(&self, column: &str) -> Option<&str> {
        match column {
            "energy_type" => Some(self.energy_type.as_str()),
            _ => None,
        }
    }
}

impl RecordDraft for EnergyDraft {
    type Record = EnergyRecord;

    fn into_record(self, display_id: String, owner: Uuid, now: DateTime<Utc>) -> EnergyRecord {
        EnergyRecord {
            id: Uuid::new_v4(),
            display_id,
            site_name: self.site_name,
            reporting_period_start: self.reporting_period_start,
            reporting_period_end: self.reporting_period_end,
            energy_type: self.energy_type,
            consumption_mwh: self.consumption_mwh,
            cost: self.cost,
            supplier_name: self.supplier_name,
            energy_source_mix: self.energy_source_mix,
            reduction_target_mwh: self.reduction_target_mwh,
            remarks: self.remarks,
            created_by: owner,
            created_at: now,
            updated_at: now,
        }
    }

    fn apply_to(self, record: &mut EnergyRecord, now: DateTime<Utc>) {
        record.site_name = self.site_name;
        record.reporting_period_start = self.reporting_period_start;
        record.reporting_period_end = self.reporting_period_end;
        record.energy_type = self.energy_type;
        record.consumption_mwh = self.consumption_mwh;
        record.cost = self.cost;
        record.supplier_name = self.supplier_name;
        record.energy_source_mix = self.energy_source_mix;
        record.reduction_target_mwh = self.reduction_target_mwh;
        record.remarks = self.remarks;
        record.updated_at = now;
    }
}

impl From<&EnergyRecord> for EnergyPayload {
    /// Rebuild the submission that would reproduce a stored record
    fn from(record: &EnergyRecord) -> Self {
        EnergyPayload {
            site_name: Some(record.site_name.clone()),
            reporting_period_start: Some(record.reporting_period_start.to_string()),
            reporting_period_end: Some(record.reporting_period_end.to_string()),
            energy_type: Some(record.energy_type.as_str().to_string()),
            consumption_mwh: Some(record.consumption_mwh.into()),
            cost: record.cost.map(Into::into),
            supplier_name: record.supplier_name.clone(),
            energy_source_mix: record.energy_source_mix.clone(),
            reduction_target_mwh: record.reduction_target_mwh.map(Into::into),
            remarks: record.remarks.clone(),
        }
    }
}
