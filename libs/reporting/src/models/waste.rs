//! Waste disposal records

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{ComplianceStatus, DisposalMethod, NumericInput, OwnedRecord, RecordDraft, WasteType};

/// Waste disposal record entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WasteRecord {
    pub id: Uuid,
    #[serde(rename = "waste_record_id")]
    pub display_id: String,
    pub site_name: String,
    pub waste_type: WasteType,
    pub quantity_tons: f64,
    pub disposal_method: DisposalMethod,
    pub reporting_period_start: NaiveDate,
    pub reporting_period_end: NaiveDate,
    pub disposal_date: Option<NaiveDate>,
    pub contractor_name: Option<String>,
    pub regulatory_compliance: ComplianceStatus,
    pub remarks: Option<String>,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Waste record payload as submitted by a client, before validation
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WastePayload {
    pub site_name: Option<String>,
    pub waste_type: Option<String>,
    pub quantity_tons: Option<NumericInput>,
    pub disposal_method: Option<String>,
    pub reporting_period_start: Option<String>,
    pub reporting_period_end: Option<String>,
    pub disposal_date: Option<String>,
    pub contractor_name: Option<String>,
    pub regulatory_compliance: Option<String>,
    pub remarks: Option<String>,
}

/// Validated waste record body
#[derive(Debug, Clone, PartialEq)]
pub struct WasteDraft {
    pub site_name: String,
    pub waste_type: WasteType,
    pub quantity_tons: f64,
    pub disposal_method: DisposalMethod,
    pub reporting_period_start: NaiveDate,
    pub reporting_period_end: NaiveDate,
    pub disposal_date: Option<NaiveDate>,
    pub contractor_name: Option<String>,
    pub regulatory_compliance: ComplianceStatus,
    pub remarks: Option<String>,
}

impl OwnedRecord for WasteRecord {
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
            "waste_type" => Some(self.waste_type.as_str()),
            "disposal_method" => Some(self.disposal_method.as_str()),
            "regulatory_compliance" => Some(self.regulatory_compliance.as_str()),
            _ => None,
        }
    }
}

impl RecordDraft for WasteDraft {
    type Record = WasteRecord;

    fn into_record(self, display_id: String, owner: Uuid, now: DateTime<Utc>) -> WasteRecord {
        WasteRecord {
            id: Uuid::new_v4(),
            display_id,
            site_name: self.site_name,
            waste_type: self.waste_type,
            quantity_tons: self.quantity_tons,
            disposal_method: self.disposal_method,
            reporting_period_start: self.reporting_period_start,
            reporting_period_end: self.reporting_period_end,
            disposal_date: self.disposal_date,
            contractor_name: self.contractor_name,
            regulatory_compliance: self.regulatory_compliance,
            remarks: self.remarks,
            created_by: owner,
            created_at: now,
            updated_at: now,
        }
    }

    fn apply_to(self, record: &mut WasteRecord, now: DateTime<Utc>) {
        record.site_name = self.site_name;
        record.waste_type = self.waste_type;
        record.quantity_tons = self.quantity_tons;
        record.disposal_method = self.disposal_method;
        record.reporting_period_start = self.reporting_period_start;
        record.reporting_period_end = self.reporting_period_end;
        record.disposal_date = self.disposal_date;
        record.contractor_name = self.contractor_name;
        record.regulatory_compliance = self.regulatory_compliance;
        record.remarks = self.remarks;
        record.updated_at = now;
    }
}

impl From<&WasteRecord> for WastePayload {
    fn from(record: &WasteRecord) -> Self {
        WastePayload {
            site_name: Some(record.site_name.clone()),
            waste_type: Some(record.waste_type.as_str().to_string()),
            quantity_tons: Some(record.quantity_tons.into()),
            disposal_method: Some(record.disposal_method.as_str().to_string()),
            reporting_period_start: Some(record.reporting_period_start.to_string()),
            reporting_period_end: Some(record.reporting_period_end.to_string()),
            disposal_date: record.disposal_date.map(|d| d.to_string()),
            contractor_name: record.contractor_name.clone(),
            regulatory_compliance: Some(record.regulatory_compliance.as_str().to_string()),
            remarks: record.remarks.clone(),
        }
    }
}
