//! Reporting domain models

pub mod energy;
pub mod kinds;
pub mod user;
pub mod waste;

use chrono::{DateTime, Utc};
use serde::Deserialize;
use uuid::Uuid;

// Re-export for convenience
pub use energy::{EnergyDraft, EnergyPayload, EnergyRecord};
pub use kinds::{ComplianceStatus, DisposalMethod, EnergyType, UnknownLabel, WasteType};
pub use user::{LoginCredentials, User, UserPayload, UserProfile, normalize_email};
pub use waste::{WasteDraft, WastePayload, WasteRecord};

/// Common view over stored energy and waste records
pub trait OwnedRecord {
    /// Internal primary key
    fn id(&self) -> Uuid;
    /// Human-facing sequential identifier (`EN-000001`, `WS-000001`)
    fn display_id(&self) -> &str;
    /// The user that created the record and alone may mutate it
    fn created_by(&self) -> Uuid;
    fn created_at(&self) -> DateTime<Utc>;
    fn updated_at(&self) -> DateTime<Utc>;
    fn site_name(&self) -> &str;
    /// Value of a categorical column by its column name, used by list filters
    fn category(&self, column: &str) -> Option<&str>;
}

/// A validated, fully typed record body
///
/// Drafts are what validation produces; they become stored records on
/// insert and replace every user-editable field on update.
pub trait RecordDraft {
    type Record: OwnedRecord;

    fn into_record(self, display_id: String, owner: Uuid, now: DateTime<Utc>) -> Self::Record;

    fn apply_to(self, record: &mut Self::Record, now: DateTime<Utc>);
}

/// A numeric form field that may arrive as a JSON number or as text
#[derive(Debug, Clone, PartialEq, Deserialize, serde::Serialize)]
#[serde(untagged)]
pub enum NumericInput {
    Number(f64),
    Text(String),
}

impl NumericInput {
    /// The finite value carried by the field, if it parses
    pub fn value(&self) -> Option<f64> {
        let value = match self {
            NumericInput::Number(n) => *n,
            NumericInput::Text(s) => s.trim().parse::<f64>().ok()?,
        };

        value.is_finite().then_some(value)
    }

    /// True for a text field that holds only whitespace
    pub fn is_blank(&self) -> bool {
        matches!(self, NumericInput::Text(s) if s.trim().is_empty())
    }
}

impl From<f64> for NumericInput {
    fn from(value: f64) -> Self {
        NumericInput::Number(value)
    }
}

/// Treat blank optional text as absent
pub(crate) fn non_blank(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}
