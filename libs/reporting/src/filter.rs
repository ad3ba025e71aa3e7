//! List filtering and pagination
//!
//! Optional query parameters become a list of [`Predicate`]s. The in-memory
//! store evaluates them directly against records, and the SQL store turns
//! each one into a bound `AND` clause.

use serde::{Deserialize, Serialize};

use crate::models::{EnergyRecord, OwnedRecord, WasteRecord};

/// Default page size for record lists
pub const DEFAULT_LIMIT: i64 = 100;
/// Largest page size a client may request
pub const MAX_LIMIT: i64 = 1000;

/// A single list filter
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Predicate {
    /// Case-insensitive substring match on the site name
    SiteNameContains(String),
    /// Exact match on a categorical column
    CategoryEquals { column: &'static str, value: String },
}

impl Predicate {
    pub fn matches<R: OwnedRecord>(&self, record: &R) -> bool {
        match self {
            Predicate::SiteNameContains(needle) => record
                .site_name()
                .to_lowercase()
                .contains(&needle.to_lowercase()),
            Predicate::CategoryEquals { column, value } => {
                record.category(column) == Some(value.as_str())
            }
        }
    }
}

/// Query-string filters understood by a record list
pub trait RecordFilter<R: OwnedRecord> {
    fn predicates(&self) -> Vec<Predicate>;

    fn matches(&self, record: &R) -> bool {
        self.predicates().iter().all(|p| p.matches(record))
    }
}

/// Filters accepted by the energy record list
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EnergyFilter {
    pub site_name: Option<String>,
    pub energy_type: Option<String>,
}

impl RecordFilter<EnergyRecord> for EnergyFilter {
    fn predicates(&self) -> Vec<Predicate> {
        let mut predicates = Vec::new();
        if let Some(site) = present(&self.site_name) {
            predicates.push(Predicate::SiteNameContains(site));
        }
        if let Some(value) = present(&self.energy_type) {
            predicates.push(Predicate::CategoryEquals {
                column: "energy_type",
                value,
            });
        }
        predicates
    }
}

/// Filters accepted by the waste record list
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WasteFilter {
    pub site_name: Option<String>,
    pub waste_type: Option<String>,
    pub regulatory_compliance: Option<String>,
}

impl RecordFilter<WasteRecord> for WasteFilter {
    fn predicates(&self) -> Vec<Predicate> {
        let mut predicates = Vec::new();
        if let Some(site) = present(&self.site_name) {
            predicates.push(Predicate::SiteNameContains(site));
        }
        if let Some(value) = present(&self.waste_type) {
            predicates.push(Predicate::CategoryEquals {
                column: "waste_type",
                value,
            });
        }
        if let Some(value) = present(&self.regulatory_compliance) {
            predicates.push(Predicate::CategoryEquals {
                column: "regulatory_compliance",
                value,
            });
        }
        predicates
    }
}

fn present(value: &Option<String>) -> Option<String> {
    value.as_ref().filter(|v| !v.is_empty()).cloned()
}

/// Limit and offset of a record list page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub limit: i64,
    pub offset: i64,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            limit: DEFAULT_LIMIT,
            offset: 0,
        }
    }
}

impl Pagination {
    /// Build from optional query values, clamping into a usable range
    pub fn new(limit: Option<i64>, offset: Option<i64>) -> Self {
        Self {
            limit: limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT),
            offset: offset.unwrap_or(0).max(0),
        }
    }

    /// The window of `items` this page covers
    pub fn window<T: Clone>(&self, items: &[T]) -> Vec<T> {
        items
            .iter()
            .skip(self.offset as usize)
            .take(self.limit as usize)
            .cloned()
            .collect()
    }

    pub fn info(&self, total: i64) -> PageInfo {
        PageInfo {
            total,
            limit: self.limit,
            offset: self.offset,
            has_more: self.offset.saturating_add(self.limit) < total,
        }
    }
}

/// Pagination block of a list response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageInfo {
    pub total: i64,
    pub limit: i64,
    pub offset: i64,
    #[serde(rename = "hasMore")]
    pub has_more: bool,
}

/// One page of records
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page<T> {
    pub records: Vec<T>,
    pub pagination: PageInfo,
}

impl<T> Page<T> {
    pub fn new(records: Vec<T>, total: i64, pagination: Pagination) -> Self {
        Self {
            records,
            pagination: pagination.info(total),
        }
    }
}
