//! API models for request and response payloads

use reporting::{
    filter::{EnergyFilter, Pagination, Predicate, RecordFilter, WasteFilter},
    models::UserProfile,
    validation::FieldErrors,
};
use serde::{Deserialize, Serialize};

/// Response envelope shared by every endpoint
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub errors: Option<FieldErrors>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            errors: None,
            message: None,
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

impl ApiResponse<()> {
    /// Success without a payload
    pub fn done(message: impl Into<String>) -> Self {
        Self {
            success: true,
            data: None,
            error: None,
            errors: None,
            message: Some(message.into()),
        }
    }

    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error.into()),
            errors: None,
            message: None,
        }
    }

    pub fn invalid(errors: FieldErrors) -> Self {
        Self {
            success: false,
            data: None,
            error: None,
            errors: Some(errors),
            message: None,
        }
    }
}

/// Body returned by register and login
#[derive(Debug, Serialize, Deserialize)]
pub struct SessionData {
    pub user: UserProfile,
    pub token: String,
}

/// Body returned by `/auth/me`
#[derive(Debug, Serialize, Deserialize)]
pub struct CurrentUserData {
    pub user: UserProfile,
}

/// Query parameters of a record list or export
pub trait ListQuery {
    fn predicates(&self) -> Vec<Predicate>;
    fn pagination(&self) -> Pagination;
}

/// Query parameters of `GET /energy`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EnergyListQuery {
    pub site_name: Option<String>,
    pub energy_type: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl ListQuery for EnergyListQuery {
    fn predicates(&self) -> Vec<Predicate> {
        EnergyFilter {
            site_name: self.site_name.clone(),
            energy_type: self.energy_type.clone(),
        }
        .predicates()
    }

    fn pagination(&self) -> Pagination {
        Pagination::new(self.limit, self.offset)
    }
}

/// Query parameters of `GET /waste`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WasteListQuery {
    pub site_name: Option<String>,
    pub waste_type: Option<String>,
    pub regulatory_compliance: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl ListQuery for WasteListQuery {
    fn predicates(&self) -> Vec<Predicate> {
        WasteFilter {
            site_name: self.site_name.clone(),
            waste_type: self.waste_type.clone(),
            regulatory_compliance: self.regulatory_compliance.clone(),
        }
        .predicates()
    }

    fn pagination(&self) -> Pagination {
        Pagination::new(self.limit, self.offset)
    }
}
