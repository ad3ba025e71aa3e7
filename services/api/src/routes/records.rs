//! Energy and waste record handlers
//!
//! Both record kinds expose the same routes; the handlers here are generic
//! over a [`RecordKind`] describing the record type, its payload, its
//! repository, and its statistics.

use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::{StatusCode, header},
    response::IntoResponse,
};
use axum_extra::extract::WithRejection;
use chrono::{DateTime, Utc};
use reporting::{
    filter::Page,
    models::{EnergyPayload, EnergyRecord, OwnedRecord, RecordDraft, WastePayload, WasteRecord},
    record_id::{ENERGY_PREFIX, WASTE_PREFIX, allocate_display_id},
    stats::{EnergyStats, WasteStats, energy_stats, waste_stats},
    validation::{FieldErrors, check_energy_record, check_waste_record},
};
use serde::{Serialize, de::DeserializeOwned};
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

use super::internal;
use crate::{
    error::{ApiError, ApiResult},
    export::{ENERGY_COLUMNS, WASTE_COLUMNS, to_csv},
    middleware::AuthUser,
    models::{ApiResponse, EnergyListQuery, ListQuery, WasteListQuery},
    repositories::RecordRepository,
    state::AppState,
};

/// A record type served under its own route prefix
pub trait RecordKind: Send + Sync + 'static {
    type Record: OwnedRecord + Serialize + Clone + Send + Sync + 'static;
    type Payload: DeserializeOwned + Send + 'static;
    type Draft: RecordDraft<Record = Self::Record> + Send;
    type Query: ListQuery + DeserializeOwned + Send + 'static;
    type Stats: Serialize + Send;

    const PREFIX: &'static str;
    /// Capitalized name used in messages, e.g. "Energy record"
    const LABEL: &'static str;
    const CSV_COLUMNS: &'static [&'static str];
    const EXPORT_FILENAME: &'static str;

    fn repository(state: &AppState) -> &Arc<dyn RecordRepository<Self::Record>>;
    fn check(payload: &Self::Payload) -> Result<Self::Draft, FieldErrors>;
    fn stats(records: &[Self::Record], now: DateTime<Utc>) -> Self::Stats;

    fn noun() -> String {
        Self::LABEL.to_lowercase()
    }

    fn not_found() -> ApiError {
        ApiError::NotFound(format!("{} not found", Self::LABEL))
    }
}

pub struct Energy;

impl RecordKind for Energy {
    type Record = EnergyRecord;
    type Payload = EnergyPayload;
    type Draft = reporting::models::EnergyDraft;
    type Query = EnergyListQuery;
    type Stats = EnergyStats;

    const PREFIX: &'static str = ENERGY_PREFIX;
    const LABEL: &'static str = "Energy record";
    const CSV_COLUMNS: &'static [&'static str] = ENERGY_COLUMNS;
    const EXPORT_FILENAME: &'static str = "energy-records.csv";

    fn repository(state: &AppState) -> &Arc<dyn RecordRepository<EnergyRecord>> {
        &state.energy_repository
    }

    fn check(payload: &EnergyPayload) -> Result<Self::Draft, FieldErrors> {
        check_energy_record(payload)
    }

    fn stats(records: &[EnergyRecord], now: DateTime<Utc>) -> EnergyStats {
        energy_stats(records, now)
    }
}

pub struct Waste;

impl RecordKind for Waste {
    type Record = WasteRecord;
    type Payload = WastePayload;
    type Draft = reporting::models::WasteDraft;
    type Query = WasteListQuery;
    type Stats = WasteStats;

    const PREFIX: &'static str = WASTE_PREFIX;
    const LABEL: &'static str = "Waste record";
    const CSV_COLUMNS: &'static [&'static str] = WASTE_COLUMNS;
    const EXPORT_FILENAME: &'static str = "waste-records.csv";

    fn repository(state: &AppState) -> &Arc<dyn RecordRepository<WasteRecord>> {
        &state.waste_repository
    }

    fn check(payload: &WastePayload) -> Result<Self::Draft, FieldErrors> {
        check_waste_record(payload)
    }

    fn stats(records: &[WasteRecord], now: DateTime<Utc>) -> WasteStats {
        waste_stats(records, now)
    }
}

fn parse_id<K: RecordKind>(raw: &str) -> ApiResult<Uuid> {
    Uuid::parse_str(raw).map_err(|_| K::not_found())
}

/// Fetch a record the acting user owns
async fn find_owned<K: RecordKind>(
    state: &AppState,
    user: &AuthUser,
    raw_id: &str,
    denied: &str,
) -> ApiResult<K::Record> {
    let id = parse_id::<K>(raw_id)?;
    let record = K::repository(state)
        .find_by_id(id)
        .await
        .map_err(internal(format!("Failed to fetch {}", K::noun())))?
        .ok_or_else(K::not_found)?;

    if record.created_by() != user.id {
        return Err(ApiError::Forbidden(denied.to_string()));
    }

    Ok(record)
}

/// List the acting user's records
pub async fn list<K: RecordKind>(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    WithRejection(Query(query), _): WithRejection<Query<K::Query>, ApiError>,
) -> ApiResult<Json<ApiResponse<Page<K::Record>>>> {
    let page = query.pagination();
    let (records, total) = K::repository(&state)
        .list_owned(user.id, &query.predicates(), Some(page))
        .await
        .map_err(internal(format!("Failed to fetch {}s", K::noun())))?;

    Ok(Json(ApiResponse::ok(Page::new(records, total, page))))
}

/// Create a record owned by the acting user
pub async fn create<K: RecordKind>(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    WithRejection(Json(payload), _): WithRejection<Json<K::Payload>, ApiError>,
) -> ApiResult<impl IntoResponse> {
    let draft = K::check(&payload).map_err(ApiError::Validation)?;
    let repository = K::repository(&state);

    let display_id = allocate_display_id(K::PREFIX, repository.latest_display_id().await);
    let record = draft.into_record(display_id, user.id, Utc::now());

    let stored = repository
        .insert(&record)
        .await
        .map_err(internal(format!("Failed to create {}", K::noun())))?;

    info!("Created {} {} for user {}", K::noun(), stored.display_id(), user.id);

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok(stored).with_message(format!("{} created successfully", K::LABEL))),
    ))
}

/// Fetch one record; visible to every authenticated user
pub async fn get_one<K: RecordKind>(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<ApiResponse<K::Record>>> {
    let id = parse_id::<K>(&id)?;
    let record = K::repository(&state)
        .find_by_id(id)
        .await
        .map_err(internal(format!("Failed to fetch {}", K::noun())))?
        .ok_or_else(K::not_found)?;

    Ok(Json(ApiResponse::ok(record)))
}

/// Replace every editable field of a record the acting user owns
pub async fn update<K: RecordKind>(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
    WithRejection(Json(payload), _): WithRejection<Json<K::Payload>, ApiError>,
) -> ApiResult<Json<ApiResponse<K::Record>>> {
    let draft = K::check(&payload).map_err(ApiError::Validation)?;
    let mut record =
        find_owned::<K>(&state, &user, &id, "You can only modify your own records").await?;

    draft.apply_to(&mut record, Utc::now());

    let stored = K::repository(&state)
        .update(&record)
        .await
        .map_err(internal(format!("Failed to update {}", K::noun())))?
        .ok_or_else(K::not_found)?;

    info!("Updated {} {}", K::noun(), stored.display_id());

    Ok(Json(
        ApiResponse::ok(stored).with_message(format!("{} updated successfully", K::LABEL)),
    ))
}

/// Permanently delete a record the acting user owns
pub async fn delete<K: RecordKind>(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
) -> ApiResult<Json<ApiResponse<()>>> {
    let record =
        find_owned::<K>(&state, &user, &id, "You can only delete your own records").await?;

    let deleted = K::repository(&state)
        .delete(record.id())
        .await
        .map_err(internal(format!("Failed to delete {}", K::noun())))?;

    if !deleted {
        return Err(K::not_found());
    }

    info!("Deleted {} {}", K::noun(), record.display_id());

    Ok(Json(ApiResponse::done(format!(
        "{} deleted successfully",
        K::LABEL
    ))))
}

/// Organization-wide statistics over every record of this kind
pub async fn stats<K: RecordKind>(
    State(state): State<AppState>,
) -> ApiResult<Json<ApiResponse<K::Stats>>> {
    let records = K::repository(&state)
        .list_all()
        .await
        .map_err(internal(format!("Failed to fetch {} statistics", K::noun())))?;

    Ok(Json(ApiResponse::ok(K::stats(&records, Utc::now()))))
}

/// The acting user's matching records as CSV
pub async fn export<K: RecordKind>(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    WithRejection(Query(query), _): WithRejection<Query<K::Query>, ApiError>,
) -> ApiResult<impl IntoResponse> {
    let (records, _) = K::repository(&state)
        .list_owned(user.id, &query.predicates(), None)
        .await
        .map_err(internal(format!("Failed to export {}s", K::noun())))?;

    let body = to_csv(K::CSV_COLUMNS, &records)
        .map_err(internal(format!("Failed to export {}s", K::noun())))?;

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", K::EXPORT_FILENAME),
            ),
        ],
        body,
    ))
}
