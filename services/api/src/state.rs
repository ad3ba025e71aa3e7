//! Application state shared across handlers

use reporting::models::{EnergyRecord, WasteRecord};
use sqlx::PgPool;
use std::sync::Arc;

use crate::{
    jwt::JwtService,
    repositories::{
        RecordRepository, UserRepository,
        memory::{MemoryRecordRepository, MemoryUserRepository},
        postgres::{PgRecordRepository, PgUserRepository},
    },
};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub energy_repository: Arc<dyn RecordRepository<EnergyRecord>>,
    pub waste_repository: Arc<dyn RecordRepository<WasteRecord>>,
    pub user_repository: Arc<dyn UserRepository>,
    pub jwt_service: JwtService,
}

impl AppState {
    /// State backed by PostgreSQL tables
    pub fn postgres(pool: PgPool, jwt_service: JwtService) -> Self {
        Self {
            energy_repository: Arc::new(PgRecordRepository::<EnergyRecord>::new(pool.clone())),
            waste_repository: Arc::new(PgRecordRepository::<WasteRecord>::new(pool.clone())),
            user_repository: Arc::new(PgUserRepository::new(pool)),
            jwt_service,
        }
    }

    /// State kept entirely in process memory
    pub fn in_memory(jwt_service: JwtService) -> Self {
        Self {
            energy_repository: Arc::new(MemoryRecordRepository::<EnergyRecord>::new()),
            waste_repository: Arc::new(MemoryRecordRepository::<WasteRecord>::new()),
            user_repository: Arc::new(MemoryUserRepository::new()),
            jwt_service,
        }
    }
}
