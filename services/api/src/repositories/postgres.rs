//! PostgreSQL repositories
//!
//! Both record tables share one repository implementation; each record type
//! describes its table and column values through [`SqlRecord`]. List
//! filters are compiled into bound `AND` clauses with `QueryBuilder`.

use anyhow::Result;
use async_trait::async_trait;
use chrono::NaiveDate;
use reporting::{
    filter::{Pagination, Predicate},
    models::{EnergyRecord, OwnedRecord, User, WasteRecord, normalize_email},
    record_id::{ENERGY_PREFIX, WASTE_PREFIX},
};
use sqlx::{PgPool, Postgres, QueryBuilder, Row, postgres::PgRow};
use std::marker::PhantomData;
use uuid::Uuid;

use super::{DuplicateEmail, RecordRepository, UserRepository};

/// A bindable column value
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    Text(String),
    OptionalText(Option<String>),
    Float(f64),
    OptionalFloat(Option<f64>),
    Date(NaiveDate),
    OptionalDate(Option<NaiveDate>),
}

fn push_value(builder: &mut QueryBuilder<'_, Postgres>, value: SqlValue) {
    match value {
        SqlValue::Text(v) => builder.push_bind(v),
        SqlValue::OptionalText(v) => builder.push_bind(v),
        SqlValue::Float(v) => builder.push_bind(v),
        SqlValue::OptionalFloat(v) => builder.push_bind(v),
        SqlValue::Date(v) => builder.push_bind(v),
        SqlValue::OptionalDate(v) => builder.push_bind(v),
    };
}

/// A record type stored in its own table
pub trait SqlRecord: OwnedRecord + Sized + Send + Sync + 'static {
    const TABLE: &'static str;
    const DISPLAY_ID_COLUMN: &'static str;
    const PREFIX: &'static str;

    /// Client-editable columns with their values, in a fixed order
    fn body(&self) -> Vec<(&'static str, SqlValue)>;

    fn from_row(row: &PgRow) -> Result<Self>;
}

impl SqlRecord for EnergyRecord {
    const TABLE: &'static str = "energy_records";
    const DISPLAY_ID_COLUMN: &'static str = "energy_record_id";
    const PREFIX: &'static str = ENERGY_PREFIX;

    fn body(&self) -> Vec<(&'static str, SqlValue)> {
        vec![
            ("site_name", SqlValue::Text(self.site_name.clone())),
            (
                "reporting_period_start",
                SqlValue::Date(self.reporting_period_start),
            ),
            (
                "reporting_period_end",
                SqlValue::Date(self.reporting_period_end),
            ),
            (
                "energy_type",
                SqlValue::Text(self.energy_type.as_str().to_string()),
            ),
            ("consumption_mwh", SqlValue::Float(self.consumption_mwh)),
            ("cost", SqlValue::OptionalFloat(self.cost)),
            (
                "supplier_name",
                SqlValue::OptionalText(self.supplier_name.clone()),
            ),
            (
                "energy_source_mix",
                SqlValue::OptionalText(self.energy_source_mix.clone()),
            ),
            (
                "reduction_target_mwh",
                SqlValue::OptionalFloat(self.reduction_target_mwh),
            ),
            ("remarks", SqlValue::OptionalText(self.remarks.clone())),
        ]
    }

    fn from_row(row: &PgRow) -> Result<Self> {
        let energy_type: String = row.try_get("energy_type")?;

        Ok(EnergyRecord {
            id: row.try_get("id")?,
            display_id: row.try_get("energy_record_id")?,
            site_name: row.try_get("site_name")?,
            reporting_period_start: row.try_get("reporting_period_start")?,
            reporting_period_end: row.try_get("reporting_period_end")?,
            energy_type: energy_type.parse()?,
            consumption_mwh: row.try_get("consumption_mwh")?,
            cost: row.try_get("cost")?,
            supplier_name: row.try_get("supplier_name")?,
            energy_source_mix: row.try_get("energy_source_mix")?,
            reduction_target_mwh: row.try_get("reduction_target_mwh")?,
            remarks: row.try_get("remarks")?,
            created_by: row.try_get("created_by")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }
}

impl SqlRecord for WasteRecord {
    const TABLE: &'static str = "waste_records";
    const DISPLAY_ID_COLUMN: &'static str = "waste_record_id";
    const PREFIX: &'static str = WASTE_PREFIX;

    fn body(&self) -> Vec<(&'static str, SqlValue)> {
        vec![
            ("site_name", SqlValue::Text(self.site_name.clone())),
            (
                "waste_type",
                SqlValue::Text(self.waste_type.as_str().to_string()),
            ),
            ("quantity_tons", SqlValue::Float(self.quantity_tons)),
            (
                "disposal_method",
                SqlValue::Text(self.disposal_method.as_str().to_string()),
            ),
            (
                "reporting_period_start",
                SqlValue::Date(self.reporting_period_start),
            ),
            (
                "reporting_period_end",
                SqlValue::Date(self.reporting_period_end),
            ),
            ("disposal_date", SqlValue::OptionalDate(self.disposal_date)),
            (
                "contractor_name",
                SqlValue::OptionalText(self.contractor_name.clone()),
            ),
            (
                "regulatory_compliance",
                SqlValue::Text(self.regulatory_compliance.as_str().to_string()),
            ),
            ("remarks", SqlValue::OptionalText(self.remarks.clone())),
        ]
    }

    fn from_row(row: &PgRow) -> Result<Self> {
        let waste_type: String = row.try_get("waste_type")?;
        let disposal_method: String = row.try_get("disposal_method")?;
        let regulatory_compliance: String = row.try_get("regulatory_compliance")?;

        Ok(WasteRecord {
            id: row.try_get("id")?,
            display_id: row.try_get("waste_record_id")?,
            site_name: row.try_get("site_name")?,
            waste_type: waste_type.parse()?,
            quantity_tons: row.try_get("quantity_tons")?,
            disposal_method: disposal_method.parse()?,
            reporting_period_start: row.try_get("reporting_period_start")?,
            reporting_period_end: row.try_get("reporting_period_end")?,
            disposal_date: row.try_get("disposal_date")?,
            contractor_name: row.try_get("contractor_name")?,
            regulatory_compliance: regulatory_compliance.parse()?,
            remarks: row.try_get("remarks")?,
            created_by: row.try_get("created_by")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }
}

/// Escape `LIKE` wildcards so the needle matches literally
fn escape_like(needle: &str) -> String {
    let mut escaped = String::with_capacity(needle.len());
    for c in needle.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// Append the owner scope and every predicate as `AND` clauses
fn push_owned_filters(
    builder: &mut QueryBuilder<'_, Postgres>,
    owner: Uuid,
    predicates: &[Predicate],
) {
    builder.push(" WHERE created_by = ").push_bind(owner);

    for predicate in predicates {
        match predicate {
            Predicate::SiteNameContains(needle) => {
                builder
                    .push(" AND site_name ILIKE ")
                    .push_bind(format!("%{}%", escape_like(needle)));
            }
            Predicate::CategoryEquals { column, value } => {
                builder
                    .push(" AND ")
                    .push(*column)
                    .push(" = ")
                    .push_bind(value.clone());
            }
        }
    }
}

/// Record repository backed by a PostgreSQL table
pub struct PgRecordRepository<R> {
    pool: PgPool,
    _record: PhantomData<fn() -> R>,
}

impl<R> PgRecordRepository<R> {
    /// Create a new record repository
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            _record: PhantomData,
        }
    }
}

impl<R> Clone for PgRecordRepository<R> {
    fn clone(&self) -> Self {
        Self::new(self.pool.clone())
    }
}

#[async_trait]
impl<R: SqlRecord> RecordRepository<R> for PgRecordRepository<R> {
    async fn latest_display_id(&self) -> Result<Option<String>> {
        let sql = format!(
            "SELECT {col} FROM {table} WHERE {col} LIKE $1 ORDER BY created_at DESC LIMIT 1",
            col = R::DISPLAY_ID_COLUMN,
            table = R::TABLE,
        );

        let latest = sqlx::query_scalar::<_, String>(&sql)
            .bind(format!("{}-%", R::PREFIX))
            .fetch_optional(&self.pool)
            .await?;

        Ok(latest)
    }

    async fn insert(&self, record: &R) -> Result<R> {
        let body = record.body();

        let mut builder = QueryBuilder::<Postgres>::new(format!(
            "INSERT INTO {} (id, {}",
            R::TABLE,
            R::DISPLAY_ID_COLUMN
        ));
        for (column, _) in &body {
            builder.push(", ").push(*column);
        }
        builder.push(", created_by, created_at, updated_at) VALUES (");
        builder
            .push_bind(record.id())
            .push(", ")
            .push_bind(record.display_id().to_string());
        for (_, value) in body {
            builder.push(", ");
            push_value(&mut builder, value);
        }
        builder
            .push(", ")
            .push_bind(record.created_by())
            .push(", ")
            .push_bind(record.created_at())
            .push(", ")
            .push_bind(record.updated_at())
            .push(") RETURNING *");

        let row = builder.build().fetch_one(&self.pool).await?;
        R::from_row(&row)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<R>> {
        let sql = format!("SELECT * FROM {} WHERE id = $1", R::TABLE);
        let row = sqlx::query(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(R::from_row).transpose()
    }

    async fn update(&self, record: &R) -> Result<Option<R>> {
        let mut builder = QueryBuilder::<Postgres>::new(format!("UPDATE {} SET ", R::TABLE));
        for (column, value) in record.body() {
            builder.push(column).push(" = ");
            push_value(&mut builder, value);
            builder.push(", ");
        }
        builder
            .push("updated_at = ")
            .push_bind(record.updated_at())
            .push(" WHERE id = ")
            .push_bind(record.id())
            .push(" RETURNING *");

        let row = builder.build().fetch_optional(&self.pool).await?;
        row.as_ref().map(R::from_row).transpose()
    }

    async fn delete(&self, id: Uuid) -> Result<bool> {
        let sql = format!("DELETE FROM {} WHERE id = $1", R::TABLE);
        let result = sqlx::query(&sql).bind(id).execute(&self.pool).await?;

        Ok(result.rows_affected() > 0)
    }

    async fn list_owned(
        &self,
        owner: Uuid,
        predicates: &[Predicate],
        page: Option<Pagination>,
    ) -> Result<(Vec<R>, i64)> {
        let mut count = QueryBuilder::<Postgres>::new(format!("SELECT COUNT(*) FROM {}", R::TABLE));
        push_owned_filters(&mut count, owner, predicates);
        let total: i64 = count.build_query_scalar().fetch_one(&self.pool).await?;

        let mut select = QueryBuilder::<Postgres>::new(format!("SELECT * FROM {}", R::TABLE));
        push_owned_filters(&mut select, owner, predicates);
        select.push(" ORDER BY created_at DESC");
        if let Some(page) = page {
            select
                .push(" LIMIT ")
                .push_bind(page.limit)
                .push(" OFFSET ")
                .push_bind(page.offset);
        }

        let rows = select.build().fetch_all(&self.pool).await?;
        let records = rows.iter().map(R::from_row).collect::<Result<Vec<_>>>()?;

        Ok((records, total))
    }

    async fn list_all(&self) -> Result<Vec<R>> {
        let sql = format!("SELECT * FROM {} ORDER BY created_at DESC", R::TABLE);
        let rows = sqlx::query(&sql).fetch_all(&self.pool).await?;

        rows.iter().map(R::from_row).collect()
    }
}

/// User repository for database operations
#[derive(Clone)]
pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    /// Create a new user repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn user_from_row(row: &PgRow) -> Result<User> {
    Ok(User {
        id: row.try_get("id")?,
        email: row.try_get("email")?,
        name: row.try_get("name")?,
        password_hash: row.try_get("password_hash")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn create(&self, user: &User) -> Result<User> {
        let row = sqlx::query(
            r#"
            INSERT INTO users (id, email, name, password_hash, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, email, name, password_hash, created_at, updated_at
            "#,
        )
        .bind(user.id)
        .bind(normalize_email(&user.email))
        .bind(&user.name)
        .bind(&user.password_hash)
        .bind(user.created_at)
        .bind(user.updated_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db) if db.is_unique_violation() => {
                anyhow::Error::new(DuplicateEmail(user.email.clone()))
            }
            e => e.into(),
        })?;

        user_from_row(&row)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        let row = sqlx::query(
            r#"
            SELECT id, email, name, password_hash, created_at, updated_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(normalize_email(email))
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(user_from_row).transpose()
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>> {
        let row = sqlx::query(
            r#"
            SELECT id, email, name, password_hash, created_at, updated_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(user_from_row).transpose()
    }
}
