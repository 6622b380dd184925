//! Postgres-backed store implementation.
//!
//! ## Error Mapping
//!
//! SQLx errors are mapped to `StoreError` as follows:
//!
//! | SQLx Error | PostgreSQL Error Code | StoreError |
//! |------------|----------------------|------------|
//! | Database (not null / foreign key / unique / check violation) | `23502` / `23503` / `23505` / `23514` | `Constraint` |
//! | Database (other) | Any other | `Backend` |
//! | RowNotFound | N/A | `NotFound` |
//! | PoolClosed, PoolTimedOut, Io, ... | N/A | `Backend` |
//!
//! ## Weak References
//!
//! Sales reference clients, frames and lenses with `ON DELETE SET NULL`
//! foreign keys: a reference must exist when the sale is inserted, and a later
//! deletion clears the column instead of removing the sale.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sqlx::postgres::{PgPoolOptions, PgRow};
use sqlx::{PgPool, Row};
use tracing::{Span, instrument};
use uuid::Uuid;

use opticpos_clients::{Client, ClientDetails, ClientId, ClientInput};
use opticpos_core::{Amount, DomainError};
use opticpos_inventory::{FrameId, InventoryFrame, InventoryLens, LensId};
use opticpos_sales::{
    InstallmentPlan, MiscItem, MiscSaleKind, PaymentMethod, PurchaseRecord, SaleGlasses, SaleId,
    SaleMaintenance,
};

use super::r#trait::{CatalogStore, ClientStore, SalesStore, StoreError};
use crate::config::StoreConfig;

/// DDL for the five tables, safe to run repeatedly.
const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS clients (
    id           UUID PRIMARY KEY,
    name         TEXT NOT NULL CHECK (length(btrim(name)) > 0),
    phone        TEXT NULL,
    address      TEXT NULL,
    dnp          TEXT NULL,
    prescription TEXT NULL,
    created_at   TIMESTAMPTZ NOT NULL DEFAULT NOW()
);

CREATE TABLE IF NOT EXISTS inventory_frames (
    id         UUID PRIMARY KEY,
    name       TEXT NOT NULL CHECK (length(btrim(name)) > 0),
    code       TEXT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);

CREATE TABLE IF NOT EXISTS inventory_lenses (
    id           UUID PRIMARY KEY,
    product_code TEXT NOT NULL CHECK (length(btrim(product_code)) > 0),
    description  TEXT NULL,
    created_at   TIMESTAMPTZ NOT NULL DEFAULT NOW()
);

CREATE TABLE IF NOT EXISTS sales_glasses (
    id                UUID PRIMARY KEY,
    client_id         UUID NULL REFERENCES clients (id) ON DELETE SET NULL,
    frame_id          UUID NULL REFERENCES inventory_frames (id) ON DELETE SET NULL,
    lens_id           UUID NULL REFERENCES inventory_lenses (id) ON DELETE SET NULL,
    sale_date         DATE NOT NULL DEFAULT CURRENT_DATE,
    amount            NUMERIC(12, 2) NOT NULL CHECK (amount >= 0),
    payment_method    TEXT NOT NULL,
    installment_type  TEXT NOT NULL DEFAULT 'lump-sum',
    installment_count INTEGER NULL CHECK (installment_count IS NULL OR installment_count BETWEEN 1 AND 4),
    created_at        TIMESTAMPTZ NOT NULL DEFAULT NOW()
);

CREATE INDEX IF NOT EXISTS sales_glasses_client_date_idx
    ON sales_glasses (client_id, sale_date DESC, id DESC);

CREATE TABLE IF NOT EXISTS sales_maintenance (
    id          UUID PRIMARY KEY,
    type        TEXT NOT NULL,
    item_detail TEXT NOT NULL,
    sale_date   DATE NOT NULL DEFAULT CURRENT_DATE,
    amount      NUMERIC(12, 2) NOT NULL CHECK (amount >= 0),
    created_at  TIMESTAMPTZ NOT NULL DEFAULT NOW()
);
"#;

/// Postgres-backed store for clients, catalog and sales.
///
/// Uses the SQLx connection pool, which is `Send + Sync`; the store can be
/// cloned and shared across tasks.
#[derive(Debug, Clone)]
pub struct PostgresStore {
    pool: Arc<PgPool>,
}

impl PostgresStore {
    /// Create a store over an existing connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool: Arc::new(pool),
        }
    }

    /// Open a connection pool from configuration.
    #[instrument(skip(config), fields(max_connections = config.max_connections), err)]
    pub async fn connect(config: &StoreConfig) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_secs(config.acquire_timeout_secs))
            .connect(&config.database_url)
            .await
            .map_err(|e| map_sqlx_error("connect", e))?;
        Ok(Self::new(pool))
    }

    /// Create the tables if they do not exist yet.
    #[instrument(skip(self), err)]
    pub async fn ensure_schema(&self) -> Result<(), StoreError> {
        sqlx::raw_sql(SCHEMA)
            .execute(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("ensure_schema", e))?;
        Ok(())
    }
}

#[async_trait::async_trait]
impl ClientStore for PostgresStore {
    #[instrument(skip(self, client), fields(client_id = %client.id_typed()), err)]
    async fn insert_client(&self, client: &Client) -> Result<Client, StoreError> {
        let details = client.details();
        let row = sqlx::query(
            r#"
            INSERT INTO clients (id, name, phone, address, dnp, prescription, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id, name, phone, address, dnp, prescription, created_at
            "#,
        )
        .bind(client.id_typed().as_uuid())
        .bind(details.name())
        .bind(details.phone())
        .bind(details.address())
        .bind(details.pupillary_distance())
        .bind(details.prescription())
        .bind(client.created_at())
        .fetch_one(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("insert_client", e))?;

        client_from_row(&row)
    }

    #[instrument(skip(self, details), fields(client_id = %id), err)]
    async fn update_client(&self, id: ClientId, details: &ClientDetails) -> Result<(), StoreError> {
        let result = sqlx::query(
            r#"
            UPDATE clients
            SET name = $2, phone = $3, address = $4, dnp = $5, prescription = $6
            WHERE id = $1
            "#,
        )
        .bind(id.as_uuid())
        .bind(details.name())
        .bind(details.phone())
        .bind(details.address())
        .bind(details.pupillary_distance())
        .bind(details.prescription())
        .execute(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("update_client", e))?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }

    #[instrument(skip(self), fields(client_id = %id), err)]
    async fn get_client(&self, id: ClientId) -> Result<Option<Client>, StoreError> {
        let row = sqlx::query(
            r#"
            SELECT id, name, phone, address, dnp, prescription, created_at
            FROM clients
            WHERE id = $1
            "#,
        )
        .bind(id.as_uuid())
        .fetch_optional(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("get_client", e))?;

        row.as_ref().map(client_from_row).transpose()
    }

    #[instrument(skip(self), fields(row_count = tracing::field::Empty), err)]
    async fn list_clients(&self) -> Result<Vec<Client>, StoreError> {
        let rows = sqlx::query(
            r#"
            SELECT id, name, phone, address, dnp, prescription, created_at
            FROM clients
            ORDER BY name ASC, id ASC
            "#,
        )
        .fetch_all(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("list_clients", e))?;

        Span::current().record("row_count", rows.len());
        rows.iter().map(client_from_row).collect()
    }
}

#[async_trait::async_trait]
impl CatalogStore for PostgresStore {
    #[instrument(skip(self), err)]
    async fn list_frames(&self) -> Result<Vec<InventoryFrame>, StoreError> {
        let rows = sqlx::query(
            "SELECT id, name, code, created_at FROM inventory_frames ORDER BY name ASC, id ASC",
        )
        .fetch_all(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("list_frames", e))?;

        rows.iter()
            .map(|row| {
                let id: Uuid = get(row, "id")?;
                let name: String = get(row, "name")?;
                let code: Option<String> = get(row, "code")?;
                let created_at: DateTime<Utc> = get(row, "created_at")?;
                InventoryFrame::new(FrameId::from(id), &name, code.as_deref(), created_at)
                    .map_err(|e| decode_error("inventory_frames", e))
            })
            .collect()
    }

    #[instrument(skip(self), err)]
    async fn list_lenses(&self) -> Result<Vec<InventoryLens>, StoreError> {
        let rows = sqlx::query(
            r#"
            SELECT id, product_code, description, created_at
            FROM inventory_lenses
            ORDER BY product_code ASC, id ASC
            "#,
        )
        .fetch_all(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("list_lenses", e))?;

        rows.iter()
            .map(|row| {
                let id: Uuid = get(row, "id")?;
                let product_code: String = get(row, "product_code")?;
                let description: Option<String> = get(row, "description")?;
                let created_at: DateTime<Utc> = get(row, "created_at")?;
                InventoryLens::new(LensId::from(id), &product_code, description.as_deref(), created_at)
                    .map_err(|e| decode_error("inventory_lenses", e))
            })
            .collect()
    }
}

#[async_trait::async_trait]
impl SalesStore for PostgresStore {
    #[instrument(skip(self, sale), fields(sale_id = %sale.id), err)]
    async fn insert_glasses_sale(&self, sale: &SaleGlasses) -> Result<SaleGlasses, StoreError> {
        let installment_count = i32::try_from(sale.installments.installment_count())
            .map_err(|_| StoreError::Constraint("installment count out of range".to_string()))?;

        sqlx::query(
            r#"
            INSERT INTO sales_glasses (
                id,
                client_id,
                frame_id,
                lens_id,
                sale_date,
                amount,
                payment_method,
                installment_type,
                installment_count,
                created_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            "#,
        )
        .bind(sale.id.as_uuid())
        .bind(sale.client_id.map(|id| *id.as_uuid()))
        .bind(sale.frame_id.map(|id| *id.as_uuid()))
        .bind(sale.lens_id.map(|id| *id.as_uuid()))
        .bind(sale.sale_date)
        .bind(sale.amount.as_decimal())
        .bind(sale.payment_method.as_str())
        .bind(sale.installments.installment_type())
        .bind(installment_count)
        .bind(sale.created_at)
        .execute(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("insert_glasses_sale", e))?;

        Ok(sale.clone())
    }

    #[instrument(skip(self, sale), fields(sale_id = %sale.id), err)]
    async fn insert_misc_sale(&self, sale: &SaleMaintenance) -> Result<SaleMaintenance, StoreError> {
        sqlx::query(
            r#"
            INSERT INTO sales_maintenance (id, type, item_detail, sale_date, amount, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(sale.id.as_uuid())
        .bind(sale.kind().as_str())
        .bind(sale.item_detail())
        .bind(sale.sale_date)
        .bind(sale.amount.as_decimal())
        .bind(sale.created_at)
        .execute(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("insert_misc_sale", e))?;

        Ok(sale.clone())
    }

    #[instrument(skip(self), err)]
    async fn list_misc_sales(&self) -> Result<Vec<SaleMaintenance>, StoreError> {
        let rows = sqlx::query(
            r#"
            SELECT id, type, item_detail, sale_date, amount, created_at
            FROM sales_maintenance
            ORDER BY sale_date DESC, id DESC
            "#,
        )
        .fetch_all(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("list_misc_sales", e))?;

        rows.iter()
            .map(|row| -> Result<SaleMaintenance, StoreError> {
                let kind: String = get(row, "type")?;
                let item_detail: String = get(row, "item_detail")?;
                let item = MiscSaleKind::parse(&kind)
                    .and_then(|kind| MiscItem::parse(kind, &item_detail))
                    .map_err(|e| decode_error("sales_maintenance", e))?;

                Ok(SaleMaintenance {
                    id: SaleId::from(get::<Uuid>(row, "id")?),
                    item,
                    sale_date: get(row, "sale_date")?,
                    amount: amount(row)?,
                    created_at: get(row, "created_at")?,
                })
            })
            .collect()
    }

    #[instrument(
        skip(self),
        fields(client_id = %client_id, row_count = tracing::field::Empty),
        err
    )]
    async fn purchase_history(&self, client_id: ClientId) -> Result<Vec<PurchaseRecord>, StoreError> {
        let rows = sqlx::query(
            r#"
            SELECT
                s.id,
                s.sale_date,
                s.amount,
                s.payment_method,
                s.installment_type,
                s.installment_count,
                f.name AS frame_name,
                l.product_code AS lens_product_code
            FROM sales_glasses s
            LEFT JOIN inventory_frames f ON f.id = s.frame_id
            LEFT JOIN inventory_lenses l ON l.id = s.lens_id
            WHERE s.client_id = $1
            ORDER BY s.sale_date DESC, s.id DESC
            "#,
        )
        .bind(client_id.as_uuid())
        .fetch_all(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("purchase_history", e))?;

        Span::current().record("row_count", rows.len());
        rows.iter().map(purchase_record_from_row).collect()
    }
}

// Row decoding

fn get<'r, T>(row: &'r PgRow, column: &str) -> Result<T, StoreError>
where
    T: sqlx::Decode<'r, sqlx::Postgres> + sqlx::Type<sqlx::Postgres>,
{
    row.try_get(column)
        .map_err(|e| StoreError::Backend(format!("failed to read column {column}: {e}")))
}

fn amount(row: &PgRow) -> Result<Amount, StoreError> {
    let value: Decimal = get(row, "amount")?;
    Amount::new(value).map_err(|e| decode_error("amount", e))
}

fn decode_error(what: &str, err: DomainError) -> StoreError {
    StoreError::Backend(format!("stored {what} row is invalid: {err}"))
}

fn client_from_row(row: &PgRow) -> Result<Client, StoreError> {
    let id: Uuid = get(row, "id")?;
    let input = ClientInput {
        name: get(row, "name")?,
        phone: get(row, "phone")?,
        address: get(row, "address")?,
        pupillary_distance: get(row, "dnp")?,
        prescription: get(row, "prescription")?,
    };
    let details = ClientDetails::from_input(&input).map_err(|e| decode_error("clients", e))?;
    let created_at: DateTime<Utc> = get(row, "created_at")?;
    Ok(Client::from_parts(ClientId::from(id), details, created_at))
}

fn purchase_record_from_row(row: &PgRow) -> Result<PurchaseRecord, StoreError> {
    let payment_method: String = get(row, "payment_method")?;
    let installment_type: String = get(row, "installment_type")?;
    let installment_count: Option<i32> = get(row, "installment_count")?;
    let sale_date: NaiveDate = get(row, "sale_date")?;

    let installments = InstallmentPlan::from_parts(
        Some(&installment_type),
        installment_count.and_then(|n| u32::try_from(n).ok()),
    )
    .map_err(|e| decode_error("sales_glasses", e))?;

    Ok(PurchaseRecord {
        sale_id: SaleId::from(get::<Uuid>(row, "id")?),
        sale_date,
        amount: amount(row)?,
        payment_method: PaymentMethod::parse(&payment_method)
            .map_err(|e| decode_error("sales_glasses", e))?,
        installments,
        frame_name: get(row, "frame_name")?,
        lens_product_code: get(row, "lens_product_code")?,
    })
}

/// Map SQLx errors to StoreError.
fn map_sqlx_error(operation: &str, err: sqlx::Error) -> StoreError {
    match err {
        sqlx::Error::Database(db_err) => {
            let msg = format!("database error in {}: {}", operation, db_err.message());
            match db_err.code().as_deref() {
                Some("23502" | "23503" | "23505" | "23514") => StoreError::Constraint(msg),
                _ => StoreError::Backend(msg),
            }
        }
        sqlx::Error::RowNotFound => StoreError::NotFound,
        sqlx::Error::PoolClosed => {
            StoreError::Backend(format!("connection pool closed in {}", operation))
        }
        _ => StoreError::Backend(format!("sqlx error in {}: {}", operation, err)),
    }
}
