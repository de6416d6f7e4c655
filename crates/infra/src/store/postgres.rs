//! Postgres-backed sale store.
//!
//! One table, `sales`, keyed by `(seller_id, offer_id)`. Every operation is a
//! single statement on a pooled connection; there is no transaction spanning
//! calls.

use async_trait::async_trait;
use sqlx::postgres::{PgPoolOptions, PgRow};
use sqlx::{PgPool, Postgres, QueryBuilder, Row};

use salesync_core::{OfferId, SellerId};
use salesync_sales::{SaleFilter, SaleKey, SaleRecord};

use super::{SaleStore, StoreError};

const CREATE_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS sales (
    seller_id BIGINT NOT NULL,
    offer_id  BIGINT NOT NULL,
    name      TEXT   NOT NULL,
    price     BIGINT NOT NULL CHECK (price >= 0),
    quantity  BIGINT NOT NULL CHECK (quantity >= 0),
    PRIMARY KEY (seller_id, offer_id)
)
"#;

const SELECT_COLUMNS: &str = "SELECT offer_id, seller_id, name, price, quantity FROM sales";

const FIND_BY_KEY: &str = "SELECT offer_id, seller_id, name, price, quantity FROM sales \
     WHERE seller_id = $1 AND offer_id = $2";

/// Postgres sale store on a shared connection pool.
#[derive(Debug, Clone)]
pub struct PostgresSaleStore {
    pool: PgPool,
}

impl PostgresSaleStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Open a pool against `database_url`.
    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await?;
        Ok(Self::new(pool))
    }

    /// Create the `sales` table if it does not exist yet.
    pub async fn ensure_schema(&self) -> Result<(), StoreError> {
        sqlx::query(CREATE_TABLE).execute(&self.pool).await?;
        Ok(())
    }
}

fn sale_from_row(row: &PgRow) -> Result<SaleRecord, StoreError> {
    Ok(SaleRecord {
        offer_id: OfferId::new(row.try_get("offer_id")?),
        seller_id: SellerId::new(row.try_get("seller_id")?),
        name: row.try_get("name")?,
        price: row.try_get("price")?,
        quantity: row.try_get("quantity")?,
    })
}

#[async_trait]
impl SaleStore for PostgresSaleStore {
    async fn find_by_key(&self, key: SaleKey) -> Result<Option<SaleRecord>, StoreError> {
        let row = sqlx::query(FIND_BY_KEY)
            .bind(key.seller_id.get())
            .bind(key.offer_id.get())
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(sale_from_row).transpose()
    }

    async fn insert(&self, sale: &SaleRecord) -> Result<u64, StoreError> {
        let result = sqlx::query(
            "INSERT INTO sales (seller_id, offer_id, name, price, quantity) VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(sale.seller_id.get())
        .bind(sale.offer_id.get())
        .bind(&sale.name)
        .bind(sale.price)
        .bind(sale.quantity)
        .execute(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db) if db.is_unique_violation() => {
                StoreError::Conflict(sale.key())
            }
            other => StoreError::Database(other),
        })?;

        Ok(result.rows_affected())
    }

    async fn update(&self, sale: &SaleRecord) -> Result<u64, StoreError> {
        let result = sqlx::query(
            "UPDATE sales SET name = $3, price = $4, quantity = $5 WHERE seller_id = $1 AND offer_id = $2",
        )
        .bind(sale.seller_id.get())
        .bind(sale.offer_id.get())
        .bind(&sale.name)
        .bind(sale.price)
        .bind(sale.quantity)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }

    async fn delete_by_key(&self, key: SaleKey) -> Result<u64, StoreError> {
        let result = sqlx::query("DELETE FROM sales WHERE seller_id = $1 AND offer_id = $2")
            .bind(key.seller_id.get())
            .bind(key.offer_id.get())
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }

    async fn find_by_filter(&self, filter: &SaleFilter) -> Result<Vec<SaleRecord>, StoreError> {
        let mut query = filter_query(filter);
        let rows = query.build().fetch_all(&self.pool).await?;
        rows.iter().map(sale_from_row).collect()
    }
}

/// `SELECT ... WHERE` with one positional bind per present filter field.
fn filter_query(filter: &SaleFilter) -> QueryBuilder<'_, Postgres> {
    let mut query = QueryBuilder::<Postgres>::new(SELECT_COLUMNS);
    let mut separator = " WHERE ";

    if let Some(seller_id) = filter.seller_id {
        query.push(separator).push("seller_id = ").push_bind(seller_id.get());
        separator = " AND ";
    }
    if let Some(offer_id) = filter.offer_id {
        query.push(separator).push("offer_id = ").push_bind(offer_id.get());
        separator = " AND ";
    }
    if let Some(name_query) = &filter.name_query {
        // strpos instead of LIKE so `%` and `_` in the query match literally.
        query
            .push(separator)
            .push("strpos(LOWER(name), LOWER(")
            .push_bind(name_query.as_str())
            .push(")) > 0");
    }

    query.push(" ORDER BY seller_id, offer_id");
    query
}
