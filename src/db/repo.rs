//! SQLite-backed ledger store.

use crate::domain::TransactionRow;
use crate::store::{LedgerStore, StoreError};
use async_trait::async_trait;
use sqlx::sqlite::{SqlitePool, SqliteRow};
use sqlx::{Executor, Row, Sqlite};
use tracing::warn;

const INSERT_ENTRY: &str = r#"
    INSERT INTO entries (
        date, commodity, product_type, lots, reason, trader,
        counterparty, contract, inventory_code, avg_price, created_at
    ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
"#;

/// Repository over the `entries` table.
#[derive(Debug, Clone)]
pub struct Repository {
    pool: SqlitePool,
}

impl Repository {
    pub fn new(pool: SqlitePool) -> Self {
        Repository { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    async fn insert_entry<'e, E>(executor: E, row: &TransactionRow) -> Result<(), sqlx::Error>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let [date, commodity, product_type, lots, reason, trader, counterparty, contract, code, avg_price] =
            row.to_record();

        sqlx::query(INSERT_ENTRY)
            .bind(date)
            .bind(commodity)
            .bind(product_type)
            .bind(lots)
            .bind(reason)
            .bind(trader)
            .bind(counterparty)
            .bind(contract)
            .bind(code)
            .bind(avg_price)
            .bind(chrono::Utc::now().timestamp_millis())
            .execute(executor)
            .await?;
        Ok(())
    }

    /// Count of stored entries, including any that fail to parse.
    ///
    /// # Errors
    /// Returns an error if the query fails.
    pub async fn count_entries(&self) -> Result<i64, sqlx::Error> {
        let row = sqlx::query("SELECT COUNT(*) AS n FROM entries")
            .fetch_one(&self.pool)
            .await?;
        Ok(row.get::<i64, _>("n"))
    }
}

fn parse_entry(row: &SqliteRow) -> Option<TransactionRow> {
    let id: i64 = row.get("id");
    let cells: Vec<String> = [
        "date",
        "commodity",
        "product_type",
        "lots",
        "reason",
        "trader",
        "counterparty",
        "contract",
        "inventory_code",
        "avg_price",
    ]
    .iter()
    .map(|col| row.get::<String, _>(*col))
    .collect();

    match TransactionRow::from_record(&cells) {
        Ok(entry) => Some(entry),
        Err(e) => {
            warn!(id, error = %e, "Skipping unreadable ledger entry");
            None
        }
    }
}

#[async_trait]
impl LedgerStore for Repository {
    async fn read_all(&self) -> Result<Vec<TransactionRow>, StoreError> {
        let rows = sqlx::query(
            r#"
            SELECT id, date, commodity, product_type, lots, reason, trader,
                   counterparty, contract, inventory_code, avg_price
            FROM entries
            ORDER BY id ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().filter_map(parse_entry).collect())
    }

    async fn append(&self, row: &TransactionRow) -> Result<(), StoreError> {
        Self::insert_entry(&self.pool, row).await?;
        Ok(())
    }

    async fn append_batch(&self, rows: &[TransactionRow]) -> Result<(), StoreError> {
        if rows.is_empty() {
            return Ok(());
        }

        let mut tx = self.pool.begin().await?;
        for row in rows {
            Self::insert_entry(&mut *tx, row).await?;
        }
        tx.commit().await?;
        Ok(())
    }
}
