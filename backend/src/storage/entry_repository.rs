//! SQLite repository for financial snapshot entries.

use anyhow::Result;
use async_trait::async_trait;
use shared::{round_to_cents, Entry};
use sqlx::sqlite::SqliteRow;
use sqlx::Row;

use crate::storage::db::DbConnection;
use crate::storage::traits::EntryStorage;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, profile_id, entry_date, cash, checking, savings, fixed_deposits, \
                       brokerage, stocks, bonds, mutual_funds, etfs, retirement, pension, \
                       crypto, gold, real_estate, vehicles, collectibles, receivables, \
                       other_assets, created_at, updated_at";

#[derive(Clone)]
pub struct EntryRepository {
    db: DbConnection,
}

impl EntryRepository {
    pub fn new(db: DbConnection) -> Self {
        Self { db }
    }
}

fn entry_from_row(row: &SqliteRow) -> Entry {
    Entry {
        id: row.get("id"),
        profile_id: row.get("profile_id"),
        entry_date: row.get("entry_date"),
        cash: row.get("cash"),
        checking: row.get("checking"),
        savings: row.get("savings"),
        fixed_deposits: row.get("fixed_deposits"),
        brokerage: row.get("brokerage"),
        stocks: row.get("stocks"),
        bonds: row.get("bonds"),
        mutual_funds: row.get("mutual_funds"),
        etfs: row.get("etfs"),
        retirement: row.get("retirement"),
        pension: row.get("pension"),
        crypto: row.get("crypto"),
        gold: row.get("gold"),
        real_estate: row.get("real_estate"),
        vehicles: row.get("vehicles"),
        collectibles: row.get("collectibles"),
        receivables: row.get("receivables"),
        other_assets: row.get("other_assets"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

#[async_trait]
impl EntryStorage for EntryRepository {
    async fn upsert_entry(&self, entry: &Entry) -> Result<Entry> {
        // Monetary values are clamped to currency minor units here so stored
        // rows never carry more than 2 decimal places. On re-insertion the
        // original id and created_at survive; everything else is replaced.
        let query = format!(
            r#"
            INSERT INTO entries ({COLUMNS})
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT (profile_id, entry_date) DO UPDATE SET
                cash = excluded.cash,
                checking = excluded.checking,
                savings = excluded.savings,
                fixed_deposits = excluded.fixed_deposits,
                brokerage = excluded.brokerage,
                stocks = excluded.stocks,
                bonds = excluded.bonds,
                mutual_funds = excluded.mutual_funds,
                etfs = excluded.etfs,
                retirement = excluded.retirement,
                pension = excluded.pension,
                crypto = excluded.crypto,
                gold = excluded.gold,
                real_estate = excluded.real_estate,
                vehicles = excluded.vehicles,
                collectibles = excluded.collectibles,
                receivables = excluded.receivables,
                other_assets = excluded.other_assets,
                updated_at = excluded.updated_at
            "#
        );

        let mut insert = sqlx::query(&query)
            .bind(&entry.id)
            .bind(&entry.profile_id)
            .bind(&entry.entry_date);
        for value in entry.asset_values() {
            insert = insert.bind(round_to_cents(value));
        }
        insert = insert.bind(&entry.created_at).bind(&entry.updated_at);
        insert.execute(self.db.pool()).await?;

        let stored = self
            .get_entry_by_date(&entry.profile_id, &entry.entry_date)
            .await?
            .ok_or_else(|| anyhow::anyhow!("Entry missing immediately after upsert"))?;

        Ok(stored)
    }

    async fn get_entry_by_date(&self, profile_id: &str, date: &str) -> Result<Option<Entry>> {
        let query = format!(
            "SELECT {COLUMNS} FROM entries WHERE profile_id = ? AND entry_date = ?"
        );
        let row = sqlx::query(&query)
            .bind(profile_id)
            .bind(date)
            .fetch_optional(self.db.pool())
            .await?;

        Ok(row.as_ref().map(entry_from_row))
    }

    async fn get_entry_before_date(&self, profile_id: &str, date: &str) -> Result<Option<Entry>> {
        // Descending index scan: the first row strictly before the target is
        // the nearest earlier snapshot.
        let query = format!(
            r#"
            SELECT {COLUMNS} FROM entries
            WHERE profile_id = ? AND entry_date < ?
            ORDER BY entry_date DESC
            LIMIT 1
            "#
        );
        let row = sqlx::query(&query)
            .bind(profile_id)
            .bind(date)
            .fetch_optional(self.db.pool())
            .await?;

        Ok(row.as_ref().map(entry_from_row))
    }

    async fn get_latest_entry(&self, profile_id: &str) -> Result<Option<Entry>> {
        let query = format!(
            r#"
            SELECT {COLUMNS} FROM entries
            WHERE profile_id = ?
            ORDER BY entry_date DESC
            LIMIT 1
            "#
        );
        let row = sqlx::query(&query)
            .bind(profile_id)
            .fetch_optional(self.db.pool())
            .await?;

        Ok(row.as_ref().map(entry_from_row))
    }

    async fn list_entries(&self, profile_id: &str) -> Result<Vec<Entry>> {
        let query = format!(
            r#"
            SELECT {COLUMNS} FROM entries
            WHERE profile_id = ?
            ORDER BY entry_date DESC
            "#
        );
        let rows = sqlx::query(&query)
            .bind(profile_id)
            .fetch_all(self.db.pool())
            .await?;

        Ok(rows.iter().map(entry_from_row).collect())
    }

    async fn list_entry_dates(&self, profile_id: &str) -> Result<Vec<String>> {
        let rows = sqlx::query(
            r#"
            SELECT entry_date FROM entries
            WHERE profile_id = ?
            ORDER BY entry_date DESC
            "#,
        )
        .bind(profile_id)
        .fetch_all(self.db.pool())
        .await?;

        Ok(rows.iter().map(|row| row.get("entry_date")).collect())
    }

    async fn delete_entry(&self, profile_id: &str, date: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM entries WHERE profile_id = ? AND entry_date = ?")
            .bind(profile_id)
            .bind(date)
            .execute(self.db.pool())
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
