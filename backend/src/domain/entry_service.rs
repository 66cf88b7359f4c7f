//! Entry service domain logic.
//!
//! Builds and stores snapshot entries. Request validation happens at the
//! HTTP boundary; this layer assumes a well-formed request and owns
//! identity and timestamps.

use anyhow::Result;
use shared::{CreateEntryRequest, Entry};
use tracing::info;

use crate::storage::db::DbConnection;
use crate::storage::entry_repository::EntryRepository;
use crate::storage::traits::EntryStorage;

#[derive(Clone)]
pub struct EntryService {
    entries: EntryRepository,
}

impl EntryService {
    pub fn new(db: DbConnection) -> Self {
        Self {
            entries: EntryRepository::new(db),
        }
    }

    /// Create or re-insert the entry for `(profile_id, request.entry_date)`.
    ///
    /// Re-insertion replaces the monetary fields of an existing snapshot;
    /// the stored row's identity is preserved.
    pub async fn create_entry(&self, profile_id: &str, request: CreateEntryRequest) -> Result<Entry> {
        let now = chrono::Utc::now().to_rfc3339();
        let entry = Entry {
            id: uuid::Uuid::new_v4().to_string(),
            profile_id: profile_id.to_string(),
            entry_date: request.entry_date.clone(),
            cash: request.cash,
            checking: request.checking,
            savings: request.savings,
            fixed_deposits: request.fixed_deposits,
            brokerage: request.brokerage,
            stocks: request.stocks,
            bonds: request.bonds,
            mutual_funds: request.mutual_funds,
            etfs: request.etfs,
            retirement: request.retirement,
            pension: request.pension,
            crypto: request.crypto,
            gold: request.gold,
            real_estate: request.real_estate,
            vehicles: request.vehicles,
            collectibles: request.collectibles,
            receivables: request.receivables,
            other_assets: request.other_assets,
            created_at: now.clone(),
            updated_at: now,
        };

        let stored = self.entries.upsert_entry(&entry).await?;
        info!(
            "Stored entry for profile {} on {} (total {:.2})",
            profile_id,
            stored.entry_date,
            stored.total()
        );
        Ok(stored)
    }

    /// The most recent entry for the profile, if any.
    pub async fn latest_entry(&self, profile_id: &str) -> Result<Option<Entry>> {
        self.entries.get_latest_entry(profile_id).await
    }

    /// All entries for the profile, descending by date.
    pub async fn list_entries(&self, profile_id: &str) -> Result<Vec<Entry>> {
        self.entries.list_entries(profile_id).await
    }

    /// Delete the entry for a calendar day.
    /// Returns true if a row was found and deleted.
    pub async fn delete_entry(&self, profile_id: &str, date: &str) -> Result<bool> {
        self.entries.delete_entry(profile_id, date).await
    }
}
