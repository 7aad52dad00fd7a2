//! Versioned unit store: the append-only collection of unit version rows the
//! engine runs against.
//!
//! The engine only ever needs appends plus a handful of predicate-filtered
//! lookups, so the store is a trait with an explicitly constructed handle
//! owned by [`crate::AppState`]. [`DbStore`] is the PostgreSQL
//! implementation; [`MemoryStore`] backs tests.

pub mod db;
pub mod memory;

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::error::CatalogResult;
use crate::models::unit::{NewUnitVersion, UnitType, UnitVersion};

pub use db::DbStore;
pub use memory::MemoryStore;

/// One distinct `(child id, type)` association observed under a parent.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ChildLink {
    pub id: Uuid,
    pub parent_id: Uuid,
    pub unit_type: UnitType,
}

/// Contract the engine requires from the underlying storage: appends and
/// predicate-filtered lookups with time ordering. "Latest" is always by
/// `(update_date, seq)` descending, which keeps equal-date versions
/// deterministic.
#[async_trait]
pub trait VersionStore: Send + Sync {
    /// Append a batch of version rows. Rows are never mutated afterwards.
    async fn append(&self, rows: Vec<NewUnitVersion>) -> CatalogResult<()>;

    /// The most recent version of `id`, if any version exists.
    async fn latest(&self, id: Uuid) -> CatalogResult<Option<UnitVersion>>;

    /// The most recent version of `id` with `update_date <= at`.
    async fn latest_at(
        &self,
        id: Uuid,
        at: DateTime<Utc>,
    ) -> CatalogResult<Option<UnitVersion>>;

    /// Every distinct `(id, type)` pair present in the store.
    async fn current_types(&self) -> CatalogResult<HashMap<Uuid, UnitType>>;

    /// Distinct ids that ever recorded `parent_id` as their parent.
    async fn child_ids(&self, parent_id: Uuid) -> CatalogResult<Vec<Uuid>>;

    /// Distinct `(id, type)` associations recorded under `parent_id`.
    async fn child_links(&self, parent_id: Uuid) -> CatalogResult<Vec<ChildLink>>;

    /// For each id with a row under `parent_id` dated at or before `at`, the
    /// most recent such row.
    async fn latest_children_at(
        &self,
        parent_id: Uuid,
        at: DateTime<Utc>,
    ) -> CatalogResult<Vec<UnitVersion>>;

    /// Distinct update dates recorded for `id`.
    async fn update_dates(&self, id: Uuid) -> CatalogResult<Vec<DateTime<Utc>>>;

    /// Every offer version with `start <= update_date <= end`.
    async fn offers_updated_between(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> CatalogResult<Vec<UnitVersion>>;

    /// Delete the rows matching exactly `(id, parent_id)`. Returns the number
    /// of rows removed.
    async fn delete_link(&self, id: Uuid, parent_id: Uuid) -> CatalogResult<u64>;

    /// Delete every row of `id`, its entire history. Returns the number of
    /// rows removed.
    async fn delete_unit(&self, id: Uuid) -> CatalogResult<u64>;
}
