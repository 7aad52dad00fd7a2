//! In-memory version store used by tests.
//!
//! Keeps the same contract as the database-backed store: an insertion-ordered
//! row log plus by-id and by-parent secondary indexes, with `seq` handed out
//! from a counter so equal-date versions stay deterministic.

use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use uuid::Uuid;

use crate::error::CatalogResult;
use crate::models::unit::{NewUnitVersion, UnitType, UnitVersion};
use crate::store::{ChildLink, VersionStore};

#[derive(Default)]
struct Inner {
    rows: BTreeMap<i64, UnitVersion>,
    by_id: HashMap<Uuid, Vec<i64>>,
    by_parent: HashMap<Uuid, Vec<i64>>,
    next_seq: i64,
}

#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Inner {
    fn latest_matching<F>(&self, id: Uuid, keep: F) -> Option<UnitVersion>
    where
        F: Fn(&UnitVersion) -> bool,
    {
        self.by_id
            .get(&id)?
            .iter()
            .filter_map(|seq| self.rows.get(seq))
            .filter(|row| keep(row))
            .max_by_key(|row| (row.update_date, row.seq))
            .cloned()
    }

    fn remove_row(&mut self, seq: i64) {
        let Some(row) = self.rows.remove(&seq) else {
            return;
        };
        if let Some(seqs) = self.by_id.get_mut(&row.id) {
            seqs.retain(|s| *s != seq);
        }
        if let Some(parent) = row.parent_id {
            if let Some(seqs) = self.by_parent.get_mut(&parent) {
                seqs.retain(|s| *s != seq);
            }
        }
    }
}

#[async_trait]
impl VersionStore for MemoryStore {
    async fn append(&self, rows: Vec<NewUnitVersion>) -> CatalogResult<()> {
        let mut inner = self.inner.write();
        for row in rows {
            let seq = inner.next_seq;
            inner.next_seq += 1;

            let version = UnitVersion {
                seq,
                id: row.id,
                name: row.name,
                parent_id: row.parent_id,
                unit_type: row.unit_type,
                price: row.price,
                update_date: row.update_date,
            };

            inner.by_id.entry(version.id).or_default().push(seq);
            if let Some(parent) = version.parent_id {
                inner.by_parent.entry(parent).or_default().push(seq);
            }
            inner.rows.insert(seq, version);
        }
        Ok(())
    }

    async fn latest(&self, id: Uuid) -> CatalogResult<Option<UnitVersion>> {
        Ok(self.inner.read().latest_matching(id, |_| true))
    }

    async fn latest_at(
        &self,
        id: Uuid,
        at: DateTime<Utc>,
    ) -> CatalogResult<Option<UnitVersion>> {
        Ok(self
            .inner
            .read()
            .latest_matching(id, |row| row.update_date <= at))
    }

    async fn current_types(&self) -> CatalogResult<HashMap<Uuid, UnitType>> {
        let inner = self.inner.read();
        Ok(inner
            .rows
            .values()
            .map(|row| (row.id, row.unit_type))
            .collect())
    }

    async fn child_ids(&self, parent_id: Uuid) -> CatalogResult<Vec<Uuid>> {
        let inner = self.inner.read();
        let mut ids = Vec::new();
        for seq in inner.by_parent.get(&parent_id).into_iter().flatten() {
            if let Some(row) = inner.rows.get(seq) {
                if !ids.contains(&row.id) {
                    ids.push(row.id);
                }
            }
        }
        Ok(ids)
    }

    async fn child_links(&self, parent_id: Uuid) -> CatalogResult<Vec<ChildLink>> {
        let inner = self.inner.read();
        let mut links: Vec<ChildLink> = Vec::new();
        for seq in inner.by_parent.get(&parent_id).into_iter().flatten() {
            if let Some(row) = inner.rows.get(seq) {
                let link = ChildLink {
                    id: row.id,
                    parent_id,
                    unit_type: row.unit_type,
                };
                if !links.contains(&link) {
                    links.push(link);
                }
            }
        }
        Ok(links)
    }

    async fn latest_children_at(
        &self,
        parent_id: Uuid,
        at: DateTime<Utc>,
    ) -> CatalogResult<Vec<UnitVersion>> {
        let inner = self.inner.read();
        let mut latest: HashMap<Uuid, UnitVersion> = HashMap::new();
        for seq in inner.by_parent.get(&parent_id).into_iter().flatten() {
            let Some(row) = inner.rows.get(seq) else {
                continue;
            };
            if row.update_date > at {
                continue;
            }
            match latest.get(&row.id) {
                Some(kept) if (kept.update_date, kept.seq) >= (row.update_date, row.seq) => {}
                _ => {
                    latest.insert(row.id, row.clone());
                }
            }
        }
        Ok(latest.into_values().collect())
    }

    async fn update_dates(&self, id: Uuid) -> CatalogResult<Vec<DateTime<Utc>>> {
        let inner = self.inner.read();
        let mut dates = Vec::new();
        for seq in inner.by_id.get(&id).into_iter().flatten() {
            if let Some(row) = inner.rows.get(seq) {
                if !dates.contains(&row.update_date) {
                    dates.push(row.update_date);
                }
            }
        }
        Ok(dates)
    }

    async fn offers_updated_between(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> CatalogResult<Vec<UnitVersion>> {
        let inner = self.inner.read();
        Ok(inner
            .rows
            .values()
            .filter(|row| {
                row.unit_type == UnitType::Offer
                    && row.update_date >= start
                    && row.update_date <= end
            })
            .cloned()
            .collect())
    }

    async fn delete_link(&self, id: Uuid, parent_id: Uuid) -> CatalogResult<u64> {
        let mut inner = self.inner.write();
        let doomed: Vec<i64> = inner
            .by_id
            .get(&id)
            .into_iter()
            .flatten()
            .copied()
            .filter(|seq| {
                inner
                    .rows
                    .get(seq)
                    .is_some_and(|row| row.parent_id == Some(parent_id))
            })
            .collect();
        for seq in &doomed {
            inner.remove_row(*seq);
        }
        Ok(doomed.len() as u64)
    }

    async fn delete_unit(&self, id: Uuid) -> CatalogResult<u64> {
        let mut inner = self.inner.write();
        let doomed: Vec<i64> = inner.by_id.get(&id).cloned().unwrap_or_default();
        for seq in &doomed {
            inner.remove_row(*seq);
        }
        inner.by_id.remove(&id);
        Ok(doomed.len() as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2022, 5, 28, hour, 0, 0).unwrap()
    }

    fn offer(id: Uuid, parent: Option<Uuid>, price: i64, date: DateTime<Utc>) -> NewUnitVersion {
        NewUnitVersion {
            id,
            name: "offer".to_string(),
            parent_id: parent,
            unit_type: UnitType::Offer,
            price: Some(price),
            update_date: date,
        }
    }

    #[tokio::test]
    async fn latest_breaks_equal_dates_by_insertion_order() {
        let store = MemoryStore::new();
        let id = Uuid::new_v4();
        store
            .append(vec![offer(id, None, 100, at(10)), offer(id, None, 200, at(10))])
            .await
            .unwrap();

        let latest = store.latest(id).await.unwrap().unwrap();
        assert_eq!(latest.price, Some(200));
    }

    #[tokio::test]
    async fn latest_at_ignores_future_versions() {
        let store = MemoryStore::new();
        let id = Uuid::new_v4();
        store
            .append(vec![offer(id, None, 100, at(10)), offer(id, None, 200, at(12))])
            .await
            .unwrap();

        let then = store.latest_at(id, at(11)).await.unwrap().unwrap();
        assert_eq!(then.price, Some(100));
        assert!(store.latest_at(id, at(9)).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn delete_link_removes_only_the_matching_association() {
        let store = MemoryStore::new();
        let id = Uuid::new_v4();
        let parent_a = Uuid::new_v4();
        let parent_b = Uuid::new_v4();
        store
            .append(vec![
                offer(id, Some(parent_a), 100, at(10)),
                offer(id, Some(parent_b), 150, at(11)),
            ])
            .await
            .unwrap();

        let removed = store.delete_link(id, parent_a).await.unwrap();
        assert_eq!(removed, 1);
        assert!(store.child_ids(parent_a).await.unwrap().is_empty());
        assert_eq!(store.child_ids(parent_b).await.unwrap(), vec![id]);
        // The version under the other parent is still the unit's history.
        assert_eq!(store.latest(id).await.unwrap().unwrap().price, Some(150));
    }

    #[tokio::test]
    async fn delete_unit_erases_the_whole_history() {
        let store = MemoryStore::new();
        let id = Uuid::new_v4();
        let parent = Uuid::new_v4();
        store
            .append(vec![
                offer(id, Some(parent), 100, at(10)),
                offer(id, Some(parent), 150, at(11)),
            ])
            .await
            .unwrap();

        assert_eq!(store.delete_unit(id).await.unwrap(), 2);
        assert!(store.latest(id).await.unwrap().is_none());
        assert!(store.child_ids(parent).await.unwrap().is_empty());
        assert!(store.update_dates(id).await.unwrap().is_empty());
    }
}
