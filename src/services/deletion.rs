//! Cascading delete.
//!
//! Categories are walked in live mode collecting the exact
//! `(child id, parent id)` association pairs observed at each level; only
//! those association rows are removed, plus the target's entire history. A
//! descendant that also carries rows under some unvisited historical parent
//! keeps those rows, so it may survive as an orphan of that other parent.

use std::collections::{HashSet, VecDeque};

use uuid::Uuid;

use crate::error::{CatalogError, CatalogResult};
use crate::models::unit::UnitType;
use crate::store::VersionStore;

/// Remove a unit and, for categories, its resolved descendants' historical
/// association rows. Irreversible: the id's statistics become unavailable.
pub async fn delete_by_id(store: &dyn VersionStore, id: Uuid) -> CatalogResult<()> {
    let latest = store
        .latest(id)
        .await?
        .ok_or(CatalogError::NotFound(id))?;

    let mut removed = 0;
    if latest.unit_type == UnitType::Category {
        let mut pairs: HashSet<(Uuid, Uuid)> = HashSet::new();
        let mut visited: HashSet<Uuid> = HashSet::from([id]);
        let mut queue: VecDeque<Uuid> = VecDeque::from([id]);

        while let Some(parent_id) = queue.pop_front() {
            for link in store.child_links(parent_id).await? {
                pairs.insert((link.id, parent_id));
                if link.unit_type == UnitType::Category && visited.insert(link.id) {
                    queue.push_back(link.id);
                }
            }
        }

        for (child_id, parent_id) in &pairs {
            removed += store.delete_link(*child_id, *parent_id).await?;
        }
    }

    removed += store.delete_unit(id).await?;
    tracing::debug!(%id, removed, "deleted unit");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::unit::NewUnitVersion;
    use crate::services::{history, tree};
    use crate::store::MemoryStore;
    use chrono::{DateTime, TimeZone, Utc};

    fn at(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2022, 5, 28, hour, 0, 0).unwrap()
    }

    fn category(id: Uuid, parent: Option<Uuid>, date: DateTime<Utc>) -> NewUnitVersion {
        NewUnitVersion {
            id,
            name: "category".to_string(),
            parent_id: parent,
            unit_type: UnitType::Category,
            price: None,
            update_date: date,
        }
    }

    fn offer(id: Uuid, parent: Uuid, price: i64, date: DateTime<Utc>) -> NewUnitVersion {
        NewUnitVersion {
            id,
            name: "offer".to_string(),
            parent_id: Some(parent),
            unit_type: UnitType::Offer,
            price: Some(price),
            update_date: date,
        }
    }

    #[tokio::test]
    async fn deleting_a_missing_unit_is_not_found() {
        let store = MemoryStore::new();
        assert!(matches!(
            delete_by_id(&store, Uuid::new_v4()).await,
            Err(CatalogError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn deleting_an_offer_erases_only_its_history() {
        let store = MemoryStore::new();
        let root = Uuid::new_v4();
        let doomed = Uuid::new_v4();
        let kept = Uuid::new_v4();
        store.append(vec![category(root, None, at(9))]).await.unwrap();
        store
            .append(vec![offer(doomed, root, 100, at(10)), offer(kept, root, 50, at(10))])
            .await
            .unwrap();

        delete_by_id(&store, doomed).await.unwrap();

        assert!(matches!(
            tree::get_info(&store, doomed).await,
            Err(CatalogError::NotFound(_))
        ));
        assert_eq!(tree::get_info(&store, root).await.unwrap().price, Some(50));
    }

    #[tokio::test]
    async fn deleting_a_category_cascades_to_descendants() {
        let store = MemoryStore::new();
        let root = Uuid::new_v4();
        let sub = Uuid::new_v4();
        let item = Uuid::new_v4();
        store.append(vec![category(root, None, at(9))]).await.unwrap();
        store.append(vec![category(sub, Some(root), at(9))]).await.unwrap();
        store.append(vec![offer(item, sub, 100, at(10))]).await.unwrap();

        delete_by_id(&store, root).await.unwrap();

        for id in [root, sub, item] {
            assert!(matches!(
                tree::get_info(&store, id).await,
                Err(CatalogError::NotFound(_))
            ));
        }
    }

    #[tokio::test]
    async fn statistics_become_unavailable_after_delete() {
        let store = MemoryStore::new();
        let root = Uuid::new_v4();
        let item = Uuid::new_v4();
        store.append(vec![category(root, None, at(9))]).await.unwrap();
        store.append(vec![offer(item, root, 100, at(10))]).await.unwrap();

        delete_by_id(&store, root).await.unwrap();

        assert!(matches!(
            history::get_statistic(&store, root, at(0), at(23)).await,
            Err(CatalogError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn only_visited_associations_are_purged() {
        let store = MemoryStore::new();
        let doomed_parent = Uuid::new_v4();
        let other_parent = Uuid::new_v4();
        let shared = Uuid::new_v4();
        store
            .append(vec![
                category(doomed_parent, None, at(9)),
                category(other_parent, None, at(9)),
            ])
            .await
            .unwrap();
        // The shared offer recorded both parents across its history.
        store.append(vec![offer(shared, doomed_parent, 100, at(10))]).await.unwrap();
        store.append(vec![offer(shared, other_parent, 120, at(11))]).await.unwrap();

        delete_by_id(&store, doomed_parent).await.unwrap();

        // The association under the deleted category is gone, the one under
        // the surviving category remains.
        assert!(store.child_ids(doomed_parent).await.unwrap().is_empty());
        assert_eq!(store.child_ids(other_parent).await.unwrap(), vec![shared]);
        assert_eq!(store.latest(shared).await.unwrap().unwrap().price, Some(120));
    }
}
