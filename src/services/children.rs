//! Child resolution.
//!
//! Two deliberately different notions of "child" coexist:
//!
//! - Live mode ([`live_child_ids`]) treats every id that EVER recorded the
//!   parent as a child, without re-checking the child's current parent. It
//!   backs current-state aggregation, history traversal and deletion, so a
//!   unit reparented elsewhere still shows up under its old category there.
//! - As-of mode ([`child_versions_at`]) confirms each candidate against the
//!   child's own most recent version at the instant, so historical pricing
//!   never counts a unit that had already been moved away.
//!
//! Keeping both is a policy choice: unifying on as-of semantics would change
//! what GetInfo, history collection and delete observably do for reparented
//! units.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::error::CatalogResult;
use crate::models::unit::UnitVersion;
use crate::store::VersionStore;

/// Ids of every unit that ever recorded `parent_id` as its parent.
pub async fn live_child_ids(
    store: &dyn VersionStore,
    parent_id: Uuid,
) -> CatalogResult<Vec<Uuid>> {
    store.child_ids(parent_id).await
}

/// Children of `parent_id` as of `at`: the most recent row per candidate id
/// under this parent dated at or before `at`, kept only when the candidate's
/// own most recent version at `at` still names this parent.
pub async fn child_versions_at(
    store: &dyn VersionStore,
    parent_id: Uuid,
    at: DateTime<Utc>,
) -> CatalogResult<Vec<UnitVersion>> {
    let candidates = store.latest_children_at(parent_id, at).await?;

    let mut confirmed = Vec::with_capacity(candidates.len());
    for candidate in candidates {
        let Some(current) = store.latest_at(candidate.id, at).await? else {
            continue;
        };
        if current.parent_id == Some(parent_id) {
            confirmed.push(candidate);
        }
    }
    Ok(confirmed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::unit::{NewUnitVersion, UnitType};
    use crate::store::MemoryStore;
    use chrono::TimeZone;

    fn at(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2022, 5, 28, hour, 0, 0).unwrap()
    }

    fn category(id: Uuid, date: DateTime<Utc>) -> NewUnitVersion {
        NewUnitVersion {
            id,
            name: "category".to_string(),
            parent_id: None,
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
    async fn live_mode_keeps_reparented_units() {
        let store = MemoryStore::new();
        let old_parent = Uuid::new_v4();
        let new_parent = Uuid::new_v4();
        let moved = Uuid::new_v4();
        store
            .append(vec![
                category(old_parent, at(9)),
                category(new_parent, at(9)),
                offer(moved, old_parent, 100, at(10)),
                offer(moved, new_parent, 100, at(12)),
            ])
            .await
            .unwrap();

        // The old association is still visible in live mode.
        assert_eq!(
            live_child_ids(&store, old_parent).await.unwrap(),
            vec![moved]
        );
        assert_eq!(
            live_child_ids(&store, new_parent).await.unwrap(),
            vec![moved]
        );
    }

    #[tokio::test]
    async fn as_of_mode_drops_stale_associations() {
        let store = MemoryStore::new();
        let old_parent = Uuid::new_v4();
        let new_parent = Uuid::new_v4();
        let moved = Uuid::new_v4();
        store
            .append(vec![
                category(old_parent, at(9)),
                category(new_parent, at(9)),
                offer(moved, old_parent, 100, at(10)),
                offer(moved, new_parent, 100, at(12)),
            ])
            .await
            .unwrap();

        // Before the move the offer belongs to the old parent.
        let before = child_versions_at(&store, old_parent, at(11)).await.unwrap();
        assert_eq!(before.len(), 1);
        assert_eq!(before[0].id, moved);

        // After the move the old association no longer resolves.
        assert!(child_versions_at(&store, old_parent, at(13))
            .await
            .unwrap()
            .is_empty());
        let after = child_versions_at(&store, new_parent, at(13)).await.unwrap();
        assert_eq!(after.len(), 1);
        assert_eq!(after[0].id, moved);
    }

    #[tokio::test]
    async fn as_of_mode_ignores_units_born_later() {
        let store = MemoryStore::new();
        let parent = Uuid::new_v4();
        let late = Uuid::new_v4();
        store
            .append(vec![category(parent, at(9)), offer(late, parent, 100, at(12))])
            .await
            .unwrap();

        assert!(child_versions_at(&store, parent, at(10))
            .await
            .unwrap()
            .is_empty());
    }
}
