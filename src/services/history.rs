//! Point-in-time reconstruction and the update-history query.

use std::collections::{BTreeSet, HashSet, VecDeque};

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::error::{CatalogError, CatalogResult};
use crate::models::unit::{StatisticResponse, StatisticUnit, UnitType, UnitVersion};
use crate::services::children;
use crate::store::VersionStore;

/// The unit's state as of `at`: its most recent version dated at or before
/// that instant.
pub async fn get_actual(
    store: &dyn VersionStore,
    id: Uuid,
    at: DateTime<Utc>,
) -> CatalogResult<UnitVersion> {
    store
        .latest_at(id, at)
        .await?
        .ok_or(CatalogError::NotFound(id))
}

/// Sum of offer prices and offer count in the subtree of `id` as seen at
/// `at`, using as-of child resolution throughout. Iterative walk, visited
/// set keyed by id.
pub async fn subtree_stats_at(
    store: &dyn VersionStore,
    id: Uuid,
    at: DateTime<Utc>,
) -> CatalogResult<(i64, i64)> {
    let mut price_sum = 0;
    let mut offer_count = 0;
    let mut visited: HashSet<Uuid> = HashSet::from([id]);
    let mut queue: VecDeque<Uuid> = VecDeque::from([id]);

    while let Some(parent_id) = queue.pop_front() {
        for child in children::child_versions_at(store, parent_id, at).await? {
            if !visited.insert(child.id) {
                continue;
            }
            match child.unit_type {
                UnitType::Category => queue.push_back(child.id),
                UnitType::Offer => {
                    price_sum += child.price.unwrap_or(0);
                    offer_count += 1;
                }
            }
        }
    }

    Ok((price_sum, offer_count))
}

/// Every update instant relevant to `id`: its own update dates plus, for
/// categories, the update dates of every unit ever parented anywhere in its
/// live-mode subtree. Live mode means transiently or historically parented
/// ids contribute their dates too.
pub async fn find_update_dates(
    store: &dyn VersionStore,
    id: Uuid,
    unit_type: UnitType,
) -> CatalogResult<BTreeSet<DateTime<Utc>>> {
    let mut dates: BTreeSet<DateTime<Utc>> =
        store.update_dates(id).await?.into_iter().collect();
    if unit_type == UnitType::Offer {
        return Ok(dates);
    }

    let mut visited: HashSet<Uuid> = HashSet::from([id]);
    let mut queue: VecDeque<Uuid> = VecDeque::from([id]);
    while let Some(parent_id) = queue.pop_front() {
        for child_id in children::live_child_ids(store, parent_id).await? {
            if !visited.insert(child_id) {
                continue;
            }
            dates.extend(store.update_dates(child_id).await?);
            let Some(latest) = store.latest(child_id).await? else {
                continue;
            };
            if latest.unit_type == UnitType::Category {
                queue.push_back(child_id);
            }
        }
    }

    Ok(dates)
}

/// Update history of `id` over the half-open window `[start, end)`: one
/// entry per relevant instant, reconstructed as of that instant. Category
/// prices are recomputed from the as-of subtree and stay null when the
/// subtree held no offers. An empty window yields an empty list.
pub async fn get_statistic(
    store: &dyn VersionStore,
    id: Uuid,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
) -> CatalogResult<StatisticResponse> {
    let latest = store
        .latest(id)
        .await?
        .ok_or(CatalogError::NotFound(id))?;

    let dates = find_update_dates(store, id, latest.unit_type).await?;

    let mut items = Vec::new();
    for date in dates {
        if date < start || date >= end {
            continue;
        }

        let version = get_actual(store, id, date).await?;
        let mut price = version.price;
        if version.unit_type == UnitType::Category {
            let (price_sum, offer_count) = subtree_stats_at(store, id, date).await?;
            if offer_count > 0 {
                price = Some(price_sum / offer_count);
            }
        }

        items.push(StatisticUnit {
            id: version.id,
            name: version.name,
            parent_id: version.parent_id,
            unit_type: version.unit_type,
            price,
            date,
        });
    }

    Ok(StatisticResponse { items })
}
