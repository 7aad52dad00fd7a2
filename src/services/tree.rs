//! Current-state subtree materialization.

use std::collections::{HashMap, HashSet, VecDeque};

use uuid::Uuid;

use crate::error::{CatalogError, CatalogResult};
use crate::models::unit::{UnitNode, UnitType, UnitVersion};
use crate::services::children;
use crate::store::VersionStore;

struct Collected {
    version: UnitVersion,
    children: Vec<Uuid>,
}

/// Materialize a unit from its latest versions: offers as leaves, categories
/// with their full live-mode subtree and the floored average offer price.
///
/// The walk is breadth-first with an explicit queue and a visited set, so
/// depth is bounded and a cycle smuggled in across separate imports cannot
/// hang the query. A category's `date` is its own latest update, never the
/// maximum over descendants.
pub async fn get_info(store: &dyn VersionStore, id: Uuid) -> CatalogResult<UnitNode> {
    let root = store
        .latest(id)
        .await?
        .ok_or(CatalogError::NotFound(id))?;
    if root.unit_type == UnitType::Offer {
        return Ok(leaf(root));
    }

    let mut collected: HashMap<Uuid, Collected> = HashMap::new();
    let mut order: Vec<Uuid> = vec![id];
    let mut visited: HashSet<Uuid> = HashSet::from([id]);
    let mut queue: VecDeque<Uuid> = VecDeque::from([id]);
    collected.insert(
        id,
        Collected {
            version: root,
            children: Vec::new(),
        },
    );

    while let Some(parent_id) = queue.pop_front() {
        let mut kept = Vec::new();
        for child_id in children::live_child_ids(store, parent_id).await? {
            if !visited.insert(child_id) {
                continue;
            }
            let version = store
                .latest(child_id)
                .await?
                .ok_or(CatalogError::NotFound(child_id))?;
            if version.unit_type == UnitType::Category {
                queue.push_back(child_id);
            }
            kept.push(child_id);
            order.push(child_id);
            collected.insert(
                child_id,
                Collected {
                    version,
                    children: Vec::new(),
                },
            );
        }
        if let Some(entry) = collected.get_mut(&parent_id) {
            entry.children = kept;
        }
    }

    // Children were discovered after their parent, so reverse collection
    // order folds every subtree before the node that owns it.
    let mut totals: HashMap<Uuid, (i64, i64)> = HashMap::new();
    let mut built: HashMap<Uuid, UnitNode> = HashMap::new();
    for unit_id in order.iter().rev() {
        let Some(entry) = collected.remove(unit_id) else {
            continue;
        };
        match entry.version.unit_type {
            UnitType::Offer => {
                totals.insert(*unit_id, (entry.version.price.unwrap_or(0), 1));
                built.insert(*unit_id, leaf(entry.version));
            }
            UnitType::Category => {
                let mut price_sum = 0;
                let mut offer_count = 0;
                let mut child_nodes = Vec::with_capacity(entry.children.len());
                for child_id in &entry.children {
                    if let Some((sum, count)) = totals.get(child_id) {
                        price_sum += sum;
                        offer_count += count;
                    }
                    if let Some(node) = built.remove(child_id) {
                        child_nodes.push(node);
                    }
                }

                let version = entry.version;
                built.insert(
                    *unit_id,
                    UnitNode {
                        id: version.id,
                        name: version.name,
                        parent_id: version.parent_id,
                        unit_type: version.unit_type,
                        price: (offer_count > 0).then(|| price_sum / offer_count),
                        date: version.update_date,
                        children: Some(child_nodes),
                    },
                );
                totals.insert(*unit_id, (price_sum, offer_count));
            }
        }
    }

    built.remove(&id).ok_or(CatalogError::NotFound(id))
}

fn leaf(version: UnitVersion) -> UnitNode {
    UnitNode {
        id: version.id,
        name: version.name,
        parent_id: version.parent_id,
        unit_type: version.unit_type,
        price: version.price,
        date: version.update_date,
        children: None,
    }
}
