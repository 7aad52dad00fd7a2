//! Batch integrity checks run before an import is admitted.
//!
//! Read-only: the caller appends the batch only after validation succeeds.
//! There is no transaction spanning this read and the later write, so two
//! concurrent imports can both validate against the same snapshot; the
//! storage contract accepts that window.

use std::collections::HashMap;

use uuid::Uuid;

use crate::error::{CatalogError, CatalogResult};
use crate::models::unit::{UnitImport, UnitType};
use crate::store::VersionStore;

/// Validate a batch of proposed unit versions sharing one update date.
///
/// Checks, in order: per-item semantic invariants (self-parenting, price
/// shape), duplicate ids within the batch, type conflicts against stored
/// history, and parent resolution against the batch and the store.
pub async fn validate_batch(
    store: &dyn VersionStore,
    items: &[UnitImport],
) -> CatalogResult<()> {
    let batch_types = batch_types(items)?;

    for item in items {
        if item.parent_id == Some(item.id) {
            return Err(CatalogError::SelfParent(item.id));
        }
        let price_ok = match item.unit_type {
            UnitType::Offer => item.price.is_some_and(|p| p >= 0),
            UnitType::Category => item.price.is_none(),
        };
        if !price_ok {
            return Err(CatalogError::InvalidPrice(item.id));
        }
    }

    let stored_types = store.current_types().await?;
    for (id, stored_type) in &stored_types {
        if let Some(batch_type) = batch_types.get(id) {
            if batch_type != stored_type {
                return Err(CatalogError::TypeConflict(*id));
            }
        }
    }

    // Forward references are allowed: a parent may arrive in the same batch.
    for item in items {
        let Some(parent_id) = item.parent_id else {
            continue;
        };
        let parent_type = batch_types
            .get(&parent_id)
            .or_else(|| stored_types.get(&parent_id))
            .ok_or(CatalogError::ParentNotFound(parent_id))?;
        if *parent_type == UnitType::Offer {
            return Err(CatalogError::ParentIsOffer(parent_id));
        }
    }

    Ok(())
}

/// Collect the batch's `(id, type)` map, rejecting duplicate ids.
fn batch_types(items: &[UnitImport]) -> CatalogResult<HashMap<Uuid, UnitType>> {
    let mut types = HashMap::with_capacity(items.len());
    for item in items {
        if types.insert(item.id, item.unit_type).is_some() {
            return Err(CatalogError::DuplicateIdInBatch(item.id));
        }
    }
    Ok(types)
}
