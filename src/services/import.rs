//! Import write path: validate, stamp, append.

use crate::error::CatalogResult;
use crate::models::datetime;
use crate::models::unit::{ImportRequest, NewUnitVersion};
use crate::services::validation;
use crate::store::VersionStore;

/// Admit a batch of new unit versions, all stamped with the request's single
/// update date.
pub async fn import_units(
    store: &dyn VersionStore,
    request: ImportRequest,
) -> CatalogResult<()> {
    validation::validate_batch(store, &request.items).await?;

    let update_date = datetime::truncate_millis(request.update_date);
    let count = request.items.len();

    let rows = request
        .items
        .into_iter()
        .map(|item| NewUnitVersion {
            id: item.id,
            name: item.name,
            parent_id: item.parent_id,
            unit_type: item.unit_type,
            price: item.price,
            update_date,
        })
        .collect();

    store.append(rows).await?;
    tracing::debug!(count, %update_date, "imported unit batch");
    Ok(())
}
