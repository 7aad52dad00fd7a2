//! Offers whose price changed in the trailing 24-hour window.

use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

use crate::error::CatalogResult;
use crate::models::unit::{StatisticResponse, StatisticUnit, UnitVersion};
use crate::store::VersionStore;

/// Offers updated within `[at - 24h, at]`, both ends inclusive: one entry
/// per offer id, carrying that id's most recent version in the window.
/// Order is unspecified.
pub async fn get_sales(
    store: &dyn VersionStore,
    at: DateTime<Utc>,
) -> CatalogResult<StatisticResponse> {
    let start = at - Duration::hours(24);
    let versions = store.offers_updated_between(start, at).await?;

    let mut newest: HashMap<Uuid, UnitVersion> = HashMap::new();
    for version in versions {
        match newest.get(&version.id) {
            Some(kept) if (kept.update_date, kept.seq) >= (version.update_date, version.seq) => {}
            _ => {
                newest.insert(version.id, version);
            }
        }
    }

    let items = newest
        .into_values()
        .map(|version| StatisticUnit {
            id: version.id,
            name: version.name,
            parent_id: version.parent_id,
            unit_type: version.unit_type,
            price: version.price,
            date: version.update_date,
        })
        .collect();

    Ok(StatisticResponse { items })
}
