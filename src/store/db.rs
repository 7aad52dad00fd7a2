//! SeaORM-backed version store.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::{
    ColumnTrait, DatabaseConnection, DbErr, EntityTrait, Order, QueryFilter, QueryOrder,
    QuerySelect, Set,
};
use uuid::Uuid;

use crate::entities::{prelude::*, unit_versions};
use crate::error::CatalogResult;
use crate::models::unit::{NewUnitVersion, UnitType, UnitVersion};
use crate::store::{ChildLink, VersionStore};

#[derive(Clone)]
pub struct DbStore {
    db: DatabaseConnection,
}

impl DbStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn to_version(model: unit_versions::Model) -> Result<UnitVersion, DbErr> {
    let unit_type = UnitType::from_db(&model.unit_type).ok_or_else(|| {
        DbErr::Custom(format!(
            "unit {} row {} carries unknown type {:?}",
            model.unit_id, model.seq, model.unit_type
        ))
    })?;

    Ok(UnitVersion {
        seq: model.seq,
        id: model.unit_id,
        name: model.name,
        parent_id: model.parent_id,
        unit_type,
        price: model.price,
        update_date: model.update_date.with_timezone(&Utc),
    })
}

fn latest_query(id: Uuid) -> sea_orm::Select<UnitVersions> {
    UnitVersions::find()
        .filter(unit_versions::Column::UnitId.eq(id))
        .order_by(unit_versions::Column::UpdateDate, Order::Desc)
        .order_by(unit_versions::Column::Seq, Order::Desc)
}

#[async_trait]
impl VersionStore for DbStore {
    async fn append(&self, rows: Vec<NewUnitVersion>) -> CatalogResult<()> {
        if rows.is_empty() {
            return Ok(());
        }

        let models = rows.into_iter().map(|row| unit_versions::ActiveModel {
            unit_id: Set(row.id),
            name: Set(row.name),
            parent_id: Set(row.parent_id),
            unit_type: Set(row.unit_type.as_str().to_string()),
            price: Set(row.price),
            update_date: Set(row.update_date.fixed_offset()),
            ..Default::default()
        });

        UnitVersions::insert_many(models).exec(&self.db).await?;
        Ok(())
    }

    async fn latest(&self, id: Uuid) -> CatalogResult<Option<UnitVersion>> {
        let model = latest_query(id).one(&self.db).await?;
        Ok(model.map(to_version).transpose()?)
    }

    async fn latest_at(
        &self,
        id: Uuid,
        at: DateTime<Utc>,
    ) -> CatalogResult<Option<UnitVersion>> {
        let model = latest_query(id)
            .filter(unit_versions::Column::UpdateDate.lte(at.fixed_offset()))
            .one(&self.db)
            .await?;
        Ok(model.map(to_version).transpose()?)
    }

    async fn current_types(&self) -> CatalogResult<HashMap<Uuid, UnitType>> {
        let pairs: Vec<(Uuid, String)> = UnitVersions::find()
            .select_only()
            .column(unit_versions::Column::UnitId)
            .column(unit_versions::Column::UnitType)
            .distinct()
            .into_tuple()
            .all(&self.db)
            .await?;

        let mut types = HashMap::with_capacity(pairs.len());
        for (id, raw) in pairs {
            let unit_type = UnitType::from_db(&raw).ok_or_else(|| {
                DbErr::Custom(format!("unit {id} carries unknown type {raw:?}"))
            })?;
            types.insert(id, unit_type);
        }
        Ok(types)
    }

    async fn child_ids(&self, parent_id: Uuid) -> CatalogResult<Vec<Uuid>> {
        let ids: Vec<Uuid> = UnitVersions::find()
            .select_only()
            .column(unit_versions::Column::UnitId)
            .filter(unit_versions::Column::ParentId.eq(parent_id))
            .distinct()
            .into_tuple()
            .all(&self.db)
            .await?;
        Ok(ids)
    }

    async fn child_links(&self, parent_id: Uuid) -> CatalogResult<Vec<ChildLink>> {
        let pairs: Vec<(Uuid, String)> = UnitVersions::find()
            .select_only()
            .column(unit_versions::Column::UnitId)
            .column(unit_versions::Column::UnitType)
            .filter(unit_versions::Column::ParentId.eq(parent_id))
            .distinct()
            .into_tuple()
            .all(&self.db)
            .await?;

        let mut links = Vec::with_capacity(pairs.len());
        for (id, raw) in pairs {
            let unit_type = UnitType::from_db(&raw).ok_or_else(|| {
                DbErr::Custom(format!("unit {id} carries unknown type {raw:?}"))
            })?;
            links.push(ChildLink {
                id,
                parent_id,
                unit_type,
            });
        }
        Ok(links)
    }

    async fn latest_children_at(
        &self,
        parent_id: Uuid,
        at: DateTime<Utc>,
    ) -> CatalogResult<Vec<UnitVersion>> {
        let models = UnitVersions::find()
            .filter(unit_versions::Column::ParentId.eq(parent_id))
            .filter(unit_versions::Column::UpdateDate.lte(at.fixed_offset()))
            .all(&self.db)
            .await?;

        let mut latest: HashMap<Uuid, UnitVersion> = HashMap::new();
        for model in models {
            let version = to_version(model)?;
            match latest.get(&version.id) {
                Some(kept) if (kept.update_date, kept.seq) >= (version.update_date, version.seq) => {}
                _ => {
                    latest.insert(version.id, version);
                }
            }
        }
        Ok(latest.into_values().collect())
    }

    async fn update_dates(&self, id: Uuid) -> CatalogResult<Vec<DateTime<Utc>>> {
        let dates: Vec<chrono::DateTime<chrono::FixedOffset>> = UnitVersions::find()
            .select_only()
            .column(unit_versions::Column::UpdateDate)
            .filter(unit_versions::Column::UnitId.eq(id))
            .distinct()
            .into_tuple()
            .all(&self.db)
            .await?;
        Ok(dates.into_iter().map(|d| d.with_timezone(&Utc)).collect())
    }

    async fn offers_updated_between(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> CatalogResult<Vec<UnitVersion>> {
        let models = UnitVersions::find()
            .filter(unit_versions::Column::UnitType.eq(UnitType::Offer.as_str()))
            .filter(unit_versions::Column::UpdateDate.gte(start.fixed_offset()))
            .filter(unit_versions::Column::UpdateDate.lte(end.fixed_offset()))
            .all(&self.db)
            .await?;
        models
            .into_iter()
            .map(|m| to_version(m).map_err(Into::into))
            .collect()
    }

    async fn delete_link(&self, id: Uuid, parent_id: Uuid) -> CatalogResult<u64> {
        let result = UnitVersions::delete_many()
            .filter(unit_versions::Column::UnitId.eq(id))
            .filter(unit_versions::Column::ParentId.eq(parent_id))
            .exec(&self.db)
            .await?;
        Ok(result.rows_affected)
    }

    async fn delete_unit(&self, id: Uuid) -> CatalogResult<u64> {
        let result = UnitVersions::delete_many()
            .filter(unit_versions::Column::UnitId.eq(id))
            .exec(&self.db)
            .await?;
        Ok(result.rows_affected)
    }
}
