use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::datetime;

/// Kind of a catalog unit. Immutable for a given id across its whole history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum UnitType {
    Offer,
    Category,
}

impl UnitType {
    pub fn as_str(&self) -> &'static str {
        match self {
            UnitType::Offer => "OFFER",
            UnitType::Category => "CATEGORY",
        }
    }

    pub fn from_db(s: &str) -> Option<Self> {
        match s {
            "OFFER" => Some(UnitType::Offer),
            "CATEGORY" => Some(UnitType::Category),
            _ => None,
        }
    }
}

/// One stored version of a unit, as read back from the version store.
///
/// `seq` is assigned by the store at append time and makes "latest version"
/// deterministic when two versions share an `update_date`: latest always
/// means greatest `(update_date, seq)`.
#[derive(Debug, Clone, PartialEq)]
pub struct UnitVersion {
    pub seq: i64,
    pub id: Uuid,
    pub name: String,
    pub parent_id: Option<Uuid>,
    pub unit_type: UnitType,
    pub price: Option<i64>,
    pub update_date: DateTime<Utc>,
}

/// A version row about to be appended; the store assigns `seq`.
#[derive(Debug, Clone)]
pub struct NewUnitVersion {
    pub id: Uuid,
    pub name: String,
    pub parent_id: Option<Uuid>,
    pub unit_type: UnitType,
    pub price: Option<i64>,
    pub update_date: DateTime<Utc>,
}

/// One item of an import batch.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnitImport {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub parent_id: Option<Uuid>,
    #[serde(rename = "type")]
    pub unit_type: UnitType,
    #[serde(default)]
    pub price: Option<i64>,
}

/// Import request body: a batch of units sharing one update date.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportRequest {
    pub items: Vec<UnitImport>,
    #[serde(with = "datetime")]
    pub update_date: DateTime<Utc>,
}

/// Materialized view of a unit and, for categories, its subtree.
///
/// `price` of a category is the floored average over all offer prices in its
/// subtree, or null when the subtree holds no offers. `children` is null for
/// offers and a (possibly empty) array for categories.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnitNode {
    pub id: Uuid,
    pub name: String,
    pub parent_id: Option<Uuid>,
    #[serde(rename = "type")]
    pub unit_type: UnitType,
    pub price: Option<i64>,
    #[serde(with = "datetime")]
    pub date: DateTime<Utc>,
    pub children: Option<Vec<UnitNode>>,
}

/// One entry of a statistic or sales response; `date` is the instant the
/// entry represents.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatisticUnit {
    pub id: Uuid,
    pub name: String,
    pub parent_id: Option<Uuid>,
    #[serde(rename = "type")]
    pub unit_type: UnitType,
    pub price: Option<i64>,
    #[serde(with = "datetime")]
    pub date: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatisticResponse {
    pub items: Vec<StatisticUnit>,
}

/// Query parameters of the statistic endpoint, a half-open `[start, end)`.
#[derive(Debug, Clone, Deserialize)]
pub struct StatisticQuery {
    #[serde(with = "datetime")]
    pub start_date: DateTime<Utc>,
    #[serde(with = "datetime")]
    pub end_date: DateTime<Utc>,
}

/// Query parameters of the sales endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct SalesQuery {
    #[serde(with = "datetime")]
    pub date: DateTime<Utc>,
}

/// Uniform wire error body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub code: u16,
    pub message: String,
}
