//! Place Model

use serde::{Deserialize, Serialize};

/// Place entity - one unit of concurrent capacity within a zone
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Place {
    pub id: i64,
    pub zone_id: i64,
    pub name: String,
    pub is_active: bool,
}

/// Create place payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaceCreate {
    pub zone_id: i64,
    pub name: String,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

fn default_true() -> bool {
    true
}
