use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Industry option for the prospect filter dropdowns.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Industry {
    pub id: Uuid,
    pub name: String,
}

/// Currency option for the prospect filter dropdowns.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Currency {
    pub code: String,
    pub name: String,
}
