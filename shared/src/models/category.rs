//! Category Model

use serde::{Deserialize, Serialize};

/// Category entity (分类)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Category {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub sort_order: i32,
}
