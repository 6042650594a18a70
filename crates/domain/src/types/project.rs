//! Project metadata (`projects/current`)

use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub id: String,
    pub display_name: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Provider-side project configuration (enabled OAuth providers, etc.)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config: Option<Value>,
}
