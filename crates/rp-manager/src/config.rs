//! Manager configuration.

use rp_core::{RouterError, RouterResult};
use rp_store::DEFAULT_HISTORY_SIZE;
use serde::{Deserialize, Serialize};

/// Search key the serialized cache travels under when
/// `add_cache_to_location` is set.
pub const DEFAULT_CACHE_SEARCH_KEY: &str = "__cache";

/// Top-level manager settings.
///
/// | Field                     | Default   | Effect                                              |
/// |---------------------------|-----------|-----------------------------------------------------|
/// | `history_size`            | 2         | Past states kept per router in the state store      |
/// | `error_when_missing_data` | `true`    | `false` records data routers shown without data     |
/// | `cache_search_key`        | `__cache` | Search key for the embedded cache                   |
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ManagerConfig {
    pub history_size:            usize,
    pub error_when_missing_data: bool,
    pub cache_search_key:        String,
}

impl Default for ManagerConfig {
    fn default() -> Self {
        Self {
            history_size:            DEFAULT_HISTORY_SIZE,
            error_when_missing_data: true,
            cache_search_key:        DEFAULT_CACHE_SEARCH_KEY.to_owned(),
        }
    }
}

impl ManagerConfig {
    /// Parse from JSON; missing fields take their defaults.
    pub fn from_json(json: &str) -> RouterResult<Self> {
        serde_json::from_str(json).map_err(|e| RouterError::InvalidDeclaration(e.to_string()))
    }
}
