//! Introspection settings.
//!
//! `IntrospectConfig` deserializes with defaults for every field, so it can
//! be embedded in a caller's own configuration file:
//!
//! ```json
//! { "normalize_types": true, "name_case": "lower", "sort": true }
//! ```

use serde::{Deserialize, Serialize};
use sift_schema::{NameCase, Normalization};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IntrospectConfig {
    /// Map declared type spellings onto their canonical names.
    pub normalize_types: bool,

    /// Drop `default null` on nullable columns.
    pub normalize_defaults: bool,

    /// Fold table, column and index names to one case.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name_case: Option<NameCase>,

    /// Sort tables, columns and indices by name.
    pub sort: bool,
}

impl IntrospectConfig {
    pub fn normalization(&self) -> Normalization {
        Normalization {
            types: self.normalize_types,
            defaults: self.normalize_defaults,
            names: self.name_case,
            sort: self.sort,
        }
    }
}

impl From<&IntrospectConfig> for Normalization {
    fn from(config: &IntrospectConfig) -> Self {
        config.normalization()
    }
}
