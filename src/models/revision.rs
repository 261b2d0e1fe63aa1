//! Revision metadata for change detection.

use serde::{Deserialize, Serialize};

/// Revision counter bumped on every structural mutation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RevisionInfo {
    pub revision_id: i64,
    pub generated_at: String,
}
