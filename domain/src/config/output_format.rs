//! Output format value object

use serde::{Deserialize, Serialize};

/// How a fetch result is rendered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Just the grouped count (default)
    #[default]
    Count,
    /// Count plus a per-relay breakdown
    Full,
    /// JSON report
    Json,
}
