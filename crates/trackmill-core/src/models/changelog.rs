//! Changelog entry data model

use serde::{Deserialize, Serialize};

/// One collected changelog note. The collector keys entries by the
/// originating issue id, so each issue contributes at most one entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChangelogEntry {
    /// Category label, usually inherited from a type-parent.
    pub entry_type: Option<String>,
    pub message: String,
}
