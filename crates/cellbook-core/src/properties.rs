//! Built-in document properties

use chrono::NaiveDateTime;

/// Document metadata carried through load and save unchanged
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DocumentProperties {
    pub author: Option<String>,
    pub title: Option<String>,
    /// Creation time (UTC)
    pub created_date: Option<NaiveDateTime>,
    pub modified_by: Option<String>,
    /// Last modification time (UTC)
    pub modified_date: Option<NaiveDateTime>,
    pub subject: Option<String>,
}

impl DocumentProperties {
    /// Properties stamped with the current time as both created and modified
    pub fn now() -> Self {
        let now = chrono::Utc::now().naive_utc();
        Self {
            created_date: Some(now),
            modified_date: Some(now),
            ..Self::default()
        }
    }

    /// Check whether nothing is set
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}
