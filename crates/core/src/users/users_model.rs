use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A signed-in account. `subject` is the identity provider's stable
/// subject claim; `id` is ours.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub subject: String,
    pub email: Option<String>,
    pub display_name: Option<String>,
    pub created_at: DateTime<Utc>,
}
