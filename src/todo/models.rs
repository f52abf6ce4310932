use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Database model for todos
///
/// Invariant: `completed == true` exactly when `completed_at` is set. Both
/// fields are derived together on every update, never taken from the client.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TodoModel {
    pub id: String, // UUID v4 as string
    pub title: String,
    pub description: Option<String>,
    pub completed: bool,
    #[serde(with = "chrono::serde::ts_milliseconds_option")]
    pub completed_at: Option<DateTime<Utc>>,
    pub created_by: String, // owning user's id, immutable
}

impl TodoModel {
    /// Creates a new open todo with a generated id
    pub fn new(title: String, description: Option<String>, created_by: String) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            title,
            description,
            completed: false,
            completed_at: None,
            created_by,
        }
    }
}
