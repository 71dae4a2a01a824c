use serde::{Deserialize, Serialize};

/// Clubs are owned by the backend; clients hold read-only copies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Club {
    pub id: i64,
    pub name: String,
    pub category: String,
    pub description: String,
    pub meeting_schedule: Option<String>,
    pub location: Option<String>,
    pub logo_url: Option<String>,
    pub member_count: i64,
}
