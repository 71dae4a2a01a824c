use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActorRole {
    Plain,
    Leader,
    Admin,
}

/// The authenticated identity supplied to the client core. The core
/// never authenticates anyone; it only gates behavior on these claims.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    pub user_id: i64,
    pub role: ActorRole,
}

impl Actor {
    pub fn can_manage(&self) -> bool {
        matches!(self.role, ActorRole::Leader | ActorRole::Admin)
    }
}
