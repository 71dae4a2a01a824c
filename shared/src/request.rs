use crate::membership::MembershipRole;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateJoinRequestParams {
    pub user_id: i64,
    pub club_id: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Decision {
    Approve,
    Reject,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecideParams {
    pub decision: Decision,
    pub decided_by: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SetRoleParams {
    pub role: MembershipRole,
}

/// Query for list-memberships; exactly one of the two is set.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MembershipQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub club_id: Option<i64>,
}
