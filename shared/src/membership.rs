use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MembershipStatus {
    Pending,
    Approved,
    Rejected,
    Left,
}

impl MembershipStatus {
    /// An active membership blocks a fresh join request for the same club.
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Pending | Self::Approved)
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Pending)
    }
}

impl fmt::Display for MembershipStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::Approved => write!(f, "approved"),
            Self::Rejected => write!(f, "rejected"),
            Self::Left => write!(f, "left"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MembershipRole {
    Member,
    Staff,
    Leader,
}

impl fmt::Display for MembershipRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Member => write!(f, "member"),
            Self::Staff => write!(f, "staff"),
            Self::Leader => write!(f, "leader"),
        }
    }
}

/// A user's relationship to a club. `role` is only meaningful while
/// `status` is approved; `approved_date`/`approved_by` are set once, on
/// the transition into approved, and never change afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Membership {
    pub id: i64,
    pub user_id: i64,
    pub club_id: i64,
    pub status: MembershipStatus,
    pub role: MembershipRole,
    pub request_date: NaiveDateTime,
    pub approved_date: Option<NaiveDateTime>,
    pub approved_by: Option<i64>,
    /// Display copies for the leader queue's text filter; the backend
    /// fills them in when listing a club's memberships.
    pub member_name: Option<String>,
    pub member_email: Option<String>,
}

impl Membership {
    pub fn pair(&self) -> (i64, i64) {
        (self.user_id, self.club_id)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct MembershipStats {
    pub pending: i64,
    pub approved: i64,
    pub rejected: i64,
    pub active_members: i64,
}
