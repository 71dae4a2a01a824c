use crate::membership::{Membership, MembershipStatus};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Every push notification the client core consumes, one variant per
/// event kind with a fixed payload shape. Payloads are intentionally
/// thin; whether a kind carries enough to patch in place is the
/// reconciler's call, not the transport's.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum ClubEvent {
    /// A new join request was created for a club roster.
    ClubJoinRequest { club_id: i64, membership: Membership },
    /// A pending request was approved or rejected.
    ClubMembershipUpdated { club_id: i64, membership: Membership },
    /// An approved member's role changed.
    ClubMemberRoleUpdated { club_id: i64, membership: Membership },
    /// A member was removed from a club's active roster.
    ClubMemberRemoved {
        club_id: i64,
        membership_id: i64,
        user_id: i64,
    },
    /// User-scope notification that the subscriber's own membership
    /// status changed somewhere.
    MembershipStatusChanged {
        club_id: i64,
        membership_id: i64,
        status: MembershipStatus,
    },
    /// Club content (name, description, schedule) changed. Outside the
    /// membership core; normalized so the listener stays exhaustive.
    ClubUpdated { club_id: i64 },
}

impl ClubEvent {
    pub fn club_id(&self) -> i64 {
        match self {
            Self::ClubJoinRequest { club_id, .. }
            | Self::ClubMembershipUpdated { club_id, .. }
            | Self::ClubMemberRoleUpdated { club_id, .. }
            | Self::ClubMemberRemoved { club_id, .. }
            | Self::MembershipStatusChanged { club_id, .. }
            | Self::ClubUpdated { club_id } => *club_id,
        }
    }
}

/// Subscription scope on the event channel. `CurrentUser` is the
/// implicit per-authenticated-user room; the transport resolves it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Topic {
    Club(i64),
    CurrentUser,
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Club(id) => write!(f, "club:{id}"),
            Self::CurrentUser => write!(f, "user"),
        }
    }
}
