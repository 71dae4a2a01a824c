use std::collections::HashSet;

use shared::ClubEvent;

use crate::store::{MembershipStore, Scope};

/// Membership ids a view is currently editing. Passed explicitly into
/// every reconcile call; events touching a held id are deferred rather
/// than applied underneath the open editor.
#[derive(Debug, Default)]
pub struct Suppression {
    ids: HashSet<i64>,
}

impl Suppression {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn hold(&mut self, membership_id: i64) {
        self.ids.insert(membership_id);
    }

    pub fn release(&mut self, membership_id: i64) {
        self.ids.remove(&membership_id);
    }

    pub fn holds(&self, membership_id: i64) -> bool {
        self.ids.contains(&membership_id)
    }
}

/// What `apply` did with an event, and what the caller owes in return.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Patched in place; views can re-derive immediately.
    Patched,
    /// Removed from the store.
    Removed,
    /// The payload was too thin (or unknown locally); the caller must
    /// refetch this scope to stay correct.
    Refetch(Scope),
    /// Held back because a view is editing this membership.
    Deferred(i64),
    /// Not relevant to this store's scope, or outside the core.
    Ignored,
}

/// Applies one inbound event to the store, choosing between an
/// in-place patch and a scoped refetch per event kind:
/// - join-request payloads never carry the requester's profile, so a
///   club roster always refetches;
/// - decided/role/removed carry a full membership (or an id), so they
///   patch in place, idempotently;
/// - own-status-changed can cascade into club detail the payload does
///   not carry, so a user store always refetches.
pub fn apply(store: &mut MembershipStore, event: ClubEvent, suppression: &Suppression) -> Outcome {
    let scope = store.scope();
    match event {
        ClubEvent::ClubJoinRequest { club_id, membership } => match scope {
            Scope::Club(c) if c == club_id => Outcome::Refetch(scope),
            Scope::User(u) if u == membership.user_id => Outcome::Refetch(scope),
            _ => Outcome::Ignored,
        },
        ClubEvent::ClubMembershipUpdated { membership, .. }
        | ClubEvent::ClubMemberRoleUpdated { membership, .. } => {
            if !in_scope(scope, membership.user_id, membership.club_id) {
                return Outcome::Ignored;
            }
            if suppression.holds(membership.id) {
                tracing::debug!(membership_id = membership.id, "event deferred, view editing");
                return Outcome::Deferred(membership.id);
            }
            if store.get(membership.id).is_none() {
                // No local record to patch; a partial insert could miss
                // profile or club detail the payload does not carry.
                return Outcome::Refetch(scope);
            }
            store.upsert(membership);
            Outcome::Patched
        }
        ClubEvent::ClubMemberRemoved {
            club_id,
            membership_id,
            user_id,
        } => {
            if !in_scope(scope, user_id, club_id) {
                return Outcome::Ignored;
            }
            if suppression.holds(membership_id) {
                return Outcome::Deferred(membership_id);
            }
            store.remove(membership_id);
            Outcome::Removed
        }
        ClubEvent::MembershipStatusChanged { .. } => match scope {
            // A status change can cascade into club detail data the
            // event does not carry in full.
            Scope::User(_) => Outcome::Refetch(scope),
            Scope::Club(_) => Outcome::Ignored,
        },
        ClubEvent::ClubUpdated { .. } => Outcome::Ignored,
    }
}

fn in_scope(scope: Scope, user_id: i64, club_id: i64) -> bool {
    match scope {
        Scope::User(u) => user_id == u,
        Scope::Club(c) => club_id == c,
    }
}
