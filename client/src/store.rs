use std::collections::HashMap;

use shared::{Membership, MembershipStatus};

/// The boundary a store (and its event subscriptions) operates over:
/// either the current user's memberships or a single club's roster.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    User(i64),
    Club(i64),
}

#[derive(Debug, Clone, Default)]
pub struct MembershipFilter {
    pub status: Option<MembershipStatus>,
    pub club_id: Option<i64>,
    /// Case-insensitive match against member name or email.
    pub text: Option<String>,
}

/// The known-good set of membership records for one scope, keyed by
/// membership id with a secondary index of the active record per
/// (user, club) pair. This is the single source of truth in a client
/// process; all mutation goes through `upsert`/`remove`/`replace_all`,
/// each of which is idempotent.
#[derive(Debug)]
pub struct MembershipStore {
    scope: Scope,
    records: HashMap<i64, Membership>,
    active_by_pair: HashMap<(i64, i64), i64>,
}

impl MembershipStore {
    pub fn new(scope: Scope) -> Self {
        Self {
            scope,
            records: HashMap::new(),
            active_by_pair: HashMap::new(),
        }
    }

    pub fn scope(&self) -> Scope {
        self.scope
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, id: i64) -> Option<&Membership> {
        self.records.get(&id)
    }

    /// The single pending-or-approved record for a (user, club) pair,
    /// if any. The store guarantees there is never more than one.
    pub fn active_for(&self, user_id: i64, club_id: i64) -> Option<&Membership> {
        self.active_by_pair
            .get(&(user_id, club_id))
            .and_then(|id| self.records.get(id))
    }

    fn in_scope(&self, record: &Membership) -> bool {
        match self.scope {
            Scope::User(user_id) => record.user_id == user_id,
            Scope::Club(club_id) => record.club_id == club_id,
        }
    }

    /// Inserts or replaces by membership id, collapsing on the
    /// (user, club) pair so that:
    /// - a fresh pending/approved record supersedes the pair's current
    ///   active record (the same logical request arriving under a new
    ///   id after an optimistic insert);
    /// - two pending/approved records never coexist for one pair.
    /// Terminal arrivals (rejected, left) never evict another id; they
    /// accumulate as history. On a known id the lifecycle is one-way:
    /// a redelivered old event cannot revive a resolved record.
    pub fn upsert(&mut self, mut record: Membership) {
        if !self.in_scope(&record) {
            tracing::debug!(membership_id = record.id, "upsert outside store scope, ignored");
            return;
        }
        let pair = record.pair();

        if let Some(prev) = self.records.get(&record.id) {
            let stale = match (prev.status, record.status) {
                (prev, MembershipStatus::Pending) if prev != MembershipStatus::Pending => true,
                (
                    MembershipStatus::Rejected | MembershipStatus::Left,
                    MembershipStatus::Approved,
                ) => true,
                _ => false,
            };
            if stale {
                tracing::debug!(
                    membership_id = record.id,
                    "stale status transition ignored"
                );
                return;
            }
            // approved_date/approved_by are immutable once set; a thin
            // update payload must not blank them.
            if prev.approved_date.is_some() && record.approved_date.is_none() {
                record.approved_date = prev.approved_date;
                record.approved_by = prev.approved_by;
            }
        } else if record.status.is_active() {
            if let Some(&prev_id) = self.active_by_pair.get(&pair) {
                self.records.remove(&prev_id);
                self.active_by_pair.remove(&pair);
            }
        }

        if record.status.is_active() {
            self.active_by_pair.insert(pair, record.id);
        } else if self.active_by_pair.get(&pair) == Some(&record.id) {
            self.active_by_pair.remove(&pair);
        }
        self.records.insert(record.id, record);
    }

    /// Deletes a record. Safe to call for an id the store never held.
    pub fn remove(&mut self, id: i64) {
        if let Some(record) = self.records.remove(&id) {
            let pair = record.pair();
            if self.active_by_pair.get(&pair) == Some(&id) {
                self.active_by_pair.remove(&pair);
            }
        }
    }

    /// Replaces the full contents from an authoritative refetch. The
    /// backend list is taken as-is, in any order; only the active
    /// index is rebuilt.
    pub fn replace_all(&mut self, records: Vec<Membership>) {
        self.records.clear();
        self.active_by_pair.clear();
        for record in records {
            if !self.in_scope(&record) {
                continue;
            }
            if record.status.is_active() {
                self.active_by_pair.insert(record.pair(), record.id);
            }
            self.records.insert(record.id, record);
        }
    }

    /// Read-only snapshot ordered by request date ascending, ties
    /// broken by id so the ordering is stable.
    pub fn list(&self, filter: &MembershipFilter) -> Vec<Membership> {
        let text = filter.text.as_deref().map(str::to_lowercase);
        let mut out: Vec<Membership> = self
            .records
            .values()
            .filter(|r| filter.status.map_or(true, |s| r.status == s))
            .filter(|r| filter.club_id.map_or(true, |c| r.club_id == c))
            .filter(|r| {
                text.as_deref().map_or(true, |t| {
                    let name = r.member_name.as_deref().unwrap_or_default().to_lowercase();
                    let email = r.member_email.as_deref().unwrap_or_default().to_lowercase();
                    name.contains(t) || email.contains(t)
                })
            })
            .cloned()
            .collect();
        out.sort_by(|a, b| {
            a.request_date
                .cmp(&b.request_date)
                .then(a.id.cmp(&b.id))
        });
        out
    }
}
