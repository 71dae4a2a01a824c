use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use shared::{Actor, Decision, Membership, MembershipRole, MembershipStats, MembershipStatus};

use crate::backend::BackendClient;
use crate::error::{CommandError, CommandResult};
use crate::store::MembershipStore;

pub type SharedStore = Arc<Mutex<MembershipStore>>;

/// What a command is acting on. At most one command per target may be
/// in flight; a second one is rejected locally instead of queued, so a
/// double-click (or a programmatic caller) can never race itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandTarget {
    Club(i64),
    Membership(i64),
}

/// Issues the user-initiated mutations and applies each successful
/// result to the store. Failures leave the store untouched; a conflict
/// additionally triggers a scoped refetch so the local mirror catches
/// up with whatever authoritative state caused it.
pub struct Commands {
    backend: BackendClient,
    store: SharedStore,
    actor: Actor,
    in_flight: Mutex<HashSet<CommandTarget>>,
}

struct InFlightGuard<'a> {
    set: &'a Mutex<HashSet<CommandTarget>>,
    target: CommandTarget,
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.set.lock().unwrap().remove(&self.target);
    }
}

impl Commands {
    pub fn new(backend: BackendClient, store: SharedStore, actor: Actor) -> Self {
        Self {
            backend,
            store,
            actor,
            in_flight: Mutex::new(HashSet::new()),
        }
    }

    pub fn actor(&self) -> Actor {
        self.actor
    }

    fn begin(&self, target: CommandTarget) -> CommandResult<InFlightGuard<'_>> {
        let mut in_flight = self.in_flight.lock().unwrap();
        if !in_flight.insert(target) {
            return Err(CommandError::InFlight);
        }
        Ok(InFlightGuard {
            set: &self.in_flight,
            target,
        })
    }

    fn require_manager(&self) -> CommandResult<()> {
        if self.actor.can_manage() {
            Ok(())
        } else {
            Err(CommandError::Authorization(
                "Only club leaders can manage memberships".to_string(),
            ))
        }
    }

    /// Request to join a club. Rejected locally when an active
    /// (pending or approved) membership for the club already exists.
    pub async fn join(&self, club_id: i64) -> CommandResult<Membership> {
        if club_id <= 0 {
            return Err(CommandError::Validation(
                "A club must be selected".to_string(),
            ));
        }
        {
            let store = self.store.lock().unwrap();
            if store.active_for(self.actor.user_id, club_id).is_some() {
                return Err(CommandError::Conflict(
                    "You already have an active membership for this club".to_string(),
                ));
            }
        }
        let _guard = self.begin(CommandTarget::Club(club_id))?;
        match self
            .backend
            .create_join_request(self.actor.user_id, club_id)
            .await
        {
            Ok(membership) => {
                tracing::info!(membership_id = membership.id, club_id, "join request created");
                self.store.lock().unwrap().upsert(membership.clone());
                Ok(membership)
            }
            Err(err) => self.fail(err).await,
        }
    }

    /// Approve or reject a pending request. One-way per request
    /// instance; a request the store already knows to be decided is
    /// rejected without a network call.
    pub async fn decide(
        &self,
        membership_id: i64,
        decision: Decision,
    ) -> CommandResult<Membership> {
        self.require_manager()?;
        let _guard = self.begin(CommandTarget::Membership(membership_id))?;
        if let Some(existing) = self.store.lock().unwrap().get(membership_id) {
            if existing.status.is_terminal() {
                return Err(CommandError::Conflict(
                    "This request has already been decided".to_string(),
                ));
            }
        }
        match self
            .backend
            .decide(membership_id, decision, self.actor.user_id)
            .await
        {
            Ok(membership) => {
                tracing::info!(membership_id, status = %membership.status, "request decided");
                self.store.lock().unwrap().upsert(membership.clone());
                Ok(membership)
            }
            Err(err) => self.fail(err).await,
        }
    }

    /// Change an approved member's role. Status is untouched.
    pub async fn set_role(
        &self,
        membership_id: i64,
        role: MembershipRole,
    ) -> CommandResult<Membership> {
        self.require_manager()?;
        let _guard = self.begin(CommandTarget::Membership(membership_id))?;
        if let Some(existing) = self.store.lock().unwrap().get(membership_id) {
            if existing.status != MembershipStatus::Approved {
                return Err(CommandError::Validation(
                    "Only approved members have a role".to_string(),
                ));
            }
        }
        match self.backend.set_role(membership_id, role).await {
            Ok(membership) => {
                tracing::info!(membership_id, role = %role, "role updated");
                self.store.lock().unwrap().upsert(membership.clone());
                Ok(membership)
            }
            Err(err) => self.fail(err).await,
        }
    }

    /// Remove a member from the active roster. The actor's own
    /// membership is off limits.
    pub async fn remove(&self, membership_id: i64) -> CommandResult<()> {
        self.require_manager()?;
        {
            let store = self.store.lock().unwrap();
            if let Some(existing) = store.get(membership_id) {
                if existing.user_id == self.actor.user_id {
                    return Err(CommandError::Authorization(
                        "You cannot remove your own membership".to_string(),
                    ));
                }
            }
        }
        let _guard = self.begin(CommandTarget::Membership(membership_id))?;
        match self.backend.remove_membership(membership_id).await {
            Ok(()) => {
                tracing::info!(membership_id, "member removed");
                self.store.lock().unwrap().remove(membership_id);
                Ok(())
            }
            Err(err) => self.fail(err).await,
        }
    }

    pub async fn membership_stats(&self, club_id: i64) -> CommandResult<MembershipStats> {
        self.backend.membership_stats(club_id).await
    }

    /// Refetches the store's whole scope from the backend and replaces
    /// the local contents.
    pub async fn refetch(&self) -> CommandResult<()> {
        let scope = self.store.lock().unwrap().scope();
        let records = self.backend.list_memberships(scope).await?;
        self.store.lock().unwrap().replace_all(records);
        Ok(())
    }

    async fn fail<T>(&self, err: CommandError) -> CommandResult<T> {
        if matches!(err, CommandError::Conflict(_)) {
            // The store is behind whatever state caused the conflict.
            if let Err(refetch_err) = self.refetch().await {
                tracing::warn!(error = %refetch_err, "refetch after conflict failed");
            }
        }
        Err(err)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::backend::{BackendClient, Settings};
    use crate::store::{MembershipStore, Scope};
    use shared::ActorRole;

    fn commands(actor: Actor, scope: Scope) -> Commands {
        let backend = BackendClient::new(Settings {
            base_url: "http://127.0.0.1:9".to_string(),
            timeout_secs: 1,
        })
        .unwrap();
        let store = Arc::new(Mutex::new(MembershipStore::new(scope)));
        Commands::new(backend, store, actor)
    }

    #[test]
    fn in_flight_lock_rejects_second_command_on_same_target() {
        let commands = commands(
            Actor {
                user_id: 1,
                role: ActorRole::Leader,
            },
            Scope::Club(7),
        );
        let guard = commands.begin(CommandTarget::Membership(5)).unwrap();
        assert!(matches!(
            commands.begin(CommandTarget::Membership(5)),
            Err(CommandError::InFlight)
        ));
        // Different target is unaffected.
        assert!(commands.begin(CommandTarget::Membership(6)).is_ok());
        drop(guard);
        assert!(commands.begin(CommandTarget::Membership(5)).is_ok());
    }

    #[tokio::test]
    async fn plain_actor_cannot_decide() {
        let commands = commands(
            Actor {
                user_id: 1,
                role: ActorRole::Plain,
            },
            Scope::Club(7),
        );
        let err = commands.decide(5, Decision::Approve).await.unwrap_err();
        assert!(matches!(err, CommandError::Authorization(_)));
    }

    #[tokio::test]
    async fn join_requires_a_club() {
        let commands = commands(
            Actor {
                user_id: 1,
                role: ActorRole::Plain,
            },
            Scope::User(1),
        );
        let err = commands.join(0).await.unwrap_err();
        assert!(matches!(err, CommandError::Validation(_)));
    }

    #[tokio::test]
    async fn decide_on_known_terminal_membership_is_a_conflict() {
        use crate::store::test::membership;
        use shared::MembershipStatus;

        let commands = commands(
            Actor {
                user_id: 1,
                role: ActorRole::Leader,
            },
            Scope::Club(7),
        );
        commands
            .store
            .lock()
            .unwrap()
            .upsert(membership(5, 2, 7, MembershipStatus::Rejected));
        let err = commands.decide(5, Decision::Approve).await.unwrap_err();
        assert!(matches!(err, CommandError::Conflict(_)));
    }
}
