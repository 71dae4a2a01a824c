use std::sync::{Arc, Mutex};

use serde_json::Value;
use shared::{Actor, Club, ClubEvent, Membership, MembershipStats, Topic};
use tokio::sync::mpsc;

use crate::backend::BackendClient;
use crate::commands::{Commands, SharedStore};
use crate::error::CommandResult;
use crate::listener::{self, SubscriptionSet};
use crate::reconcile::{self, Outcome, Suppression};
use crate::settings::Settings;
use crate::store::{MembershipFilter, MembershipStore, Scope};

/// Wires one scope's store, command layer and event handling together.
/// Clone-free by design: share it behind an `Arc` and run the listener
/// loop from a spawned task while views issue commands.
pub struct ClubClient {
    backend: BackendClient,
    store: SharedStore,
    commands: Commands,
    suppression: Arc<Mutex<Suppression>>,
    subscriptions: Mutex<SubscriptionSet>,
}

/// Keeps reconciliation away from one membership while a view edits
/// it. Dropping the hold releases the suppression.
pub struct EditHold {
    suppression: Arc<Mutex<Suppression>>,
    membership_id: i64,
}

impl Drop for EditHold {
    fn drop(&mut self) {
        self.suppression.lock().unwrap().release(self.membership_id);
    }
}

impl ClubClient {
    pub fn new(settings: Settings, actor: Actor, scope: Scope) -> CommandResult<Self> {
        let backend = BackendClient::new(settings.backend)?;
        let store: SharedStore = Arc::new(Mutex::new(MembershipStore::new(scope)));
        let commands = Commands::new(backend.clone(), store.clone(), actor);

        let mut subscriptions = SubscriptionSet::new();
        match scope {
            Scope::User(_) => {
                subscriptions.subscribe(Topic::CurrentUser);
            }
            Scope::Club(club_id) => {
                subscriptions.subscribe(Topic::Club(club_id));
            }
        }

        Ok(Self {
            backend,
            store,
            commands,
            suppression: Arc::new(Mutex::new(Suppression::new())),
            subscriptions: Mutex::new(subscriptions),
        })
    }

    pub fn commands(&self) -> &Commands {
        &self.commands
    }

    pub fn store(&self) -> SharedStore {
        self.store.clone()
    }

    /// Snapshot of the store for view derivation.
    pub fn memberships(&self, filter: &MembershipFilter) -> Vec<Membership> {
        self.store.lock().unwrap().list(filter)
    }

    pub async fn clubs(&self) -> CommandResult<Vec<Club>> {
        self.backend.list_clubs().await
    }

    pub async fn stats(&self, club_id: i64) -> CommandResult<MembershipStats> {
        self.backend.membership_stats(club_id).await
    }

    /// Initial load and the recovery path: replaces the store from the
    /// backend's authoritative list for this scope.
    pub async fn refresh(&self) -> CommandResult<()> {
        self.commands.refetch().await
    }

    /// Topics the transport must (re-)join. Called on every connect,
    /// not just the first one; server-side room membership does not
    /// survive a reconnect.
    pub fn on_reconnect(&self) -> Vec<Topic> {
        self.subscriptions.lock().unwrap().replay()
    }

    pub fn subscribe(&self, topic: Topic) -> bool {
        self.subscriptions.lock().unwrap().subscribe(topic)
    }

    /// Marks a membership as being edited in some view. Inbound events
    /// for it are deferred until the returned hold is dropped.
    pub fn begin_edit(&self, membership_id: i64) -> EditHold {
        self.suppression.lock().unwrap().hold(membership_id);
        EditHold {
            suppression: self.suppression.clone(),
            membership_id,
        }
    }

    /// Consumes raw push messages until the channel closes. Malformed
    /// payloads are dropped inside `normalize`; nothing here can take
    /// the loop down.
    pub async fn run_listener(&self, mut rx: mpsc::Receiver<Value>) {
        while let Some(raw) = rx.recv().await {
            if let Some(event) = listener::normalize(&raw) {
                self.handle_event(event).await;
            }
        }
        tracing::info!("event stream closed");
    }

    /// Applies one normalized event, performing the refetch when the
    /// reconciler asks for one. A failed refetch keeps the previously
    /// known data in place.
    pub async fn handle_event(&self, event: ClubEvent) -> Outcome {
        let outcome = {
            let mut store = self.store.lock().unwrap();
            let suppression = self.suppression.lock().unwrap();
            reconcile::apply(&mut store, event, &suppression)
        };
        if let Outcome::Refetch(scope) = outcome {
            tracing::debug!(?scope, "event requires scoped refetch");
            if let Err(err) = self.commands.refetch().await {
                tracing::warn!(error = %err, "refetch failed, keeping last known data");
            }
        }
        outcome
    }
}
