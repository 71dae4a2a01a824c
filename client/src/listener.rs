use std::collections::HashSet;

use serde_json::Value;
use shared::{ClubEvent, Topic};

/// Parses a raw push message into its canonical event shape. Malformed
/// payloads are logged and dropped; they must never stop the listener.
pub fn normalize(raw: &Value) -> Option<ClubEvent> {
    match serde_json::from_value::<ClubEvent>(raw.clone()) {
        Ok(event) => Some(event),
        Err(err) => {
            tracing::warn!(error = %err, "dropping malformed event payload");
            None
        }
    }
}

/// The set of event topics this client is joined to. Server-side room
/// membership does not survive a dropped transport, so the full set is
/// replayed on every (re)connect, not just on first subscribe.
#[derive(Debug, Default)]
pub struct SubscriptionSet {
    topics: HashSet<Topic>,
}

impl SubscriptionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a topic; returns true when it was not yet subscribed
    /// (i.e. the transport should be told to join it now).
    pub fn subscribe(&mut self, topic: Topic) -> bool {
        self.topics.insert(topic)
    }

    pub fn unsubscribe(&mut self, topic: Topic) -> bool {
        self.topics.remove(&topic)
    }

    pub fn contains(&self, topic: Topic) -> bool {
        self.topics.contains(&topic)
    }

    /// Everything the transport must re-join after a reconnect.
    pub fn replay(&self) -> Vec<Topic> {
        let mut topics: Vec<Topic> = self.topics.iter().copied().collect();
        topics.sort_by_key(|t| t.to_string());
        topics
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use serde_json::json;

    #[test]
    fn normalizes_known_kind() {
        let raw = json!({
            "type": "club-member-removed",
            "club_id": 7,
            "membership_id": 5,
            "user_id": 2,
        });
        let event = normalize(&raw).unwrap();
        assert_eq!(
            event,
            ClubEvent::ClubMemberRemoved {
                club_id: 7,
                membership_id: 5,
                user_id: 2,
            }
        );
    }

    #[test]
    fn malformed_payload_is_dropped() {
        assert!(normalize(&json!({ "type": "club-join-request" })).is_none());
        assert!(normalize(&json!({ "kind": "unknown" })).is_none());
        assert!(normalize(&json!(42)).is_none());
    }

    #[test]
    fn replay_covers_every_subscription_once() {
        let mut subs = SubscriptionSet::new();
        assert!(subs.subscribe(Topic::Club(7)));
        assert!(!subs.subscribe(Topic::Club(7)));
        assert!(subs.subscribe(Topic::CurrentUser));
        assert_eq!(subs.replay().len(), 2);
        assert!(subs.contains(Topic::Club(7)));

        assert!(subs.unsubscribe(Topic::Club(7)));
        assert_eq!(subs.replay(), vec![Topic::CurrentUser]);
    }
}
