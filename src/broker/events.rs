//! Identity-change fan-out shared by broker implementations

use parking_lot::Mutex;
use tokio::sync::mpsc;

use crate::types::{Identity, IdentityEvent};

#[derive(Debug, Default)]
struct HubState {
    current: Option<Identity>,
    subscribers: Vec<mpsc::UnboundedSender<IdentityEvent>>,
}

/// Tracks the current identity and fans events out to subscribers
///
/// Every subscription immediately receives the current snapshot, then every
/// subsequent change in publish order. Snapshot and registration happen
/// under the same lock as `publish`, so a subscriber either sees a change
/// in its snapshot or receives it as an event — never neither.
#[derive(Debug, Default)]
pub(crate) struct IdentityHub {
    state: Mutex<HubState>,
}

impl IdentityHub {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn current(&self) -> Option<Identity> {
        self.state.lock().current.clone()
    }

    pub(crate) fn subscribe(&self) -> mpsc::UnboundedReceiver<IdentityEvent> {
        let (tx, rx) = mpsc::unbounded_channel();
        let mut state = self.state.lock();
        // Snapshot first, so the subscriber always starts from known state
        let _ = tx.send(state.current.clone());
        state.subscribers.push(tx);
        rx
    }

    pub(crate) fn publish(&self, event: IdentityEvent) {
        let mut state = self.state.lock();
        state.current = event.clone();
        // Drop subscribers whose receiving side went away
        state.subscribers.retain(|tx| tx.send(event.clone()).is_ok());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn identity(uid: &str) -> Identity {
        Identity { uid: uid.to_string(), email: None, id_token: None }
    }

    #[tokio::test]
    async fn test_subscribe_receives_snapshot_first() {
        let hub = IdentityHub::new();
        hub.publish(Some(identity("abc")));

        let mut rx = hub.subscribe();
        let first = rx.recv().await.unwrap();
        assert_eq!(first.unwrap().uid, "abc");
    }

    #[tokio::test]
    async fn test_events_arrive_in_publish_order() {
        let hub = IdentityHub::new();
        let mut rx = hub.subscribe();
        assert_eq!(rx.recv().await.unwrap(), None);

        hub.publish(Some(identity("a")));
        hub.publish(None);
        hub.publish(Some(identity("b")));

        assert_eq!(rx.recv().await.unwrap().unwrap().uid, "a");
        assert_eq!(rx.recv().await.unwrap(), None);
        assert_eq!(rx.recv().await.unwrap().unwrap().uid, "b");
    }

    #[test]
    fn test_subscribe_racing_publish_never_loses_event() {
        // A publish landing mid-subscription must show up either in the
        // snapshot or as a delivered event; a subscriber left with a stale
        // snapshot and no event would stay signed out until the next
        // identity change.
        for i in 0..1000 {
            let hub = Arc::new(IdentityHub::new());

            let publisher = {
                let hub = Arc::clone(&hub);
                std::thread::spawn(move || hub.publish(Some(identity("abc"))))
            };
            let mut rx = hub.subscribe();
            publisher.join().unwrap();

            let mut saw_identity = false;
            while let Ok(event) = rx.try_recv() {
                if event.is_some() {
                    saw_identity = true;
                }
            }
            assert!(saw_identity, "iteration {i}: concurrently published identity was lost");
        }
    }
}
