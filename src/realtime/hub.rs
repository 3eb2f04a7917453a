// Match-room hub. All connection identity and room membership lives in
// one registry owned by the hub; nothing here is a global.
use std::collections::{HashMap, HashSet};

use chrono::Utc;
use tokio::sync::{mpsc, Mutex};
use uuid::Uuid;

use crate::realtime::events::ServerEvent;

pub type ConnectionId = Uuid;

#[derive(Debug, Clone)]
pub struct Identity {
    pub username: String,
    pub user_id: Option<i64>,
}

struct Connection {
    sender: mpsc::UnboundedSender<ServerEvent>,
    identity: Option<Identity>,
    /// A connection sits in at most one match room; last join wins.
    room: Option<String>,
}

#[derive(Default)]
struct Registry {
    connections: HashMap<ConnectionId, Connection>,
    rooms: HashMap<String, HashSet<ConnectionId>>,
}

impl Registry {
    /// Fire-and-forget delivery to every room member except `exclude`.
    /// A closed receiver just drops the event; slow consumers never
    /// block the broadcaster.
    fn broadcast(&self, room: &str, event: &ServerEvent, exclude: Option<ConnectionId>) {
        let Some(members) = self.rooms.get(room) else {
            return;
        };
        for member in members {
            if Some(*member) == exclude {
                continue;
            }
            if let Some(conn) = self.connections.get(member) {
                let _ = conn.sender.send(event.clone());
            }
        }
    }

    fn remove_from_room(&mut self, id: ConnectionId, room: &str) {
        if let Some(members) = self.rooms.get_mut(room) {
            members.remove(&id);
            if members.is_empty() {
                self.rooms.remove(room);
            }
        }
    }
}

pub struct Hub {
    registry: Mutex<Registry>,
}

pub fn room_name(match_id: &str) -> String {
    format!("match_{}", match_id)
}

impl Hub {
    pub fn new() -> Self {
        Self {
            registry: Mutex::new(Registry::default()),
        }
    }

    pub async fn connect(&self, sender: mpsc::UnboundedSender<ServerEvent>) -> ConnectionId {
        let id = Uuid::new_v4();
        let mut registry = self.registry.lock().await;
        registry.connections.insert(
            id,
            Connection {
                sender,
                identity: None,
                room: None,
            },
        );
        tracing::info!("socket connected: {}", id);
        id
    }

    pub async fn authenticate(&self, id: ConnectionId, username: String, user_id: Option<i64>) {
        let mut registry = self.registry.lock().await;
        if let Some(conn) = registry.connections.get_mut(&id) {
            tracing::info!("socket {} authenticated as {}", id, username);
            conn.identity = Some(Identity { username, user_id });
        }
    }

    /// Joins the room for a match. Re-joining the current room is a
    /// no-op; joining a different room leaves the old one first.
    /// Existing members get `user-joined` when the joiner has an
    /// identity; anonymous joins announce nothing.
    pub async fn join(&self, id: ConnectionId, match_id: &str) {
        let room = room_name(match_id);
        let mut registry = self.registry.lock().await;

        let Some(conn) = registry.connections.get_mut(&id) else {
            return;
        };
        if conn.room.as_deref() == Some(room.as_str()) {
            return;
        }
        let previous = conn.room.replace(room.clone());
        let identity = conn.identity.clone();

        // Moving rooms is a leave as far as the old room is concerned,
        // so it gets the same announcement an explicit leave would.
        if let Some(previous) = previous {
            registry.remove_from_room(id, &previous);
            if let Some(identity) = &identity {
                let event = ServerEvent::UserLeft {
                    username: identity.username.clone(),
                    timestamp: Utc::now().to_rfc3339(),
                };
                registry.broadcast(&previous, &event, None);
            }
        }

        if let Some(username) = identity.map(|i| i.username) {
            let event = ServerEvent::UserJoined {
                username,
                timestamp: Utc::now().to_rfc3339(),
            };
            registry.broadcast(&room, &event, Some(id));
        }

        registry.rooms.entry(room.clone()).or_default().insert(id);
        tracing::info!("socket {} joined {}", id, room);
    }

    /// Leaves the match room. Announces `user-left` to the remaining
    /// members when the connection has an identity, mirroring join.
    pub async fn leave(&self, id: ConnectionId, match_id: &str) {
        let room = room_name(match_id);
        let mut registry = self.registry.lock().await;

        let Some(conn) = registry.connections.get_mut(&id) else {
            return;
        };
        if conn.room.as_deref() != Some(room.as_str()) {
            return;
        }
        conn.room = None;
        let identity = conn.identity.clone();

        registry.remove_from_room(id, &room);
        tracing::info!("socket {} left {}", id, room);

        if let Some(username) = identity.map(|i| i.username) {
            let event = ServerEvent::UserLeft {
                username,
                timestamp: Utc::now().to_rfc3339(),
            };
            registry.broadcast(&room, &event, None);
        }
    }

    /// Relays a chat payload verbatim to everyone in the match room,
    /// sender included.
    pub async fn chat(&self, match_id: &str, message: serde_json::Value) {
        let room = room_name(match_id);
        let registry = self.registry.lock().await;
        registry.broadcast(&room, &ServerEvent::NewMessage { message }, None);
    }

    pub async fn score_update(
        &self,
        match_id: &str,
        home_score: Option<i32>,
        away_score: Option<i32>,
        minute: Option<i32>,
        status: Option<String>,
    ) {
        let event = ServerEvent::ScoreUpdated {
            match_id: match_id.to_string(),
            home_score,
            away_score,
            minute,
            status,
            timestamp: Utc::now().to_rfc3339(),
        };
        let room = room_name(match_id);
        let registry = self.registry.lock().await;
        registry.broadcast(&room, &event, None);
        tracing::info!(
            "score update for {}: {:?}:{:?}",
            room,
            home_score,
            away_score
        );
    }

    /// Direct delivery to one connection, used for feed responses.
    pub async fn send_to(&self, id: ConnectionId, event: ServerEvent) {
        let registry = self.registry.lock().await;
        if let Some(conn) = registry.connections.get(&id) {
            let _ = conn.sender.send(event);
        }
    }

    /// Drops all state for a connection. If it was identified and in a
    /// room, the room hears `user-left` first.
    pub async fn disconnect(&self, id: ConnectionId) {
        let mut registry = self.registry.lock().await;
        let Some(conn) = registry.connections.remove(&id) else {
            return;
        };

        if let (Some(identity), Some(room)) = (conn.identity, &conn.room) {
            registry.remove_from_room(id, room);
            let event = ServerEvent::UserLeft {
                username: identity.username,
                timestamp: Utc::now().to_rfc3339(),
            };
            registry.broadcast(room, &event, None);
        } else if let Some(room) = &conn.room {
            registry.remove_from_room(id, room);
        }
        tracing::info!("socket disconnected: {}", id);
    }

    pub async fn room_size(&self, match_id: &str) -> usize {
        let registry = self.registry.lock().await;
        registry
            .rooms
            .get(&room_name(match_id))
            .map(|members| members.len())
            .unwrap_or(0)
    }
}

impl Default for Hub {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tokio::sync::mpsc::UnboundedReceiver;

    async fn connect(hub: &Hub) -> (ConnectionId, UnboundedReceiver<ServerEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let id = hub.connect(tx).await;
        (id, rx)
    }

    fn drain(rx: &mut UnboundedReceiver<ServerEvent>) -> Vec<ServerEvent> {
        let mut events = Vec::new();
        while let Ok(event) = rx.try_recv() {
            events.push(event);
        }
        events
    }

    #[tokio::test]
    async fn chat_stays_inside_its_room() {
        let hub = Hub::new();
        let (a, mut rx_a) = connect(&hub).await;
        let (b, mut rx_b) = connect(&hub).await;
        hub.join(a, "42").await;
        hub.join(b, "7").await;

        hub.chat("42", json!({"matchId": 42, "message": "goal"})).await;

        let a_events = drain(&mut rx_a);
        assert_eq!(a_events.len(), 1);
        assert!(matches!(a_events[0], ServerEvent::NewMessage { .. }));
        assert!(drain(&mut rx_b).is_empty());
    }

    #[tokio::test]
    async fn sender_receives_own_chat_message() {
        let hub = Hub::new();
        let (a, mut rx_a) = connect(&hub).await;
        hub.join(a, "1").await;

        hub.chat("1", json!({"message": "hi"})).await;
        assert_eq!(drain(&mut rx_a).len(), 1);
    }

    #[tokio::test]
    async fn join_announces_to_existing_members_only() {
        let hub = Hub::new();
        let (a, mut rx_a) = connect(&hub).await;
        let (b, mut rx_b) = connect(&hub).await;
        hub.authenticate(b, "newcomer".to_string(), Some(2)).await;
        hub.join(a, "9").await;

        hub.join(b, "9").await;

        let a_events = drain(&mut rx_a);
        assert_eq!(a_events.len(), 1);
        match &a_events[0] {
            ServerEvent::UserJoined { username, .. } => assert_eq!(username, "newcomer"),
            other => panic!("unexpected event: {:?}", other),
        }
        // The joiner does not hear its own announcement.
        assert!(drain(&mut rx_b).is_empty());
    }

    #[tokio::test]
    async fn anonymous_join_announces_nothing() {
        let hub = Hub::new();
        let (a, mut rx_a) = connect(&hub).await;
        let (b, _rx_b) = connect(&hub).await;
        hub.join(a, "9").await;

        hub.join(b, "9").await;
        assert!(drain(&mut rx_a).is_empty());
    }

    #[tokio::test]
    async fn joining_twice_keeps_one_membership_and_one_announcement() {
        let hub = Hub::new();
        let (a, mut rx_a) = connect(&hub).await;
        let (b, _rx_b) = connect(&hub).await;
        hub.authenticate(b, "dupe".to_string(), None).await;
        hub.join(a, "5").await;

        hub.join(b, "5").await;
        hub.join(b, "5").await;

        assert_eq!(hub.room_size("5").await, 2);
        assert_eq!(drain(&mut rx_a).len(), 1);
    }

    #[tokio::test]
    async fn last_join_wins_across_rooms() {
        let hub = Hub::new();
        let (a, mut rx_a) = connect(&hub).await;
        let (b, mut rx_b) = connect(&hub).await;
        hub.join(a, "1").await;
        hub.join(b, "2").await;

        // b moves from room 2 to room 1; chat in room 2 must no longer
        // reach it.
        hub.join(b, "1").await;
        assert_eq!(hub.room_size("2").await, 0);
        assert_eq!(hub.room_size("1").await, 2);

        hub.chat("2", json!({"message": "stale"})).await;
        assert!(drain(&mut rx_b).is_empty());

        hub.chat("1", json!({"message": "fresh"})).await;
        assert_eq!(drain(&mut rx_a).len(), 1);
        assert_eq!(drain(&mut rx_b).len(), 1);
    }

    #[tokio::test]
    async fn switching_rooms_announces_departure_to_the_old_room() {
        let hub = Hub::new();
        let (a, mut rx_a) = connect(&hub).await;
        let (b, _rx_b) = connect(&hub).await;
        hub.authenticate(b, "mover".to_string(), None).await;
        hub.join(a, "1").await;
        hub.join(b, "1").await;
        drain(&mut rx_a);

        hub.join(b, "2").await;

        let a_events = drain(&mut rx_a);
        assert_eq!(a_events.len(), 1);
        match &a_events[0] {
            ServerEvent::UserLeft { username, .. } => assert_eq!(username, "mover"),
            other => panic!("unexpected event: {:?}", other),
        }
    }

    #[tokio::test]
    async fn explicit_leave_announces_user_left() {
        let hub = Hub::new();
        let (a, mut rx_a) = connect(&hub).await;
        let (b, _rx_b) = connect(&hub).await;
        hub.authenticate(b, "leaver".to_string(), None).await;
        hub.join(a, "3").await;
        hub.join(b, "3").await;
        drain(&mut rx_a);

        hub.leave(b, "3").await;

        let a_events = drain(&mut rx_a);
        assert_eq!(a_events.len(), 1);
        match &a_events[0] {
            ServerEvent::UserLeft { username, .. } => assert_eq!(username, "leaver"),
            other => panic!("unexpected event: {:?}", other),
        }
        assert_eq!(hub.room_size("3").await, 1);
    }

    #[tokio::test]
    async fn disconnect_announces_only_with_identity_and_room() {
        let hub = Hub::new();
        let (a, mut rx_a) = connect(&hub).await;
        hub.join(a, "8").await;

        // Identified and in the room: announced.
        let (b, _rx_b) = connect(&hub).await;
        hub.authenticate(b, "ghost".to_string(), Some(9)).await;
        hub.join(b, "8").await;
        drain(&mut rx_a);
        hub.disconnect(b).await;
        assert_eq!(drain(&mut rx_a).len(), 1);

        // Anonymous: silently removed.
        let (c, _rx_c) = connect(&hub).await;
        hub.join(c, "8").await;
        hub.disconnect(c).await;
        assert!(drain(&mut rx_a).is_empty());
        assert_eq!(hub.room_size("8").await, 1);
    }

    #[tokio::test]
    async fn score_update_reaches_the_whole_room() {
        let hub = Hub::new();
        let (a, mut rx_a) = connect(&hub).await;
        let (b, mut rx_b) = connect(&hub).await;
        hub.join(a, "11").await;
        hub.join(b, "11").await;

        hub.score_update("11", Some(2), Some(0), Some(77), Some("live".to_string()))
            .await;

        for rx in [&mut rx_a, &mut rx_b] {
            let events = drain(rx);
            assert_eq!(events.len(), 1);
            match &events[0] {
                ServerEvent::ScoreUpdated {
                    match_id,
                    home_score,
                    ..
                } => {
                    assert_eq!(match_id, "11");
                    assert_eq!(*home_score, Some(2));
                }
                other => panic!("unexpected event: {:?}", other),
            }
        }
    }
}
