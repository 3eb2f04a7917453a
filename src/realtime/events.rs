// Wire events for the match-room socket. Event names mirror the ones
// the frontend already speaks; payloads are JSON objects with a `type`
// discriminator.
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::models::sports::{FeedSource, LiveMatch, MatchFeed};

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type")]
pub enum ClientEvent {
    #[serde(rename = "authenticate")]
    Authenticate {
        username: String,
        #[serde(rename = "userId")]
        user_id: Option<i64>,
    },

    #[serde(rename = "subscribe_match", alias = "join-match")]
    SubscribeMatch {
        #[serde(rename = "matchId")]
        match_id: Value,
    },

    #[serde(rename = "unsubscribe_match", alias = "leave-match")]
    UnsubscribeMatch {
        #[serde(rename = "matchId")]
        match_id: Value,
    },

    /// Relayed verbatim to the room named in the payload.
    #[serde(rename = "chat_message")]
    ChatMessage {
        #[serde(flatten)]
        message: Value,
    },

    #[serde(rename = "score-update", alias = "score_update")]
    ScoreUpdate {
        #[serde(rename = "matchId")]
        match_id: Value,
        #[serde(rename = "homeScore")]
        home_score: Option<i32>,
        #[serde(rename = "awayScore")]
        away_score: Option<i32>,
        minute: Option<i32>,
        status: Option<String>,
    },

    #[serde(rename = "get_live_matches")]
    GetLiveMatches,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type")]
pub enum ServerEvent {
    #[serde(rename = "user-joined")]
    UserJoined { username: String, timestamp: String },

    #[serde(rename = "user-left")]
    UserLeft { username: String, timestamp: String },

    #[serde(rename = "new_message")]
    NewMessage {
        #[serde(flatten)]
        message: Value,
    },

    #[serde(rename = "score-updated")]
    ScoreUpdated {
        #[serde(rename = "matchId")]
        match_id: String,
        #[serde(rename = "homeScore")]
        home_score: Option<i32>,
        #[serde(rename = "awayScore")]
        away_score: Option<i32>,
        minute: Option<i32>,
        status: Option<String>,
        timestamp: String,
    },

    #[serde(rename = "live_matches_update")]
    LiveMatchesUpdate { matches: Vec<LiveMatch> },

    #[serde(rename = "upcoming_matches_update")]
    UpcomingMatchesUpdate { matches: Vec<LiveMatch> },

    #[serde(rename = "recent_matches_update")]
    RecentMatchesUpdate { matches: Vec<LiveMatch> },

    #[serde(rename = "dummy_matches_update")]
    DummyMatchesUpdate { matches: Vec<LiveMatch> },
}

impl ServerEvent {
    /// Picks the update event matching the feed's provenance, so a
    /// client can always tell fallback data from the real thing.
    pub fn from_feed(feed: MatchFeed) -> Self {
        match feed.source {
            FeedSource::Live => ServerEvent::LiveMatchesUpdate {
                matches: feed.matches,
            },
            FeedSource::Upcoming => ServerEvent::UpcomingMatchesUpdate {
                matches: feed.matches,
            },
            FeedSource::Recent => ServerEvent::RecentMatchesUpdate {
                matches: feed.matches,
            },
            FeedSource::Fallback => ServerEvent::DummyMatchesUpdate {
                matches: feed.matches,
            },
        }
    }
}

/// Match ids arrive as numbers or strings depending on the client.
pub fn match_key(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_subscribe_with_numeric_and_string_ids() {
        let event: ClientEvent =
            serde_json::from_value(json!({"type": "subscribe_match", "matchId": 42})).unwrap();
        match event {
            ClientEvent::SubscribeMatch { match_id } => {
                assert_eq!(match_key(&match_id).as_deref(), Some("42"));
            }
            other => panic!("unexpected event: {:?}", other),
        }

        let event: ClientEvent =
            serde_json::from_value(json!({"type": "subscribe_match", "matchId": "42"})).unwrap();
        match event {
            ClientEvent::SubscribeMatch { match_id } => {
                assert_eq!(match_key(&match_id).as_deref(), Some("42"));
            }
            other => panic!("unexpected event: {:?}", other),
        }
    }

    #[test]
    fn chat_message_keeps_payload_fields() {
        let event: ClientEvent = serde_json::from_value(json!({
            "type": "chat_message",
            "matchId": 7,
            "username": "sam",
            "message": "goal!"
        }))
        .unwrap();
        match event {
            ClientEvent::ChatMessage { message } => {
                assert_eq!(message["username"], "sam");
                assert_eq!(message["message"], "goal!");
            }
            other => panic!("unexpected event: {:?}", other),
        }
    }

    #[test]
    fn server_events_carry_frontend_names() {
        let event = ServerEvent::UserJoined {
            username: "sam".to_string(),
            timestamp: "t".to_string(),
        };
        let value = serde_json::to_value(&event).unwrap();
        assert_eq!(value["type"], "user-joined");
    }
}
