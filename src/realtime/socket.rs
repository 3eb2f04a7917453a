// WebSocket endpoint glue: one task per connection reads client events
// and hands them to the hub; a second task drains the outbound queue.
use axum::{
    extract::{
        ws::{Message, WebSocket},
        State, WebSocketUpgrade,
    },
    response::IntoResponse,
};
use futures_util::{SinkExt, StreamExt};
use tokio::sync::mpsc;

use crate::realtime::events::{match_key, ClientEvent, ServerEvent};
use crate::realtime::hub::ConnectionId;
use crate::state::AppState;

pub async fn ws_handler(ws: WebSocketUpgrade, State(state): State<AppState>) -> impl IntoResponse {
    ws.on_upgrade(|socket| handle_socket(socket, state))
}

async fn handle_socket(socket: WebSocket, state: AppState) {
    let (outbound_tx, mut outbound_rx) = mpsc::unbounded_channel::<ServerEvent>();
    let conn_id = state.hub.connect(outbound_tx).await;

    let (mut ws_tx, mut ws_rx) = socket.split();

    let send_task = tokio::spawn(async move {
        while let Some(event) = outbound_rx.recv().await {
            let text = match serde_json::to_string(&event) {
                Ok(text) => text,
                Err(e) => {
                    tracing::warn!("failed to serialize server event: {}", e);
                    continue;
                }
            };
            if ws_tx.send(Message::Text(text)).await.is_err() {
                break;
            }
        }
    });

    while let Some(Ok(message)) = ws_rx.next().await {
        match message {
            Message::Text(text) => match serde_json::from_str::<ClientEvent>(&text) {
                Ok(event) => handle_event(&state, conn_id, event).await,
                Err(e) => {
                    tracing::debug!("ignoring unparseable client event: {}", e);
                }
            },
            Message::Close(_) => break,
            _ => {}
        }
    }

    state.hub.disconnect(conn_id).await;
    send_task.abort();
}

async fn handle_event(state: &AppState, conn_id: ConnectionId, event: ClientEvent) {
    match event {
        ClientEvent::Authenticate { username, user_id } => {
            state.hub.authenticate(conn_id, username, user_id).await;
        }

        ClientEvent::SubscribeMatch { match_id } => {
            if let Some(match_id) = match_key(&match_id) {
                state.hub.join(conn_id, &match_id).await;
            }
        }

        ClientEvent::UnsubscribeMatch { match_id } => {
            if let Some(match_id) = match_key(&match_id) {
                state.hub.leave(conn_id, &match_id).await;
            }
        }

        ClientEvent::ChatMessage { message } => {
            let Some(match_id) = message.get("matchId").and_then(|v| match_key(v)) else {
                tracing::debug!("chat message without matchId dropped");
                return;
            };
            state.hub.chat(&match_id, message).await;
        }

        ClientEvent::ScoreUpdate {
            match_id,
            home_score,
            away_score,
            minute,
            status,
        } => {
            if let Some(match_id) = match_key(&match_id) {
                state
                    .hub
                    .score_update(&match_id, home_score, away_score, minute, status)
                    .await;
            }
        }

        ClientEvent::GetLiveMatches => {
            // Priority chain; the event name tells the client whether it
            // got live, scheduled, recent, or placeholder data.
            let feed = state.sports.live_feed().await;
            state
                .hub
                .send_to(conn_id, ServerEvent::from_feed(feed))
                .await;
        }
    }
}
