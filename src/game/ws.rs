use axum::{
    debug_handler,
    extract::{State, WebSocketUpgrade},
    response::IntoResponse,
};
use futures_util::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use uuid::Uuid;

use crate::SharedRegistry;

use super::events::ClientEvent;

#[debug_handler(state = crate::AppState)]
pub(crate) async fn game_ws(
    State(registry): State<SharedRegistry>,
    ws: WebSocketUpgrade,
) -> impl IntoResponse {
    ws.on_upgrade(async move |stream| {
        let conn = Uuid::now_v7();
        let (tx, mut rx) = mpsc::unbounded_channel::<String>();
        registry.lock().await.connect(conn, tx);
        tracing::info!(%conn, "client connected");

        let (mut sender, mut receiver) = stream.split();

        let send_task = tokio::spawn(async move {
            while let Some(frame) = rx.recv().await {
                if sender.send(frame.into()).await.is_err() {
                    break;
                }
            }
        });

        while let Some(Ok(msg)) = receiver.next().await {
            let event = match serde_json::from_slice::<ClientEvent>(&msg.into_data()) {
                Ok(event) => event,
                Err(err) => {
                    tracing::debug!(%conn, %err, "dropping unparseable frame");
                    continue;
                }
            };

            let mut reg = registry.lock().await;
            match event {
                ClientEvent::JoinGame { room } => {
                    reg.join_room(conn, room.as_deref().unwrap_or("default"));
                }
                ClientEvent::PlayerState(state) => reg.update_state(conn, state),
                ClientEvent::ChatMessage { text } => reg.post_message(conn, text),
                ClientEvent::AddReaction { message_id, emoji } => {
                    reg.add_reaction(conn, message_id, &emoji);
                }
            }
        }

        registry.lock().await.disconnect(conn);
        tracing::info!(%conn, "client disconnected");
        send_task.abort();
    })
}
