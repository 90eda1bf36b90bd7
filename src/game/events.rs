use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use super::{registry::ChatMessage, ConnId};

/// Inbound frames. The wire shape is an envelope `{"event": E, "data": P}`.
#[derive(Debug, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum ClientEvent {
    JoinGame {
        #[serde(default)]
        room: Option<String>,
    },
    PlayerState(Value),
    ChatMessage {
        text: String,
    },
    AddReaction {
        message_id: Uuid,
        emoji: String,
    },
}

/// Outbound frames, same envelope shape.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum ServerEvent {
    PlayerJoined {
        player_id: ConnId,
        players: Vec<ConnId>,
    },
    PlayerLeft {
        player_id: ConnId,
    },
    GameStateUpdate {
        player_id: ConnId,
        state: Value,
    },
    NewChatMessage(ChatMessage),
    ReactionUpdate {
        message_id: Uuid,
        reactions: BTreeMap<String, Vec<ConnId>>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn join_game_parses_with_and_without_room() {
        let event: ClientEvent =
            serde_json::from_str(r#"{"event":"join_game","data":{"room":"lobby"}}"#).unwrap();
        assert!(matches!(event, ClientEvent::JoinGame { room: Some(r) } if r == "lobby"));

        let event: ClientEvent =
            serde_json::from_str(r#"{"event":"join_game","data":{}}"#).unwrap();
        assert!(matches!(event, ClientEvent::JoinGame { room: None }));
    }

    #[test]
    fn player_state_takes_arbitrary_payload() {
        let event: ClientEvent = serde_json::from_str(
            r#"{"event":"player_state","data":{"x":3,"y":7,"boost":true}}"#,
        )
        .unwrap();
        let ClientEvent::PlayerState(state) = event else {
            panic!("wrong variant");
        };
        assert_eq!(state["x"], json!(3));
        assert_eq!(state["boost"], json!(true));
    }

    #[test]
    fn add_reaction_parses() {
        let id = Uuid::now_v7();
        let raw = format!(
            r#"{{"event":"add_reaction","data":{{"message_id":"{id}","emoji":"👍"}}}}"#
        );
        let event: ClientEvent = serde_json::from_str(&raw).unwrap();
        let ClientEvent::AddReaction { message_id, emoji } = event else {
            panic!("wrong variant");
        };
        assert_eq!(message_id, id);
        assert_eq!(emoji, "👍");
    }

    #[test]
    fn malformed_frames_are_rejected() {
        assert!(serde_json::from_str::<ClientEvent>(r#"{"event":"launch_nukes","data":{}}"#).is_err());
        assert!(serde_json::from_str::<ClientEvent>("not json").is_err());
    }

    #[test]
    fn server_events_use_the_envelope_shape() {
        let conn = Uuid::now_v7();
        let frame =
            serde_json::to_value(ServerEvent::PlayerJoined { player_id: conn, players: vec![conn] })
                .unwrap();
        assert_eq!(frame["event"], json!("player_joined"));
        assert_eq!(frame["data"]["player_id"], json!(conn.to_string()));
        assert_eq!(frame["data"]["players"], json!([conn.to_string()]));
    }

    #[test]
    fn new_chat_message_carries_the_full_message() {
        let message = ChatMessage {
            id: Uuid::now_v7(),
            player_id: Uuid::now_v7(),
            text: "hi".to_owned(),
            timestamp: 1723.5,
            reactions: BTreeMap::new(),
        };
        let frame = serde_json::to_value(ServerEvent::NewChatMessage(message.clone())).unwrap();
        assert_eq!(frame["event"], json!("new_chat_message"));
        assert_eq!(frame["data"]["id"], json!(message.id.to_string()));
        assert_eq!(frame["data"]["text"], json!("hi"));
        assert_eq!(frame["data"]["reactions"], json!({}));
    }
}
