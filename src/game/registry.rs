use std::collections::{BTreeMap, HashMap};

use serde::Serialize;
use serde_json::Value;
use time::OffsetDateTime;
use uuid::Uuid;

use super::{events::ServerEvent, transport::Transport, ConnId};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatMessage {
    pub id: Uuid,
    pub player_id: ConnId,
    pub text: String,
    pub timestamp: f64,
    /// Emoji to reactors, each connection at most once per emoji.
    pub reactions: BTreeMap<String, Vec<ConnId>>,
}

#[derive(Debug, Default)]
pub struct Room {
    /// Members in join order.
    pub players: Vec<ConnId>,
    /// Last-known state blob per member.
    pub state: HashMap<ConnId, Value>,
    pub messages: Vec<ChatMessage>,
}

/// In-memory directory of rooms plus the reverse index from connection to
/// the room it occupies. All mutation happens through the event operations
/// below; every broadcast goes out through the injected transport and the
/// registry itself performs no I/O.
///
/// Invariant: `player_rooms` and the rooms' member lists agree after every
/// operation. A connection occupies at most one room.
pub struct Registry<T> {
    rooms: HashMap<String, Room>,
    player_rooms: HashMap<ConnId, String>,
    transport: T,
}

impl<T: Transport> Registry<T> {
    pub fn new(transport: T) -> Self {
        Self {
            rooms: HashMap::new(),
            player_rooms: HashMap::new(),
            transport,
        }
    }

    /// A new socket is up. No room assignment yet.
    pub fn connect(&mut self, conn: ConnId, sender: tokio::sync::mpsc::UnboundedSender<String>) {
        self.transport.register(conn, sender);
    }

    /// Socket closed. Leaves the current room (if any) and forgets the
    /// connection.
    pub fn disconnect(&mut self, conn: ConnId) {
        self.leave_current(conn);
        self.transport.deregister(conn);
    }

    /// Puts the connection into `room_id`, creating the room on first join.
    /// A connection already in a room is moved: it leaves the old room first
    /// so the membership index never points two ways. Everyone in the room,
    /// the joiner included, gets the updated member list.
    pub fn join_room(&mut self, conn: ConnId, room_id: &str) {
        self.leave_current(conn);

        let room = self.rooms.entry(room_id.to_owned()).or_default();
        room.players.push(conn);
        let players = room.players.clone();

        self.player_rooms.insert(conn, room_id.to_owned());
        self.transport.enter(conn, room_id);
        self.transport.emit_to_room(
            room_id,
            &ServerEvent::PlayerJoined { player_id: conn, players },
        );
    }

    /// Records the connection's latest state blob and relays it to the rest
    /// of the room. Roomless connections are ignored.
    pub fn update_state(&mut self, conn: ConnId, payload: Value) {
        let Some(room_id) = self.player_rooms.get(&conn) else {
            return;
        };
        let Some(room) = self.rooms.get_mut(room_id) else {
            return;
        };

        room.state.insert(conn, payload.clone());
        self.transport.emit_to_room_except(
            room_id,
            &ServerEvent::GameStateUpdate { player_id: conn, state: payload },
            conn,
        );
    }

    /// Appends a chat message to the room log and fans it out to the whole
    /// room, sender included. Roomless connections are ignored.
    pub fn post_message(&mut self, conn: ConnId, text: String) {
        let Some(room_id) = self.player_rooms.get(&conn) else {
            return;
        };
        let Some(room) = self.rooms.get_mut(room_id) else {
            return;
        };

        let message = ChatMessage {
            id: Uuid::now_v7(),
            player_id: conn,
            text,
            timestamp: unix_now(),
            reactions: BTreeMap::new(),
        };
        room.messages.push(message.clone());
        self.transport
            .emit_to_room(room_id, &ServerEvent::NewChatMessage(message));
    }

    /// Adds `conn` to the emoji's reactor set on the named message and
    /// broadcasts the message's updated reactions. Idempotent: a repeat
    /// reaction, an unknown message id, or a roomless connection is a
    /// silent no-op with no broadcast. The log is scanned in insertion
    /// order, first id match wins.
    pub fn add_reaction(&mut self, conn: ConnId, message_id: Uuid, emoji: &str) {
        let Some(room_id) = self.player_rooms.get(&conn) else {
            return;
        };
        let Some(room) = self.rooms.get_mut(room_id) else {
            return;
        };
        let Some(message) = room.messages.iter_mut().find(|m| m.id == message_id) else {
            return;
        };

        let reactors = message.reactions.entry(emoji.to_owned()).or_default();
        if reactors.contains(&conn) {
            return;
        }
        reactors.push(conn);

        let reactions = message.reactions.clone();
        self.transport
            .emit_to_room(room_id, &ServerEvent::ReactionUpdate { message_id, reactions });
    }

    /// Removes the connection from whatever room it occupies, telling the
    /// remaining members and dropping the room once it empties.
    fn leave_current(&mut self, conn: ConnId) {
        let Some(room_id) = self.player_rooms.remove(&conn) else {
            return;
        };
        self.transport.leave(conn, &room_id);

        if let Some(room) = self.rooms.get_mut(&room_id) {
            room.players.retain(|p| *p != conn);
            self.transport
                .emit_to_room(&room_id, &ServerEvent::PlayerLeft { player_id: conn });
            if room.players.is_empty() {
                self.rooms.remove(&room_id);
            }
        }
    }

    #[cfg(test)]
    pub(crate) fn room(&self, room_id: &str) -> Option<&Room> {
        self.rooms.get(room_id)
    }

    #[cfg(test)]
    pub(crate) fn room_of(&self, conn: ConnId) -> Option<&str> {
        self.player_rooms.get(&conn).map(String::as_str)
    }

    #[cfg(test)]
    pub(crate) fn transport(&self) -> &T {
        &self.transport
    }

    #[cfg(test)]
    pub(crate) fn check_consistency(&self) {
        for (conn, room_id) in &self.player_rooms {
            let room = self.rooms.get(room_id).expect("indexed room missing");
            assert!(
                room.players.contains(conn),
                "{conn} indexed in {room_id} but absent from its member list"
            );
        }
        for (room_id, room) in &self.rooms {
            for conn in &room.players {
                assert_eq!(
                    self.player_rooms.get(conn).map(String::as_str),
                    Some(room_id.as_str()),
                    "{conn} listed in {room_id} but indexed elsewhere"
                );
            }
        }
    }
}

fn unix_now() -> f64 {
    OffsetDateTime::now_utc().unix_timestamp_nanos() as f64 / 1_000_000_000.0
}
