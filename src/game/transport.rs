use std::collections::{HashMap, HashSet};

use tokio::sync::mpsc::UnboundedSender;

use super::{events::ServerEvent, ConnId};

/// Fan-out primitives the registry broadcasts through. The registry keeps
/// its own membership bookkeeping; the transport's grouping exists purely
/// for delivery.
pub trait Transport {
    fn register(&mut self, conn: ConnId, sender: UnboundedSender<String>);
    fn deregister(&mut self, conn: ConnId);

    fn enter(&mut self, conn: ConnId, room: &str);
    fn leave(&mut self, conn: ConnId, room: &str);

    fn emit_to_room(&self, room: &str, event: &ServerEvent);
    fn emit_to_room_except(&self, room: &str, event: &ServerEvent, skip: ConnId);
}

/// Production transport: one unbounded sender of outbound text frames per
/// connection, grouped by room. Sends are fire-and-forget; a send to a peer
/// whose socket task is gone is silently dropped.
#[derive(Default)]
pub struct WsTransport {
    senders: HashMap<ConnId, UnboundedSender<String>>,
    groups: HashMap<String, HashSet<ConnId>>,
}

impl WsTransport {
    fn emit(&self, room: &str, event: &ServerEvent, skip: Option<ConnId>) {
        let Some(members) = self.groups.get(room) else {
            return;
        };
        let Ok(frame) = serde_json::to_string(event) else {
            return;
        };
        for conn in members {
            if Some(*conn) == skip {
                continue;
            }
            if let Some(sender) = self.senders.get(conn) {
                let _ = sender.send(frame.clone());
            }
        }
    }
}

impl Transport for WsTransport {
    fn register(&mut self, conn: ConnId, sender: UnboundedSender<String>) {
        self.senders.insert(conn, sender);
    }

    fn deregister(&mut self, conn: ConnId) {
        self.senders.remove(&conn);
    }

    fn enter(&mut self, conn: ConnId, room: &str) {
        self.groups.entry(room.to_owned()).or_default().insert(conn);
    }

    fn leave(&mut self, conn: ConnId, room: &str) {
        if let Some(members) = self.groups.get_mut(room) {
            members.remove(&conn);
            if members.is_empty() {
                self.groups.remove(room);
            }
        }
    }

    fn emit_to_room(&self, room: &str, event: &ServerEvent) {
        self.emit(room, event, None);
    }

    fn emit_to_room_except(&self, room: &str, event: &ServerEvent, skip: ConnId) {
        self.emit(room, event, Some(skip));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc;
    use uuid::Uuid;

    fn attach(transport: &mut WsTransport, room: &str) -> (ConnId, mpsc::UnboundedReceiver<String>) {
        let conn = Uuid::now_v7();
        let (tx, rx) = mpsc::unbounded_channel();
        transport.register(conn, tx);
        transport.enter(conn, room);
        (conn, rx)
    }

    #[test]
    fn emit_reaches_every_room_member() {
        let mut transport = WsTransport::default();
        let (a, mut rx_a) = attach(&mut transport, "r1");
        let (_b, mut rx_b) = attach(&mut transport, "r1");

        transport.emit_to_room("r1", &ServerEvent::PlayerLeft { player_id: a });

        assert!(rx_a.try_recv().is_ok());
        assert!(rx_b.try_recv().is_ok());
    }

    #[test]
    fn emit_except_skips_the_sender() {
        let mut transport = WsTransport::default();
        let (a, mut rx_a) = attach(&mut transport, "r1");
        let (_b, mut rx_b) = attach(&mut transport, "r1");

        transport.emit_to_room_except("r1", &ServerEvent::PlayerLeft { player_id: a }, a);

        assert!(rx_a.try_recv().is_err());
        assert!(rx_b.try_recv().is_ok());
    }

    #[test]
    fn emit_is_scoped_to_the_room() {
        let mut transport = WsTransport::default();
        let (a, mut rx_a) = attach(&mut transport, "r1");
        let (_b, mut rx_b) = attach(&mut transport, "r2");

        transport.emit_to_room("r1", &ServerEvent::PlayerLeft { player_id: a });

        assert!(rx_a.try_recv().is_ok());
        assert!(rx_b.try_recv().is_err());
    }

    #[test]
    fn leave_and_deregister_stop_delivery() {
        let mut transport = WsTransport::default();
        let (a, mut rx_a) = attach(&mut transport, "r1");
        let (b, mut rx_b) = attach(&mut transport, "r1");

        transport.leave(a, "r1");
        transport.deregister(b);
        transport.emit_to_room("r1", &ServerEvent::PlayerLeft { player_id: a });

        assert!(rx_a.try_recv().is_err());
        assert!(rx_b.try_recv().is_err());
    }

    #[test]
    fn dropped_receiver_does_not_panic() {
        let mut transport = WsTransport::default();
        let (a, rx_a) = attach(&mut transport, "r1");
        drop(rx_a);

        transport.emit_to_room("r1", &ServerEvent::PlayerLeft { player_id: a });
    }
}
