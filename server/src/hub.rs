use crate::connection::{ConnectionEvent, ConnectionId, ConnectionTx};
use dashmap::DashMap;
use std::collections::HashMap;
use std::sync::Arc;
use system::serde_json;
use system::{BroadcastGateway, Channel, Payload, Point, Polygon, ServerMessage, SessionKey};
use tokio::sync::mpsc::error::TrySendError;

/// Channel subscriptions of every live websocket connection.
pub struct Hub {
    subscriptions: DashMap<Channel, HashMap<ConnectionId, ConnectionTx>>,
}

impl Hub {
    pub fn new() -> Self {
        Self {
            subscriptions: DashMap::new(),
        }
    }

    /// Returns false when the connection was already subscribed.
    pub fn subscribe(&self, channel: Channel, connection_id: ConnectionId, tx: ConnectionTx) -> bool {
        log::debug!("Connection {} subscribed to {}", connection_id, channel);
        self.subscriptions
            .entry(channel)
            .or_insert_with(HashMap::new)
            .insert(connection_id, tx)
            .is_none()
    }

    pub fn unsubscribe(&self, channel: &Channel, connection_id: &ConnectionId) -> bool {
        let removed = self
            .subscriptions
            .get_mut(channel)
            .map(|mut subs| subs.remove(connection_id).is_some())
            .unwrap_or(false);
        self.subscriptions.remove_if(channel, |_, subs| subs.is_empty());
        removed
    }

    /// Drops every subscription of the connection, returning how many there were.
    pub fn remove_connection(&self, connection_id: &ConnectionId) -> usize {
        let mut removed = 0;
        self.subscriptions.retain(|_, subs| {
            if subs.remove(connection_id).is_some() {
                removed += 1;
            }
            !subs.is_empty()
        });
        removed
    }

    pub fn subscriber_count(&self, channel: &Channel) -> usize {
        self.subscriptions.get(channel).map(|s| s.len()).unwrap_or(0)
    }

    fn publish(&self, channel: Channel, body: Payload) {
        let subs = match self.subscriptions.get(&channel) {
            Some(subs) => subs,
            None => return,
        };
        let message = ServerMessage::Message {
            destination: channel.to_string(),
            body,
        };
        let frame: Arc<str> = match serde_json::to_string(&message) {
            Ok(frame) => frame.into(),
            Err(err) => {
                log::error!("Cannot encode message for {}: {}", channel, err);
                return;
            }
        };
        for (connection_id, tx) in subs.iter() {
            match tx.try_send(ConnectionEvent::Frame(frame.clone())) {
                Ok(()) => {}
                Err(TrySendError::Full(_)) => {
                    log::debug!("Outbound queue of {} is full, dropped {}", connection_id, channel)
                }
                Err(TrySendError::Closed(_)) => {
                    log::debug!("Connection {} is gone, dropped {}", connection_id, channel)
                }
            }
        }
    }
}

impl Default for Hub {
    fn default() -> Self {
        Self::new()
    }
}

impl BroadcastGateway for Hub {
    fn publish_point(&self, key: &SessionKey, point: &Point) {
        self.publish(Channel::point(key.clone()), Payload::Point(*point));
    }

    fn publish_polygon(&self, key: &SessionKey, polygon: &Polygon) {
        self.publish(Channel::polygon(key.clone()), Payload::Polygon(polygon.clone()));
    }
}
