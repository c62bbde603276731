use crate::types::{Point, Polygon};
use serde::{Deserialize, Serialize};

/// Frames sent by a drawing client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    Subscribe { destination: String },
    Unsubscribe { destination: String },
    Send { destination: String, body: Point },
}

/// Frames sent to a drawing client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    Message { destination: String, body: Payload },
    Error { reason: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Payload {
    Point(Point),
    Polygon(Polygon),
}
