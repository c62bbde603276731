use crate::types::SessionKey;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DestinationError {
    #[error("unknown destination: {0}")]
    Unknown(String),
    #[error("destination {0} has an empty author or drawing name")]
    EmptySegment(String),
    #[error("expected a channel destination, got {0}")]
    NotAChannel(String),
    #[error("expected a publish destination, got {0}")]
    NotPublishable(String),
}

#[derive(Debug, Copy, Clone, Hash, Eq, PartialEq)]
pub enum ChannelKind {
    Point,
    Polygon,
}

impl ChannelKind {
    fn segment(&self) -> &'static str {
        match self {
            ChannelKind::Point => "newpoint",
            ChannelKind::Polygon => "newpolygon",
        }
    }
}

/// A broadcast channel of one drawing session.
#[derive(Debug, Clone, Hash, Eq, PartialEq)]
pub struct Channel {
    pub kind: ChannelKind,
    pub key: SessionKey,
}

impl Channel {
    pub fn point(key: SessionKey) -> Self {
        Self {
            kind: ChannelKind::Point,
            key,
        }
    }

    pub fn polygon(key: SessionKey) -> Self {
        Self {
            kind: ChannelKind::Polygon,
            key,
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "/topic/{}/{}", self.kind.segment(), self.key)
    }
}

/// Textual address used by clients: either the inbound publish endpoint
/// (`/app/newpoint/{author}/{name}`) or one of the session channels
/// (`/topic/newpoint/..`, `/topic/newpolygon/..`).
#[derive(Debug, Clone, Hash, Eq, PartialEq)]
pub enum Destination {
    Publish(SessionKey),
    Channel(Channel),
}

impl Destination {
    pub fn parse(s: &str) -> Result<Self, DestinationError> {
        let segments: Vec<&str> = s.trim_start_matches('/').split('/').collect();
        let (prefix, kind, author, name) = match segments.as_slice() {
            [prefix, kind, author, name] => (*prefix, *kind, *author, *name),
            _ => return Err(DestinationError::Unknown(s.to_owned())),
        };
        if author.is_empty() || name.is_empty() {
            return Err(DestinationError::EmptySegment(s.to_owned()));
        }
        let key = SessionKey::new(author, name);
        match (prefix, kind) {
            ("app", "newpoint") => Ok(Destination::Publish(key)),
            ("topic", "newpoint") => Ok(Destination::Channel(Channel::point(key))),
            ("topic", "newpolygon") => Ok(Destination::Channel(Channel::polygon(key))),
            _ => Err(DestinationError::Unknown(s.to_owned())),
        }
    }

    pub fn into_channel(self) -> Result<Channel, DestinationError> {
        match self {
            Destination::Channel(channel) => Ok(channel),
            other => Err(DestinationError::NotAChannel(other.to_string())),
        }
    }

    pub fn into_publish_key(self) -> Result<SessionKey, DestinationError> {
        match self {
            Destination::Publish(key) => Ok(key),
            other => Err(DestinationError::NotPublishable(other.to_string())),
        }
    }
}

impl FromStr for Destination {
    type Err = DestinationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Destination::parse(s)
    }
}

impl fmt::Display for Destination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Destination::Publish(key) => write!(f, "/app/newpoint/{}", key),
            Destination::Channel(channel) => channel.fmt(f),
        }
    }
}
