use crate::blueprint::{Blueprint, BlueprintError};
use crate::types::{Point, Polygon, SessionKey};
use std::sync::Arc;

/// Best-effort delivery to whoever is subscribed right now. Implementations
/// must not block: they are called while a session's buffer is locked.
pub trait BroadcastGateway: Send + Sync {
    fn publish_point(&self, key: &SessionKey, point: &Point);
    fn publish_polygon(&self, key: &SessionKey, polygon: &Polygon);
}

impl<G: BroadcastGateway + ?Sized> BroadcastGateway for Arc<G> {
    fn publish_point(&self, key: &SessionKey, point: &Point) {
        (**self).publish_point(key, point)
    }

    fn publish_polygon(&self, key: &SessionKey, polygon: &Polygon) {
        (**self).publish_polygon(key, polygon)
    }
}

pub trait BlueprintStore: Send + Sync {
    fn get(&self, key: &SessionKey) -> Result<Blueprint, BlueprintError>;

    /// Fails with `NotFound` when the author owns nothing.
    fn list_by_author(&self, author: &str) -> Result<Vec<Blueprint>, BlueprintError>;

    fn list_all(&self) -> Result<Vec<Blueprint>, BlueprintError>;

    fn create(&self, blueprint: Blueprint) -> Result<Blueprint, BlueprintError>;

    fn update(&self, key: &SessionKey, blueprint: Blueprint) -> Result<Blueprint, BlueprintError>;

    fn delete(&self, key: &SessionKey) -> Result<(), BlueprintError>;
}
