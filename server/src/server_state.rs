use crate::config::Config;
use crate::hub::Hub;
use actix_web::web;
use std::sync::Arc;
use std::time::Instant;
use system::{AggregationEngine, BlueprintStore, InMemoryBlueprintStore};

pub type Engine = AggregationEngine<Arc<Hub>>;

/// Everything the handlers share. Owned by the running server and injected
/// through `web::Data`.
pub struct ServerState {
    pub config: Config,
    pub hub: Arc<Hub>,
    pub engine: Engine,
    pub blueprints: Arc<dyn BlueprintStore>,
}

impl ServerState {
    pub fn new(config: Config, blueprints: Arc<dyn BlueprintStore>) -> Self {
        let hub = Arc::new(Hub::new());
        let engine = AggregationEngine::new(config.aggregation_config(), hub.clone());
        Self {
            config,
            hub,
            engine,
            blueprints,
        }
    }

    pub fn in_memory(config: Config) -> Self {
        Self::new(config, Arc::new(InMemoryBlueprintStore::new()))
    }
}

/// Periodically applies the idle eviction policy. Does nothing when no TTL is
/// configured.
pub fn spawn_idle_sweeper(state: web::Data<ServerState>) {
    if state.engine.config().idle_ttl.is_none() {
        return;
    }
    let period = state.config.sweep_interval();
    actix_web::rt::spawn(async move {
        let mut interval = actix_web::rt::time::interval(period);
        loop {
            interval.tick().await;
            state.engine.evict_idle(Instant::now());
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use system::{Point, SessionKey};

    #[test]
    fn engine_publishes_through_the_hub() {
        let state = ServerState::in_memory(Config::default());
        let key = SessionKey::new("alice", "sketch1");
        let (tx, mut rx) = tokio::sync::mpsc::channel(8);
        state.hub.subscribe(
            system::Channel::polygon(key.clone()),
            uuid::Uuid::new_v4(),
            tx,
        );

        for &(x, y) in &[(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)] {
            state.engine.receive(&key, Point::new(x, y)).expect("");
        }
        assert!(rx.try_recv().is_ok());
        assert!(rx.try_recv().is_err());
    }
}
