use crate::point_buffer_store::{BufferStats, PointBufferStore};
use crate::traits::BroadcastGateway;
use crate::types::{InvalidPointError, Point, Polygon, SessionKey};
use std::num::NonZeroUsize;
use std::time::{Duration, Instant};

pub const DEFAULT_POLYGON_THRESHOLD: usize = 4;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AggregationConfig {
    /// Number of points that closes a polygon.
    pub threshold: NonZeroUsize,
    /// Buffers untouched for longer than this are dropped. `None` keeps them forever.
    pub idle_ttl: Option<Duration>,
}

impl Default for AggregationConfig {
    fn default() -> Self {
        Self {
            threshold: NonZeroUsize::new(DEFAULT_POLYGON_THRESHOLD).expect("non-zero"),
            idle_ttl: None,
        }
    }
}

/// What happened to the buffer after a point was received.
#[derive(Debug, Clone, PartialEq)]
pub enum Reception {
    Accumulating { buffered: usize },
    Completed(Polygon),
}

/// Groups the points of every drawing session into polygons.
///
/// Each received point is echoed on the session's point channel. When the
/// session's buffer reaches the threshold it is drained and published on the
/// polygon channel. Append, echo, check and drain run as one unit per session.
pub struct AggregationEngine<G> {
    config: AggregationConfig,
    store: PointBufferStore,
    gateway: G,
}

impl<G: BroadcastGateway> AggregationEngine<G> {
    pub fn new(config: AggregationConfig, gateway: G) -> Self {
        Self {
            config,
            store: PointBufferStore::new(),
            gateway,
        }
    }

    pub fn config(&self) -> &AggregationConfig {
        &self.config
    }

    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    pub fn receive(&self, key: &SessionKey, point: Point) -> Result<Reception, InvalidPointError> {
        point.validate()?;

        let threshold = self.config.threshold.get();
        let gateway = &self.gateway;
        let reception = self.store.with_buffer(key, |buffer| {
            buffer.push(point);
            gateway.publish_point(key, &point);

            if buffer.len() >= threshold {
                let polygon = Polygon::from(buffer.take());
                buffer.mark_emitted();
                gateway.publish_polygon(key, &polygon);
                Reception::Completed(polygon)
            } else {
                Reception::Accumulating {
                    buffered: buffer.len(),
                }
            }
        });

        if let Reception::Completed(ref polygon) = reception {
            log::debug!("Session {} completed a polygon of {} points", key, polygon.len());
        }
        Ok(reception)
    }

    pub fn buffered(&self, key: &SessionKey) -> usize {
        self.store.size(key)
    }

    pub fn sessions(&self) -> Vec<BufferStats> {
        self.store.stats()
    }

    /// Applies the configured idle policy. Without a TTL nothing is evicted.
    pub fn evict_idle(&self, now: Instant) -> usize {
        match self.config.idle_ttl {
            Some(ttl) => {
                let evicted = self.store.evict_idle(ttl, now);
                if evicted > 0 {
                    log::info!("Evicted {} idle drawing sessions", evicted);
                }
                evicted
            }
            None => 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};
    use std::thread;

    #[derive(Debug, Clone, PartialEq)]
    enum Published {
        Point(SessionKey, Point),
        Polygon(SessionKey, Polygon),
    }

    #[derive(Default)]
    struct RecordingGateway {
        published: Mutex<Vec<Published>>,
    }

    impl RecordingGateway {
        fn points(&self, key: &SessionKey) -> Vec<Point> {
            self.published
                .lock()
                .unwrap()
                .iter()
                .filter_map(|p| match p {
                    Published::Point(k, point) if k == key => Some(*point),
                    _ => None,
                })
                .collect()
        }

        fn polygons(&self, key: &SessionKey) -> Vec<Polygon> {
            self.published
                .lock()
                .unwrap()
                .iter()
                .filter_map(|p| match p {
                    Published::Polygon(k, polygon) if k == key => Some(polygon.clone()),
                    _ => None,
                })
                .collect()
        }
    }

    impl BroadcastGateway for RecordingGateway {
        fn publish_point(&self, key: &SessionKey, point: &Point) {
            self.published
                .lock()
                .unwrap()
                .push(Published::Point(key.clone(), *point));
        }

        fn publish_polygon(&self, key: &SessionKey, polygon: &Polygon) {
            self.published
                .lock()
                .unwrap()
                .push(Published::Polygon(key.clone(), polygon.clone()));
        }
    }

    fn engine_with_threshold(threshold: usize) -> AggregationEngine<Arc<RecordingGateway>> {
        AggregationEngine::new(
            AggregationConfig {
                threshold: NonZeroUsize::new(threshold).unwrap(),
                idle_ttl: None,
            },
            Arc::new(RecordingGateway::default()),
        )
    }

    #[test]
    fn it_emits_polygon_on_fourth_point() {
        let engine = engine_with_threshold(4);
        let key = SessionKey::new("alice", "sketch1");

        for (x, y) in &[(0.0, 0.0), (1.0, 0.0), (1.0, 1.0)] {
            engine.receive(&key, Point::new(*x, *y)).expect("");
        }
        assert_eq!(engine.gateway().points(&key).len(), 3);
        assert!(engine.gateway().polygons(&key).is_empty());
        assert_eq!(engine.buffered(&key), 3);

        let reception = engine.receive(&key, Point::new(0.0, 1.0)).expect("");
        let expected = Polygon::from(vec![
            Point::new(0.0, 0.0),
            Point::new(1.0, 0.0),
            Point::new(1.0, 1.0),
            Point::new(0.0, 1.0),
        ]);
        assert_eq!(reception, Reception::Completed(expected.clone()));
        assert_eq!(engine.gateway().points(&key).len(), 4);
        assert_eq!(engine.gateway().polygons(&key), vec![expected]);
        assert_eq!(engine.buffered(&key), 0);

        let reception = engine.receive(&key, Point::new(2.0, 2.0)).expect("");
        assert_eq!(reception, Reception::Accumulating { buffered: 1 });
        assert_eq!(engine.gateway().polygons(&key).len(), 1);
    }

    #[test]
    fn point_is_published_before_its_polygon() {
        let engine = engine_with_threshold(2);
        let key = SessionKey::new("alice", "sketch1");
        engine.receive(&key, Point::new(0.0, 0.0)).expect("");
        engine.receive(&key, Point::new(1.0, 1.0)).expect("");

        let published = engine.gateway().published.lock().unwrap().clone();
        assert!(matches!(published.last(), Some(Published::Polygon(_, _))));
        assert!(matches!(published[1], Published::Point(_, p) if p == Point::new(1.0, 1.0)));
    }

    #[test]
    fn it_rejects_invalid_point_without_side_effects() {
        let engine = engine_with_threshold(4);
        let key = SessionKey::new("alice", "sketch1");
        engine.receive(&key, Point::new(0.0, 0.0)).expect("");

        let result = engine.receive(&key, Point::new(f64::NAN, 1.0));
        assert!(result.is_err());
        assert_eq!(engine.buffered(&key), 1);
        assert_eq!(engine.gateway().points(&key).len(), 1);
    }

    #[test]
    fn sessions_are_independent() {
        let engine = engine_with_threshold(4);
        let a = SessionKey::new("ab", "c");
        let b = SessionKey::new("a", "bc");
        for i in 0..3 {
            engine.receive(&a, Point::new(i as f64, 0.0)).expect("");
        }
        engine.receive(&b, Point::new(9.0, 9.0)).expect("");

        assert_eq!(engine.buffered(&a), 3);
        assert_eq!(engine.buffered(&b), 1);
        assert_eq!(engine.gateway().points(&b), vec![Point::new(9.0, 9.0)]);
        assert!(engine.gateway().polygons(&a).is_empty());
    }

    #[test]
    fn concurrent_points_complete_exactly_one_polygon_per_threshold() {
        let engine = Arc::new(engine_with_threshold(4));
        let key = SessionKey::new("alice", "sketch1");
        let threads = 8;
        let per_thread = 100;

        let handles = (0..threads)
            .map(|t| {
                let engine = engine.clone();
                let key = key.clone();
                thread::spawn(move || {
                    for i in 0..per_thread {
                        engine
                            .receive(&key, Point::new(t as f64, i as f64))
                            .expect("");
                    }
                })
            })
            .collect::<Vec<_>>();
        for handle in handles {
            handle.join().expect("");
        }

        let points = engine.gateway().points(&key);
        let polygons = engine.gateway().polygons(&key);
        assert_eq!(points.len(), threads * per_thread);
        assert_eq!(polygons.len(), threads * per_thread / 4);
        assert!(polygons.iter().all(|p| p.len() == 4));
        assert_eq!(engine.buffered(&key), 0);

        // polygons are consecutive runs of the echoed points
        let flattened = polygons
            .into_iter()
            .flat_map(|p| p.into_points())
            .collect::<Vec<_>>();
        assert_eq!(flattened, points);
    }

    #[test]
    fn it_keeps_sessions_without_ttl() {
        let engine = engine_with_threshold(4);
        let key = SessionKey::new("alice", "sketch1");
        engine.receive(&key, Point::new(0.0, 0.0)).expect("");

        let far_future = Instant::now() + Duration::from_secs(60 * 60 * 24);
        assert_eq!(engine.evict_idle(far_future), 0);
        assert_eq!(engine.buffered(&key), 1);
    }

    #[test]
    fn it_evicts_with_ttl() {
        let engine = AggregationEngine::new(
            AggregationConfig {
                idle_ttl: Some(Duration::from_secs(30)),
                ..AggregationConfig::default()
            },
            Arc::new(RecordingGateway::default()),
        );
        let key = SessionKey::new("alice", "sketch1");
        engine.receive(&key, Point::new(0.0, 0.0)).expect("");

        assert_eq!(engine.evict_idle(Instant::now()), 0);
        assert_eq!(engine.evict_idle(Instant::now() + Duration::from_secs(31)), 1);
        assert_eq!(engine.buffered(&key), 0);
        assert!(engine.sessions().is_empty());
    }

    #[test]
    fn it_counts_emitted_polygons() {
        let engine = engine_with_threshold(2);
        let key = SessionKey::new("alice", "sketch1");
        for i in 0..5 {
            engine.receive(&key, Point::new(i as f64, 0.0)).expect("");
        }
        let sessions = engine.sessions();
        assert_eq!(sessions.len(), 1);
        assert_eq!(sessions[0].key, key);
        assert_eq!(sessions[0].buffered, 1);
        assert_eq!(sessions[0].polygons_emitted, 2);
    }
}
