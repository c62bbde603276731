use crate::types::{Point, SessionKey};
use dashmap::DashMap;
use std::time::{Duration, Instant};

pub(crate) struct DrawingBuffer {
    points: Vec<Point>,
    polygons_emitted: u64,
    last_touched: Instant,
}

impl DrawingBuffer {
    fn new() -> Self {
        Self {
            points: Vec::new(),
            polygons_emitted: 0,
            last_touched: Instant::now(),
        }
    }

    pub(crate) fn push(&mut self, point: Point) {
        self.points.push(point);
        self.last_touched = Instant::now();
    }

    pub(crate) fn len(&self) -> usize {
        self.points.len()
    }

    pub(crate) fn take(&mut self) -> Vec<Point> {
        std::mem::take(&mut self.points)
    }

    pub(crate) fn mark_emitted(&mut self) {
        self.polygons_emitted += 1;
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BufferStats {
    pub key: SessionKey,
    pub buffered: usize,
    pub polygons_emitted: u64,
    pub idle_for: Duration,
}

/// Per-session point buffers.
///
/// Every operation on a key runs under that key's shard lock, so same-key
/// calls are serialized while keys living in other shards proceed in parallel.
pub struct PointBufferStore {
    buffers: DashMap<SessionKey, DrawingBuffer>,
}

impl PointBufferStore {
    pub fn new() -> Self {
        Self {
            buffers: DashMap::new(),
        }
    }

    pub fn append(&self, key: &SessionKey, point: Point) {
        self.with_buffer(key, |buffer| buffer.push(point));
    }

    pub fn size(&self, key: &SessionKey) -> usize {
        self.buffers.get(key).map(|b| b.len()).unwrap_or(0)
    }

    /// Returns the buffered points and leaves an empty buffer behind.
    /// An absent key yields an empty sequence and is not created.
    pub fn drain_and_reset(&self, key: &SessionKey) -> Vec<Point> {
        self.buffers
            .get_mut(key)
            .map(|mut b| b.take())
            .unwrap_or_default()
    }

    /// Runs `f` on the key's buffer, creating it first if needed. `f` must not
    /// call back into this store.
    pub(crate) fn with_buffer<R>(
        &self,
        key: &SessionKey,
        f: impl FnOnce(&mut DrawingBuffer) -> R,
    ) -> R {
        if let Some(mut buffer) = self.buffers.get_mut(key) {
            return f(buffer.value_mut());
        }
        let mut buffer = self
            .buffers
            .entry(key.clone())
            .or_insert_with(DrawingBuffer::new);
        f(buffer.value_mut())
    }

    /// Drops buffers untouched for longer than `ttl`, returning how many went away.
    pub fn evict_idle(&self, ttl: Duration, now: Instant) -> usize {
        let before = self.buffers.len();
        self.buffers
            .retain(|_, buffer| now.saturating_duration_since(buffer.last_touched) <= ttl);
        before.saturating_sub(self.buffers.len())
    }

    pub fn stats(&self) -> Vec<BufferStats> {
        let now = Instant::now();
        let mut result = self
            .buffers
            .iter()
            .map(|entry| BufferStats {
                key: entry.key().clone(),
                buffered: entry.len(),
                polygons_emitted: entry.polygons_emitted,
                idle_for: now.saturating_duration_since(entry.last_touched),
            })
            .collect::<Vec<_>>();
        result.sort_by(|a, b| a.key.cmp(&b.key));
        result
    }

    pub fn len(&self) -> usize {
        self.buffers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffers.is_empty()
    }
}

impl Default for PointBufferStore {
    fn default() -> Self {
        Self::new()
    }
}
