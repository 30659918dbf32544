use std::collections::HashMap;

use mapforge_protocol::MapChunk;

/// Client-side accumulation of `MAP_CHUNK` frames for one in-flight
/// `MAP_REQUEST` (spec.md §4.5.7). Chunks may arrive out of order;
/// a duplicate `chunk_id` overwrites the previous content for that id.
#[derive(Debug, Default)]
pub struct ChunkAccumulator {
    expected_total: Option<u32>,
    chunks: HashMap<u32, MapChunk>,
}

impl ChunkAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Discards any in-progress accumulation; called when a fresh
    /// `MAP_REQUEST` is sent.
    pub fn reset(&mut self) {
        self.expected_total = None;
        self.chunks.clear();
    }

    pub fn accept(&mut self, chunk: MapChunk) {
        self.expected_total = Some(chunk.total_chunks);
        self.chunks.insert(chunk.chunk_id, chunk);
    }

    /// Complete once every id in `0..total_chunks` has been seen.
    pub fn is_complete(&self) -> bool {
        match self.expected_total {
            None => false,
            Some(total) => (0..total).all(|id| self.chunks.contains_key(&id)),
        }
    }

    /// Returns chunks ordered by id once complete.
    pub fn into_ordered(mut self) -> Option<Vec<MapChunk>> {
        if !self.is_complete() {
            return None;
        }
        let total = self.expected_total?;
        let mut ordered = Vec::with_capacity(total as usize);
        for id in 0..total {
            ordered.push(self.chunks.remove(&id)?);
        }
        Some(ordered)
    }
}
