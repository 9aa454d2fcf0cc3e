//! The chunk registry and visible-set orchestrator.

use glam::DVec2;
use hashbrown::{HashMap, HashSet};
use serde::{Deserialize, Serialize};
use terra_heightfield::HeightfieldSettings;
use terra_mesh::MeshSettings;
use tracing::{debug, trace};

use crate::chunk::{ChunkCoord, ChunkUpdate, TerrainChunk};
use crate::dispatch::{ChunkJob, ChunkJobResult, WorkDispatcher};
use crate::lod::LodLevel;

/// Viewer movement required before the visible set is recomputed.
pub const VIEWER_MOVE_THRESHOLD: f64 = 25.0;
const SQR_VIEWER_MOVE_THRESHOLD: f64 = VIEWER_MOVE_THRESHOLD * VIEWER_MOVE_THRESHOLD;

/// What happens to chunks that have scrolled out of view.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum EvictionPolicy {
    /// Chunks stay in the registry forever. Fine for bounded worlds; an
    /// unbounded walk grows memory without limit.
    #[default]
    KeepAll,
    /// When the registry exceeds `max_chunks`, drop hidden chunks that
    /// were visible longest ago until the limit is met again.
    LeastRecentlyVisible { max_chunks: usize },
}

/// Streamer configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StreamerSettings {
    /// Detail ladder, finest to coarsest. Must be non-empty.
    pub detail_levels: Vec<LodLevel>,
    /// Index into `detail_levels` of the mesh used for collision.
    pub collider_lod_index: usize,
    pub mesh: MeshSettings,
    pub heightfield: HeightfieldSettings,
    pub eviction: EvictionPolicy,
}

impl Default for StreamerSettings {
    fn default() -> Self {
        Self {
            detail_levels: vec![
                LodLevel {
                    lod: 0,
                    visible_distance_threshold: 200.0,
                },
                LodLevel {
                    lod: 1,
                    visible_distance_threshold: 400.0,
                },
                LodLevel {
                    lod: 2,
                    visible_distance_threshold: 600.0,
                },
            ],
            collider_lod_index: 0,
            mesh: MeshSettings::default(),
            heightfield: HeightfieldSettings::default(),
            eviction: EvictionPolicy::KeepAll,
        }
    }
}

/// Streams terrain chunks around a moving viewer.
///
/// All registry and visible-set mutation happens on the calling thread;
/// background workers only ever compute values and hand them back through
/// the dispatcher.
pub struct TerrainStreamer {
    settings: StreamerSettings,
    dispatcher: WorkDispatcher,
    chunks: HashMap<ChunkCoord, TerrainChunk>,
    visible: Vec<ChunkCoord>,
    viewer_position: DVec2,
    viewer_position_old: DVec2,
    chunks_visible_in_view_distance: i32,
    world_size: f64,
    tick_count: u64,
    started: bool,
}

impl TerrainStreamer {
    pub fn new(settings: StreamerSettings, dispatcher: WorkDispatcher) -> Self {
        assert!(
            !settings.detail_levels.is_empty(),
            "a streamer needs at least one detail level"
        );
        assert!(settings.collider_lod_index < settings.detail_levels.len());

        let world_size = settings.mesh.mesh_world_size();
        let max_view_distance = settings.detail_levels[settings.detail_levels.len() - 1]
            .visible_distance_threshold;
        let chunks_visible_in_view_distance = (max_view_distance / world_size).round() as i32;

        Self {
            settings,
            dispatcher,
            chunks: HashMap::new(),
            visible: Vec::new(),
            viewer_position: DVec2::ZERO,
            viewer_position_old: DVec2::ZERO,
            chunks_visible_in_view_distance,
            world_size,
            tick_count: 0,
            started: false,
        }
    }

    /// One frame of streaming work.
    ///
    /// Drains completed background results, refreshes colliders when the
    /// viewer moved at all, and recomputes the whole visible set once the
    /// viewer has moved past [`VIEWER_MOVE_THRESHOLD`] since the last
    /// recompute (and on the very first call).
    pub fn tick(&mut self, viewer_position: DVec2) {
        self.tick_count += 1;
        self.viewer_position = viewer_position;

        for result in self.dispatcher.drain_results() {
            self.route_result(result);
        }

        if self.viewer_position != self.viewer_position_old {
            for coord in self.visible.clone() {
                self.refresh_collision(coord);
            }
        }

        let moved = (self.viewer_position_old - viewer_position).length_squared();
        if !self.started || moved > SQR_VIEWER_MOVE_THRESHOLD {
            self.started = true;
            self.viewer_position_old = viewer_position;
            self.update_visible_chunks();
        }

        self.evict();
    }

    /// Chunks currently in the visible working set.
    pub fn visible_chunks(&self) -> impl Iterator<Item = &TerrainChunk> {
        self.visible.iter().filter_map(|coord| self.chunks.get(coord))
    }

    pub fn chunk(&self, coord: ChunkCoord) -> Option<&TerrainChunk> {
        self.chunks.get(&coord)
    }

    pub fn chunk_count(&self) -> usize {
        self.chunks.len()
    }

    /// Background jobs still queued or executing.
    pub fn pending_jobs(&self) -> u64 {
        self.dispatcher.in_flight_count()
    }

    fn route_result(&mut self, result: ChunkJobResult) {
        match result {
            ChunkJobResult::HeightMap { coord, height_map } => {
                // The chunk may have been evicted while the job ran; the
                // result is then dropped, not an error.
                let viewer = self.viewer_position;
                if let Some(chunk) = self.chunks.get_mut(&coord) {
                    trace!(?coord, "heightmap received");
                    let update = chunk.on_height_map_received(height_map, viewer);
                    self.apply_update(coord, update);
                }
            }
            ChunkJobResult::Mesh {
                coord,
                lod_index,
                mesh,
            } => {
                let viewer = self.viewer_position;
                if let Some(chunk) = self.chunks.get_mut(&coord) {
                    trace!(?coord, lod_index, "mesh received");
                    chunk.on_mesh_received(lod_index, mesh);
                    let update = chunk.update(viewer);
                    self.apply_update(coord, update);
                    if lod_index == self.settings.collider_lod_index {
                        self.refresh_collision(coord);
                    }
                }
            }
        }
    }

    /// Applies a chunk's requested side effects: visible-set membership
    /// and background mesh builds.
    fn apply_update(&mut self, coord: ChunkCoord, update: ChunkUpdate) {
        if let Some(visible_now) = update.visibility_changed {
            if visible_now {
                if !self.visible.contains(&coord) {
                    self.visible.push(coord);
                }
            } else {
                self.visible.retain(|&c| c != coord);
            }
        }

        let tick = self.tick_count;
        if let Some(chunk) = self.chunks.get_mut(&coord) {
            if chunk.is_visible() {
                chunk.touch(tick);
            }
            if let Some(lod_index) = update.mesh_request
                && let Some(height_map) = chunk.height_map()
            {
                let job = ChunkJob::Mesh {
                    coord,
                    lod_index,
                    lod: chunk.lod_for_index(lod_index),
                    height_map: height_map.clone(),
                    settings: self.settings.mesh.clone(),
                };
                self.dispatcher.submit(job);
            }
        }
    }

    fn refresh_collision(&mut self, coord: ChunkCoord) {
        let viewer = self.viewer_position;
        if let Some(chunk) = self.chunks.get_mut(&coord)
            && let Some(lod_index) = chunk.update_collision(viewer)
            && let Some(height_map) = chunk.height_map()
        {
            let job = ChunkJob::Mesh {
                coord,
                lod_index,
                lod: chunk.lod_for_index(lod_index),
                height_map: height_map.clone(),
                settings: self.settings.mesh.clone(),
            };
            self.dispatcher.submit(job);
        }
    }

    /// Recomputes the visible set: refresh every currently visible chunk,
    /// then walk the coordinate ring around the viewer, updating existing
    /// chunks and creating-and-loading missing ones.
    fn update_visible_chunks(&mut self) {
        let viewer = self.viewer_position;
        let mut already_updated: HashSet<ChunkCoord> = HashSet::new();

        for coord in self.visible.clone() {
            already_updated.insert(coord);
            if let Some(chunk) = self.chunks.get_mut(&coord) {
                let update = chunk.update(viewer);
                self.apply_update(coord, update);
            }
        }

        let current_x = (viewer.x / self.world_size).round() as i32;
        let current_y = (viewer.y / self.world_size).round() as i32;
        let ring = self.chunks_visible_in_view_distance;

        for y_offset in -ring..=ring {
            for x_offset in -ring..=ring {
                let coord = ChunkCoord {
                    x: current_x + x_offset,
                    y: current_y + y_offset,
                };
                if already_updated.contains(&coord) {
                    continue;
                }

                if let Some(chunk) = self.chunks.get_mut(&coord) {
                    let update = chunk.update(viewer);
                    self.apply_update(coord, update);
                } else {
                    self.load_chunk(coord);
                }
            }
        }
    }

    /// Creates a chunk and submits its heightfield build.
    fn load_chunk(&mut self, coord: ChunkCoord) {
        debug!(?coord, "loading chunk");
        let chunk = TerrainChunk::new(
            coord,
            self.settings.detail_levels.clone(),
            self.settings.collider_lod_index,
            &self.settings.mesh,
        );
        let verts_per_line = self.settings.mesh.verts_per_line();
        self.dispatcher.submit(ChunkJob::HeightMap {
            coord,
            settings: Box::new(self.settings.heightfield.clone()),
            verts_per_line,
            sample_centre: chunk.sample_centre(),
        });
        self.chunks.insert(coord, chunk);
    }

    fn evict(&mut self) {
        let EvictionPolicy::LeastRecentlyVisible { max_chunks } = self.settings.eviction else {
            return;
        };
        if self.chunks.len() <= max_chunks {
            return;
        }

        let mut hidden: Vec<(u64, ChunkCoord)> = self
            .chunks
            .values()
            .filter(|chunk| !chunk.is_visible())
            .map(|chunk| (chunk.last_visible_tick(), chunk.coord()))
            .collect();
        hidden.sort_unstable_by_key(|&(tick, coord)| (tick, coord.x, coord.y));

        let excess = self.chunks.len() - max_chunks;
        for &(_, coord) in hidden.iter().take(excess) {
            debug!(?coord, "evicting chunk");
            self.chunks.remove(&coord);
        }
    }
}
