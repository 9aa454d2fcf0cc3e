//! Per-chunk streaming state.

use std::sync::Arc;

use glam::DVec2;
use serde::{Deserialize, Serialize};
use terra_heightfield::HeightMap;
use terra_mesh::{MeshSettings, TerrainMeshData};

use crate::bounds::Rect;
use crate::lod::LodLevel;

/// Viewer distance below which a ready collider mesh is installed.
pub const COLLIDER_GENERATION_DISTANCE_THRESHOLD: f64 = 5.0;

/// Grid coordinate of a chunk on the ground plane.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChunkCoord {
    pub x: i32,
    pub y: i32,
}

/// One LOD slot of a chunk. Transitions one way only:
/// not requested, then requested, then ready.
enum LodMeshState {
    NotRequested,
    Requested,
    Ready(Arc<TerrainMeshData>),
}

struct LodMeshSlot {
    state: LodMeshState,
}

impl LodMeshSlot {
    fn new() -> Self {
        Self {
            state: LodMeshState::NotRequested,
        }
    }

    fn mesh(&self) -> Option<&Arc<TerrainMeshData>> {
        match &self.state {
            LodMeshState::Ready(mesh) => Some(mesh),
            _ => None,
        }
    }

    fn is_requested(&self) -> bool {
        !matches!(self.state, LodMeshState::NotRequested)
    }
}

/// What a chunk update asks its owner to do.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct ChunkUpdate {
    /// `Some(new_visibility)` when visibility flipped this update.
    pub visibility_changed: Option<bool>,
    /// Detail-level index whose mesh should be built in the background.
    pub mesh_request: Option<usize>,
}

impl ChunkUpdate {
    fn none() -> Self {
        Self::default()
    }
}

/// Streaming state for one terrain chunk.
///
/// The chunk makes all LOD, visibility, and collider decisions; its owner
/// performs the side effects those decisions call for (submitting
/// background jobs and maintaining the visible working set).
pub struct TerrainChunk {
    coord: ChunkCoord,
    sample_centre: DVec2,
    bounds: Rect,
    detail_levels: Vec<LodLevel>,
    collider_lod_index: usize,
    lod_meshes: Vec<LodMeshSlot>,
    max_view_distance: f64,
    height_map: Option<Arc<HeightMap>>,
    active_lod_index: Option<usize>,
    collider_mesh: Option<Arc<TerrainMeshData>>,
    visible: bool,
    last_visible_tick: u64,
}

impl TerrainChunk {
    /// Creates a chunk at `coord` with its bounds and sample centre derived
    /// from the mesh settings. `detail_levels` must be non-empty and
    /// `collider_lod_index` must index into it.
    pub fn new(
        coord: ChunkCoord,
        detail_levels: Vec<LodLevel>,
        collider_lod_index: usize,
        mesh_settings: &MeshSettings,
    ) -> Self {
        debug_assert!(!detail_levels.is_empty());
        debug_assert!(collider_lod_index < detail_levels.len());

        let world_size = mesh_settings.mesh_world_size();
        let position = DVec2::new(coord.x as f64, coord.y as f64) * world_size;
        // Heights are sampled in noise space, before mesh scaling.
        let sample_centre = position / mesh_settings.mesh_scale;

        let lod_meshes = (0..detail_levels.len()).map(|_| LodMeshSlot::new()).collect();
        let max_view_distance = detail_levels[detail_levels.len() - 1].visible_distance_threshold;

        Self {
            coord,
            sample_centre,
            bounds: Rect::new(position, DVec2::splat(world_size)),
            detail_levels,
            collider_lod_index,
            lod_meshes,
            max_view_distance,
            height_map: None,
            active_lod_index: None,
            collider_mesh: None,
            visible: false,
            last_visible_tick: 0,
        }
    }

    pub fn coord(&self) -> ChunkCoord {
        self.coord
    }

    /// Centre of this chunk's heightfield sample region, in noise space.
    pub fn sample_centre(&self) -> DVec2 {
        self.sample_centre
    }

    pub fn height_map(&self) -> Option<&Arc<HeightMap>> {
        self.height_map.as_ref()
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// The mesh simplification level for a detail-level index.
    pub fn lod_for_index(&self, lod_index: usize) -> usize {
        self.detail_levels[lod_index].lod
    }

    /// Mesh currently swapped in for rendering, if any.
    pub fn active_mesh(&self) -> Option<&Arc<TerrainMeshData>> {
        self.active_lod_index
            .and_then(|index| self.lod_meshes[index].mesh())
    }

    pub fn active_lod_index(&self) -> Option<usize> {
        self.active_lod_index
    }

    /// Installed collision mesh, if the viewer has come close enough.
    pub fn collider_mesh(&self) -> Option<&Arc<TerrainMeshData>> {
        self.collider_mesh.as_ref()
    }

    /// Tick at which this chunk was last seen visible, for eviction.
    pub fn last_visible_tick(&self) -> u64 {
        self.last_visible_tick
    }

    pub(crate) fn touch(&mut self, tick: u64) {
        self.last_visible_tick = tick;
    }

    /// Stores the heightfield and runs the first actionable update.
    pub fn on_height_map_received(&mut self, height_map: HeightMap, viewer: DVec2) -> ChunkUpdate {
        self.height_map = Some(Arc::new(height_map));
        self.update(viewer)
    }

    /// Stores a completed LOD mesh.
    ///
    /// Results for chunks that have since left the view are stored all the
    /// same; the mesh is ready if the chunk comes back.
    pub fn on_mesh_received(&mut self, lod_index: usize, mesh: TerrainMeshData) {
        self.lod_meshes[lod_index].state = LodMeshState::Ready(Arc::new(mesh));
    }

    /// Refreshes visibility and the active LOD for the given viewer
    /// position. A no-op until the heightfield has arrived.
    pub fn update(&mut self, viewer: DVec2) -> ChunkUpdate {
        if self.height_map.is_none() {
            return ChunkUpdate::none();
        }

        let distance = self.bounds.sqr_distance(viewer).sqrt();
        let was_visible = self.visible;
        let visible = distance <= self.max_view_distance;
        let mut mesh_request = None;

        if visible {
            // Finest level whose threshold covers the distance wins;
            // past every threshold short of the last, the coarsest wins.
            let mut lod_index = 0;
            for (i, level) in self.detail_levels[..self.detail_levels.len() - 1]
                .iter()
                .enumerate()
            {
                if distance > level.visible_distance_threshold {
                    lod_index = i + 1;
                } else {
                    break;
                }
            }

            if Some(lod_index) != self.active_lod_index {
                let slot = &mut self.lod_meshes[lod_index];
                if slot.mesh().is_some() {
                    self.active_lod_index = Some(lod_index);
                } else if !slot.is_requested() {
                    slot.state = LodMeshState::Requested;
                    mesh_request = Some(lod_index);
                }
            }
        }

        self.visible = visible;
        ChunkUpdate {
            visibility_changed: (was_visible != visible).then_some(visible),
            mesh_request,
        }
    }

    /// Advances the collider toward installation.
    ///
    /// The collider mesh is requested as soon as the chunk enters the
    /// collider LOD's range, but only installed once the viewer is within
    /// [`COLLIDER_GENERATION_DISTANCE_THRESHOLD`], so collision is in place
    /// the moment the viewer arrives.
    pub fn update_collision(&mut self, viewer: DVec2) -> Option<usize> {
        if self.collider_mesh.is_some() || self.height_map.is_none() {
            return None;
        }

        let sqr_distance = self.bounds.sqr_distance(viewer);
        let mut mesh_request = None;

        let collider_level = &self.detail_levels[self.collider_lod_index];
        if sqr_distance < collider_level.sqr_visible_distance_threshold() {
            let slot = &mut self.lod_meshes[self.collider_lod_index];
            if !slot.is_requested() {
                slot.state = LodMeshState::Requested;
                mesh_request = Some(self.collider_lod_index);
            }
        }

        if sqr_distance
            < COLLIDER_GENERATION_DISTANCE_THRESHOLD * COLLIDER_GENERATION_DISTANCE_THRESHOLD
            && let Some(mesh) = self.lod_meshes[self.collider_lod_index].mesh()
        {
            self.collider_mesh = Some(Arc::clone(mesh));
        }

        mesh_request
    }
}
