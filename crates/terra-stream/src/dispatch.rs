//! Background generation of heightmaps and chunk meshes.
//!
//! A fixed pool of worker threads pulls typed jobs from a shared queue and
//! pushes typed results back. The consumer drains the whole result queue
//! once per tick; results arrive in completion order, with no ordering
//! guarantee between separately submitted jobs. There is no cancellation:
//! a job submitted for a chunk that has since left the view still runs to
//! completion and its result is still delivered.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use crossbeam_channel::{Receiver, Sender, unbounded};
use glam::DVec2;
use terra_heightfield::{HeightMap, HeightfieldSettings, generate_height_map};
use terra_mesh::{MeshSettings, TerrainMeshData, generate_terrain_mesh};

use crate::chunk::ChunkCoord;

/// A unit of background work for one chunk.
#[derive(Clone, Debug)]
pub enum ChunkJob {
    /// Generate the heightfield for a chunk's sample region.
    HeightMap {
        coord: ChunkCoord,
        settings: Box<HeightfieldSettings>,
        verts_per_line: usize,
        sample_centre: DVec2,
    },
    /// Build one LOD mesh from an already generated heightfield.
    Mesh {
        coord: ChunkCoord,
        /// Position in the chunk's detail-level ladder, for routing the
        /// result back to the right slot.
        lod_index: usize,
        /// Simplification level handed to the mesh builder.
        lod: usize,
        height_map: Arc<HeightMap>,
        settings: MeshSettings,
    },
}

/// The completed counterpart of a [`ChunkJob`].
#[derive(Debug)]
pub enum ChunkJobResult {
    HeightMap {
        coord: ChunkCoord,
        height_map: HeightMap,
    },
    Mesh {
        coord: ChunkCoord,
        lod_index: usize,
        mesh: TerrainMeshData,
    },
}

/// Runs one job to completion. Pure computation over the job's own inputs.
pub fn execute_job(job: ChunkJob) -> ChunkJobResult {
    match job {
        ChunkJob::HeightMap {
            coord,
            settings,
            verts_per_line,
            sample_centre,
        } => ChunkJobResult::HeightMap {
            coord,
            height_map: generate_height_map(
                verts_per_line,
                verts_per_line,
                &settings,
                sample_centre,
            ),
        },
        ChunkJob::Mesh {
            coord,
            lod_index,
            lod,
            height_map,
            settings,
        } => ChunkJobResult::Mesh {
            coord,
            lod_index,
            mesh: generate_terrain_mesh(&height_map, &settings, lod),
        },
    }
}

/// Owns the worker pool and both ends of the job pipeline.
///
/// Constructed once and handed to the streamer; workers shut down when the
/// dispatcher is dropped and the job channel disconnects.
pub struct WorkDispatcher {
    job_sender: Sender<ChunkJob>,
    result_receiver: Receiver<ChunkJobResult>,
    in_flight: Arc<AtomicU64>,
}

impl WorkDispatcher {
    /// Spawn a dispatcher with `thread_count` workers.
    ///
    /// The job queue is unbounded so a submission is never rejected; the
    /// worker pool itself is what bounds concurrency.
    pub fn new(thread_count: usize) -> Self {
        let (job_sender, job_receiver) = unbounded::<ChunkJob>();
        let (result_sender, result_receiver) = unbounded::<ChunkJobResult>();
        let in_flight = Arc::new(AtomicU64::new(0));

        for _ in 0..thread_count.max(1) {
            let receiver = job_receiver.clone();
            let sender = result_sender.clone();
            let in_flight = Arc::clone(&in_flight);

            std::thread::Builder::new()
                .name("terrain-worker".into())
                .spawn(move || {
                    while let Ok(job) = receiver.recv() {
                        let result = execute_job(job);
                        // The send only fails when the dispatcher is gone,
                        // in which case the result has no consumer anyway.
                        let _ = sender.send(result);
                        in_flight.fetch_sub(1, Ordering::Relaxed);
                    }
                })
                .expect("failed to spawn terrain worker thread");
        }

        Self {
            job_sender,
            result_receiver,
            in_flight,
        }
    }

    /// A dispatcher sized to the machine, leaving a core for the caller.
    pub fn with_defaults() -> Self {
        Self::new(num_cpus::get().saturating_sub(1).max(1))
    }

    /// Queue a job for background execution.
    pub fn submit(&self, job: ChunkJob) {
        self.in_flight.fetch_add(1, Ordering::Relaxed);
        // Unbounded queue with workers holding the other end; the send
        // cannot fail while the dispatcher is alive.
        let _ = self.job_sender.send(job);
    }

    /// Drain every completed result, in completion order.
    ///
    /// Call once per tick from the owning schedule.
    pub fn drain_results(&self) -> Vec<ChunkJobResult> {
        let mut results = Vec::new();
        while let Ok(result) = self.result_receiver.try_recv() {
            results.push(result);
        }
        results
    }

    /// Jobs queued or executing, not yet delivered. Backlog metric.
    pub fn in_flight_count(&self) -> u64 {
        self.in_flight.load(Ordering::Relaxed)
    }
}
