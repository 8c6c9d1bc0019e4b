//! # World Generator
//!
//! The streaming scheduler. Tracks each viewer's chunk position,
//! computes the disk of chunk indices that should be loaded around it,
//! diffs that against what the viewer currently holds, and drives the
//! diff to completion through time-sliced cooperative tasks - at most
//! one task per viewer, at most [`MAX_RUNNING_TASKS`] running at once.
//!
//! Chunks overlapping several viewers are shared through a reference
//! count: generated exactly once when the count first rises from zero,
//! destroyed exactly once when the last viewer lets go. The count goes
//! up or down by exactly one per load/unload step, so the arithmetic
//! stays correct under arbitrary interleaving of task steps.
//!
//! ## Cooperative model
//!
//! Nothing here runs on another thread. The host calls [`drive`] once
//! per frame; each running task then processes queue entries until its
//! time budget (~10ms) is spent, yielding between entries and never
//! mid-chunk. [`flush`] runs every task to completion, for teardown and
//! tests.
//!
//! [`drive`]: WorldGenerator::drive
//! [`flush`]: WorldGenerator::flush

use std::collections::hash_map::Entry;
use std::collections::{HashMap, HashSet, VecDeque};
use std::time::{Duration, Instant};

use tessera_procedural::{MapConfig, ProceduralMapGenerator, TileRenderer};

use crate::chunk::ChunkIndex;
use crate::circle::CirclePattern;
use crate::config::WorldConfig;
use crate::error::{WorldError, WorldResult};
use crate::loader::ChunkLoader;

/// Maximum viewer tasks stepped concurrently; excess viewers wait.
pub const MAX_RUNNING_TASKS: usize = 4;

/// Wall-clock budget one task may spend per [`WorldGenerator::drive`].
pub const TASK_TIME_BUDGET: Duration = Duration::from_millis(10);

/// Identifies a viewer (player) whose position drives chunk streaming.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ViewerId(pub u64);

/// Per-viewer streaming state.
#[derive(Clone, Debug, Default)]
struct ViewerChunks {
    /// Chunk keys this viewer currently holds loaded.
    loaded: HashSet<ChunkIndex>,
    /// Chunks still to acquire, nearest first.
    load_queue: VecDeque<ChunkIndex>,
    /// Chunks still to release.
    unload_queue: VecDeque<ChunkIndex>,
}

impl ViewerChunks {
    /// True when the viewer's task has nothing left to do.
    fn is_drained(&self) -> bool {
        self.load_queue.is_empty() && self.unload_queue.is_empty()
    }
}

/// Streaming session counters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct WorldStats {
    /// Chunks actually generated this session.
    pub chunks_generated: u64,
    /// Chunks actually destroyed this session.
    pub chunks_destroyed: u64,
    /// Load queue entries processed (including shared-chunk ref bumps).
    pub load_steps: u64,
    /// Unload queue entries processed (including shared-chunk ref drops).
    pub unload_steps: u64,
}

/// Everything that exists only after activation.
struct Runtime<R: TileRenderer> {
    /// Generate/destroy bridge; owns the renderer.
    loader: ChunkLoader<R>,
    /// The disk of chunk offsets around a viewer, nearest first.
    circle: CirclePattern,
    /// Per-viewer loaded sets and diff queues.
    viewers: HashMap<ViewerId, ViewerChunks>,
    /// Last recorded chunk index per viewer.
    positions: HashMap<ViewerId, ChunkIndex>,
    /// Viewers currently requiring each chunk. Entries are always >= 1;
    /// an entry is removed exactly when it would reach zero, and that is
    /// the moment the chunk is destroyed.
    chunk_refs: HashMap<ChunkIndex, u32>,
    /// Viewers whose tasks are being stepped, at most 4.
    running: Vec<ViewerId>,
    /// Viewers with work waiting for a running slot, FIFO.
    pending: VecDeque<ViewerId>,
    /// Session counters.
    stats: WorldStats,
}

impl<R: TileRenderer> Runtime<R> {
    /// Recomputes the viewer's diff queues against a new target center.
    ///
    /// `None` means the viewer is leaving: the target set is empty and
    /// everything it holds goes to the unload queue.
    fn recompute_queues(&mut self, viewer: ViewerId, center: Option<ChunkIndex>) {
        let chunks = self.viewers.entry(viewer).or_default();
        chunks.load_queue.clear();
        chunks.unload_queue.clear();

        let mut target = HashSet::with_capacity(self.circle.len());
        if let Some(center) = center {
            for &(dx, dy) in self.circle.points() {
                let key = center.offset(dx, dy);
                target.insert(key);
                if !chunks.loaded.contains(&key) {
                    chunks.load_queue.push_back(key);
                }
            }
        }
        for key in &chunks.loaded {
            if !target.contains(key) {
                chunks.unload_queue.push_back(*key);
            }
        }
    }

    /// Recomputes the viewer's queues and ensures a task will drain them.
    ///
    /// A viewer already running keeps its single task, which simply sees
    /// the updated queues; a viewer already waiting keeps its place in
    /// line. Otherwise it takes a free running slot or joins the pending
    /// queue.
    fn schedule(&mut self, viewer: ViewerId, center: Option<ChunkIndex>) {
        self.recompute_queues(viewer, center);

        if self.running.contains(&viewer) || self.pending.contains(&viewer) {
            return;
        }
        if self.running.len() < MAX_RUNNING_TASKS {
            self.running.push(viewer);
            tracing::trace!(viewer = viewer.0, "task started");
        } else {
            self.pending.push_back(viewer);
            tracing::trace!(viewer = viewer.0, "task waiting for a slot");
        }
    }

    /// Steps every running task once, within `budget` each.
    ///
    /// Completed tasks free their slot to the next pending viewer;
    /// promoted viewers are stepped within the same call.
    fn step_tasks(&mut self, budget: Option<Duration>) {
        let mut slot = 0;
        while slot < self.running.len() {
            let viewer = self.running[slot];
            if self.run_task(viewer, budget) {
                self.running.remove(slot);
                tracing::trace!(viewer = viewer.0, "task finished");
                self.retire_viewer_if_idle(viewer);
                if let Some(next) = self.pending.pop_front() {
                    self.running.push(next);
                    tracing::trace!(viewer = next.0, "task started");
                }
            } else {
                slot += 1;
            }
        }
    }

    /// Drains one viewer's queues until done or out of budget.
    ///
    /// Returns true when both queues are empty. Each iteration moves
    /// exactly one chunk key, so the task never yields mid-chunk.
    fn run_task(&mut self, viewer: ViewerId, budget: Option<Duration>) -> bool {
        // The task is the sole mutator of this viewer's state while it
        // runs; taking it out of the table keeps the borrows disjoint.
        let Some(mut chunks) = self.viewers.remove(&viewer) else {
            return true;
        };

        let started = Instant::now();
        let finished = loop {
            if chunks.is_drained() {
                break true;
            }

            if self.unload_prioritized(&chunks) {
                if let Some(key) = chunks.unload_queue.pop_front() {
                    self.apply_unload(&mut chunks, key);
                }
            } else if let Some(key) = chunks.load_queue.pop_front() {
                self.apply_load(&mut chunks, key);
            }

            if let Some(limit) = budget {
                if started.elapsed() > limit {
                    break false;
                }
            }
        };

        self.viewers.insert(viewer, chunks);
        finished
    }

    /// Unload first when release debt piles up past half the disk, or
    /// when there is nothing left to load.
    fn unload_prioritized(&self, chunks: &ViewerChunks) -> bool {
        2 * chunks.unload_queue.len() > self.circle.len() || chunks.load_queue.is_empty()
    }

    /// One load step: bump the shared count, generating on 0 -> 1.
    fn apply_load(&mut self, chunks: &mut ViewerChunks, key: ChunkIndex) {
        chunks.loaded.insert(key);
        match self.chunk_refs.entry(key) {
            Entry::Occupied(mut entry) => *entry.get_mut() += 1,
            Entry::Vacant(entry) => {
                entry.insert(1);
                if self.loader.load_chunk(key) {
                    self.stats.chunks_generated += 1;
                }
            }
        }
        self.stats.load_steps += 1;
    }

    /// One unload step: drop the shared count, destroying at zero.
    fn apply_unload(&mut self, chunks: &mut ViewerChunks, key: ChunkIndex) {
        chunks.loaded.remove(&key);
        match self.chunk_refs.entry(key) {
            Entry::Occupied(entry) if *entry.get() <= 1 => {
                entry.remove();
                if self.loader.unload_chunk(key) {
                    self.stats.chunks_destroyed += 1;
                }
            }
            Entry::Occupied(mut entry) => *entry.get_mut() -= 1,
            Entry::Vacant(_) => {}
        }
        self.stats.unload_steps += 1;
    }

    /// Forgets a viewer that finished its task holding nothing.
    fn retire_viewer_if_idle(&mut self, viewer: ViewerId) {
        if self.positions.contains_key(&viewer) {
            return;
        }
        if self
            .viewers
            .get(&viewer)
            .is_some_and(|chunks| chunks.loaded.is_empty() && chunks.is_drained())
        {
            self.viewers.remove(&viewer);
        }
    }
}

/// The chunk streaming scheduler.
///
/// Two-phase lifecycle: construct over a renderer, optionally adjust the
/// write-once streaming settings, then [`initialize`] with generation
/// parameters. Streaming entry points reject calls before activation;
/// the settings reject writes after it.
///
/// [`initialize`]: WorldGenerator::initialize
pub struct WorldGenerator<R: TileRenderer> {
    /// Tile cells per chunk side; write-once.
    chunk_size: u32,
    /// View radius in chunks around each viewer; write-once.
    view_distance: u32,
    /// The renderer, parked here until activation hands it to the loader.
    renderer: Option<R>,
    /// Active streaming state; `Some` once initialized.
    runtime: Option<Runtime<R>>,
}

impl<R: TileRenderer> WorldGenerator<R> {
    /// Default tile cells per chunk side.
    pub const DEFAULT_CHUNK_SIZE: u32 = 15;
    /// Default view radius in chunks.
    pub const DEFAULT_VIEW_DISTANCE: u32 = 3;

    /// Creates an inactive generator over a renderer, with defaults.
    #[must_use]
    pub fn new(renderer: R) -> Self {
        Self {
            chunk_size: Self::DEFAULT_CHUNK_SIZE,
            view_distance: Self::DEFAULT_VIEW_DISTANCE,
            renderer: Some(renderer),
            runtime: None,
        }
    }

    /// Builds and activates a generator in one step from a validated
    /// configuration.
    ///
    /// # Errors
    ///
    /// Returns configuration or catalog errors from validation and
    /// [`initialize`](Self::initialize).
    pub fn from_config(config: WorldConfig, renderer: R) -> WorldResult<Self> {
        config.validate()?;
        let mut world = Self::new(renderer);
        world.set_chunk_size(config.chunk_size)?;
        world.set_view_distance(config.view_distance)?;
        world.initialize(config.map)?;
        Ok(world)
    }

    /// Sets the chunk size. Write-once: fails after activation.
    ///
    /// # Errors
    ///
    /// [`WorldError::ConfigurationSealed`] after [`initialize`]
    /// (Self::initialize); [`WorldError::InvalidConfig`] for zero.
    pub fn set_chunk_size(&mut self, value: u32) -> WorldResult<()> {
        if self.runtime.is_some() {
            return Err(WorldError::ConfigurationSealed {
                field: "chunk_size",
            });
        }
        if value == 0 {
            return Err(WorldError::InvalidConfig(
                "chunk_size must be positive".to_owned(),
            ));
        }
        self.chunk_size = value;
        Ok(())
    }

    /// Sets the view distance. Write-once: fails after activation.
    ///
    /// # Errors
    ///
    /// [`WorldError::ConfigurationSealed`] after
    /// [`initialize`](Self::initialize).
    pub fn set_view_distance(&mut self, value: u32) -> WorldResult<()> {
        if self.runtime.is_some() {
            return Err(WorldError::ConfigurationSealed {
                field: "view_distance",
            });
        }
        self.view_distance = value;
        Ok(())
    }

    /// Activates streaming: validates generation parameters, computes
    /// the circle pattern, and builds the chunk loader.
    ///
    /// # Errors
    ///
    /// [`WorldError::AlreadyInitialized`] on a second call;
    /// [`WorldError::Generation`] for an empty biome catalog.
    pub fn initialize(&mut self, map: MapConfig) -> WorldResult<()> {
        if self.runtime.is_some() {
            return Err(WorldError::AlreadyInitialized);
        }
        let generator = ProceduralMapGenerator::new(map)?;
        let Some(renderer) = self.renderer.take() else {
            return Err(WorldError::AlreadyInitialized);
        };

        let circle = CirclePattern::compute(self.view_distance);
        tracing::debug!(
            chunk_size = self.chunk_size,
            view_distance = self.view_distance,
            chunks_per_viewer = circle.len(),
            "world generator activated"
        );

        self.runtime = Some(Runtime {
            loader: ChunkLoader::new(self.chunk_size, renderer, generator),
            circle,
            viewers: HashMap::new(),
            positions: HashMap::new(),
            chunk_refs: HashMap::new(),
            running: Vec::new(),
            pending: VecDeque::new(),
            stats: WorldStats::default(),
        });
        Ok(())
    }

    /// Records a viewer's position, rescheduling its streaming work when
    /// it crossed into a different chunk.
    ///
    /// Sub-chunk movement is a no-op: the call returns without touching
    /// queues or tasks when the chunk index is unchanged.
    ///
    /// # Errors
    ///
    /// [`WorldError::NotInitialized`] before activation.
    pub fn update_player_position(
        &mut self,
        viewer: ViewerId,
        position: (f64, f64),
    ) -> WorldResult<()> {
        let runtime = self.runtime.as_mut().ok_or(WorldError::NotInitialized)?;

        let index = runtime.loader.chunk_index_from_position(position);
        if runtime.positions.get(&viewer) == Some(&index) {
            return Ok(());
        }

        runtime.schedule(viewer, Some(index));
        runtime.positions.insert(viewer, index);
        Ok(())
    }

    /// Removes a viewer, releasing every chunk it holds through the
    /// ref-counted unload path. Chunks still shared with other viewers
    /// stay loaded. Unknown ids are a no-op.
    ///
    /// # Errors
    ///
    /// [`WorldError::NotInitialized`] before activation.
    pub fn remove_player(&mut self, viewer: ViewerId) -> WorldResult<()> {
        let runtime = self.runtime.as_mut().ok_or(WorldError::NotInitialized)?;

        if runtime.positions.remove(&viewer).is_some() {
            runtime.schedule(viewer, None);
        }
        Ok(())
    }

    /// Steps every running task within the per-task time budget.
    ///
    /// Call once per host frame. The cost of a call is bounded by
    /// [`TASK_TIME_BUDGET`] times [`MAX_RUNNING_TASKS`] regardless of
    /// how many chunks must change.
    ///
    /// # Errors
    ///
    /// [`WorldError::NotInitialized`] before activation.
    pub fn drive(&mut self) -> WorldResult<()> {
        let runtime = self.runtime.as_mut().ok_or(WorldError::NotInitialized)?;
        runtime.step_tasks(Some(TASK_TIME_BUDGET));
        Ok(())
    }

    /// Runs every task (running and pending) to completion, ignoring
    /// the time budget. For teardown and tests.
    ///
    /// # Errors
    ///
    /// [`WorldError::NotInitialized`] before activation.
    pub fn flush(&mut self) -> WorldResult<()> {
        let runtime = self.runtime.as_mut().ok_or(WorldError::NotInitialized)?;
        while !(runtime.running.is_empty() && runtime.pending.is_empty()) {
            runtime.step_tasks(None);
        }
        Ok(())
    }

    /// True once [`initialize`](Self::initialize) has succeeded.
    #[inline]
    #[must_use]
    pub fn is_initialized(&self) -> bool {
        self.runtime.is_some()
    }

    /// The configured chunk size.
    #[inline]
    #[must_use]
    pub const fn chunk_size(&self) -> u32 {
        self.chunk_size
    }

    /// The configured view distance.
    #[inline]
    #[must_use]
    pub const fn view_distance(&self) -> u32 {
        self.view_distance
    }

    /// Chunks a single viewer keeps loaded (the circle pattern size).
    #[must_use]
    pub fn chunks_per_viewer(&self) -> usize {
        self.runtime.as_ref().map_or(0, |rt| rt.circle.len())
    }

    /// Chunks currently materialized across all viewers.
    #[must_use]
    pub fn loaded_chunk_count(&self) -> usize {
        self.runtime.as_ref().map_or(0, |rt| rt.loader.loaded_count())
    }

    /// Viewer tasks currently occupying a running slot.
    #[must_use]
    pub fn running_task_count(&self) -> usize {
        self.runtime.as_ref().map_or(0, |rt| rt.running.len())
    }

    /// Viewer tasks waiting for a running slot.
    #[must_use]
    pub fn pending_task_count(&self) -> usize {
        self.runtime.as_ref().map_or(0, |rt| rt.pending.len())
    }

    /// Session counters.
    #[must_use]
    pub fn stats(&self) -> WorldStats {
        self.runtime.as_ref().map_or_else(WorldStats::default, |rt| rt.stats)
    }
}
