//! # Tessera Streaming
//!
//! Viewer-driven chunk streaming over the procedural tile generator.
//!
//! The world is an unbounded grid of fixed-size square chunks. Each
//! viewer keeps a circular disk of chunks materialized around its
//! position; as viewers move, join, and leave, the [`WorldGenerator`]
//! scheduler diffs each viewer's target disk against what it holds and
//! streams the difference in and out through cooperative, time-sliced
//! tasks. Chunks visible to several viewers are shared: generated once,
//! destroyed when the last viewer releases them.
//!
//! ## Architecture
//!
//! - [`world`] - the scheduler: viewer tracking, ref counts, task slots
//! - [`loader`] - idempotent chunk materialization over a renderer
//! - [`circle`] - the nearest-first disk of chunk offsets
//! - [`chunk`] - centered chunk index / world position mapping
//! - [`config`] - TOML-backed streaming and generation settings
//! - [`error`] - the crate's error type

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod chunk;
pub mod circle;
pub mod config;
pub mod error;
pub mod loader;
pub mod world;

pub use chunk::ChunkIndex;
pub use circle::CirclePattern;
pub use config::WorldConfig;
pub use error::{WorldError, WorldResult};
pub use loader::ChunkLoader;
pub use world::{ViewerId, WorldGenerator, WorldStats, MAX_RUNNING_TASKS, TASK_TIME_BUDGET};
