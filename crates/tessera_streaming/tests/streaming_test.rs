//! # Streaming Integration Tests
//!
//! Proves a viewer can walk forever with a bounded chunk footprint, and
//! that shared chunks survive any interleaving of viewers joining,
//! moving, and leaving.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;
use std::time::Instant;

use tessera_procedural::{MapConfig, TileRenderer, TileSprite};
use tessera_streaming::{ViewerId, WorldConfig, WorldGenerator, MAX_RUNNING_TASKS};

/// Renderer double shared between the test and the generator.
#[derive(Clone, Default)]
struct SharedGrid {
    cells: Rc<RefCell<HashMap<(i32, i32), TileSprite>>>,
}

impl SharedGrid {
    fn occupied(&self) -> usize {
        self.cells.borrow().len()
    }
}

impl TileRenderer for SharedGrid {
    fn draw_tile(&mut self, x: i32, y: i32, sprite: TileSprite) {
        self.cells.borrow_mut().insert((x, y), sprite);
    }

    fn clear_tile(&mut self, x: i32, y: i32) {
        self.cells.borrow_mut().remove(&(x, y));
    }
}

fn activated(chunk_size: u32, view_distance: u32) -> (WorldGenerator<SharedGrid>, SharedGrid) {
    let grid = SharedGrid::default();
    let config = WorldConfig {
        chunk_size,
        view_distance,
        map: MapConfig::default(),
    };
    let world = WorldGenerator::from_config(config, grid.clone()).unwrap();
    (world, grid)
}

/// Test: walk 10,000 units east; the loaded footprint never outgrows
/// one viewer's disk and the grid only ever shows tiles near the viewer.
#[test]
fn test_infinite_walk_bounded_footprint() {
    let (mut world, grid) = activated(15, 3);
    let per_viewer = world.chunks_per_viewer();

    let start = Instant::now();
    let mut x = 0.0f64;

    for step in 0..10_000u32 {
        x += 1.0;
        world
            .update_player_position(ViewerId(1), (x, 0.0))
            .unwrap();

        // Process streaming once per frame-ish cadence.
        if step % 8 == 0 {
            world.drive().unwrap();
        }

        if step % 500 == 0 {
            world.flush().unwrap();
            assert_eq!(world.loaded_chunk_count(), per_viewer);
            assert_eq!(grid.occupied(), per_viewer * 15 * 15);
        }
    }

    world.flush().unwrap();

    let stats = world.stats();
    println!("Walked 10,000 units in {:?}", start.elapsed());
    println!("Generated total: {}", stats.chunks_generated);
    println!("Destroyed total: {}", stats.chunks_destroyed);

    assert_eq!(world.loaded_chunk_count(), per_viewer);
    assert_eq!(
        stats.chunks_generated - stats.chunks_destroyed,
        per_viewer as u64,
        "everything generated beyond the live disk must have been destroyed"
    );
}

/// Test: a teleport far away replaces the whole disk, once.
#[test]
fn test_teleport_replaces_disk() {
    let (mut world, grid) = activated(15, 3);

    world
        .update_player_position(ViewerId(1), (0.0, 0.0))
        .unwrap();
    world.flush().unwrap();
    let per_viewer = world.loaded_chunk_count();
    let after_spawn = world.stats();

    // Far enough that old and new disks are disjoint.
    world
        .update_player_position(ViewerId(1), (100_000.0, 100_000.0))
        .unwrap();
    world.flush().unwrap();

    let stats = world.stats();
    assert_eq!(world.loaded_chunk_count(), per_viewer);
    assert_eq!(
        stats.chunks_generated - after_spawn.chunks_generated,
        per_viewer as u64
    );
    assert_eq!(stats.chunks_destroyed as usize, per_viewer);
    assert_eq!(grid.occupied(), per_viewer * 15 * 15);
}

/// Test: two viewers with overlapping disks share the overlap; tiles in
/// the shared band survive one viewer leaving.
#[test]
fn test_overlapping_viewers_share_chunks() {
    let (mut world, grid) = activated(15, 3);
    let per_viewer = world.chunks_per_viewer();

    // Two chunks apart horizontally: radius-3 disks overlap.
    world
        .update_player_position(ViewerId(1), (0.0, 0.0))
        .unwrap();
    world
        .update_player_position(ViewerId(2), (30.0, 0.0))
        .unwrap();
    world.flush().unwrap();

    let union = world.loaded_chunk_count();
    assert!(union < 2 * per_viewer, "disks must overlap");
    assert_eq!(world.stats().chunks_generated as usize, union);

    // Viewer 1 leaves: viewer 2's full disk must remain intact.
    world.remove_player(ViewerId(1)).unwrap();
    world.flush().unwrap();
    assert_eq!(world.loaded_chunk_count(), per_viewer);
    assert_eq!(grid.occupied(), per_viewer * 15 * 15);

    // The tile under viewer 2 is still there.
    assert!(grid.cells.borrow().contains_key(&(30, 0)));

    world.remove_player(ViewerId(2)).unwrap();
    world.flush().unwrap();
    assert_eq!(world.loaded_chunk_count(), 0);
    assert_eq!(grid.occupied(), 0);
}

/// Test: a crowd larger than the task cap streams everyone eventually,
/// and removing them all returns the world to empty.
#[test]
fn test_crowd_beyond_task_cap() {
    let (mut world, grid) = activated(15, 2);
    let viewers = 10u64;

    for id in 0..viewers {
        #[allow(clippy::cast_precision_loss)]
        let x = id as f64 * 1000.0;
        world
            .update_player_position(ViewerId(id), (x, 0.0))
            .unwrap();
    }
    assert_eq!(world.running_task_count(), MAX_RUNNING_TASKS);
    assert_eq!(
        world.pending_task_count(),
        viewers as usize - MAX_RUNNING_TASKS
    );

    // Drive frame by frame until all tasks drain.
    let mut frames = 0u32;
    while world.running_task_count() > 0 {
        world.drive().unwrap();
        frames += 1;
        assert!(frames < 10_000, "streaming never settled");
    }
    println!("Settled {viewers} viewers in {frames} frames");

    let per_viewer = world.chunks_per_viewer();
    assert_eq!(world.loaded_chunk_count(), viewers as usize * per_viewer);

    for id in 0..viewers {
        world.remove_player(ViewerId(id)).unwrap();
    }
    world.flush().unwrap();
    assert_eq!(world.loaded_chunk_count(), 0);
    assert_eq!(grid.occupied(), 0);
    assert_eq!(
        world.stats().chunks_generated,
        world.stats().chunks_destroyed
    );
}

/// Test: regenerating a chunk after a walk away and back produces the
/// exact same tiles.
#[test]
fn test_revisited_terrain_is_identical() {
    let (mut world, grid) = activated(15, 1);

    world
        .update_player_position(ViewerId(1), (0.0, 0.0))
        .unwrap();
    world.flush().unwrap();
    let first = grid.cells.borrow().clone();
    assert_eq!(first.len(), 15 * 15);

    // Walk far away and back.
    world
        .update_player_position(ViewerId(1), (5000.0, -5000.0))
        .unwrap();
    world.flush().unwrap();
    world
        .update_player_position(ViewerId(1), (0.0, 0.0))
        .unwrap();
    world.flush().unwrap();

    let revisited = grid.cells.borrow();
    for (cell, sprite) in &first {
        assert_eq!(
            revisited.get(cell),
            Some(sprite),
            "tile at {cell:?} changed across a reload"
        );
    }
}
