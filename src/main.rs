use bevy::prelude::*;

use wayfarer::game::collision::{BoundingBox, Collideable, CollisionLayer};
use wayfarer::game::cursor::{CursorRay, CursorTarget};
use wayfarer::game::navigation::{HeightMap, NavigationGrid, NormalMap, TerrainMaps};
use wayfarer::game::pathfinding::{MoveableActor, NavigationPath, PathRequest, SearchStrategy};
use wayfarer::game::SpatialPlugin;

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use std::fs;
use std::path::PathBuf;

fn setup_file_logging() -> String {
    let log_dir = PathBuf::from("logs");
    if !log_dir.exists() {
        fs::create_dir_all(&log_dir).expect("Failed to create logs directory");
    }

    // Keep only the last 25 runs
    cleanup_old_logs(&log_dir, 25);

    let now = chrono::Local::now();
    let log_filename = format!("wayfarer_{}.log", now.format("%Y%m%d_%H%M%S"));
    let log_file_path = log_dir.join(&log_filename);
    let log_path_str = log_file_path.to_string_lossy().to_string();

    let file_appender = RollingFileAppender::new(
        Rotation::NEVER,
        &log_dir,
        &log_filename
    );

    let file_layer = fmt::layer()
        .with_writer(file_appender)
        .with_ansi(false);

    let stdout_layer = fmt::layer()
        .with_writer(std::io::stdout)
        .with_target(false);

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("wayfarer=info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .with(stdout_layer)
        .init();

    log_path_str
}

fn cleanup_old_logs(log_dir: &PathBuf, keep_count: usize) {
    if let Ok(entries) = fs::read_dir(log_dir) {
        let mut log_files: Vec<_> = entries
            .filter_map(|e| e.ok())
            .filter(|e| {
                e.path()
                    .file_name()
                    .and_then(|n| n.to_str())
                    .map(|s| s.starts_with("wayfarer") && s.ends_with(".log"))
                    .unwrap_or(false)
            })
            .collect();

        // Oldest first
        log_files.sort_by_key(|e| e.metadata().ok().and_then(|m| m.modified().ok()));

        if log_files.len() > keep_count {
            for file in log_files.iter().take(log_files.len() - keep_count) {
                let _ = fs::remove_file(file.path());
            }
        }
    }
}

/// One simulation step: the fixed spatial schedule, then the rest of the frame.
fn step(app: &mut App) {
    app.world_mut().run_schedule(FixedUpdate);
    app.update();
}

/// Gentle hill in the middle, with a cliff ring that is too steep to walk.
fn demo_terrain() -> TerrainMaps {
    let size = 64;
    let half = size as f32 / 2.0;
    let height = HeightMap::from_fn(size, size, |x, y| {
        let d = Vec2::new(x as f32 - half, y as f32 - half).length() / half;
        (1.0 - d).max(0.0) * 0.25
    });
    let normal = NormalMap::from_fn(size, size, |x, y| {
        let d = Vec2::new(x as f32 - half, y as f32 - half).length();
        if (20.0..22.0).contains(&d) {
            Vec3::new(1.0, 0.3, 0.0)
        } else {
            Vec3::Y
        }
    });
    TerrainMaps { height, normal }
}

fn log_path(app: &App, actor: Entity, label: &str) {
    match app.world().get::<NavigationPath>(actor) {
        Some(path) => info!(
            "{}: {} waypoints, first {:?}, last {:?}",
            label,
            path.waypoints.len(),
            path.waypoints.first(),
            path.destination()
        ),
        None => info!("{}: no path", label),
    }
}

fn main() {
    let log_file = setup_file_logging();

    println!("╔══════════════════════════════════════════════════════════╗");
    println!("║  Wayfarer spatial demo - Logging to file                 ║");
    println!("╠══════════════════════════════════════════════════════════╣");
    println!("║  Log file: {:<45} ║", log_file);
    println!("╚══════════════════════════════════════════════════════════╝");

    let mut app = App::new();
    app.add_plugins(MinimalPlugins).add_plugins(SpatialPlugin);

    // Startup: config, grid, pathfinder
    app.update();

    let world = app.world_mut();
    world.spawn(Collideable::new(
        BoundingBox::new(Vec3::new(-50.0, -1.0, -50.0), Vec3::new(50.0, 0.0, 50.0)),
        CollisionLayer::GeometrySimple,
    ));
    let wall = world
        .spawn((
            Transform::from_xyz(5.0, 1.5, 0.0),
            Collideable::blocking(
                BoundingBox::from_center_half_extents(Vec3::ZERO, Vec3::new(0.5, 1.5, 6.0)),
                CollisionLayer::Building,
            ),
        ))
        .id();
    world.spawn((
        Transform::from_xyz(10.5, 0.5, 4.5),
        Collideable::blocking(
            BoundingBox::from_center_half_extents(Vec3::ZERO, Vec3::splat(0.4)),
            CollisionLayer::Npc,
        ),
    ));
    let actor = world
        .spawn((
            Transform::from_xyz(-10.5, 0.0, 0.5),
            MoveableActor { pathfinding_bounds: 30 },
            Collideable::blocking(
                BoundingBox::from_center_half_extents(Vec3::new(0.0, 0.5, 0.0), Vec3::new(0.4, 0.5, 0.4)),
                CollisionLayer::Player,
            ),
        ))
        .id();
    world.insert_resource(demo_terrain());

    step(&mut app);

    // Cursor straight down onto the floor behind the wall.
    let dir = Dir3::NEG_Y;
    app.world_mut().resource_mut::<CursorRay>().0 = Some(Ray3d::new(Vec3::new(15.5, 30.0, 0.5), dir));
    step(&mut app);

    let target = app.world().resource::<CursorTarget>().clone();
    let Some(floor_hit) = target.navigation else {
        error!("Cursor ray found no floor");
        return;
    };
    {
        let grid = app.world().resource::<NavigationGrid>();
        let actor_pos = app.world().get::<Transform>(actor).map(|t| t.translation).unwrap_or_default();
        let range = grid.grid_range_around(actor_pos, 30);
        info!(
            "Cursor on {:?} ({:?}) at {:?}, valid destination: {}",
            target.primary.map(|h| h.entity),
            target.primary.map(|h| h.layer),
            floor_hit.point,
            target.is_valid_destination(grid, Some(actor), range.as_ref())
        );

        if let (Some(from), Some(to)) = (grid.world_to_grid(actor_pos), grid.world_to_grid(floor_hit.point)) {
            let dir = Vec2::new(to.col as f32 - from.col as f32, to.row as f32 - from.row as f32);
            info!("Line of sight blocked at {:?}", grid.cast_ray(from, dir, dir.length()));
        }
    }

    app.world_mut().write_message(PathRequest::new(actor, floor_hit.point));
    step(&mut app);
    log_path(&app, actor, "A* around the wall");

    app.world_mut()
        .write_message(PathRequest::new(actor, floor_hit.point).with_strategy(SearchStrategy::Bfs));
    step(&mut app);
    log_path(&app, actor, "BFS around the wall");

    // Lengthen the wall's reach by sliding it; occupancy follows.
    if let Some(mut transform) = app.world_mut().get_mut::<Transform>(wall) {
        transform.translation.z = 4.0;
    }
    step(&mut app);
    app.world_mut().write_message(PathRequest::new(actor, floor_hit.point));
    step(&mut app);
    log_path(&app, actor, "A* after the wall moved");

    app.world_mut().despawn(wall);
    step(&mut app);
    let held = app
        .world()
        .resource::<NavigationGrid>()
        .squares()
        .filter(|cell| cell.occupant == Some(wall))
        .count();
    info!("Cells still held by the despawned wall: {}", held);

    app.world_mut().write_message(PathRequest::new(actor, floor_hit.point));
    step(&mut app);
    log_path(&app, actor, "A* with the wall gone");
}
