use std::process::ExitCode;

use clap::Parser;
use glam::Vec3;
use orbis_config::{CliArgs, Config, TerrainConfig};
use orbis_mesh::Classification;
use orbis_terrain::{
    ReliefParams, SnapshotError, Terrain, TerrainError, TerrainParams, seed, snapshot,
};
use rand::Rng;
use tracing::{debug, error, info, warn};

#[derive(Debug, thiserror::Error)]
enum DemoError {
    #[error(transparent)]
    Terrain(#[from] TerrainError),

    #[error(transparent)]
    Snapshot(#[from] SnapshotError),
}

fn terrain_params(config: &TerrainConfig) -> TerrainParams {
    TerrainParams {
        recursion_level: config.recursion_level,
        leaf_depth: config.leaf_depth,
        relief: ReliefParams {
            iterations: config.iterations,
            water_level: config.water_level,
            land_height: config.land_height,
        },
        smoothing_passes: config.smoothing_passes,
        polar_cap: config.polar_cap,
    }
}

fn probe_poles(terrain: &Terrain) {
    for (name, dir) in [("north", Vec3::Y), ("south", Vec3::NEG_Y)] {
        match terrain.find_face_for_point(dir) {
            Some(hit) => info!(
                pole = name,
                face = %hit.face,
                altitude = hit.distance - 1.0,
                "Pole located"
            ),
            None => warn!(pole = name, "Pole ray missed the surface"),
        }
    }
}

fn probe_random_points(terrain: &Terrain, world_seed: u64, count: u32) {
    let mut rng = seed::stream_rng(world_seed, "probes");
    let mut land = 0;
    let mut misses = 0;
    for _ in 0..count {
        let dir = Vec3::new(
            rng.random_range(-1.0..=1.0),
            rng.random_range(-1.0..=1.0),
            rng.random_range(-1.0..=1.0),
        );
        let Some(hit) = terrain.find_face_for_point(dir) else {
            misses += 1;
            continue;
        };
        let on_land = terrain
            .sub_mesh(hit.sub_mesh())
            .and_then(|sub| sub.triangle(hit.local_face()))
            .is_some_and(|tri| {
                tri.iter()
                    .any(|&v| terrain.vertices().classification(v) == Classification::Land)
            });
        if on_land {
            land += 1;
        }
        debug!(face = %hit.face, point = ?hit.point, on_land, "Probe hit");
    }
    info!(probes = count, land, misses, "Random probes finished");
}

fn probe_path(terrain: &Terrain, points: u32) {
    // A tilted great circle, sampled densely enough that most consecutive
    // points share a face.
    let axis = Vec3::new(0.3, 1.0, 0.2).normalize();
    let start = axis.any_orthonormal_vector();
    let path: Vec<Vec3> = (0..points)
        .map(|i| {
            let angle = i as f32 / points.max(1) as f32 * std::f32::consts::TAU;
            glam::Quat::from_axis_angle(axis, angle) * start
        })
        .collect();

    let hits = terrain.project_path(&path);
    let snapped = hits.iter().filter(|h| h.is_some()).count();
    let highest = hits
        .iter()
        .flatten()
        .map(|h| h.distance)
        .fold(0.0_f32, f32::max);
    info!(points, snapped, highest, "Path projected");
}

fn write_snapshot(terrain: &Terrain, path: &std::path::Path) -> Result<(), DemoError> {
    let snap = terrain.to_snapshot()?;
    snapshot::save(path, &snap)?;
    let restored = Terrain::from_snapshot(snapshot::load(path)?)?;
    info!(
        path = %path.display(),
        vertices = restored.positions().len(),
        faces = restored.face_count(),
        "Snapshot verified"
    );
    Ok(())
}

fn run(config: &Config) -> Result<(), DemoError> {
    let params = terrain_params(&config.terrain);
    let mut rng = seed::terrain_rng(config.terrain.seed);
    let terrain = Terrain::generate(&params, &mut rng)?;

    let stats = terrain.stats();
    info!(
        seed = config.terrain.seed,
        vertices = stats.vertices,
        faces = stats.faces,
        sub_meshes = stats.sub_meshes,
        max_sub_mesh_faces = stats.max_sub_mesh_faces,
        "Terrain ready"
    );

    let vertex_buffer = terrain.vertex_buffer();
    let (indices, ranges) = terrain.index_buffer();
    debug!(
        vertex_bytes = vertex_buffer.len() * std::mem::size_of::<orbis_terrain::TerrainVertex>(),
        indices = indices.len(),
        draw_ranges = ranges.len(),
        "Render buffers laid out"
    );

    probe_poles(&terrain);
    probe_random_points(&terrain, config.terrain.seed, config.probe.probe_count);
    probe_path(&terrain, config.probe.path_points);

    if let Some(path) = &config.probe.snapshot_path {
        write_snapshot(&terrain, path)?;
    }
    Ok(())
}

fn main() -> ExitCode {
    let args = CliArgs::parse();

    // Resolve config directory
    let config_dir = match args.config.clone() {
        Some(dir) => dir,
        None => match Config::default_dir() {
            Ok(dir) => dir,
            Err(e) => {
                eprintln!("Failed to resolve config directory: {e}");
                return ExitCode::FAILURE;
            }
        },
    };

    let mut config = Config::load_or_create(&config_dir).unwrap_or_else(|e| {
        eprintln!("Failed to load config: {e}, using defaults");
        Config::default()
    });
    config.apply_cli_overrides(&args);

    let log_dir = config.log_dir(&config_dir);
    orbis_log::init_logging(Some(&log_dir), cfg!(debug_assertions), Some(&config));

    match run(&config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}
