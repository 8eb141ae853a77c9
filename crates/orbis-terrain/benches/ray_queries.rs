use criterion::{Criterion, black_box, criterion_group, criterion_main};
use glam::Vec3;
use orbis_terrain::{Terrain, TerrainParams, seed::terrain_rng};

fn bench_terrain() -> Terrain {
    let params = TerrainParams {
        recursion_level: 4,
        ..Default::default()
    };
    Terrain::generate(&params, &mut terrain_rng(42)).unwrap()
}

fn bench_ray_intersection(c: &mut Criterion) {
    let terrain = bench_terrain();
    let direction = black_box(Vec3::new(0.3, 0.8, 0.2));
    c.bench_function("terrain_ray_intersection", |b| {
        b.iter(|| black_box(terrain.ray_intersection(Vec3::ZERO, direction)))
    });
}

fn bench_ray_intersection_with_guess(c: &mut Criterion) {
    let terrain = bench_terrain();
    let direction = black_box(Vec3::new(0.3, 0.8, 0.2));
    let guess = terrain
        .ray_intersection(Vec3::ZERO, direction)
        .unwrap()
        .face;
    c.bench_function("terrain_ray_intersection_with_guess", |b| {
        b.iter(|| black_box(terrain.ray_intersection_with_guess(Vec3::ZERO, direction, guess)))
    });
}

fn bench_project_path(c: &mut Criterion) {
    let terrain = bench_terrain();
    let path: Vec<Vec3> = (0..256)
        .map(|i| {
            let a = i as f32 * 0.01;
            Vec3::new(a.cos(), 0.4, a.sin())
        })
        .collect();
    c.bench_function("terrain_project_path_256", |b| {
        b.iter(|| black_box(terrain.project_path(&path)))
    });
}

criterion_group!(
    benches,
    bench_ray_intersection,
    bench_ray_intersection_with_guess,
    bench_project_path
);
criterion_main!(benches);
