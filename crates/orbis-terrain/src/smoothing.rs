//! Neighbour-averaging passes over land elevation.

use orbis_mesh::{Adjacency, Classification, VertexId, VertexStore};
use rayon::prelude::*;

use crate::relief::MIN_LAND_ELEVATION;

/// Run `passes` rounds of radius smoothing.
///
/// Each land vertex takes the mean radius of itself and its neighbours,
/// floored just above sea level so no vertex changes class. Water vertices
/// are left untouched. Every pass reads the radii of the previous pass only.
pub fn smooth(vertices: &mut VertexStore, adjacency: &Adjacency, passes: u32) {
    for _ in 0..passes {
        let radii: Vec<f32> = vertices.positions().par_iter().map(|p| p.length()).collect();
        let (positions, classes) = vertices.surface_mut();
        positions
            .par_iter_mut()
            .zip(classes.par_iter())
            .enumerate()
            .filter(|(_, (_, class))| **class == Classification::Land)
            .for_each(|(i, (position, _))| {
                let neighbors = adjacency.neighbors_of(VertexId(i as u32));
                let sum: f32 = radii[i] + neighbors.iter().map(|n| radii[n.index()]).sum::<f32>();
                let mean = sum / (neighbors.len() + 1) as f32;
                let radius = mean.max(1.0 + MIN_LAND_ELEVATION);
                *position = position.normalize_or_zero() * radius;
            });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::relief::{ReliefParams, generate};
    use crate::seed::terrain_rng;
    use orbis_mesh::Icosphere;

    fn relief_sphere() -> (VertexStore, Adjacency) {
        let (mut store, adjacency, _) = Icosphere::build(3).unwrap().into_parts();
        generate(&mut store, &ReliefParams::default(), &mut terrain_rng(21)).unwrap();
        (store, adjacency)
    }

    fn highest_land(store: &VertexStore) -> f32 {
        store
            .positions()
            .iter()
            .zip(store.classifications())
            .filter(|(_, c)| **c == Classification::Land)
            .map(|(p, _)| p.length())
            .fold(f32::MIN, f32::max)
    }

    #[test]
    fn test_zero_passes_is_noop() {
        let (mut store, adjacency) = relief_sphere();
        let before = store.clone();
        smooth(&mut store, &adjacency, 0);
        assert_eq!(before, store);
    }

    #[test]
    fn test_smoothing_preserves_classes_and_sea_level() {
        let (mut store, adjacency) = relief_sphere();
        let classes = store.classifications().to_vec();
        smooth(&mut store, &adjacency, 3);
        assert_eq!(store.classifications(), classes.as_slice());
        for (p, class) in store.positions().iter().zip(store.classifications()) {
            match class {
                Classification::Water => assert!((p.length() - 1.0).abs() < 1e-5),
                Classification::Land => assert!(p.length() > 1.0),
            }
        }
    }

    #[test]
    fn test_smoothing_never_raises_peaks() {
        let (mut store, adjacency) = relief_sphere();
        let before = highest_land(&store);
        smooth(&mut store, &adjacency, 2);
        assert!(highest_land(&store) <= before + 1e-6);
    }
}
