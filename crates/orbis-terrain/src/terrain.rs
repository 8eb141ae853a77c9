//! The assembled planet surface and its ray queries.

use glam::{Vec2, Vec3};
use orbis_math::{Ray, Triangle, TriangleHit};
use orbis_mesh::{
    Adjacency, BuildError, Classification, DEFAULT_LEAF_DEPTH, FaceId, IcosphereBuilder,
    IcosphereStats, SubMesh, VertexStore,
};
use rand::Rng;
use tracing::{debug, info};

use crate::normals::compute_normals;
use crate::palette::{Palette, Rgba8};
use crate::relief::{self, ReliefParams, ReliefSummary};
use crate::render_view::{self, SubMeshRange, TerrainVertex};
use crate::smoothing::smooth;
use crate::TerrainError;

/// Everything needed to generate a terrain besides the RNG.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TerrainParams {
    pub recursion_level: u32,
    pub leaf_depth: u32,
    pub relief: ReliefParams,
    pub smoothing_passes: u32,
    /// `|y|` above which vertices are coloured as ice.
    pub polar_cap: f32,
}

impl Default for TerrainParams {
    fn default() -> Self {
        Self {
            recursion_level: 4,
            leaf_depth: DEFAULT_LEAF_DEPTH,
            relief: ReliefParams::default(),
            smoothing_passes: 1,
            polar_cap: Palette::default().polar_cap,
        }
    }
}

/// A ray query result.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TerrainHit {
    /// The triangle that was hit.
    pub face: FaceId,
    /// World-space hit point.
    pub point: Vec3,
    /// Distance from the ray origin to `point`.
    pub distance: f32,
    /// Barycentric `(s, t)` of `point` within the triangle.
    pub barycentric: Vec2,
}

impl TerrainHit {
    fn new(face: FaceId, hit: TriangleHit, ray: &Ray) -> Self {
        Self {
            face,
            point: hit.point,
            distance: hit.point.distance(ray.origin),
            barycentric: hit.barycentric,
        }
    }

    pub fn sub_mesh(&self) -> u32 {
        self.face.sub_mesh
    }

    pub fn local_face(&self) -> u32 {
        self.face.local
    }
}

/// Owns the vertex arena, adjacency, and sub-meshes of a planet surface.
///
/// All queries take `&self`; the only mutation after construction is
/// [`Terrain::regenerate_relief`].
#[derive(Clone, Debug)]
pub struct Terrain {
    vertices: VertexStore,
    adjacency: Adjacency,
    sub_meshes: Vec<SubMesh>,
    colors: Vec<Rgba8>,
    palette: Palette,
    recursion_level: u32,
    relief: Option<ReliefSummary>,
}

impl Terrain {
    /// A bare unit icosphere with no relief (all water).
    pub fn build(recursion_level: u32) -> Result<Self, TerrainError> {
        let (vertices, adjacency, sub_meshes) = IcosphereBuilder::new(recursion_level)
            .build()?
            .into_parts();
        let mut terrain = Self::from_parts(
            vertices,
            adjacency,
            sub_meshes,
            Palette::default(),
            recursion_level,
        );
        terrain.finish()?;
        Ok(terrain)
    }

    /// Build the mesh, raise relief, smooth it, then bound and shade it.
    pub fn generate<R: Rng>(params: &TerrainParams, rng: &mut R) -> Result<Self, TerrainError> {
        let icosphere = IcosphereBuilder::new(params.recursion_level)
            .with_leaf_depth(params.leaf_depth)
            .build()?;
        let stats = icosphere.stats();
        debug!(?stats, "Icosphere built");

        let (vertices, adjacency, sub_meshes) = icosphere.into_parts();
        let palette = Palette {
            polar_cap: params.polar_cap,
            land_height: params.relief.land_height,
        };
        let mut terrain = Self::from_parts(
            vertices,
            adjacency,
            sub_meshes,
            palette,
            params.recursion_level,
        );
        let summary = terrain.apply_relief(&params.relief, params.smoothing_passes, rng)?;

        info!(
            level = stats.recursion_level,
            vertices = stats.vertices,
            faces = stats.faces,
            sub_meshes = stats.sub_meshes,
            land_fraction = summary.land_fraction(),
            "Terrain generated"
        );
        Ok(terrain)
    }

    pub(crate) fn from_parts(
        vertices: VertexStore,
        adjacency: Adjacency,
        sub_meshes: Vec<SubMesh>,
        palette: Palette,
        recursion_level: u32,
    ) -> Self {
        Self {
            vertices,
            adjacency,
            sub_meshes,
            colors: Vec::new(),
            palette,
            recursion_level,
            relief: None,
        }
    }

    /// Re-run relief over the existing topology.
    ///
    /// Bounds, normals, and colours are rebuilt afterwards. Requires exclusive
    /// access, so no query can observe a half-updated surface.
    pub fn regenerate_relief<R: Rng>(
        &mut self,
        params: &ReliefParams,
        smoothing_passes: u32,
        rng: &mut R,
    ) -> Result<ReliefSummary, TerrainError> {
        self.palette.land_height = params.land_height;
        let summary = self.apply_relief(params, smoothing_passes, rng)?;
        info!(
            land_fraction = summary.land_fraction(),
            "Relief regenerated"
        );
        Ok(summary)
    }

    fn apply_relief<R: Rng>(
        &mut self,
        params: &ReliefParams,
        smoothing_passes: u32,
        rng: &mut R,
    ) -> Result<ReliefSummary, TerrainError> {
        let summary = relief::generate(&mut self.vertices, params, rng)?;
        smooth(&mut self.vertices, &self.adjacency, smoothing_passes);
        self.relief = Some(summary);
        self.finish()?;
        Ok(summary)
    }

    /// Bounds, normals, colours: everything derived from final positions.
    pub(crate) fn finish(&mut self) -> Result<(), BuildError> {
        for sub in &mut self.sub_meshes {
            sub.refresh_bounds(&self.vertices)?;
        }
        compute_normals(&self.sub_meshes, &mut self.vertices, &self.adjacency)?;
        self.colors = self.palette.colors(&self.vertices);
        Ok(())
    }

    pub fn recursion_level(&self) -> u32 {
        self.recursion_level
    }

    pub fn vertices(&self) -> &VertexStore {
        &self.vertices
    }

    pub fn positions(&self) -> &[Vec3] {
        self.vertices.positions()
    }

    pub fn normals(&self) -> &[Vec3] {
        self.vertices.normals()
    }

    pub fn classifications(&self) -> &[Classification] {
        self.vertices.classifications()
    }

    pub fn colors(&self) -> &[Rgba8] {
        &self.colors
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    pub fn adjacency(&self) -> &Adjacency {
        &self.adjacency
    }

    pub fn sub_meshes(&self) -> &[SubMesh] {
        &self.sub_meshes
    }

    pub fn sub_mesh(&self, id: u32) -> Option<&SubMesh> {
        self.sub_meshes.get(id as usize)
    }

    /// Summary of the last relief pass, if any.
    pub fn relief_summary(&self) -> Option<&ReliefSummary> {
        self.relief.as_ref()
    }

    pub fn face_count(&self) -> usize {
        self.sub_meshes.iter().map(SubMesh::len).sum()
    }

    pub fn stats(&self) -> IcosphereStats {
        IcosphereStats {
            recursion_level: self.recursion_level,
            vertices: self.vertices.len(),
            faces: self.face_count(),
            sub_meshes: self.sub_meshes.len(),
            max_sub_mesh_faces: self.sub_meshes.iter().map(SubMesh::len).max().unwrap_or(0),
        }
    }

    /// World-space geometry of a face, `None` if the id is out of range.
    pub fn triangle(&self, face: FaceId) -> Option<Triangle> {
        self.sub_mesh(face.sub_mesh)?
            .geometry(face.local, &self.vertices)
    }

    pub fn vertex_buffer(&self) -> Vec<TerrainVertex> {
        render_view::vertex_buffer(&self.vertices, &self.colors)
    }

    pub fn index_buffer(&self) -> (Vec<u32>, Vec<SubMeshRange>) {
        render_view::index_buffer(&self.sub_meshes)
    }

    /// First surface hit along a half-line.
    ///
    /// Sub-meshes whose bounds pass the ray are tried nearest-centre-first
    /// (distance from the bounding-sphere centre to `origin`); the first one
    /// containing any hit answers with its nearest hit. Missing the surface
    /// is an ordinary `None`.
    pub fn ray_intersection(&self, origin: Vec3, direction: Vec3) -> Option<TerrainHit> {
        self.cast(&Ray::new(origin, direction))
    }

    /// Like [`Terrain::ray_intersection`], but tries `guess` alone first.
    ///
    /// Consecutive queries along a path usually land on the same or a nearby
    /// face; a hit on the guess skips the sub-mesh search entirely.
    pub fn ray_intersection_with_guess(
        &self,
        origin: Vec3,
        direction: Vec3,
        guess: FaceId,
    ) -> Option<TerrainHit> {
        self.cast_with_guess(&Ray::new(origin, direction), guess)
    }

    /// Face under a point, found by casting from the planet centre through it.
    pub fn find_face_for_point(&self, point: Vec3) -> Option<TerrainHit> {
        self.cast(&Ray::from_center_through(point)?)
    }

    pub fn find_face_for_point_with_guess(&self, point: Vec3, guess: FaceId) -> Option<TerrainHit> {
        self.cast_with_guess(&Ray::from_center_through(point)?, guess)
    }

    /// Snap a sequence of points onto the surface, seeding each lookup with
    /// the previous point's face.
    pub fn project_path(&self, points: &[Vec3]) -> Vec<Option<TerrainHit>> {
        let mut guess = None;
        points
            .iter()
            .map(|&p| {
                let hit = match guess {
                    Some(face) => self.find_face_for_point_with_guess(p, face),
                    None => self.find_face_for_point(p),
                };
                if let Some(h) = &hit {
                    guess = Some(h.face);
                }
                hit
            })
            .collect()
    }

    fn cast_with_guess(&self, ray: &Ray, guess: FaceId) -> Option<TerrainHit> {
        let guessed = self
            .triangle(guess)
            .and_then(|tri| tri.intersect(ray))
            .map(|hit| TerrainHit::new(guess, hit, ray));
        guessed.or_else(|| self.cast(ray))
    }

    fn cast(&self, ray: &Ray) -> Option<TerrainHit> {
        let mut candidates: Vec<(f32, &SubMesh)> = self
            .sub_meshes
            .iter()
            .filter(|sub| sub.bounds().ray_intersects(ray))
            .map(|sub| (sub.bounds().center().distance_squared(ray.origin), sub))
            .collect();
        candidates.sort_by(|a, b| a.0.total_cmp(&b.0));

        candidates
            .into_iter()
            .find_map(|(_, sub)| self.cast_sub_mesh(sub, ray))
    }

    /// Nearest hit inside one sub-mesh. Scanning the whole leaf rather than
    /// stopping at the first triangle hit keeps rays from outside the planet
    /// on the near surface when a leaf is crossed twice.
    fn cast_sub_mesh(&self, sub: &SubMesh, ray: &Ray) -> Option<TerrainHit> {
        sub.face_ids()
            .filter_map(|face| {
                let hit = sub.geometry(face.local, &self.vertices)?.intersect(ray)?;
                Some((face, hit))
            })
            .min_by(|a, b| a.1.t.total_cmp(&b.1.t))
            .map(|(face, hit)| TerrainHit::new(face, hit, ray))
    }
}
