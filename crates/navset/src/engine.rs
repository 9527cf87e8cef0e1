//! The navigation-query engine boundary
//!
//! The loader and the query orchestration never touch polygon data
//! directly; everything geometric goes through [`QueryEngine`]. An
//! engine value owns whatever mesh and query-context storage it
//! allocates and releases it when dropped, so abandoning a
//! half-constructed load frees every engine resource exactly once.

use crate::binary_format::MeshParams;

/// Reference to a polygon (or tile) inside the engine's mesh. Zero
/// is the null reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct PolyRef(u64);

impl PolyRef {
    pub const NULL: PolyRef = PolyRef(0);

    pub fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn id(&self) -> u64 {
        self.0
    }

    pub fn is_valid(&self) -> bool {
        self.0 != 0
    }
}

/// Include/exclude bitmask controlling which polygon area types
/// participate in a search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueryFilter {
    pub include_flags: u16,
    pub exclude_flags: u16,
}

impl Default for QueryFilter {
    fn default() -> Self {
        Self {
            include_flags: 0xffff,
            exclude_flags: 0,
        }
    }
}

/// Raw raycast answer from the engine.
#[derive(Debug, Clone)]
pub struct RaycastHit {
    /// Hit parameter along the segment. A value greater than 1.0
    /// (the engine reports `f32::MAX`) means nothing was struck
    /// within the segment.
    pub t: f32,

    /// Normal of the wall that was struck.
    pub hit_normal: [f32; 3],

    /// Polygons the ray traversed, in visit order.
    pub path: Vec<PolyRef>,
}

impl RaycastHit {
    /// A cast that reached its end without striking a wall.
    pub fn no_hit() -> Self {
        Self {
            t: f32::MAX,
            hit_normal: [0.0; 3],
            path: Vec::new(),
        }
    }

    pub fn hit_wall(&self) -> bool {
        self.t <= 1.0
    }
}

/// Opaque failure reported by the engine.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("{0}")]
pub struct EngineError(pub String);

impl EngineError {
    pub fn new(msg: impl Into<String>) -> Self {
        Self(msg.into())
    }
}

/// Aggregate statistics over every resident tile. Diagnostics only,
/// not part of the query contract.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MeshStats {
    pub tiles: u32,
    pub bvh_nodes: u32,
    pub polys: u32,
    pub verts: u32,
    pub detail_tris: u32,
    pub detail_verts: u32,
    pub data_bytes: u64,
}

/// Primitives the external navigation-query engine must provide.
///
/// Tile payloads passed to [`add_tile`](QueryEngine::add_tile) move
/// into the engine, which is responsible for their eventual release.
pub trait QueryEngine {
    /// Initializes the mesh with the container's spatial parameters.
    fn init(&mut self, params: &MeshParams) -> Result<(), EngineError>;

    /// Adds one baked tile, taking ownership of its payload.
    fn add_tile(&mut self, tile_ref: u64, data: Vec<u8>) -> Result<(), EngineError>;

    /// Allocates the query context with a fixed search-node budget.
    fn bind_query(&mut self, max_nodes: usize) -> Result<(), EngineError>;

    /// Finds the polygon nearest to `center` within the half-extent
    /// box, returning the ref and the nearest point on it, or `None`
    /// when no polygon intersects the box.
    fn find_nearest_poly(
        &self,
        center: [f32; 3],
        half_extents: [f32; 3],
        filter: &QueryFilter,
    ) -> Result<Option<(PolyRef, [f32; 3])>, EngineError>;

    /// Finds a polygon corridor between two polygons, at most
    /// `max_polys` long.
    fn find_path(
        &self,
        start_ref: PolyRef,
        end_ref: PolyRef,
        start_pos: [f32; 3],
        end_pos: [f32; 3],
        filter: &QueryFilter,
        max_polys: usize,
    ) -> Result<Vec<PolyRef>, EngineError>;

    /// Funnels a corridor into straight waypoints, at most
    /// `max_points` of them.
    fn find_straight_path(
        &self,
        start_pos: [f32; 3],
        end_pos: [f32; 3],
        corridor: &[PolyRef],
        max_points: usize,
    ) -> Result<Vec<[f32; 3]>, EngineError>;

    /// Casts a ray from `start_pos` toward `end_pos` along the mesh
    /// surface, walking at most `max_path` polygons.
    fn raycast(
        &self,
        start_ref: PolyRef,
        start_pos: [f32; 3],
        end_pos: [f32; 3],
        filter: &QueryFilter,
        max_path: usize,
    ) -> Result<RaycastHit, EngineError>;

    /// Height of the mesh surface at `pos` projected onto `poly`.
    fn poly_height(&self, poly: PolyRef, pos: [f32; 3]) -> Result<Option<f32>, EngineError>;

    /// Closest point on `poly` to `pos`.
    fn closest_point_on_poly(
        &self,
        poly: PolyRef,
        pos: [f32; 3],
    ) -> Result<[f32; 3], EngineError>;

    /// Aggregate statistics over resident tiles.
    fn stats(&self) -> MeshStats;
}
