//! Deterministic fixture engines for loader and query tests
//!
//! [`PlanePolyEngine`] plays the role the helper meshes play in
//! upstream navigation test suites: a flat row of square tiles along
//! +x, one walkable polygon per tile, with predictable nearest-poly,
//! corridor and raycast answers. [`RejectingEngine`] injects load
//! failures.

use crate::binary_format::MeshParams;
use crate::engine::{EngineError, MeshStats, PolyRef, QueryEngine, QueryFilter, RaycastHit};

/// Flat-plane engine. Every added tile contributes one square
/// walkable polygon; polygon `i` (1-based ref) covers
/// `[origin.x + (i-1)*tile_width, origin.x + i*tile_width]` in x and
/// `[origin.z, origin.z + tile_height]` in z, at `surface_height`.
pub struct PlanePolyEngine {
    params: Option<MeshParams>,
    tiles: Vec<(u64, Vec<u8>)>,
    query_nodes: Option<usize>,
    /// Vertical wall blocking rays at this x, if set.
    pub wall_x: Option<f32>,
    /// Height of the walkable surface.
    pub surface_height: f32,
    /// Make corridor searches fail with an engine error.
    pub fail_corridor: bool,
    /// Make corridor searches return no polygons at all.
    pub empty_corridor: bool,
}

impl PlanePolyEngine {
    pub fn new() -> Self {
        Self {
            params: None,
            tiles: Vec::new(),
            query_nodes: None,
            wall_x: None,
            surface_height: 0.0,
            fail_corridor: false,
            empty_corridor: false,
        }
    }

    pub fn query_nodes(&self) -> Option<usize> {
        self.query_nodes
    }

    fn params(&self) -> &MeshParams {
        self.params.as_ref().expect("engine not initialized")
    }

    /// 0-based index of the tile containing `x`, clamped onto the
    /// plane. Only meaningful once at least one tile is resident.
    fn tile_index_of(&self, x: f32) -> usize {
        let p = self.params();
        let rel = ((x - p.origin[0]) / p.tile_width).floor() as isize;
        rel.clamp(0, self.tiles.len() as isize - 1) as usize
    }

    fn clamp_to_tile(&self, index: usize, pos: [f32; 3]) -> [f32; 3] {
        let p = self.params();
        let min_x = p.origin[0] + index as f32 * p.tile_width;
        [
            pos[0].clamp(min_x, min_x + p.tile_width),
            self.surface_height,
            pos[2].clamp(p.origin[2], p.origin[2] + p.tile_height),
        ]
    }

    fn contains(&self, pos: [f32; 3], half_extents: [f32; 3]) -> bool {
        if self.tiles.is_empty() {
            return false;
        }
        let p = self.params();
        let max_x = p.origin[0] + self.tiles.len() as f32 * p.tile_width;
        pos[0] + half_extents[0] >= p.origin[0]
            && pos[0] - half_extents[0] <= max_x
            && pos[2] + half_extents[2] >= p.origin[2]
            && pos[2] - half_extents[2] <= p.origin[2] + p.tile_height
            && (pos[1] - self.surface_height).abs() <= half_extents[1]
    }
}

impl Default for PlanePolyEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl QueryEngine for PlanePolyEngine {
    fn init(&mut self, params: &MeshParams) -> Result<(), EngineError> {
        self.params = Some(params.clone());
        Ok(())
    }

    fn add_tile(&mut self, tile_ref: u64, data: Vec<u8>) -> Result<(), EngineError> {
        self.tiles.push((tile_ref, data));
        Ok(())
    }

    fn bind_query(&mut self, max_nodes: usize) -> Result<(), EngineError> {
        self.query_nodes = Some(max_nodes);
        Ok(())
    }

    fn find_nearest_poly(
        &self,
        center: [f32; 3],
        half_extents: [f32; 3],
        filter: &QueryFilter,
    ) -> Result<Option<(PolyRef, [f32; 3])>, EngineError> {
        if filter.include_flags == 0 || !self.contains(center, half_extents) {
            return Ok(None);
        }
        let index = self.tile_index_of(center[0]);
        Ok(Some((
            PolyRef::new(index as u64 + 1),
            self.clamp_to_tile(index, center),
        )))
    }

    fn find_path(
        &self,
        start_ref: PolyRef,
        end_ref: PolyRef,
        _start_pos: [f32; 3],
        _end_pos: [f32; 3],
        _filter: &QueryFilter,
        max_polys: usize,
    ) -> Result<Vec<PolyRef>, EngineError> {
        if self.fail_corridor {
            return Err(EngineError::new("node pool exhausted"));
        }
        if self.empty_corridor {
            return Ok(Vec::new());
        }
        let (a, b) = (start_ref.id(), end_ref.id());
        let corridor: Vec<PolyRef> = if a <= b {
            (a..=b).map(PolyRef::new).collect()
        } else {
            (b..=a).rev().map(PolyRef::new).collect()
        };
        Ok(corridor.into_iter().take(max_polys).collect())
    }

    fn find_straight_path(
        &self,
        start_pos: [f32; 3],
        end_pos: [f32; 3],
        corridor: &[PolyRef],
        max_points: usize,
    ) -> Result<Vec<[f32; 3]>, EngineError> {
        if corridor.is_empty() {
            return Err(EngineError::new("empty corridor"));
        }
        // A flat single-row plane funnels to its two endpoints.
        Ok(vec![start_pos, end_pos]
            .into_iter()
            .take(max_points)
            .collect())
    }

    fn raycast(
        &self,
        start_ref: PolyRef,
        start_pos: [f32; 3],
        end_pos: [f32; 3],
        _filter: &QueryFilter,
        max_path: usize,
    ) -> Result<RaycastHit, EngineError> {
        if !start_ref.is_valid() {
            return Err(EngineError::new("invalid start reference"));
        }
        let Some(wall_x) = self.wall_x else {
            return Ok(RaycastHit::no_hit());
        };
        let dx = end_pos[0] - start_pos[0];
        if dx.abs() < f32::EPSILON {
            return Ok(RaycastHit::no_hit());
        }
        let t = (wall_x - start_pos[0]) / dx;
        if !(0.0..=1.0).contains(&t) {
            return Ok(RaycastHit::no_hit());
        }

        let from = self.tile_index_of(start_pos[0]);
        let to = self.tile_index_of(start_pos[0] + dx * t);
        let path: Vec<PolyRef> = if from <= to {
            (from..=to).map(|i| PolyRef::new(i as u64 + 1)).collect()
        } else {
            (to..=from)
                .rev()
                .map(|i| PolyRef::new(i as u64 + 1))
                .collect()
        };
        Ok(RaycastHit {
            t,
            hit_normal: [-dx.signum(), 0.0, 0.0],
            path: path.into_iter().take(max_path).collect(),
        })
    }

    fn poly_height(&self, poly: PolyRef, _pos: [f32; 3]) -> Result<Option<f32>, EngineError> {
        if !poly.is_valid() || poly.id() as usize > self.tiles.len() {
            return Ok(None);
        }
        Ok(Some(self.surface_height))
    }

    fn closest_point_on_poly(
        &self,
        poly: PolyRef,
        pos: [f32; 3],
    ) -> Result<[f32; 3], EngineError> {
        if !poly.is_valid() || poly.id() as usize > self.tiles.len() {
            return Err(EngineError::new("unknown polygon"));
        }
        Ok(self.clamp_to_tile(poly.id() as usize - 1, pos))
    }

    fn stats(&self) -> MeshStats {
        let tiles = self.tiles.len() as u32;
        MeshStats {
            tiles,
            bvh_nodes: tiles,
            polys: tiles,
            verts: tiles * 4,
            detail_tris: tiles * 2,
            detail_verts: 0,
            data_bytes: self.tiles.iter().map(|(_, d)| d.len() as u64).sum(),
        }
    }
}

/// Load-failure injection: optionally fails initialization, or
/// rejects the tile submitted at a given index.
pub struct RejectingEngine {
    fail_init: bool,
    reject_tile_at: Option<usize>,
    added: usize,
}

impl RejectingEngine {
    pub fn failing_init() -> Self {
        Self {
            fail_init: true,
            reject_tile_at: None,
            added: 0,
        }
    }

    pub fn rejecting_tile(index: usize) -> Self {
        Self {
            fail_init: false,
            reject_tile_at: Some(index),
            added: 0,
        }
    }
}

impl QueryEngine for RejectingEngine {
    fn init(&mut self, _params: &MeshParams) -> Result<(), EngineError> {
        if self.fail_init {
            return Err(EngineError::new("mesh allocation failed"));
        }
        Ok(())
    }

    fn add_tile(&mut self, _tile_ref: u64, _data: Vec<u8>) -> Result<(), EngineError> {
        if self.reject_tile_at == Some(self.added) {
            return Err(EngineError::new("malformed tile data"));
        }
        self.added += 1;
        Ok(())
    }

    fn bind_query(&mut self, _max_nodes: usize) -> Result<(), EngineError> {
        Ok(())
    }

    fn find_nearest_poly(
        &self,
        _center: [f32; 3],
        _half_extents: [f32; 3],
        _filter: &QueryFilter,
    ) -> Result<Option<(PolyRef, [f32; 3])>, EngineError> {
        Ok(None)
    }

    fn find_path(
        &self,
        _start_ref: PolyRef,
        _end_ref: PolyRef,
        _start_pos: [f32; 3],
        _end_pos: [f32; 3],
        _filter: &QueryFilter,
        _max_polys: usize,
    ) -> Result<Vec<PolyRef>, EngineError> {
        Ok(Vec::new())
    }

    fn find_straight_path(
        &self,
        _start_pos: [f32; 3],
        _end_pos: [f32; 3],
        _corridor: &[PolyRef],
        _max_points: usize,
    ) -> Result<Vec<[f32; 3]>, EngineError> {
        Ok(Vec::new())
    }

    fn raycast(
        &self,
        _start_ref: PolyRef,
        _start_pos: [f32; 3],
        _end_pos: [f32; 3],
        _filter: &QueryFilter,
        _max_path: usize,
    ) -> Result<RaycastHit, EngineError> {
        Ok(RaycastHit::no_hit())
    }

    fn poly_height(&self, _poly: PolyRef, _pos: [f32; 3]) -> Result<Option<f32>, EngineError> {
        Ok(None)
    }

    fn closest_point_on_poly(
        &self,
        _poly: PolyRef,
        pos: [f32; 3],
    ) -> Result<[f32; 3], EngineError> {
        Ok(pos)
    }

    fn stats(&self) -> MeshStats {
        MeshStats::default()
    }
}
