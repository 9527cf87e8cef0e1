//! Query orchestration: straight paths and surface raycasts
//!
//! Sequences the engine's primitives in the right order and applies
//! the edge-case policy around their raw answers: nearest-polygon
//! snapping for off-mesh query points, end-point adjustment when a
//! corridor stops short, the `t > 1` no-hit convention, and
//! ground-snapping of ray hits.

use crate::engine::{PolyRef, QueryEngine, QueryFilter};
use crate::error::QueryError;
use crate::nav_mesh_set::NavMeshSet;
use crate::Position3D;

/// Cap on polygons considered per corridor or ray walk.
pub const MAX_SEARCH_POLYS: usize = 256;

/// Search-node budget the engine query context is allocated with.
pub const MAX_SEARCH_NODES: usize = 1024;

/// Default half-extents of the nearest-polygon search box. Taller
/// than it is wide to tolerate standing-height offsets between an
/// agent position and the mesh surface.
pub const DEFAULT_QUERY_EXTENT: [f32; 3] = [2.0, 4.0, 2.0];

/// Per-query parameters. The defaults match every production caller;
/// tests vary them.
#[derive(Debug, Clone, Copy)]
pub struct QueryOptions {
    pub filter: QueryFilter,
    pub half_extents: [f32; 3],
}

impl Default for QueryOptions {
    fn default() -> Self {
        Self {
            filter: QueryFilter::default(),
            half_extents: DEFAULT_QUERY_EXTENT,
        }
    }
}

/// Outcome of a surface raycast.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RayHit {
    /// The segment is unobstructed within the mesh.
    Clear,
    /// A wall was struck at the contained position.
    Blocked(Position3D),
}

impl RayHit {
    pub fn is_clear(&self) -> bool {
        matches!(self, RayHit::Clear)
    }

    /// The hit position, if anything was struck.
    pub fn position(&self) -> Option<Position3D> {
        match self {
            RayHit::Clear => None,
            RayHit::Blocked(pos) => Some(*pos),
        }
    }
}

impl<E: QueryEngine> NavMeshSet<E> {
    /// Finds the straight-line waypoint path between two world
    /// points, using the default filter and search extents.
    ///
    /// An empty path means both points are on the mesh but no
    /// corridor connects them within the search caps.
    pub fn find_straight_path(
        &self,
        start: Position3D,
        end: Position3D,
    ) -> Result<Vec<Position3D>, QueryError> {
        self.find_straight_path_with(start, end, &QueryOptions::default())
    }

    /// [`find_straight_path`](Self::find_straight_path) with explicit
    /// filter and extents.
    pub fn find_straight_path_with(
        &self,
        start: Position3D,
        end: Position3D,
        options: &QueryOptions,
    ) -> Result<Vec<Position3D>, QueryError> {
        let engine = self.engine();

        let (start_ref, start_pt) = nearest_poly(engine, start, options)?;
        let (end_ref, end_pt) = nearest_poly(engine, end, options)?;

        let corridor = match engine.find_path(
            start_ref,
            end_ref,
            start_pt,
            end_pt,
            &options.filter,
            MAX_SEARCH_POLYS,
        ) {
            Ok(corridor) => corridor,
            Err(err) => {
                log::warn!("corridor search failed: {err}");
                return Ok(Vec::new());
            }
        };
        let Some(&last) = corridor.last() else {
            return Ok(Vec::new());
        };

        // The corridor may stop short of the polygon containing the
        // end point (search cap, disconnected region). Funnel toward
        // the closest point on the corridor's actual final polygon in
        // that case, never the raw end point.
        let target = if last != end_ref {
            match engine.closest_point_on_poly(last, end_pt) {
                Ok(pt) => pt,
                Err(err) => {
                    log::warn!("end-point snap failed: {err}");
                    end_pt
                }
            }
        } else {
            end_pt
        };

        let waypoints =
            match engine.find_straight_path(start_pt, target, &corridor, MAX_SEARCH_POLYS) {
                Ok(waypoints) => waypoints,
                Err(err) => {
                    log::warn!("straight-path funnel failed: {err}");
                    return Ok(Vec::new());
                }
            };

        Ok(waypoints.into_iter().map(Position3D::from).collect())
    }

    /// Casts a ray along the mesh surface from `start` toward `end`.
    ///
    /// [`RayHit::Clear`] is the common unobstructed case. It is
    /// distinct from [`QueryError::NoNearestPoly`], which means
    /// `start` is not on the mesh at all.
    pub fn raycast(&self, start: Position3D, end: Position3D) -> Result<RayHit, QueryError> {
        self.raycast_with(start, end, &QueryOptions::default())
    }

    /// [`raycast`](Self::raycast) with explicit filter and extents.
    pub fn raycast_with(
        &self,
        start: Position3D,
        end: Position3D,
        options: &QueryOptions,
    ) -> Result<RayHit, QueryError> {
        let engine = self.engine();
        let (start_ref, _) = nearest_poly(engine, start, options)?;

        let hit = match engine.raycast(
            start_ref,
            start.into(),
            end.into(),
            &options.filter,
            MAX_SEARCH_POLYS,
        ) {
            Ok(hit) => hit,
            Err(err) => {
                log::warn!("raycast failed: {err}");
                return Ok(RayHit::Clear);
            }
        };

        // t beyond the segment end means nothing was struck within
        // it; this is the common clear-line case, not an error.
        if !hit.hit_wall() {
            return Ok(RayHit::Clear);
        }

        let mut point = start + (end - start) * hit.t;
        if let Some(&last) = hit.path.last() {
            // The interpolated height is unreliable on sloped or
            // overlapping geometry; resample it from the last polygon
            // the ray walked. Keep the interpolated value when the
            // engine has no height answer there.
            if let Ok(Some(height)) = engine.poly_height(last, point.into()) {
                point.y = height;
            }
        }

        Ok(RayHit::Blocked(point))
    }
}

fn nearest_poly<E: QueryEngine>(
    engine: &E,
    center: Position3D,
    options: &QueryOptions,
) -> Result<(PolyRef, [f32; 3]), QueryError> {
    engine
        .find_nearest_poly(center.into(), options.half_extents, &options.filter)
        .map_err(QueryError::Engine)?
        .ok_or(QueryError::NoNearestPoly)
}
