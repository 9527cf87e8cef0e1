//! Tiled navigation mesh ("navmesh set") loading and query orchestration
//!
//! A navmesh set is a single binary container holding the spatial
//! parameters of a tiled navigation mesh plus the baked tile blobs an
//! external pipeline produced. This crate parses and validates the
//! container, hands each tile to a navigation-query engine, and
//! exposes the two operations game servers ask of a loaded mesh:
//! straight-path corridors between two world points and surface
//! raycasts.
//!
//! The geometric work (polygon graphs, spatial indexing, funneling,
//! ray/polygon math) lives behind the [`QueryEngine`] trait. This
//! crate owns the container format, the resource lifetimes around the
//! engine, and the edge-case policy applied to the engine's raw
//! answers.

mod binary_format;
mod engine;
mod error;
mod nav_mesh_set;
mod nav_query;

#[cfg(test)]
mod test_engine;



pub use binary_format::{
    build_set, MeshParams, NavMeshSetHeader, SetReader, TileRecordHeader, NAVMESH_SET_VERSION,
};
pub use engine::{EngineError, MeshStats, PolyRef, QueryEngine, QueryFilter, RaycastHit};
pub use error::{LoadError, QueryError};
pub use nav_mesh_set::NavMeshSet;
pub use nav_query::{
    QueryOptions, RayHit, DEFAULT_QUERY_EXTENT, MAX_SEARCH_NODES, MAX_SEARCH_POLYS,
};

/// Represents a 3D position
pub type Position3D = glam::Vec3;
