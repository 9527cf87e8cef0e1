//! Loading a navmesh set container into a live engine mesh

use std::path::Path;

use crate::binary_format::{
    MeshParams, NavMeshSetHeader, SetReader, TileRecordHeader, NAVMESH_SET_VERSION,
};
use crate::engine::{MeshStats, QueryEngine};
use crate::error::LoadError;
use crate::nav_query::MAX_SEARCH_NODES;

/// A loaded navmesh set: the engine-resident mesh plus its bound
/// query context.
///
/// Construction is all-or-nothing. If any header, tile record or
/// engine call fails, the engine value is dropped along with whatever
/// it had allocated, and no usable mesh remains. After construction
/// the set is read-only; concurrent queries are safe exactly when the
/// engine guarantees read-only query reentrancy.
pub struct NavMeshSet<E: QueryEngine> {
    engine: E,
    params: MeshParams,
    stats: MeshStats,
}

impl<E: QueryEngine> NavMeshSet<E> {
    /// Reads a set file and loads it into `engine`.
    pub fn from_file(path: impl AsRef<Path>, engine: E) -> Result<Self, LoadError> {
        let data = std::fs::read(path)?;
        Self::from_bytes(&data, engine)
    }

    /// Parses the container in `data` and builds the engine-resident
    /// mesh from it.
    pub fn from_bytes(data: &[u8], mut engine: E) -> Result<Self, LoadError> {
        let mut reader = SetReader::new(data);

        let header = NavMeshSetHeader::read_from(&mut reader)?;
        if header.version != NAVMESH_SET_VERSION {
            return Err(LoadError::UnsupportedVersion {
                found: header.version,
            });
        }
        if header.tile_count < 0 {
            log::warn!(
                "set header claims {} tiles, loading none",
                header.tile_count
            );
        }

        engine.init(&header.params).map_err(LoadError::EngineInit)?;

        for index in 0..header.tile_count {
            let record = TileRecordHeader::read_from(&mut reader)?;
            if !record.is_valid() {
                return Err(LoadError::InvalidTileRecord { index });
            }

            // Payload ownership moves into the engine; the engine
            // frees the bytes when the tile (or the whole mesh) goes
            // away.
            let payload = reader.read_bytes(record.data_size as usize)?.to_vec();
            engine
                .add_tile(record.tile_ref, payload)
                .map_err(|source| LoadError::TileRejected {
                    tile_ref: record.tile_ref,
                    source,
                })?;
        }

        engine
            .bind_query(MAX_SEARCH_NODES)
            .map_err(LoadError::EngineInit)?;

        let stats = engine.stats();
        log::info!(
            "navmesh set loaded: {} tiles, {} polygons ({} vertices), {} bytes of tile data",
            stats.tiles,
            stats.polys,
            stats.verts,
            stats.data_bytes,
        );
        log::debug!(
            "bvh nodes: {}, detail triangles: {} ({} vertices)",
            stats.bvh_nodes,
            stats.detail_tris,
            stats.detail_verts,
        );

        Ok(Self {
            engine,
            params: header.params,
            stats,
        })
    }

    /// Spatial parameters the mesh was initialized with.
    pub fn params(&self) -> &MeshParams {
        &self.params
    }

    /// Aggregate tile statistics collected at load time.
    pub fn stats(&self) -> &MeshStats {
        &self.stats
    }

    pub(crate) fn engine(&self) -> &E {
        &self.engine
    }
}
