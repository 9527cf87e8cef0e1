//! Error types for container loading and mesh queries

use crate::engine::EngineError;

/// Fatal errors for a single load attempt. Any of these aborts
/// construction; the partially built engine state is dropped and no
/// usable mesh remains.
#[derive(thiserror::Error, Debug)]
pub enum LoadError {
    /// Fewer bytes remained than a header, record or payload needed.
    #[error("container truncated")]
    Truncated,

    /// The container was written with a format this loader does not
    /// understand.
    #[error("unsupported container version {found}")]
    UnsupportedVersion { found: i32 },

    /// The engine could not allocate the mesh or its query context.
    #[error("engine initialization failed: {0}")]
    EngineInit(EngineError),

    /// A tile record carried a zero reference or a non-positive
    /// payload size.
    #[error("invalid tile record at index {index}")]
    InvalidTileRecord { index: i32 },

    /// The engine refused a tile payload.
    #[error("engine rejected tile {tile_ref:#x}: {source}")]
    TileRejected { tile_ref: u64, source: EngineError },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Query-time errors. Non-fatal: the loaded set stays usable for
/// further queries.
#[derive(thiserror::Error, Debug)]
pub enum QueryError {
    /// No polygon was found within the search extents around a query
    /// point.
    #[error("no polygon within search extents")]
    NoNearestPoly,

    /// The engine failed while resolving a query point.
    #[error("engine query failed: {0}")]
    Engine(EngineError),
}
