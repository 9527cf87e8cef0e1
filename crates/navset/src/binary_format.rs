//! Binary container format for navmesh sets
//!
//! A set file is a [`NavMeshSetHeader`] followed by `tile_count`
//! repetitions of `{TileRecordHeader}{payload bytes}`. All fields are
//! little-endian and packed; there is no checksum and no total-size
//! field beyond each tile's own `data_size`, so readers must validate
//! every record against the buffer length themselves.

use std::io::Write;

use byteorder::{ByteOrder, LittleEndian, WriteBytesExt};

use crate::error::LoadError;

/// The single supported container format version
pub const NAVMESH_SET_VERSION: i32 = 1;

/// Bounds-checked cursor over a raw set buffer.
///
/// Every read checks the remaining length first and fails with
/// [`LoadError::Truncated`] instead of touching bytes past the end,
/// so a corrupt `tile_count` or `data_size` can never cause an
/// out-of-bounds access. A failed read does not advance the cursor.
pub struct SetReader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> SetReader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// Bytes not yet consumed.
    pub fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    /// Cumulative bytes consumed so far.
    pub fn position(&self) -> usize {
        self.pos
    }

    fn take(&mut self, len: usize) -> Result<&'a [u8], LoadError> {
        if self.remaining() < len {
            return Err(LoadError::Truncated);
        }
        let slice = &self.data[self.pos..self.pos + len];
        self.pos += len;
        Ok(slice)
    }

    pub fn read_i32(&mut self) -> Result<i32, LoadError> {
        Ok(LittleEndian::read_i32(self.take(4)?))
    }

    pub fn read_u64(&mut self) -> Result<u64, LoadError> {
        Ok(LittleEndian::read_u64(self.take(8)?))
    }

    pub fn read_f32(&mut self) -> Result<f32, LoadError> {
        Ok(LittleEndian::read_f32(self.take(4)?))
    }

    pub fn read_f32x3(&mut self) -> Result<[f32; 3], LoadError> {
        Ok([self.read_f32()?, self.read_f32()?, self.read_f32()?])
    }

    /// Reads `len` raw payload bytes.
    pub fn read_bytes(&mut self, len: usize) -> Result<&'a [u8], LoadError> {
        self.take(len)
    }
}

/// Spatial parameters the engine needs to initialize a tiled mesh.
/// Opaque to the loader beyond serialization.
#[derive(Debug, Clone, PartialEq)]
pub struct MeshParams {
    pub origin: [f32; 3],
    pub tile_width: f32,
    pub tile_height: f32,
    pub max_tiles: i32,
    pub max_polys_per_tile: i32,
}

impl MeshParams {
    pub(crate) fn read_from(reader: &mut SetReader<'_>) -> Result<Self, LoadError> {
        Ok(Self {
            origin: reader.read_f32x3()?,
            tile_width: reader.read_f32()?,
            tile_height: reader.read_f32()?,
            max_tiles: reader.read_i32()?,
            max_polys_per_tile: reader.read_i32()?,
        })
    }

    pub(crate) fn write_to<W: Write>(&self, writer: &mut W) -> Result<(), LoadError> {
        for &v in &self.origin {
            writer.write_f32::<LittleEndian>(v)?;
        }
        writer.write_f32::<LittleEndian>(self.tile_width)?;
        writer.write_f32::<LittleEndian>(self.tile_height)?;
        writer.write_i32::<LittleEndian>(self.max_tiles)?;
        writer.write_i32::<LittleEndian>(self.max_polys_per_tile)?;
        Ok(())
    }
}

/// Container header: format version, number of tile records that
/// follow, and the mesh-wide spatial parameters.
#[derive(Debug, Clone)]
pub struct NavMeshSetHeader {
    pub version: i32,
    pub tile_count: i32,
    pub params: MeshParams,
}

impl NavMeshSetHeader {
    pub fn read_from(reader: &mut SetReader<'_>) -> Result<Self, LoadError> {
        Ok(Self {
            version: reader.read_i32()?,
            tile_count: reader.read_i32()?,
            params: MeshParams::read_from(reader)?,
        })
    }

    pub fn write_to<W: Write>(&self, writer: &mut W) -> Result<(), LoadError> {
        writer.write_i32::<LittleEndian>(self.version)?;
        writer.write_i32::<LittleEndian>(self.tile_count)?;
        self.params.write_to(writer)
    }
}

/// Per-tile record header preceding the tile's payload bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileRecordHeader {
    /// Engine-assigned tile reference; zero is invalid.
    pub tile_ref: u64,
    /// Payload length in bytes; must be positive.
    pub data_size: i32,
}

impl TileRecordHeader {
    pub fn read_from(reader: &mut SetReader<'_>) -> Result<Self, LoadError> {
        Ok(Self {
            tile_ref: reader.read_u64()?,
            data_size: reader.read_i32()?,
        })
    }

    pub fn write_to<W: Write>(&self, writer: &mut W) -> Result<(), LoadError> {
        writer.write_u64::<LittleEndian>(self.tile_ref)?;
        writer.write_i32::<LittleEndian>(self.data_size)?;
        Ok(())
    }

    pub fn is_valid(&self) -> bool {
        self.tile_ref != 0 && self.data_size > 0
    }
}

/// Assembles a set container from mesh parameters and
/// `(tile_ref, payload)` pairs. Counterpart of the loader, used by
/// the baking side and by round-trip tests.
pub fn build_set(params: &MeshParams, tiles: &[(u64, Vec<u8>)]) -> Result<Vec<u8>, LoadError> {
    let mut buffer = Vec::new();
    let header = NavMeshSetHeader {
        version: NAVMESH_SET_VERSION,
        tile_count: tiles.len() as i32,
        params: params.clone(),
    };
    header.write_to(&mut buffer)?;

    for (tile_ref, data) in tiles {
        let record = TileRecordHeader {
            tile_ref: *tile_ref,
            data_size: data.len() as i32,
        };
        record.write_to(&mut buffer)?;
        buffer.extend_from_slice(data);
    }

    Ok(buffer)
}
