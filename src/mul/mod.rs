pub mod mulreader;
pub mod colordata;
pub mod mapdata;

use std::fmt;

use thiserror::Error;


/// Position of a block within the map grid, in block units.
/// H runs left to right, V top to bottom. The map file stores blocks
/// H-major (a whole column of V before the next H), while rendering walks
/// V-major; keeping the axes named avoids transposing them by accident.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct BlockCoord {
    pub h: usize,
    pub v: usize,
}

impl fmt::Display for BlockCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.h, self.v)
    }
}

/// What exactly was wrong with a single block record.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Error)]
pub enum BlockDefect {
    #[error("slice is {len} bytes, a block record is {expected}", expected = mapdata::MAP_BLOCK_SIZE)]
    WrongLength { len: usize },

    #[error("color code {code:#06x} has no table entry")]
    BadColorCode { code: u16 },
}

/// Errors surfaced by the decoding path. None of these occur on well formed
/// files; they signal a corrupted file or wrong grid dimensions, and the
/// decoder never substitutes defaults or returns partial data.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Error)]
pub enum MulError {
    /// a color code or block coordinate outside the span of its buffer
    #[error("index {index} is outside the addressable range 0..{limit}")]
    OutOfRange { index: usize, limit: usize },

    /// a block record that cannot be decoded
    #[error("malformed map block: {0}")]
    MalformedBlock(BlockDefect),

    /// the map buffer ends inside the requested block record
    #[error("map buffer is {buffer_len} bytes, block wants bytes {offset}..{end}")]
    TruncatedBuffer { offset: usize, end: usize, buffer_len: usize },
}


pub use colordata::ColorData;
pub use mapdata::{decode_block, Land, RadarBlock, RadarTile, BLOCK_DIM, MAP_BLOCK_SIZE};
