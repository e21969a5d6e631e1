use std::mem;

use crate::mul::colordata::ColorData;
use crate::mul::mulreader::{mul_i8, mul_u16};
use crate::mul::{BlockCoord, BlockDefect, MulError};


/*
    map mul raw structures, as laid out on disk
 */
#[repr(C, packed)]
#[derive(Debug, Copy, Clone)]
struct MulMapTile {
    radar_color: u16,
    z: i8,
}

#[repr(C, packed)]
#[derive(Debug, Copy, Clone)]
struct MulMapBlock {
    header: u32,    // opaque, skipped while decoding
    cells: [[MulMapTile; 8]; 8],
}

/// Size of one block record: a 4 byte header plus 64 three byte cells.
pub const MAP_BLOCK_SIZE: usize = mem::size_of::<MulMapBlock>();

/// Blocks cover 8x8 map tiles.
pub const BLOCK_DIM: usize = 8;

const MAP_BLOCK_HEADER: usize = mem::size_of::<u32>();
const MAP_CELL_SIZE: usize = mem::size_of::<MulMapTile>();


/// One decoded map cell: the resolved radar color and the raw signed height.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct RadarTile {
    pub color: (u8, u8, u8),
    pub z: i8,
}

/// A decoded block, indexed [h][v] like the on screen tile layout.
pub type RadarBlock = [[RadarTile; BLOCK_DIM]; BLOCK_DIM];


/// Decodes one raw block record against the given color table.
///
/// The slice must hold exactly one record. Cells follow the header in
/// raster scan order, V rows outer. Heights come back unshifted, the
/// grayscale mapping belongs to the renderer.
pub fn decode_block(bytes: &[u8], colors: &ColorData) -> Result<RadarBlock, MulError> {
    if bytes.len() != MAP_BLOCK_SIZE {
        return Err(MulError::MalformedBlock(BlockDefect::WrongLength {
            len: bytes.len(),
        }));
    }

    let mut block: RadarBlock = [[RadarTile { color: (0, 0, 0), z: 0 }; BLOCK_DIM]; BLOCK_DIM];

    for v in 0..BLOCK_DIM {
        for h in 0..BLOCK_DIM {
            let at = MAP_BLOCK_HEADER + MAP_CELL_SIZE * (BLOCK_DIM * v + h);
            let cell = &bytes[at..at + MAP_CELL_SIZE];   // in bounds, length checked above

            let code = mul_u16(cell);
            let color = colors
                .color(code)
                .map_err(|_| MulError::MalformedBlock(BlockDefect::BadColorCode { code }))?;

            block[h][v] = RadarTile { color, z: mul_i8(&cell[2..]) };
        }
    }

    Ok(block)
}


/// Land borrows the raw map mul contents and addresses block records in it.
/// Blocks are stored H-major: the whole V column at H comes before H+1.
pub struct Land<'a> {
    data: &'a [u8],
    width_blocks: usize,     // map width in blocks
    height_blocks: usize,    // map height
}

impl<'a> Land<'a> {
    pub fn new(data: &'a [u8], width_blocks: usize, height_blocks: usize) -> Self {
        Self { data, width_blocks, height_blocks }
    }

    #[inline]
    pub fn width_blocks(&self) -> usize {
        self.width_blocks
    }

    #[inline]
    pub fn height_blocks(&self) -> usize {
        self.height_blocks
    }

    /// Byte offset of the block record at `coord`.
    ///
    /// V is checked against the grid height. H is left to the caller: a too
    /// large H runs past the end of the buffer and surfaces there as
    /// `TruncatedBuffer`.
    #[inline]
    pub fn block_offset(&self, coord: BlockCoord) -> Result<usize, MulError> {
        if coord.v >= self.height_blocks {
            return Err(MulError::OutOfRange {
                index: coord.v,
                limit: self.height_blocks,
            });
        }

        Ok(MAP_BLOCK_SIZE * (coord.h * self.height_blocks + coord.v))
    }

    /// The raw bytes of one whole block record.
    pub fn block_bytes(&self, coord: BlockCoord) -> Result<&'a [u8], MulError> {
        let offset = self.block_offset(coord)?;
        let end = offset + MAP_BLOCK_SIZE;

        self.data.get(offset..end).ok_or(MulError::TruncatedBuffer {
            offset,
            end,
            buffer_len: self.data.len(),
        })
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    fn black_table() -> Vec<u8> {
        vec![0u8; 131072]
    }

    fn block_of(cells: &[(u16, i8); 64]) -> Vec<u8> {
        let mut bytes = vec![0xFFu8; MAP_BLOCK_HEADER];  // header content must not matter
        for &(code, z) in cells {
            bytes.extend_from_slice(&code.to_le_bytes());
            bytes.push(z as u8);
        }
        bytes
    }

    #[test]
    fn block_record_is_196_bytes() {
        assert_eq!(MAP_BLOCK_SIZE, 196);
        assert_eq!(MAP_CELL_SIZE, 3);
    }

    #[test]
    fn zero_block_decodes_black_with_raw_heights() {
        let table = black_table();
        let colors = ColorData::new(&table);
        let bytes = block_of(&[(0, 0); 64]);

        let block = decode_block(&bytes, &colors).unwrap();
        for column in &block {
            for tile in column {
                assert_eq!(tile.color, (0, 0, 0));
                assert_eq!(tile.z, 0);
            }
        }
    }

    #[test]
    fn cells_follow_raster_scan_order() {
        let table = black_table();
        let colors = ColorData::new(&table);

        let mut cells = [(0u16, 0i8); 64];
        for v in 0..8 {
            for h in 0..8 {
                cells[8 * v + h] = (0, (8 * v + h) as i8);
            }
        }

        let block = decode_block(&block_of(&cells), &colors).unwrap();
        assert_eq!(block[0][0].z, 0);
        assert_eq!(block[3][2].z, 19);  // h=3 in the third row
        assert_eq!(block[7][7].z, 63);
    }

    #[test]
    fn short_slice_is_malformed() {
        let table = black_table();
        let colors = ColorData::new(&table);
        let bytes = vec![0u8; MAP_BLOCK_SIZE - 1];

        assert_eq!(
            decode_block(&bytes, &colors),
            Err(MulError::MalformedBlock(BlockDefect::WrongLength { len: 195 }))
        );
    }

    #[test]
    fn oversized_slice_is_malformed_too() {
        let table = black_table();
        let colors = ColorData::new(&table);
        let bytes = vec![0u8; MAP_BLOCK_SIZE + 1];

        assert_eq!(
            decode_block(&bytes, &colors),
            Err(MulError::MalformedBlock(BlockDefect::WrongLength { len: 197 }))
        );
    }

    #[test]
    fn unresolvable_code_carries_the_code() {
        let table = vec![0u8; 2];   // a single entry, only code 0 resolves
        let colors = ColorData::new(&table);

        let mut cells = [(0u16, 0i8); 64];
        cells[5] = (0x1234, 0);

        assert_eq!(
            decode_block(&block_of(&cells), &colors),
            Err(MulError::MalformedBlock(BlockDefect::BadColorCode { code: 0x1234 }))
        );
    }

    #[test]
    fn offsets_are_column_major() {
        let land = Land::new(&[], 4, 3);

        assert_eq!(land.block_offset(BlockCoord { h: 0, v: 0 }).unwrap(), 0);
        assert_eq!(land.block_offset(BlockCoord { h: 0, v: 1 }).unwrap(), MAP_BLOCK_SIZE);
        assert_eq!(land.block_offset(BlockCoord { h: 1, v: 0 }).unwrap(), 3 * MAP_BLOCK_SIZE);
        assert_eq!(land.block_offset(BlockCoord { h: 2, v: 2 }).unwrap(), 8 * MAP_BLOCK_SIZE);
    }

    #[test]
    fn offsets_are_injective_over_the_grid() {
        let land = Land::new(&[], 5, 4);
        let mut seen = std::collections::HashSet::new();

        for h in 0..5 {
            for v in 0..4 {
                assert!(seen.insert(land.block_offset(BlockCoord { h, v }).unwrap()));
            }
        }
    }

    #[test]
    fn v_outside_the_grid_is_out_of_range() {
        let land = Land::new(&[], 4, 3);

        assert_eq!(
            land.block_offset(BlockCoord { h: 0, v: 3 }),
            Err(MulError::OutOfRange { index: 3, limit: 3 })
        );
    }

    #[test]
    fn h_is_not_bounds_checked_here() {
        let data = vec![0u8; MAP_BLOCK_SIZE];
        let land = Land::new(&data, 1, 1);

        assert_eq!(
            land.block_offset(BlockCoord { h: 5, v: 0 }).unwrap(),
            5 * MAP_BLOCK_SIZE
        );
        assert_eq!(
            land.block_bytes(BlockCoord { h: 5, v: 0 }),
            Err(MulError::TruncatedBuffer {
                offset: 5 * MAP_BLOCK_SIZE,
                end: 6 * MAP_BLOCK_SIZE,
                buffer_len: MAP_BLOCK_SIZE,
            })
        );
    }

    #[test]
    fn block_bytes_slices_whole_records() {
        let mut data = vec![0u8; 2 * MAP_BLOCK_SIZE];
        data[MAP_BLOCK_SIZE] = 0xAB;
        let land = Land::new(&data, 1, 2);

        let bytes = land.block_bytes(BlockCoord { h: 0, v: 1 }).unwrap();
        assert_eq!(bytes.len(), MAP_BLOCK_SIZE);
        assert_eq!(bytes[0], 0xAB);
    }
}
