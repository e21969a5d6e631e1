use crate::mul::mulreader::mul_u16_at;
use crate::mul::MulError;


/// ColorData wraps the raw Radarcol.mul contents and resolves 16 bit radar
/// color codes to rgb8 triples. The buffer is loaded once by the caller and
/// only borrowed here; a table covering every code holds 65536 entries
/// (131072 bytes).
pub struct ColorData<'a> {
    table: &'a [u8],
}


// color format is |15|14|13|12|11|10| 9| 8| 7| 6| 5| 4| 3| 2| 1| 0|
//                 |  | R| R| R| R| R| G| G| G| G| G| B| B| B| B| B|
// 5 bit per r/g/b components, high bit is unused

const RED_MASK: u16 = 0b0_11111_00000_00000;
const RED_SHIFT: usize = 10;

const GREEN_MASK: u16 = 0b0_00000_11111_00000;
const GREEN_SHIFT: usize = 5;

const BLUE_MASK: u16 = 0b0_00000_00000_11111;
const BLUE_SHIFT: usize = 0;


impl<'a> ColorData<'a> {
    pub fn new(table: &'a [u8]) -> Self {
        Self { table }
    }

    /// Resolves a radar color code to rgb8.
    /// Fails with `OutOfRange` when the table ends before entry `code`;
    /// every code is a valid lookup against a full size table.
    pub fn color(&self, code: u16) -> Result<(u8, u8, u8), MulError> {
        match mul_u16_at(self.table, 2 * code as usize) {
            Some(packed) => Ok(Self::get_rgb(packed)),
            None => Err(MulError::OutOfRange {
                index: code as usize,
                limit: self.table.len() / 2,
            }),
        }
    }

    fn get_rgb(color: u16) -> (u8, u8, u8) {
        let r = (color & RED_MASK) >> RED_SHIFT;
        let g = (color & GREEN_MASK) >> GREEN_SHIFT;
        let b = (color & BLUE_MASK) >> BLUE_SHIFT;

        // promote each 5 bit channel with a plain shift, the client's own
        // approximation, not a full range rescale
        ((r << 3) as u8, (g << 3) as u8, (b << 3) as u8)
    }
}
