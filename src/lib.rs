//! Decodes the Ultima Online world map format (map mul + Radarcol.mul)
//! into a color image and a grayscale height image.

pub mod mul;
pub mod render;

pub use mul::{decode_block, ColorData, Land, RadarBlock, RadarTile};
pub use mul::{BlockCoord, BlockDefect, MulError};
pub use mul::{BLOCK_DIM, MAP_BLOCK_SIZE};

pub use render::{render_area, AreaSize, AreaSpec, RenderError, RenderedArea};
