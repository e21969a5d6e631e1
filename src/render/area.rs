use image::{ImageBuffer, Rgb, RgbImage};
use log::debug;
use thiserror::Error;

use crate::mul::{decode_block, BlockCoord, ColorData, Land, MulError, BLOCK_DIM};


/// Area size in blocks.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct AreaSize {
    pub h: usize,
    pub v: usize,
}

/// A rectangular run of blocks to render: top left corner plus extent.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct AreaSpec {
    pub start: BlockCoord,
    pub size: AreaSize,
}

/// Color map and height map for one rendered area, rgb8 each.
/// Heights render as gray `z + 128`, so -128..=127 spans the full range.
#[derive(Debug)]
pub struct RenderedArea {
    pub map: RgbImage,
    pub heights: RgbImage,
}

/// A block decode failure bound to the coordinate being rendered.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Error)]
#[error("block {coord}: {source}")]
pub struct RenderError {
    pub coord: BlockCoord,
    pub source: MulError,
}


/// Renders the requested block area into a color image and a height image,
/// both `(size.h*8, size.v*8)` pixels.
///
/// Blocks are visited in raster order, V outer and H inner, and each
/// decoded 8x8 tile lands at its offset from the area start. Any block
/// failure aborts the whole render, nothing partial comes back.
pub fn render_area(
    area: &AreaSpec,
    land: &Land,
    colors: &ColorData,
) -> Result<RenderedArea, RenderError> {
    assert!(area.size.h > 0 && area.size.v > 0, "empty render area");

    let width = (area.size.h * BLOCK_DIM) as u32;
    let height = (area.size.v * BLOCK_DIM) as u32;

    let mut map = ImageBuffer::new(width, height);
    let mut heights = ImageBuffer::new(width, height);

    debug!(
        "rendering {}x{} blocks starting at ({}, {})",
        area.size.h, area.size.v, area.start.h, area.start.v
    );

    for rv in area.start.v..area.start.v + area.size.v {
        for rh in area.start.h..area.start.h + area.size.h {
            let coord = BlockCoord { h: rh, v: rv };

            let block = land
                .block_bytes(coord)
                .and_then(|bytes| decode_block(bytes, colors))
                .map_err(|source| RenderError { coord, source })?;

            let origin_x = (BLOCK_DIM * (rh - area.start.h)) as u32;
            let origin_y = (BLOCK_DIM * (rv - area.start.v)) as u32;

            for v in 0..BLOCK_DIM {
                for h in 0..BLOCK_DIM {
                    let tile = block[h][v];
                    let (x, y) = (origin_x + h as u32, origin_y + v as u32);

                    let (r, g, b) = tile.color;
                    map.put_pixel(x, y, Rgb([r, g, b]));

                    let shade = (tile.z as i16 + 128) as u8;
                    heights.put_pixel(x, y, Rgb([shade, shade, shade]));
                }
            }
        }
    }

    Ok(RenderedArea { map, heights })
}
