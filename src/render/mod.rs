pub mod area;

pub use area::{render_area, AreaSize, AreaSpec, RenderError, RenderedArea};
