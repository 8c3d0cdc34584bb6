//! Raster rendering of reports as PNG pages.

mod paint;

pub use paint::{
    GLYPH_HEIGHT, GLYPH_WIDTH, ImageRenderOptions, ImageRenderer, MAX_DPI, MAX_PAGE_PIXELS,
    MIN_DPI, PageLayout, ReportStyle, paint_report,
};
