use std::path::Path;

use image::{DynamicImage, ImageBuffer, Rgba, RgbaImage};
use imageproc::drawing::{draw_filled_rect_mut, draw_hollow_rect_mut, draw_line_segment_mut};
use imageproc::rect::Rect;

use crate::render::{RenderError, ReportRenderer};
use crate::report::{LineKind, RenderableReport};

const A4_WIDTH_IN: f32 = 8.27;
const A4_HEIGHT_IN: f32 = 11.69;
const MARGIN_IN: f32 = 0.6;
pub const GLYPH_WIDTH: usize = 5;
pub const GLYPH_HEIGHT: usize = 7;
pub const MIN_DPI: u32 = 72;
pub const MAX_DPI: u32 = 600;
/// Largest page, in pixels, either layout may allocate.
pub const MAX_PAGE_PIXELS: u64 = 1 << 26;

/// Visual styles for the report page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportStyle {
    Plain,
    Parchment,
}

/// Page geometry for the generated image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageLayout {
    /// Fixed A4 page. Content that does not fit is an error.
    A4,
    /// A4 width, height grown or shrunk to the content, up to
    /// [`MAX_PAGE_PIXELS`].
    Fit,
}

/// Options controlling PNG generation.
#[derive(Debug, Clone, Copy)]
pub struct ImageRenderOptions {
    pub style: ReportStyle,
    pub dpi: u32,
    pub layout: PageLayout,
}

impl Default for ImageRenderOptions {
    fn default() -> Self {
        Self {
            style: ReportStyle::Parchment,
            dpi: 150,
            layout: PageLayout::A4,
        }
    }
}

struct Palette {
    page_bg: Rgba<u8>,
    border: Rgba<u8>,
    rule: Rgba<u8>,
    text: Rgba<u8>,
    heading: Rgba<u8>,
    marker: Rgba<u8>,
}

/// Rasterizes reports onto a single PNG page.
#[derive(Debug, Clone, Copy, Default)]
pub struct ImageRenderer {
    pub options: ImageRenderOptions,
}

impl ImageRenderer {
    pub fn new(options: ImageRenderOptions) -> Self {
        Self { options }
    }
}

impl ReportRenderer for ImageRenderer {
    fn extension(&self) -> &'static str {
        "png"
    }

    fn render(&self, report: &RenderableReport, path: &Path) -> Result<(), RenderError> {
        let image = paint_report(report, &self.options)?;
        image.save(path).map_err(|source| RenderError::Image {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Paint the report lines onto a page image.
pub fn paint_report(
    report: &RenderableReport,
    options: &ImageRenderOptions,
) -> Result<DynamicImage, RenderError> {
    let dpi = options.dpi.clamp(MIN_DPI, MAX_DPI);
    let palette = palette(options.style);

    let page_width = inches_to_px(A4_WIDTH_IN, dpi);
    let margin = inches_to_px(MARGIN_IN, dpi);
    let scale = (dpi as f32 / 72.0).ceil() as u32;
    let advance = (GLYPH_WIDTH as u32 + 1) * scale;
    let line_height = (GLYPH_HEIGHT as u32 + 4) * scale;
    let columns = (page_width.saturating_sub(2 * margin) / advance).max(1) as usize;

    let lines = report.lines();
    let row_count: u64 = lines
        .iter()
        .map(|line| wrapped_rows(&line.text, columns))
        .sum();
    let needed = u64::from(margin) * 2 + row_count.saturating_mul(u64::from(line_height));
    let available = match options.layout {
        PageLayout::Fit => MAX_PAGE_PIXELS / u64::from(page_width),
        PageLayout::A4 => u64::from(inches_to_px(A4_HEIGHT_IN, dpi)),
    };
    if needed > available {
        return Err(RenderError::PageOverflow { needed, available });
    }
    let page_height = match options.layout {
        PageLayout::Fit => needed as u32,
        PageLayout::A4 => available as u32,
    };

    let rows: Vec<(LineKind, String)> = lines
        .into_iter()
        .flat_map(|line| {
            wrap(&line.text, columns)
                .into_iter()
                .map(move |text| (line.kind, text))
        })
        .collect();

    let mut page: RgbaImage = ImageBuffer::from_pixel(page_width, page_height, palette.page_bg);
    draw_hollow_rect_mut(
        &mut page,
        Rect::at(0, 0).of_size(page_width, page_height),
        palette.border,
    );

    for (row, (kind, text)) in rows.iter().enumerate() {
        let x = margin as i32;
        let y = (margin + row as u32 * line_height) as i32;
        let color = match kind {
            LineKind::Heading => palette.heading,
            LineKind::Marker => palette.marker,
            LineKind::Field | LineKind::Entry => palette.text,
        };
        for (col, ch) in text.chars().enumerate() {
            draw_glyph(&mut page, x + (col as u32 * advance) as i32, y, ch, color, scale);
        }
        if *kind == LineKind::Heading {
            let rule_y = (y + (GLYPH_HEIGHT as u32 * scale + scale) as i32) as f32;
            draw_line_segment_mut(
                &mut page,
                (x as f32, rule_y),
                ((page_width - margin) as f32, rule_y),
                palette.rule,
            );
        }
    }

    Ok(DynamicImage::ImageRgba8(page))
}

/// Break `text` into chunks of at most `columns` characters. Blank lines stay as one row.
fn wrap(text: &str, columns: usize) -> Vec<String> {
    let chars: Vec<char> = text.chars().collect();
    if chars.is_empty() {
        return vec![String::new()];
    }
    chars
        .chunks(columns)
        .map(|chunk| chunk.iter().collect())
        .collect()
}

fn wrapped_rows(text: &str, columns: usize) -> u64 {
    text.chars().count().div_ceil(columns).max(1) as u64
}

fn inches_to_px(inches: f32, dpi: u32) -> u32 {
    (inches * dpi as f32).round() as u32
}

fn palette(style: ReportStyle) -> Palette {
    match style {
        ReportStyle::Plain => Palette {
            page_bg: rgba(0xff, 0xff, 0xff, 0xff),
            border: rgba(0x40, 0x40, 0x40, 0xff),
            rule: rgba(0xa0, 0xa0, 0xa0, 0xff),
            text: rgba(0x10, 0x10, 0x10, 0xff),
            heading: rgba(0x10, 0x10, 0x10, 0xff),
            marker: rgba(0x10, 0x10, 0x10, 0xff),
        },
        ReportStyle::Parchment => Palette {
            page_bg: rgba(0xf6, 0xe3, 0xc6, 0xff),
            border: rgba(0x86, 0x74, 0x5d, 0xff),
            rule: rgba(0xd1, 0xba, 0x9b, 0xff),
            text: rgba(0x1f, 0x1b, 0x14, 0xff),
            heading: rgba(0x5a, 0x3b, 0x1e, 0xff),
            marker: rgba(0xa3, 0x1d, 0x1d, 0xff),
        },
    }
}

fn rgba(r: u8, g: u8, b: u8, a: u8) -> Rgba<u8> {
    Rgba([r, g, b, a])
}

fn draw_glyph(image: &mut RgbaImage, x: i32, y: i32, ch: char, color: Rgba<u8>, scale: u32) {
    let pattern = glyph_pattern(ch);
    for (row, bits) in pattern.iter().enumerate() {
        for col in 0..GLYPH_WIDTH {
            if bits & (1 << (GLYPH_WIDTH - 1 - col)) != 0 {
                let px = x + (col as i32 * scale as i32);
                let py = y + (row as i32 * scale as i32);
                draw_filled_rect_mut(image, Rect::at(px, py).of_size(scale, scale), color);
            }
        }
    }
}

// Lowercase letters are drawn with their uppercase shapes.
#[rustfmt::skip]
fn glyph_pattern(ch: char) -> [u8; GLYPH_HEIGHT] {
    match ch.to_ascii_uppercase() {
        '0' => [0b01110, 0b10001, 0b10011, 0b10101, 0b11001, 0b10001, 0b01110],
        '1' => [0b00100, 0b01100, 0b00100, 0b00100, 0b00100, 0b00100, 0b01110],
        '2' => [0b01110, 0b10001, 0b00001, 0b00110, 0b01000, 0b10000, 0b11111],
        '3' => [0b11110, 0b00001, 0b00001, 0b01110, 0b00001, 0b00001, 0b11110],
        '4' => [0b00010, 0b00110, 0b01010, 0b10010, 0b11111, 0b00010, 0b00010],
        '5' => [0b11111, 0b10000, 0b11110, 0b00001, 0b00001, 0b10001, 0b01110],
        '6' => [0b00110, 0b01000, 0b10000, 0b11110, 0b10001, 0b10001, 0b01110],
        '7' => [0b11111, 0b00001, 0b00010, 0b00100, 0b01000, 0b01000, 0b01000],
        '8' => [0b01110, 0b10001, 0b10001, 0b01110, 0b10001, 0b10001, 0b01110],
        '9' => [0b01110, 0b10001, 0b10001, 0b01111, 0b00001, 0b00010, 0b01100],
        'A' => [0b01110, 0b10001, 0b10001, 0b11111, 0b10001, 0b10001, 0b10001],
        'B' => [0b11110, 0b10001, 0b10001, 0b11110, 0b10001, 0b10001, 0b11110],
        'C' => [0b01110, 0b10001, 0b10000, 0b10000, 0b10000, 0b10001, 0b01110],
        'D' => [0b11110, 0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b11110],
        'E' => [0b11111, 0b10000, 0b10000, 0b11110, 0b10000, 0b10000, 0b11111],
        'F' => [0b11111, 0b10000, 0b10000, 0b11110, 0b10000, 0b10000, 0b10000],
        'G' => [0b01110, 0b10001, 0b10000, 0b10111, 0b10001, 0b10001, 0b01110],
        'H' => [0b10001, 0b10001, 0b10001, 0b11111, 0b10001, 0b10001, 0b10001],
        'I' => [0b01110, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100, 0b01110],
        'J' => [0b00111, 0b00010, 0b00010, 0b00010, 0b10010, 0b10010, 0b01100],
        'K' => [0b10001, 0b10010, 0b10100, 0b11000, 0b10100, 0b10010, 0b10001],
        'L' => [0b10000, 0b10000, 0b10000, 0b10000, 0b10000, 0b10000, 0b11111],
        'M' => [0b10001, 0b11011, 0b10101, 0b10101, 0b10001, 0b10001, 0b10001],
        'N' => [0b10001, 0b10001, 0b11001, 0b10101, 0b10011, 0b10001, 0b10001],
        'O' => [0b01110, 0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b01110],
        'P' => [0b11110, 0b10001, 0b10001, 0b11110, 0b10000, 0b10000, 0b10000],
        'Q' => [0b01110, 0b10001, 0b10001, 0b10001, 0b10101, 0b10010, 0b01101],
        'R' => [0b11110, 0b10001, 0b10001, 0b11110, 0b10100, 0b10010, 0b10001],
        'S' => [0b01111, 0b10000, 0b10000, 0b01110, 0b00001, 0b00001, 0b11110],
        'T' => [0b11111, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100],
        'U' => [0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b01110],
        'V' => [0b10001, 0b10001, 0b10001, 0b01010, 0b01010, 0b00100, 0b00100],
        'W' => [0b10001, 0b10001, 0b10001, 0b10101, 0b10101, 0b10101, 0b01010],
        'X' => [0b10001, 0b10001, 0b01010, 0b00100, 0b01010, 0b10001, 0b10001],
        'Y' => [0b10001, 0b10001, 0b01010, 0b00100, 0b00100, 0b00100, 0b00100],
        'Z' => [0b11111, 0b00001, 0b00010, 0b00100, 0b01000, 0b10000, 0b11111],
        '-' => [0b00000, 0b00000, 0b00000, 0b11111, 0b00000, 0b00000, 0b00000],
        '+' => [0b00000, 0b00100, 0b00100, 0b11111, 0b00100, 0b00100, 0b00000],
        ':' => [0b00000, 0b00100, 0b00000, 0b00000, 0b00100, 0b00000, 0b00000],
        ';' => [0b00000, 0b00100, 0b00000, 0b00000, 0b00110, 0b00100, 0b01000],
        '.' => [0b00000, 0b00000, 0b00000, 0b00000, 0b00000, 0b00110, 0b00110],
        ',' => [0b00000, 0b00000, 0b00000, 0b00000, 0b00110, 0b00100, 0b01000],
        '(' => [0b00010, 0b00100, 0b01000, 0b01000, 0b01000, 0b00100, 0b00010],
        ')' => [0b01000, 0b00100, 0b00010, 0b00010, 0b00010, 0b00100, 0b01000],
        '[' => [0b01110, 0b01000, 0b01000, 0b01000, 0b01000, 0b01000, 0b01110],
        ']' => [0b01110, 0b00010, 0b00010, 0b00010, 0b00010, 0b00010, 0b01110],
        '/' => [0b00001, 0b00010, 0b00100, 0b01000, 0b10000, 0b10000, 0b00000],
        '\'' => [0b00100, 0b00100, 0b00000, 0b00000, 0b00000, 0b00000, 0b00000],
        '"' => [0b01010, 0b01010, 0b00000, 0b00000, 0b00000, 0b00000, 0b00000],
        '!' => [0b00100, 0b00100, 0b00100, 0b00100, 0b00100, 0b00000, 0b00100],
        '?' => [0b01110, 0b10001, 0b00010, 0b00100, 0b00100, 0b00000, 0b00100],
        '=' => [0b00000, 0b11111, 0b00000, 0b00000, 0b11111, 0b00000, 0b00000],
        '_' => [0b00000, 0b00000, 0b00000, 0b00000, 0b00000, 0b11111, 0b00000],
        '#' => [0b01010, 0b11111, 0b01010, 0b01010, 0b11111, 0b01010, 0b01010],
        '&' => [0b01100, 0b10010, 0b10100, 0b01000, 0b10101, 0b10010, 0b01101],
        '*' => [0b00100, 0b10101, 0b01110, 0b10101, 0b00100, 0b00000, 0b00000],
        _ => [0b00000; GLYPH_HEIGHT],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deck::{DeckId, DeckParser};
    use crate::report::ReportBuilder;
    use pretty_assertions::assert_eq;

    fn report(lines: &[String], void_threshold: usize) -> RenderableReport {
        let parsed = DeckParser::default().parse_with_id(lines, DeckId::new(5).unwrap());
        ReportBuilder::new(void_threshold).build(parsed)
    }

    fn options(layout: PageLayout) -> ImageRenderOptions {
        ImageRenderOptions {
            style: ReportStyle::Parchment,
            dpi: 72,
            layout,
        }
    }

    fn has_pixel(image: &DynamicImage, color: Rgba<u8>) -> bool {
        image.to_rgba8().pixels().any(|px| *px == color)
    }

    #[test]
    fn a4_page_dimensions() {
        let report = report(&["Strike:1".to_string()], 10);
        let image = paint_report(&report, &options(PageLayout::A4)).unwrap();
        assert_eq!(image.width(), inches_to_px(A4_WIDTH_IN, 72));
        assert_eq!(image.height(), inches_to_px(A4_HEIGHT_IN, 72));
    }

    #[test]
    fn void_marker_uses_marker_color() {
        let lines = vec!["bad".to_string(); 11];
        let image = paint_report(&report(&lines, 10), &options(PageLayout::A4)).unwrap();
        let palette = palette(ReportStyle::Parchment);
        assert!(has_pixel(&image, palette.marker));
        assert!(!has_pixel(&image, palette.heading));
    }

    #[test]
    fn headings_are_drawn_in_heading_color() {
        let image =
            paint_report(&report(&["Bash:2".to_string()], 10), &options(PageLayout::A4)).unwrap();
        let palette = palette(ReportStyle::Parchment);
        assert!(has_pixel(&image, palette.heading));
        assert!(has_pixel(&image, palette.rule));
    }

    #[test]
    fn overflowing_a4_is_an_error() {
        let lines: Vec<String> = (0..200).map(|i| format!("junk {}", i)).collect();
        let report = report(&lines, 1000);
        let err = paint_report(&report, &options(PageLayout::A4)).unwrap_err();
        assert!(matches!(err, RenderError::PageOverflow { .. }));

        let image = paint_report(&report, &options(PageLayout::Fit)).unwrap();
        let margin = inches_to_px(MARGIN_IN, 72);
        // deck id, total, two headings, 200 invalid entries
        assert_eq!(image.height(), 2 * margin + 204 * (GLYPH_HEIGHT as u32 + 4));
    }

    #[test]
    fn fit_layout_is_bounded() {
        let long_line = "x".repeat(20_000);
        let mut opts = options(PageLayout::Fit);
        opts.dpi = MAX_DPI;
        let err = paint_report(&report(&[long_line], 10), &opts).unwrap_err();
        match err {
            RenderError::PageOverflow { needed, available } => {
                assert!(needed > available);
                let width = u64::from(inches_to_px(A4_WIDTH_IN, MAX_DPI));
                assert!(available * width <= MAX_PAGE_PIXELS);
            }
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn wrapped_row_count_matches_wrap() {
        for text in ["", "abc", "abcdef", "abcdefg"] {
            assert_eq!(wrapped_rows(text, 3), wrap(text, 3).len() as u64);
        }
    }

    #[test]
    fn dpi_is_clamped() {
        let report = report(&["Strike:1".to_string()], 10);
        let mut opts = options(PageLayout::Fit);
        opts.dpi = 1;
        let image = paint_report(&report, &opts).unwrap();
        assert_eq!(image.width(), inches_to_px(A4_WIDTH_IN, MIN_DPI));
    }

    #[test]
    fn wraps_long_lines() {
        assert_eq!(wrap("abcdefg", 3), vec!["abc", "def", "g"]);
        assert_eq!(wrap("", 3), vec![""]);
    }

    #[test]
    fn writes_png_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.png");
        let renderer = ImageRenderer::new(options(PageLayout::Fit));
        renderer
            .render(&report(&["Strike:1".to_string()], 10), &path)
            .unwrap();
        let bytes = std::fs::read(&path).unwrap();
        assert_eq!(&bytes[..8], b"\x89PNG\r\n\x1a\n");
    }
}
