//! Card deck energy-cost tally and report generation.

mod deck;
mod graphics;
mod render;
mod report;

pub use deck::{
    CardRecord, DeckId, DeckParser, DeckReport, MAX_CARDS, MAX_COST, ReadError, classify_line,
};
pub use graphics::{
    GLYPH_HEIGHT, GLYPH_WIDTH, ImageRenderOptions, ImageRenderer, MAX_DPI, MAX_PAGE_PIXELS,
    MIN_DPI, PageLayout, ReportStyle, paint_report,
};
pub use render::{JsonRenderer, RenderError, ReportRenderer, TextRenderer, write_report};
pub use report::{
    LineKind, MAX_INVALID_CARDS, RenderableReport, ReportBody, ReportBuilder, ReportLine,
    VOID_MARKER,
};

/// Limits applied to a single tally run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TallyLimits {
    /// Lines read from the deck before the rest is ignored.
    pub max_cards: usize,
    /// Invalid card count a deck may reach before it is void.
    pub void_threshold: usize,
}

impl Default for TallyLimits {
    fn default() -> Self {
        Self {
            max_cards: MAX_CARDS,
            void_threshold: MAX_INVALID_CARDS,
        }
    }
}

impl TallyLimits {
    pub fn parser(&self) -> DeckParser {
        DeckParser::new(self.max_cards)
    }

    pub fn builder(&self) -> ReportBuilder {
        ReportBuilder::new(self.void_threshold)
    }
}
