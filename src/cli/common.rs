//! Shared clap helper types for CLI commands.

use clap::{Args, ValueEnum};
use spiredeck::{MAX_CARDS, MAX_INVALID_CARDS, PageLayout, ReportStyle, TallyLimits};

/// Report artifact formats.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormatArg {
    Png,
    Text,
    Json,
}

/// Page styles for PNG output.
#[derive(ValueEnum, Debug, Clone, Copy)]
pub enum ReportStyleArg {
    Plain,
    Parchment,
}

impl From<ReportStyleArg> for ReportStyle {
    fn from(value: ReportStyleArg) -> ReportStyle {
        match value {
            ReportStyleArg::Plain => ReportStyle::Plain,
            ReportStyleArg::Parchment => ReportStyle::Parchment,
        }
    }
}

/// Page layout options for PNG output.
#[derive(ValueEnum, Debug, Clone, Copy)]
pub enum PageLayoutArg {
    A4,
    Fit,
}

impl From<PageLayoutArg> for PageLayout {
    fn from(value: PageLayoutArg) -> PageLayout {
        match value {
            PageLayoutArg::A4 => PageLayout::A4,
            PageLayoutArg::Fit => PageLayout::Fit,
        }
    }
}

/// Tally limits shared by every command that parses a deck.
#[derive(Args, Debug, Clone, Copy)]
pub struct LimitArgs {
    /// Maximum number of lines read from the deck.
    #[arg(long = "max-cards", default_value_t = MAX_CARDS)]
    pub max_cards: usize,
    /// Invalid card count a deck may reach before it is void.
    #[arg(long = "void-threshold", default_value_t = MAX_INVALID_CARDS)]
    pub void_threshold: usize,
}

impl From<LimitArgs> for TallyLimits {
    fn from(value: LimitArgs) -> TallyLimits {
        TallyLimits {
            max_cards: value.max_cards,
            void_threshold: value.void_threshold,
        }
    }
}
