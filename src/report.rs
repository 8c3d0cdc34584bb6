use std::collections::BTreeMap;
use std::fmt;

use crate::deck::{DeckId, DeckReport};

/// Invalid card count above which a deck is void.
pub const MAX_INVALID_CARDS: usize = 10;
/// Marker line printed in place of the details of a void deck.
pub const VOID_MARKER: &str = "VOID";
const REPORT_PREFIX: &str = "SpireDeck";

/// Role of a rendered line, used by renderers for styling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    Field,
    Heading,
    Marker,
    Entry,
}

/// One line of report output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportLine {
    pub kind: LineKind,
    pub text: String,
}

impl ReportLine {
    fn new<S: Into<String>>(kind: LineKind, text: S) -> Self {
        Self {
            kind,
            text: text.into(),
        }
    }
}

impl fmt::Display for ReportLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// Detail section of a report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReportBody {
    /// Too many invalid cards; histogram and invalid list are withheld.
    Void,
    Detail {
        cost_histogram: BTreeMap<u8, usize>,
        invalid_cards: Vec<String>,
    },
}

/// Report content ready to hand to a renderer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderableReport {
    deck_id: DeckId,
    total_cost: u64,
    body: ReportBody,
}

impl RenderableReport {
    pub fn deck_id(&self) -> DeckId {
        self.deck_id
    }

    pub fn total_cost(&self) -> u64 {
        self.total_cost
    }

    pub fn body(&self) -> &ReportBody {
        &self.body
    }

    pub fn is_void(&self) -> bool {
        matches!(self.body, ReportBody::Void)
    }

    /// Output name for this report, e.g. `SpireDeck 000000042(VOID).png`.
    pub fn file_name(&self, extension: &str) -> String {
        let marker = if self.is_void() { "(VOID)" } else { "" };
        format!("{} {}{}.{}", REPORT_PREFIX, self.deck_id, marker, extension)
    }

    /// Lines of the report in presentation order.
    pub fn lines(&self) -> Vec<ReportLine> {
        let mut lines = vec![
            ReportLine::new(LineKind::Field, format!("Deck ID: {}", self.deck_id)),
            ReportLine::new(
                LineKind::Field,
                format!("Total Energy Cost: {} energy", self.total_cost),
            ),
        ];
        match &self.body {
            ReportBody::Void => lines.push(ReportLine::new(LineKind::Marker, VOID_MARKER)),
            ReportBody::Detail {
                cost_histogram,
                invalid_cards,
            } => {
                lines.push(ReportLine::new(LineKind::Heading, "Cost Histogram:"));
                lines.extend(cost_histogram.iter().map(|(cost, count)| {
                    ReportLine::new(
                        LineKind::Entry,
                        format!("{} energy: {} card(s)", cost, count),
                    )
                }));
                if !invalid_cards.is_empty() {
                    lines.push(ReportLine::new(LineKind::Heading, "Invalid Cards:"));
                    lines.extend(
                        invalid_cards
                            .iter()
                            .map(|card| ReportLine::new(LineKind::Entry, card.as_str())),
                    );
                }
            }
        }
        lines
    }
}

/// Decides void status and shapes a [`DeckReport`] for rendering.
#[derive(Debug, Clone, Copy)]
pub struct ReportBuilder {
    void_threshold: usize,
}

impl Default for ReportBuilder {
    fn default() -> Self {
        Self::new(MAX_INVALID_CARDS)
    }
}

impl ReportBuilder {
    pub fn new(void_threshold: usize) -> Self {
        Self { void_threshold }
    }

    /// A deck is void when its invalid count strictly exceeds the threshold.
    pub fn is_void(&self, report: &DeckReport) -> bool {
        report.invalid_cards().len() > self.void_threshold
    }

    pub fn build(&self, report: DeckReport) -> RenderableReport {
        let void = self.is_void(&report);
        let (deck_id, total_cost, cost_histogram, invalid_cards) = report.into_parts();
        if void {
            log::info!(
                "deck {} is void: {} invalid card(s) exceed threshold {}",
                deck_id,
                invalid_cards.len(),
                self.void_threshold
            );
        }
        let body = if void {
            ReportBody::Void
        } else {
            ReportBody::Detail {
                cost_histogram,
                invalid_cards,
            }
        };
        RenderableReport {
            deck_id,
            total_cost,
            body,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deck::DeckParser;
    use pretty_assertions::assert_eq;

    fn deck(valid: usize, invalid: usize) -> DeckReport {
        let lines = std::iter::repeat("Strike:1")
            .take(valid)
            .chain(std::iter::repeat("Strike:7").take(invalid));
        DeckParser::default().parse_with_id(lines, DeckId::new(7).unwrap())
    }

    fn texts(report: &RenderableReport) -> Vec<String> {
        report.lines().iter().map(ToString::to_string).collect()
    }

    #[test]
    fn void_boundary_is_strictly_greater() {
        let builder = ReportBuilder::default();
        assert!(!builder.is_void(&deck(3, 10)));
        assert!(builder.is_void(&deck(3, 11)));
        assert!(!builder.build(deck(0, 10)).is_void());
        assert!(builder.build(deck(0, 11)).is_void());
    }

    #[test]
    fn detail_lines() {
        let report = ReportBuilder::default().build(deck(5, 0));
        assert_eq!(
            texts(&report),
            vec![
                "Deck ID: 000000007",
                "Total Energy Cost: 5 energy",
                "Cost Histogram:",
                "1 energy: 5 card(s)",
            ]
        );
        assert_eq!(report.file_name("pdf"), "SpireDeck 000000007.pdf");
    }

    #[test]
    fn detail_lists_invalid_cards_in_order() {
        let lines = ["Bash:2", "  Strike:9", "Defend:1", "junk"];
        let parsed = DeckParser::default().parse_with_id(lines, DeckId::new(1).unwrap());
        let report = ReportBuilder::default().build(parsed);
        assert_eq!(
            texts(&report),
            vec![
                "Deck ID: 000000001",
                "Total Energy Cost: 3 energy",
                "Cost Histogram:",
                "1 energy: 1 card(s)",
                "2 energy: 1 card(s)",
                "Invalid Cards:",
                "  Strike:9",
                "junk",
            ]
        );
        assert_eq!(report.lines()[5].kind, LineKind::Heading);
        assert_eq!(report.lines()[6].kind, LineKind::Entry);
    }

    #[test]
    fn void_suppresses_details() {
        let report = ReportBuilder::default().build(deck(4, 11));
        assert_eq!(report.body(), &ReportBody::Void);
        assert_eq!(
            texts(&report),
            vec!["Deck ID: 000000007", "Total Energy Cost: 4 energy", "VOID"]
        );
        assert_eq!(report.lines()[2].kind, LineKind::Marker);
        assert_eq!(report.file_name("png"), "SpireDeck 000000007(VOID).png");
    }

    #[test]
    fn custom_threshold() {
        let builder = ReportBuilder::new(0);
        assert!(!builder.build(deck(2, 0)).is_void());
        assert!(builder.build(deck(2, 1)).is_void());
    }
}
