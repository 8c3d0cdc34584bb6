use std::collections::BTreeMap;
use std::fmt;
use std::fs::OpenOptions;
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};

use rand::Rng;
use thiserror::Error;

/// Upper bound on the number of lines read from a deck file.
pub const MAX_CARDS: usize = 1000;
/// Highest energy cost a card may carry.
pub const MAX_COST: u8 = 6;
const FIELD_DELIMITER: char = ':';

/// The deck file could not be opened or read. No report is produced.
#[derive(Debug, Error)]
#[error("failed to read deck {}", path.display())]
pub struct ReadError {
    pub path: PathBuf,
    #[source]
    pub source: io::Error,
}

/// Cosmetic nine digit deck identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DeckId(u32);

impl DeckId {
    /// Exclusive upper bound of the identifier range.
    pub const UPPER_BOUND: u32 = 1_000_000_000;

    pub fn new(value: u32) -> Option<Self> {
        (value < Self::UPPER_BOUND).then_some(Self(value))
    }

    /// Draw an identifier uniformly from `0..UPPER_BOUND`.
    pub fn random() -> Self {
        Self(rand::thread_rng().gen_range(0..Self::UPPER_BOUND))
    }

    pub fn value(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for DeckId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:09}", self.0)
    }
}

/// A deck line split into its name and cost fields.
///
/// Both fields are trimmed; `raw` keeps the line exactly as read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CardRecord<'a> {
    raw: &'a str,
    name: &'a str,
    cost_text: &'a str,
}

impl<'a> CardRecord<'a> {
    /// Split a line on `:`. Returns `None` unless exactly two fields result.
    pub fn split(raw: &'a str) -> Option<Self> {
        let mut fields = raw.split(FIELD_DELIMITER);
        let name = fields.next()?;
        let cost_text = fields.next()?;
        if fields.next().is_some() {
            return None;
        }
        Some(Self {
            raw,
            name: name.trim(),
            cost_text: cost_text.trim(),
        })
    }

    pub fn raw(&self) -> &'a str {
        self.raw
    }

    pub fn name(&self) -> &'a str {
        self.name
    }

    pub fn cost_text(&self) -> &'a str {
        self.cost_text
    }

    /// Energy cost of a valid card, or `None` when the name is blank or the
    /// cost is not an integer in `0..=MAX_COST`.
    pub fn energy_cost(&self) -> Option<u8> {
        if self.name.is_empty() {
            return None;
        }
        parse_cost(self.cost_text)
    }
}

fn parse_cost(text: &str) -> Option<u8> {
    let cost: i64 = text.parse().ok()?;
    u8::try_from(cost).ok().filter(|cost| *cost <= MAX_COST)
}

/// Classify a raw line, returning its energy cost when it is a valid card.
pub fn classify_line(line: &str) -> Option<u8> {
    CardRecord::split(line).and_then(|record| record.energy_cost())
}

/// Aggregated result of parsing one deck file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeckReport {
    deck_id: DeckId,
    total_cost: u64,
    valid_count: usize,
    cost_histogram: BTreeMap<u8, usize>,
    invalid_cards: Vec<String>,
}

impl DeckReport {
    pub fn deck_id(&self) -> DeckId {
        self.deck_id
    }

    /// Sum of the energy costs of all valid cards.
    pub fn total_cost(&self) -> u64 {
        self.total_cost
    }

    pub fn valid_count(&self) -> usize {
        self.valid_count
    }

    /// Number of valid cards per energy cost. Costs with no cards are absent.
    pub fn cost_histogram(&self) -> &BTreeMap<u8, usize> {
        &self.cost_histogram
    }

    /// Invalid lines, untrimmed, in file order.
    pub fn invalid_cards(&self) -> &[String] {
        &self.invalid_cards
    }

    pub(crate) fn into_parts(self) -> (DeckId, u64, BTreeMap<u8, usize>, Vec<String>) {
        (
            self.deck_id,
            self.total_cost,
            self.cost_histogram,
            self.invalid_cards,
        )
    }
}

#[derive(Debug, Default)]
struct Tally {
    total_cost: u64,
    valid_count: usize,
    cost_histogram: BTreeMap<u8, usize>,
    invalid_cards: Vec<String>,
}

impl Tally {
    fn record(mut self, line_no: usize, line: &str) -> Self {
        match classify_line(line) {
            Some(cost) => {
                self.total_cost += u64::from(cost);
                *self.cost_histogram.entry(cost).or_insert(0) += 1;
                self.valid_count += 1;
            }
            None => {
                log::debug!("line {}: invalid card {:?}", line_no, line);
                self.invalid_cards.push(line.to_string());
            }
        }
        self
    }

    fn finish(self, deck_id: DeckId) -> DeckReport {
        DeckReport {
            deck_id,
            total_cost: self.total_cost,
            valid_count: self.valid_count,
            cost_histogram: self.cost_histogram,
            invalid_cards: self.invalid_cards,
        }
    }
}

/// Line-oriented deck parser producing a [`DeckReport`].
#[derive(Debug, Clone, Copy)]
pub struct DeckParser {
    max_cards: usize,
}

impl Default for DeckParser {
    fn default() -> Self {
        Self::new(MAX_CARDS)
    }
}

impl DeckParser {
    /// Create a parser that evaluates at most `max_cards` lines.
    pub fn new(max_cards: usize) -> Self {
        Self { max_cards }
    }

    pub fn max_cards(&self) -> usize {
        self.max_cards
    }

    /// Tally `lines` under a freshly drawn [`DeckId`].
    pub fn parse<I, S>(&self, lines: I) -> DeckReport
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.parse_with_id(lines, DeckId::random())
    }

    /// Tally `lines` under a caller-provided identifier.
    ///
    /// Lines past the cap are never evaluated.
    pub fn parse_with_id<I, S>(&self, lines: I, deck_id: DeckId) -> DeckReport
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let report = lines
            .into_iter()
            .take(self.max_cards)
            .enumerate()
            .fold(Tally::default(), |tally, (idx, line)| {
                tally.record(idx + 1, line.as_ref())
            })
            .finish(deck_id);
        log::info!(
            "deck {}: {} valid card(s), {} invalid, total cost {}",
            report.deck_id,
            report.valid_count,
            report.invalid_cards.len(),
            report.total_cost
        );
        report
    }

    /// Read and tally a deck file.
    ///
    /// Only the first `max_cards` lines are read. Undecodable bytes become
    /// U+FFFD and the line is tallied as usual. Any I/O failure, including
    /// one partway through the file, discards the partial tally.
    pub fn parse_file(&self, path: &Path) -> Result<DeckReport, ReadError> {
        let read_error = |source| ReadError {
            path: path.to_path_buf(),
            source,
        };
        let file = OpenOptions::new()
            .read(true)
            .open(path)
            .map_err(read_error)?;
        let lines = read_lines(BufReader::new(file), self.max_cards).map_err(read_error)?;
        log::debug!("read {} line(s) from {}", lines.len(), path.display());
        Ok(self.parse(lines))
    }
}

/// Read up to `limit` lines, ending a line at `\n`, `\r\n` or a bare `\r`.
fn read_lines<R: BufRead>(mut reader: R, limit: usize) -> io::Result<Vec<String>> {
    let mut lines = Vec::new();
    let mut buf = Vec::new();
    while lines.len() < limit {
        buf.clear();
        if reader.read_until(b'\n', &mut buf)? == 0 {
            break;
        }
        let mut chunk = buf.strip_suffix(b"\n").unwrap_or(&buf[..]);
        chunk = chunk.strip_suffix(b"\r").unwrap_or(chunk);
        for piece in chunk.split(|byte| *byte == b'\r') {
            if lines.len() == limit {
                break;
            }
            lines.push(String::from_utf8_lossy(piece).into_owned());
        }
    }
    Ok(lines)
}
