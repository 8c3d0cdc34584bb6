//! Convenience helpers shared across command handlers.

use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use spiredeck::{DeckReport, TallyLimits};

const PROMPT: &str = "Enter the deck file name: ";

/// Use the deck path given on the command line, or ask for one on stdin.
pub fn resolve_deck_path(deck: Option<PathBuf>) -> Result<PathBuf> {
    if let Some(path) = deck {
        return Ok(path);
    }
    let stdin = io::stdin();
    prompt_deck_path(&mut stdin.lock(), &mut io::stdout())
}

/// Print the prompt to `output` and read a single path from `input`.
pub fn prompt_deck_path<R: BufRead, W: Write>(input: &mut R, output: &mut W) -> Result<PathBuf> {
    write!(output, "{}", PROMPT)?;
    output.flush()?;
    let mut line = String::new();
    input
        .read_line(&mut line)
        .context("failed to read deck file name from stdin")?;
    let name = line.trim_end_matches(['\n', '\r']);
    if name.is_empty() {
        return Err(anyhow!("no deck file name given"));
    }
    Ok(PathBuf::from(name))
}

/// Parse a deck file, attaching the operator-facing read error message.
pub fn load_report(path: &Path, limits: &TallyLimits) -> Result<DeckReport> {
    limits
        .parser()
        .parse_file(path)
        .context("Error reading the file")
}
