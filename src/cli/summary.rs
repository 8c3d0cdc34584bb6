//! Report preview on stdout (`spiredeck summary ...`).

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use spiredeck::{JsonRenderer, TallyLimits, TextRenderer};

use crate::cli::common::LimitArgs;
use crate::cli::utils::{load_report, resolve_deck_path};

/// Arguments for `spiredeck summary`.
#[derive(Args, Debug)]
pub struct SummaryArgs {
    /// Deck file to tally (prompted for when omitted).
    pub deck: Option<PathBuf>,
    /// Print the JSON document instead of report lines.
    #[arg(long)]
    pub json: bool,
    #[command(flatten)]
    pub limits: LimitArgs,
}

pub fn handle(args: SummaryArgs) -> Result<()> {
    let limits: TallyLimits = args.limits.into();
    let deck_path = resolve_deck_path(args.deck)?;
    let report = limits.builder().build(load_report(&deck_path, &limits)?);
    if args.json {
        println!("{}", JsonRenderer::to_string(&report)?);
    } else {
        print!("{}", TextRenderer::to_string(&report));
    }
    Ok(())
}
