//! Report generation (`spiredeck tally ...`).

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use spiredeck::{
    ImageRenderOptions, ImageRenderer, JsonRenderer, ReportRenderer, TallyLimits, TextRenderer,
    write_report,
};

use crate::cli::common::{LimitArgs, OutputFormatArg, PageLayoutArg, ReportStyleArg};
use crate::cli::utils::{load_report, resolve_deck_path};

/// Arguments for `spiredeck tally`.
#[derive(Args, Debug)]
pub struct TallyArgs {
    /// Deck file to tally (prompted for when omitted).
    pub deck: Option<PathBuf>,
    /// Directory the report is written into.
    #[arg(short = 'o', long = "output-dir", default_value = ".")]
    pub output_dir: PathBuf,
    /// Report format.
    #[arg(long, default_value_t = OutputFormatArg::Png, value_enum)]
    pub format: OutputFormatArg,
    /// Page style for PNG reports.
    #[arg(long, default_value_t = ReportStyleArg::Parchment, value_enum)]
    pub style: ReportStyleArg,
    /// Page layout for PNG reports.
    #[arg(long, default_value_t = PageLayoutArg::A4, value_enum)]
    pub layout: PageLayoutArg,
    /// Dots per inch used when rasterising PNG reports.
    #[arg(long, default_value_t = 150)]
    pub dpi: u32,
    #[command(flatten)]
    pub limits: LimitArgs,
}

impl TallyArgs {
    fn renderer(&self) -> Box<dyn ReportRenderer> {
        match self.format {
            OutputFormatArg::Png => Box::new(ImageRenderer::new(ImageRenderOptions {
                style: self.style.into(),
                dpi: self.dpi,
                layout: self.layout.into(),
            })),
            OutputFormatArg::Text => Box::new(TextRenderer),
            OutputFormatArg::Json => Box::new(JsonRenderer),
        }
    }
}

/// Execute `spiredeck tally`.
///
/// Read failures abort before anything is written. Render failures are
/// reported on stderr and the command still succeeds.
pub fn handle(args: TallyArgs) -> Result<()> {
    let limits: TallyLimits = args.limits.into();
    let deck_path = resolve_deck_path(args.deck.clone())?;
    let parsed = load_report(&deck_path, &limits)?;
    let report = limits.builder().build(parsed);

    let renderer = args.renderer();
    match write_report(renderer.as_ref(), &report, &args.output_dir) {
        Ok(path) => {
            let status = if report.is_void() { " (void)" } else { "" };
            println!(
                "Wrote report for deck {}{} to {}",
                report.deck_id(),
                status,
                path.display()
            );
        }
        Err(err) => {
            log::debug!("render failed for deck {}: {:?}", report.deck_id(), err);
            eprintln!("Error generating report: {:#}", anyhow::Error::from(err));
        }
    }
    Ok(())
}
