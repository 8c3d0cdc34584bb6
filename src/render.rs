//! Output artifacts for a [`RenderableReport`].

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;

use crate::report::{RenderableReport, ReportBody};

/// Failure while producing a report artifact.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("failed to create output directory {}", path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to write {}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to encode image {}", path.display())]
    Image {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    #[error("failed to serialize report")]
    Json(#[from] serde_json::Error),
    #[error("report needs {needed}px of page height but only {available}px are available")]
    PageOverflow { needed: u64, available: u64 },
}

/// Writes a report to a file in one output format.
pub trait ReportRenderer {
    /// File extension used in the report name.
    fn extension(&self) -> &'static str;
    fn render(&self, report: &RenderableReport, path: &Path) -> Result<(), RenderError>;
}

/// Render `report` into `dir` under its conventional name, returning the written path.
pub fn write_report(
    renderer: &dyn ReportRenderer,
    report: &RenderableReport,
    dir: &Path,
) -> Result<PathBuf, RenderError> {
    fs::create_dir_all(dir).map_err(|source| RenderError::CreateDir {
        path: dir.to_path_buf(),
        source,
    })?;
    let path = dir.join(report.file_name(renderer.extension()));
    renderer.render(report, &path)?;
    log::info!("wrote report {}", path.display());
    Ok(path)
}

/// Plain text, one report line per text line.
#[derive(Debug, Default, Clone, Copy)]
pub struct TextRenderer;

impl TextRenderer {
    pub fn to_string(report: &RenderableReport) -> String {
        let mut output = String::new();
        for line in report.lines() {
            output.push_str(&line.text);
            output.push('\n');
        }
        output
    }
}

impl ReportRenderer for TextRenderer {
    fn extension(&self) -> &'static str {
        "txt"
    }

    fn render(&self, report: &RenderableReport, path: &Path) -> Result<(), RenderError> {
        fs::write(path, Self::to_string(report)).map_err(|source| RenderError::Write {
            path: path.to_path_buf(),
            source,
        })
    }
}

#[derive(Debug, Serialize)]
struct JsonReport<'a> {
    deck_id: String,
    total_cost: u64,
    void: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    cost_histogram: Option<&'a BTreeMap<u8, usize>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    invalid_cards: Option<&'a [String]>,
    generated_at: DateTime<Utc>,
}

/// Pretty-printed JSON document.
#[derive(Debug, Default, Clone, Copy)]
pub struct JsonRenderer;

impl JsonRenderer {
    pub fn to_string(report: &RenderableReport) -> Result<String, RenderError> {
        let (cost_histogram, invalid_cards) = match report.body() {
            ReportBody::Void => (None, None),
            ReportBody::Detail {
                cost_histogram,
                invalid_cards,
            } => (Some(cost_histogram), Some(invalid_cards.as_slice())),
        };
        let document = JsonReport {
            deck_id: report.deck_id().to_string(),
            total_cost: report.total_cost(),
            void: report.is_void(),
            cost_histogram,
            invalid_cards,
            generated_at: Utc::now(),
        };
        Ok(serde_json::to_string_pretty(&document)?)
    }
}

impl ReportRenderer for JsonRenderer {
    fn extension(&self) -> &'static str {
        "json"
    }

    fn render(&self, report: &RenderableReport, path: &Path) -> Result<(), RenderError> {
        let mut content = Self::to_string(report)?;
        content.push('\n');
        fs::write(path, content).map_err(|source| RenderError::Write {
            path: path.to_path_buf(),
            source,
        })
    }
}
