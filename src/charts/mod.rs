//! Charts module - figure building, drawing and rendering

mod figure;
mod palette;
mod plotter;
mod renderer;

pub use palette::Palette;
pub use plotter::ChartPlotter;
pub use renderer::{render_pass, ChartOutcome, ChartRenderer};

use crate::catalog::{slugify, DatasetEntry, DatasetKind, Region};
use crate::data::{LoaderError, ProcessorError};
use image::RgbImage;
use std::fmt;
use thiserror::Error;

/// The fixed set of chart types the dashboard can draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ChartKind {
    Pie,
    Heatmap,
    LocationBarStacked,
    DistrictBarCount,
    DistrictBarPercentage,
    ValuesBarPaired,
    SummaryBar,
}

impl ChartKind {
    /// File-name fragment, unique among the charts of one dataset.
    pub fn slug(self) -> &'static str {
        match self {
            ChartKind::Pie => "pie_chart",
            ChartKind::Heatmap => "heatmap",
            ChartKind::LocationBarStacked => "by_location",
            ChartKind::DistrictBarCount => "by_sub_county",
            ChartKind::DistrictBarPercentage => "by_sub_county",
            ChartKind::ValuesBarPaired => "frequencies",
            ChartKind::SummaryBar => "summary",
        }
    }

    /// Checkbox text for this chart on a dataset.
    pub fn toggle_label(self, entry: &DatasetEntry) -> String {
        let label = &entry.label;
        match (self, entry.kind) {
            (ChartKind::Pie, _) => "Pie Chart".to_string(),
            (ChartKind::Heatmap, _) => "Heatmap".to_string(),
            (ChartKind::LocationBarStacked, DatasetKind::DeclinedConsent) => {
                "Location Bar Chart".to_string()
            }
            (ChartKind::DistrictBarCount, _) => "Sub County Bar Chart".to_string(),
            (ChartKind::LocationBarStacked, _) => format!("{} by Location", label),
            (ChartKind::DistrictBarPercentage, _) => format!("{} by Sub County", label),
            (ChartKind::ValuesBarPaired, _) => format!("{} Frequencies", label),
            (ChartKind::SummaryBar, _) => "Summary Bar Chart".to_string(),
        }
    }

    /// Title drawn on the chart.
    pub fn title(self, entry: &DatasetEntry) -> String {
        match (self, entry.kind) {
            (ChartKind::Pie, _) => "Distribution of Declined Reasons".to_string(),
            (ChartKind::Heatmap, _) => {
                "Heatmap of Decline Consent Counts for Each Location".to_string()
            }
            (ChartKind::LocationBarStacked, DatasetKind::DeclinedConsent) => {
                "Count of Each Decline Reason for Each Location".to_string()
            }
            (ChartKind::DistrictBarCount, _) => {
                "Distribution of Decline Reason Counts for Each Sub County".to_string()
            }
            (ChartKind::SummaryBar, _) => "Summary of HH Variables".to_string(),
            _ => self.toggle_label(entry),
        }
    }

    /// Download name: `<region>_<dataset>_<chart>.png`.
    pub fn file_name(self, region: Region, entry: &DatasetEntry) -> String {
        format!(
            "{}_{}_{}.png",
            region.slug(),
            slugify(&entry.label),
            self.slug()
        )
    }
}

impl fmt::Display for ChartKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ChartKind::Pie => "Pie",
            ChartKind::Heatmap => "Heatmap",
            ChartKind::LocationBarStacked => "Location Bar (stacked)",
            ChartKind::DistrictBarCount => "Sub County Bar (count)",
            ChartKind::DistrictBarPercentage => "Sub County Bar (percentage)",
            ChartKind::ValuesBarPaired => "Frequencies (paired)",
            ChartKind::SummaryBar => "Summary Bar",
        };
        f.write_str(name)
    }
}

#[derive(Error, Debug)]
pub enum RenderError {
    #[error(transparent)]
    Data(#[from] ProcessorError),
    #[error(transparent)]
    Load(#[from] LoaderError),
    #[error("{0} is not available for this dataset")]
    NotApplicable(ChartKind),
    #[error("Frequencies chart needs a grouping column")]
    MissingGrouping,
    #[error("Drawing failed: {0}")]
    Draw(String),
}

impl RenderError {
    /// True when the table lacks a column the chart needs.
    pub fn is_missing_column(&self) -> bool {
        matches!(self, RenderError::Data(ProcessorError::MissingColumn(_)))
    }
}

/// A rendered chart, independent of any shared drawing state.
#[derive(Clone)]
pub struct ChartArtifact {
    pub kind: ChartKind,
    pub title: String,
    pub file_name: String,
    pub image: RgbImage,
}

impl ChartArtifact {
    pub const MIME_TYPE: &'static str = "image/png";

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }
}

impl fmt::Debug for ChartArtifact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChartArtifact")
            .field("kind", &self.kind)
            .field("title", &self.title)
            .field("file_name", &self.file_name)
            .field("size", &(self.width(), self.height()))
            .finish()
    }
}
