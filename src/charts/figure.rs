//! Chart Figures
//! Validates the columns a chart needs and reshapes the table into drawable data.

use super::{ChartKind, RenderError};
use crate::catalog::DatasetKind;
use crate::data::{
    columns, format_percentage_label, CategoryCount, CrossTab, DataProcessor, LabeledValue,
    PairedRow, StackedBars,
};
use polars::prelude::DataFrame;

/// Drawable content of one chart.
#[derive(Debug, Clone, PartialEq)]
pub enum FigureBody {
    Pie {
        slices: Vec<CategoryCount>,
        legend_title: String,
    },
    Heatmap {
        table: CrossTab,
    },
    /// One bar per category with a text annotation above it.
    Bars {
        values: Vec<LabeledValue>,
        annotations: Vec<String>,
    },
    Stacked {
        bars: StackedBars,
        legend_title: String,
    },
    /// Side-by-side series per category, annotated with the raw integers.
    Grouped {
        rows: Vec<PairedRow>,
        legend_title: String,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChartFigure {
    pub kind: ChartKind,
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub body: FigureBody,
}

impl ChartFigure {
    /// Reshape `df` for `kind`; fails when a required column is absent.
    pub fn build(
        kind: ChartKind,
        dataset: DatasetKind,
        df: &DataFrame,
        title: &str,
        grouping: Option<&str>,
    ) -> Result<Self, RenderError> {
        let figure = |x_label: &str, y_label: &str, body: FigureBody| ChartFigure {
            kind,
            title: title.to_string(),
            x_label: x_label.to_string(),
            y_label: y_label.to_string(),
            body,
        };

        match kind {
            ChartKind::Pie => {
                let slices = DataProcessor::value_counts(df, columns::DECLINE_REASON)?;
                Ok(figure(
                    "",
                    "",
                    FigureBody::Pie {
                        slices,
                        legend_title: "Decline Reasons".to_string(),
                    },
                ))
            }
            ChartKind::Heatmap => {
                DataProcessor::require_columns(df, &[columns::LOCATION, columns::DECLINE_REASON])?;
                let table = DataProcessor::crosstab(df, columns::LOCATION, columns::DECLINE_REASON)?;
                Ok(figure("Decline Consent", "Location", FigureBody::Heatmap { table }))
            }
            ChartKind::LocationBarStacked => {
                let (bars, legend_title) = match dataset {
                    DatasetKind::DeclinedConsent => {
                        DataProcessor::require_columns(
                            df,
                            &[columns::LOCATION, columns::DECLINE_REASON],
                        )?;
                        let tab =
                            DataProcessor::crosstab(df, columns::LOCATION, columns::DECLINE_REASON)?;
                        (tab.into_stacked(), "Decline Reason")
                    }
                    _ => (DataProcessor::wide_counts(df, columns::LOCATION)?, "Status"),
                };
                Ok(figure(
                    "Location",
                    "Count",
                    FigureBody::Stacked {
                        bars,
                        legend_title: legend_title.to_string(),
                    },
                ))
            }
            ChartKind::DistrictBarCount => {
                DataProcessor::require_columns(df, &[columns::DISTRICT, columns::DECLINE_REASON])?;
                let values =
                    DataProcessor::group_count(df, columns::DISTRICT, columns::DECLINE_REASON)?;
                let annotations = values.iter().map(|v| format!("{:.0}", v.value)).collect();
                Ok(figure(
                    "Sub County",
                    "Declined Consent",
                    FigureBody::Bars {
                        values,
                        annotations,
                    },
                ))
            }
            ChartKind::DistrictBarPercentage => {
                DataProcessor::require_columns(df, &[columns::DISTRICT, columns::TOTAL])?;
                let values = DataProcessor::percentages(df, columns::DISTRICT, columns::TOTAL)?;
                let annotations = values
                    .iter()
                    .map(|v| format_percentage_label(v.value))
                    .collect();
                Ok(figure(
                    "Sub County",
                    "Percentage",
                    FigureBody::Bars {
                        values,
                        annotations,
                    },
                ))
            }
            ChartKind::ValuesBarPaired => {
                let grouping = grouping.ok_or(RenderError::MissingGrouping)?;
                let rows = DataProcessor::paired_values(df, grouping)?;
                Ok(figure(
                    grouping,
                    "Values",
                    FigureBody::Grouped {
                        rows,
                        legend_title: "Visit".to_string(),
                    },
                ))
            }
            ChartKind::SummaryBar => {
                let values = DataProcessor::summary_percentages(df)?;
                let annotations = values.iter().map(|v| format!("{}%", v.value as i64)).collect();
                Ok(figure(
                    "HH Variables",
                    "Mismatch %",
                    FigureBody::Bars {
                        values,
                        annotations,
                    },
                ))
            }
        }
    }

    /// Category labels along the x axis, where the figure has one.
    pub fn categories(&self) -> Vec<String> {
        match &self.body {
            FigureBody::Pie { slices, .. } => slices.iter().map(|s| s.label.clone()).collect(),
            FigureBody::Heatmap { table } => table.columns.clone(),
            FigureBody::Bars { values, .. } => values.iter().map(|v| v.label.clone()).collect(),
            FigureBody::Stacked { bars, .. } => bars.categories.clone(),
            FigureBody::Grouped { rows, .. } => rows.iter().map(|r| r.category.clone()).collect(),
        }
    }
}

/// Share of each slice in percent; sums to 100 for a non-empty pie.
pub fn pie_percentages(slices: &[CategoryCount]) -> Vec<f64> {
    let total: u64 = slices.iter().map(|s| s.count).sum();
    if total == 0 {
        return vec![0.0; slices.len()];
    }
    slices
        .iter()
        .map(|s| s.count as f64 * 100.0 / total as f64)
        .collect()
}
