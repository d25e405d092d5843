//! Data Processor Module
//! Reshapes loaded tables into chart-ready series (value counts, pivots, group-bys).

use polars::prelude::*;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use thiserror::Error;

/// Column names used by the TPQA tables.
pub mod columns {
    pub const DECLINE_REASON: &str = "DeclineReasonId";
    pub const LOCATION: &str = "LocationName";
    pub const DISTRICT: &str = "DistrictName";
    pub const TOTAL: &str = "Total";
    pub const FIRST_VISIT: &str = "First_visit";
    pub const SECOND_VISIT: &str = "Second_visit";
    pub const SUMMARY_VARIABLE: &str = "HH Variable";
    pub const SUMMARY_PERCENTAGE: &str = "Percentage";
}

/// Category value marking a summary row rather than data.
pub const TOTAL_ROW: &str = "Total";

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ProcessorError {
    #[error("Column '{0}' does not exist in the dataset.")]
    MissingColumn(String),
    #[error("Column '{column}' has an unreadable value '{value}'")]
    InvalidValue { column: String, value: String },
    #[error("Column '{0}' has no values to plot")]
    NoRows(String),
    #[error("Table has no numeric columns besides '{0}'")]
    NoNumericColumns(String),
}

/// Occurrences of one category.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryCount {
    pub label: String,
    pub count: u64,
}

/// One bar: a category and its height.
#[derive(Debug, Clone, PartialEq)]
pub struct LabeledValue {
    pub label: String,
    pub value: f64,
}

/// Two-way count table, both axes in sorted order, zero-filled.
#[derive(Debug, Clone, PartialEq)]
pub struct CrossTab {
    pub rows: Vec<String>,
    pub columns: Vec<String>,
    /// `counts[row][column]`
    pub counts: Vec<Vec<u64>>,
}

impl CrossTab {
    pub fn total(&self) -> u64 {
        self.counts.iter().flatten().sum()
    }

    pub fn max(&self) -> u64 {
        self.counts.iter().flatten().copied().max().unwrap_or(0)
    }

    /// One stacked series per column.
    pub fn into_stacked(self) -> StackedBars {
        let series = self
            .columns
            .iter()
            .enumerate()
            .map(|(c, name)| BarSeries {
                name: name.clone(),
                values: self.counts.iter().map(|row| row[c] as f64).collect(),
            })
            .collect();
        StackedBars {
            categories: self.rows,
            series,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BarSeries {
    pub name: String,
    pub values: Vec<f64>,
}

/// Categories with one value per series each.
#[derive(Debug, Clone, PartialEq)]
pub struct StackedBars {
    pub categories: Vec<String>,
    pub series: Vec<BarSeries>,
}

impl StackedBars {
    /// Height of the tallest stack.
    pub fn max_stack(&self) -> f64 {
        (0..self.categories.len())
            .map(|i| self.series.iter().map(|s| s.values[i]).sum::<f64>())
            .fold(0.0, f64::max)
    }
}

/// First and second visit counts for one category.
#[derive(Debug, Clone, PartialEq)]
pub struct PairedRow {
    pub category: String,
    pub first: i64,
    pub second: i64,
}

/// Handles data reshaping for every chart kind.
pub struct DataProcessor;

impl DataProcessor {
    /// Count each distinct value, most frequent first; ties keep first-appearance order.
    pub fn value_counts(df: &DataFrame, column: &str) -> Result<Vec<CategoryCount>, ProcessorError> {
        let values = text_values(df, column)?;
        let mut index: HashMap<String, usize> = HashMap::new();
        let mut counts: Vec<CategoryCount> = Vec::new();

        for value in values.into_iter().flatten() {
            match index.get(&value) {
                Some(&i) => counts[i].count += 1,
                None => {
                    index.insert(value.clone(), counts.len());
                    counts.push(CategoryCount {
                        label: value,
                        count: 1,
                    });
                }
            }
        }

        if counts.is_empty() {
            return Err(ProcessorError::NoRows(column.to_string()));
        }
        counts.sort_by(|a, b| b.count.cmp(&a.count));
        Ok(counts)
    }

    /// Cross-tabulate two categorical columns; rows with a null in either are skipped.
    pub fn crosstab(
        df: &DataFrame,
        row_col: &str,
        column_col: &str,
    ) -> Result<CrossTab, ProcessorError> {
        let row_values = text_values(df, row_col)?;
        let column_values = text_values(df, column_col)?;

        let numeric_rows = is_numeric(require(df, row_col)?.dtype());
        let numeric_cols = is_numeric(require(df, column_col)?.dtype());

        let mut cells: BTreeMap<(String, String), u64> = BTreeMap::new();
        let mut rows: BTreeSet<String> = BTreeSet::new();
        let mut cols: BTreeSet<String> = BTreeSet::new();

        for (r, c) in row_values.into_iter().zip(column_values) {
            if let (Some(r), Some(c)) = (r, c) {
                rows.insert(r.clone());
                cols.insert(c.clone());
                *cells.entry((r, c)).or_insert(0) += 1;
            }
        }

        if rows.is_empty() {
            return Err(ProcessorError::NoRows(row_col.to_string()));
        }

        let rows = sorted_labels(rows, numeric_rows);
        let columns = sorted_labels(cols, numeric_cols);
        let counts = rows
            .iter()
            .map(|r| {
                columns
                    .iter()
                    .map(|c| cells.get(&(r.clone(), c.clone())).copied().unwrap_or(0))
                    .collect()
            })
            .collect();

        Ok(CrossTab {
            rows,
            columns,
            counts,
        })
    }

    /// Count non-null `value_col` entries per group, groups sorted.
    pub fn group_count(
        df: &DataFrame,
        group_col: &str,
        value_col: &str,
    ) -> Result<Vec<LabeledValue>, ProcessorError> {
        let groups = text_values(df, group_col)?;
        let values = text_values(df, value_col)?;

        let mut counts: BTreeMap<String, u64> = BTreeMap::new();
        for (g, v) in groups.into_iter().zip(values) {
            if let Some(g) = g {
                let entry = counts.entry(g).or_insert(0);
                if v.is_some() {
                    *entry += 1;
                }
            }
        }

        if counts.is_empty() {
            return Err(ProcessorError::NoRows(group_col.to_string()));
        }
        Ok(counts
            .into_iter()
            .map(|(label, count)| LabeledValue {
                label,
                value: count as f64,
            })
            .collect())
    }

    /// Percentage per group as a fraction; duplicate groups are averaged.
    ///
    /// A text column holds percent points (`"45%"` or `"45"`); a numeric
    /// column holds fractions such as `0.45`.
    pub fn percentages(
        df: &DataFrame,
        group_col: &str,
        value_col: &str,
    ) -> Result<Vec<LabeledValue>, ProcessorError> {
        let groups = text_values(df, group_col)?;
        let column = require(df, value_col)?;

        let mut index: HashMap<String, usize> = HashMap::new();
        let mut sums: Vec<(String, f64, u32)> = Vec::new();

        for (i, group) in groups.into_iter().enumerate() {
            let Some(group) = group else { continue };
            let cell = column.get(i).unwrap_or(AnyValue::Null);
            let Some(fraction) = parse_fraction(&cell, value_col)? else {
                continue;
            };
            match index.get(&group) {
                Some(&at) => {
                    sums[at].1 += fraction;
                    sums[at].2 += 1;
                }
                None => {
                    index.insert(group.clone(), sums.len());
                    sums.push((group, fraction, 1));
                }
            }
        }

        if sums.is_empty() {
            return Err(ProcessorError::NoRows(value_col.to_string()));
        }
        Ok(sums
            .into_iter()
            .map(|(label, sum, n)| LabeledValue {
                label,
                value: sum / n as f64,
            })
            .collect())
    }

    /// Numeric columns of a pre-aggregated table, stacked per `index_col` value.
    ///
    /// The `"Total"` row is excluded; null cells count as zero.
    pub fn wide_counts(df: &DataFrame, index_col: &str) -> Result<StackedBars, ProcessorError> {
        let index = text_values(df, index_col)?;
        let keep: Vec<usize> = index
            .iter()
            .enumerate()
            .filter(|(_, v)| matches!(v, Some(v) if v != TOTAL_ROW))
            .map(|(i, _)| i)
            .collect();

        let series: Vec<BarSeries> = df
            .get_columns()
            .iter()
            .filter(|c| c.name().as_str() != index_col && is_numeric(c.dtype()))
            .map(|c| BarSeries {
                name: c.name().to_string(),
                values: keep
                    .iter()
                    .map(|&i| c.get(i).ok().and_then(|v| any_number(&v)).unwrap_or(0.0))
                    .collect(),
            })
            .collect();

        if series.is_empty() {
            return Err(ProcessorError::NoNumericColumns(index_col.to_string()));
        }
        if keep.is_empty() {
            return Err(ProcessorError::NoRows(index_col.to_string()));
        }

        let categories = keep
            .iter()
            .filter_map(|&i| index[i].clone())
            .collect();
        Ok(StackedBars { categories, series })
    }

    /// First/second visit counts per category of `variable`, without the `"Total"` row.
    pub fn paired_values(df: &DataFrame, variable: &str) -> Result<Vec<PairedRow>, ProcessorError> {
        let categories = text_values(df, variable)?;
        let first = require(df, columns::FIRST_VISIT)?;
        let second = require(df, columns::SECOND_VISIT)?;

        let count_at = |column: &Column, name: &str, i: usize| -> Result<i64, ProcessorError> {
            let cell = column.get(i).unwrap_or(AnyValue::Null);
            match cell {
                AnyValue::Null => Ok(0),
                ref v => any_number(v)
                    .map(|n| n.round() as i64)
                    .ok_or_else(|| ProcessorError::InvalidValue {
                        column: name.to_string(),
                        value: any_text(v).unwrap_or_default(),
                    }),
            }
        };

        let mut rows = Vec::new();
        for (i, category) in categories.into_iter().enumerate() {
            let Some(category) = category else { continue };
            if category == TOTAL_ROW {
                continue;
            }
            rows.push(PairedRow {
                category,
                first: count_at(first, columns::FIRST_VISIT, i)?,
                second: count_at(second, columns::SECOND_VISIT, i)?,
            });
        }

        if rows.is_empty() {
            return Err(ProcessorError::NoRows(variable.to_string()));
        }
        Ok(rows)
    }

    /// County summary: whole-number mismatch percentage per household variable.
    pub fn summary_percentages(df: &DataFrame) -> Result<Vec<LabeledValue>, ProcessorError> {
        let labels = text_values(df, columns::SUMMARY_VARIABLE)?;
        let column = require(df, columns::SUMMARY_PERCENTAGE)?;

        let mut out = Vec::new();
        for (i, label) in labels.into_iter().enumerate() {
            let Some(label) = label else { continue };
            let cell = column.get(i).unwrap_or(AnyValue::Null);
            let value = match &cell {
                AnyValue::Null => continue,
                AnyValue::String(s) => parse_number(s.trim().trim_end_matches('%')),
                AnyValue::StringOwned(s) => parse_number(s.trim().trim_end_matches('%')),
                other => any_number(other),
            }
            .ok_or_else(|| ProcessorError::InvalidValue {
                column: columns::SUMMARY_PERCENTAGE.to_string(),
                value: any_text(&cell).unwrap_or_default(),
            })?;
            out.push(LabeledValue {
                label,
                value: value.trunc(),
            });
        }

        if out.is_empty() {
            return Err(ProcessorError::NoRows(columns::SUMMARY_PERCENTAGE.to_string()));
        }
        Ok(out)
    }

    /// Check that every named column exists.
    pub fn require_columns(df: &DataFrame, names: &[&str]) -> Result<(), ProcessorError> {
        for name in names {
            require(df, name)?;
        }
        Ok(())
    }
}

/// Annotation text for a fraction: `0.45` → `"45.0%"`.
pub fn format_percentage_label(fraction: f64) -> String {
    format!("{:.1}%", fraction * 100.0)
}

/// Normalize a percentage cell to a fraction.
///
/// Text cells are percent points with or without the `%` sign: `"45%"` and
/// `"45"` both give 0.45. Numeric cells are already fractions.
pub fn parse_fraction(cell: &AnyValue, column: &str) -> Result<Option<f64>, ProcessorError> {
    let invalid = |value: &str| ProcessorError::InvalidValue {
        column: column.to_string(),
        value: value.to_string(),
    };
    let from_text = |text: &str| -> Result<Option<f64>, ProcessorError> {
        let text = text.trim();
        if text.is_empty() {
            return Ok(None);
        }
        let points = text.strip_suffix('%').unwrap_or(text).trim();
        parse_number(points)
            .map(|v| Some(v / 100.0))
            .ok_or_else(|| invalid(text))
    };

    match cell {
        AnyValue::Null => Ok(None),
        AnyValue::String(s) => from_text(s),
        AnyValue::StringOwned(s) => from_text(s.as_str()),
        other => any_number(other)
            .map(Some)
            .ok_or_else(|| invalid(&other.to_string())),
    }
}

/// Labels of a numeric column sort by value, so codes read `1, 2, 10`.
fn sorted_labels(labels: BTreeSet<String>, numeric: bool) -> Vec<String> {
    let mut labels: Vec<String> = labels.into_iter().collect();
    if numeric {
        labels.sort_by(|a, b| {
            let (x, y) = (parse_number(a), parse_number(b));
            x.partial_cmp(&y)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.cmp(b))
        });
    }
    labels
}

fn parse_number(text: &str) -> Option<f64> {
    text.parse::<f64>().ok().filter(|v| v.is_finite())
}

fn require<'a>(df: &'a DataFrame, name: &str) -> Result<&'a Column, ProcessorError> {
    df.column(name)
        .map_err(|_| ProcessorError::MissingColumn(name.to_string()))
}

/// Cell values of a column as trimmed text; empty strings read as null.
fn text_values(df: &DataFrame, name: &str) -> Result<Vec<Option<String>>, ProcessorError> {
    let column = require(df, name)?;
    Ok((0..column.len())
        .map(|i| column.get(i).ok().and_then(|v| any_text(&v)))
        .collect())
}

fn any_text(value: &AnyValue) -> Option<String> {
    let text = match value {
        AnyValue::Null => return None,
        AnyValue::String(s) => s.trim().to_string(),
        AnyValue::StringOwned(s) => s.as_str().trim().to_string(),
        AnyValue::Float64(f) if f.is_nan() => return None,
        AnyValue::Float64(f) if f.fract() == 0.0 => format!("{}", *f as i64),
        AnyValue::Float32(f) if f.is_nan() => return None,
        AnyValue::Float32(f) if f.fract() == 0.0 => format!("{}", *f as i64),
        other => other.to_string().trim_matches('"').to_string(),
    };
    (!text.is_empty()).then_some(text)
}

fn any_number(value: &AnyValue) -> Option<f64> {
    match value {
        AnyValue::Null => None,
        AnyValue::String(s) => parse_number(s.trim()),
        AnyValue::StringOwned(s) => parse_number(s.as_str().trim()),
        AnyValue::Boolean(_) => None,
        other => other.extract::<f64>().filter(|v| v.is_finite()),
    }
}

fn is_numeric(dtype: &DataType) -> bool {
    matches!(
        dtype,
        DataType::Float32
            | DataType::Float64
            | DataType::Int8
            | DataType::Int16
            | DataType::Int32
            | DataType::Int64
            | DataType::UInt8
            | DataType::UInt16
            | DataType::UInt32
            | DataType::UInt64
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn consent() -> DataFrame {
        df!(
            "DistrictName" => ["Bobasi", "Bobasi", "Kitutu", "Kitutu", "Nyaribari", "Bobasi"],
            "LocationName" => [Some("Itierio"), Some("Itierio"), Some("Marani"), None, Some("Keumbu"), Some("Marani")],
            "DeclineReasonId" => [Some("Busy"), Some("Refused"), Some("Busy"), Some("Busy"), None, Some("Refused")]
        )
        .unwrap()
    }

    #[test]
    fn value_counts_cover_every_non_null_row() {
        let counts = DataProcessor::value_counts(&consent(), columns::DECLINE_REASON).unwrap();
        assert_eq!(counts.len(), 2);
        assert_eq!(counts[0].label, "Busy");
        assert_eq!(counts[0].count, 3);
        assert_eq!(counts.iter().map(|c| c.count).sum::<u64>(), 5);
    }

    #[test]
    fn value_counts_ties_keep_first_appearance() {
        let df = df!("r" => ["b", "a", "a", "b", "c"]).unwrap();
        let labels: Vec<String> = DataProcessor::value_counts(&df, "r")
            .unwrap()
            .into_iter()
            .map(|c| c.label)
            .collect();
        assert_eq!(labels, vec!["b", "a", "c"]);
    }

    #[test]
    fn value_counts_need_the_column() {
        let df = df!("Other" => ["x"]).unwrap();
        assert_eq!(
            DataProcessor::value_counts(&df, columns::DECLINE_REASON),
            Err(ProcessorError::MissingColumn("DeclineReasonId".to_string()))
        );
    }

    #[test]
    fn numeric_reason_codes_read_as_plain_labels() {
        let df = df!("DeclineReasonId" => [Some(1.0), Some(2.0), None, Some(1.0)]).unwrap();
        let counts = DataProcessor::value_counts(&df, columns::DECLINE_REASON).unwrap();
        assert_eq!(counts[0].label, "1");
        assert_eq!(counts[0].count, 2);
        assert_eq!(counts[1].label, "2");
    }

    #[test]
    fn crosstab_sums_to_complete_rows() {
        let tab =
            DataProcessor::crosstab(&consent(), columns::LOCATION, columns::DECLINE_REASON).unwrap();
        // Two rows have a null in one of the columns.
        assert_eq!(tab.total(), 4);
        assert_eq!(tab.rows, vec!["Itierio", "Marani"]);
        assert_eq!(tab.columns, vec!["Busy", "Refused"]);
        assert_eq!(tab.counts, vec![vec![1, 1], vec![1, 1]]);
        assert_eq!(tab.max(), 1);
    }

    #[test]
    fn crosstab_zero_fills_missing_pairs() {
        let df = df!(
            "LocationName" => ["A", "A", "B"],
            "DeclineReasonId" => ["x", "x", "y"]
        )
        .unwrap();
        let tab = DataProcessor::crosstab(&df, "LocationName", "DeclineReasonId").unwrap();
        assert_eq!(tab.counts, vec![vec![2, 0], vec![0, 1]]);

        let stacked = tab.into_stacked();
        assert_eq!(stacked.categories, vec!["A", "B"]);
        assert_eq!(stacked.series[0].name, "x");
        assert_eq!(stacked.series[0].values, vec![2.0, 0.0]);
        assert_eq!(stacked.max_stack(), 2.0);
    }

    #[test]
    fn crosstab_orders_numeric_codes_by_value() {
        let df = df!(
            "LocationName" => ["A", "A", "B"],
            "DeclineReasonId" => [1i64, 10, 2]
        )
        .unwrap();
        let tab = DataProcessor::crosstab(&df, "LocationName", "DeclineReasonId").unwrap();
        assert_eq!(tab.columns, vec!["1", "2", "10"]);
        assert_eq!(tab.counts, vec![vec![1, 0, 1], vec![0, 1, 0]]);
    }

    #[test]
    fn group_count_counts_non_null_reasons() {
        let counts =
            DataProcessor::group_count(&consent(), columns::DISTRICT, columns::DECLINE_REASON)
                .unwrap();
        let pairs: Vec<(&str, f64)> = counts.iter().map(|c| (c.label.as_str(), c.value)).collect();
        assert_eq!(pairs, vec![("Bobasi", 3.0), ("Kitutu", 2.0), ("Nyaribari", 0.0)]);
    }

    #[test]
    fn percent_strings_and_fractions_normalize_identically() {
        let strings = df!("DistrictName" => ["Bobasi"], "Total" => ["45%"]).unwrap();
        let fractions = df!("DistrictName" => ["Bobasi"], "Total" => [0.45]).unwrap();

        let a = DataProcessor::percentages(&strings, columns::DISTRICT, columns::TOTAL).unwrap();
        let b = DataProcessor::percentages(&fractions, columns::DISTRICT, columns::TOTAL).unwrap();
        assert!((a[0].value - 0.45).abs() < 1e-12);
        assert!((b[0].value - 0.45).abs() < 1e-12);
        assert_eq!(format_percentage_label(a[0].value), "45.0%");
        assert_eq!(format_percentage_label(b[0].value), "45.0%");
    }

    #[test]
    fn text_totals_without_percent_sign_are_percent_points() {
        let df = df!("DistrictName" => ["A", "B"], "Total" => ["45%", "100"]).unwrap();
        let labels: Vec<String> = DataProcessor::percentages(&df, "DistrictName", "Total")
            .unwrap()
            .iter()
            .map(|v| format_percentage_label(v.value))
            .collect();
        assert_eq!(labels, vec!["45.0%", "100.0%"]);
    }

    #[test]
    fn percentages_average_duplicates_and_skip_blanks() {
        let df = df!(
            "DistrictName" => ["A", "B", "A", "C"],
            "Total" => [Some("10%"), Some("20 %"), Some("30%"), None]
        )
        .unwrap();
        let values = DataProcessor::percentages(&df, "DistrictName", "Total").unwrap();
        assert_eq!(values.len(), 2);
        assert_eq!(values[0].label, "A");
        assert!((values[0].value - 0.2).abs() < 1e-12);
        assert!((values[1].value - 0.2).abs() < 1e-12);
    }

    #[test]
    fn percentages_report_garbage() {
        let df = df!("DistrictName" => ["A"], "Total" => ["n/a"]).unwrap();
        assert!(matches!(
            DataProcessor::percentages(&df, "DistrictName", "Total"),
            Err(ProcessorError::InvalidValue { .. })
        ));
    }

    #[test]
    fn wide_counts_drop_total_row_and_text_columns() {
        let df = df!(
            "LocationName" => ["Itierio", "Marani", "Total"],
            "Note" => ["a", "b", "c"],
            "Match" => [5i64, 7, 12],
            "Mismatch" => [Some(1i64), None, Some(1)]
        )
        .unwrap();
        let bars = DataProcessor::wide_counts(&df, columns::LOCATION).unwrap();
        assert_eq!(bars.categories, vec!["Itierio", "Marani"]);
        assert_eq!(bars.series.len(), 2);
        assert_eq!(bars.series[0].name, "Match");
        assert_eq!(bars.series[0].values, vec![5.0, 7.0]);
        assert_eq!(bars.series[1].values, vec![1.0, 0.0]);
    }

    #[test]
    fn wide_counts_need_numbers() {
        let df = df!("LocationName" => ["A"], "Note" => ["x"]).unwrap();
        assert_eq!(
            DataProcessor::wide_counts(&df, "LocationName"),
            Err(ProcessorError::NoNumericColumns("LocationName".to_string()))
        );
    }

    #[test]
    fn paired_values_exclude_total_and_keep_counts() {
        let df = df!(
            "Floor.x" => ["Earth", "Cement", "Total", "Tiles"],
            "First_visit" => [120i64, 40, 175, 15],
            "Second_visit" => [110i64, 52, 175, 13]
        )
        .unwrap();
        let rows = DataProcessor::paired_values(&df, "Floor.x").unwrap();
        assert_eq!(
            rows,
            vec![
                PairedRow { category: "Earth".into(), first: 120, second: 110 },
                PairedRow { category: "Cement".into(), first: 40, second: 52 },
                PairedRow { category: "Tiles".into(), first: 15, second: 13 },
            ]
        );
    }

    #[test]
    fn paired_values_need_the_grouping_column() {
        let df = df!("Roof.x" => ["Iron"], "First_visit" => [1i64], "Second_visit" => [2i64]).unwrap();
        assert_eq!(
            DataProcessor::paired_values(&df, "Floor.x"),
            Err(ProcessorError::MissingColumn("Floor.x".to_string()))
        );
    }

    #[test]
    fn summary_truncates_percentages() {
        let df = df!(
            "HH Variable" => ["HH Head ID Number", "Floor", "Any Disabled"],
            "Percentage" => [3.6, 15.5, 0.0]
        )
        .unwrap();
        let values = DataProcessor::summary_percentages(&df).unwrap();
        let got: Vec<f64> = values.iter().map(|v| v.value).collect();
        assert_eq!(got, vec![3.0, 15.0, 0.0]);
    }

    #[test]
    fn parse_fraction_handles_every_shape() {
        assert_eq!(parse_fraction(&AnyValue::String("12.5%"), "T").unwrap(), Some(0.125));
        assert_eq!(parse_fraction(&AnyValue::String("30"), "T").unwrap(), Some(0.3));
        assert_eq!(parse_fraction(&AnyValue::Float64(0.3), "T").unwrap(), Some(0.3));
        assert_eq!(parse_fraction(&AnyValue::Int64(1), "T").unwrap(), Some(1.0));
        assert_eq!(parse_fraction(&AnyValue::Null, "T").unwrap(), None);
        assert_eq!(parse_fraction(&AnyValue::String("  "), "T").unwrap(), None);
    }

    #[test]
    fn require_columns_names_the_first_missing() {
        let df = df!("DistrictName" => ["A"]).unwrap();
        assert!(DataProcessor::require_columns(&df, &["DistrictName"]).is_ok());
        assert_eq!(
            DataProcessor::require_columns(&df, &["DistrictName", "Total"]),
            Err(ProcessorError::MissingColumn("Total".to_string()))
        );
    }
}
