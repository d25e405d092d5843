//! Chart Plotter Module
//! Draws chart figures into an in-memory bitmap using plotters.
//!
//! Layout:
//! 1. Title centered at the top
//! 2. Plot area with category labels drawn under each bar / cell
//! 3. Legend (series labels, pie legend or heatmap color bar) on the right

use super::figure::{pie_percentages, ChartFigure, FigureBody};
use super::palette::{is_dark, Palette};
use super::renderer::ChartPainter;
use super::RenderError;
use crate::data::{CategoryCount, CrossTab, LabeledValue, PairedRow, StackedBars};
use image::RgbImage;
use plotters::coord::cartesian::Cartesian2d;
use plotters::coord::types::RangedCoordf64;
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use std::f64::consts::PI;

type Area<'b> = DrawingArea<BitMapBackend<'b>, Shift>;
type Chart<'a, 'b> = ChartContext<'a, BitMapBackend<'b>, Cartesian2d<RangedCoordf64, RangedCoordf64>>;
type DrawResult<T> = Result<T, Box<dyn std::error::Error>>;

const FONT: &str = "sans-serif";
// Bars occupy the middle 70% of their slot.
const BAR_MARGIN: f64 = 0.15;
// Matplotlib-style start angle for the first wedge, counterclockwise from 3 o'clock.
const PIE_START_DEGREES: f64 = 140.0;

/// Draws figures at a fixed pixel size with an explicit palette.
#[derive(Debug, Clone)]
pub struct ChartPlotter {
    width: u32,
    height: u32,
    palette: Palette,
}

impl ChartPlotter {
    pub fn new(width: u32, height: u32, palette: Palette) -> Self {
        Self {
            width: width.max(200),
            height: height.max(150),
            palette,
        }
    }

    fn draw(&self, root: &Area, figure: &ChartFigure) -> DrawResult<()> {
        root.fill(&WHITE)?;
        let area = root.titled(&figure.title, (FONT, 30).into_font().color(&BLACK))?;

        match &figure.body {
            FigureBody::Pie {
                slices,
                legend_title,
            } => self.draw_pie(&area, slices, legend_title),
            FigureBody::Heatmap { table } => self.draw_heatmap(&area, figure, table),
            FigureBody::Bars {
                values,
                annotations,
            } => self.draw_bars(&area, figure, values, annotations),
            FigureBody::Stacked { bars, legend_title } => {
                self.draw_stacked(&area, figure, bars, legend_title)
            }
            FigureBody::Grouped { rows, legend_title } => {
                self.draw_grouped(&area, figure, rows, legend_title)
            }
        }
    }

    fn draw_pie(&self, area: &Area, slices: &[CategoryCount], legend_title: &str) -> DrawResult<()> {
        let (w, _) = area.dim_in_pixel();
        let (chart_area, legend_area) = area.split_horizontally((w as f64 * 0.66) as u32);
        let (cw, ch) = chart_area.dim_in_pixel();
        let center = (cw as i32 / 2, ch as i32 / 2);
        let radius = cw.min(ch) as f64 * 0.36;

        let total: u64 = slices.iter().map(|s| s.count).sum();
        let percents = pie_percentages(slices);
        let mut start = PIE_START_DEGREES.to_radians();

        for (i, (slice, pct)) in slices.iter().zip(&percents).enumerate() {
            let sweep = 2.0 * PI * slice.count as f64 / total.max(1) as f64;
            let color = self.palette.color(i);

            let steps = ((sweep / (2.0 * PI)) * 180.0).ceil().max(2.0) as usize;
            let mut points = Vec::with_capacity(steps + 2);
            points.push(center);
            for s in 0..=steps {
                let angle = start + sweep * s as f64 / steps as f64;
                points.push(polar(center, radius, angle));
            }
            chart_area.draw(&Polygon::new(points, color.filled()))?;

            let mid = start + sweep / 2.0;
            let text_color = if is_dark(color) { &WHITE } else { &BLACK };
            chart_area.draw(&Text::new(
                format!("{:.1}%", pct),
                polar(center, radius * 0.62, mid),
                (FONT, 18)
                    .into_font()
                    .color(text_color)
                    .pos(Pos::new(HPos::Center, VPos::Center)),
            ))?;
            chart_area.draw(&Text::new(
                slice.label.clone(),
                polar(center, radius * 1.12, mid),
                (FONT, 20)
                    .into_font()
                    .color(&BLACK)
                    .pos(Pos::new(HPos::Center, VPos::Center)),
            ))?;

            start += sweep;
        }

        let entries: Vec<(String, RGBColor)> = slices
            .iter()
            .enumerate()
            .map(|(i, s)| (format!("{} ({})", s.label, s.count), self.palette.color(i)))
            .collect();
        draw_legend(&legend_area, legend_title, &entries, (10, ch as i32 / 3))
    }

    fn draw_heatmap(&self, area: &Area, figure: &ChartFigure, table: &CrossTab) -> DrawResult<()> {
        let (w, h) = area.dim_in_pixel();
        let (plot_area, bar_area) = area.split_horizontally(w.saturating_sub(140));

        let n_cols = table.columns.len().max(1) as f64;
        let n_rows = table.rows.len().max(1) as f64;
        let max = table.max().max(1) as f64;

        let mut chart = ChartBuilder::on(&plot_area)
            .margin(20)
            .x_label_area_size(label_area_size(&table.columns) + 30)
            .y_label_area_size(label_area_size(&table.rows) + 40)
            .build_cartesian_2d(0f64..n_cols, 0f64..n_rows)?;
        chart
            .configure_mesh()
            .disable_mesh()
            .x_label_formatter(&|_: &f64| String::new())
            .y_label_formatter(&|_: &f64| String::new())
            .draw()?;

        let cell_font = if table.rows.len() > 30 { 11 } else { 15 };
        for (r, counts) in table.counts.iter().enumerate() {
            // Row 0 sits at the top.
            let y = n_rows - r as f64 - 1.0;
            for (c, &count) in counts.iter().enumerate() {
                let x = c as f64;
                let color = self.palette.gradient(count as f64 / max);
                chart.draw_series(std::iter::once(Rectangle::new(
                    [(x, y), (x + 1.0, y + 1.0)],
                    color.filled(),
                )))?;
                let text_color = if is_dark(color) { &WHITE } else { &BLACK };
                chart.draw_series(std::iter::once(Text::new(
                    count.to_string(),
                    (x + 0.5, y + 0.5),
                    (FONT, cell_font)
                        .into_font()
                        .color(text_color)
                        .pos(Pos::new(HPos::Center, VPos::Center)),
                )))?;
            }
        }

        draw_x_labels(&plot_area, &chart, &table.columns)?;
        let base = plot_area.get_base_pixel();
        for (r, name) in table.rows.iter().enumerate() {
            let (px, py) = chart.backend_coord(&(0.0, n_rows - r as f64 - 0.5));
            plot_area.draw(&Text::new(
                name.clone(),
                (px - base.0 - 8, py - base.1),
                (FONT, 14)
                    .into_font()
                    .color(&BLACK)
                    .pos(Pos::new(HPos::Right, VPos::Center)),
            ))?;
        }
        draw_axis_titles(&plot_area, figure)?;

        // Color bar
        let steps = 40;
        let (top, bottom) = (40, h as i32 - 120);
        let step_h = ((bottom - top) as f64 / steps as f64).max(1.0);
        for s in 0..steps {
            let t = 1.0 - s as f64 / (steps - 1) as f64;
            let y0 = top + (s as f64 * step_h) as i32;
            let y1 = top + ((s + 1) as f64 * step_h) as i32;
            bar_area.draw(&Rectangle::new(
                [(20, y0), (50, y1)],
                self.palette.gradient(t).filled(),
            ))?;
        }
        let label_style = (FONT, 14)
            .into_font()
            .color(&BLACK)
            .pos(Pos::new(HPos::Left, VPos::Center));
        bar_area.draw(&Text::new(format!("{}", max as u64), (56, top), label_style.clone()))?;
        bar_area.draw(&Text::new("0".to_string(), (56, bottom), label_style.clone()))?;
        bar_area.draw(&Text::new("Count".to_string(), (20, top - 20), label_style.clone()))?;
        bar_area.draw(&Text::new(format!("n = {}", table.total()), (20, bottom + 24), label_style))?;
        Ok(())
    }

    fn draw_bars(
        &self,
        area: &Area,
        figure: &ChartFigure,
        values: &[LabeledValue],
        annotations: &[String],
    ) -> DrawResult<()> {
        let categories = figure.categories();
        let max = values.iter().map(|v| v.value).fold(0.0, f64::max);
        let mut chart = category_chart(area, &categories, headroom(max), None)?;

        chart.draw_series(values.iter().enumerate().map(|(i, v)| {
            let x = i as f64;
            Rectangle::new(
                [(x + BAR_MARGIN, 0.0), (x + 1.0 - BAR_MARGIN, v.value)],
                self.palette.color(i).filled(),
            )
        }))?;
        chart.draw_series(values.iter().zip(annotations).enumerate().map(|(i, (v, note))| {
            Text::new(
                note.clone(),
                (i as f64 + 0.5, v.value),
                (FONT, 15)
                    .into_font()
                    .color(&BLACK)
                    .pos(Pos::new(HPos::Center, VPos::Bottom)),
            )
        }))?;

        draw_x_labels(area, &chart, &categories)?;
        draw_axis_titles(area, figure)
    }

    fn draw_stacked(
        &self,
        area: &Area,
        figure: &ChartFigure,
        bars: &StackedBars,
        legend_title: &str,
    ) -> DrawResult<()> {
        let mut chart = category_chart(area, &bars.categories, headroom(bars.max_stack()), Some(legend_title))?;

        let mut bottoms = vec![0.0; bars.categories.len()];
        for (s, series) in bars.series.iter().enumerate() {
            let color = self.palette.color(s);
            let rects: Vec<Rectangle<(f64, f64)>> = series
                .values
                .iter()
                .enumerate()
                .map(|(i, &v)| {
                    let x = i as f64;
                    let rect = Rectangle::new(
                        [(x + BAR_MARGIN, bottoms[i]), (x + 1.0 - BAR_MARGIN, bottoms[i] + v)],
                        color.filled(),
                    );
                    bottoms[i] += v;
                    rect
                })
                .collect();
            chart
                .draw_series(rects)?
                .label(series.name.clone())
                .legend(move |(x, y)| Rectangle::new([(x, y - 6), (x + 14, y + 6)], color.filled()));
        }

        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::UpperRight)
            .background_style(&WHITE.mix(0.85))
            .border_style(&BLACK)
            .label_font((FONT, 15))
            .draw()?;

        draw_x_labels(area, &chart, &bars.categories)?;
        draw_axis_titles(area, figure)
    }

    fn draw_grouped(
        &self,
        area: &Area,
        figure: &ChartFigure,
        rows: &[PairedRow],
        legend_title: &str,
    ) -> DrawResult<()> {
        let categories = figure.categories();
        let max = rows
            .iter()
            .map(|r| r.first.max(r.second) as f64)
            .fold(0.0, f64::max);
        let mut chart = category_chart(area, &categories, headroom(max), Some(legend_title))?;

        let width = (1.0 - 2.0 * BAR_MARGIN) / 2.0;
        let series: [(&str, fn(&PairedRow) -> i64); 2] = [
            ("First visit", |r| r.first),
            ("Second visit", |r| r.second),
        ];
        for (k, (name, value_of)) in series.iter().enumerate() {
            let color = self.palette.color(k);
            let offset = BAR_MARGIN + width * k as f64;
            chart
                .draw_series(rows.iter().enumerate().map(|(i, r)| {
                    let x = i as f64 + offset;
                    Rectangle::new([(x, 0.0), (x + width, value_of(r) as f64)], color.filled())
                }))?
                .label(*name)
                .legend(move |(x, y)| Rectangle::new([(x, y - 6), (x + 14, y + 6)], color.filled()));
            chart.draw_series(rows.iter().enumerate().map(|(i, r)| {
                let value = value_of(r);
                Text::new(
                    value.to_string(),
                    (i as f64 + offset + width / 2.0, value as f64),
                    (FONT, 14)
                        .into_font()
                        .color(&BLACK)
                        .pos(Pos::new(HPos::Center, VPos::Bottom)),
                )
            }))?;
        }

        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::UpperRight)
            .background_style(&WHITE.mix(0.85))
            .border_style(&BLACK)
            .label_font((FONT, 15))
            .draw()?;

        draw_x_labels(area, &chart, &categories)?;
        draw_axis_titles(area, figure)
    }
}

impl ChartPainter for ChartPlotter {
    fn paint(&self, figure: &ChartFigure) -> Result<RgbImage, RenderError> {
        let (w, h) = (self.width, self.height);
        let mut buffer = vec![0u8; w as usize * h as usize * 3];
        {
            let root = BitMapBackend::with_buffer(&mut buffer, (w, h)).into_drawing_area();
            self.draw(&root, figure)
                .map_err(|e| RenderError::Draw(e.to_string()))?;
            root.present()
                .map_err(|e| RenderError::Draw(e.to_string()))?;
        }
        RgbImage::from_raw(w, h, buffer)
            .ok_or_else(|| RenderError::Draw("bitmap size mismatch".to_string()))
    }
}

/// Cartesian chart with one unit-wide slot per category and blank built-in x labels.
fn category_chart<'a, 'b>(
    area: &'a Area<'b>,
    categories: &[String],
    y_max: f64,
    legend_title: Option<&str>,
) -> DrawResult<Chart<'a, 'b>> {
    let n = categories.len().max(1) as f64;
    let mut builder = ChartBuilder::on(area);
    builder
        .margin(20)
        .margin_top(if legend_title.is_some() { 30 } else { 20 })
        .x_label_area_size(label_area_size(categories) + 30)
        .y_label_area_size(90);
    let mut chart = builder.build_cartesian_2d(0f64..n, 0f64..y_max)?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_label_formatter(&|_: &f64| String::new())
        .y_label_formatter(&|v: &f64| format_tick(*v))
        .label_style((FONT, 15))
        .draw()?;

    if let Some(title) = legend_title {
        let (w, _) = area.dim_in_pixel();
        area.draw(&Text::new(
            title.to_string(),
            (w as i32 - 30, 8),
            (FONT, 16)
                .into_font()
                .color(&BLACK)
                .pos(Pos::new(HPos::Right, VPos::Top)),
        ))?;
    }
    Ok(chart)
}

/// Category names under each slot, rotated when they would collide.
fn draw_x_labels(area: &Area<'_>, chart: &Chart<'_, '_>, categories: &[String]) -> DrawResult<()> {
    let base = area.get_base_pixel();
    let rotate = rotate_labels(categories);
    for (i, name) in categories.iter().enumerate() {
        let (px, py) = chart.backend_coord(&(i as f64 + 0.5, 0.0));
        let pos = (px - base.0, py - base.1 + 8);
        let style = if rotate {
            (FONT, 14)
                .into_font()
                .transform(FontTransform::Rotate90)
                .color(&BLACK)
                .pos(Pos::new(HPos::Left, VPos::Center))
        } else {
            (FONT, 15)
                .into_font()
                .color(&BLACK)
                .pos(Pos::new(HPos::Center, VPos::Top))
        };
        area.draw(&Text::new(name.clone(), pos, style))?;
    }
    Ok(())
}

fn draw_axis_titles(area: &Area, figure: &ChartFigure) -> DrawResult<()> {
    let (w, h) = area.dim_in_pixel();
    if !figure.x_label.is_empty() {
        area.draw(&Text::new(
            figure.x_label.clone(),
            (w as i32 / 2, h as i32 - 6),
            (FONT, 18)
                .into_font()
                .color(&BLACK)
                .pos(Pos::new(HPos::Center, VPos::Bottom)),
        ))?;
    }
    if !figure.y_label.is_empty() {
        area.draw(&Text::new(
            figure.y_label.clone(),
            (6, h as i32 / 2),
            (FONT, 18)
                .into_font()
                .transform(FontTransform::Rotate270)
                .color(&BLACK)
                .pos(Pos::new(HPos::Center, VPos::Top)),
        ))?;
    }
    Ok(())
}

fn draw_legend(
    area: &Area,
    title: &str,
    entries: &[(String, RGBColor)],
    origin: (i32, i32),
) -> DrawResult<()> {
    let (x, mut y) = origin;
    area.draw(&Text::new(
        title.to_string(),
        (x, y),
        (FONT, 18).into_font().color(&BLACK),
    ))?;
    y += 30;
    for (label, color) in entries {
        area.draw(&Rectangle::new([(x, y), (x + 18, y + 18)], color.filled()))?;
        area.draw(&Text::new(
            label.clone(),
            (x + 26, y + 9),
            (FONT, 16)
                .into_font()
                .color(&BLACK)
                .pos(Pos::new(HPos::Left, VPos::Center)),
        ))?;
        y += 26;
    }
    Ok(())
}

fn polar(center: (i32, i32), radius: f64, angle: f64) -> (i32, i32) {
    (
        center.0 + (radius * angle.cos()).round() as i32,
        center.1 - (radius * angle.sin()).round() as i32,
    )
}

/// Y range with room for annotations above the tallest bar.
fn headroom(max: f64) -> f64 {
    if max > 0.0 && max.is_finite() {
        max * 1.15
    } else {
        1.0
    }
}

fn rotate_labels(categories: &[String]) -> bool {
    let longest = categories.iter().map(|c| c.chars().count()).max().unwrap_or(0);
    categories.len() > 6 || longest > 14
}

/// Pixels reserved under the axis for category labels.
fn label_area_size(categories: &[String]) -> u32 {
    if !rotate_labels(categories) {
        return 30;
    }
    let longest = categories.iter().map(|c| c.chars().count()).max().unwrap_or(0) as u32;
    (longest * 8 + 20).clamp(60, 260)
}

fn format_tick(v: f64) -> String {
    if v.fract().abs() < 1e-9 {
        format!("{:.0}", v)
    } else {
        format!("{:.2}", v)
    }
}
