//! Chart Renderer
//! Turns a loaded table into a self-contained PNG-ready artifact.

use super::figure::ChartFigure;
use super::{ChartArtifact, ChartKind, RenderError};
use crate::catalog::{Catalog, DatasetEntry, DatasetKind};
use crate::data::DataLoader;
use image::RgbImage;
use polars::prelude::DataFrame;
use rayon::prelude::*;
use std::time::Instant;
use tracing::{info, warn};

/// Draws a finished figure into pixels.
pub trait ChartPainter: Send + Sync {
    fn paint(&self, figure: &ChartFigure) -> Result<RgbImage, RenderError>;
}

/// Everything needed to draw one chart except the table itself.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderRequest {
    pub kind: ChartKind,
    pub dataset_kind: DatasetKind,
    pub title: String,
    pub grouping_column: Option<String>,
    pub file_name: String,
    /// File reference the table is read from.
    pub source: String,
}

impl RenderRequest {
    pub fn for_entry(catalog: &Catalog, entry: &DatasetEntry, kind: ChartKind) -> Result<Self, RenderError> {
        if !entry.applicable_charts().contains(&kind) {
            return Err(RenderError::NotApplicable(kind));
        }
        let source = entry
            .file_for(kind)
            .ok_or(RenderError::NotApplicable(kind))?;

        Ok(Self {
            kind,
            dataset_kind: entry.kind,
            title: kind.title(entry),
            grouping_column: entry.file_refs.grouping_column().map(str::to_string),
            file_name: kind.file_name(catalog.region(), entry),
            source: source.to_string(),
        })
    }
}

pub struct ChartRenderer<P: ChartPainter> {
    painter: P,
}

impl<P: ChartPainter> ChartRenderer<P> {
    pub fn new(painter: P) -> Self {
        Self { painter }
    }

    pub fn render(&self, request: &RenderRequest, df: &DataFrame) -> Result<ChartArtifact, RenderError> {
        let figure = ChartFigure::build(
            request.kind,
            request.dataset_kind,
            df,
            &request.title,
            request.grouping_column.as_deref(),
        )?;
        let image = self.painter.paint(&figure)?;

        Ok(ChartArtifact {
            kind: request.kind,
            title: request.title.clone(),
            file_name: request.file_name.clone(),
            image,
        })
    }
}

/// Result of one chart in a render pass.
#[derive(Debug)]
pub struct ChartOutcome {
    pub kind: ChartKind,
    pub title: String,
    pub result: Result<ChartArtifact, RenderError>,
}

/// Render every requested chart of a dataset in parallel.
///
/// Each chart loads its own table and fails on its own; outcomes come back in
/// the order of `kinds`.
pub fn render_pass<P: ChartPainter>(
    catalog: &Catalog,
    loader: &DataLoader,
    entry: &DatasetEntry,
    kinds: &[ChartKind],
    renderer: &ChartRenderer<P>,
) -> Vec<ChartOutcome> {
    let start = Instant::now();

    let outcomes: Vec<ChartOutcome> = kinds
        .par_iter()
        .map(|&kind| {
            let title = kind.title(entry);
            let result = RenderRequest::for_entry(catalog, entry, kind).and_then(|request| {
                let df = loader.load(&catalog.path_for(&request.source))?;
                renderer.render(&request, &df)
            });
            if let Err(e) = &result {
                warn!(
                    chart = %kind,
                    dataset = %entry.label,
                    missing_column = e.is_missing_column(),
                    "chart failed: {}",
                    e
                );
            }
            ChartOutcome { kind, title, result }
        })
        .collect();

    let rendered = outcomes.iter().filter(|o| o.result.is_ok()).count();
    info!(
        "Rendered {}/{} charts for '{}' in {:?}",
        rendered,
        outcomes.len(),
        entry.label,
        start.elapsed()
    );
    outcomes
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Region;
    use crate::data::LoaderError;
    use std::fs;
    use tempfile::TempDir;

    /// Paints a blank canvas sized by the number of categories.
    struct BlankPainter;

    impl ChartPainter for BlankPainter {
        fn paint(&self, figure: &ChartFigure) -> Result<RgbImage, RenderError> {
            let width = figure.categories().len().max(1) as u32 * 10;
            Ok(RgbImage::new(width, 20))
        }
    }

    fn fixture() -> (TempDir, Catalog) {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("floordistrict.csv"),
            "DistrictName,Total\nBobasi,45%\nKitutu,30\n",
        )
        .unwrap();
        // Location table without LocationName.
        fs::write(
            dir.path().join("floorlocation.csv"),
            "Place,Match,Mismatch\nItierio,3,1\n",
        )
        .unwrap();
        let catalog = Catalog::for_region(Region::Kisii, dir.path(), "consent.csv").unwrap();
        (dir, catalog)
    }

    #[test]
    fn request_carries_grouping_and_file_name() {
        let (_dir, catalog) = fixture();
        let floor = catalog.resolve("Floor").unwrap();
        let request = RenderRequest::for_entry(&catalog, floor, ChartKind::ValuesBarPaired).unwrap();
        assert_eq!(request.grouping_column.as_deref(), Some("Floor.x"));
        assert_eq!(request.source, "floorvalues.csv");
        assert_eq!(request.file_name, "kisii_floor_frequencies.png");
    }

    #[test]
    fn inapplicable_chart_is_rejected() {
        let (_dir, catalog) = fixture();
        let floor = catalog.resolve("Floor").unwrap();
        let err = RenderRequest::for_entry(&catalog, floor, ChartKind::Pie).unwrap_err();
        assert!(matches!(err, RenderError::NotApplicable(ChartKind::Pie)));
    }

    #[test]
    fn missing_column_does_not_block_other_charts() {
        let (_dir, catalog) = fixture();
        let loader = DataLoader::new();
        let renderer = ChartRenderer::new(BlankPainter);
        let floor = catalog.resolve("Floor").unwrap();

        let outcomes = render_pass(
            &catalog,
            &loader,
            floor,
            &[ChartKind::DistrictBarPercentage, ChartKind::LocationBarStacked],
            &renderer,
        );
        assert_eq!(outcomes.len(), 2);

        let district = outcomes[0].result.as_ref().unwrap();
        assert_eq!(district.width(), 20);
        assert_eq!(district.file_name, "kisii_floor_by_sub_county.png");

        let location = outcomes[1].result.as_ref().unwrap_err();
        assert!(location.is_missing_column());
        assert_eq!(
            location.to_string(),
            "Column 'LocationName' does not exist in the dataset."
        );
    }

    #[test]
    fn missing_file_is_reported_per_chart() {
        let (_dir, catalog) = fixture();
        let loader = DataLoader::new();
        let renderer = ChartRenderer::new(BlankPainter);
        let floor = catalog.resolve("Floor").unwrap();

        let outcomes = render_pass(
            &catalog,
            &loader,
            floor,
            &[ChartKind::ValuesBarPaired, ChartKind::DistrictBarPercentage],
            &renderer,
        );
        match &outcomes[0].result {
            Err(RenderError::Load(LoaderError::NotFound(path))) => {
                assert!(path.ends_with("floorvalues.csv"));
            }
            other => panic!("expected NotFound, got {:?}", other),
        }
        assert!(outcomes[1].result.is_ok());
        assert_eq!(outcomes[0].title, "Floor Frequencies");
    }
}
