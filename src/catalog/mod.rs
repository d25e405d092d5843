//! Dataset Catalog
//! Static mapping from dataset label to the files that back it, one variant per county.

mod region;

pub use region::{slugify, Region};

use crate::charts::ChartKind;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum CatalogError {
    #[error("Unknown dataset '{0}'")]
    UnknownDataset(String),
    #[error("Dataset '{label}' has {count} file references (expected 1, 2 or 4)")]
    InvalidFileRefs { label: String, count: usize },
    #[error("Duplicate dataset label '{0}'")]
    DuplicateLabel(String),
}

/// Shape of the data behind a dataset, which decides the chart set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatasetKind {
    /// One record per declined respondent.
    DeclinedConsent,
    /// Pre-aggregated district / location / values tables.
    Mismatch,
    /// Mismatch percentage per household variable for the whole county.
    Summary,
}

/// Ordered file references: district file, location file, values file, grouping column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRefs(Vec<String>);

impl FileRefs {
    pub fn new(label: &str, refs: &[&str]) -> Result<Self, CatalogError> {
        match refs.len() {
            1 | 2 | 4 => Ok(Self(refs.iter().map(|r| r.to_string()).collect())),
            count => Err(CatalogError::InvalidFileRefs {
                label: label.to_string(),
                count,
            }),
        }
    }

    pub fn district(&self) -> &str {
        &self.0[0]
    }

    pub fn location(&self) -> Option<&str> {
        self.0.get(1).map(String::as_str)
    }

    pub fn values(&self) -> Option<&str> {
        self.0.get(2).map(String::as_str)
    }

    pub fn grouping_column(&self) -> Option<&str> {
        self.0.get(3).map(String::as_str)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetEntry {
    pub label: String,
    pub kind: DatasetKind,
    pub file_refs: FileRefs,
}

impl DatasetEntry {
    /// Chart kinds that make sense for this dataset, in toggle order.
    pub fn applicable_charts(&self) -> Vec<ChartKind> {
        match self.kind {
            DatasetKind::DeclinedConsent => vec![
                ChartKind::Pie,
                ChartKind::Heatmap,
                ChartKind::LocationBarStacked,
                ChartKind::DistrictBarCount,
            ],
            DatasetKind::Summary => vec![ChartKind::SummaryBar],
            DatasetKind::Mismatch => {
                let mut charts = vec![ChartKind::DistrictBarPercentage];
                if self.file_refs.location().is_some() {
                    charts.push(ChartKind::LocationBarStacked);
                }
                if self.file_refs.values().is_some() {
                    charts.push(ChartKind::ValuesBarPaired);
                }
                charts
            }
        }
    }

    /// The file a chart kind reads from.
    pub fn file_for(&self, kind: ChartKind) -> Option<&str> {
        match (self.kind, kind) {
            (DatasetKind::DeclinedConsent, _) | (DatasetKind::Summary, _) => {
                Some(self.file_refs.district())
            }
            (DatasetKind::Mismatch, ChartKind::DistrictBarPercentage) => {
                Some(self.file_refs.district())
            }
            (DatasetKind::Mismatch, ChartKind::LocationBarStacked) => self.file_refs.location(),
            (DatasetKind::Mismatch, ChartKind::ValuesBarPaired) => self.file_refs.values(),
            (DatasetKind::Mismatch, _) => None,
        }
    }
}

/// Mismatch datasets shared by every county: label and file references.
const MISMATCH_DATASETS: [(&str, &[&str]); 18] = [
    ("Floor", &["floordistrict.csv", "floorlocation.csv", "floorvalues.csv", "Floor.x"]),
    ("Roof", &["roofdistrict.csv", "rooflocation.csv", "roofvalues.csv", "Roof.x"]),
    (
        "Lighting",
        &["lightingdistrict.csv", "lightinglocation.csv", "lightingvalues.csv", "LightingFuel.x"],
    ),
    ("Habitable Rooms", &["roomsdistrict.csv", "roomslocation.csv"]),
    (
        "Cooking Fuel",
        &["cookingdistrict.csv", "cookinglocation.csv", "cookingvalues.csv", "CookingFuel.x"],
    ),
    (
        "Waste Disposal",
        &["toilet district.csv", "toiletlocation.csv", "toiletvalues.csv", "HumanWasteDisposal.x"],
    ),
    (
        "Water Source",
        &["waterdistrict.csv", "waterlocation.csv", "watervalues.csv", "WaterSource.x"],
    ),
    ("Wall", &["walldistrict.csv", "wall location.csv", "wallvalues.csv", "Wall.x"]),
    ("Household Head DOB", &["headdobdistrict.csv", "headdoblocation.csv"]),
    ("Household Head Education", &["headedudistrict.csv", "headedulocation.csv"]),
    ("Household Head ID", &["headiddistrict.csv", "headidlocation.csv"]),
    ("Household Member Names", &["namesdistrict.csv", "membernameslocation.csv"]),
    ("Orphans", &["opharndistrict.csv", "opharnlocation.csv"]),
    ("Relationship to Head", &["relatioshipheaddistrict.csv", "relatioshipheadlocation.csv"]),
    ("Household Size", &["sizedistrict.csv", "sizelocation.csv"]),
    ("Spouse DOB", &["spousedobdistrict.csv", "spousedoblocation.csv"]),
    ("Spouse Education", &["spouseedudistrict.csv", "spouseedulocation.csv"]),
    ("Spouse ID", &["spouseiddistrict.csv", "spouseidlocation.csv"]),
];

pub const DECLINED_CONSENT_LABEL: &str = "Declined Consent";
pub const SUMMARY_FILE: &str = "summary.csv";

/// Immutable dataset catalog for one county.
#[derive(Debug, Clone)]
pub struct Catalog {
    region: Region,
    data_dir: PathBuf,
    entries: Vec<DatasetEntry>,
}

impl Catalog {
    /// Build the catalog variant for a county.
    ///
    /// Files live in `<data_root>/<region slug>`; when that directory is absent
    /// the data root itself is used.
    pub fn for_region(
        region: Region,
        data_root: &Path,
        consent_file: &str,
    ) -> Result<Self, CatalogError> {
        let region_dir = data_root.join(region.slug());
        let data_dir = if region_dir.is_dir() {
            region_dir
        } else {
            data_root.to_path_buf()
        };

        let mut entries = Vec::with_capacity(MISMATCH_DATASETS.len() + 2);
        entries.push(DatasetEntry {
            label: DECLINED_CONSENT_LABEL.to_string(),
            kind: DatasetKind::DeclinedConsent,
            file_refs: FileRefs::new(DECLINED_CONSENT_LABEL, &[consent_file])?,
        });
        for (label, refs) in MISMATCH_DATASETS.iter() {
            entries.push(DatasetEntry {
                label: label.to_string(),
                kind: DatasetKind::Mismatch,
                file_refs: FileRefs::new(label, refs)?,
            });
        }
        let summary = region.summary_label();
        entries.push(DatasetEntry {
            file_refs: FileRefs::new(&summary, &[SUMMARY_FILE])?,
            label: summary,
            kind: DatasetKind::Summary,
        });

        Self::from_entries(region, data_dir, entries)
    }

    /// Build a catalog from explicit entries, rejecting duplicate labels.
    pub fn from_entries(
        region: Region,
        data_dir: PathBuf,
        entries: Vec<DatasetEntry>,
    ) -> Result<Self, CatalogError> {
        for (i, entry) in entries.iter().enumerate() {
            if entries[..i].iter().any(|e| e.label == entry.label) {
                return Err(CatalogError::DuplicateLabel(entry.label.clone()));
            }
        }
        Ok(Self {
            region,
            data_dir,
            entries,
        })
    }

    pub fn region(&self) -> Region {
        self.region
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Labels in display order.
    pub fn labels(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.label.as_str()).collect()
    }

    pub fn resolve(&self, label: &str) -> Result<&DatasetEntry, CatalogError> {
        self.entries
            .iter()
            .find(|e| e.label == label)
            .ok_or_else(|| CatalogError::UnknownDataset(label.to_string()))
    }

    /// Absolute path of a file reference.
    pub fn path_for(&self, file_ref: &str) -> PathBuf {
        self.data_dir.join(file_ref)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> Catalog {
        Catalog::for_region(Region::Kisii, Path::new("/nonexistent"), "Declined Consent.xlsx").unwrap()
    }

    #[test]
    fn catalog_lists_twenty_datasets_in_order() {
        let catalog = catalog();
        let labels = catalog.labels();
        assert_eq!(labels.len(), 20);
        assert_eq!(labels[0], "Declined Consent");
        assert_eq!(labels[1], "Floor");
        assert_eq!(labels[19], "Kisii County Summary");
    }

    #[test]
    fn resolve_known_and_unknown_labels() {
        let catalog = catalog();
        let wall = catalog.resolve("Wall").unwrap();
        assert_eq!(wall.file_refs.location(), Some("wall location.csv"));
        assert_eq!(wall.file_refs.grouping_column(), Some("Wall.x"));

        assert_eq!(
            catalog.resolve("Kitchen"),
            Err(CatalogError::UnknownDataset("Kitchen".to_string()))
        );
    }

    #[test]
    fn arity_decides_applicable_charts() {
        let catalog = catalog();
        assert_eq!(
            catalog.resolve("Floor").unwrap().applicable_charts(),
            vec![
                ChartKind::DistrictBarPercentage,
                ChartKind::LocationBarStacked,
                ChartKind::ValuesBarPaired
            ]
        );
        assert_eq!(
            catalog.resolve("Orphans").unwrap().applicable_charts(),
            vec![ChartKind::DistrictBarPercentage, ChartKind::LocationBarStacked]
        );
        assert_eq!(
            catalog.resolve("Declined Consent").unwrap().applicable_charts(),
            vec![
                ChartKind::Pie,
                ChartKind::Heatmap,
                ChartKind::LocationBarStacked,
                ChartKind::DistrictBarCount
            ]
        );
        assert_eq!(
            catalog.resolve("Kisii County Summary").unwrap().applicable_charts(),
            vec![ChartKind::SummaryBar]
        );
    }

    #[test]
    fn single_file_mismatch_offers_district_only() {
        let entry = DatasetEntry {
            label: "Summary".to_string(),
            kind: DatasetKind::Mismatch,
            file_refs: FileRefs::new("Summary", &["summary.csv"]).unwrap(),
        };
        assert_eq!(entry.applicable_charts(), vec![ChartKind::DistrictBarPercentage]);
        assert_eq!(entry.file_for(ChartKind::LocationBarStacked), None);
    }

    #[test]
    fn file_refs_reject_bad_arity() {
        assert_eq!(
            FileRefs::new("Odd", &["a.csv", "b.csv", "c.csv"]),
            Err(CatalogError::InvalidFileRefs {
                label: "Odd".to_string(),
                count: 3
            })
        );
        assert!(FileRefs::new("None", &[]).is_err());
    }

    #[test]
    fn file_for_picks_the_matching_table() {
        let catalog = catalog();
        let roof = catalog.resolve("Roof").unwrap();
        assert_eq!(roof.file_for(ChartKind::DistrictBarPercentage), Some("roofdistrict.csv"));
        assert_eq!(roof.file_for(ChartKind::LocationBarStacked), Some("rooflocation.csv"));
        assert_eq!(roof.file_for(ChartKind::ValuesBarPaired), Some("roofvalues.csv"));
        assert_eq!(roof.file_for(ChartKind::Pie), None);
    }

    #[test]
    fn region_directory_is_preferred_when_present() {
        let root = tempfile::tempdir().unwrap();
        let flat = Catalog::for_region(Region::Migori, root.path(), "consent.xlsx").unwrap();
        assert_eq!(flat.data_dir(), root.path());

        std::fs::create_dir(root.path().join("migori")).unwrap();
        let nested = Catalog::for_region(Region::Migori, root.path(), "consent.xlsx").unwrap();
        assert_eq!(nested.data_dir(), root.path().join("migori"));
        assert_eq!(
            nested.path_for("floordistrict.csv"),
            root.path().join("migori").join("floordistrict.csv")
        );
        assert_eq!(nested.labels()[19], "Migori County Summary");
    }

    #[test]
    fn from_entries_rejects_duplicates() {
        let entry = DatasetEntry {
            label: "Floor".to_string(),
            kind: DatasetKind::Mismatch,
            file_refs: FileRefs::new("Floor", &["a.csv"]).unwrap(),
        };
        let err = Catalog::from_entries(
            Region::Kisii,
            PathBuf::from("."),
            vec![entry.clone(), entry],
        )
        .unwrap_err();
        assert_eq!(err, CatalogError::DuplicateLabel("Floor".to_string()));
    }
}
