//! Chart Export Module
//! Encodes rendered charts as PNG bytes ready to hand to the user.

use crate::charts::ChartArtifact;
use image::ImageFormat;
use std::fs;
use std::io::Cursor;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("Failed to encode {file_name}: {source}")]
    Encode {
        file_name: String,
        source: image::ImageError,
    },
    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// An encoded chart with the name and MIME type offered on download.
#[derive(Debug, Clone, PartialEq)]
pub struct Downloadable {
    pub bytes: Vec<u8>,
    pub file_name: String,
    pub mime_type: &'static str,
}

pub struct Exporter;

impl Exporter {
    pub fn to_downloadable(artifact: &ChartArtifact) -> Result<Downloadable, ExportError> {
        let mut bytes = Cursor::new(Vec::new());
        artifact
            .image
            .write_to(&mut bytes, ImageFormat::Png)
            .map_err(|source| ExportError::Encode {
                file_name: artifact.file_name.clone(),
                source,
            })?;

        Ok(Downloadable {
            bytes: bytes.into_inner(),
            file_name: artifact.file_name.clone(),
            mime_type: ChartArtifact::MIME_TYPE,
        })
    }

    /// Write the encoded bytes to `path`.
    pub fn save(download: &Downloadable, path: &Path) -> Result<(), ExportError> {
        fs::write(path, &download.bytes).map_err(|source| ExportError::Write {
            path: path.to_path_buf(),
            source,
        })?;
        info!(path = %path.display(), bytes = download.bytes.len(), "saved chart");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::charts::ChartKind;
    use image::RgbImage;
    use tempfile::TempDir;

    const PNG_SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

    fn artifact() -> ChartArtifact {
        ChartArtifact {
            kind: ChartKind::Pie,
            title: "Distribution of Declined Reasons".to_string(),
            file_name: "kisii_declined_consent_pie_chart.png".to_string(),
            image: RgbImage::from_pixel(12, 8, image::Rgb([243, 110, 44])),
        }
    }

    #[test]
    fn output_is_png() {
        let download = Exporter::to_downloadable(&artifact()).unwrap();
        assert_eq!(&download.bytes[..8], &PNG_SIGNATURE);
        assert_eq!(download.mime_type, "image/png");
        assert_eq!(download.file_name, "kisii_declined_consent_pie_chart.png");
    }

    #[test]
    fn saved_file_decodes_to_the_same_size() {
        let dir = TempDir::new().unwrap();
        let download = Exporter::to_downloadable(&artifact()).unwrap();
        let path = dir.path().join(&download.file_name);
        Exporter::save(&download, &path).unwrap();

        let decoded = image::open(&path).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (12, 8));
    }

    #[test]
    fn save_into_missing_directory_fails() {
        let dir = TempDir::new().unwrap();
        let download = Exporter::to_downloadable(&artifact()).unwrap();
        let path = dir.path().join("missing").join("chart.png");
        let err = Exporter::save(&download, &path).unwrap_err();
        assert!(matches!(err, ExportError::Write { .. }));
    }
}
