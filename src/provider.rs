use crate::landmarks::LandmarkSet;
use crate::shapes::point::Point;
use anyhow::{Context, Result};
use image::RgbImage;
use serde::Deserialize;
use std::path::Path;
use tracing::{Level, debug, span, warn};

/// Source of face landmarks for an image. `Ok(None)` means no face was
/// found; only the first face is ever returned.
pub trait LandmarkProvider {
    fn detect(&self, img: &RgbImage) -> Result<Option<LandmarkSet>>;
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "format", rename_all = "snake_case")]
enum LandmarkDump {
    Regions {
        faces: Vec<LandmarkSet>,
    },
    Mesh {
        #[serde(default)]
        normalized: bool,
        faces: Vec<Vec<Point>>,
    },
}

/// Precomputed detector output stored as JSON.
#[derive(Debug, Clone)]
pub struct JsonLandmarks {
    dump: LandmarkDump,
}

impl JsonLandmarks {
    pub fn parse(json: &str) -> Result<JsonLandmarks> {
        let dump = serde_json::from_str(json).context("Invalid landmark dump")?;
        Ok(JsonLandmarks { dump })
    }

    pub fn open<P: AsRef<Path>>(path: P) -> Result<JsonLandmarks> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read landmarks from {}", path.display()))?;
        JsonLandmarks::parse(&json).with_context(|| format!("In {}", path.display()))
    }
}

impl LandmarkProvider for JsonLandmarks {
    fn detect(&self, img: &RgbImage) -> Result<Option<LandmarkSet>> {
        let span = span!(Level::DEBUG, "json_landmarks");
        let _guard = span.enter();

        let (count, first) = match &self.dump {
            LandmarkDump::Regions { faces } => (faces.len(), faces.first().cloned()),
            LandmarkDump::Mesh { normalized, faces } => (
                faces.len(),
                faces.first().map(|mesh| {
                    let mesh = if *normalized {
                        denormalize(mesh, img.width(), img.height())
                    } else {
                        mesh.clone()
                    };
                    LandmarkSet::from_mesh(&mesh)
                }),
            ),
        };

        if count > 1 {
            warn!("{count} faces in landmark dump, using the first");
        }
        debug!("Face found: {}", first.is_some());

        Ok(first)
    }
}

// Whole-pixel coordinates, truncated like the detector's own output
fn denormalize(mesh: &[Point], width: u32, height: u32) -> Vec<Point> {
    mesh.iter()
        .map(|p| Point::new((p.x * width as f64).trunc(), (p.y * height as f64).trunc()))
        .collect()
}
