use crate::shapes::point::Point;
use crate::shapes::polygon::Polygon;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::trace;

// Positions within `LandmarkSet::mouth`
pub const MOUTH_LEFT: usize = 0;
pub const MOUTH_TOP: usize = 3;
pub const MOUTH_RIGHT: usize = 6;
pub const MOUTH_BOTTOM: usize = 9;
pub const MOUTH_CENTER: usize = 10;

// Positions within each eye region
pub const EYE_OUTER: usize = 0;
pub const EYE_UPPER: usize = 1;
pub const EYE_INNER: usize = 3;
pub const EYE_LOWER: usize = 4;

// Face mesh (468 point) indices, in region order
const L_EYEBROW_IDXS: [usize; 5] = [70, 63, 105, 66, 107];
const R_EYEBROW_IDXS: [usize; 5] = [296, 334, 293, 300, 276];
const L_EYE_IDXS: [usize; 6] = [33, 7, 163, 144, 145, 153];
const R_EYE_IDXS: [usize; 6] = [362, 382, 381, 380, 374, 373];
const NOSE_IDXS: [usize; 24] = [
    1, 2, 5, 4, 19, 94, 125, 141, 235, 236, 3, 51, 48, 115, 131, 134, 102, 49, 220, 305, 166, 79,
    294, 455,
];
const MOUTH_IDXS: [usize; 12] = [61, 13, 82, 18, 312, 308, 291, 324, 318, 17, 87, 84];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Region {
    LeftEye,
    RightEye,
    Mouth,
    LeftEyebrow,
    RightEyebrow,
    Nose,
}

impl Region {
    pub const ALL: [Region; 6] = [
        Region::LeftEye,
        Region::RightEye,
        Region::Mouth,
        Region::LeftEyebrow,
        Region::RightEyebrow,
        Region::Nose,
    ];

    fn mesh_idxs(&self) -> &'static [usize] {
        match self {
            Region::LeftEye => &L_EYE_IDXS,
            Region::RightEye => &R_EYE_IDXS,
            Region::Mouth => &MOUTH_IDXS,
            Region::LeftEyebrow => &L_EYEBROW_IDXS,
            Region::RightEyebrow => &R_EYEBROW_IDXS,
            Region::Nose => &NOSE_IDXS,
        }
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            Region::LeftEye => "left_eye",
            Region::RightEye => "right_eye",
            Region::Mouth => "mouth",
            Region::LeftEyebrow => "left_eyebrow",
            Region::RightEyebrow => "right_eyebrow",
            Region::Nose => "nose",
        };
        write!(f, "{name}")
    }
}

/// Landmarks of a single face, grouped by region. Any region may hold
/// fewer points than its layout describes.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LandmarkSet {
    pub left_eye: Polygon,
    pub right_eye: Polygon,
    pub mouth: Polygon,
    pub left_eyebrow: Polygon,
    pub right_eyebrow: Polygon,
    pub nose: Polygon,
}

impl LandmarkSet {
    /// Pick the tracked regions out of a full face mesh. Mesh indices
    /// past the end of `mesh` are skipped.
    pub fn from_mesh(mesh: &[Point]) -> LandmarkSet {
        let mut set = LandmarkSet::default();
        for region in Region::ALL {
            *set.region_mut(region) = extract_region(mesh, region.mesh_idxs());
        }

        trace!("Landmarks from {} point mesh: {set:?}", mesh.len());
        set
    }

    pub fn region(&self, region: Region) -> &Polygon {
        match region {
            Region::LeftEye => &self.left_eye,
            Region::RightEye => &self.right_eye,
            Region::Mouth => &self.mouth,
            Region::LeftEyebrow => &self.left_eyebrow,
            Region::RightEyebrow => &self.right_eyebrow,
            Region::Nose => &self.nose,
        }
    }

    pub fn region_mut(&mut self, region: Region) -> &mut Polygon {
        match region {
            Region::LeftEye => &mut self.left_eye,
            Region::RightEye => &mut self.right_eye,
            Region::Mouth => &mut self.mouth,
            Region::LeftEyebrow => &mut self.left_eyebrow,
            Region::RightEyebrow => &mut self.right_eyebrow,
            Region::Nose => &mut self.nose,
        }
    }

    pub fn scale(&mut self, origin: Point, factor: f64) -> &mut Self {
        for region in Region::ALL {
            self.region_mut(region).scale(origin, factor);
        }

        self
    }

    pub fn rotate(&mut self, origin: Point, theta: f64) -> &mut Self {
        for region in Region::ALL {
            self.region_mut(region).rotate(origin, theta);
        }

        self
    }
}

fn extract_region(mesh: &[Point], kpt_idxs: &[usize]) -> Polygon {
    kpt_idxs
        .iter()
        .filter_map(|&i| mesh.get(i).copied())
        .collect::<Vec<_>>()
        .into()
}
