//! Geometric measurements over a [`LandmarkSet`].
//!
//! Every feature is a ratio or an angle, so results do not depend on
//! the size of the face in the frame. Regions with too few points yield
//! neutral defaults instead of errors.

use crate::landmarks::{
    EYE_INNER, EYE_LOWER, EYE_OUTER, EYE_UPPER, LandmarkSet, MOUTH_BOTTOM, MOUTH_CENTER,
    MOUTH_LEFT, MOUTH_RIGHT, MOUTH_TOP,
};
use crate::shapes::point::Point;
use crate::shapes::polygon::Polygon;
use serde::Serialize;
use tracing::{Level, debug, span};

pub const MIN_MOUTH_POINTS: usize = 10;
pub const MIN_EYE_POINTS: usize = 5;

/// Corner angle of a straight mouth
pub const NEUTRAL_CORNER_ANGLE: f64 = 180.;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MouthFeatures {
    pub height: f64,
    pub width: f64,
    pub openness: f64,
    pub corner_angle: f64,
}

impl Default for MouthFeatures {
    fn default() -> Self {
        MouthFeatures {
            height: 0.,
            width: 0.,
            openness: 0.,
            corner_angle: NEUTRAL_CORNER_ANGLE,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct EyeFeatures {
    pub left_openness: f64,
    pub right_openness: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct FeatureSet {
    pub mouth_height: f64,
    pub mouth_width: f64,
    pub mouth_openness: f64,
    pub corner_angle: f64,
    pub left_eye_openness: f64,
    pub right_eye_openness: f64,
}

impl FeatureSet {
    pub fn extract(landmarks: &LandmarkSet) -> FeatureSet {
        let span = span!(Level::DEBUG, "extract_features");
        let _guard = span.enter();

        let mouth = analyze_mouth(landmarks);
        let eyes = analyze_eyes(landmarks);
        debug!("Mouth: {mouth:?}");
        debug!("Eyes: {eyes:?}");

        FeatureSet {
            mouth_height: mouth.height,
            mouth_width: mouth.width,
            mouth_openness: mouth.openness,
            corner_angle: mouth.corner_angle,
            left_eye_openness: eyes.left_openness,
            right_eye_openness: eyes.right_openness,
        }
    }
}

pub fn distance(p1: Point, p2: Point) -> f64 {
    p1.distance(&p2)
}

/// Unsigned angle at `vertex` in degrees, within [0, 180]. Zero when
/// either arm has no length.
pub fn vertex_angle(p1: Point, vertex: Point, p3: Point) -> f64 {
    let v1 = p1 - vertex;
    let v2 = p3 - vertex;

    let mag1 = v1.magnitude();
    let mag2 = v2.magnitude();
    if mag1 == 0. || mag2 == 0. {
        return 0.;
    }

    let cos = (v1.dot(&v2) / (mag1 * mag2)).clamp(-1., 1.);
    cos.acos().to_degrees()
}

/// Directional angle at `vertex` in degrees, within [0, 360). Bending
/// one way gives less than 180, the other way more, and a straight
/// line exactly 180.
pub fn signed_full_angle(p1: Point, vertex: Point, p3: Point) -> f64 {
    let v1 = p1 - vertex;
    let v2 = p3 - vertex;

    let angle = v1.cross(&v2).atan2(v1.dot(&v2)).to_degrees();
    if angle < 0. { angle + 360. } else { angle }
}

pub fn analyze_mouth(landmarks: &LandmarkSet) -> MouthFeatures {
    let mouth = &landmarks.mouth;
    if mouth.len() < MIN_MOUTH_POINTS {
        return MouthFeatures::default();
    }

    let (Some(left), Some(top), Some(right), Some(bottom)) = (
        mouth.get(MOUTH_LEFT),
        mouth.get(MOUTH_TOP),
        mouth.get(MOUTH_RIGHT),
        mouth.get(MOUTH_BOTTOM),
    ) else {
        return MouthFeatures::default();
    };

    let height = distance(top, bottom);
    let width = distance(left, right);
    let corner_angle = match mouth.get(MOUTH_CENTER) {
        Some(center) => signed_full_angle(left, center, right),
        None => NEUTRAL_CORNER_ANGLE,
    };

    MouthFeatures {
        height,
        width,
        openness: ratio(height, width),
        corner_angle,
    }
}

pub fn analyze_eyes(landmarks: &LandmarkSet) -> EyeFeatures {
    match (
        eye_openness(&landmarks.left_eye),
        eye_openness(&landmarks.right_eye),
    ) {
        (Some(left_openness), Some(right_openness)) => EyeFeatures {
            left_openness,
            right_openness,
        },
        _ => EyeFeatures::default(),
    }
}

fn eye_openness(eye: &Polygon) -> Option<f64> {
    if eye.len() < MIN_EYE_POINTS {
        return None;
    }

    let height = distance(eye.get(EYE_UPPER)?, eye.get(EYE_LOWER)?);
    let width = distance(eye.get(EYE_OUTER)?, eye.get(EYE_INNER)?);
    Some(ratio(height, width))
}

fn ratio(num: f64, denom: f64) -> f64 {
    if denom == 0. { 0. } else { num / denom }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(x: f64, y: f64) -> Point {
        Point::new(x, y)
    }

    // 11 point mouth: corners at (0, 50) and (100, 50), lips 40px apart,
    // center vertex `center_y` px down
    fn mouth(center_y: f64) -> Polygon {
        Polygon::new(Vec::from([
            p(0., 50.),
            p(20., 35.),
            p(35., 32.),
            p(50., 30.),
            p(65., 32.),
            p(80., 35.),
            p(100., 50.),
            p(80., 65.),
            p(65., 68.),
            p(50., 70.),
            p(50., 50. + center_y),
        ]))
    }

    fn eye(width: f64, height: f64) -> Polygon {
        Polygon::new(Vec::from([
            p(0., 0.),
            p(width / 2., -height / 2.),
            p(width / 2., -height / 2.),
            p(width, 0.),
            p(width / 2., height / 2.),
            p(width / 2., height / 2.),
        ]))
    }

    fn face(center_y: f64) -> LandmarkSet {
        LandmarkSet {
            mouth: mouth(center_y),
            left_eye: eye(30., 12.),
            right_eye: eye(30., 9.),
            ..Default::default()
        }
    }

    #[test]
    fn test_vertex_angle() {
        assert!((vertex_angle(p(1., 0.), p(0., 0.), p(0., 1.)) - 90.).abs() < 1e-9);
        assert!((vertex_angle(p(1., 0.), p(0., 0.), p(-1., 0.)) - 180.).abs() < 1e-9);
        assert!((vertex_angle(p(1., 0.), p(0., 0.), p(1., 1.)) - 45.).abs() < 1e-9);
    }

    #[test]
    fn test_vertex_angle_degenerate() {
        assert_eq!(vertex_angle(p(0., 0.), p(0., 0.), p(3., 1.)), 0.);
        assert_eq!(vertex_angle(p(3., 1.), p(2., 2.), p(2., 2.)), 0.);
    }

    #[test]
    fn test_signed_angle_straight() {
        assert_eq!(signed_full_angle(p(0., 5.), p(4., 5.), p(10., 5.)), 180.);
        assert_eq!(signed_full_angle(p(3., 0.), p(3., 2.), p(3., 9.)), 180.);
    }

    #[test]
    fn test_signed_angle_orientation() {
        // corners above the vertex (y grows downward)
        let smile = signed_full_angle(p(-10., -2.), p(0., 0.), p(10., -2.));
        // corners below the vertex
        let frown = signed_full_angle(p(-10., 2.), p(0., 0.), p(10., 2.));
        assert!(smile < 180.);
        assert!(frown > 180.);
        assert!((smile + frown - 360.).abs() < 1e-9);
    }

    #[test]
    fn test_signed_angle_swap() {
        let a = p(3., 7.);
        let v = p(1., 1.);
        let b = p(-4., 2.);
        let theta = signed_full_angle(a, v, b);
        let swapped = signed_full_angle(b, v, a);
        assert!(theta > 0. && theta < 360.);
        assert!((theta + swapped - 360.).abs() < 1e-9);
    }

    #[test]
    fn test_signed_angle_range() {
        for i in 0..36 {
            let theta = (i as f64 * 10.).to_radians();
            let a = signed_full_angle(p(1., 0.), p(0., 0.), p(theta.cos(), theta.sin()));
            assert!((0. ..360.).contains(&a), "{a} out of range");
        }
    }

    #[test]
    fn test_analyze_mouth() {
        let m = analyze_mouth(&face(10.));
        assert_eq!(m.height, 40.);
        assert_eq!(m.width, 100.);
        assert_eq!(m.openness, 0.4);
        // corners above the center vertex read as upturned
        assert!(m.corner_angle < 180.);

        let m = analyze_mouth(&face(-10.));
        assert!(m.corner_angle > 180.);

        let m = analyze_mouth(&face(0.));
        assert_eq!(m.corner_angle, 180.);
    }

    #[test]
    fn test_analyze_mouth_missing_points() {
        let mut set = face(10.);
        set.mouth.points.truncate(9);
        assert_eq!(analyze_mouth(&set), MouthFeatures::default());

        let empty = LandmarkSet::default();
        let m = analyze_mouth(&empty);
        assert_eq!(m.openness, 0.);
        assert_eq!(m.corner_angle, 180.);
    }

    #[test]
    fn test_analyze_mouth_without_center() {
        let mut set = face(10.);
        set.mouth.points.truncate(10);
        let m = analyze_mouth(&set);
        assert_eq!(m.openness, 0.4);
        assert_eq!(m.corner_angle, NEUTRAL_CORNER_ANGLE);
    }

    #[test]
    fn test_analyze_mouth_zero_width() {
        let mut set = face(10.);
        set.mouth.points[MOUTH_RIGHT] = set.mouth.points[MOUTH_LEFT];
        let m = analyze_mouth(&set);
        assert_eq!(m.width, 0.);
        assert_eq!(m.openness, 0.);
    }

    #[test]
    fn test_analyze_eyes() {
        let e = analyze_eyes(&face(0.));
        assert!((e.left_openness - 0.4).abs() < 1e-9);
        assert!((e.right_openness - 0.3).abs() < 1e-9);
    }

    #[test]
    fn test_analyze_eyes_short_region() {
        let mut set = face(0.);
        set.right_eye.points.truncate(4);
        assert_eq!(analyze_eyes(&set), EyeFeatures::default());
    }

    #[test]
    fn test_scale_invariance() {
        let base = FeatureSet::extract(&face(7.));
        for (origin, factor) in [(p(0., 0.), 2.5), (p(-40., 300.), 0.3), (p(12., 9.), 7.)] {
            let mut set = face(7.);
            set.scale(origin, factor);
            let scaled = FeatureSet::extract(&set);

            assert!((scaled.mouth_openness - base.mouth_openness).abs() < 1e-9);
            assert!((scaled.corner_angle - base.corner_angle).abs() < 1e-9);
            assert!((scaled.left_eye_openness - base.left_eye_openness).abs() < 1e-9);
            assert!((scaled.right_eye_openness - base.right_eye_openness).abs() < 1e-9);
        }
    }

    #[test]
    fn test_rotation_invariance() {
        let base = FeatureSet::extract(&face(-6.));
        let mut set = face(-6.);
        set.rotate(p(50., 50.), 0.3);
        let rotated = FeatureSet::extract(&set);

        assert!((rotated.mouth_openness - base.mouth_openness).abs() < 1e-9);
        assert!((rotated.corner_angle - base.corner_angle).abs() < 1e-9);
    }
}
