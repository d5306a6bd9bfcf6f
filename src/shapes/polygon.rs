use super::point::Point;
use serde::{Deserialize, Serialize};

/// Ordered landmark points for one face region. Position in `points`
/// carries anatomical meaning, so the order is never changed.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Polygon {
    pub points: Vec<Point>,
}

impl Polygon {
    pub fn new(points: Vec<Point>) -> Self {
        Self { points }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn get(&self, idx: usize) -> Option<Point> {
        self.points.get(idx).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Point> {
        self.points.iter()
    }

    pub fn scale(&mut self, origin: Point, factor: f64) -> &mut Self {
        for p in self.points.iter_mut() {
            p.scale(origin, factor);
        }

        self
    }

    pub fn rotate(&mut self, origin: Point, theta: f64) -> &mut Self {
        for p in self.points.iter_mut() {
            p.rotate(origin, theta);
        }

        self
    }
}

impl From<Vec<Point>> for Polygon {
    fn from(points: Vec<Point>) -> Polygon {
        Polygon::new(points)
    }
}

#[test]
fn test_get_out_of_range() {
    let poly = Polygon::new(Vec::from([Point::new(1., 1.)]));
    assert_eq!(poly.get(0), Some(Point::new(1., 1.)));
    assert_eq!(poly.get(1), None);
}
