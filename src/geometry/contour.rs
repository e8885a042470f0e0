#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::bounding_box::BoundingBox;
use super::predicates::{self, Containment};
use crate::spacial::deduplicate::DedupEpsilon;
use crate::types::Winding;
use crate::Point;

/// A closed boundary loop, the last point connects back to the first.
///
/// Contours are plain values, the points are never re-ordered or modified after construction.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Contour {
    points: Vec<Point>,
}

impl Contour {
    pub fn new(points: Vec<Point>) -> Self {
        Self {
            points,
        }
    }

    pub fn from_tuples<I: IntoIterator<Item = (f64, f64)>>(tuples: I) -> Self {
        tuples
            .into_iter()
            .map(|(x, y)| Point::new(x, y))
            .collect()
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn into_points(self) -> Vec<Point> {
        self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// A contour with fewer than 3 distinct points encloses nothing.
    pub fn is_degenerate(&self) -> bool {
        self.points
            .clone()
            .dedup_closed_with_epsilon(0.0)
            .len()
            < 3
    }

    /// Returns a copy with consecutive near-duplicate points (and a closing point equal to the
    /// first) removed, or `None` when fewer than 3 distinct points remain.
    pub fn cleaned(&self, epsilon: f64) -> Option<Contour> {
        let points = self
            .points
            .clone()
            .dedup_closed_with_epsilon(epsilon);
        match points.len() < 3 {
            true => None,
            false => Some(Contour::new(points)),
        }
    }

    /// Iterates the edges of the closed loop, including the closing edge.
    pub fn edges(&self) -> impl Iterator<Item = (Point, Point)> + '_ {
        let n = self.points.len();
        (0..n).map(move |i| (self.points[i], self.points[(i + 1) % n]))
    }

    /// Positive for counter-clockwise contours (y axis up).
    pub fn signed_area(&self) -> f64 {
        predicates::signed_area(&self.points)
    }

    pub fn area(&self) -> f64 {
        self.signed_area().abs()
    }

    pub fn winding(&self) -> Winding {
        Winding::from_vertices(&self.points)
    }

    pub fn bounding_box(&self) -> BoundingBox {
        BoundingBox::from_points(&self.points)
    }

    pub fn is_convex(&self) -> bool {
        super::is_convex(&self.points)
    }

    pub fn contains_point(&self, point: &Point) -> Containment {
        predicates::point_in_polygon(point, &self.points)
    }

    pub fn reversed(&self) -> Contour {
        let mut points = self.points.clone();
        points.reverse();
        Contour::new(points)
    }
}

impl From<Vec<Point>> for Contour {
    fn from(points: Vec<Point>) -> Self {
        Self::new(points)
    }
}

impl From<&[Point]> for Contour {
    fn from(points: &[Point]) -> Self {
        Self::new(points.to_vec())
    }
}

impl FromIterator<Point> for Contour {
    fn from_iter<T: IntoIterator<Item = Point>>(iter: T) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

/// Builds a contour segment by segment, starting at a point.
///
/// The contour is closed implicitly, a final `line_to` back to the start point is allowed and
/// removed when the contour is cleaned.
#[derive(Debug, Clone)]
pub struct ContourBuilder {
    points: Vec<Point>,
}

impl ContourBuilder {
    pub fn begin(start: Point) -> Self {
        Self {
            points: vec![start],
        }
    }

    pub fn line_to(mut self, point: Point) -> Self {
        self.points.push(point);
        self
    }

    pub fn line_to_xy(self, x: f64, y: f64) -> Self {
        self.line_to(Point::new(x, y))
    }

    pub fn build(self) -> Contour {
        Contour::new(self.points)
    }
}
