use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::predicates;
use crate::spacial::ToF32;
use crate::Point;

/// One output face, the points are in the order they were decoded.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Triangle {
    pub p1: Point,
    pub p2: Point,
    pub p3: Point,
}

impl Triangle {
    pub fn new(p1: Point, p2: Point, p3: Point) -> Self {
        Self {
            p1,
            p2,
            p3,
        }
    }

    pub fn vertices(&self) -> [Point; 3] {
        [self.p1, self.p2, self.p3]
    }

    /// Vertex data for renderers that work in single precision.
    pub fn to_f32_vertices(&self) -> [[f32; 2]; 3] {
        [self.p1.to_f32_array(), self.p2.to_f32_array(), self.p3.to_f32_array()]
    }

    /// Positive when the points wind counter-clockwise.
    pub fn signed_area(&self) -> f64 {
        predicates::cross(&self.p1, &self.p2, &self.p3) / 2.0
    }

    pub fn area(&self) -> f64 {
        self.signed_area().abs()
    }

    /// Same face, regardless of which vertex is listed first, winding preserved.
    pub fn is_rotation_of(&self, other: &Triangle) -> bool {
        let [a, b, c] = other.vertices();
        [[a, b, c], [b, c, a], [c, a, b]].contains(&self.vertices())
    }

    pub fn contains_point(&self, point: &Point) -> bool {
        predicates::point_in_triangle(&self.p1, &self.p2, &self.p3, point)
    }
}

impl fmt::Display for Triangle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Triangle [p1=({}, {}), p2=({}, {}), p3=({}, {})]",
            self.p1.x, self.p1.y, self.p2.x, self.p2.y, self.p3.x, self.p3.y
        )
    }
}

/// Total area covered by a list of non-overlapping triangles.
pub fn triangles_area(triangles: &[Triangle]) -> f64 {
    triangles
        .iter()
        .map(Triangle::area)
        .sum()
}
