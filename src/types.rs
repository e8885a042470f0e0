use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::Point;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Winding {
    /// Aka 'Negative' in Geometry
    Clockwise,
    /// Aka 'Positive' in Geometry
    CounterClockwise,
}

impl Winding {
    /// Orientation of a closed loop of vertices, y axis pointing up.
    ///
    /// A loop with zero area reports `CounterClockwise`.
    pub fn from_vertices(vertices: &[Point]) -> Self {
        let mut sum = 0.0;
        for i in 0..vertices.len() {
            let j = (i + 1) % vertices.len();
            sum += vertices[i].x * vertices[j].y - vertices[j].x * vertices[i].y;
        }
        if sum < 0.0 {
            Winding::Clockwise
        } else {
            Winding::CounterClockwise
        }
    }

    pub fn reversed(self) -> Self {
        match self {
            Winding::Clockwise => Winding::CounterClockwise,
            Winding::CounterClockwise => Winding::Clockwise,
        }
    }
}

/// The kinds of primitive batch a triangulation backend may emit.
///
/// Only fans and strips can be decoded into triangles, the others exist so that backends can
/// report what they produced and have it rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum PrimitiveKind {
    TriangleFan,
    TriangleStrip,
    Triangles,
    LineLoop,
}

impl PrimitiveKind {
    pub fn is_supported(&self) -> bool {
        matches!(self, PrimitiveKind::TriangleFan | PrimitiveKind::TriangleStrip)
    }
}

impl fmt::Display for PrimitiveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PrimitiveKind::TriangleFan => "triangle fan",
            PrimitiveKind::TriangleStrip => "triangle strip",
            PrimitiveKind::Triangles => "triangles",
            PrimitiveKind::LineLoop => "line loop",
        };
        f.write_str(name)
    }
}
