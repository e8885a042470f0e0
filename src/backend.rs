//! Triangulation backends.
//!
//! A backend is fed one polygon at a time, contour by contour, and reports the triangulated
//! interior to a [`PrimitiveSink`] when the polygon ends. Backends keep per-polygon state and are
//! not re-entrant, every request gets its own instance.

mod ear_clip;
mod lyon_fill;
mod nesting;
mod validate;

pub use self::ear_clip::EarClipBackend;
pub use self::lyon_fill::LyonBackend;

use log::{debug, trace};

use crate::geometry::predicates::{cross, signed_area};
use crate::primitive::PrimitiveSink;
use crate::spacial::deduplicate::DedupEpsilon;
use crate::Point;

pub trait TessellationBackend {
    fn begin_polygon(&mut self);

    fn begin_contour(&mut self);

    fn vertex(&mut self, point: Point);

    fn end_contour(&mut self);

    /// Triangulates everything received since `begin_polygon`, reporting batches, or a failure,
    /// to `sink`.
    fn end_polygon(&mut self, sink: &mut dyn PrimitiveSink);
}

/// Contours collected between `begin_polygon` and `end_polygon`.
#[derive(Debug, Default)]
pub(crate) struct PolygonInput {
    contours: Vec<Vec<Point>>,
    current: Option<Vec<Point>>,
}

impl PolygonInput {
    pub(crate) fn begin_polygon(&mut self) {
        self.contours.clear();
        self.current = None;
    }

    pub(crate) fn begin_contour(&mut self) {
        self.end_contour();
        self.current = Some(Vec::new());
    }

    pub(crate) fn vertex(&mut self, point: Point) {
        // vertices outside of a contour start an implicit one
        self.current
            .get_or_insert_with(Vec::new)
            .push(point);
    }

    pub(crate) fn end_contour(&mut self) {
        if let Some(contour) = self.current.take() {
            trace!("contour of {} vertices", contour.len());
            self.contours.push(contour);
        }
    }

    pub(crate) fn take_contours(&mut self) -> Vec<Vec<Point>> {
        self.end_contour();
        std::mem::take(&mut self.contours)
    }
}

/// Removes exact consecutive duplicates, then drops contours with fewer than three distinct
/// points or with every point on one line.
///
/// Net area is not checked here: a figure-eight has two lobes that cancel out and must still reach
/// crossing detection.
pub(crate) fn drop_degenerate_contours(contours: Vec<Vec<Point>>) -> Vec<Vec<Point>> {
    contours
        .into_iter()
        .enumerate()
        .filter_map(|(index, points)| {
            let points = points.dedup_closed_with_epsilon(0.0);
            if points.len() < 3 || is_collinear(&points) {
                debug!("contour {} has no interior, skipping it", index);
                return None;
            }
            Some(points)
        })
        .collect()
}

/// Drops contours that enclose no area. Only meaningful once the contours are known not to cross.
pub(crate) fn drop_empty_contours(contours: Vec<Vec<Point>>) -> Vec<Vec<Point>> {
    contours
        .into_iter()
        .filter(|points| {
            let empty = signed_area(points) == 0.0;
            if empty {
                debug!("contour of {} points encloses no area, skipping it", points.len());
            }
            !empty
        })
        .collect()
}

/// Describes the first point with a NaN or infinite coordinate, if there is one.
pub(crate) fn find_non_finite<'a>(points: impl IntoIterator<Item = &'a Point>) -> Option<String> {
    points
        .into_iter()
        .find(|point| !point.x.is_finite() || !point.y.is_finite())
        .map(|point| format!("coordinates must be finite, got ({}, {})", point.x, point.y))
}

fn is_collinear(points: &[Point]) -> bool {
    let origin = &points[0];
    let Some(direction) = points.iter().find(|point| *point != origin) else {
        return true;
    };
    points
        .iter()
        .all(|point| cross(origin, direction, point) == 0.0)
}
