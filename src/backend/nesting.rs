//! Groups non-crossing contours into outer boundaries and the holes directly inside them.
//!
//! A contour nested inside an even number of other contours bounds filled area, one nested inside
//! an odd number is a hole in its immediate parent. This is the even-odd rule, and for contours
//! that do not cross it is also what the non-zero rule gives once holes wind against their outer
//! boundary.

use log::debug;

use crate::geometry::predicates::{point_in_polygon, Containment};
use crate::Point;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ContourGroup {
    pub outer: usize,
    pub holes: Vec<usize>,
}

pub(crate) fn group_contours(contours: &[Vec<Point>]) -> Vec<ContourGroup> {
    let n = contours.len();
    let parents = (0..n)
        .map(|i| {
            (0..n)
                .filter(|&j| j != i && is_inside(&contours[i], &contours[j]))
                .collect::<Vec<_>>()
        })
        .collect::<Vec<_>>();
    let depth = |i: usize| parents[i].len();

    let mut groups = (0..n)
        .filter(|&i| depth(i) % 2 == 0)
        .map(|outer| ContourGroup {
            outer,
            holes: Vec::new(),
        })
        .collect::<Vec<_>>();

    for hole in (0..n).filter(|&i| depth(i) % 2 == 1) {
        let parent = parents[hole]
            .iter()
            .copied()
            .find(|&j| depth(j) + 1 == depth(hole));
        match parent.and_then(|parent| groups.iter_mut().find(|group| group.outer == parent)) {
            Some(group) => group.holes.push(hole),
            None => debug!("contour {} has no parent at depth {}, ignoring it", hole, depth(hole) - 1),
        }
    }

    debug!("contour groups: {:?}", groups);
    groups
}

/// `inner` lies inside `outer`, judged by the first vertex (or edge midpoint) of `inner` that is
/// not on the boundary of `outer`.
fn is_inside(inner: &[Point], outer: &[Point]) -> bool {
    let n = inner.len();
    let midpoints = (0..n).map(|i| Point::from((inner[i].coords + inner[(i + 1) % n].coords) / 2.0));

    inner
        .iter()
        .copied()
        .chain(midpoints)
        .find_map(|sample| match point_in_polygon(&sample, outer) {
            Containment::Inside => Some(true),
            Containment::Outside => Some(false),
            Containment::Boundary => None,
        })
        .unwrap_or(false)
}
