//! Detects input that could only be triangulated by adding vertices where edges cross.

use log::debug;

use crate::geometry::predicates::{direction_in_sector, segment_contact, SegmentContact};
use crate::geometry::BoundingBox;
use crate::Point;

#[derive(Debug, Clone, Copy)]
struct Edge {
    contour: usize,
    index: usize,
    from: Point,
    to: Point,
}

/// The two rays leaving a contact point along one of the contours.
struct Wedge {
    from: Point,
    to: Point,
}

/// Returns the first point where the contours cross themselves or each other.
///
/// Contours are closed and must already be free of consecutive duplicate points. Contours may
/// touch, at a shared vertex or with a vertex lying on another edge, as long as they do not pass
/// through each other there.
pub(crate) fn find_crossing(contours: &[Vec<Point>]) -> Option<Point> {
    let edges = contours
        .iter()
        .enumerate()
        .flat_map(|(contour, points)| {
            let n = points.len();
            (0..n).map(move |index| Edge {
                contour,
                index,
                from: points[index],
                to: points[(index + 1) % n],
            })
        })
        .collect::<Vec<_>>();

    let bounds = edges
        .iter()
        .map(|edge| BoundingBox::from_points(&[edge.from, edge.to]))
        .collect::<Vec<_>>();

    let mut contour_bounds = vec![BoundingBox::default(); contours.len()];
    for (edge, bound) in edges.iter().zip(&bounds) {
        contour_bounds[edge.contour].expand(bound);
    }

    for i in 0..edges.len() {
        for j in (i + 1)..edges.len() {
            let (a, b) = (&edges[i], &edges[j]);
            if a.contour != b.contour && !contour_bounds[a.contour].overlaps(&contour_bounds[b.contour]) {
                continue;
            }
            if !bounds[i].overlaps(&bounds[j]) || are_adjacent(contours, a, b) {
                continue;
            }

            let crossing = match segment_contact(&a.from, &a.to, &b.from, &b.to) {
                None => None,
                Some(SegmentContact::Crossing(at)) | Some(SegmentContact::Overlap(at)) => Some(at),
                Some(SegmentContact::Touch(at)) => {
                    let first = wedge_at(contours, a, &at);
                    let second = wedge_at(contours, b, &at);
                    match wedges_cross(&first, &second, &at) {
                        true => Some(at),
                        false => None,
                    }
                }
            };

            if let Some(at) = crossing {
                debug!(
                    "edges cross at {:?}, contour {} edge {} and contour {} edge {}",
                    at, a.contour, a.index, b.contour, b.index
                );
                return Some(at);
            }
        }
    }

    None
}

fn are_adjacent(contours: &[Vec<Point>], a: &Edge, b: &Edge) -> bool {
    if a.contour != b.contour {
        return false;
    }
    let n = contours[a.contour].len();
    (a.index + 1) % n == b.index || (b.index + 1) % n == a.index
}

fn wedge_at(contours: &[Vec<Point>], edge: &Edge, at: &Point) -> Wedge {
    let points = &contours[edge.contour];
    let n = points.len();
    let vertex = if edge.from == *at {
        Some(edge.index)
    } else if edge.to == *at {
        Some((edge.index + 1) % n)
    } else {
        None
    };

    match vertex {
        Some(vertex) => Wedge {
            from: points[(vertex + n - 1) % n],
            to: points[(vertex + 1) % n],
        },
        // contact in the middle of the edge, the contour passes straight through
        None => Wedge {
            from: edge.from,
            to: edge.to,
        },
    }
}

/// The second chain passes from one side of the first chain to the other at `apex`.
fn wedges_cross(first: &Wedge, second: &Wedge, apex: &Point) -> bool {
    let inside = |d: &Point| direction_in_sector(&first.from, &first.to, d, apex);
    let outside = |d: &Point| direction_in_sector(&first.to, &first.from, d, apex);

    (inside(&second.from) && outside(&second.to)) || (outside(&second.from) && inside(&second.to))
}
