//! Ear clipping triangulation with hole bridging.
//!
//! Every polygon is a doubly linked ring of vertices, outer rings counter-clockwise and hole rings
//! clockwise. Each hole is joined to its outer ring by a pair of coincident bridge edges, then ears
//! are clipped from the single remaining ring. Clipping continues from the vertex after the ear,
//! so runs of ears around a convex stretch share their first vertex and come out as fans.

use std::ops::Range;

use log::{debug, trace};

use super::nesting::{group_contours, ContourGroup};
use super::validate::find_crossing;
use super::{drop_degenerate_contours, drop_empty_contours, find_non_finite, PolygonInput, TessellationBackend};
use crate::geometry::predicates::{sign, signed_area, within_span};
use crate::primitive::{PrimitiveBatcher, PrimitiveSink};
use crate::Point;

/// Relative area mismatch above which the triangulation is reported as failed.
const COVERAGE_TOLERANCE: f64 = 1e-7;

/// The default backend, no external dependencies beyond the geometry predicates.
#[derive(Debug, Default)]
pub struct EarClipBackend {
    input: PolygonInput,
}

impl EarClipBackend {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TessellationBackend for EarClipBackend {
    fn begin_polygon(&mut self) {
        self.input.begin_polygon();
    }

    fn begin_contour(&mut self) {
        self.input.begin_contour();
    }

    fn vertex(&mut self, point: Point) {
        self.input.vertex(point);
    }

    fn end_contour(&mut self) {
        self.input.end_contour();
    }

    #[profiling::function]
    fn end_polygon(&mut self, sink: &mut dyn PrimitiveSink) {
        let contours = self.input.take_contours();
        if let Some(message) = find_non_finite(contours.iter().flatten()) {
            sink.error(message);
            return;
        }
        let contours = drop_degenerate_contours(contours);

        if let Some(at) = find_crossing(&contours) {
            sink.combine(at);
            return;
        }
        let contours = drop_empty_contours(contours);

        let mut batcher = PrimitiveBatcher::new();
        for ContourGroup {
            outer,
            holes,
        } in group_contours(&contours)
        {
            let mut vertices = contours[outer].clone();
            let outer_range = 0..vertices.len();
            let mut hole_ranges = Vec::with_capacity(holes.len());
            for hole in &holes {
                let start = vertices.len();
                vertices.extend_from_slice(&contours[*hole]);
                hole_ranges.push(start..vertices.len());
            }

            let triangles = EarClipper::new(&vertices).triangulate(outer_range, &hole_ranges);

            let expected = signed_area(&contours[outer]).abs()
                - holes
                    .iter()
                    .map(|hole| signed_area(&contours[*hole]).abs())
                    .sum::<f64>();
            let covered = triangles
                .iter()
                .map(|[a, b, c]| signed_area(&[vertices[*a], vertices[*b], vertices[*c]]).abs())
                .sum::<f64>();
            debug!(
                "contour {} with {} holes: {} triangles, area {} of {}",
                outer,
                holes.len(),
                triangles.len(),
                covered,
                expected
            );

            if (covered - expected).abs() > COVERAGE_TOLERANCE * expected.abs().max(1.0) {
                batcher.flush(sink);
                sink.error(format!(
                    "ear clipping covered an area of {} instead of {} for contour {}",
                    covered, expected, outer
                ));
                return;
            }

            for [a, b, c] in triangles {
                batcher.push_triangle([vertices[a], vertices[b], vertices[c]], sink);
            }
        }
        batcher.flush(sink);
    }
}

#[derive(Debug, Clone)]
struct Node {
    /// index of the source vertex, bridge copies share it
    i: usize,
    x: f64,
    y: f64,
    prev: usize,
    next: usize,
    steiner: bool,
}

struct EarClipper<'a> {
    vertices: &'a [Point],
    nodes: Vec<Node>,
    triangles: Vec<[usize; 3]>,
}

impl<'a> EarClipper<'a> {
    fn new(vertices: &'a [Point]) -> Self {
        Self {
            vertices,
            nodes: Vec::with_capacity(vertices.len() * 3 / 2),
            triangles: Vec::with_capacity(vertices.len()),
        }
    }

    /// Triangles as indices into the vertices, each one counter-clockwise.
    fn triangulate(mut self, outer: Range<usize>, holes: &[Range<usize>]) -> Vec<[usize; 3]> {
        let Some(mut outer_node) = self.linked_list(outer, true) else {
            return Vec::new();
        };
        if self.nodes[outer_node].next == self.nodes[outer_node].prev {
            return Vec::new();
        }

        if !holes.is_empty() {
            outer_node = self.eliminate_holes(holes, outer_node);
        }

        self.clip_ears(outer_node, Pass::Initial);
        self.triangles
    }

    fn linked_list(&mut self, range: Range<usize>, outer: bool) -> Option<usize> {
        let counter_clockwise = signed_area(&self.vertices[range.clone()]) > 0.0;
        let mut last = None;

        if outer == counter_clockwise {
            for i in range {
                last = Some(self.insert_node(i, last));
            }
        } else {
            for i in range.rev() {
                last = Some(self.insert_node(i, last));
            }
        }

        if let Some(node) = last {
            let next = self.nodes[node].next;
            if self.equals(node, next) {
                self.remove_node(node);
                last = Some(next);
            }
        }

        last
    }

    /// Removes duplicate and collinear vertices, returns a node still in the ring.
    fn filter_points(&mut self, start: usize, end: Option<usize>) -> usize {
        let mut end = end.unwrap_or(start);
        let mut p = start;

        loop {
            let Node {
                prev,
                next,
                steiner,
                ..
            } = self.nodes[p];
            let mut again = false;

            if !steiner && (self.equals(p, next) || self.area(prev, p, next) == 0.0) {
                self.remove_node(p);
                p = prev;
                end = prev;
                if p == self.nodes[p].next {
                    break;
                }
                again = true;
            } else {
                p = next;
            }

            if !again && p == end {
                break;
            }
        }

        end
    }

    fn clip_ears(&mut self, ear: usize, pass: Pass) {
        let mut ear = ear;
        let mut stop = ear;

        while self.nodes[ear].prev != self.nodes[ear].next {
            let prev = self.nodes[ear].prev;
            let next = self.nodes[ear].next;

            if self.is_ear(ear) {
                self.triangles
                    .push([self.nodes[prev].i, self.nodes[ear].i, self.nodes[next].i]);
                self.remove_node(ear);

                ear = next;
                stop = next;
                continue;
            }

            ear = next;

            if ear == stop {
                trace!("no ear found in a full lap, pass {:?}", pass);
                match pass {
                    Pass::Initial => {
                        let ear = self.filter_points(ear, None);
                        self.clip_ears(ear, Pass::Filtered);
                    }
                    Pass::Filtered => {
                        let filtered = self.filter_points(ear, None);
                        let ear = self.cure_local_intersections(filtered);
                        self.clip_ears(ear, Pass::Cured);
                    }
                    Pass::Cured => self.split_and_clip(ear),
                }
                break;
            }
        }
    }

    fn is_ear(&self, ear: usize) -> bool {
        let b = &self.nodes[ear];
        let (a, c) = (b.prev, b.next);
        if self.area(a, ear, c) >= 0.0 {
            // reflex
            return false;
        }

        let (a, c) = (&self.nodes[a], &self.nodes[c]);
        let x0 = a.x.min(b.x.min(c.x));
        let y0 = a.y.min(b.y.min(c.y));
        let x1 = a.x.max(b.x.max(c.x));
        let y1 = a.y.max(b.y.max(c.y));

        let mut p = c.next;
        while p != b.prev {
            let node = &self.nodes[p];
            if node.x >= x0
                && node.x <= x1
                && node.y >= y0
                && node.y <= y1
                && !(node.x == a.x && node.y == a.y)
                && point_in_triangle(a.x, a.y, b.x, b.y, c.x, c.y, node.x, node.y)
                && self.area(node.prev, p, node.next) >= 0.0
            {
                return false;
            }
            p = node.next;
        }

        true
    }

    /// Clips the triangle `(a, p, b)` wherever the ring doubles back over itself between `a` and `b`.
    fn cure_local_intersections(&mut self, start: usize) -> usize {
        let mut start = start;
        let mut p = start;

        loop {
            let a = self.nodes[p].prev;
            let p_next = self.nodes[p].next;
            let b = self.nodes[p_next].next;

            if !self.equals(a, b)
                && self.intersects(a, p, p_next, b)
                && self.locally_inside(a, b)
                && self.locally_inside(b, a)
            {
                self.triangles
                    .push([self.nodes[a].i, self.nodes[p].i, self.nodes[b].i]);
                self.remove_node(p);
                self.remove_node(p_next);

                p = b;
                start = b;
            }

            p = self.nodes[p].next;
            if p == start {
                break;
            }
        }

        self.filter_points(p, None)
    }

    /// Splits the ring along the first valid diagonal found and clips both halves.
    fn split_and_clip(&mut self, start: usize) {
        let mut a = start;
        loop {
            let a_prev = self.nodes[a].prev;
            let mut b = self.nodes[self.nodes[a].next].next;

            while b != a_prev {
                if self.nodes[a].i != self.nodes[b].i && self.is_valid_diagonal(a, b) {
                    let c = self.split_polygon(a, b);

                    let a_next = self.nodes[a].next;
                    let a = self.filter_points(a, Some(a_next));
                    let c_next = self.nodes[c].next;
                    let c = self.filter_points(c, Some(c_next));

                    self.clip_ears(a, Pass::Initial);
                    self.clip_ears(c, Pass::Initial);
                    return;
                }
                b = self.nodes[b].next;
            }

            a = self.nodes[a].next;
            if a == start {
                break;
            }
        }
        debug!("no valid diagonal left to split on, {} vertices remain", self.ring_len(start));
    }

    fn eliminate_holes(&mut self, holes: &[Range<usize>], outer_node: usize) -> usize {
        let mut queue = Vec::with_capacity(holes.len());
        for hole in holes {
            if let Some(list) = self.linked_list(hole.clone(), false) {
                if list == self.nodes[list].next {
                    self.nodes[list].steiner = true;
                }
                queue.push(self.leftmost(list));
            }
        }

        queue.sort_by(|a, b| {
            let (a, b) = (&self.nodes[*a], &self.nodes[*b]);
            a.x.total_cmp(&b.x)
                .then(a.y.total_cmp(&b.y))
        });

        let mut outer_node = outer_node;
        for hole in queue {
            outer_node = self.eliminate_hole(hole, outer_node);
        }
        outer_node
    }

    fn eliminate_hole(&mut self, hole: usize, outer_node: usize) -> usize {
        let Some(bridge) = self.find_hole_bridge(hole, outer_node) else {
            debug!("no bridge found for hole vertex {}", self.nodes[hole].i);
            return outer_node;
        };
        trace!("bridging hole vertex {} to vertex {}", self.nodes[hole].i, self.nodes[bridge].i);

        let bridge_reverse = self.split_polygon(bridge, hole);

        // collinear points around the cut
        let next = self.nodes[bridge_reverse].next;
        self.filter_points(bridge_reverse, Some(next));
        let next = self.nodes[bridge].next;
        self.filter_points(bridge, Some(next))
    }

    /// Finds an outer vertex visible from the leftmost vertex of a hole, by casting a ray to the
    /// left and picking the closest edge it hits.
    fn find_hole_bridge(&self, hole: usize, outer_node: usize) -> Option<usize> {
        let (hx, hy) = (self.nodes[hole].x, self.nodes[hole].y);
        let mut p = outer_node;
        let mut qx = f64::NEG_INFINITY;
        let mut m = None;

        if self.equals(hole, p) {
            return Some(p);
        }

        loop {
            let node = &self.nodes[p];
            let next = &self.nodes[node.next];

            if self.equals(hole, node.next) {
                return Some(node.next);
            } else if hy <= node.y && hy >= next.y && next.y != node.y {
                let x = node.x + (hy - node.y) * (next.x - node.x) / (next.y - node.y);
                if x <= hx && x > qx {
                    qx = x;
                    let candidate = if node.x < next.x { p } else { node.next };
                    m = Some(candidate);
                    if x == hx {
                        // hole touches the outer segment
                        return m;
                    }
                }
            }

            p = node.next;
            if p == outer_node {
                break;
            }
        }

        let mut m = m?;

        // look for points inside the triangle of hole point, segment intersection and endpoint,
        // the one with the smallest angle to the ray wins
        let stop = m;
        let (mx, my) = (self.nodes[m].x, self.nodes[m].y);
        let mut tan_min = f64::INFINITY;
        p = m;

        loop {
            let node = &self.nodes[p];
            let (ax, cx) = match hy < my {
                true => (hx, qx),
                false => (qx, hx),
            };

            if hx >= node.x
                && node.x >= mx
                && hx != node.x
                && point_in_triangle(ax, hy, mx, my, cx, hy, node.x, node.y)
            {
                let tan = (hy - node.y).abs() / (hx - node.x);
                let current = &self.nodes[m];
                if self.locally_inside(p, hole)
                    && (tan < tan_min
                        || (tan == tan_min
                            && (node.x > current.x || (node.x == current.x && self.sector_contains_sector(m, p)))))
                {
                    m = p;
                    tan_min = tan;
                }
            }

            p = node.next;
            if p == stop {
                break;
            }
        }

        Some(m)
    }

    /// Whether the sector in vertex `m` contains the sector in vertex `p` in the same coordinates.
    fn sector_contains_sector(&self, m: usize, p: usize) -> bool {
        let (m_node, p_node) = (&self.nodes[m], &self.nodes[p]);
        self.area(m_node.prev, m, p_node.prev) < 0.0 && self.area(p_node.next, m, m_node.next) < 0.0
    }

    fn leftmost(&self, start: usize) -> usize {
        let mut p = start;
        let mut leftmost = start;
        loop {
            let (node, best) = (&self.nodes[p], &self.nodes[leftmost]);
            if node.x < best.x || (node.x == best.x && node.y < best.y) {
                leftmost = p;
            }
            p = node.next;
            if p == start {
                break;
            }
        }
        leftmost
    }

    /// A diagonal from `a` to `b` stays inside the ring and crosses none of its edges.
    fn is_valid_diagonal(&self, a: usize, b: usize) -> bool {
        let (a_node, b_node) = (&self.nodes[a], &self.nodes[b]);
        let (a_prev, a_next) = (a_node.prev, a_node.next);
        let (b_prev, b_next) = (b_node.prev, b_node.next);

        self.nodes[a_next].i != b_node.i
            && self.nodes[a_prev].i != b_node.i
            && !self.intersects_ring(a, b)
            && ((self.locally_inside(a, b)
                && self.locally_inside(b, a)
                && self.middle_inside(a, b)
                // no opposite-facing sectors
                && (self.area(a_prev, a, b_prev) != 0.0 || self.area(a, b_prev, b) != 0.0))
                // zero length
                || (self.equals(a, b) && self.area(a_prev, a, a_next) > 0.0 && self.area(b_prev, b, b_next) > 0.0))
    }

    fn intersects(&self, p1: usize, q1: usize, p2: usize, q2: usize) -> bool {
        let o1 = sign(self.area(p1, q1, p2));
        let o2 = sign(self.area(p1, q1, q2));
        let o3 = sign(self.area(p2, q2, p1));
        let o4 = sign(self.area(p2, q2, q1));

        (o1 != o2 && o3 != o4)
            || (o1 == 0 && self.on_segment(p1, p2, q1))
            || (o2 == 0 && self.on_segment(p1, q2, q1))
            || (o3 == 0 && self.on_segment(p2, p1, q2))
            || (o4 == 0 && self.on_segment(p2, q1, q2))
    }

    fn intersects_ring(&self, a: usize, b: usize) -> bool {
        let (ai, bi) = (self.nodes[a].i, self.nodes[b].i);
        let mut p = a;
        loop {
            let next = self.nodes[p].next;
            let (pi, next_i) = (self.nodes[p].i, self.nodes[next].i);
            if pi != ai && next_i != ai && pi != bi && next_i != bi && self.intersects(p, next, a, b) {
                return true;
            }
            p = next;
            if p == a {
                return false;
            }
        }
    }

    /// The diagonal `a..b` starts off into the interior of the ring at `a`.
    fn locally_inside(&self, a: usize, b: usize) -> bool {
        let Node {
            prev,
            next,
            ..
        } = self.nodes[a];
        if self.area(prev, a, next) < 0.0 {
            self.area(a, b, next) >= 0.0 && self.area(a, prev, b) >= 0.0
        } else {
            self.area(a, b, prev) < 0.0 || self.area(a, next, b) < 0.0
        }
    }

    /// The midpoint of the diagonal `a..b` is inside the ring.
    fn middle_inside(&self, a: usize, b: usize) -> bool {
        let px = (self.nodes[a].x + self.nodes[b].x) / 2.0;
        let py = (self.nodes[a].y + self.nodes[b].y) / 2.0;
        let mut inside = false;
        let mut p = a;

        loop {
            let node = &self.nodes[p];
            let next = &self.nodes[node.next];
            if (node.y > py) != (next.y > py)
                && next.y != node.y
                && px < (next.x - node.x) * (py - node.y) / (next.y - node.y) + node.x
            {
                inside = !inside;
            }
            p = node.next;
            if p == a {
                break;
            }
        }

        inside
    }

    /// Links `a` to `b` with two coincident edges, splitting the ring in two.
    /// Returns the copy of `b` that starts the second ring.
    fn split_polygon(&mut self, a: usize, b: usize) -> usize {
        let a2 = self.nodes.len();
        let mut a_copy = self.nodes[a].clone();
        a_copy.steiner = false;
        self.nodes.push(a_copy);

        let b2 = self.nodes.len();
        let mut b_copy = self.nodes[b].clone();
        b_copy.steiner = false;
        self.nodes.push(b_copy);

        let an = self.nodes[a].next;
        let bp = self.nodes[b].prev;

        self.nodes[a].next = b;
        self.nodes[b].prev = a;

        self.nodes[a2].next = an;
        self.nodes[an].prev = a2;

        self.nodes[b2].next = a2;
        self.nodes[a2].prev = b2;

        self.nodes[bp].next = b2;
        self.nodes[b2].prev = bp;

        b2
    }

    fn insert_node(&mut self, i: usize, last: Option<usize>) -> usize {
        let index = self.nodes.len();
        let point = self.vertices[i];
        let (prev, next) = match last {
            Some(last) => (last, self.nodes[last].next),
            None => (index, index),
        };

        self.nodes.push(Node {
            i,
            x: point.x,
            y: point.y,
            prev,
            next,
            steiner: false,
        });

        if let Some(last) = last {
            self.nodes[next].prev = index;
            self.nodes[last].next = index;
        }

        index
    }

    fn remove_node(&mut self, p: usize) {
        let Node {
            prev,
            next,
            ..
        } = self.nodes[p];
        self.nodes[next].prev = prev;
        self.nodes[prev].next = next;
    }

    fn ring_len(&self, start: usize) -> usize {
        let mut count = 1;
        let mut p = self.nodes[start].next;
        while p != start {
            count += 1;
            p = self.nodes[p].next;
        }
        count
    }

    /// Negative for a counter-clockwise turn `p -> q -> r`.
    #[inline]
    fn area(&self, p: usize, q: usize, r: usize) -> f64 {
        let (p, q, r) = (&self.nodes[p], &self.nodes[q], &self.nodes[r]);
        (q.y - p.y) * (r.x - q.x) - (q.x - p.x) * (r.y - q.y)
    }

    #[inline]
    fn equals(&self, a: usize, b: usize) -> bool {
        let (a, b) = (&self.nodes[a], &self.nodes[b]);
        a.x == b.x && a.y == b.y
    }

    /// For collinear `p, q, r`, `q` lies on the segment `p..r`.
    #[inline]
    fn on_segment(&self, p: usize, q: usize, r: usize) -> bool {
        within_span(self.point(p), self.point(q), self.point(r))
    }

    /// Bridge copies share the index of their source vertex, and with it the position.
    #[inline]
    fn point(&self, node: usize) -> &Point {
        &self.vertices[self.nodes[node].i]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Pass {
    Initial,
    Filtered,
    Cured,
}

/// Inclusive, for triangles that turn counter-clockwise.
#[allow(clippy::too_many_arguments)]
#[inline]
fn point_in_triangle(ax: f64, ay: f64, bx: f64, by: f64, cx: f64, cy: f64, px: f64, py: f64) -> bool {
    (cx - px) * (ay - py) >= (ax - px) * (cy - py)
        && (ax - px) * (by - py) >= (bx - px) * (ay - py)
        && (bx - px) * (cy - py) >= (cx - px) * (by - py)
}
