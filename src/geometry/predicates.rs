//! Floating point orientation and intersection predicates shared by the backends.

use crate::Point;

/// Twice the signed area of the triangle `o, a, b`, positive for a counter-clockwise turn.
#[inline]
pub fn cross(o: &Point, a: &Point, b: &Point) -> f64 {
    (a.x - o.x) * (b.y - o.y) - (a.y - o.y) * (b.x - o.x)
}

#[inline]
pub fn sign(value: f64) -> i8 {
    if value > 0.0 {
        1
    } else if value < 0.0 {
        -1
    } else {
        0
    }
}

/// Shoelace formula, positive for counter-clockwise loops.
pub fn signed_area(points: &[Point]) -> f64 {
    if points.len() < 3 {
        return 0.0;
    }
    let mut sum = 0.0;
    let mut j = points.len() - 1;
    for i in 0..points.len() {
        sum += (points[j].x - points[i].x) * (points[j].y + points[i].y);
        j = i;
    }
    sum / 2.0
}

/// `q` lies within the axis aligned box spanned by `p` and `r`.
///
/// Only meaningful when the three points are already known to be collinear.
#[inline]
pub fn within_span(p: &Point, q: &Point, r: &Point) -> bool {
    q.x <= p.x.max(r.x) && q.x >= p.x.min(r.x) && q.y <= p.y.max(r.y) && q.y >= p.y.min(r.y)
}

/// `p` lies on the closed segment `a..b`.
pub fn on_segment(p: &Point, a: &Point, b: &Point) -> bool {
    cross(a, b, p) == 0.0 && within_span(a, p, b)
}

/// Inclusive test, works for either triangle orientation.
pub fn point_in_triangle(a: &Point, b: &Point, c: &Point, p: &Point) -> bool {
    let d1 = sign(cross(a, b, p));
    let d2 = sign(cross(b, c, p));
    let d3 = sign(cross(c, a, p));
    let has_negative = d1 < 0 || d2 < 0 || d3 < 0;
    let has_positive = d1 > 0 || d2 > 0 || d3 > 0;
    !(has_negative && has_positive)
}

/// Where two segments meet, if they do.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SegmentContact {
    /// Both interiors cross at a single point.
    Crossing(Point),
    /// Collinear with an overlap of positive length, the point is the start of the overlap.
    Overlap(Point),
    /// An endpoint of one segment lies on the other (including shared endpoints).
    Touch(Point),
}

/// Classifies the contact between the segments `a..b` and `c..d`.
pub fn segment_contact(a: &Point, b: &Point, c: &Point, d: &Point) -> Option<SegmentContact> {
    let o1 = sign(cross(a, b, c));
    let o2 = sign(cross(a, b, d));
    let o3 = sign(cross(c, d, a));
    let o4 = sign(cross(c, d, b));

    if o1 * o2 < 0 && o3 * o4 < 0 {
        let denominator = (b.x - a.x) * (d.y - c.y) - (b.y - a.y) * (d.x - c.x);
        let t = ((c.x - a.x) * (d.y - c.y) - (c.y - a.y) * (d.x - c.x)) / denominator;
        return Some(SegmentContact::Crossing(Point::new(a.x + t * (b.x - a.x), a.y + t * (b.y - a.y))));
    }

    if o1 == 0 && o2 == 0 && o3 == 0 && o4 == 0 {
        // project onto the dominant axis
        let use_x = (b.x - a.x).abs() >= (b.y - a.y).abs();
        let key = |p: &Point| if use_x { p.x } else { p.y };
        let (a_lo, a_hi) = ordered(key(a), key(b));
        let (c_lo, c_hi) = ordered(key(c), key(d));
        let lo = a_lo.max(c_lo);
        let hi = a_hi.min(c_hi);
        if lo < hi {
            let start = [a, b, c, d]
                .into_iter()
                .find(|p| key(p) == lo)
                .copied()
                .unwrap_or(*a);
            return Some(SegmentContact::Overlap(start));
        }
        if lo == hi {
            let at = [a, b, c, d]
                .into_iter()
                .find(|p| key(p) == lo)
                .copied()
                .unwrap_or(*a);
            return Some(SegmentContact::Touch(at));
        }
        return None;
    }

    if o1 == 0 && within_span(a, c, b) {
        return Some(SegmentContact::Touch(*c));
    }
    if o2 == 0 && within_span(a, d, b) {
        return Some(SegmentContact::Touch(*d));
    }
    if o3 == 0 && within_span(c, a, d) {
        return Some(SegmentContact::Touch(*a));
    }
    if o4 == 0 && within_span(c, b, d) {
        return Some(SegmentContact::Touch(*b));
    }

    None
}

fn ordered(a: f64, b: f64) -> (f64, f64) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Containment {
    Inside,
    Outside,
    Boundary,
}

/// Crossing-number point in polygon test that reports points on the boundary separately.
pub fn point_in_polygon(point: &Point, polygon: &[Point]) -> Containment {
    if polygon.len() < 3 {
        return Containment::Outside;
    }

    let mut inside = false;
    let mut j = polygon.len() - 1;
    for i in 0..polygon.len() {
        let a = &polygon[j];
        let b = &polygon[i];
        if on_segment(point, a, b) {
            return Containment::Boundary;
        }
        if (b.y > point.y) != (a.y > point.y) {
            let x = b.x + (point.y - b.y) * (a.x - b.x) / (a.y - b.y);
            if point.x < x {
                inside = !inside;
            }
        }
        j = i;
    }

    match inside {
        true => Containment::Inside,
        false => Containment::Outside,
    }
}

/// Direction `d` lies strictly inside the counter-clockwise angular sector that starts at
/// direction `from` and ends at direction `to`, all directions taken from a common apex.
pub fn direction_in_sector(from: &Point, to: &Point, d: &Point, apex: &Point) -> bool {
    let angle = |p: &Point| (p.y - apex.y).atan2(p.x - apex.x);
    let full = std::f64::consts::TAU;
    let start = angle(from);
    let span = (angle(to) - start).rem_euclid(full);
    let offset = (angle(d) - start).rem_euclid(full);
    offset > 0.0 && offset < span
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    fn square() -> Vec<Point> {
        vec![
            Point::new(0.0, 0.0),
            Point::new(10.0, 0.0),
            Point::new(10.0, 10.0),
            Point::new(0.0, 10.0),
        ]
    }

    #[test]
    fn test_signed_area() {
        let mut points = square();
        assert_eq!(signed_area(&points), 100.0);

        points.reverse();
        assert_eq!(signed_area(&points), -100.0);
    }

    #[rstest]
    #[case(Point::new(5.0, 5.0), Containment::Inside)]
    #[case(Point::new(15.0, 5.0), Containment::Outside)]
    #[case(Point::new(10.0, 5.0), Containment::Boundary)]
    #[case(Point::new(0.0, 0.0), Containment::Boundary)]
    #[case(Point::new(-1.0, 10.0), Containment::Outside)]
    fn test_point_in_polygon(#[case] point: Point, #[case] expected: Containment) {
        assert_eq!(point_in_polygon(&point, &square()), expected);
    }

    #[test]
    fn test_crossing_segments() {
        let contact = segment_contact(
            &Point::new(0.0, 0.0),
            &Point::new(2.0, 2.0),
            &Point::new(0.0, 2.0),
            &Point::new(2.0, 0.0),
        );
        assert_eq!(contact, Some(SegmentContact::Crossing(Point::new(1.0, 1.0))));
    }

    #[test]
    fn test_overlapping_segments() {
        let contact = segment_contact(
            &Point::new(0.0, 0.0),
            &Point::new(4.0, 0.0),
            &Point::new(2.0, 0.0),
            &Point::new(6.0, 0.0),
        );
        assert_eq!(contact, Some(SegmentContact::Overlap(Point::new(2.0, 0.0))));
    }

    #[rstest]
    // t-junction
    #[case((0.0, 0.0), (4.0, 0.0), (2.0, 0.0), (2.0, 3.0), Some(SegmentContact::Touch(Point::new(2.0, 0.0))))]
    // shared endpoint
    #[case((0.0, 0.0), (4.0, 0.0), (4.0, 0.0), (4.0, 3.0), Some(SegmentContact::Touch(Point::new(4.0, 0.0))))]
    // collinear, end to end
    #[case((0.0, 0.0), (4.0, 0.0), (4.0, 0.0), (8.0, 0.0), Some(SegmentContact::Touch(Point::new(4.0, 0.0))))]
    // disjoint
    #[case((0.0, 0.0), (4.0, 0.0), (0.0, 1.0), (4.0, 1.0), None)]
    // collinear, apart
    #[case((0.0, 0.0), (1.0, 0.0), (2.0, 0.0), (3.0, 0.0), None)]
    fn test_segment_contact(
        #[case] a: (f64, f64),
        #[case] b: (f64, f64),
        #[case] c: (f64, f64),
        #[case] d: (f64, f64),
        #[case] expected: Option<SegmentContact>,
    ) {
        let contact = segment_contact(
            &Point::new(a.0, a.1),
            &Point::new(b.0, b.1),
            &Point::new(c.0, c.1),
            &Point::new(d.0, d.1),
        );
        assert_eq!(contact, expected);
    }

    #[test]
    fn test_point_in_triangle_either_orientation() {
        let (a, b, c) = (Point::new(0.0, 0.0), Point::new(4.0, 0.0), Point::new(0.0, 4.0));
        assert!(point_in_triangle(&a, &b, &c, &Point::new(1.0, 1.0)));
        assert!(point_in_triangle(&a, &c, &b, &Point::new(1.0, 1.0)));
        assert!(point_in_triangle(&a, &b, &c, &Point::new(2.0, 0.0)));
        assert!(!point_in_triangle(&a, &b, &c, &Point::new(3.0, 3.0)));
    }

    #[test]
    fn test_direction_in_sector() {
        let apex = Point::new(0.0, 0.0);
        // sector from +x counter-clockwise to +y
        let from = Point::new(1.0, 0.0);
        let to = Point::new(0.0, 1.0);
        assert!(direction_in_sector(&from, &to, &Point::new(1.0, 1.0), &apex));
        assert!(!direction_in_sector(&from, &to, &Point::new(-1.0, -1.0), &apex));
        // on a bounding ray is not strictly inside
        assert!(!direction_in_sector(&from, &to, &Point::new(2.0, 0.0), &apex));
    }
}
