use crate::Point;

#[derive(Debug, Clone, PartialEq, PartialOrd)]
pub struct BoundingBox {
    pub min: Point,
    pub max: Point,
}

impl BoundingBox {
    pub fn expand(&mut self, other: &BoundingBox) {
        self.min.x = self.min.x.min(other.min.x);
        self.min.y = self.min.y.min(other.min.y);
        self.max.x = self.max.x.max(other.max.x);
        self.max.y = self.max.y.max(other.max.y);
    }

    pub fn expand_to_point(&mut self, point: &Point) {
        self.min.x = self.min.x.min(point.x);
        self.min.y = self.min.y.min(point.y);
        self.max.x = self.max.x.max(point.x);
        self.max.y = self.max.y.max(point.y);
    }
}

impl Default for BoundingBox {
    fn default() -> Self {
        Self {
            min: Point::new(f64::MAX, f64::MAX),
            max: Point::new(f64::MIN, f64::MIN),
        }
    }
}

impl BoundingBox {
    /// Inclusive of the edges, touching boxes overlap.
    pub fn overlaps(&self, other: &BoundingBox) -> bool {
        self.min.x <= other.max.x && other.min.x <= self.max.x && self.min.y <= other.max.y && other.min.y <= self.max.y
    }

    /// Constructs a bounding box from a list of points
    pub fn from_points(points: &[Point]) -> Self {
        let mut bbox = Self::default();

        for point in points {
            bbox.expand_to_point(point);
        }

        bbox
    }
}

#[cfg(test)]
mod bbox_tests {
    use rstest::rstest;

    use super::BoundingBox;
    use crate::Point;

    #[test]
    pub fn test_from_points() {
        let bbox = BoundingBox::from_points(&[Point::new(1.0, 5.0), Point::new(-2.0, 3.0), Point::new(4.0, -1.0)]);

        assert_eq!(bbox.min, Point::new(-2.0, -1.0));
        assert_eq!(bbox.max, Point::new(4.0, 5.0));
    }

    #[test]
    fn test_expand() {
        let mut bbox = BoundingBox::from_points(&[Point::new(0.0, 0.0), Point::new(1.0, 1.0)]);

        bbox.expand(&BoundingBox::from_points(&[Point::new(-2.0, 0.5), Point::new(0.5, 3.0)]));
        assert_eq!(bbox.min, Point::new(-2.0, 0.0));
        assert_eq!(bbox.max, Point::new(1.0, 3.0));

        // the empty default box changes nothing
        bbox.expand(&BoundingBox::default());
        assert_eq!(bbox.max, Point::new(1.0, 3.0));
    }

    #[rstest]
    #[case(BoundingBox { min: Point::new(5.0, 5.0), max: Point::new(15.0, 15.0) }, true)]
    #[case(BoundingBox { min: Point::new(10.0, 0.0), max: Point::new(20.0, 10.0) }, true)] // shared edge
    #[case(BoundingBox { min: Point::new(10.5, 0.0), max: Point::new(20.0, 10.0) }, false)]
    #[case(BoundingBox::default(), false)]
    fn test_overlaps(#[case] other: BoundingBox, #[case] expected: bool) {
        let bbox = BoundingBox {
            min: Point::new(0.0, 0.0),
            max: Point::new(10.0, 10.0),
        };
        assert_eq!(bbox.overlaps(&other), expected);
    }
}
