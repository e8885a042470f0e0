use nalgebra::Point3;

pub type Point = nalgebra::Point2<f64>;
pub type Vector = nalgebra::Vector2<f64>;

/// Points are planar, consumers that need 3D coordinates get `z = 0`.
pub trait PlanarZ {
    fn z(&self) -> f64;
    fn to_point3(self) -> Point3<f64>;
}

impl PlanarZ for Point {
    fn z(&self) -> f64 {
        0.0
    }

    fn to_point3(self) -> Point3<f64> {
        Point3::new(self.x, self.y, 0.0)
    }
}

/// Single precision views, for renderers that upload `f32` vertex data.
pub trait ToF32 {
    fn x_f32(&self) -> f32;
    fn y_f32(&self) -> f32;
    fn z_f32(&self) -> f32;
    fn to_f32_array(&self) -> [f32; 2];
}

impl ToF32 for Point {
    fn x_f32(&self) -> f32 {
        self.x as f32
    }

    fn y_f32(&self) -> f32 {
        self.y as f32
    }

    fn z_f32(&self) -> f32 {
        0.0
    }

    fn to_f32_array(&self) -> [f32; 2] {
        [self.x as f32, self.y as f32]
    }
}

pub trait FromTuple2 {
    fn from(value: (f64, f64)) -> Self;
}

impl FromTuple2 for Point {
    fn from(value: (f64, f64)) -> Self {
        Self::new(value.0, value.1)
    }
}

pub trait ToLyonPoint {
    fn to_lyon_point(self) -> lyon::math::Point;
}

impl ToLyonPoint for Point {
    fn to_lyon_point(self) -> lyon::math::Point {
        lyon::math::point(self.x as f32, self.y as f32)
    }
}

pub mod deduplicate {
    use crate::Point;

    pub trait DedupEpsilon {
        /// Removes consecutive points that are within `epsilon` of the last kept point,
        /// including the wrap-around from the last point back to the first.
        fn dedup_closed_with_epsilon(self, epsilon: f64) -> Self;
    }

    fn is_near(a: &Point, b: &Point, epsilon: f64) -> bool {
        (a.x - b.x).abs() <= epsilon && (a.y - b.y).abs() <= epsilon
    }

    impl DedupEpsilon for Vec<Point> {
        fn dedup_closed_with_epsilon(mut self, epsilon: f64) -> Self {
            if self.len() < 2 {
                return self;
            }

            let mut kept: Vec<Point> = Vec::with_capacity(self.len());
            for point in self.drain(..) {
                match kept.last() {
                    Some(last) if is_near(last, &point, epsilon) => {}
                    _ => kept.push(point),
                }
            }

            // closing point, e.g. a path that returns to its start
            while kept.len() > 1 && is_near(&kept[0], &kept[kept.len() - 1], epsilon) {
                kept.pop();
            }

            kept
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn test_empty_vec() {
            let vertices: Vec<Point> = vec![];
            let result = vertices.dedup_closed_with_epsilon(0.001);
            assert_eq!(result.len(), 0);
        }

        #[test]
        fn test_single_element() {
            let vertices = vec![Point::new(1.0, 2.0)];
            let result = vertices.dedup_closed_with_epsilon(0.001);
            assert_eq!(result, vec![Point::new(1.0, 2.0)]);
        }

        #[test]
        fn test_no_duplicates() {
            let vertices = vec![Point::new(0.0, 0.0), Point::new(1.0, 1.0), Point::new(2.0, 0.0)];

            let expected_result = vertices.clone();

            // when
            let result = vertices.dedup_closed_with_epsilon(0.0001);

            // then
            assert_eq!(result, expected_result);
        }

        #[test]
        fn test_with_adjacent_duplicates() {
            let vertices = vec![
                Point::new(0.0, 0.0),
                Point::new(0.0, 0.0),
                Point::new(1.0, 1.0),
                Point::new(2.0, 0.0),
            ];
            let result = vertices.dedup_closed_with_epsilon(1e-6);
            assert_eq!(result, vec![Point::new(0.0, 0.0), Point::new(1.0, 1.0), Point::new(2.0, 0.0)]);
        }

        #[test]
        fn test_closing_point_removed() {
            // given
            let vertices = vec![
                Point::new(0.0, 0.0),
                Point::new(800.0, 0.0),
                Point::new(800.0, 600.0),
                Point::new(0.0, 600.0),
                Point::new(0.0, 0.0),
            ];

            // when
            let result = vertices.dedup_closed_with_epsilon(1e-9);

            // then
            assert_eq!(result.len(), 4);
            assert_eq!(result[3], Point::new(0.0, 600.0));
        }

        #[test]
        fn test_all_points_identical() {
            let vertices = vec![Point::new(3.0, 3.0), Point::new(3.0, 3.0), Point::new(3.0, 3.0)];
            let result = vertices.dedup_closed_with_epsilon(1e-6);
            assert_eq!(result, vec![Point::new(3.0, 3.0)]);
        }

        #[test]
        fn test_dedup_edge_epsilon() {
            // given
            let vertices = vec![
                Point::new(0.0, 0.0),
                // ensure positive numbers on y axis are detected
                Point::new(0.0, 0.0000005),
                Point::new(0.0, 0.0000009),
                // ensure negative numbers on x axis are detected
                Point::new(-3.0000000, 1.0),
                Point::new(-3.0000001, 1.0),
                // ensure negative numbers on y axis are detected
                Point::new(2.0, -2.0),
                Point::new(2.0, -2.0000001),
                // and the wrap-around back to the start
                Point::new(0.0000001, 0.0),
            ];

            // and
            let expected_result = vec![Point::new(0.0, 0.0), Point::new(-3.0, 1.0), Point::new(2.0, -2.0)];

            // when
            let result = vertices.dedup_closed_with_epsilon(0.000001);

            // then
            assert_eq!(result, expected_result);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_planar_z() {
        let point = Point::new(1.5, -2.0);
        assert_eq!(point.z(), 0.0);
        assert_eq!(point.to_point3(), Point3::new(1.5, -2.0, 0.0));
    }

    #[test]
    fn test_f32_views() {
        let point = <Point as FromTuple2>::from((0.25, 8.0));
        assert_eq!(point.to_f32_array(), [0.25_f32, 8.0_f32]);
        assert_eq!(point.z_f32(), 0.0);
    }
}
