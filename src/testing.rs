pub mod geometry {
    use std::f64::consts::PI;

    use crate::geometry::{Contour, ContourBuilder};
    use crate::Point;

    /// generate star points, starting with the point at the top of the star, alternating between outer and inner radius
    pub fn calculate_star_points(
        outer_radius: f64,
        inner_radius: f64,
        center_x: f64,
        center_y: f64,
    ) -> Vec<(f64, f64)> {
        let mut points = Vec::new();
        let angle_step = (2.0 * PI) / 10.0; // 36 degrees in radians

        for i in 0..10 {
            let radius = if i % 2 == 0 { outer_radius } else { inner_radius };
            let angle = angle_step * i as f64 - PI / 2.0;

            let x = center_x + radius * angle.cos();
            let y = center_y - radius * angle.sin();

            points.push((x, y));
        }
        points
    }

    /// A five pointed star centered on the origin.
    pub fn star(outer_radius: f64, inner_radius: f64) -> Contour {
        Contour::from_tuples(calculate_star_points(outer_radius, inner_radius, 0.0, 0.0))
    }

    pub fn rectangle(x: f64, y: f64, width: f64, height: f64) -> Contour {
        ContourBuilder::begin(Point::new(x, y))
            .line_to_xy(x + width, y)
            .line_to_xy(x + width, y + height)
            .line_to_xy(x, y + height)
            .build()
    }

    pub fn regular_polygon(sides: usize, radius: f64, center: Point) -> Contour {
        (0..sides)
            .map(|i| {
                let angle = 2.0 * PI * i as f64 / sides as f64;
                Point::new(center.x + radius * angle.cos(), center.y + radius * angle.sin())
            })
            .collect()
    }

    /// A 10x10 square and a diamond inside it, the diamond covers 18 square units.
    pub fn diamond_in_square() -> (Contour, Contour) {
        let square = rectangle(0.0, 0.0, 10.0, 10.0);
        let diamond = Contour::from_tuples([(5.0, 2.0), (8.0, 5.0), (5.0, 8.0), (2.0, 5.0)]);
        (square, diamond)
    }

    /// A canvas sized rectangle, traced back to its starting point, with a seven sided hole that
    /// is close to, but never touches, the rectangle.
    pub fn framed_heptagon(width: f64, height: f64) -> (Contour, Contour) {
        let frame = ContourBuilder::begin(Point::new(0.0, 0.0))
            .line_to_xy(width, 0.0)
            .line_to_xy(width, height)
            .line_to_xy(0.0, height)
            .line_to_xy(0.0, 0.0)
            .build();
        let heptagon = ContourBuilder::begin(Point::new(width / 2.0, height - 60.0))
            .line_to_xy(80.0, 297.0)
            .line_to_xy(81.0, 150.0)
            .line_to_xy(width / 2.0 - 70.0, 50.0)
            .line_to_xy(width / 2.0 + 70.0, 50.0)
            .line_to_xy(width - 80.0, 150.0)
            .line_to_xy(width - 81.0, 302.0)
            .build();
        (frame, heptagon)
    }

    /// Crosses itself at `(5, 5)`.
    pub fn figure_eight() -> Contour {
        Contour::from_tuples([(0.0, 0.0), (10.0, 10.0), (10.0, 0.0), (0.0, 10.0)])
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn test_star_points() {
            let points = calculate_star_points(10.0, 5.0, 0.0, 0.0);

            assert_eq!(points.len(), 10);
            // first point at the top, in y-down coordinates
            assert!((points[0].0 - 0.0).abs() < 1e-9);
            assert!((points[0].1 - 10.0).abs() < 1e-9);
        }

        #[test]
        fn test_shapes_are_simple_and_sized() {
            assert_eq!(rectangle(1.0, 2.0, 3.0, 4.0).area(), 12.0);
            assert_eq!(diamond_in_square().1.area(), 18.0);
            assert!(regular_polygon(6, 1.0, Point::origin()).is_convex());

            let (frame, heptagon) = framed_heptagon(800.0, 600.0);
            assert_eq!(frame.len(), 5);
            assert_eq!(heptagon.len(), 7);
            assert_eq!(frame.area(), 480_000.0);
        }
    }
}
