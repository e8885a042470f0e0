//! Feeds an outer contour and an optional hole through a backend.

use log::debug;

use crate::backend::{find_non_finite, EarClipBackend, TessellationBackend};
use crate::error::TessellationResult;
use crate::geometry::Contour;
use crate::primitive::{PrimitiveSink, PrimitiveStream, StreamRecorder};

/// Consecutive points closer than this, on both axes, are merged before triangulation.
pub const DEFAULT_DEDUP_EPSILON: f64 = 1e-9;

/// Triangulates `outer` minus `hole` with the ear clipping backend and records the batches.
///
/// Degenerate contours, with fewer than 3 distinct points, are skipped rather than rejected. A NaN
/// or infinite coordinate fails the whole polygon.
pub fn tessellate(outer: &Contour, hole: Option<&Contour>) -> TessellationResult<PrimitiveStream> {
    tessellate_with(&mut EarClipBackend::new(), outer, hole)
}

pub fn tessellate_with<B: TessellationBackend + ?Sized>(
    backend: &mut B,
    outer: &Contour,
    hole: Option<&Contour>,
) -> TessellationResult<PrimitiveStream> {
    let mut recorder = StreamRecorder::new();
    run_backend(backend, outer, hole, DEFAULT_DEDUP_EPSILON, &mut recorder);
    recorder.finish()
}

/// Runs one polygon through `backend`, reporting everything it emits to `sink`.
pub fn run_backend<B: TessellationBackend + ?Sized>(
    backend: &mut B,
    outer: &Contour,
    hole: Option<&Contour>,
    dedup_epsilon: f64,
    sink: &mut dyn PrimitiveSink,
) {
    let points = outer
        .points()
        .iter()
        .chain(hole.into_iter().flat_map(Contour::points));
    if let Some(message) = find_non_finite(points) {
        debug!("rejecting polygon, {}", message);
        sink.error(message);
        return;
    }

    backend.begin_polygon();

    for (name, contour) in [("outer", Some(outer)), ("hole", hole)] {
        let Some(contour) = contour else {
            continue;
        };
        let Some(cleaned) = contour.cleaned(dedup_epsilon) else {
            debug!("{} contour is degenerate, {} points, skipping it", name, contour.len());
            continue;
        };

        backend.begin_contour();
        for point in cleaned.points() {
            backend.vertex(*point);
        }
        backend.end_contour();
    }

    backend.end_polygon(sink);
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;
    use crate::assembler::TriangleAssembler;
    use crate::backend::LyonBackend;
    use crate::error::TessellationError;
    use crate::geometry::{triangles_area, Triangle};
    use crate::types::PrimitiveKind;
    use crate::Point;

    fn square() -> Contour {
        Contour::from_tuples([(0.0, 0.0), (10.0, 0.0), (10.0, 10.0), (0.0, 10.0)])
    }

    #[test]
    fn test_stream_holds_only_fans_and_strips() {
        // given
        let hole = Contour::from_tuples([(5.0, 2.0), (8.0, 5.0), (5.0, 8.0), (2.0, 5.0)]);

        // when
        let stream = tessellate(&square(), Some(&hole)).unwrap();

        // then
        assert!(!stream.is_empty());
        assert!(stream
            .batches()
            .iter()
            .all(|batch| matches!(batch.kind, PrimitiveKind::TriangleFan | PrimitiveKind::TriangleStrip)));

        let triangles = TriangleAssembler::decode(&stream).unwrap();
        assert!((triangles_area(&triangles) - 82.0).abs() < 1e-9);
    }

    #[test]
    fn test_closing_point_and_near_duplicates_are_removed() {
        let outer = Contour::from_tuples([
            (0.0, 0.0),
            (10.0, 0.0),
            (10.0, 1e-12),
            (10.0, 10.0),
            (0.0, 10.0),
            (0.0, 0.0),
        ]);

        let triangles = TriangleAssembler::decode(&tessellate(&outer, None).unwrap()).unwrap();

        assert_eq!(triangles.len(), 2);
        assert!((triangles_area(&triangles) - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_degenerate_outer_with_valid_hole() {
        // only the hole contour remains, it is filled like any other outer boundary
        let outer = Contour::from_tuples([(0.0, 0.0), (1.0, 1.0)]);

        let stream = tessellate(&outer, Some(&square())).unwrap();

        let triangles = TriangleAssembler::decode(&stream).unwrap();
        assert!((triangles_area(&triangles) - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_hole_crossing_outer() {
        let hole = Contour::from_tuples([(5.0, 5.0), (15.0, 5.0), (15.0, 8.0)]);

        let result = tessellate(&square(), Some(&hole));

        assert!(matches!(result, Err(TessellationError::SelfIntersection { .. })));
    }

    #[test]
    fn test_backends_agree_on_area() {
        let outer = Contour::from_tuples([(0.0, 0.0), (10.0, 0.0), (10.0, 10.0), (5.0, 3.0), (0.0, 10.0)]);
        let hole = Contour::from_tuples([(4.0, 1.0), (6.0, 1.0), (5.0, 2.0)]);

        let ear_clip = TriangleAssembler::decode(&tessellate(&outer, Some(&hole)).unwrap()).unwrap();
        let lyon = TriangleAssembler::decode(&tessellate_with(&mut LyonBackend::new(), &outer, Some(&hole)).unwrap())
            .unwrap();

        assert!((triangles_area(&ear_clip) - triangles_area(&lyon)).abs() < 1e-9);
        assert!((triangles_area(&ear_clip) - 64.0).abs() < 1e-9);
    }

    #[test]
    fn test_backend_reused_for_a_second_polygon() {
        // given
        let mut backend = EarClipBackend::new();
        let small = Contour::from_tuples([(0.0, 0.0), (1.0, 0.0), (0.0, 1.0)]);

        // when
        tessellate_with(&mut backend, &square(), None).unwrap();
        let stream = tessellate_with(&mut backend, &small, None).unwrap();

        // then
        let triangles = TriangleAssembler::decode(&stream).unwrap();
        assert_eq!(triangles.len(), 1);
        assert!(triangles[0].is_rotation_of(&Triangle::new(
            Point::new(0.0, 0.0),
            Point::new(1.0, 0.0),
            Point::new(0.0, 1.0)
        )));
    }

    #[rstest]
    #[case(f64::NAN, 0.0)]
    #[case(0.5, f64::INFINITY)]
    #[case(f64::NEG_INFINITY, 0.5)]
    fn test_non_finite_coordinates_are_rejected(#[case] x: f64, #[case] y: f64) {
        // given
        let outer = Contour::from_tuples([(0.0, 0.0), (x, y), (1.0, 1.0), (0.0, 1.0)]);

        // when
        let ear_clip = tessellate(&outer, None);
        let lyon = tessellate_with(&mut LyonBackend::new(), &outer, None);

        // then
        for result in [ear_clip, lyon] {
            assert!(
                matches!(result, Err(TessellationError::UnderlyingTriangulationFailure(ref message)) if message.starts_with("coordinates must be finite")),
                "result: {:?}",
                result
            );
        }
    }

    #[test]
    fn test_non_finite_hole_is_rejected() {
        let hole = Contour::from_tuples([(2.0, 2.0), (3.0, f64::NAN), (2.0, 3.0)]);

        let result = tessellate(&square(), Some(&hole));

        assert!(matches!(result, Err(TessellationError::UnderlyingTriangulationFailure(_))));
    }

    #[test]
    fn test_figure_eight_is_not_skipped_as_empty() {
        // the lobes have equal and opposite area, the net area is zero
        let figure_eight = Contour::from_tuples([(0.0, 0.0), (10.0, 10.0), (10.0, 0.0), (0.0, 10.0)]);
        assert_eq!(figure_eight.signed_area(), 0.0);

        for result in [
            tessellate(&figure_eight, None),
            tessellate_with(&mut LyonBackend::new(), &figure_eight, None),
        ] {
            assert_eq!(
                result,
                Err(TessellationError::SelfIntersection {
                    at: Point::new(5.0, 5.0)
                })
            );
        }
    }

    #[test]
    fn test_lyon_triangulates_a_plain_square() {
        let stream = tessellate_with(&mut LyonBackend::new(), &square(), None).unwrap();

        let triangles = TriangleAssembler::decode(&stream).unwrap();
        assert_eq!(triangles.len(), 2);
        assert!((triangles_area(&triangles) - 100.0).abs() < 1e-9);
    }
}
