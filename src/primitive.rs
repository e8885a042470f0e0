//! Typed primitive batches, the interface between triangulation backends and the assembler.

use log::trace;

use crate::error::{TessellationError, TessellationResult};
use crate::types::PrimitiveKind;
use crate::Point;

/// Receives the output of a triangulation backend.
///
/// Calls arrive as `begin`, any number of `vertex`, `end`, repeated once per batch. `combine` and
/// `error` may arrive at any point and report a failure of the whole polygon.
pub trait PrimitiveSink {
    fn begin(&mut self, kind: PrimitiveKind);

    fn vertex(&mut self, point: Point);

    fn end(&mut self);

    /// The backend needs a new vertex at `at` to continue, which only happens where edges cross.
    fn combine(&mut self, at: Point);

    fn error(&mut self, message: String);
}

#[derive(Debug, Clone, PartialEq)]
pub struct PrimitiveBatch {
    pub kind: PrimitiveKind,
    pub vertices: Vec<Point>,
}

impl PrimitiveBatch {
    pub fn new(kind: PrimitiveKind, vertices: Vec<Point>) -> Self {
        Self {
            kind,
            vertices,
        }
    }

    pub fn fan(vertices: Vec<Point>) -> Self {
        Self::new(PrimitiveKind::TriangleFan, vertices)
    }

    pub fn strip(vertices: Vec<Point>) -> Self {
        Self::new(PrimitiveKind::TriangleStrip, vertices)
    }
}

/// The ordered batches produced for one polygon.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PrimitiveStream {
    batches: Vec<PrimitiveBatch>,
}

impl PrimitiveStream {
    pub fn new(batches: Vec<PrimitiveBatch>) -> Self {
        Self {
            batches,
        }
    }

    pub fn push(&mut self, batch: PrimitiveBatch) {
        self.batches.push(batch);
    }

    pub fn batches(&self) -> &[PrimitiveBatch] {
        &self.batches
    }

    pub fn len(&self) -> usize {
        self.batches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.batches.is_empty()
    }

    /// Feeds the stream into a sink exactly as a backend would.
    pub fn replay(&self, sink: &mut dyn PrimitiveSink) {
        for batch in &self.batches {
            sink.begin(batch.kind);
            for vertex in &batch.vertices {
                sink.vertex(*vertex);
            }
            sink.end();
        }
    }
}

impl IntoIterator for PrimitiveStream {
    type Item = PrimitiveBatch;
    type IntoIter = std::vec::IntoIter<PrimitiveBatch>;

    fn into_iter(self) -> Self::IntoIter {
        self.batches.into_iter()
    }
}

/// A sink that keeps the batches instead of decoding them.
///
/// The first failure reported is kept, everything after it is ignored.
#[derive(Debug, Default)]
pub struct StreamRecorder {
    stream: PrimitiveStream,
    current: Option<PrimitiveBatch>,
    failure: Option<TessellationError>,
}

impl StreamRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    fn fail(&mut self, error: TessellationError) {
        if self.failure.is_none() {
            self.failure = Some(error);
        }
    }

    pub fn finish(mut self) -> TessellationResult<PrimitiveStream> {
        if let Some(batch) = self.current.take() {
            self.stream.push(batch);
        }
        match self.failure {
            Some(error) => Err(error),
            None => Ok(self.stream),
        }
    }
}

impl PrimitiveSink for StreamRecorder {
    fn begin(&mut self, kind: PrimitiveKind) {
        if !kind.is_supported() {
            self.fail(TessellationError::UnsupportedPrimitive(kind));
        }
        if let Some(batch) = self.current.take() {
            self.stream.push(batch);
        }
        self.current = Some(PrimitiveBatch::new(kind, Vec::new()));
    }

    fn vertex(&mut self, point: Point) {
        match self.current.as_mut() {
            Some(batch) => batch.vertices.push(point),
            None => self.fail(TessellationError::UnderlyingTriangulationFailure(
                "vertex emitted outside of a primitive batch".to_string(),
            )),
        }
    }

    fn end(&mut self) {
        if let Some(batch) = self.current.take() {
            self.stream.push(batch);
        }
    }

    fn combine(&mut self, at: Point) {
        self.fail(TessellationError::SelfIntersection {
            at,
        });
    }

    fn error(&mut self, message: String) {
        self.fail(TessellationError::UnderlyingTriangulationFailure(message));
    }
}

/// Groups a sequence of triangles into fan and strip batches.
///
/// A triangle extends the current batch when, up to rotation, it is `(first, last, new)` (fan) or
/// `(second_last, last, new)` (strip). Decoding the batches yields the same faces, in the same
/// order and with the same winding, as the triangles that were pushed.
#[derive(Debug, Default)]
pub struct PrimitiveBatcher {
    kind: Option<PrimitiveKind>,
    vertices: Vec<Point>,
}

impl PrimitiveBatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_triangle(&mut self, triangle: [Point; 3], sink: &mut dyn PrimitiveSink) {
        if self.vertices.is_empty() {
            self.vertices.extend_from_slice(&triangle);
            return;
        }

        let n = self.vertices.len();
        let first = self.vertices[0];
        let second_last = self.vertices[n - 2];
        let last = self.vertices[n - 1];

        if self.kind != Some(PrimitiveKind::TriangleStrip) {
            if let Some(next) = continues(&triangle, first, last) {
                self.kind = Some(PrimitiveKind::TriangleFan);
                self.vertices.push(next);
                return;
            }
        }

        if self.kind != Some(PrimitiveKind::TriangleFan) {
            if let Some(next) = continues(&triangle, second_last, last) {
                self.kind = Some(PrimitiveKind::TriangleStrip);
                self.vertices.push(next);
                return;
            }
        }

        self.flush(sink);
        self.vertices.extend_from_slice(&triangle);
    }

    pub fn flush(&mut self, sink: &mut dyn PrimitiveSink) {
        if self.vertices.is_empty() {
            return;
        }
        // a lone triangle decodes the same either way
        let kind = self.kind.take().unwrap_or(PrimitiveKind::TriangleFan);
        trace!("batch of {} vertices as {}", self.vertices.len(), kind);

        sink.begin(kind);
        for vertex in self.vertices.drain(..) {
            sink.vertex(vertex);
        }
        sink.end();
    }
}

/// Returns `x` when `triangle` is a rotation of `(a, b, x)`.
fn continues(triangle: &[Point; 3], a: Point, b: Point) -> Option<Point> {
    (0..3).find_map(|i| {
        let rotated = [triangle[i], triangle[(i + 1) % 3], triangle[(i + 2) % 3]];
        match rotated[0] == a && rotated[1] == b {
            true => Some(rotated[2]),
            false => None,
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(x: f64, y: f64) -> Point {
        Point::new(x, y)
    }

    #[test]
    fn test_recorder_keeps_batches() {
        // given
        let mut recorder = StreamRecorder::new();

        // when
        recorder.begin(PrimitiveKind::TriangleFan);
        recorder.vertex(p(0.0, 0.0));
        recorder.vertex(p(1.0, 0.0));
        recorder.vertex(p(1.0, 1.0));
        recorder.end();
        recorder.begin(PrimitiveKind::TriangleStrip);
        recorder.vertex(p(2.0, 0.0));
        recorder.end();

        // then
        let stream = recorder.finish().unwrap();
        assert_eq!(stream.len(), 2);
        assert_eq!(stream.batches()[0], PrimitiveBatch::fan(vec![p(0.0, 0.0), p(1.0, 0.0), p(1.0, 1.0)]));
        assert_eq!(stream.batches()[1], PrimitiveBatch::strip(vec![p(2.0, 0.0)]));
    }

    #[test]
    fn test_recorder_first_failure_wins() {
        let mut recorder = StreamRecorder::new();

        recorder.begin(PrimitiveKind::Triangles);
        recorder.combine(p(1.0, 1.0));
        recorder.error("later".to_string());

        assert_eq!(
            recorder.finish(),
            Err(TessellationError::UnsupportedPrimitive(PrimitiveKind::Triangles))
        );
    }

    #[test]
    fn test_batcher_builds_fan() {
        // given
        let (a, b, c, d, e) = (p(0.0, 0.0), p(2.0, 0.0), p(3.0, 1.0), p(2.0, 2.0), p(0.0, 2.0));
        let mut batcher = PrimitiveBatcher::new();
        let mut recorder = StreamRecorder::new();

        // when
        batcher.push_triangle([a, b, c], &mut recorder);
        batcher.push_triangle([a, c, d], &mut recorder);
        batcher.push_triangle([e, a, d], &mut recorder); // rotation of (a, d, e)
        batcher.flush(&mut recorder);

        // then
        let stream = recorder.finish().unwrap();
        assert_eq!(stream.batches(), &[PrimitiveBatch::fan(vec![a, b, c, d, e])]);
    }

    #[test]
    fn test_batcher_builds_strip() {
        let (a, b, c, d) = (p(0.0, 0.0), p(1.0, 0.0), p(0.0, 1.0), p(1.0, 1.0));
        let mut batcher = PrimitiveBatcher::new();
        let mut recorder = StreamRecorder::new();

        batcher.push_triangle([a, b, c], &mut recorder);
        batcher.push_triangle([b, c, d], &mut recorder);
        batcher.flush(&mut recorder);

        let stream = recorder.finish().unwrap();
        assert_eq!(stream.batches(), &[PrimitiveBatch::strip(vec![a, b, c, d])]);
    }

    #[test]
    fn test_batcher_starts_new_batch() {
        let (a, b, c) = (p(0.0, 0.0), p(1.0, 0.0), p(0.0, 1.0));
        let (d, e, f) = (p(5.0, 5.0), p(6.0, 5.0), p(5.0, 6.0));
        let mut batcher = PrimitiveBatcher::new();
        let mut recorder = StreamRecorder::new();

        batcher.push_triangle([a, b, c], &mut recorder);
        batcher.push_triangle([d, e, f], &mut recorder);
        batcher.flush(&mut recorder);

        let stream = recorder.finish().unwrap();
        assert_eq!(
            stream.batches(),
            &[PrimitiveBatch::fan(vec![a, b, c]), PrimitiveBatch::fan(vec![d, e, f])]
        );
    }
}
