//! Decodes fan and strip primitive batches into triangles.

use log::{trace, warn};

use crate::error::{TessellationError, TessellationResult};
use crate::geometry::Triangle;
use crate::primitive::{PrimitiveSink, PrimitiveStream};
use crate::types::PrimitiveKind;
use crate::Point;

/// Turns the output of a backend into triangles as it streams in.
///
/// Decoding state is reset at every batch boundary. The first failure reported through the sink
/// is kept, later failures and any further vertices are ignored, and [`TriangleAssembler::finish`]
/// returns either every decoded triangle or that failure, never both.
#[derive(Debug, Default)]
pub struct TriangleAssembler {
    triangles: Vec<Triangle>,
    state: DecodeState,
    failure: Option<TessellationError>,
}

#[derive(Debug, Default)]
enum DecodeState {
    #[default]
    Idle,
    Fan {
        p1: Option<Point>,
        p2: Option<Point>,
    },
    Strip {
        p1: Option<Point>,
        p2: Option<Point>,
        p3: Option<Point>,
    },
    /// An unsupported batch, its vertices are dropped
    Rejected,
}

impl TriangleAssembler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decodes a recorded stream in one go.
    pub fn decode(stream: &PrimitiveStream) -> TessellationResult<Vec<Triangle>> {
        let mut assembler = Self::new();
        stream.replay(&mut assembler);
        assembler.finish()
    }

    pub fn is_failed(&self) -> bool {
        self.failure.is_some()
    }

    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    pub fn finish(self) -> TessellationResult<Vec<Triangle>> {
        match self.failure {
            Some(error) => Err(error),
            None => Ok(self.triangles),
        }
    }

    fn fail(&mut self, error: TessellationError) {
        match &self.failure {
            None => {
                warn!("tessellation failed: {}", error);
                self.failure = Some(error);
            }
            Some(first) => trace!("ignoring '{}', already failed with '{}'", error, first),
        }
    }
}

impl PrimitiveSink for TriangleAssembler {
    fn begin(&mut self, kind: PrimitiveKind) {
        trace!("begin {}", kind);
        self.state = match kind {
            PrimitiveKind::TriangleFan => DecodeState::Fan {
                p1: None,
                p2: None,
            },
            PrimitiveKind::TriangleStrip => DecodeState::Strip {
                p1: None,
                p2: None,
                p3: None,
            },
            PrimitiveKind::Triangles | PrimitiveKind::LineLoop => {
                self.fail(TessellationError::UnsupportedPrimitive(kind));
                DecodeState::Rejected
            }
        };
    }

    fn vertex(&mut self, point: Point) {
        if self.failure.is_some() {
            return;
        }
        if let DecodeState::Idle = self.state {
            self.fail(TessellationError::UnderlyingTriangulationFailure(
                "vertex emitted outside of a primitive batch".to_string(),
            ));
            return;
        }

        match &mut self.state {
            DecodeState::Fan {
                p1,
                p2,
            } => match (*p1, *p2) {
                (None, _) => *p1 = Some(point),
                (Some(_), None) => *p2 = Some(point),
                (Some(a), Some(b)) => {
                    self.triangles
                        .push(Triangle::new(a, b, point));
                    *p2 = Some(point);
                }
            },
            DecodeState::Strip {
                p1,
                p2,
                p3,
            } => {
                *p1 = p2.take();
                *p2 = p3.take();
                *p3 = Some(point);
                if let (Some(a), Some(b)) = (*p1, *p2) {
                    self.triangles
                        .push(Triangle::new(a, b, point));
                }
            }
            DecodeState::Idle | DecodeState::Rejected => {}
        }
    }

    fn end(&mut self) {
        trace!("end of batch, {} triangles so far", self.triangles.len());
        self.state = DecodeState::Idle;
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
