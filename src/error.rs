use std::time::Duration;

use thiserror::Error;

use crate::types::PrimitiveKind;
use crate::Point;

/// Every way a tessellation request can fail.
///
/// All of these are terminal for the request, there is no partial result.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TessellationError {
    /// The backend had to create a vertex where two edges cross, one of the contours is not
    /// simple or the outer contour and the hole cross each other.
    #[error("Self-intersecting polygons are not supported, edges cross at ({}, {})", .at.x, .at.y)]
    SelfIntersection { at: Point },

    #[error("Geometric primitive type '{0}' is not supported, only triangle fans and triangle strips can be decoded")]
    UnsupportedPrimitive(PrimitiveKind),

    #[error("Triangulation failed: {0}")]
    UnderlyingTriangulationFailure(String),

    #[error("Tessellation did not complete within {0:?}")]
    Timeout(Duration),

    #[error("Tessellation request ended without delivering a result")]
    Abandoned,
}

pub type TessellationResult<T> = Result<T, TessellationError>;
