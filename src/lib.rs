//! Triangulation of planar polygons, an outer contour with an optional hole, into triangles.
//!
//! A [`TessellationBackend`] triangulates the polygon and reports triangle fans and strips to a
//! [`PrimitiveSink`]; the [`TriangleAssembler`] decodes those into [`Triangle`]s. [`Tessellator`]
//! runs each request on its own worker thread, either blocking the caller until the result is in
//! or handing it to a [`TessellationHandler`].

mod assembler;
mod backend;
mod engine;
mod error;
mod geometry;
mod primitive;
mod request;
pub mod spacial;
mod tessellator;
mod types;

pub use assembler::*;
pub use backend::{EarClipBackend, LyonBackend, TessellationBackend};
pub use engine::*;
pub use error::*;
pub use geometry::*;
pub use primitive::*;
pub use request::{handler_fn, FnHandler, RequestHandle, TessellationHandler};
pub use spacial::{Point, Vector};
pub use tessellator::*;
pub use types::*;

#[cfg(any(test, feature = "testing"))]
pub mod testing;
