use std::collections::HashMap;

use log::debug;
use lyon::path::Path;
use lyon::tessellation::{
    FillGeometryBuilder, FillOptions, FillRule, FillTessellator, FillVertex, GeometryBuilder, GeometryBuilderError,
    VertexId, VertexSource,
};

use super::validate::find_crossing;
use super::{drop_degenerate_contours, drop_empty_contours, find_non_finite, PolygonInput, TessellationBackend};
use crate::geometry::predicates::cross;
use crate::primitive::{PrimitiveBatcher, PrimitiveSink};
use crate::spacial::ToLyonPoint;
use crate::Point;

/// Triangulates with lyon's sweep line fill tessellator, using the even-odd fill rule.
///
/// Lyon works in single precision; output vertices are mapped back to the input points they came
/// from, so triangles carry the exact input coordinates. A vertex lyon had to create where two
/// edges cross has no input point and fails the polygon.
#[derive(Debug, Default)]
pub struct LyonBackend {
    input: PolygonInput,
}

impl LyonBackend {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TessellationBackend for LyonBackend {
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

        let mut endpoints = HashMap::new();
        let mut path_builder = Path::builder();
        for contour in &contours {
            let Some((first, rest)) = contour.split_first() else {
                continue;
            };
            let id = path_builder.begin(first.to_lyon_point());
            endpoints.insert(id.to_usize(), *first);
            for point in rest {
                let id = path_builder.line_to(point.to_lyon_point());
                endpoints.insert(id.to_usize(), *point);
            }
            path_builder.close();
        }
        let path = path_builder.build();

        let mut output = TriangleCollector::new(&endpoints);
        // the id iterator keeps endpoint ids in the vertex sources, plain path events do not
        let result = FillTessellator::new().tessellate_with_ids(
            path.id_iter(),
            &path,
            None,
            &FillOptions::default().with_fill_rule(FillRule::EvenOdd),
            &mut output,
        );

        if let Some(at) = output.crossing {
            sink.combine(at);
            return;
        }
        if let Err(error) = result {
            sink.error(format!("lyon fill tessellation failed: {:?}", error));
            return;
        }

        debug!("lyon produced {} triangles for {} contours", output.triangles.len(), contours.len());

        let mut batcher = PrimitiveBatcher::new();
        for triangle in output.triangles {
            batcher.push_triangle(triangle, sink);
        }
        batcher.flush(sink);
    }
}

struct TriangleCollector<'a> {
    endpoints: &'a HashMap<usize, Point>,
    vertices: Vec<Point>,
    triangles: Vec<[Point; 3]>,
    crossing: Option<Point>,
}

impl<'a> TriangleCollector<'a> {
    fn new(endpoints: &'a HashMap<usize, Point>) -> Self {
        Self {
            endpoints,
            vertices: Vec::new(),
            triangles: Vec::new(),
            crossing: None,
        }
    }
}

impl GeometryBuilder for TriangleCollector<'_> {
    fn add_triangle(&mut self, a: VertexId, b: VertexId, c: VertexId) {
        let [a, b, c] = [a, b, c].map(|id| self.vertices[id.to_usize()]);
        // counter-clockwise, whatever order lyon picked
        match cross(&a, &b, &c) < 0.0 {
            true => self.triangles.push([a, c, b]),
            false => self.triangles.push([a, b, c]),
        }
    }
}

impl FillGeometryBuilder for TriangleCollector<'_> {
    fn add_fill_vertex(&mut self, vertex: FillVertex) -> Result<VertexId, GeometryBuilderError> {
        let source = vertex
            .sources()
            .find_map(|source| match source {
                VertexSource::Endpoint {
                    id,
                } => self.endpoints.get(&id.to_usize()).copied(),
                VertexSource::Edge {
                    ..
                } => None,
            });

        match source {
            Some(point) => {
                let id = VertexId::from_usize(self.vertices.len());
                self.vertices.push(point);
                Ok(id)
            }
            None => {
                let position = vertex.position();
                let at = Point::new(position.x as f64, position.y as f64);
                debug!("lyon inserted a vertex at {:?}, the input crosses itself", at);
                self.crossing.get_or_insert(at);
                Err(GeometryBuilderError::InvalidVertex)
            }
        }
    }
}
