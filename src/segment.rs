//! Conversion of mesh connectivity into line segments.
//!
//! A 2-vertex element maps to one open segment; 3- and 4-vertex elements map
//! to their closed polygon outline, one segment per consecutive vertex pair
//! plus the closing pair. The target geometry objects are built by the
//! caller through [`BuildGeometry`].

use std::collections::HashMap;

use itertools::Itertools as _;

use crate::msh::{Element, ElementShape, Error, ErrorKind, Msh, Node};

/// An ordered pair of 2D coordinates between two mesh vertices.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Segment {
    pub start: (f64, f64),
    pub end: (f64, f64),
}

/// A lookup from node number to coordinate.
///
/// When several nodes share a number, the later entry wins.
pub fn node_positions(nodes: &[Node]) -> HashMap<i64, (f64, f64)> {
    nodes
        .iter()
        .map(|node| (node.num, (node.x, node.y)))
        .collect()
}

/// The segments outlining one element, in vertex order.
///
/// A vertex number with no entry in `positions` fails with
/// [`ErrorKind::UnknownNode`].
pub fn element_segments(
    element: &Element,
    positions: &HashMap<i64, (f64, f64)>,
) -> Result<Vec<Segment>, Error> {
    let position = |num: i64| -> Result<(f64, f64), Error> {
        positions.get(&num).copied().ok_or_else(|| {
            ErrorKind::UnknownNode {
                element: element.num(),
                node: num,
            }
            .into()
        })
    };

    let vertices = element.vertices();
    let pairs: Vec<(i64, i64)> = match element.shape() {
        ElementShape::Line => vec![(vertices[0], vertices[1])],
        ElementShape::Triangle | ElementShape::Quadrilateral => vertices
            .iter()
            .copied()
            .circular_tuple_windows()
            .collect(),
    };

    pairs
        .into_iter()
        .map(|(from, to)| {
            Ok(Segment {
                start: position(from)?,
                end: position(to)?,
            })
        })
        .collect()
}

/// Every element's segments, element order and in-element order preserved.
pub fn segments(msh: &Msh) -> Result<Vec<Segment>, Error> {
    let positions = node_positions(msh.nodes());
    let mut segments = Vec::new();
    for element in msh.elements() {
        segments.extend(element_segments(element, &positions)?);
    }
    Ok(segments)
}

/// Constructors for the target geometry representation.
///
/// The crate never builds geometry itself; it hands every point pair to
/// these constructors in document order.
pub trait BuildGeometry {
    type Point;
    type Line;
    type MultiLine;

    fn point(&self, x: f64, y: f64) -> Self::Point;
    fn line(&self, start: Self::Point, end: Self::Point) -> Self::Line;
    fn multi_line(&self, lines: Vec<Self::Line>) -> Self::MultiLine;
}

/// Builds one multi-line from all of the document's segments.
pub fn multi_line<B>(msh: &Msh, builder: &B) -> Result<B::MultiLine, Error>
where
    B: BuildGeometry,
{
    let lines = segments(msh)?
        .into_iter()
        .map(|segment| {
            let start = builder.point(segment.start.0, segment.start.1);
            let end = builder.point(segment.end.0, segment.end.1);
            builder.line(start, end)
        })
        .collect();
    Ok(builder.multi_line(lines))
}
