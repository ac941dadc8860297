//! The Mesh2D `.msh` file format.
//!
//! A document holds three count-prefixed sections in fixed order. Blank
//! lines and `#` comments are skipped anywhere:
//!
//! ```text
//! # nodes section
//! # num x y
//! 3
//! 1    0.0    0.0
//! 2    1.0    1.0
//! 3    1.0    0.0
//! # elements section
//! # num i j [k [l]]
//! 2
//! 1    1    2
//! 2    1    2    3    0
//! # boundaries section
//! # num node
//! 1
//! 1    1
//! ```

use std::str;

pub use parser::{Error, ErrorKind, Section};
pub use schema::{Converter, Field, LineSchema, Value};

mod parser;
mod schema;

/// A numbered 2D coordinate.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Node {
    pub num: i64,
    pub x: f64,
    pub y: f64,
}

/// A numbered reference to a single node, marking it as a boundary point.
///
/// Whether the referenced node exists is not checked at load time.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Boundary {
    pub num: i64,
    pub node: i64,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ElementShape {
    Line,
    Triangle,
    Quadrilateral,
}

impl ElementShape {
    pub fn vertex_count(self) -> usize {
        match self {
            ElementShape::Line => 2,
            ElementShape::Triangle => 3,
            ElementShape::Quadrilateral => 4,
        }
    }
}

/// A numbered, ordered reference to 2-4 node numbers describing mesh
/// connectivity.
///
/// In the file format the trailing `k` and `l` slots use `0` for "absent".
/// The constructor decodes that sentinel once, into a populated prefix of
/// the slot array, so [`Element::vertices`] only ever yields real node
/// numbers.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Element {
    num: i64,
    slots: [i64; 4],
    len: usize,
}

impl Element {
    /// Builds an element from the raw `i j k l` fields, where a zero in a
    /// slot means the slot is empty.
    ///
    /// Fails with [`ErrorKind::MisnumberedElement`] when an empty slot is
    /// followed by a populated one, or when fewer than two slots are
    /// populated.
    pub fn new(num: i64, i: i64, j: i64, k: i64, l: i64) -> Result<Element, Error> {
        let slots = [i, j, k, l];
        let len = slots.iter().take_while(|&&v| v != 0).count();
        if len < 2 || slots[len..].iter().any(|&v| v != 0) {
            return Err(ErrorKind::MisnumberedElement { num }.into());
        }
        Ok(Element { num, slots, len })
    }

    pub fn num(&self) -> i64 {
        self.num
    }

    /// The populated vertex numbers, in `i, j, k, l` field order.
    pub fn vertices(&self) -> &[i64] {
        &self.slots[..self.len]
    }

    /// Number of populated vertex slots. Fixed at construction.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn shape(&self) -> ElementShape {
        match self.len {
            2 => ElementShape::Line,
            3 => ElementShape::Triangle,
            _ => ElementShape::Quadrilateral,
        }
    }
}

impl<'a> IntoIterator for &'a Element {
    type Item = &'a i64;
    type IntoIter = std::slice::Iter<'a, i64>;

    fn into_iter(self) -> Self::IntoIter {
        self.vertices().iter()
    }
}

/// A parsed `.msh` document.
///
/// Immutable once loaded: the document owns its three record lists and
/// nothing in this crate mutates them afterwards.
#[derive(Debug, Default)]
pub struct Msh {
    nodes: Vec<Node>,
    elements: Vec<Element>,
    boundaries: Vec<Boundary>,
}

impl Msh {
    pub fn from_raw_parts(
        nodes: Vec<Node>,
        elements: Vec<Element>,
        boundaries: Vec<Boundary>,
    ) -> Msh {
        Msh {
            nodes,
            elements,
            boundaries,
        }
    }

    /// Parses a document from an iterator of raw input lines.
    pub fn from_lines<'a, I>(lines: I) -> Result<Msh, Error>
    where
        I: IntoIterator<Item = &'a str>,
    {
        parser::from_lines(lines.into_iter())
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    pub fn boundaries(&self) -> &[Boundary] {
        &self.boundaries
    }
}

impl str::FromStr for Msh {
    type Err = Error;

    fn from_str(s: &str) -> Result<Msh, Error> {
        Msh::from_lines(s.lines())
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn trailing_slot_combinations() {
        assert_eq!(Element::new(1, 1, 2, 0, 0).unwrap().len(), 2);
        assert_eq!(Element::new(1, 1, 2, 3, 0).unwrap().len(), 3);
        assert_eq!(Element::new(1, 1, 2, 3, 4).unwrap().len(), 4);

        let err = Element::new(7, 1, 2, 0, 4).unwrap_err();
        assert!(matches!(
            err.kind(),
            ErrorKind::MisnumberedElement { num: 7 }
        ));
    }

    #[test]
    fn empty_slot_before_populated_slot() {
        assert!(Element::new(1, 1, 0, 3, 0).is_err());
        assert!(Element::new(1, 0, 2, 0, 0).is_err());
        assert!(Element::new(1, 0, 0, 0, 0).is_err());
    }

    #[test]
    fn vertices_keep_field_order() {
        let element = Element::new(9, 4, 2, 7, 0).unwrap();
        assert_eq!(element.vertices(), [4, 2, 7]);
        assert_eq!(element.vertices()[0], 4);
        assert_eq!(*element.vertices().last().unwrap(), 7);
        let collected: Vec<i64> = element.into_iter().copied().collect();
        assert_eq!(collected, vec![4, 2, 7]);
    }

    #[test]
    fn shapes() {
        assert_eq!(Element::new(1, 1, 2, 0, 0).unwrap().shape(), ElementShape::Line);
        assert_eq!(
            Element::new(1, 1, 2, 3, 0).unwrap().shape(),
            ElementShape::Triangle
        );
        assert_eq!(
            Element::new(1, 1, 2, 3, 4).unwrap().shape(),
            ElementShape::Quadrilateral
        );
        assert_eq!(ElementShape::Triangle.vertex_count(), 3);
    }

    proptest!(
        /// Construction succeeds exactly when no empty slot precedes a
        /// populated one, and the vertex view is the populated prefix.
        #[test]
        fn slot_patterns(
            i in 1..100i64,
            j in 1..100i64,
            k in 0..100i64,
            l in 0..100i64,
        ) {
            let element = Element::new(1, i, j, k, l);
            if k == 0 && l != 0 {
                prop_assert!(element.is_err());
            } else {
                let element = element.unwrap();
                let expected: Vec<i64> = [i, j, k, l]
                    .iter()
                    .copied()
                    .take_while(|&v| v != 0)
                    .collect();
                prop_assert_eq!(element.len(), expected.len());
                prop_assert_eq!(element.vertices(), expected.as_slice());
            }
        }
    );
}
