//! Reading library for the Mesh2D `.msh` format.
//!
//! A `.msh` file lists numbered 2D nodes, connectivity elements of two to
//! four vertices, and boundary markers, each in a count-prefixed section.
//! [`Msh`] is the parsed document; [`segment`] turns element connectivity
//! into line segments for a geometry library to consume.
//!
//! ```
//! let input = "\
//! ## num x y
//! 3
//! 1 0.0 0.0
//! 2 1.0 1.0
//! 3 1.0 0.0
//! ## num i j [k [l]]
//! 1
//! 1 1 2 3
//! ## num node
//! 1
//! 1 1
//! ";
//! let mesh: mesh2d_io::Msh = input.parse().unwrap();
//! let segments = mesh2d_io::segment::segments(&mesh).unwrap();
//! assert_eq!(segments.len(), 3);
//! ```

pub mod msh;
pub mod segment;

pub use msh::{Boundary, Element, ElementShape, Error, ErrorKind, Msh, Node, Section};
