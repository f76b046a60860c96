//! Core mesh data structures.
//!
//! The primary type is [`HalfEdgeMesh`], a polygon mesh with boundary stored
//! as an arena of vertices, half-edges and faces. It doubles as the adjacency
//! view used by every topology operation: edges of a face, endpoints of an
//! edge and faces touching an edge are all O(1) lookups.
//!
//! # Handles
//!
//! Mesh elements are identified by type-safe handles:
//! - [`VertexId`] - a vertex
//! - [`HalfEdgeId`] - one directed side of an edge
//! - [`EdgeId`] - an undirected edge
//! - [`FaceId`] - a face
//!
//! Handles stay valid across mutations (removed elements are tombstoned, not
//! compacted), so operations can refer to elements without live references.
//!
//! # Construction
//!
//! ```
//! use tilestitch::mesh::{HalfEdgeMesh, build_from_quads};
//! use nalgebra::Point3;
//!
//! let vertices = vec![
//!     Point3::new(0.0, 0.0, 0.0),
//!     Point3::new(1.0, 0.0, 0.0),
//!     Point3::new(1.0, 1.0, 0.0),
//!     Point3::new(0.0, 1.0, 0.0),
//! ];
//! let faces = vec![[0, 1, 2, 3]];
//!
//! let mesh: HalfEdgeMesh = build_from_quads(&vertices, &faces).unwrap();
//! assert!(mesh.edge_ids().all(|e| mesh.is_boundary_edge(e)));
//! ```

mod builder;
mod halfedge;
mod index;
pub mod primitives;

pub use builder::{build_from_polygons, build_from_quads, build_from_triangles, to_face_vertex};
pub use halfedge::{Face, FaceHalfEdgeIter, HalfEdge, HalfEdgeMesh, Vertex};
pub use index::{EdgeId, FaceId, HalfEdgeId, MeshIndex, VertexId};
