//! # Tilestitch
//!
//! Topology assembly for tiled surface meshes.
//!
//! Tiles are surfaces with one open boundary per grid side. Tilestitch lays
//! copies out on a grid, finds the facing open boundaries by centroid
//! distance, joins them with quad strips, optionally caps the outer holes,
//! and checks that the result has the genus the grid predicts.
//!
//! ## Features
//!
//! - **Half-edge mesh** with type-safe handles and O(1) adjacency queries
//! - **Boundary loops** stamped with the mesh revision, so stale loops are
//!   refused instead of silently corrupting the mesh
//! - **Bridging and filling** that keep every edge at one or two faces
//! - **Genus validation** from the Euler characteristic
//!
//! ## Quick Start
//!
//! ```
//! use tilestitch::prelude::*;
//!
//! let tile: HalfEdgeMesh = cross_junction(3, 2.0).unwrap();
//! let family = TileFamily::CROSS_JUNCTION;
//! let spec = family.grid_spec(2, 1).unwrap().with_fill_holes(true);
//! let options = AssemblyOptions::for_family(&family, GridLayout::abutting(&tile, 0.5).unwrap());
//!
//! let assembly = assemble(&tile, &spec, &options).unwrap();
//! assert_eq!(assembly.report.signature, TopologySignature::new(0, 0));
//! ```
//!
//! ## Working with loops directly
//!
//! ```
//! use tilestitch::prelude::*;
//!
//! let tile: HalfEdgeMesh = cross_junction(3, 2.0).unwrap();
//! let loops = extract_boundaries(&tile).unwrap();
//! assert_eq!(loops.len(), 4);
//!
//! // No two openings of one tile are within a unit of each other.
//! assert!(match_boundaries(&loops, 1.0).unwrap().is_empty());
//!
//! let observed = observed_signature(&tile).unwrap();
//! assert_eq!(observed, TopologySignature::new(0, 4));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod algo;
pub mod error;
pub mod mesh;

/// Prelude module for convenient imports.
///
/// ```
/// use tilestitch::prelude::*;
/// ```
pub mod prelude {
    pub use crate::algo::boundary::{extract_boundaries, BoundaryLoop};
    pub use crate::algo::bridge::bridge;
    pub use crate::algo::fill::{fill, fill_all, fill_with, FillOptions, FillStrategy};
    pub use crate::algo::grid::{
        assemble, assemble_with_progress, replicate, Assembly, AssemblyOptions, AssemblyReport,
        GridLayout, TileFamily,
    };
    pub use crate::algo::matching::match_boundaries;
    pub use crate::algo::validate::{observed_signature, validate, GridSpec, TopologySignature};
    pub use crate::algo::Progress;
    pub use crate::error::{MeshError, Result};
    pub use crate::mesh::primitives::cross_junction;
    pub use crate::mesh::{
        build_from_polygons, build_from_quads, build_from_triangles, to_face_vertex, EdgeId, FaceId,
        HalfEdgeId, HalfEdgeMesh, MeshIndex, VertexId,
    };
}

// Re-export nalgebra types for convenience
pub use nalgebra;

#[cfg(test)]
mod tests {
    use super::prelude::*;
    use nalgebra::Point3;

    #[test]
    fn test_stitch_two_tubes() {
        // Two open square tubes along x with facing ends half a unit apart.
        let square = [(-0.5, -0.5), (0.5, -0.5), (0.5, 0.5), (-0.5, 0.5)];
        let mut vertices = Vec::new();
        let mut faces = Vec::new();
        for x0 in [0.0, 1.5] {
            let base = vertices.len();
            for x in [x0, x0 + 1.0] {
                for &(y, z) in &square {
                    vertices.push(Point3::new(x, y, z));
                }
            }
            for k in 0..4 {
                let k1 = (k + 1) % 4;
                faces.push([base + k, base + k1, base + 4 + k1, base + 4 + k]);
            }
        }
        let mut mesh: HalfEdgeMesh = build_from_quads(&vertices, &faces).unwrap();

        let loops = extract_boundaries(&mesh).unwrap();
        let pairs = match_boundaries(&loops, 0.75).unwrap();
        assert_eq!(pairs.len(), 1);
        let (a, b) = pairs[0];
        bridge(&mut mesh, &loops[a], &loops[b]).unwrap();
        assert_eq!(fill_all(&mut mesh, &FillOptions::default()).unwrap(), 2);

        // A closed box-shaped tube: a sphere.
        assert_eq!(observed_signature(&mesh).unwrap(), TopologySignature::new(0, 0));
        assert!(mesh.is_valid());
    }
}
