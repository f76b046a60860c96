//! Tile grids.
//!
//! A tile is a surface with one open boundary per grid side. Laying copies
//! out on a grid brings the open boundaries of neighbouring copies face to
//! face; [`assemble`] finds those pairs by centroid, bridges them, optionally
//! caps the outer holes and checks the genus of the result.
//!
//! # Tile families
//!
//! | Family | Tile genus | Seam tolerance |
//! |--------|-----------:|---------------:|
//! | [`TileFamily::CAVE`] | 5 | 5.1 |
//! | [`TileFamily::TUNNEL`] | 25 | none (never replicated) |
//! | [`TileFamily::CROSS_JUNCTION`] | 0 | 1.0 |
//!
//! # Example
//!
//! ```
//! use tilestitch::algo::grid::{assemble, AssemblyOptions, GridLayout, TileFamily};
//! use tilestitch::mesh::{primitives::cross_junction, HalfEdgeMesh};
//!
//! let tile: HalfEdgeMesh = cross_junction(3, 2.0).unwrap();
//! let family = TileFamily::CROSS_JUNCTION;
//! let spec = family.grid_spec(2, 2).unwrap();
//! let layout = GridLayout::abutting(&tile, 0.5).unwrap();
//! let options = AssemblyOptions::for_family(&family, layout);
//!
//! let assembly = assemble(&tile, &spec, &options).unwrap();
//! assert_eq!(assembly.report.seams_bridged, 4);
//! assert_eq!(assembly.report.signature.genus, 1);
//! ```

mod assemble;
mod replicate;

pub use assemble::{assemble, assemble_with_progress, Assembly, AssemblyReport};
pub use replicate::replicate;

use nalgebra::Vector3;

use super::fill::FillOptions;
use super::validate::GridSpec;
use crate::error::{MeshError, Result};
use crate::mesh::{HalfEdgeMesh, MeshIndex};

/// Constants describing one kind of tile.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TileFamily {
    /// Lower-case name, as accepted by [`TileFamily::by_name`].
    pub name: &'static str,
    /// Genus of a single tile.
    pub base_genus: u32,
    /// Maximum centroid distance of two loops forming a seam, if the family
    /// is ever replicated.
    pub tolerance: Option<f64>,
}

impl TileFamily {
    /// Cave block: genus 5, one opening per side.
    pub const CAVE: TileFamily = TileFamily {
        name: "cave",
        base_genus: 5,
        tolerance: Some(5.1),
    };

    /// Tunnel block: genus 25, always used alone.
    pub const TUNNEL: TileFamily = TileFamily {
        name: "tunnel",
        base_genus: 25,
        tolerance: None,
    };

    /// The synthetic tile from [`crate::mesh::primitives::cross_junction`],
    /// laid out half a unit apart.
    pub const CROSS_JUNCTION: TileFamily = TileFamily {
        name: "cross-junction",
        base_genus: 0,
        tolerance: Some(1.0),
    };

    /// Every known family.
    pub const ALL: [TileFamily; 3] = [Self::CAVE, Self::TUNNEL, Self::CROSS_JUNCTION];

    /// Look a family up by name. Case and `-`/`_` are not significant.
    pub fn by_name(name: &str) -> Option<TileFamily> {
        let wanted = name.to_ascii_lowercase().replace('_', "-");
        Self::ALL.into_iter().find(|family| family.name == wanted)
    }

    /// Grid spec for a `size_x × size_y` grid of this family, holes open.
    ///
    /// # Errors
    /// As [`GridSpec::new`].
    pub fn grid_spec(&self, size_x: usize, size_y: usize) -> Result<GridSpec> {
        GridSpec::new(size_x, size_y, self.base_genus)
    }
}

/// Placement of the copies: copy `(i, j)` is translated by
/// `i * offset_x + j * offset_y`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridLayout {
    /// Step between neighbouring copies along the first grid axis.
    pub offset_x: Vector3<f64>,
    /// Step between neighbouring copies along the second grid axis.
    pub offset_y: Vector3<f64>,
}

impl GridLayout {
    /// Create a layout from the two step vectors.
    pub fn new(offset_x: Vector3<f64>, offset_y: Vector3<f64>) -> Self {
        Self { offset_x, offset_y }
    }

    /// Step by the tile's bounding box extent plus `gap` along x and y.
    ///
    /// # Errors
    /// - [`MeshError::EmptyMesh`] if the tile has no vertices
    /// - [`MeshError::InvalidParameter`] if `gap` is negative or not finite
    pub fn abutting<I: MeshIndex>(tile: &HalfEdgeMesh<I>, gap: f64) -> Result<Self> {
        if !(gap.is_finite() && gap >= 0.0) {
            return Err(MeshError::invalid_param("gap", gap, "must be non-negative"));
        }
        let (min, max) = tile.bounding_box().ok_or(MeshError::EmptyMesh)?;
        let extent = max - min;
        Ok(Self::new(
            Vector3::new(extent.x + gap, 0.0, 0.0),
            Vector3::new(0.0, extent.y + gap, 0.0),
        ))
    }

    /// Translation of copy `(i, j)`.
    #[inline]
    pub fn offset(&self, i: usize, j: usize) -> Vector3<f64> {
        self.offset_x * i as f64 + self.offset_y * j as f64
    }
}

/// Options for [`assemble`].
#[derive(Debug, Clone)]
pub struct AssemblyOptions {
    /// Seam matching tolerance. Required for grids of more than one tile.
    pub tolerance: Option<f64>,
    /// Placement of the copies.
    pub layout: GridLayout,
    /// How outer holes are capped when the grid asks for it.
    pub fill: FillOptions,
}

impl AssemblyOptions {
    /// Options with the given layout, no tolerance and default filling.
    pub fn new(layout: GridLayout) -> Self {
        Self {
            tolerance: None,
            layout,
            fill: FillOptions::default(),
        }
    }

    /// Options for a tile family: its tolerance and the given layout.
    pub fn for_family(family: &TileFamily, layout: GridLayout) -> Self {
        Self {
            tolerance: family.tolerance,
            ..Self::new(layout)
        }
    }

    /// Set the seam matching tolerance.
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = Some(tolerance);
        self
    }

    /// Set the fill options.
    pub fn with_fill(mut self, fill: FillOptions) -> Self {
        self.fill = fill;
        self
    }
}

/// Number of tile-to-tile seams in a `size_x × size_y` grid.
pub fn expected_seam_count(size_x: usize, size_y: usize) -> usize {
    if size_x == 0 || size_y == 0 {
        return 0;
    }
    (size_x - 1) * size_y + size_x * (size_y - 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::primitives::cross_junction;

    #[test]
    fn test_family_lookup() {
        assert_eq!(TileFamily::by_name("cave"), Some(TileFamily::CAVE));
        assert_eq!(TileFamily::by_name("TUNNEL"), Some(TileFamily::TUNNEL));
        assert_eq!(
            TileFamily::by_name("cross_junction"),
            Some(TileFamily::CROSS_JUNCTION)
        );
        assert_eq!(TileFamily::by_name("castle"), None);
    }

    #[test]
    fn test_family_specs() {
        let spec = TileFamily::CAVE.grid_spec(2, 1).unwrap();
        assert_eq!(spec.expected_signature().genus, 10);

        // A lone tunnel block keeps its four openings.
        let tunnel = TileFamily::TUNNEL.grid_spec(1, 1).unwrap();
        assert_eq!(tunnel.expected_signature().genus, 25);
        assert_eq!(tunnel.expected_signature().boundary_count, 4);
    }

    #[test]
    fn test_seam_count() {
        assert_eq!(expected_seam_count(1, 1), 0);
        assert_eq!(expected_seam_count(2, 1), 1);
        assert_eq!(expected_seam_count(2, 2), 4);
        assert_eq!(expected_seam_count(3, 2), 7);
        assert_eq!(expected_seam_count(0, 4), 0);
    }

    #[test]
    fn test_abutting_layout() {
        let tile: HalfEdgeMesh = cross_junction(3, 2.0).unwrap();
        let layout = GridLayout::abutting(&tile, 0.5).unwrap();
        assert!((layout.offset_x - Vector3::new(2.5, 0.0, 0.0)).norm() < 1e-12);
        assert!((layout.offset_y - Vector3::new(0.0, 2.5, 0.0)).norm() < 1e-12);
        assert!((layout.offset(2, 1) - Vector3::new(5.0, 2.5, 0.0)).norm() < 1e-12);

        assert!(GridLayout::abutting(&tile, -1.0).is_err());
        let empty: HalfEdgeMesh = HalfEdgeMesh::new();
        assert_eq!(GridLayout::abutting(&empty, 0.5), Err(MeshError::EmptyMesh));
    }

    #[test]
    fn test_options_builders() {
        let layout = GridLayout::new(Vector3::x(), Vector3::y());
        let options = AssemblyOptions::for_family(&TileFamily::CAVE, layout);
        assert_eq!(options.tolerance, Some(5.1));

        let options = AssemblyOptions::new(layout).with_tolerance(0.25);
        assert_eq!(options.tolerance, Some(0.25));
        assert_eq!(options.layout, layout);
    }
}
