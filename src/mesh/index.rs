//! Stable handle types for mesh elements.
//!
//! Handles are plain integers wrapped in a type per element kind so that a
//! vertex handle can never be passed where a face handle is expected. They are
//! generic over the underlying integer type; `u32` is the default and is
//! plenty for tiled grids.
//!
//! Handles are never reused: removing a face or an edge leaves a tombstone in
//! the arena, so a handle obtained earlier either still names the same element
//! or names a removed one.

use std::fmt::{self, Debug};
use std::hash::Hash;

/// Trait for integer types that can back a mesh handle.
pub trait MeshIndex:
    Copy + Clone + Eq + PartialEq + Ord + PartialOrd + Hash + Debug + Send + Sync + 'static
{
    /// Sentinel value for a null handle.
    const INVALID: Self;

    /// Convert from usize.
    ///
    /// # Panics
    /// Debug builds panic if the value does not fit.
    fn from_usize(v: usize) -> Self;

    /// Convert to usize.
    fn to_usize(self) -> usize;

    /// Whether this is a real (non-sentinel) index.
    fn is_valid(self) -> bool {
        self != Self::INVALID
    }
}

impl MeshIndex for u32 {
    const INVALID: Self = u32::MAX;

    #[inline]
    fn from_usize(v: usize) -> Self {
        debug_assert!(v < u32::MAX as usize, "index {} too large for u32", v);
        v as u32
    }

    #[inline]
    fn to_usize(self) -> usize {
        self as usize
    }
}

/// Handle of a vertex.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[repr(transparent)]
pub struct VertexId<I: MeshIndex = u32>(I);

/// Handle of one directed side of an edge.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[repr(transparent)]
pub struct HalfEdgeId<I: MeshIndex = u32>(I);

/// Handle of an undirected edge (a pair of twin half-edges).
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[repr(transparent)]
pub struct EdgeId<I: MeshIndex = u32>(I);

/// Handle of a polygonal face.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[repr(transparent)]
pub struct FaceId<I: MeshIndex = u32>(I);

macro_rules! impl_handle {
    ($name:ident, $tag:literal) => {
        impl<I: MeshIndex> $name<I> {
            /// Create a handle from a raw arena slot.
            #[inline]
            pub fn new(index: usize) -> Self {
                Self(I::from_usize(index))
            }

            /// The null handle.
            #[inline]
            pub fn invalid() -> Self {
                Self(I::INVALID)
            }

            /// Arena slot of this handle.
            #[inline]
            pub fn index(self) -> usize {
                self.0.to_usize()
            }

            /// Whether this handle is non-null.
            #[inline]
            pub fn is_valid(self) -> bool {
                self.0.is_valid()
            }
        }

        impl<I: MeshIndex> Debug for $name<I> {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                if self.is_valid() {
                    write!(f, "{}({})", $tag, self.index())
                } else {
                    write!(f, "{}(null)", $tag)
                }
            }
        }

        impl<I: MeshIndex> fmt::Display for $name<I> {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                Debug::fmt(self, f)
            }
        }

        impl<I: MeshIndex> Default for $name<I> {
            fn default() -> Self {
                Self::invalid()
            }
        }
    };
}

impl_handle!(VertexId, "V");
impl_handle!(HalfEdgeId, "HE");
impl_handle!(EdgeId, "E");
impl_handle!(FaceId, "F");

impl<I: MeshIndex> HalfEdgeId<I> {
    /// The edge this half-edge belongs to. Twins share an edge.
    #[inline]
    pub fn edge(self) -> EdgeId<I> {
        EdgeId::new(self.index() / 2)
    }

    /// The opposite half-edge of the same edge.
    #[inline]
    pub fn twin(self) -> Self {
        Self::new(self.index() ^ 1)
    }
}

impl<I: MeshIndex> EdgeId<I> {
    /// The two half-edges of this edge. The first one is the side that was
    /// created for the face that introduced the edge.
    #[inline]
    pub fn halfedges(self) -> [HalfEdgeId<I>; 2] {
        let base = self.index() * 2;
        [HalfEdgeId::new(base), HalfEdgeId::new(base + 1)]
    }
}
