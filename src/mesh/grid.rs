//! The in-memory UGRID model.
//!
//! A [`VolumeMesh`] owns every array of one model instance: node
//! coordinates, the surface skin (triangles and quads with their patch
//! ids), and the four volume-element arrays. It is populated once by the
//! codec (or by direct assignment before an encode) and is not mutated
//! afterwards, except for the in-place reorder performed by
//! [`sort_surface_by_patch`](crate::algo::patch::sort_surface_by_patch).
//!
//! Connectivity stores the raw 1-based node ids exactly as they appear
//! on disk; this is also the external numbering contract for structural
//! card writers. Consumers that need 0-based indices subtract one at use
//! time.

use std::fmt;

use nalgebra::Point3;

/// The closed set of element kinds appearing in a UGRID model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementKind {
    /// 3-node surface triangle.
    Tri,
    /// 4-node surface quadrilateral.
    Quad,
    /// 4-node tetrahedron.
    Tet,
    /// 5-node pyramid.
    Pyramid,
    /// 6-node prism (pentahedron).
    Prism,
    /// 8-node hexahedron.
    Hexa,
}

impl ElementKind {
    /// Nominal vertex count of this kind.
    pub fn arity(self) -> usize {
        match self {
            ElementKind::Tri => 3,
            ElementKind::Quad => 4,
            ElementKind::Tet => 4,
            ElementKind::Pyramid => 5,
            ElementKind::Prism => 6,
            ElementKind::Hexa => 8,
        }
    }

    /// True for the four volume (solid) kinds.
    pub fn is_volume(self) -> bool {
        !matches!(self, ElementKind::Tri | ElementKind::Quad)
    }
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ElementKind::Tri => "tri",
            ElementKind::Quad => "quad",
            ElementKind::Tet => "tet",
            ElementKind::Pyramid => "pyramid",
            ElementKind::Prism => "prism",
            ElementKind::Hexa => "hexa",
        };
        f.write_str(name)
    }
}

/// One decoded UGRID model.
///
/// All node-id references in the element arrays are 1-based, matching
/// the binary format. `pids` runs parallel to the combined surface
/// sequence: index `i < tris.len()` is triangle `i`, the remainder are
/// quads.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VolumeMesh {
    /// Node coordinates, index = 0-based node id.
    pub nodes: Vec<Point3<f64>>,
    /// Surface triangles.
    pub tris: Vec<[i32; 3]>,
    /// Surface quadrilaterals.
    pub quads: Vec<[i32; 4]>,
    /// Patch id per surface element, length `tris.len() + quads.len()`.
    pub pids: Vec<i32>,
    /// Tetrahedra.
    pub tets: Vec<[i32; 4]>,
    /// Pyramids.
    pub pyramids: Vec<[i32; 5]>,
    /// Prisms.
    pub prisms: Vec<[i32; 6]>,
    /// Hexahedra.
    pub hexas: Vec<[i32; 8]>,
}

impl VolumeMesh {
    /// Create an empty mesh.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of nodes.
    pub fn num_nodes(&self) -> usize {
        self.nodes.len()
    }

    /// Number of surface elements (triangles + quads).
    pub fn num_surface_elements(&self) -> usize {
        self.tris.len() + self.quads.len()
    }

    /// Number of volume elements across all four kinds.
    pub fn num_volume_elements(&self) -> usize {
        self.tets.len() + self.pyramids.len() + self.prisms.len() + self.hexas.len()
    }

    /// True when both a surface skin and volume elements are present,
    /// the precondition for encoding.
    pub fn is_closed_model(&self) -> bool {
        self.num_surface_elements() > 0 && self.num_volume_elements() > 0
    }
}
