//! # ugrid
//!
//! A reader, writer, and surface-skinning engine for the AFLR UGRID
//! binary volumetric-mesh interchange format used by CFD/CAE
//! preprocessors.
//!
//! ## Features
//!
//! - **Binary codec**: decode/encode the fixed-sequence UGRID record,
//!   with width and endianness inferred from the filename tag
//!   (`model.b8.ugrid`, `model.lb4.ugrid`)
//! - **Integrity checks**: hanging-node and degenerate-element
//!   validation with configurable strictness
//! - **Skinning**: re-derive every boundary and interior face of a
//!   solid mesh purely from its volume-element connectivity, with
//!   deterministic owner/neighbour assignment
//! - **Patch aggregation**: contiguous named boundary-patch ranges for
//!   polyhedral-mesh writers
//!
//! ## Quick Start
//!
//! ```no_run
//! use ugrid::prelude::*;
//!
//! // Width and endianness come from the filename tag.
//! let mesh = ugrid::io::load("wing.b8.ugrid").unwrap();
//! println!("nodes: {}", mesh.num_nodes());
//! println!("volume elements: {}", mesh.num_volume_elements());
//!
//! // Validate, then re-derive the boundary skin.
//! ugrid::mesh::check(&mesh, Strictness::Strict).unwrap();
//! let skin = skin_volume(&mesh).unwrap();
//! println!(
//!     "boundary faces: {}, interior faces: {}",
//!     skin.num_boundary(),
//!     skin.num_interior()
//! );
//! ```
//!
//! ## Building Meshes Programmatically
//!
//! ```
//! use ugrid::prelude::*;
//! use nalgebra::Point3;
//!
//! let mut mesh = VolumeMesh::new();
//! mesh.nodes = vec![
//!     Point3::new(0.0, 0.0, 0.0),
//!     Point3::new(1.0, 0.0, 0.0),
//!     Point3::new(0.0, 1.0, 0.0),
//!     Point3::new(0.0, 0.0, 1.0),
//! ];
//! // Connectivity is 1-based, as in the on-disk format.
//! mesh.tets = vec![[1, 2, 3, 4]];
//!
//! let skin = skin_volume(&mesh).unwrap();
//! assert_eq!(skin.num_boundary(), 4);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod algo;
pub mod error;
pub mod io;
pub mod mesh;

/// Prelude module for convenient imports.
///
/// This module re-exports the most commonly used types and functions:
///
/// ```
/// use ugrid::prelude::*;
/// ```
pub mod prelude {
    pub use crate::algo::{
        collect_patches, skin_volume, sort_surface_by_patch, BoundaryPatch, FaceRecord, Skin,
    };
    pub use crate::error::{Result, UgridError};
    pub use crate::io::{Endianness, FloatWidth, FormatDescriptor};
    pub use crate::mesh::{ElementKind, Strictness, VolumeMesh};
}

// Re-export nalgebra types for convenience
pub use nalgebra;
