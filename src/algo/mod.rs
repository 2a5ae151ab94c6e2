//! Mesh interpretation algorithms.
//!
//! This module contains the structural (topological) algorithms that
//! run on a decoded [`VolumeMesh`](crate::mesh::VolumeMesh):
//!
//! - **Skinning**: enumerate, deduplicate, and classify every face of
//!   every volume element ([`skin_volume`])
//! - **Patch aggregation**: group sorted surface elements into
//!   contiguous named boundary patches ([`sort_surface_by_patch`],
//!   [`collect_patches`])

pub mod patch;
pub mod skin;

pub use patch::{collect_patches, sort_surface_by_patch, BoundaryPatch};
pub use skin::{skin_volume, FaceRecord, Skin};
