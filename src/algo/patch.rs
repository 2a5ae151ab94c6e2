//! Boundary patch aggregation.
//!
//! Surface elements carry an integer patch id naming their boundary
//! group. Writers that emit per-patch face ranges (OpenFOAM-style
//! `nFaces`/`startFace` blocks) need those groups contiguous, so the
//! surface elements are first stable-sorted by patch id —
//! [`sort_surface_by_patch`] mutates the mesh in place — and then
//! [`collect_patches`] walks the sorted ids and emits one
//! [`BoundaryPatch`] per run.
//!
//! Patch names come from an external tag lookup; this module only needs
//! the `id -> name` projection as a plain map.

use std::collections::HashMap;

use tracing::debug;

use crate::error::{Result, UgridError};
use crate::mesh::VolumeMesh;

/// One contiguous run of surface elements sharing a patch id.
///
/// `start_face` and `num_faces` index the combined sorted surface
/// sequence described by the permutation that
/// [`sort_surface_by_patch`] returns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoundaryPatch {
    /// The patch id shared by the run.
    pub patch_id: i32,
    /// Display name resolved from the tag lookup.
    pub name: String,
    /// First index of the run in the sorted surface sequence.
    pub start_face: usize,
    /// Length of the run.
    pub num_faces: usize,
}

/// Stable-sort the surface elements and their patch ids by ascending
/// patch id.
///
/// The combined surface index space is `[0, ntri + nquad)` with
/// triangles first, matching `pids`. The same stable permutation is
/// applied to `pids` and, through its induced sub-permutations, to the
/// triangle and quad arrays — this mutates the mesh's surface-element
/// order. Returns the permutation (sorted position -> original combined
/// index) for writers that need the interleaved sorted order.
pub fn sort_surface_by_patch(mesh: &mut VolumeMesh) -> Vec<u32> {
    let ntri = mesh.tris.len();
    let pids = std::mem::take(&mut mesh.pids);

    let mut order: Vec<u32> = (0..pids.len() as u32).collect();
    order.sort_by_key(|&i| pids[i as usize]);

    mesh.pids = order.iter().map(|&i| pids[i as usize]).collect();

    let tris = std::mem::take(&mut mesh.tris);
    mesh.tris = order
        .iter()
        .filter(|&&i| (i as usize) < ntri)
        .map(|&i| tris[i as usize])
        .collect();

    let quads = std::mem::take(&mut mesh.quads);
    mesh.quads = order
        .iter()
        .filter(|&&i| (i as usize) >= ntri)
        .map(|&i| quads[i as usize - ntri])
        .collect();

    debug!(surface = order.len(), "sorted surface elements by patch id");
    order
}

/// Group the sorted patch ids into contiguous named patches.
///
/// Call [`sort_surface_by_patch`] first; an out-of-order patch id fails
/// with [`UgridError::InvalidMesh`]. A patch id missing from the tag
/// lookup fails with [`UgridError::UnknownPatch`].
pub fn collect_patches(
    mesh: &VolumeMesh,
    tags: &HashMap<i32, String>,
) -> Result<Vec<BoundaryPatch>> {
    let pids = &mesh.pids;
    let mut patches = Vec::new();

    let mut start = 0usize;
    while start < pids.len() {
        let patch_id = pids[start];
        let mut end = start + 1;
        while end < pids.len() && pids[end] == patch_id {
            end += 1;
        }
        if end < pids.len() && pids[end] < patch_id {
            return Err(UgridError::InvalidMesh(format!(
                "patch id {} follows {} at surface index {}; \
                 sort surface elements by patch id before aggregating",
                pids[end], patch_id, end
            )));
        }

        let name = tags
            .get(&patch_id)
            .ok_or(UgridError::UnknownPatch { patch_id })?
            .clone();
        patches.push(BoundaryPatch {
            patch_id,
            name,
            start_face: start,
            num_faces: end - start,
        });
        start = end;
    }

    Ok(patches)
}
