//! Mesh integrity checks.
//!
//! Two independent validations run between decode and skinning:
//!
//! - [`check_degenerate_elements`]: every element must have as many
//!   distinct vertex ids as its nominal arity.
//! - [`check_hanging_nodes`]: every node must be referenced by at least
//!   one volume element, and no element may reference an id outside the
//!   node range. Surface elements do not count as references; a node
//!   carried only by the skin is still hanging.
//!
//! The hanging-node check supports a lenient mode that logs instead of
//! failing; the degenerate check is always fatal.

use rayon::prelude::*;
use tracing::{info, warn};

use super::grid::{ElementKind, VolumeMesh};
use crate::error::{DegenerateElement, Result, UgridError};

/// Policy for the hanging-node check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Strictness {
    /// Any hanging node fails with [`UgridError::HangingNodes`].
    #[default]
    Strict,
    /// Hanging nodes are logged and returned, not fatal.
    Lenient,
}

/// Run both integrity checks: degenerate elements first, then hanging
/// nodes under the given policy.
pub fn check(mesh: &VolumeMesh, strictness: Strictness) -> Result<()> {
    check_degenerate_elements(mesh)?;
    check_hanging_nodes(mesh, strictness)?;
    Ok(())
}

/// Verify that every node is referenced by some volume element.
///
/// Returns the offending 1-based ids (unreferenced nodes followed by
/// out-of-range references). The list is empty for a sound mesh. Under
/// [`Strictness::Strict`] a non-empty list is an error instead.
pub fn check_hanging_nodes(mesh: &VolumeMesh, strictness: Strictness) -> Result<Vec<i32>> {
    let nnodes = mesh.num_nodes();
    info!(nnodes, "checking hanging nodes");

    // Dense coverage mask over the 1-based id range.
    let mut seen = vec![false; nnodes];
    let mut out_of_range: Vec<i32> = Vec::new();

    {
        let mut mark = |id: i32| {
            if id >= 1 && (id as usize) <= nnodes {
                seen[id as usize - 1] = true;
            } else {
                out_of_range.push(id);
            }
        };
        for tet in &mesh.tets {
            tet.iter().copied().for_each(&mut mark);
        }
        for pyramid in &mesh.pyramids {
            pyramid.iter().copied().for_each(&mut mark);
        }
        for prism in &mesh.prisms {
            prism.iter().copied().for_each(&mut mark);
        }
        for hexa in &mesh.hexas {
            hexa.iter().copied().for_each(&mut mark);
        }
    }

    let unreferenced: Vec<i32> = seen
        .iter()
        .enumerate()
        .filter(|(_, &s)| !s)
        .map(|(i, _)| i as i32 + 1)
        .collect();
    out_of_range.sort_unstable();
    out_of_range.dedup();

    if unreferenced.is_empty() && out_of_range.is_empty() {
        return Ok(Vec::new());
    }

    match strictness {
        Strictness::Strict => Err(UgridError::HangingNodes {
            unreferenced,
            out_of_range,
        }),
        Strictness::Lenient => {
            warn!(
                unreferenced = unreferenced.len(),
                out_of_range = out_of_range.len(),
                "mesh has hanging nodes"
            );
            let mut ids = unreferenced;
            ids.extend_from_slice(&out_of_range);
            Ok(ids)
        }
    }
}

/// Verify that every surface and volume element has `arity` distinct
/// vertex ids. All offenders are collected into one batch error.
pub fn check_degenerate_elements(mesh: &VolumeMesh) -> Result<()> {
    let mut offenders: Vec<DegenerateElement> = Vec::new();
    offenders.extend(scan_kind(&mesh.tris, ElementKind::Tri));
    offenders.extend(scan_kind(&mesh.quads, ElementKind::Quad));
    offenders.extend(scan_kind(&mesh.tets, ElementKind::Tet));
    offenders.extend(scan_kind(&mesh.pyramids, ElementKind::Pyramid));
    offenders.extend(scan_kind(&mesh.prisms, ElementKind::Prism));
    offenders.extend(scan_kind(&mesh.hexas, ElementKind::Hexa));

    if offenders.is_empty() {
        Ok(())
    } else {
        Err(UgridError::DegenerateElements {
            elements: offenders,
        })
    }
}

/// Parallel scan of one element array for repeated vertex ids.
fn scan_kind<const N: usize>(elements: &[[i32; N]], kind: ElementKind) -> Vec<DegenerateElement> {
    elements
        .par_iter()
        .enumerate()
        .filter_map(|(index, element)| {
            if has_repeats(element) {
                Some(DegenerateElement {
                    kind,
                    index,
                    vertices: element.to_vec(),
                })
            } else {
                None
            }
        })
        .collect()
}

fn has_repeats<const N: usize>(element: &[i32; N]) -> bool {
    let mut sorted = *element;
    sorted.sort_unstable();
    sorted.windows(2).any(|w| w[0] == w[1])
}
