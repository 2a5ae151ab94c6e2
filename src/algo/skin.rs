//! Face extraction ("skinning").
//!
//! Given only the volume-element connectivity, [`skin_volume`]
//! reconstructs every geometric face, merges the duplicates that arise
//! where two elements touch, and classifies each face as boundary (one
//! owning element) or interior (two). This is how the boundary skin of
//! a solid mesh is re-derived without trusting the stored surface
//! elements, and it is the input to polyhedral owner/neighbour writers.
//!
//! Each element kind has a fixed face template with outward winding: a
//! tetrahedron contributes 4 triangles, a pyramid 4 triangles and 1
//! quad, a prism 2 triangles and 3 quads, a hexahedron 6 quads.
//! Deduplication uses the sorted vertex tuple as a canonical key; the
//! emitted face keeps the *unsorted* orientation of its first
//! contributor. Elements are enumerated in ascending id order, so the
//! first contributor is always the owner and the emitted winding is the
//! owner's own.
//!
//! # Example
//!
//! ```
//! use ugrid::mesh::VolumeMesh;
//! use ugrid::algo::skin_volume;
//!
//! let mut mesh = VolumeMesh::new();
//! mesh.tets.push([1, 2, 3, 4]);
//!
//! let skin = skin_volume(&mesh).unwrap();
//! assert_eq!(skin.tri_faces.len(), 4);
//! assert!(skin.tri_faces.iter().all(|f| f.neighbor.is_none()));
//! ```

use std::collections::hash_map::Entry;
use std::collections::HashMap;

use tracing::{debug, info};

use crate::error::{Result, UgridError};
use crate::mesh::VolumeMesh;

/// Tetrahedron faces (local vertex indices, outward winding).
const TET_TRIS: [[usize; 3]; 4] = [[2, 1, 0], [0, 1, 3], [3, 2, 0], [1, 2, 3]];

/// Pyramid side faces.
const PYRAMID_TRIS: [[usize; 3]; 4] = [[1, 2, 4], [0, 1, 4], [3, 0, 4], [4, 2, 3]];
/// Pyramid base.
const PYRAMID_QUADS: [[usize; 4]; 1] = [[3, 2, 1, 0]];

/// Prism caps.
const PRISM_TRIS: [[usize; 3]; 2] = [[0, 1, 2], [4, 3, 5]];
/// Prism sides.
const PRISM_QUADS: [[usize; 4]; 3] = [[1, 4, 5, 2], [3, 0, 2, 5], [3, 4, 1, 0]];

/// Hexahedron faces.
const HEXA_QUADS: [[usize; 4]; 6] = [
    [0, 1, 2, 3],
    [1, 5, 6, 2],
    [5, 4, 7, 6],
    [4, 0, 3, 7],
    [3, 2, 6, 7],
    [4, 5, 1, 0],
];

/// One deduplicated face with its owning element(s).
///
/// `vertices` are 0-based node indices in the owner's outward winding.
/// Element ids are global across all volume-element kinds, 1-based, in
/// read order (tets, pyramids, prisms, hexahedra).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FaceRecord<const N: usize> {
    /// Face vertices, owner-oriented.
    pub vertices: [i32; N],
    /// Lower of the sharing element ids.
    pub owner: u32,
    /// Higher sharing element id; `None` for boundary faces.
    pub neighbor: Option<u32>,
}

impl<const N: usize> FaceRecord<N> {
    /// True when exactly one element owns this face.
    pub fn is_boundary(&self) -> bool {
        self.neighbor.is_none()
    }
}

/// The deduplicated face set of a volume mesh.
///
/// Triangular and quadrilateral faces are kept in separate dense arrays
/// because downstream writers process them by arity.
#[derive(Debug, Clone, Default)]
pub struct Skin {
    /// Deduplicated triangular faces.
    pub tri_faces: Vec<FaceRecord<3>>,
    /// Deduplicated quadrilateral faces.
    pub quad_faces: Vec<FaceRecord<4>>,
}

impl Skin {
    /// Boundary-face count over both arities.
    pub fn num_boundary(&self) -> usize {
        count_boundary(&self.tri_faces) + count_boundary(&self.quad_faces)
    }

    /// Interior-face count over both arities.
    pub fn num_interior(&self) -> usize {
        (self.tri_faces.len() + self.quad_faces.len()) - self.num_boundary()
    }

    /// Boundary triangles.
    pub fn num_boundary_tris(&self) -> usize {
        count_boundary(&self.tri_faces)
    }

    /// Boundary quads.
    pub fn num_boundary_quads(&self) -> usize {
        count_boundary(&self.quad_faces)
    }
}

fn count_boundary<const N: usize>(faces: &[FaceRecord<N>]) -> usize {
    faces.iter().filter(|f| f.is_boundary()).count()
}

/// One enumerated face instance, before deduplication.
#[derive(Debug, Clone, Copy)]
struct Instance<const N: usize> {
    vertices: [i32; N],
    element: u32,
}

/// Total triangular face instances the mesh will produce.
fn tri_instance_count(mesh: &VolumeMesh) -> usize {
    4 * mesh.tets.len() + 4 * mesh.pyramids.len() + 2 * mesh.prisms.len()
}

/// Total quadrilateral face instances the mesh will produce.
fn quad_instance_count(mesh: &VolumeMesh) -> usize {
    mesh.pyramids.len() + 3 * mesh.prisms.len() + 6 * mesh.hexas.len()
}

/// Extract and classify every face of the mesh's volume elements.
///
/// Fails with [`UgridError::NonManifold`] when any face is shared by
/// three or more elements. Runs in O(F) for F total face instances
/// (roughly 4-6x the element count).
pub fn skin_volume(mesh: &VolumeMesh) -> Result<Skin> {
    let mut tri_instances: Vec<Instance<3>> = Vec::with_capacity(tri_instance_count(mesh));
    let mut quad_instances: Vec<Instance<4>> = Vec::with_capacity(quad_instance_count(mesh));

    // Element ids are assigned in read order, starting at 1.
    let mut eid: u32 = 1;
    for tet in &mesh.tets {
        for template in &TET_TRIS {
            tri_instances.push(instantiate(tet, template, eid));
        }
        eid += 1;
    }
    for pyramid in &mesh.pyramids {
        for template in &PYRAMID_TRIS {
            tri_instances.push(instantiate(pyramid, template, eid));
        }
        for template in &PYRAMID_QUADS {
            quad_instances.push(instantiate(pyramid, template, eid));
        }
        eid += 1;
    }
    for prism in &mesh.prisms {
        for template in &PRISM_TRIS {
            tri_instances.push(instantiate(prism, template, eid));
        }
        for template in &PRISM_QUADS {
            quad_instances.push(instantiate(prism, template, eid));
        }
        eid += 1;
    }
    for hexa in &mesh.hexas {
        for template in &HEXA_QUADS {
            quad_instances.push(instantiate(hexa, template, eid));
        }
        eid += 1;
    }

    debug_assert_eq!(tri_instances.len(), tri_instance_count(mesh));
    debug_assert_eq!(quad_instances.len(), quad_instance_count(mesh));
    debug!(
        tri_instances = tri_instances.len(),
        quad_instances = quad_instances.len(),
        "enumerated face instances"
    );

    let skin = Skin {
        tri_faces: deduplicate(&tri_instances)?,
        quad_faces: deduplicate(&quad_instances)?,
    };
    info!(
        boundary = skin.num_boundary(),
        interior = skin.num_interior(),
        "skinned volume mesh"
    );
    Ok(skin)
}

/// Substitute an element's node ids into one face template, normalizing
/// the stored 1-based ids to 0-based.
fn instantiate<const A: usize, const N: usize>(
    element: &[i32; A],
    template: &[usize; N],
    eid: u32,
) -> Instance<N> {
    let mut vertices = [0i32; N];
    for (v, &local) in vertices.iter_mut().zip(template.iter()) {
        *v = element[local] - 1;
    }
    Instance {
        vertices,
        element: eid,
    }
}

/// Contributor slot for one canonical key: indices into the instance
/// array, `u32::MAX` meaning absent.
#[derive(Clone, Copy)]
struct Slot {
    first: u32,
    second: u32,
}

const ABSENT: u32 = u32::MAX;

/// Group face instances by canonical key and emit one record per key.
///
/// Records appear in first-contribution order. Because instances are
/// enumerated in ascending element-id order, `first` always belongs to
/// the lower (owner) element.
fn deduplicate<const N: usize>(instances: &[Instance<N>]) -> Result<Vec<FaceRecord<N>>> {
    let mut slots: HashMap<[i32; N], Slot> = HashMap::with_capacity(instances.len());

    for (i, instance) in instances.iter().enumerate() {
        let key = canonical_key(&instance.vertices);
        match slots.entry(key) {
            Entry::Vacant(entry) => {
                entry.insert(Slot {
                    first: i as u32,
                    second: ABSENT,
                });
            }
            Entry::Occupied(mut entry) => {
                let slot = entry.get_mut();
                if slot.second == ABSENT {
                    slot.second = i as u32;
                } else {
                    return Err(non_manifold(instances, &key));
                }
            }
        }
    }

    // Second pass fills a preallocated output in first-contribution order.
    let mut faces = Vec::with_capacity(slots.len());
    for (i, instance) in instances.iter().enumerate() {
        let key = canonical_key(&instance.vertices);
        let slot = &slots[&key];
        if slot.first != i as u32 {
            continue;
        }
        let neighbor = if slot.second == ABSENT {
            None
        } else {
            Some(instances[slot.second as usize].element)
        };
        faces.push(FaceRecord {
            vertices: instance.vertices,
            owner: instance.element,
            neighbor,
        });
    }
    Ok(faces)
}

fn canonical_key<const N: usize>(vertices: &[i32; N]) -> [i32; N] {
    let mut key = *vertices;
    key.sort_unstable();
    key
}

/// Build the non-manifold error, naming every element that contributed
/// the offending canonical face.
fn non_manifold<const N: usize>(instances: &[Instance<N>], key: &[i32; N]) -> UgridError {
    let elements: Vec<u32> = instances
        .iter()
        .filter(|instance| canonical_key(&instance.vertices) == *key)
        .map(|instance| instance.element)
        .collect();
    UgridError::NonManifold {
        face: key.to_vec(),
        elements,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Two unit cubes stacked along z, sharing the quad {5,6,7,8}
    /// (1-based). 12 distinct nodes.
    fn two_cubes() -> VolumeMesh {
        let mut mesh = VolumeMesh::new();
        mesh.hexas.push([1, 2, 3, 4, 5, 6, 7, 8]);
        mesh.hexas.push([5, 6, 7, 8, 9, 10, 11, 12]);
        mesh
    }

    #[test]
    fn test_single_tet() {
        let mut mesh = VolumeMesh::new();
        mesh.tets.push([1, 2, 3, 4]);

        let skin = skin_volume(&mesh).unwrap();
        assert_eq!(skin.tri_faces.len(), 4);
        assert_eq!(skin.quad_faces.len(), 0);
        assert_eq!(skin.num_boundary(), 4);
        assert_eq!(skin.num_interior(), 0);
        for face in &skin.tri_faces {
            assert_eq!(face.owner, 1);
            assert!(face.is_boundary());
        }
    }

    #[test]
    fn test_two_adjacent_cubes() {
        let mesh = two_cubes();
        let skin = skin_volume(&mesh).unwrap();

        assert_eq!(skin.tri_faces.len(), 0);
        assert_eq!(skin.quad_faces.len(), 11);
        assert_eq!(skin.num_boundary_quads(), 10);
        assert_eq!(skin.num_interior(), 1);

        let interior: Vec<_> = skin
            .quad_faces
            .iter()
            .filter(|f| !f.is_boundary())
            .collect();
        assert_eq!(interior.len(), 1);
        assert_eq!(interior[0].owner, 1);
        assert_eq!(interior[0].neighbor, Some(2));
        // The shared face is {5,6,7,8} 1-based -> {4,5,6,7} 0-based.
        let mut key = interior[0].vertices;
        key.sort_unstable();
        assert_eq!(key, [4, 5, 6, 7]);
    }

    #[test]
    fn test_interior_face_keeps_owner_orientation() {
        let mesh = two_cubes();
        let skin = skin_volume(&mesh).unwrap();

        let interior = skin.quad_faces.iter().find(|f| !f.is_boundary()).unwrap();
        // The owner (element 1) emits its top face through the
        // [5,4,7,6] template slot; the first contributor's unsorted
        // winding is preserved verbatim, not the neighbor's [0,1,2,3].
        assert_eq!(interior.vertices, [5, 4, 7, 6]);
    }

    #[test]
    fn test_two_stacked_tets() {
        let mut mesh = VolumeMesh::new();
        mesh.tets.push([1, 2, 3, 4]);
        mesh.tets.push([1, 3, 2, 5]);

        let skin = skin_volume(&mesh).unwrap();
        assert_eq!(skin.tri_faces.len(), 7);
        assert_eq!(skin.num_boundary(), 6);
        assert_eq!(skin.num_interior(), 1);

        let interior = skin.tri_faces.iter().find(|f| !f.is_boundary()).unwrap();
        assert_eq!(interior.owner, 1);
        assert_eq!(interior.neighbor, Some(2));
    }

    #[test]
    fn test_single_pyramid() {
        let mut mesh = VolumeMesh::new();
        mesh.pyramids.push([1, 2, 3, 4, 5]);

        let skin = skin_volume(&mesh).unwrap();
        assert_eq!(skin.tri_faces.len(), 4);
        assert_eq!(skin.quad_faces.len(), 1);
        assert_eq!(skin.num_boundary(), 5);
    }

    #[test]
    fn test_single_prism() {
        // Prism templates must read the prism connectivity only; a
        // pyramid-free mesh exercises that directly.
        let mut mesh = VolumeMesh::new();
        mesh.prisms.push([1, 2, 3, 4, 5, 6]);

        let skin = skin_volume(&mesh).unwrap();
        assert_eq!(skin.tri_faces.len(), 2);
        assert_eq!(skin.quad_faces.len(), 3);
        assert_eq!(skin.num_boundary(), 5);

        let mut caps: Vec<[i32; 3]> = skin
            .tri_faces
            .iter()
            .map(|f| canonical_key(&f.vertices))
            .collect();
        caps.sort_unstable();
        assert_eq!(caps, vec![[0, 1, 2], [3, 4, 5]]);
    }

    #[test]
    fn test_mixed_kinds_element_ids_are_global() {
        // One tet (id 1), one pyramid (id 2), one prism (id 3), one
        // hexa (id 4), all disjoint.
        let mut mesh = VolumeMesh::new();
        mesh.tets.push([1, 2, 3, 4]);
        mesh.pyramids.push([5, 6, 7, 8, 9]);
        mesh.prisms.push([10, 11, 12, 13, 14, 15]);
        mesh.hexas.push([16, 17, 18, 19, 20, 21, 22, 23]);

        let skin = skin_volume(&mesh).unwrap();
        let mut owners: Vec<u32> = skin.tri_faces.iter().map(|f| f.owner).collect();
        owners.extend(skin.quad_faces.iter().map(|f| f.owner));
        assert!(owners.contains(&1));
        assert!(owners.contains(&2));
        assert!(owners.contains(&3));
        assert!(owners.contains(&4));
    }

    #[test]
    fn test_face_conservation() {
        let mesh = two_cubes();
        let skin = skin_volume(&mesh).unwrap();

        let instances = tri_instance_count(&mesh) + quad_instance_count(&mesh);
        assert_eq!(instances, 2 * skin.num_interior() + skin.num_boundary());
    }

    #[test]
    fn test_owner_below_neighbor() {
        let mesh = two_cubes();
        let skin = skin_volume(&mesh).unwrap();
        for face in skin.tri_faces.iter() {
            if let Some(n) = face.neighbor {
                assert!(face.owner < n);
            }
        }
        for face in skin.quad_faces.iter() {
            if let Some(n) = face.neighbor {
                assert!(face.owner < n);
            }
        }
    }

    #[test]
    fn test_non_manifold_face_rejected() {
        // Three tets all sharing the face {1,2,3}.
        let mut mesh = VolumeMesh::new();
        mesh.tets.push([1, 2, 3, 4]);
        mesh.tets.push([1, 2, 3, 5]);
        mesh.tets.push([1, 2, 3, 6]);

        let err = skin_volume(&mesh).unwrap_err();
        match err {
            UgridError::NonManifold { face, elements } => {
                assert_eq!(face, vec![0, 1, 2]);
                assert_eq!(elements, vec![1, 2, 3]);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
