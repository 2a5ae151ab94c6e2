//! Core mesh data structures and integrity checks.
//!
//! The primary type is [`VolumeMesh`], a flat-array representation of
//! one UGRID model: nodes, the surface skin (triangles and quads with
//! patch ids), and the four volume-element arrays. Meshes are built by
//! [`crate::io::load`] or assembled directly from arrays.
//!
//! [`check`] validates a decoded mesh before any downstream processing:
//! no degenerate elements, no hanging nodes.

mod check;
mod grid;

pub use check::{check, check_degenerate_elements, check_hanging_nodes, Strictness};
pub use grid::{ElementKind, VolumeMesh};
