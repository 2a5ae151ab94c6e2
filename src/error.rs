//! Error types for ugrid.
//!
//! This module defines all error types used throughout the library.

use std::path::PathBuf;
use thiserror::Error;

use crate::mesh::ElementKind;

/// Result type alias using [`UgridError`].
pub type Result<T> = std::result::Result<T, UgridError>;

/// One element that failed the distinct-vertex check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DegenerateElement {
    /// The kind of the offending element.
    pub kind: ElementKind,
    /// Zero-based index of the element within its kind's array.
    pub index: usize,
    /// The element's vertex ids as stored (1-based).
    pub vertices: Vec<i32>,
}

/// Errors that can occur during UGRID decoding, validation, or skinning.
#[derive(Error, Debug)]
pub enum UgridError {
    /// The filename tag is unrecognized, or the byte layout does not match
    /// the descriptor inferred from it.
    #[error("format error: {0}")]
    Format(String),

    /// A fixed-size block read returned fewer bytes than declared.
    #[error("truncated {block} block: expected {expected} bytes, got {got}")]
    TruncatedData {
        /// Name of the block being read.
        block: &'static str,
        /// Bytes the block should contain.
        expected: usize,
        /// Bytes actually read.
        got: usize,
    },

    /// One or more elements have repeated vertex ids.
    #[error("{} degenerate element(s), first: {:?}", .elements.len(), .elements.first())]
    DegenerateElements {
        /// Every offending element, in scan order.
        elements: Vec<DegenerateElement>,
    },

    /// Nodes exist that no volume element references, or elements
    /// reference ids outside the node range.
    #[error("hanging nodes: {} unreferenced, {} out of range",
        .unreferenced.len(), .out_of_range.len())]
    HangingNodes {
        /// 1-based node ids not referenced by any volume element.
        unreferenced: Vec<i32>,
        /// Referenced ids outside `[1, nnodes]`.
        out_of_range: Vec<i32>,
    },

    /// A canonical face is shared by three or more volume elements.
    #[error("non-manifold mesh: face {face:?} is shared by elements {elements:?}")]
    NonManifold {
        /// The canonical (sorted) vertex ids of the face.
        face: Vec<i32>,
        /// Every element id contributing the face.
        elements: Vec<u32>,
    },

    /// Encode requires both surface and volume elements to be present.
    #[error("invalid mesh: {0}")]
    InvalidMesh(String),

    /// A patch id has no entry in the external tag lookup.
    #[error("patch id {patch_id} has no entry in the tag lookup")]
    UnknownPatch {
        /// The unresolved patch id.
        patch_id: i32,
    },

    /// File I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Error loading a mesh from a file.
    #[error("failed to load mesh from {path}: {message}")]
    LoadError {
        /// The file path.
        path: PathBuf,
        /// Error message.
        message: String,
    },
}
