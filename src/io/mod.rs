//! UGRID file I/O.
//!
//! The binary layout of a UGRID file carries no self-description; the
//! float width and byte order are encoded in the filename instead, in a
//! format-tag segment between the base name and the `.ugrid` extension:
//!
//! | Filename | Width | Endianness |
//! |----------|-------|------------|
//! | `model.b8.ugrid` | 64-bit | big |
//! | `model.b4.ugrid` | 32-bit | big |
//! | `model.lb8.ugrid` | 64-bit | little |
//! | `model.lb4.ugrid` | 32-bit | little |
//!
//! Fortran record-padded variants (`r8`, `lr4`, ...) exist in the wild
//! but are not supported here.
//!
//! # Usage
//!
//! ```no_run
//! use ugrid::io::{load, save};
//!
//! let mesh = load("model.b8.ugrid").unwrap();
//! save(&mesh, "model.lb4.ugrid").unwrap(); // converts to little-endian f32
//! ```

pub mod codec;

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use crate::error::{Result, UgridError};
use crate::mesh::VolumeMesh;

/// On-disk float width of node coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FloatWidth {
    /// 32-bit floats (`4` in the format tag).
    F32,
    /// 64-bit floats (`8` in the format tag).
    F64,
}

impl FloatWidth {
    /// Width in bytes.
    pub fn bytes(self) -> usize {
        match self {
            FloatWidth::F32 => 4,
            FloatWidth::F64 => 8,
        }
    }
}

/// Byte order of every word in the file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endianness {
    /// Little-endian (`lb` in the format tag).
    Little,
    /// Big-endian (`b` in the format tag).
    Big,
}

/// Width and endianness inferred from a UGRID filename.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormatDescriptor {
    /// Float width of the node block.
    pub width: FloatWidth,
    /// Byte order of every block.
    pub endianness: Endianness,
}

impl FormatDescriptor {
    /// Parse the format tag out of a UGRID filename.
    ///
    /// The name must have the shape `<base>.<tag>.ugrid`; the tag must
    /// contain a precision digit (`4` or `8`) and an endianness marker
    /// (`lb` or `b`).
    ///
    /// # Example
    ///
    /// ```
    /// use ugrid::io::{Endianness, FloatWidth, FormatDescriptor};
    ///
    /// let desc = FormatDescriptor::from_filename("wing.b8.ugrid").unwrap();
    /// assert_eq!(desc.width, FloatWidth::F64);
    /// assert_eq!(desc.endianness, Endianness::Big);
    /// ```
    pub fn from_filename(filename: &str) -> Result<Self> {
        let parts: Vec<&str> = filename.split('.').collect();
        if parts.len() < 3 || *parts.last().unwrap_or(&"") != "ugrid" {
            return Err(UgridError::Format(format!(
                "expected <name>.<tag>.ugrid, got {filename:?}"
            )));
        }
        let tag = parts[parts.len() - 2];

        let width = if tag.contains('8') {
            FloatWidth::F64
        } else if tag.contains('4') {
            FloatWidth::F32
        } else {
            return Err(UgridError::Format(format!(
                "format tag {tag:?} has no precision digit (4 or 8)"
            )));
        };

        let endianness = if tag.contains("lb") {
            Endianness::Little
        } else if tag.contains('b') {
            Endianness::Big
        } else {
            return Err(UgridError::Format(format!(
                "format tag {tag:?} has no endianness marker (b or lb)"
            )));
        };

        Ok(FormatDescriptor { width, endianness })
    }

    /// Parse the format tag from the final path component.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let filename = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| UgridError::Format(format!("path {} has no filename", path.display())))?;
        Self::from_filename(filename)
    }
}

/// Load a UGRID file, inferring width and endianness from its name.
///
/// The whole file must be consumed by the decode; leftover bytes mean
/// the filename tag lied about the layout and fail with
/// [`UgridError::Format`].
pub fn load<P: AsRef<Path>>(path: P) -> Result<VolumeMesh> {
    let path = path.as_ref();
    let descriptor = FormatDescriptor::from_path(path)?;
    let file = File::open(path).map_err(|e| UgridError::LoadError {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    let total_len = file.metadata()?.len();
    let reader = BufReader::new(file);
    codec::decode_from(reader, descriptor, total_len)
}

/// Save a mesh under a UGRID filename, packing it with the width and
/// endianness the name demands.
pub fn save<P: AsRef<Path>>(mesh: &VolumeMesh, path: P) -> Result<()> {
    let path = path.as_ref();
    let descriptor = FormatDescriptor::from_path(path)?;
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    codec::encode_to(mesh, &mut writer, descriptor)?;
    writer.flush()?;
    Ok(())
}
