//! The binary UGRID codec.
//!
//! A UGRID file is a fixed sequence of typed blocks with no padding or
//! delimiters:
//!
//! ```text
//! | Header     | int32 x 7      | nnodes ntri nquad ntet npyr npris nhex
//! | Nodes      | float(width)   | nnodes * 3
//! | Triangles  | int32          | ntri * 3   (1-based node ids)
//! | Quads      | int32          | nquad * 4
//! | Patch ids  | int32          | ntri + nquad
//! | Tetrahedra | int32          | ntet * 4
//! | Pyramids   | int32          | npyr * 5
//! | Prisms     | int32          | npris * 6
//! | Hexahedra  | int32          | nhex * 8
//! ```
//!
//! Because the format is not self-describing, a short block read is a
//! hard [`TruncatedData`](crate::error::UgridError::TruncatedData)
//! error, and a decode that succeeds without consuming the whole source
//! means the filename tag guessed the wrong width or endianness and
//! fails with [`Format`](crate::error::UgridError::Format).

use std::io::{Read, Write};

use nalgebra::Point3;
use tracing::{debug, info};

use super::{Endianness, FloatWidth, FormatDescriptor};
use crate::error::{Result, UgridError};
use crate::mesh::VolumeMesh;

/// Read side of the codec: wraps a reader with a running byte offset so
/// the caller can confirm the whole source was consumed.
struct BlockCursor<R> {
    inner: R,
    offset: u64,
}

impl<R: Read> BlockCursor<R> {
    fn new(inner: R) -> Self {
        BlockCursor { inner, offset: 0 }
    }

    /// Read exactly `len` bytes as one block. A short read reports the
    /// block name and the byte counts.
    fn read_block(&mut self, block: &'static str, len: usize) -> Result<Vec<u8>> {
        let mut buf = vec![0u8; len];
        let mut filled = 0;
        while filled < len {
            let n = self.inner.read(&mut buf[filled..])?;
            if n == 0 {
                return Err(UgridError::TruncatedData {
                    block,
                    expected: len,
                    got: filled,
                });
            }
            filled += n;
        }
        self.offset += len as u64;
        Ok(buf)
    }

    fn read_i32s(
        &mut self,
        block: &'static str,
        count: usize,
        endianness: Endianness,
    ) -> Result<Vec<i32>> {
        let buf = self.read_block(block, count * 4)?;
        let values = buf
            .chunks_exact(4)
            .map(|c| {
                let word = [c[0], c[1], c[2], c[3]];
                match endianness {
                    Endianness::Little => i32::from_le_bytes(word),
                    Endianness::Big => i32::from_be_bytes(word),
                }
            })
            .collect();
        Ok(values)
    }

    fn read_floats(
        &mut self,
        block: &'static str,
        count: usize,
        descriptor: FormatDescriptor,
    ) -> Result<Vec<f64>> {
        let buf = self.read_block(block, count * descriptor.width.bytes())?;
        let values = match descriptor.width {
            FloatWidth::F32 => buf
                .chunks_exact(4)
                .map(|c| {
                    let word = [c[0], c[1], c[2], c[3]];
                    let v = match descriptor.endianness {
                        Endianness::Little => f32::from_le_bytes(word),
                        Endianness::Big => f32::from_be_bytes(word),
                    };
                    f64::from(v)
                })
                .collect(),
            FloatWidth::F64 => buf
                .chunks_exact(8)
                .map(|c| {
                    let word = [c[0], c[1], c[2], c[3], c[4], c[5], c[6], c[7]];
                    match descriptor.endianness {
                        Endianness::Little => f64::from_le_bytes(word),
                        Endianness::Big => f64::from_be_bytes(word),
                    }
                })
                .collect(),
        };
        Ok(values)
    }
}

/// Write side of the codec.
struct BlockSink<W> {
    inner: W,
    offset: u64,
}

impl<W: Write> BlockSink<W> {
    fn new(inner: W) -> Self {
        BlockSink { inner, offset: 0 }
    }

    fn write_i32s(&mut self, values: &[i32], endianness: Endianness) -> Result<()> {
        for &v in values {
            let word = match endianness {
                Endianness::Little => v.to_le_bytes(),
                Endianness::Big => v.to_be_bytes(),
            };
            self.inner.write_all(&word)?;
        }
        self.offset += values.len() as u64 * 4;
        Ok(())
    }

    fn write_floats(&mut self, values: &[f64], descriptor: FormatDescriptor) -> Result<()> {
        for &v in values {
            match descriptor.width {
                FloatWidth::F32 => {
                    let word = match descriptor.endianness {
                        Endianness::Little => (v as f32).to_le_bytes(),
                        Endianness::Big => (v as f32).to_be_bytes(),
                    };
                    self.inner.write_all(&word)?;
                }
                FloatWidth::F64 => {
                    let word = match descriptor.endianness {
                        Endianness::Little => v.to_le_bytes(),
                        Endianness::Big => v.to_be_bytes(),
                    };
                    self.inner.write_all(&word)?;
                }
            }
        }
        self.offset += values.len() as u64 * descriptor.width.bytes() as u64;
        Ok(())
    }
}

/// Reshape a flat i32 run into fixed-arity rows.
fn to_rows<const N: usize>(flat: Vec<i32>) -> Vec<[i32; N]> {
    flat.chunks_exact(N)
        .map(|chunk| {
            let mut row = [0i32; N];
            row.copy_from_slice(chunk);
            row
        })
        .collect()
}

/// Decode one UGRID model from a reader, verifying that exactly
/// `total_len` bytes are consumed.
///
/// A decode that finishes short of `total_len` (or would need to read
/// past it) means the descriptor's width or endianness is wrong for the
/// actual byte layout.
pub fn decode_from<R: Read>(
    reader: R,
    descriptor: FormatDescriptor,
    total_len: u64,
) -> Result<VolumeMesh> {
    let (mesh, consumed) = decode(reader, descriptor)?;
    if consumed != total_len {
        return Err(UgridError::Format(format!(
            "decoded {consumed} bytes but the source holds {total_len}; \
             the filename tag likely names the wrong precision or endianness"
        )));
    }
    Ok(mesh)
}

/// Decode one UGRID model from a reader.
///
/// Returns the mesh and the number of bytes consumed. Connectivity is
/// left 1-based, exactly as stored on disk.
pub fn decode<R: Read>(reader: R, descriptor: FormatDescriptor) -> Result<(VolumeMesh, u64)> {
    let mut cursor = BlockCursor::new(reader);

    let header = cursor.read_i32s("header", 7, descriptor.endianness)?;
    if header.iter().any(|&c| c < 0) {
        return Err(UgridError::Format(format!(
            "negative count in header {header:?}; \
             the filename tag likely names the wrong endianness"
        )));
    }
    let nnodes = header[0] as usize;
    let ntri = header[1] as usize;
    let nquad = header[2] as usize;
    let ntet = header[3] as usize;
    let npyr = header[4] as usize;
    let npris = header[5] as usize;
    let nhex = header[6] as usize;
    let npatch = ntri + nquad;

    info!(
        nnodes,
        ntri, nquad, ntet, npyr, npris, nhex, "decoding ugrid model"
    );
    debug!(
        surface = npatch,
        volume = ntet + npyr + npris + nhex,
        "derived element totals"
    );

    let coords = cursor.read_floats("nodes", nnodes * 3, descriptor)?;
    let nodes: Vec<Point3<f64>> = coords
        .chunks_exact(3)
        .map(|c| Point3::new(c[0], c[1], c[2]))
        .collect();

    let tris = to_rows::<3>(cursor.read_i32s("triangles", ntri * 3, descriptor.endianness)?);
    let quads = to_rows::<4>(cursor.read_i32s("quads", nquad * 4, descriptor.endianness)?);
    let pids = cursor.read_i32s("patch ids", npatch, descriptor.endianness)?;

    let tets = to_rows::<4>(cursor.read_i32s("tetrahedra", ntet * 4, descriptor.endianness)?);
    let pyramids = to_rows::<5>(cursor.read_i32s("pyramids", npyr * 5, descriptor.endianness)?);
    let prisms = to_rows::<6>(cursor.read_i32s("prisms", npris * 6, descriptor.endianness)?);
    let hexas = to_rows::<8>(cursor.read_i32s("hexahedra", nhex * 8, descriptor.endianness)?);

    let mesh = VolumeMesh {
        nodes,
        tris,
        quads,
        pids,
        tets,
        pyramids,
        prisms,
        hexas,
    };
    Ok((mesh, cursor.offset))
}

/// Encode one UGRID model.
///
/// Fails with [`UgridError::InvalidMesh`] before writing any byte when
/// the mesh lacks either its surface skin or its volume elements, or
/// when `pids` does not cover every surface element; the format assumes
/// a complete solid model.
pub fn encode_to<W: Write>(
    mesh: &VolumeMesh,
    writer: W,
    descriptor: FormatDescriptor,
) -> Result<()> {
    if mesh.num_surface_elements() == 0 {
        return Err(UgridError::InvalidMesh(
            "no surface elements; a ugrid model requires a boundary skin".to_string(),
        ));
    }
    if mesh.num_volume_elements() == 0 {
        return Err(UgridError::InvalidMesh(
            "no volume elements; a ugrid model requires a solid interior".to_string(),
        ));
    }
    if mesh.pids.len() != mesh.num_surface_elements() {
        return Err(UgridError::InvalidMesh(format!(
            "{} patch ids for {} surface elements",
            mesh.pids.len(),
            mesh.num_surface_elements()
        )));
    }

    let mut sink = BlockSink::new(writer);
    let endianness = descriptor.endianness;

    let header: Vec<i32> = [
        mesh.nodes.len(),
        mesh.tris.len(),
        mesh.quads.len(),
        mesh.tets.len(),
        mesh.pyramids.len(),
        mesh.prisms.len(),
        mesh.hexas.len(),
    ]
    .iter()
    .map(|&n| n as i32)
    .collect();
    sink.write_i32s(&header, endianness)?;

    let coords: Vec<f64> = mesh
        .nodes
        .iter()
        .flat_map(|p| [p.x, p.y, p.z])
        .collect();
    sink.write_floats(&coords, descriptor)?;

    sink.write_i32s(flatten(&mesh.tris).as_slice(), endianness)?;
    sink.write_i32s(flatten(&mesh.quads).as_slice(), endianness)?;
    sink.write_i32s(&mesh.pids, endianness)?;
    sink.write_i32s(flatten(&mesh.tets).as_slice(), endianness)?;
    sink.write_i32s(flatten(&mesh.pyramids).as_slice(), endianness)?;
    sink.write_i32s(flatten(&mesh.prisms).as_slice(), endianness)?;
    sink.write_i32s(flatten(&mesh.hexas).as_slice(), endianness)?;

    debug!(bytes = sink.offset, "encoded ugrid model");
    Ok(())
}

fn flatten<const N: usize>(rows: &[[i32; N]]) -> Vec<i32> {
    rows.iter().flatten().copied().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    const B8: FormatDescriptor = FormatDescriptor {
        width: FloatWidth::F64,
        endianness: Endianness::Big,
    };
    const LB4: FormatDescriptor = FormatDescriptor {
        width: FloatWidth::F32,
        endianness: Endianness::Little,
    };

    /// A unit tet with its four skin triangles. Coordinates are exact
    /// in f32 so narrow/widen round-trips stay bit-identical.
    fn tet_mesh() -> VolumeMesh {
        VolumeMesh {
            nodes: vec![
                Point3::new(0.0, 0.0, 0.0),
                Point3::new(1.0, 0.0, 0.0),
                Point3::new(0.0, 1.0, 0.0),
                Point3::new(0.0, 0.0, 1.0),
            ],
            tris: vec![[1, 3, 2], [1, 2, 4], [2, 3, 4], [3, 1, 4]],
            quads: vec![],
            pids: vec![1, 2, 2, 3],
            tets: vec![[1, 2, 3, 4]],
            pyramids: vec![],
            prisms: vec![],
            hexas: vec![],
        }
    }

    fn encode_vec(mesh: &VolumeMesh, descriptor: FormatDescriptor) -> Vec<u8> {
        let mut buf = Vec::new();
        encode_to(mesh, &mut buf, descriptor).unwrap();
        buf
    }

    #[test]
    fn test_roundtrip_big_endian_double() {
        let mesh = tet_mesh();
        let buf = encode_vec(&mesh, B8);

        let decoded = decode_from(Cursor::new(&buf), B8, buf.len() as u64).unwrap();
        assert_eq!(decoded, mesh);

        // Re-encode is byte-identical.
        let buf2 = encode_vec(&decoded, B8);
        assert_eq!(buf, buf2);
    }

    #[test]
    fn test_roundtrip_little_endian_single() {
        let mesh = tet_mesh();
        let buf = encode_vec(&mesh, LB4);

        let decoded = decode_from(Cursor::new(&buf), LB4, buf.len() as u64).unwrap();
        assert_eq!(decoded, mesh);
        assert_eq!(encode_vec(&decoded, LB4), buf);
    }

    #[test]
    fn test_cross_format_conversion() {
        let mesh = tet_mesh();
        let big = encode_vec(&mesh, B8);
        let decoded = decode_from(Cursor::new(&big), B8, big.len() as u64).unwrap();

        let little = encode_vec(&decoded, LB4);
        let again = decode_from(Cursor::new(&little), LB4, little.len() as u64).unwrap();
        assert_eq!(again.tets, mesh.tets);
        assert_eq!(again.pids, mesh.pids);
        assert_eq!(again.nodes, mesh.nodes);
    }

    #[test]
    fn test_expected_byte_layout() {
        let mesh = tet_mesh();
        let buf = encode_vec(&mesh, B8);
        // header 7*4 + nodes 4*3*8 + tris 4*3*4 + pids 4*4 + tets 1*4*4
        assert_eq!(buf.len(), 28 + 96 + 48 + 16 + 16);
        // First header word is nnodes = 4, big-endian.
        assert_eq!(&buf[0..4], &[0, 0, 0, 4]);
    }

    #[test]
    fn test_truncated_block_names_block() {
        let mesh = tet_mesh();
        let mut buf = encode_vec(&mesh, B8);
        buf.truncate(28 + 40); // mid-node block

        let err = decode(Cursor::new(&buf), B8).unwrap_err();
        match err {
            UgridError::TruncatedData {
                block,
                expected,
                got,
            } => {
                assert_eq!(block, "nodes");
                assert_eq!(expected, 96);
                assert_eq!(got, 40);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_trailing_bytes_are_format_error() {
        let mesh = tet_mesh();
        let mut buf = encode_vec(&mesh, B8);
        buf.push(0);

        let err = decode_from(Cursor::new(&buf), B8, buf.len() as u64).unwrap_err();
        assert!(matches!(err, UgridError::Format(_)));
    }

    #[test]
    fn test_wrong_endianness_guess() {
        // A big-endian header whose nnodes (128) turns negative when
        // read with swapped bytes.
        let mut buf = Vec::new();
        for count in [128i32, 4, 0, 1, 0, 0, 0] {
            buf.extend_from_slice(&count.to_be_bytes());
        }

        let wrong = FormatDescriptor {
            width: FloatWidth::F64,
            endianness: Endianness::Little,
        };
        let err = decode(Cursor::new(&buf), wrong).unwrap_err();
        assert!(matches!(err, UgridError::Format(_)));
    }

    #[test]
    fn test_wrong_width_guess() {
        // A valid b8 model decoded as b4 halves the node block, so the
        // byte accounting comes up short of the source length.
        let mesh = tet_mesh();
        let buf = encode_vec(&mesh, B8);

        let wrong = FormatDescriptor {
            width: FloatWidth::F32,
            endianness: Endianness::Big,
        };
        let err = decode_from(Cursor::new(&buf), wrong, buf.len() as u64).unwrap_err();
        assert!(matches!(err, UgridError::Format(_)));
    }

    #[test]
    fn test_encode_rejects_surface_only() {
        let mut mesh = tet_mesh();
        mesh.tets.clear();

        let mut buf = Vec::new();
        let err = encode_to(&mesh, &mut buf, B8).unwrap_err();
        assert!(matches!(err, UgridError::InvalidMesh(_)));
        assert!(buf.is_empty());
    }

    #[test]
    fn test_encode_rejects_volume_only() {
        let mut mesh = tet_mesh();
        mesh.tris.clear();
        mesh.pids.clear();

        assert!(matches!(
            encode_to(&mesh, &mut Vec::new(), B8),
            Err(UgridError::InvalidMesh(_))
        ));
    }

    #[test]
    fn test_encode_rejects_short_pids() {
        let mut mesh = tet_mesh();
        mesh.pids.pop();

        assert!(matches!(
            encode_to(&mesh, &mut Vec::new(), B8),
            Err(UgridError::InvalidMesh(_))
        ));
    }
}
