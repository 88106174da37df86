//! Binary graph images.
//!
//! Layout:
//! - magic: `GWALK001`
//! - version: u32
//! - chunks until end of input, each `tag: [u8;4]`, `len: u32`, then `len`
//!   bytes holding `uncompressed_len: u32` followed by an LZ4 block.
//!
//! Chunks: `NODE` (names and positions in id order) and `EDGE` (directed arcs
//! referencing node positions within the `NODE` chunk). Unknown chunks are
//! skipped so newer writers stay readable.

use std::io::{self, Read, Write};

use tracing::{debug, warn};

use crate::graph::{Graph, GraphError, NodeId};
use crate::point::Point;

pub const MAGIC: &[u8; 8] = b"GWALK001";
pub const VERSION_V1: u32 = 1;
pub const VERSION_CURRENT: u32 = VERSION_V1;

pub const TAG_NODE: [u8; 4] = *b"NODE";
pub const TAG_EDGE: [u8; 4] = *b"EDGE";

/// Refuse to allocate more than this for a single decompressed chunk.
const MAX_CHUNK_BYTES: usize = 64 * 1024 * 1024;

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("i/o error: {0}")]
    Io(#[from] io::Error),
    #[error("not a graph image (bad magic)")]
    BadMagic,
    #[error("unsupported graph image version {0}")]
    UnsupportedVersion(u32),
    #[error("corrupt graph image: {0}")]
    Corrupt(String),
    #[error(transparent)]
    Graph(#[from] GraphError),
    #[cfg(feature = "serde")]
    #[error("invalid graph document: {0}")]
    Json(#[from] serde_json::Error),
}

pub fn compress_lz4(input: &[u8]) -> Vec<u8> {
    lz4_flex::compress(input)
}

pub fn decompress_lz4(input: &[u8], expected_size: usize) -> io::Result<Vec<u8>> {
    lz4_flex::decompress(input, expected_size)
        .map_err(|_| io::Error::new(io::ErrorKind::InvalidData, "lz4 decompression failed"))
}

pub fn write_u32_le<W: Write>(w: &mut W, v: u32) -> io::Result<()> {
    w.write_all(&v.to_le_bytes())
}

pub fn write_f64_le<W: Write>(w: &mut W, v: f64) -> io::Result<()> {
    w.write_all(&v.to_le_bytes())
}

pub fn write_string<W: Write>(w: &mut W, s: &str) -> io::Result<()> {
    let len = u32::try_from(s.len())
        .map_err(|_| io::Error::new(io::ErrorKind::InvalidInput, "string too long"))?;
    write_u32_le(w, len)?;
    w.write_all(s.as_bytes())
}

pub fn read_exact<const N: usize, R: Read>(r: &mut R) -> io::Result<[u8; N]> {
    let mut buf = [0u8; N];
    r.read_exact(&mut buf)?;
    Ok(buf)
}

pub fn read_u32_le<R: Read>(r: &mut R) -> io::Result<u32> {
    Ok(u32::from_le_bytes(read_exact::<4, _>(r)?))
}

pub fn read_f64_le<R: Read>(r: &mut R) -> io::Result<f64> {
    Ok(f64::from_le_bytes(read_exact::<8, _>(r)?))
}

pub fn read_string<R: Read>(r: &mut R) -> io::Result<String> {
    let n = read_u32_le(r)? as usize;
    let mut buf = Vec::new();
    r.take(n as u64).read_to_end(&mut buf)?;
    if buf.len() != n {
        return Err(io::Error::new(
            io::ErrorKind::UnexpectedEof,
            "string shorter than its length prefix",
        ));
    }
    String::from_utf8(buf)
        .map_err(|_| io::Error::new(io::ErrorKind::InvalidData, "invalid utf-8 string"))
}

/// Write a chunk whose payload is LZ4-compressed and preceded by the
/// uncompressed length.
pub fn write_chunk_lz4<W: Write>(w: &mut W, tag: [u8; 4], payload: &[u8]) -> io::Result<()> {
    let compressed = compress_lz4(payload);
    let uncompressed_len = u32::try_from(payload.len())
        .map_err(|_| io::Error::new(io::ErrorKind::InvalidData, "chunk too large"))?;
    let total_len = 4u32.saturating_add(
        u32::try_from(compressed.len())
            .map_err(|_| io::Error::new(io::ErrorKind::InvalidData, "chunk too large"))?,
    );

    w.write_all(&tag)?;
    write_u32_le(w, total_len)?;
    write_u32_le(w, uncompressed_len)?;
    w.write_all(&compressed)
}

pub fn read_chunk_header<R: Read>(r: &mut R) -> io::Result<([u8; 4], u32)> {
    let tag = read_exact::<4, _>(r)?;
    let len = read_u32_le(r)?;
    Ok((tag, len))
}

fn read_chunk_payload(body: &[u8]) -> Result<Vec<u8>, StorageError> {
    let mut r = body;
    let expected = read_u32_le(&mut r)? as usize;
    if expected > MAX_CHUNK_BYTES {
        return Err(StorageError::Corrupt(format!(
            "chunk claims {expected} uncompressed bytes"
        )));
    }
    Ok(decompress_lz4(r, expected)?)
}

impl Graph {
    pub fn save_image<W: Write>(&self, w: &mut W) -> Result<(), StorageError> {
        w.write_all(MAGIC)?;
        write_u32_le(w, VERSION_CURRENT)?;

        // Positions in the NODE chunk, indexed by node id.
        let slots = self.nodes().map(|n| n.id().index() + 1).max().unwrap_or(0);
        let mut position = vec![u32::MAX; slots];

        let mut nodes = Vec::new();
        write_u32_le(&mut nodes, self.len() as u32)?;
        for (i, node) in self.nodes().enumerate() {
            position[node.id().index()] = i as u32;
            write_string(&mut nodes, node.name())?;
            write_f64_le(&mut nodes, node.point().row())?;
            write_f64_le(&mut nodes, node.point().col())?;
        }
        write_chunk_lz4(w, TAG_NODE, &nodes)?;

        let arcs: Vec<_> = self.arcs().collect();
        let mut edges = Vec::new();
        write_u32_le(&mut edges, arcs.len() as u32)?;
        for (from, to, weight) in arcs {
            write_u32_le(&mut edges, position[from.index()])?;
            write_u32_le(&mut edges, position[to.index()])?;
            write_f64_le(&mut edges, weight)?;
        }
        write_chunk_lz4(w, TAG_EDGE, &edges)?;

        debug!(nodes = self.len(), "graph image written");
        Ok(())
    }

    pub fn save_image_bytes(&self) -> Result<Vec<u8>, StorageError> {
        let mut out = Vec::new();
        self.save_image(&mut out)?;
        Ok(out)
    }

    pub fn load_image<R: Read>(r: &mut R) -> Result<Self, StorageError> {
        let magic = read_exact::<8, _>(r).map_err(|_| StorageError::BadMagic)?;
        if &magic != MAGIC {
            return Err(StorageError::BadMagic);
        }
        let version = read_u32_le(r)?;
        if version != VERSION_V1 {
            return Err(StorageError::UnsupportedVersion(version));
        }

        let mut rest = Vec::new();
        r.read_to_end(&mut rest)?;
        let mut cursor: &[u8] = &rest;

        let mut graph = Graph::new();
        let mut ids: Vec<NodeId> = Vec::new();
        let mut seen_nodes = false;
        let mut seen_edges = false;

        while !cursor.is_empty() {
            let (tag, len) = read_chunk_header(&mut cursor)?;
            let len = len as usize;
            if len > cursor.len() {
                return Err(StorageError::Corrupt(format!(
                    "chunk {} truncated",
                    String::from_utf8_lossy(&tag)
                )));
            }
            let (body, tail) = cursor.split_at(len);
            cursor = tail;

            match tag {
                TAG_NODE => {
                    let payload = read_chunk_payload(body)?;
                    let mut p: &[u8] = &payload;
                    let count = read_u32_le(&mut p)?;
                    for _ in 0..count {
                        let name = read_string(&mut p)?;
                        let row = read_f64_le(&mut p)?;
                        let col = read_f64_le(&mut p)?;
                        ids.push(graph.add_node(&name, Point::new(row, col))?);
                    }
                    seen_nodes = true;
                }
                TAG_EDGE => {
                    if !seen_nodes {
                        return Err(StorageError::Corrupt("EDGE chunk before NODE".into()));
                    }
                    let payload = read_chunk_payload(body)?;
                    let mut p: &[u8] = &payload;
                    let count = read_u32_le(&mut p)?;
                    for _ in 0..count {
                        let from = read_u32_le(&mut p)? as usize;
                        let to = read_u32_le(&mut p)? as usize;
                        let weight = read_f64_le(&mut p)?;
                        let (Some(&from), Some(&to)) = (ids.get(from), ids.get(to)) else {
                            return Err(StorageError::Corrupt(format!(
                                "edge references missing node ({from} -> {to})"
                            )));
                        };
                        if !weight.is_finite() || weight < 0.0 {
                            return Err(StorageError::Corrupt(format!(
                                "edge weight {weight} is not a distance"
                            )));
                        }
                        graph.link(from, to, weight);
                    }
                    seen_edges = true;
                }
                other => {
                    warn!(
                        tag = %String::from_utf8_lossy(&other),
                        len,
                        "skipping unknown graph image chunk"
                    );
                }
            }
        }

        if !seen_nodes {
            return Err(StorageError::Corrupt("missing NODE chunk".into()));
        }
        if !seen_edges {
            return Err(StorageError::Corrupt("missing EDGE chunk".into()));
        }
        debug!(nodes = graph.len(), "graph image loaded");
        Ok(graph)
    }

    pub fn load_image_bytes(bytes: &[u8]) -> Result<Self, StorageError> {
        let mut r = bytes;
        Self::load_image(&mut r)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cities::us_cities;

    fn same_graph(a: &Graph, b: &Graph) {
        assert_eq!(a.len(), b.len());
        for node in a.nodes() {
            let other = b.node_by_name(node.name()).unwrap();
            assert_eq!(node.point(), other.point());
            assert_eq!(node.degree(), other.degree());
            for (&to, &w) in node.edges() {
                let to_name = a.name_of(to).unwrap();
                let to_b = b.id_of(to_name).unwrap();
                assert_eq!(other.edges()[&to_b], w);
            }
        }
    }

    #[test]
    fn city_map_survives_an_image() {
        let g = us_cities();
        let bytes = g.save_image_bytes().unwrap();
        assert_eq!(&bytes[..8], MAGIC);
        let back = Graph::load_image_bytes(&bytes).unwrap();
        same_graph(&g, &back);
    }

    #[test]
    fn sparse_ids_and_one_way_edges_survive_an_image() {
        let mut g = us_cities();
        g.remove_node("Chicago, IL");
        g.add_directed_edge("Miami, FL", "Seattle, WA").unwrap();
        let back = Graph::load_image_bytes(&g.save_image_bytes().unwrap()).unwrap();
        same_graph(&g, &back);
        let seattle = back.id_of("Seattle, WA").unwrap();
        let miami = back.id_of("Miami, FL").unwrap();
        assert!(back.node(miami).unwrap().edges().contains_key(&seattle));
        assert!(!back.node(seattle).unwrap().edges().contains_key(&miami));
    }

    #[test]
    fn rejects_bad_magic_and_versions() {
        assert!(matches!(
            Graph::load_image_bytes(b"NOTAGRAPH"),
            Err(StorageError::BadMagic)
        ));
        assert!(matches!(
            Graph::load_image_bytes(b"GW"),
            Err(StorageError::BadMagic)
        ));

        let mut bytes = us_cities().save_image_bytes().unwrap();
        bytes[8..12].copy_from_slice(&7u32.to_le_bytes());
        assert!(matches!(
            Graph::load_image_bytes(&bytes),
            Err(StorageError::UnsupportedVersion(7))
        ));
    }

    #[test]
    fn truncated_images_are_errors_not_panics() {
        let bytes = us_cities().save_image_bytes().unwrap();
        for cut in [12, 15, 20, bytes.len() / 2, bytes.len() - 1] {
            assert!(Graph::load_image_bytes(&bytes[..cut]).is_err(), "cut at {cut}");
        }
    }

    #[test]
    fn unknown_chunks_are_skipped() {
        let g = us_cities();
        let mut bytes = g.save_image_bytes().unwrap();
        write_chunk_lz4(&mut bytes, *b"XTRA", b"future data").unwrap();
        let back = Graph::load_image_bytes(&bytes).unwrap();
        same_graph(&g, &back);
    }

    fn image(chunks: &[([u8; 4], Vec<u8>)]) -> Vec<u8> {
        let mut out = MAGIC.to_vec();
        write_u32_le(&mut out, VERSION_CURRENT).unwrap();
        for (tag, payload) in chunks {
            write_chunk_lz4(&mut out, *tag, payload).unwrap();
        }
        out
    }

    fn node_payload(names: &[&str]) -> Vec<u8> {
        let mut p = Vec::new();
        write_u32_le(&mut p, names.len() as u32).unwrap();
        for (i, name) in names.iter().enumerate() {
            write_string(&mut p, name).unwrap();
            write_f64_le(&mut p, i as f64).unwrap();
            write_f64_le(&mut p, 0.0).unwrap();
        }
        p
    }

    fn edge_payload(arcs: &[(u32, u32, f64)]) -> Vec<u8> {
        let mut p = Vec::new();
        write_u32_le(&mut p, arcs.len() as u32).unwrap();
        for &(from, to, weight) in arcs {
            write_u32_le(&mut p, from).unwrap();
            write_u32_le(&mut p, to).unwrap();
            write_f64_le(&mut p, weight).unwrap();
        }
        p
    }

    fn corrupt(bytes: &[u8]) -> String {
        match Graph::load_image_bytes(bytes) {
            Err(StorageError::Corrupt(msg)) => msg,
            other => panic!("expected a corrupt image, got {other:?}"),
        }
    }

    #[test]
    fn hand_built_image_loads() {
        let bytes = image(&[
            (TAG_NODE, node_payload(&["a", "b"])),
            (TAG_EDGE, edge_payload(&[(0, 1, 2.5)])),
        ]);
        let g = Graph::load_image_bytes(&bytes).unwrap();
        let b = g.id_of("b").unwrap();
        assert_eq!(g.node_by_name("a").unwrap().edges()[&b], 2.5);
    }

    #[test]
    fn edges_before_nodes_are_corrupt() {
        let bytes = image(&[
            (TAG_EDGE, edge_payload(&[])),
            (TAG_NODE, node_payload(&["a"])),
        ]);
        assert!(corrupt(&bytes).contains("before NODE"));
    }

    #[test]
    fn missing_chunks_are_corrupt() {
        assert!(corrupt(&image(&[])).contains("missing NODE"));
        assert!(corrupt(&image(&[(*b"XTRA", vec![1, 2, 3])])).contains("missing NODE"));
        assert!(corrupt(&image(&[(TAG_NODE, node_payload(&["a"]))])).contains("missing EDGE"));
    }

    #[test]
    fn edge_to_unknown_position_is_corrupt() {
        let bytes = image(&[
            (TAG_NODE, node_payload(&["a"])),
            (TAG_EDGE, edge_payload(&[(0, 5, 1.0)])),
        ]);
        assert!(corrupt(&bytes).contains("missing node"));
    }

    #[test]
    fn stored_weight_must_be_a_distance() {
        for weight in [-1.0, f64::NAN, f64::INFINITY] {
            let bytes = image(&[
                (TAG_NODE, node_payload(&["a", "b"])),
                (TAG_EDGE, edge_payload(&[(0, 1, weight)])),
            ]);
            assert!(corrupt(&bytes).contains("not a distance"), "weight {weight}");
        }
    }

    #[test]
    fn scrambled_lz4_block_is_an_error() {
        let mut bytes = image(&[
            (TAG_NODE, node_payload(&["a", "b"])),
            (TAG_EDGE, edge_payload(&[])),
        ]);
        // Magic, version, NODE header and the uncompressed length precede the block.
        let start = 8 + 4 + 8 + 4;
        let total = u32::from_le_bytes(bytes[16..20].try_into().unwrap()) as usize;
        let len = bytes.len();
        bytes[start..start + total - 4].fill(0xFF);
        assert_eq!(bytes.len(), len);
        assert!(matches!(
            Graph::load_image_bytes(&bytes),
            Err(StorageError::Io(_))
        ));
    }

    #[test]
    fn oversized_length_claim_is_corrupt() {
        let mut bytes = MAGIC.to_vec();
        write_u32_le(&mut bytes, VERSION_CURRENT).unwrap();
        bytes.extend_from_slice(&TAG_NODE);
        write_u32_le(&mut bytes, 8).unwrap();
        write_u32_le(&mut bytes, MAX_CHUNK_BYTES as u32 + 1).unwrap();
        bytes.extend_from_slice(&[0; 4]);
        assert!(corrupt(&bytes).contains("uncompressed bytes"));
    }

    #[test]
    fn strings_round_trip_through_helpers() {
        let mut buf = Vec::new();
        write_string(&mut buf, "Las Vegas, NV").unwrap();
        let mut r: &[u8] = &buf;
        assert_eq!(read_string(&mut r).unwrap(), "Las Vegas, NV");
        assert!(r.is_empty());
    }
}
