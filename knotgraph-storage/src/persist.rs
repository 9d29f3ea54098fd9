//! Versioned snapshot files.
//!
//! Layout:
//!
//! ```text
//! u32 LE  version length
//! bytes   version tag (UTF-8)
//! u32 LE  CRC-32 of body
//! bytes   body (bincode GraphBody)
//! ```

use crate::store::{GraphData, MemStore};
use crate::{Error, FORMAT_VERSION, Result};
use knotgraph_api::{Edge, EdgeKey, Node, NodeId, Verb, VerbRegistry};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::io::{self, Write};
use std::path::Path;
use tempfile::NamedTempFile;

#[derive(Debug, Default, Serialize, Deserialize)]
struct GraphBody {
    nodes: BTreeMap<NodeId, Node>,
    edges: BTreeMap<EdgeKey, Edge>,
    verbs: Option<BTreeMap<String, Verb>>,
}

fn encode(body: &GraphBody) -> Result<Vec<u8>> {
    let payload = bincode::serialize(body)?;
    let version = FORMAT_VERSION.as_bytes();

    let mut out = Vec::with_capacity(8 + version.len() + payload.len());
    out.extend_from_slice(&(version.len() as u32).to_le_bytes());
    out.extend_from_slice(version);
    out.extend_from_slice(&crc32fast::hash(&payload).to_le_bytes());
    out.extend_from_slice(&payload);
    Ok(out)
}

fn read_u32(bytes: &[u8], at: usize) -> Option<u32> {
    let end = at.checked_add(4)?;
    let chunk = bytes.get(at..end)?;
    Some(u32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]))
}

fn decode(bytes: &[u8]) -> Result<GraphBody> {
    let version_len =
        read_u32(bytes, 0).ok_or(Error::Corrupted("missing version header"))? as usize;
    let version_end = 4usize
        .checked_add(version_len)
        .ok_or(Error::Corrupted("version length overflow"))?;
    let version = bytes
        .get(4..version_end)
        .ok_or(Error::Corrupted("truncated version tag"))?;
    if version != FORMAT_VERSION.as_bytes() {
        return Err(Error::VersionMismatch {
            found: String::from_utf8_lossy(version).into_owned(),
            expected: FORMAT_VERSION.to_string(),
        });
    }

    let checksum = read_u32(bytes, version_end).ok_or(Error::Corrupted("missing checksum"))?;
    let payload = &bytes[version_end + 4..];
    if crc32fast::hash(payload) != checksum {
        return Err(Error::ChecksumMismatch);
    }

    Ok(bincode::deserialize(payload)?)
}

impl MemStore {
    /// Writes a snapshot of the graph, and of `verbs` when given, to `path`.
    ///
    /// The file is written to a uniquely named temp file next to `path` and
    /// renamed into place, so an interrupted save leaves any previous
    /// snapshot intact and concurrent saves never share a temp file. The
    /// temp file is removed if the save fails.
    pub fn save(&self, path: impl AsRef<Path>, verbs: Option<&VerbRegistry>) -> Result<()> {
        let path = path.as_ref();
        let body = {
            let data = self.data.read();
            GraphBody {
                nodes: data.nodes.clone(),
                edges: data.edges.clone(),
                verbs: verbs.map(VerbRegistry::all),
            }
        };
        let bytes = encode(&body)?;

        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        fs::create_dir_all(dir)?;
        let mut tmp = NamedTempFile::new_in(dir)?;
        tmp.write_all(&bytes)?;
        tmp.as_file().sync_all()?;
        tmp.persist(path).map_err(io::Error::from)?;

        tracing::info!(
            path = %path.display(),
            nodes = body.nodes.len(),
            edges = body.edges.len(),
            verbs = body.verbs.as_ref().map_or(0, BTreeMap::len),
            bytes = bytes.len(),
            "snapshot saved"
        );
        Ok(())
    }

    /// Replaces the graph with the snapshot stored at `path`.
    ///
    /// The file is decoded in full before anything changes. On error the
    /// store and `verbs` are left as they were. Verbs in the file replace
    /// the contents of `verbs` when both are present.
    pub fn load(&self, path: impl AsRef<Path>, verbs: Option<&VerbRegistry>) -> Result<()> {
        let path = path.as_ref();
        let bytes = fs::read(path)?;
        let body = decode(&bytes).inspect_err(|e| {
            if matches!(e, Error::VersionMismatch { .. } | Error::ChecksumMismatch) {
                tracing::warn!(path = %path.display(), error = %e, "snapshot rejected");
            }
        })?;

        let GraphBody {
            nodes,
            edges,
            verbs: saved_verbs,
        } = body;
        let data = GraphData::from_parts(nodes, edges);
        let (node_count, edge_count) = (data.nodes.len(), data.edges.len());
        *self.data.write() = data;

        let mut verb_count = 0;
        if let (Some(registry), Some(saved)) = (verbs, saved_verbs) {
            verb_count = saved.len();
            registry.replace_all(saved);
        }

        tracing::info!(
            path = %path.display(),
            nodes = node_count,
            edges = edge_count,
            verbs = verb_count,
            "snapshot loaded"
        );
        Ok(())
    }
}
