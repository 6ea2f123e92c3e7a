//! Uploaded meshes, each backed by a temporary file that is removed when the
//! entry is dropped.

use super::ViewerError;
use crate::io::MeshStats;
use serde::Serialize;
use std::collections::VecDeque;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;
use uuid::Uuid;

#[derive(Debug)]
pub struct StoredMesh {
    pub name: String,
    pub stats: MeshStats,
    file: NamedTempFile,
}

impl StoredMesh {
    /// Check that `bytes` are STL, then spill them to a temporary file.
    pub fn from_bytes(name: String, bytes: &[u8]) -> Result<Self, ViewerError> {
        let stats = MeshStats::from_stl(bytes)?;
        let mut file = tempfile::Builder::new()
            .prefix("insertcsg-")
            .suffix(".stl")
            .tempfile()?;
        file.write_all(bytes)?;
        file.flush()?;
        Ok(Self { name, stats, file })
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }

    pub fn summary(&self, id: Uuid) -> MeshSummary {
        MeshSummary {
            id,
            name: self.name.clone(),
            stats: self.stats.clone(),
        }
    }
}

/// What clients learn about an upload.
#[derive(Debug, Clone, Serialize)]
pub struct MeshSummary {
    pub id: Uuid,
    pub name: String,
    pub stats: MeshStats,
}

/// Bounded upload store; the oldest entry is evicted first.
#[derive(Debug)]
pub struct UploadStore {
    entries: VecDeque<(Uuid, StoredMesh)>,
    capacity: usize,
}

impl UploadStore {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: VecDeque::new(),
            capacity: capacity.max(1),
        }
    }

    /// Store `mesh` under a fresh id, evicting the oldest uploads past capacity.
    pub fn insert(&mut self, mesh: StoredMesh) -> Uuid {
        let id = Uuid::new_v4();
        while self.entries.len() >= self.capacity {
            if let Some((evicted, _)) = self.entries.pop_front() {
                tracing::info!(%evicted, "evicted oldest upload");
            }
        }
        self.entries.push_back((id, mesh));
        id
    }

    pub fn get(&self, id: &Uuid) -> Option<&StoredMesh> {
        self.entries.iter().find(|(k, _)| k == id).map(|(_, m)| m)
    }

    pub fn remove(&mut self, id: &Uuid) -> Option<StoredMesh> {
        let index = self.entries.iter().position(|(k, _)| k == id)?;
        self.entries.remove(index).map(|(_, m)| m)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop every upload, deleting the temporary files.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::Mesh;

    fn cube_upload() -> StoredMesh {
        let stl = Mesh::cuboid(1.0, 1.0, 1.0)
            .expect("valid cube")
            .to_stl_binary("cube")
            .expect("serializes");
        StoredMesh::from_bytes("cube.stl".to_owned(), &stl).expect("valid STL")
    }

    #[test]
    fn oldest_upload_is_evicted_and_its_file_removed() {
        let mut store = UploadStore::new(2);
        let first = store.insert(cube_upload());
        let first_path = store.get(&first).expect("stored").path().to_path_buf();
        assert!(first_path.exists());

        let second = store.insert(cube_upload());
        let third = store.insert(cube_upload());

        assert_eq!(store.len(), 2);
        assert!(store.get(&first).is_none());
        assert!(!first_path.exists());
        assert!(store.get(&second).is_some());
        assert!(store.get(&third).is_some());
    }

    #[test]
    fn removing_deletes_the_file() {
        let mut store = UploadStore::new(4);
        let id = store.insert(cube_upload());
        let path = store.get(&id).expect("stored").path().to_path_buf();
        let removed = store.remove(&id).expect("present");
        drop(removed);
        assert!(!path.exists());
        assert!(store.is_empty());
    }

    #[test]
    fn rejects_non_stl_bytes() {
        assert!(matches!(
            StoredMesh::from_bytes("junk.stl".to_owned(), b"definitely not a mesh"),
            Err(ViewerError::InvalidStl(_))
        ));
    }
}
