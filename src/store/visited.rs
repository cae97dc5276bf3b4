use std::collections::HashSet;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("could not persist visited set to {path}: {source}")]
    Unavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Durable record of which park ids the user has marked visited.
///
/// Backed by a single JSON file holding an array of id strings. Reads fail
/// soft: a missing, unreadable, or corrupt file degrades to the empty set so
/// the tool always starts. Writes happen synchronously inside `toggle` and
/// `reset` and report failures to the caller instead of panicking.
#[derive(Debug)]
pub struct VisitedStore {
    path: PathBuf,
    ids: HashSet<String>,
}

impl VisitedStore {
    /// Load the visited set from `path`. Never fails; corrupt payloads are
    /// warned about on stderr and treated as empty.
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let ids = match fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str::<Vec<String>>(&contents) {
                Ok(list) => list.into_iter().collect(),
                Err(e) => {
                    eprintln!(
                        "Warning: visited file {} is corrupt ({}), starting empty",
                        path.display(),
                        e
                    );
                    HashSet::new()
                }
            },
            // Missing file is the first-run case, not an error.
            Err(_) => HashSet::new(),
        };
        Self { path, ids }
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Membership snapshot for nearest-unvisited queries.
    pub fn ids(&self) -> &HashSet<String> {
        &self.ids
    }

    /// Flip membership of `id` and persist before returning. Returns the new
    /// membership state (`true` = now visited). Ids are matched exactly.
    pub fn toggle(&mut self, id: &str) -> Result<bool, StoreError> {
        let now_visited = if self.ids.remove(id) {
            false
        } else {
            self.ids.insert(id.to_string());
            true
        };
        self.persist()?;
        Ok(now_visited)
    }

    /// Clear the set and persist the empty state.
    pub fn reset(&mut self) -> Result<(), StoreError> {
        self.ids.clear();
        self.persist()
    }

    fn persist(&self) -> Result<(), StoreError> {
        self.write_to(&self.path).map_err(|source| StoreError::Unavailable {
            path: self.path.clone(),
            source,
        })
    }

    fn write_to(&self, path: &Path) -> std::io::Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        // Write to a sibling temp file and rename so a failed write can't
        // leave a truncated visited file behind.
        let tmp = path.with_extension("json.tmp");
        {
            let file = File::create(&tmp)?;
            let mut writer = BufWriter::new(file);
            let mut ids: Vec<&String> = self.ids.iter().collect();
            ids.sort();
            serde_json::to_writer(&mut writer, &ids)?;
            writer.flush()?;
        }
        fs::rename(&tmp, path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_missing_file_loads_empty() {
        let dir = tempdir().unwrap();
        let store = VisitedStore::load(dir.path().join("visited.json"));
        assert!(store.is_empty());
    }

    #[test]
    fn test_corrupt_file_loads_empty() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("visited.json");
        fs::write(&path, "{not json at all").unwrap();

        let store = VisitedStore::load(&path);
        assert!(store.is_empty());
    }

    #[test]
    fn test_toggle_persists_and_round_trips() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("visited.json");

        let mut store = VisitedStore::load(&path);
        assert!(store.toggle("acad").unwrap());
        assert!(store.contains("acad"));

        // A fresh load sees the persisted membership.
        let reloaded = VisitedStore::load(&path);
        assert!(reloaded.contains("acad"));
        assert_eq!(reloaded.len(), 1);
    }

    #[test]
    fn test_double_toggle_restores_state() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("visited.json");

        let mut store = VisitedStore::load(&path);
        assert!(store.toggle("grca").unwrap());
        assert!(!store.toggle("grca").unwrap());
        assert!(!store.contains("grca"));

        let reloaded = VisitedStore::load(&path);
        assert!(!reloaded.contains("grca"));
    }

    #[test]
    fn test_reset_clears_everything() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("visited.json");

        let mut store = VisitedStore::load(&path);
        store.toggle("acad").unwrap();
        store.toggle("grca").unwrap();
        store.toggle("yell").unwrap();
        assert_eq!(store.len(), 3);

        store.reset().unwrap();
        assert!(store.is_empty());

        let reloaded = VisitedStore::load(&path);
        assert!(reloaded.is_empty());
    }

    #[test]
    fn test_creates_parent_directories() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("deeper").join("visited.json");

        let mut store = VisitedStore::load(&path);
        store.toggle("acad").unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_ids_are_exact_strings() {
        let dir = tempdir().unwrap();
        let mut store = VisitedStore::load(dir.path().join("visited.json"));
        store.toggle("acad").unwrap();
        assert!(!store.contains("ACAD"));
        assert!(!store.contains(" acad"));
    }

    #[test]
    fn test_file_is_a_json_string_array() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("visited.json");

        let mut store = VisitedStore::load(&path);
        store.toggle("grca").unwrap();
        store.toggle("acad").unwrap();

        let contents = fs::read_to_string(&path).unwrap();
        let list: Vec<String> = serde_json::from_str(&contents).unwrap();
        assert_eq!(list, vec!["acad".to_string(), "grca".to_string()]);
    }
}
