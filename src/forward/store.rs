//! Persistence of the forwarded-identifier set.
//!
//! The set is stored as a JSON array of strings, sorted before every write
//! so diffs stay stable. It is loaded once at the start of a run and written
//! back once at the end; a crash mid-run loses that run's additions, which
//! makes forwarding at-least-once by design.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::Result;

/// Durable set of already-forwarded message identifiers.
#[derive(Debug)]
pub struct ForwardedSet {
    path: PathBuf,
    ids: HashSet<String>,
}

impl ForwardedSet {
    /// Load the set from a JSON file. A missing file yields an empty set.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let ids = if path.exists() {
            let content = fs::read_to_string(&path)?;
            serde_json::from_str::<Vec<String>>(&content)?
                .into_iter()
                .collect()
        } else {
            HashSet::new()
        };
        Ok(Self { path, ids })
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    /// Record an identifier in memory. Returns whether it was new.
    pub fn insert(&mut self, id: &str) -> bool {
        self.ids.insert(id.to_string())
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Write the set back, sorted.
    pub fn save(&self) -> Result<()> {
        let mut sorted: Vec<&String> = self.ids.iter().collect();
        sorted.sort();
        fs::write(&self.path, serde_json::to_string_pretty(&sorted)?)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_missing_file_loads_empty() {
        let dir = tempdir().unwrap();
        let set = ForwardedSet::load(dir.path().join("none.json")).unwrap();
        assert!(set.is_empty());
    }

    #[test]
    fn test_save_is_sorted_and_reloadable() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("forwarded.json");

        let mut set = ForwardedSet::load(&path).unwrap();
        assert!(set.insert("msg-b"));
        assert!(set.insert("msg-a"));
        assert!(!set.insert("msg-a"));
        set.save().unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let ids: Vec<String> = serde_json::from_str(&content).unwrap();
        assert_eq!(ids, vec!["msg-a", "msg-b"]);

        let reloaded = ForwardedSet::load(&path).unwrap();
        assert_eq!(reloaded.len(), 2);
        assert!(reloaded.contains("msg-a"));
    }
}
