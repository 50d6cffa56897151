//! Policy Artifact Store
//!
//! Filesystem persistence for serialized policies.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::info;

use super::PolicyArtifact;
use crate::error::Result;

/// Named storage holding one serialized policy per path
pub trait PolicyStore: Send + Sync {
    fn exists(&self, path: &Path) -> bool;
    fn load(&self, path: &Path) -> Result<PolicyArtifact>;
    fn save(&self, path: &Path, artifact: &PolicyArtifact) -> Result<()>;
}

/// Store writing artifacts to the local filesystem
#[derive(Debug, Default)]
pub struct FsPolicyStore;

impl PolicyStore for FsPolicyStore {
    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn load(&self, path: &Path) -> Result<PolicyArtifact> {
        Ok(PolicyArtifact(fs::read(path)?))
    }

    fn save(&self, path: &Path, artifact: &PolicyArtifact) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        // Write-then-rename: a crash mid-write never leaves a partial
        // artifact at the final path.
        let tmp = tmp_path(path);
        fs::write(&tmp, &artifact.0)?;
        fs::rename(&tmp, path)?;

        info!("Saved policy artifact to {:?}", path);
        Ok(())
    }
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env::temp_dir;

    #[test]
    fn test_save_load_round_trip() {
        let store = FsPolicyStore;
        let path = temp_dir().join("tradesim_store_test").join("policy.json");
        let artifact = PolicyArtifact(b"{\"buy_below\":1.0}".to_vec());

        store.save(&path, &artifact).unwrap();

        assert!(store.exists(&path));
        assert_eq!(store.load(&path).unwrap(), artifact);

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_missing_artifact_does_not_exist() {
        let store = FsPolicyStore;
        let path = temp_dir().join("tradesim_store_test_missing.json");

        assert!(!store.exists(&path));
        assert!(store.load(&path).is_err());
    }

    #[test]
    fn test_no_tmp_file_left_behind() {
        let store = FsPolicyStore;
        let path = temp_dir().join("tradesim_store_tmp_test.json");
        store.save(&path, &PolicyArtifact(vec![1, 2, 3])).unwrap();

        assert!(!tmp_path(&path).exists());

        fs::remove_file(&path).unwrap();
    }
}
