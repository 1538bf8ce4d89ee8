use std::path::{Path, PathBuf};

use crate::core::errors::{FilosignError, Result};
use crate::core::traits::key_value_store::KeyValueStore;

/// File-based store that keeps each key in its own JSON file.
///
/// Layout: `{dir}/{key}.json`. Keys must be plain file names; the config
/// layer rejects anything with path separators before it gets here.
///
/// Example `.filosign/filosign_public_keys.json`:
/// ```text
/// {"0x5aaeb6053f3e94c9b9a09f33669435e7ef1beaed":{"publicKey":"0x04…","timestamp":1760745600000,"verified":true}}
/// ```
pub struct FileKeyValueStore {
    dir: PathBuf,
}

impl FileKeyValueStore {
    /// Create a store rooted at `dir`. The directory is created on first write.
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    /// Path of the file backing `key`.
    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }

    fn ensure_dir(dir: &Path) -> std::io::Result<()> {
        if !dir.exists() {
            std::fs::create_dir_all(dir)?;
        }
        Ok(())
    }
}

impl KeyValueStore for FileKeyValueStore {
    fn read(&self, key: &str) -> Result<Option<String>> {
        let path = self.path_for(key);
        if !path.exists() {
            return Ok(None);
        }

        std::fs::read_to_string(&path)
            .map(Some)
            .map_err(|e| FilosignError::StorageFailed {
                operation: "read",
                reason: format!("{}: {e}", path.display()),
            })
    }

    fn write(&self, key: &str, value: &str) -> Result<()> {
        let path = self.path_for(key);
        let write_err = |e: std::io::Error| FilosignError::StorageFailed {
            operation: "write",
            reason: format!("{}: {e}", path.display()),
        };

        Self::ensure_dir(&self.dir).map_err(write_err)?;

        // Write to a sibling temp file, then rename over the original
        let tmp = self.dir.join(format!(".{key}.json.tmp"));
        std::fs::write(&tmp, value).map_err(write_err)?;
        std::fs::rename(&tmp, &path).map_err(write_err)?;
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<()> {
        let path = self.path_for(key);
        match std::fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(FilosignError::StorageFailed {
                operation: "delete",
                reason: format!("{}: {e}", path.display()),
            }),
        }
    }
}
