//! Key/value persistence
//!
//! Settings and the high score are small JSON blobs stored under string keys.
//! Backends:
//! - `FileStorage`: one file per key in a data directory (native)
//! - `LocalStorage`: browser LocalStorage (wasm32)
//! - `MemoryStorage`: in-process map (tests, headless runs that must not touch disk)

use std::cell::RefCell;
use std::collections::HashMap;

use serde::Serialize;
use serde::de::DeserializeOwned;

/// Minimal string key/value store
pub trait Storage {
    /// Stored value for `key`, or `None` if absent or unreadable
    fn read(&self, key: &str) -> Option<String>;

    /// Store `value` under `key`, replacing any previous value
    fn write(&self, key: &str, value: &str) -> anyhow::Result<()>;
}

/// Decode a JSON value stored under `key`
///
/// Missing keys and corrupt payloads both yield `None`; corruption is logged.
pub fn load_json<T: DeserializeOwned>(storage: &dyn Storage, key: &str) -> Option<T> {
    let json = storage.read(key)?;
    match serde_json::from_str(&json) {
        Ok(value) => Some(value),
        Err(e) => {
            log::warn!("Ignoring corrupt '{}' entry: {}", key, e);
            None
        }
    }
}

/// Encode `value` as JSON under `key`, logging (not returning) failures
pub fn save_json<T: Serialize>(storage: &dyn Storage, key: &str, value: &T) -> bool {
    let result = serde_json::to_string(value)
        .map_err(anyhow::Error::from)
        .and_then(|json| storage.write(key, &json));
    if let Err(e) = result {
        log::warn!("Failed to save '{}': {:#}", key, e);
        return false;
    }
    true
}

/// Volatile storage backed by a map
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: RefCell<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Storage for MemoryStorage {
    fn read(&self, key: &str) -> Option<String> {
        self.entries.borrow().get(key).cloned()
    }

    fn write(&self, key: &str, value: &str) -> anyhow::Result<()> {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
pub use file::{DATA_DIR_ENV, FileStorage};

#[cfg(not(target_arch = "wasm32"))]
mod file {
    use std::fs;
    use std::path::PathBuf;

    use anyhow::Context;

    use super::Storage;

    /// Environment variable overriding the data directory
    pub const DATA_DIR_ENV: &str = "SKY_ACE_DATA_DIR";
    const DEFAULT_DATA_DIR: &str = ".sky-ace";

    /// One `<key>.json` file per key inside a data directory
    #[derive(Debug, Clone)]
    pub struct FileStorage {
        dir: PathBuf,
    }

    impl FileStorage {
        pub fn new(dir: impl Into<PathBuf>) -> Self {
            Self { dir: dir.into() }
        }

        /// `$SKY_ACE_DATA_DIR`, falling back to `.sky-ace` in the working directory
        pub fn from_env() -> Self {
            let dir = std::env::var_os(DATA_DIR_ENV)
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR));
            Self::new(dir)
        }

        fn path_for(&self, key: &str) -> PathBuf {
            // Keys are internal identifiers; keep them filesystem safe anyway
            let name: String = key
                .chars()
                .map(|c| if c.is_ascii_alphanumeric() || c == '_' || c == '-' { c } else { '_' })
                .collect();
            self.dir.join(format!("{}.json", name))
        }
    }

    impl Storage for FileStorage {
        fn read(&self, key: &str) -> Option<String> {
            let path = self.path_for(key);
            match fs::read_to_string(&path) {
                Ok(data) => Some(data),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => None,
                Err(e) => {
                    log::warn!("Failed reading {}: {}", path.display(), e);
                    None
                }
            }
        }

        fn write(&self, key: &str, value: &str) -> anyhow::Result<()> {
            fs::create_dir_all(&self.dir)
                .with_context(|| format!("failed creating directory {}", self.dir.display()))?;

            // Write then rename so a crash never leaves a truncated file
            let path = self.path_for(key);
            let tmp = path.with_extension("json.tmp");
            fs::write(&tmp, value).with_context(|| format!("failed writing {}", tmp.display()))?;
            fs::rename(&tmp, &path)
                .with_context(|| format!("failed replacing {}", path.display()))?;
            Ok(())
        }
    }
}

#[cfg(target_arch = "wasm32")]
pub use web::LocalStorage;

#[cfg(target_arch = "wasm32")]
mod web {
    use anyhow::anyhow;

    use super::Storage;

    /// Browser LocalStorage (keys are namespaced with `sky_ace_`)
    #[derive(Debug, Default, Clone, Copy)]
    pub struct LocalStorage;

    impl LocalStorage {
        fn storage() -> Option<web_sys::Storage> {
            web_sys::window()
                .and_then(|w| w.local_storage().ok())
                .flatten()
        }
    }

    impl Storage for LocalStorage {
        fn read(&self, key: &str) -> Option<String> {
            Self::storage()?
                .get_item(&format!("sky_ace_{}", key))
                .ok()
                .flatten()
        }

        fn write(&self, key: &str, value: &str) -> anyhow::Result<()> {
            let storage = Self::storage().ok_or_else(|| anyhow!("LocalStorage unavailable"))?;
            storage
                .set_item(&format!("sky_ace_{}", key), value)
                .map_err(|e| anyhow!("LocalStorage write failed: {:?}", e))
        }
    }
}

/// The natural store for the current platform
pub fn default_storage() -> Box<dyn Storage> {
    #[cfg(target_arch = "wasm32")]
    {
        Box::new(LocalStorage)
    }

    #[cfg(not(target_arch = "wasm32"))]
    {
        Box::new(FileStorage::from_env())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq, serde::Serialize, serde::Deserialize)]
    struct Blob {
        n: u32,
    }

    #[test]
    fn test_memory_round_trip() {
        let store = MemoryStorage::new();
        assert_eq!(store.read("a"), None);
        store.write("a", "1").unwrap();
        store.write("a", "2").unwrap();
        assert_eq!(store.read("a").as_deref(), Some("2"));
    }

    #[test]
    fn test_json_helpers() {
        let store = MemoryStorage::new();
        assert!(save_json(&store, "blob", &Blob { n: 7 }));
        assert_eq!(load_json::<Blob>(&store, "blob"), Some(Blob { n: 7 }));
    }

    #[test]
    fn test_corrupt_json_is_ignored() {
        let store = MemoryStorage::new();
        store.write("blob", "{not json").unwrap();
        assert_eq!(load_json::<Blob>(&store, "blob"), None);
    }

    #[cfg(not(target_arch = "wasm32"))]
    #[test]
    fn test_file_storage() {
        let dir = std::env::temp_dir().join(format!("sky-ace-test-{}", std::process::id()));
        let store = FileStorage::new(&dir);
        assert_eq!(store.read("high_score"), None);

        store.write("high_score", "{\"score\":10}").unwrap();
        assert_eq!(store.read("high_score").as_deref(), Some("{\"score\":10}"));
        assert!(dir.join("high_score.json").exists());

        // Unsafe characters never escape the data directory
        store.write("../evil", "x").unwrap();
        assert!(dir.join("___evil.json").exists());

        let _ = std::fs::remove_dir_all(&dir);
    }
}
