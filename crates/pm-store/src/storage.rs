//! Storage Abstraction
//!
//! A synchronous, size-bounded key-value medium holding UTF-8 strings.
//! Every access completes before returning; there is no background flushing.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use nix::fcntl::{Flock, FlockArg};
use parking_lot::{Mutex, MutexGuard, RwLock};
use regex::Regex;
use thiserror::Error;
use tracing::{debug, instrument, warn};

/// Keys are plain file-name-safe tokens
static KEY_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9][A-Za-z0-9_.-]*$").expect("key pattern is a valid regex")
});

/// Storage errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Quota exceeded writing {key}: {needed} bytes needed, limit is {limit}")]
    QuotaExceeded {
        key: String,
        needed: usize,
        limit: usize,
    },
    #[error("Invalid key: {0}")]
    InvalidKey(String),
    #[error("Storage medium unavailable")]
    Unavailable,
}

pub type StorageResult<T> = Result<T, StorageError>;

/// File holding the cross-process write lock of a `LocalStorage` directory
const LOCK_FILE: &str = ".lock";

/// Exclusive hold over a storage medium, released on drop
#[must_use = "the lock is released as soon as it is dropped"]
pub struct StorageLock<'a> {
    _held: Held<'a>,
}

enum Held<'a> {
    Process { _guard: MutexGuard<'a, ()> },
    File { _flock: Flock<fs::File> },
}

/// Storage trait - unified interface for key-value backends
pub trait Storage: Send + Sync {
    /// Value stored under `key`, or `None` when absent
    fn get(&self, key: &str) -> StorageResult<Option<String>>;

    /// Store `value` under `key`, replacing any previous value in one step
    fn set(&self, key: &str, value: &str) -> StorageResult<()>;

    /// Remove `key`; removing an absent key is not an error
    fn remove(&self, key: &str) -> StorageResult<()>;

    /// All keys currently held
    fn keys(&self) -> StorageResult<Vec<String>>;

    /// Bytes used, counted as key length plus value length per entry
    fn used_bytes(&self) -> StorageResult<usize>;

    /// Block until no other holder of this medium's lock remains
    ///
    /// Reads and writes do not take the lock themselves; callers hold it
    /// across a read-compare-write sequence so it cannot interleave with
    /// another one.
    fn lock(&self) -> StorageResult<StorageLock<'_>>;

    /// Backend name for logging
    fn name(&self) -> &str;
}

fn validate_key(key: &str) -> StorageResult<()> {
    if key.contains("..") || !KEY_PATTERN.is_match(key) {
        return Err(StorageError::InvalidKey(key.to_string()));
    }
    Ok(())
}

fn check_quota(
    quota: Option<usize>,
    key: &str,
    value: &str,
    used: usize,
    previous: usize,
) -> StorageResult<()> {
    if let Some(limit) = quota {
        let needed = used.saturating_sub(previous) + key.len() + value.len();
        if needed > limit {
            return Err(StorageError::QuotaExceeded {
                key: key.to_string(),
                needed,
                limit,
            });
        }
    }
    Ok(())
}

/// Filesystem storage: one file per key inside a root directory
pub struct LocalStorage {
    root: PathBuf,
    quota: Option<usize>,
}

impl LocalStorage {
    /// Open (creating if needed) a storage directory
    pub fn open(root: impl AsRef<Path>) -> StorageResult<Self> {
        let root = root.as_ref().to_path_buf();
        fs::create_dir_all(&root)?;
        Ok(Self { root, quota: None })
    }

    /// Cap the total bytes held by this storage
    pub fn with_quota(mut self, quota: Option<usize>) -> Self {
        self.quota = quota;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn resolve_path(&self, key: &str) -> StorageResult<PathBuf> {
        validate_key(key)?;
        Ok(self.root.join(key))
    }

    fn cleanup_temp_file(temp_file: &Path, original_error: &std::io::Error) {
        if let Err(cleanup_err) = fs::remove_file(temp_file) {
            warn!(
                temp_file = %temp_file.display(),
                original_error = %original_error,
                cleanup_error = %cleanup_err,
                "Failed to clean up temp file after write error"
            );
        }
    }
}

impl Storage for LocalStorage {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        let path = self.resolve_path(key)?;
        match fs::read_to_string(&path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    #[instrument(skip(self, value), fields(storage = "local", bytes = value.len()))]
    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        let path = self.resolve_path(key)?;

        if self.quota.is_some() {
            let previous = match fs::metadata(&path) {
                Ok(meta) => key.len() + meta.len() as usize,
                Err(_) => 0,
            };
            check_quota(self.quota, key, value, self.used_bytes()?, previous)?;
        }

        // Write to a sibling temp file, then rename over the target
        let temp_file = self.root.join(format!("{}.tmp", key));
        if let Err(e) = fs::write(&temp_file, value) {
            Self::cleanup_temp_file(&temp_file, &e);
            return Err(e.into());
        }
        if let Err(e) = fs::rename(&temp_file, &path) {
            Self::cleanup_temp_file(&temp_file, &e);
            return Err(e.into());
        }

        debug!(path = %path.display(), "Value stored");
        Ok(())
    }

    fn remove(&self, key: &str) -> StorageResult<()> {
        let path = self.resolve_path(key)?;
        match fs::remove_file(&path) {
            Ok(()) => {
                debug!(path = %path.display(), "Value removed");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    fn keys(&self) -> StorageResult<Vec<String>> {
        let mut keys = Vec::new();
        for entry in fs::read_dir(&self.root)? {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }
            let Some(name) = entry.file_name().to_str().map(str::to_string) else {
                continue;
            };
            if name.ends_with(".tmp") || validate_key(&name).is_err() {
                continue;
            }
            keys.push(name);
        }
        keys.sort();
        Ok(keys)
    }

    fn used_bytes(&self) -> StorageResult<usize> {
        let mut total = 0;
        for key in self.keys()? {
            let meta = fs::metadata(self.root.join(&key))?;
            total += key.len() + meta.len() as usize;
        }
        Ok(total)
    }

    /// `flock` on `<root>/.lock`, shared by every process using the directory
    fn lock(&self) -> StorageResult<StorageLock<'_>> {
        let path = self.root.join(LOCK_FILE);
        let file = fs::OpenOptions::new()
            .create(true)
            .truncate(false)
            .read(true)
            .write(true)
            .open(&path)?;
        let flock = Flock::lock(file, FlockArg::LockExclusive)
            .map_err(|(_, errno)| StorageError::Io(std::io::Error::from(errno)))?;
        Ok(StorageLock {
            _held: Held::File { _flock: flock },
        })
    }

    fn name(&self) -> &str {
        "local"
    }
}

/// In-memory storage, used by tests and ephemeral sessions
pub struct MemoryStorage {
    entries: RwLock<HashMap<String, String>>,
    writer: Mutex<()>,
    quota: Option<usize>,
    available: bool,
}

impl Default for MemoryStorage {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            writer: Mutex::new(()),
            quota: None,
            available: true,
        }
    }

    /// Storage that rejects writes once `quota` bytes would be exceeded
    pub fn with_quota(quota: usize) -> Self {
        Self {
            quota: Some(quota),
            ..Self::new()
        }
    }

    /// Storage where every call fails, as when no medium exists at all
    pub fn unavailable() -> Self {
        Self {
            available: false,
            ..Self::new()
        }
    }

    fn ensure_available(&self) -> StorageResult<()> {
        if self.available {
            Ok(())
        } else {
            Err(StorageError::Unavailable)
        }
    }
}

impl Storage for MemoryStorage {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        self.ensure_available()?;
        Ok(self.entries.read().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        self.ensure_available()?;
        validate_key(key)?;

        let mut entries = self.entries.write();
        if self.quota.is_some() {
            let used = entries.iter().map(|(k, v)| k.len() + v.len()).sum();
            let previous = entries.get(key).map(|v| key.len() + v.len()).unwrap_or(0);
            check_quota(self.quota, key, value, used, previous)?;
        }
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> StorageResult<()> {
        self.ensure_available()?;
        self.entries.write().remove(key);
        Ok(())
    }

    fn keys(&self) -> StorageResult<Vec<String>> {
        self.ensure_available()?;
        let mut keys: Vec<String> = self.entries.read().keys().cloned().collect();
        keys.sort();
        Ok(keys)
    }

    fn used_bytes(&self) -> StorageResult<usize> {
        self.ensure_available()?;
        Ok(self.entries.read().iter().map(|(k, v)| k.len() + v.len()).sum())
    }

    fn lock(&self) -> StorageResult<StorageLock<'_>> {
        self.ensure_available()?;
        Ok(StorageLock {
            _held: Held::Process {
                _guard: self.writer.lock(),
            },
        })
    }

    fn name(&self) -> &str {
        "memory"
    }
}

impl<S: Storage + ?Sized> Storage for std::sync::Arc<S> {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> StorageResult<()> {
        (**self).remove(key)
    }

    fn keys(&self) -> StorageResult<Vec<String>> {
        (**self).keys()
    }

    fn used_bytes(&self) -> StorageResult<usize> {
        (**self).used_bytes()
    }

    fn lock(&self) -> StorageResult<StorageLock<'_>> {
        (**self).lock()
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}
