//! JSON file snapshot backend.
//!
//! The whole store lives in one UTF-8 JSON file whose top level maps collection
//! names to arrays of documents. Every load reads and parses the full file;
//! every save rewrites it, pretty-printed with 2-space indentation. Nothing is
//! cached between calls and the file is only open for the duration of a call.

use async_trait::async_trait;
use std::{
    fs,
    io::{self, Write},
    path::{Path, PathBuf},
};
use tempfile::NamedTempFile;

use filedoc_core::{
    backend::{StoreBackend, StoreBackendBuilder},
    document::Snapshot,
    error::{DocumentStoreError, DocumentStoreResult},
};

/// Default file name used when a builder is given no path.
pub const DEFAULT_PATH: &str = "db.json";

/// Storage backend persisting the snapshot to a single JSON file.
///
/// A missing file, or one holding only whitespace, reads as an empty snapshot.
/// Saves write a temporary file beside the target and rename it into place,
/// so a reader sees either the previous or the new content. The replaced file
/// keeps its permissions, and a symlinked path keeps pointing at its target.
///
/// # Blocking
///
/// File access uses `std::fs` directly. `get_data` and `set_data` block the
/// calling thread for the whole read, or the whole write and `fsync`. Callers
/// on a shared runtime can wrap them in `tokio::task::spawn_blocking`.
///
/// # Concurrency
///
/// There is no locking. Two stores, or two concurrent operations, doing
/// read-modify-write cycles on the same file race and the last save wins.
///
/// # Example
///
/// ```ignore
/// use filedoc_file::JsonFileStore;
/// use filedoc::backend::StoreBackend;
///
/// let store = JsonFileStore::new("db.json");
/// let snapshot = store.get_data().await?;
/// ```
#[derive(Clone, Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    create_dirs: bool,
}

impl JsonFileStore {
    /// Creates a store backed by the file at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            create_dirs: false,
        }
    }

    /// Creates a builder for constructing a `JsonFileStore`.
    pub fn builder() -> JsonFileStoreBuilder {
        JsonFileStoreBuilder::default()
    }

    /// Returns the path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_snapshot(&self) -> DocumentStoreResult<Snapshot> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                log::debug!("{} does not exist, reading as empty", self.path.display());
                return Ok(Snapshot::new());
            }
            Err(err) => return Err(err.into()),
        };

        if content.trim().is_empty() {
            return Ok(Snapshot::new());
        }

        let snapshot: Snapshot =
            serde_json::from_str(&content).map_err(DocumentStoreError::Parse)?;

        log::trace!(
            "Loaded {} collection(s) from {}",
            snapshot.len(),
            self.path.display()
        );

        Ok(snapshot)
    }

    fn write_snapshot(&self, snapshot: &Snapshot) -> DocumentStoreResult<()> {
        let content = serde_json::to_string_pretty(snapshot)
            .map_err(|err| DocumentStoreError::Serialization(err.to_string()))?;

        if self.create_dirs {
            fs::create_dir_all(parent_dir(&self.path))?;
        }

        let target = self.resolve_target()?;
        let permissions = fs::metadata(&target)?.permissions();

        let mut file = NamedTempFile::new_in(parent_dir(&target))?;
        file.write_all(content.as_bytes())?;
        file.as_file().set_permissions(permissions)?;
        file.as_file().sync_all()?;
        file.persist(&target)
            .map_err(|err| DocumentStoreError::Io(err.error))?;

        log::trace!(
            "Saved {} collection(s) to {}",
            snapshot.len(),
            self.path.display()
        );

        Ok(())
    }

    /// Returns the real file a save replaces, creating it empty if absent so
    /// it gets the process's default permissions. Symlinks are followed.
    fn resolve_target(&self) -> io::Result<PathBuf> {
        fs::OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(false)
            .open(&self.path)?;

        fs::canonicalize(&self.path)
    }
}

fn parent_dir(path: &Path) -> &Path {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    }
}

#[async_trait]
impl StoreBackend for JsonFileStore {
    async fn get_data(&self) -> DocumentStoreResult<Snapshot> {
        self.read_snapshot()
    }

    async fn set_data(&self, snapshot: Snapshot) -> DocumentStoreResult<()> {
        self.write_snapshot(&snapshot)
    }
}

/// Builder for constructing [`JsonFileStore`] instances.
///
/// # Example
///
/// ```ignore
/// use filedoc_file::JsonFileStore;
/// use filedoc::backend::StoreBackendBuilder;
///
/// let store = JsonFileStore::builder()
///     .path("data/app.json")
///     .create_dirs(true)
///     .build()
///     .await?;
/// ```
#[derive(Debug, Default)]
pub struct JsonFileStoreBuilder {
    path: Option<PathBuf>,
    create_dirs: bool,
}

impl JsonFileStoreBuilder {
    /// Sets the backing file path. Defaults to [`DEFAULT_PATH`].
    pub fn path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Creates missing parent directories on save. Off by default.
    pub fn create_dirs(mut self, create_dirs: bool) -> Self {
        self.create_dirs = create_dirs;
        self
    }
}

#[async_trait]
impl StoreBackendBuilder for JsonFileStoreBuilder {
    type Backend = JsonFileStore;

    async fn build(self) -> DocumentStoreResult<Self::Backend> {
        let path = self.path.unwrap_or_else(|| PathBuf::from(DEFAULT_PATH));

        if path.is_dir() {
            return Err(DocumentStoreError::Io(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("{} is a directory", path.display()),
            )));
        }

        Ok(JsonFileStore {
            path,
            create_dirs: self.create_dirs,
        })
    }
}
